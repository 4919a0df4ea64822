use axum::{extract::State, Json};
use service::Author;

use crate::errors::{RpcError, RpcRequest};
use crate::messages::{AuthorIdRequest, AuthorsReply, CreateAuthorRequest, Empty, UpdateAuthorRequest};
use crate::state::ServerState;

pub async fn get_author(
    State(state): State<ServerState>,
    RpcRequest(req): RpcRequest<AuthorIdRequest>,
) -> Result<Json<AuthorsReply<Author>>, RpcError> {
    let author = state.catalog.get_author(&req.author_id).await?;
    Ok(Json(AuthorsReply { authors: author }))
}

pub async fn list_authors(State(state): State<ServerState>) -> Json<AuthorsReply<Vec<Author>>> {
    Json(AuthorsReply { authors: state.catalog.list_authors().await })
}

pub async fn create_author(
    State(state): State<ServerState>,
    RpcRequest(req): RpcRequest<CreateAuthorRequest>,
) -> Result<Json<AuthorsReply<Author>>, RpcError> {
    let author = state.catalog.create_author(req.author).await?;
    Ok(Json(AuthorsReply { authors: author }))
}

pub async fn update_author(
    State(state): State<ServerState>,
    RpcRequest(req): RpcRequest<UpdateAuthorRequest>,
) -> Result<Json<AuthorsReply<Author>>, RpcError> {
    let author = state.catalog.update_author(&req.author_id, req.data).await?;
    Ok(Json(AuthorsReply { authors: author }))
}

pub async fn delete_author(
    State(state): State<ServerState>,
    RpcRequest(req): RpcRequest<AuthorIdRequest>,
) -> Result<Json<Empty>, RpcError> {
    state.catalog.delete_author(&req.author_id).await?;
    Ok(Json(Empty::default()))
}
