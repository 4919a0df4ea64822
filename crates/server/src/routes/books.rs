use axum::{extract::State, Json};
use service::Book;

use crate::errors::{RpcError, RpcRequest};
use crate::messages::{BookIdRequest, BooksReply, CreateBookRequest, Empty, UpdateBookRequest};
use crate::state::ServerState;

pub async fn get_book(
    State(state): State<ServerState>,
    RpcRequest(req): RpcRequest<BookIdRequest>,
) -> Result<Json<BooksReply<Book>>, RpcError> {
    let book = state.catalog.get_book(&req.book_id).await?;
    Ok(Json(BooksReply { books: book }))
}

pub async fn list_books(State(state): State<ServerState>) -> Json<BooksReply<Vec<Book>>> {
    Json(BooksReply { books: state.catalog.list_books().await })
}

pub async fn create_book(
    State(state): State<ServerState>,
    RpcRequest(req): RpcRequest<CreateBookRequest>,
) -> Result<Json<BooksReply<Book>>, RpcError> {
    let book = state.catalog.create_book(req.book).await?;
    Ok(Json(BooksReply { books: book }))
}

pub async fn update_book(
    State(state): State<ServerState>,
    RpcRequest(req): RpcRequest<UpdateBookRequest>,
) -> Result<Json<BooksReply<Book>>, RpcError> {
    let book = state.catalog.update_book(&req.book_id, req.data).await?;
    Ok(Json(BooksReply { books: book }))
}

pub async fn delete_book(
    State(state): State<ServerState>,
    RpcRequest(req): RpcRequest<BookIdRequest>,
) -> Result<Json<Empty>, RpcError> {
    state.catalog.delete_book(&req.book_id).await?;
    Ok(Json(Empty::default()))
}
