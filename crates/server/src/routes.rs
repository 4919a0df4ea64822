use axum::{
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;

use crate::state::ServerState;

pub mod authors;
pub mod books;

pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

/// Build the RPC router: one `POST /<Service>/<Method>` route per call.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let bookstore = Router::new()
        .route("/Bookstore/GetBook", post(books::get_book))
        .route("/Bookstore/ListBook", post(books::list_books))
        .route("/Bookstore/CreateBook", post(books::create_book))
        .route("/Bookstore/UpdateBook", post(books::update_book))
        .route("/Bookstore/DeleteBook", post(books::delete_book));

    let authors = Router::new()
        .route("/Authors/GetAuthor", post(authors::get_author))
        .route("/Authors/ListAuthor", post(authors::list_authors))
        .route("/Authors/CreateAuthor", post(authors::create_author))
        .route("/Authors/UpdateAuthor", post(authors::update_author))
        .route("/Authors/DeleteAuthor", post(authors::delete_author));

    Router::new()
        .route("/health", get(health))
        .merge(bookstore)
        .merge(authors)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
