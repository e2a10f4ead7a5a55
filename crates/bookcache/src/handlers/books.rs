use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use bookcache_core::catalog::{Book, BookFields, EntityKind};
use bookcache_core::query::{JoinSpec, QueryPage, QueryParams};

use super::{
    error::AppError,
    response::{
        body_or_bad_request, path_or_bad_request, query_or_bad_request, resolve_pagination,
        ApiResponse, PageQuery, SearchQuery,
    },
};
use crate::{models::BookList, state::AppState};

/// Book fields matched by `GET /books/search`.
const SEARCH_FIELDS: [&str; 2] = ["title", "description"];

/// Joins each book to its author, exposing and searching the author's name.
fn author_join() -> JoinSpec {
    JoinSpec::new(EntityKind::Author, "id", "author_id")
        .with_select(["name"])
        .with_search(["name"])
}

/// List books (GET /books).
pub async fn list_books(
    State(state): State<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<BookList>>, AppError> {
    let query = query_or_bad_request(query)?;
    let pagination = resolve_pagination(query.page, query.limit, &state.config)?;

    let page = state.books.list(pagination).await?;

    Ok(Json(ApiResponse::ok(page.into())))
}

/// Search books by title, description or author name (GET /books/search).
pub async fn search_books(
    State(state): State<AppState>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<QueryPage>>, AppError> {
    let query = query_or_bad_request(query)?;
    let pagination = resolve_pagination(query.page, query.limit, &state.config)?;

    let params = QueryParams::new(EntityKind::Book)
        .with_search(query.search.clone(), SEARCH_FIELDS)
        .with_select(query.select_fields())
        .with_join(author_join())
        .with_pagination(pagination);

    let page = state.queries.query(&params, None).await?;

    Ok(Json(ApiResponse::ok(page)))
}

/// Get a single book by ID (GET /books/{id}).
pub async fn get_book(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<ApiResponse<Book>>, AppError> {
    let id = path_or_bad_request(path)?;

    let book = state
        .books
        .get(id)
        .await?
        .ok_or_else(|| AppError::not_found(EntityKind::Book, id))?;

    Ok(Json(ApiResponse::ok(book)))
}

/// Create a new book (POST /books).
///
/// Fails with 422 when `author_id` does not reference an existing author.
pub async fn create_book(
    State(state): State<AppState>,
    body: Result<Json<BookFields>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let fields = body_or_bad_request(body)?;

    let book = state.books.create(&fields).await?;

    tracing::info!(book_id = book.id, author_id = book.author_id, "Created new book");

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(book))))
}

/// Replace a book (PUT /books/{id}).
pub async fn update_book(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<BookFields>, JsonRejection>,
) -> Result<Json<ApiResponse<Book>>, AppError> {
    let id = path_or_bad_request(path)?;
    let fields = body_or_bad_request(body)?;

    let book = state
        .books
        .update(id, &fields)
        .await?
        .ok_or_else(|| AppError::not_found(EntityKind::Book, id))?;

    tracing::info!(book_id = id, "Updated book");

    Ok(Json(ApiResponse::ok(book)))
}

/// Delete a book (DELETE /books/{id}).
pub async fn delete_book(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let id = path_or_bad_request(path)?;

    state
        .books
        .delete(id)
        .await?
        .ok_or_else(|| AppError::not_found(EntityKind::Book, id))?;

    tracing::info!(book_id = id, "Deleted book");

    Ok(Json(ApiResponse::message("Book deleted successfully")))
}
