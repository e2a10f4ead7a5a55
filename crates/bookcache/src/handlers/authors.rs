use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use bookcache_core::catalog::{Author, AuthorFields, Book, EntityKind};
use bookcache_core::query::{QueryPage, QueryParams};

use super::{
    error::{AppError, RequestError},
    response::{
        body_or_bad_request, path_or_bad_request, query_or_bad_request, resolve_pagination,
        ApiResponse, PageQuery, SearchQuery,
    },
};
use crate::{models::AuthorList, state::AppState};

/// Fields matched by `GET /authors/search`.
const SEARCH_FIELDS: [&str; 2] = ["name", "bio"];

/// List authors (GET /authors).
pub async fn list_authors(
    State(state): State<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<AuthorList>>, AppError> {
    let query = query_or_bad_request(query)?;
    let pagination = resolve_pagination(query.page, query.limit, &state.config)?;

    let page = state.authors.list(pagination).await?;

    Ok(Json(ApiResponse::ok(page.into())))
}

/// Search authors by name or biography (GET /authors/search).
pub async fn search_authors(
    State(state): State<AppState>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<QueryPage>>, AppError> {
    let query = query_or_bad_request(query)?;
    let pagination = resolve_pagination(query.page, query.limit, &state.config)?;

    let params = QueryParams::new(EntityKind::Author)
        .with_search(query.search.clone(), SEARCH_FIELDS)
        .with_select(query.select_fields())
        .with_pagination(pagination);

    let page = state.queries.query(&params, None).await?;

    Ok(Json(ApiResponse::ok(page)))
}

/// Get a single author by ID (GET /authors/{id}).
pub async fn get_author(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<ApiResponse<Author>>, AppError> {
    let id = path_or_bad_request(path)?;

    let author = state
        .authors
        .get(id)
        .await?
        .ok_or_else(|| AppError::not_found(EntityKind::Author, id))?;

    Ok(Json(ApiResponse::ok(author)))
}

/// Create a new author (POST /authors).
pub async fn create_author(
    State(state): State<AppState>,
    body: Result<Json<AuthorFields>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let fields = body_or_bad_request(body)?;

    let author = state.authors.create(&fields).await?;

    tracing::info!(author_id = author.id, name = %author.name, "Created new author");

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(author))))
}

/// Replace an author (PUT /authors/{id}).
pub async fn update_author(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<AuthorFields>, JsonRejection>,
) -> Result<Json<ApiResponse<Author>>, AppError> {
    let id = path_or_bad_request(path)?;
    let fields = body_or_bad_request(body)?;

    let author = state
        .authors
        .update(id, &fields)
        .await?
        .ok_or_else(|| AppError::not_found(EntityKind::Author, id))?;

    tracing::info!(author_id = id, "Updated author");

    Ok(Json(ApiResponse::ok(author)))
}

/// Delete an author (DELETE /authors/{id}).
///
/// Fails with 422 while the author still has books.
pub async fn delete_author(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let id = path_or_bad_request(path)?;

    state
        .authors
        .delete(id)
        .await?
        .ok_or_else(|| AppError::not_found(EntityKind::Author, id))?;

    tracing::info!(author_id = id, "Deleted author");

    Ok(Json(ApiResponse::message("Author deleted successfully")))
}

/// List the books written by an author (GET /authors/{id}/books).
pub async fn list_author_books(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<ApiResponse<Vec<Book>>>, AppError> {
    let id = path_or_bad_request(path)?;

    let books = state.authors.books_by_author(id).await?;

    if books.is_empty() {
        return Err(RequestError::NotFound("Books not found for this author".to_string()).into());
    }

    Ok(Json(ApiResponse::ok(books)))
}
