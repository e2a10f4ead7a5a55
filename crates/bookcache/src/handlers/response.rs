//! JSON envelope and query-string parsing shared by the API handlers.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query,
    },
    Json,
};
use bookcache_core::storage::Pagination;
use serde::{Deserialize, Serialize};

use super::error::RequestError;
use crate::config::Config;

/// Envelope wrapping every API response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
        }
    }
}

/// `?page=&limit=` on listing endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

/// `?search=&page=&limit=&select=` on search endpoints.
///
/// `select` is a comma-separated list of field names.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub search: String,
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub select: Option<String>,
}

impl SearchQuery {
    pub fn select_fields(&self) -> Vec<String> {
        split_fields(self.select.as_deref().unwrap_or_default())
    }
}

/// Unwraps a query-string extraction, turning rejections into a 400.
pub fn query_or_bad_request<T>(
    query: Result<Query<T>, QueryRejection>,
) -> Result<T, RequestError> {
    query
        .map(|Query(value)| value)
        .map_err(|rejection| RequestError::BadRequest(rejection.body_text()))
}

/// Unwraps a path extraction, turning rejections into a 400.
pub fn path_or_bad_request<T>(path: Result<Path<T>, PathRejection>) -> Result<T, RequestError> {
    path.map(|Path(value)| value)
        .map_err(|rejection| RequestError::BadRequest(rejection.body_text()))
}

/// Unwraps a JSON body extraction, turning rejections into a 400.
pub fn body_or_bad_request<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, RequestError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| RequestError::BadRequest(rejection.body_text()))
}

/// Validates `page` and `limit` against the configured bounds.
///
/// Every accepted pair can become a listing cache key, so both are capped.
pub fn resolve_pagination(
    page: Option<u64>,
    limit: Option<u64>,
    config: &Config,
) -> Result<Pagination, RequestError> {
    let limit = limit.unwrap_or(config.pagination_limit);
    if limit == 0 || limit > config.pagination_max_limit {
        return Err(RequestError::BadRequest(format!(
            "limit must be between 1 and {}",
            config.pagination_max_limit
        )));
    }

    let page = page.unwrap_or(0);
    if page > config.pagination_max_page {
        return Err(RequestError::BadRequest(format!(
            "page must be between 0 and {}",
            config.pagination_max_page
        )));
    }

    Ok(Pagination::page(page, limit))
}

fn split_fields(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|field| !field.is_empty())
        .map(str::to_string)
        .collect()
}
