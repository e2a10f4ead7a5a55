use std::time::Duration;

use axum::{
    http::{header, Method, StatusCode},
    routing::get,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    handlers::{
        authors::{
            create_author, delete_author, get_author, list_author_books, list_authors,
            search_authors, update_author,
        },
        books::{create_book, delete_book, get_book, list_books, search_books, update_book},
        error::route_not_found,
        health::livez,
    },
    state::AppState,
};

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    let api_routes = Router::new()
        // Author routes
        .route("/authors", get(list_authors).post(create_author))
        .route("/authors/search", get(search_authors))
        .route(
            "/authors/{id}",
            get(get_author).put(update_author).delete(delete_author),
        )
        .route("/authors/{id}/books", get(list_author_books))
        // Book routes
        .route("/books", get(list_books).post(create_book))
        .route("/books/search", get(search_books))
        .route(
            "/books/{id}",
            get(get_book).put(update_book).delete(delete_book),
        )
        .layer(cors);

    Router::new()
        .route("/livez", get(livez))
        .merge(api_routes)
        .fallback(route_not_found)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(10),
        ))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support::test_state;
    use axum::{body::Body, http::Request};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                request = request.header("Content-Type", "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = app
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, json)
    }

    fn john_doe() -> Value {
        json!({"name": "John Doe", "bio": "Author Bio", "birth_date": "1980-01-01"})
    }

    async fn post_author(app: &Router, body: Value) -> i64 {
        let (status, json) = send(app, "POST", "/authors", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
        json["data"]["id"].as_i64().unwrap()
    }

    #[tokio::test]
    async fn test_livez() {
        let (state, _) = test_state().await;
        let app = create_app(state);

        let (status, _) = send(&app, "GET", "/livez", None).await;

        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_author_lifecycle() {
        let (state, cache) = test_state().await;
        let app = create_app(state);

        let id = post_author(&app, john_doe()).await;
        assert!(cache.contains(&format!("author:{id}")));

        let (status, json) = send(&app, "GET", &format!("/authors/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["name"], "John Doe");
        assert_eq!(json["data"]["birth_date"], "1980-01-01");

        let (status, json) = send(
            &app,
            "PUT",
            &format!("/authors/{id}"),
            Some(json!({"name": "Jane Doe", "birth_date": "1990-01-01"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["name"], "Jane Doe");
        assert_eq!(json["data"]["bio"], Value::Null);

        let (status, json) = send(&app, "GET", &format!("/authors/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["name"], "Jane Doe");

        let (status, json) = send(&app, "DELETE", &format!("/authors/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json,
            json!({"success": true, "message": "Author deleted successfully"})
        );
        assert!(!cache.contains(&format!("author:{id}")));

        let (status, json) = send(&app, "GET", &format!("/authors/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            json,
            json!({"success": false, "message": "Author not found"})
        );

        let (status, _) = send(&app, "DELETE", &format!("/authors/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_missing_author_is_not_found() {
        let (state, cache) = test_state().await;
        let app = create_app(state);

        let (status, _) = send(&app, "PUT", "/authors/99", Some(john_doe())).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(!cache.contains("author:99"));
    }

    #[tokio::test]
    async fn test_listing_reflects_writes() {
        let (state, _) = test_state().await;
        let app = create_app(state);

        let (status, json) = send(&app, "GET", "/authors", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"], json!({"total": 0, "authors": []}));

        post_author(&app, john_doe()).await;

        let (_, json) = send(&app, "GET", "/authors?page=0&limit=10", None).await;
        assert_eq!(json["data"]["total"], 1);
        assert_eq!(json["data"]["authors"][0]["name"], "John Doe");

        let (_, json) = send(&app, "GET", "/authors?page=1&limit=10", None).await;
        assert_eq!(json["data"]["total"], 1);
        assert_eq!(json["data"]["authors"], json!([]));
    }

    #[tokio::test]
    async fn test_invalid_pagination_is_bad_request() {
        let (state, _) = test_state().await;
        let app = create_app(state);

        let (status, json) = send(&app, "GET", "/authors?limit=101", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);

        let (status, _) = send(&app, "GET", "/books?limit=0", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, json) = send(&app, "GET", "/authors?page=-1", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);

        let (status, _) = send(&app, "GET", "/books?page=1001", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_bad_id_is_enveloped_bad_request() {
        let (state, _) = test_state().await;
        let app = create_app(state);

        for (method, uri) in [
            ("GET", "/authors/abc"),
            ("DELETE", "/books/1.5"),
            ("GET", "/authors/abc/books"),
        ] {
            let (status, json) = send(&app, method, uri, None).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{method} {uri}");
            assert_eq!(json["success"], false);
            assert!(json["message"].is_string());
        }
    }

    #[tokio::test]
    async fn test_unknown_route_is_enveloped_not_found() {
        let (state, _) = test_state().await;
        let app = create_app(state);

        let (status, json) = send(&app, "GET", "/publishers", None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            json,
            json!({"success": false, "message": "Route not found"})
        );
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let (state, _) = test_state().await;
        let app = create_app(state);

        let (status, json) = send(&app, "POST", "/authors", Some(json!({"name": "No Date"}))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);
    }

    #[tokio::test]
    async fn test_book_with_missing_author_is_rejected() {
        let (state, cache) = test_state().await;
        let app = create_app(state);

        let (status, json) = send(
            &app,
            "POST",
            "/books",
            Some(json!({"title": "Orphan", "publish_date": "2022-01-01", "author_id": 42})),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["success"], false);
        assert!(cache.keys().iter().all(|key| !key.starts_with("book:")));
    }

    #[tokio::test]
    async fn test_author_books() {
        let (state, _) = test_state().await;
        let app = create_app(state);
        let author_id = post_author(&app, john_doe()).await;

        let (status, json) = send(&app, "GET", &format!("/authors/{author_id}/books"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["message"], "Books not found for this author");

        let (status, json) = send(
            &app,
            "POST",
            "/books",
            Some(json!({
                "title": "Book Title",
                "description": "Book Description",
                "publish_date": "2022-01-01",
                "author_id": author_id
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let book_id = json["data"]["id"].as_i64().unwrap();

        let (status, json) = send(&app, "GET", &format!("/authors/{author_id}/books"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"][0]["id"], book_id);
        assert_eq!(json["data"][0]["title"], "Book Title");

        let (status, _) = send(&app, "DELETE", &format!("/authors/{author_id}"), None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, json) = send(&app, "DELETE", &format!("/books/{book_id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["message"], "Book deleted successfully");

        let (status, _) = send(&app, "DELETE", &format!("/authors/{author_id}"), None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_search_books_by_author_name() {
        let (state, _) = test_state().await;
        let app = create_app(state);
        let austen = post_author(
            &app,
            json!({"name": "Jane Austen", "birth_date": "1775-12-16"}),
        )
        .await;
        let other = post_author(&app, john_doe()).await;

        for (title, author_id) in [("Emma", austen), ("Persuasion", austen), ("Other", other)] {
            let (status, _) = send(
                &app,
                "POST",
                "/books",
                Some(json!({"title": title, "publish_date": "1815-12-23", "author_id": author_id})),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (status, json) = send(&app, "GET", "/books/search?search=AUSTEN&select=title", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["total"], 2);
        assert_eq!(
            json["data"]["rows"],
            json!([
                {"title": "Emma", "name": "Jane Austen"},
                {"title": "Persuasion", "name": "Jane Austen"}
            ])
        );
    }

    #[tokio::test]
    async fn test_search_authors_reports_ignored_fields() {
        let (state, cache) = test_state().await;
        let app = create_app(state);
        post_author(&app, john_doe()).await;

        let (status, json) = send(
            &app,
            "GET",
            "/authors/search?search=bio&select=name,nickname",
            None,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["total"], 1);
        assert_eq!(json["data"]["rows"], json!([{"name": "John Doe"}]));
        assert_eq!(json["data"]["ignored_fields"], json!(["authors.nickname"]));
        assert!(cache.keys().iter().any(|key| key.starts_with("Author:")));
    }
}
