//! SQLite repository implementation.
//!
//! Implements the repository traits from `bookcache_core::storage` using SQLite.

use async_trait::async_trait;
use rusqlite::params_from_iter;
use rusqlite::types::Value;
use tokio_rusqlite::Connection;

use bookcache_core::catalog::{Author, AuthorFields, Book, BookFields};
use bookcache_core::query::{QueryPage, QueryPlan, Row as ResultRow};
use bookcache_core::storage::{
    AuthorBooksRepository, EntityRepository, Pagination, QueryRepository, RepositoryError, Result,
};

use super::conversions::{
    format_date, row_to_author, row_to_book, text_or_null, to_sql_int, value_ref_to_json,
};
use super::error::{map_tokio_rusqlite_error, map_tokio_rusqlite_error_with_id};
use super::query::{compile, register_functions};
use super::schema;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

type RowMapper<T> = fn(&rusqlite::Row<'_>) -> rusqlite::Result<T>;

/// SQLite-based repository implementation.
///
/// Provides async access to SQLite storage for authors and books. A single
/// connection serializes every statement.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Creates a new repository with a file-based database.
    ///
    /// The database file will be created if it doesn't exist.
    /// Schema tables are created automatically.
    pub async fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Creates a new repository with an in-memory database.
    ///
    /// Data is lost when the connection is dropped.
    #[cfg(test)]
    pub async fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    async fn init_schema(conn: &Connection) -> Result<()> {
        conn.call(|conn| {
            register_functions(conn).map_err(wrap_err)?;
            conn.execute_batch(schema::CREATE_TABLES)
                .map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }

    /// Runs a statement expected to produce at most one row.
    async fn query_one<T: Send + 'static>(
        &self,
        sql: &'static str,
        params: Vec<Value>,
        map: RowMapper<T>,
        entity_type: &'static str,
        id: String,
    ) -> Result<Option<T>> {
        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(sql).map_err(wrap_err)?;
                match stmt.query_row(params_from_iter(params.iter()), map) {
                    Ok(value) => Ok(Some(value)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, entity_type, id))
    }

    async fn query_all<T: Send + 'static>(
        &self,
        sql: &'static str,
        params: Vec<Value>,
        map: RowMapper<T>,
        entity_type: &'static str,
    ) -> Result<Vec<T>> {
        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(sql).map_err(wrap_err)?;
                let rows = stmt
                    .query_map(params_from_iter(params.iter()), map)
                    .map_err(wrap_err)?;

                let mut results = Vec::new();
                for row_result in rows {
                    results.push(row_result.map_err(wrap_err)?);
                }
                Ok(results)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, entity_type))
    }

    /// Inserts a row and reads it back by its new rowid.
    async fn insert_row<T: Send + 'static>(
        &self,
        insert_sql: &'static str,
        select_sql: &'static str,
        params: Vec<Value>,
        map: RowMapper<T>,
        entity_type: &'static str,
    ) -> Result<T> {
        self.conn
            .call(move |conn| {
                conn.execute(insert_sql, params_from_iter(params.iter()))
                    .map_err(wrap_err)?;
                let id = conn.last_insert_rowid();
                conn.query_row(select_sql, [id], map).map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, entity_type))
    }

    /// Updates a row by id (bound as `?1`) and reads it back.
    async fn update_row<T: Send + 'static>(
        &self,
        update_sql: &'static str,
        select_sql: &'static str,
        id: i64,
        params: Vec<Value>,
        map: RowMapper<T>,
        entity_type: &'static str,
    ) -> Result<Option<T>> {
        self.conn
            .call(move |conn| {
                let changed = conn
                    .execute(update_sql, params_from_iter(params.iter()))
                    .map_err(wrap_err)?;
                if changed == 0 {
                    return Ok(None);
                }
                conn.query_row(select_sql, [id], map)
                    .map(Some)
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, entity_type, id.to_string()))
    }

    /// Reads a row by id, then deletes it.
    async fn delete_row<T: Send + 'static>(
        &self,
        select_sql: &'static str,
        delete_sql: &'static str,
        id: i64,
        map: RowMapper<T>,
        entity_type: &'static str,
    ) -> Result<Option<T>> {
        self.conn
            .call(move |conn| {
                let existing = match conn.query_row(select_sql, [id], map) {
                    Ok(value) => value,
                    Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
                    Err(e) => return Err(wrap_err(e)),
                };
                conn.execute(delete_sql, [id]).map_err(wrap_err)?;
                Ok(Some(existing))
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, entity_type, id.to_string()))
    }

    async fn count_rows(&self, sql: &'static str, entity_type: &'static str) -> Result<u64> {
        let count: i64 = self
            .conn
            .call(move |conn| {
                conn.query_row(sql, [], |row| row.get(0))
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, entity_type))?;
        Ok(u64::try_from(count).unwrap_or_default())
    }
}

fn page_params(pagination: Pagination) -> Vec<Value> {
    vec![
        Value::Integer(to_sql_int(pagination.limit)),
        Value::Integer(to_sql_int(pagination.skip)),
    ]
}

// ============================================================================
// Author
// ============================================================================

fn author_params(fields: &AuthorFields) -> Vec<Value> {
    vec![
        Value::Text(fields.name.clone()),
        text_or_null(fields.bio.clone()),
        Value::Text(format_date(&fields.birth_date)),
    ]
}

#[async_trait]
impl EntityRepository<Author> for SqliteRepository {
    async fn get(&self, id: i64) -> Result<Option<Author>> {
        self.query_one(
            schema::SELECT_AUTHOR_BY_ID,
            vec![Value::Integer(id)],
            row_to_author,
            "Author",
            id.to_string(),
        )
        .await
    }

    async fn list(&self, pagination: Pagination) -> Result<Vec<Author>> {
        self.query_all(
            schema::SELECT_AUTHORS_PAGE,
            page_params(pagination),
            row_to_author,
            "Author",
        )
        .await
    }

    async fn count(&self) -> Result<u64> {
        self.count_rows(schema::COUNT_AUTHORS, "Author").await
    }

    async fn insert(&self, fields: &AuthorFields) -> Result<Author> {
        self.insert_row(
            schema::INSERT_AUTHOR,
            schema::SELECT_AUTHOR_BY_ID,
            author_params(fields),
            row_to_author,
            "Author",
        )
        .await
    }

    async fn update(&self, id: i64, fields: &AuthorFields) -> Result<Option<Author>> {
        let mut params = vec![Value::Integer(id)];
        params.extend(author_params(fields));

        self.update_row(
            schema::UPDATE_AUTHOR,
            schema::SELECT_AUTHOR_BY_ID,
            id,
            params,
            row_to_author,
            "Author",
        )
        .await
    }

    async fn delete(&self, id: i64) -> Result<Option<Author>> {
        self.delete_row(
            schema::SELECT_AUTHOR_BY_ID,
            schema::DELETE_AUTHOR,
            id,
            row_to_author,
            "Author",
        )
        .await
    }
}

#[async_trait]
impl AuthorBooksRepository for SqliteRepository {
    async fn books_by_author(&self, author_id: i64) -> Result<Vec<Book>> {
        self.query_all(
            schema::SELECT_BOOKS_BY_AUTHOR,
            vec![Value::Integer(author_id)],
            row_to_book,
            "Book",
        )
        .await
    }
}

// ============================================================================
// Book
// ============================================================================

fn book_params(fields: &BookFields) -> Vec<Value> {
    vec![
        Value::Text(fields.title.clone()),
        text_or_null(fields.description.clone()),
        Value::Text(format_date(&fields.publish_date)),
        Value::Integer(fields.author_id),
    ]
}

#[async_trait]
impl EntityRepository<Book> for SqliteRepository {
    async fn get(&self, id: i64) -> Result<Option<Book>> {
        self.query_one(
            schema::SELECT_BOOK_BY_ID,
            vec![Value::Integer(id)],
            row_to_book,
            "Book",
            id.to_string(),
        )
        .await
    }

    async fn list(&self, pagination: Pagination) -> Result<Vec<Book>> {
        self.query_all(
            schema::SELECT_BOOKS_PAGE,
            page_params(pagination),
            row_to_book,
            "Book",
        )
        .await
    }

    async fn count(&self) -> Result<u64> {
        self.count_rows(schema::COUNT_BOOKS, "Book").await
    }

    async fn insert(&self, fields: &BookFields) -> Result<Book> {
        self.insert_row(
            schema::INSERT_BOOK,
            schema::SELECT_BOOK_BY_ID,
            book_params(fields),
            row_to_book,
            "Book",
        )
        .await
    }

    async fn update(&self, id: i64, fields: &BookFields) -> Result<Option<Book>> {
        let mut params = vec![Value::Integer(id)];
        params.extend(book_params(fields));

        self.update_row(
            schema::UPDATE_BOOK,
            schema::SELECT_BOOK_BY_ID,
            id,
            params,
            row_to_book,
            "Book",
        )
        .await
    }

    async fn delete(&self, id: i64) -> Result<Option<Book>> {
        self.delete_row(
            schema::SELECT_BOOK_BY_ID,
            schema::DELETE_BOOK,
            id,
            row_to_book,
            "Book",
        )
        .await
    }
}

// ============================================================================
// Parameterized queries
// ============================================================================

#[async_trait]
impl QueryRepository for SqliteRepository {
    async fn query(&self, plan: &QueryPlan) -> Result<QueryPage> {
        let compiled = compile(plan);
        let names: Vec<String> = plan.columns.iter().map(|c| c.output_name.clone()).collect();
        let ignored_fields = plan.ignored_fields.clone();
        let entity_type = plan.kind.model_name();

        tracing::trace!(sql = %compiled.page_sql, "Running parameterized query");

        self.conn
            .call(move |conn| {
                // Count and page run back to back on the same connection.
                let total: i64 = conn
                    .query_row(
                        &compiled.count_sql,
                        params_from_iter(compiled.count_params.iter()),
                        |row| row.get(0),
                    )
                    .map_err(wrap_err)?;

                let mut stmt = conn.prepare(&compiled.page_sql).map_err(wrap_err)?;
                let mut rows = stmt
                    .query(params_from_iter(compiled.page_params.iter()))
                    .map_err(wrap_err)?;

                let mut results = Vec::new();
                while let Some(row) = rows.next().map_err(wrap_err)? {
                    let mut result = ResultRow::new();
                    for (index, name) in names.iter().enumerate() {
                        let value = row.get_ref(index).map_err(wrap_err)?;
                        result.insert(name.clone(), value_ref_to_json(value));
                    }
                    results.push(result);
                }

                Ok(QueryPage {
                    rows: results,
                    total: u64::try_from(total).unwrap_or_default(),
                    ignored_fields,
                })
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, entity_type))
    }
}
