use async_trait::async_trait;

use crate::catalog::{Book, Entity};
use crate::query::{QueryPage, QueryPlan};

use super::{Pagination, Result};

/// Entity store operations for one entity type.
#[async_trait]
pub trait EntityRepository<E: Entity>: Send + Sync {
    /// Gets an entity by its ID.
    async fn get(&self, id: i64) -> Result<Option<E>>;

    /// Gets one page of entities ordered by ID.
    async fn list(&self, pagination: Pagination) -> Result<Vec<E>>;

    /// Counts all entities.
    async fn count(&self) -> Result<u64>;

    /// Inserts a new entity; the store assigns the ID.
    async fn insert(&self, fields: &E::Fields) -> Result<E>;

    /// Replaces every field of an existing entity.
    ///
    /// Returns `None` when no entity has the given ID.
    async fn update(&self, id: i64, fields: &E::Fields) -> Result<Option<E>>;

    /// Deletes an entity, returning the deleted record.
    ///
    /// Returns `None` when no entity has the given ID.
    async fn delete(&self, id: i64) -> Result<Option<E>>;
}

/// Relationship traversal from an author to their books.
#[async_trait]
pub trait AuthorBooksRepository: Send + Sync {
    /// Gets every book written by the given author.
    async fn books_by_author(&self, author_id: i64) -> Result<Vec<Book>>;
}

/// Filtered, joined, paginated queries over validated plans.
#[async_trait]
pub trait QueryRepository: Send + Sync {
    /// Runs the plan, returning the page of rows and the filtered total.
    async fn query(&self, plan: &QueryPlan) -> Result<QueryPage>;
}
