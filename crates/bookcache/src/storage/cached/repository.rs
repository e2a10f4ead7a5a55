//! Cache-aside decorator for entity stores.
//!
//! Reads check the cache first and populate it on a miss. Writes go to the
//! store first, then refresh or evict the single-entity key, then apply the
//! listing invalidation policy. Cache failures are logged and never returned.

use std::marker::PhantomData;
use std::sync::Arc;

use bookcache_core::cache::{
    entity_key, evict, listing_key, listing_pattern, lookup, populate, Cache, CacheLookup,
    ListingInvalidation,
};
use bookcache_core::catalog::{Author, Book, Entity};
use bookcache_core::storage::{AuthorBooksRepository, EntityRepository, Page, Pagination, Result};

/// Cached repository decorator.
///
/// # Type Parameters
///
/// * `E` - The entity type served by this repository
/// * `R` - The underlying store implementation
/// * `C` - The cache implementation
pub struct CachedRepository<E, R: ?Sized, C: ?Sized> {
    repository: Arc<R>,
    cache: Arc<C>,
    invalidation: ListingInvalidation,
    _entity: PhantomData<fn() -> E>,
}

impl<E, R, C> Clone for CachedRepository<E, R, C>
where
    R: ?Sized,
    C: ?Sized,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            cache: Arc::clone(&self.cache),
            invalidation: self.invalidation,
            _entity: PhantomData,
        }
    }
}

impl<E, R, C> CachedRepository<E, R, C>
where
    E: Entity,
    R: EntityRepository<E> + ?Sized,
    C: Cache + ?Sized,
{
    pub fn new(repository: Arc<R>, cache: Arc<C>, invalidation: ListingInvalidation) -> Self {
        Self {
            repository,
            cache,
            invalidation,
            _entity: PhantomData,
        }
    }

    pub fn invalidation(&self) -> ListingInvalidation {
        self.invalidation
    }

    /// Gets an entity by id. Absent entities are never cached.
    pub async fn get(&self, id: i64) -> Result<Option<E>> {
        let key = entity_key(E::KIND, id);

        if let CacheLookup::Hit(entity) = lookup::<E, _>(&*self.cache, &key).await {
            return Ok(Some(entity));
        }

        let entity = self.repository.get(id).await?;
        if let Some(ref found) = entity {
            populate(&*self.cache, &key, found, None).await;
        }

        Ok(entity)
    }

    /// Gets one page of the default listing together with the total count.
    ///
    /// A cached page keeps the total observed when it was stored.
    pub async fn list(&self, pagination: Pagination) -> Result<Page<E>> {
        let key = listing_key(E::KIND, pagination);

        if let CacheLookup::Hit(page) = lookup::<Page<E>, _>(&*self.cache, &key).await {
            return Ok(page);
        }

        let total = self.repository.count().await?;
        let items = self.repository.list(pagination).await?;
        let page = Page::new(items, total);
        populate(&*self.cache, &key, &page, None).await;

        Ok(page)
    }

    pub async fn create(&self, fields: &E::Fields) -> Result<E> {
        let entity = self.repository.insert(fields).await?;

        populate(&*self.cache, &entity_key(E::KIND, entity.id()), &entity, None).await;
        self.after_write().await;

        tracing::debug!(entity = %E::KIND, id = entity.id(), "Entity created");
        Ok(entity)
    }

    /// Replaces every field of an entity.
    ///
    /// Returns `None` without touching the cache when the entity does not
    /// exist.
    pub async fn update(&self, id: i64, fields: &E::Fields) -> Result<Option<E>> {
        let Some(entity) = self.repository.update(id, fields).await? else {
            return Ok(None);
        };

        populate(&*self.cache, &entity_key(E::KIND, id), &entity, None).await;
        self.after_write().await;

        tracing::debug!(entity = %E::KIND, id, "Entity updated");
        Ok(Some(entity))
    }

    /// Deletes an entity, returning the deleted record.
    pub async fn delete(&self, id: i64) -> Result<Option<E>> {
        let Some(entity) = self.repository.delete(id).await? else {
            return Ok(None);
        };

        evict(&*self.cache, &entity_key(E::KIND, id)).await;
        self.after_write().await;

        tracing::debug!(entity = %E::KIND, id, "Entity deleted");
        Ok(Some(entity))
    }

    /// Drops every cached listing page of this entity type.
    ///
    /// Returns the number of pages removed; zero if the cache is unreachable.
    pub async fn invalidate_listings(&self) -> usize {
        let pattern = listing_pattern(E::KIND);
        match self.cache.delete_pattern(&pattern).await {
            Ok(removed) => {
                tracing::debug!(entity = %E::KIND, removed, "Listing cache invalidated");
                removed
            }
            Err(err) => {
                tracing::warn!(
                    entity = %E::KIND,
                    error = %err,
                    "Failed to invalidate listing cache"
                );
                0
            }
        }
    }

    async fn after_write(&self) {
        if self.invalidation == ListingInvalidation::OnWrite {
            self.invalidate_listings().await;
        }
    }
}

impl<R, C> CachedRepository<Author, R, C>
where
    R: EntityRepository<Author> + AuthorBooksRepository + ?Sized,
    C: Cache + ?Sized,
{
    /// Gets every book written by an author, straight from the store.
    pub async fn books_by_author(&self, author_id: i64) -> Result<Vec<Book>> {
        self.repository.books_by_author(author_id).await
    }
}
