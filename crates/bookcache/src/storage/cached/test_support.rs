//! Test doubles shared by the cached decorators.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use bookcache_core::cache::{pattern_matches, Cache, CacheError, Result as CacheResult};
use bookcache_core::catalog::{Book, Entity};
use bookcache_core::query::{QueryPage, QueryPlan};
use bookcache_core::storage::{
    AuthorBooksRepository, EntityRepository, Pagination, QueryRepository, Result,
};

/// In-process cache with TTL and an "unavailable" switch.
#[derive(Default)]
pub struct MockCache {
    store: Mutex<HashMap<String, (Vec<u8>, Option<Instant>)>>,
    unavailable: AtomicBool,
    writes: AtomicUsize,
}

impl MockCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every operation fail with `ConnectionFailed`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.raw(key).is_some()
    }

    /// Raw bytes under a live key, bypassing the unavailable switch.
    pub fn raw(&self, key: &str) -> Option<Vec<u8>> {
        let store = self.store.lock().unwrap();
        match store.get(key) {
            Some((_, Some(expires_at))) if Instant::now() >= *expires_at => None,
            Some((value, _)) => Some(value.clone()),
            None => None,
        }
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.store.lock().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn check(&self) -> CacheResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(CacheError::ConnectionFailed("mock cache is down".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Cache for MockCache {
    async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
        self.check()?;
        Ok(self.raw(key))
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> CacheResult<()> {
        self.check()?;
        self.writes.fetch_add(1, Ordering::SeqCst);
        let expires_at = ttl.map(|d| Instant::now() + d);
        self.store
            .lock()
            .unwrap()
            .insert(key.to_string(), (value.to_vec(), expires_at));
        Ok(())
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        self.check()?;
        self.store.lock().unwrap().remove(key);
        Ok(())
    }

    async fn scan_keys(&self, pattern: &str) -> CacheResult<Vec<String>> {
        self.check()?;
        let keys: Vec<String> = self.store.lock().unwrap().keys().cloned().collect();
        Ok(keys
            .into_iter()
            .filter(|key| pattern_matches(pattern, key) && self.raw(key).is_some())
            .collect())
    }
}

/// In-memory entity store that counts how often it is read.
pub struct MockRepository<E: Entity> {
    rows: Mutex<BTreeMap<i64, E>>,
    next_id: AtomicI64,
    reads: AtomicUsize,
    books: Mutex<Vec<Book>>,
    query_result: Mutex<QueryPage>,
}

impl<E: Entity> MockRepository<E> {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
            reads: AtomicUsize::new(0),
            books: Mutex::new(Vec::new()),
            query_result: Mutex::new(QueryPage::default()),
        }
    }

    /// Number of get/list/count/query calls that reached the store.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Writes directly to the store, bypassing any cache.
    pub fn put(&self, entity: E) {
        self.rows.lock().unwrap().insert(entity.id(), entity);
    }

    pub fn set_books(&self, books: Vec<Book>) {
        *self.books.lock().unwrap() = books;
    }

    pub fn set_query_result(&self, page: QueryPage) {
        *self.query_result.lock().unwrap() = page;
    }

    fn read(&self) {
        self.reads.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl<E: Entity> EntityRepository<E> for MockRepository<E> {
    async fn get(&self, id: i64) -> Result<Option<E>> {
        self.read();
        Ok(self.rows.lock().unwrap().get(&id).cloned())
    }

    async fn list(&self, pagination: Pagination) -> Result<Vec<E>> {
        self.read();
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .skip(pagination.skip as usize)
            .take(pagination.limit as usize)
            .cloned()
            .collect())
    }

    async fn count(&self) -> Result<u64> {
        self.read();
        Ok(self.rows.lock().unwrap().len() as u64)
    }

    async fn insert(&self, fields: &E::Fields) -> Result<E> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let entity = E::from_fields(id, fields.clone());
        self.put(entity.clone());
        Ok(entity)
    }

    async fn update(&self, id: i64, fields: &E::Fields) -> Result<Option<E>> {
        let mut rows = self.rows.lock().unwrap();
        if !rows.contains_key(&id) {
            return Ok(None);
        }
        let entity = E::from_fields(id, fields.clone());
        rows.insert(id, entity.clone());
        Ok(Some(entity))
    }

    async fn delete(&self, id: i64) -> Result<Option<E>> {
        Ok(self.rows.lock().unwrap().remove(&id))
    }
}

#[async_trait]
impl<E: Entity> AuthorBooksRepository for MockRepository<E> {
    async fn books_by_author(&self, author_id: i64) -> Result<Vec<Book>> {
        self.read();
        Ok(self
            .books
            .lock()
            .unwrap()
            .iter()
            .filter(|book| book.author_id == author_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl<E: Entity> QueryRepository for MockRepository<E> {
    async fn query(&self, plan: &QueryPlan) -> Result<QueryPage> {
        self.read();
        let mut page = self.query_result.lock().unwrap().clone();
        page.ignored_fields = plan.ignored_fields.clone();
        Ok(page)
    }
}
