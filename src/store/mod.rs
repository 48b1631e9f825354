// Entity Stores
// A generic persistent collection of records keyed by an integer id.
//
// - MemoryStore: RwLock-guarded map, predicates evaluated in memory
// - SqliteStore: rusqlite-backed, predicates rendered to SQL

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::{SqlRecord, SqliteStore};

use crate::error::Result;
use crate::filter::{Filterable, Predicate};
use crate::page::{Page, PageRequest};

/// A persisted domain record.
pub trait Record: Filterable + Clone + Send + Sync + 'static {
    /// Name used in errors and logs
    const KIND: &'static str;

    /// Paths a predicate may filter on
    const FIELDS: &'static [&'static str];

    /// `None` until the store assigns one
    fn id(&self) -> Option<i64>;

    fn set_id(&mut self, id: i64);
}

pub trait EntityStore<E: Record>: Send + Sync {
    /// All records in ascending id order.
    fn list_all(&self) -> Result<Vec<E>>;

    /// Fails with `NotFound` when no record has this id.
    fn find_by_id(&self, id: i64) -> Result<E>;

    /// Insert a record without id (assigning one) or overwrite the record
    /// with the same id. Returns what was stored.
    fn save(&self, record: E) -> Result<E>;

    fn delete(&self, record: &E) -> Result<()>;

    /// Zero-indexed page of matching records in ascending id order.
    fn find_page(&self, predicate: &Predicate, request: PageRequest) -> Result<Page<E>>;

    fn count(&self) -> Result<usize> {
        Ok(self.list_all()?.len())
    }
}
