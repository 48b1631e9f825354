// CRUD Services
//
// Thin orchestration over entity stores: resolve the related record, load,
// mutate, save. Collaborators are passed in at construction.

pub mod expense;
pub mod park;
pub mod site;

pub use expense::{ExpenseFilter, ExpenseService};
pub use park::{ParkFilter, ParkService};
pub use site::{SiteFilter, SiteService};

use crate::entities::{Location, Vendor};
use crate::error::Result;
use crate::store::{EntityStore, Record};
use std::sync::Arc;
use tracing::{info, warn};

/// Log misses at warn level; they surface to users as "not found" pages.
pub(crate) fn traced<T>(result: Result<T>) -> Result<T> {
    if let Err(err) = &result {
        if err.is_not_found() {
            warn!(error = %err, "record lookup failed");
        }
    }
    result
}

// ============================================================================
// LOOKUP SERVICE
// ============================================================================

/// Read access to related records (locations, vendors) plus creation for
/// seeding and import.
pub struct LookupService<L: Record> {
    store: Arc<dyn EntityStore<L>>,
}

pub type LocationService = LookupService<Location>;
pub type VendorService = LookupService<Vendor>;

impl<L: Record> LookupService<L> {
    pub fn new(store: Arc<dyn EntityStore<L>>) -> Self {
        LookupService { store }
    }

    pub fn list_all(&self) -> Result<Vec<L>> {
        self.store.list_all()
    }

    pub fn find_by_id(&self, id: i64) -> Result<L> {
        traced(self.store.find_by_id(id))
    }

    pub fn create(&self, record: L) -> Result<L> {
        let saved = self.store.save(record)?;
        info!(kind = L::KIND, id = ?saved.id(), "lookup record created");
        Ok(saved)
    }

    pub fn count(&self) -> Result<usize> {
        self.store.count()
    }
}

impl<L: Record> Clone for LookupService<L> {
    fn clone(&self) -> Self {
        LookupService {
            store: Arc::clone(&self.store),
        }
    }
}
