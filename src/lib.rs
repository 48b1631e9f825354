// Entity Catalog - Core Library
// Filtered, paginated CRUD over sites, parks and expenses.
// Shared by the CLI, the web server and tests.

pub mod catalog;
pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod filter;
pub mod form;
pub mod logging;
pub mod page;
pub mod seed;
pub mod services;
pub mod store;

#[cfg(feature = "server")]
pub mod web;

// Re-export commonly used types
pub use catalog::Catalog;
pub use config::Config;
pub use db::{open_database, open_in_memory, setup_database};
pub use entities::{
    ArchaeologicalSite, Expense, ExpenseCategory, ExpenseDraft, HistoricalPeriod, Location,
    NationalPark, ParkDraft, ParkType, SiteDraft, Vendor,
};
pub use error::{CatalogError, Result};
pub use filter::{Criterion, FieldValue, Filterable, Operator, Predicate, TextMatch};
pub use page::{Page, PageRequest};
pub use services::{
    ExpenseFilter, ExpenseService, LocationService, ParkFilter, ParkService, SiteFilter,
    SiteService, VendorService,
};
pub use store::{EntityStore, MemoryStore, Record, SqlRecord, SqliteStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
