// Entity Models
//
// Entities (sites, parks, expenses) carry a server-assigned integer id and a
// required reference to a lookup record (location or vendor). Lookup records
// are only read by the entity services.

pub mod expense;
pub mod location;
pub mod park;
pub mod site;
pub mod vendor;

pub use expense::{Expense, ExpenseCategory, ExpenseDraft};
pub use location::Location;
pub use park::{NationalPark, ParkDraft, ParkType};
pub use site::{ArchaeologicalSite, HistoricalPeriod, SiteDraft};
pub use vendor::Vendor;

use crate::error::{CatalogError, Result};
use rusqlite::types::Type;
use rusqlite::Row;
use std::str::FromStr;

/// Read a TEXT column and parse it (enum names, ISO dates).
pub(crate) fn parsed_column<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: String = row.get(idx)?;
    raw.parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Reject NaN and infinities; SQLite would store them as NULL.
pub(crate) fn require_finite(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(CatalogError::InvalidValue { field })
    }
}
