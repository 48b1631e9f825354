// Catalog - stores and services wired together
//
// Both back ends expose the same services; only the store type differs.

use crate::config::Config;
use crate::db;
use crate::entities::{ArchaeologicalSite, Expense, Location, NationalPark, Vendor};
use crate::error::Result;
use crate::filter::TextMatch;
use crate::services::{ExpenseService, LocationService, ParkService, SiteService, VendorService};
use crate::store::{EntityStore, MemoryStore, SqliteStore};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};
use tracing::info;

pub struct Catalog {
    pub locations: LocationService,
    pub vendors: VendorService,
    pub sites: SiteService,
    pub parks: ParkService,
    pub expenses: ExpenseService,
}

impl Catalog {
    /// Open the configured SQLite database, creating the schema if needed.
    pub fn open(config: &Config) -> Result<Self> {
        let conn = db::open_database(&config.database)?;
        info!(database = %config.database.display(), "catalog opened");
        Ok(Self::sqlite(conn, config.text_match))
    }

    /// Catalog over a connection prepared with `db::setup_database`.
    pub fn sqlite(conn: Connection, text_match: TextMatch) -> Self {
        let conn = Arc::new(Mutex::new(conn));

        Self::assemble(
            Arc::new(SqliteStore::<Location>::new(Arc::clone(&conn))),
            Arc::new(SqliteStore::<Vendor>::new(Arc::clone(&conn))),
            Arc::new(SqliteStore::<ArchaeologicalSite>::new(Arc::clone(&conn))),
            Arc::new(SqliteStore::<NationalPark>::new(Arc::clone(&conn))),
            Arc::new(SqliteStore::<Expense>::new(conn)),
            text_match,
        )
    }

    /// Catalog held entirely in memory.
    pub fn in_memory(text_match: TextMatch) -> Self {
        Self::assemble(
            Arc::new(MemoryStore::<Location>::new()),
            Arc::new(MemoryStore::<Vendor>::new()),
            Arc::new(MemoryStore::<ArchaeologicalSite>::new()),
            Arc::new(MemoryStore::<NationalPark>::new()),
            Arc::new(MemoryStore::<Expense>::new()),
            text_match,
        )
    }

    fn assemble(
        locations: Arc<dyn EntityStore<Location>>,
        vendors: Arc<dyn EntityStore<Vendor>>,
        sites: Arc<dyn EntityStore<ArchaeologicalSite>>,
        parks: Arc<dyn EntityStore<NationalPark>>,
        expenses: Arc<dyn EntityStore<Expense>>,
        text_match: TextMatch,
    ) -> Self {
        let locations = LocationService::new(locations);
        let vendors = VendorService::new(vendors);

        Catalog {
            sites: SiteService::new(sites, locations.clone()).with_text_match(text_match),
            parks: ParkService::new(parks, locations.clone()).with_text_match(text_match),
            expenses: ExpenseService::new(expenses, vendors.clone()).with_text_match(text_match),
            locations,
            vendors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{ExpenseCategory, ExpenseDraft, HistoricalPeriod, ParkDraft, ParkType, SiteDraft};
    use crate::services::{ExpenseFilter, ParkFilter, SiteFilter};
    use chrono::NaiveDate;

    fn populate(catalog: &Catalog) {
        for (name, country) in [("Ohrid", "MK"), ("Bitola", "MK"), ("Stobi", "MK")] {
            catalog
                .locations
                .create(Location::new(name.to_string(), country.to_string()))
                .unwrap();
        }
        catalog.vendors.create(Vendor::new("Acme".to_string())).unwrap();
        catalog.vendors.create(Vendor::new("Globex".to_string())).unwrap();

        let periods = HistoricalPeriod::ALL;
        for i in 0..20i64 {
            catalog
                .sites
                .create(SiteDraft {
                    name: format!("Site {:02}", i),
                    area_size: (i * 3) as f64,
                    rating: 1.0 + (i % 5) as f64,
                    period: periods[(i as usize) % periods.len()],
                    location_id: 1 + i % 3,
                })
                .unwrap();
            catalog
                .parks
                .create(ParkDraft {
                    name: format!("Park {:02}", i),
                    area_size: (100 + i) as f64,
                    rating: (i % 5) as f64,
                    park_type: ParkType::ALL[(i as usize) % ParkType::ALL.len()],
                    location_id: 1 + i % 3,
                })
                .unwrap();
            catalog
                .expenses
                .create(ExpenseDraft {
                    title: format!("Invoice {:02}", i),
                    date_created: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                    amount: 10.0 * i as f64,
                    days_to_expire: 10,
                    expense_category: ExpenseCategory::ALL[(i as usize) % ExpenseCategory::ALL.len()],
                    vendor: 1 + i % 2,
                })
                .unwrap();
        }

        catalog.sites.close(4).unwrap();
        catalog.sites.delete(7).unwrap();
        catalog.parks.delete(2).unwrap();
        catalog.expenses.extend_expiration(3).unwrap();
    }

    fn sqlite_catalog() -> Catalog {
        Catalog::sqlite(db::open_in_memory().unwrap(), TextMatch::Sensitive)
    }

    #[test]
    fn test_back_ends_return_identical_site_pages() {
        let memory = Catalog::in_memory(TextMatch::Sensitive);
        let sqlite = sqlite_catalog();
        populate(&memory);
        populate(&sqlite);

        let filters = [
            SiteFilter::default(),
            SiteFilter {
                name: Some("Site 1".to_string()),
                ..SiteFilter::default()
            },
            SiteFilter {
                area_size: Some(20.0),
                rating: Some(2.5),
                ..SiteFilter::default()
            },
            SiteFilter {
                period: Some(HistoricalPeriod::Ancient),
                location_id: Some(2),
                ..SiteFilter::default()
            },
        ];

        for filter in &filters {
            for page in 0..3 {
                assert_eq!(
                    memory.sites.find_page(filter, page, 4).unwrap(),
                    sqlite.sites.find_page(filter, page, 4).unwrap(),
                    "filter {:?} page {}",
                    filter,
                    page
                );
            }
        }
    }

    #[test]
    fn test_back_ends_return_identical_park_and_expense_pages() {
        let memory = Catalog::in_memory(TextMatch::Sensitive);
        let sqlite = sqlite_catalog();
        populate(&memory);
        populate(&sqlite);

        let park_filter = ParkFilter {
            park_type: Some(ParkType::National),
            ..ParkFilter::default()
        };
        assert_eq!(
            memory.parks.find_page(&park_filter, 0, 10).unwrap(),
            sqlite.parks.find_page(&park_filter, 0, 10).unwrap()
        );

        let expense_filter = ExpenseFilter {
            title: Some("Invoice 1".to_string()),
            vendor: Some(2),
            ..ExpenseFilter::default()
        };
        assert_eq!(
            memory.expenses.find_page(&expense_filter, 0, 10).unwrap(),
            sqlite.expenses.find_page(&expense_filter, 0, 10).unwrap()
        );
        assert_eq!(
            memory.expenses.list_all().unwrap(),
            sqlite.expenses.list_all().unwrap()
        );
    }

    #[test]
    fn test_back_ends_agree_on_insensitive_non_ascii_names() {
        let memory = Catalog::in_memory(TextMatch::Insensitive);
        let sqlite = Catalog::sqlite(db::open_in_memory().unwrap(), TextMatch::Insensitive);

        for catalog in [&memory, &sqlite] {
            catalog
                .locations
                .create(Location::new("Охрид".to_string(), "MK".to_string()))
                .unwrap();
            for name in ["Охрид Плаошник", "Самуилова Тврдина", "OHRID Ancient Theatre"] {
                catalog
                    .sites
                    .create(SiteDraft {
                        name: name.to_string(),
                        area_size: 3.0,
                        rating: 4.0,
                        period: HistoricalPeriod::Medieval,
                        location_id: 1,
                    })
                    .unwrap();
            }
        }

        for needle in ["охрид", "ТВРДИНА", "ohrid"] {
            let filter = SiteFilter {
                name: Some(needle.to_string()),
                ..SiteFilter::default()
            };
            let from_memory = memory.sites.find_page(&filter, 0, 10).unwrap();
            let from_sqlite = sqlite.sites.find_page(&filter, 0, 10).unwrap();

            assert_eq!(from_memory.total_elements, 1, "needle {}", needle);
            assert_eq!(from_memory, from_sqlite, "needle {}", needle);
        }
    }

    #[test]
    fn test_sqlite_catalog_lifecycle() {
        let catalog = sqlite_catalog();
        populate(&catalog);

        assert!(catalog.sites.find_by_id(4).unwrap().closed);
        assert!(catalog.sites.find_by_id(7).unwrap_err().is_not_found());
        assert_eq!(catalog.sites.list_all().unwrap().len(), 19);
        assert_eq!(catalog.expenses.find_by_id(3).unwrap().days_to_expire, 11);
    }

    #[test]
    fn test_open_uses_configured_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            database: dir.path().join("catalog.db"),
            ..Config::default()
        };

        {
            let catalog = Catalog::open(&config).unwrap();
            catalog
                .locations
                .create(Location::new("Ohrid".to_string(), String::new()))
                .unwrap();
        }

        let reopened = Catalog::open(&config).unwrap();
        assert_eq!(reopened.locations.list_all().unwrap().len(), 1);
    }
}
