// 🌱 Seeding - default lookup records and CSV import
//
// Locations and vendors are never edited through the entity pages, so a fresh
// catalog gets a default set and larger sets come in from CSV files.

use crate::catalog::Catalog;
use crate::entities::{Location, Vendor};
use crate::error::Result;
use crate::services::{LocationService, VendorService};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing::info;

const DEFAULT_LOCATIONS: [(&str, &str); 5] = [
    ("Skopje", "North Macedonia"),
    ("Ohrid", "North Macedonia"),
    ("Bitola", "North Macedonia"),
    ("Mavrovo", "North Macedonia"),
    ("Thessaloniki", "Greece"),
];

const DEFAULT_VENDORS: [&str; 4] = ["Office Depot", "Lufthansa", "Telekom", "JetBrains"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub locations: usize,
    pub vendors: usize,
}

/// Insert the default locations/vendors into empty lookup tables.
/// Tables that already hold records are left alone.
pub fn seed_defaults(catalog: &Catalog) -> Result<SeedReport> {
    let mut report = SeedReport::default();

    if catalog.locations.count()? == 0 {
        for (name, country) in DEFAULT_LOCATIONS {
            catalog
                .locations
                .create(Location::new(name.to_string(), country.to_string()))?;
            report.locations += 1;
        }
    }

    if catalog.vendors.count()? == 0 {
        for name in DEFAULT_VENDORS {
            catalog.vendors.create(Vendor::new(name.to_string()))?;
            report.vendors += 1;
        }
    }

    info!(locations = report.locations, vendors = report.vendors, "seeded lookup records");
    Ok(report)
}

// ============================================================================
// CSV IMPORT
// ============================================================================

#[derive(Debug, Deserialize)]
struct LocationRow {
    name: String,
    #[serde(default)]
    country: String,
}

#[derive(Debug, Deserialize)]
struct VendorRow {
    name: String,
}

/// Import `name,country` rows. Returns the number of locations created.
pub fn import_locations(path: &Path, locations: &LocationService) -> Result<usize> {
    let reader = csv::Reader::from_path(path)?;
    import_location_rows(reader, locations)
}

pub fn import_locations_from<R: Read>(input: R, locations: &LocationService) -> Result<usize> {
    import_location_rows(csv::Reader::from_reader(input), locations)
}

fn import_location_rows<R: Read>(
    mut reader: csv::Reader<R>,
    locations: &LocationService,
) -> Result<usize> {
    let mut imported = 0;

    for row in reader.deserialize() {
        let row: LocationRow = row?;
        if row.name.trim().is_empty() {
            continue;
        }
        locations.create(Location::new(row.name.trim().to_string(), row.country.trim().to_string()))?;
        imported += 1;
    }

    info!(imported, "locations imported");
    Ok(imported)
}

/// Import `name` rows. Returns the number of vendors created.
pub fn import_vendors(path: &Path, vendors: &VendorService) -> Result<usize> {
    let reader = csv::Reader::from_path(path)?;
    import_vendor_rows(reader, vendors)
}

pub fn import_vendors_from<R: Read>(input: R, vendors: &VendorService) -> Result<usize> {
    import_vendor_rows(csv::Reader::from_reader(input), vendors)
}

fn import_vendor_rows<R: Read>(mut reader: csv::Reader<R>, vendors: &VendorService) -> Result<usize> {
    let mut imported = 0;

    for row in reader.deserialize() {
        let row: VendorRow = row?;
        if row.name.trim().is_empty() {
            continue;
        }
        vendors.create(Vendor::new(row.name.trim().to_string()))?;
        imported += 1;
    }

    info!(imported, "vendors imported");
    Ok(imported)
}
