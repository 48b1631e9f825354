// 🏛️ Archaeological Site Entity
//
// Open sites can be closed; closing is one-way and keeps the record.

use super::{parsed_column, require_finite, Location};
use crate::error::UnknownVariant;
use crate::filter::{FieldValue, Filterable};
use crate::store::{Record, SqlRecord};
use rusqlite::types::Value;
use rusqlite::Row;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// HISTORICAL PERIOD
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HistoricalPeriod {
    Prehistoric,
    Ancient,
    Classical,
    Byzantine,
    Medieval,
    Ottoman,
    Modern,
}

impl HistoricalPeriod {
    pub const ALL: [HistoricalPeriod; 7] = [
        HistoricalPeriod::Prehistoric,
        HistoricalPeriod::Ancient,
        HistoricalPeriod::Classical,
        HistoricalPeriod::Byzantine,
        HistoricalPeriod::Medieval,
        HistoricalPeriod::Ottoman,
        HistoricalPeriod::Modern,
    ];

    /// Stored / submitted name
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoricalPeriod::Prehistoric => "PREHISTORIC",
            HistoricalPeriod::Ancient => "ANCIENT",
            HistoricalPeriod::Classical => "CLASSICAL",
            HistoricalPeriod::Byzantine => "BYZANTINE",
            HistoricalPeriod::Medieval => "MEDIEVAL",
            HistoricalPeriod::Ottoman => "OTTOMAN",
            HistoricalPeriod::Modern => "MODERN",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HistoricalPeriod::Prehistoric => "Prehistoric",
            HistoricalPeriod::Ancient => "Ancient",
            HistoricalPeriod::Classical => "Classical",
            HistoricalPeriod::Byzantine => "Byzantine",
            HistoricalPeriod::Medieval => "Medieval",
            HistoricalPeriod::Ottoman => "Ottoman",
            HistoricalPeriod::Modern => "Modern",
        }
    }
}

impl fmt::Display for HistoricalPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HistoricalPeriod {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        HistoricalPeriod::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownVariant::new("historical period", s))
    }
}

impl From<HistoricalPeriod> for FieldValue {
    fn from(value: HistoricalPeriod) -> Self {
        FieldValue::Text(value.as_str().to_string())
    }
}

// ============================================================================
// SITE ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchaeologicalSite {
    pub id: Option<i64>,
    pub name: String,

    /// Area in hectares
    pub area_size: f64,

    pub rating: f64,
    pub period: HistoricalPeriod,
    pub location: Location,
    pub closed: bool,
}

impl ArchaeologicalSite {
    /// New open site (not yet stored)
    pub fn new(
        name: String,
        area_size: f64,
        rating: f64,
        period: HistoricalPeriod,
        location: Location,
    ) -> Self {
        ArchaeologicalSite {
            id: None,
            name,
            area_size,
            rating,
            period,
            location,
            closed: false,
        }
    }

    pub fn close(&mut self) {
        self.closed = true;
    }
}

/// Every user-editable field of a site; the location is given by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteDraft {
    pub name: String,
    pub area_size: f64,
    pub rating: f64,
    pub period: HistoricalPeriod,
    pub location_id: i64,
}

impl SiteDraft {
    pub fn validate(&self) -> crate::error::Result<()> {
        require_finite("area_size", self.area_size)?;
        require_finite("rating", self.rating)
    }
}

impl Filterable for ArchaeologicalSite {
    fn field(&self, path: &str) -> Option<FieldValue> {
        match path {
            "id" => self.id.map(Into::into),
            "name" => Some(self.name.as_str().into()),
            "area_size" => Some(self.area_size.into()),
            "rating" => Some(self.rating.into()),
            "period" => Some(self.period.into()),
            "closed" => Some(self.closed.into()),
            "location.id" => self.location.id.map(Into::into),
            "location.name" => Some(self.location.name.as_str().into()),
            _ => None,
        }
    }
}

impl Record for ArchaeologicalSite {
    const KIND: &'static str = "ArchaeologicalSite";
    const FIELDS: &'static [&'static str] = &[
        "id",
        "name",
        "area_size",
        "rating",
        "period",
        "closed",
        "location.id",
        "location.name",
    ];

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }
}

impl SqlRecord for ArchaeologicalSite {
    const TABLE: &'static str = "archaeological_sites";
    const PROJECTION: &'static str =
        "t.id, t.name, t.area_size, t.rating, t.period, t.closed, l.id, l.name, l.country";
    const SOURCE: &'static str = "archaeological_sites t JOIN locations l ON l.id = t.location_id";
    const COLUMNS: &'static [&'static str] =
        &["name", "area_size", "rating", "period", "location_id", "closed"];

    fn column(path: &str) -> Option<&'static str> {
        match path {
            "id" => Some("t.id"),
            "name" => Some("t.name"),
            "area_size" => Some("t.area_size"),
            "rating" => Some("t.rating"),
            "period" => Some("t.period"),
            "closed" => Some("t.closed"),
            "location.id" => Some("l.id"),
            "location.name" => Some("l.name"),
            _ => None,
        }
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(ArchaeologicalSite {
            id: Some(row.get(0)?),
            name: row.get(1)?,
            area_size: row.get(2)?,
            rating: row.get(3)?,
            period: parsed_column(row, 4)?,
            closed: row.get(5)?,
            location: Location {
                id: Some(row.get(6)?),
                name: row.get(7)?,
                country: row.get(8)?,
            },
        })
    }

    fn values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.name.clone()),
            Value::Real(self.area_size),
            Value::Real(self.rating),
            Value::Text(self.period.as_str().to_string()),
            self.location.id.map(Value::Integer).unwrap_or(Value::Null),
            Value::Integer(i64::from(self.closed)),
        ]
    }
}

// ============================================================================
// TESTS
// ============================================================================
