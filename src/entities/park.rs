// 🌲 National Park Entity

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
// PARK TYPE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParkType {
    National,
    NatureReserve,
    Marine,
    Geopark,
    WildlifeRefuge,
}

impl ParkType {
    pub const ALL: [ParkType; 5] = [
        ParkType::National,
        ParkType::NatureReserve,
        ParkType::Marine,
        ParkType::Geopark,
        ParkType::WildlifeRefuge,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ParkType::National => "NATIONAL",
            ParkType::NatureReserve => "NATURE_RESERVE",
            ParkType::Marine => "MARINE",
            ParkType::Geopark => "GEOPARK",
            ParkType::WildlifeRefuge => "WILDLIFE_REFUGE",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ParkType::National => "National",
            ParkType::NatureReserve => "Nature Reserve",
            ParkType::Marine => "Marine",
            ParkType::Geopark => "Geopark",
            ParkType::WildlifeRefuge => "Wildlife Refuge",
        }
    }
}

impl fmt::Display for ParkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParkType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ParkType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownVariant::new("park type", s))
    }
}

impl From<ParkType> for FieldValue {
    fn from(value: ParkType) -> Self {
        FieldValue::Text(value.as_str().to_string())
    }
}

// ============================================================================
// PARK ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NationalPark {
    pub id: Option<i64>,
    pub name: String,
    pub area_size: f64,
    pub rating: f64,
    pub park_type: ParkType,
    pub location: Location,
    pub closed: bool,
}

impl NationalPark {
    pub fn new(
        name: String,
        area_size: f64,
        rating: f64,
        park_type: ParkType,
        location: Location,
    ) -> Self {
        NationalPark {
            id: None,
            name,
            area_size,
            rating,
            park_type,
            location,
            closed: false,
        }
    }

    pub fn close(&mut self) {
        self.closed = true;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParkDraft {
    pub name: String,
    pub area_size: f64,
    pub rating: f64,
    pub park_type: ParkType,
    pub location_id: i64,
}

impl ParkDraft {
    pub fn validate(&self) -> crate::error::Result<()> {
        require_finite("area_size", self.area_size)?;
        require_finite("rating", self.rating)
    }
}

impl Filterable for NationalPark {
    fn field(&self, path: &str) -> Option<FieldValue> {
        match path {
            "id" => self.id.map(Into::into),
            "name" => Some(self.name.as_str().into()),
            "area_size" => Some(self.area_size.into()),
            "rating" => Some(self.rating.into()),
            "park_type" => Some(self.park_type.into()),
            "closed" => Some(self.closed.into()),
            "location.id" => self.location.id.map(Into::into),
            "location.name" => Some(self.location.name.as_str().into()),
            _ => None,
        }
    }
}

impl Record for NationalPark {
    const KIND: &'static str = "NationalPark";
    const FIELDS: &'static [&'static str] = &[
        "id",
        "name",
        "area_size",
        "rating",
        "park_type",
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

impl SqlRecord for NationalPark {
    const TABLE: &'static str = "national_parks";
    const PROJECTION: &'static str =
        "t.id, t.name, t.area_size, t.rating, t.park_type, t.closed, l.id, l.name, l.country";
    const SOURCE: &'static str = "national_parks t JOIN locations l ON l.id = t.location_id";
    const COLUMNS: &'static [&'static str] =
        &["name", "area_size", "rating", "park_type", "location_id", "closed"];

    fn column(path: &str) -> Option<&'static str> {
        match path {
            "id" => Some("t.id"),
            "name" => Some("t.name"),
            "area_size" => Some("t.area_size"),
            "rating" => Some("t.rating"),
            "park_type" => Some("t.park_type"),
            "closed" => Some("t.closed"),
            "location.id" => Some("l.id"),
            "location.name" => Some("l.name"),
            _ => None,
        }
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(NationalPark {
            id: Some(row.get(0)?),
            name: row.get(1)?,
            area_size: row.get(2)?,
            rating: row.get(3)?,
            park_type: parsed_column(row, 4)?,
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
            Value::Text(self.park_type.as_str().to_string()),
            self.location.id.map(Value::Integer).unwrap_or(Value::Null),
            Value::Integer(i64::from(self.closed)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_park_type_names() {
        assert_eq!(ParkType::NatureReserve.as_str(), "NATURE_RESERVE");
        assert_eq!("nature_reserve".parse::<ParkType>().unwrap(), ParkType::NatureReserve);
        assert!("CITY".parse::<ParkType>().is_err());
    }

    #[test]
    fn test_serde_uses_stored_names() {
        let json = serde_json::to_string(&ParkType::WildlifeRefuge).unwrap();
        assert_eq!(json, "\"WILDLIFE_REFUGE\"");
    }

    #[test]
    fn test_nested_location_field() {
        let mut location = Location::new("Mavrovo".to_string(), String::new());
        location.id = Some(4);
        let park = NationalPark::new("Mavrovo".to_string(), 731.0, 4.6, ParkType::National, location);

        assert_eq!(park.field("location.id"), Some(FieldValue::Integer(4)));
        assert_eq!(park.field("location.country"), None);
    }
}
