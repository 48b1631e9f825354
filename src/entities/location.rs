// 📍 Location - lookup record referenced by sites and parks

use crate::filter::{FieldValue, Filterable};
use crate::store::{Record, SqlRecord};
use rusqlite::types::Value;
use rusqlite::Row;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: Option<i64>,
    pub name: String,

    /// Country name, may be empty
    #[serde(default)]
    pub country: String,
}

impl Location {
    pub fn new(name: String, country: String) -> Self {
        Location {
            id: None,
            name,
            country,
        }
    }

    /// "Name, Country", or just the name when no country is known.
    pub fn display_name(&self) -> String {
        if self.country.is_empty() {
            self.name.clone()
        } else {
            format!("{}, {}", self.name, self.country)
        }
    }
}

impl Filterable for Location {
    fn field(&self, path: &str) -> Option<FieldValue> {
        match path {
            "id" => self.id.map(Into::into),
            "name" => Some(self.name.as_str().into()),
            "country" => Some(self.country.as_str().into()),
            _ => None,
        }
    }
}

impl Record for Location {
    const KIND: &'static str = "Location";
    const FIELDS: &'static [&'static str] = &["id", "name", "country"];

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }
}

impl SqlRecord for Location {
    const TABLE: &'static str = "locations";
    const PROJECTION: &'static str = "t.id, t.name, t.country";
    const SOURCE: &'static str = "locations t";
    const COLUMNS: &'static [&'static str] = &["name", "country"];

    fn column(path: &str) -> Option<&'static str> {
        match path {
            "id" => Some("t.id"),
            "name" => Some("t.name"),
            "country" => Some("t.country"),
            _ => None,
        }
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Location {
            id: Some(row.get(0)?),
            name: row.get(1)?,
            country: row.get(2)?,
        })
    }

    fn values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.name.clone()),
            Value::Text(self.country.clone()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name() {
        let ohrid = Location::new("Ohrid".to_string(), "North Macedonia".to_string());
        assert_eq!(ohrid.display_name(), "Ohrid, North Macedonia");

        let bare = Location::new("Ohrid".to_string(), String::new());
        assert_eq!(bare.display_name(), "Ohrid");
    }

    #[test]
    fn test_unsaved_location_has_no_id_field() {
        let ohrid = Location::new("Ohrid".to_string(), String::new());
        assert_eq!(ohrid.field("id"), None);
        assert_eq!(ohrid.field("name"), Some(FieldValue::Text("Ohrid".to_string())));
    }
}
