// 🏪 Vendor - lookup record referenced by expenses

use crate::filter::{FieldValue, Filterable};
use crate::store::{Record, SqlRecord};
use rusqlite::types::Value;
use rusqlite::Row;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vendor {
    pub id: Option<i64>,
    pub name: String,
}

impl Vendor {
    pub fn new(name: String) -> Self {
        Vendor { id: None, name }
    }
}

impl Filterable for Vendor {
    fn field(&self, path: &str) -> Option<FieldValue> {
        match path {
            "id" => self.id.map(Into::into),
            "name" => Some(self.name.as_str().into()),
            _ => None,
        }
    }
}

impl Record for Vendor {
    const KIND: &'static str = "Vendor";
    const FIELDS: &'static [&'static str] = &["id", "name"];

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }
}

impl SqlRecord for Vendor {
    const TABLE: &'static str = "vendors";
    const PROJECTION: &'static str = "t.id, t.name";
    const SOURCE: &'static str = "vendors t";
    const COLUMNS: &'static [&'static str] = &["name"];

    fn column(path: &str) -> Option<&'static str> {
        match path {
            "id" => Some("t.id"),
            "name" => Some("t.name"),
            _ => None,
        }
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Vendor {
            id: Some(row.get(0)?),
            name: row.get(1)?,
        })
    }

    fn values(&self) -> Vec<Value> {
        vec![Value::Text(self.name.clone())]
    }
}
