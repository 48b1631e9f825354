// 💸 Expense Entity
//
// An expense is active until `date_created + days_to_expire`; extending it
// adds a day to the countdown. There is no stored status flag.

use super::{parsed_column, require_finite, Vendor};
use crate::error::UnknownVariant;
use crate::filter::{FieldValue, Filterable};
use crate::store::{Record, SqlRecord};
use chrono::{Duration, NaiveDate};
use rusqlite::types::Value;
use rusqlite::Row;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// EXPENSE CATEGORY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpenseCategory {
    Office,
    Travel,
    Utilities,
    Supplies,
    Marketing,
    Software,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 6] = [
        ExpenseCategory::Office,
        ExpenseCategory::Travel,
        ExpenseCategory::Utilities,
        ExpenseCategory::Supplies,
        ExpenseCategory::Marketing,
        ExpenseCategory::Software,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseCategory::Office => "OFFICE",
            ExpenseCategory::Travel => "TRAVEL",
            ExpenseCategory::Utilities => "UTILITIES",
            ExpenseCategory::Supplies => "SUPPLIES",
            ExpenseCategory::Marketing => "MARKETING",
            ExpenseCategory::Software => "SOFTWARE",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExpenseCategory::Office => "Office",
            ExpenseCategory::Travel => "Travel",
            ExpenseCategory::Utilities => "Utilities",
            ExpenseCategory::Supplies => "Supplies",
            ExpenseCategory::Marketing => "Marketing",
            ExpenseCategory::Software => "Software",
        }
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExpenseCategory {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ExpenseCategory::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownVariant::new("expense category", s))
    }
}

impl From<ExpenseCategory> for FieldValue {
    fn from(value: ExpenseCategory) -> Self {
        FieldValue::Text(value.as_str().to_string())
    }
}

// ============================================================================
// EXPENSE ENTITY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: Option<i64>,
    pub title: String,
    pub date_created: NaiveDate,
    pub amount: f64,
    pub days_to_expire: i32,
    pub expense_category: ExpenseCategory,
    pub vendor: Vendor,
}

impl Expense {
    pub fn new(
        title: String,
        date_created: NaiveDate,
        amount: f64,
        days_to_expire: i32,
        expense_category: ExpenseCategory,
        vendor: Vendor,
    ) -> Self {
        Expense {
            id: None,
            title,
            date_created,
            amount,
            days_to_expire,
            expense_category,
            vendor,
        }
    }

    /// Last day the expense is still active.
    pub fn expires_on(&self) -> NaiveDate {
        self.date_created
            .checked_add_signed(Duration::days(i64::from(self.days_to_expire)))
            .unwrap_or(NaiveDate::MAX)
    }

    pub fn is_expired(&self, today: NaiveDate) -> bool {
        today > self.expires_on()
    }

    /// Push expiry back by one day.
    pub fn extend(&mut self) {
        self.days_to_expire = self.days_to_expire.saturating_add(1);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseDraft {
    pub title: String,
    pub date_created: NaiveDate,
    pub amount: f64,
    pub days_to_expire: i32,
    pub expense_category: ExpenseCategory,
    /// Vendor id
    pub vendor: i64,
}

impl ExpenseDraft {
    pub fn validate(&self) -> crate::error::Result<()> {
        require_finite("amount", self.amount)
    }
}

impl Filterable for Expense {
    fn field(&self, path: &str) -> Option<FieldValue> {
        match path {
            "id" => self.id.map(Into::into),
            "title" => Some(self.title.as_str().into()),
            "date_created" => Some(self.date_created.into()),
            "amount" => Some(self.amount.into()),
            "days_to_expire" => Some(self.days_to_expire.into()),
            "expense_category" => Some(self.expense_category.into()),
            "vendor.id" => self.vendor.id.map(Into::into),
            "vendor.name" => Some(self.vendor.name.as_str().into()),
            _ => None,
        }
    }
}

impl Record for Expense {
    const KIND: &'static str = "Expense";
    const FIELDS: &'static [&'static str] = &[
        "id",
        "title",
        "date_created",
        "amount",
        "days_to_expire",
        "expense_category",
        "vendor.id",
        "vendor.name",
    ];

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }
}

impl SqlRecord for Expense {
    const TABLE: &'static str = "expenses";
    const PROJECTION: &'static str =
        "t.id, t.title, t.date_created, t.amount, t.days_to_expire, t.category, v.id, v.name";
    const SOURCE: &'static str = "expenses t JOIN vendors v ON v.id = t.vendor_id";
    const COLUMNS: &'static [&'static str] =
        &["title", "date_created", "amount", "days_to_expire", "category", "vendor_id"];

    fn column(path: &str) -> Option<&'static str> {
        match path {
            "id" => Some("t.id"),
            "title" => Some("t.title"),
            "date_created" => Some("t.date_created"),
            "amount" => Some("t.amount"),
            "days_to_expire" => Some("t.days_to_expire"),
            "expense_category" => Some("t.category"),
            "vendor.id" => Some("v.id"),
            "vendor.name" => Some("v.name"),
            _ => None,
        }
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Expense {
            id: Some(row.get(0)?),
            title: row.get(1)?,
            date_created: parsed_column(row, 2)?,
            amount: row.get(3)?,
            days_to_expire: row.get(4)?,
            expense_category: parsed_column(row, 5)?,
            vendor: Vendor {
                id: Some(row.get(6)?),
                name: row.get(7)?,
            },
        })
    }

    fn values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.title.clone()),
            Value::Text(self.date_created.format("%Y-%m-%d").to_string()),
            Value::Real(self.amount),
            Value::Integer(i64::from(self.days_to_expire)),
            Value::Text(self.expense_category.as_str().to_string()),
            self.vendor.id.map(Value::Integer).unwrap_or(Value::Null),
        ]
    }
}
