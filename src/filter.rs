// 🔎 Filter Predicates - Criteria as Data
// Optional (field, operator, value) criteria composed into one AND predicate.
//
// A criterion whose value is absent is dropped, so an unset filter parameter
// never narrows the result. The same predicate is evaluated in memory
// (`Filterable`) or rendered to SQL by the SQLite store.

use crate::error::{CatalogError, Result, UnknownVariant};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

// ============================================================================
// FIELD VALUES
// ============================================================================

/// A scalar read from an entity field or supplied as a filter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Integer(i64),
    Flag(bool),
    Date(NaiveDate),
}

impl FieldValue {
    /// Blank text counts as "not supplied", like an empty form input.
    pub fn is_present(&self) -> bool {
        match self {
            FieldValue::Text(s) => !s.trim().is_empty(),
            _ => true,
        }
    }

    /// Order two values of compatible kinds. Integers and numbers compare
    /// numerically; mismatched kinds are incomparable.
    pub fn compare(&self, other: &FieldValue) -> Option<Ordering> {
        match (self, other) {
            (FieldValue::Text(a), FieldValue::Text(b)) => Some(a.cmp(b)),
            (FieldValue::Integer(a), FieldValue::Integer(b)) => Some(a.cmp(b)),
            (FieldValue::Flag(a), FieldValue::Flag(b)) => Some(a.cmp(b)),
            (FieldValue::Date(a), FieldValue::Date(b)) => Some(a.cmp(b)),
            (FieldValue::Number(a), FieldValue::Number(b)) => a.partial_cmp(b),
            (FieldValue::Integer(a), FieldValue::Number(b)) => (*a as f64).partial_cmp(b),
            (FieldValue::Number(a), FieldValue::Integer(b)) => a.partial_cmp(&(*b as f64)),
            _ => None,
        }
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<&String> for FieldValue {
    fn from(value: &String) -> Self {
        FieldValue::Text(value.clone())
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Integer(i64::from(value))
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Flag(value)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(value: NaiveDate) -> Self {
        FieldValue::Date(value)
    }
}

// ============================================================================
// OPERATORS
// ============================================================================

/// Case handling for substring filters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextMatch {
    #[default]
    Sensitive,
    Insensitive,
}

impl FromStr for TextMatch {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sensitive" | "case-sensitive" => Ok(TextMatch::Sensitive),
            "insensitive" | "case-insensitive" => Ok(TextMatch::Insensitive),
            _ => Err(UnknownVariant::new("text match", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// Field text contains the value as a substring
    Contains(TextMatch),

    /// Field is strictly greater than the value
    GreaterThan,

    /// Field equals the value
    Equals,
}

// ============================================================================
// CRITERIA
// ============================================================================

/// One optional filter criterion. `value == None` means "not filtered".
#[derive(Debug, Clone, PartialEq)]
pub struct Criterion {
    pub path: &'static str,
    pub operator: Operator,
    pub value: Option<FieldValue>,
}

impl Criterion {
    pub fn new<V: Into<FieldValue>>(path: &'static str, operator: Operator, value: Option<V>) -> Self {
        let value = value.map(Into::into).filter(FieldValue::is_present);
        Criterion { path, operator, value }
    }

    pub fn contains<V: Into<FieldValue>>(path: &'static str, value: Option<V>) -> Self {
        Self::new(path, Operator::Contains(TextMatch::Sensitive), value)
    }

    pub fn contains_with<V: Into<FieldValue>>(
        path: &'static str,
        value: Option<V>,
        text_match: TextMatch,
    ) -> Self {
        Self::new(path, Operator::Contains(text_match), value)
    }

    pub fn greater_than<V: Into<FieldValue>>(path: &'static str, value: Option<V>) -> Self {
        Self::new(path, Operator::GreaterThan, value)
    }

    pub fn equals<V: Into<FieldValue>>(path: &'static str, value: Option<V>) -> Self {
        Self::new(path, Operator::Equals, value)
    }
}

/// A criterion that survived composition: its value is always present.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub path: &'static str,
    pub operator: Operator,
    pub value: FieldValue,
}

impl Condition {
    /// Test the entity's field value against this condition.
    pub fn test(&self, actual: Option<&FieldValue>) -> bool {
        let Some(actual) = actual else {
            return false;
        };

        match self.operator {
            Operator::Contains(text_match) => match (actual, &self.value) {
                (FieldValue::Text(haystack), FieldValue::Text(needle)) => match text_match {
                    TextMatch::Sensitive => haystack.contains(needle.as_str()),
                    TextMatch::Insensitive => haystack
                        .to_lowercase()
                        .contains(&needle.to_lowercase()),
                },
                _ => false,
            },
            Operator::GreaterThan => actual.compare(&self.value) == Some(Ordering::Greater),
            Operator::Equals => actual.compare(&self.value) == Some(Ordering::Equal),
        }
    }
}

// ============================================================================
// PREDICATE
// ============================================================================

/// Implemented by entities so predicates can read their fields by path.
///
/// Paths are the entity's own field names (`name`, `area_size`) or one
/// relation hop (`location.id`). Unknown paths return `None`.
pub trait Filterable {
    fn field(&self, path: &str) -> Option<FieldValue>;
}

/// Logical AND of every present criterion. An empty predicate matches all.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Predicate {
    conditions: Vec<Condition>,
}

impl Predicate {
    /// Predicate matching every record.
    pub fn always() -> Self {
        Predicate::default()
    }

    /// Combine criteria, skipping those without a value.
    pub fn all_of<I>(criteria: I) -> Self
    where
        I: IntoIterator<Item = Criterion>,
    {
        let conditions = criteria
            .into_iter()
            .filter_map(|c| {
                c.value.map(|value| Condition {
                    path: c.path,
                    operator: c.operator,
                    value,
                })
            })
            .collect();

        Predicate { conditions }
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn is_always(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Reject conditions on paths outside `fields`.
    pub fn validate(&self, fields: &[&str]) -> Result<()> {
        match self.conditions.iter().find(|c| !fields.contains(&c.path)) {
            Some(c) => Err(CatalogError::UnknownField(c.path.to_string())),
            None => Ok(()),
        }
    }

    pub fn matches<E: Filterable>(&self, entity: &E) -> bool {
        self.conditions
            .iter()
            .all(|c| c.test(entity.field(c.path).as_ref()))
    }
}

// ============================================================================
// TESTS
// ============================================================================
