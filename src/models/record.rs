use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// A single column value as seen by the flag layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ColumnValue {
    Null,
    Bool(bool),
    Integer(i64),
    Text(String),
    Timestamp(DateTime<Utc>),
}

impl ColumnValue {
    pub fn is_null(&self) -> bool {
        matches!(self, ColumnValue::Null)
    }

    /// Whether the value compares equal to SQL `TRUE`. Integer columns holding
    /// `1` count, NULL and every other value do not.
    pub fn is_truthy(&self) -> bool {
        self.sql_cmp(&ColumnValue::Bool(true)) == Some(Ordering::Equal)
    }

    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            ColumnValue::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }

    /// Compare two values the way SQL does: any comparison involving NULL is
    /// unknown, booleans and integers compare numerically.
    pub fn sql_cmp(&self, other: &ColumnValue) -> Option<Ordering> {
        match (self, other) {
            (ColumnValue::Null, _) | (_, ColumnValue::Null) => None,
            (ColumnValue::Bool(a), ColumnValue::Bool(b)) => Some(a.cmp(b)),
            (ColumnValue::Integer(a), ColumnValue::Integer(b)) => Some(a.cmp(b)),
            (ColumnValue::Bool(a), ColumnValue::Integer(b)) => Some(i64::from(*a).cmp(b)),
            (ColumnValue::Integer(a), ColumnValue::Bool(b)) => Some(a.cmp(&i64::from(*b))),
            (ColumnValue::Text(a), ColumnValue::Text(b)) => Some(a.cmp(b)),
            (ColumnValue::Timestamp(a), ColumnValue::Timestamp(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Render the value as a SQL literal
    pub fn to_sql_literal(&self) -> String {
        match self {
            ColumnValue::Null => "NULL".to_string(),
            ColumnValue::Bool(b) => b.to_string(),
            ColumnValue::Integer(i) => i.to_string(),
            ColumnValue::Text(s) => format!("'{}'", s.replace('\'', "''")),
            ColumnValue::Timestamp(ts) => format!("'{}'", ts.to_rfc3339()),
        }
    }
}

impl From<bool> for ColumnValue {
    fn from(value: bool) -> Self {
        ColumnValue::Bool(value)
    }
}

impl From<i64> for ColumnValue {
    fn from(value: i64) -> Self {
        ColumnValue::Integer(value)
    }
}

impl From<&str> for ColumnValue {
    fn from(value: &str) -> Self {
        ColumnValue::Text(value.to_string())
    }
}

impl From<String> for ColumnValue {
    fn from(value: String) -> Self {
        ColumnValue::Text(value)
    }
}

impl From<DateTime<Utc>> for ColumnValue {
    fn from(value: DateTime<Utc>) -> Self {
        ColumnValue::Timestamp(value)
    }
}

impl<T: Into<ColumnValue>> From<Option<T>> for ColumnValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ColumnValue::Null, Into::into)
    }
}

/// Primary key column name
pub const PRIMARY_KEY: &str = "id";

/// A loaded row: primary key plus column values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: i64,
    pub attributes: BTreeMap<String, ColumnValue>,
}

impl Record {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            attributes: BTreeMap::new(),
        }
    }

    /// Builder-style attribute setter
    pub fn with(mut self, column: &str, value: impl Into<ColumnValue>) -> Self {
        self.set(column, value);
        self
    }

    pub fn get(&self, column: &str) -> Option<&ColumnValue> {
        self.attributes.get(column)
    }

    /// Column value with missing columns read as NULL
    pub fn value(&self, column: &str) -> &ColumnValue {
        self.attributes.get(column).unwrap_or(&ColumnValue::Null)
    }

    /// Column value as a query sees it, with `id` read from the primary key
    pub fn column(&self, column: &str) -> Cow<'_, ColumnValue> {
        if column == PRIMARY_KEY {
            Cow::Owned(ColumnValue::Integer(self.id))
        } else {
            Cow::Borrowed(self.value(column))
        }
    }

    pub fn set(&mut self, column: &str, value: impl Into<ColumnValue>) {
        self.attributes.insert(column.to_string(), value.into());
    }
}
