use crate::models::{ColumnValue, Record};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Comparison operators supported in flag predicates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    Eq,
    NotEq,
    Lt,
    Lte,
    Gt,
    Gte,
}

impl Operator {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::NotEq => "<>",
            Operator::Lt => "<",
            Operator::Lte => "<=",
            Operator::Gt => ">",
            Operator::Gte => ">=",
        }
    }

    fn accepts(&self, ordering: Ordering) -> bool {
        match self {
            Operator::Eq => ordering == Ordering::Equal,
            Operator::NotEq => ordering != Ordering::Equal,
            Operator::Lt => ordering == Ordering::Less,
            Operator::Lte => ordering != Ordering::Greater,
            Operator::Gt => ordering == Ordering::Greater,
            Operator::Gte => ordering != Ordering::Less,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Represents the SQL conditions a flag scope can produce
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Condition {
    Compare {
        field: String,
        operator: Operator,
        value: ColumnValue,
    },
    IsNull {
        field: String,
    },
    IsNotNull {
        field: String,
    },
    /// False or NULL, so a missing boolean reads as off
    IsNotTrue {
        field: String,
    },
}

impl Condition {
    pub fn eq(field: &str, value: impl Into<ColumnValue>) -> Self {
        Condition::Compare {
            field: field.to_string(),
            operator: Operator::Eq,
            value: value.into(),
        }
    }

    pub fn compare(field: &str, operator: Operator, value: impl Into<ColumnValue>) -> Self {
        Condition::Compare {
            field: field.to_string(),
            operator,
            value: value.into(),
        }
    }

    pub fn is_null(field: &str) -> Self {
        Condition::IsNull {
            field: field.to_string(),
        }
    }

    pub fn is_not_null(field: &str) -> Self {
        Condition::IsNotNull {
            field: field.to_string(),
        }
    }

    pub fn is_not_true(field: &str) -> Self {
        Condition::IsNotTrue {
            field: field.to_string(),
        }
    }

    pub fn field(&self) -> &str {
        match self {
            Condition::Compare { field, .. }
            | Condition::IsNull { field }
            | Condition::IsNotNull { field }
            | Condition::IsNotTrue { field } => field,
        }
    }

    /// Convert condition to SQL string
    pub fn to_sql(&self) -> String {
        match self {
            Condition::Compare {
                field,
                operator,
                value,
            } => format!("{field} {operator} {}", value.to_sql_literal()),
            Condition::IsNull { field } => format!("{field} IS NULL"),
            Condition::IsNotNull { field } => format!("{field} IS NOT NULL"),
            Condition::IsNotTrue { field } => format!("{field} IS NOT TRUE"),
        }
    }

    /// Evaluate the condition against a loaded record with SQL NULL semantics
    pub fn matches(&self, record: &Record) -> bool {
        match self {
            Condition::Compare {
                field,
                operator,
                value,
            } => record
                .column(field)
                .sql_cmp(value)
                .is_some_and(|ordering| operator.accepts(ordering)),
            Condition::IsNull { field } => record.column(field).is_null(),
            Condition::IsNotNull { field } => !record.column(field).is_null(),
            Condition::IsNotTrue { field } => !record.column(field).is_truthy(),
        }
    }
}

/// A WHERE clause, optionally tagged with the scope that added it so the
/// scope can later be removed from the query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhereClause {
    pub condition: Condition,
    pub scope: Option<String>,
}

impl WhereClause {
    pub fn new(condition: Condition) -> Self {
        Self {
            condition,
            scope: None,
        }
    }

    pub fn scoped(scope: &str, condition: Condition) -> Self {
        Self {
            condition,
            scope: Some(scope.to_string()),
        }
    }

    pub fn belongs_to(&self, scope: &str) -> bool {
        self.scope.as_deref() == Some(scope)
    }

    pub fn to_sql(&self) -> String {
        self.condition.to_sql()
    }
}

/// Column write issued by an update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub column: String,
    pub value: ColumnValue,
}

impl Assignment {
    pub fn new(column: &str, value: impl Into<ColumnValue>) -> Self {
        Self {
            column: column.to_string(),
            value: value.into(),
        }
    }

    pub fn to_sql(&self) -> String {
        format!("{} = {}", self.column, self.value.to_sql_literal())
    }
}
