use super::{Assignment, Condition, WhereClause};
use crate::models::{ColumnValue, Record};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

/// Query against a single table, built up by flag scopes
///
/// Conditions added by a scope carry that scope's tag. Removing a scope drops
/// its conditions and remembers the removal, so a default scope applied later
/// in the build stays off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordQuery {
    table: String,
    where_clauses: Vec<WhereClause>,
    removed_scopes: BTreeSet<String>,
    order_by: Vec<(String, Direction)>,
    limit: Option<u32>,
}

impl RecordQuery {
    /// Create a new query for the given table
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            where_clauses: Vec::new(),
            removed_scopes: BTreeSet::new(),
            order_by: Vec::new(),
            limit: None,
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn where_clauses(&self) -> &[WhereClause] {
        &self.where_clauses
    }

    pub fn order_by_columns(&self) -> &[(String, Direction)] {
        &self.order_by
    }

    pub fn limit_value(&self) -> Option<u32> {
        self.limit
    }

    /// Add an untagged condition
    pub fn where_condition(mut self, condition: Condition) -> Self {
        self.where_clauses.push(WhereClause::new(condition));
        self
    }

    pub fn where_eq(self, field: &str, value: impl Into<ColumnValue>) -> Self {
        self.where_condition(Condition::eq(field, value))
    }

    pub fn where_null(self, field: &str) -> Self {
        self.where_condition(Condition::is_null(field))
    }

    pub fn where_not_null(self, field: &str) -> Self {
        self.where_condition(Condition::is_not_null(field))
    }

    /// Add a condition owned by `scope`. Ignored when the scope was removed
    /// from this query or is already present.
    pub fn with_scope(mut self, scope: &str, condition: Condition) -> Self {
        if self.is_scope_removed(scope) || self.has_scope(scope) {
            return self;
        }
        self.where_clauses
            .push(WhereClause::scoped(scope, condition));
        self
    }

    /// Drop every condition owned by `scope` and block it from being re-added
    pub fn without_scope(mut self, scope: &str) -> Self {
        self.where_clauses.retain(|clause| !clause.belongs_to(scope));
        self.removed_scopes.insert(scope.to_string());
        self
    }

    pub fn has_scope(&self, scope: &str) -> bool {
        self.where_clauses.iter().any(|clause| clause.belongs_to(scope))
    }

    pub fn is_scope_removed(&self, scope: &str) -> bool {
        self.removed_scopes.contains(scope)
    }

    pub fn order_asc(mut self, field: &str) -> Self {
        self.order_by.push((field.to_string(), Direction::Asc));
        self
    }

    pub fn order_desc(mut self, field: &str) -> Self {
        self.order_by.push((field.to_string(), Direction::Desc));
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// True when the record satisfies every WHERE clause
    pub fn matches(&self, record: &Record) -> bool {
        self.where_clauses
            .iter()
            .all(|clause| clause.condition.matches(record))
    }

    fn where_sql(&self) -> String {
        if self.where_clauses.is_empty() {
            return String::new();
        }
        let parts: Vec<String> = self.where_clauses.iter().map(WhereClause::to_sql).collect();
        format!(" WHERE {}", parts.join(" AND "))
    }

    /// Build the SELECT statement
    pub fn build_sql(&self) -> String {
        let mut sql = format!("SELECT * FROM {}", self.table);
        sql.push_str(&self.where_sql());

        if !self.order_by.is_empty() {
            let order: Vec<String> = self
                .order_by
                .iter()
                .map(|(field, direction)| format!("{field} {}", direction.as_sql()))
                .collect();
            sql.push_str(&format!(" ORDER BY {}", order.join(", ")));
        }

        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }

        sql
    }

    /// Build the COUNT statement (ordering and limit do not apply)
    pub fn build_count_sql(&self) -> String {
        format!("SELECT COUNT(*) FROM {}{}", self.table, self.where_sql())
    }

    /// Build the UPDATE statement for the given assignments
    pub fn build_update_sql(&self, assignments: &[Assignment]) -> String {
        let sets: Vec<String> = assignments.iter().map(Assignment::to_sql).collect();
        format!(
            "UPDATE {} SET {}{}",
            self.table,
            sets.join(", "),
            self.where_sql()
        )
    }
}
