//! In-process record store.
//!
//! Tables are ordered maps keyed by primary key, so result order is stable.
//! Queries are evaluated with [`RecordQuery::matches`].

use super::RecordStore;
use crate::models::{ColumnValue, Record};
use crate::query_builder::{Assignment, Direction, RecordQuery};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemoryStoreError {
    #[error("Record {id} not found in table '{table}'")]
    RecordNotFound { table: String, id: i64 },
}

#[derive(Debug, Default)]
struct Table {
    rows: BTreeMap<i64, Record>,
    next_id: i64,
}

/// Thread-safe in-memory store
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<String, Table>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a row, assigning the next primary key. Any `id` on the given
    /// record is replaced.
    pub fn insert(&self, table: &str, mut record: Record) -> Record {
        let mut tables = self.tables.write();
        let table = tables.entry(table.to_string()).or_default();
        table.next_id += 1;
        record.id = table.next_id;
        table.rows.insert(record.id, record.clone());
        record
    }

    /// Number of rows in the table, ignoring every filter
    pub fn len(&self, table: &str) -> usize {
        self.tables
            .read()
            .get(table)
            .map_or(0, |table| table.rows.len())
    }

    pub fn is_empty(&self, table: &str) -> bool {
        self.len(table) == 0
    }

    fn select(&self, query: &RecordQuery) -> Vec<Record> {
        let tables = self.tables.read();
        let Some(table) = tables.get(query.table()) else {
            return Vec::new();
        };

        let mut rows: Vec<Record> = table
            .rows
            .values()
            .filter(|record| query.matches(record))
            .cloned()
            .collect();

        for (column, direction) in query.order_by_columns().iter().rev() {
            rows.sort_by(|a, b| {
                let ordering = compare_for_sort(&a.column(column), &b.column(column));
                match direction {
                    Direction::Asc => ordering,
                    Direction::Desc => ordering.reverse(),
                }
            });
        }

        if let Some(limit) = query.limit_value() {
            rows.truncate(limit as usize);
        }
        rows
    }
}

/// NULLs sort last, like PostgreSQL ascending order
fn compare_for_sort(a: &ColumnValue, b: &ColumnValue) -> Ordering {
    match (a.is_null(), b.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.sql_cmp(b).unwrap_or(Ordering::Equal),
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    type Error = MemoryStoreError;

    async fn fetch_all(&self, query: &RecordQuery) -> Result<Vec<Record>, Self::Error> {
        Ok(self.select(query))
    }

    async fn count(&self, query: &RecordQuery) -> Result<i64, Self::Error> {
        let tables = self.tables.read();
        let count = tables.get(query.table()).map_or(0, |table| {
            table
                .rows
                .values()
                .filter(|record| query.matches(record))
                .count()
        });
        Ok(count as i64)
    }

    async fn update(
        &self,
        query: &RecordQuery,
        assignments: &[Assignment],
    ) -> Result<u64, Self::Error> {
        let mut tables = self.tables.write();
        let Some(table) = tables.get_mut(query.table()) else {
            return Ok(0);
        };

        let mut affected = 0;
        for record in table.rows.values_mut() {
            if query.matches(record) {
                for assignment in assignments {
                    record.set(&assignment.column, assignment.value.clone());
                }
                affected += 1;
            }
        }

        debug!(table = %query.table(), affected, "memory store update");
        Ok(affected)
    }

    async fn find(&self, table: &str, id: i64) -> Result<Option<Record>, Self::Error> {
        Ok(self
            .tables
            .read()
            .get(table)
            .and_then(|table| table.rows.get(&id).cloned()))
    }

    async fn refresh(&self, table: &str, record: &mut Record) -> Result<(), Self::Error> {
        match self.find(table, record.id).await? {
            Some(fresh) => {
                *record = fresh;
                Ok(())
            }
            None => Err(MemoryStoreError::RecordNotFound {
                table: table.to_string(),
                id: record.id,
            }),
        }
    }

    async fn save(&self, table: &str, record: &Record) -> Result<(), Self::Error> {
        let mut tables = self.tables.write();
        let stored = tables
            .get_mut(table)
            .and_then(|rows| rows.rows.get_mut(&record.id))
            .ok_or_else(|| MemoryStoreError::RecordNotFound {
                table: table.to_string(),
                id: record.id,
            })?;
        *stored = record.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        store.insert("posts", Record::new(0).with("rank", 3_i64).with("is_active", true));
        store.insert("posts", Record::new(0).with("rank", 1_i64).with("is_active", false));
        store.insert("posts", Record::new(0).with("is_active", true));
        store
    }

    #[tokio::test]
    async fn test_insert_assigns_ids() {
        let store = seeded();
        let rows = store.fetch_all(&RecordQuery::new("posts")).await.unwrap();
        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(store.len("posts"), 3);
        assert!(store.is_empty("comments"));
    }

    #[tokio::test]
    async fn test_filter_order_and_limit() {
        let store = seeded();

        let query = RecordQuery::new("posts").where_eq("is_active", true);
        assert_eq!(store.count(&query).await.unwrap(), 2);

        let query = RecordQuery::new("posts").order_asc("rank").limit(2);
        let ids: Vec<i64> = store
            .fetch_all(&query)
            .await
            .unwrap()
            .iter()
            .map(|r| r.id)
            .collect();
        // NULL rank sorts last
        assert_eq!(ids, vec![2, 1]);
    }

    #[tokio::test]
    async fn test_update_only_touches_matching_rows() {
        let store = seeded();
        let query = RecordQuery::new("posts").where_eq("is_active", false);
        let affected = store
            .update(&query, &[Assignment::new("is_active", true)])
            .await
            .unwrap();
        assert_eq!(affected, 1);

        let active = RecordQuery::new("posts").where_eq("is_active", true);
        assert_eq!(store.count(&active).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_save_and_refresh() {
        let store = seeded();
        let mut record = store.find("posts", 1).await.unwrap().unwrap();
        record.set("is_active", false);
        store.save("posts", &record).await.unwrap();

        let mut stale = Record::new(1);
        store.refresh("posts", &mut stale).await.unwrap();
        assert_eq!(stale.value("is_active"), &ColumnValue::Bool(false));
    }

    #[tokio::test]
    async fn test_missing_record_errors() {
        let store = seeded();
        let err = store.save("posts", &Record::new(99)).await.unwrap_err();
        assert_eq!(
            err,
            MemoryStoreError::RecordNotFound {
                table: "posts".to_string(),
                id: 99
            }
        );
        assert!(store.find("posts", 99).await.unwrap().is_none());
    }
}
