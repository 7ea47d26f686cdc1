//! # Model Scopes
//!
//! [`ModelQuery`] is the query-building stage for a flagged model. Creating one
//! applies the default filter of every flag attached to the model; the chained
//! modifiers then widen, narrow or invert individual flags.

use super::common::ScopeBuilder;
use crate::error::{FlagError, Result};
use crate::events::FlagState;
use crate::flag::{FlagDefinition, FlagOperation, FlagScope};
use crate::models::{ColumnValue, ModelDescriptor, Record};
use crate::query_builder::RecordQuery;
use crate::store::RecordStore;
use std::future::Future;

/// Query builder for a flagged model
#[derive(Debug, Clone)]
pub struct ModelQuery<'a> {
    model: &'a ModelDescriptor,
    query: RecordQuery,
}

impl ModelDescriptor {
    /// Start building a scoped query
    pub fn scope(&self) -> ModelQuery<'_> {
        ModelQuery::new(self)
    }
}

impl<'a> ModelQuery<'a> {
    pub fn new(model: &'a ModelDescriptor) -> Self {
        let query = model
            .flags
            .iter()
            .fold(RecordQuery::new(&model.table), |query, flag| {
                FlagScope::new(flag).apply_default(query, model)
            });
        Self { model, query }
    }

    pub fn model(&self) -> &'a ModelDescriptor {
        self.model
    }

    pub fn query(&self) -> &RecordQuery {
        &self.query
    }

    pub fn into_query(self) -> RecordQuery {
        self.query
    }

    fn flag(&self, key: &str) -> Result<&'a FlagDefinition> {
        self.model.flag(key).ok_or_else(|| FlagError::UnknownFlag {
            model: self.model.name.clone(),
            flag: key.to_string(),
        })
    }

    /// First attached flag exposing an operation called `name`
    fn resolve(&self, name: &str) -> Option<(&'a FlagDefinition, FlagOperation)> {
        self.model
            .flags
            .iter()
            .find_map(|flag| flag.resolve(name).map(|operation| (flag, operation)))
    }

    fn unknown_operation(&self, name: &str) -> FlagError {
        FlagError::UnknownOperation {
            model: self.model.name.clone(),
            operation: name.to_string(),
        }
    }

    /// Scope: include rows hidden by `key`'s default filter
    pub fn include_off(mut self, key: &str) -> Result<Self> {
        let scope = FlagScope::new(self.flag(key)?);
        self.query = scope.include_off(self.query);
        Ok(self)
    }

    /// Scope: only rows visible under `key`'s default filter
    pub fn exclude_off(mut self, key: &str) -> Result<Self> {
        let scope = FlagScope::new(self.flag(key)?);
        self.query = scope.exclude_off(self.query);
        Ok(self)
    }

    /// Scope: only rows hidden by `key`'s default filter
    pub fn only_off(mut self, key: &str) -> Result<Self> {
        let scope = FlagScope::new(self.flag(key)?);
        self.query = scope.only_off(self.query);
        Ok(self)
    }

    /// Scope: hidden rows created more than `hours` ago
    pub fn only_off_older_than(mut self, key: &str, hours: i64) -> Result<Self> {
        let scope = FlagScope::new(self.flag(key)?);
        self.query = scope.only_off_older_than(self.query, &self.model.created_at_column, hours);
        Ok(self)
    }

    /// Apply a query modifier by its family name, e.g. `with_not_published`
    pub fn modify(self, name: &str) -> Result<Self> {
        match self.resolve(name) {
            Some((flag, FlagOperation::IncludeOff)) => self.include_off(&flag.key),
            Some((flag, FlagOperation::ExcludeOff)) => self.exclude_off(&flag.key),
            Some((flag, FlagOperation::OnlyOff)) => self.only_off(&flag.key),
            _ => Err(self.unknown_operation(name)),
        }
    }

    pub fn where_eq(mut self, field: &str, value: impl Into<ColumnValue>) -> Self {
        self.query = self.query.where_eq(field, value);
        self
    }

    pub fn order_asc(mut self, field: &str) -> Self {
        self.query = self.query.order_asc(field);
        self
    }

    pub fn order_desc(mut self, field: &str) -> Self {
        self.query = self.query.order_desc(field);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.query = self.query.limit(limit);
        self
    }

    /// Prepare turning `key` on for every matching row
    pub fn set_on(self, key: &str) -> Result<FlagMutation<'a>> {
        let flag = self.flag(key)?;
        Ok(FlagMutation::new(flag, FlagState::On, self.query))
    }

    /// Prepare turning `key` off for every matching row
    pub fn set_off(self, key: &str) -> Result<FlagMutation<'a>> {
        let flag = self.flag(key)?;
        Ok(FlagMutation::new(flag, FlagState::Off, self.query))
    }

    /// Prepare a mutation by its family verb, e.g. `publish` or `unarchive`
    pub fn mutation(self, verb: &str) -> Result<FlagMutation<'a>> {
        match self.resolve(verb) {
            Some((flag, FlagOperation::SetOn)) => {
                Ok(FlagMutation::new(flag, FlagState::On, self.query))
            }
            Some((flag, FlagOperation::SetOff)) => {
                Ok(FlagMutation::new(flag, FlagState::Off, self.query))
            }
            _ => Err(self.unknown_operation(verb)),
        }
    }
}

/// A bulk flag write bound to a query, ready to run against a store
#[derive(Debug, Clone)]
pub struct FlagMutation<'a> {
    scope: FlagScope<'a>,
    state: FlagState,
    query: RecordQuery,
}

impl<'a> FlagMutation<'a> {
    fn new(flag: &'a FlagDefinition, state: FlagState, query: RecordQuery) -> Self {
        Self {
            scope: FlagScope::new(flag),
            state,
            query,
        }
    }

    pub fn state(&self) -> FlagState {
        self.state
    }

    /// Run the update, returning the number of rows written
    pub async fn execute<S>(self, store: &S) -> std::result::Result<u64, S::Error>
    where
        S: RecordStore + ?Sized,
    {
        match self.state {
            FlagState::On => self.scope.set_on(store, self.query).await,
            FlagState::Off => self.scope.set_off(store, self.query).await,
        }
    }
}

impl ScopeBuilder<Record> for ModelQuery<'_> {
    fn all<S>(self, store: &S) -> impl Future<Output = std::result::Result<Vec<Record>, S::Error>> + Send
    where
        S: RecordStore + ?Sized,
    {
        async move { store.fetch_all(&self.query).await }
    }

    fn first<S>(self, store: &S) -> impl Future<Output = std::result::Result<Option<Record>, S::Error>> + Send
    where
        S: RecordStore + ?Sized,
    {
        async move {
            let query = self.query.limit(1);
            Ok(store.fetch_all(&query).await?.into_iter().next())
        }
    }

    fn count<S>(self, store: &S) -> impl Future<Output = std::result::Result<i64, S::Error>> + Send
    where
        S: RecordStore + ?Sized,
    {
        async move { store.count(&self.query).await }
    }

    fn exists<S>(self, store: &S) -> impl Future<Output = std::result::Result<bool, S::Error>> + Send
    where
        S: RecordStore + ?Sized,
    {
        async move { Ok(store.count(&self.query).await? > 0) }
    }
}
