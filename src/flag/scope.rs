//! # Flag Scope Engine
//!
//! [`FlagScope`] turns a [`FlagDefinition`] into query transformations and bulk
//! mutations. It holds no state beyond a borrowed definition and performs no
//! I/O of its own; mutations go through the caller's [`RecordStore`].
//!
//! ## Query modifiers
//!
//! "Off" in the modifier names is the state the default filter hides: flag off
//! for normal families, flag on for inverse ones.
//!
//! | Operation | Effect |
//! |---|---|
//! | `apply_default` | add the tagged default predicate unless the override hook says otherwise |
//! | `include_off` | remove the default predicate |
//! | `exclude_off` | remove it, then add the default predicate explicitly |
//! | `only_off` | remove it, then add the complementary predicate |
//!
//! ## Mutations
//!
//! The mutation that writes the default-visible value widens the query first
//! so hidden rows can be restored (`publish`, `unarchive`). The mutation
//! that hides rows runs against the query as given (`undo_publish`, `archive`).

use super::definition::FlagDefinition;
use crate::events::FlagState;
use crate::logging::log_flag_operation;
use crate::models::ModelMetadata;
use crate::query_builder::{Assignment, Condition, Operator, RecordQuery};
use crate::store::RecordStore;
use chrono::{DateTime, Duration, Utc};
use tracing::debug;

/// Query and mutation operations for one flag family
#[derive(Debug, Clone, Copy)]
pub struct FlagScope<'a> {
    definition: &'a FlagDefinition,
}

impl<'a> FlagScope<'a> {
    pub fn new(definition: &'a FlagDefinition) -> Self {
        Self { definition }
    }

    pub fn definition(&self) -> &'a FlagDefinition {
        self.definition
    }

    fn tag(&self) -> &str {
        &self.definition.key
    }

    /// Whether the default filter applies to `model`
    pub fn should_apply<M>(&self, model: &M) -> bool
    where
        M: ModelMetadata + ?Sized,
    {
        let hook = &self.definition.override_hook;
        let declared = hook.name().and_then(|name| model.declared_hook(name));
        hook.should_apply(declared)
    }

    /// Restrict the query to default-visible rows
    pub fn apply_default<M>(&self, query: RecordQuery, model: &M) -> RecordQuery
    where
        M: ModelMetadata + ?Sized,
    {
        if !self.should_apply(model) {
            debug!(
                model = %model.model_name(),
                flag = %self.definition.key,
                "default flag scope skipped by override hook"
            );
            return query;
        }
        query.with_scope(self.tag(), self.definition.default_condition())
    }

    /// Remove the default filter
    pub fn include_off(&self, query: RecordQuery) -> RecordQuery {
        query.without_scope(self.tag())
    }

    /// Only default-visible rows, whether or not the default was applied
    pub fn exclude_off(&self, query: RecordQuery) -> RecordQuery {
        self.include_off(query)
            .where_condition(self.definition.default_condition())
    }

    /// Only rows the default filter hides
    pub fn only_off(&self, query: RecordQuery) -> RecordQuery {
        self.include_off(query)
            .where_condition(self.definition.complement_condition())
    }

    /// Hidden rows created at or before `cutoff`
    pub fn only_off_created_before(
        &self,
        query: RecordQuery,
        created_at_column: &str,
        cutoff: DateTime<Utc>,
    ) -> RecordQuery {
        self.only_off(query).where_condition(Condition::compare(
            created_at_column,
            Operator::Lte,
            cutoff,
        ))
    }

    /// Hidden rows older than `hours`, e.g. unkept drafts due for cleanup
    pub fn only_off_older_than(
        &self,
        query: RecordQuery,
        created_at_column: &str,
        hours: i64,
    ) -> RecordQuery {
        // Ages beyond chrono's range clamp to the earliest or latest instant
        let cutoff = Duration::try_hours(hours)
            .and_then(|age| Utc::now().checked_sub_signed(age))
            .unwrap_or(if hours < 0 {
                DateTime::<Utc>::MAX_UTC
            } else {
                DateTime::<Utc>::MIN_UTC
            });
        self.only_off_created_before(query, created_at_column, cutoff)
    }

    /// Query and column write for moving matching rows into `state`
    pub fn mutation(
        &self,
        state: FlagState,
        query: RecordQuery,
        now: DateTime<Utc>,
    ) -> (RecordQuery, Assignment) {
        let value = match state {
            FlagState::On => self.definition.on_value(now),
            FlagState::Off => self.definition.off_value(),
        };
        let restores_visibility = (state == FlagState::On) == self.definition.visible_when_on();
        let query = if restores_visibility {
            self.include_off(query)
        } else {
            query
        };
        (query, Assignment::new(&self.definition.attribute, value))
    }

    /// Turn the flag on for every matching row
    pub async fn set_on<S>(&self, store: &S, query: RecordQuery) -> Result<u64, S::Error>
    where
        S: RecordStore + ?Sized,
    {
        self.write(store, FlagState::On, query).await
    }

    /// Turn the flag off for every matching row
    pub async fn set_off<S>(&self, store: &S, query: RecordQuery) -> Result<u64, S::Error>
    where
        S: RecordStore + ?Sized,
    {
        self.write(store, FlagState::Off, query).await
    }

    async fn write<S>(
        &self,
        store: &S,
        state: FlagState,
        query: RecordQuery,
    ) -> Result<u64, S::Error>
    where
        S: RecordStore + ?Sized,
    {
        let (query, assignment) = self.mutation(state, query, Utc::now());
        let verb = match state {
            FlagState::On => &self.definition.verbs.set,
            FlagState::Off => &self.definition.verbs.unset,
        };

        let affected = store
            .update(&query, std::slice::from_ref(&assignment))
            .await?;

        log_flag_operation(verb, query.table(), &self.definition.key, None, affected);
        Ok(affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flag::families;
    use crate::models::{ColumnValue, ModelDescriptor, Record};

    fn model() -> ModelDescriptor {
        ModelDescriptor::new("Post", "posts")
    }

    #[test]
    fn test_apply_default_normal_boolean() {
        let def = families::get(families::ACTIVE_FLAG).unwrap();
        let query = FlagScope::new(def).apply_default(RecordQuery::new("posts"), &model());
        assert_eq!(query.build_sql(), "SELECT * FROM posts WHERE is_active = true");
    }

    #[test]
    fn test_apply_default_inverse_timestamp() {
        let def = families::get(families::ARCHIVED_AT).unwrap();
        let query = FlagScope::new(def).apply_default(RecordQuery::new("posts"), &model());
        assert_eq!(
            query.build_sql(),
            "SELECT * FROM posts WHERE archived_at IS NULL"
        );
    }

    #[test]
    fn test_opt_out_hook_declared_false_skips_default() {
        let def = families::get(families::INVITED_AT).unwrap();
        let model = model().with_hook("should_apply_invited_at_scope", false);
        let query = FlagScope::new(def).apply_default(RecordQuery::new("posts"), &model);
        assert!(query.where_clauses().is_empty());
    }

    #[test]
    fn test_opt_in_hook_absent_skips_default() {
        let def = families::get(families::PUBLISHED_AT).unwrap();
        let scope = FlagScope::new(def);

        let query = scope.apply_default(RecordQuery::new("posts"), &model());
        assert!(query.where_clauses().is_empty());

        let opted_in = model().with_hook("should_apply_published_at_scope", true);
        let query = scope.apply_default(RecordQuery::new("posts"), &opted_in);
        assert_eq!(
            query.build_sql(),
            "SELECT * FROM posts WHERE published_at IS NOT NULL"
        );
    }

    #[test]
    fn test_modifiers() {
        let def = families::get(families::KEPT_FLAG).unwrap();
        let scope = FlagScope::new(def);
        let base = || scope.apply_default(RecordQuery::new("posts"), &model());

        assert_eq!(scope.include_off(base()).build_sql(), "SELECT * FROM posts");
        assert_eq!(
            scope.exclude_off(base()).build_sql(),
            "SELECT * FROM posts WHERE is_kept = true"
        );
        assert_eq!(
            scope.only_off(base()).build_sql(),
            "SELECT * FROM posts WHERE is_kept IS NOT TRUE"
        );
    }

    #[test]
    fn test_include_off_then_apply_default_stays_widened() {
        let def = families::get(families::ACTIVE_FLAG).unwrap();
        let scope = FlagScope::new(def);
        let query = scope.include_off(RecordQuery::new("posts"));
        let query = scope.apply_default(query, &model());
        assert!(query.where_clauses().is_empty());
    }

    #[test]
    fn test_only_off_created_before() {
        let def = families::get(families::KEPT_FLAG).unwrap();
        let cutoff = "2024-01-01T00:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let query = FlagScope::new(def).only_off_created_before(
            RecordQuery::new("posts"),
            "created_at",
            cutoff,
        );
        assert_eq!(
            query.build_sql(),
            "SELECT * FROM posts WHERE is_kept IS NOT TRUE AND created_at <= '2024-01-01T00:00:00+00:00'"
        );
    }

    #[test]
    fn test_only_off_older_than_clamps_out_of_range_ages() {
        let def = families::get(families::KEPT_FLAG).unwrap();
        let scope = FlagScope::new(def);
        let unkept = Record::new(1)
            .with("is_kept", false)
            .with("created_at", Utc::now() - Duration::hours(2));

        let ancient = scope.only_off_older_than(RecordQuery::new("posts"), "created_at", i64::MAX);
        assert!(!ancient.matches(&unkept));

        let future = scope.only_off_older_than(RecordQuery::new("posts"), "created_at", i64::MIN);
        assert!(future.matches(&unkept));

        let recent = scope.only_off_older_than(RecordQuery::new("posts"), "created_at", 1);
        assert!(recent.matches(&unkept));
    }

    #[test]
    fn test_mutation_widens_only_when_restoring_visibility() {
        let now = Utc::now();

        let published = families::get(families::PUBLISHED_FLAG).unwrap();
        let scope = FlagScope::new(published);
        let opted_in = model().with_hook("should_apply_published_flag_scope", true);
        let base = || scope.apply_default(RecordQuery::new("posts"), &opted_in);

        let (query, assignment) = scope.mutation(FlagState::On, base(), now);
        assert!(query.where_clauses().is_empty());
        assert_eq!(assignment, Assignment::new("is_published", true));

        let (query, assignment) = scope.mutation(FlagState::Off, base(), now);
        assert_eq!(query.where_clauses().len(), 1);
        assert_eq!(assignment, Assignment::new("is_published", false));

        let archived = families::get(families::ARCHIVED_AT).unwrap();
        let scope = FlagScope::new(archived);
        let base = || scope.apply_default(RecordQuery::new("posts"), &model());

        let (query, assignment) = scope.mutation(FlagState::On, base(), now);
        assert_eq!(query.where_clauses().len(), 1);
        assert_eq!(assignment.value, ColumnValue::Timestamp(now));

        let (query, assignment) = scope.mutation(FlagState::Off, base(), now);
        assert!(query.where_clauses().is_empty());
        assert_eq!(assignment.value, ColumnValue::Null);
    }
}
