//! Single-record flag helpers.
//!
//! These work on a record already in hand rather than on a query. `turn_on` and
//! `turn_off` persist immediately and publish the family's lifecycle event.

use super::definition::{FlagDefinition, Representation};
use crate::events::{EventPublisher, FlagEvent, FlagState};
use crate::logging::log_flag_operation;
use crate::models::{ModelMetadata, Record};
use crate::store::RecordStore;
use chrono::Utc;

impl FlagDefinition {
    /// Whether the record's flag is on. Timestamp flags only track null-ness.
    pub fn is_on(&self, record: &Record) -> bool {
        let value = record.value(&self.attribute);
        match self.representation {
            Representation::Boolean => value.is_truthy(),
            Representation::NullableTimestamp => !value.is_null(),
        }
    }

    pub fn is_off(&self, record: &Record) -> bool {
        !self.is_on(record)
    }

    /// Answer one of the family's named predicates (`is_published`,
    /// `is_unpublished`). `None` when the name belongs to another family.
    pub fn evaluate(&self, predicate: &str, record: &Record) -> Option<bool> {
        if predicate.is_empty() {
            None
        } else if predicate == self.verbs.on_predicate {
            Some(self.is_on(record))
        } else if predicate == self.verbs.off_predicate {
            Some(self.is_off(record))
        } else {
            None
        }
    }

    /// Whether the record is visible under the default filter
    pub fn is_visible(&self, record: &Record) -> bool {
        self.is_on(record) == self.visible_when_on()
    }

    /// Set the flag in memory without persisting
    pub fn set_flag<'r>(&self, record: &'r mut Record) -> &'r mut Record {
        record.set(&self.attribute, self.on_value(Utc::now()));
        record
    }

    /// Clear the flag in memory without persisting
    pub fn unset_flag<'r>(&self, record: &'r mut Record) -> &'r mut Record {
        record.set(&self.attribute, self.off_value());
        record
    }

    /// Set, persist and announce the flag on a single record
    pub async fn turn_on<S, M>(
        &self,
        store: &S,
        model: &M,
        record: &mut Record,
        publisher: &EventPublisher,
    ) -> Result<(), S::Error>
    where
        S: RecordStore + ?Sized,
        M: ModelMetadata + ?Sized,
    {
        self.set_flag(record);
        self.persist(store, model, record, publisher, FlagState::On)
            .await
    }

    /// Clear, persist and announce the flag on a single record
    pub async fn turn_off<S, M>(
        &self,
        store: &S,
        model: &M,
        record: &mut Record,
        publisher: &EventPublisher,
    ) -> Result<(), S::Error>
    where
        S: RecordStore + ?Sized,
        M: ModelMetadata + ?Sized,
    {
        self.unset_flag(record);
        self.persist(store, model, record, publisher, FlagState::Off)
            .await
    }

    async fn persist<S, M>(
        &self,
        store: &S,
        model: &M,
        record: &Record,
        publisher: &EventPublisher,
        state: FlagState,
    ) -> Result<(), S::Error>
    where
        S: RecordStore + ?Sized,
        M: ModelMetadata + ?Sized,
    {
        store.save(model.table_name(), record).await?;

        let (verb, event_name) = match state {
            FlagState::On => (&self.verbs.set, &self.verbs.set_event),
            FlagState::Off => (&self.verbs.unset, &self.verbs.unset_event),
        };
        log_flag_operation(verb, model.table_name(), &self.key, Some(record.id), 1);

        publisher.publish(FlagEvent {
            name: event_name.clone(),
            model: model.model_name().to_string(),
            table: model.table_name().to_string(),
            record_id: record.id,
            flag: self.key.clone(),
            state,
            published_at: Utc::now(),
        });
        Ok(())
    }
}
