use async_trait::async_trait;
use flag_scopes::flag::{families, FlagDefinition};
use flag_scopes::models::{ModelDescriptor, Record};
use flag_scopes::query_builder::{Assignment, RecordQuery};
use flag_scopes::store::{MemoryStore, RecordStore};
use flag_scopes::test_utils::seed_flagged;

pub const TABLE: &str = "items";

/// Catalog definition by key
pub fn family(key: &str) -> &'static FlagDefinition {
    families::get(key).unwrap_or_else(|| panic!("unknown family {key}"))
}

/// Model with one flag attached and its override hook, if any, answering
/// `true` so the default filter is in force for every policy
pub fn model_with(key: &str) -> ModelDescriptor {
    let flag = family(key);
    let model = ModelDescriptor::new("Item", TABLE).with_flag(flag.clone());
    match flag.override_hook.name() {
        Some(hook) => model.with_hook(hook, true),
        None => model,
    }
}

/// Store holding `on` rows with the flag on, then `off` rows with it off
pub fn seeded(key: &str, on: usize, off: usize) -> (MemoryStore, ModelDescriptor) {
    let store = MemoryStore::new();
    seed_flagged(&store, TABLE, family(key), on, off, 0);
    (store, model_with(key))
}

#[derive(Debug, thiserror::Error)]
#[error("store unavailable")]
pub struct Unavailable;

/// Store whose every call fails
pub struct FailingStore;

#[async_trait]
impl RecordStore for FailingStore {
    type Error = Unavailable;

    async fn fetch_all(&self, _query: &RecordQuery) -> Result<Vec<Record>, Self::Error> {
        Err(Unavailable)
    }

    async fn count(&self, _query: &RecordQuery) -> Result<i64, Self::Error> {
        Err(Unavailable)
    }

    async fn update(
        &self,
        _query: &RecordQuery,
        _assignments: &[Assignment],
    ) -> Result<u64, Self::Error> {
        Err(Unavailable)
    }

    async fn find(&self, _table: &str, _id: i64) -> Result<Option<Record>, Self::Error> {
        Err(Unavailable)
    }

    async fn refresh(&self, _table: &str, _record: &mut Record) -> Result<(), Self::Error> {
        Err(Unavailable)
    }

    async fn save(&self, _table: &str, _record: &Record) -> Result<(), Self::Error> {
        Err(Unavailable)
    }
}
