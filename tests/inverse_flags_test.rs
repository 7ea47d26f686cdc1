//! Inverse-polarity families: default-visible rows have the flag off.

mod common;

use common::*;
use flag_scopes::flag::families::{ARCHIVED_AT, ARCHIVED_FLAG, CLOSED_FLAG, ENDED_FLAG, KEPT_FLAG};
use flag_scopes::scopes::ScopeBuilder;
use flag_scopes::store::{MemoryStore, RecordStore};
use flag_scopes::test_utils::seed_flagged;
use flag_scopes::ModelDescriptor;

#[tokio::test]
async fn test_default_hides_flagged_rows() {
    let (store, model) = seeded(ARCHIVED_AT, 2, 3);

    assert_eq!(model.scope().count(&store).await.unwrap(), 3);
    assert_eq!(
        model.scope().modify("only_archived").unwrap().count(&store).await.unwrap(),
        2
    );
    assert_eq!(
        model.scope().modify("with_archived").unwrap().count(&store).await.unwrap(),
        5
    );
    assert_eq!(
        model.scope().modify("without_archived").unwrap().count(&store).await.unwrap(),
        3
    );
}

#[tokio::test]
async fn test_archive_never_touches_hidden_rows() {
    let (store, model) = seeded(ARCHIVED_AT, 2, 3);
    let before = store.find(TABLE, 1).await.unwrap().unwrap();

    let affected = model
        .scope()
        .mutation("archive")
        .unwrap()
        .execute(&store)
        .await
        .unwrap();
    assert_eq!(affected, 3);
    assert_eq!(model.scope().count(&store).await.unwrap(), 0);

    // Already-archived rows keep their original timestamp
    let after = store.find(TABLE, 1).await.unwrap().unwrap();
    assert_eq!(before.value("archived_at"), after.value("archived_at"));
}

#[tokio::test]
async fn test_unarchive_restores_hidden_rows() {
    let (store, model) = seeded(ARCHIVED_AT, 2, 3);

    let affected = model
        .scope()
        .mutation("unarchive")
        .unwrap()
        .execute(&store)
        .await
        .unwrap();
    assert_eq!(affected, 5);
    assert_eq!(model.scope().count(&store).await.unwrap(), 5);
}

#[tokio::test]
async fn test_boolean_close_and_open() {
    let (store, model) = seeded(CLOSED_FLAG, 1, 2);

    model
        .scope()
        .where_eq("id", 2_i64)
        .mutation("close")
        .unwrap()
        .execute(&store)
        .await
        .unwrap();
    assert_eq!(model.scope().count(&store).await.unwrap(), 1);

    model
        .scope()
        .where_eq("id", 1_i64)
        .mutation("open")
        .unwrap()
        .execute(&store)
        .await
        .unwrap();
    let open = model.scope().order_asc("id").all(&store).await.unwrap();
    assert_eq!(open.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 3]);
}

#[tokio::test]
async fn test_opt_in_inverse_families_skip_default_without_hook() {
    let store = MemoryStore::new();
    seed_flagged(&store, TABLE, family(ENDED_FLAG), 2, 1, 0);
    seed_flagged(&store, "notes", family(ARCHIVED_FLAG), 2, 1, 0);

    let events = ModelDescriptor::new("Event", TABLE).with_flag(family(ENDED_FLAG).clone());
    assert_eq!(events.scope().count(&store).await.unwrap(), 3);

    let notes = ModelDescriptor::new("Note", "notes")
        .with_flag(family(ARCHIVED_FLAG).clone())
        .with_hook("should_apply_archived_flag_scope", true);
    assert_eq!(notes.scope().count(&store).await.unwrap(), 1);
}

#[tokio::test]
async fn test_only_unkept_older_than() {
    let store = MemoryStore::new();
    let kept = family(KEPT_FLAG);
    seed_flagged(&store, TABLE, kept, 1, 2, 12);
    seed_flagged(&store, TABLE, kept, 0, 3, 1);
    let model = model_with(KEPT_FLAG);

    let stale = model
        .scope()
        .only_off_older_than(KEPT_FLAG, 4)
        .unwrap()
        .all(&store)
        .await
        .unwrap();
    assert_eq!(stale.iter().map(|r| r.id).collect::<Vec<_>>(), vec![2, 3]);

    assert_eq!(
        model.scope().only_off(KEPT_FLAG).unwrap().count(&store).await.unwrap(),
        5
    );
}

#[tokio::test]
async fn test_older_than_accepts_any_hour_count() {
    let store = MemoryStore::new();
    seed_flagged(&store, TABLE, family(KEPT_FLAG), 1, 2, 12);
    let model = model_with(KEPT_FLAG);

    let none = model
        .scope()
        .only_off_older_than(KEPT_FLAG, i64::MAX)
        .unwrap()
        .count(&store)
        .await
        .unwrap();
    assert_eq!(none, 0);

    let every_unkept = model
        .scope()
        .only_off_older_than(KEPT_FLAG, i64::MIN)
        .unwrap()
        .count(&store)
        .await
        .unwrap();
    assert_eq!(every_unkept, 2);
}
