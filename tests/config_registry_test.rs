//! Configuration file to registry to query, end to end.

use flag_scopes::models::Record;
use flag_scopes::scopes::ScopeBuilder;
use flag_scopes::store::MemoryStore;
use flag_scopes::ConfigLoader;
use std::io::Write;

const CONFIG: &str = r#"
event_channel_capacity = 32

[[models]]
name = "Post"
table = "posts"
flags = ["published_flag_scope", "archived_at_scope"]

[[models]]
name = "Subscription"
table = "subscriptions"
flags = ["expired_at_scope"]

[models.hooks]
should_apply_expired_at_scope = false
"#;

fn load() -> flag_scopes::FlagsConfig {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(CONFIG.as_bytes()).unwrap();
    ConfigLoader::load_from_file(file.path()).unwrap()
}

#[tokio::test]
async fn test_configured_models_filter_by_default() {
    let config = load();
    let registry = config.build_registry().unwrap();
    assert_eq!(registry.model_names(), vec!["Post", "Subscription"]);

    let store = MemoryStore::new();
    store.insert("posts", Record::new(0).with("is_published", true));
    store.insert("posts", Record::new(0).with("is_published", false));
    store.insert(
        "posts",
        Record::new(0)
            .with("is_published", true)
            .with("archived_at", chrono::Utc::now()),
    );

    let post = registry.get("Post").unwrap();
    let visible = post.scope().all(&store).await.unwrap();
    assert_eq!(visible.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1]);

    let archived = post.scope().modify("only_archived").unwrap();
    assert_eq!(archived.count(&store).await.unwrap(), 1);
}

#[tokio::test]
async fn test_hook_from_config_disables_default() {
    let config = load();
    let registry = config.build_registry().unwrap();

    let store = MemoryStore::new();
    store.insert("subscriptions", Record::new(0).with("expired_at", chrono::Utc::now()));
    store.insert("subscriptions", Record::new(0));

    let subscription = registry.get("Subscription").unwrap();
    assert_eq!(subscription.scope().count(&store).await.unwrap(), 2);
}

#[test]
fn test_configured_event_publisher() {
    let config = load();
    let publisher = config.event_publisher();
    let _receiver = publisher.subscribe();
    assert_eq!(publisher.subscriber_count(), 1);
}
