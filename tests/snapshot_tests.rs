use std::sync::Arc;

use agentmesh::{
    AgentRegistry, FileSnapshotStore, MemorySnapshotStore, RegistryConfig, SnapshotStore,
    Subscription, WorkerId,
};

fn seeded_registry() -> Arc<AgentRegistry> {
    let registry = Arc::new(AgentRegistry::new(RegistryConfig::default()));
    registry.subscribe(Subscription::exact("greetings", "greeter"));
    registry.subscribe(Subscription::prefix("audit.", "auditor"));
    registry
}

#[tokio::test]
async fn memory_store_round_trips_snapshot() {
    let registry = seeded_registry();
    let store = MemorySnapshotStore::new();
    store.save(&registry.export_snapshot()).await.unwrap();

    let restored = Arc::new(AgentRegistry::new(RegistryConfig::default()));
    restored.restore_snapshot(store.load().await.unwrap().unwrap());

    assert_eq!(
        restored.resolve_agent_types("greetings", "hello"),
        registry.resolve_agent_types("greetings", "hello")
    );
    assert_eq!(
        restored.resolve_agent_types("session-1", "audit.login"),
        registry.resolve_agent_types("session-1", "audit.login")
    );
    assert!(restored.subscription_indices_consistent());
}

#[tokio::test]
async fn restored_subscription_ids_remain_removable() {
    let registry = Arc::new(AgentRegistry::new(RegistryConfig::default()));
    let id = registry.subscribe(Subscription::exact("greetings", "greeter"));

    let restored = Arc::new(AgentRegistry::new(RegistryConfig::default()));
    restored.restore_snapshot(registry.export_snapshot());
    restored.unsubscribe(&id).unwrap();
    assert!(restored.list_subscriptions().is_empty());
}

#[tokio::test]
async fn subscribing_after_restore_keeps_restored_subscriptions() {
    let registry = Arc::new(AgentRegistry::new(RegistryConfig::default()));
    let old_id = registry.subscribe(Subscription::exact("greetings", "greeter"));

    // Same-process restart: restore into a fresh registry whose id
    // sequence starts over, then keep subscribing.
    let restored = Arc::new(AgentRegistry::new(RegistryConfig::default()));
    restored.restore_snapshot(registry.export_snapshot());
    let new_id = restored.subscribe(Subscription::exact("farewells", "waver"));

    assert_ne!(new_id, old_id);
    assert_eq!(restored.list_subscriptions().len(), 2);
    assert!(restored
        .resolve_agent_types("greetings", "hello")
        .contains("greeter"));
    assert!(restored.subscription_indices_consistent());
}

#[tokio::test]
async fn file_store_round_trips_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("registry.json");

    let registry = seeded_registry();
    let store = FileSnapshotStore::new(&path);
    store.save(&registry.export_snapshot()).await.unwrap();

    let loaded = store.load().await.unwrap().unwrap();
    assert_eq!(loaded, registry.export_snapshot());
}

#[tokio::test]
async fn missing_file_loads_as_none() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileSnapshotStore::new(dir.path().join("absent.json"));
    assert!(store.load().await.unwrap().is_none());
}

#[tokio::test]
async fn snapshot_excludes_workers_and_placements() {
    let registry = seeded_registry();
    registry.register_worker(WorkerId::from("w1"), ["greeter"]);

    let snapshot = registry.export_snapshot();
    assert_eq!(snapshot.subscriptions.len(), 2);

    let restored = Arc::new(AgentRegistry::new(RegistryConfig::default()));
    restored.restore_snapshot(snapshot);
    assert_eq!(restored.worker_count(), 0);
    assert_eq!(restored.placement_count(), 0);
}
