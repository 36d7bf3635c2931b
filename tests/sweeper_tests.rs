use std::sync::Arc;
use std::time::Duration;

use agentmesh::{spawn_sweeper, AgentRegistry, RegistryConfig, WorkerId};
use tokio::time::sleep;

fn fast_registry() -> Arc<AgentRegistry> {
    Arc::new(AgentRegistry::new(
        RegistryConfig::new()
            .with_worker_timeout(Duration::from_millis(30))
            .with_sweep_interval(Duration::from_millis(10)),
    ))
}

#[tokio::test]
async fn sweeper_purges_silent_worker() {
    let registry = fast_registry();
    registry.register_worker(WorkerId::from("w1"), ["greeter"]);

    let sweeper = spawn_sweeper(registry.clone());
    sleep(Duration::from_millis(150)).await;

    assert_eq!(registry.worker_count(), 0);
    assert!(registry.compatible_worker("greeter").is_none());
    sweeper.stop().await;
}

#[tokio::test]
async fn sweeper_spares_heartbeating_worker() {
    let registry = fast_registry();
    let w1 = WorkerId::from("w1");
    registry.register_worker(w1.clone(), ["greeter"]);

    let sweeper = spawn_sweeper(registry.clone());
    for _ in 0..10 {
        sleep(Duration::from_millis(15)).await;
        registry.heartbeat(&w1);
    }
    assert_eq!(registry.worker_count(), 1);
    sweeper.stop().await;

    // With the sweeper stopped, silence no longer purges anything.
    sleep(Duration::from_millis(100)).await;
    assert_eq!(registry.worker_count(), 1);
}
