use std::path::PathBuf;
use std::sync::Arc;

use agentmesh::{
    AgentRegistry, FileSnapshotStore, RegistryConfig, Router, SnapshotStore, Subscription,
    TopicEvent, WorkerId,
};
use clap::{Parser, Subcommand};
use serde_json::json;

#[derive(Parser)]
#[command(name = "agentmesh", version, about = "AgentMesh registry demo CLI", author)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Simulate a few workers and route a burst of events through the
    /// registry, printing the computed dispatch lists.
    Demo {
        #[arg(long, default_value_t = 2)]
        workers: usize,
        #[arg(long, default_value_t = 10)]
        events: usize,
    },
    /// Export the demo registry's subscriptions as a JSON snapshot.
    Snapshot {
        #[arg(long)]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Demo { workers, events } => run_demo(workers, events),
        Command::Snapshot { output } => export_snapshot(output).await,
    }
}

fn demo_registry(workers: usize) -> Arc<AgentRegistry> {
    let registry = Arc::new(AgentRegistry::new(RegistryConfig::default()));
    for i in 0..workers.max(1) {
        registry.register_worker(WorkerId::new(format!("worker-{i}")), ["greeter", "auditor"]);
    }
    registry.subscribe(Subscription::exact("greetings", "greeter"));
    registry.subscribe(Subscription::prefix("audit.", "auditor"));
    registry
}

fn run_demo(workers: usize, events: usize) -> anyhow::Result<()> {
    let registry = demo_registry(workers);
    for agent_type in registry.agent_types() {
        let rules = registry.subscriptions_for_agent_type(&agent_type);
        println!(
            "{}",
            serde_json::to_string(&json!({ "agentType": agent_type, "rules": rules }))?
        );
    }
    let router = Router::new(registry);

    for i in 0..events {
        let event = if i % 2 == 0 {
            TopicEvent::new("greetings", "hello", json!({ "seq": i }))
        } else {
            TopicEvent::new(format!("session-{i}"), "audit.login", json!({ "seq": i }))
        };
        let dispatches = router.route_event(&event);
        println!(
            "{}",
            serde_json::to_string(&json!({
                "topic": event.topic,
                "eventType": event.event_type,
                "dispatches": dispatches,
            }))?
        );
    }
    Ok(())
}

async fn export_snapshot(output: PathBuf) -> anyhow::Result<()> {
    let registry = demo_registry(2);
    let store = FileSnapshotStore::new(&output);
    store.save(&registry.export_snapshot()).await?;
    println!("snapshot written to {}", output.display());
    Ok(())
}
