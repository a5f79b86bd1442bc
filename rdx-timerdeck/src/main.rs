use anyhow::Result;
use std::path::PathBuf;
use timerdeck::common::now_millis;
use timerdeck::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEMO_TIMER_ID: &str = "timer_deckdev_demo";

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load configuration; an optional TOML path may be passed as the first argument.
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = TimerdeckConfig::load(config_path.as_deref())?;

    // 2. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with_target(false)
        .init();

    // 3. Open storage and hydrate the store.
    let repository = JsonFileRepository::from_config(&config.storage)?;
    info!(path = %repository.path().display(), "Using state snapshot");
    let mut store = Store::new(Box::new(repository));
    store.hydrate();

    // 4. Create the engine.
    let engine = TimerEngine::new(config, store.shared());

    // 5. Spawn tasks that log each event stream.
    spawn_event_listeners(&engine);

    // 6. Put a short demo timer on the deck and start it.
    register_demo_timer(&engine).await;

    // 7. Run the engine until Ctrl+C.
    engine.run().await?;

    Ok(())
}

/// Spawns tasks that log the alert and system event streams.
fn spawn_event_listeners(engine: &TimerEngine) {
    let mut system_rx = engine.subscribe_system_events();
    tokio::spawn(async move {
        while let Ok(event) = system_rx.recv().await {
            if !matches!(event, SystemEvent::Ticked { .. }) {
                info!("[SYSTEM] => {:?}", event);
            }
        }
    });

    let mut alert_rx = engine.subscribe_alerts();
    tokio::spawn(async move {
        while let Ok(alert) = alert_rx.recv().await {
            info!("[ALERT] => {} {}", alert.title(), alert.message());
        }
    });
}

/// Adds the demo timer if it is missing, then restarts it from full duration.
async fn register_demo_timer(engine: &TimerEngine) {
    let id = TimerId::from(DEMO_TIMER_ID);
    let exists = engine.store().read().await.state().timer(&id).is_some();
    if !exists {
        let timer = Timer::new(id.clone(), "Demo countdown", 10, "category_work", now_millis())
            .with_halfway_alert(true);
        engine.dispatch(Action::AddTimer(timer)).await;
    }
    engine.dispatch(Action::ResetTimer(id.clone())).await;
    engine.dispatch(Action::StartTimer(id)).await;
}
