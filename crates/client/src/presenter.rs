//! Headless presentation: turns runtime events into log lines.
use runtime::{CombatEvent, Event, LifecycleEvent, RoundEvent, RuntimeHandle, Topic};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Topics the presenter follows.
pub const TOPICS: [Topic; 3] = [Topic::Lifecycle, Topic::Combat, Topic::Round];

/// Spawns one logging task per followed topic.
pub fn spawn(handle: &RuntimeHandle) -> Vec<JoinHandle<()>> {
    handle
        .subscribe_multiple(&TOPICS)
        .into_iter()
        .map(|(topic, rx)| tokio::spawn(follow(topic, rx)))
        .collect()
}

async fn follow(topic: Topic, mut rx: broadcast::Receiver<Event>) {
    loop {
        match rx.recv().await {
            Ok(event) => present(&event),
            Err(RecvError::Lagged(skipped)) => {
                warn!(target: "client::presenter", %topic, skipped, "presenter fell behind");
            }
            Err(RecvError::Closed) => break,
        }
    }
}

fn present(event: &Event) {
    match event {
        Event::Lifecycle(LifecycleEvent::SubsystemMissing { subsystem }) => {
            warn!(target: "client::presenter", %subsystem, "running without subsystem");
        }
        Event::Lifecycle(LifecycleEvent::GameOver { final_score, turns }) => {
            info!(target: "client::presenter", final_score, turns, "game over");
        }
        Event::Round(RoundEvent::RoundStarted { round, enemies }) => {
            info!(target: "client::presenter", round, enemies, "round started");
        }
        Event::Round(RoundEvent::RoundEnded { round }) => {
            info!(target: "client::presenter", round, "round cleared");
        }
        Event::Round(RoundEvent::ScoreChanged { score }) => {
            info!(target: "client::presenter", score, "score");
        }
        Event::Combat(CombatEvent::EntityDied { entity, position }) => {
            info!(target: "client::presenter", %entity, %position, "entity died");
        }
        other => {
            tracing::debug!(target: "client::presenter", event = ?other);
        }
    }
}
