//! Dungeon game client binary.
//!
//! Plays one headless session: the automatic player holds its ground while
//! rounds of spiders close in, until it dies or the turn limit is reached.
//!
//! ```bash
//! DUNGEON_SEED=7 DUNGEON_MAX_TURNS=100 cargo run -p dungeon-client
//! ```

use anyhow::Result;
use dungeon_client::{AutoPlayer, ClientConfig, HighScore, ScoreSubmission, logging, presenter};
use runtime::{Runtime, Subsystem};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = ClientConfig::from_env();
    let _log_guard = logging::init(config.log_dir.as_deref())?;

    tracing::info!(
        seed = ?config.seed,
        max_turns = config.max_turns,
        player = %config.player_name,
        "starting dungeon session"
    );

    let mut runtime = Runtime::builder()
        .config(config.runtime_config())
        .player_provider(AutoPlayer)
        .build()
        .await?;
    let handle = runtime.handle();

    let presenters = presenter::spawn(&handle);
    handle.signal_ready(Subsystem::Presentation);

    let played = runtime.run_turns(config.max_turns).await?;
    let snapshot = handle.query_snapshot().await?;

    let mut high_score = HighScore::default();
    high_score.record(snapshot.score);
    let submission = ScoreSubmission::now(config.player_name.as_str(), high_score.get());

    println!("turns played: {played}");
    println!("rounds reached: {}", snapshot.round);
    println!("final score: {}", snapshot.score);
    if let Some(player) = snapshot.player {
        println!("player health: {}/{}", player.health, player.max_health);
    }
    println!("outcome: {}", if snapshot.game_over { "defeated" } else { "survived" });
    tracing::info!(fields = ?submission.form_fields(), "score ready for leaderboard");

    drop(handle);
    runtime.shutdown().await?;
    for task in presenters {
        task.abort();
    }

    Ok(())
}
