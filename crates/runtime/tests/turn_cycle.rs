use std::time::Duration;

use game_core::{
    CardinalDirection, ConfigError, DamageOutcome, EntityId, GameConfig, GenerationConfig,
    Position,
};
use runtime::{
    ActionEffect, CombatEvent, EnemyOutcome, Event, HoldPositionProvider, LifecycleEvent,
    MapEvent, PlayerAction, PlayerActionReport, RoundEvent, RoundSettings, Runtime,
    RuntimeConfig, RuntimeError, RuntimeHandle, ScriptedPlayerProvider, Subsystem, Topic,
    TurnEvent, TurnPhase,
};
use tokio::sync::broadcast;

fn headless(seed: u64) -> RuntimeConfig {
    RuntimeConfig {
        seed: Some(seed),
        rounds: RoundSettings::disabled(),
        optional_subsystems: Vec::new(),
        ..RuntimeConfig::headless()
    }
}

async fn build(config: RuntimeConfig) -> Runtime {
    Runtime::builder()
        .config(config)
        .build()
        .await
        .expect("runtime builds")
}

fn drain(rx: &mut broadcast::Receiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

async fn player_position(handle: &RuntimeHandle) -> Position {
    handle
        .query_snapshot()
        .await
        .expect("snapshot")
        .player
        .expect("player placed")
        .position
}

/// Spawns a spider on the first free tile next to the player.
async fn spawn_adjacent(handle: &RuntimeHandle) -> (CardinalDirection, EntityId) {
    let player = player_position(handle).await;
    for direction in CardinalDirection::ALL {
        if let Some(enemy) = handle
            .spawn_enemy(player.step(direction))
            .await
            .expect("spawn command")
        {
            return (direction, enemy);
        }
    }
    panic!("player at {player} has no free neighbouring floor");
}

#[tokio::test]
async fn startup_opens_first_player_phase() {
    let runtime = build(headless(3)).await;
    let handle = runtime.handle();
    let mut map_rx = handle.subscribe(Topic::Map);

    let snapshot = handle.query_snapshot().await.expect("snapshot");
    assert_eq!(snapshot.phase, TurnPhase::PlayerPhase);
    assert_eq!(snapshot.turn, 1);
    assert!(snapshot.enemies.is_empty());
    assert!(!snapshot.game_over);
    let player = snapshot.player.expect("player placed");
    assert_eq!(player.health, GameConfig::DEFAULT_PLAYER_MAX_HEALTH);

    let events = drain(&mut map_rx);
    assert_eq!(events.first(), Some(&Event::Map(MapEvent::GenerationRequested)));
    match events.get(1) {
        Some(Event::Map(MapEvent::Generated { report })) => assert!(report.walkable_tiles > 0),
        other => panic!("expected generation report, got {other:?}"),
    }

    drop(handle);
    runtime.shutdown().await.expect("clean shutdown");
}

#[tokio::test]
async fn player_kills_adjacent_spider() {
    let runtime = build(headless(5)).await;
    let handle = runtime.handle();
    let mut combat_rx = handle.subscribe(Topic::Combat);

    let (direction, spider) = spawn_adjacent(&handle).await;

    // Turning toward an occupied tile bumps; the spider answers with a bite.
    let report = handle
        .submit_player_action(PlayerAction::Move(direction))
        .await
        .expect("move resolves");
    assert_eq!(
        report,
        PlayerActionReport::Resolved {
            turn: 1,
            effect: ActionEffect::Bumped { facing: direction },
            enemies_acted: 1,
        }
    );

    let report = handle
        .submit_player_action(PlayerAction::Attack)
        .await
        .expect("attack resolves");
    assert_eq!(
        report.effect(),
        Some(ActionEffect::Hit {
            target: spider,
            damage: 5,
            outcome: DamageOutcome::Survived { remaining: 5 },
        })
    );

    let report = handle
        .submit_player_action(PlayerAction::Attack)
        .await
        .expect("attack resolves");
    assert_eq!(
        report,
        PlayerActionReport::Resolved {
            turn: 3,
            effect: ActionEffect::Hit {
                target: spider,
                damage: 5,
                outcome: DamageOutcome::Died,
            },
            enemies_acted: 0,
        }
    );

    let snapshot = handle.query_snapshot().await.expect("snapshot");
    assert!(snapshot.enemies.is_empty());
    assert_eq!(snapshot.player.map(|player| player.health), Some(16));
    assert_eq!(snapshot.turn, 4);

    let events = drain(&mut combat_rx);
    assert!(events.iter().any(|event| matches!(
        event,
        Event::Combat(CombatEvent::EntityDied { entity, .. }) if *entity == spider
    )));
    let bites = events
        .iter()
        .filter(|event| matches!(
            event,
            Event::Combat(CombatEvent::Attacked { target, .. }) if target.is_player()
        ))
        .count();
    assert_eq!(bites, 2);
}

#[tokio::test]
async fn spider_closes_distance_then_attacks() {
    let mut config = headless(9);
    config.game = GameConfig::default().with_generation(
        GenerationConfig::new()
            .with_iterations(1)
            .with_room_size(6),
    );
    let runtime = build(config).await;
    let handle = runtime.handle();

    let player = player_position(&handle).await;
    let spider = match handle
        .spawn_enemy(Position::new(player.x + 3, player.y))
        .await
        .expect("spawn command")
    {
        Some(id) => id,
        None => handle
            .spawn_enemy(Position::new(player.x - 3, player.y))
            .await
            .expect("spawn command")
            .expect("room is six tiles wide"),
    };

    let mut turn_rx = handle.subscribe(Topic::Turn);
    let mut distances = Vec::new();
    for _ in 0..3 {
        handle
            .submit_player_action(PlayerAction::Attack)
            .await
            .expect("turn resolves");
        let snapshot = handle.query_snapshot().await.expect("snapshot");
        let enemy = snapshot.enemy(spider).expect("spider alive");
        distances.push(enemy.position.manhattan_distance(player));
    }
    assert_eq!(distances, vec![2, 1, 1]);

    let snapshot = handle.query_snapshot().await.expect("snapshot");
    assert_eq!(snapshot.player.map(|player| player.health), Some(18));

    let outcomes: Vec<EnemyOutcome> = drain(&mut turn_rx)
        .into_iter()
        .filter_map(|event| match event {
            Event::Turn(TurnEvent::EnemyActed { outcome, .. }) => Some(outcome),
            _ => None,
        })
        .collect();
    assert_eq!(outcomes.len(), 3);
    assert!(matches!(outcomes[0], EnemyOutcome::Moved { .. }));
    assert!(matches!(outcomes[1], EnemyOutcome::Moved { .. }));
    assert!(matches!(
        outcomes[2],
        EnemyOutcome::Attacked {
            damage: 2,
            outcome: DamageOutcome::Survived { remaining: 18 },
            ..
        }
    ));
}

#[tokio::test]
async fn clearing_a_round_starts_a_larger_one() {
    let config = RuntimeConfig {
        rounds: RoundSettings::default(),
        ..headless(13)
    };
    let runtime = build(config).await;
    let handle = runtime.handle();
    let mut round_rx = handle.subscribe(Topic::Round);

    let snapshot = handle.query_snapshot().await.expect("snapshot");
    assert_eq!(snapshot.round, 1);
    assert_eq!(snapshot.enemies.len(), 2);

    for enemy in &snapshot.enemies {
        assert!(handle.despawn_enemy(enemy.id).await.expect("despawn command"));
    }
    assert!(!handle
        .despawn_enemy(snapshot.enemies[0].id)
        .await
        .expect("despawn command"));

    // The next round begins with the next player phase.
    let snapshot = handle.query_snapshot().await.expect("snapshot");
    assert_eq!(snapshot.round, 1);
    assert!(snapshot.enemies.is_empty());

    handle
        .submit_player_action(PlayerAction::Move(CardinalDirection::Up))
        .await
        .expect("turn resolves");

    let snapshot = handle.query_snapshot().await.expect("snapshot");
    assert_eq!(snapshot.round, 2);
    assert_eq!(snapshot.enemies.len(), 3);
    assert_eq!(snapshot.score, 0);

    let events = drain(&mut round_rx);
    assert!(events.contains(&Event::Round(RoundEvent::RoundEnded { round: 1 })));
    assert!(events.contains(&Event::Round(RoundEvent::RoundStarted {
        round: 2,
        enemies: 3
    })));
}

#[tokio::test]
async fn player_death_ends_the_game() {
    let mut config = headless(21);
    config.game.player_max_health = 1;
    let mut runtime = build(config).await;
    let handle = runtime.handle();
    let mut lifecycle_rx = handle.subscribe(Topic::Lifecycle);

    let (direction, _) = spawn_adjacent(&handle).await;
    handle
        .submit_player_action(PlayerAction::Move(direction))
        .await
        .expect("turn resolves");

    let snapshot = handle.query_snapshot().await.expect("snapshot");
    assert!(snapshot.game_over);
    assert_eq!(snapshot.player.map(|player| player.health), Some(-1));

    let err = handle
        .submit_player_action(PlayerAction::Attack)
        .await
        .expect_err("game is over");
    assert!(matches!(err, RuntimeError::GameOver { final_score: 0 }));

    let events = drain(&mut lifecycle_rx);
    assert!(events.contains(&Event::Lifecycle(LifecycleEvent::GameOver {
        final_score: 0,
        turns: 1
    })));

    runtime.set_player_provider(HoldPositionProvider);
    assert_eq!(runtime.run_turns(5).await.expect("stops cleanly"), 0);
}

#[tokio::test]
async fn missing_optional_subsystem_is_reported() {
    let config = RuntimeConfig {
        optional_subsystems: vec![Subsystem::Presentation],
        optional_subsystem_timeout: Duration::from_millis(50),
        ..headless(1)
    };
    let runtime = build(config).await;
    let handle = runtime.handle();
    let mut lifecycle_rx = handle.subscribe(Topic::Lifecycle);

    let snapshot = handle.query_snapshot().await.expect("snapshot");
    assert_eq!(snapshot.phase, TurnPhase::PlayerPhase);

    let events = drain(&mut lifecycle_rx);
    assert!(events.contains(&Event::Lifecycle(LifecycleEvent::SubsystemMissing {
        subsystem: Subsystem::Presentation
    })));
}

#[tokio::test]
async fn signalled_optional_subsystem_is_not_reported() {
    let config = RuntimeConfig {
        optional_subsystems: vec![Subsystem::Presentation],
        optional_subsystem_timeout: Duration::from_secs(5),
        ..headless(1)
    };
    let runtime = build(config).await;
    let handle = runtime.handle();
    let mut lifecycle_rx = handle.subscribe(Topic::Lifecycle);

    assert!(handle.signal_ready(Subsystem::Presentation));
    handle.query_snapshot().await.expect("snapshot");

    let events = drain(&mut lifecycle_rx);
    assert!(!events.iter().any(|event| matches!(
        event,
        Event::Lifecycle(LifecycleEvent::SubsystemMissing { .. })
    )));
}

#[tokio::test]
async fn provider_drives_turns() {
    let mut runtime = build(headless(2)).await;
    assert!(matches!(
        runtime.step().await,
        Err(RuntimeError::ProviderNotSet)
    ));

    runtime.set_player_provider(HoldPositionProvider);
    assert_eq!(runtime.run_turns(3).await.expect("turns run"), 3);

    let snapshot = runtime.handle().query_snapshot().await.expect("snapshot");
    assert_eq!(snapshot.turn, 4);
    runtime.shutdown().await.expect("clean shutdown");
}

#[tokio::test]
async fn scripted_provider_replays_then_holds() {
    let mut runtime = build(headless(3)).await;
    let mut turn_rx = runtime.handle().subscribe(Topic::Turn);
    runtime.set_player_provider(ScriptedPlayerProvider::new([
        PlayerAction::Move(CardinalDirection::Left),
        PlayerAction::Move(CardinalDirection::Right),
    ]));

    assert_eq!(runtime.run_turns(3).await.expect("turns run"), 3);

    let actions: Vec<PlayerAction> = drain(&mut turn_rx)
        .into_iter()
        .filter_map(|event| match event {
            Event::Turn(TurnEvent::PlayerPhaseEnded { action, .. }) => Some(action),
            _ => None,
        })
        .collect();
    assert_eq!(
        actions,
        vec![
            PlayerAction::Move(CardinalDirection::Left),
            PlayerAction::Move(CardinalDirection::Right),
            PlayerAction::Attack,
        ]
    );

    let snapshot = runtime.handle().query_snapshot().await.expect("snapshot");
    assert_eq!(
        snapshot.player.map(|player| player.facing),
        Some(CardinalDirection::Right)
    );
    runtime.shutdown().await.expect("clean shutdown");
}

#[tokio::test]
async fn invalid_configuration_is_rejected() {
    let config = RuntimeConfig {
        command_buffer_size: 0,
        ..headless(1)
    };
    assert!(matches!(
        Runtime::builder().config(config).build().await,
        Err(RuntimeError::ZeroBufferSize { name: "command" })
    ));

    let mut config = headless(1);
    config.game.generation.map_dimension = u32::MAX;
    assert!(matches!(
        Runtime::builder().config(config).build().await,
        Err(RuntimeError::InvalidConfig(ConfigError::OutOfRange {
            field: "map_dimension",
            ..
        }))
    ));
}
