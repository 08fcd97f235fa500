use std::collections::BTreeMap;

use bevy::prelude::*;
use game::{
    character::{
        enemy::{Enemy, EnemyKind, EnemyStats},
        health::{DamageRequest, Dead, EntityDied},
        player::Player,
    },
    core::GameplayPlugin,
    economy::CurrencyLedger,
    shop::{ItemPurchased, PurchaseRequest, ShopExitRequest, ShopGate, ShopItem, ShopPresentation},
    system_set::WaveSystemSet,
    ui::progress::WaveProgressText,
    waves::{
        config::{
            PlayerConfig, PoseConfig, ShopConfig, SpawnEntry, SpawnPointConfig, WaveConfigError,
            WaveDefinition,
        },
        lifecycle::LifecycleRegistry,
        HaltReason, WaveAnomaly, WaveConfig, WaveModeEnabled, WaveOrchestrator, WavePhase,
        WaveProgress, WaveProgressUpdate,
    },
};
use utils::rng::GameRng;

#[derive(Resource, Default)]
struct Collected {
    updates: Vec<WaveProgressUpdate>,
    anomalies: Vec<WaveAnomaly>,
    purchases: Vec<ItemPurchased>,
}

fn collect(
    mut updates: MessageReader<WaveProgressUpdate>,
    mut anomalies: MessageReader<WaveAnomaly>,
    mut purchases: MessageReader<ItemPurchased>,
    mut collected: ResMut<Collected>,
) {
    collected.updates.extend(updates.read().cloned());
    collected.anomalies.extend(anomalies.read().cloned());
    collected.purchases.extend(purchases.read().cloned());
}

fn stats(reward: Option<i32>) -> EnemyStats {
    EnemyStats {
        max_health: 30.0,
        move_speed: 2.0,
        attack_damage: 5.0,
        attack_range: 1.5,
        attack_rate: 1.0,
        reward,
    }
}

fn spawn_point(name: &str, x: f32) -> SpawnPointConfig {
    SpawnPointConfig {
        name: name.to_string(),
        position: [x, 0.0, 0.0],
        yaw_degrees: 0.0,
        enabled: true,
    }
}

fn entry(kind: &str, count: u32) -> SpawnEntry {
    SpawnEntry {
        enemy: Some(EnemyKind::new(kind)),
        count,
    }
}

fn wave(spawn_interval_frames: u32, entries: Vec<SpawnEntry>) -> WaveDefinition {
    WaveDefinition {
        name: None,
        spawn_interval_frames,
        entries,
    }
}

const SHOP_SPAWN: [f32; 3] = [0.0, 0.0, 500.0];

fn config(waves: Vec<WaveDefinition>) -> WaveConfig {
    WaveConfig {
        wave_delay_frames: 10,
        shop_poll_interval_frames: 1,
        shop_exit_timeout_frames: 10_000,
        corpse_linger_frames: 5,
        starting_currency: 0,
        default_enemy: None,
        enemies: BTreeMap::from([
            (EnemyKind::new("walker"), stats(Some(10))),
            (EnemyKind::new("silent"), stats(None)),
        ]),
        spawn_points: vec![spawn_point("west", -20.0), spawn_point("east", 20.0)],
        player: PlayerConfig {
            spawn: PoseConfig {
                position: [0.0, 0.0, 0.0],
                yaw_degrees: 0.0,
            },
            max_health: 100.0,
        },
        shop: Some(ShopConfig {
            spawn: PoseConfig {
                position: SHOP_SPAWN,
                yaw_degrees: 0.0,
            },
            exit: None,
            items: vec![ShopItem {
                id: "medkit".to_string(),
                name: "Health kit".to_string(),
                cost: 25,
            }],
        }),
        waves,
    }
}

fn test_app(config: WaveConfig) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.insert_resource(GameRng::new(Some(11)));
    app.add_plugins(GameplayPlugin);
    app.init_resource::<Collected>();
    app.add_systems(Update, collect.in_set(WaveSystemSet::FrameCounter));
    app.add_systems(Startup, move |mut commands: Commands| config.install(&mut commands));
    app
}

fn phase(app: &App) -> WavePhase {
    app.world().resource::<WaveOrchestrator>().phase()
}

fn progress(app: &App) -> WaveProgress {
    app.world().resource::<WaveProgress>().clone()
}

fn run_until_phase(app: &mut App, wanted: WavePhase, limit: u32) {
    for _ in 0..limit {
        if phase(app) == wanted {
            return;
        }
        app.update();
    }
    assert_eq!(phase(app), wanted, "phase not reached after {} updates", limit);
}

fn living_enemies(app: &mut App) -> Vec<Entity> {
    let mut query = app
        .world_mut()
        .query_filtered::<Entity, (With<Enemy>, Without<Dead>)>();
    query.iter(app.world()).collect()
}

fn kill(app: &mut App, target: Entity) {
    app.world_mut().write_message(DamageRequest {
        target,
        amount: 1_000.0,
    });
}

fn kill_all_enemies(app: &mut App) {
    for enemy in living_enemies(app) {
        kill(app, enemy);
    }
}

fn player(app: &mut App) -> Entity {
    let mut query = app.world_mut().query_filtered::<Entity, With<Player>>();
    let players: Vec<Entity> = query.iter(app.world()).collect();
    assert_eq!(players.len(), 1);
    players[0]
}

fn shop_visibility(app: &mut App) -> Option<Visibility> {
    let mut query = app
        .world_mut()
        .query_filtered::<&Visibility, With<ShopPresentation>>();
    query.iter(app.world()).next().copied()
}

fn anomalies_matching(app: &App, predicate: impl Fn(&WaveAnomaly) -> bool) -> usize {
    app.world()
        .resource::<Collected>()
        .anomalies
        .iter()
        .filter(|anomaly| predicate(anomaly))
        .count()
}

#[test]
fn cleared_wave_pays_out_and_enters_shop() {
    let mut app = test_app(config(vec![wave(60, vec![entry("walker", 3)])]));

    run_until_phase(&mut app, WavePhase::AwaitingClear, 300);
    assert_eq!(living_enemies(&mut app).len(), 3);
    assert_eq!(progress(&app).enemies_alive, 3);

    kill_all_enemies(&mut app);
    app.update();

    assert_eq!(progress(&app).enemies_alive, 0);
    assert_eq!(app.world().resource::<CurrencyLedger>().current(), 30);
    assert!(app.world().resource::<ShopGate>().is_occupied());
    assert_eq!(phase(&app), WavePhase::AwaitingShopExit);

    let player = player(&mut app);
    assert_eq!(
        app.world().entity(player).get::<Transform>().map(|t| t.translation),
        Some(Vec3::from_array(SHOP_SPAWN))
    );
    assert_eq!(shop_visibility(&mut app), Some(Visibility::Visible));
}

#[test]
fn enemies_spawn_on_enabled_points_only() {
    let mut level = config(vec![wave(0, vec![entry("walker", 6)])]);
    level.spawn_points[1].enabled = false;
    let mut app = test_app(level);

    run_until_phase(&mut app, WavePhase::AwaitingClear, 50);

    let mut query = app.world_mut().query_filtered::<&Transform, With<Enemy>>();
    let positions: Vec<Vec3> = query.iter(app.world()).map(|t| t.translation).collect();
    assert_eq!(positions.len(), 6);
    assert!(positions.iter().all(|p| *p == Vec3::new(-20.0, 0.0, 0.0)));
}

#[test]
fn each_death_counts_once() {
    let mut app = test_app(config(vec![wave(0, vec![entry("walker", 2)])]));
    run_until_phase(&mut app, WavePhase::AwaitingClear, 50);

    let target = living_enemies(&mut app)[0];
    kill(&mut app, target);
    kill(&mut app, target);
    app.world_mut().write_message(EntityDied { entity: target });
    app.update();

    assert_eq!(progress(&app).enemies_alive, 1);
    assert_eq!(app.world().resource::<CurrencyLedger>().current(), 10);

    app.world_mut().write_message(EntityDied { entity: target });
    app.update();

    assert_eq!(progress(&app).enemies_alive, 1);
    assert_eq!(app.world().resource::<CurrencyLedger>().current(), 10);
    assert_eq!(phase(&app), WavePhase::AwaitingClear);
}

#[test]
fn unresolvable_entry_does_not_block_the_wave() {
    let mut app = test_app(config(vec![wave(
        0,
        vec![entry("walker", 5), entry("ghost", 5)],
    )]));

    run_until_phase(&mut app, WavePhase::AwaitingClear, 50);

    let progress = progress(&app);
    assert_eq!(progress.wave_total, 10);
    assert_eq!(progress.enemies_alive, 5);
    assert_eq!(
        anomalies_matching(&app, |a| matches!(a, WaveAnomaly::UnresolvableEntry { count: 5, .. })),
        1
    );

    kill_all_enemies(&mut app);
    app.update();
    assert_eq!(phase(&app), WavePhase::AwaitingShopExit);
}

#[test]
fn shop_exit_timeout_moves_on_after_the_deadline() {
    let mut level = config(vec![
        wave(0, vec![entry("walker", 1)]),
        wave(0, vec![entry("walker", 1)]),
    ]);
    level.shop_poll_interval_frames = 30;
    level.shop_exit_timeout_frames = 2;
    level.wave_delay_frames = 100;
    let mut app = test_app(level);

    run_until_phase(&mut app, WavePhase::AwaitingClear, 200);
    kill_all_enemies(&mut app);
    app.update();
    assert_eq!(phase(&app), WavePhase::AwaitingShopExit);

    app.update();
    assert_eq!(phase(&app), WavePhase::AwaitingShopExit);
    app.update();
    assert_eq!(phase(&app), WavePhase::InterWaveDelay);

    assert_eq!(
        anomalies_matching(&app, |a| matches!(a, WaveAnomaly::ShopExitTimeout { .. })),
        1
    );
    assert_eq!(progress(&app).wave_index, 1);
}

#[test]
fn exit_trigger_releases_the_player() {
    let mut level = config(vec![
        wave(0, vec![entry("walker", 1)]),
        wave(0, vec![entry("walker", 1)]),
    ]);
    level.wave_delay_frames = 100;
    let mut app = test_app(level);

    run_until_phase(&mut app, WavePhase::AwaitingClear, 200);
    kill_all_enemies(&mut app);
    app.update();
    assert_eq!(phase(&app), WavePhase::AwaitingShopExit);

    let exit = Transform::from_xyz(3.0, 0.0, 3.0);
    app.world_mut().write_message(ShopExitRequest {
        destination: Some(exit),
    });
    app.update();

    assert_eq!(phase(&app), WavePhase::InterWaveDelay);
    assert!(!app.world().resource::<ShopGate>().is_occupied());
    let player = player(&mut app);
    assert_eq!(
        app.world().entity(player).get::<Transform>().map(|t| t.translation),
        Some(exit.translation)
    );
    assert_eq!(shop_visibility(&mut app), Some(Visibility::Hidden));
    assert_eq!(
        app.world().resource::<Collected>().updates.last(),
        Some(&WaveProgressUpdate::Preparing { number: 2 })
    );
}

#[test]
fn purchases_only_inside_the_shop() {
    let mut app = test_app(config(vec![wave(0, vec![entry("walker", 3)])]));
    run_until_phase(&mut app, WavePhase::AwaitingClear, 50);

    app.world_mut().resource_mut::<CurrencyLedger>().add(100);
    app.world_mut().write_message(PurchaseRequest {
        item: "medkit".to_string(),
    });
    app.update();
    assert_eq!(app.world().resource::<CurrencyLedger>().current(), 100);
    assert!(app.world().resource::<Collected>().purchases.is_empty());

    kill_all_enemies(&mut app);
    app.update();
    assert_eq!(phase(&app), WavePhase::AwaitingShopExit);

    app.world_mut().write_message(PurchaseRequest {
        item: "medkit".to_string(),
    });
    app.update();

    assert_eq!(app.world().resource::<CurrencyLedger>().current(), 105);
    let purchases = &app.world().resource::<Collected>().purchases;
    assert_eq!(purchases.len(), 1);
    assert_eq!(purchases[0].item.id, "medkit");
    assert_eq!(purchases[0].balance, 105);
}

#[test]
fn missing_reward_data_is_reported_not_fatal() {
    let mut app = test_app(config(vec![wave(0, vec![entry("silent", 2)])]));
    run_until_phase(&mut app, WavePhase::AwaitingClear, 50);

    kill_all_enemies(&mut app);
    app.update();

    assert_eq!(app.world().resource::<CurrencyLedger>().current(), 0);
    assert_eq!(
        anomalies_matching(&app, |a| matches!(a, WaveAnomaly::MissingReward { .. })),
        2
    );
    assert_eq!(phase(&app), WavePhase::AwaitingShopExit);
}

#[test]
fn no_spawn_points_halts_before_any_wave() {
    let mut level = config(vec![wave(0, vec![entry("walker", 1)])]);
    for point in &mut level.spawn_points {
        point.enabled = false;
    }
    let mut app = test_app(level);

    for _ in 0..20 {
        app.update();
    }

    assert_eq!(
        app.world().resource::<WaveOrchestrator>().halted(),
        Some(&HaltReason::Misconfigured(WaveConfigError::NoSpawnPoints))
    );
    assert!(living_enemies(&mut app).is_empty());
    assert_eq!(
        app.world().resource::<WaveProgressText>().headline,
        "Waves stopped"
    );
}

#[test]
fn player_death_ends_the_run() {
    let mut app = test_app(config(vec![wave(30, vec![entry("walker", 5)])]));
    run_until_phase(&mut app, WavePhase::Spawning, 50);
    app.update();

    let player = player(&mut app);
    kill(&mut app, player);
    app.update();

    assert_eq!(
        app.world().resource::<WaveOrchestrator>().halted(),
        Some(&HaltReason::GameOver)
    );
    assert!(app
        .world()
        .resource::<Collected>()
        .updates
        .contains(&WaveProgressUpdate::GameOver));

    let spawned = living_enemies(&mut app).len();
    for _ in 0..200 {
        app.update();
    }
    assert_eq!(living_enemies(&mut app).len(), spawned);
    assert_eq!(app.world().resource::<WaveProgressText>().headline, "GAME OVER");
}

#[test]
fn disabling_wave_mode_cancels_the_task() {
    let mut app = test_app(config(vec![wave(30, vec![entry("walker", 5)])]));
    run_until_phase(&mut app, WavePhase::Spawning, 50);

    app.insert_resource(WaveModeEnabled(false));
    app.update();
    let spawned = living_enemies(&mut app).len();
    for _ in 0..200 {
        app.update();
    }

    assert_eq!(living_enemies(&mut app).len(), spawned);
    assert_eq!(
        app.world().resource::<WaveOrchestrator>().halted(),
        Some(&HaltReason::Disabled)
    );
}

#[test]
fn vanished_enemy_releases_its_slot() {
    let mut app = test_app(config(vec![wave(0, vec![entry("walker", 2)])]));
    run_until_phase(&mut app, WavePhase::AwaitingClear, 50);

    let enemies = living_enemies(&mut app);
    app.world_mut().despawn(enemies[0]);
    app.update();

    assert_eq!(progress(&app).enemies_alive, 1);
    assert_eq!(progress(&app).total_killed, 0);
    assert_eq!(app.world().resource::<CurrencyLedger>().current(), 0);
    assert_eq!(
        anomalies_matching(&app, |a| matches!(a, WaveAnomaly::EnemyVanished { .. })),
        1
    );

    kill(&mut app, enemies[1]);
    app.update();
    assert_eq!(phase(&app), WavePhase::AwaitingShopExit);
}

#[test]
fn corpses_are_hidden_then_despawned() {
    let mut app = test_app(config(vec![wave(0, vec![entry("walker", 2)])]));
    run_until_phase(&mut app, WavePhase::AwaitingClear, 50);

    let target = living_enemies(&mut app)[0];
    kill(&mut app, target);
    app.update();

    let corpse = app.world().entity(target);
    assert!(corpse.contains::<Dead>());
    assert_eq!(corpse.get::<Visibility>(), Some(&Visibility::Hidden));

    for _ in 0..10 {
        app.update();
    }

    assert!(app.world().get_entity(target).is_err());
    assert_eq!(progress(&app).enemies_alive, 1);
    assert_eq!(app.world().resource::<LifecycleRegistry>().len(), 1);
    assert_eq!(
        anomalies_matching(&app, |a| matches!(a, WaveAnomaly::EnemyVanished { .. })),
        0
    );
}

#[test]
fn progress_text_tracks_the_wave() {
    let mut app = test_app(config(vec![wave(0, vec![entry("walker", 3)])]));
    run_until_phase(&mut app, WavePhase::AwaitingClear, 50);

    let text = app.world().resource::<WaveProgressText>().clone();
    assert_eq!(text.headline, "Wave 1 / 1");
    assert_eq!(text.detail, "Enemies remaining: 3");

    let target = living_enemies(&mut app)[0];
    kill(&mut app, target);
    app.update();

    let text = app.world().resource::<WaveProgressText>().clone();
    assert_eq!(text.detail, "Enemies remaining: 2");
    assert_eq!(text.currency, "Currency: 10");
}

#[test]
fn all_waves_cleared_completes() {
    let mut app = test_app(config(vec![
        wave(0, vec![entry("walker", 1)]),
        wave(0, vec![entry("walker", 2)]),
    ]));

    for _ in 0..2 {
        run_until_phase(&mut app, WavePhase::AwaitingClear, 200);
        kill_all_enemies(&mut app);
        app.update();
        assert_eq!(phase(&app), WavePhase::AwaitingShopExit);
        app.world_mut().write_message(ShopExitRequest::default());
        app.update();
    }

    assert_eq!(phase(&app), WavePhase::Completed);
    assert_eq!(progress(&app).total_killed, 3);
    assert_eq!(app.world().resource::<CurrencyLedger>().current(), 30);
    assert_eq!(
        app.world().resource::<WaveProgressText>().headline,
        "All waves completed!"
    );
}

#[test]
fn player_death_after_the_last_wave_keeps_the_result() {
    let mut app = test_app(config(vec![wave(0, vec![entry("walker", 1)])]));
    run_until_phase(&mut app, WavePhase::AwaitingClear, 50);
    kill_all_enemies(&mut app);
    app.update();
    app.world_mut().write_message(ShopExitRequest::default());
    app.update();
    assert_eq!(phase(&app), WavePhase::Completed);

    let player = player(&mut app);
    kill(&mut app, player);
    app.update();

    assert_eq!(app.world().resource::<WaveOrchestrator>().halted(), None);
    assert!(!app
        .world()
        .resource::<Collected>()
        .updates
        .contains(&WaveProgressUpdate::GameOver));
    assert_eq!(
        app.world().resource::<WaveProgressText>().headline,
        "All waves completed!"
    );
}

#[test]
fn second_player_death_is_not_announced_again() {
    let mut app = test_app(config(vec![wave(30, vec![entry("walker", 5)])]));
    run_until_phase(&mut app, WavePhase::Spawning, 50);

    let player = player(&mut app);
    kill(&mut app, player);
    app.update();
    app.world_mut().write_message(game::character::health::PlayerDied { entity: player });
    app.update();

    let game_overs = app
        .world()
        .resource::<Collected>()
        .updates
        .iter()
        .filter(|update| **update == WaveProgressUpdate::GameOver)
        .count();
    assert_eq!(game_overs, 1);
}

#[test]
fn enemy_type_without_health_falls_back_to_the_default() {
    let mut level = config(vec![wave(0, vec![entry("walker", 2)])]);
    level.enemies.insert(EnemyKind::new("husk"), EnemyStats { max_health: 0.0, ..stats(Some(5)) });
    level.default_enemy = Some(EnemyKind::new("walker"));
    level.waves[0].entries.push(entry("husk", 1));
    let mut app = test_app(level);

    run_until_phase(&mut app, WavePhase::AwaitingClear, 50);
    let mut query = app.world_mut().query::<&Enemy>();
    let kinds: Vec<EnemyKind> = query.iter(app.world()).map(|enemy| enemy.kind.clone()).collect();
    assert_eq!(kinds.len(), 3);
    assert!(kinds.iter().all(|kind| *kind == EnemyKind::new("walker")));

    kill_all_enemies(&mut app);
    app.update();
    assert_eq!(phase(&app), WavePhase::AwaitingShopExit);
}

#[test]
fn enemy_type_without_health_is_skipped_and_never_stalls() {
    let mut level = config(vec![wave(0, vec![entry("walker", 1)])]);
    if let Some(walker) = level.enemies.get_mut(&EnemyKind::new("walker")) {
        walker.max_health = 0.0;
    }
    level.waves[0].entries.push(entry("silent", 1));
    let mut app = test_app(level);

    run_until_phase(&mut app, WavePhase::AwaitingClear, 50);
    assert_eq!(progress(&app).enemies_alive, 1);
    assert_eq!(
        anomalies_matching(&app, |a| matches!(a, WaveAnomaly::UnresolvableEntry { count: 1, .. })),
        1
    );

    kill_all_enemies(&mut app);
    app.update();
    assert_eq!(phase(&app), WavePhase::AwaitingShopExit);
    assert_eq!(progress(&app).enemies_alive, 0);
}

#[test]
fn shop_gate_removed_during_the_stay_is_reported() {
    let mut level = config(vec![
        wave(0, vec![entry("walker", 1)]),
        wave(0, vec![entry("walker", 1)]),
    ]);
    level.wave_delay_frames = 100;
    let mut app = test_app(level);

    run_until_phase(&mut app, WavePhase::AwaitingClear, 200);
    kill_all_enemies(&mut app);
    app.update();
    assert_eq!(phase(&app), WavePhase::AwaitingShopExit);

    app.world_mut().remove_resource::<ShopGate>();
    for _ in 0..10 {
        app.update();
    }

    assert_eq!(phase(&app), WavePhase::InterWaveDelay);
    assert_eq!(
        anomalies_matching(&app, |a| matches!(a, WaveAnomaly::MissingShopGate { wave: 0 })),
        1
    );
}
