use arena_shooter::camera::{camera_offset, minimap_project};
use arena_shooter::compute::*;
use arena_shooter::config::*;
use arena_shooter::entities::*;
use arena_shooter::input::{InputState, MoveKey};
use arena_shooter::status::{report_status, StatusSnapshot};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn make_state_with(config: GameConfig) -> ArenaState {
    let player = new_player(&config);
    ArenaState {
        config,
        walls: Vec::new(),
        pickups: Vec::new(),
        enemies: Vec::new(),
        bullets: Vec::new(),
        player,
        remote_players: Default::default(),
        menu: MenuState::Closed,
        frame: 0,
    }
}

fn make_state() -> ArenaState {
    make_state_with(GameConfig::default())
}

fn wanderers_state() -> ArenaState {
    make_state_with(GameConfig::default().with_variant(Variant::Wanderers))
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn held(keys: &[MoveKey]) -> InputState {
    let mut input = InputState::new();
    for key in keys {
        input.press(*key);
    }
    input
}

fn firing_at(x: f32, y: f32) -> InputState {
    let mut input = InputState::new();
    input.set_pointer(x, y, (0.0, 0.0));
    input.fire_down();
    input
}

fn pickup_at(x: f32, y: f32, r: f32, hp: f32) -> Pickup {
    Pickup {
        x,
        y,
        r,
        color: (0, 255, 0),
        hp: Some(hp),
        xp: r.ceil() as u32,
    }
}

fn bullet_at(x: f32, y: f32, r: f32, life: Option<f32>) -> Bullet {
    Bullet {
        owner: "me".to_string(),
        x,
        y,
        vx: 0.0,
        vy: 0.0,
        r,
        life,
    }
}

/// Distance from the circle centre to the nearest point of the wall.
fn clearance(x: f32, y: f32, w: &Wall) -> f32 {
    let nx = x.clamp(w.x, w.x + w.w);
    let ny = y.clamp(w.y, w.y + w.h);
    ((x - nx).powi(2) + (y - ny).powi(2)).sqrt()
}

// ── init_state ────────────────────────────────────────────────────────────────

#[test]
fn init_state_player_at_world_centre() {
    let s = init_state(GameConfig::default(), &mut seeded_rng());
    assert_eq!(s.player.x, 2500.0);
    assert_eq!(s.player.y, 2500.0);
    assert_eq!(s.player.level, 1);
    assert_eq!(s.player.hp, s.player.max_hp);
    assert_eq!(s.menu, MenuState::Closed);
}

#[test]
fn init_state_populates_world() {
    let s = init_state(GameConfig::default(), &mut seeded_rng());
    assert_eq!(s.pickups.len(), s.config.pickups.count);
    assert!(s.walls.len() >= 4 && s.walls.len() <= 4 + 50);
    assert!(s.enemies.is_empty(), "classic rules have no wanderers");
    assert!(s.bullets.is_empty());
    assert!(s.remote_players.is_empty());
    // Nothing traps the player at spawn.
    assert!(!circle_hits_walls(s.player.x, s.player.y, s.player.r, &s.walls));
}

#[test]
fn init_state_pickups_avoid_walls_and_edges() {
    let s = init_state(GameConfig::default(), &mut seeded_rng());
    let blocked = s
        .pickups
        .iter()
        .filter(|d| rect_hits_walls(d.x - d.r, d.y - d.r, d.r * 2.0, d.r * 2.0, &s.walls))
        .count();
    // The bounded retry may give up on a handful, never on most.
    assert!(blocked < 10, "{} pickups inside walls", blocked);
    for d in &s.pickups {
        assert!(d.x >= 80.0 && d.x <= 4920.0);
        assert!(d.hp.is_some());
        assert_eq!(d.xp, d.r.ceil() as u32);
    }
}

#[test]
fn init_state_wanderers_spawns_enemies() {
    let config = GameConfig::default().with_variant(Variant::Wanderers);
    let s = init_state(config, &mut seeded_rng());
    assert_eq!(s.enemies.len(), 40);
    assert!(s.pickups.iter().all(|d| d.hp.is_none()));
}

#[test]
fn init_state_is_deterministic_per_seed() {
    let a = init_state(GameConfig::default(), &mut StdRng::seed_from_u64(7));
    let b = init_state(GameConfig::default(), &mut StdRng::seed_from_u64(7));
    assert_eq!(a.walls, b.walls);
    assert_eq!(a.pickups, b.pickups);
}

// ── step — idle frame ─────────────────────────────────────────────────────────

#[test]
fn idle_frame_changes_nothing_visible() {
    let s = init_state(GameConfig::default(), &mut seeded_rng());
    let s2 = step(&s, &InputState::new(), 0.016, &mut seeded_rng());
    assert_eq!((s2.player.x, s2.player.y), (2500.0, 2500.0));
    assert!(s2.bullets.is_empty());
    assert_eq!(s2.pickups.len(), s.pickups.len());
    assert_eq!(s2.frame, 1);
}

#[test]
fn step_does_not_mutate_original() {
    let s = make_state();
    let _ = step(&s, &held(&[MoveKey::Right]), 0.05, &mut seeded_rng());
    assert_eq!(s.player.x, 2500.0);
    assert_eq!(s.frame, 0);
}

// ── step — movement ───────────────────────────────────────────────────────────

#[test]
fn axial_movement_uses_speed_times_dt() {
    let s = make_state();
    let s2 = step(&s, &held(&[MoveKey::Right]), 0.05, &mut seeded_rng());
    assert!((s2.player.x - (2500.0 + 220.0 * 0.05)).abs() < 1e-3);
    assert_eq!(s2.player.y, 2500.0);
}

#[test]
fn delta_time_is_clamped() {
    let s = make_state();
    let s2 = step(&s, &held(&[MoveKey::Right]), 2.0, &mut seeded_rng());
    assert!((s2.player.x - (2500.0 + 220.0 * 0.05)).abs() < 1e-3);
}

#[test]
fn diagonal_is_normalized_under_classic_rules() {
    let s = make_state();
    let s2 = step(&s, &held(&[MoveKey::Right, MoveKey::Down]), 0.05, &mut seeded_rng());
    let dx = s2.player.x - 2500.0;
    let dy = s2.player.y - 2500.0;
    assert!((dx.hypot(dy) - 220.0 * 0.05).abs() < 1e-3);
}

#[test]
fn speed_upgrade_raises_velocity() {
    let mut s = make_state();
    s.player.stats.speed = 2;
    let s2 = step(&s, &held(&[MoveKey::Left]), 0.05, &mut seeded_rng());
    assert!((2500.0 - s2.player.x - (220.0 + 36.0) * 0.05).abs() < 1e-3);
}

#[test]
fn wanderers_use_fixed_unnormalized_steps() {
    let s = wanderers_state();
    // dt is ignored for the player under the fixed-step model.
    let s2 = step(&s, &held(&[MoveKey::Right, MoveKey::Down]), 0.001, &mut seeded_rng());
    assert_eq!(s2.player.x, 2504.0);
    assert_eq!(s2.player.y, 2504.0);
}

#[test]
fn moving_down_into_wall_top_stops_at_contact() {
    let mut s = make_state();
    s.walls.push(Wall { x: 200.0, y: 200.0, w: 600.0, h: 30.0 });
    s.player.x = 500.0;
    s.player.y = 175.0;
    let s2 = step(&s, &held(&[MoveKey::Down, MoveKey::Right]), 0.05, &mut seeded_rng());
    assert_eq!(s2.player.y, 200.0 - s.player.r);
    // The x half of the diagonal move is not affected by the wall.
    let expected_x = 500.0 + 220.0 * 0.05 / 2f32.sqrt();
    assert!((s2.player.x - expected_x).abs() < 1e-3);
}

#[test]
fn player_slides_along_wall_while_touching_it() {
    let mut s = make_state();
    s.walls.push(Wall { x: 200.0, y: 200.0, w: 600.0, h: 30.0 });
    s.player.x = 500.0;
    s.player.y = 182.0;
    let s2 = step(&s, &held(&[MoveKey::Right, MoveKey::Down]), 0.05, &mut seeded_rng());
    assert_eq!(s2.player.y, 182.0);
    assert!(s2.player.x > 500.0);
}

#[test]
fn walls_are_never_entered() {
    let mut rng = seeded_rng();
    let walls = vec![
        Wall { x: 1000.0, y: 1000.0, w: 400.0, h: 30.0 },
        Wall { x: 1200.0, y: 900.0, w: 30.0, h: 400.0 },
        Wall { x: 800.0, y: 1200.0, w: 30.0, h: 300.0 },
    ];
    let keys = [MoveKey::Up, MoveKey::Down, MoveKey::Left, MoveKey::Right];
    for _ in 0..200 {
        let mut s = make_state();
        s.walls = walls.clone();
        // Start somewhere clear of every wall.
        loop {
            s.player.x = rng.gen_range(700.0..1600.0);
            s.player.y = rng.gen_range(800.0..1600.0);
            if walls.iter().all(|w| clearance(s.player.x, s.player.y, w) > s.player.r) {
                break;
            }
        }
        let mut input = InputState::new();
        for key in keys {
            if rng.gen_bool(0.5) {
                input.press(key);
            }
        }
        for _ in 0..40 {
            s = step(&s, &input, 0.05, &mut rng);
            for w in &s.walls {
                assert!(
                    clearance(s.player.x, s.player.y, w) >= s.player.r - 1e-3,
                    "player at ({}, {}) overlaps {:?}",
                    s.player.x,
                    s.player.y,
                    w
                );
            }
        }
    }
}

#[test]
fn position_is_clamped_to_world() {
    let mut s = make_state();
    s.player.x = s.player.r + 3.0;
    s.player.y = 4990.0;
    let s2 = step(&s, &held(&[MoveKey::Left, MoveKey::Down]), 0.05, &mut seeded_rng());
    assert_eq!(s2.player.x, s.player.r + 2.0);
    assert_eq!(s2.player.y, 5000.0 - s.player.r - 2.0);
    assert!(s2.player.x >= s2.player.r && s2.player.x <= 5000.0 - s2.player.r);
}

// ── step — firing ─────────────────────────────────────────────────────────────

#[test]
fn cooldown_follows_reload_level_with_floor() {
    let combat = CombatConfig::default();
    assert!((fire_cooldown(&combat, 0) - 0.33).abs() < 1e-6);
    assert!((fire_cooldown(&combat, 1) - 0.297).abs() < 1e-6);
    assert!(fire_cooldown(&combat, 5) < fire_cooldown(&combat, 4));
    assert_eq!(fire_cooldown(&combat, 30), 0.08);
}

#[test]
fn second_shot_within_cooldown_is_rejected() {
    let s = make_state();
    let input = firing_at(3000.0, 2500.0);
    let s = step(&s, &input, 0.016, &mut seeded_rng());
    assert_eq!(s.bullets.len(), 1);
    let s = step(&s, &input, 0.1, &mut seeded_rng());
    assert_eq!(s.bullets.len(), 1);
}

#[test]
fn held_fire_repeats_after_cooldown() {
    let mut s = make_state();
    let input = firing_at(3000.0, 2500.0);
    s = step(&s, &input, 0.016, &mut seeded_rng());
    for _ in 0..10 {
        s = step(&s, &input, 0.05, &mut seeded_rng());
    }
    assert_eq!(s.bullets.len(), 2);
}

#[test]
fn bullet_spawns_at_player_edge_along_aim() {
    let s = make_state();
    let s2 = player_shoot(&s, (2500.0, 3000.0)); // straight down
    assert_eq!(s2.bullets.len(), 1);
    let b = &s2.bullets[0];
    assert_eq!(b.owner, "me");
    assert!((b.x - 2500.0).abs() < 1e-3);
    assert!((b.y - (2500.0 + 18.0 + 8.0 + 6.0)).abs() < 1e-3);
    assert!((b.vy - 700.0).abs() < 1e-3);
    assert_eq!(b.r, 8.0);
    assert_eq!(b.life, Some(1.2));
    assert!((s2.player.fire_cooldown - 0.33).abs() < 1e-6);
}

#[test]
fn shoot_blocked_while_cooling_down() {
    let mut s = make_state();
    s.player.fire_cooldown = 0.01;
    let s2 = player_shoot(&s, (0.0, 0.0));
    assert!(s2.bullets.is_empty());
}

#[test]
fn press_trigger_needs_a_fresh_click() {
    let s = wanderers_state();
    let mut input = firing_at(3000.0, 2500.0);
    let mut s = step(&s, &input, 0.05, &mut seeded_rng());
    assert_eq!(s.bullets.len(), 1);
    input.end_frame();
    for _ in 0..20 {
        s = step(&s, &input, 0.05, &mut seeded_rng());
    }
    assert_eq!(s.bullets.len(), 1, "holding the button fires only once");
    assert_eq!(s.bullets[0].life, None);
}

#[test]
fn aim_angle_points_at_pointer() {
    let s = make_state();
    let mut input = InputState::new();
    input.set_pointer(2500.0, 2000.0, (0.0, 0.0));
    let s2 = step(&s, &input, 0.016, &mut seeded_rng());
    assert!((s2.player.angle + std::f32::consts::FRAC_PI_2).abs() < 1e-4);
}

// ── step — bullets ────────────────────────────────────────────────────────────

#[test]
fn bullets_advance_and_expire() {
    let mut s = make_state();
    let mut b = bullet_at(1000.0, 1000.0, 8.0, Some(0.07));
    b.vx = 700.0;
    s.bullets.push(b);
    let s2 = step(&s, &InputState::new(), 0.05, &mut seeded_rng());
    assert_eq!(s2.bullets.len(), 1);
    assert!((s2.bullets[0].x - 1035.0).abs() < 1e-3);
    let s3 = step(&s2, &InputState::new(), 0.05, &mut seeded_rng());
    assert!(s3.bullets.is_empty());
}

#[test]
fn unbounded_bullets_leave_with_the_world() {
    let mut s = wanderers_state();
    let mut b = bullet_at(4990.0, 1000.0, 8.0, None);
    b.vx = 700.0;
    s.bullets.push(b);
    let s2 = step(&s, &InputState::new(), 0.05, &mut seeded_rng());
    assert!(s2.bullets.is_empty());
}

// ── step — hits ───────────────────────────────────────────────────────────────

#[test]
fn destroyed_pickup_is_replaced_in_the_same_step() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    for _ in 0..10 {
        s.pickups.push(place_pickup(&s.config, &s.walls, &mut rng));
    }
    s.pickups.push(pickup_at(1000.0, 1000.0, 10.0, 1.0));
    s.bullets.push(bullet_at(1000.0, 1000.0, 8.0, Some(1.0)));
    let before = s.pickups.len();

    let s2 = step(&s, &InputState::new(), 0.016, &mut rng);
    assert_eq!(s2.pickups.len(), before);
    assert!(!s2.pickups.iter().any(|d| d.x == 1000.0 && d.y == 1000.0));
    assert_eq!(s2.player.xp, 10);
}

#[test]
fn hits_erode_bullet_life_and_damage_by_radius() {
    let mut s = make_state();
    s.pickups.push(pickup_at(1000.0, 1000.0, 12.0, 12.0));
    s.bullets.push(bullet_at(1000.0, 1000.0, 12.0, Some(1.0)));
    let s2 = step(&s, &InputState::new(), 0.05, &mut seeded_rng());
    assert_eq!(s2.pickups[0].hp, Some(10.0)); // floor(12 / 5) = 2 damage
    let life = s2.bullets[0].life.unwrap();
    assert!((life - (1.0 - 0.05 - 0.15)).abs() < 1e-5);
}

#[test]
fn eroded_bullet_is_removed_when_life_runs_out() {
    let mut s = make_state();
    s.pickups.push(pickup_at(1000.0, 1000.0, 12.0, 50.0));
    s.bullets.push(bullet_at(1000.0, 1000.0, 8.0, Some(0.1)));
    let s2 = step(&s, &InputState::new(), 0.05, &mut seeded_rng());
    assert!(s2.bullets.is_empty());
    assert_eq!(s2.pickups[0].hp, Some(49.0));
}

#[test]
fn distant_pickups_are_untouched() {
    let mut s = make_state();
    s.pickups.push(pickup_at(1000.0, 1000.0, 10.0, 10.0));
    s.bullets.push(bullet_at(1100.0, 1000.0, 8.0, Some(1.0)));
    let s2 = step(&s, &InputState::new(), 0.016, &mut seeded_rng());
    assert_eq!(s2.pickups[0].hp, Some(10.0));
    assert_eq!(s2.bullets.len(), 1);
}

#[test]
fn single_hit_bullet_kills_enemy_and_disappears() {
    let mut s = wanderers_state();
    s.config.enemies.turn_chance = 0.0;
    s.enemies.push(Enemy {
        x: 1000.0,
        y: 1000.0,
        r: 12.0,
        color: (255, 0, 0),
        speed: 0.0,
        direction: 0.0,
        hp: 1.0,
        xp: 25,
    });
    s.enemies.push(Enemy {
        x: 3000.0,
        y: 3000.0,
        r: 12.0,
        color: (255, 0, 0),
        speed: 0.0,
        direction: 0.0,
        hp: 5.0,
        xp: 25,
    });
    s.bullets.push(bullet_at(1000.0, 1000.0, 8.0, None));
    let s2 = step(&s, &InputState::new(), 0.016, &mut seeded_rng());
    assert!(s2.bullets.is_empty());
    assert_eq!(s2.enemies.len(), 1);
    assert_eq!(s2.enemies[0].x, 3000.0);
    assert_eq!(s2.player.xp, 25);
}

#[test]
fn single_hit_bullet_only_damages_one_target() {
    let mut s = wanderers_state();
    s.config.enemies.turn_chance = 0.0;
    for _ in 0..2 {
        s.enemies.push(Enemy {
            x: 1000.0,
            y: 1000.0,
            r: 12.0,
            color: (255, 0, 0),
            speed: 0.0,
            direction: 0.0,
            hp: 5.0,
            xp: 25,
        });
    }
    s.bullets.push(bullet_at(1000.0, 1000.0, 8.0, None));
    let s2 = step(&s, &InputState::new(), 0.016, &mut seeded_rng());
    let damaged = s2.enemies.iter().filter(|e| e.hp < 5.0).count();
    assert_eq!(damaged, 1);
}

// ── step — touch collection ───────────────────────────────────────────────────

#[test]
fn wanderers_collect_pickups_by_touch() {
    let mut s = wanderers_state();
    s.pickups.push(Pickup {
        hp: None,
        ..pickup_at(2510.0, 2500.0, 8.0, 0.0)
    });
    s.pickups.push(Pickup {
        hp: None,
        ..pickup_at(4000.0, 4000.0, 8.0, 0.0)
    });
    let s2 = step(&s, &InputState::new(), 0.016, &mut seeded_rng());
    assert_eq!(s2.pickups.len(), 1, "touched pickup is not respawned");
    assert_eq!(s2.player.xp, 8);
}

#[test]
fn classic_rules_ignore_touch() {
    let mut s = make_state();
    s.pickups.push(pickup_at(2510.0, 2500.0, 8.0, 8.0));
    let s2 = step(&s, &InputState::new(), 0.016, &mut seeded_rng());
    assert_eq!(s2.pickups.len(), 1);
    assert_eq!(s2.player.xp, 0);
}

// ── Levelling ─────────────────────────────────────────────────────────────────

#[test]
fn exponential_curve_values() {
    let curve = Ruleset::classic().xp_curve;
    assert_eq!(xp_for_level(curve, 1), 20);
    assert_eq!(xp_for_level(curve, 2), 25);
    assert_eq!(xp_for_level(curve, 3), 31);
    assert_eq!(xp_for_level(curve, 4), 39);
}

#[test]
fn linear_curve_values() {
    let curve = Ruleset::wanderers().xp_curve;
    assert_eq!(xp_for_level(curve, 1), 100);
    assert_eq!(xp_for_level(curve, 7), 700);
}

#[test]
fn thresholds_increase_with_level() {
    for curve in [Ruleset::classic().xp_curve, Ruleset::wanderers().xp_curve] {
        for level in 1..40 {
            assert!(xp_for_level(curve, level + 1) > xp_for_level(curve, level));
        }
    }
}

#[test]
fn threshold_is_never_zero() {
    let curve = XpCurve::Exponential {
        base: 0.5,
        growth: 1.0,
    };
    assert_eq!(xp_for_level(curve, 1), 1);
}

#[test]
fn level_up_subtracts_exact_threshold() {
    let s = make_state();
    let mut p = s.player.clone();
    p.xp = 23;
    let p2 = apply_level_ups(&s.config, &p);
    assert_eq!(p2.level, 2);
    assert_eq!(p2.xp, 3);
    assert_eq!(p2.points, 1);
    assert_eq!(p2.max_hp, 105.0);
    assert_eq!(p2.hp, 105.0);
}

#[test]
fn multi_level_jump_in_one_step() {
    let mut s = make_state();
    s.player.xp = 20 + 25 + 5;
    let s2 = step(&s, &InputState::new(), 0.016, &mut seeded_rng());
    assert_eq!(s2.player.level, 3);
    assert_eq!(s2.player.xp, 5);
    assert_eq!(s2.player.points, 2);
    assert_eq!(s2.player.max_hp, 110.0);
}

#[test]
fn level_up_hp_never_exceeds_max() {
    let s = make_state();
    let mut p = s.player.clone();
    p.hp = 100.0;
    p.max_hp = 200.0;
    p.xp = 20;
    let p2 = apply_level_ups(&s.config, &p);
    assert_eq!(p2.max_hp, 205.0);
    assert_eq!(p2.hp, 105.0);
}

#[test]
fn wanderers_level_without_points() {
    let mut s = wanderers_state();
    s.player.xp = 100;
    let s2 = step(&s, &InputState::new(), 0.016, &mut seeded_rng());
    assert_eq!(s2.player.level, 2);
    assert_eq!(s2.player.points, 0);
    assert_eq!(s2.player.xp, 0);
}

#[test]
fn level_never_decreases() {
    let mut s = init_state(GameConfig::default(), &mut seeded_rng());
    let mut rng = seeded_rng();
    let input = firing_at(3000.0, 2600.0);
    let mut last = s.player.level;
    for _ in 0..200 {
        s = step(&s, &input, 0.05, &mut rng);
        assert!(s.player.level >= last);
        last = s.player.level;
    }
}

// ── Upgrade menu ──────────────────────────────────────────────────────────────

#[test]
fn toggle_menu_flips_state() {
    let s = make_state();
    let s2 = toggle_menu(&s);
    assert_eq!(s2.menu, MenuState::Open);
    assert_eq!(toggle_menu(&s2).menu, MenuState::Closed);
}

#[test]
fn toggle_menu_is_inert_without_upgrades() {
    let s = wanderers_state();
    assert_eq!(toggle_menu(&s).menu, MenuState::Closed);
}

#[test]
fn upgrade_without_points_is_a_no_op() {
    let s = make_state();
    let s2 = apply_upgrade(&s, Stat::Reload);
    assert_eq!(s2.player.stats, Stats::default());
    assert_eq!(s2.player.points, 0);
}

#[test]
fn size_upgrade_grows_bullets_twice() {
    let mut s = make_state();
    s.player.points = 1;
    let s2 = apply_upgrade(&s, Stat::Size);
    assert_eq!(s2.player.points, 0);
    assert_eq!(s2.player.stats.size, 1);
    assert_eq!(s2.player.bullet_size, 9.0);
    assert_eq!(bullet_radius(&s2.config, &s2.player), 11.0);
}

#[test]
fn hp_upgrade_raises_max_and_heals() {
    let mut s = make_state();
    s.player.points = 2;
    s.player.hp = 40.0;
    let s2 = apply_upgrade(&s, Stat::Hp);
    assert_eq!(s2.player.stats.hp, 1);
    assert_eq!(s2.player.max_hp, 110.0);
    assert_eq!(s2.player.hp, 110.0);
    assert_eq!(s2.player.points, 1);
}

#[test]
fn reload_and_speed_upgrades_only_bump_counters() {
    let mut s = make_state();
    s.player.points = 2;
    let s2 = apply_upgrade(&apply_upgrade(&s, Stat::Reload), Stat::Speed);
    assert_eq!(s2.player.stats.reload, 1);
    assert_eq!(s2.player.stats.speed, 1);
    assert_eq!(s2.player.points, 0);
    assert_eq!(player_speed(&s2.config, &s2.player), 238.0);
}

// ── Debug adjustments ─────────────────────────────────────────────────────────

#[test]
fn debug_keys_tune_speed_and_size() {
    let s = wanderers_state();
    let faster = debug_adjust(&s, DebugAdjust::FasterMovement);
    assert_eq!(faster.player.base_speed, 240.0);
    let bigger = debug_adjust(&s, DebugAdjust::BiggerBullets);
    assert_eq!(bigger.player.bullet_size, 9.0);
}

#[test]
fn faster_movement_lengthens_fixed_steps() {
    let s = wanderers_state();
    let normal = step(&s, &held(&[MoveKey::Right]), 0.016, &mut seeded_rng());

    let mut boosted = s.clone();
    for _ in 0..5 {
        boosted = debug_adjust(&boosted, DebugAdjust::FasterMovement);
    }
    assert_eq!(boosted.player.base_speed, 320.0);
    let boosted = step(&boosted, &held(&[MoveKey::Right]), 0.016, &mut seeded_rng());

    let normal_dx = normal.player.x - 2500.0;
    let boosted_dx = boosted.player.x - 2500.0;
    assert_eq!(normal_dx, 4.0);
    assert!(boosted_dx > normal_dx);
    assert!((boosted_dx - 4.0 * 320.0 / 220.0).abs() < 1e-3);
}

#[test]
fn slower_movement_shortens_fixed_steps() {
    let s = debug_adjust(&wanderers_state(), DebugAdjust::SlowerMovement);
    let s2 = step(&s, &held(&[MoveKey::Left]), 0.016, &mut seeded_rng());
    assert!((2500.0 - s2.player.x - 4.0 * 200.0 / 220.0).abs() < 1e-3);
}

#[test]
fn debug_keys_respect_floors() {
    let mut s = wanderers_state();
    s.player.base_speed = 50.0;
    s.player.bullet_size = 2.5;
    let s2 = debug_adjust(&debug_adjust(&s, DebugAdjust::SlowerMovement), DebugAdjust::SmallerBullets);
    assert_eq!(s2.player.base_speed, 40.0);
    assert_eq!(s2.player.bullet_size, 2.0);
}

#[test]
fn debug_keys_disabled_in_classic() {
    let s = make_state();
    let s2 = debug_adjust(&s, DebugAdjust::FasterMovement);
    assert_eq!(s2.player.base_speed, 220.0);
}

// ── Wandering enemies ─────────────────────────────────────────────────────────

#[test]
fn enemies_walk_along_their_heading() {
    let mut s = wanderers_state();
    s.config.enemies.turn_chance = 0.0;
    s.enemies.push(Enemy {
        x: 1000.0,
        y: 1000.0,
        r: 12.0,
        color: (255, 0, 0),
        speed: 50.0,
        direction: 0.0,
        hp: 5.0,
        xp: 25,
    });
    let s2 = step(&s, &InputState::new(), 0.05, &mut seeded_rng());
    assert!((s2.enemies[0].x - 1002.5).abs() < 1e-3);
    assert!((s2.enemies[0].y - 1000.0).abs() < 1e-3);
    assert_eq!(s2.enemies[0].direction, 0.0);
}

#[test]
fn enemies_turn_when_blocked_and_stay_in_world() {
    let mut s = wanderers_state();
    s.config.enemies.turn_chance = 0.0;
    s.enemies.push(Enemy {
        x: 4985.0,
        y: 1000.0,
        r: 12.0,
        color: (255, 0, 0),
        speed: 90.0,
        direction: 0.0,
        hp: 5.0,
        xp: 25,
    });
    let mut rng = seeded_rng();
    let mut s2 = step(&s, &InputState::new(), 0.05, &mut rng);
    assert!(s2.enemies[0].x <= 5000.0 - 12.0);
    assert_ne!(s2.enemies[0].direction, 0.0);
    for _ in 0..100 {
        s2 = step(&s2, &InputState::new(), 0.05, &mut rng);
        let e = &s2.enemies[0];
        assert!(e.x >= e.r && e.x <= 5000.0 - e.r);
        assert!(e.y >= e.r && e.y <= 5000.0 - e.r);
    }
}

// ── Camera & minimap ──────────────────────────────────────────────────────────

#[test]
fn minimap_projection_ignores_camera() {
    let s = make_state();
    let world = (s.world_width(), s.world_height());
    let here = minimap_project((s.player.x, s.player.y), world, (240.0, 120.0));
    assert_eq!(here, (120.0, 60.0));
    let _moved = camera_offset(CameraMode::Clamped, (100.0, 100.0), world, (800.0, 600.0));
    assert_eq!(
        minimap_project((s.player.x, s.player.y), world, (240.0, 120.0)),
        here
    );
}

// ── Status reporting ──────────────────────────────────────────────────────────

#[test]
fn status_mirrors_player_progress() {
    let mut s = make_state();
    s.player.xp = 10;
    s.player.points = 3;
    s.player.stats.reload = 2;
    let mut status = StatusSnapshot::default();
    report_status(&s, &mut status);
    assert_eq!(status.name, "Tanky");
    assert_eq!(status.level, 1);
    assert_eq!(status.xp, 10);
    assert_eq!(status.xp_needed, 20);
    assert_eq!(status.points, 3);
    assert_eq!(status.stats.reload, 2);
    assert_eq!(status.max_hp, 100.0);
    assert!((status.xp_fraction() - 0.5).abs() < 1e-6);
}
