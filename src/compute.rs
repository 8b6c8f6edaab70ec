/// Simulation: world setup, the per-frame step, and the player actions that
/// can happen between frames.
///
/// Transitions borrow the current `ArenaState` and return the next one. The
/// only side effects are draws from the caller's RNG and tracing output.
use std::f32::consts::TAU;

use rand::Rng;

use crate::config::{
    CombatConfig, GameConfig, MovementModel, ProjectileHits, XpCurve,
};
use crate::constants::*;
use crate::entities::{
    ArenaState, Bullet, Enemy, MenuState, Pickup, Player, Stat, Stats, Wall,
};
use crate::input::InputState;
use crate::spatial::SpatialGrid;

// ── Progression tables ───────────────────────────────────────────────────────

/// Experience needed to advance past `level`. Never 0, so level-up loops end.
pub fn xp_for_level(curve: XpCurve, level: u32) -> u32 {
    let level = level.max(1);
    let needed = match curve {
        XpCurve::Exponential { base, growth } => {
            (base * growth.powi(level as i32 - 1)).floor() as u32
        }
        XpCurve::Linear { per_level } => level.saturating_mul(per_level),
    };
    needed.max(1)
}

/// Seconds between shots for a player's reload level.
pub fn fire_cooldown(combat: &CombatConfig, reload_level: u32) -> f32 {
    let decayed = combat.base_fire_rate * combat.reload_decay.powi(reload_level as i32);
    decayed.max(combat.min_fire_cooldown)
}

pub fn player_speed(config: &GameConfig, player: &Player) -> f32 {
    player.base_speed + player.stats.speed as f32 * config.player.speed_per_level
}

pub fn bullet_radius(config: &GameConfig, player: &Player) -> f32 {
    player.bullet_size + player.stats.size as f32 * config.combat.size_per_level
}

/// Damage dealt per frame of overlap by a bullet of radius `r`.
pub fn bullet_damage(combat: &CombatConfig, r: f32) -> f32 {
    (r / combat.damage_divisor).floor().max(1.0)
}

// ── Geometry ─────────────────────────────────────────────────────────────────

/// True when the circle strictly overlaps the wall. Touching is allowed, so a
/// player resting against a wall can still slide along it.
pub fn circle_overlaps_wall(cx: f32, cy: f32, r: f32, wall: &Wall) -> bool {
    let nx = cx.clamp(wall.x, wall.x + wall.w);
    let ny = cy.clamp(wall.y, wall.y + wall.h);
    let dx = cx - nx;
    let dy = cy - ny;
    dx * dx + dy * dy < r * r
}

pub fn circle_hits_walls(cx: f32, cy: f32, r: f32, walls: &[Wall]) -> bool {
    walls.iter().any(|w| circle_overlaps_wall(cx, cy, r, w))
}

/// Rectangle/wall test used for spawn placement. Touching counts as a hit.
pub fn rect_hits_walls(x: f32, y: f32, w: f32, h: f32, walls: &[Wall]) -> bool {
    walls
        .iter()
        .any(|wall| !(x + w < wall.x || x > wall.x + wall.w || y + h < wall.y || y > wall.y + wall.h))
}

pub fn circles_overlap(ax: f32, ay: f32, ar: f32, bx: f32, by: f32, br: f32) -> bool {
    let dx = ax - bx;
    let dy = ay - by;
    dx * dx + dy * dy <= (ar + br) * (ar + br)
}

/// Furthest coordinate along one axis a circle can reach moving from `from`
/// to `to`. Each span is `(lo, hi)` on the moving axis and `(across_lo,
/// across_hi)` on the other; `across` is the circle's fixed coordinate.
///
/// The move stops at the contact point of the first wall in the way. A circle
/// that already overlaps a wall may only move away from that wall's centre.
fn sweep_axis(
    from: f32,
    to: f32,
    across: f32,
    r: f32,
    spans: impl Iterator<Item = ((f32, f32), (f32, f32))>,
) -> f32 {
    let mut target = to;
    for ((lo, hi), (across_lo, across_hi)) in spans {
        let d = (across_lo - across).max(across - across_hi).max(0.0);
        if d >= r {
            continue;
        }
        // Half-chord: how far the wall's face reaches into the circle's path.
        let reach = (r * r - d * d).sqrt();
        let near = lo - reach;
        let far = hi + reach;
        let inside = from > near && from < far;
        if to > from {
            if from <= near {
                target = target.min(near);
            } else if inside && from < (lo + hi) / 2.0 {
                target = target.min(from);
            }
        } else if to < from {
            if from >= far {
                target = target.max(far);
            } else if inside && from > (lo + hi) / 2.0 {
                target = target.max(from);
            }
        }
    }
    target
}

/// Move a circle by `(dx, dy)`, resolving x then y independently against
/// `walls` so it slides along them instead of stopping dead.
pub fn move_circle(x: f32, y: f32, r: f32, dx: f32, dy: f32, walls: &[Wall]) -> (f32, f32) {
    let nx = sweep_axis(
        x,
        x + dx,
        y,
        r,
        walls.iter().map(|w| ((w.x, w.x + w.w), (w.y, w.y + w.h))),
    );
    let ny = sweep_axis(
        y,
        y + dy,
        nx,
        r,
        walls.iter().map(|w| ((w.y, w.y + w.h), (w.x, w.x + w.w))),
    );
    (nx, ny)
}

/// Keep a circle inside the world with `margin` to spare.
pub fn clamp_to_world(x: f32, y: f32, r: f32, margin: f32, world: (f32, f32)) -> (f32, f32) {
    let inset = r + margin;
    (
        x.clamp(inset, (world.0 - inset).max(inset)),
        y.clamp(inset, (world.1 - inset).max(inset)),
    )
}

/// Uniform sample in `[lo, hi)`; the midpoint when the range is empty.
fn sample(rng: &mut impl Rng, lo: f32, hi: f32) -> f32 {
    if hi > lo {
        rng.gen_range(lo..hi)
    } else {
        (lo + hi) / 2.0
    }
}

// ── Constructors ─────────────────────────────────────────────────────────────

pub fn new_player(config: &GameConfig) -> Player {
    Player {
        id: LOCAL_PLAYER_ID.to_string(),
        name: config.player.name.clone(),
        x: config.world.width / 2.0,
        y: config.world.height / 2.0,
        r: config.player.radius,
        vx: 0.0,
        vy: 0.0,
        angle: 0.0,
        color: (0x9d, 0xd0, 0xff),
        hp: config.player.max_hp,
        max_hp: config.player.max_hp,
        xp: 0,
        level: 1,
        points: 0,
        stats: Stats::default(),
        fire_cooldown: 0.0,
        base_speed: config.player.base_speed,
        base_fire_rate: config.combat.base_fire_rate,
        bullet_size: config.combat.bullet_size,
    }
}

/// Border walls just outside the world plus randomly placed horizontal and
/// vertical bars. Bars that would trap the spawn point are dropped.
pub fn generate_walls(config: &GameConfig, rng: &mut impl Rng) -> Vec<Wall> {
    let (ww, wh) = (config.world.width, config.world.height);
    let t = BORDER_WALL_THICKNESS;
    let mut walls = vec![
        Wall { x: -t, y: -t, w: ww + 2.0 * t, h: t },
        Wall { x: -t, y: wh, w: ww + 2.0 * t, h: t },
        Wall { x: -t, y: 0.0, w: t, h: wh },
        Wall { x: ww, y: 0.0, w: t, h: wh },
    ];

    let (sx, sy) = (ww / 2.0, wh / 2.0);
    let clearance = config.player.radius * 2.0;
    for horizontal in [true, false] {
        for _ in 0..config.world.walls_per_orientation {
            let placed = (0..WALL_PLACEMENT_ATTEMPTS).find_map(|_| {
                let x = sample(rng, WALL_EDGE_INSET, ww - 2.0 * WALL_EDGE_INSET);
                let y = sample(rng, WALL_EDGE_INSET, wh - 2.0 * WALL_EDGE_INSET);
                let length = sample(rng, WALL_MIN_LENGTH, WALL_MAX_LENGTH);
                let wall = if horizontal {
                    Wall { x, y, w: length, h: WALL_THICKNESS }
                } else {
                    Wall { x, y, w: WALL_THICKNESS, h: length }
                };
                (!circle_overlaps_wall(sx, sy, clearance, &wall)).then_some(wall)
            });
            match placed {
                Some(wall) => walls.push(wall),
                None => tracing::debug!("dropped a wall that kept covering the spawn point"),
            }
        }
    }
    walls
}

/// A new xp dot somewhere wall-free. After `placement_attempts` rejected
/// candidates the last one is used anyway so the population never shrinks.
pub fn place_pickup(config: &GameConfig, walls: &[Wall], rng: &mut impl Rng) -> Pickup {
    let pc = &config.pickups;
    let attempts = pc.placement_attempts.max(1);
    let mut attempt = 0;
    loop {
        attempt += 1;
        let x = sample(rng, pc.edge_inset, config.world.width - pc.edge_inset);
        let y = sample(rng, pc.edge_inset, config.world.height - pc.edge_inset);
        let r = sample(rng, pc.min_radius, pc.max_radius);
        let blocked = rect_hits_walls(x - r, y - r, r * 2.0, r * 2.0, walls);
        if !blocked || attempt >= attempts {
            if blocked {
                tracing::debug!("no wall-free spot after {} attempts, placing pickup anyway", attempts);
            }
            return Pickup {
                x,
                y,
                r,
                color: PICKUP_COLOR,
                hp: config.rules.shootable_pickups.then_some(r),
                xp: r.ceil() as u32,
            };
        }
    }
}

pub fn spawn_enemy(config: &GameConfig, walls: &[Wall], rng: &mut impl Rng) -> Enemy {
    let ec = &config.enemies;
    let inset = config.pickups.edge_inset;
    let mut attempt = 0;
    loop {
        attempt += 1;
        let r = sample(rng, ec.min_radius, ec.max_radius);
        let x = sample(rng, inset, config.world.width - inset);
        let y = sample(rng, inset, config.world.height - inset);
        if !circle_hits_walls(x, y, r, walls) || attempt >= config.pickups.placement_attempts.max(1)
        {
            return Enemy {
                x,
                y,
                r,
                color: ENEMY_COLOR,
                speed: sample(rng, ec.min_speed, ec.max_speed),
                direction: sample(rng, 0.0, TAU),
                hp: (r * ec.hp_per_radius).ceil(),
                xp: ec.xp,
            };
        }
    }
}

/// Build the initial world for `config`.
pub fn init_state(config: GameConfig, rng: &mut impl Rng) -> ArenaState {
    let walls = generate_walls(&config, rng);
    let pickups = (0..config.pickups.count)
        .map(|_| place_pickup(&config, &walls, rng))
        .collect();
    let enemies = if config.rules.wandering_enemies {
        (0..config.enemies.count)
            .map(|_| spawn_enemy(&config, &walls, rng))
            .collect()
    } else {
        Vec::new()
    };
    let player = new_player(&config);
    tracing::info!(
        "World {}x{}: {} walls, {} pickups, {} enemies",
        config.world.width,
        config.world.height,
        walls.len(),
        config.pickups.count,
        config.rules.wandering_enemies as usize * config.enemies.count,
    );
    ArenaState {
        config,
        walls,
        pickups,
        enemies,
        bullets: Vec::new(),
        player,
        remote_players: Default::default(),
        menu: MenuState::Closed,
        frame: 0,
    }
}

// ── Input-driven state transitions (pure) ───────────────────────────────────

/// Fire towards `aim` if the cooldown allows it.
pub fn player_shoot(state: &ArenaState, aim: (f32, f32)) -> ArenaState {
    let p = &state.player;
    if p.fire_cooldown > 0.0 {
        return state.clone();
    }
    let config = &state.config;
    let angle = (aim.1 - p.y).atan2(aim.0 - p.x);
    let size = bullet_radius(config, p);
    let offset = p.r + size + config.combat.muzzle_gap;
    let (sin, cos) = angle.sin_cos();
    let bullet = Bullet {
        owner: p.id.clone(),
        x: p.x + cos * offset,
        y: p.y + sin * offset,
        vx: cos * config.combat.bullet_speed,
        vy: sin * config.combat.bullet_speed,
        r: size,
        life: config.rules.bullet_lifetime.then_some(config.combat.bullet_lifetime),
    };

    let mut bullets = state.bullets.clone();
    bullets.push(bullet);
    ArenaState {
        player: Player {
            fire_cooldown: fire_cooldown(&config.combat, p.stats.reload),
            ..p.clone()
        },
        bullets,
        ..state.clone()
    }
}

pub fn toggle_menu(state: &ArenaState) -> ArenaState {
    if !state.config.rules.upgrade_menu {
        return state.clone();
    }
    let menu = match state.menu {
        MenuState::Closed => MenuState::Open,
        MenuState::Open => MenuState::Closed,
    };
    tracing::debug!("Upgrade menu {:?}", menu);
    ArenaState {
        menu,
        ..state.clone()
    }
}

/// Spend one point on `stat`. No-op without points or without an upgrade menu.
pub fn apply_upgrade(state: &ArenaState, stat: Stat) -> ArenaState {
    let p = &state.player;
    if !state.config.rules.upgrade_menu || p.points == 0 {
        return state.clone();
    }
    let mut player = Player {
        points: p.points - 1,
        ..p.clone()
    };
    match stat {
        Stat::Size => {
            player.stats.size += 1;
            player.bullet_size += SIZE_UPGRADE_BONUS;
        }
        Stat::Reload => player.stats.reload += 1,
        Stat::Speed => player.stats.speed += 1,
        Stat::Hp => {
            player.stats.hp += 1;
            player.max_hp += state.config.player.hp_per_upgrade;
            player.hp = player.max_hp;
        }
    }
    tracing::info!(
        "Upgraded {} to level {} ({} points left)",
        stat.label(),
        player.stats.get(stat),
        player.points
    );
    ArenaState {
        player,
        ..state.clone()
    }
}

/// Direct tuning keys available in rulesets without an upgrade menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DebugAdjust {
    SlowerMovement,
    FasterMovement,
    SmallerBullets,
    BiggerBullets,
}

pub fn debug_adjust(state: &ArenaState, adjust: DebugAdjust) -> ArenaState {
    if !state.config.rules.debug_keys {
        return state.clone();
    }
    let p = &state.player;
    let player = match adjust {
        DebugAdjust::SlowerMovement => Player {
            base_speed: (p.base_speed - DEBUG_SPEED_STEP).max(DEBUG_MIN_SPEED),
            ..p.clone()
        },
        DebugAdjust::FasterMovement => Player {
            base_speed: p.base_speed + DEBUG_SPEED_STEP,
            ..p.clone()
        },
        DebugAdjust::SmallerBullets => Player {
            bullet_size: (p.bullet_size - DEBUG_SIZE_STEP).max(DEBUG_MIN_BULLET_SIZE),
            ..p.clone()
        },
        DebugAdjust::BiggerBullets => Player {
            bullet_size: p.bullet_size + DEBUG_SIZE_STEP,
            ..p.clone()
        },
    };
    tracing::debug!(
        "Debug adjust {:?}: speed {}, bullet size {}",
        adjust,
        player.base_speed,
        player.bullet_size
    );
    ArenaState {
        player,
        ..state.clone()
    }
}

// ── Per-frame step (RNG is injected) ──────────────────────────────────────

/// Advance the simulation by one frame of `dt` seconds (clamped to
/// `world.max_dt`). All randomness comes through `rng`, so a seeded RNG gives
/// a deterministic run.
pub fn step(state: &ArenaState, input: &InputState, dt: f32, rng: &mut impl Rng) -> ArenaState {
    let dt = dt.clamp(0.0, state.config.world.max_dt);
    let mut next = state.clone();
    next.frame += 1;

    // ── 1–3. Player movement ─────────────────────────────────────────────────
    move_player(&mut next, input, dt);

    // ── 4. Aim and fire ──────────────────────────────────────────────────────
    let (px, py) = (next.player.x, next.player.y);
    next.player.angle = (input.world_y - py).atan2(input.world_x - px);
    if input.fire_requested(next.config.rules.fire_trigger) {
        next = player_shoot(&next, (input.world_x, input.world_y));
    }
    next.player.fire_cooldown = (next.player.fire_cooldown - dt).max(0.0);

    // ── 5. Advance bullets ───────────────────────────────────────────────────
    let (ww, wh) = (next.world_width(), next.world_height());
    for b in &mut next.bullets {
        b.x += b.vx * dt;
        b.y += b.vy * dt;
        if let Some(life) = b.life.as_mut() {
            *life -= dt;
        }
    }
    next.bullets
        .retain(|b| b.life.is_some() || (b.x >= 0.0 && b.x <= ww && b.y >= 0.0 && b.y <= wh));

    // ── 6. Bullets ↔ targets ─────────────────────────────────────────────────
    let gained = resolve_bullet_hits(&mut next, rng);

    // ── 7. Touch collection ──────────────────────────────────────────────────
    let touched = collect_touched_pickups(&mut next, rng);
    next.player.xp += gained + touched;

    // ── 8. Level-ups ─────────────────────────────────────────────────────────
    let before = next.player.level;
    next.player = apply_level_ups(&next.config, &next.player);
    if next.player.level > before {
        tracing::info!(
            "Level up: {} -> {} (points: {})",
            before,
            next.player.level,
            next.player.points
        );
    }

    // ── 9. Wandering enemies ─────────────────────────────────────────────────
    wander_enemies(&mut next, dt, rng);

    next
}

fn move_player(next: &mut ArenaState, input: &InputState, dt: f32) {
    let rules = &next.config.rules;
    let (ax, ay) = input.axis();
    let len = if rules.normalize_diagonal {
        ax.hypot(ay)
    } else {
        0.0
    };
    let len = if len > 0.0 { len } else { 1.0 };
    let (ux, uy) = (ax / len, ay / len);

    let speed = player_speed(&next.config, &next.player);
    let (dx, dy) = match rules.movement {
        MovementModel::DeltaTime => (ux * speed * dt, uy * speed * dt),
        // Stride grows with speed relative to the configured base speed.
        MovementModel::FixedStep { step } => {
            let stride = step * speed / next.config.player.base_speed;
            (ux * stride, uy * stride)
        }
    };

    let p = &next.player;
    let (x, y) = move_circle(p.x, p.y, p.r, dx, dy, &next.walls);
    let (x, y) = clamp_to_world(
        x,
        y,
        p.r,
        next.config.world.edge_margin,
        (next.config.world.width, next.config.world.height),
    );
    next.player = Player {
        x,
        y,
        vx: ux * speed,
        vy: uy * speed,
        ..next.player.clone()
    };
}

/// Apply damage from every overlapping bullet/target pair and return the xp
/// earned from kills. Destroyed pickups are replaced when the rules say so.
fn resolve_bullet_hits(next: &mut ArenaState, rng: &mut impl Rng) -> u32 {
    if next.bullets.is_empty() {
        return 0;
    }
    let cell = next.config.world.grid_size;
    let hits = next.config.rules.projectile_hits;
    let shootable = next.config.rules.shootable_pickups;

    let pickup_grid = if shootable {
        SpatialGrid::build(cell, next.pickups.iter().map(|d| (d.x, d.y, d.r)))
    } else {
        SpatialGrid::new(cell)
    };
    let enemy_grid = SpatialGrid::build(cell, next.enemies.iter().map(|e| (e.x, e.y, e.r)));

    let mut dead_pickups = vec![false; next.pickups.len()];
    let mut dead_enemies = vec![false; next.enemies.len()];
    let mut spent = vec![false; next.bullets.len()];
    let mut xp = 0;

    for (bi, bullet) in next.bullets.iter_mut().enumerate() {
        let damage = bullet_damage(&next.config.combat, bullet.r);

        for di in pickup_grid.query(bullet.x, bullet.y, bullet.r) {
            if dead_pickups[di] || spent[bi] {
                continue;
            }
            let dot = &mut next.pickups[di];
            let Some(hp) = dot.hp.as_mut() else { continue };
            if !circles_overlap(bullet.x, bullet.y, bullet.r, dot.x, dot.y, dot.r) {
                continue;
            }
            *hp -= damage;
            if *hp <= 0.0 {
                dead_pickups[di] = true;
                xp += dot.xp;
            }
            spent[bi] = register_hit(bullet, hits);
        }

        for ei in enemy_grid.query(bullet.x, bullet.y, bullet.r) {
            if dead_enemies[ei] || spent[bi] {
                continue;
            }
            let enemy = &mut next.enemies[ei];
            if !circles_overlap(bullet.x, bullet.y, bullet.r, enemy.x, enemy.y, enemy.r) {
                continue;
            }
            enemy.hp -= damage;
            if enemy.hp <= 0.0 {
                dead_enemies[ei] = true;
                xp += enemy.xp;
            }
            spent[bi] = register_hit(bullet, hits);
        }
    }

    let mut flags = spent.into_iter();
    next.bullets
        .retain(|b| !flags.next().unwrap_or(false) && b.life.map_or(true, |life| life > 0.0));

    let mut flags = dead_enemies.into_iter();
    next.enemies.retain(|_| !flags.next().unwrap_or(false));

    let destroyed = dead_pickups.iter().filter(|&&d| d).count();
    let mut flags = dead_pickups.into_iter();
    next.pickups.retain(|_| !flags.next().unwrap_or(false));
    if next.config.rules.respawn_pickups {
        for _ in 0..destroyed {
            let dot = place_pickup(&next.config, &next.walls, rng);
            next.pickups.push(dot);
        }
    }
    xp
}

/// Returns true when the bullet is used up by this hit.
fn register_hit(bullet: &mut Bullet, hits: ProjectileHits) -> bool {
    match hits {
        ProjectileHits::Erode { penalty } => {
            if let Some(life) = bullet.life.as_mut() {
                *life -= penalty;
            }
            false
        }
        ProjectileHits::Single => true,
    }
}

fn collect_touched_pickups(next: &mut ArenaState, rng: &mut impl Rng) -> u32 {
    if !next.config.rules.touch_pickups {
        return 0;
    }
    let p = &next.player;
    let (px, py, pr) = (p.x, p.y, p.r);
    let mut xp = 0;
    let mut collected = 0;
    next.pickups.retain(|d| {
        let touching = circles_overlap(px, py, pr, d.x, d.y, d.r);
        if touching {
            xp += d.xp;
            collected += 1;
        }
        !touching
    });
    if next.config.rules.respawn_pickups {
        for _ in 0..collected {
            let dot = place_pickup(&next.config, &next.walls, rng);
            next.pickups.push(dot);
        }
    }
    xp
}

/// Spend accumulated xp on as many levels as it covers.
pub fn apply_level_ups(config: &GameConfig, player: &Player) -> Player {
    let mut p = player.clone();
    loop {
        let needed = xp_for_level(config.rules.xp_curve, p.level);
        if p.xp < needed {
            break;
        }
        p.xp -= needed;
        p.level += 1;
        if config.rules.grant_points {
            p.points += 1;
        }
        p.max_hp += config.player.level_up_hp;
        p.hp = (p.hp + config.player.level_up_hp).min(p.max_hp);
    }
    p
}

fn wander_enemies(next: &mut ArenaState, dt: f32, rng: &mut impl Rng) {
    let world = (next.config.world.width, next.config.world.height);
    let turn_chance = next.config.enemies.turn_chance.clamp(0.0, 1.0);
    for e in &mut next.enemies {
        let (sin, cos) = e.direction.sin_cos();
        let (dx, dy) = (cos * e.speed * dt, sin * e.speed * dt);
        let (mx, my) = move_circle(e.x, e.y, e.r, dx, dy, &next.walls);
        let (x, y) = clamp_to_world(mx, my, e.r, 0.0, world);
        let blocked = (x - (e.x + dx)).abs() > f32::EPSILON || (y - (e.y + dy)).abs() > f32::EPSILON;
        e.x = x;
        e.y = y;
        if blocked || rng.gen_bool(turn_chance) {
            e.direction = rng.gen_range(0.0..TAU);
        }
    }
}
