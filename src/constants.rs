// Compiled-in gameplay defaults.
//
// These are the values `GameConfig::default()` is built from. Any of them can
// be overridden at runtime through the TOML config file (see `config.rs`), so
// keep the two in sync when adding a constant.

// ── World ─────────────────────────────────────────────────────────────────────

pub const WORLD_WIDTH: f32 = 5000.0;
pub const WORLD_HEIGHT: f32 = 5000.0;

/// Background grid spacing in world units. Also the spatial grid cell size.
pub const GRID_SIZE: f32 = 120.0;

/// Thickness of the four walls that sit just outside the world edges.
pub const BORDER_WALL_THICKNESS: f32 = 50.0;

/// Number of random horizontal walls (and, separately, vertical walls).
pub const WALLS_PER_ORIENTATION: usize = 25;
pub const WALL_MIN_LENGTH: f32 = 200.0;
pub const WALL_MAX_LENGTH: f32 = 600.0;
pub const WALL_THICKNESS: f32 = 30.0;

/// Random walls are placed with their origin in `[WALL_EDGE_INSET, world - 2 * WALL_EDGE_INSET)`.
pub const WALL_EDGE_INSET: f32 = 200.0;

/// Attempts per wall before giving up on keeping the spawn circle clear.
pub const WALL_PLACEMENT_ATTEMPTS: usize = 10;

/// Gap kept between the player's collision circle and the world edge.
pub const EDGE_MARGIN: f32 = 2.0;

// ── Player ────────────────────────────────────────────────────────────────────

pub const LOCAL_PLAYER_ID: &str = "me";
pub const PLAYER_NAME: &str = "Tanky";
pub const PLAYER_RADIUS: f32 = 18.0;
pub const PLAYER_MAX_HP: f32 = 100.0;

/// Movement speed in world units per second before upgrades.
pub const PLAYER_BASE_SPEED: f32 = 220.0;

/// Speed added per speed upgrade level.
pub const SPEED_PER_LEVEL: f32 = 18.0;

/// Units moved per held key per frame under the fixed-step movement model.
pub const FIXED_STEP: f32 = 4.0;

/// Upper bound on a single frame's delta time, in seconds.
pub const MAX_DT: f32 = 0.05;

// ── Combat ────────────────────────────────────────────────────────────────────

/// Seconds between shots at reload level 0.
pub const BASE_FIRE_RATE: f32 = 0.33;

/// Each reload level multiplies the cooldown by this factor.
pub const RELOAD_DECAY: f32 = 0.9;

/// The cooldown never drops below this many seconds.
pub const MIN_FIRE_COOLDOWN: f32 = 0.08;

pub const BULLET_SPEED: f32 = 700.0;
pub const BULLET_BASE_SIZE: f32 = 8.0;

/// Bullet radius added per size upgrade level.
pub const SIZE_PER_LEVEL: f32 = 2.0;

/// Extra distance between the player's edge and a freshly spawned bullet.
pub const MUZZLE_GAP: f32 = 6.0;

pub const BULLET_LIFETIME: f32 = 1.2;

/// Lifetime a bullet loses every frame it overlaps a target.
pub const HIT_PENALTY: f32 = 0.15;

/// Bullet radius per point of damage.
pub const DAMAGE_DIVISOR: f32 = 5.0;

// ── Progression ───────────────────────────────────────────────────────────────

pub const XP_CURVE_BASE: f32 = 20.0;
pub const XP_CURVE_GROWTH: f32 = 1.25;
pub const XP_PER_LEVEL_LINEAR: u32 = 100;

/// Max HP granted on every level-up.
pub const LEVEL_UP_HP: f32 = 5.0;

/// Max HP granted by one HP upgrade.
pub const HP_PER_UPGRADE: f32 = 10.0;

/// Bullet size granted by one size upgrade on top of the per-level radius.
pub const SIZE_UPGRADE_BONUS: f32 = 1.0;

// ── Debug adjustments ─────────────────────────────────────────────────────────

pub const DEBUG_SPEED_STEP: f32 = 20.0;
pub const DEBUG_MIN_SPEED: f32 = 40.0;
pub const DEBUG_SIZE_STEP: f32 = 1.0;
pub const DEBUG_MIN_BULLET_SIZE: f32 = 2.0;

// ── Pickups ───────────────────────────────────────────────────────────────────

pub const PICKUP_COUNT: usize = 800;
pub const PICKUP_MIN_RADIUS: f32 = 6.0;
pub const PICKUP_MAX_RADIUS: f32 = 14.0;

/// Pickups spawn at least this far from the world edge.
pub const PICKUP_EDGE_INSET: f32 = 80.0;
pub const PICKUP_PLACEMENT_ATTEMPTS: usize = 30;
pub const PICKUP_COLOR: (u8, u8, u8) = (0x6b, 0xf0, 0xa6);

// ── Enemies ───────────────────────────────────────────────────────────────────

pub const ENEMY_COUNT: usize = 40;
pub const ENEMY_MIN_RADIUS: f32 = 12.0;
pub const ENEMY_MAX_RADIUS: f32 = 22.0;
pub const ENEMY_MIN_SPEED: f32 = 30.0;
pub const ENEMY_MAX_SPEED: f32 = 90.0;

/// Probability per frame that a wandering enemy picks a new heading.
pub const ENEMY_TURN_CHANCE: f64 = 0.02;

/// Enemy hit points per unit of radius.
pub const ENEMY_HP_PER_RADIUS: f32 = 1.5;
pub const ENEMY_XP: u32 = 25;
pub const ENEMY_COLOR: (u8, u8, u8) = (0xff, 0x6b, 0x6b);

// ── Display ───────────────────────────────────────────────────────────────────

/// World units covered by one terminal column.
pub const CELL_WIDTH: f32 = 12.0;

/// World units covered by one terminal row. Cells are roughly twice as tall as wide.
pub const CELL_HEIGHT: f32 = 24.0;

pub const MINIMAP_COLS: u16 = 24;
pub const MINIMAP_ROWS: u16 = 12;

/// Off-screen culling slack, in world units.
pub const CULL_MARGIN: f32 = 30.0;

pub const FRAME_MILLIS: u64 = 33;
