/// Game entity types. Pure data, no logic.
use std::collections::BTreeMap;

use crate::config::GameConfig;

/// 24-bit colour, converted to a terminal colour at draw time.
pub type Rgb = (u8, u8, u8);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuState {
    Closed,
    Open,
}

/// The four upgradeable player stats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stat {
    Size,
    Reload,
    Speed,
    Hp,
}

impl Stat {
    pub const ALL: [Stat; 4] = [Stat::Size, Stat::Reload, Stat::Speed, Stat::Hp];

    pub fn label(self) -> &'static str {
        match self {
            Stat::Size => "Bullet Size",
            Stat::Reload => "Reload",
            Stat::Speed => "Move Speed",
            Stat::Hp => "Max HP",
        }
    }
}

/// Upgrade levels bought through the upgrade menu.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    pub size: u32,
    pub reload: u32,
    pub speed: u32,
    pub hp: u32,
}

impl Stats {
    pub fn get(&self, stat: Stat) -> u32 {
        match stat {
            Stat::Size => self.size,
            Stat::Reload => self.reload,
            Stat::Speed => self.speed,
            Stat::Hp => self.hp,
        }
    }
}

// ── World geometry ────────────────────────────────────────────────────────────

/// Axis-aligned, impassable rectangle. `(x, y)` is the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Wall {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

// ── Targets ───────────────────────────────────────────────────────────────────

/// An xp dot.
#[derive(Clone, Debug, PartialEq)]
pub struct Pickup {
    pub x: f32,
    pub y: f32,
    pub r: f32,
    pub color: Rgb,
    /// `None` when the ruleset collects pickups by touch instead of shooting.
    pub hp: Option<f32>,
    pub xp: u32,
}

/// A mobile target that random-walks around the world.
#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub x: f32,
    pub y: f32,
    pub r: f32,
    pub color: Rgb,
    /// World units per second.
    pub speed: f32,
    /// Heading in radians.
    pub direction: f32,
    pub hp: f32,
    pub xp: u32,
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Bullet {
    pub owner: String,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub r: f32,
    /// Seconds left. `None` means the bullet lives until it hits or leaves the world.
    pub life: Option<f32>,
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub id: String,
    pub name: String,
    pub x: f32,
    pub y: f32,
    pub r: f32,
    pub vx: f32,
    pub vy: f32,
    /// Facing angle in radians, towards the pointer.
    pub angle: f32,
    pub color: Rgb,
    pub hp: f32,
    pub max_hp: f32,
    pub xp: u32,
    pub level: u32,
    /// Unspent upgrade points.
    pub points: u32,
    pub stats: Stats,
    /// Seconds until the next shot is allowed.
    pub fire_cooldown: f32,
    pub base_speed: f32,
    pub base_fire_rate: f32,
    pub bullet_size: f32,
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire simulation state. Cloneable so the step function can return a
/// new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct ArenaState {
    pub config: GameConfig,
    pub walls: Vec<Wall>,
    pub pickups: Vec<Pickup>,
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Bullet>,
    /// The local player.
    pub player: Player,
    /// Other players keyed by id. Always empty: there is no networking, the
    /// map only keeps the minimap and renderer written against "all players".
    pub remote_players: BTreeMap<String, Player>,
    pub menu: MenuState,
    pub frame: u64,
}

impl ArenaState {
    pub fn world_width(&self) -> f32 {
        self.config.world.width
    }

    pub fn world_height(&self) -> f32 {
        self.config.world.height
    }

    /// Every player, local first.
    pub fn players(&self) -> impl Iterator<Item = &Player> {
        std::iter::once(&self.player).chain(self.remote_players.values())
    }
}
