/// Runtime configuration loaded from a TOML file.
///
/// [`GameConfig`] mirrors every constant in [`crate::constants`]. Missing keys
/// fall back to the compiled defaults, so a config file only needs the values
/// it wants to change:
///
/// ```toml
/// [world]
/// width = 3000.0
///
/// [rules]
/// normalize_diagonal = false
/// movement = { kind = "fixed_step", step = 4.0 }
/// ```
///
/// The `[rules]` table selects between the two flavours of the game. The
/// `classic` preset shoots destructible xp dots that respawn and spends level-up
/// points in an upgrade menu; the `wanderers` preset adds random-walking enemies,
/// collects dots by touch and uses a linear xp curve.
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::{ensure_positive, ensure_range, GameError, GameResult};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub world: WorldConfig,
    pub player: PlayerConfig,
    pub combat: CombatConfig,
    pub pickups: PickupConfig,
    pub enemies: EnemyConfig,
    pub rules: Ruleset,
    pub display: DisplayConfig,
}

// ── Sections ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub width: f32,
    pub height: f32,
    pub grid_size: f32,
    pub walls_per_orientation: usize,
    pub edge_margin: f32,
    /// Upper bound on one frame's delta time, in seconds.
    pub max_dt: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: WORLD_WIDTH,
            height: WORLD_HEIGHT,
            grid_size: GRID_SIZE,
            walls_per_orientation: WALLS_PER_ORIENTATION,
            edge_margin: EDGE_MARGIN,
            max_dt: MAX_DT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub name: String,
    pub radius: f32,
    pub max_hp: f32,
    pub base_speed: f32,
    pub speed_per_level: f32,
    pub level_up_hp: f32,
    pub hp_per_upgrade: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            name: PLAYER_NAME.to_string(),
            radius: PLAYER_RADIUS,
            max_hp: PLAYER_MAX_HP,
            base_speed: PLAYER_BASE_SPEED,
            speed_per_level: SPEED_PER_LEVEL,
            level_up_hp: LEVEL_UP_HP,
            hp_per_upgrade: HP_PER_UPGRADE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    pub base_fire_rate: f32,
    pub reload_decay: f32,
    pub min_fire_cooldown: f32,
    pub bullet_speed: f32,
    pub bullet_size: f32,
    pub size_per_level: f32,
    pub muzzle_gap: f32,
    pub bullet_lifetime: f32,
    pub damage_divisor: f32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            base_fire_rate: BASE_FIRE_RATE,
            reload_decay: RELOAD_DECAY,
            min_fire_cooldown: MIN_FIRE_COOLDOWN,
            bullet_speed: BULLET_SPEED,
            bullet_size: BULLET_BASE_SIZE,
            size_per_level: SIZE_PER_LEVEL,
            muzzle_gap: MUZZLE_GAP,
            bullet_lifetime: BULLET_LIFETIME,
            damage_divisor: DAMAGE_DIVISOR,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickupConfig {
    pub count: usize,
    pub min_radius: f32,
    pub max_radius: f32,
    pub edge_inset: f32,
    pub placement_attempts: usize,
}

impl Default for PickupConfig {
    fn default() -> Self {
        Self {
            count: PICKUP_COUNT,
            min_radius: PICKUP_MIN_RADIUS,
            max_radius: PICKUP_MAX_RADIUS,
            edge_inset: PICKUP_EDGE_INSET,
            placement_attempts: PICKUP_PLACEMENT_ATTEMPTS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    pub count: usize,
    pub min_radius: f32,
    pub max_radius: f32,
    pub min_speed: f32,
    pub max_speed: f32,
    pub turn_chance: f64,
    pub hp_per_radius: f32,
    pub xp: u32,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            count: ENEMY_COUNT,
            min_radius: ENEMY_MIN_RADIUS,
            max_radius: ENEMY_MAX_RADIUS,
            min_speed: ENEMY_MIN_SPEED,
            max_speed: ENEMY_MAX_SPEED,
            turn_chance: ENEMY_TURN_CHANCE,
            hp_per_radius: ENEMY_HP_PER_RADIUS,
            xp: ENEMY_XP,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub cell_width: f32,
    pub cell_height: f32,
    pub minimap_cols: u16,
    pub minimap_rows: u16,
    pub draw_grid: bool,
    /// Skip entities whose bounding box is outside the viewport before drawing.
    pub cull_offscreen: bool,
    /// Outline the visible region on the minimap.
    pub minimap_viewport: bool,
    pub frame_millis: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            cell_width: CELL_WIDTH,
            cell_height: CELL_HEIGHT,
            minimap_cols: MINIMAP_COLS,
            minimap_rows: MINIMAP_ROWS,
            draw_grid: true,
            cull_offscreen: true,
            minimap_viewport: true,
            frame_millis: FRAME_MILLIS,
        }
    }
}

// ── Rules ─────────────────────────────────────────────────────────────────────

/// How held movement keys turn into displacement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MovementModel {
    /// velocity × dt, frame-rate independent.
    DeltaTime,
    /// A fixed number of world units per held key per frame.
    FixedStep { step: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraMode {
    /// Follow the player but never show anything past the world edge.
    Clamped,
    /// Keep the player dead centre, even near the edges.
    Centered,
}

/// Experience needed to advance from a given level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum XpCurve {
    /// `floor(base × growth^(level-1))`
    Exponential { base: f32, growth: f32 },
    /// `level × per_level`
    Linear { per_level: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FireTrigger {
    /// Keep firing while the button is down.
    Held,
    /// One shot per button press.
    Press,
}

/// What happens to a bullet when it overlaps a target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProjectileHits {
    /// The bullet survives but loses `penalty` seconds of lifetime per hit.
    Erode { penalty: f32 },
    /// The bullet is removed on its first hit.
    Single,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ruleset {
    pub movement: MovementModel,
    pub normalize_diagonal: bool,
    pub camera: CameraMode,
    pub xp_curve: XpCurve,
    pub fire_trigger: FireTrigger,
    pub projectile_hits: ProjectileHits,
    /// Bullets expire after `combat.bullet_lifetime`; otherwise they live until
    /// they hit something or leave the world.
    pub bullet_lifetime: bool,
    /// Xp dots have hit points and can be shot.
    pub shootable_pickups: bool,
    /// Xp dots are collected by walking into them.
    pub touch_pickups: bool,
    /// A destroyed or collected xp dot is replaced in the same step.
    pub respawn_pickups: bool,
    pub wandering_enemies: bool,
    pub upgrade_menu: bool,
    /// Each level-up grants one upgrade point.
    pub grant_points: bool,
    /// Number keys tweak speed and bullet size directly.
    pub debug_keys: bool,
}

impl Ruleset {
    pub fn classic() -> Self {
        Self {
            movement: MovementModel::DeltaTime,
            normalize_diagonal: true,
            camera: CameraMode::Clamped,
            xp_curve: XpCurve::Exponential {
                base: XP_CURVE_BASE,
                growth: XP_CURVE_GROWTH,
            },
            fire_trigger: FireTrigger::Held,
            projectile_hits: ProjectileHits::Erode { penalty: HIT_PENALTY },
            bullet_lifetime: true,
            shootable_pickups: true,
            touch_pickups: false,
            respawn_pickups: true,
            wandering_enemies: false,
            upgrade_menu: true,
            grant_points: true,
            debug_keys: false,
        }
    }

    pub fn wanderers() -> Self {
        Self {
            movement: MovementModel::FixedStep { step: FIXED_STEP },
            normalize_diagonal: false,
            camera: CameraMode::Centered,
            xp_curve: XpCurve::Linear {
                per_level: XP_PER_LEVEL_LINEAR,
            },
            fire_trigger: FireTrigger::Press,
            projectile_hits: ProjectileHits::Single,
            bullet_lifetime: false,
            shootable_pickups: false,
            touch_pickups: true,
            respawn_pickups: false,
            wandering_enemies: true,
            upgrade_menu: false,
            grant_points: false,
            debug_keys: true,
        }
    }
}

impl Default for Ruleset {
    fn default() -> Self {
        Self::classic()
    }
}

/// Named rule presets, plus `Custom` for whatever the config file says.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    Classic,
    Wanderers,
    Custom,
}

impl Variant {
    pub fn label(self) -> &'static str {
        match self {
            Variant::Classic => "Classic",
            Variant::Wanderers => "Wanderers",
            Variant::Custom => "Custom",
        }
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

impl GameConfig {
    /// Parse a TOML document and validate the result.
    pub fn from_toml_str(text: &str) -> GameResult<Self> {
        let config: GameConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file.
    pub fn load(path: &Path) -> GameResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| GameError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Copy of this config with the rules replaced by `variant`'s preset.
    /// `Custom` keeps the rules as loaded.
    pub fn with_variant(&self, variant: Variant) -> Self {
        let rules = match variant {
            Variant::Classic => Ruleset::classic(),
            Variant::Wanderers => Ruleset::wanderers(),
            Variant::Custom => self.rules.clone(),
        };
        Self {
            rules,
            ..self.clone()
        }
    }

    /// Reject values that would break the simulation's clamping invariants.
    pub fn validate(&self) -> GameResult<()> {
        ensure_positive("world.width", self.world.width)?;
        ensure_positive("world.height", self.world.height)?;
        ensure_positive("world.grid_size", self.world.grid_size)?;
        ensure_positive("world.max_dt", self.world.max_dt)?;
        ensure_positive("player.radius", self.player.radius)?;
        ensure_positive("player.max_hp", self.player.max_hp)?;
        ensure_positive("player.base_speed", self.player.base_speed)?;
        ensure_positive("combat.base_fire_rate", self.combat.base_fire_rate)?;
        ensure_positive("combat.min_fire_cooldown", self.combat.min_fire_cooldown)?;
        ensure_range("combat.reload_decay", self.combat.reload_decay, 0.0, 1.0)?;
        ensure_positive("combat.bullet_speed", self.combat.bullet_speed)?;
        ensure_positive("combat.bullet_size", self.combat.bullet_size)?;
        ensure_positive("combat.damage_divisor", self.combat.damage_divisor)?;
        ensure_positive("pickups.min_radius", self.pickups.min_radius)?;
        if self.pickups.max_radius <= self.pickups.min_radius {
            return Err(GameError::InvalidConfig {
                name: "pickups.max_radius",
                value: self.pickups.max_radius,
                expected: "greater than pickups.min_radius",
            });
        }
        ensure_positive("enemies.min_radius", self.enemies.min_radius)?;
        if self.enemies.max_radius <= self.enemies.min_radius {
            return Err(GameError::InvalidConfig {
                name: "enemies.max_radius",
                value: self.enemies.max_radius,
                expected: "greater than enemies.min_radius",
            });
        }
        if self.enemies.max_speed <= self.enemies.min_speed {
            return Err(GameError::InvalidConfig {
                name: "enemies.max_speed",
                value: self.enemies.max_speed,
                expected: "greater than enemies.min_speed",
            });
        }
        ensure_range(
            "enemies.turn_chance",
            self.enemies.turn_chance as f32,
            0.0,
            1.0,
        )?;
        ensure_positive("display.cell_width", self.display.cell_width)?;
        ensure_positive("display.cell_height", self.display.cell_height)?;
        if let MovementModel::FixedStep { step } = self.rules.movement {
            ensure_positive("rules.movement.step", step)?;
        }
        if let XpCurve::Exponential { base, growth } = self.rules.xp_curve {
            ensure_positive("rules.xp_curve.base", base)?;
            if growth < 1.0 {
                return Err(GameError::InvalidConfig {
                    name: "rules.xp_curve.growth",
                    value: growth,
                    expected: ">= 1.0 so the curve never shrinks",
                });
            }
        }
        if let XpCurve::Linear { per_level } = self.rules.xp_curve {
            ensure_positive("rules.xp_curve.per_level", per_level as f32)?;
        }
        Ok(())
    }
}
