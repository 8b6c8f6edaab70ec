/// Status reporting: a one-way mirror of player progress into whatever
/// presentation layer is listening. The simulation never reads back from it.
use crate::compute::xp_for_level;
use crate::entities::{ArenaState, Stats};

pub trait StatusReporter {
    fn set_name(&mut self, name: &str);
    fn set_level(&mut self, level: u32);
    /// Current xp and the xp needed for the next level.
    fn set_xp(&mut self, xp: u32, needed: u32);
    fn set_points(&mut self, points: u32);
    fn set_stat_levels(&mut self, stats: &Stats);
    fn set_health(&mut self, hp: f32, max_hp: f32);
}

/// Push the local player's progress into `reporter`.
pub fn report_status(state: &ArenaState, reporter: &mut impl StatusReporter) {
    let p = &state.player;
    reporter.set_name(&p.name);
    reporter.set_level(p.level);
    reporter.set_xp(p.xp, xp_for_level(state.config.rules.xp_curve, p.level));
    reporter.set_points(p.points);
    reporter.set_stat_levels(&p.stats);
    reporter.set_health(p.hp, p.max_hp);
}

/// Plain-value snapshot, used by the HUD and by tests.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StatusSnapshot {
    pub name: String,
    pub level: u32,
    pub xp: u32,
    pub xp_needed: u32,
    pub points: u32,
    pub stats: Stats,
    pub hp: f32,
    pub max_hp: f32,
}

impl StatusSnapshot {
    /// Progress towards the next level in `[0, 1]`.
    pub fn xp_fraction(&self) -> f32 {
        if self.xp_needed == 0 {
            return 0.0;
        }
        (self.xp as f32 / self.xp_needed as f32).clamp(0.0, 1.0)
    }
}

impl StatusReporter for StatusSnapshot {
    fn set_name(&mut self, name: &str) {
        if self.name != name {
            self.name = name.to_string();
        }
    }

    fn set_level(&mut self, level: u32) {
        self.level = level;
    }

    fn set_xp(&mut self, xp: u32, needed: u32) {
        self.xp = xp;
        self.xp_needed = needed;
    }

    fn set_points(&mut self, points: u32) {
        self.points = points;
    }

    fn set_stat_levels(&mut self, stats: &Stats) {
        self.stats = *stats;
    }

    fn set_health(&mut self, hp: f32, max_hp: f32) {
        self.hp = hp;
        self.max_hp = max_hp;
    }
}
