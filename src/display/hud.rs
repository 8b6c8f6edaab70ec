/// HUD (rows 0–1): name, level, xp bar, health, points, and a controls hint
/// on the last row.
use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    QueueableCommand,
};

use super::Viewport;
use crate::config::Ruleset;
use crate::status::StatusSnapshot;

const C_HUD_NAME: Color = Color::White;
const C_HUD_LEVEL: Color = Color::Yellow;
const C_XP_FILL: Color = Color::Rgb { r: 0x6b, g: 0xf0, b: 0xa6 };
const C_XP_EMPTY: Color = Color::DarkGrey;
const C_HP: Color = Color::Red;
const C_POINTS: Color = Color::Cyan;
const C_HINT: Color = Color::DarkGrey;

const BAR_WIDTH: usize = 20;

/// Filled/empty split of a `width`-cell bar for `fraction` in `[0, 1]`.
pub fn bar_cells(fraction: f32, width: usize) -> (usize, usize) {
    let filled = ((fraction.clamp(0.0, 1.0) * width as f32).round() as usize).min(width);
    (filled, width - filled)
}

pub fn draw_hud<W: Write>(
    out: &mut W,
    view: &Viewport,
    status: &StatusSnapshot,
    rules: &Ruleset,
) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_NAME))?;
    out.queue(Print(format!("{} ", status.name)))?;
    out.queue(style::SetForegroundColor(C_HUD_LEVEL))?;
    out.queue(Print(format!("Lv {:<3}", status.level)))?;

    let (filled, empty) = bar_cells(status.xp_fraction(), BAR_WIDTH);
    out.queue(style::SetForegroundColor(C_XP_FILL))?;
    out.queue(Print("█".repeat(filled)))?;
    out.queue(style::SetForegroundColor(C_XP_EMPTY))?;
    out.queue(Print("░".repeat(empty)))?;
    out.queue(Print(format!(" {} / {}", status.xp, status.xp_needed)))?;

    out.queue(cursor::MoveTo(1, 1))?;
    out.queue(style::SetForegroundColor(C_HP))?;
    out.queue(Print(format!("HP {:.0}/{:.0}", status.hp, status.max_hp)))?;
    if rules.upgrade_menu {
        out.queue(style::SetForegroundColor(C_POINTS))?;
        out.queue(Print(format!("  Points {}", status.points)))?;
    }

    let hint = if rules.upgrade_menu {
        "WASD/arrows: Move   Mouse: Aim   Click: Shoot   M: Upgrades   Q: Quit"
    } else if rules.debug_keys {
        "WASD/arrows: Move   Mouse: Aim   Click: Shoot   1-4: Speed/Size   Q: Quit"
    } else {
        "WASD/arrows: Move   Mouse: Aim   Click: Shoot   Q: Quit"
    };
    out.queue(cursor::MoveTo(1, view.rows.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(hint))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_is_clamped() {
        assert_eq!(bar_cells(0.0, 20), (0, 20));
        assert_eq!(bar_cells(0.5, 20), (10, 10));
        assert_eq!(bar_cells(3.0, 20), (20, 0));
        assert_eq!(bar_cells(-1.0, 20), (0, 20));
    }
}
