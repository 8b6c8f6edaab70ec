/// Upgrade menu overlay and its click hit-testing.
///
/// The panel is centred on the viewport. Row layout inside the panel:
///
/// ```text
///  0  ┌──────────────────────────────┐
///  1  │ UPGRADES         Points: 2   │
///  2  │ [1] Bullet Size       Lv. 0  │   ← one row per stat
///  …
///  6  │ 1-4 / click: spend  M: close │
///  7  └──────────────────────────────┘
/// ```
use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    QueueableCommand,
};

use super::Viewport;
use crate::entities::Stat;
use crate::status::StatusSnapshot;

const PANEL_WIDTH: u16 = 34;
const PANEL_HEIGHT: u16 = 8;
const FIRST_BUTTON_ROW: u16 = 2;

const C_FRAME: Color = Color::Rgb { r: 107, g: 214, b: 255 };
const C_TITLE: Color = Color::White;
const C_BUTTON: Color = Color::Cyan;
const C_BUTTON_DISABLED: Color = Color::DarkGrey;
const C_HINT: Color = Color::DarkGrey;

/// What a click at a given cell lands on while the menu is open.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuHit {
    Button(Stat),
    Panel,
    Background,
}

/// Top-left corner of the panel.
fn panel_origin(view: &Viewport) -> (u16, u16) {
    (
        (view.cols / 2).saturating_sub(PANEL_WIDTH / 2),
        (view.rows / 2).saturating_sub(PANEL_HEIGHT / 2),
    )
}

pub fn menu_hit(view: &Viewport, col: u16, row: u16) -> MenuHit {
    let (left, top) = panel_origin(view);
    let inside = col >= left && col < left + PANEL_WIDTH && row >= top && row < top + PANEL_HEIGHT;
    if !inside {
        return MenuHit::Background;
    }
    let offset = row - top;
    match offset.checked_sub(FIRST_BUTTON_ROW) {
        Some(i) if (i as usize) < Stat::ALL.len() => MenuHit::Button(Stat::ALL[i as usize]),
        _ => MenuHit::Panel,
    }
}

pub fn draw_upgrade_menu<W: Write>(
    out: &mut W,
    view: &Viewport,
    status: &StatusSnapshot,
) -> std::io::Result<()> {
    let (left, top) = panel_origin(view);
    let inner = (PANEL_WIDTH - 2) as usize;

    let line = |text: String| format!("│{:<inner$}│", text, inner = inner);

    out.queue(style::SetForegroundColor(C_FRAME))?;
    out.queue(cursor::MoveTo(left, top))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(inner))))?;
    out.queue(cursor::MoveTo(left, top + PANEL_HEIGHT - 1))?;
    out.queue(Print(format!("└{}┘", "─".repeat(inner))))?;

    out.queue(cursor::MoveTo(left, top + 1))?;
    out.queue(style::SetForegroundColor(C_TITLE))?;
    out.queue(Print(line(format!(
        " UPGRADES{:>width$}",
        format!("Points: {} ", status.points),
        width = inner - 9
    ))))?;

    let color = if status.points > 0 {
        C_BUTTON
    } else {
        C_BUTTON_DISABLED
    };
    for (i, stat) in Stat::ALL.iter().enumerate() {
        out.queue(cursor::MoveTo(left, top + FIRST_BUTTON_ROW + i as u16))?;
        out.queue(style::SetForegroundColor(color))?;
        out.queue(Print(line(format!(
            " [{}] {:<16}Lv. {:<5}",
            i + 1,
            stat.label(),
            status.stats.get(*stat)
        ))))?;
    }

    out.queue(cursor::MoveTo(left, top + FIRST_BUTTON_ROW + Stat::ALL.len() as u16))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(line(" 1-4 / click: spend   M: close".to_string())))?;
    Ok(())
}
