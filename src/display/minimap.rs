/// Minimap in the top-right corner: walls, every player and (optionally) the
/// visible region, scaled from world bounds onto a fixed block of cells.
use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    QueueableCommand,
};

use super::Viewport;
use crate::camera::minimap_project;
use crate::entities::ArenaState;

const C_MAP_BG: Color = Color::Rgb { r: 20, g: 22, b: 30 };
const C_MAP_WALL: Color = Color::Rgb { r: 140, g: 140, b: 150 };
const C_MAP_SELF: Color = Color::Rgb { r: 0x6b, g: 0xd6, b: 0xff };
const C_MAP_OTHER: Color = Color::Rgb { r: 0xff, g: 0x6b, b: 0x6b };
const C_MAP_VIEW: Color = Color::Rgb { r: 107, g: 214, b: 255 };

/// Top-left cell of the minimap block.
fn origin(view: &Viewport, cols: u16) -> (u16, u16) {
    (view.cols.saturating_sub(cols + 1), 1)
}

pub fn draw_minimap<W: Write>(
    out: &mut W,
    state: &ArenaState,
    view: &Viewport,
    camera: (f32, f32),
) -> std::io::Result<()> {
    let display = &state.config.display;
    let (cols, rows) = (display.minimap_cols, display.minimap_rows);
    if cols == 0 || rows == 0 || view.cols < cols + 2 || view.rows < rows + 2 {
        return Ok(());
    }
    let (ox, oy) = origin(view, cols);
    let world = (state.world_width(), state.world_height());
    let map = (cols as f32, rows as f32);
    let to_cell = |x: f32, y: f32| {
        let (mx, my) = minimap_project((x, y), world, map);
        (
            mx.floor().clamp(0.0, map.0 - 1.0) as u16,
            my.floor().clamp(0.0, map.1 - 1.0) as u16,
        )
    };

    // Background
    out.queue(style::SetForegroundColor(C_MAP_BG))?;
    let fill = "▓".repeat(cols as usize);
    for row in 0..rows {
        out.queue(cursor::MoveTo(ox, oy + row))?;
        out.queue(Print(&fill))?;
    }

    // Walls inside the world
    out.queue(style::SetForegroundColor(C_MAP_WALL))?;
    for w in &state.walls {
        if w.x + w.w <= 0.0 || w.y + w.h <= 0.0 || w.x >= world.0 || w.y >= world.1 {
            continue;
        }
        let (c0, r0) = to_cell(w.x.max(0.0), w.y.max(0.0));
        let (c1, r1) = to_cell(w.x + w.w, w.y + w.h);
        for row in r0..=r1 {
            out.queue(cursor::MoveTo(ox + c0, oy + row))?;
            out.queue(Print("░".repeat((c1 - c0 + 1) as usize)))?;
        }
    }

    // Visible region outline (corners only; a full box hides too much at this scale)
    if display.minimap_viewport {
        let (vw, vh) = view.world_size();
        let (c0, r0) = to_cell(camera.0, camera.1);
        let (c1, r1) = to_cell(camera.0 + vw, camera.1 + vh);
        out.queue(style::SetForegroundColor(C_MAP_VIEW))?;
        for (c, r, glyph) in [(c0, r0, "┌"), (c1, r0, "┐"), (c0, r1, "└"), (c1, r1, "┘")] {
            out.queue(cursor::MoveTo(ox + c, oy + r))?;
            out.queue(Print(glyph))?;
        }
    }

    // Players
    for p in state.players() {
        let (c, r) = to_cell(p.x, p.y);
        let color = if p.id == state.player.id {
            C_MAP_SELF
        } else {
            C_MAP_OTHER
        };
        out.queue(cursor::MoveTo(ox + c, oy + r))?;
        out.queue(style::SetForegroundColor(color))?;
        out.queue(Print("●"))?;
    }
    Ok(())
}
