/// Rendering layer. All terminal output lives here.
///
/// Each function receives a mutable writer and an immutable view of the
/// game state. No game logic is performed; this module only translates
/// state into terminal commands. The world is projected onto character cells
/// at a fixed number of world units per column and per row.
use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};

use crate::config::DisplayConfig;
use crate::entities::{ArenaState, MenuState, Player, Rgb};
use crate::status::StatusSnapshot;

pub mod hud;
pub mod menu;
pub mod minimap;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_GRID: Color = Color::Rgb { r: 34, g: 36, b: 52 };
const C_WALL: Color = Color::Rgb { r: 0x2a, g: 0x2f, b: 0x54 };
const C_BULLET: Color = Color::Rgb { r: 0xff, g: 0xd0, b: 0x8a };
const C_FACING: Color = Color::Rgb { r: 0xc8, g: 0xe6, b: 0xff };
const C_NAME: Color = Color::White;

pub fn rgb(c: Rgb) -> Color {
    Color::Rgb {
        r: c.0,
        g: c.1,
        b: c.2,
    }
}

// ── Viewport ──────────────────────────────────────────────────────────────────

/// Terminal area and the world units each cell covers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub cols: u16,
    pub rows: u16,
    pub cell_w: f32,
    pub cell_h: f32,
}

impl Viewport {
    pub fn new(cols: u16, rows: u16, display: &DisplayConfig) -> Self {
        Self {
            cols,
            rows,
            cell_w: display.cell_width,
            cell_h: display.cell_height,
        }
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
    }

    /// Visible region size in world units.
    pub fn world_size(&self) -> (f32, f32) {
        (
            self.cols as f32 * self.cell_w,
            self.rows as f32 * self.cell_h,
        )
    }

    /// Centre of a cell, in world units relative to the top-left of the view.
    pub fn cell_to_screen(&self, col: u16, row: u16) -> (f32, f32) {
        (
            (col as f32 + 0.5) * self.cell_w,
            (row as f32 + 0.5) * self.cell_h,
        )
    }

    /// Cell containing a world point, if it is on screen.
    pub fn world_to_cell(&self, camera: (f32, f32), x: f32, y: f32) -> Option<(u16, u16)> {
        let col = ((x - camera.0) / self.cell_w).floor();
        let row = ((y - camera.1) / self.cell_h).floor();
        if col < 0.0 || row < 0.0 || col >= self.cols as f32 || row >= self.rows as f32 {
            None
        } else {
            Some((col as u16, row as u16))
        }
    }

    /// Cheap bounding check: could a shape of extent `r` around `(x, y)` be visible?
    pub fn may_show(&self, camera: (f32, f32), x: f32, y: f32, r: f32, margin: f32) -> bool {
        let (vw, vh) = self.world_size();
        let sx = x - camera.0;
        let sy = y - camera.1;
        !(sx + r < -margin || sy + r < -margin || sx - r > vw + margin || sy - r > vh + margin)
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    state: &ArenaState,
    view: &Viewport,
    camera: (f32, f32),
    status: &StatusSnapshot,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let display = &state.config.display;
    if display.draw_grid {
        draw_grid(out, view, camera, state.config.world.grid_size)?;
    }
    draw_walls(out, state, view, camera)?;
    draw_pickups(out, state, view, camera)?;
    draw_enemies(out, state, view, camera)?;
    draw_bullets(out, state, view, camera)?;
    for player in state.players() {
        draw_player(out, player, view, camera)?;
    }

    hud::draw_hud(out, view, status, &state.config.rules)?;
    minimap::draw_minimap(out, state, view, camera)?;

    if state.menu == MenuState::Open {
        menu::draw_upgrade_menu(out, view, status)?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, view.rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

fn visible(state: &ArenaState, view: &Viewport, camera: (f32, f32), x: f32, y: f32, r: f32) -> bool {
    !state.config.display.cull_offscreen
        || view.may_show(camera, x, y, r, crate::constants::CULL_MARGIN)
}

// ── Background ────────────────────────────────────────────────────────────────

/// Grid lines every `spacing` world units, one string per row.
fn draw_grid<W: Write>(
    out: &mut W,
    view: &Viewport,
    camera: (f32, f32),
    spacing: f32,
) -> std::io::Result<()> {
    // A cell is on a line when a multiple of `spacing` falls inside it.
    let on_line = |start: f32, size: f32| {
        let first = (start / spacing).ceil() * spacing;
        first < start + size
    };
    let cols: Vec<bool> = (0..view.cols)
        .map(|c| on_line(camera.0 + c as f32 * view.cell_w, view.cell_w))
        .collect();

    out.queue(style::SetForegroundColor(C_GRID))?;
    for row in 0..view.rows {
        let row_line = on_line(camera.1 + row as f32 * view.cell_h, view.cell_h);
        let line: String = cols
            .iter()
            .map(|&col_line| match (col_line, row_line) {
                (true, true) => '┼',
                (true, false) => '│',
                (false, true) => '─',
                (false, false) => ' ',
            })
            .collect();
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print(line))?;
    }
    Ok(())
}

// ── World ─────────────────────────────────────────────────────────────────────

fn draw_walls<W: Write>(
    out: &mut W,
    state: &ArenaState,
    view: &Viewport,
    camera: (f32, f32),
) -> std::io::Result<()> {
    let (vw, vh) = view.world_size();
    out.queue(style::SetForegroundColor(C_WALL))?;
    for w in &state.walls {
        let x = w.x - camera.0;
        let y = w.y - camera.1;
        if x + w.w < 0.0 || y + w.h < 0.0 || x > vw || y > vh {
            continue;
        }
        let c0 = (x / view.cell_w).floor().max(0.0) as u16;
        let r0 = (y / view.cell_h).floor().max(0.0) as u16;
        let c1 = (((x + w.w) / view.cell_w).ceil() as u16).min(view.cols);
        let r1 = (((y + w.h) / view.cell_h).ceil() as u16).min(view.rows);
        if c1 <= c0 {
            continue;
        }
        let bar = "█".repeat((c1 - c0) as usize);
        for row in r0..r1 {
            out.queue(cursor::MoveTo(c0, row))?;
            out.queue(Print(&bar))?;
        }
    }
    Ok(())
}

fn draw_pickups<W: Write>(
    out: &mut W,
    state: &ArenaState,
    view: &Viewport,
    camera: (f32, f32),
) -> std::io::Result<()> {
    for d in &state.pickups {
        if !visible(state, view, camera, d.x, d.y, d.r) {
            continue;
        }
        if let Some((col, row)) = view.world_to_cell(camera, d.x, d.y) {
            out.queue(cursor::MoveTo(col, row))?;
            out.queue(style::SetForegroundColor(rgb(d.color)))?;
            out.queue(Print(if d.r >= 10.0 { "●" } else { "•" }))?;
        }
    }
    Ok(())
}

fn draw_enemies<W: Write>(
    out: &mut W,
    state: &ArenaState,
    view: &Viewport,
    camera: (f32, f32),
) -> std::io::Result<()> {
    for e in &state.enemies {
        if !visible(state, view, camera, e.x, e.y, e.r) {
            continue;
        }
        if let Some((col, row)) = view.world_to_cell(camera, e.x, e.y) {
            out.queue(cursor::MoveTo(col, row))?;
            out.queue(style::SetForegroundColor(rgb(e.color)))?;
            out.queue(Print("◉"))?;
        }
    }
    Ok(())
}

fn draw_bullets<W: Write>(
    out: &mut W,
    state: &ArenaState,
    view: &Viewport,
    camera: (f32, f32),
) -> std::io::Result<()> {
    out.queue(style::SetForegroundColor(C_BULLET))?;
    for b in &state.bullets {
        if !visible(state, view, camera, b.x, b.y, b.r) {
            continue;
        }
        if let Some((col, row)) = view.world_to_cell(camera, b.x, b.y) {
            out.queue(cursor::MoveTo(col, row))?;
            out.queue(Print("∙"))?;
        }
    }
    Ok(())
}

/// Arrow glyph closest to `angle` (radians, y pointing down).
pub fn facing_glyph(angle: f32) -> &'static str {
    const ARROWS: [&str; 8] = ["→", "↘", "↓", "↙", "←", "↖", "↑", "↗"];
    let octant = (angle / std::f32::consts::FRAC_PI_4).round() as i32;
    ARROWS[octant.rem_euclid(8) as usize]
}

fn draw_player<W: Write>(
    out: &mut W,
    p: &Player,
    view: &Viewport,
    camera: (f32, f32),
) -> std::io::Result<()> {
    let Some((col, row)) = view.world_to_cell(camera, p.x, p.y) else {
        return Ok(());
    };

    // Body
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(rgb(p.color)))?;
    out.queue(Print("◆"))?;

    // Facing indicator one cell out along the aim
    let (sin, cos) = p.angle.sin_cos();
    let reach = p.r + view.cell_w;
    if let Some((fc, fr)) = view.world_to_cell(camera, p.x + cos * reach, p.y + sin * reach) {
        if (fc, fr) != (col, row) {
            out.queue(cursor::MoveTo(fc, fr))?;
            out.queue(style::SetForegroundColor(C_FACING))?;
            out.queue(Print(facing_glyph(p.angle)))?;
        }
    }

    // Name label above
    if row > 0 {
        let half = p.name.chars().count() as u16 / 2;
        out.queue(cursor::MoveTo(col.saturating_sub(half), row - 1))?;
        out.queue(style::SetForegroundColor(C_NAME))?;
        out.queue(Print(&p.name))?;
    }
    Ok(())
}
