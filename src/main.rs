use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, KeyboardEnhancementFlags, MouseButton, MouseEvent, MouseEventKind,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::{self, Color, Print},
    terminal, ExecutableCommand, QueueableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

use arena_shooter::camera::camera_offset;
use arena_shooter::compute::{apply_upgrade, debug_adjust, init_state, step, toggle_menu, DebugAdjust};
use arena_shooter::config::{GameConfig, Variant};
use arena_shooter::display::{self, menu, Viewport};
use arena_shooter::entities::{ArenaState, MenuState, Stat};
use arena_shooter::input::{InputState, MoveKey};
use arena_shooter::status::{report_status, StatusSnapshot};

// ── Command line ──────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, ValueEnum)]
enum VariantArg {
    Classic,
    Wanderers,
    Custom,
}

impl From<VariantArg> for Variant {
    fn from(arg: VariantArg) -> Self {
        match arg {
            VariantArg::Classic => Variant::Classic,
            VariantArg::Wanderers => Variant::Wanderers,
            VariantArg::Custom => Variant::Custom,
        }
    }
}

#[derive(Parser)]
#[command(name = "arena_shooter", version, about = "Top-down arena shooter for the terminal")]
struct Args {
    /// TOML file overriding the built-in tuning values
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Where log output goes (the terminal itself is used by the game)
    #[arg(long, default_value = "arena_shooter.log")]
    log_file: PathBuf,

    /// Start straight into a rule preset instead of showing the menu
    #[arg(long, short = 'v', value_enum)]
    variant: Option<VariantArg>,

    /// Seed for world generation and enemy wandering
    #[arg(long)]
    seed: Option<u64>,
}

// ── Held keys ──────────────────────────────────────────────────────────────

/// Frames a movement key stays down after its last press or repeat event.
/// Terminals without release events only send auto-repeats (15 Hz or faster),
/// which refresh a 4-frame window before it lapses.
const HOLD_WINDOW: u64 = 4;

fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

fn any_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|k| is_held(key_frame, k, frame))
}

const MOVE_BINDINGS: [(MoveKey, [KeyCode; 3]); 4] = [
    (MoveKey::Up, [KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')]),
    (MoveKey::Down, [KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')]),
    (MoveKey::Left, [KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')]),
    (MoveKey::Right, [KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')]),
];

// ── Menu ──────────────────────────────────────────────────────────────────────

enum MenuResult {
    Start(Variant),
    Quit,
}

fn show_menu<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>) -> std::io::Result<MenuResult> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let (width, height) = terminal::size()?;
    let cx = width / 2;
    let cy = height / 2;

    let title = "◆  ARENA  SHOOTER  ◆";
    out.queue(cursor::MoveTo(
        cx.saturating_sub(title.chars().count() as u16 / 2),
        cy.saturating_sub(5),
    ))?;
    out.queue(style::SetForegroundColor(Color::Cyan))?;
    out.queue(Print(title))?;

    out.queue(cursor::MoveTo(cx.saturating_sub(14), cy.saturating_sub(3)))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print("Select rules:"))?;

    let options: &[(&str, Variant, Color, &str)] = &[
        ("1", Variant::Classic, Color::Green, "shoot xp dots, spend points on upgrades"),
        ("2", Variant::Wanderers, Color::Yellow, "hunt wandering enemies, grab dots"),
        ("3", Variant::Custom, Color::Magenta, "rules from the config file"),
    ];

    for (i, (key, variant, color, desc)) in options.iter().enumerate() {
        let row = cy.saturating_sub(1) + i as u16;
        out.queue(cursor::MoveTo(cx.saturating_sub(14), row))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(format!("[{}] ", key)))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(format!("{:<10}", variant.label())))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(format!(" {}", desc)))?;
    }

    out.queue(cursor::MoveTo(cx.saturating_sub(14), cy + 4))?;
    out.queue(style::SetForegroundColor(Color::DarkGrey))?;
    out.queue(Print("WASD: Move   Mouse: Aim/Shoot   Q: Quit"))?;

    out.queue(style::ResetColor)?;
    out.flush()?;

    // Wait for a choice
    loop {
        let code = match rx.recv() {
            Ok(Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            })) => code,
            Ok(_) => continue,
            // Event thread is gone; nothing can reach us any more.
            Err(_) => return Ok(MenuResult::Quit),
        };
        match code {
            KeyCode::Char('1') => return Ok(MenuResult::Start(Variant::Classic)),
            KeyCode::Char('2') => return Ok(MenuResult::Start(Variant::Wanderers)),
            KeyCode::Char('3') => return Ok(MenuResult::Start(Variant::Custom)),
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                return Ok(MenuResult::Quit);
            }
            _ => {}
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Returns `true` → quit program, `false` → back to menu.
///
/// Input model: movement keys are tracked in a `key_frame` map that records
/// the frame of the last press/repeat event for every key, and each frame the
/// still-fresh keys are copied into the `InputState`. Works on terminals with
/// proper release events (keys are dropped on release) and on classic ones
/// (keys expire after `HOLD_WINDOW` frames of silence).
fn game_loop<W: Write>(
    out: &mut W,
    state: &mut ArenaState,
    rx: &mpsc::Receiver<Event>,
    rng: &mut StdRng,
) -> std::io::Result<bool> {
    let (cols, rows) = terminal::size()?;
    let mut view = Viewport::new(cols, rows, &state.config.display);
    let frame_budget = Duration::from_millis(state.config.display.frame_millis);

    let mut input = InputState::new();
    let mut status = StatusSnapshot::default();
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;
    let mut last = Instant::now();

    let world = (state.world_width(), state.world_height());
    let follow = |state: &ArenaState, view: &Viewport| {
        camera_offset(
            state.config.rules.camera,
            (state.player.x, state.player.y),
            world,
            view.world_size(),
        )
    };
    let mut camera = follow(&*state, &view);

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Events since the last frame ───────────────────────────────────────
        while let Ok(ev) = rx.try_recv() {
            match ev {
                Event::Key(KeyEvent {
                    code,
                    kind,
                    modifiers,
                    ..
                }) => match kind {
                    KeyEventKind::Press => {
                        key_frame.insert(code.clone(), frame);
                        match code {
                            KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(true),
                            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                                return Ok(true);
                            }
                            KeyCode::Esc if state.menu == MenuState::Open => {
                                *state = toggle_menu(state);
                            }
                            KeyCode::Esc => return Ok(false),
                            KeyCode::Char('m') | KeyCode::Char('M') => {
                                *state = toggle_menu(state);
                            }
                            KeyCode::Char(c @ '1'..='4') => {
                                let index = (c as u8 - b'1') as usize;
                                *state = number_key(state, index);
                            }
                            _ => {}
                        }
                    }
                    KeyEventKind::Repeat => {
                        key_frame.insert(code.clone(), frame);
                    }
                    KeyEventKind::Release => {
                        key_frame.remove(&code);
                    }
                },
                Event::Mouse(MouseEvent {
                    kind, column, row, ..
                }) => {
                    let (sx, sy) = view.cell_to_screen(column, row);
                    input.set_pointer(sx, sy, camera);
                    match kind {
                        MouseEventKind::Down(MouseButton::Left) if state.menu == MenuState::Open => {
                            match menu::menu_hit(&view, column, row) {
                                menu::MenuHit::Button(stat) => *state = apply_upgrade(state, stat),
                                menu::MenuHit::Background => *state = toggle_menu(state),
                                menu::MenuHit::Panel => {}
                            }
                        }
                        MouseEventKind::Down(MouseButton::Left) => input.fire_down(),
                        MouseEventKind::Up(MouseButton::Left) => input.fire_up(),
                        _ => {}
                    }
                }
                Event::Resize(cols, rows) => {
                    view.resize(cols, rows);
                    tracing::debug!("Viewport resized to {}x{}", cols, rows);
                }
                Event::FocusLost => {
                    key_frame.clear();
                    input.fire_up();
                }
                _ => {}
            }
        }

        // ── Copy live movement keys into the sampler ──────────────────────────
        for (key, codes) in &MOVE_BINDINGS {
            if any_held(&key_frame, codes, frame) {
                input.press(*key);
            } else {
                input.release(*key);
            }
        }

        // ── Simulate ──────────────────────────────────────────────────────────
        let now = Instant::now();
        let dt = now.duration_since(last).as_secs_f32();
        last = now;

        input.follow_camera(camera);
        *state = step(state, &input, dt, rng);
        input.end_frame();

        camera = follow(&*state, &view);
        input.follow_camera(camera);

        // ── Draw ──────────────────────────────────────────────────────────────
        report_status(state, &mut status);
        display::render(out, state, &view, camera, &status)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_budget {
            std::thread::sleep(frame_budget - elapsed);
        }
    }
}

/// Keys 1–4 spend upgrade points while the menu is open, or tweak speed and
/// bullet size directly under rules with debug keys.
fn number_key(state: &ArenaState, index: usize) -> ArenaState {
    if state.menu == MenuState::Open {
        return apply_upgrade(state, Stat::ALL[index]);
    }
    let adjust = [
        DebugAdjust::SlowerMovement,
        DebugAdjust::FasterMovement,
        DebugAdjust::SmallerBullets,
        DebugAdjust::BiggerBullets,
    ][index];
    debug_adjust(state, adjust)
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_file)?;

    let config = match &args.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("invalid config {}", path.display()))?,
        None => GameConfig::default(),
    };
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;

    // Release events make movement stop immediately; without them keys
    // expire after HOLD_WINDOW frames.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Blocking reads happen on their own thread; the frame loop only drains
    // the channel.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // game loop is gone
                }
            }
            Err(_) => break,
        }
    });

    let result = run(&mut out, &rx, &config, args.variant.map(Variant::from), &mut rng);

    // Teardown runs even when the session failed
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    tracing::info!("Shutting down");
    result.context("terminal I/O failed")
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: &GameConfig,
    preset: Option<Variant>,
    rng: &mut StdRng,
) -> std::io::Result<()> {
    loop {
        let variant = match preset {
            Some(variant) => variant,
            None => match show_menu(out, rx)? {
                MenuResult::Quit => break,
                MenuResult::Start(variant) => variant,
            },
        };

        tracing::info!("Starting session with {} rules", variant.label());
        let mut state = init_state(config.with_variant(variant), rng);
        let quit = game_loop(out, &mut state, rx, rng)?;
        tracing::info!(
            "Session ended at level {} after {} frames",
            state.player.level,
            state.frame
        );

        // A preset chosen on the command line has no menu to go back to.
        if quit || preset.is_some() {
            break;
        }
    }
    Ok(())
}
