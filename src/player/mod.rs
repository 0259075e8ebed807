//! Player — the terminal host for a walking session.
//!
//! Owns the terminal, the wall clock and the keyboard. Every tick it turns
//! key events into an `InputState`, advances the session, asks the HUD for a
//! scene and draws the renderer's diff. The session itself never sees a key
//! code or an `Instant`.

use std::io::{self, Write};
use std::time::{Duration, Instant};

use anyhow::{Result, bail};
use crossterm::event::{
    self, Event, KeyEvent, KeyEventKind, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
    PushKeyboardEnhancementFlags,
};
use crossterm::{cursor, execute, queue, style, terminal};
use log::{debug, info};

use crate::assets::PhotoAssets;
use crate::config::{GalleryConfig, binding_label};
use crate::engine::Session;
use crate::engine::input::InputState;
use crate::hud::{Hud, HudLabels, Viewport};
use crate::menubar::print_menu_item;
use crate::renderer::{Grid, Renderer};
use crate::types::{Color, Frame, NamedColor, Style};

mod keys;

use keys::PressOnlyKeys;

/// Rows reserved above the canvas for the menu bar.
const CANVAS_OFFSET: u16 = 1;
/// Rows taken by the menu bar and the status bar together.
const CHROME_ROWS: u16 = 2;
const MIN_WIDTH: u16 = 40;
const MIN_HEIGHT: u16 = 14;

pub struct Player {
    session: Session,
    config: GalleryConfig,
    assets: PhotoAssets,
    labels: HudLabels,
    input: InputState,
    /// Key tracking for terminals without release events; `None` when the
    /// terminal reports releases itself.
    press_only: Option<PressOnlyKeys>,
    viewport: Option<Viewport>,
    grid: Option<Grid>,
}

impl Player {
    pub fn new(session: Session, config: GalleryConfig, assets: PhotoAssets) -> Self {
        let labels = HudLabels {
            activate: binding_label(&config.key_bindings.activate),
            cancel: binding_label(&config.key_bindings.cancel),
        };
        Self {
            session,
            config,
            assets,
            labels,
            input: InputState::new(),
            press_only: None,
            viewport: None,
            grid: None,
        }
    }

    /// Run the session in the terminal until the quit key.
    ///
    /// Sets up the terminal, enters the tick loop, and restores the terminal
    /// on exit (even on error).
    pub fn play(&mut self) -> Result<()> {
        let (term_w, term_h) = terminal::size()?;
        if term_w < MIN_WIDTH || term_h < MIN_HEIGHT {
            bail!(
                "Terminal too small: need {}x{}, have {}x{}",
                MIN_WIDTH,
                MIN_HEIGHT,
                term_w,
                term_h,
            );
        }

        let mut stdout = io::stdout();
        terminal::enable_raw_mode()?;
        let release_events = terminal::supports_keyboard_enhancement().unwrap_or(false);
        if release_events {
            execute!(
                stdout,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
        }
        info!(
            "terminal {term_w}x{term_h}, key release events {}",
            if release_events { "on" } else { "off" }
        );
        if !release_events {
            let display = &self.config.display;
            self.press_only = Some(PressOnlyKeys::new(
                Duration::from_millis(display.hold_window_ms),
                Duration::from_millis(display.repeat_gap_ms),
            ));
        }
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::Clear(terminal::ClearType::All),
        )?;

        let result = self.run_loop(&mut stdout);

        // Always restore terminal state.
        if release_events {
            let _ = execute!(stdout, PopKeyboardEnhancementFlags);
        }
        let _ = execute!(stdout, cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();

        result
    }

    // -----------------------------------------------------------------------
    // Tick loop
    // -----------------------------------------------------------------------

    fn run_loop(&mut self, stdout: &mut io::Stdout) -> Result<()> {
        let tick = Duration::from_secs(1) / self.config.display.tick_rate.max(1);
        let mut last = Instant::now();

        loop {
            let deadline = last + tick;
            loop {
                let remaining = deadline.saturating_duration_since(Instant::now());
                if !event::poll(remaining)? {
                    break;
                }
                match event::read()? {
                    Event::Key(key) => {
                        if self.handle_key(key) {
                            return Ok(());
                        }
                    }
                    Event::Resize(_, _) => {
                        self.viewport = None;
                        self.grid = None;
                        execute!(stdout, terminal::Clear(terminal::ClearType::All))?;
                    }
                    _ => {}
                }
            }

            let now = Instant::now();
            let dt = now - last;
            last = now;

            if let Some(keys) = &mut self.press_only {
                keys.expire(now, &mut self.input);
            }
            let events = self.session.tick(&self.input, dt);
            if let Some(keys) = &self.press_only {
                keys.end_tick(&mut self.input);
            }
            self.input.end_tick();
            for event in &events {
                debug!("{event:?}");
            }

            self.draw(stdout)?;
        }
    }

    /// Feed one key event into the input state. Returns `true` on quit.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        let bindings = &self.config.key_bindings;
        match key.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => {
                if bindings.is_quit(&key) {
                    return true;
                }
                if let Some(control) = bindings.control_for(&key) {
                    match &mut self.press_only {
                        Some(keys) => keys.press(control, Instant::now(), &mut self.input),
                        None => self.input.set_pressed(control),
                    }
                }
            }
            KeyEventKind::Release => {
                if let Some(control) = bindings.control_for(&key) {
                    self.input.set_released(control);
                }
            }
        }
        false
    }

    // -----------------------------------------------------------------------
    // Terminal output
    // -----------------------------------------------------------------------

    fn current_viewport(&mut self) -> Result<Viewport> {
        if let Some(viewport) = self.viewport {
            return Ok(viewport);
        }
        let (term_w, term_h) = terminal::size()?;
        let viewport = Viewport {
            width: term_w,
            height: term_h.saturating_sub(CHROME_ROWS),
            units_per_column: self.config.display.units_per_column,
        };
        self.session.set_view_width(viewport.world_width());
        self.viewport = Some(viewport);
        Ok(viewport)
    }

    fn draw(&mut self, stdout: &mut io::Stdout) -> Result<()> {
        let viewport = self.current_viewport()?;
        let full_redraw = self.grid.is_none();

        let scene = Hud::new(viewport, &self.labels, &self.assets).present(&self.session);
        let (grid, frame) = Renderer::render(self.grid.as_ref(), &scene);

        if full_redraw {
            self.render_menubar(stdout)?;
        }
        match frame {
            Frame::Full { cells } => {
                for (y, row) in cells.iter().enumerate() {
                    queue!(stdout, cursor::MoveTo(0, y as u16 + CANVAS_OFFSET))?;
                    for cell in row {
                        let cs = to_content_style(&cell.style);
                        queue!(
                            stdout,
                            style::PrintStyledContent(style::StyledContent::new(cs, cell.ch))
                        )?;
                    }
                }
            }
            Frame::Diff { changes } => {
                for change in changes {
                    let cs = to_content_style(&change.cell.style);
                    queue!(
                        stdout,
                        cursor::MoveTo(change.x, change.y + CANVAS_OFFSET),
                        style::PrintStyledContent(style::StyledContent::new(cs, change.cell.ch)),
                    )?;
                }
            }
        }
        self.render_status(stdout, viewport)?;
        stdout.flush()?;

        self.grid = Some(grid);
        Ok(())
    }

    fn render_menubar(&self, stdout: &mut io::Stdout) -> Result<()> {
        let bindings = &self.config.key_bindings;
        let items = [
            format!(
                "[{}][{}] walk",
                arrow_label(&bindings.left),
                arrow_label(&bindings.right)
            ),
            format!("[{}] view", self.labels.activate),
            format!("[{}] close", self.labels.cancel),
            format!("[{}] quit", binding_label(&bindings.quit)),
        ];

        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            terminal::Clear(terminal::ClearType::CurrentLine),
            style::Print(" "),
        )?;
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                queue!(stdout, style::Print("  "))?;
            }
            print_menu_item(stdout, item)?;
        }
        Ok(())
    }

    fn render_status(&self, stdout: &mut io::Stdout, viewport: Viewport) -> Result<()> {
        let status_y = viewport.height + CANVAS_OFFSET;
        let progress = self.session.progress();
        let place = match self.session.proximity().nearest {
            Some(index) if !self.session.viewer().is_open() => format!("at photo {}", index + 1),
            _ => "walking".to_string(),
        };
        let elapsed = self.session.elapsed().as_secs();
        let status = format!(
            " {} | viewed {}/{} | {:02}:{:02} ",
            place,
            progress.count(),
            progress.catalog_size(),
            elapsed / 60,
            elapsed % 60,
        );

        let mut cs = style::ContentStyle::default();
        cs.attributes.set(style::Attribute::Dim);

        queue!(
            stdout,
            cursor::MoveTo(0, status_y),
            terminal::Clear(terminal::ClearType::CurrentLine),
            style::PrintStyledContent(style::StyledContent::new(cs, status)),
        )?;
        Ok(())
    }
}

fn arrow_label(binding: &str) -> String {
    match binding {
        "Left" => "\u{2190}".into(),
        "Right" => "\u{2192}".into(),
        other => binding_label(other),
    }
}

// ---------------------------------------------------------------------------
// Style conversion
// ---------------------------------------------------------------------------

pub fn to_content_style(s: &Style) -> style::ContentStyle {
    let mut cs = style::ContentStyle::default();
    if let Some(fg) = &s.fg {
        cs.foreground_color = Some(to_ct_color(fg));
    }
    if let Some(bg) = &s.bg {
        cs.background_color = Some(to_ct_color(bg));
    }
    if s.bold {
        cs.attributes.set(style::Attribute::Bold);
    }
    if s.dim {
        cs.attributes.set(style::Attribute::Dim);
    }
    cs
}

pub fn to_ct_color(c: &Color) -> style::Color {
    match c {
        Color::Named(n) => match n {
            NamedColor::Black => style::Color::Black,
            NamedColor::Red => style::Color::Red,
            NamedColor::Green => style::Color::Green,
            NamedColor::Yellow => style::Color::Yellow,
            NamedColor::Blue => style::Color::Blue,
            NamedColor::Magenta => style::Color::Magenta,
            NamedColor::Cyan => style::Color::Cyan,
            NamedColor::White => style::Color::White,
        },
        Color::Rgb { r, g, b } => style::Color::Rgb {
            r: *r,
            g: *g,
            b: *b,
        },
    }
}
