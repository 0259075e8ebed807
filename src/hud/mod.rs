//! HUD — presents a session as draw operations.
//!
//! `Hud::present` is a pure function of the session state: the same session
//! always yields the same scene. It knows about world units, cameras and
//! overlays, but nothing about terminals or escape codes.

pub mod text;

use crate::engine::Session;
use crate::engine::catalog::{ImageRef, PhotoEntry};
use crate::engine::locomotion::{Actor, ActorKind, Facing};
use crate::engine::viewer::{Screen, ViewerSession, revealed_text};
use crate::types::{Cell, Color, DrawOp, NamedColor, ResolvedScene, Style};

use text::{draw_frame, fill, print, wrap};

/// Height of the world in world units; rows are scaled to fit it.
pub const WORLD_HEIGHT: f64 = 800.0;

const Z_FLOOR: i32 = 0;
const Z_STAND: i32 = 1;
const Z_ART: i32 = 2;
const Z_ACTOR: i32 = 4;
const Z_PROMPT: i32 = 5;
const Z_VIEWER: i32 = 10;
const Z_VIEWER_CONTENT: i32 = 11;
const Z_UNLOCK: i32 = 20;
const Z_UNLOCK_TEXT: i32 = 21;
const Z_TALLY: i32 = 22;

const THUMB_WIDTH: u16 = 12;
const THUMB_HEIGHT: u16 = 6;

const PINK: Color = Color::Rgb { r: 255, g: 102, b: 178 };
const HOT_PINK: Color = Color::Rgb { r: 255, g: 105, b: 180 };

/// Source of pixels for photos. Implemented by the player's asset store.
pub trait PhotoArt {
    /// `image` scaled to `cols × rows` cells, or `None` when the image
    /// couldn't be loaded.
    fn art(&self, image: &ImageRef, cols: u16, rows: u16) -> Option<Vec<Vec<Cell>>>;
}

/// Art source that never has any pixels; every photo gets a placeholder.
pub struct NoArt;

impl PhotoArt for NoArt {
    fn art(&self, _image: &ImageRef, _cols: u16, _rows: u16) -> Option<Vec<Vec<Cell>>> {
        None
    }
}

/// The canvas the HUD draws into and how world units map onto it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
    pub units_per_column: f64,
}

impl Viewport {
    pub fn world_width(&self) -> f64 {
        self.width as f64 * self.units_per_column
    }

    fn column(&self, screen_x: f64) -> Option<u16> {
        let col = (screen_x / self.units_per_column).floor();
        (0.0..self.width as f64).contains(&col).then_some(col as u16)
    }

    fn row(&self, world_y: f64) -> u16 {
        let row = (world_y / WORLD_HEIGHT * self.height as f64).floor();
        row.clamp(0.0, self.height.saturating_sub(1) as f64) as u16
    }
}

/// Labels the HUD needs from the key bindings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HudLabels {
    pub activate: String,
    pub cancel: String,
}

impl Default for HudLabels {
    fn default() -> Self {
        HudLabels {
            activate: "E".into(),
            cancel: "Esc".into(),
        }
    }
}

pub struct Hud<'a> {
    viewport: Viewport,
    labels: &'a HudLabels,
    art: &'a dyn PhotoArt,
}

impl<'a> Hud<'a> {
    pub fn new(viewport: Viewport, labels: &'a HudLabels, art: &'a dyn PhotoArt) -> Self {
        Hud {
            viewport,
            labels,
            art,
        }
    }

    pub fn present(&self, session: &Session) -> ResolvedScene {
        let mut scene = ResolvedScene::new(self.viewport.width, self.viewport.height);
        let ops = &mut scene.ops;

        self.floor(ops);
        for entry in session.catalog().entries() {
            self.stand(ops, session, entry);
        }
        // Back to front so the primary actor is drawn last.
        for actor in session.actors().iter().rev() {
            self.actor(ops, session, actor);
        }

        match session.viewer().screen() {
            Screen::Walking => {
                if session.proximity().nearest.is_some() {
                    self.prompt(ops, session);
                }
            }
            Screen::Viewing(viewing) => self.viewer(ops, session, viewing),
            Screen::Unlocked => self.unlock(ops, session),
        }

        self.tally(ops, session);
        scene
    }

    pub fn ground_row(&self) -> u16 {
        self.viewport.row(600.0)
    }

    fn floor(&self, ops: &mut Vec<DrawOp>) {
        let y = self.ground_row() + 1;
        if y >= self.viewport.height {
            return;
        }
        let style = Style {
            dim: true,
            ..Default::default()
        };
        for x in 0..self.viewport.width {
            ops.push(DrawOp { x, y, ch: '▔', style, z_order: Z_FLOOR });
        }
    }

    fn stand(&self, ops: &mut Vec<DrawOp>, session: &Session, entry: &PhotoEntry) {
        let screen = session.camera().to_screen(entry.position);
        let centre = (screen.x / self.viewport.units_per_column).floor();
        let left = centre - (THUMB_WIDTH / 2) as f64;
        if left + THUMB_WIDTH as f64 <= 0.0 || left >= self.viewport.width as f64 {
            return;
        }

        let top = self.viewport.row(entry.position.y).saturating_sub(THUMB_HEIGHT / 2);
        let viewed = session.progress().has_viewed(entry.index);
        let frame_style = if viewed {
            Style {
                fg: Some(PINK),
                ..Default::default()
            }
        } else {
            Style::fg(NamedColor::Yellow)
        };

        let mut box_ops = Vec::new();
        draw_frame(&mut box_ops, 0, 0, THUMB_WIDTH, THUMB_HEIGHT, frame_style, Z_STAND);
        self.photo_area(&mut box_ops, entry, 1, 1, THUMB_WIDTH - 2, THUMB_HEIGHT - 2, Z_ART);

        // Stand leg down to the floor.
        let leg_x = THUMB_WIDTH / 2;
        for y in THUMB_HEIGHT..self.ground_row().saturating_sub(top) + 1 {
            box_ops.push(DrawOp {
                x: leg_x,
                y,
                ch: '│',
                style: Style::fg(NamedColor::Yellow),
                z_order: Z_STAND,
            });
        }
        if viewed {
            box_ops.push(DrawOp {
                x: leg_x,
                y: THUMB_HEIGHT - 1,
                ch: '♥',
                style: Style { fg: Some(PINK), bold: true, ..Default::default() },
                z_order: Z_STAND + 1,
            });
        }

        // Stands slide in from either edge, so place relative ops with clipping.
        for op in box_ops {
            let x = left + op.x as f64;
            if (0.0..self.viewport.width as f64).contains(&x) {
                ops.push(DrawOp {
                    x: x as u16,
                    y: top + op.y,
                    ..op
                });
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn photo_area(
        &self,
        ops: &mut Vec<DrawOp>,
        entry: &PhotoEntry,
        x: u16,
        y: u16,
        w: u16,
        h: u16,
        z: i32,
    ) {
        if w == 0 || h == 0 {
            return;
        }
        match self.art.art(&entry.image, w, h) {
            Some(rows) => {
                for (dy, row) in rows.iter().enumerate().take(h as usize) {
                    for (dx, cell) in row.iter().enumerate().take(w as usize) {
                        ops.push(DrawOp {
                            x: x + dx as u16,
                            y: y + dy as u16,
                            ch: cell.ch,
                            style: cell.style,
                            z_order: z,
                        });
                    }
                }
            }
            None => {
                let style = Style {
                    dim: true,
                    ..Default::default()
                };
                fill(ops, x, y, w, h, style, z);
                let label = format!("#{}", entry.index + 1);
                let label_x = x + w.saturating_sub(label.chars().count() as u16) / 2;
                print(ops, label_x, y + h / 2, &label, style, z + 1);
            }
        }
    }

    fn actor(&self, ops: &mut Vec<DrawOp>, session: &Session, actor: &Actor) {
        let screen = session.camera().to_screen(actor.position);
        let Some(x) = self.viewport.column(screen.x) else {
            return;
        };
        let ground = self.ground_row();

        match actor.kind {
            ActorKind::Walker => {
                let colour = if std::ptr::eq(actor, session.primary()) {
                    NamedColor::Cyan
                } else {
                    NamedColor::Magenta
                };
                let style = Style { fg: Some(Color::Named(colour)), bold: true, ..Default::default() };
                let body = match (actor.frame % 2, actor.facing) {
                    (0, _) => '│',
                    (_, Facing::Right) => '/',
                    (_, Facing::Left) => '\\',
                };
                if ground > 0 {
                    ops.push(DrawOp { x, y: ground - 1, ch: '●', style, z_order: Z_ACTOR });
                }
                ops.push(DrawOp { x, y: ground, ch: body, style, z_order: Z_ACTOR });
            }
            ActorKind::Cat => {
                let style = Style::fg(NamedColor::White);
                let tail = if actor.frame % 2 == 0 { '~' } else { '-' };
                let (tail_x, head) = match actor.facing {
                    Facing::Right => (x.checked_sub(1), '>'),
                    Facing::Left => (x.checked_add(1), '<'),
                };
                ops.push(DrawOp { x, y: ground, ch: head, style, z_order: Z_ACTOR });
                if let Some(tx) = tail_x.filter(|&tx| tx < self.viewport.width) {
                    ops.push(DrawOp { x: tx, y: ground, ch: tail, style, z_order: Z_ACTOR });
                }
            }
        }
    }

    fn prompt(&self, ops: &mut Vec<DrawOp>, session: &Session) {
        let primary = session.primary();
        let screen = session.camera().to_screen(primary.position);
        let text = format!(" Press {} to view ", self.labels.activate);
        let len = text.chars().count() as u16;

        let col = (screen.x / self.viewport.units_per_column).floor().max(0.0) as u16;
        let x = col
            .saturating_sub(len / 2)
            .min(self.viewport.width.saturating_sub(len));
        let y = self.ground_row().saturating_sub(3);
        let style = Style {
            fg: Some(Color::Named(NamedColor::White)),
            bg: Some(Color::Named(NamedColor::Black)),
            bold: true,
            ..Default::default()
        };
        print(ops, x, y, &text, style, Z_PROMPT);
    }

    fn viewer(&self, ops: &mut Vec<DrawOp>, session: &Session, viewing: &ViewerSession) {
        let Viewport { width, height, .. } = self.viewport;
        let backdrop = Style {
            bg: Some(Color::Rgb { r: 0, g: 0, b: 0 }),
            dim: true,
            ..Default::default()
        };
        fill(ops, 0, 0, width, height, backdrop, Z_VIEWER);

        let entry = session.catalog().entry(viewing.photo_index);
        let half = width / 2;

        // Photo on the left half.
        let photo_w = half.saturating_sub(4);
        let photo_h = height.saturating_sub(4);
        let frame_style = Style::fg(NamedColor::White);
        draw_frame(ops, 2, 1, photo_w, photo_h, frame_style, Z_VIEWER_CONTENT);
        self.photo_area(
            ops,
            entry,
            3,
            2,
            photo_w.saturating_sub(2),
            photo_h.saturating_sub(2),
            Z_VIEWER_CONTENT,
        );

        // Caption on the right half, vertically centred on its full length so
        // the text doesn't jump as it types.
        let caption_w = width.saturating_sub(half + 3).max(1);
        let full_rows = wrap(&entry.caption, caption_w as usize).len() as u16;
        let top = height.saturating_sub(full_rows) / 2;
        let shown = revealed_text(&entry.caption, viewing.revealed);
        let style = Style::fg(NamedColor::White);
        for (i, row) in wrap(shown, caption_w as usize).iter().enumerate() {
            print(ops, half + 1, top + i as u16, row, style, Z_VIEWER_CONTENT);
        }

        let hint = format!("[{}] / [{}] close", self.labels.activate, self.labels.cancel);
        let hint_style = Style {
            dim: true,
            ..Default::default()
        };
        print(ops, half + 1, height.saturating_sub(1), &hint, hint_style, Z_VIEWER_CONTENT);
    }

    fn unlock(&self, ops: &mut Vec<DrawOp>, session: &Session) {
        let Viewport { width, height, .. } = self.viewport;
        let backdrop = Style {
            bg: Some(Color::Rgb { r: 17, g: 17, b: 17 }),
            ..Default::default()
        };
        fill(ops, 0, 0, width, height, backdrop, Z_UNLOCK);

        let text_w = (width as usize * 3 / 4).max(1);
        let rows = wrap(session.catalog().unlock_message(), text_w);
        let top = height.saturating_sub(rows.len() as u16) / 2;
        let style = Style {
            fg: Some(HOT_PINK),
            bg: Some(Color::Rgb { r: 17, g: 17, b: 17 }),
            bold: true,
            ..Default::default()
        };
        for (i, row) in rows.iter().enumerate() {
            let x = width.saturating_sub(row.chars().count() as u16) / 2;
            print(ops, x, top + i as u16, row, style, Z_UNLOCK_TEXT);
        }
    }

    fn tally(&self, ops: &mut Vec<DrawOp>, session: &Session) {
        let progress = session.progress();
        let text = format!("♥ {}/{}", progress.count(), progress.catalog_size());
        let x = self
            .viewport
            .width
            .saturating_sub(text.chars().count() as u16 + 2);
        let style = Style {
            fg: Some(PINK),
            bold: true,
            ..Default::default()
        };
        print(ops, x, 0, &text, style, Z_TALLY);
    }
}
