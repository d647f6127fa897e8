//! PuzzleView: maps a [`LevelSession`] into a terminal framebuffer.
//!
//! This module is pure (no I/O). Tiles are painted by sampling the level's
//! artwork through each piece's background window, so a solved board shows
//! one continuous picture. Image references are opaque here; the artwork is a
//! procedural gradient seeded by the reference string.

use std::f64::consts::PI;

use crate::core::{PieceBackground, PiecePosition};
use crate::engine::{format_elapsed, Layout, LevelRecord, LevelSession};
use crate::fb::{Cell, CellStyle, FrameBuffer, Rgb};
use crate::types::{ImageRef, InputMode, Rect};

const FRAME_BG: Rgb = Rgb::new(30, 30, 40);
const BORDER: Rgb = Rgb::new(200, 200, 200);
const HOVER: Rgb = Rgb::new(250, 210, 60);
const SELECTED: Rgb = Rgb::new(60, 230, 120);
const CURSOR: Rgb = Rgb::new(90, 200, 250);
/// The slot a piece is being dragged out of shows the artwork this faintly.
const LIFTED_OPACITY: f32 = 0.35;

/// Rows reserved for the title above the board and status/help below it.
const HUD_ROWS: u16 = 3;

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Where the player is in the campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// The solved picture is on show before play starts.
    Preview {
        /// Whole seconds left.
        remaining: u64,
    },
    #[default]
    Playing,
    /// The last level is solved.
    CampaignComplete,
}

/// Text around the board that the session does not know about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hud<'a> {
    pub title: &'a str,
    pub level_count: usize,
    /// Whole seconds from the level timer.
    pub elapsed: u64,
    pub phase: Phase,
    /// Progress table shown beside the board; may be empty.
    pub progress: &'a [LevelRecord],
}

/// Where the board lands in a viewport, in terminal cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardGeometry {
    /// Top-left corner of the border.
    pub x: u16,
    pub y: u16,
    pub tile_w: u16,
    pub tile_h: u16,
    pub grid_size: u16,
}

impl BoardGeometry {
    pub fn frame_w(&self) -> u16 {
        self.grid_size * self.tile_w + 2
    }

    pub fn frame_h(&self) -> u16 {
        self.grid_size * self.tile_h + 2
    }

    /// The grid inside the border.
    pub fn container(&self) -> Rect {
        Rect::new(
            self.x as f32 + 1.0,
            self.y as f32 + 1.0,
            (self.grid_size * self.tile_w) as f32,
            (self.grid_size * self.tile_h) as f32,
        )
    }

    /// Container plus border: the area a drag may wander over without leaving.
    pub fn surface(&self) -> Rect {
        Rect::new(
            self.x as f32,
            self.y as f32,
            self.frame_w() as f32,
            self.frame_h() as f32,
        )
    }

    pub fn layout(&self) -> Layout {
        Layout::new(self.container(), self.surface())
    }
}

/// A lightweight terminal renderer for the puzzle board.
pub struct PuzzleView {
    /// Tile width per row of tile height; 2 compensates for tall glyphs.
    aspect: u16,
}

impl Default for PuzzleView {
    fn default() -> Self {
        Self { aspect: 2 }
    }
}

impl PuzzleView {
    /// Largest square-looking tiles that fit, centered below the title row.
    pub fn geometry(&self, grid_size: usize, viewport: Viewport) -> BoardGeometry {
        let g = (grid_size as u16).max(1);
        let avail_w = viewport.width.saturating_sub(2);
        let avail_h = viewport.height.saturating_sub(2 + HUD_ROWS);
        let tile_h = (avail_h / g).min(avail_w / g / self.aspect).max(1);
        let tile_w = tile_h * self.aspect;

        let frame_w = g * tile_w + 2;
        let frame_h = g * tile_h + 2;
        BoardGeometry {
            x: viewport.width.saturating_sub(frame_w) / 2,
            y: 1 + viewport.height.saturating_sub(HUD_ROWS + frame_h) / 2,
            tile_w,
            tile_h,
            grid_size: g,
        }
    }

    /// Hit-testing geometry matching what [`render_into`](Self::render_into) draws.
    pub fn layout(&self, grid_size: usize, viewport: Viewport) -> Layout {
        self.geometry(grid_size, viewport).layout()
    }

    /// Render into an existing framebuffer, resizing it to the viewport.
    pub fn render_into(
        &self,
        session: &LevelSession,
        hud: &Hud<'_>,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(Cell::default());

        let model = session.model();
        let geo = self.geometry(model.grid_size(), viewport);
        let container = geo.container();

        fb.fill_rect(
            geo.x + 1,
            geo.y + 1,
            geo.frame_w() - 2,
            geo.frame_h() - 2,
            ' ',
            CellStyle::new(BORDER, FRAME_BG),
        );
        fb.outline(geo.x, geo.y, geo.frame_w(), geo.frame_h(), BORDER);

        // The preview shows every piece in its rightful slot.
        let previewing = matches!(hud.phase, Phase::Preview { .. });
        let solved = session.is_completed() || previewing;
        for piece in model.pieces() {
            let position = if previewing {
                PiecePosition::for_slot(piece.correct_position(), model.grid_size())
            } else {
                model.piece_position(piece)
            };
            let rect = position.to_rect(container);
            let (x, y) = (rect.x.round() as i32, rect.y.round() as i32);
            let background = model.piece_background(piece);
            let opacity = if piece.is_dragging() && !previewing {
                LIFTED_OPACITY
            } else {
                1.0
            };
            paint_tile(fb, x, y, geo.tile_w, geo.tile_h, &background, opacity);
            if !solved {
                label_tile(fb, x, y, geo.tile_w, geo.tile_h, piece.id().index() as u32 + 1);
            }
        }

        if !solved {
            self.draw_markers(fb, session, &geo);
        }

        let visual = session.drag().drag_visual();
        let overlay = visual
            .style
            .as_ref()
            .filter(|_| visual.active && !previewing);
        if let Some(style) = overlay {
            let x = (container.x + style.left).round() as i32;
            let y = (container.y + style.top).round() as i32;
            let (w, h) = (style.width.round() as u16, style.height.round() as u16);
            paint_tile(fb, x, y, w, h, &style.background, style.opacity);
            if let Some(id) = session.drag().dragged_piece() {
                label_tile(fb, x, y, w, h, id.index() as u32 + 1);
            }
        }

        self.draw_hud(fb, session, hud, &geo);
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(
        &self,
        session: &LevelSession,
        hud: &Hud<'_>,
        viewport: Viewport,
    ) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(session, hud, viewport, &mut fb);
        fb
    }

    /// Hover target, selection and keyboard cursor outlines.
    fn draw_markers(&self, fb: &mut FrameBuffer, session: &LevelSession, geo: &BoardGeometry) {
        let model = session.model();
        let slot_origin = |position: usize| {
            let g = geo.grid_size as usize;
            let (row, col) = ((position / g) as u16, (position % g) as u16);
            (geo.x + 1 + col * geo.tile_w, geo.y + 1 + row * geo.tile_h)
        };

        if session.mode() == InputMode::Select {
            let (x, y) = slot_origin(session.cursor().position());
            mark_tile(fb, x, y, geo.tile_w, geo.tile_h, CURSOR);
        }
        for piece in model.pieces() {
            let color = if piece.is_drag_over() {
                HOVER
            } else if session.selection().selected() == Some(piece.id()) {
                SELECTED
            } else {
                continue;
            };
            let (x, y) = slot_origin(piece.current_position());
            mark_tile(fb, x, y, geo.tile_w, geo.tile_h, color);
        }
    }

    fn draw_hud(
        &self,
        fb: &mut FrameBuffer,
        session: &LevelSession,
        hud: &Hud<'_>,
        geo: &BoardGeometry,
    ) {
        let label = CellStyle::default().bold();
        let value = CellStyle::default();
        let dim = CellStyle::default().dim();
        let level = session.model().level().level;

        if geo.y > 0 {
            let x = fb.put_str(geo.x, geo.y - 1, hud.title, label);
            let x = fb.put_str(x, geo.y - 1, "  level ", dim);
            let x = fb.put_u32(x, geo.y - 1, level, value);
            let x = fb.put_str(x, geo.y - 1, "/", dim);
            fb.put_u32(x, geo.y - 1, hud.level_count as u32, value);
        }

        let status_y = geo.y + geo.frame_h();
        let time = format_elapsed(hud.elapsed);
        let mut x = geo.x;
        if session.is_completed() {
            let solved = CellStyle::new(SELECTED, Rgb::default()).bold();
            x = fb.put_str(x, status_y, "SOLVED", solved);
        } else {
            x = fb.put_str(x, status_y, "LEVEL ", label);
            x = fb.put_u32(x, status_y, level, value);
        }
        x = fb.put_str(x, status_y, "  TIME ", label);
        x = fb.put_str(x, status_y, &time, value);
        x = fb.put_str(x, status_y, "  MOVES ", label);
        x = fb.put_u32(x, status_y, session.moves(), value);
        x = fb.put_str(x, status_y, "  MODE ", label);
        fb.put_str(x, status_y, session.mode().as_str(), value);

        let help = match hud.phase {
            Phase::Preview { .. } => "any key to start  q quit",
            Phase::CampaignComplete => "all levels solved  r replay  q quit",
            Phase::Playing if session.is_completed() => "n next level  r replay  q quit",
            Phase::Playing => {
                "drag: mouse  select: arrows+enter / right-click  tab mode  r restart  q quit"
            }
        };
        fb.put_str(geo.x, status_y + 1, help, dim);

        let banner = CellStyle::new(Rgb::new(0, 0, 0), SELECTED).bold();
        let by = geo.y + geo.frame_h() / 2;
        let centered = |len: usize| geo.x + geo.frame_w().saturating_sub(len as u16) / 2;
        match hud.phase {
            Phase::Preview { remaining } => {
                let text = " MEMORIZE  ";
                let x = fb.put_str(centered(text.len() + 2), by, text, banner);
                let x = fb.put_u32(x, by, remaining.min(9) as u32, banner);
                fb.put_str(x, by, " ", banner);
            }
            Phase::CampaignComplete => {
                let text = " CAMPAIGN COMPLETE ";
                fb.put_str(centered(text.len()), by, text, banner);
            }
            Phase::Playing if session.is_completed() => {
                let text = " SOLVED ";
                fb.put_str(centered(text.len()), by, text, banner);
            }
            Phase::Playing => {}
        }

        self.draw_progress(fb, hud, level, geo);
    }

    /// Per-level results to the right of the board.
    fn draw_progress(
        &self,
        fb: &mut FrameBuffer,
        hud: &Hud<'_>,
        current: u32,
        geo: &BoardGeometry,
    ) {
        if hud.progress.is_empty() {
            return;
        }
        let px = geo.x + geo.frame_w() + 2;
        let label = CellStyle::default().bold();
        let done = CellStyle::new(SELECTED, Rgb::default());
        let open = CellStyle::default().dim();

        let solved = hud.progress.iter().filter(|r| r.is_completed()).count();
        let x = fb.put_str(px, geo.y, "PROGRESS ", label);
        let x = fb.put_u32(x, geo.y, solved as u32, label);
        let x = fb.put_str(x, geo.y, "/", label);
        fb.put_u32(x, geo.y, hud.progress.len() as u32, label);

        for (row, record) in hud.progress.iter().enumerate() {
            let y = geo.y.saturating_add(1 + row as u16);
            let marker = if record.level == current { ">" } else { " " };
            let style = if record.is_completed() { done } else { open };
            let x = fb.put_str(px, y, marker, label);
            let x = fb.put_u32(x, y, record.level, style);
            let x = fb.put_str(x, y, "  ", style);
            match record.stats {
                Some(stats) => {
                    let x = fb.put_str(x, y, &format_elapsed(stats.time), style);
                    let x = fb.put_str(x, y, "  ", style);
                    let x = fb.put_u32(x, y, stats.moves, style);
                    fb.put_str(x, y, "mv", style);
                }
                None => {
                    fb.put_str(x, y, "--", style);
                }
            }
        }
    }
}

/// Paint the artwork window of `background` into a `w × h` cell tile at
/// `(x, y)`, clipped to the framebuffer. `opacity < 1` blends over what is
/// already there.
fn paint_tile(
    fb: &mut FrameBuffer,
    x: i32,
    y: i32,
    w: u16,
    h: u16,
    background: &PieceBackground,
    opacity: f32,
) {
    for dy in 0..h {
        for dx in 0..w {
            let (Ok(cx), Ok(cy)) = (u16::try_from(x + dx as i32), u16::try_from(y + dy as i32))
            else {
                continue;
            };
            let Some(under) = fb.get(cx, cy) else {
                continue;
            };
            let u = (dx as f64 + 0.5) / w as f64;
            let v = (dy as f64 + 0.5) / h as f64;
            let (iu, iv) = background.image_uv(u, v);
            let color = image_color(&background.image, iu, iv).over(under.style.bg, opacity);
            fb.set(cx, cy, Cell::new(' ', CellStyle::new(color.contrast(), color)));
        }
    }
}

/// Piece number centered in the tile.
fn label_tile(fb: &mut FrameBuffer, x: i32, y: i32, w: u16, h: u16, number: u32) {
    let digits = number.checked_ilog10().unwrap_or(0) as i32 + 1;
    let lx = x + (w as i32 - digits) / 2;
    let ly = y + h as i32 / 2;
    let Ok(ly) = u16::try_from(ly) else {
        return;
    };
    let mut n = number;
    for i in (0..digits).rev() {
        let digit = char::from(b'0' + (n % 10) as u8);
        n /= 10;
        if let Ok(cx) = u16::try_from(lx + i) {
            if let Some(cell) = fb.get(cx, ly) {
                fb.overprint(cx, ly, digit, cell.style.fg);
            }
        }
    }
}

/// Outline a tile; one-row tiles get bracket marks instead.
fn mark_tile(fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16, color: Rgb) {
    if h >= 2 {
        fb.outline(x, y, w, h, color);
    } else if w >= 2 {
        fb.overprint(x, y, '[', color);
        fb.overprint(x + w - 1, y, ']', color);
    }
}

/// Procedural stand-in for the artwork named by `image`, sampled at `(u, v)`.
pub fn image_color(image: &ImageRef, u: f64, v: f64) -> Rgb {
    let seed = fnv1a(image.as_str());
    let a = palette(seed);
    let b = palette(seed.rotate_right(21));
    let c = palette(seed.rotate_right(42));

    let u = u.clamp(0.0, 1.0);
    let v = v.clamp(0.0, 1.0);
    let wave = ((u * PI * 2.0).sin() * (v * PI * 3.0).cos() + 1.0) / 2.0;
    a.lerp(b, u as f32).lerp(c, (v * 0.6 + wave * 0.4) as f32)
}

fn palette(bits: u64) -> Rgb {
    Rgb::new(
        40 + (bits & 0xbf) as u8,
        40 + ((bits >> 8) & 0xbf) as u8,
        40 + ((bits >> 16) & 0xbf) as u8,
    )
}

fn fnv1a(s: &str) -> u64 {
    s.bytes().fold(0xcbf2_9ce4_8422_2325, |h, b| {
        (h ^ b as u64).wrapping_mul(0x0000_0100_0000_01b3)
    })
}
