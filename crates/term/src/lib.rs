//! Terminal "game renderer" for the puzzle.
//!
//! A small rendering layer that draws into a framebuffer of styled cells and
//! flushes only what changed. It deliberately avoids widget toolkits: the
//! board geometry has to match the hit-testing geometry cell for cell.
//!
//! - [`fb`]: framebuffer, cells and colors
//! - [`puzzle_view`]: pure mapping from a level session to a framebuffer
//! - [`renderer`]: terminal setup/teardown and diff flushing

pub mod fb;
pub mod puzzle_view;
pub mod renderer;

pub use tui_tiles_core as core;
pub use tui_tiles_engine as engine;
pub use tui_tiles_input as input;
pub use tui_tiles_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use puzzle_view::{image_color, BoardGeometry, Hud, Phase, PuzzleView, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
