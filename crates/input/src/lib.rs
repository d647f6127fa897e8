//! Interaction controllers (engine-facing).
//!
//! Two alternative front-ends to the same swap primitive:
//!
//! - [`DragController`]: continuous pointer drag with a floating overlay and
//!   geometric hit-testing against a cached container rectangle
//! - [`SelectionController`]: tap one piece, then another, to swap them
//!
//! Both hold piece ids, never references, and drop any gesture that began on a
//! puzzle that has since been re-initialized. The [`map`] module turns
//! `crossterm` events into [`InputEvent`]s.

pub mod cursor;
pub mod drag;
pub mod map;
pub mod selection;

pub use tui_tiles_core as core;
pub use tui_tiles_types as types;

pub use cursor::GridCursor;
pub use drag::{DragController, DragStarted, DragStyle, DragVisual, HoverUpdate};
pub use map::{
    cell_center, handle_key_event, handle_mouse_event, should_quit, Command, InputEvent,
    KeyAction,
};
pub use selection::{SelectionController, SelectionOutcome};
