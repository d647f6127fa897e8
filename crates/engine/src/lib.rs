//! Game engine: a playable level session, its clock, and the campaign.
//!
//! - [`session`]: [`LevelSession`] routes input to the drag or selection
//!   controller and counts moves
//! - [`timer`]: [`TimerController`], a cancellable 1 Hz elapsed-time tick
//! - [`campaign`]: JSON campaign loading and level navigation
//! - [`progress`]: per-level results and the pre-level picture preview
//!
//! The engine never reads the clock on behalf of the puzzle; the caller passes
//! the timer's reading into [`LevelSession::completion`].

pub mod campaign;
pub mod progress;
pub mod session;
pub mod timer;

pub use tui_tiles_core as core;
pub use tui_tiles_input as input;
pub use tui_tiles_types as types;

pub use campaign::{level_index, load_campaign, next_level, parse_campaign, CampaignError};
pub use progress::{LevelRecord, Preview, Progress};
pub use session::{
    CompletionEvent, CompletionStats, Layout, LevelSession, SessionEvent, SessionEvents,
};
pub use timer::{format_elapsed, TickCallback, TimerController};
