//! Core puzzle logic - pure, deterministic, and testable
//!
//! This crate owns the grid of pieces and everything that can be said about it
//! without knowing how the player interacts with it or how it is drawn.
//!
//! # Module Structure
//!
//! - [`puzzle`]: [`PuzzleModel`] and [`Piece`]: shuffle, swap, completion, lookups
//! - [`geometry`]: percentage placement and background windows for rendering
//! - [`rng`]: seedable LCG with Fisher-Yates shuffling
//!
//! # Rules
//!
//! - A level with `N` elements becomes a `sqrt(N) × sqrt(N)` grid
//! - Every piece has a fixed correct slot (`id == correct_position`)
//! - A fresh puzzle is never already solved
//! - Swapping two pieces is the only move; the puzzle is solved when every
//!   piece is back in its correct slot
//!
//! # Example
//!
//! ```
//! use tui_tiles_core::PuzzleModel;
//! use tui_tiles_types::{LevelDescriptor, PieceId};
//!
//! let level = LevelDescriptor::new(1, "picsum-1", 9).unwrap();
//! let mut puzzle = PuzzleModel::with_seed(level, 12345);
//! assert!(!puzzle.check_completion());
//!
//! // Put piece 0 into slot 0 by swapping it with whoever is there.
//! let occupant = puzzle.piece_at(0).unwrap().id();
//! if occupant != PieceId(0) {
//!     puzzle.swap_pieces(PieceId(0), occupant);
//! }
//! assert_eq!(puzzle.piece(PieceId(0)).unwrap().current_position(), 0);
//! ```

pub mod geometry;
pub mod puzzle;
pub mod rng;

pub use tui_tiles_types as types;

// Re-export commonly used types for convenience
pub use geometry::{hit_test, row_col, PieceBackground, PiecePosition};
pub use puzzle::{Piece, PuzzleModel, MAX_SHUFFLE_ATTEMPTS};
pub use rng::SimpleRng;
