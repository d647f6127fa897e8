//! Puzzle model - the grid of pieces and the only mutator of its arrangement
//!
//! Pieces live in a vector indexed by [`PieceId`]; `id == correct_position`
//! and never changes. `current_position` values always form a permutation
//! of `0..N`. Gameplay mutates the arrangement exclusively through
//! [`PuzzleModel::swap_pieces`].

use tracing::{debug, warn};

use crate::geometry::{PieceBackground, PiecePosition};
use crate::rng::SimpleRng;
use crate::types::{ImageRef, LevelDescriptor, PieceId, Position};

/// Upper bound on reshuffles while looking for an unsolved arrangement.
///
/// Only a one-piece grid can exhaust it; for N >= 4 the chance of even one
/// retry is at most 1/24.
pub const MAX_SHUFFLE_ATTEMPTS: u32 = 64;

/// One tile of the puzzle.
#[derive(Debug, Clone, PartialEq)]
pub struct Piece {
    id: PieceId,
    correct_position: Position,
    current_position: Position,
    image: ImageRef,
    is_dragging: bool,
    is_drag_over: bool,
}

impl Piece {
    fn new(index: usize, image: ImageRef) -> Self {
        Self {
            id: PieceId(index),
            correct_position: index,
            current_position: index,
            image,
            is_dragging: false,
            is_drag_over: false,
        }
    }

    pub fn id(&self) -> PieceId {
        self.id
    }

    pub fn correct_position(&self) -> Position {
        self.correct_position
    }

    pub fn current_position(&self) -> Position {
        self.current_position
    }

    pub fn image(&self) -> &ImageRef {
        &self.image
    }

    /// This piece is being carried by an active drag.
    pub fn is_dragging(&self) -> bool {
        self.is_dragging
    }

    /// This piece is the highlighted drop target of an active drag.
    pub fn is_drag_over(&self) -> bool {
        self.is_drag_over
    }

    pub fn is_in_place(&self) -> bool {
        self.current_position == self.correct_position
    }
}

/// Complete puzzle state for one level.
#[derive(Debug, Clone)]
pub struct PuzzleModel {
    level: LevelDescriptor,
    grid_size: usize,
    pieces: Vec<Piece>,
    is_completed: bool,
    rng: SimpleRng,
    /// Bumped on every `initialize`; gestures started on an older generation are stale.
    generation: u64,
}

impl PuzzleModel {
    /// Build and shuffle a puzzle for `level`.
    ///
    /// `level.elements` must be a perfect square; see [`LevelDescriptor::validate`].
    pub fn new(level: LevelDescriptor, rng: SimpleRng) -> Self {
        let mut model = Self {
            grid_size: level.grid_size(),
            level,
            pieces: Vec::new(),
            is_completed: false,
            rng,
            generation: 0,
        };
        model.initialize_pieces();
        model
    }

    /// Deterministic puzzle for tests and replays.
    pub fn with_seed(level: LevelDescriptor, seed: u32) -> Self {
        Self::new(level, SimpleRng::new(seed))
    }

    /// Replace the whole piece collection for `level` and shuffle it.
    pub fn initialize(&mut self, level: LevelDescriptor) {
        self.grid_size = level.grid_size();
        self.level = level;
        self.initialize_pieces();
    }

    fn initialize_pieces(&mut self) {
        let image = self.level.image.clone();
        self.pieces = (0..self.level.elements as usize)
            .map(|i| Piece::new(i, image.clone()))
            .collect();
        self.generation = self.generation.wrapping_add(1);
        debug!(
            level = self.level.level,
            pieces = self.pieces.len(),
            generation = self.generation,
            "puzzle initialized"
        );
        self.shuffle_pieces();
    }

    /// Assign a fresh uniformly random arrangement that is never already solved.
    pub fn shuffle_pieces(&mut self) {
        let mut attempts = 0;
        loop {
            attempts += 1;
            let positions = self.rng.permutation(self.pieces.len());
            for (piece, position) in self.pieces.iter_mut().zip(positions) {
                piece.current_position = position;
            }

            if !self.check_completion() {
                break;
            }
            if attempts >= MAX_SHUFFLE_ATTEMPTS {
                warn!(
                    pieces = self.pieces.len(),
                    attempts, "every shuffle came out solved; keeping arrangement"
                );
                break;
            }
            debug!(attempts, "shuffle produced a solved grid, reshuffling");
        }

        self.is_completed = false;
    }

    /// Exchange the slots of two pieces and report whether the puzzle is now solved.
    ///
    /// Callers guard against `a == b`; unknown ids leave the grid untouched.
    pub fn swap_pieces(&mut self, a: PieceId, b: PieceId) -> bool {
        let n = self.pieces.len();
        if a.index() >= n || b.index() >= n {
            warn!(%a, %b, "swap with unknown piece ignored");
            return false;
        }

        let pa = self.pieces[a.index()].current_position;
        let pb = self.pieces[b.index()].current_position;
        self.pieces[a.index()].current_position = pb;
        self.pieces[b.index()].current_position = pa;
        debug!(%a, %b, from = pa, to = pb, "pieces swapped");

        debug_assert!(self.is_bijection());

        if self.check_completion() {
            self.is_completed = true;
            debug!(level = self.level.level, "puzzle completed");
            return true;
        }
        false
    }

    /// True iff every piece sits in its correct slot.
    pub fn check_completion(&self) -> bool {
        self.pieces.iter().all(Piece::is_in_place)
    }

    /// The piece currently occupying `position`.
    pub fn piece_at(&self, position: Position) -> Option<&Piece> {
        self.pieces.iter().find(|p| p.current_position == position)
    }

    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(id.index())
    }

    pub fn piece_position(&self, piece: &Piece) -> PiecePosition {
        PiecePosition::for_slot(piece.current_position, self.grid_size)
    }

    pub fn piece_background(&self, piece: &Piece) -> PieceBackground {
        PieceBackground::for_slot(piece.correct_position, self.grid_size, piece.image.clone())
    }

    /// Clear every transient drag flag.
    pub fn reset_drag_states(&mut self) {
        for p in &mut self.pieces {
            p.is_dragging = false;
            p.is_drag_over = false;
        }
    }

    pub fn set_dragging(&mut self, id: PieceId, dragging: bool) {
        if let Some(p) = self.pieces.get_mut(id.index()) {
            p.is_dragging = dragging;
        }
    }

    /// Make `id` the only piece flagged as drop target.
    pub fn highlight_drop_target(&mut self, id: PieceId) {
        for p in &mut self.pieces {
            p.is_drag_over = p.id == id;
        }
    }

    pub fn clear_drag_over(&mut self) {
        for p in &mut self.pieces {
            p.is_drag_over = false;
        }
    }

    /// `current_position` values are exactly `0..N`, each once.
    pub fn is_bijection(&self) -> bool {
        let mut seen = vec![false; self.pieces.len()];
        for p in &self.pieces {
            match seen.get_mut(p.current_position) {
                Some(slot) if !*slot => *slot = true,
                _ => return false,
            }
        }
        true
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    pub fn is_completed(&self) -> bool {
        self.is_completed
    }

    pub fn level(&self) -> &LevelDescriptor {
        &self.level
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Place pieces at explicit slots (`arrangement[id] = position`).
    ///
    /// Test and replay helper; `arrangement` must be a permutation of `0..N`.
    pub fn arrange(&mut self, arrangement: &[Position]) {
        debug_assert_eq!(arrangement.len(), self.pieces.len());
        for (piece, &position) in self.pieces.iter_mut().zip(arrangement) {
            piece.current_position = position;
        }
        debug_assert!(self.is_bijection());
        self.is_completed = self.check_completion();
    }

    /// Current slot of every piece, indexed by id.
    pub fn arrangement(&self) -> Vec<Position> {
        self.pieces.iter().map(|p| p.current_position).collect()
    }
}
