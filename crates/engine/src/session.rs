//! One level of play: the model plus both interaction controllers.
//!
//! Every [`InputEvent`] is routed to exactly one controller. Pointer gestures
//! drive the [`DragController`]; taps and the keyboard cursor drive the
//! [`SelectionController`]. Switching from one to the other abandons whatever
//! the previous controller was in the middle of.

use arrayvec::ArrayVec;
use tracing::{debug, info};

use crate::core::{hit_test, PuzzleModel, SimpleRng};
use crate::input::{DragController, GridCursor, InputEvent, SelectionController};
use crate::types::{InputMode, LevelDescriptor, PieceId, Point, Rect, SelectionAction};

/// Screen geometry the session hit-tests against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    /// The grid itself.
    pub container: Rect,
    /// Area that still counts as "over the puzzle" for drag-leave purposes.
    pub surface: Rect,
}

impl Layout {
    pub fn new(container: Rect, surface: Rect) -> Self {
        Self { container, surface }
    }
}

/// Observable outcome of one input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    ModeChanged(InputMode),
    DragStarted(PieceId),
    Hover(PieceId),
    DragEnded,
    Selected(PieceId),
    Deselected,
    Swapped { completed: bool },
}

/// Up to four events per input: mode change, cancel, swap, end.
pub type SessionEvents = ArrayVec<SessionEvent, 4>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionStats {
    /// Whole seconds on the clock when the last swap landed.
    pub time: u64,
    pub moves: u32,
}

/// Emitted once per solved level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionEvent {
    pub level: u32,
    pub stats: CompletionStats,
}

pub struct LevelSession {
    model: PuzzleModel,
    drag: DragController,
    selection: SelectionController,
    cursor: GridCursor,
    mode: InputMode,
    moves: u32,
}

impl LevelSession {
    pub fn new(level: LevelDescriptor, rng: SimpleRng) -> Self {
        let model = PuzzleModel::new(level, rng);
        let cursor = GridCursor::new(model.grid_size());
        Self {
            model,
            drag: DragController::new(),
            selection: SelectionController::new(),
            cursor,
            mode: InputMode::default(),
            moves: 0,
        }
    }

    pub fn with_seed(level: LevelDescriptor, seed: u32) -> Self {
        Self::new(level, SimpleRng::new(seed))
    }

    /// Route one input event. Returns what happened, in order.
    pub fn apply(&mut self, event: InputEvent, layout: Layout) -> SessionEvents {
        let mut out = SessionEvents::new();
        match event {
            InputEvent::PointerDown(p) => {
                if self.model.is_completed() {
                    return out;
                }
                self.switch_mode(InputMode::Drag, &mut out);
                if let Some(piece) = self.piece_under(p, layout.container) {
                    if let Some(started) =
                        self.drag
                            .start_drag(p, piece, layout.container, &mut self.model)
                    {
                        emit(&mut out, SessionEvent::DragStarted(started.dragged));
                    }
                }
            }
            InputEvent::PointerMove(p) => {
                if !self.drag.is_dragging() {
                    return out;
                }
                if layout.surface.contains(p) {
                    if let Some(update) = self.drag.handle_drag_move(p, &mut self.model) {
                        emit(&mut out, SessionEvent::Hover(update.hover));
                    }
                } else {
                    self.drag.handle_drag_leave(&mut self.model);
                }
            }
            InputEvent::PointerUp(_) => {
                if !self.drag.is_dragging() {
                    return out;
                }
                let swapping = self.drag.hover_piece().is_some();
                let completed = self.drag.drop_piece(&mut self.model);
                if swapping {
                    self.record_swap(completed, &mut out);
                }
                emit(&mut out, SessionEvent::DragEnded);
            }
            InputEvent::PointerCancel => {
                if self.drag.end_drag(&mut self.model) {
                    emit(&mut out, SessionEvent::DragEnded);
                }
            }
            InputEvent::Tap(p) => {
                if self.model.is_completed() {
                    return out;
                }
                if let Some(piece) = self.piece_under(p, layout.container) {
                    self.switch_mode(InputMode::Select, &mut out);
                    if let Some(position) =
                        self.model.piece(piece).map(|tile| tile.current_position())
                    {
                        self.cursor.jump_to(position);
                    }
                    self.tap(piece, &mut out);
                }
            }
            InputEvent::CursorMove(dir) => {
                self.switch_mode(InputMode::Select, &mut out);
                self.cursor.step(dir);
            }
            InputEvent::Activate => {
                if self.model.is_completed() {
                    return out;
                }
                self.switch_mode(InputMode::Select, &mut out);
                if let Some(piece) = self.model.piece_at(self.cursor.position()).map(|p| p.id()) {
                    self.tap(piece, &mut out);
                }
            }
        }
        out
    }

    /// Change the active modality, abandoning the other controller's gesture.
    pub fn set_mode(&mut self, mode: InputMode) -> SessionEvents {
        let mut out = SessionEvents::new();
        self.switch_mode(mode, &mut out);
        out
    }

    /// Reshuffle the current level from scratch.
    pub fn restart(&mut self) {
        let level = self.model.level().clone();
        self.load_level(level);
    }

    /// Replace the level. In-flight gestures belong to the old puzzle and are
    /// dropped.
    pub fn load_level(&mut self, level: LevelDescriptor) {
        self.drag.end_drag(&mut self.model);
        self.selection.clear_selection();
        self.model.initialize(level);
        self.cursor.reset(self.model.grid_size());
        self.moves = 0;
        info!(
            level = self.model.level().level,
            grid = self.model.grid_size(),
            "level loaded"
        );
    }

    /// Completion report once the puzzle is solved.
    pub fn completion(&self, elapsed: u64) -> Option<CompletionEvent> {
        self.model.is_completed().then(|| CompletionEvent {
            level: self.model.level().level,
            stats: CompletionStats {
                time: elapsed,
                moves: self.moves,
            },
        })
    }

    pub fn model(&self) -> &PuzzleModel {
        &self.model
    }

    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    pub fn selection(&self) -> &SelectionController {
        &self.selection
    }

    pub fn cursor(&self) -> &GridCursor {
        &self.cursor
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn is_completed(&self) -> bool {
        self.model.is_completed()
    }

    fn piece_under(&self, p: Point, container: Rect) -> Option<PieceId> {
        hit_test(p, container, self.model.grid_size())
            .and_then(|position| self.model.piece_at(position))
            .map(|piece| piece.id())
    }

    fn tap(&mut self, piece: PieceId, out: &mut SessionEvents) {
        let outcome = self.selection.handle_piece_selection(piece, &mut self.model);
        match outcome.action {
            SelectionAction::Selected => emit(out, SessionEvent::Selected(piece)),
            SelectionAction::Deselected => emit(out, SessionEvent::Deselected),
            SelectionAction::Swapped => self.record_swap(outcome.completed, out),
            SelectionAction::Ignored => {}
        }
    }

    fn record_swap(&mut self, completed: bool, out: &mut SessionEvents) {
        self.moves += 1;
        debug!(moves = self.moves, completed, "move recorded");
        emit(out, SessionEvent::Swapped { completed });
    }

    fn switch_mode(&mut self, mode: InputMode, out: &mut SessionEvents) {
        if self.mode == mode {
            return;
        }
        match mode {
            InputMode::Drag => {
                if self.selection.selected().is_some() {
                    self.selection.clear_selection();
                    emit(out, SessionEvent::Deselected);
                }
            }
            InputMode::Select => {
                if self.drag.end_drag(&mut self.model) {
                    emit(out, SessionEvent::DragEnded);
                }
            }
        }
        self.mode = mode;
        debug!(mode = mode.as_str(), "input mode changed");
        emit(out, SessionEvent::ModeChanged(mode));
    }
}

fn emit(out: &mut SessionEvents, event: SessionEvent) {
    if out.try_push(event).is_err() {
        debug!(?event, "session event dropped: buffer full");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Direction;

    // 3x3 grid of 100x100 tiles at (100, 50), one tile of slack around it.
    const LAYOUT: Layout = Layout {
        container: Rect::new(100.0, 50.0, 300.0, 300.0),
        surface: Rect::new(0.0, -50.0, 500.0, 500.0),
    };

    fn session() -> LevelSession {
        let level = LevelDescriptor::new(1, "img", 9).unwrap();
        let mut s = LevelSession::with_seed(level, 5);
        s.model.arrange(&[4, 1, 2, 3, 0, 5, 6, 7, 8]);
        s
    }

    fn center_of(slot: usize) -> Point {
        let (row, col) = (slot / 3, slot % 3);
        Point::new(
            100.0 + col as f32 * 100.0 + 50.0,
            50.0 + row as f32 * 100.0 + 50.0,
        )
    }

    #[test]
    fn drag_and_drop_solves_and_counts_move() {
        let mut s = session();

        let ev = s.apply(InputEvent::PointerDown(center_of(4)), LAYOUT);
        assert_eq!(ev.as_slice(), &[SessionEvent::DragStarted(PieceId(0))]);

        let ev = s.apply(InputEvent::PointerMove(center_of(0)), LAYOUT);
        assert_eq!(ev.as_slice(), &[SessionEvent::Hover(PieceId(4))]);

        let ev = s.apply(InputEvent::PointerUp(center_of(0)), LAYOUT);
        assert_eq!(
            ev.as_slice(),
            &[
                SessionEvent::Swapped { completed: true },
                SessionEvent::DragEnded
            ]
        );
        assert_eq!(s.moves(), 1);
        assert!(s.is_completed());

        let done = s.completion(42).unwrap();
        assert_eq!(done.level, 1);
        assert_eq!(done.stats, CompletionStats { time: 42, moves: 1 });
    }

    #[test]
    fn drop_without_target_is_not_a_move() {
        let mut s = session();
        s.apply(InputEvent::PointerDown(center_of(4)), LAYOUT);
        let ev = s.apply(InputEvent::PointerUp(center_of(4)), LAYOUT);
        assert_eq!(ev.as_slice(), &[SessionEvent::DragEnded]);
        assert_eq!(s.moves(), 0);
        assert!(s.completion(0).is_none());
    }

    #[test]
    fn leaving_the_surface_clears_hover() {
        let mut s = session();
        s.apply(InputEvent::PointerDown(center_of(4)), LAYOUT);
        s.apply(InputEvent::PointerMove(center_of(0)), LAYOUT);

        let ev = s.apply(InputEvent::PointerMove(Point::new(900.0, 900.0)), LAYOUT);
        assert!(ev.is_empty());
        assert!(s.drag().is_dragging());
        assert_eq!(s.drag().hover_piece(), None);

        s.apply(InputEvent::PointerUp(Point::new(900.0, 900.0)), LAYOUT);
        assert_eq!(s.moves(), 0);
        assert_eq!(s.model().arrangement(), vec![4, 1, 2, 3, 0, 5, 6, 7, 8]);
    }

    #[test]
    fn cancel_ends_drag_without_swap() {
        let mut s = session();
        s.apply(InputEvent::PointerDown(center_of(4)), LAYOUT);
        s.apply(InputEvent::PointerMove(center_of(0)), LAYOUT);

        let ev = s.apply(InputEvent::PointerCancel, LAYOUT);
        assert_eq!(ev.as_slice(), &[SessionEvent::DragEnded]);
        assert!(s
            .model()
            .pieces()
            .iter()
            .all(|p| !p.is_dragging() && !p.is_drag_over()));
        assert!(s.apply(InputEvent::PointerCancel, LAYOUT).is_empty());
    }

    #[test]
    fn pointer_down_outside_grid_starts_nothing() {
        let mut s = session();
        let ev = s.apply(InputEvent::PointerDown(Point::new(10.0, 10.0)), LAYOUT);
        assert!(ev.is_empty());
        assert!(!s.drag().is_dragging());
    }

    #[test]
    fn cursor_and_activate_swap_via_selection() {
        let mut s = session();

        let ev = s.apply(InputEvent::Activate, LAYOUT);
        assert_eq!(
            ev.as_slice(),
            &[
                SessionEvent::ModeChanged(InputMode::Select),
                SessionEvent::Selected(PieceId(4))
            ]
        );

        s.apply(InputEvent::CursorMove(Direction::Right), LAYOUT);
        s.apply(InputEvent::CursorMove(Direction::Down), LAYOUT);
        assert_eq!(s.cursor().position(), 4);

        let ev = s.apply(InputEvent::Activate, LAYOUT);
        assert_eq!(ev.as_slice(), &[SessionEvent::Swapped { completed: true }]);
        assert_eq!(s.moves(), 1);
        assert_eq!(s.selection().selected(), None);
    }

    #[test]
    fn tap_twice_deselects() {
        let mut s = session();
        s.apply(InputEvent::Tap(center_of(2)), LAYOUT);
        assert_eq!(s.cursor().position(), 2);
        let ev = s.apply(InputEvent::Tap(center_of(2)), LAYOUT);
        assert_eq!(ev.as_slice(), &[SessionEvent::Deselected]);
        assert_eq!(s.moves(), 0);
    }

    #[test]
    fn switching_to_select_cancels_drag() {
        let mut s = session();
        s.apply(InputEvent::PointerDown(center_of(4)), LAYOUT);
        s.apply(InputEvent::PointerMove(center_of(0)), LAYOUT);

        let ev = s.apply(InputEvent::CursorMove(Direction::Down), LAYOUT);
        assert_eq!(
            ev.as_slice(),
            &[
                SessionEvent::DragEnded,
                SessionEvent::ModeChanged(InputMode::Select)
            ]
        );
        assert!(!s.drag().is_dragging());
        assert_eq!(s.model().arrangement(), vec![4, 1, 2, 3, 0, 5, 6, 7, 8]);
    }

    #[test]
    fn switching_to_drag_clears_selection() {
        let mut s = session();
        s.apply(InputEvent::Activate, LAYOUT);
        assert_eq!(s.selection().selected(), Some(PieceId(4)));

        let ev = s.apply(InputEvent::PointerDown(center_of(1)), LAYOUT);
        assert_eq!(
            ev.as_slice(),
            &[
                SessionEvent::Deselected,
                SessionEvent::ModeChanged(InputMode::Drag),
                SessionEvent::DragStarted(PieceId(1))
            ]
        );
        assert_eq!(s.selection().selected(), None);
    }

    #[test]
    fn gestures_after_completion_are_ignored() {
        let mut s = session();
        s.apply(InputEvent::Tap(center_of(0)), LAYOUT);
        s.apply(InputEvent::Tap(center_of(4)), LAYOUT);
        assert!(s.is_completed());

        assert!(s.apply(InputEvent::Tap(center_of(1)), LAYOUT).is_empty());
        assert!(s.apply(InputEvent::Activate, LAYOUT).is_empty());
        assert!(s
            .apply(InputEvent::PointerDown(center_of(1)), LAYOUT)
            .is_empty());
        assert_eq!(s.selection().selected(), None);
    }

    #[test]
    fn restart_resets_moves_and_drops_gestures() {
        let mut s = session();
        s.apply(InputEvent::Tap(center_of(3)), LAYOUT);
        s.apply(InputEvent::Tap(center_of(5)), LAYOUT);
        assert_eq!(s.moves(), 1);
        s.apply(InputEvent::PointerDown(center_of(1)), LAYOUT);

        let generation = s.model().generation();
        s.restart();

        assert_eq!(s.moves(), 0);
        assert_eq!(s.model().generation(), generation + 1);
        assert!(!s.drag().is_dragging());
        assert!(!s.is_completed());
        assert!(s.model().is_bijection());
        assert_eq!(s.cursor().position(), 0);
    }

    #[test]
    fn load_level_resizes_cursor() {
        let mut s = session();
        s.load_level(LevelDescriptor::new(3, "img3", 16).unwrap());
        assert_eq!(s.model().grid_size(), 4);
        for _ in 0..10 {
            s.apply(InputEvent::CursorMove(Direction::Right), LAYOUT);
            s.apply(InputEvent::CursorMove(Direction::Down), LAYOUT);
        }
        assert_eq!(s.cursor().position(), 15);
        assert_eq!(s.model().level().level, 3);
    }

    #[test]
    fn set_mode_reports_change_once() {
        let mut s = session();
        assert_eq!(
            s.set_mode(InputMode::Select).as_slice(),
            &[SessionEvent::ModeChanged(InputMode::Select)]
        );
        assert!(s.set_mode(InputMode::Select).is_empty());
        assert_eq!(s.mode(), InputMode::Select);
    }
}
