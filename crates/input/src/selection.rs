//! Two-tap swap interaction: tap a piece, then tap another to swap them.
//!
//! States: Empty → OneSelected → Empty. Never touches drag flags.

use tracing::{debug, warn};

use crate::core::PuzzleModel;
use crate::types::{PieceId, SelectionAction};

/// What a tap did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionOutcome {
    /// Selection after the tap.
    pub selected: Option<PieceId>,
    /// The tap's swap solved the puzzle.
    pub completed: bool,
    pub action: SelectionAction,
}

#[derive(Debug, Clone, Default)]
pub struct SelectionController {
    /// Selected piece and the model generation it was selected on.
    selected: Option<(PieceId, u64)>,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle_piece_selection(
        &mut self,
        tapped: PieceId,
        model: &mut PuzzleModel,
    ) -> SelectionOutcome {
        if model.piece(tapped).is_none() {
            warn!(%tapped, "tap on unknown piece ignored");
            return SelectionOutcome {
                selected: self.selected(),
                completed: false,
                action: SelectionAction::Ignored,
            };
        }

        if let Some((stale, generation)) = self.selected {
            if generation != model.generation() {
                warn!(%stale, "dropping selection from a replaced puzzle");
                self.selected = None;
            }
        }

        match self.selected() {
            None => {
                self.selected = Some((tapped, model.generation()));
                debug!(%tapped, "piece selected");
                SelectionOutcome {
                    selected: Some(tapped),
                    completed: false,
                    action: SelectionAction::Selected,
                }
            }
            Some(current) if current == tapped => {
                self.selected = None;
                debug!(%tapped, "piece deselected");
                SelectionOutcome {
                    selected: None,
                    completed: false,
                    action: SelectionAction::Deselected,
                }
            }
            Some(current) => {
                let completed = model.swap_pieces(current, tapped);
                self.selected = None;
                SelectionOutcome {
                    selected: None,
                    completed,
                    action: SelectionAction::Swapped,
                }
            }
        }
    }

    pub fn selected(&self) -> Option<PieceId> {
        self.selected.map(|(id, _)| id)
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LevelDescriptor;

    fn model() -> PuzzleModel {
        let level = LevelDescriptor::new(1, "img", 9).unwrap();
        let mut model = PuzzleModel::with_seed(level, 11);
        model.arrange(&[1, 0, 2, 3, 4, 5, 6, 7, 8]);
        model
    }

    #[test]
    fn first_tap_selects() {
        let mut model = model();
        let mut sel = SelectionController::new();
        let out = sel.handle_piece_selection(PieceId(3), &mut model);
        assert_eq!(out.action, SelectionAction::Selected);
        assert_eq!(out.selected, Some(PieceId(3)));
        assert_eq!(sel.selected(), Some(PieceId(3)));
    }

    #[test]
    fn same_piece_twice_deselects_without_mutation() {
        let mut model = model();
        let mut sel = SelectionController::new();
        let before = model.arrangement();

        sel.handle_piece_selection(PieceId(3), &mut model);
        let out = sel.handle_piece_selection(PieceId(3), &mut model);

        assert_eq!(
            out,
            SelectionOutcome {
                selected: None,
                completed: false,
                action: SelectionAction::Deselected,
            }
        );
        assert_eq!(model.arrangement(), before);
    }

    #[test]
    fn second_piece_swaps_and_reports_completion() {
        let mut model = model();
        let mut sel = SelectionController::new();
        sel.handle_piece_selection(PieceId(0), &mut model);
        let out = sel.handle_piece_selection(PieceId(1), &mut model);

        assert_eq!(out.action, SelectionAction::Swapped);
        assert!(out.completed);
        assert_eq!(out.selected, None);
        assert_eq!(sel.selected(), None);
        assert!(model.is_completed());
    }

    #[test]
    fn swap_that_does_not_solve() {
        let mut model = model();
        let mut sel = SelectionController::new();
        sel.handle_piece_selection(PieceId(4), &mut model);
        let out = sel.handle_piece_selection(PieceId(5), &mut model);
        assert_eq!(out.action, SelectionAction::Swapped);
        assert!(!out.completed);
        assert_eq!(model.piece(PieceId(4)).unwrap().current_position(), 5);
    }

    #[test]
    fn selection_never_sets_drag_flags() {
        let mut model = model();
        let mut sel = SelectionController::new();
        sel.handle_piece_selection(PieceId(4), &mut model);
        sel.handle_piece_selection(PieceId(5), &mut model);
        assert!(model
            .pieces()
            .iter()
            .all(|p| !p.is_dragging() && !p.is_drag_over()));
    }

    #[test]
    fn unknown_piece_is_ignored() {
        let mut model = model();
        let mut sel = SelectionController::new();
        sel.handle_piece_selection(PieceId(2), &mut model);
        let out = sel.handle_piece_selection(PieceId(99), &mut model);
        assert_eq!(out.action, SelectionAction::Ignored);
        assert_eq!(sel.selected(), Some(PieceId(2)));
    }

    #[test]
    fn stale_selection_is_dropped_after_reinitialize() {
        let mut model = model();
        let mut sel = SelectionController::new();
        sel.handle_piece_selection(PieceId(0), &mut model);

        model.initialize(LevelDescriptor::new(2, "img2", 9).unwrap());
        let before = model.arrangement();

        let out = sel.handle_piece_selection(PieceId(1), &mut model);
        assert_eq!(out.action, SelectionAction::Selected);
        assert_eq!(out.selected, Some(PieceId(1)));
        assert_eq!(model.arrangement(), before);
    }

    #[test]
    fn clear_drops_selection() {
        let mut model = model();
        let mut sel = SelectionController::new();
        sel.handle_piece_selection(PieceId(6), &mut model);
        assert_eq!(sel.selected(), Some(PieceId(6)));
        sel.clear_selection();
        assert_eq!(sel.selected(), None);

        let before = model.arrangement();
        let out = sel.handle_piece_selection(PieceId(2), &mut model);
        assert_eq!(out.action, SelectionAction::Selected);
        assert_eq!(model.arrangement(), before);
    }
}
