//! Puzzle model tests - shuffle, swap and completion through the facade crate

use std::collections::HashSet;

use tui_tiles::core::{PiecePosition, PuzzleModel, SimpleRng};
use tui_tiles::types::{LevelDescriptor, PieceId};

fn level(elements: u32) -> LevelDescriptor {
    LevelDescriptor::new(1, "picsum-1", elements).unwrap()
}

#[test]
fn test_initialize_builds_grid_from_elements() {
    for (elements, grid) in [(4, 2), (9, 3), (16, 4), (25, 5)] {
        let model = PuzzleModel::with_seed(level(elements), 1);
        assert_eq!(model.grid_size(), grid);
        assert_eq!(model.len(), elements as usize);
        for (i, piece) in model.pieces().iter().enumerate() {
            assert_eq!(piece.id(), PieceId(i));
            assert_eq!(piece.correct_position(), i);
            assert!(!piece.is_dragging() && !piece.is_drag_over());
        }
    }
}

#[test]
fn test_fresh_puzzle_is_a_shuffled_bijection() {
    let mut model = PuzzleModel::with_seed(level(9), 2024);
    for _ in 0..1000 {
        model.shuffle_pieces();
        assert!(model.is_bijection());
        assert!(!model.check_completion(), "shuffle produced a solved board");
        assert!(!model.is_completed());
    }
}

#[test]
fn test_small_grid_reshuffles_never_solved() {
    // 1 in 24 permutations of a 2x2 grid is solved; the retry must catch them.
    let mut model = PuzzleModel::with_seed(level(4), 7);
    for _ in 0..500 {
        model.shuffle_pieces();
        assert!(!model.check_completion());
    }
}

#[test]
fn test_shuffle_reaches_many_arrangements() {
    let mut model = PuzzleModel::new(level(9), SimpleRng::new(99));
    let seen: HashSet<Vec<usize>> = (0..200)
        .map(|_| {
            model.shuffle_pieces();
            model.arrangement()
        })
        .collect();
    assert!(seen.len() > 150, "only {} distinct arrangements", seen.len());
}

#[test]
fn test_swap_twice_restores_arrangement() {
    let mut model = PuzzleModel::with_seed(level(16), 3);
    let before = model.arrangement();
    for (a, b) in [(0, 15), (3, 4), (7, 7)] {
        model.swap_pieces(PieceId(a), PieceId(b));
        model.swap_pieces(PieceId(a), PieceId(b));
        assert_eq!(model.arrangement(), before);
    }
}

#[test]
fn test_swap_unknown_piece_changes_nothing() {
    let mut model = PuzzleModel::with_seed(level(9), 3);
    let before = model.arrangement();
    assert!(!model.swap_pieces(PieceId(0), PieceId(9)));
    assert_eq!(model.arrangement(), before);
}

#[test]
fn test_last_swap_completes_puzzle() {
    let mut model = PuzzleModel::with_seed(level(9), 5);
    model.arrange(&[0, 1, 2, 3, 4, 5, 6, 8, 7]);
    assert!(!model.is_completed());

    assert!(model.swap_pieces(PieceId(7), PieceId(8)));
    assert!(model.is_completed());
    assert!(model.pieces().iter().all(|p| p.is_in_place()));
}

#[test]
fn test_any_single_pair_breaks_completion() {
    let mut model = PuzzleModel::with_seed(level(9), 5);
    model.arrange(&[0, 1, 2, 3, 4, 5, 6, 7, 8]);
    assert!(model.check_completion());
    for a in 0..9 {
        for b in (a + 1)..9 {
            model.swap_pieces(PieceId(a), PieceId(b));
            assert!(!model.check_completion(), "swap {a}<->{b} left it solved");
            model.swap_pieces(PieceId(a), PieceId(b));
            assert!(model.check_completion());
        }
    }
}

#[test]
fn test_non_solving_swap_reports_false() {
    let mut model = PuzzleModel::with_seed(level(9), 5);
    model.arrange(&[1, 0, 2, 3, 4, 5, 6, 8, 7]);
    assert!(!model.swap_pieces(PieceId(7), PieceId(8)));
    assert!(!model.is_completed());
    assert!(model.swap_pieces(PieceId(0), PieceId(1)));
}

#[test]
fn test_reinitialize_replaces_pieces_and_bumps_generation() {
    let mut model = PuzzleModel::with_seed(level(9), 5);
    model.set_dragging(PieceId(2), true);
    let generation = model.generation();

    model.initialize(LevelDescriptor::new(2, "picsum-2", 25).unwrap());
    assert_eq!(model.generation(), generation + 1);
    assert_eq!(model.grid_size(), 5);
    assert_eq!(model.level().image.as_str(), "picsum-2");
    assert!(model.pieces().iter().all(|p| !p.is_dragging()));
    assert!(model.pieces().iter().all(|p| p.image().as_str() == "picsum-2"));
}

#[test]
fn test_geometry_for_center_of_3x3() {
    let model = PuzzleModel::with_seed(level(9), 1);
    let center = PiecePosition::for_slot(4, 3);
    assert_eq!(center.top.to_string(), format!("{}%", 100.0 / 3.0));
    assert_eq!((center.row, center.col), (1, 1));

    let piece = model.piece(PieceId(4)).unwrap();
    let background = model.piece_background(piece);
    assert_eq!(background.background_size(), "300% 300%");
    assert_eq!(background.background_position(), "50% 50%");
}

#[test]
fn test_piece_at_matches_current_positions() {
    let model = PuzzleModel::with_seed(level(16), 8);
    for piece in model.pieces() {
        assert_eq!(
            model.piece_at(piece.current_position()).map(|p| p.id()),
            Some(piece.id())
        );
    }
    assert!(model.piece_at(16).is_none());
}
