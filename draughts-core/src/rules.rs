//! Move legality, enumeration and application
//!
//! Stateless functions over a [`Board`]:
//! - capture availability (per square and position-wide)
//! - single-move validation under mandatory-capture and chain rules
//! - per-square and per-side move enumeration
//! - move application (relocation, promotion, capture removal)

use crate::board::{Board, Color, Pos, Square, BOARD_SIZE, DIRECTIONS};
use crate::moves::{ChainContext, Move, MoveOutcome};

// ============================================================================
// CAPTURE AVAILABILITY
// ============================================================================

/// Whether the piece on `pos` has a capture in any direction
///
/// Men look only at the adjacent square. Queens first slide over empty
/// squares. Either way the enemy piece must stand alone and the square right
/// behind it must be empty: queens never land further than that.
pub fn can_capture(board: &Board, pos: Pos) -> bool {
    let piece = board.at(pos);
    let Some(color) = piece.color() else {
        return false;
    };

    DIRECTIONS.iter().any(|&(dr, dc)| {
        let mut target = pos.offset(dr, dc);
        if piece.is_queen() {
            while board.at(target).is_empty() {
                target = target.offset(dr, dc);
            }
        }
        let occupant = board.at(target);
        occupant.is_piece()
            && !occupant.is_color(color)
            && board.run_length(target, dr, dc) == 1
            && board.at(target.offset(dr, dc)).is_empty()
    })
}

/// Whether any piece of `color` can capture
pub fn any_capture(board: &Board, color: Color) -> bool {
    board.pieces_of(color).any(|pos| can_capture(board, pos))
}

// ============================================================================
// VALIDATION
// ============================================================================

/// Validate `mv` and record the outcome on it
pub fn validate(mv: &mut Move, chain: &ChainContext, board: &Board) -> MoveOutcome {
    let active = chain.active_square(board);
    resolve(mv, active, board, |color| any_capture(board, color))
}

/// Checks in rule order, stopping at the first failure
fn resolve(
    mv: &mut Move,
    active: Option<Pos>,
    board: &Board,
    capture_pending: impl FnOnce(Color) -> bool,
) -> MoveOutcome {
    mv.outcome = MoveOutcome::Illegal;

    // Both ends on playable squares, then diagonal and non-zero
    if !board.at(mv.from).is_playable() || !board.at(mv.to).is_playable() || !mv.is_diagonal() {
        return mv.outcome;
    }

    // Piece on the origin, empty destination
    let piece = board.at(mv.from);
    let Some(color) = piece.color() else {
        return mv.outcome;
    };
    if !board.at(mv.to).is_empty() {
        return mv.outcome;
    }

    // Path: no own pieces, at most one enemy
    let enemies = board.ray_opposite_color(mv.from, mv.to, color);
    if enemies > 1 || board.ray_same_color(mv.from, mv.to, color) > 0 {
        return mv.outcome;
    }
    let is_capture = enemies == 1;

    if piece.is_man() {
        let distance = mv.distance();
        let length_ok = if is_capture { distance == 2 } else { distance == 1 };
        if !length_ok || (!is_capture && mv.direction().0 != color.forward()) {
            return mv.outcome;
        }
    } else if is_capture {
        // Queens land right behind the captured piece
        let (sr, sc) = mv.direction();
        if !board.at(mv.to.offset(-sr, -sc)).is_color(color.opponent()) {
            return mv.outcome;
        }
    }

    // An unfinished chain must be continued by the same piece
    if let Some(square) = active {
        if mv.from != square || !is_capture {
            return mv.outcome;
        }
    }

    if !is_capture && capture_pending(color) {
        return mv.outcome;
    }

    mv.outcome = if is_capture {
        MoveOutcome::Capture
    } else {
        MoveOutcome::Simple
    };
    mv.outcome
}

// ============================================================================
// ENUMERATION
// ============================================================================

/// Legal moves of the `color` piece on `pos`; `None` when there are none
pub fn moves_from(board: &Board, pos: Pos, color: Color, chain: &ChainContext) -> Option<Vec<Move>> {
    let active = chain.active_square(board);
    let mandatory = any_capture(board, color);
    collect_from(board, pos, color, active, mandatory)
}

/// Legal moves of every `color` piece, row-major; `None` when there are none
pub fn moves_all(board: &Board, color: Color, chain: &ChainContext) -> Option<Vec<Move>> {
    let active = chain.active_square(board);
    let mandatory = any_capture(board, color);

    let moves: Vec<Move> = board
        .pieces_of(color)
        .filter_map(|pos| collect_from(board, pos, color, active, mandatory))
        .flatten()
        .collect();

    if moves.is_empty() {
        None
    } else {
        Some(moves)
    }
}

fn collect_from(
    board: &Board,
    pos: Pos,
    color: Color,
    active: Option<Pos>,
    mandatory: bool,
) -> Option<Vec<Move>> {
    if !board.at(pos).is_playable() {
        return None;
    }
    if active.is_some_and(|square| square != pos) {
        return None;
    }
    if !board.at(pos).is_color(color) {
        return None;
    }
    if mandatory && !can_capture(board, pos) {
        return None;
    }

    let mut moves = Vec::new();
    for &(dr, dc) in &DIRECTIONS {
        for step in 1..BOARD_SIZE {
            let to = pos.offset(dr * step, dc * step);
            if !to.is_on_board() {
                break;
            }
            let mut mv = Move::new(pos, to);
            let outcome = resolve(&mut mv, active, board, |_| mandatory);
            if outcome == MoveOutcome::Capture || (outcome == MoveOutcome::Simple && !mandatory) {
                moves.push(mv);
            }
        }
    }

    if moves.is_empty() {
        None
    } else {
        Some(moves)
    }
}

// ============================================================================
// APPLICATION
// ============================================================================

/// Apply a validated move: relocate (promoting on the far row) and remove captured pieces
///
/// # Panics
/// If `mv` was not validated as a simple move or capture, or its origin is empty.
pub fn apply_move(board: &mut Board, mv: &Move) {
    assert!(mv.is_legal(), "applying unvalidated move {:?}", mv);
    let piece = board.at(mv.from);
    let Some(color) = piece.color() else {
        panic!("no piece on {:?} for move {:?}", mv.from, mv);
    };

    let landed = if piece.is_man() && mv.to.row == color.promotion_row() {
        piece.promoted()
    } else {
        piece
    };
    board.set(mv.to.row, mv.to.col, landed);
    board.set(mv.from.row, mv.from.col, Square::Empty);

    if mv.is_capture() {
        let (dr, dc) = mv.direction();
        let mut pos = mv.from.offset(dr, dc);
        while pos != mv.to {
            if let Some(victim) = board.at(pos).color() {
                board.set(pos.row, pos.col, Square::Empty);
                board.decrement(victim);
            }
            pos = pos.offset(dr, dc);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validated(board: &Board, mv: Move, chain: &ChainContext) -> Move {
        let mut mv = mv;
        validate(&mut mv, chain, board);
        mv
    }

    #[test]
    fn test_start_position_moves() {
        let board = Board::new();
        let white = moves_all(&board, Color::White, &ChainContext::none()).unwrap();
        let black = moves_all(&board, Color::Black, &ChainContext::none()).unwrap();
        assert_eq!(white.len(), 7);
        assert_eq!(black.len(), 7);
        assert!(white.iter().all(|mv| mv.outcome == MoveOutcome::Simple));
        assert!(!any_capture(&board, Color::White));
    }

    #[test]
    fn test_man_capture_is_forced() {
        let board = Board::with_pieces(&[(2, 3, Square::BlackMan), (3, 4, Square::WhiteMan)]);
        assert!(can_capture(&board, Pos::new(2, 3)));

        let moves = moves_from(&board, Pos::new(2, 3), Color::Black, &ChainContext::none()).unwrap();
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].to, Pos::new(4, 5));
        assert!(moves[0].is_capture());

        let mut after = board;
        apply_move(&mut after, &moves[0]);
        assert_eq!(after.get(3, 4), Square::Empty);
        assert_eq!(after.get(4, 5), Square::BlackMan);
        assert_eq!(after.count_of(Color::White), 0);
        assert_eq!(after.count_of(Color::Black), 1);
    }

    #[test]
    fn test_simple_move_rejected_while_capture_available() {
        let board = Board::with_pieces(&[
            (2, 3, Square::BlackMan),
            (3, 4, Square::WhiteMan),
            (0, 1, Square::BlackMan),
        ]);
        let mv = validated(&board, Move::between(0, 1, 1, 2), &ChainContext::none());
        assert_eq!(mv.outcome, MoveOutcome::Illegal);
        assert!(moves_from(&board, Pos::new(0, 1), Color::Black, &ChainContext::none()).is_none());
    }

    #[test]
    fn test_man_direction_rules() {
        let board = Board::with_pieces(&[(4, 3, Square::BlackMan), (3, 2, Square::WhiteMan)]);
        let chain = ChainContext::none();
        // both men may capture backward
        let black_back = validated(&board, Move::between(4, 3, 2, 1), &chain);
        assert_eq!(black_back.outcome, MoveOutcome::Capture);
        let white_back = validated(&board, Move::between(3, 2, 5, 4), &chain);
        assert_eq!(white_back.outcome, MoveOutcome::Capture);

        let lone = Board::with_pieces(&[(4, 3, Square::BlackMan)]);
        assert_eq!(validated(&lone, Move::between(4, 3, 3, 2), &chain).outcome, MoveOutcome::Illegal);
        assert_eq!(validated(&lone, Move::between(4, 3, 5, 4), &chain).outcome, MoveOutcome::Simple);
        assert_eq!(validated(&lone, Move::between(4, 3, 6, 5), &chain).outcome, MoveOutcome::Illegal);
    }

    #[test]
    fn test_geometry_rejections() {
        let board = Board::new();
        let chain = ChainContext::none();
        for mv in [
            Move::between(5, 0, 4, 0), // not diagonal
            Move::between(5, 0, 5, 0), // zero length
            Move::between(5, 0, 4, -1), // off board
            Move::between(4, 1, 3, 2), // empty origin
            Move::between(6, 1, 5, 0), // occupied destination
        ] {
            assert_eq!(validated(&board, mv, &chain).outcome, MoveOutcome::Illegal, "{:?}", mv);
        }
    }

    #[test]
    fn test_queen_capture_lands_right_behind() {
        let board = Board::with_pieces(&[
            (5, 6, Square::WhiteQueen),
            (3, 4, Square::BlackMan),
            (1, 2, Square::BlackMan),
        ]);
        assert!(can_capture(&board, Pos::new(5, 6)));

        let chain = ChainContext::none();
        let moves = moves_from(&board, Pos::new(5, 6), Color::White, &chain).unwrap();
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].to, Pos::new(2, 3));
        assert!(moves[0].is_capture());

        // two enemies on the path
        let far = validated(&board, Move::between(5, 6, 0, 1), &chain);
        assert_eq!(far.outcome, MoveOutcome::Illegal);
    }

    #[test]
    fn test_queen_cannot_overshoot_landing() {
        let board = Board::with_pieces(&[(5, 6, Square::WhiteQueen), (3, 4, Square::BlackMan)]);
        let chain = ChainContext::none();
        assert_eq!(validated(&board, Move::between(5, 6, 2, 3), &chain).outcome, MoveOutcome::Capture);
        assert_eq!(validated(&board, Move::between(5, 6, 1, 2), &chain).outcome, MoveOutcome::Illegal);
        assert_eq!(validated(&board, Move::between(5, 6, 0, 1), &chain).outcome, MoveOutcome::Illegal);
    }

    #[test]
    fn test_queen_slides_when_no_capture() {
        let board = Board::with_pieces(&[(7, 0, Square::WhiteQueen), (0, 1, Square::BlackMan)]);
        let moves = moves_from(&board, Pos::new(7, 0), Color::White, &ChainContext::none()).unwrap();
        assert_eq!(moves.len(), 7);
        assert!(moves.iter().all(|mv| mv.outcome == MoveOutcome::Simple));
    }

    #[test]
    fn test_adjacent_pair_cannot_be_captured() {
        let board = Board::with_pieces(&[
            (2, 3, Square::BlackMan),
            (3, 4, Square::WhiteMan),
            (4, 5, Square::WhiteMan),
        ]);
        assert!(!can_capture(&board, Pos::new(2, 3)));
        let mv = validated(&board, Move::between(2, 3, 5, 6), &ChainContext::none());
        assert_eq!(mv.outcome, MoveOutcome::Illegal);
    }

    #[test]
    fn test_own_piece_blocks_path() {
        let board = Board::with_pieces(&[(7, 0, Square::WhiteQueen), (5, 2, Square::WhiteMan)]);
        let mv = validated(&board, Move::between(7, 0, 4, 3), &ChainContext::none());
        assert_eq!(mv.outcome, MoveOutcome::Illegal);
    }

    fn chain_position() -> Board {
        Board::with_pieces(&[
            (2, 1, Square::BlackMan),
            (3, 2, Square::WhiteMan),
            (5, 4, Square::WhiteMan),
            (2, 7, Square::BlackMan),
            (3, 6, Square::WhiteMan),
        ])
    }

    #[test]
    fn test_chain_restricts_to_active_square() {
        let mut board = chain_position();
        let none = ChainContext::none();
        let before = moves_all(&board, Color::Black, &none).unwrap();
        assert_eq!(before.len(), 2);

        let first = validated(&board, Move::between(2, 1, 4, 3), &none);
        assert!(first.is_capture());
        apply_move(&mut board, &first);
        assert!(can_capture(&board, Pos::new(4, 3)));

        let chain = ChainContext::after(first);
        assert_eq!(chain.active_square(&board), Some(Pos::new(4, 3)));
        let moves = moves_all(&board, Color::Black, &chain).unwrap();
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].from, Pos::new(4, 3));
        assert_eq!(moves[0].to, Pos::new(6, 5));

        let other = validated(&board, Move::between(2, 7, 4, 5), &chain);
        assert_eq!(other.outcome, MoveOutcome::Illegal);
        assert!(moves_from(&board, Pos::new(2, 7), Color::Black, &chain).is_none());
    }

    #[test]
    fn test_promotion_before_chain_check() {
        let mut board = Board::with_pieces(&[
            (2, 3, Square::WhiteMan),
            (1, 2, Square::BlackMan),
            (3, 4, Square::BlackMan),
        ]);
        let mv = validated(&board, Move::between(2, 3, 0, 1), &ChainContext::none());
        assert!(mv.is_capture());
        apply_move(&mut board, &mv);
        assert_eq!(board.get(0, 1), Square::WhiteQueen);
        assert!(can_capture(&board, Pos::new(0, 1)));
    }

    #[test]
    fn test_simple_promotion() {
        let mut board = Board::with_pieces(&[(6, 1, Square::BlackMan), (3, 4, Square::WhiteMan)]);
        let mv = validated(&board, Move::between(6, 1, 7, 2), &ChainContext::none());
        assert_eq!(mv.outcome, MoveOutcome::Simple);
        apply_move(&mut board, &mv);
        assert_eq!(board.get(7, 2), Square::BlackQueen);
        assert_eq!(board.count_of(Color::Black), 1);
    }

    #[test]
    fn test_moves_from_foreign_or_invalid_square() {
        let board = Board::new();
        let chain = ChainContext::none();
        assert!(moves_from(&board, Pos::new(0, 0), Color::White, &chain).is_none());
        assert!(moves_from(&board, Pos::new(2, 1), Color::White, &chain).is_none());
        assert!(moves_from(&board, Pos::new(4, 1), Color::White, &chain).is_none());
    }

    #[test]
    fn test_extreme_coordinates_are_illegal() {
        let board = Board::new();
        let chain = ChainContext::none();
        for mv in [
            Move::between(5, 0, -128, -128),
            Move::between(5, 0, -128, 127),
            Move::between(5, 0, 127, -128),
            Move::between(-128, 127, 4, 1),
            Move::between(i8::MIN, i8::MIN, i8::MAX, i8::MAX),
            Move::between(5, 0, 8, 3),
        ] {
            assert_eq!(validated(&board, mv, &chain).outcome, MoveOutcome::Illegal, "{:?}", mv);
        }
        assert!(moves_from(&board, Pos::new(i8::MIN, i8::MAX), Color::White, &chain).is_none());
        assert_eq!(board.ray_same_color(Pos::new(5, 0), Pos::new(-128, 127), Color::White), 0);
    }

    #[test]
    #[should_panic(expected = "unvalidated")]
    fn test_apply_unvalidated_move_panics() {
        let mut board = Board::new();
        apply_move(&mut board, &Move::between(5, 0, 4, 1));
    }
}
