//! Negamax search with alpha-beta pruning

use crate::board::{Board, Color};
use crate::eval::{evaluate_with, Heuristics, WIN_VALUE};
use crate::moves::{ChainContext, Move};
use crate::rules::{apply_move, can_capture, moves_all};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Default search depth in plies
pub const DEFAULT_DEPTH: u32 = 5;

/// Open window bound (symmetric, so negation never overflows)
const INFINITY: i32 = i32::MAX;

// ============================================================================
// SEARCH PLAYER
// ============================================================================

/// Search outcome: value from the mover's perspective and the move achieving it
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchResult {
    pub value: i32,
    pub best: Option<Move>,
}

impl SearchResult {
    fn leaf(value: i32) -> Self {
        Self { value, best: None }
    }
}

/// Fixed-depth alpha-beta player
#[derive(Clone, Debug)]
pub struct SearchPlayer {
    pub depth: u32,
    pub heuristics: Heuristics,
}

impl Default for SearchPlayer {
    fn default() -> Self {
        Self::new(DEFAULT_DEPTH)
    }
}

impl SearchPlayer {
    pub fn new(depth: u32) -> Self {
        Self {
            depth,
            heuristics: Heuristics::default(),
        }
    }

    pub fn with_heuristics(mut self, heuristics: Heuristics) -> Self {
        self.heuristics = heuristics;
        self
    }

    /// Move to play for `color` on `board`, continuing `chain` if it is live
    pub fn best_move(&self, board: &Board, color: Color, chain: &ChainContext) -> Option<Move> {
        let mut nodes = 0u64;

        #[cfg(feature = "parallel")]
        let result = search_root_parallel(board, color, chain, self.depth as i32, &self.heuristics, &mut nodes);
        #[cfg(not(feature = "parallel"))]
        let result = negamax(
            board,
            color,
            chain,
            self.depth as i32,
            -INFINITY,
            INFINITY,
            &self.heuristics,
            &mut nodes,
        );

        tracing::debug!(
            ?color,
            depth = self.depth,
            value = result.value,
            nodes,
            best = ?result.best,
            "search finished"
        );
        result.best
    }

    /// Full search with an explicit window
    pub fn search(
        &self,
        board: &Board,
        side: Color,
        chain: &ChainContext,
        depth: i32,
        alpha: i32,
        beta: i32,
    ) -> SearchResult {
        let mut nodes = 0u64;
        negamax(board, side, chain, depth, alpha, beta, &self.heuristics, &mut nodes)
    }

    /// Search the full window at this player's depth
    pub fn search_root(&self, board: &Board, side: Color, chain: &ChainContext) -> SearchResult {
        self.search(board, side, chain, self.depth as i32, -INFINITY, INFINITY)
    }
}

// ============================================================================
// NEGAMAX WITH ALPHA-BETA
// ============================================================================

#[allow(clippy::too_many_arguments)]
fn negamax(
    board: &Board,
    side: Color,
    chain: &ChainContext,
    depth: i32,
    mut alpha: i32,
    beta: i32,
    heuristics: &Heuristics,
    nodes: &mut u64,
) -> SearchResult {
    *nodes += 1;
    let in_chain = chain.active_square(board).is_some();

    // A chain is one indivisible turn: finish it regardless of depth
    if depth <= 0 && !in_chain {
        return SearchResult::leaf(evaluate_with(board, side, heuristics));
    }

    let Some(moves) = moves_all(board, side, chain) else {
        if in_chain {
            unreachable!("live capture chain without a continuation");
        }
        return SearchResult::leaf(-WIN_VALUE);
    };

    let mut best = SearchResult {
        value: -INFINITY,
        best: None,
    };

    for mv in moves {
        let value = score_move(board, side, &mv, depth, alpha, beta, heuristics, nodes);

        if value > best.value {
            best.value = value;
            best.best = Some(mv);
        }
        alpha = alpha.max(value);

        if alpha >= beta {
            tracing::trace!(depth, alpha, beta, "cutoff");
            return best;
        }
    }

    best
}

/// Value of playing `mv` for `side`
#[allow(clippy::too_many_arguments)]
fn score_move(
    board: &Board,
    side: Color,
    mv: &Move,
    depth: i32,
    alpha: i32,
    beta: i32,
    heuristics: &Heuristics,
    nodes: &mut u64,
) -> i32 {
    let mut next = *board;
    apply_move(&mut next, mv);

    if mv.is_capture() && can_capture(&next, mv.to) {
        // Same side keeps the turn at the same depth
        negamax(&next, side, &ChainContext::after(*mv), depth, alpha, beta, heuristics, nodes).value
    } else {
        -negamax(
            &next,
            side.opponent(),
            &ChainContext::none(),
            depth - 1,
            -beta,
            -alpha,
            heuristics,
            nodes,
        )
        .value
    }
}

/// Root moves scored concurrently with full windows; keeps the first best move
#[cfg(feature = "parallel")]
fn search_root_parallel(
    board: &Board,
    side: Color,
    chain: &ChainContext,
    depth: i32,
    heuristics: &Heuristics,
    nodes: &mut u64,
) -> SearchResult {
    use rayon::prelude::*;

    let in_chain = chain.active_square(board).is_some();
    if depth <= 0 && !in_chain {
        *nodes += 1;
        return SearchResult::leaf(evaluate_with(board, side, heuristics));
    }
    let Some(moves) = moves_all(board, side, chain) else {
        return negamax(board, side, chain, depth, -INFINITY, INFINITY, heuristics, nodes);
    };

    let scored: Vec<(i32, u64)> = moves
        .par_iter()
        .map(|mv| {
            let mut branch_nodes = 0u64;
            let value = score_move(board, side, mv, depth, -INFINITY, INFINITY, heuristics, &mut branch_nodes);
            (value, branch_nodes)
        })
        .collect();

    let mut best = SearchResult {
        value: -INFINITY,
        best: None,
    };
    for (mv, (value, branch_nodes)) in moves.into_iter().zip(scored) {
        *nodes += branch_nodes;
        if value > best.value {
            best.value = value;
            best.best = Some(mv);
        }
    }
    best
}

// ============================================================================
// TESTS
// ============================================================================


#[cfg(all(test, feature = "parallel"))]
mod parallel_tests {
    use super::*;
    use crate::board::Square;

    /// Start position advanced by a few first-enumerated moves
    fn opened_board() -> Board {
        let mut board = Board::new();
        let mut side = Color::White;
        for _ in 0..6 {
            let Some(moves) = moves_all(&board, side, &ChainContext::none()) else {
                break;
            };
            apply_move(&mut board, &moves[moves.len() / 2]);
            side = side.opponent();
        }
        board
    }

    #[test]
    fn test_parallel_root_matches_sequential() {
        let positions = [
            Board::new(),
            opened_board(),
            Board::with_pieces(&[
                (5, 2, Square::WhiteMan),
                (4, 1, Square::BlackMan),
                (5, 4, Square::WhiteMan),
                (4, 5, Square::BlackMan),
                (2, 5, Square::BlackMan),
                (0, 1, Square::BlackMan),
            ]),
        ];
        let chain = ChainContext::none();

        for board in &positions {
            for side in [Color::White, Color::Black] {
                for depth in 1..=4u32 {
                    let player = SearchPlayer::new(depth);
                    let sequential = player.search_root(board, side, &chain);
                    let mut nodes = 0;
                    let parallel =
                        search_root_parallel(board, side, &chain, depth as i32, &player.heuristics, &mut nodes);
                    assert_eq!(parallel, sequential, "depth {} side {:?}", depth, side);
                    assert_eq!(player.best_move(board, side, &chain), sequential.best);
                    assert!(nodes > 0);
                }
            }
        }
    }
}
