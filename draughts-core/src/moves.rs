//! Move and capture-chain types

use crate::board::{Board, Pos};
use crate::rules::can_capture;
use serde::{Deserialize, Serialize};

/// Outcome tag filled in by validation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveOutcome {
    #[default]
    Unresolved,
    Simple,
    Capture,
    Illegal,
}

/// Origin/destination pair plus its validated outcome
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub from: Pos,
    pub to: Pos,
    pub outcome: MoveOutcome,
}

impl Move {
    /// Unresolved move between two squares
    pub fn new(from: Pos, to: Pos) -> Self {
        Self {
            from,
            to,
            outcome: MoveOutcome::Unresolved,
        }
    }

    pub fn between(from_row: i8, from_col: i8, to_row: i8, to_col: i8) -> Self {
        Self::new(Pos::new(from_row, from_col), Pos::new(to_row, to_col))
    }

    pub fn is_capture(&self) -> bool {
        self.outcome == MoveOutcome::Capture
    }

    /// Passed validation (simple move or capture)
    pub fn is_legal(&self) -> bool {
        matches!(self.outcome, MoveOutcome::Simple | MoveOutcome::Capture)
    }

    /// Row and column deltas, widened so any coordinates subtract safely
    fn delta(&self) -> (i16, i16) {
        (
            i16::from(self.to.row) - i16::from(self.from.row),
            i16::from(self.to.col) - i16::from(self.from.col),
        )
    }

    /// Unit step along the move's diagonal
    pub fn direction(&self) -> (i8, i8) {
        let (dr, dc) = self.delta();
        (dr.signum() as i8, dc.signum() as i8)
    }

    /// Chebyshev distance between origin and destination
    pub fn distance(&self) -> i16 {
        let (dr, dc) = self.delta();
        dr.abs().max(dc.abs())
    }

    /// Same nonzero distance along rows and columns
    pub fn is_diagonal(&self) -> bool {
        let (dr, dc) = self.delta();
        dr != 0 && dr.abs() == dc.abs()
    }
}

/// Capture-chain context carried between moves of one turn
///
/// Holds the last applied move of the side to move. The chain is live only
/// while that move was a capture and its landing square can capture again.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChainContext {
    last_move: Option<Move>,
}

impl ChainContext {
    /// No chain in progress
    pub fn none() -> Self {
        Self { last_move: None }
    }

    /// Context following `mv`
    pub fn after(mv: Move) -> Self {
        Self { last_move: Some(mv) }
    }

    pub fn last_move(&self) -> Option<Move> {
        self.last_move
    }

    /// True when a previous move is carried (the chain may still be live)
    pub fn is_pending(&self) -> bool {
        self.last_move.is_some()
    }

    /// Square that must continue capturing on `board`, if any
    pub fn active_square(&self, board: &Board) -> Option<Pos> {
        match self.last_move {
            Some(mv) if mv.is_capture() && can_capture(board, mv.to) => Some(mv.to),
            _ => None,
        }
    }
}
