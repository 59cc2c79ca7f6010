//! Position evaluation

use crate::board::{Board, Color};
use serde::{Deserialize, Serialize};

/// Material weights for position evaluation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heuristics {
    pub man_value: i32,
    pub queen_value: i32,
}

impl Default for Heuristics {
    fn default() -> Self {
        Self {
            man_value: 1,
            queen_value: 5,
        }
    }
}

/// Score for a side with no move left (negated for the winner)
pub const WIN_VALUE: i32 = 1_000_000;

/// Material balance from `color`'s point of view
pub fn evaluate(board: &Board, color: Color) -> i32 {
    evaluate_with(board, color, &Heuristics::default())
}

/// Material balance with explicit weights
pub fn evaluate_with(board: &Board, color: Color, heuristics: &Heuristics) -> i32 {
    board
        .squares()
        .filter_map(|(_, square)| {
            let owner = square.color()?;
            let value = if square.is_queen() {
                heuristics.queen_value
            } else {
                heuristics.man_value
            };
            Some(if owner == color { value } else { -value })
        })
        .sum()
}
