//! Configuration types for automated play
//!
//! Level 4 - Utilities and configuration

use std::fmt;
use std::str::FromStr;

use draughts_core::{
    Controller, DraughtsError, Heuristics, RandomController, SearchController, DEFAULT_DEPTH,
};
use serde::{Deserialize, Serialize};

/// Player type for games
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerType {
    /// Alpha-Beta pruning search
    #[default]
    AlphaBeta,
    /// Uniformly random legal moves
    Random,
}

impl FromStr for PlayerType {
    type Err = DraughtsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "alphabeta" | "alpha-beta" | "search" | "ab" => Ok(PlayerType::AlphaBeta),
            "random" | "rand" => Ok(PlayerType::Random),
            other => Err(DraughtsError::UnknownPlayer(other.to_string())),
        }
    }
}

impl fmt::Display for PlayerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerType::AlphaBeta => write!(f, "alpha-beta"),
            PlayerType::Random => write!(f, "random"),
        }
    }
}

/// AI configuration for game playing
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AiConfig {
    /// Player type
    pub player_type: PlayerType,
    /// Search depth for alpha-beta
    pub depth: u32,
    /// Heuristics for evaluation
    pub heuristics: Heuristics,
    /// Random seed for reproducibility (None = 42)
    pub seed: Option<u64>,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            player_type: PlayerType::AlphaBeta,
            depth: DEFAULT_DEPTH,
            heuristics: Heuristics::default(),
            seed: None,
        }
    }
}

impl AiConfig {
    /// Create config for alpha-beta at given depth
    pub fn alpha_beta(depth: u32) -> Self {
        Self {
            player_type: PlayerType::AlphaBeta,
            depth,
            ..Default::default()
        }
    }

    /// Create config for the random mover
    pub fn random() -> Self {
        Self {
            player_type: PlayerType::Random,
            ..Default::default()
        }
    }

    /// Set custom heuristics
    pub fn with_heuristics(mut self, heuristics: Heuristics) -> Self {
        self.heuristics = heuristics;
        self
    }

    /// Set random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Reject settings the engine cannot play with
    pub fn validate(&self) -> Result<(), DraughtsError> {
        if self.player_type == PlayerType::AlphaBeta && self.depth == 0 {
            return Err(DraughtsError::InvalidDepth(self.depth));
        }
        Ok(())
    }

    /// Build a fresh controller; `seed` feeds the random mover
    pub fn controller(&self, seed: u64) -> Box<dyn Controller> {
        match self.player_type {
            PlayerType::AlphaBeta => Box::new(SearchController::with_heuristics(self.depth, self.heuristics)),
            PlayerType::Random => Box::new(RandomController::new(seed)),
        }
    }

    /// Short human-readable name
    pub fn label(&self) -> String {
        match self.player_type {
            PlayerType::AlphaBeta => format!("alpha-beta(d={})", self.depth),
            PlayerType::Random => "random".to_string(),
        }
    }
}

/// Match configuration
#[derive(Clone, Debug)]
pub struct MatchConfig {
    /// Number of games (should be even for seat alternation)
    pub games: usize,
    /// Applied-move limit per game; reaching it leaves the game undecided
    pub max_moves: u32,
    /// Whether to run games in parallel
    pub parallel: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            games: 10,
            max_moves: 200,
            parallel: false,
        }
    }
}

impl MatchConfig {
    pub fn new(games: usize) -> Self {
        Self {
            games,
            ..Default::default()
        }
    }

    pub fn with_max_moves(mut self, max_moves: u32) -> Self {
        self.max_moves = max_moves;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}
