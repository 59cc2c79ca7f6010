//! Game runner - executes single games
//!
//! Level 3 - Step-level implementation

use draughts_core::{Color, EngineConfig, GameEngine, GameRecord};

use crate::config::AiConfig;

/// Outcome of a single game
#[derive(Clone, Debug)]
pub struct GameOutcome {
    /// Winning color, `None` if the move limit was hit
    pub winner: Option<Color>,
    /// Number of applied moves
    pub moves: u32,
    /// True if the first configuration played White
    pub first_was_white: bool,
}

impl GameOutcome {
    fn from_record(record: &GameRecord, first_was_white: bool) -> Self {
        Self {
            winner: record.winning_color(),
            moves: record.moves.len() as u32,
            first_was_white,
        }
    }

    /// Check if white won
    pub fn white_wins(&self) -> bool {
        self.winner == Some(Color::White)
    }

    /// Check if black won
    pub fn black_wins(&self) -> bool {
        self.winner == Some(Color::Black)
    }

    /// Check if game stopped without a winner
    pub fn is_undecided(&self) -> bool {
        self.winner.is_none()
    }

    /// True if the first configuration won
    pub fn first_wins(&self) -> bool {
        match self.winner {
            Some(Color::White) => self.first_was_white,
            Some(Color::Black) => !self.first_was_white,
            None => false,
        }
    }

    /// True if the second configuration won
    pub fn second_wins(&self) -> bool {
        self.winner.is_some() && !self.first_wins()
    }
}

/// Game runner that plays games between two AI configurations
pub struct GameRunner {
    first: AiConfig,
    second: AiConfig,
    max_moves: u32,
    /// Random seed counter
    seed_counter: u64,
}

impl GameRunner {
    /// Create a new game runner
    pub fn new(first: AiConfig, second: AiConfig, max_moves: u32) -> Self {
        let seed_counter = first.seed.unwrap_or(42);
        Self {
            first,
            second,
            max_moves,
            seed_counter,
        }
    }

    /// Play a single game, returning the outcome
    pub fn play_game(&mut self, first_is_white: bool) -> GameOutcome {
        let seed = self.next_seed();
        let first = self.first.controller(seed);
        let second = self.second.controller(seed.wrapping_add(1));
        let (white, black) = if first_is_white {
            (first, second)
        } else {
            (second, first)
        };

        let record = GameEngine::new(white, black)
            .with_config(EngineConfig::default().with_max_moves(self.max_moves))
            .run();

        tracing::debug!(
            seed,
            first_is_white,
            winner = ?record.winning_color(),
            moves = record.moves.len(),
            "runner game done"
        );
        GameOutcome::from_record(&record, first_is_white)
    }

    /// Get next seed and increment counter
    fn next_seed(&mut self) -> u64 {
        let seed = self.seed_counter;
        self.seed_counter = self.seed_counter.wrapping_add(1);
        seed
    }

    /// Reset seed counter
    pub fn reset_seed(&mut self, seed: u64) {
        self.seed_counter = seed;
    }

    /// Configuration of the first player
    pub fn first(&self) -> &AiConfig {
        &self.first
    }
}
