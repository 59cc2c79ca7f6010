//! Match play - multiple games between two AI configurations
//!
//! Level 2 - Phase-level implementation

use rayon::prelude::*;
use serde::Serialize;

use crate::config::{AiConfig, MatchConfig};
use crate::game_runner::{GameOutcome, GameRunner};

/// Result of a match (multiple games)
#[derive(Clone, Debug, Default, Serialize)]
pub struct MatchResult {
    /// Wins for the first configuration
    pub first_wins: u32,
    /// Wins for the second configuration
    pub second_wins: u32,
    /// Wins by whoever played White
    pub white_wins: u32,
    /// Wins by whoever played Black
    pub black_wins: u32,
    /// Games stopped at the move limit
    pub undecided: u32,
    /// Average game length in applied moves
    pub avg_moves: f32,
    /// Total games played
    pub games_played: u32,
    /// Individual game outcomes
    #[serde(skip)]
    pub game_outcomes: Vec<GameOutcome>,
}

impl MatchResult {
    /// Create empty result
    pub fn empty() -> Self {
        Self::default()
    }

    /// Win rate of the first configuration
    pub fn first_win_rate(&self) -> f32 {
        rate(self.first_wins, self.games_played)
    }

    /// Win rate of the second configuration
    pub fn second_win_rate(&self) -> f32 {
        rate(self.second_wins, self.games_played)
    }

    /// Share of games without a winner
    pub fn undecided_rate(&self) -> f32 {
        rate(self.undecided, self.games_played)
    }

    /// Score of the first configuration: wins = 1.0, undecided = 0.5
    pub fn score_for_first(&self) -> f32 {
        self.first_wins as f32 + 0.5 * self.undecided as f32
    }
}

fn rate(count: u32, total: u32) -> f32 {
    if total == 0 {
        0.0
    } else {
        count as f32 / total as f32
    }
}

/// Play a match between two configurations (Level 2 phase)
///
/// Seats alternate every game; the first configuration starts as White.
pub fn play_match(first: &AiConfig, second: &AiConfig, config: &MatchConfig) -> MatchResult {
    if config.games == 0 {
        return MatchResult::empty();
    }
    let plans = prepare_game_plans(config.games);
    let outcomes = if config.parallel {
        execute_games_parallel(first, second, config, &plans)
    } else {
        execute_games(first, second, config, &plans)
    };
    aggregate_results(outcomes)
}

/// Play a match with parallel execution (Level 2 phase)
pub fn play_match_parallel(first: &AiConfig, second: &AiConfig, config: &MatchConfig) -> MatchResult {
    play_match(first, second, &config.clone().with_parallel(true))
}

// ============================================================================
// Level 3 - Steps
// ============================================================================

/// Plan for a single game in a match
#[derive(Clone, Copy)]
struct GamePlan {
    /// Whether the first configuration plays White this game
    first_is_white: bool,
    /// Game index (for seeding)
    game_index: usize,
}

/// Prepare game plans for a match
fn prepare_game_plans(games: usize) -> Vec<GamePlan> {
    (0..games)
        .map(|i| GamePlan {
            first_is_white: i % 2 == 0, // Alternate seats
            game_index: i,
        })
        .collect()
}

/// Execute games sequentially
fn execute_games(
    first: &AiConfig,
    second: &AiConfig,
    config: &MatchConfig,
    plans: &[GamePlan],
) -> Vec<GameOutcome> {
    plans
        .iter()
        .map(|plan| play_single_game(first, second, config, plan))
        .collect()
}

/// Execute games in parallel using rayon
fn execute_games_parallel(
    first: &AiConfig,
    second: &AiConfig,
    config: &MatchConfig,
    plans: &[GamePlan],
) -> Vec<GameOutcome> {
    plans
        .par_iter()
        .map(|plan| play_single_game(first, second, config, plan))
        .collect()
}

/// Play a single game with its own seed
fn play_single_game(
    first: &AiConfig,
    second: &AiConfig,
    config: &MatchConfig,
    plan: &GamePlan,
) -> GameOutcome {
    let base_seed = first.seed.unwrap_or(42);
    let mut runner = GameRunner::new(first.clone(), second.clone(), config.max_moves);
    runner.reset_seed(base_seed.wrapping_add(plan.game_index as u64 * 2));
    runner.play_game(plan.first_is_white)
}

/// Aggregate game outcomes into a match result
fn aggregate_results(outcomes: Vec<GameOutcome>) -> MatchResult {
    let mut result = MatchResult::empty();
    let mut total_moves = 0u32;

    for outcome in &outcomes {
        total_moves += outcome.moves;
        if outcome.first_wins() {
            result.first_wins += 1;
        } else if outcome.second_wins() {
            result.second_wins += 1;
        } else {
            result.undecided += 1;
        }
        if outcome.white_wins() {
            result.white_wins += 1;
        } else if outcome.black_wins() {
            result.black_wins += 1;
        }
    }

    result.games_played = outcomes.len() as u32;
    result.avg_moves = if result.games_played > 0 {
        total_moves as f32 / result.games_played as f32
    } else {
        0.0
    };
    result.game_outcomes = outcomes;

    tracing::info!(
        games = result.games_played,
        first_wins = result.first_wins,
        second_wins = result.second_wins,
        undecided = result.undecided,
        "match finished"
    );
    result
}
