//! Match command - play games between two player configurations
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: build_configs(), play(), report_results()
//! - Level 4: formatting utilities

use std::time::{Duration, Instant};

use anyhow::{bail, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use draughts_tournament::{play_match, AiConfig, MatchConfig, MatchResult, PlayerType};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct MatchArgs {
    /// First player (alpha-beta or random); plays White in even games
    #[arg(long, default_value = "alpha-beta")]
    pub first: PlayerType,

    /// Second player (alpha-beta or random)
    #[arg(long, default_value = "random")]
    pub second: PlayerType,

    /// Search depth of the first player
    #[arg(long, default_value = "5")]
    pub first_depth: u32,

    /// Search depth of the second player
    #[arg(long, default_value = "5")]
    pub second_depth: u32,

    /// Number of games to play (will alternate colors)
    #[arg(long, default_value = "10")]
    pub games: usize,

    /// Maximum moves per game before it counts as undecided
    #[arg(long, default_value = "200")]
    pub max_moves: u32,

    /// Run games in parallel
    #[arg(long)]
    pub parallel: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run match command
///
/// 1. Build both player configurations
/// 2. Play the match
/// 3. Report results
pub fn run(args: MatchArgs, seed: Option<u64>) -> Result<()> {
    let (first, second) = build_configs(&args, seed)?;

    tracing::info!(
        "Starting match: {} vs {} ({} games, max_moves={})",
        first.label(),
        second.label(),
        args.games,
        args.max_moves
    );

    let started = Instant::now();
    let results = play(&first, &second, &args);
    tracing::info!("Match took {:.2}s", started.elapsed().as_secs_f32());

    report_results(&results, &first, &second, &args);
    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn build_configs(args: &MatchArgs, seed: Option<u64>) -> Result<(AiConfig, AiConfig)> {
    if args.games == 0 {
        bail!("--games must be at least 1");
    }
    let mut rng = create_rng(seed);
    let first = player_config(args.first, args.first_depth).with_seed(rand::Rng::gen(&mut rng));
    let second = player_config(args.second, args.second_depth);
    first.validate()?;
    second.validate()?;
    Ok((first, second))
}

/// Play all games behind a spinner
fn play(first: &AiConfig, second: &AiConfig, args: &MatchArgs) -> MatchResult {
    let config = MatchConfig::new(args.games)
        .with_max_moves(args.max_moves)
        .with_parallel(args.parallel);

    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_chars("/|\\- ")
        .template("{spinner} {msg} [{elapsed}]")
    {
        pb.set_style(style);
    }
    pb.set_message(format!("Playing {} games...", args.games));
    pb.enable_steady_tick(Duration::from_millis(100));

    let results = play_match(first, second, &config);

    pb.finish_and_clear();
    results
}

fn report_results(results: &MatchResult, first: &AiConfig, second: &AiConfig, args: &MatchArgs) {
    if args.json {
        print_json_results(results, first, second);
    } else {
        print_text_results(results, first, second);
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn player_config(player_type: PlayerType, depth: u32) -> AiConfig {
    match player_type {
        PlayerType::AlphaBeta => AiConfig::alpha_beta(depth),
        PlayerType::Random => AiConfig::random(),
    }
}

/// Create RNG from seed or random
fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}


/// Print results as JSON
fn print_json_results(results: &MatchResult, first: &AiConfig, second: &AiConfig) {
    #[derive(serde::Serialize)]
    struct JsonGame {
        game_number: usize,
        first_was_white: bool,
        winner: Option<String>,
        moves: u32,
    }

    #[derive(serde::Serialize)]
    struct JsonOutput<'a> {
        first: String,
        second: String,
        #[serde(flatten)]
        summary: &'a MatchResult,
        first_win_rate: f32,
        second_win_rate: f32,
        games: Vec<JsonGame>,
    }

    let output = JsonOutput {
        first: first.label(),
        second: second.label(),
        summary: results,
        first_win_rate: results.first_win_rate(),
        second_win_rate: results.second_win_rate(),
        games: results
            .game_outcomes
            .iter()
            .enumerate()
            .map(|(i, g)| JsonGame {
                game_number: i + 1,
                first_was_white: g.first_was_white,
                winner: g.winner.map(|c| format!("{:?}", c)),
                moves: g.moves,
            })
            .collect(),
    };

    if let Ok(json) = serde_json::to_string_pretty(&output) {
        println!("{}", json);
    }
}

/// Print results as text
fn print_text_results(results: &MatchResult, first: &AiConfig, second: &AiConfig) {
    let total = results.games_played;

    println!("\n=== Match Results ===");
    println!("{} vs {}", first.label(), second.label());
    println!("Total games: {}", total);
    println!(
        "First wins:  {} ({:.1}%)",
        results.first_wins,
        results.first_win_rate() * 100.0
    );
    println!(
        "Second wins: {} ({:.1}%)",
        results.second_wins,
        results.second_win_rate() * 100.0
    );
    println!(
        "Undecided:   {} ({:.1}%)",
        results.undecided,
        results.undecided_rate() * 100.0
    );
    println!("White wins:  {}", results.white_wins);
    println!("Black wins:  {}", results.black_wins);
    println!("Avg moves:   {:.1}", results.avg_moves);

    println!("\nGame details:");
    for (i, game) in results.game_outcomes.iter().enumerate() {
        let seat = if game.first_was_white { "first=White" } else { "first=Black" };
        match game.winner {
            Some(color) => println!("  Game {} ({}): {:?} wins in {} moves", i + 1, seat, color, game.moves),
            None => println!("  Game {} ({}): undecided after {} moves", i + 1, seat, game.moves),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
