//! Play command - one game between two automated players
//!
//! - Level 1: run() - orchestration
//! - Level 2: build_engine(), report_game()
//! - Level 4: formatting utilities

use anyhow::{Context, Result};
use clap::Args;
use rand::Rng;

use draughts_core::{color_of, EngineConfig, GameEngine, GameRecord, Move};
use draughts_tournament::{AiConfig, PlayerType};

#[derive(Args)]
pub struct PlayArgs {
    /// White player (alpha-beta or random)
    #[arg(long, default_value = "alpha-beta")]
    pub white: PlayerType,

    /// Black player (alpha-beta or random)
    #[arg(long, default_value = "random")]
    pub black: PlayerType,

    /// Search depth for alpha-beta players
    #[arg(long, default_value = "5")]
    pub depth: u32,

    /// Stop without a winner after this many moves
    #[arg(long, default_value = "200")]
    pub max_moves: u32,

    /// Print the board after every move
    #[arg(long)]
    pub show_board: bool,

    /// Output the record as JSON
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

pub fn run(args: PlayArgs, seed: Option<u64>) -> Result<()> {
    let seed = seed.unwrap_or_else(|| rand::thread_rng().gen());
    let white = player_config(args.white, args.depth, seed)?;
    let black = player_config(args.black, args.depth, seed.wrapping_add(1))?;

    tracing::info!("Starting game: {} vs {} (seed={})", white.label(), black.label(), seed);

    let engine = build_engine(&white, &black, &args, seed);
    let record = if args.show_board {
        play_verbose(engine)
    } else {
        engine
            .spawn()
            .context("Failed to start game worker")?
            .join()
            .context("Game worker failed")?
    };

    report_game(&record, &args);
    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn player_config(player_type: PlayerType, depth: u32, seed: u64) -> Result<AiConfig> {
    let config = match player_type {
        PlayerType::AlphaBeta => AiConfig::alpha_beta(depth),
        PlayerType::Random => AiConfig::random(),
    }
    .with_seed(seed);
    config.validate()?;
    Ok(config)
}

fn build_engine(white: &AiConfig, black: &AiConfig, args: &PlayArgs, seed: u64) -> GameEngine {
    GameEngine::new(white.controller(seed), black.controller(seed.wrapping_add(1)))
        .with_config(EngineConfig::default().with_max_moves(args.max_moves))
}

/// Step the engine on this thread, dumping the board after each move
fn play_verbose(mut engine: GameEngine) -> GameRecord {
    let view = engine.view();
    println!("{}", view.board());
    loop {
        let before = view.history().len();
        let phase = engine.step();
        let history = view.history();
        if history.len() > before {
            if let Some(mv) = history.last() {
                println!("{}. {}", history.len(), format_move(mv));
                println!("{}", view.board());
            }
        }
        if phase.is_finished() {
            break;
        }
    }
    engine.record()
}

fn report_game(record: &GameRecord, args: &PlayArgs) {
    if args.json {
        print_json_record(record);
    } else {
        print_text_record(record);
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn format_move(mv: &Move) -> String {
    format!(
        "({},{}) -> ({},{}){}",
        mv.from.row,
        mv.from.col,
        mv.to.row,
        mv.to.col,
        if mv.is_capture() { " x" } else { "" }
    )
}

fn winner_label(record: &GameRecord) -> String {
    match record.winner {
        Some(player) => format!("{:?} (player {})", color_of(player), player),
        None => "none (move limit)".to_string(),
    }
}

fn print_json_record(record: &GameRecord) {
    #[derive(serde::Serialize)]
    struct JsonRecord {
        winner: Option<usize>,
        moves: usize,
        captures: usize,
        rejected_proposals: u32,
        history: Vec<String>,
        final_board: String,
    }

    let output = JsonRecord {
        winner: record.winner,
        moves: record.moves.len(),
        captures: record.moves.iter().filter(|mv| mv.is_capture()).count(),
        rejected_proposals: record.rejected_proposals,
        history: record.moves.iter().map(format_move).collect(),
        final_board: record.final_board.to_string(),
    };

    if let Ok(json) = serde_json::to_string_pretty(&output) {
        println!("{}", json);
    }
}

fn print_text_record(record: &GameRecord) {
    println!("\n=== Game Result ===");
    println!("Winner:      {}", winner_label(record));
    println!("Moves:       {}", record.moves.len());
    println!(
        "Captures:    {}",
        record.moves.iter().filter(|mv| mv.is_capture()).count()
    );
    println!("\nFinal position:\n{}", record.final_board);
}
