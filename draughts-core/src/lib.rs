//! Draughts Core - Game engine and AI
//!
//! This crate provides the core engine for Russian-rules draughts:
//! - Board representation (8x8, 32 playable squares, piece counters)
//! - Move legality with mandatory captures and capture chains
//! - Turn state machine over pluggable move controllers
//! - Material evaluation
//! - CPU-based alpha-beta AI

pub mod board;
pub mod moves;
pub mod rules;
pub mod eval;
pub mod ai;
pub mod player;
pub mod game;
pub mod error;

// Re-exports for convenient access
pub use board::{Board, Color, Pos, Square, BOARD_SIZE, DIRECTIONS};
pub use moves::{ChainContext, Move, MoveOutcome};
pub use rules::{any_capture, apply_move, can_capture, moves_all, moves_from, validate};
pub use eval::{evaluate, evaluate_with, Heuristics, WIN_VALUE};
pub use ai::{SearchPlayer, SearchResult, DEFAULT_DEPTH};
pub use player::{human, Controller, HumanController, HumanHandle, RandomController, SearchController};
pub use game::{new_game, color_of, player_of, EngineConfig, GameEngine, GameHandle, GameRecord, GameView, TurnPhase};
pub use error::{DraughtsError, Result};
