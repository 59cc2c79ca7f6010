//! Draughts Tournament - Automated play between AI configurations
//!
//! This crate provides match infrastructure on top of the engine:
//! - Game runner driving one engine game between two configured AIs
//! - Match play alternating seats, sequential or parallel
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 2: play_match (phases)
//! - Level 3: play_game (steps)
//! - Level 4: utilities, configuration

mod config;
mod game_runner;
mod match_play;

pub use config::{AiConfig, MatchConfig, PlayerType};
pub use game_runner::{GameOutcome, GameRunner};
pub use match_play::{play_match, play_match_parallel, MatchResult};
