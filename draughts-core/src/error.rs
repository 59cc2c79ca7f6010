//! Engine error type
//!
//! Illegal moves are not errors: validation reports them through
//! [`MoveOutcome::Illegal`](crate::moves::MoveOutcome) and the engine asks again.

/// Errors surfaced by the engine and its configuration
#[derive(Debug, thiserror::Error)]
pub enum DraughtsError {
    #[error("failed to spawn game worker: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("game worker panicked")]
    WorkerPanicked,

    #[error("search depth must be at least 1, got {0}")]
    InvalidDepth(u32),

    #[error("unknown player kind: {0}")]
    UnknownPlayer(String),
}

pub type Result<T> = std::result::Result<T, DraughtsError>;
