//! Move controllers: search AI, random AI and the human rendezvous

use std::sync::Arc;

use parking_lot::{Condvar, Mutex};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::ai::SearchPlayer;
use crate::board::Color;
use crate::eval::Heuristics;
use crate::game::GameView;
use crate::moves::{ChainContext, Move};
use crate::rules::moves_all;

/// Something that picks a move when the engine asks
pub trait Controller: Send {
    /// Move for `color`; `None` concedes the game
    fn request_move(&mut self, game: &GameView, color: Color, chain: &ChainContext) -> Option<Move>;

    fn name(&self) -> &str;
}

// ============================================================================
// SEARCH AI
// ============================================================================

/// Alpha-beta search on a snapshot of the canonical board
pub struct SearchController {
    player: SearchPlayer,
}

impl SearchController {
    pub fn new(depth: u32) -> Self {
        Self {
            player: SearchPlayer::new(depth),
        }
    }

    pub fn with_heuristics(depth: u32, heuristics: Heuristics) -> Self {
        Self {
            player: SearchPlayer::new(depth).with_heuristics(heuristics),
        }
    }
}

impl Controller for SearchController {
    fn request_move(&mut self, game: &GameView, color: Color, chain: &ChainContext) -> Option<Move> {
        let board = game.board();
        self.player.best_move(&board, color, chain)
    }

    fn name(&self) -> &str {
        "alpha-beta"
    }
}

// ============================================================================
// RANDOM AI
// ============================================================================

/// Uniform choice among the legal moves
pub struct RandomController {
    rng: ChaCha8Rng,
}

impl RandomController {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Controller for RandomController {
    fn request_move(&mut self, game: &GameView, color: Color, chain: &ChainContext) -> Option<Move> {
        let board = game.board();
        let moves = moves_all(&board, color, chain)?;
        moves.choose(&mut self.rng).copied()
    }

    fn name(&self) -> &str {
        "random"
    }
}

// ============================================================================
// HUMAN RENDEZVOUS
// ============================================================================

/// Single move slot shared between the engine side and the UI side
#[derive(Default)]
struct Slot {
    awaiting: bool,
    proposed: Option<Move>,
}

#[derive(Default)]
struct Rendezvous {
    slot: Mutex<Slot>,
    ready: Condvar,
}

/// Engine-side controller that blocks until the UI supplies a move
pub struct HumanController {
    shared: Arc<Rendezvous>,
}

/// UI-side handle fulfilling the controller's pending request
#[derive(Clone)]
pub struct HumanHandle {
    shared: Arc<Rendezvous>,
}

/// Connected controller/handle pair
pub fn human() -> (HumanController, HumanHandle) {
    let shared = Arc::new(Rendezvous::default());
    (
        HumanController {
            shared: Arc::clone(&shared),
        },
        HumanHandle { shared },
    )
}

impl HumanController {
    /// Block until one proposal arrives
    fn wait_for_proposal(&self) -> Move {
        let mut slot = self.shared.slot.lock();
        slot.awaiting = true;
        slot.proposed = None;
        loop {
            if let Some(mv) = slot.proposed.take() {
                return mv;
            }
            self.shared.ready.wait(&mut slot);
        }
    }
}

impl Controller for HumanController {
    /// Hands the proposal over unchecked; the engine rejects and re-requests illegal ones
    fn request_move(&mut self, _game: &GameView, color: Color, _chain: &ChainContext) -> Option<Move> {
        let proposed = self.wait_for_proposal();
        tracing::debug!(?color, from = ?proposed.from, to = ?proposed.to, "human proposal received");
        Some(proposed)
    }

    fn name(&self) -> &str {
        "human"
    }
}

impl HumanHandle {
    /// Fulfil the pending request; dropped (returns false) when none is outstanding
    pub fn propose_move(&self, mv: Move) -> bool {
        let mut slot = self.shared.slot.lock();
        if !slot.awaiting {
            return false;
        }
        slot.proposed = Some(mv);
        slot.awaiting = false;
        self.shared.ready.notify_one();
        true
    }

    pub fn is_awaiting_move(&self) -> bool {
        self.shared.slot.lock().awaiting
    }
}
