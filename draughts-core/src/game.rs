//! Turn state machine and game query surface
//!
//! [`GameEngine`] owns the canonical board and drives the turn loop: it asks
//! the active [`Controller`] for a move, validates it, applies it atomically
//! and decides whether the same piece must keep capturing. [`GameView`] is the
//! read-only surface shared with controllers and any presentation layer.

use std::sync::Arc;
use std::thread::JoinHandle;

use parking_lot::RwLock;

use crate::board::{Board, Color, Pos};
use crate::error::{DraughtsError, Result};
use crate::moves::{ChainContext, Move, MoveOutcome};
use crate::player::Controller;
use crate::rules::{apply_move, can_capture, moves_all, moves_from, validate};

// ============================================================================
// CORE TYPES
// ============================================================================

/// Colors by player index: player 0 plays White and moves first
pub const PLAYER_COLORS: [Color; 2] = [Color::White, Color::Black];

/// Color played by `player`
pub fn color_of(player: usize) -> Color {
    PLAYER_COLORS[player & 1]
}

/// Player index playing `color`
pub fn player_of(color: Color) -> usize {
    match color {
        Color::White => 0,
        Color::Black => 1,
    }
}

/// Turn state machine
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnPhase {
    AwaitingMove(usize),
    /// Same player must keep capturing with the piece on `square`
    ChainContinuation { player: usize, square: Pos },
    /// Winner index, or `None` when stopped by the move limit
    Finished(Option<usize>),
}

impl TurnPhase {
    /// Player to move, unless finished
    pub fn player(&self) -> Option<usize> {
        match *self {
            TurnPhase::AwaitingMove(player) => Some(player),
            TurnPhase::ChainContinuation { player, .. } => Some(player),
            TurnPhase::Finished(_) => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, TurnPhase::Finished(_))
    }
}

/// Engine settings
#[derive(Clone, Debug, Default)]
pub struct EngineConfig {
    /// Stop without a winner after this many applied moves
    pub max_moves: Option<u32>,
}

impl EngineConfig {
    pub fn with_max_moves(mut self, max_moves: u32) -> Self {
        self.max_moves = Some(max_moves);
        self
    }
}

/// Summary of a finished game
#[derive(Clone, Debug)]
pub struct GameRecord {
    pub winner: Option<usize>,
    pub moves: Vec<Move>,
    /// Illegal proposals the engine turned down
    pub rejected_proposals: u32,
    pub final_board: Board,
}

impl GameRecord {
    pub fn winning_color(&self) -> Option<Color> {
        self.winner.map(color_of)
    }

    pub fn is_decided(&self) -> bool {
        self.winner.is_some()
    }
}

/// Canonical state guarded by the view's lock
#[derive(Clone, Debug)]
struct TurnState {
    board: Board,
    phase: TurnPhase,
    chain: ChainContext,
    last_moves: [Option<Move>; 2],
    history: Vec<Move>,
    rejected: u32,
}

impl TurnState {
    fn new(board: Board) -> Self {
        Self {
            board,
            phase: TurnPhase::AwaitingMove(0),
            chain: ChainContext::none(),
            last_moves: [None; 2],
            history: Vec::new(),
            rejected: 0,
        }
    }

    /// Winner if the position is terminal for the side to move
    fn terminal_winner(&self) -> Option<usize> {
        if self.board.count_of(Color::Black) == 0 {
            return Some(player_of(Color::White));
        }
        if self.board.count_of(Color::White) == 0 {
            return Some(player_of(Color::Black));
        }
        let player = self.phase.player()?;
        if moves_all(&self.board, color_of(player), &self.chain).is_none() {
            return Some(player ^ 1);
        }
        None
    }
}

// ============================================================================
// GAME VIEW
// ============================================================================

/// Shared read surface over the canonical game state
#[derive(Clone, Debug)]
pub struct GameView {
    state: Arc<RwLock<TurnState>>,
}

impl GameView {
    fn new(board: Board) -> Self {
        Self {
            state: Arc::new(RwLock::new(TurnState::new(board))),
        }
    }

    /// Snapshot of the canonical board
    pub fn board(&self) -> Board {
        self.state.read().board
    }

    pub fn phase(&self) -> TurnPhase {
        self.state.read().phase
    }

    pub fn chain(&self) -> ChainContext {
        self.state.read().chain
    }

    pub fn last_move(&self, player: usize) -> Option<Move> {
        self.state.read().last_moves.get(player).copied().flatten()
    }

    pub fn winner(&self) -> Option<usize> {
        match self.phase() {
            TurnPhase::Finished(winner) => winner,
            _ => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.phase().is_finished()
    }

    /// Applied moves so far
    pub fn history(&self) -> Vec<Move> {
        self.state.read().history.clone()
    }

    /// Legal destinations for the side to move from (row, col), chain-aware
    pub fn available_moves(&self, row: i8, col: i8) -> Option<Vec<Move>> {
        let state = self.state.read();
        let player = state.phase.player()?;
        moves_from(&state.board, Pos::new(row, col), color_of(player), &state.chain)
    }

    /// Resolve `mv` for the side to move; foreign pieces are illegal
    pub fn check_move(&self, mv: Move) -> Move {
        let state = self.state.read();
        check_against(&state, mv)
    }
}

fn check_against(state: &TurnState, mut mv: Move) -> Move {
    let owned = state
        .phase
        .player()
        .is_some_and(|player| state.board.at(mv.from).is_color(color_of(player)));
    if owned {
        validate(&mut mv, &state.chain, &state.board);
    } else {
        mv.outcome = MoveOutcome::Illegal;
    }
    mv
}

// ============================================================================
// ENGINE
// ============================================================================

/// Turn loop over two controllers
pub struct GameEngine {
    view: GameView,
    players: [Box<dyn Controller>; 2],
    config: EngineConfig,
}

impl GameEngine {
    /// New game from the starting position; `first` plays White
    pub fn new(first: Box<dyn Controller>, second: Box<dyn Controller>) -> Self {
        Self::from_board(Board::new(), first, second)
    }

    /// New game from an arbitrary position, White to move
    pub fn from_board(board: Board, first: Box<dyn Controller>, second: Box<dyn Controller>) -> Self {
        Self {
            view: GameView::new(board),
            players: [first, second],
            config: EngineConfig::default(),
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn view(&self) -> GameView {
        self.view.clone()
    }

    /// Run the turn loop to completion
    pub fn run(mut self) -> GameRecord {
        tracing::debug!(
            white = self.players[0].name(),
            black = self.players[1].name(),
            "game started"
        );
        while !self.step().is_finished() {}

        let record = self.record();
        tracing::info!(
            winner = ?record.winning_color(),
            moves = record.moves.len(),
            "game finished"
        );
        record
    }

    /// Record of the game so far; `winner` stays `None` until it is finished
    pub fn record(&self) -> GameRecord {
        let state = self.view.state.read();
        let winner = match state.phase {
            TurnPhase::Finished(winner) => winner,
            _ => None,
        };
        GameRecord {
            winner,
            moves: state.history.clone(),
            rejected_proposals: state.rejected,
            final_board: state.board,
        }
    }

    /// Run the turn loop on a worker thread
    pub fn spawn(self) -> Result<GameHandle> {
        let view = self.view();
        let worker = std::thread::Builder::new()
            .name("draughts-game".to_string())
            .spawn(move || self.run())?;
        Ok(GameHandle { view, worker })
    }

    /// Play one move (the whole request/validate/apply cycle); returns the new phase
    pub fn step(&mut self) -> TurnPhase {
        let (player, chain) = {
            let mut state = self.view.state.write();
            let Some(player) = state.phase.player() else {
                return state.phase;
            };
            if let Some(winner) = state.terminal_winner() {
                state.phase = TurnPhase::Finished(Some(winner));
                return state.phase;
            }
            if self
                .config
                .max_moves
                .is_some_and(|limit| state.history.len() >= limit as usize)
            {
                tracing::debug!(moves = state.history.len(), "move limit reached");
                state.phase = TurnPhase::Finished(None);
                return state.phase;
            }
            (player, state.chain)
        };

        let color = color_of(player);
        let mv = loop {
            let Some(proposed) = self.players[player].request_move(&self.view, color, &chain) else {
                tracing::info!(?color, "controller offered no move, conceding");
                let mut state = self.view.state.write();
                state.phase = TurnPhase::Finished(Some(player ^ 1));
                return state.phase;
            };
            let checked = self.view.check_move(proposed);
            if checked.is_legal() {
                break checked;
            }
            tracing::warn!(?color, from = ?proposed.from, to = ?proposed.to, "illegal move proposed, asking again");
            self.view.state.write().rejected += 1;
        };

        self.apply(player, mv)
    }

    /// Apply a validated move under one write lock
    fn apply(&mut self, player: usize, mv: Move) -> TurnPhase {
        let mut state = self.view.state.write();
        apply_move(&mut state.board, &mv);
        state.last_moves[player] = Some(mv);
        state.history.push(mv);

        if mv.is_capture() && can_capture(&state.board, mv.to) {
            state.chain = ChainContext::after(mv);
            state.phase = TurnPhase::ChainContinuation {
                player,
                square: mv.to,
            };
        } else {
            state.chain = ChainContext::none();
            state.phase = TurnPhase::AwaitingMove(player ^ 1);
        }

        if let Some(winner) = state.terminal_winner() {
            state.phase = TurnPhase::Finished(Some(winner));
        }

        tracing::debug!(
            player,
            from = ?mv.from,
            to = ?mv.to,
            outcome = ?mv.outcome,
            phase = ?state.phase,
            "move applied"
        );
        state.phase
    }
}

/// Start a game on a worker thread
pub fn new_game(first: Box<dyn Controller>, second: Box<dyn Controller>) -> Result<GameHandle> {
    GameEngine::new(first, second).spawn()
}

// ============================================================================
// GAME HANDLE
// ============================================================================

/// Running game on a worker thread
pub struct GameHandle {
    view: GameView,
    worker: JoinHandle<GameRecord>,
}

impl GameHandle {
    pub fn view(&self) -> &GameView {
        &self.view
    }

    pub fn board(&self) -> Board {
        self.view.board()
    }

    pub fn last_move(&self, player: usize) -> Option<Move> {
        self.view.last_move(player)
    }

    pub fn winner(&self) -> Option<usize> {
        self.view.winner()
    }

    pub fn available_moves(&self, row: i8, col: i8) -> Option<Vec<Move>> {
        self.view.available_moves(row, col)
    }

    /// Wait for the game to end
    pub fn join(self) -> Result<GameRecord> {
        self.worker.join().map_err(|_| DraughtsError::WorkerPanicked)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Square;
    use crate::player::{RandomController, SearchController};

    /// Plays a fixed list of moves, then concedes
    struct Scripted {
        moves: Vec<Move>,
        asked: usize,
    }

    impl Scripted {
        fn new(moves: Vec<Move>) -> Box<Self> {
            Box::new(Self { moves, asked: 0 })
        }
    }

    impl Controller for Scripted {
        fn request_move(&mut self, _game: &GameView, _color: Color, _chain: &ChainContext) -> Option<Move> {
            let mv = self.moves.get(self.asked).copied();
            self.asked += 1;
            mv
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    #[test]
    fn test_illegal_proposal_is_re_requested() {
        let white = Scripted::new(vec![
            Move::between(5, 0, 3, 2), // too far
            Move::between(2, 1, 3, 0), // black piece
            Move::between(5, 0, 4, 1),
        ]);
        let black = Scripted::new(vec![Move::between(2, 1, 3, 2)]);
        let mut engine = GameEngine::new(white, black);

        assert_eq!(engine.step(), TurnPhase::AwaitingMove(1));
        let view = engine.view();
        assert_eq!(view.last_move(0).map(|m| m.to), Some(Pos::new(4, 1)));
        assert_eq!(view.state.read().rejected, 2);

        assert_eq!(engine.step(), TurnPhase::AwaitingMove(0));
        assert_eq!(view.last_move(1).map(|m| m.outcome), Some(MoveOutcome::Simple));
        assert_eq!(view.board().get(3, 2), Square::BlackMan);
    }

    #[test]
    fn test_off_board_proposal_is_rejected() {
        let white = Scripted::new(vec![Move::between(5, 0, -128, 127), Move::between(5, 0, 4, 1)]);
        let mut engine = GameEngine::new(white, Scripted::new(vec![]));
        let view = engine.view();
        assert_eq!(view.check_move(Move::between(5, 0, -128, 127)).outcome, MoveOutcome::Illegal);
        assert_eq!(view.check_move(Move::between(i8::MAX, i8::MIN, 4, 1)).outcome, MoveOutcome::Illegal);

        assert_eq!(engine.step(), TurnPhase::AwaitingMove(1));
        assert_eq!(engine.record().rejected_proposals, 1);
        assert_eq!(view.board().get(4, 1), Square::WhiteMan);
    }

    #[test]
    fn test_chain_keeps_turn() {
        let board = Board::with_pieces(&[
            (5, 4, Square::WhiteMan),
            (4, 5, Square::BlackMan),
            (2, 5, Square::BlackMan),
            (0, 1, Square::BlackMan),
        ]);
        let white = Scripted::new(vec![Move::between(5, 4, 3, 6), Move::between(3, 6, 1, 4)]);
        let black = Scripted::new(vec![Move::between(0, 1, 1, 2)]);
        let mut engine = GameEngine::from_board(board, white, black);
        let view = engine.view();

        assert_eq!(
            engine.step(),
            TurnPhase::ChainContinuation {
                player: 0,
                square: Pos::new(3, 6)
            }
        );
        assert!(view.available_moves(0, 1).is_none());
        let continuation = view.available_moves(3, 6).unwrap();
        assert_eq!(continuation.len(), 1);

        assert_eq!(engine.step(), TurnPhase::AwaitingMove(1));
        assert_eq!(view.board().count_of(Color::Black), 1);
        assert_eq!(view.chain(), ChainContext::none());
    }

    #[test]
    fn test_last_capture_wins() {
        let board = Board::with_pieces(&[(5, 4, Square::WhiteMan), (4, 5, Square::BlackMan)]);
        let white = Scripted::new(vec![Move::between(5, 4, 3, 6)]);
        let black = Scripted::new(vec![]);
        let record = GameEngine::from_board(board, white, black).run();
        assert_eq!(record.winner, Some(0));
        assert_eq!(record.winning_color(), Some(Color::White));
        assert_eq!(record.final_board.count_of(Color::Black), 0);
    }

    #[test]
    fn test_zero_pieces_wins_regardless_of_turn() {
        let board = Board::with_pieces(&[(5, 4, Square::WhiteMan)]);
        let view = GameView::new(board);
        let state = view.state.read();
        assert_eq!(state.terminal_winner(), Some(0));
    }

    #[test]
    fn test_blocked_side_loses() {
        // White man on (1,0) is blocked by black men; white to move has nothing
        let board = Board::with_pieces(&[
            (1, 0, Square::WhiteMan),
            (0, 1, Square::BlackMan),
            (7, 6, Square::BlackMan),
        ]);
        let record = GameEngine::from_board(board, Scripted::new(vec![]), Scripted::new(vec![])).run();
        assert_eq!(record.winner, Some(1));
        assert!(record.moves.is_empty());
    }

    #[test]
    fn test_conceding_controller_loses() {
        let record = GameEngine::new(Scripted::new(vec![]), Scripted::new(vec![])).run();
        assert_eq!(record.winner, Some(1));
    }

    #[test]
    fn test_move_limit_stops_undecided() {
        let engine = GameEngine::new(
            Box::new(RandomController::new(1)),
            Box::new(RandomController::new(2)),
        )
        .with_config(EngineConfig::default().with_max_moves(6));
        assert_eq!(engine.record().moves.len(), 0);
        // six plies from the start can neither clear nor block a side
        let record = engine.run();
        assert_eq!(record.moves.len(), 6);
        assert_eq!(record.winner, None);
        assert!(!record.is_decided());
        assert_eq!(record.final_board.count_of(Color::White), record.final_board.pieces_of(Color::White).count() as u8);
    }

    #[test]
    fn test_record_tracks_unfinished_game() {
        let white = Scripted::new(vec![Move::between(5, 0, 3, 2), Move::between(5, 0, 4, 1)]);
        let black = Scripted::new(vec![]);
        let mut engine = GameEngine::new(white, black);
        engine.step();
        let record = engine.record();
        assert_eq!(record.winner, None);
        assert_eq!(record.rejected_proposals, 1);
        assert_eq!(record.moves.len(), 1);
        assert_eq!(record.final_board.get(4, 1), Square::WhiteMan);
    }

    #[test]
    fn test_available_moves_after_finish() {
        let board = Board::with_pieces(&[(5, 4, Square::WhiteMan)]);
        let engine = GameEngine::from_board(board, Scripted::new(vec![]), Scripted::new(vec![]));
        let view = engine.view();
        engine.run();
        assert!(view.is_finished());
        assert_eq!(view.winner(), Some(0));
        assert!(view.available_moves(5, 4).is_none());
    }

    #[test]
    fn test_new_game_runs_on_worker() {
        let handle = new_game(Scripted::new(vec![]), Scripted::new(vec![])).unwrap();
        let record = handle.join().unwrap();
        assert_eq!(record.winner, Some(1));
    }

    #[test]
    fn test_threaded_search_game() {
        let engine = GameEngine::new(
            Box::new(SearchController::new(2)),
            Box::new(RandomController::new(7)),
        )
        .with_config(EngineConfig::default().with_max_moves(120));
        let handle = engine.spawn().unwrap();
        let snapshot = handle.board();
        assert!(snapshot.count_of(Color::White) <= 12);
        let record = handle.join().unwrap();
        assert!(record.moves.len() <= 120);
        assert_eq!(record.rejected_proposals, 0);
    }
}
