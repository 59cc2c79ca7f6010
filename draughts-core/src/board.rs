//! 8x8 draughts board with row/column coordinates

use serde::{Deserialize, Serialize};
use std::fmt;

/// Board side length
pub const BOARD_SIZE: i8 = 8;

/// Number of men each side starts with
pub const START_PIECES: u8 = 12;

/// Diagonal direction vectors (dr, dc), in enumeration order
pub const DIRECTIONS: [(i8, i8); 4] = [
    (1, 1),   // down-right
    (1, -1),  // down-left
    (-1, -1), // up-left
    (-1, 1),  // up-right
];

// ============================================================================
// COLOR
// ============================================================================

/// Side color
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    White = 0,
    Black = 1,
}

impl Color {
    pub fn opponent(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Row delta of a simple man move
    pub fn forward(self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    /// Row on which a man of this color is promoted
    pub fn promotion_row(self) -> i8 {
        match self {
            Color::White => 0,
            Color::Black => BOARD_SIZE - 1,
        }
    }
}

// ============================================================================
// SQUARE STATE
// ============================================================================

/// State of one board square
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Square {
    Empty,
    /// Off the playing diagonals (or off the board entirely)
    NotPlayable,
    BlackMan,
    BlackQueen,
    WhiteMan,
    WhiteQueen,
}

impl Square {
    pub fn man(color: Color) -> Self {
        match color {
            Color::White => Square::WhiteMan,
            Color::Black => Square::BlackMan,
        }
    }

    pub fn queen(color: Color) -> Self {
        match color {
            Color::White => Square::WhiteQueen,
            Color::Black => Square::BlackQueen,
        }
    }

    pub fn is_empty(self) -> bool {
        self == Square::Empty
    }

    pub fn is_playable(self) -> bool {
        self != Square::NotPlayable
    }

    /// True for any of the four piece states
    pub fn is_piece(self) -> bool {
        self.color().is_some()
    }

    pub fn is_queen(self) -> bool {
        matches!(self, Square::BlackQueen | Square::WhiteQueen)
    }

    pub fn is_man(self) -> bool {
        matches!(self, Square::BlackMan | Square::WhiteMan)
    }

    pub fn color(self) -> Option<Color> {
        match self {
            Square::BlackMan | Square::BlackQueen => Some(Color::Black),
            Square::WhiteMan | Square::WhiteQueen => Some(Color::White),
            Square::Empty | Square::NotPlayable => None,
        }
    }

    pub fn is_color(self, color: Color) -> bool {
        self.color() == Some(color)
    }

    /// Queen of the same color; non-men are returned unchanged
    pub fn promoted(self) -> Self {
        match self.color() {
            Some(color) if self.is_man() => Square::queen(color),
            _ => self,
        }
    }

    fn symbol(self) -> char {
        match self {
            Square::Empty => '.',
            Square::NotPlayable => ' ',
            Square::BlackMan => 'b',
            Square::BlackQueen => 'B',
            Square::WhiteMan => 'w',
            Square::WhiteQueen => 'W',
        }
    }
}

// ============================================================================
// COORDINATES
// ============================================================================

/// Board coordinate (row, column); may lie off the board
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub row: i8,
    pub col: i8,
}

impl Pos {
    pub const fn new(row: i8, col: i8) -> Self {
        Self { row, col }
    }

    pub fn offset(self, dr: i8, dc: i8) -> Self {
        Pos::new(self.row + dr, self.col + dc)
    }

    pub fn is_on_board(self) -> bool {
        (0..BOARD_SIZE).contains(&self.row) && (0..BOARD_SIZE).contains(&self.col)
    }

    /// Squares of the dark diagonals
    pub fn is_playable(self) -> bool {
        self.is_on_board() && (self.row + self.col) % 2 == 1
    }
}

// ============================================================================
// BOARD
// ============================================================================

/// Board value: square states plus live piece counters (copy to explore)
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    squares: [Square; 64],
    white_count: u8,
    black_count: u8,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Starting position: three rows of men per side
    pub fn new() -> Self {
        let mut board = Self::empty();
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                let pos = Pos::new(row, col);
                if !pos.is_playable() {
                    continue;
                }
                if row < 3 {
                    board.squares[index(pos)] = Square::man(Color::Black);
                } else if row > 4 {
                    board.squares[index(pos)] = Square::man(Color::White);
                }
            }
        }
        board.white_count = START_PIECES;
        board.black_count = START_PIECES;
        board
    }

    /// Board with every playable square empty
    pub fn empty() -> Self {
        let mut squares = [Square::NotPlayable; 64];
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                let pos = Pos::new(row, col);
                if pos.is_playable() {
                    squares[index(pos)] = Square::Empty;
                }
            }
        }
        Self {
            squares,
            white_count: 0,
            black_count: 0,
        }
    }

    /// Build a position from explicit placements (counters follow the placements)
    pub fn with_pieces(pieces: &[(i8, i8, Square)]) -> Self {
        let mut board = Self::empty();
        for &(row, col, square) in pieces {
            board.place(row, col, square);
        }
        board
    }

    // ========================================================================
    // SQUARE ACCESS
    // ========================================================================

    /// Square state; off-board coordinates read as not playable
    pub fn get(&self, row: i8, col: i8) -> Square {
        self.at(Pos::new(row, col))
    }

    pub fn at(&self, pos: Pos) -> Square {
        if pos.is_on_board() {
            self.squares[index(pos)]
        } else {
            Square::NotPlayable
        }
    }

    /// Overwrite a square. Counters are left to the caller.
    pub fn set(&mut self, row: i8, col: i8, square: Square) {
        let pos = Pos::new(row, col);
        if pos.is_on_board() {
            self.squares[index(pos)] = square;
        }
    }

    /// Overwrite a playable square and keep counters in sync
    pub fn place(&mut self, row: i8, col: i8, square: Square) {
        let pos = Pos::new(row, col);
        if !pos.is_playable() || !square.is_playable() {
            return;
        }
        if let Some(color) = self.at(pos).color() {
            self.decrement(color);
        }
        self.squares[index(pos)] = square;
        if let Some(color) = square.color() {
            *self.counter_mut(color) += 1;
        }
    }

    // ========================================================================
    // COUNTERS
    // ========================================================================

    pub fn count_of(&self, color: Color) -> u8 {
        match color {
            Color::White => self.white_count,
            Color::Black => self.black_count,
        }
    }

    /// Record the removal of one piece of `color`
    pub fn decrement(&mut self, color: Color) {
        let counter = self.counter_mut(color);
        assert!(*counter > 0, "{:?} piece counter would go negative", color);
        *counter -= 1;
    }

    fn counter_mut(&mut self, color: Color) -> &mut u8 {
        match color {
            Color::White => &mut self.white_count,
            Color::Black => &mut self.black_count,
        }
    }

    // ========================================================================
    // RAY QUERIES
    // ========================================================================

    /// Pieces of `color` strictly between the two endpoints
    pub fn ray_same_color(&self, from: Pos, to: Pos, color: Color) -> usize {
        self.ray_squares(from, to)
            .filter(|&pos| self.at(pos).is_color(color))
            .count()
    }

    /// Pieces not of `color` strictly between the two endpoints
    pub fn ray_opposite_color(&self, from: Pos, to: Pos, color: Color) -> usize {
        self.ray_same_color(from, to, color.opponent())
    }

    /// Consecutive squares from `start` stepping (dr, dc) that equal the start square
    pub fn run_length(&self, start: Pos, dr: i8, dc: i8) -> usize {
        if dr.abs() != 1 || dc.abs() != 1 || !start.is_on_board() {
            return 0;
        }
        let first = self.at(start);
        let mut pos = start;
        let mut count = 0;
        while pos.is_on_board() && self.at(pos) == first {
            count += 1;
            pos = pos.offset(dr, dc);
        }
        count
    }

    /// Interior squares of a straight line; empty when the endpoints are not
    /// aligned or either lies off the board
    fn ray_squares(&self, from: Pos, to: Pos) -> impl Iterator<Item = Pos> {
        let on_board = from.is_on_board() && to.is_on_board();
        let dr = if on_board { to.row - from.row } else { 0 };
        let dc = if on_board { to.col - from.col } else { 0 };
        let aligned = dr == 0 || dc == 0 || dr.abs() == dc.abs();
        let steps = if aligned { dr.abs().max(dc.abs()) } else { 0 };
        let (sr, sc) = (dr.signum(), dc.signum());
        (1..steps).map(move |i| from.offset(sr * i, sc * i))
    }

    // ========================================================================
    // ITERATION
    // ========================================================================

    /// Playable squares with their state, row-major
    pub fn squares(&self) -> impl Iterator<Item = (Pos, Square)> + '_ {
        (0..BOARD_SIZE)
            .flat_map(|row| (0..BOARD_SIZE).map(move |col| Pos::new(row, col)))
            .map(move |pos| (pos, self.at(pos)))
            .filter(|(_, square)| square.is_playable())
    }

    /// Squares holding a piece of `color`, row-major
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = Pos> + '_ {
        self.squares()
            .filter(move |(_, square)| square.is_color(color))
            .map(|(pos, _)| pos)
    }
}

fn index(pos: Pos) -> usize {
    pos.row as usize * BOARD_SIZE as usize + pos.col as usize
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Board {{ white: {}, black: {} }}\n{}",
            self.white_count, self.black_count, self
        )
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  01234567")?;
        for row in 0..BOARD_SIZE {
            write!(f, "{} ", row)?;
            for col in 0..BOARD_SIZE {
                write!(f, "{}", self.get(row, col).symbol())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
