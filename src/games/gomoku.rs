//! # Connect-Five (Omok) Rules
//!
//! Board representation, move application and five-in-a-row detection for the
//! 15×15 connect-five game. Both search strategies run on top of the types here:
//! alpha-beta drives [`Board`] directly with a place/clear discipline, while the
//! MCTS engine works through [`GomokuState`] and the [`GameState`] trait.

use crate::error::{Error, InvalidMoveReason, Result};
use crate::GameState;
use std::fmt;
use std::str::FromStr;

/// Side length of the standard board
pub const BOARD_SIZE: usize = 15;

/// Number of contiguous stones needed to win
pub const WIN_LENGTH: usize = 5;

/// Row/column steps for the four line directions: horizontal, vertical,
/// diagonal ↘ and diagonal ↗.
const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (-1, 1)];

/// One of the two sides. `Black` always moves first.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Player {
    Black,
    White,
}

impl Player {
    /// The other side
    pub fn opponent(self) -> Player {
        match self {
            Player::Black => Player::White,
            Player::White => Player::Black,
        }
    }
}

/// Contents of a single intersection
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum Cell {
    #[default]
    Empty,
    Black,
    White,
}

impl Cell {
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    /// The owner of the stone on this cell, if any
    pub fn player(self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::Black => Some(Player::Black),
            Cell::White => Some(Player::White),
        }
    }
}

impl From<Player> for Cell {
    fn from(player: Player) -> Self {
        match player {
            Player::Black => Cell::Black,
            Player::White => Cell::White,
        }
    }
}

/// A square grid of cells.
///
/// Keeps a running count of empty cells so `is_full` is O(1); that check runs at
/// every node of both searches.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Board {
    size: usize,
    cells: Vec<Cell>,
    empty: usize,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// An empty 15×15 board
    pub fn new() -> Self {
        Self::with_size(BOARD_SIZE)
    }

    /// An empty board of the given side length.
    ///
    /// The win length stays at five; smaller boards exist so searches can be checked
    /// exhaustively in tests and benchmarks.
    pub fn with_size(size: usize) -> Self {
        Board {
            size,
            cells: vec![Cell::Empty; size * size],
            empty: size * size,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    fn index(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.size && col < self.size).then(|| row * self.size + col)
    }

    /// The cell at `(row, col)`, or `None` when the coordinates are off the board
    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        self.index(row, col).map(|i| self.cells[i])
    }

    /// Puts a stone for `player` on an empty in-bounds cell
    pub fn place(&mut self, row: usize, col: usize, player: Player) -> Result<()> {
        let i = self.index(row, col).ok_or(Error::InvalidMove {
            row,
            col,
            reason: InvalidMoveReason::OutOfBounds,
        })?;
        if !self.cells[i].is_empty() {
            return Err(Error::InvalidMove {
                row,
                col,
                reason: InvalidMoveReason::Occupied,
            });
        }
        self.cells[i] = player.into();
        self.empty -= 1;
        Ok(())
    }

    /// Removes the stone at `(row, col)` and returns its owner.
    ///
    /// Only searches use this, to pop a stone they pushed with [`Board::place`].
    pub fn clear(&mut self, row: usize, col: usize) -> Option<Player> {
        let i = self.index(row, col)?;
        let previous = self.cells[i].player();
        if previous.is_some() {
            self.cells[i] = Cell::Empty;
            self.empty += 1;
        }
        previous
    }

    pub fn is_full(&self) -> bool {
        self.empty == 0
    }

    pub fn empty_count(&self) -> usize {
        self.empty
    }

    /// Empty cells in row-major order
    pub fn empty_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_empty())
            .map(move |(i, _)| (i / self.size, i % self.size))
    }

    /// The cell reached by stepping `steps` times in direction `(dr, dc)`, if on the board
    fn step(&self, row: usize, col: usize, (dr, dc): (isize, isize), steps: usize) -> Option<Cell> {
        let r = row as isize + dr * steps as isize;
        let c = col as isize + dc * steps as isize;
        if r < 0 || c < 0 {
            return None;
        }
        self.get(r as usize, c as usize)
    }

    /// Full scan: does `player` own a run of at least five in any direction?
    pub fn check_win(&self, player: Player) -> bool {
        let stone = Cell::from(player);
        (0..self.size).any(|row| {
            (0..self.size).any(|col| {
                self.get(row, col) == Some(stone)
                    && DIRECTIONS.iter().any(|&dir| {
                        (1..WIN_LENGTH).all(|steps| self.step(row, col, dir, steps) == Some(stone))
                    })
            })
        })
    }

    /// Full scan for either side, Black checked first
    pub fn winner(&self) -> Option<Player> {
        [Player::Black, Player::White]
            .into_iter()
            .find(|&player| self.check_win(player))
    }

    /// Incremental check: is the stone at `(row, col)` part of a run of five or more?
    ///
    /// Equivalent to [`Board::check_win`] for that stone's owner whenever the board
    /// held no five before the stone was placed.
    pub fn wins_through(&self, row: usize, col: usize) -> bool {
        let stone = match self.get(row, col) {
            Some(cell) if !cell.is_empty() => cell,
            _ => return false,
        };
        DIRECTIONS.iter().any(|&(dr, dc)| {
            let forward = (1..WIN_LENGTH)
                .take_while(|&steps| self.step(row, col, (dr, dc), steps) == Some(stone))
                .count();
            let backward = (1..WIN_LENGTH)
                .take_while(|&steps| self.step(row, col, (-dr, -dc), steps) == Some(stone))
                .count();
            1 + forward + backward >= WIN_LENGTH
        })
    }
}

/// A move: the `(row, col)` intersection to play
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct GomokuMove(pub usize, pub usize);

impl fmt::Display for GomokuMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.0, self.1)
    }
}

impl FromStr for GomokuMove {
    type Err = String;

    /// Accepts `row col` or `row,col`
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let parts: Vec<&str> = s
            .split(|ch: char| ch == ',' || ch.is_whitespace())
            .filter(|part| !part.is_empty())
            .collect();
        if parts.len() != 2 {
            return Err("Expected format: row col".to_string());
        }
        let r = parts[0].parse::<usize>().map_err(|e| e.to_string())?;
        let c = parts[1].parse::<usize>().map_err(|e| e.to_string())?;
        Ok(GomokuMove(r, c))
    }
}

/// Board plus the side to move.
///
/// Behaves as a value: [`GomokuState::place`] returns a successor and leaves `self`
/// untouched. The winner is cached and updated from the last stone only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GomokuState {
    board: Board,
    current_player: Player,
    last_move: Option<GomokuMove>,
    winner: Option<Player>,
}

impl Default for GomokuState {
    fn default() -> Self {
        Self::new()
    }
}

impl GomokuState {
    /// Empty 15×15 board, Black to move
    pub fn new() -> Self {
        Self::with_size(BOARD_SIZE)
    }

    pub fn with_size(board_size: usize) -> Self {
        GomokuState {
            board: Board::with_size(board_size),
            current_player: Player::Black,
            last_move: None,
            winner: None,
        }
    }

    /// Wraps an arbitrary position. The winner is found with a full scan.
    pub fn from_board(board: Board, to_move: Player) -> Self {
        let winner = board.winner();
        GomokuState {
            board,
            current_player: to_move,
            last_move: None,
            winner,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn last_move(&self) -> Option<GomokuMove> {
        self.last_move
    }

    pub fn winner(&self) -> Option<Player> {
        self.winner
    }

    pub fn is_full(&self) -> bool {
        self.board.is_full()
    }

    /// The successor after the side to move plays `(row, col)`
    pub fn place(&self, row: usize, col: usize) -> Result<GomokuState> {
        let mut next = self.clone();
        next.apply(row, col)?;
        Ok(next)
    }

    /// Plays `(row, col)` for the side to move, in place
    pub fn apply(&mut self, row: usize, col: usize) -> Result<()> {
        self.board.place(row, col, self.current_player)?;
        if self.winner.is_none() && self.board.wins_through(row, col) {
            self.winner = Some(self.current_player);
        }
        self.last_move = Some(GomokuMove(row, col));
        self.current_player = self.current_player.opponent();
        Ok(())
    }
}

impl GameState for GomokuState {
    type Move = GomokuMove;
    type Player = Player;

    fn get_possible_moves(&self) -> Vec<Self::Move> {
        self.board
            .empty_cells()
            .map(|(r, c)| GomokuMove(r, c))
            .collect()
    }

    fn make_move(&mut self, mv: &Self::Move) {
        let applied = self.apply(mv.0, mv.1);
        debug_assert!(applied.is_ok(), "search produced an illegal move {mv}");
    }

    fn is_terminal(&self) -> bool {
        self.winner.is_some() || self.board.is_full()
    }

    fn get_winner(&self) -> Option<Player> {
        self.winner
    }

    fn get_current_player(&self) -> Player {
        self.current_player
    }
}
