//! Core board model for the expense 8-puzzle.
//!
//! This module defines the puzzle's fundamental components:
//! - `Board`: an immutable, validated 3x3 grid of tiles where `0` is the blank.
//! - `Direction`: the four directions the blank can slide, in enumeration order.
//! - `Move`: the action label attached to a search node ("Move 5 Up").
//! - `CostModel`: how much a single move costs.
//! - `Transition`: one successor produced by sliding the blank.
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::fmt;

use crate::error::{PuzzleError, PuzzleResult};

/// Width and height of the board. The board is always square.
pub const BOARD_SIZE: usize = 3;

/// The value used for the blank cell.
pub const BLANK: u8 = 0;

/// Largest tile label on a 3x3 board.
pub const MAX_TILE: u8 = (BOARD_SIZE * BOARD_SIZE - 1) as u8;

/// Direction the blank slides in.
///
/// The declaration order is the successor enumeration order, and therefore
/// the tie-break order of every search strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All directions in successor enumeration order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Row and column delta applied to the blank position.
    pub fn as_offset(&self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            Direction::Up => "Up",
            Direction::Down => "Down",
            Direction::Left => "Left",
            Direction::Right => "Right",
        };
        write!(f, "{}", s)
    }
}

/// The action that produced a state from its parent.
///
/// `tile` is the tile that swapped places with the blank and `direction` is
/// the direction the blank travelled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub tile: u8,
    pub direction: Direction,
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move {} {}", self.tile, self.direction)
    }
}

/// How much a single move costs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CostModel {
    /// A move costs the face value of the moved tile.
    #[default]
    TileValue,
    /// Every move costs 1.
    Unit,
}

impl CostModel {
    /// Cost of sliding `tile` into the blank.
    pub fn step_cost(&self, tile: u8) -> u32 {
        match self {
            CostModel::TileValue => u32::from(tile),
            CostModel::Unit => 1,
        }
    }
}

/// One successor of a board: the action, the resulting board and its cost.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    pub action: Move,
    pub board: Board,
    pub step_cost: u32,
}

/// A 3x3 sliding-tile board.
///
/// A `Board` can only be built through [`Board::from_grid`], which checks
/// that the nine cells hold each of `0..=8` exactly once. Every operation
/// returns a fresh board, so a validated board stays valid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    grid: [[u8; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    /// Creates a board from a grid, validating tile values.
    ///
    /// # Errors
    /// * `PuzzleError::TileOutOfRange` if a cell holds a value above `MAX_TILE`.
    /// * `PuzzleError::DuplicateTile` if a value appears twice (which also
    ///   covers a missing or doubled blank).
    ///
    /// # Examples
    /// ```
    /// use expense_puzzle::engine::Board;
    /// let board = Board::from_grid([[1, 2, 3], [4, 0, 6], [7, 5, 8]]).unwrap();
    /// assert_eq!(board.get_tile(1, 1), 0);
    /// assert!(Board::from_grid([[1, 1, 3], [4, 0, 6], [7, 5, 8]]).is_err());
    /// ```
    pub fn from_grid(grid: [[u8; BOARD_SIZE]; BOARD_SIZE]) -> PuzzleResult<Self> {
        let mut seen = [false; BOARD_SIZE * BOARD_SIZE];
        for (r, row) in grid.iter().enumerate() {
            for (c, &tile) in row.iter().enumerate() {
                if tile > MAX_TILE {
                    return Err(PuzzleError::TileOutOfRange {
                        value: u32::from(tile),
                        row: r,
                        col: c,
                    });
                }
                if seen[tile as usize] {
                    return Err(PuzzleError::DuplicateTile { tile });
                }
                seen[tile as usize] = true;
            }
        }
        Ok(Board { grid })
    }

    /// The conventional solved board: tiles 1 through 8 in reading order,
    /// blank in the bottom-right corner.
    pub fn solved() -> Self {
        Board {
            grid: [[1, 2, 3], [4, 5, 6], [7, 8, 0]],
        }
    }

    /// Returns the tile at row `r`, column `c`.
    ///
    /// # Panics
    /// Panics if `r` or `c` is not below `BOARD_SIZE`.
    pub fn get_tile(&self, r: usize, c: usize) -> u8 {
        self.grid[r][c]
    }

    pub fn get_grid(&self) -> &[[u8; BOARD_SIZE]; BOARD_SIZE] {
        &self.grid
    }

    /// Finds the `(row, col)` of `tile`, or `None` if the tile is not on the board.
    pub fn locate(&self, tile: u8) -> Option<(usize, usize)> {
        for (r, row) in self.grid.iter().enumerate() {
            if let Some(c) = row.iter().position(|&t| t == tile) {
                return Some((r, c));
            }
        }
        None
    }

    /// Position of the blank.
    pub fn blank_position(&self) -> (usize, usize) {
        // A validated board always holds exactly one blank.
        self.locate(BLANK).unwrap_or((BOARD_SIZE - 1, BOARD_SIZE - 1))
    }

    /// Slides the blank at `blank_pos` one cell in `direction`.
    ///
    /// Returns the new board, or `None` if the target cell is off the board.
    /// The receiver is never modified.
    ///
    /// # Examples
    /// ```
    /// use expense_puzzle::engine::{Board, Direction};
    /// let board = Board::from_grid([[1, 2, 3], [4, 0, 6], [7, 5, 8]]).unwrap();
    /// let down = board.apply_move((1, 1), Direction::Down).unwrap();
    /// assert_eq!(down.get_tile(1, 1), 5);
    /// assert_eq!(down.get_tile(2, 1), 0);
    ///
    /// let corner = Board::solved();
    /// assert!(corner.apply_move((2, 2), Direction::Right).is_none());
    /// ```
    pub fn apply_move(&self, blank_pos: (usize, usize), direction: Direction) -> Option<Board> {
        let (r, c) = blank_pos;
        let (tr, tc) = Self::target_cell(blank_pos, direction)?;
        let mut grid = self.grid;
        grid[r][c] = grid[tr][tc];
        grid[tr][tc] = BLANK;
        Some(Board { grid })
    }

    fn target_cell(blank_pos: (usize, usize), direction: Direction) -> Option<(usize, usize)> {
        let (dr, dc) = direction.as_offset();
        let nr = blank_pos.0 as isize + dr;
        let nc = blank_pos.1 as isize + dc;
        if nr >= 0 && nr < BOARD_SIZE as isize && nc >= 0 && nc < BOARD_SIZE as isize {
            Some((nr as usize, nc as usize))
        } else {
            None
        }
    }

    /// Generates every board reachable by one slide of the blank.
    ///
    /// Successors come out in `Direction::ALL` order, so at most four are
    /// produced. The step cost of each is decided by `cost_model`.
    pub fn successors(&self, cost_model: CostModel) -> Vec<Transition> {
        let blank = self.blank_position();
        let mut transitions = Vec::with_capacity(4);
        for direction in Direction::ALL {
            let Some((tr, tc)) = Self::target_cell(blank, direction) else {
                continue;
            };
            let tile = self.grid[tr][tc];
            if let Some(board) = self.apply_move(blank, direction) {
                transitions.push(Transition {
                    action: Move { tile, direction },
                    board,
                    step_cost: cost_model.step_cost(tile),
                });
            }
        }
        transitions
    }

    /// Number of inversions among the non-blank tiles in reading order.
    fn count_inversions(&self) -> usize {
        let flattened: Vec<u8> = self
            .grid
            .iter()
            .flat_map(|row| row.iter().copied())
            .filter(|&t| t != BLANK)
            .collect();
        flattened
            .iter()
            .enumerate()
            .map(|(i, &val)| flattened[i + 1..].iter().filter(|&&next| next < val).count())
            .sum()
    }

    /// Whether `goal` can be reached from this board by sliding the blank.
    ///
    /// On an odd-width board a slide never changes the parity of the
    /// inversion count, and boards with equal parity are mutually reachable.
    pub fn can_reach(&self, goal: &Board) -> bool {
        self.count_inversions() % 2 == goal.count_inversions() % 2
    }

    /// Builds a reproducible scramble by walking the blank `moves` random
    /// steps away from `goal`.
    ///
    /// The walk never immediately undoes its previous step, and the result is
    /// always reachable from (and can reach) `goal`. The same seed produces
    /// the same board.
    pub fn scrambled(goal: &Board, moves: usize, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut board = *goal;
        let mut last: Option<Direction> = None;
        for _ in 0..moves {
            let blank = board.blank_position();
            let options: Vec<(Direction, Board)> = Direction::ALL
                .iter()
                .filter(|d| last.map_or(true, |l| **d != l.opposite()))
                .filter_map(|&d| board.apply_move(blank, d).map(|b| (d, b)))
                .collect();
            let (direction, next) = options[rng.gen_range(0..options.len())];
            board = next;
            last = Some(direction);
        }
        board
    }

    /// Renders the board as a nested list, e.g. `[[1, 2, 3], [4, 0, 6], [7, 5, 8]]`.
    ///
    /// This is the state format used in trace files.
    pub fn to_list_string(&self) -> String {
        let rows: Vec<String> = self
            .grid
            .iter()
            .map(|row| {
                let cells: Vec<String> = row.iter().map(|t| t.to_string()).collect();
                format!("[{}]", cells.join(", "))
            })
            .collect();
        format!("[{}]", rows.join(", "))
    }
}

impl TryFrom<[[u8; BOARD_SIZE]; BOARD_SIZE]> for Board {
    type Error = PuzzleError;

    fn try_from(grid: [[u8; BOARD_SIZE]; BOARD_SIZE]) -> Result<Self, Self::Error> {
        Board::from_grid(grid)
    }
}

impl fmt::Display for Board {
    /// One row per line, cells separated by a space.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (r, row) in self.grid.iter().enumerate() {
            let cells: Vec<String> = row.iter().map(|t| t.to_string()).collect();
            write!(f, "{}", cells.join(" "))?;
            if r < BOARD_SIZE - 1 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
