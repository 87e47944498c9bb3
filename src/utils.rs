use std::fs;
use std::path::Path;

use crate::engine::{Board, BOARD_SIZE, MAX_TILE};
use crate::error::{PuzzleError, PuzzleResult};

/// Parses board rows from text lines.
///
/// Each line holds one row of whitespace-separated integers, starting from
/// row 0. Parsing stops at the first line containing `END`; blank lines are
/// skipped. The resulting grid is validated by [`Board::from_grid`].
///
/// # Errors
/// * `PuzzleError::WrongRowCount` if there are not exactly `BOARD_SIZE` rows.
/// * `PuzzleError::WrongColumnCount` if a row does not have `BOARD_SIZE` entries.
/// * `PuzzleError::InvalidToken` if an entry is not a non-negative integer.
/// * `PuzzleError::TileOutOfRange` / `PuzzleError::DuplicateTile` from board validation.
///
/// # Examples
/// ```
/// use expense_puzzle::utils::board_from_lines;
///
/// let board = board_from_lines(&["2 3 6", "1 0 7", "4 8 5", "END OF FILE"]).unwrap();
/// assert_eq!(board.get_tile(0, 0), 2);
/// assert_eq!(board.get_tile(1, 1), 0);
///
/// assert!(board_from_lines(&["1 2 3", "4 5 6"]).is_err());
/// assert!(board_from_lines(&["1 2 x", "4 0 6", "7 5 8"]).is_err());
/// ```
pub fn board_from_lines<S: AsRef<str>>(lines: &[S]) -> PuzzleResult<Board> {
    let mut rows: Vec<Vec<u32>> = Vec::new();

    for line in lines.iter().map(AsRef::as_ref) {
        if line.contains("END") {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }
        let r = rows.len();
        let row = line
            .split_whitespace()
            .map(|token| {
                token.parse::<u32>().map_err(|_| PuzzleError::InvalidToken {
                    token: token.to_string(),
                    row: r,
                })
            })
            .collect::<PuzzleResult<Vec<u32>>>()?;
        rows.push(row);
    }

    if rows.len() != BOARD_SIZE {
        return Err(PuzzleError::WrongRowCount { found: rows.len() });
    }

    let mut grid = [[0u8; BOARD_SIZE]; BOARD_SIZE];
    for (r, row) in rows.iter().enumerate() {
        if row.len() != BOARD_SIZE {
            return Err(PuzzleError::WrongColumnCount {
                row: r,
                found: row.len(),
            });
        }
        for (c, &value) in row.iter().enumerate() {
            grid[r][c] = u8::try_from(value)
                .ok()
                .filter(|&v| v <= MAX_TILE)
                .ok_or(PuzzleError::TileOutOfRange { value, row: r, col: c })?;
        }
    }
    Board::from_grid(grid)
}

/// Reads and parses a board file (same format as [`board_from_lines`]).
///
/// # Errors
/// `PuzzleError::Io` if the file cannot be read, otherwise any parse error.
pub fn read_board_file(path: &Path) -> PuzzleResult<Board> {
    let content = fs::read_to_string(path).map_err(|source| PuzzleError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let lines: Vec<&str> = content.lines().collect();
    board_from_lines(&lines)
}
