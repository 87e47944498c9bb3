//! Error types for the puzzle crate.
//!
//! Everything that can stop a search before it starts lands here: bad board
//! input, bad configuration, and I/O on board or trace files. Running out of
//! frontier is *not* an error; it is reported through
//! [`crate::solver::SearchResult`].

use std::path::PathBuf;

/// Errors that can occur while loading boards or configuring a search.
#[derive(Debug, thiserror::Error)]
pub enum PuzzleError {
    /// The requested search method is not one of the supported names.
    #[error("Search method not implemented: '{name}' (expected one of a*, bfs, dfs, ucs, dls, ids, greedy)")]
    UnknownStrategy { name: String },

    /// Depth-limited search was requested without a usable depth bound.
    #[error("Depth-limited search requires a positive depth limit")]
    MissingDepthLimit,

    /// The board does not have exactly three rows.
    #[error("Invalid number of rows. Expected 3, found {found}")]
    WrongRowCount { found: usize },

    /// A row does not have exactly three entries.
    #[error("Row {row} has {found} entries (expected 3)")]
    WrongColumnCount { row: usize, found: usize },

    /// A token could not be read as a tile value.
    #[error("Unrecognized token '{token}' in row {row}")]
    InvalidToken { token: String, row: usize },

    /// A tile value outside `0..=8`.
    #[error("Tile value {value} at ({row}, {col}) is out of range 0..=8")]
    TileOutOfRange { value: u32, row: usize, col: usize },

    /// The same tile value appears more than once.
    #[error("Tile {tile} appears more than once")]
    DuplicateTile { tile: u8 },

    /// Reading a board file or writing the trace file failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for puzzle operations.
pub type PuzzleResult<T> = Result<T, PuzzleError>;
