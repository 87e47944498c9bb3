//! # Expense 8-Puzzle Library
//!
//! This library solves the 3x3 sliding-tile puzzle where moving a tile costs
//! its face value. One search loop serves seven strategies: breadth-first,
//! depth-first, depth-limited, iterative deepening, uniform-cost, greedy
//! best-first and A*.
//!
//! It is used by two binaries:
//! - `solver`: reads a start and a goal board file, runs one strategy and
//!   prints the statistics and steps, optionally dumping a trace file.
//! - `strategy_evaluator`: runs every strategy on seeded scrambles and
//!   compares average cost and effort.
//!
//! ## Modules
//! - `engine`: the `Board`, move directions, move labels, the cost model and
//!   successor generation.
//! - `heuristics`: the tile-weighted Manhattan distance.
//! - `node`: search nodes, the node arena and solution reconstruction.
//! - `frontier`: stack, queue and priority frontiers behind one trait.
//! - `solver`: strategies, configuration, statistics and the search loop.
//! - `trace`: search event listeners and the trace file writer.
//! - `utils`: parsing board files.
//! - `error`: the crate's error type.

pub mod engine;
pub mod error;
pub mod frontier;
pub mod heuristics;
pub mod node;
pub mod solver;
pub mod trace;
pub mod utils;
