//! Search event listeners and the trace file writer.
//!
//! The engine reports what it does through a [`SearchListener`] passed into
//! [`crate::solver::search`]. Listeners only observe: nothing they do can
//! change which node is popped next. [`NoopListener`] ignores every event;
//! [`TraceWriter`] renders the events as the human-readable dump file.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use log::debug;

use crate::engine::{Board, CostModel};
use crate::error::{PuzzleError, PuzzleResult};
use crate::frontier::Frontier;
use crate::heuristics::heuristic_for;
use crate::node::{SearchNode, SearchTree};
use crate::solver::{SearchStatistics, Strategy};

/// Callbacks fired by the search loop. All methods default to doing nothing.
pub trait SearchListener {
    /// A node was removed from the frontier.
    fn on_pop(&mut self, _node: &SearchNode) {}

    /// The popped node holds the goal state; the search is about to return.
    fn on_goal(&mut self, _node: &SearchNode) {}

    /// A node was closed and is about to be expanded.
    fn on_expand(&mut self, _node: &SearchNode, _closed: usize) {}

    /// A successor was pushed onto the frontier.
    fn on_generate(&mut self, _child: &SearchNode) {}

    /// An expansion finished; the frontier and counters reflect it.
    fn on_fringe(&mut self, _frontier: &dyn Frontier, _tree: &SearchTree, _stats: &SearchStatistics) {}

    /// Iterative deepening is about to rerun with a larger bound.
    fn on_depth_limit(&mut self, _limit: u32) {}

    /// The search ended without reaching the goal.
    fn on_exhausted(&mut self, _stats: &SearchStatistics) {}
}

/// Listener that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopListener;

impl SearchListener for NoopListener {}

/// Builds the trace file name for a run started at `now`,
/// e.g. `trace-2024-03-09_14-05-59.txt`.
pub fn trace_file_name(now: DateTime<Local>) -> String {
    format!("trace-{}.txt", now.format("%Y-%m-%d_%H-%M-%S"))
}

/// Writes search events as text lines to any `Write` sink.
///
/// Write failures do not interrupt the search. The first one is kept and
/// returned by [`TraceWriter::finish`]; later lines are dropped.
pub struct TraceWriter<W: Write> {
    out: W,
    strategy: Strategy,
    goal: Board,
    cost_model: CostModel,
    error: Option<std::io::Error>,
    path: PathBuf,
}

impl<W: Write> TraceWriter<W> {
    /// Wraps `out`. `strategy`, `goal` and `cost_model` decide how popped
    /// nodes are described (greedy search reports h(n) instead of g(n)).
    pub fn new(out: W, strategy: Strategy, goal: Board, cost_model: CostModel) -> Self {
        TraceWriter {
            out,
            strategy,
            goal,
            cost_model,
            error: None,
            path: PathBuf::from("<trace>"),
        }
    }

    /// Writes the two header lines that open every trace file.
    pub fn write_header(&mut self, args: &[String], method: &str) {
        let quoted: Vec<String> = args.iter().map(|a| format!("'{}'", a)).collect();
        self.line(&format!("Command-Line Arguments: [{}]", quoted.join(", ")));
        self.line(&format!("Method Selected: {}", method));
    }

    fn line(&mut self, text: &str) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = writeln!(self.out, "{}", text) {
            self.error = Some(e);
        }
    }

    /// Flushes the sink and reports the first write error, if any.
    pub fn finish(mut self) -> PuzzleResult<W> {
        if self.error.is_none() {
            if let Err(e) = self.out.flush() {
                self.error = Some(e);
            }
        }
        match self.error {
            Some(source) => Err(PuzzleError::Io {
                path: self.path,
                source,
            }),
            None => Ok(self.out),
        }
    }
}

impl TraceWriter<BufWriter<File>> {
    /// Creates `trace-<timestamp>.txt` inside `dir` and returns the writer
    /// together with the path of the new file.
    pub fn create_in(
        dir: &Path,
        now: DateTime<Local>,
        strategy: Strategy,
        goal: Board,
        cost_model: CostModel,
    ) -> PuzzleResult<Self> {
        let path = dir.join(trace_file_name(now));
        let file = File::create(&path).map_err(|source| PuzzleError::Io {
            path: path.clone(),
            source,
        })?;
        debug!("Writing search trace to {}", path.display());
        let mut writer = TraceWriter::new(BufWriter::new(file), strategy, goal, cost_model);
        writer.path = path;
        Ok(writer)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<W: Write> SearchListener for TraceWriter<W> {
    fn on_pop(&mut self, node: &SearchNode) {
        let line = if self.strategy == Strategy::Greedy {
            format!(
                "\nPopping node: {}, h(n) = {}, depth = {}",
                node.state.to_list_string(),
                heuristic_for(&node.state, &self.goal, self.cost_model),
                node.depth
            )
        } else {
            format!(
                "\nPopping node: {}, g(n) = {}, depth = {}",
                node.state.to_list_string(),
                node.cost,
                node.depth
            )
        };
        self.line(&line);
    }

    fn on_goal(&mut self, node: &SearchNode) {
        self.line(&format!("\nGoal state reached: {}", node.state.to_list_string()));
    }

    fn on_expand(&mut self, _node: &SearchNode, closed: usize) {
        self.line(&format!("Closed set size: {}", closed));
    }

    fn on_fringe(&mut self, frontier: &dyn Frontier, tree: &SearchTree, stats: &SearchStatistics) {
        let states: Vec<String> = frontier
            .snapshot()
            .into_iter()
            .map(|id| tree.get(id).state.to_list_string())
            .collect();
        self.line(&format!("Fringe: [{}]", states.join(", ")));
        self.line(&format!(
            "Nodes expanded: {}, Nodes generated: {}, Max fringe size: {}",
            stats.expanded, stats.generated, stats.max_fringe_size
        ));
    }

    fn on_depth_limit(&mut self, limit: u32) {
        self.line(&format!("\nIncreasing depth limit to {}\n", limit));
    }

    fn on_exhausted(&mut self, _stats: &SearchStatistics) {
        self.line("No solution found.");
    }
}
