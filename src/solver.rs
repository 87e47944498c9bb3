use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use log::{debug, info, trace};

use crate::engine::{Board, CostModel, Move};
use crate::error::{PuzzleError, PuzzleResult};
use crate::frontier::{Frontier, PriorityFrontier, PriorityKey, QueueFrontier, StackFrontier};
use crate::heuristics::heuristic_for;
use crate::node::{NodeId, SearchNode, SearchTree};
use crate::trace::SearchListener;

/// The seven supported search strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// A*: priority g(n) + h(n), ties by depth then insertion order.
    AStar,
    /// Breadth-first: FIFO queue.
    Bfs,
    /// Depth-first: LIFO stack.
    Dfs,
    /// Uniform-cost: priority g(n).
    Ucs,
    /// Depth-first with a fixed depth bound.
    DepthLimited,
    /// Depth-limited search rerun with bounds 0, 1, 2, ...
    IterativeDeepening,
    /// Greedy best-first: priority h(n).
    Greedy,
}

impl Strategy {
    pub const ALL: [Strategy; 7] = [
        Strategy::AStar,
        Strategy::Bfs,
        Strategy::Dfs,
        Strategy::Ucs,
        Strategy::DepthLimited,
        Strategy::IterativeDeepening,
        Strategy::Greedy,
    ];

    /// The selector name accepted on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::AStar => "a*",
            Strategy::Bfs => "bfs",
            Strategy::Dfs => "dfs",
            Strategy::Ucs => "ucs",
            Strategy::DepthLimited => "dls",
            Strategy::IterativeDeepening => "ids",
            Strategy::Greedy => "greedy",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Strategy {
    type Err = PuzzleError;

    /// Parses a selector name, ignoring case.
    ///
    /// # Examples
    /// ```
    /// use expense_puzzle::solver::Strategy;
    /// assert_eq!("A*".parse::<Strategy>().unwrap(), Strategy::AStar);
    /// assert_eq!("Greedy".parse::<Strategy>().unwrap(), Strategy::Greedy);
    /// assert!("foo".parse::<Strategy>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.name() == lowered)
            .ok_or_else(|| PuzzleError::UnknownStrategy { name: s.to_string() })
    }
}

/// Everything the engine needs to know besides the two boards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchConfig {
    pub strategy: Strategy,
    /// Depth bound for `Strategy::DepthLimited`; ignored by the others.
    pub depth_limit: Option<u32>,
    pub cost_model: CostModel,
}

impl SearchConfig {
    /// Config for `strategy` with the tile-value cost model and no depth limit.
    pub fn new(strategy: Strategy) -> Self {
        SearchConfig {
            strategy,
            depth_limit: None,
            cost_model: CostModel::TileValue,
        }
    }

    /// Checks the config before any search work starts.
    ///
    /// # Errors
    /// `PuzzleError::MissingDepthLimit` if depth-limited search has no
    /// depth limit or a limit of zero.
    pub fn validate(&self) -> PuzzleResult<()> {
        if self.strategy == Strategy::DepthLimited && !matches!(self.depth_limit, Some(l) if l > 0) {
            return Err(PuzzleError::MissingDepthLimit);
        }
        Ok(())
    }
}

/// Counters collected during one search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStatistics {
    /// Nodes removed from the frontier.
    pub popped: u64,
    /// Nodes closed and expanded.
    pub expanded: u64,
    /// Successors pushed onto the frontier.
    pub generated: u64,
    /// Largest frontier size observed after an expansion.
    pub max_fringe_size: u64,
}

impl SearchStatistics {
    /// Folds the counters of another pass into these: counts add up, the
    /// fringe high-water mark takes the maximum.
    pub fn accumulate(&mut self, other: &SearchStatistics) {
        self.popped += other.popped;
        self.expanded += other.expanded;
        self.generated += other.generated;
        self.max_fringe_size = self.max_fringe_size.max(other.max_fringe_size);
    }
}

/// Represents a solution reconstructed from a goal node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Solution {
    /// Moves from the start board to the goal, in order.
    pub moves: Vec<Move>,
    /// Number of moves (the goal node's depth).
    pub depth: u32,
    /// Total path cost (the goal node's g(n)).
    pub cost: u32,
}

impl Solution {
    /// Replays the moves from `start` and returns the final board, or `None`
    /// if a move would slide the blank off the board.
    pub fn replay(&self, start: &Board) -> Option<Board> {
        self.moves.iter().try_fold(*start, |board, m| {
            board.apply_move(board.blank_position(), m.direction)
        })
    }
}

/// Outcome of a search: the goal node if one was reached, the node arena it
/// lives in, and the run's statistics.
///
/// Returned the same way for every strategy, whether or not the goal was
/// found.
#[derive(Debug)]
pub struct SearchResult {
    pub goal: Option<NodeId>,
    pub tree: SearchTree,
    pub stats: SearchStatistics,
}

impl SearchResult {
    pub fn is_solved(&self) -> bool {
        self.goal.is_some()
    }

    pub fn goal_node(&self) -> Option<&SearchNode> {
        self.goal.map(|id| self.tree.get(id))
    }

    /// Reconstructs the action sequence to the goal, if one was found.
    pub fn solution(&self) -> Option<Solution> {
        let id = self.goal?;
        let node = self.tree.get(id);
        Some(Solution {
            moves: self.tree.reconstruct(id),
            depth: node.depth,
            cost: node.cost,
        })
    }
}

/// Searches for `goal` starting from `start` with the strategy in `config`.
///
/// Events are reported to `listener` as they happen. Not finding the goal is
/// a normal outcome (`SearchResult::goal` is `None`).
///
/// # Errors
/// Returns an error only if `config` fails [`SearchConfig::validate`]; no
/// search work is done in that case.
pub fn search(
    start: &Board,
    goal: &Board,
    config: &SearchConfig,
    listener: &mut dyn SearchListener,
) -> PuzzleResult<SearchResult> {
    config.validate()?;
    info!("Starting {} search ({:?} cost model)", config.strategy, config.cost_model);

    let result = match config.strategy {
        Strategy::IterativeDeepening => iterative_deepening(start, goal, config, listener),
        Strategy::DepthLimited => bounded_pass(start, goal, config, config.depth_limit, listener).result,
        _ => bounded_pass(start, goal, config, None, listener).result,
    };

    match result.goal_node() {
        Some(node) => info!(
            "{} search reached the goal at depth {} with cost {}: {:?}",
            config.strategy, node.depth, node.cost, result.stats
        ),
        None => {
            info!("{} search found no solution: {:?}", config.strategy, result.stats);
            listener.on_exhausted(&result.stats);
        }
    }
    Ok(result)
}

/// Builds the frontier discipline for `strategy`.
fn make_frontier(strategy: Strategy, goal: Board, cost_model: CostModel) -> Box<dyn Frontier> {
    match strategy {
        Strategy::Bfs => Box::new(QueueFrontier::new()),
        Strategy::Dfs | Strategy::DepthLimited | Strategy::IterativeDeepening => {
            Box::new(StackFrontier::new())
        }
        Strategy::Ucs => Box::new(PriorityFrontier::new(Box::new(|n: &SearchNode| PriorityKey {
            primary: n.cost,
            secondary: 0,
        }))),
        Strategy::Greedy => Box::new(PriorityFrontier::new(Box::new(move |n: &SearchNode| {
            PriorityKey {
                primary: heuristic_for(&n.state, &goal, cost_model),
                secondary: 0,
            }
        }))),
        Strategy::AStar => Box::new(PriorityFrontier::new(Box::new(move |n: &SearchNode| {
            PriorityKey {
                primary: n.cost + heuristic_for(&n.state, &goal, cost_model),
                secondary: n.depth,
            }
        }))),
    }
}

/// Result of one run of the shared loop.
struct Pass {
    result: SearchResult,
    /// Whether any node was left unexpanded because it sat on the depth bound.
    cut_off: bool,
}

/// The loop every strategy shares. `bound` is the depth at which nodes stop
/// being expanded (`None` for unbounded strategies).
fn bounded_pass(
    start: &Board,
    goal: &Board,
    config: &SearchConfig,
    bound: Option<u32>,
    listener: &mut dyn SearchListener,
) -> Pass {
    let mut tree = SearchTree::new();
    let mut frontier = make_frontier(config.strategy, *goal, config.cost_model);
    let mut closed: HashSet<Board> = HashSet::new();
    let mut stats = SearchStatistics {
        max_fringe_size: 1,
        ..SearchStatistics::default()
    };
    let mut cut_off = false;

    let root = tree.add_root(*start);
    frontier.push(root, tree.get(root));

    while let Some(id) = frontier.pop() {
        stats.popped += 1;
        let node = *tree.get(id);
        trace!("Popped node {} at depth {} with g(n) = {}", id.index(), node.depth, node.cost);
        listener.on_pop(&node);

        if node.state == *goal {
            listener.on_goal(&node);
            return Pass {
                result: SearchResult {
                    goal: Some(id),
                    tree,
                    stats,
                },
                cut_off,
            };
        }

        if let Some(limit) = bound {
            if node.depth >= limit {
                cut_off = true;
                continue;
            }
        }

        closed.insert(node.state);
        stats.expanded += 1;
        listener.on_expand(&node, closed.len());

        for transition in node.state.successors(config.cost_model) {
            if closed.contains(&transition.board) {
                continue;
            }
            let child = tree.add_child(id, transition.board, transition.action, transition.step_cost);
            frontier.push(child, tree.get(child));
            stats.generated += 1;
            listener.on_generate(tree.get(child));
        }

        stats.max_fringe_size = stats.max_fringe_size.max(frontier.len() as u64);
        listener.on_fringe(frontier.as_ref(), &tree, &stats);
    }

    Pass {
        result: SearchResult {
            goal: None,
            tree,
            stats,
        },
        cut_off,
    }
}

/// Reruns the depth-limited pass with bounds 0, 1, 2, ... from scratch,
/// summing the statistics of every pass.
///
/// Deepening stops at the first success, or once a larger bound cannot help:
/// either the last pass cut nothing off, or the goal lies in the other
/// permutation-parity class and is unreachable from `start`.
fn iterative_deepening(
    start: &Board,
    goal: &Board,
    config: &SearchConfig,
    listener: &mut dyn SearchListener,
) -> SearchResult {
    let reachable = start.can_reach(goal);
    let mut totals = SearchStatistics::default();
    let mut limit = 0;
    loop {
        let pass = bounded_pass(start, goal, config, Some(limit), listener);
        totals.accumulate(&pass.result.stats);
        if pass.result.is_solved() || !pass.cut_off || !reachable {
            return SearchResult {
                stats: totals,
                ..pass.result
            };
        }
        limit += 1;
        debug!("Increasing depth limit to {}", limit);
        listener.on_depth_limit(limit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Direction;
    use crate::trace::NoopListener;

    fn start_board() -> Board {
        Board::from_grid([[1, 2, 3], [4, 0, 6], [7, 5, 8]]).unwrap()
    }

    fn unreachable_goal() -> Board {
        Board::from_grid([[2, 1, 3], [4, 5, 6], [7, 8, 0]]).unwrap()
    }

    fn config_for(strategy: Strategy) -> SearchConfig {
        SearchConfig {
            depth_limit: Some(12),
            ..SearchConfig::new(strategy)
        }
    }

    fn run(start: &Board, goal: &Board, config: &SearchConfig) -> SearchResult {
        search(start, goal, config, &mut NoopListener).unwrap()
    }

    #[test]
    fn test_strategy_parse_is_case_insensitive() {
        for strategy in Strategy::ALL {
            assert_eq!(strategy.name().parse::<Strategy>().unwrap(), strategy);
            assert_eq!(strategy.name().to_uppercase().parse::<Strategy>().unwrap(), strategy);
        }
        assert_eq!("UCS".parse::<Strategy>().unwrap(), Strategy::Ucs);
        assert_eq!("dfs".parse::<Strategy>().unwrap(), Strategy::Dfs);
    }

    #[test]
    fn test_unknown_strategy_is_configuration_error() {
        let err = "foo".parse::<Strategy>().unwrap_err();
        assert!(matches!(err, PuzzleError::UnknownStrategy { ref name } if name == "foo"));
        assert!(err.to_string().contains("foo"));
    }

    #[test]
    fn test_dls_requires_positive_depth_limit() {
        let mut config = SearchConfig::new(Strategy::DepthLimited);
        let err = search(&start_board(), &Board::solved(), &config, &mut NoopListener).unwrap_err();
        assert!(matches!(err, PuzzleError::MissingDepthLimit));

        config.depth_limit = Some(0);
        assert!(matches!(config.validate(), Err(PuzzleError::MissingDepthLimit)));

        config.depth_limit = Some(1);
        assert!(config.validate().is_ok());
        assert!(SearchConfig::new(Strategy::IterativeDeepening).validate().is_ok());
    }

    #[test_log::test]
    fn test_astar_concrete_scenario() {
        let start = start_board();
        let goal = Board::solved();
        let result = run(&start, &goal, &SearchConfig::new(Strategy::AStar));

        let stats = result.stats;
        assert!(stats.expanded <= stats.popped);
        assert!(stats.generated >= stats.expanded);
        assert!(stats.max_fringe_size >= 1);

        let solution = result.solution().unwrap();
        assert_eq!(solution.cost, 13);
        assert_eq!(solution.depth, 2);
        let labels: Vec<String> = solution.moves.iter().map(|m| m.to_string()).collect();
        assert_eq!(labels, vec!["Move 5 Down", "Move 8 Right"]);
        assert_eq!(solution.replay(&start), Some(goal));
    }

    #[test]
    fn test_start_equals_goal() {
        let goal = Board::solved();
        for strategy in Strategy::ALL {
            let result = run(&goal, &goal, &config_for(strategy));
            assert_eq!(
                result.stats,
                SearchStatistics {
                    popped: 1,
                    expanded: 0,
                    generated: 0,
                    max_fringe_size: 1
                },
                "unexpected statistics for {}",
                strategy
            );
            assert_eq!(result.solution().unwrap().moves, Vec::<Move>::new());
        }
    }

    #[test]
    fn test_every_strategy_solves_scenario_and_replays() {
        let start = start_board();
        let goal = Board::solved();
        for strategy in Strategy::ALL {
            let result = run(&start, &goal, &config_for(strategy));
            let solution = result
                .solution()
                .unwrap_or_else(|| panic!("{} found no solution", strategy));
            let node = result.goal_node().unwrap();
            assert_eq!(solution.moves.len(), node.depth as usize);
            assert_eq!(solution.replay(&start), Some(goal), "{} replay mismatch", strategy);
            assert!(result.stats.expanded <= result.stats.popped);
        }
    }

    #[test]
    fn test_unreachable_goal_terminates_for_every_strategy() {
        let start = Board::solved();
        let goal = unreachable_goal();
        for strategy in Strategy::ALL {
            let config = SearchConfig {
                depth_limit: Some(5),
                ..SearchConfig::new(strategy)
            };
            let result = run(&start, &goal, &config);
            assert!(!result.is_solved(), "{} claimed a solution", strategy);
            assert!(result.solution().is_none());
            assert!(result.stats.popped >= 1);
        }
    }

    #[test]
    fn test_unbounded_search_exhausts_parity_class() {
        let result = run(&Board::solved(), &unreachable_goal(), &SearchConfig::new(Strategy::Bfs));
        assert!(!result.is_solved());
        // Every one of the 9!/2 states in the start's parity class is popped
        // and expanded at least once.
        assert!(result.stats.expanded >= 181_440);
    }

    #[test]
    fn test_depth_limit_exhaustion_reports_no_solution() {
        let start = start_board();
        let config = SearchConfig {
            depth_limit: Some(1),
            ..SearchConfig::new(Strategy::DepthLimited)
        };
        let result = run(&start, &Board::solved(), &config);
        assert!(!result.is_solved());
        assert_eq!(result.stats.expanded, 1);
        assert_eq!(result.stats.generated, 4);
        assert_eq!(result.stats.popped, 5);
        assert_eq!(result.stats.max_fringe_size, 4);
    }

    #[test]
    fn test_ids_accumulates_statistics_across_limits() {
        let start = start_board();
        let goal = Board::solved();
        let ids = run(&start, &goal, &SearchConfig::new(Strategy::IterativeDeepening));
        let solution = ids.solution().unwrap();
        assert_eq!(solution.depth, 2);

        // Limits 0 and 1 fail; limit 2 succeeds.
        let mut expected = SearchStatistics::default();
        for limit in 1..=2 {
            let config = SearchConfig {
                depth_limit: Some(limit),
                ..SearchConfig::new(Strategy::DepthLimited)
            };
            expected.accumulate(&run(&start, &goal, &config).stats);
        }
        // The limit-0 pass pops only the root.
        expected.popped += 1;
        expected.max_fringe_size = expected.max_fringe_size.max(1);
        assert_eq!(ids.stats, expected);
    }

    #[test]
    fn test_optimal_strategies_never_lose_on_cost() {
        let goal = Board::solved();
        for seed in [1, 5, 9] {
            let start = Board::scrambled(&goal, 14, seed);
            let cost_of = |strategy: Strategy| {
                run(&start, &goal, &config_for(strategy))
                    .solution()
                    .map(|s| s.cost)
                    .unwrap()
            };
            let astar = cost_of(Strategy::AStar);
            let ucs = cost_of(Strategy::Ucs);
            assert_eq!(astar, ucs, "seed {}", seed);
            for other in [Strategy::Greedy, Strategy::Bfs, Strategy::Dfs] {
                assert!(astar <= cost_of(other), "a* beaten by {} on seed {}", other, seed);
            }
        }
    }

    #[test]
    fn test_bfs_finds_minimum_move_count_under_unit_costs() {
        let goal = Board::solved();
        for seed in [2, 7] {
            let start = Board::scrambled(&goal, 16, seed);
            let depth_of = |strategy: Strategy| {
                let config = SearchConfig {
                    cost_model: CostModel::Unit,
                    ..SearchConfig::new(strategy)
                };
                run(&start, &goal, &config).solution().map(|s| s.depth).unwrap()
            };
            let bfs = depth_of(Strategy::Bfs);
            assert_eq!(bfs, depth_of(Strategy::Ucs));
            assert_eq!(bfs, depth_of(Strategy::AStar));
            assert!(bfs <= depth_of(Strategy::Dfs));
            assert!(bfs <= 16);
        }
    }

    #[test]
    fn test_bfs_pops_in_generation_order() {
        // Root then its four children in Up, Down, Left, Right order.
        struct Recorder(Vec<Option<Direction>>);
        impl SearchListener for Recorder {
            fn on_pop(&mut self, node: &SearchNode) {
                self.0.push(node.action.map(|m| m.direction));
            }
        }
        let mut recorder = Recorder(Vec::new());
        let config = SearchConfig::new(Strategy::Bfs);
        search(&start_board(), &Board::solved(), &config, &mut recorder).unwrap();
        assert_eq!(
            &recorder.0[..5],
            &[
                None,
                Some(Direction::Up),
                Some(Direction::Down),
                Some(Direction::Left),
                Some(Direction::Right)
            ]
        );
    }
}
