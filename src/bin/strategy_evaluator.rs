use anyhow::Result;
use expense_puzzle::engine::Board;
use expense_puzzle::solver::{search, SearchConfig, Strategy};
use expense_puzzle::trace::NoopListener;
use log::warn;
use std::collections::HashMap;

const NUM_RANDOM_BOARDS_FOR_EVALUATION: u64 = 20;
const START_SEED: u64 = 0;
const SCRAMBLE_MOVES: usize = 12;

#[derive(Default)]
struct Totals {
    solved: u64,
    cost: u64,
    depth: u64,
    expanded: u64,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let goal = Board::solved();
    let mut all_totals: HashMap<Strategy, Totals> = HashMap::new();

    println!(
        "Starting strategy evaluation for {} boards ({} scramble moves each)...",
        NUM_RANDOM_BOARDS_FOR_EVALUATION, SCRAMBLE_MOVES
    );

    for board_idx in 0..NUM_RANDOM_BOARDS_FOR_EVALUATION {
        let current_seed = START_SEED + board_idx;
        let start = Board::scrambled(&goal, SCRAMBLE_MOVES, current_seed);

        println!("\nEvaluating Board {} (Seed: {})", board_idx, current_seed);

        for strategy in Strategy::ALL {
            // The scramble length bounds the solution depth, so it is always a
            // usable limit for depth-limited search.
            let config = SearchConfig {
                depth_limit: Some(SCRAMBLE_MOVES as u32),
                ..SearchConfig::new(strategy)
            };
            let result = search(&start, &goal, &config, &mut NoopListener)?;
            let totals = all_totals.entry(strategy).or_default();
            totals.expanded += result.stats.expanded;

            match result.solution() {
                Some(solution) => {
                    println!(
                        "  Strategy: {:<8}, Cost: {:<6}, Depth: {:<6}, Expanded: {}",
                        strategy, solution.cost, solution.depth, result.stats.expanded
                    );
                    totals.solved += 1;
                    totals.cost += u64::from(solution.cost);
                    totals.depth += u64::from(solution.depth);
                }
                None => {
                    warn!("{} found no solution on board {} (seed {})", strategy, board_idx, current_seed);
                    println!("  Strategy: {:<8}, no solution", strategy);
                }
            }
        }
    }

    println!("\n--- Evaluation Complete ---");
    println!("Number of boards evaluated: {}", NUM_RANDOM_BOARDS_FOR_EVALUATION);
    println!("\n--- Averages over solved boards ---");

    let mut rows: Vec<(Strategy, f64, f64, f64, u64)> = Vec::new();
    for strategy in Strategy::ALL {
        let Some(totals) = all_totals.get(&strategy) else {
            continue;
        };
        if totals.solved == 0 {
            println!("Strategy {}: No solutions recorded.", strategy);
            continue;
        }
        let n = totals.solved as f64;
        rows.push((
            strategy,
            totals.cost as f64 / n,
            totals.depth as f64 / n,
            totals.expanded as f64 / NUM_RANDOM_BOARDS_FOR_EVALUATION as f64,
            totals.solved,
        ));
    }

    // Cheapest average cost first.
    rows.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

    for (strategy, cost, depth, expanded, solved) in rows {
        println!(
            "Strategy {:<8}: Average Cost = {:.2}, Average Depth = {:.2}, Average Expanded = {:.1}, Solved = {}/{}",
            strategy, cost, depth, expanded, solved, NUM_RANDOM_BOARDS_FOR_EVALUATION
        );
    }
    Ok(())
}
