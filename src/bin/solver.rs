use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use expense_puzzle::engine::CostModel;
use expense_puzzle::solver::{search, SearchConfig, SearchResult, Strategy};
use expense_puzzle::trace::{NoopListener, TraceWriter};
use expense_puzzle::utils::read_board_file;
use log::info;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Path to the start board file
    start_file: PathBuf,

    /// Path to the goal board file
    goal_file: PathBuf,

    /// Search method: a*, bfs, dfs, ucs, dls, ids or greedy
    #[clap(default_value = "a*")]
    method: String,

    /// "true" writes a trace-<timestamp>.txt file in the working directory
    #[clap(default_value = "false")]
    dump_flag: String,

    /// Depth limit for dls (asked for on stdin when omitted)
    #[clap(short, long)]
    depth_limit: Option<u32>,

    /// Charge 1 per move instead of the moved tile's value
    #[clap(long)]
    unit_cost: bool,

    /// Print the start and goal boards before searching
    #[clap(short, long)]
    verbose: bool,
}

fn prompt_depth_limit() -> Result<u32> {
    print!("Enter depth limit: ");
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read depth limit")?;
    input
        .trim()
        .parse::<u32>()
        .with_context(|| format!("Invalid depth limit '{}'", input.trim()))
}

fn print_report(result: &SearchResult) {
    let Some(solution) = result.solution() else {
        println!("No solution found.");
        return;
    };
    let stats = result.stats;
    println!("Nodes Popped: {}", stats.popped);
    println!("Nodes Expanded: {}", stats.expanded);
    println!("Nodes Generated: {}", stats.generated);
    println!("Max Fringe Size: {}", stats.max_fringe_size);
    println!(
        "Solution Found at depth {} with cost of {}.",
        solution.depth, solution.cost
    );
    println!("Steps:");
    for step in &solution.moves {
        println!("\t{}", step);
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    // Unknown methods are rejected before any file is touched.
    let strategy: Strategy = args.method.parse()?;
    let dump = args.dump_flag.eq_ignore_ascii_case("true");
    let cost_model = if args.unit_cost {
        CostModel::Unit
    } else {
        CostModel::TileValue
    };

    let start = read_board_file(&args.start_file)
        .with_context(|| format!("Failed to read start board from {}", args.start_file.display()))?;
    let goal = read_board_file(&args.goal_file)
        .with_context(|| format!("Failed to read goal board from {}", args.goal_file.display()))?;

    if args.verbose {
        println!("Start State:\n{}", start);
        println!("Goal State:\n{}", goal);
    }

    let depth_limit = match (strategy, args.depth_limit) {
        (Strategy::DepthLimited, None) => Some(prompt_depth_limit()?),
        (_, limit) => limit,
    };
    let config = SearchConfig {
        strategy,
        depth_limit,
        cost_model,
    };
    config.validate()?;

    let result = if dump {
        let mut writer = TraceWriter::create_in(Path::new("."), Local::now(), strategy, goal, cost_model)?;
        let raw_args: Vec<String> = std::env::args().skip(1).collect();
        writer.write_header(&raw_args, &args.method);
        let result = search(&start, &goal, &config, &mut writer)?;
        let path = writer.path().to_path_buf();
        writer.finish()?;
        info!("Trace written to {}", path.display());
        result
    } else {
        search(&start, &goal, &config, &mut NoopListener)?
    };

    print_report(&result);
    Ok(())
}
