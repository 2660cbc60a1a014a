pub mod board;
pub mod card;
pub mod config;
pub mod decks;
pub mod display;
pub mod error;
pub mod game;
pub mod history;
pub mod movegen;
pub mod moves;
pub mod pile;
pub mod prune;
pub mod search;
pub mod stats;
pub mod validator;

use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgGroup, Parser};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::card::Card;
use crate::config::SolverConfig;
use crate::game::GameState;
use crate::search::{SearchOutcome, Searcher};

#[derive(Parser, Debug)]
#[command(name = "klondike_search")]
#[command(about = "Exhaustive multi-threaded Klondike solitaire solver")]
#[command(group(ArgGroup::new("source").args(["seed", "deck", "deck_file", "winning_deck"])))]
struct Cli {
    /// JSON config file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Deal a deck shuffled from this seed (the default is seed 1)
    #[arg(long)]
    seed: Option<u32>,

    /// Deal this deck, given as a bracketed list of 52 card indices
    #[arg(long)]
    deck: Option<String>,

    /// Solve every deck list found in this file
    #[arg(long)]
    deck_file: Option<PathBuf>,

    /// Deal the built-in deck known to be solvable
    #[arg(long)]
    winning_deck: bool,

    #[arg(long)]
    threads: Option<usize>,

    /// Cards flipped per draw advance
    #[arg(long)]
    draw_advance: Option<usize>,

    #[arg(long)]
    max_nodes: Option<u64>,

    #[arg(long)]
    max_depth: Option<usize>,

    #[arg(long)]
    max_solutions: Option<usize>,

    /// Check every generated board against the board invariants
    #[arg(long)]
    validate: bool,

    /// Log at trace level regardless of RUST_LOG
    #[arg(long)]
    trace: bool,
}

impl Cli {
    fn solver_config(&self) -> anyhow::Result<SolverConfig> {
        let mut config = match &self.config {
            Some(path) => SolverConfig::load(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => SolverConfig::default(),
        };

        if let Some(threads) = self.threads {
            config.threads = threads;
        }
        if let Some(draw_advance) = self.draw_advance {
            config.draw_advance = draw_advance;
        }
        if self.max_nodes.is_some() {
            config.max_nodes = self.max_nodes;
        }
        if self.max_depth.is_some() {
            config.max_depth = self.max_depth;
        }
        if self.max_solutions.is_some() {
            config.max_solutions = self.max_solutions;
        }
        config.validate_boards |= self.validate;

        config.check()?;
        Ok(config)
    }

    /// The decks to solve, each with a label for the report.
    fn decks(&self) -> anyhow::Result<Vec<(String, Vec<Card>)>> {
        if let Some(text) = &self.deck {
            return Ok(vec![("command-line deck".to_string(), decks::parse_deck_list(text)?)]);
        }
        if let Some(path) = &self.deck_file {
            let name = path.display().to_string();
            let found = decks::load_deck_file(path)?;
            return Ok(found
                .into_iter()
                .enumerate()
                .map(|(i, deck)| (format!("{} #{}", name, i + 1), deck))
                .collect());
        }
        if self.winning_deck {
            return Ok(vec![("winning deck".to_string(), decks::winning_deck())]);
        }
        let seed = self.seed.unwrap_or(1);
        Ok(vec![(format!("seed {}", seed), card::shuffled_deck_from_seed(seed))])
    }
}

fn init_tracing(force_trace: bool) {
    let filter = if force_trace {
        EnvFilter::new("trace")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Entry point for the `klondike_search` binary.
///
/// Example:
///   cargo run --release -- --winning-deck --max-solutions 1 --validate
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.trace);

    let config = cli.solver_config()?;
    let decks = cli.decks()?;
    info!("[CONFIG] {:?}", config);

    for (label, deck) in decks {
        solve_deck(&label, &deck, &config).with_context(|| format!("solving {}", label))?;
    }
    Ok(())
}

fn solve_deck(label: &str, deck: &[Card], config: &SolverConfig) -> anyhow::Result<()> {
    let root = GameState::deal(deck, config.num_piles)?;

    println!("Deck: {}", label);
    println!("{}", decks::format_deck_list(deck));
    println!();
    display::print_board(root.board());

    let mut searcher = Searcher::new(root, config.generator()).with_limits(config.limits());
    if let Some(validator) = config.validator() {
        searcher = searcher.with_validator(validator);
    }
    if let Some(interval) = config.progress_interval() {
        searcher = searcher.with_progress_interval(interval);
    }

    let outcome = searcher.run(config.threads)?;
    print_outcome(&outcome);
    Ok(())
}

fn print_outcome(outcome: &SearchOutcome) {
    if outcome.solutions.is_empty() {
        println!("No solution found.");
    }
    for (i, solution) in outcome.solutions.iter().enumerate() {
        println!("Solution {} ({} moves):", i + 1, solution.moves.len());
        for (n, mv) in solution.moves.iter().enumerate() {
            println!("  {:3}: {}", n + 1, mv);
        }
    }
    println!();
    println!("Termination: {:?}", outcome.termination);
    println!("Statistics: {}", outcome.stats);
}
