mod config;
mod output;
mod session;

use std::collections::HashSet;
use std::path::PathBuf;

use clap::Parser;
use duelrank_core::{Bootstrap, Model};

use crate::session::{RankingMode, Session};

pub fn bail(msg: impl std::fmt::Display) -> ! {
    eprintln!("Error: {msg}");
    std::process::exit(1);
}

#[derive(Parser)]
#[command(name = "duelrank", version, about = "Rank a list by answering pairwise comparisons")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Start an interactive ranking session over a list of items
    Rank(RankArgs),
    /// Create a default config file at ~/.config/duelrank/config.toml
    Init,
}

#[derive(Parser)]
struct RankArgs {
    /// File with one item per line, or a JSON array of strings
    #[arg(long)]
    items: Option<PathBuf>,

    /// Inline item (repeatable)
    #[arg(long = "item")]
    inline_items: Vec<String>,

    /// Ignore the input order; seed the model with coin-flip outcomes
    /// instead of treating the list as already ranked best-to-worst
    #[arg(long)]
    unordered: bool,

    /// Comparisons per "start" batch
    #[arg(long)]
    rounds: Option<usize>,

    /// Fix the random seed (reproducible seeding and pair selection)
    #[arg(long)]
    seed: Option<u64>,

    /// Ranking shown by "list": "tournament" or "strength"
    #[arg(long)]
    ranking: Option<String>,

    /// Output rankings as JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Path to config file (default: ~/.config/duelrank/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Parse a string as either a JSON array of strings or plain text, one item
/// per line.
fn parse_items_from_str(content: &str) -> Vec<String> {
    let trimmed = content.trim();
    if trimmed.starts_with('[') {
        let items: Vec<String> = serde_json::from_str(trimmed)
            .unwrap_or_else(|e| bail(format!("File looks like JSON but failed to parse: {e}")));
        items.into_iter().filter(|s| !s.trim().is_empty()).collect()
    } else {
        trimmed
            .lines()
            .map(|l| l.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

/// Load items from --items file and --item inline args, in that order.
///
/// The session owns stdin for its command loop, so unlike a batch tool there
/// is no piped-items mode here.
fn load_items(args: &RankArgs) -> Vec<String> {
    let mut items = Vec::new();

    if let Some(ref path) = args.items {
        let content = std::fs::read_to_string(path)
            .unwrap_or_else(|e| bail(format!("Failed to read items file {}: {e}", path.display())));
        items = parse_items_from_str(&content);
    }

    items.extend(args.inline_items.iter().cloned());

    if items.len() < 2 {
        bail(format!(
            "Need at least 2 items to rank, got {}. Use --items <file> or --item <name>.",
            items.len()
        ));
    }

    let mut seen = HashSet::new();
    for item in &items {
        if !seen.insert(item.as_str()) {
            bail(format!("Duplicate item: \"{item}\""));
        }
    }

    items
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Rank(args) => run_rank(args),
        Commands::Init => {
            let path = config::create_default_config();
            println!("Created config at {}", path.display());
            println!("Edit it to set your default rounds and ranking mode.");
        }
    }
}

fn run_rank(args: RankArgs) {
    // Load config file, merge with CLI args (CLI wins)
    let config_path = args.config.clone().unwrap_or_else(config::config_path);
    let cfg = config::load_config(&config_path);

    let rounds = args.rounds.or(cfg.rounds).unwrap_or(10);
    if rounds == 0 {
        bail("--rounds must be greater than 0");
    }

    let ranking = match args.ranking.as_deref().or(cfg.ranking.as_deref()) {
        Some("tournament") | None => RankingMode::Tournament,
        Some("strength") => RankingMode::Strength,
        Some(other) => bail(format!(
            "Unknown ranking \"{other}\". Use \"tournament\" or \"strength\"."
        )),
    };

    let unordered = args.unordered || cfg.unordered.unwrap_or(false);
    let bootstrap = if unordered {
        Bootstrap::Random
    } else {
        Bootstrap::Ordered
    };

    let items = load_items(&args);
    let model = match args.seed {
        Some(seed) => Model::with_seed(items, bootstrap, seed),
        None => Model::new(items, bootstrap),
    };

    let mut session = Session::new(model, rounds, ranking, args.json);
    session.run();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_items_one_per_line() {
        let items = parse_items_from_str("alpha\n  beta  \n\ngamma\n");
        assert_eq!(items, vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn test_parse_items_json_array() {
        let items = parse_items_from_str("[\"alpha\", \"beta\", \"\"]");
        assert_eq!(items, vec!["alpha", "beta"]);
    }
}
