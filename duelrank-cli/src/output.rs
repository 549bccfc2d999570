/// Ranking rendering: terminal table and JSON.
use duelrank_core::Model;
use serde::Serialize;

#[derive(Serialize)]
struct JsonRankedItem {
    rank: usize,
    name: String,
    strength: f64,
    wins: u64,
    games: u64,
}

#[derive(Serialize)]
struct JsonOutput {
    items: Vec<JsonRankedItem>,
    total_outcomes: u64,
}

/// Games recorded in the model, synthetic seeding included. Every game is
/// counted once per participant, hence the halving.
fn total_outcomes(model: &Model<String>) -> u64 {
    model.items().iter().map(|i| model.games_played(i)).sum::<u64>() / 2
}

/// Print a ranking as a formatted terminal table.
pub fn print_table(ordered: &[String], model: &Model<String>) {
    let name_width = ordered.iter().map(|name| name.len()).max().unwrap_or(4).max(4);

    println!(" # | {:<name_width$} | Strength | Wins | Games", "Item");
    println!("---|-{}-|----------|------|------", "-".repeat(name_width));

    for (i, name) in ordered.iter().enumerate() {
        println!(
            "{:>2} | {:<name_width$} | {:>8.4} | {:>4} | {:>5}",
            i + 1,
            name,
            model.strength(name),
            model.total_wins(name),
            model.games_played(name),
        );
    }

    println!(
        "\n{} items, {} recorded outcomes",
        ordered.len(),
        total_outcomes(model),
    );
}

/// Print a ranking as JSON.
pub fn print_json(ordered: &[String], model: &Model<String>) {
    let items: Vec<JsonRankedItem> = ordered
        .iter()
        .enumerate()
        .map(|(i, name)| JsonRankedItem {
            rank: i + 1,
            name: name.clone(),
            strength: model.strength(name),
            wins: model.total_wins(name),
            games: model.games_played(name),
        })
        .collect();

    let output = JsonOutput {
        items,
        total_outcomes: total_outcomes(model),
    };

    println!("{}", serde_json::to_string_pretty(&output).unwrap());
}
