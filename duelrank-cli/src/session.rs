/// The interactive elicitation shell.
///
/// Presents random unseen pairs, reads a human verdict, records outcomes,
/// and runs one model update per batch of rounds. Pairs that already
/// received a verdict are never shown again; a "pass" leaves the pair
/// eligible for a later session round.
use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};
use std::io::{self, BufRead, Write};

use duelrank_core::{pairs, Model};

use crate::output;

/// Random draws before pair selection falls back to scanning the
/// round-robin sequence. Sampling degrades badly once most pairs have been
/// judged; the scan is O(N^2) but exact.
const SAMPLE_ATTEMPT_LIMIT: usize = 64;

/// Which ranking "list" prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankingMode {
    /// Virtual round-robin over pairwise win probabilities. Robust to small
    /// noise in the strength estimates.
    Tournament,
    /// Raw strength sort. Diagnostic.
    Strength,
}

/// A human verdict on one displayed pair.
enum Choice {
    First,
    Second,
    Pass,
}

pub struct Session {
    model: Model<String>,
    /// Symmetric keys of pairs that already received a verdict.
    seen: HashSet<u64>,
    default_rounds: usize,
    ranking: RankingMode,
    json: bool,
}

/// Order-independent key for an unordered pair: XOR of the two item hashes.
fn pair_key(a: &str, b: &str) -> u64 {
    let mut ha = DefaultHasher::new();
    a.hash(&mut ha);
    let mut hb = DefaultHasher::new();
    b.hash(&mut hb);
    ha.finish() ^ hb.finish()
}

/// Prompt on stdout, read one line from stdin. `None` on EOF.
fn read_line(prompt: &str) -> Option<String> {
    print!("{prompt}");
    let _ = io::stdout().flush();
    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(0) => None,
        Ok(_) => Some(line.trim().to_string()),
        Err(_) => None,
    }
}

impl Session {
    pub fn new(model: Model<String>, default_rounds: usize, ranking: RankingMode, json: bool) -> Self {
        Session {
            model,
            seen: HashSet::new(),
            default_rounds,
            ranking,
            json,
        }
    }

    pub fn run(&mut self) {
        println!(
            "Ranking {} items. Type 'start' to begin comparing, or 'help' for commands.",
            self.model.len()
        );

        loop {
            let Some(line) = read_line("?> ") else {
                break;
            };
            match line.as_str() {
                "start" => self.start_batch(),
                "list" => self.print_ranking(),
                "add" => self.add_item(),
                "help" => print_help(),
                "quit" => {
                    println!("Goodbye!");
                    break;
                }
                "" => {}
                other => {
                    println!("Invalid command: {other}");
                    println!("Type 'help' for a list of commands.");
                }
            }
        }
    }

    fn start_batch(&mut self) {
        let prompt = format!("How many comparisons? (default {}) >? ", self.default_rounds);
        let rounds = match read_line(&prompt) {
            None => return,
            Some(input) if input.is_empty() => self.default_rounds,
            Some(input) => match input.parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    println!("Please enter a number greater than 0.");
                    return;
                }
            },
        };
        self.play_rounds(rounds);
    }

    fn play_rounds(&mut self, rounds: usize) {
        let mut recorded = 0usize;
        for _ in 0..rounds {
            let Some((first, second)) = self.next_unseen_pair() else {
                println!("Every pair has already been compared; nothing new to show.");
                break;
            };
            match self.present_game(&first, &second) {
                None => break, // EOF mid-batch; keep what we have
                Some(Choice::First) => {
                    self.model.record_outcome(&first, &second);
                    self.seen.insert(pair_key(&first, &second));
                    recorded += 1;
                }
                Some(Choice::Second) => {
                    self.model.record_outcome(&second, &first);
                    self.seen.insert(pair_key(&first, &second));
                    recorded += 1;
                }
                Some(Choice::Pass) => {}
            }
        }
        self.model.update();
        if recorded > 0 {
            println!("Recorded {recorded} outcomes. Type 'list' to see the ranking.");
        }
    }

    /// A pair that has not yet received a verdict.
    ///
    /// Random draws first, then a deterministic scan of the round-robin
    /// sequence. `None` only when every pair has been judged.
    fn next_unseen_pair(&mut self) -> Option<(String, String)> {
        for _ in 0..SAMPLE_ATTEMPT_LIMIT {
            let first = self.model.sample_random_item()?.clone();
            let second = self.model.sample_random_item()?.clone();
            if first == second || self.seen.contains(&pair_key(&first, &second)) {
                continue;
            }
            return Some((first, second));
        }
        for (x, y) in pairs(self.model.items()) {
            if !self.seen.contains(&pair_key(x, y)) {
                return Some((x.clone(), y.clone()));
            }
        }
        None
    }

    /// Show one pair, read a verdict. `None` on EOF.
    fn present_game(&self, first: &str, second: &str) -> Option<Choice> {
        println!("Which one is better?");
        println!("\tA: {first}");
        println!("\tB: {second}");
        loop {
            let input = read_line(">? ")?;
            match input.as_str() {
                "A" | "a" => return Some(Choice::First),
                "B" | "b" => return Some(Choice::Second),
                "pass" | "?" => return Some(Choice::Pass),
                _ => println!("Type A or B to choose, or 'pass' for no preference."),
            }
        }
    }

    /// Admit a new item: it joins the model only once it has one decisive
    /// comparison against an incumbent, so it never appears in a ranking
    /// without data.
    fn add_item(&mut self) {
        let Some(name) = read_line("New item >? ") else {
            return;
        };
        if name.is_empty() {
            println!("Nothing to add.");
            return;
        }
        if self.model.contains(&name) {
            println!("\"{name}\" is already being ranked.");
            return;
        }

        loop {
            let Some(incumbent) = self.model.sample_random_item().cloned() else {
                return;
            };
            match self.present_game(&name, &incumbent) {
                None => return, // EOF; item is not admitted
                Some(Choice::Pass) => {
                    println!("A decisive verdict is needed to place \"{name}\". One more:");
                }
                Some(Choice::First) => {
                    self.model.add_item(name.clone());
                    self.model.record_outcome(&name, &incumbent);
                    self.seen.insert(pair_key(&name, &incumbent));
                    break;
                }
                Some(Choice::Second) => {
                    self.model.add_item(name.clone());
                    self.model.record_outcome(&incumbent, &name);
                    self.seen.insert(pair_key(&name, &incumbent));
                    break;
                }
            }
        }
        self.model.update();
        println!("\"{name}\" admitted.");
    }

    fn print_ranking(&self) {
        let ordered = match self.ranking {
            RankingMode::Tournament => self.model.rank_by_tournament(),
            RankingMode::Strength => self.model.rank_by_strength(),
        };
        if self.json {
            output::print_json(&ordered, &self.model);
        } else {
            output::print_table(&ordered, &self.model);
        }
    }
}

fn print_help() {
    println!(
        "start        compare a batch of pairs, then refit strengths\n\
         list         print the current ranking\n\
         add          admit a new item (after one decisive comparison)\n\
         help         print this help\n\
         quit         end session and exit"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_key_is_symmetric() {
        assert_eq!(pair_key("left", "right"), pair_key("right", "left"));
    }

    #[test]
    fn test_pair_key_separates_pairs() {
        assert_ne!(pair_key("a", "b"), pair_key("a", "c"));
        assert_ne!(pair_key("a", "b"), pair_key("c", "d"));
    }
}
