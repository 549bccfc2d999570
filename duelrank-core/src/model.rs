/// The paired-comparison model: one strength vector, one outcome store, and
/// the iterative proportional-fitting update that ties them together.
///
/// One `update()` call performs exactly one fixed-point pass of the
/// minorization-maximization rule for maximum-likelihood Bradley-Terry
/// strengths (Hunter 2004). Callers invoke it repeatedly to converge; the
/// intended usage is online — record a batch of outcomes, update once.
use std::hash::Hash;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::constants::START_STRENGTH;
use crate::outcomes::PairOutcomeStore;
use crate::pairs::{index_pairs, pairs};
use crate::strength::StrengthVector;

/// How to synthesize the initial outcome data.
///
/// The update rule is undefined on a model with zero observations, so
/// construction seeds one of two synthetic datasets before the first pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Bootstrap {
    /// The input sequence is already ranked best-to-worst: record one
    /// synthetic win for every earlier item over every later item.
    Ordered,
    /// No ordering assumption: two passes over all pairs, a fair coin
    /// picking the synthetic winner each time. Every pair ends up with
    /// exactly two synthetic observations, split 2-0 or 1-1.
    Random,
}

pub struct Model<I> {
    strengths: StrengthVector<I>,
    games: PairOutcomeStore<I>,
    rng: SmallRng,
}

impl<I: Eq + Hash + Clone> Model<I> {
    /// Build a model over `items` and run one update pass on the synthetic
    /// bootstrap data, so strengths are non-trivial before any real
    /// comparison arrives.
    ///
    /// Panics on an empty item sequence or a duplicate item — both are
    /// caller logic errors.
    pub fn new(items: impl IntoIterator<Item = I>, bootstrap: Bootstrap) -> Self {
        Self::with_rng(items, bootstrap, SmallRng::from_os_rng())
    }

    /// Same as `new`, with a fixed RNG seed. Seeded construction makes the
    /// `Bootstrap::Random` coin flips and `sample_random_item` reproducible.
    pub fn with_seed(items: impl IntoIterator<Item = I>, bootstrap: Bootstrap, seed: u64) -> Self {
        Self::with_rng(items, bootstrap, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(items: impl IntoIterator<Item = I>, bootstrap: Bootstrap, rng: SmallRng) -> Self {
        let mut strengths = StrengthVector::new();
        for item in items {
            strengths.insert(item, START_STRENGTH);
        }
        assert!(!strengths.is_empty(), "a model needs at least one item");

        let mut model = Model {
            strengths,
            games: PairOutcomeStore::new(),
            rng,
        };
        model.seed_outcomes(bootstrap);
        model.update();
        model
    }

    fn seed_outcomes(&mut self, bootstrap: Bootstrap) {
        let items = self.strengths.keys().to_vec();
        match bootstrap {
            Bootstrap::Ordered => {
                for (earlier, later) in pairs(&items) {
                    self.games.record(earlier, later);
                }
            }
            Bootstrap::Random => {
                for _ in 0..2 {
                    for (x, y) in pairs(&items) {
                        if self.rng.random::<f64>() < 0.5 {
                            self.games.record(x, y);
                        } else {
                            self.games.record(y, x);
                        }
                    }
                }
            }
        }
    }

    /// Number of items being ranked.
    pub fn len(&self) -> usize {
        self.strengths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strengths.is_empty()
    }

    pub fn contains(&self, item: &I) -> bool {
        self.strengths.contains(item)
    }

    /// Items in the order they entered the model.
    pub fn items(&self) -> &[I] {
        self.strengths.keys()
    }

    /// Current strength estimate for `item`. Panics on an unknown item.
    pub fn strength(&self, item: &I) -> f64 {
        self.strengths.get(item)
    }

    /// Total recorded wins for `item`, synthetic and real alike.
    pub fn total_wins(&self, item: &I) -> u64 {
        self.games.total_wins(item)
    }

    /// Games `item` has appeared in, on either side.
    pub fn games_played(&self, item: &I) -> u64 {
        self.games.total_played(item)
    }

    /// Games between `x` and `y` regardless of who won.
    pub fn games_between(&self, x: &I, y: &I) -> u64 {
        self.games.total_games(x, y)
    }

    /// Uniform-random item, or `None` when the model holds no items.
    pub fn sample_random_item(&mut self) -> Option<&I> {
        self.strengths.sample(&mut self.rng)
    }

    /// Record one real comparison outcome: `winner` beat `loser`.
    ///
    /// Strengths do not move until the next `update()` call. Panics when the
    /// two sides are equal or either item is unknown.
    pub fn record_outcome(&mut self, winner: &I, loser: &I) {
        assert!(self.contains(winner), "outcome recorded for an unknown winner");
        assert!(self.contains(loser), "outcome recorded for an unknown loser");
        self.games.record(winner, loser);
    }

    /// Admit a new item at the starting strength.
    ///
    /// The elicitation layer is responsible for only calling this once the
    /// item has at least one decisive comparison against an existing member;
    /// until then it must not appear in rankings. Panics on a duplicate.
    pub fn add_item(&mut self, item: I) {
        self.strengths.insert(item, START_STRENGTH);
    }

    /// Probability that `x` beats `y` under the current strengths.
    ///
    /// The undefined 0/0 case — both strengths zero — resolves to 0.5, a
    /// fair coin.
    pub fn win_probability(&self, x: &I, y: &I) -> f64 {
        let strength_x = self.strengths.get(x);
        let pool = strength_x + self.strengths.get(y);
        if pool > 0.0 {
            strength_x / pool
        } else {
            0.5
        }
    }

    /// One pass of the Bradley-Terry minorization-maximization update.
    ///
    /// Normalizes the vector, then recomputes every strength from a frozen
    /// snapshot of the normalized values:
    ///
    ///   new[x] = wins(x) / sum over y != x of games(x, y) / (s[x] + s[y])
    ///
    /// Terms with no games or a zero strength pool contribute nothing. An
    /// item whose whole denominator is zero (no games against anyone, or
    /// only zero-pool opponents) keeps its normalized strength for this
    /// round rather than dividing by zero.
    pub fn update(&mut self) {
        self.strengths.normalize();

        let items = self.strengths.keys();
        let snapshot = self.strengths.values().to_vec();
        let mut new_values = vec![0.0; snapshot.len()];

        for (i, x) in items.iter().enumerate() {
            let wins = self.games.total_wins(x) as f64;
            let mut denominator = 0.0;

            for (j, y) in items.iter().enumerate() {
                if i == j {
                    continue;
                }
                let total_games = self.games.total_games(x, y) as f64;
                let pool = snapshot[i] + snapshot[j];
                if total_games > 0.0 && pool > 0.0 {
                    denominator += total_games / pool;
                }
            }

            new_values[i] = if denominator > 0.0 {
                wins / denominator
            } else {
                snapshot[i]
            };
        }

        self.strengths.replace_values(new_values);
    }

    /// Items sorted by current strength, strongest first.
    ///
    /// Diagnostic ranking — sensitive to how the strengths were last
    /// normalized. Ties keep insertion order (stable sort).
    pub fn rank_by_strength(&self) -> Vec<I> {
        let values = self.strengths.values();
        let mut order: Vec<usize> = (0..values.len()).collect();
        order.sort_by(|&a, &b| {
            values[b]
                .partial_cmp(&values[a])
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        order
            .into_iter()
            .map(|i| self.strengths.keys()[i].clone())
            .collect()
    }

    /// Items sorted by virtual round-robin wins, strongest first.
    ///
    /// Every unordered pair is played once on paper: whichever side has the
    /// larger Bradley-Terry win probability takes the pair, with exact ties
    /// going to the second operand. Because only the pairwise order of
    /// strengths matters, this ranking is more robust to small numeric noise
    /// than the direct sort. O(N^2).
    pub fn rank_by_tournament(&self) -> Vec<I> {
        let values = self.strengths.values();
        let mut virtual_wins = vec![0u64; values.len()];

        for (i, j) in index_pairs(values.len()) {
            let pool = values[i] + values[j];
            let win_prob = if pool > 0.0 { values[i] / pool } else { 0.5 };
            let lose_prob = 1.0 - win_prob;

            if win_prob > lose_prob {
                virtual_wins[i] += 1;
            } else {
                virtual_wins[j] += 1;
            }
        }

        let mut order: Vec<usize> = (0..values.len()).collect();
        order.sort_by(|&a, &b| virtual_wins[b].cmp(&virtual_wins[a]));
        order
            .into_iter()
            .map(|i| self.strengths.keys()[i].clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ordered_abc() -> Model<&'static str> {
        Model::with_seed(["a", "b", "c"], Bootstrap::Ordered, 42)
    }

    #[test]
    fn test_ordered_bootstrap_seeds_a_total_order() {
        let model = ordered_abc();
        // One synthetic win per pair: a>b, a>c, b>c.
        assert_eq!(model.total_wins(&"a"), 2);
        assert_eq!(model.total_wins(&"b"), 1);
        assert_eq!(model.total_wins(&"c"), 0);
        assert_eq!(model.games_played(&"a"), 2);
        assert_eq!(model.games_played(&"b"), 2);
    }

    #[test]
    fn test_ordered_bootstrap_preserves_input_ranking() {
        let model = ordered_abc();
        assert!(model.strength(&"a") > model.strength(&"b"));
        assert!(model.strength(&"b") > model.strength(&"c"));
        assert_eq!(model.rank_by_strength(), vec!["a", "b", "c"]);
        assert_eq!(model.rank_by_tournament(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_upsets_raise_the_underdog() {
        let mut model = ordered_abc();
        let before = model.strength(&"c");
        for _ in 0..5 {
            model.record_outcome(&"c", &"a");
        }
        model.update();
        assert!(
            model.strength(&"c") > before,
            "wins against a strong opponent must raise relative strength"
        );
    }

    #[test]
    fn test_update_normalizes_before_fitting() {
        let mut model = ordered_abc();
        model.update();
        model.update();
        // Strengths stay bounded across repeated passes; the winner keeps
        // the whole mass only in the degenerate perfect-order case.
        let total: f64 = model.items().iter().map(|i| model.strength(i)).sum();
        assert!(total.is_finite());
        assert!(model.strength(&"a") <= 1.0 + 1e-9);
    }

    #[test]
    fn test_random_bootstrap_is_reproducible_under_a_seed() {
        let a = Model::with_seed(["w", "x", "y", "z"], Bootstrap::Random, 9);
        let b = Model::with_seed(["w", "x", "y", "z"], Bootstrap::Random, 9);
        for item in a.items() {
            assert_eq!(a.total_wins(item), b.total_wins(item));
            assert_eq!(a.strength(item), b.strength(item));
        }
        assert_eq!(a.rank_by_tournament(), b.rank_by_tournament());
    }

    #[test]
    fn test_random_bootstrap_records_two_observations_per_pair() {
        let model = Model::with_seed(["w", "x", "y"], Bootstrap::Random, 3);
        // Two coin-flip passes: every pair carries exactly two games,
        // split 2-0 or 1-1.
        for (x, y) in crate::pairs::pairs(model.items()) {
            assert_eq!(model.games_between(x, y), 2);
        }
        let total_games: u64 = model
            .items()
            .iter()
            .map(|i| model.games_played(i))
            .sum();
        // Each of the C(3,2)=3 pairs contributes 2 games, counted twice
        // (once per participant).
        assert_eq!(total_games, 12);
    }

    #[test]
    fn test_win_probability_follows_strengths() {
        let model = ordered_abc();
        let p = model.win_probability(&"a", &"c");
        assert!(p > 0.5 && p <= 1.0);
        let q = model.win_probability(&"c", &"a");
        assert!((p + q - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_win_probability_zero_pool_is_fair_coin() {
        let model = ordered_abc();
        // "c" never wins in the perfect-order bootstrap, so its fitted
        // strength is 0 and c-vs-c has a 0/0 pool.
        assert_eq!(model.strength(&"c"), 0.0);
        assert_eq!(model.win_probability(&"c", &"c"), 0.5);
        // Equal nonzero strengths are an ordinary 0.5, no division hazard.
        assert_eq!(model.win_probability(&"a", &"a"), 0.5);
    }

    #[test]
    fn test_item_with_no_games_survives_update() {
        let mut model = ordered_abc();
        model.add_item("newcomer");
        assert_eq!(model.total_wins(&"newcomer"), 0);
        model.update();
        // Zero denominator: the newcomer keeps its normalized strength
        // instead of tripping a division by zero.
        assert!(model.strength(&"newcomer") > 0.0);
        assert!(model.strength(&"newcomer").is_finite());
    }

    #[test]
    fn test_rankings_agree_on_a_dominant_top_item() {
        let mut model = Model::with_seed(["p", "q", "r", "s"], Bootstrap::Random, 11);
        for loser in ["q", "r", "s"] {
            for _ in 0..6 {
                model.record_outcome(&"p", &loser);
            }
        }
        model.update();
        assert_eq!(model.rank_by_strength()[0], "p");
        assert_eq!(model.rank_by_tournament()[0], "p");
    }

    #[test]
    fn test_single_item_model_ranks_trivially() {
        let mut model = Model::with_seed(["only"], Bootstrap::Ordered, 1);
        assert_eq!(model.rank_by_strength(), vec!["only"]);
        assert_eq!(model.rank_by_tournament(), vec!["only"]);
        assert_eq!(model.sample_random_item(), Some(&"only"));
        // No pairs, no games; update must still be a no-op rather than a crash.
        model.update();
        assert!(model.strength(&"only").is_finite());
    }

    #[test]
    fn test_tournament_tie_breaks_toward_the_second_operand() {
        // Two items, even record: strengths come out equal, the virtual
        // pair is a dead heat, and the strict-> comparison hands it to the
        // second operand. Stable sort then lists the virtual winner first.
        let mut model = Model::with_seed(["first", "second"], Bootstrap::Ordered, 5);
        model.record_outcome(&"second", &"first");
        model.update();
        assert_eq!(model.strength(&"first"), model.strength(&"second"));
        assert_eq!(model.rank_by_tournament(), vec!["second", "first"]);
        // The diagnostic sort sees the same tie but keeps insertion order.
        assert_eq!(model.rank_by_strength(), vec!["first", "second"]);
    }

    #[test]
    fn test_sampling_stays_inside_the_item_set() {
        let mut model = Model::with_seed(["a", "b", "c"], Bootstrap::Random, 2);
        for _ in 0..30 {
            let item = *model.sample_random_item().unwrap();
            assert!(model.contains(&item));
        }
    }

    #[test]
    #[should_panic(expected = "at least one item")]
    fn test_empty_construction_panics() {
        let _ = Model::<&str>::with_seed([], Bootstrap::Ordered, 0);
    }

    #[test]
    #[should_panic(expected = "duplicate item")]
    fn test_duplicate_construction_panics() {
        let _ = Model::with_seed(["a", "b", "a"], Bootstrap::Ordered, 0);
    }

    #[test]
    #[should_panic(expected = "cannot play against itself")]
    fn test_self_outcome_panics() {
        let mut model = ordered_abc();
        model.record_outcome(&"a", &"a");
    }

    #[test]
    #[should_panic(expected = "unknown winner")]
    fn test_unknown_winner_panics() {
        let mut model = ordered_abc();
        model.record_outcome(&"ghost", &"a");
    }
}
