/// Insertion-ordered mapping from item to latent strength.
///
/// Items are opaque to the crate — anything `Eq + Hash + Clone` works. The
/// map keeps keys in a `Vec` alongside a key-to-index `HashMap`, so iteration
/// order is insertion order. Ranking ties are resolved by a stable sort over
/// this order, which is what makes equal-strength rankings deterministic.
use std::collections::HashMap;

use rand::Rng;

/// Strengths for every item under comparison.
///
/// Values are always >= 0. A strength of 0 marks an item that has never
/// accumulated a win relative to its opponents.
#[derive(Debug, Clone, Default)]
pub struct StrengthVector<I> {
    keys: Vec<I>,
    index: HashMap<I, usize>,
    values: Vec<f64>,
}

impl<I: Eq + std::hash::Hash + Clone> StrengthVector<I> {
    pub fn new() -> Self {
        StrengthVector {
            keys: Vec::new(),
            index: HashMap::new(),
            values: Vec::new(),
        }
    }

    /// Add an item with an initial strength. Panics on a duplicate — the
    /// item set must stay distinct.
    pub fn insert(&mut self, item: I, strength: f64) {
        let prev = self.index.insert(item.clone(), self.keys.len());
        assert!(prev.is_none(), "duplicate item inserted into strength vector");
        self.keys.push(item);
        self.values.push(strength);
    }

    pub fn contains(&self, item: &I) -> bool {
        self.index.contains_key(item)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Current strength of `item`. Panics if the item was never inserted.
    pub fn get(&self, item: &I) -> f64 {
        let idx = self
            .index
            .get(item)
            .unwrap_or_else(|| panic!("strength queried for an unknown item"));
        self.values[*idx]
    }

    /// Items in insertion order.
    pub fn keys(&self) -> &[I] {
        &self.keys
    }

    /// Strengths in the same order as `keys()`.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// (item, strength) pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&I, f64)> {
        self.keys.iter().zip(self.values.iter().copied())
    }

    /// Scale all strengths so they sum to 1.
    ///
    /// Keeps repeated update passes from growing or shrinking the vector
    /// without bound — the model is relative, not absolute. An all-zero
    /// vector has no scale to recover and is left unchanged.
    pub fn normalize(&mut self) {
        let sum: f64 = self.values.iter().sum();
        if sum <= 0.0 {
            return;
        }
        for value in &mut self.values {
            *value /= sum;
        }
    }

    /// Uniform-random key, or `None` when no items exist.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Option<&I> {
        if self.keys.is_empty() {
            return None;
        }
        Some(&self.keys[rng.random_range(0..self.keys.len())])
    }

    /// Swap in a freshly computed value vector.
    ///
    /// The update rule computes every new strength from a frozen snapshot of
    /// the old ones, then replaces the whole vector at once — never an
    /// in-place mutation interleaved with reads of the same pass.
    pub(crate) fn replace_values(&mut self, values: Vec<f64>) {
        assert_eq!(values.len(), self.values.len(), "strength vector length changed during update");
        self.values = values;
    }
}
