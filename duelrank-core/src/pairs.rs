/// Round-robin pair sequencing.
///
/// Both the bootstrap seeding and the tournament ranking depend on the exact
/// order produced here: for i = 0..N-2, for j = i+1..N-1, yield (i, j).
/// Each unordered pair appears exactly once.

/// All C(N,2) index pairs in round-robin order.
///
/// Lazy and finite. Yields nothing when `n < 2` — there is no pair to form,
/// and callers (seeding, tournament tallies) degrade gracefully on an empty
/// sequence.
pub fn index_pairs(n: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..n.saturating_sub(1)).flat_map(move |i| ((i + 1)..n).map(move |j| (i, j)))
}

/// All unique unordered pairs of `items`, each exactly once, in round-robin
/// order. Empty when fewer than two items are given.
pub fn pairs<T>(items: &[T]) -> impl Iterator<Item = (&T, &T)> {
    index_pairs(items.len()).map(move |(i, j)| (&items[i], &items[j]))
}
