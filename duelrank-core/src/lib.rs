/// duelrank-core: Bradley-Terry paired-comparison ranking.
///
/// Latent strengths for a set of items, estimated from pairwise win/loss
/// outcomes by an iterative proportional-fitting update, plus two ranking
/// strategies over those strengths. No IO, no persistence — just the model.
///
/// Items are opaque: anything `Eq + Hash + Clone` works, and the crate never
/// looks inside them.
///
/// # Quick start
///
/// ```rust
/// use duelrank_core::{Bootstrap, Model};
///
/// // Input order is treated as a best-to-worst prior.
/// let mut model = Model::new(["tea", "coffee", "water"], Bootstrap::Ordered);
///
/// // Real outcomes move the strengths on the next update pass.
/// model.record_outcome(&"coffee", &"tea");
/// model.record_outcome(&"coffee", &"tea");
/// model.update();
///
/// for item in model.rank_by_tournament() {
///     println!("{item}: {:.4}", model.strength(&item));
/// }
/// ```

pub mod constants;
pub mod model;
pub mod outcomes;
pub mod pairs;
pub mod strength;

// Re-export the primary public API at the crate root.
pub use constants::START_STRENGTH;
pub use model::{Bootstrap, Model};
pub use outcomes::PairOutcomeStore;
pub use pairs::{index_pairs, pairs};
pub use strength::StrengthVector;
