/// Strength assigned to every item when it enters the model.
///
/// The exact value matters less than it being positive and uniform: the first
/// `update()` call normalizes the vector to sum 1, and the fixed-point
/// iteration only ever works with relative strengths. 0.5 is kept for parity
/// with the elicitation layer's convention that a brand-new item starts as an
/// even bet against the field.
pub const START_STRENGTH: f64 = 0.5;
