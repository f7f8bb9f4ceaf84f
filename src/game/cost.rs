//! Exponential price curve shared by generators and upgrades.

/// Price of the `(quantity + 1)`-th unit: `floor(base * multiplier^quantity)`.
///
/// `powf` keeps large exponents well-behaved; an overflowing price saturates
/// to `f64::INFINITY`, which no balance can afford.
pub fn cost(base: f64, multiplier: f64, quantity: u32) -> f64 {
    (base * multiplier.powf(quantity as f64)).floor()
}
