// Random numbers and the cubic sine used for hill shapes

use rand::Rng;

/// Uniform random value between `lower` and `upper`.
///
/// The bounds may be given in either order; `rnd(rng, 2.0, -2.0)` draws from `(-2, 2]`.
pub fn rnd<R: Rng + ?Sized>(rng: &mut R, lower: f32, upper: f32) -> f32 {
    rng.gen::<f32>() * (upper - lower) + lower
}

/// Cubic approximation of a sine wave with wavelength 4, going between 0 and 1.
///
/// `cubic_sin(0) == 0`, `cubic_sin(2) == 1`, `cubic_sin(4) == 0`.
pub fn cubic_sin(x: f32) -> f32 {
    let x = x.rem_euclid(4.0);
    let xx = if x <= 2.0 { x / 2.0 } else { 2.0 - x / 2.0 };
    3.0 * xx * xx - 2.0 * xx * xx * xx
}
