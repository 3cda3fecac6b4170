/// default rounding of the two knees of [`smooth_saturation`].
pub const DEFAULT_ALPHA: f64 = 0.001;

/// differentiable approximation of `clamp(x, min, max)` built from two
/// smoothed absolute values, `sqrt(alpha + t^2) ~ |t|`. behaves like the
/// identity strictly between `min` and `max` and flattens smoothly outside.
/// converges to the exact clamp as `alpha -> 0`, and always lies in `[min, max]`.
pub fn smooth_saturation(x: f64, alpha: f64, min: f64, max: f64) -> f64 {
    let upper = max - (alpha + (x - max).powi(2)).sqrt();
    let lower = min + (alpha + (x - min).powi(2)).sqrt();
    (upper + lower) / 2.0
}
