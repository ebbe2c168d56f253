//! Basic vector math helper functions.
//! Small helpers for magnitudes, safe normalisation and distance metrics.
use glam::Vec2;

/// Returns the magnitude of a vector expressed by its components.
///
/// # Examples
/// ```
/// use tilewalk::vector_math::vec_mag;
/// let magnitude = vec_mag(3.0, 4.0);
/// assert!((magnitude - 5.0).abs() < f32::EPSILON);
/// ```
#[must_use]
pub fn vec_mag(component_x: f32, component_y: f32) -> f32 {
    Vec2::new(component_x, component_y).length()
}

/// Returns the unit vector in the direction of the supplied components.
///
/// Non-finite input and the zero vector both yield `(0.0, 0.0)`.
///
/// # Examples
///
/// ```
/// use tilewalk::vec_normalize;
/// let (nx, ny) = vec_normalize(3.0, 4.0);
/// assert!((nx - 0.6).abs() < 1e-6);
/// assert!((ny - 0.8).abs() < 1e-6);
///
/// assert_eq!(vec_normalize(0.0, 0.0), (0.0, 0.0));
/// ```
#[must_use]
pub fn vec_normalize(component_x: f32, component_y: f32) -> (f32, f32) {
    let normalised = normalize_or_zero(Vec2::new(component_x, component_y));
    (normalised.x, normalised.y)
}

/// Normalises `vector`, mapping zero and non-finite vectors to [`Vec2::ZERO`].
#[must_use]
pub fn normalize_or_zero(vector: Vec2) -> Vec2 {
    if !vector.is_finite() {
        return Vec2::ZERO;
    }
    vector.try_normalize().unwrap_or(Vec2::ZERO)
}

/// Chebyshev (chessboard) length: the larger of the absolute components.
///
/// ```
/// use glam::Vec2;
/// use tilewalk::vector_math::chebyshev_length;
/// assert_eq!(chebyshev_length(Vec2::new(-3.0, 2.0)), 3.0);
/// ```
#[must_use]
pub const fn chebyshev_length(vector: Vec2) -> f32 {
    vector.x.abs().max(vector.y.abs())
}
