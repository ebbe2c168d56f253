//! Numeric conversion helpers used across the project.
//!
//! These utilities guard conversions between floating-point and integer
//! domains so call-sites stay free of raw `as` casts.

/// Floor `phase` and wrap it into `0..len`.
///
/// Returns `None` when `len` is zero. Negative and non-finite phases map to
/// index `0`.
///
/// ```
/// use tilewalk::numeric::wrap_phase;
/// assert_eq!(wrap_phase(5.7, 4), Some(1));
/// assert_eq!(wrap_phase(f32::NAN, 4), Some(0));
/// assert_eq!(wrap_phase(1.0, 0), None);
/// ```
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "The phase is checked non-negative, so truncation floors it; saturation is acceptable."
)]
#[must_use]
pub const fn wrap_phase(phase: f32, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    if !phase.is_finite() || phase < 0.0 {
        return Some(0);
    }
    let floored = phase as usize;
    Some(floored % len)
}
