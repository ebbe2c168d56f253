//! Component-wise vector helpers exposed at the crate root.

use approx::assert_relative_eq;
use tilewalk::{vec_mag, vec_normalize};

#[test]
fn normalize_returns_zero_for_nan() {
    let result = vec_normalize(f32::NAN, 1.0);
    assert_eq!(result, (0.0, 0.0));
}

#[test]
fn normalize_returns_zero_for_zero_vector() {
    assert_eq!(vec_normalize(0.0, 0.0), (0.0, 0.0));
}

#[test]
fn normalize_returns_normalized_vector() {
    let result = vec_normalize(3.0, 0.0);
    assert_eq!(result, (1.0, 0.0));
}

#[test]
fn normalized_diagonal_has_unit_length() {
    let (x, y) = vec_normalize(3.0, 4.0);
    assert_relative_eq!(vec_mag(x, y), 1.0, epsilon = 1e-6);
    assert_relative_eq!(x, 0.6, epsilon = 1e-6);
    assert_relative_eq!(y, 0.8, epsilon = 1e-6);
}
