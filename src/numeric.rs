//! Numeric conversion helpers used across the project.
//!
//! These utilities guard conversions from floating-point physics results back
//! into the integer domains used for velocities and damage. Non-finite inputs
//! collapse to zero so a corrupt intermediate never leaks into vehicle state.

/// Round to the nearest `i32`, saturating at the type bounds.
///
/// # Examples
/// ```
/// use trundle::numeric::round_to_i32;
/// assert_eq!(round_to_i32(2.5), 3);
/// assert_eq!(round_to_i32(-2.5), -3);
/// assert_eq!(round_to_i32(f64::NAN), 0);
/// ```
#[expect(
    clippy::cast_possible_truncation,
    reason = "The value is clamped to the i32 bounds before casting."
)]
#[must_use]
pub fn round_to_i32(value: f64) -> i32 {
    if !value.is_finite() {
        return 0;
    }
    value
        .round()
        .clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32
}

/// Truncate towards zero into `i32`, saturating at the type bounds.
///
/// Integer physics in the movement code mirrors C-style truncation, so this is
/// the conversion used wherever a fractional velocity or damage is discarded.
#[expect(
    clippy::cast_possible_truncation,
    reason = "The value is clamped to the i32 bounds before casting."
)]
#[must_use]
pub fn trunc_to_i32(value: f64) -> i32 {
    if !value.is_finite() {
        return 0;
    }
    value
        .trunc()
        .clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32
}

/// Convert a count into `f64` for ratio arithmetic.
#[expect(
    clippy::cast_precision_loss,
    reason = "Tile and part counts are far below 2^52."
)]
#[must_use]
pub fn count_to_f64(count: usize) -> f64 {
    count as f64
}

/// Convert a non-negative `f64` into `u32`, clamping into range.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "The value is clamped to the u32 domain before casting."
)]
#[must_use]
pub fn trunc_to_u32(value: f64) -> u32 {
    if !value.is_finite() {
        return 0;
    }
    value.trunc().clamp(0.0, f64::from(u32::MAX)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::positive(1.9, 1)]
    #[case::negative(-1.9, -1)]
    #[case::infinite(f64::INFINITY, 0)]
    #[case::huge(1e20, i32::MAX)]
    fn truncation(#[case] input: f64, #[case] expected: i32) {
        assert_eq!(trunc_to_i32(input), expected);
    }

    #[test]
    fn u32_conversion_clamps_negative_values() {
        assert_eq!(trunc_to_u32(-4.0), 0);
        assert_eq!(trunc_to_u32(7.8), 7);
    }
}
