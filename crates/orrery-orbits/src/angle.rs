//! Angle wrapping and frame-delta sanitizing shared by every orbit model.

use std::f64::consts::TAU;

/// Wrap an angle in radians into `[0, 2π)`.
///
/// Works for any finite input, including large negative angles produced by
/// retrograde motion. Non-finite input maps to `0.0` so a corrupted phase
/// can never leak into position state.
pub fn wrap_angle(angle: f64) -> f64 {
    if !angle.is_finite() {
        return 0.0;
    }
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs.
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Clamp a frame delta to something safe to integrate.
///
/// Negative, NaN and infinite deltas become `0.0` for that tick.
pub fn sanitize_delta(delta_seconds: f64) -> f64 {
    if delta_seconds.is_finite() && delta_seconds > 0.0 {
        delta_seconds
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_wrap_keeps_in_range_values() {
        assert_eq!(wrap_angle(0.0), 0.0);
        assert!((wrap_angle(PI) - PI).abs() < 1e-15);
    }

    #[test]
    fn test_wrap_full_turns() {
        assert!(wrap_angle(TAU).abs() < 1e-12);
        assert!((wrap_angle(5.0 * TAU + 1.0) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_wrap_negative_angles() {
        assert!((wrap_angle(-PI / 2.0) - 1.5 * PI).abs() < 1e-12);
        let tiny = wrap_angle(-1e-18);
        assert!((0.0..TAU).contains(&tiny), "got {tiny}");
    }

    #[test]
    fn test_wrap_non_finite_is_zero() {
        assert_eq!(wrap_angle(f64::NAN), 0.0);
        assert_eq!(wrap_angle(f64::INFINITY), 0.0);
        assert_eq!(wrap_angle(f64::NEG_INFINITY), 0.0);
    }

    #[test]
    fn test_sanitize_delta() {
        assert_eq!(sanitize_delta(0.016), 0.016);
        assert_eq!(sanitize_delta(-0.5), 0.0);
        assert_eq!(sanitize_delta(f64::NAN), 0.0);
        assert_eq!(sanitize_delta(f64::INFINITY), 0.0);
        assert_eq!(sanitize_delta(0.0), 0.0);
    }
}
