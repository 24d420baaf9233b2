//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Convert a u32 tally to f64 in a single location.
#[must_use]
pub fn u32_to_f64(value: u32) -> f64 {
    cast::<u32, f64>(value).unwrap_or(0.0)
}

/// Convert a usize count to f64, saturating at `u32::MAX`.
#[must_use]
pub fn count_to_f64(value: usize) -> f64 {
    u32_to_f64(u32::try_from(value).unwrap_or(u32::MAX))
}

/// Round a f64 to two decimal places with halves going to the even digit,
/// returning 0.0 for non-finite values.
#[must_use]
pub fn round_to_hundredths(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    (value * 100.0).round_ties_even() / 100.0
}

/// Three-dart average: points scored per dart scaled to a full visit.
///
/// Returns 0.0 when no darts have been thrown.
#[must_use]
pub fn three_dart_average(scored: u32, darts_thrown: usize) -> f64 {
    if darts_thrown == 0 {
        return 0.0;
    }
    round_to_hundredths(u32_to_f64(scored) / count_to_f64(darts_thrown) * 3.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding_handles_non_finite() {
        assert!((round_to_hundredths(f64::NAN) - 0.0).abs() < f64::EPSILON);
        assert!((round_to_hundredths(f64::INFINITY) - 0.0).abs() < f64::EPSILON);
        assert!((round_to_hundredths(12.345_6) - 12.35).abs() < 1e-9);
    }

    #[test]
    fn average_scales_to_three_darts() {
        assert!((three_dart_average(0, 0) - 0.0).abs() < f64::EPSILON);
        assert!((three_dart_average(60, 3) - 60.0).abs() < 1e-9);
        assert!((three_dart_average(100, 4) - 75.0).abs() < 1e-9);
        assert!((three_dart_average(100, 7) - 42.86).abs() < 1e-9);
    }

    #[test]
    fn midpoints_round_to_even() {
        assert!((three_dart_average(3, 8) - 1.12).abs() < 1e-9);
        assert!((round_to_hundredths(0.375) - 0.38).abs() < 1e-9);
        assert!((round_to_hundredths(2.5) - 2.5).abs() < 1e-9);
    }
}
