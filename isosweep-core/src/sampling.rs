//! Small numeric helpers shared by the generators and perturbations.

use rand::{Rng, rngs::SmallRng};

/// Rounds `fraction * total` to the nearest count, clamped to `0..=total`.
#[expect(
    clippy::float_arithmetic,
    reason = "fractional counts are derived from a floating-point magnitude"
)]
#[expect(
    clippy::cast_precision_loss,
    reason = "graph sizes are far below the f64 mantissa limit"
)]
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "the rounded value is clamped to the non-negative total first"
)]
pub(crate) fn scaled_count(fraction: f64, total: usize) -> usize {
    if !fraction.is_finite() || fraction <= 0.0 {
        return 0;
    }
    let scaled = (fraction * total as f64).round();
    if scaled >= total as f64 {
        total
    } else {
        scaled as usize
    }
}

/// Draws two distinct nodes uniformly from `0..node_count`.
///
/// Returns `None` when fewer than two nodes exist.
#[expect(
    clippy::integer_division_remainder_used,
    reason = "the offset wraps around the node range"
)]
pub(crate) fn distinct_pair(node_count: usize, rng: &mut SmallRng) -> Option<(usize, usize)> {
    if node_count < 2 {
        return None;
    }
    let first = rng.gen_range(0..node_count);
    let offset = rng.gen_range(1..node_count);
    Some((first, (first + offset) % node_count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, 10, 0)]
    #[case(0.25, 10, 3)]
    #[case(0.5, 7, 4)]
    #[case(1.0, 10, 10)]
    #[case(3.0, 10, 10)]
    #[case(-1.0, 10, 0)]
    #[case(f64::NAN, 10, 0)]
    fn scaled_count_rounds_and_clamps(
        #[case] fraction: f64,
        #[case] total: usize,
        #[case] expected: usize,
    ) {
        assert_eq!(scaled_count(fraction, total), expected);
    }

    #[rstest]
    fn distinct_pair_never_repeats_a_node() {
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..200 {
            let (left, right) = distinct_pair(3, &mut rng).expect("three nodes admit a pair");
            assert_ne!(left, right);
            assert!(left < 3 && right < 3);
        }
        assert!(distinct_pair(1, &mut rng).is_none());
    }
}
