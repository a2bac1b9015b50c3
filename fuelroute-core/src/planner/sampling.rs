//! Route geometry sampling.

use geo::Coord;

/// Reduce `geometry` to roughly one point per `interval_miles`.
///
/// The stride is `max(1, point_count / (total_miles / interval_miles))`,
/// clamped to the point count. The first vertex is always kept and the last
/// vertex is appended when the stride skips it, so the destination is always
/// the final sample. A zero-length route yields the start and the end.
pub(crate) fn sample_route(
    geometry: &[Coord<f64>],
    total_miles: f64,
    interval_miles: f64,
) -> Vec<Coord<f64>> {
    let point_count = geometry.len();
    let Some(last) = geometry.last().copied() else {
        return Vec::new();
    };
    let stride = sample_stride(point_count, total_miles, interval_miles);
    let mut samples: Vec<Coord<f64>> = geometry.iter().copied().step_by(stride).collect();
    let last_sampled_index = samples.len().saturating_sub(1) * stride;
    if last_sampled_index + 1 < point_count {
        samples.push(last);
    }
    samples
}

#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "stride is derived from the ratio of point count to expected samples"
)]
fn sample_stride(point_count: usize, total_miles: f64, interval_miles: f64) -> usize {
    let expected_samples = total_miles / interval_miles;
    if !(expected_samples.is_finite() && expected_samples > 0.0) {
        return point_count.max(1);
    }
    let stride = (point_count as f64 / expected_samples).floor();
    if stride >= point_count as f64 {
        return point_count.max(1);
    }
    (stride as usize).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[expect(
        clippy::float_arithmetic,
        clippy::cast_precision_loss,
        reason = "test vertices are spaced by index"
    )]
    fn line(points: usize) -> Vec<Coord<f64>> {
        (0..points)
            .map(|i| Coord {
                x: 0.0,
                y: i as f64 * 0.01,
            })
            .collect()
    }

    #[rstest]
    #[case(100, 1000.0, 5)]
    #[case(100, 10.0, 100)]
    #[case(10, 5000.0, 1)]
    #[case(100, 0.0, 100)]
    fn stride_follows_expected_sample_count(
        #[case] points: usize,
        #[case] total: f64,
        #[case] expected: usize,
    ) {
        assert_eq!(sample_stride(points, total, 50.0), expected);
    }

    #[rstest]
    fn keeps_destination_when_stride_skips_it() {
        let aligned = line(101);
        let aligned_samples = sample_route(&aligned, 1000.0, 50.0);
        // stride = floor(101 / 20) = 5: indices 0, 5, ..., 100
        assert_eq!(aligned_samples.len(), 21);
        assert_eq!(aligned_samples.last(), aligned.last());

        let ragged = line(103);
        let ragged_samples = sample_route(&ragged, 1000.0, 50.0);
        // stride = 5: indices 0..=100 then the final vertex 102
        assert_eq!(ragged_samples.len(), 22);
        assert_eq!(ragged_samples.last(), ragged.last());
    }

    #[rstest]
    fn zero_length_route_samples_start_and_end() {
        let geometry = line(4);
        let samples = sample_route(&geometry, 0.0, 50.0);
        assert_eq!(samples.len(), 2);
        assert_eq!(samples.first(), geometry.first());
        assert_eq!(samples.last(), geometry.last());
    }

    #[rstest]
    fn empty_geometry_yields_no_samples() {
        assert!(sample_route(&[], 10.0, 50.0).is_empty());
    }
}
