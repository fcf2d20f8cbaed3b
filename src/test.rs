//! Shared test fixtures: seeded random datasets and brute-force references.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::metric::DistanceMetric;
use crate::r#type::CoordNum;

/// A reproducible flat coordinate buffer of `num_points` points in `dim` dimensions.
pub(crate) fn random_coords(num_points: usize, dim: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..num_points * dim)
        .map(|_| rng.gen_range(-100.0..100.0))
        .collect()
}

/// Exhaustive k-nearest reference, ordered like tree results: ascending distance, ties by
/// ascending index.
pub(crate) fn brute_force_knn<N: CoordNum>(
    coords: &[N],
    dim: usize,
    metric: &impl DistanceMetric<N>,
    query: &[N],
    k: usize,
) -> Vec<(u32, N)> {
    let mut all: Vec<(u32, N)> = coords
        .chunks_exact(dim)
        .enumerate()
        .map(|(i, point)| (i as u32, metric.distance(query, point)))
        .collect();
    all.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap().then(a.0.cmp(&b.0)));
    all.truncate(k);
    all
}

/// Exhaustive radius-search reference, in ascending index order.
pub(crate) fn brute_force_within<N: CoordNum>(
    coords: &[N],
    dim: usize,
    metric: &impl DistanceMetric<N>,
    query: &[N],
    radius: N,
) -> Vec<u32> {
    coords
        .chunks_exact(dim)
        .enumerate()
        .filter(|(_, point)| metric.distance(query, point) <= radius)
        .map(|(i, _)| i as u32)
        .collect()
}
