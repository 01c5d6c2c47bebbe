// the reason this is named mod.rs has to do with how cargo treats files in
// the tests directory. Following the rust book:
// https://doc.rust-lang.org/book/ch11-03-test-organization.html#submodules-in-integration-tests

#![allow(dead_code)]

use clustering::{Catalog, Grid, RealField};
use ndarray::Array3;
use rand::SeedableRng;
use rand::distr::{Distribution, Uniform};
use rand_xoshiro::Xoshiro256PlusPlus;

// based on numpy!
// https://numpy.org/doc/stable/reference/generated/numpy.isclose.html
pub fn isclose(actual: f64, ref_val: f64, rtol: f64, atol: f64) -> bool {
    let actual_nan = actual.is_nan();
    let ref_nan = ref_val.is_nan();
    if actual_nan || ref_nan {
        actual_nan && ref_nan
    } else {
        (actual - ref_val).abs() <= (atol + rtol * ref_val.abs())
    }
}

pub fn assert_allclose(actual: &[f64], reference: &[f64], rtol: f64, atol: f64) {
    assert_eq!(actual.len(), reference.len(), "lengths differ");
    for (i, (a, r)) in actual.iter().zip(reference).enumerate() {
        assert!(
            isclose(*a, *r, rtol, atol),
            "element {i}: actual = {a}, reference = {r}"
        );
    }
}

/// a field filled with uniform noise in `[-0.5, 0.5)`
pub fn noise_field(grid: &Grid, seed: u64) -> RealField {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let between = Uniform::new(-0.5, 0.5).unwrap();
    let data = Array3::from_shape_simple_fn(grid.real_shape(), || between.sample(&mut rng));
    RealField::new(data, grid).unwrap()
}

/// random points drawn uniformly from `[lo, hi)^3`
pub fn random_points(n_points: usize, lo: f64, hi: f64, seed: u64) -> Catalog {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let between = Uniform::try_from(lo..hi).unwrap();
    let points: Vec<[f64; 3]> = (0..n_points)
        .map(|_| {
            [
                between.sample(&mut rng),
                between.sample(&mut rng),
                between.sample(&mut rng),
            ]
        })
        .collect();
    Catalog::from_points(&points).unwrap()
}

/// pair counts computed the slow way, for comparisons. The last bin is
/// closed on the right.
pub fn brute_force_counts(a: &[[f64; 3]], b: Option<&[[f64; 3]]>, r_edges: &[f64]) -> Vec<u64> {
    let mut counts = vec![0_u64; r_edges.len() - 1];
    let mut tally = |p: &[f64; 3], q: &[f64; 3]| {
        let d = ((p[0] - q[0]).powi(2) + (p[1] - q[1]).powi(2) + (p[2] - q[2]).powi(2)).sqrt();
        let last = r_edges.len() - 1;
        if d < r_edges[0] || d > r_edges[last] {
            return;
        }
        let bin = if d == r_edges[last] {
            last - 1
        } else {
            r_edges.iter().rposition(|&e| e <= d).unwrap()
        };
        counts[bin] += 1;
    };
    match b {
        None => {
            for i in 0..a.len() {
                for j in (i + 1)..a.len() {
                    tally(&a[i], &a[j]);
                }
            }
        }
        Some(b) => {
            for p in a {
                for q in b {
                    tally(p, q);
                }
            }
        }
    }
    counts
}
