//! Discretization of a density contrast field into a point catalog.
//!
//! Each cell receives a Poisson-distributed number of points with mean
//! `λ = n̄ (1 + δ) spacing³`, where `n̄ = n_objects / V`. The points are
//! placed uniformly at random inside the cell.
//!
//! # Determinism
//! Cells are processed in slabs of constant `ix`, and the slabs are
//! concatenated in order. Every slab draws from its own non-overlapping
//! [`Xoshiro256PlusPlus`] substream (see [`slab_streams`]). The catalog
//! therefore only depends on the seed, never on how the slabs are scheduled
//! across threads.

use crate::catalog::Catalog;
use crate::error::Error;
use crate::field::RealField;
use crate::grid::Grid;
use crate::runtime::RuntimeSpec;
use ndarray::{Array2, ArrayView2, Axis};
use rand::SeedableRng;
use rand::distr::{Distribution, Uniform};
use rand_distr::Poisson;
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::prelude::*;

/// What to do with cells where `δ < -1` (a negative expected count)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NegativeDensityPolicy {
    /// fail with [`ErrorKind::InvalidField`](crate::ErrorKind::InvalidField)
    #[default]
    Reject,
    /// treat the cell as empty
    Clamp,
}

/// Configuration of [`poisson_sample_with`]
#[derive(Clone, Debug, PartialEq)]
pub struct PoissonConfig {
    /// the expected total number of objects
    pub n_objects: usize,
    pub seed: u64,
    pub negative_density: NegativeDensityPolicy,
    pub runtime: RuntimeSpec,
}

impl PoissonConfig {
    pub fn new(n_objects: usize, seed: u64) -> Self {
        PoissonConfig {
            n_objects,
            seed,
            negative_density: NegativeDensityPolicy::default(),
            runtime: RuntimeSpec::default(),
        }
    }
}

/// Draw a catalog whose expected size is `n_objects` from `field`.
///
/// # Errors
/// [`ErrorKind::InvalidField`](crate::ErrorKind::InvalidField) if the field
/// doesn't match `grid`, or if it holds a value that is non-finite or below
/// -1.
pub fn poisson_sample(
    field: &RealField,
    grid: &Grid,
    n_objects: usize,
    seed: u64,
) -> Result<Catalog, Error> {
    poisson_sample_with(field, grid, &PoissonConfig::new(n_objects, seed))
}

pub fn poisson_sample_with(
    field: &RealField,
    grid: &Grid,
    config: &PoissonConfig,
) -> Result<Catalog, Error> {
    field.check_grid(grid)?;
    let delta = field.view();

    let n_invalid = delta.iter().filter(|d| !(**d >= -1.0)).count();
    if n_invalid > 0 {
        match config.negative_density {
            NegativeDensityPolicy::Reject => {
                let worst = delta.iter().copied().find(|d| !(*d >= -1.0)).unwrap_or(f64::NAN);
                return Err(Error::invalid_field(format!(
                    "{n_invalid} cells have a density contrast below -1 or that isn't \
                     finite (e.g. {worst})"
                )));
            }
            NegativeDensityPolicy::Clamp => {
                log::warn!("treating {n_invalid} cells with a density contrast below -1 as empty")
            }
        }
    }
    if let Some(d) = delta.iter().find(|d| **d == f64::INFINITY) {
        return Err(Error::invalid_field(format!(
            "the density contrast must be finite, got {d}"
        )));
    }

    let mean_per_cell = config.n_objects as f64 / grid.volume() * grid.cell_volume();
    let streams = slab_streams(config.seed, grid.n_cell());
    let draw_slab = |(ix, mut rng): (usize, Xoshiro256PlusPlus)| {
        sample_slab(
            delta.index_axis(Axis(0), ix),
            ix,
            grid.spacing(),
            mean_per_cell,
            &mut rng,
        )
    };

    let slabs: Vec<Vec<[f64; 3]>> = if config.runtime.is_threaded() {
        streams
            .into_par_iter()
            .enumerate()
            .map(draw_slab)
            .collect::<Result<_, _>>()?
    } else {
        streams
            .into_iter()
            .enumerate()
            .map(draw_slab)
            .collect::<Result<_, _>>()?
    };

    let n_points: usize = slabs.iter().map(Vec::len).sum();
    let mut positions = Array2::<f64>::zeros((3, n_points));
    for (mut column, point) in positions.columns_mut().into_iter().zip(slabs.iter().flatten()) {
        column[0] = point[0];
        column[1] = point[1];
        column[2] = point[2];
    }
    log::debug!(
        "drew {n_points} points (expected {}) from a {}^3 grid",
        config.n_objects,
        grid.n_cell()
    );
    Catalog::new(positions)
}

/// One generator per slab.
///
/// The stream seeded with `seed` is first advanced by a long jump (2^192
/// draws), which separates it from the stream the field generators build
/// from the same seed. Slab `ix` then starts `ix` jumps (2^128 draws each)
/// further along. Neighboring seeds give unrelated streams.
fn slab_streams(seed: u64, n_slabs: usize) -> Vec<Xoshiro256PlusPlus> {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    rng.long_jump();
    (0..n_slabs)
        .map(|_| {
            let slab = rng.clone();
            rng.jump();
            slab
        })
        .collect()
}

/// Draw the points for every cell of the slab `ix`
fn sample_slab(
    slab: ArrayView2<f64>,
    ix: usize,
    spacing: f64,
    mean_per_cell: f64,
    rng: &mut Xoshiro256PlusPlus,
) -> Result<Vec<[f64; 3]>, Error> {
    let mut points = Vec::new();
    for ((iy, iz), &delta) in slab.indexed_iter() {
        // NaN and values below -1 only get here with the Clamp policy
        let lambda = if delta > -1.0 {
            mean_per_cell * (1.0 + delta)
        } else {
            0.0
        };
        if lambda <= 0.0 {
            continue;
        }
        let count = Poisson::new(lambda)
            .map_err(|e| {
                Error::invalid_field(format!(
                    "can't draw a Poisson count with mean {lambda}: {e}"
                ))
            })?
            .sample(rng) as usize;
        if count == 0 {
            continue;
        }

        let x_range = cell_range(ix, spacing)?;
        let y_range = cell_range(iy, spacing)?;
        let z_range = cell_range(iz, spacing)?;
        for _ in 0..count {
            points.push([
                x_range.sample(rng),
                y_range.sample(rng),
                z_range.sample(rng),
            ]);
        }
    }
    Ok(points)
}

// the half-open interval covered by cell `i` along one axis
fn cell_range(i: usize, spacing: f64) -> Result<Uniform<f64>, Error> {
    let lo = i as f64 * spacing;
    let hi = (i + 1) as f64 * spacing;
    Uniform::new(lo, hi)
        .map_err(|e| Error::invalid_field(format!("cell [{lo}, {hi}) is unusable: {e}")))
}
