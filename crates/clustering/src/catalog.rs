//! Point catalogs.

use crate::error::Error;
use ndarray::{Array2, ArrayView2, Axis};
use rand::SeedableRng;
use rand::distr::{Distribution, Uniform};
use rand_xoshiro::Xoshiro256PlusPlus;

/// A set of points in 3D space.
///
/// Positions are stored in an array of shape `(3, n_points)`: the spatial
/// dimension varies along the slow axis and the point index along the fast
/// (contiguous) axis.
#[derive(Clone, Debug, PartialEq)]
pub struct Catalog {
    positions: Array2<f64>,
}

impl Catalog {
    /// Wrap an array of positions with shape `(3, n_points)`
    pub fn new(positions: Array2<f64>) -> Result<Self, Error> {
        if positions.nrows() != 3 {
            return Err(Error::invalid_catalog(format!(
                "positions must have shape (3, n_points), got {:?}",
                positions.dim()
            )));
        } else if positions.iter().any(|x| !x.is_finite()) {
            return Err(Error::invalid_catalog(
                "positions must all be finite".to_string(),
            ));
        }
        Ok(Catalog { positions })
    }

    pub fn from_points(points: &[[f64; 3]]) -> Result<Self, Error> {
        let positions = Array2::from_shape_fn((3, points.len()), |(dim, i)| points[i][dim]);
        Catalog::new(positions)
    }

    pub fn empty() -> Self {
        Catalog {
            positions: Array2::zeros((3, 0)),
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len_of(Axis(1))
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn point(&self, i: usize) -> [f64; 3] {
        [
            self.positions[[0, i]],
            self.positions[[1, i]],
            self.positions[[2, i]],
        ]
    }

    pub fn positions(&self) -> ArrayView2<'_, f64> {
        self.positions.view()
    }

    pub fn to_points(&self) -> Vec<[f64; 3]> {
        (0..self.len()).map(|i| self.point(i)).collect()
    }

    /// the smallest and largest coordinate along each axis (`None` if empty)
    pub fn bounds(&self) -> Option<([f64; 3], [f64; 3])> {
        if self.is_empty() {
            return None;
        }
        let mut lo = [f64::INFINITY; 3];
        let mut hi = [f64::NEG_INFINITY; 3];
        for (dim, row) in self.positions.outer_iter().enumerate() {
            for &x in row.iter() {
                lo[dim] = lo[dim].min(x);
                hi[dim] = hi[dim].max(x);
            }
        }
        Some((lo, hi))
    }
}

/// Draw `n_points` points uniformly distributed over the cube `[0, side)^3`.
///
/// This is the unclustered "random" catalog used by the correlation function
/// estimators.
pub fn uniform_catalog(n_points: usize, side: f64, seed: u64) -> Result<Catalog, Error> {
    let between = Uniform::new(0.0, side).map_err(|_| {
        Error::invalid_catalog(format!("side must be positive and finite, got {side}"))
    })?;
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let mut positions = Array2::<f64>::zeros((3, n_points));
    // draw x, y, z for one point before moving on to the next
    for mut column in positions.columns_mut() {
        for x in column.iter_mut() {
            *x = between.sample(&mut rng);
        }
    }
    Ok(Catalog { positions })
}
