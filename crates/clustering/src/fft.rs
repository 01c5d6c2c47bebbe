//! Three-dimensional real-to-complex (and inverse) transforms of cubic
//! fields.
//!
//! `rustfft` only provides one-dimensional complex transforms. A 3-D
//! transform is built by transforming every lane along each of the three axes
//! in turn (rayon processes the lanes of an axis in parallel). The forward
//! transform keeps the non-negative frequencies of the last axis, which is the
//! same half-spectrum layout produced by `numpy.fft.rfftn`. The inverse
//! transform rebuilds the missing half from Hermitian symmetry and keeps the
//! real part, which matches `numpy.fft.irfftn`.

use crate::grid::Grid;
use ndarray::parallel::prelude::*;
use ndarray::{Array3, ArrayView3, Axis, Zip, s};
use rustfft::num_complex::Complex64;
use rustfft::{Fft, FftPlanner};
use std::sync::Arc;

/// The normalization convention of a Fourier-space field.
///
/// Writing the unnormalized sum as `S(x) = Σ x_j exp(-i k·r_j)`, each
/// convention scales the forward and inverse sums as follows (`N = n_cell^3`,
/// `dV = spacing^3`):
///
/// | convention | forward       | inverse            |
/// |------------|---------------|--------------------|
/// | `Physical` | `dV · S`      | `S⁻¹ / (N · dV)`   |
/// | `Backward` | `S`           | `S⁻¹ / N`          |
/// | `Ortho`    | `S / sqrt(N)` | `S⁻¹ / sqrt(N)`    |
///
/// `Physical` approximates the continuous transform
/// `δ(k) = ∫ δ(x) exp(-i k·x) d³x`, which is the convention in which
/// `P(k) = |δ(k)|² / V`. The power spectrum estimator converts other
/// conventions to it. Every convention round-trips to the identity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FourierConvention {
    #[default]
    Physical,
    Backward,
    Ortho,
}

impl FourierConvention {
    /// the factor applied to the unnormalized forward sum
    pub fn forward_scale(&self, grid: &Grid) -> f64 {
        let n_total = grid.n_cell().pow(3) as f64;
        match self {
            FourierConvention::Physical => grid.cell_volume(),
            FourierConvention::Backward => 1.0,
            FourierConvention::Ortho => 1.0 / n_total.sqrt(),
        }
    }

    /// the factor applied to the unnormalized inverse sum
    pub fn inverse_scale(&self, grid: &Grid) -> f64 {
        let n_total = grid.n_cell().pow(3) as f64;
        match self {
            FourierConvention::Physical => 1.0 / (n_total * grid.cell_volume()),
            FourierConvention::Backward => 1.0 / n_total,
            FourierConvention::Ortho => 1.0 / n_total.sqrt(),
        }
    }

    /// the factor converting coefficients in this convention into
    /// [`FourierConvention::Physical`] coefficients
    pub fn to_physical_factor(&self, grid: &Grid) -> f64 {
        grid.cell_volume() / self.forward_scale(grid)
    }
}

/// A planned pair of 3-D transforms for cubes with `n` cells per side
pub struct RealFft3 {
    n: usize,
    forward: Arc<dyn Fft<f64>>,
    inverse: Arc<dyn Fft<f64>>,
}

impl RealFft3 {
    pub fn new(n: usize) -> Self {
        let mut planner = FftPlanner::<f64>::new();
        let forward = planner.plan_fft_forward(n);
        let inverse = planner.plan_fft_inverse(n);
        RealFft3 {
            n,
            forward,
            inverse,
        }
    }

    pub fn for_grid(grid: &Grid) -> Self {
        Self::new(grid.n_cell())
    }

    /// Unnormalized forward transform of a real `(n, n, n)` array into the
    /// half spectrum `(n, n, n/2 + 1)`.
    ///
    /// # Panics
    /// If `real` isn't an `(n, n, n)` array.
    pub fn forward_unnormalized(&self, real: ArrayView3<f64>) -> Array3<Complex64> {
        let n = self.n;
        assert_eq!(real.dim(), (n, n, n), "real array has the wrong shape");
        let mut full = real.mapv(|x| Complex64::new(x, 0.0));
        for axis in 0..3 {
            transform_lanes(&mut full, Axis(axis), &self.forward);
        }
        full.slice(s![.., .., ..(n / 2 + 1)]).to_owned()
    }

    /// Unnormalized inverse transform of a half spectrum `(n, n, n/2 + 1)`
    /// into a real `(n, n, n)` array.
    ///
    /// The negative frequencies of the last axis are taken to be the complex
    /// conjugates of their partners. Imaginary parts of the planes that have
    /// no partner (the zero and Nyquist frequencies of the last axis) are
    /// effectively discarded.
    ///
    /// # Panics
    /// If `half` isn't an `(n, n, n/2 + 1)` array.
    pub fn inverse_unnormalized(&self, half: ArrayView3<Complex64>) -> Array3<f64> {
        let n = self.n;
        let n_half = n / 2 + 1;
        assert_eq!(half.dim(), (n, n, n_half), "half spectrum has the wrong shape");

        let mut full = Array3::<Complex64>::zeros((n, n, n));
        full.slice_mut(s![.., .., ..n_half]).assign(&half);
        full.axis_iter_mut(Axis(0))
            .into_par_iter()
            .enumerate()
            .for_each(|(i, mut plane)| {
                let ci = (n - i) % n;
                for j in 0..n {
                    let cj = (n - j) % n;
                    for k in n_half..n {
                        plane[[j, k]] = half[[ci, cj, n - k]].conj();
                    }
                }
            });

        for axis in 0..3 {
            transform_lanes(&mut full, Axis(axis), &self.inverse);
        }
        full.mapv(|c| c.re)
    }

    /// Forward transform following `convention`
    pub fn forward(
        &self,
        real: ArrayView3<f64>,
        grid: &Grid,
        convention: FourierConvention,
    ) -> Array3<Complex64> {
        let scale = convention.forward_scale(grid);
        let mut out = self.forward_unnormalized(real);
        out.par_mapv_inplace(|c| c * scale);
        out
    }

    /// Inverse transform following `convention`
    pub fn inverse(
        &self,
        half: ArrayView3<Complex64>,
        grid: &Grid,
        convention: FourierConvention,
    ) -> Array3<f64> {
        let scale = convention.inverse_scale(grid);
        let mut out = self.inverse_unnormalized(half);
        out.par_mapv_inplace(|x| x * scale);
        out
    }
}

/// Apply `fft` in-place to every lane of `data` along `axis`
fn transform_lanes(data: &mut Array3<Complex64>, axis: Axis, fft: &Arc<dyn Fft<f64>>) {
    Zip::from(data.lanes_mut(axis)).par_for_each(|mut lane| {
        // lanes along the first axes aren't contiguous, so we copy
        let mut buffer = lane.to_vec();
        fft.process(&mut buffer);
        for (dst, src) in lane.iter_mut().zip(buffer) {
            *dst = src;
        }
    });
}
