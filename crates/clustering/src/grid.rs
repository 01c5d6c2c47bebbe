//! Discretization of a periodic cubic box and its wavevector mesh.

use crate::error::Error;
use clustering_nostd_internal::{conjugate_index, signed_frequency};
use ndarray::{Array1, Array3, Zip};
use std::f64::consts::PI;

/// A cubic box of side `side` split into `n_cell^3` cubic cells of width
/// `spacing`, where `n_cell = floor(side / spacing)`.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    side: f64,
    spacing: f64,
    n_cell: usize,
}

impl Grid {
    pub fn new(side: f64, spacing: f64) -> Result<Self, Error> {
        if !side.is_finite() || !spacing.is_finite() {
            return Err(Error::invalid_grid(side, spacing, "values must be finite"));
        } else if side <= 0.0 {
            return Err(Error::invalid_grid(side, spacing, "side must be positive"));
        } else if spacing <= 0.0 {
            return Err(Error::invalid_grid(side, spacing, "spacing must be positive"));
        }

        let n_cell_f = (side / spacing).floor();
        // the upper limit keeps n_cell^3 representable as a usize
        if n_cell_f < 2.0 {
            return Err(Error::invalid_grid(
                side,
                spacing,
                "there must be at least 2 cells per side",
            ));
        } else if n_cell_f > 2_097_152.0 {
            return Err(Error::invalid_grid(
                side,
                spacing,
                "there are too many cells per side",
            ));
        }

        let n_cell = n_cell_f as usize;
        log::debug!("built a grid with {n_cell}^3 cells (side = {side}, spacing = {spacing})");
        Ok(Grid {
            side,
            spacing,
            n_cell,
        })
    }

    pub fn side(&self) -> f64 {
        self.side
    }

    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    /// number of cells along each axis
    pub fn n_cell(&self) -> usize {
        self.n_cell
    }

    /// length of the last axis of a half-spectrum (real-to-complex) array
    pub fn n_half(&self) -> usize {
        self.n_cell / 2 + 1
    }

    /// number of modes stored in a half-spectrum array
    pub fn n_modes_half(&self) -> usize {
        self.n_cell * self.n_cell * self.n_half()
    }

    /// the integer frequency of index `i` along a full axis, in `fftfreq`
    /// order (`0, 1, ..., -2, -1`)
    pub fn signed_frequency_index(&self, i: usize) -> i64 {
        signed_frequency(i, self.n_cell)
    }

    /// the index along a full axis holding the frequency opposite to that of
    /// index `i`
    pub fn conjugate_index(&self, i: usize) -> usize {
        conjugate_index(i, self.n_cell)
    }

    pub fn volume(&self) -> f64 {
        self.side * self.side * self.side
    }

    pub fn cell_volume(&self) -> f64 {
        self.spacing * self.spacing * self.spacing
    }

    /// the fundamental wavenumber `2π/side`
    pub fn k_fundamental(&self) -> f64 {
        2.0 * PI / self.side
    }

    /// the wavenumber `2π/spacing` that bounds the power spectrum bins
    pub fn k_nyquist(&self) -> f64 {
        2.0 * PI / self.spacing
    }

    /// shape of a real-space field
    pub fn real_shape(&self) -> (usize, usize, usize) {
        (self.n_cell, self.n_cell, self.n_cell)
    }

    /// shape of a half-spectrum Fourier-space field
    pub fn half_shape(&self) -> (usize, usize, usize) {
        (self.n_cell, self.n_cell, self.n_half())
    }

    /// the angular frequencies along a full axis: `2π·fftfreq(n_cell, spacing)`
    pub fn full_axis_frequencies(&self) -> Array1<f64> {
        let scale = 2.0 * PI / (self.n_cell as f64 * self.spacing);
        Array1::from_shape_fn(self.n_cell, |i| self.signed_frequency_index(i) as f64 * scale)
    }

    /// the angular frequencies along the last (halved) axis:
    /// `2π·rfftfreq(n_cell, spacing)`
    pub fn half_axis_frequencies(&self) -> Array1<f64> {
        let scale = 2.0 * PI / (self.n_cell as f64 * self.spacing);
        Array1::from_shape_fn(self.n_half(), |i| i as f64 * scale)
    }

    /// Build the wavevector mesh matching the half-spectrum layout
    pub fn wavevector_mesh(&self) -> WavevectorMesh {
        let kx = self.full_axis_frequencies();
        let ky = kx.clone();
        let kz = self.half_axis_frequencies();

        let mut norms = Array3::<f64>::zeros(self.half_shape());
        Zip::indexed(&mut norms).par_for_each(|(i, j, k), norm| {
            *norm = (kx[i] * kx[i] + ky[j] * ky[j] + kz[k] * kz[k]).sqrt();
        });
        WavevectorMesh { kx, ky, kz, norms }
    }
}

/// Convenience wrapper around [`Grid::new`]
pub fn build_grid(side: f64, spacing: f64) -> Result<Grid, Error> {
    Grid::new(side, spacing)
}

/// The wavevectors of every mode in a half-spectrum array.
///
/// `norms[[i, j, k]]` is `|(kx[i], ky[j], kz[k])|`.
#[derive(Clone, Debug)]
pub struct WavevectorMesh {
    pub kx: Array1<f64>,
    pub ky: Array1<f64>,
    pub kz: Array1<f64>,
    pub norms: Array3<f64>,
}
