//! Real-space and Fourier-space fields sampled on a [`Grid`].

use crate::error::Error;
use crate::fft::{FourierConvention, RealFft3};
use crate::grid::Grid;
use ndarray::{Array3, ArrayView3};
use rustfft::num_complex::Complex64;

/// A real-valued field (usually the density contrast `δ(x)`) with shape
/// `(n_cell, n_cell, n_cell)`, indexed `[ix, iy, iz]`. Cell `[i, j, k]`
/// covers `[i·spacing, (i+1)·spacing) × ...`.
#[derive(Clone, Debug, PartialEq)]
pub struct RealField {
    data: Array3<f64>,
}

impl RealField {
    /// Wrap `data`, checking that its shape matches `grid`
    pub fn new(data: Array3<f64>, grid: &Grid) -> Result<Self, Error> {
        if data.dim() != grid.real_shape() {
            return Err(Error::invalid_field(format!(
                "expected shape {:?}, got {:?}",
                grid.real_shape(),
                data.dim()
            )));
        }
        Ok(RealField { data })
    }

    pub fn zeros(grid: &Grid) -> Self {
        RealField {
            data: Array3::zeros(grid.real_shape()),
        }
    }

    pub fn view(&self) -> ArrayView3<'_, f64> {
        self.data.view()
    }

    pub fn into_inner(self) -> Array3<f64> {
        self.data
    }

    pub fn n_cell(&self) -> usize {
        self.data.len_of(ndarray::Axis(0))
    }

    pub fn mean(&self) -> f64 {
        self.data.sum() / self.data.len() as f64
    }

    /// population variance of the cell values
    pub fn variance(&self) -> f64 {
        let mean = self.mean();
        self.data.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / self.data.len() as f64
    }

    pub(crate) fn check_grid(&self, grid: &Grid) -> Result<(), Error> {
        if self.data.dim() != grid.real_shape() {
            Err(Error::invalid_field(format!(
                "a field of shape {:?} doesn't match a grid with {} cells per side",
                self.data.dim(),
                grid.n_cell()
            )))
        } else {
            Ok(())
        }
    }

    /// Transform into Fourier space
    pub fn to_fourier(
        &self,
        grid: &Grid,
        convention: FourierConvention,
    ) -> Result<ComplexField, Error> {
        self.check_grid(grid)?;
        let data = RealFft3::for_grid(grid).forward(self.data.view(), grid, convention);
        Ok(ComplexField { data, convention })
    }
}

/// A half-spectrum Fourier-space field with shape
/// `(n_cell, n_cell, n_cell/2 + 1)`, laid out like the output of a
/// real-to-complex transform of a [`RealField`]. It also records the
/// normalization convention of its coefficients.
#[derive(Clone, Debug, PartialEq)]
pub struct ComplexField {
    data: Array3<Complex64>,
    convention: FourierConvention,
}

impl ComplexField {
    /// Wrap `data`, checking that its shape matches `grid`
    pub fn new(
        data: Array3<Complex64>,
        grid: &Grid,
        convention: FourierConvention,
    ) -> Result<Self, Error> {
        if data.dim() != grid.half_shape() {
            return Err(Error::invalid_field(format!(
                "expected a half spectrum of shape {:?}, got {:?}",
                grid.half_shape(),
                data.dim()
            )));
        }
        Ok(ComplexField { data, convention })
    }

    pub fn view(&self) -> ArrayView3<'_, Complex64> {
        self.data.view()
    }

    pub fn into_inner(self) -> Array3<Complex64> {
        self.data
    }

    pub fn convention(&self) -> FourierConvention {
        self.convention
    }

    pub(crate) fn check_grid(&self, grid: &Grid) -> Result<(), Error> {
        if self.data.dim() != grid.half_shape() {
            Err(Error::invalid_field(format!(
                "a half spectrum of shape {:?} doesn't match a grid with {} cells per side",
                self.data.dim(),
                grid.n_cell()
            )))
        } else {
            Ok(())
        }
    }

    /// Transform back into real space (using the field's own convention)
    pub fn to_real(&self, grid: &Grid) -> Result<RealField, Error> {
        self.check_grid(grid)?;
        let data = RealFft3::for_grid(grid).inverse(self.data.view(), grid, self.convention);
        Ok(RealField { data })
    }

    /// Express the same field in another convention
    pub fn with_convention(&self, grid: &Grid, convention: FourierConvention) -> ComplexField {
        let factor = self.convention.to_physical_factor(grid) / convention.to_physical_factor(grid);
        ComplexField {
            data: self.data.mapv(|c| c * factor),
            convention,
        }
    }
}
