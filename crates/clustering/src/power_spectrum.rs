//! Estimation of the binned power spectrum of a density field.

use crate::error::Error;
use crate::fft::FourierConvention;
use crate::field::{ComplexField, RealField};
use crate::grid::Grid;
use crate::runtime::RuntimeSpec;
use clustering_nostd_internal::{
    BinEdges, Datum, Mean, Reducer, RegularBinEdges, StatePackViewMut, merge_full_statepacks,
    outputs_from_statepack, reset_full_statepack,
};
use ndarray::{Array2, ArrayView2, Axis};
use rayon::prelude::*;
use rustfft::num_complex::Complex64;

// a mode whose |k| sits on a bin edge up to round-off is nudged into the
// upper bin
const EDGE_NUDGE: f64 = 1e-12;

/// A binned power spectrum. Every vector has one entry per bin; `k_edges` has
/// one more.
#[derive(Clone, Debug, PartialEq)]
pub struct PowerSpectrumEstimate {
    pub k_edges: Vec<f64>,
    pub k_centers: Vec<f64>,
    /// mean `|k|` of the modes in each bin (`NaN` for empty bins)
    pub k_mean: Vec<f64>,
    /// mean of `|δ_k|² / V` over the modes in each bin (`NaN` for empty bins)
    pub power: Vec<f64>,
    /// the number of (half-spectrum) modes in each bin
    pub n_modes: Vec<usize>,
}

impl PowerSpectrumEstimate {
    pub fn n_bins(&self) -> usize {
        self.power.len()
    }

    /// The Gaussian sample-variance error on each bin, `P / sqrt(n_modes)`
    pub fn gaussian_error(&self) -> Vec<f64> {
        self.power
            .iter()
            .zip(&self.n_modes)
            .map(|(&p, &n)| p / (n as f64).sqrt())
            .collect()
    }
}

/// The wavenumber bins used for a grid: edges `k_F + i·n_kf·k_F` for every
/// edge below the `2π/spacing` limit
pub fn wavenumber_bins(grid: &Grid, n_kf: usize) -> Result<RegularBinEdges, Error> {
    const WHO: &str = "wavenumber bins";
    if n_kf == 0 {
        return Err(Error::invalid_bins(
            WHO,
            "the bin width must be at least one fundamental wavenumber",
        ));
    }
    let k_f = grid.k_fundamental();
    RegularBinEdges::from_width_below_limit(k_f, n_kf as f64 * k_f, grid.k_nyquist())
        .map_err(|e| Error::invalid_bins(WHO, e))
}

/// Estimate the power spectrum of `field` in shells of width `n_kf · k_F`.
pub fn estimate_power_spectrum(
    field: &RealField,
    grid: &Grid,
    n_kf: usize,
) -> Result<PowerSpectrumEstimate, Error> {
    let fourier = field.to_fourier(grid, FourierConvention::Physical)?;
    estimate_power_spectrum_from_fourier(&fourier, grid, n_kf)
}

/// Like [`estimate_power_spectrum`], but starts from the Fourier transform of
/// the field (in any [`FourierConvention`])
pub fn estimate_power_spectrum_from_fourier(
    field: &ComplexField,
    grid: &Grid,
    n_kf: usize,
) -> Result<PowerSpectrumEstimate, Error> {
    estimate_power_spectrum_with(field, grid, n_kf, &RuntimeSpec::default())
}

pub fn estimate_power_spectrum_with(
    field: &ComplexField,
    grid: &Grid,
    n_kf: usize,
    runtime: &RuntimeSpec,
) -> Result<PowerSpectrumEstimate, Error> {
    field.check_grid(grid)?;
    let bins = wavenumber_bins(grid, n_kf)?;
    let n_bins = bins.n_bins();
    let mesh = grid.wavevector_mesh();

    // |δ_k|² / V with δ_k in the physical convention
    let to_physical = field.convention().to_physical_factor(grid);
    let power_scale = to_physical * to_physical / grid.volume();

    // the first half of the rows holds the statepack for the binned power, the
    // second half holds the one for the binned |k|
    let reducer = Mean;
    let new_statepacks = || {
        let mut data = Array2::<f64>::zeros((2 * reducer.accum_state_size(), n_bins));
        for mut pack in split_statepacks(&mut data) {
            reset_full_statepack(&reducer, &mut pack);
        }
        data
    };
    let visit = |mut data: Array2<f64>,
                 (modes, norms): (ArrayView2<Complex64>, ArrayView2<f64>)|
     -> Array2<f64> {
        let [mut power_pack, mut k_pack] = split_statepacks(&mut data);
        for (mode, &k) in modes.iter().zip(norms.iter()) {
            if let Some(bin) = bins.bin_index(k * (1.0 + EDGE_NUDGE)) {
                let power = mode.norm_sqr() * power_scale;
                reducer.consume(&mut power_pack.get_state_mut(bin), &Datum::from_value(power));
                reducer.consume(&mut k_pack.get_state_mut(bin), &Datum::from_value(k));
            }
        }
        data
    };

    let modes = field.view();
    let slabs = modes.axis_iter(Axis(0)).zip(mesh.norms.axis_iter(Axis(0)));
    let mut totals = if runtime.is_threaded() {
        modes
            .axis_iter(Axis(0))
            .into_par_iter()
            .zip(mesh.norms.axis_iter(Axis(0)).into_par_iter())
            .fold(&new_statepacks, visit)
            .map(Ok::<_, Error>)
            .try_reduce(&new_statepacks, |mut a, mut b| {
                let [mut a_power, mut a_k] = split_statepacks(&mut a);
                let [b_power, b_k] = split_statepacks(&mut b);
                merge_full_statepacks(&reducer, &mut a_power, &b_power).map_err(Error::internal)?;
                merge_full_statepacks(&reducer, &mut a_k, &b_k).map_err(Error::internal)?;
                Ok(a)
            })?
    } else {
        slabs.fold(new_statepacks(), visit)
    };

    let n_outputs = reducer.output_descr().n_per_accum_state();
    let mut power_out = Array2::<f64>::zeros((n_outputs, n_bins));
    let mut k_out = Array2::<f64>::zeros((n_outputs, n_bins));
    let [power_pack, k_pack] = split_statepacks(&mut totals);
    outputs_from_statepack(&reducer, &mut power_out.view_mut(), &power_pack)
        .map_err(Error::internal)?;
    outputs_from_statepack(&reducer, &mut k_out.view_mut(), &k_pack).map_err(Error::internal)?;

    let n_modes: Vec<usize> = power_out
        .row(Mean::VALUE_WEIGHT)
        .iter()
        .map(|&w| w as usize)
        .collect();
    let n_empty = n_modes.iter().filter(|&&n| n == 0).count();
    if n_empty > 0 {
        log::warn!("{n_empty} of {n_bins} wavenumber bins hold no modes");
    }

    let k_edges: Vec<f64> = (0..=n_bins).map(|i| bins.edge(i)).collect();
    let k_centers = crate::pair_count::bin_centers(&k_edges);
    Ok(PowerSpectrumEstimate {
        k_edges,
        k_centers,
        k_mean: k_out.row(Mean::VALUE_MEAN).to_vec(),
        power: power_out.row(Mean::VALUE_MEAN).to_vec(),
        n_modes,
    })
}

// split the rows of `data` into two statepacks of equal state size
fn split_statepacks(data: &mut Array2<f64>) -> [StatePackViewMut<'_>; 2] {
    let state_size = data.nrows() / 2;
    let (first, second) = data.view_mut().split_at(Axis(0), state_size);
    [
        StatePackViewMut::from_array_view(first),
        StatePackViewMut::from_array_view(second),
    ]
}
