//! Generation of Gaussian and lognormal random density fields with a target
//! power spectrum.

use crate::error::Error;
use crate::fft::{FourierConvention, RealFft3};
use crate::field::{ComplexField, RealField};
use crate::grid::Grid;
use ndarray::{Array3, Zip};
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use rand_xoshiro::Xoshiro256PlusPlus;
use rustfft::num_complex::Complex64;
use std::f64::consts::PI;

/// A target power spectrum `P(k)`.
///
/// `evaluate` is only called with `k > 0` and must return a finite,
/// non-negative value. Any `Fn(f64) -> f64` closure is a power spectrum.
pub trait PowerSpectrum: Sync {
    fn evaluate(&self, k: f64) -> f64;
}

impl<F> PowerSpectrum for F
where
    F: Fn(f64) -> f64 + Sync,
{
    fn evaluate(&self, k: f64) -> f64 {
        self(k)
    }
}

/// `P(k) = amplitude · k^index`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PowerLaw {
    pub amplitude: f64,
    pub index: f64,
}

impl PowerSpectrum for PowerLaw {
    fn evaluate(&self, k: f64) -> f64 {
        self.amplitude * k.powf(self.index)
    }
}

/// How the lognormal transform `δ = exp(G - c) - 1` picks its constant `c`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LognormalNormalization {
    /// `c = ln(mean(exp(G)))`: the sample mean of `1 + δ` is exactly 1
    #[default]
    SampleMean,
    /// `c = Var(G) / 2`: the expectation of `1 + δ` is 1
    HalfVariance,
    /// `c = Var(G)`
    Variance,
}

/// Evaluate `power_spectrum` on every mode of the half spectrum.
///
/// The `k = 0` mode is never evaluated and is assigned zero power.
pub fn power_on_mesh(
    power_spectrum: &impl PowerSpectrum,
    grid: &Grid,
) -> Result<Array3<f64>, Error> {
    let mesh = grid.wavevector_mesh();
    let mut power = Array3::<f64>::zeros(grid.half_shape());
    Zip::from(&mut power)
        .and(&mesh.norms)
        .par_for_each(|p, &k| {
            *p = if k > 0.0 {
                power_spectrum.evaluate(k)
            } else {
                0.0
            };
        });

    let bad = Zip::from(&power)
        .and(&mesh.norms)
        .fold(None, |acc: Option<(f64, f64)>, &p, &k| {
            acc.or(if !p.is_finite() || p < 0.0 {
                Some((k, p))
            } else {
                None
            })
        });
    match bad {
        Some((k, p)) => Err(Error::invalid_spectrum(format!(
            "P(k = {k}) = {p}, but the power must be finite and non-negative"
        ))),
        None => Ok(power),
    }
}

/// Draw the Fourier modes of a Gaussian random field with the per-mode power
/// `power` (shape `(n, n, n/2 + 1)`), expressed in the physical convention.
///
/// Each mode gets `g · sqrt(P · V) · exp(iφ)` where `g` is standard normal
/// and `φ` is uniform in `[0, 2π)`. Both are drawn from a single stream in
/// C order over the modes. Afterwards, the planes of the last axis that are
/// their own mirror image (zero frequency, and the Nyquist frequency for even
/// `n`) are made Hermitian, and self-conjugate modes become real, so that the
/// result is exactly the transform of a real field. The DC mode is zero.
fn draw_modes(power: &Array3<f64>, grid: &Grid, rng: &mut Xoshiro256PlusPlus) -> Array3<Complex64> {
    let volume = grid.volume();
    let n = grid.n_cell();

    let mut modes = Array3::<Complex64>::zeros(grid.half_shape());
    for (mode, &p) in modes.iter_mut().zip(power.iter()) {
        let g: f64 = rng.sample(StandardNormal);
        let phase = 2.0 * PI * rng.random::<f64>();
        *mode = Complex64::from_polar(g * (p * volume).sqrt(), phase);
    }

    let mut self_mirrored_planes = vec![0];
    if n % 2 == 0 {
        self_mirrored_planes.push(n / 2);
    }
    for k in self_mirrored_planes {
        for i in 0..n {
            let ci = grid.conjugate_index(i);
            for j in 0..n {
                let cj = grid.conjugate_index(j);
                if (i, j) == (ci, cj) {
                    // keep the magnitude, the sign comes from the real part
                    let mode = modes[[i, j, k]];
                    modes[[i, j, k]] = Complex64::new(mode.norm().copysign(mode.re), 0.0);
                } else if (i, j) > (ci, cj) {
                    modes[[i, j, k]] = modes[[ci, cj, k]].conj();
                }
            }
        }
    }

    modes[[0, 0, 0]] = Complex64::new(0.0, 0.0);
    modes
}

/// Generate a Gaussian random field whose power spectrum is
/// `power_spectrum`.
///
/// Returns the Fourier-space field (physical convention) and the real-space
/// density contrast, which is the inverse transform of the former. The same
/// `seed` always produces the same realization.
///
/// # Errors
/// [`ErrorKind::InvalidSpectrum`](crate::ErrorKind::InvalidSpectrum) if
/// `power_spectrum` returns a negative or non-finite value for any mode.
pub fn generate_gaussian_field(
    power_spectrum: &impl PowerSpectrum,
    grid: &Grid,
    seed: u64,
) -> Result<(ComplexField, RealField), Error> {
    let power = power_on_mesh(power_spectrum, grid)?;
    gaussian_field_from_mesh_power(&power, grid, seed)
}

fn gaussian_field_from_mesh_power(
    power: &Array3<f64>,
    grid: &Grid,
    seed: u64,
) -> Result<(ComplexField, RealField), Error> {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let modes = draw_modes(power, grid, &mut rng);
    let fourier = ComplexField::new(modes, grid, FourierConvention::Physical)?;
    let real = fourier.to_real(grid)?;
    log::debug!(
        "generated a gaussian field on a {}^3 grid (variance = {})",
        grid.n_cell(),
        real.variance()
    );
    Ok((fourier, real))
}

/// Generate a lognormal density contrast field (using the default
/// [`LognormalNormalization`])
pub fn generate_lognormal_field(
    power_spectrum: &impl PowerSpectrum,
    grid: &Grid,
    seed: u64,
) -> Result<RealField, Error> {
    generate_lognormal_field_with(
        power_spectrum,
        grid,
        seed,
        LognormalNormalization::default(),
    )
}

/// Generate a lognormal density contrast field `δ > -1`.
///
/// The target spectrum is converted to the correlation function `ξ`, mapped
/// to `ln(1 + ξ)` and transformed back to obtain the spectrum of the
/// underlying Gaussian field `G`. Negative Gaussian powers (which can't be
/// realized) are set to zero. A realization of `G` is then exponentiated:
/// `δ = exp(G - c) - 1`, with `c` chosen by `normalization`.
///
/// # Errors
/// [`ErrorKind::InvalidSpectrum`](crate::ErrorKind::InvalidSpectrum) if
/// `power_spectrum` returns an invalid value or if the implied correlation
/// function reaches `-1` (so that `ln(1 + ξ)` is undefined).
pub fn generate_lognormal_field_with(
    power_spectrum: &impl PowerSpectrum,
    grid: &Grid,
    seed: u64,
    normalization: LognormalNormalization,
) -> Result<RealField, Error> {
    let fft = RealFft3::for_grid(grid);
    let power = power_on_mesh(power_spectrum, grid)?;

    let power_c = power.mapv(|p| Complex64::new(p, 0.0));
    let xi = fft.inverse(power_c.view(), grid, FourierConvention::Physical);
    if let Some(min_xi) = xi.iter().copied().reduce(f64::min) {
        if !(min_xi > -1.0) {
            return Err(Error::invalid_spectrum(format!(
                "the implied correlation function reaches {min_xi} (it must exceed -1)"
            )));
        }
    }
    let log_xi = xi.mapv(f64::ln_1p);

    let mut n_clamped = 0_usize;
    let gaussian_power = fft
        .forward(log_xi.view(), grid, FourierConvention::Physical)
        .mapv(|c| {
            if c.re < 0.0 {
                n_clamped += 1;
                0.0
            } else {
                c.re
            }
        });
    if n_clamped > 0 {
        log::warn!("clamped {n_clamped} negative gaussian mode powers to zero");
    }

    let (_, gaussian) = gaussian_field_from_mesh_power(&gaussian_power, grid, seed)?;
    let gaussian = gaussian.into_inner();
    let offset = match normalization {
        LognormalNormalization::SampleMean => {
            let mean_exp = gaussian.mapv(f64::exp).sum() / gaussian.len() as f64;
            mean_exp.ln()
        }
        LognormalNormalization::HalfVariance => 0.5 * variance(&gaussian),
        LognormalNormalization::Variance => variance(&gaussian),
    };
    RealField::new(gaussian.mapv(|g| (g - offset).exp_m1()), grid)
}

fn variance(values: &Array3<f64>) -> f64 {
    let n = values.len() as f64;
    let mean = values.sum() / n;
    values.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / n
}
