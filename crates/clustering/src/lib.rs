/*!
Tools for generating synthetic large-scale-structure density fields and
measuring their two-point statistics.

<div class="warning">

This crate is still in early development. The API may change as more
estimators are added.

</div>

# High-Level: the pipeline

The crate covers the round trip between a target power spectrum and the
statistics that can be measured from a point catalog:

1. A [`Grid`] describes a periodic cubic box split into cubic cells, along
   with the wavevector mesh of its discrete Fourier transform.
2. [`generate_gaussian_field`] draws a Gaussian random field whose power
   spectrum is a user-provided [`PowerSpectrum`];
   [`generate_lognormal_field`] produces a lognormal field (`δ > -1`
   everywhere) with approximately the same spectrum.
3. [`poisson_sample`] turns a density contrast field into a point
   [`Catalog`] by drawing a Poisson number of points in every cell.
4. [`estimate_power_spectrum`] measures the binned power spectrum of a field.
5. [`count_pairs`] counts pairs of points in separation bins (using a
   [`KdTree`]), and [`estimate_correlation`] combines data-data,
   data-random and random-random counts into a correlation function with one
   of the standard [`Estimator`]s.

# Conventions

- Real-space fields have the shape `(n_cell, n_cell, n_cell)` and are
  indexed `[ix, iy, iz]`. Fourier-space fields hold the half spectrum with
  shape `(n_cell, n_cell, n_cell/2 + 1)`.
- Fourier coefficients follow a [`FourierConvention`]. The default
  ([`FourierConvention::Physical`]) approximates the continuous transform,
  so that `P(k) = |δ_k|² / V`.
- Every random operation takes an explicit seed. The same seed always gives
  the same output, regardless of the number of threads.
- Statistical degeneracies (an empty bin, a zero denominator) produce `NaN`
  rather than an error. Errors are reserved for invalid inputs (see
  [`ErrorKind`]).

# Parallelism

The FFTs, mesh evaluations, binning loops and pair queries run on rayon's
global thread pool. [`RuntimeSpec`] can force the binning loops onto the
calling thread.

# Logging

The crate reports progress through the [`log`](https://docs.rs/log) facade
(`debug` for pipeline stages, `warn` for numerical adjustments like clamped
negative powers). No logger is installed by the crate.

# Developer Guide

The binning machinery (bin edges, reducers and statepacks) lives in the
no-std `clustering_nostd_internal` crate.

*/

#![deny(rustdoc::broken_intra_doc_links)]

// inform build-system of the modules in this package
mod catalog;
mod correlation;
mod error;
mod fft;
mod field;
mod gaussian;
mod grid;
mod kdtree;
mod pair_count;
mod poisson;
mod power_spectrum;
mod runtime;

// pull in symbols that are visible outside of the package
pub use catalog::{Catalog, uniform_catalog};
pub use clustering_nostd_internal::{BinEdges, IrregularBinEdges, RegularBinEdges};
pub use correlation::{
    CorrelationEstimate, Estimator, combine_counts, estimate_correlation,
    estimate_correlation_with,
};
pub use error::{Error, ErrorKind};
pub use fft::{FourierConvention, RealFft3};
pub use field::{ComplexField, RealField};
pub use gaussian::{
    LognormalNormalization, PowerLaw, PowerSpectrum, generate_gaussian_field,
    generate_lognormal_field, generate_lognormal_field_with, power_on_mesh,
};
pub use grid::{Grid, WavevectorMesh, build_grid};
pub use kdtree::KdTree;
pub use pair_count::{PairCounts, PairKind, bin_centers, count_pairs, count_pairs_with};
pub use poisson::{NegativeDensityPolicy, PoissonConfig, poisson_sample, poisson_sample_with};
pub use power_spectrum::{
    PowerSpectrumEstimate, estimate_power_spectrum, estimate_power_spectrum_from_fourier,
    estimate_power_spectrum_with, wavenumber_bins,
};
pub use runtime::RuntimeSpec;
pub use rustfft::num_complex::Complex64;
