//! Accumulation machinery for binned statistics (no standard library needed)
//!
//! # Accumulation Machinery
//!
//! Both estimators in the public crate compute binned statistics over a
//! stream of values. Each element of the stream is a triple `[x, y, w]`:
//! - `x` is used for binning (a wavenumber `|k|` or a squared separation)
//! - `y` is the quantity that contributes to the statistic (e.g. the power
//!   of a Fourier mode)
//! - `w` is the weight applied to `y`.
//!
//! [`Datum`] packages together `y` & `w`. A statistic that ignores `y` and
//! sums `w` is an ordinary histogram (this is how pairs are counted). The
//! binned mean is how a power spectrum is averaged over shells.
//!
//! The binning itself is handled separately (see [`crate::bins`]). A
//! [`Reducer`] only provides the logic for updating the state of a single
//! bin, the `accum_state`. The states of every bin live together in a
//! [`StatePackViewMut`](crate::StatePackViewMut), which is owned by the code
//! driving the calculation. That separation lets each worker thread fill its
//! own statepack and lets the driver merge the packs afterwards with
//! [`Reducer::merge`].

use crate::state::{AccumStateView, AccumStateViewMut};
use ndarray::ArrayViewMut1;

/// Instances of this element are consumed by the Reducer
#[derive(Clone, Copy, Debug)]
pub struct Datum {
    pub value: f64,
    pub weight: f64,
}

impl Datum {
    /// a datum carrying a unit weight
    pub fn from_value(value: f64) -> Self {
        Datum { value, weight: 1.0 }
    }
}

/// describes the output components from a single Reducer accum_state
pub enum OutputDescr {
    MultiScalarComp(&'static [&'static str]),
}

impl OutputDescr {
    /// the number of output components per accum_state
    pub fn n_per_accum_state(&self) -> usize {
        match self {
            Self::MultiScalarComp(names) => names.len(),
        }
    }
}

/// Reducers operate on individual `accum_state`s.
pub trait Reducer {
    /// the number of f64 elements needed to track the accumulator data
    fn accum_state_size(&self) -> usize;

    /// initializes the storage tracking the accumulator's state.
    ///
    /// This must be called before the storage is used. It blindly overwrites
    /// any existing values, so it also serves to reset the state.
    fn init_accum_state(&self, accum_state: &mut AccumStateViewMut);

    /// consume the value and weight to update the accum_state
    fn consume(&self, accum_state: &mut AccumStateViewMut, datum: &Datum);

    /// merge the state information tracked by `accum_state` and `other`, and
    /// update `accum_state` accordingly
    fn merge(&self, accum_state: &mut AccumStateViewMut, other: &AccumStateView);

    /// extract all output-values from a single accum_state. Expects `value` to
    /// have the length `self.output_descr().n_per_accum_state()`.
    fn value_from_accum_state(&self, value: &mut ArrayViewMut1<f64>, accum_state: &AccumStateView);

    /// Describes the outputs produced from a single accum_state
    fn output_descr(&self) -> OutputDescr;
}

/// Weighted mean of the consumed values. An empty state has a `NaN` mean.
#[derive(Clone, Copy, Debug, Default)]
pub struct Mean;

impl Mean {
    const TOTAL: usize = 0;
    const WEIGHT: usize = 1;

    pub const VALUE_MEAN: usize = 0;
    pub const VALUE_WEIGHT: usize = 1;
    const OUTPUT_COMPONENTS: &'static [&'static str] = &["mean", "weight"];
}

impl Reducer for Mean {
    fn accum_state_size(&self) -> usize {
        2_usize
    }

    fn init_accum_state(&self, accum_state: &mut AccumStateViewMut) {
        accum_state[Mean::TOTAL] = 0.0;
        accum_state[Mean::WEIGHT] = 0.0;
    }

    fn consume(&self, accum_state: &mut AccumStateViewMut, datum: &Datum) {
        accum_state[Mean::WEIGHT] += datum.weight;
        accum_state[Mean::TOTAL] += datum.value * datum.weight;
    }

    fn merge(&self, accum_state: &mut AccumStateViewMut, other: &AccumStateView) {
        accum_state[Mean::TOTAL] += other[Mean::TOTAL];
        accum_state[Mean::WEIGHT] += other[Mean::WEIGHT];
    }

    fn output_descr(&self) -> OutputDescr {
        OutputDescr::MultiScalarComp(Mean::OUTPUT_COMPONENTS)
    }

    fn value_from_accum_state(&self, value: &mut ArrayViewMut1<f64>, accum_state: &AccumStateView) {
        // 0/0 produces NaN for empty bins
        value[[Mean::VALUE_MEAN]] = accum_state[Mean::TOTAL] / accum_state[Mean::WEIGHT];
        value[[Mean::VALUE_WEIGHT]] = accum_state[Mean::WEIGHT];
    }
}

/// Sums the weights of the consumed data (the values are ignored). With unit
/// weights, this counts the number of entries in each bin.
#[derive(Clone, Copy, Debug, Default)]
pub struct WeightSum;

impl WeightSum {
    const WEIGHT: usize = 0;

    pub const VALUE_WEIGHT: usize = 0;
    const OUTPUT_COMPONENTS: &'static [&'static str] = &["weight"];
}

impl Reducer for WeightSum {
    fn accum_state_size(&self) -> usize {
        1_usize
    }

    fn init_accum_state(&self, accum_state: &mut AccumStateViewMut) {
        accum_state[WeightSum::WEIGHT] = 0.0;
    }

    fn consume(&self, accum_state: &mut AccumStateViewMut, datum: &Datum) {
        accum_state[WeightSum::WEIGHT] += datum.weight;
    }

    fn merge(&self, accum_state: &mut AccumStateViewMut, other: &AccumStateView) {
        accum_state[WeightSum::WEIGHT] += other[WeightSum::WEIGHT];
    }

    fn output_descr(&self) -> OutputDescr {
        OutputDescr::MultiScalarComp(WeightSum::OUTPUT_COMPONENTS)
    }

    fn value_from_accum_state(&self, value: &mut ArrayViewMut1<f64>, accum_state: &AccumStateView) {
        value[[WeightSum::VALUE_WEIGHT]] = accum_state[WeightSum::WEIGHT];
    }
}
