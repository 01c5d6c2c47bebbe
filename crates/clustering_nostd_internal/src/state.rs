use ndarray::{ArrayView1, ArrayViewMut1, ArrayViewMut2, Axis};

/// Read-only view of a single accumulator state
pub type AccumStateView<'a> = ArrayView1<'a, f64>;

/// Mutable view of a single accumulator state
pub type AccumStateViewMut<'a> = ArrayViewMut1<'a, f64>;

/// Represents a collection of accumulator states (one per bin)
///
/// The wrapped array has the shape `(state_size, n_states)`, so that the
/// `i`th column holds the state of the `i`th bin.
pub struct StatePackViewMut<'a> {
    data: ArrayViewMut2<'a, f64>,
}

impl<'a> StatePackViewMut<'a> {
    pub fn from_array_view(array_view: ArrayViewMut2<'a, f64>) -> Self {
        Self { data: array_view }
    }

    pub fn get_state(&self, i: usize) -> AccumStateView<'_> {
        self.data.index_axis(Axis(1), i)
    }

    pub fn get_state_mut(&mut self, i: usize) -> AccumStateViewMut<'_> {
        self.data.index_axis_mut(Axis(1), i)
    }

    pub fn state_size(&self) -> usize {
        self.data.len_of(Axis(0))
    }

    pub fn n_states(&self) -> usize {
        self.data.len_of(Axis(1))
    }
}
