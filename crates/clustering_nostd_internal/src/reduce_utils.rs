// basic utilities for driving a Reducer over every state in a statepack

use crate::reducer::Reducer;
use crate::state::StatePackViewMut;
use ndarray::ArrayViewMut2;

pub fn reset_full_statepack(reducer: &impl Reducer, statepack: &mut StatePackViewMut) {
    for i in 0..statepack.n_states() {
        reducer.init_accum_state(&mut statepack.get_state_mut(i));
    }
}

// ideally, other would be more clearly immutable, but we don't have a
// read-only statepack type
pub fn merge_full_statepacks(
    reducer: &impl Reducer,
    statepack: &mut StatePackViewMut,
    other: &StatePackViewMut,
) -> Result<(), &'static str> {
    if statepack.n_states() != other.n_states() {
        return Err("statepacks being merged must have the same number of states");
    } else if statepack.state_size() != other.state_size() {
        return Err("statepacks being merged must have the same state size");
    }
    for i in 0..statepack.n_states() {
        reducer.merge(&mut statepack.get_state_mut(i), &other.get_state(i));
    }
    Ok(())
}

/// Fill `out` (shape `(n_outputs, n_states)`) with the output values of each
/// state in `statepack`
pub fn outputs_from_statepack(
    reducer: &impl Reducer,
    out: &mut ArrayViewMut2<f64>,
    statepack: &StatePackViewMut,
) -> Result<(), &'static str> {
    let n_outputs = reducer.output_descr().n_per_accum_state();
    let (out_rows, out_cols) = out.dim();
    if out_rows != n_outputs || out_cols != statepack.n_states() {
        return Err("output array has the wrong shape");
    }
    for (i, mut col) in out.columns_mut().into_iter().enumerate() {
        reducer.value_from_accum_state(&mut col, &statepack.get_state(i));
    }
    Ok(())
}
