/*!
No-std building blocks shared by the `clustering` crate.

This crate holds the pieces of the binned-statistics machinery that don't
need an allocator-aware standard library: bin edges, reducers that update a
single bin's accumulator state, statepacks that hold the states of every bin,
and a handful of index helpers for working with discrete Fourier transforms.

Nothing here is meant to be used directly; the `clustering` crate re-exports
what it needs.
*/
#![no_std]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod bins;
mod misc;
mod reduce_utils;
mod reducer;
mod state;

pub use bins::{BinEdges, IrregularBinEdges, RegularBinEdges, validate_bin_edges};
pub use misc::{conjugate_index, signed_frequency, squared_diff_norm, squared_distance_to_box};
pub use reduce_utils::{merge_full_statepacks, outputs_from_statepack, reset_full_statepack};
pub use reducer::{Datum, Mean, OutputDescr, Reducer, WeightSum};
pub use state::{AccumStateView, AccumStateViewMut, StatePackViewMut};
