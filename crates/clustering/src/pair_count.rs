//! Binned pair counts within one catalog (auto) or between two (cross).
//!
//! A [`KdTree`] is built over the second catalog (or the only catalog, for
//! auto counts). Every point of the first catalog then queries the tree for
//! neighbors within the largest separation edge, and each neighbor's squared
//! separation is histogrammed against the squared edges.
//!
//! # Cost
//! The tree keeps the neighbor search itself sub-quadratic for
//! well-distributed points. The histogramming, however, touches every pair
//! closer than the largest edge, so the cost grows with the number of such
//! pairs. For strongly clustered catalogs, or when the largest edge is
//! comparable to the catalog's extent, it approaches `O(N_a · N_b)`.

use crate::catalog::Catalog;
use crate::error::Error;
use crate::kdtree::KdTree;
use crate::runtime::RuntimeSpec;
use clustering_nostd_internal::{
    BinEdges, Datum, IrregularBinEdges, Reducer, StatePackViewMut, WeightSum,
    merge_full_statepacks, outputs_from_statepack, reset_full_statepack, validate_bin_edges,
};
use ndarray::Array2;
use rayon::prelude::*;

/// Whether pairs were drawn from a single catalog or from two
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PairKind {
    /// unique pairs `(i, j)` with `j > i` from one catalog
    Auto,
    /// every pair `(i, j)` with `i` from the first catalog and `j` from the
    /// second
    Cross,
}

/// Raw pair counts in separation bins
#[derive(Clone, Debug, PartialEq)]
pub struct PairCounts {
    r_edges: Vec<f64>,
    counts: Vec<u64>,
    kind: PairKind,
    n_a: usize,
    n_b: usize,
}

impl PairCounts {
    pub fn r_edges(&self) -> &[f64] {
        &self.r_edges
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn kind(&self) -> PairKind {
        self.kind
    }

    /// the number of points in the first (and second) catalog
    pub fn catalog_sizes(&self) -> (usize, usize) {
        (self.n_a, self.n_b)
    }

    pub fn n_bins(&self) -> usize {
        self.counts.len()
    }

    pub fn bin_centers(&self) -> Vec<f64> {
        bin_centers(&self.r_edges)
    }

    /// the total number of pairs that could have been counted:
    /// `N(N-1)/2` for auto counts and `N_a·N_b` for cross counts
    pub fn n_possible_pairs(&self) -> f64 {
        let n_a = self.n_a as f64;
        let n_b = self.n_b as f64;
        match self.kind {
            PairKind::Auto => n_a * (n_a - 1.0) / 2.0,
            PairKind::Cross => n_a * n_b,
        }
    }

    /// counts divided by [`PairCounts::n_possible_pairs`] (`NaN` if no pair
    /// is possible)
    pub fn normalized(&self) -> Vec<f64> {
        let norm = self.n_possible_pairs();
        self.counts
            .iter()
            .map(|&c| if norm > 0.0 { c as f64 / norm } else { f64::NAN })
            .collect()
    }
}

/// midpoints of consecutive edges
pub fn bin_centers(edges: &[f64]) -> Vec<f64> {
    edges.windows(2).map(|w| 0.5 * (w[0] + w[1])).collect()
}

/// Count pairs with separations in each bin of `r_edges`.
///
/// When `catalog_b` is `None`, unique pairs within `catalog_a` are counted
/// (each unordered pair once, never a point with itself). Otherwise every
/// pair between the catalogs is counted, including coincident points. Bins
/// are half-open `[r_i, r_{i+1})` except the last, which also includes its
/// right edge.
///
/// # Errors
/// - [`ErrorKind::EmptyCatalog`](crate::ErrorKind::EmptyCatalog) if a
///   catalog has no points
/// - [`ErrorKind::InvalidBins`](crate::ErrorKind::InvalidBins) if `r_edges`
///   has fewer than 2 entries, holds negative or non-finite values, or isn't
///   strictly increasing
pub fn count_pairs(
    catalog_a: &Catalog,
    r_edges: &[f64],
    catalog_b: Option<&Catalog>,
) -> Result<PairCounts, Error> {
    count_pairs_with(catalog_a, r_edges, catalog_b, &RuntimeSpec::default())
}

pub fn count_pairs_with(
    catalog_a: &Catalog,
    r_edges: &[f64],
    catalog_b: Option<&Catalog>,
    runtime: &RuntimeSpec,
) -> Result<PairCounts, Error> {
    const WHO: &str = "separation bin edges";
    validate_bin_edges(r_edges).map_err(|e| Error::invalid_bins(WHO, e))?;
    if r_edges[0] < 0.0 {
        return Err(Error::invalid_bins(WHO, "Bin edges must be non-negative"));
    }
    let squared_edges: Vec<f64> = r_edges.iter().map(|r| r * r).collect();
    // squaring can merge distinct tiny edges
    let bins = IrregularBinEdges::new(&squared_edges).map_err(|e| Error::invalid_bins(WHO, e))?;

    if catalog_a.is_empty() {
        return Err(Error::empty_catalog("first"));
    }
    let (tree_catalog, kind) = match catalog_b {
        Some(b) if b.is_empty() => return Err(Error::empty_catalog("second")),
        Some(b) => (b, PairKind::Cross),
        None => (catalog_a, PairKind::Auto),
    };
    let tree = KdTree::build(tree_catalog);

    let reducer = WeightSum;
    let n_bins = bins.n_bins();
    let new_statepack = || {
        let mut data = Array2::<f64>::zeros((reducer.accum_state_size(), n_bins));
        reset_full_statepack(&reducer, &mut StatePackViewMut::from_array_view(data.view_mut()));
        data
    };
    let visit = |mut data: Array2<f64>, i: usize| -> Array2<f64> {
        let mut statepack = StatePackViewMut::from_array_view(data.view_mut());
        let center = catalog_a.point(i);
        tree.for_each_within(&center, bins.rightmost_edge(), |j, dist_squared| {
            if kind == PairKind::Auto && j <= i {
                return;
            }
            if let Some(bin) = bins.bin_index_right_closed(dist_squared) {
                reducer.consume(&mut statepack.get_state_mut(bin), &Datum::from_value(dist_squared));
            }
        });
        data
    };

    let mut totals = if runtime.is_threaded() {
        (0..catalog_a.len())
            .into_par_iter()
            .fold(&new_statepack, visit)
            .map(Ok::<_, Error>)
            .try_reduce(&new_statepack, |mut a, mut b| {
                merge_full_statepacks(
                    &reducer,
                    &mut StatePackViewMut::from_array_view(a.view_mut()),
                    &StatePackViewMut::from_array_view(b.view_mut()),
                )
                .map_err(Error::internal)?;
                Ok(a)
            })?
    } else {
        (0..catalog_a.len()).fold(new_statepack(), visit)
    };

    let mut outputs = Array2::<f64>::zeros((reducer.output_descr().n_per_accum_state(), n_bins));
    outputs_from_statepack(
        &reducer,
        &mut outputs.view_mut(),
        &StatePackViewMut::from_array_view(totals.view_mut()),
    )
    .map_err(Error::internal)?;
    let counts: Vec<u64> = outputs
        .row(WeightSum::VALUE_WEIGHT)
        .iter()
        .map(|&w| w as u64)
        .collect();
    log::debug!(
        "counted {} {:?} pairs in {} bins",
        counts.iter().sum::<u64>(),
        kind,
        n_bins
    );
    Ok(PairCounts {
        r_edges: r_edges.to_vec(),
        counts,
        kind,
        n_a: catalog_a.len(),
        n_b: tree_catalog.len(),
    })
}
