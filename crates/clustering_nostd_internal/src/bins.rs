//! Types representing "bin edges". They are used for binning wavenumbers when
//! estimating power spectra and for binning (squared) separations when
//! counting pairs. The [`BinEdges`] trait provides a common interface that is
//! implemented by [`RegularBinEdges`] and [`IrregularBinEdges`]

pub trait BinEdges {
    /// Calculate the bin index for a given value. Values which are equal to
    /// boundary values are considered part of the higher bin, i.e. intervals
    /// do not include the right edge.
    fn bin_index(&self, value: f64) -> Option<usize>;

    fn n_bins(&self) -> usize;

    fn rightmost_edge(&self) -> f64;

    /// Like [`BinEdges::bin_index`], except that the last bin also includes
    /// its right edge (this matches the convention of `numpy.histogram`).
    fn bin_index_right_closed(&self, value: f64) -> Option<usize> {
        if value == self.rightmost_edge() {
            Some(self.n_bins() - 1)
        } else {
            self.bin_index(value)
        }
    }
}

/// Checks that `bin_edges` holds at least 2 finite values that are strictly
/// increasing
pub fn validate_bin_edges(bin_edges: &[f64]) -> Result<(), &'static str> {
    if bin_edges.len() < 2 {
        return Err("A minimum of two bin edges are required");
    }

    if bin_edges.iter().any(|&x| !x.is_finite()) {
        return Err("Bin edges must be finite");
    }

    for i in 1..bin_edges.len() {
        if bin_edges[i] <= bin_edges[i - 1] {
            return Err("Bin edges must be in strictly increasing order");
        }
    }
    Ok(())
}

/// Regular bins with uniform spacing
#[derive(Clone, Debug, PartialEq)]
pub struct RegularBinEdges {
    min: f64,
    max: f64,
    bin_size: f64,
    n_bins: usize,
}

impl RegularBinEdges {
    /// Note that we initialize with num_bins rather than bin_size
    pub fn new(min: f64, max: f64, n_bins: usize) -> Result<Self, &'static str> {
        if n_bins == 0 {
            Err("Number of bins must be greater than zero")
        } else if !min.is_finite() || !max.is_finite() {
            Err("Min and max values must be finite")
        } else if max <= min {
            Err("Maximum value must be greater than minimum value")
        } else {
            Ok(Self {
                min,
                max,
                bin_size: (max - min) / n_bins as f64,
                n_bins,
            })
        }
    }

    /// Construct bins of width `bin_size` that start at `min`. The number of
    /// bins is the number of edges `min + i*bin_size` lying strictly below
    /// `limit`, minus one (the semantics of `numpy.arange(min, limit,
    /// bin_size)` used as edges).
    pub fn from_width_below_limit(
        min: f64,
        bin_size: f64,
        limit: f64,
    ) -> Result<Self, &'static str> {
        if !(bin_size > 0.0) || !bin_size.is_finite() {
            return Err("Bin width must be positive and finite");
        } else if !min.is_finite() || !limit.is_finite() {
            return Err("Min and limit values must be finite");
        }

        let mut n_edges = 0_usize;
        while min + (n_edges as f64) * bin_size < limit {
            n_edges += 1;
        }
        if n_edges < 2 {
            return Err("The limit leaves room for fewer than two bin edges");
        }
        let n_bins = n_edges - 1;
        Ok(Self {
            min,
            max: min + (n_bins as f64) * bin_size,
            bin_size,
            n_bins,
        })
    }

    /// the location of the `i`th edge (`i` may be as large as `n_bins`)
    pub fn edge(&self, i: usize) -> f64 {
        if i == self.n_bins {
            self.max
        } else {
            self.min + (i as f64) * self.bin_size
        }
    }
}

impl BinEdges for RegularBinEdges {
    fn bin_index(&self, value: f64) -> Option<usize> {
        if !(value >= self.min) || value >= self.max {
            return None;
        }

        // this cast handles the truncation
        let index = ((value - self.min) / self.bin_size) as usize;

        // guard against round-off pushing a value just below max past the
        // last bin
        Some(index.min(self.n_bins - 1))
    }

    fn n_bins(&self) -> usize {
        self.n_bins
    }

    fn rightmost_edge(&self) -> f64 {
        self.max
    }
}

#[derive(Clone, Debug)]
pub struct IrregularBinEdges<'a> {
    bin_edges: &'a [f64],
}

impl<'a> IrregularBinEdges<'a> {
    pub fn new(bin_edges: &'a [f64]) -> Result<IrregularBinEdges<'a>, &'static str> {
        validate_bin_edges(bin_edges)?;
        Ok(IrregularBinEdges { bin_edges })
    }
}

impl BinEdges for IrregularBinEdges<'_> {
    fn bin_index(&self, value: f64) -> Option<usize> {
        if !(value >= self.bin_edges[0]) || value >= self.bin_edges[self.bin_edges.len() - 1] {
            return None;
        }

        let index = self
            .bin_edges
            .binary_search_by(|edge| edge.total_cmp(&value))
            // Ok is used for an exact match, Err for a lower bound
            .unwrap_or_else(|i| i - 1);

        Some(index)
    }

    fn n_bins(&self) -> usize {
        self.bin_edges.len() - 1
    }

    fn rightmost_edge(&self) -> f64 {
        self.bin_edges[self.bin_edges.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regular_bins_invalid_creation() {
        // Zero bins
        assert!(RegularBinEdges::new(0.0, 10.0, 0).is_err());

        // Max <= min
        assert!(RegularBinEdges::new(10.0, 10.0, 5).is_err());
        assert!(RegularBinEdges::new(10.0, 5.0, 5).is_err());

        // Non-finite values
        assert!(RegularBinEdges::new(f64::NAN, 10.0, 5).is_err());
        assert!(RegularBinEdges::new(0.0, f64::INFINITY, 5).is_err());
    }

    #[test]
    fn irregular_bins_invalid_creation() {
        // not enough edges
        assert!(IrregularBinEdges::new(&[0.0]).is_err());
        assert!(IrregularBinEdges::new(&[]).is_err());

        // unsorted or repeated bin edges
        assert!(IrregularBinEdges::new(&[2.0, 1.0]).is_err());
        assert!(IrregularBinEdges::new(&[0.0, 3.0, 2.0]).is_err());
        assert!(IrregularBinEdges::new(&[0.0, 1.0, 1.0]).is_err());

        // Non-finite values
        assert!(IrregularBinEdges::new(&[f64::NAN, 10.0]).is_err());
        assert!(IrregularBinEdges::new(&[0.0, f64::INFINITY]).is_err());
    }

    #[test]
    fn width_below_limit() {
        // edges 1, 3, 5, 7 (9 is not below the limit)
        let bins = RegularBinEdges::from_width_below_limit(1.0, 2.0, 9.0).unwrap();
        assert_eq!(bins.n_bins(), 3);
        assert_eq!(bins.edge(0), 1.0);
        assert_eq!(bins.edge(3), 7.0);
        assert_eq!(bins.bin_index(6.9), Some(2));
        assert_eq!(bins.bin_index(7.0), None);

        // edges 1, 3, 5, 7, 9
        let bins = RegularBinEdges::from_width_below_limit(1.0, 2.0, 9.5).unwrap();
        assert_eq!(bins.n_bins(), 4);

        assert!(RegularBinEdges::from_width_below_limit(1.0, 2.0, 2.0).is_err());
        assert!(RegularBinEdges::from_width_below_limit(1.0, 0.0, 2.0).is_err());
        assert!(RegularBinEdges::from_width_below_limit(1.0, f64::NAN, 2.0).is_err());
    }

    #[test]
    fn regular_and_irregular_bin_indexing() {
        let rbins = RegularBinEdges::new(0.0, 10.0, 5).unwrap();
        let ibins = IrregularBinEdges::new(&[0.0, 2.0, 4.0, 6.0, 8.0, 10.0]).unwrap();

        let bins_list: [&dyn BinEdges; 2] = [&rbins, &ibins];

        for bins in &bins_list {
            assert_eq!(bins.n_bins(), 5);
            assert_eq!(bins.rightmost_edge(), 10.0);

            assert_eq!(bins.bin_index(0.0), Some(0));
            assert_eq!(bins.bin_index(1.9), Some(0));
            assert_eq!(bins.bin_index(2.0), Some(1));
            assert_eq!(bins.bin_index(3.9), Some(1));
            assert_eq!(bins.bin_index(4.0), Some(2));
            assert_eq!(bins.bin_index(8.0), Some(4));
            assert_eq!(bins.bin_index(9.9), Some(4));

            assert_eq!(bins.bin_index(10.0), None); // max is exclusive
            assert_eq!(bins.bin_index(-0.1), None);
            assert_eq!(bins.bin_index(10.1), None);
            assert_eq!(bins.bin_index(f64::NAN), None);

            assert_eq!(bins.bin_index_right_closed(10.0), Some(4));
            assert_eq!(bins.bin_index_right_closed(10.1), None);
            assert_eq!(bins.bin_index_right_closed(0.0), Some(0));
        }
    }

    #[test]
    fn irregular_bins_bin_indexing() {
        let bins = IrregularBinEdges::new(&[-5.0, 0.0, 2.0, 3.0]).unwrap();

        assert_eq!(bins.n_bins(), 3);

        assert_eq!(bins.bin_index(-5.0), Some(0));
        assert_eq!(bins.bin_index(-2.5), Some(0));
        assert_eq!(bins.bin_index(-0.1), Some(0));
        assert_eq!(bins.bin_index(0.0), Some(1));
        assert_eq!(bins.bin_index(1.9), Some(1));
        assert_eq!(bins.bin_index(2.0), Some(2));
        assert_eq!(bins.bin_index(2.9), Some(2));

        assert_eq!(bins.bin_index(3.0), None);
        assert_eq!(bins.bin_index(-5.1), None);
        assert_eq!(bins.bin_index(3.1), None);
    }
}
