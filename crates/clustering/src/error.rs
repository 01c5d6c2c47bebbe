// Errors are defined in two layers. `clustering_nostd_internal` returns
// `&'static str` messages (it can't allocate a String). This crate wraps
// those messages, adds context about which input was at fault, and exposes a
// single opaque `Error` type. Callers that need to react to a particular
// failure can match on `Error::kind()`.

use thiserror::Error as ThisError;

#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
}

/// The categories of failure reported by this crate
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, ThisError)]
pub enum ErrorKind {
    /// The box side or cell spacing is non-positive, non-finite, or leaves
    /// fewer than 2 cells per side
    #[error("invalid grid (side = {side}, spacing = {spacing}): {reason}")]
    InvalidGrid {
        side: f64,
        spacing: f64,
        reason: &'static str,
    },
    /// The power spectrum produced a negative or non-finite value, or (for
    /// lognormal fields) implies a correlation function that reaches -1
    #[error("invalid power spectrum: {reason}")]
    InvalidSpectrum { reason: String },
    /// A density field has the wrong shape or holds an unusable value
    #[error("invalid density field: {reason}")]
    InvalidField { reason: String },
    /// A catalog without points was passed where points are required
    #[error("the {which} catalog has no points")]
    EmptyCatalog { which: &'static str },
    /// A problematic set of bin edges (or bin width) was specified
    #[error("problem with {who}: {what}")]
    InvalidBins { who: &'static str, what: String },
    /// Catalog positions that aren't shaped `(3, n_points)` or aren't finite
    #[error("invalid catalog: {reason}")]
    InvalidCatalog { reason: String },
    /// An unknown estimator name was specified
    #[error("{actual} is not an estimator name. Choices include: {choices:?}")]
    EstimatorName {
        actual: String,
        choices: Vec<&'static str>,
    },
    /// Normalized pair-count profiles that can't be combined
    #[error("inconsistent pair counts: {reason}")]
    PairCountMismatch { reason: String },
    /// Wraps a message from `clustering_nostd_internal` reporting a broken
    /// internal invariant (e.g. mismatched statepack shapes)
    #[error("internal error: {0}")]
    Internal(&'static str),
}

// define constructor methods for Error
impl Error {
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub(crate) fn invalid_grid(side: f64, spacing: f64, reason: &'static str) -> Self {
        Error {
            kind: ErrorKind::InvalidGrid {
                side,
                spacing,
                reason,
            },
        }
    }

    pub(crate) fn invalid_spectrum(reason: String) -> Self {
        Error {
            kind: ErrorKind::InvalidSpectrum { reason },
        }
    }

    pub(crate) fn invalid_field(reason: String) -> Self {
        Error {
            kind: ErrorKind::InvalidField { reason },
        }
    }

    pub(crate) fn empty_catalog(which: &'static str) -> Self {
        Error {
            kind: ErrorKind::EmptyCatalog { which },
        }
    }

    /// wraps a message from `clustering_nostd_internal` describing a
    /// problematic set of bin edges
    pub(crate) fn invalid_bins(who: &'static str, what: &str) -> Self {
        Error {
            kind: ErrorKind::InvalidBins {
                who,
                what: what.to_string(),
            },
        }
    }

    pub(crate) fn invalid_catalog(reason: String) -> Self {
        Error {
            kind: ErrorKind::InvalidCatalog { reason },
        }
    }

    pub(crate) fn estimator_name(actual: String, choices: Vec<&'static str>) -> Self {
        Error {
            kind: ErrorKind::EstimatorName { actual, choices },
        }
    }

    pub(crate) fn internal(what: &'static str) -> Self {
        Error {
            kind: ErrorKind::Internal(what),
        }
    }

    pub(crate) fn pair_count_mismatch(reason: String) -> Self {
        Error {
            kind: ErrorKind::PairCountMismatch { reason },
        }
    }
}

impl std::error::Error for Error {}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        self.kind.fmt(f)
    }
}
