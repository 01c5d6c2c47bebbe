//! Two-point correlation function estimators built from normalized pair
//! counts.

use crate::catalog::Catalog;
use crate::error::Error;
use crate::pair_count::{PairCounts, count_pairs_with};
use crate::runtime::RuntimeSpec;
use std::str::FromStr;

/// The estimator used to combine the data-data (`DD`), data-random (`DR`) and
/// random-random (`RR`) pair counts into `ξ(r)`.
///
/// All formulas act on normalized counts: `DD/(N_D(N_D-1)/2)`,
/// `RR/(N_R(N_R-1)/2)` and `DR/(N_D·N_R)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Estimator {
    /// `(DD - 2DR + RR) / RR`
    #[default]
    LandySzalay,
    /// `DD·RR / DR² - 1`
    Hamilton,
    /// `DD / RR - 1`
    PeeblesHauser,
    /// `DD / DR - 1`
    DavisPeebles,
    /// `(DD - DR) / DR`
    Hewett,
}

impl Estimator {
    pub const ALL: [Estimator; 5] = [
        Estimator::LandySzalay,
        Estimator::Hamilton,
        Estimator::PeeblesHauser,
        Estimator::DavisPeebles,
        Estimator::Hewett,
    ];

    /// the short code of the estimator
    pub fn code(&self) -> &'static str {
        match self {
            Estimator::LandySzalay => "LS",
            Estimator::Hamilton => "Hm",
            Estimator::PeeblesHauser => "PH",
            Estimator::DavisPeebles => "DP",
            Estimator::Hewett => "Hw",
        }
    }

    /// whether the estimator needs data-random counts
    pub fn requires_cross_counts(&self) -> bool {
        !matches!(self, Estimator::PeeblesHauser)
    }

    /// Evaluate the estimator for a single bin.
    ///
    /// Returns `NaN` when `rr` is zero (the bin has no random support) or
    /// when a formula would divide by a zero `dr`.
    pub fn evaluate(&self, dd: f64, dr: f64, rr: f64) -> f64 {
        if rr == 0.0 {
            return f64::NAN;
        }
        let divide = |num: f64, den: f64| if den == 0.0 { f64::NAN } else { num / den };
        match self {
            Estimator::LandySzalay => (dd - 2.0 * dr + rr) / rr,
            Estimator::Hamilton => divide(dd * rr, dr * dr) - 1.0,
            Estimator::PeeblesHauser => dd / rr - 1.0,
            Estimator::DavisPeebles => divide(dd, dr) - 1.0,
            Estimator::Hewett => divide(dd - dr, dr),
        }
    }
}

impl FromStr for Estimator {
    type Err = Error;

    /// Accepts the short codes (e.g. `"LS"`) and the variant names (e.g.
    /// `"LandySzalay"`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LS" | "LandySzalay" => Ok(Estimator::LandySzalay),
            "Hm" | "Hamilton" => Ok(Estimator::Hamilton),
            "PH" | "PeeblesHauser" => Ok(Estimator::PeeblesHauser),
            "DP" | "DavisPeebles" => Ok(Estimator::DavisPeebles),
            "Hw" | "Hewett" => Ok(Estimator::Hewett),
            _ => Err(Error::estimator_name(
                s.to_string(),
                Estimator::ALL.iter().map(Estimator::code).collect(),
            )),
        }
    }
}

/// Combine normalized pair-count profiles bin by bin.
///
/// `dr` may be omitted for estimators that don't use it.
///
/// # Errors
/// [`ErrorKind::PairCountMismatch`](crate::ErrorKind::PairCountMismatch) if
/// the profiles have different lengths or if `dr` is needed but missing.
pub fn combine_counts(
    estimator: Estimator,
    dd: &[f64],
    dr: Option<&[f64]>,
    rr: &[f64],
) -> Result<Vec<f64>, Error> {
    if dd.len() != rr.len() {
        return Err(Error::pair_count_mismatch(format!(
            "DD has {} bins, but RR has {}",
            dd.len(),
            rr.len()
        )));
    }
    match dr {
        Some(dr) if dr.len() != dd.len() => Err(Error::pair_count_mismatch(format!(
            "DD has {} bins, but DR has {}",
            dd.len(),
            dr.len()
        ))),
        Some(dr) => Ok((0..dd.len())
            .map(|i| estimator.evaluate(dd[i], dr[i], rr[i]))
            .collect()),
        None if estimator.requires_cross_counts() => Err(Error::pair_count_mismatch(format!(
            "the {estimator:?} estimator requires DR counts"
        ))),
        None => Ok((0..dd.len())
            .map(|i| estimator.evaluate(dd[i], f64::NAN, rr[i]))
            .collect()),
    }
}

/// The result of [`estimate_correlation`]
#[derive(Clone, Debug, PartialEq)]
pub struct CorrelationEstimate {
    pub estimator: Estimator,
    pub r_edges: Vec<f64>,
    pub r_centers: Vec<f64>,
    pub xi: Vec<f64>,
    pub dd: PairCounts,
    /// only computed for estimators that need it
    pub dr: Option<PairCounts>,
    pub rr: PairCounts,
}

impl CorrelationEstimate {
    /// The Poisson (shot-noise) error `(1 + ξ) / sqrt(DD)` of each bin, using
    /// the raw data-data counts (`inf` for bins without data pairs)
    pub fn poisson_error(&self) -> Vec<f64> {
        self.xi
            .iter()
            .zip(self.dd.counts())
            .map(|(xi, &dd)| (1.0 + xi) / (dd as f64).sqrt())
            .collect()
    }
}

/// Estimate the two-point correlation function of `data` using the
/// unclustered `random` catalog covering the same volume.
pub fn estimate_correlation(
    data: &Catalog,
    random: &Catalog,
    r_edges: &[f64],
    estimator: Estimator,
) -> Result<CorrelationEstimate, Error> {
    estimate_correlation_with(data, random, r_edges, estimator, &RuntimeSpec::default())
}

pub fn estimate_correlation_with(
    data: &Catalog,
    random: &Catalog,
    r_edges: &[f64],
    estimator: Estimator,
    runtime: &RuntimeSpec,
) -> Result<CorrelationEstimate, Error> {
    if data.is_empty() {
        return Err(Error::empty_catalog("data"));
    } else if random.is_empty() {
        return Err(Error::empty_catalog("random"));
    }
    let dd = count_pairs_with(data, r_edges, None, runtime)?;
    let rr = count_pairs_with(random, r_edges, None, runtime)?;
    let dr = if estimator.requires_cross_counts() {
        Some(count_pairs_with(data, r_edges, Some(random), runtime)?)
    } else {
        None
    };

    let dr_normalized = dr.as_ref().map(PairCounts::normalized);
    let xi = combine_counts(
        estimator,
        &dd.normalized(),
        dr_normalized.as_deref(),
        &rr.normalized(),
    )?;
    log::debug!(
        "estimated ξ with {:?} from {} data and {} random points",
        estimator,
        data.len(),
        random.len()
    );
    Ok(CorrelationEstimate {
        estimator,
        r_edges: r_edges.to_vec(),
        r_centers: dd.bin_centers(),
        xi,
        dd,
        dr,
        rr,
    })
}
