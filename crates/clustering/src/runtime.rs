//! Runtime parameters that affect performance, but not results.

/// Controls how the binning loops (power-spectrum shells, pair counting and
/// Poisson sampling) are executed.
///
/// Every choice produces the same output. Integer pair counts are identical
/// bit for bit; binned power-spectrum means may differ in the last few bits
/// because floating point sums are merged in a different order.
///
/// The FFT lanes are always processed with rayon since each lane is
/// independent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RuntimeSpec {
    /// run everything on the calling thread
    Serial,
    /// distribute work over rayon's global thread pool
    #[default]
    Threaded,
}

impl RuntimeSpec {
    pub fn is_threaded(&self) -> bool {
        matches!(self, RuntimeSpec::Threaded)
    }
}
