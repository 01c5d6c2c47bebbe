/// Computes the squared euclidean distance between two points
#[inline(always)]
pub fn squared_diff_norm(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    let dz = a[2] - b[2];
    dx * dx + dy * dy + dz * dz
}

/// The signed integer frequency of index `i` along an axis of length `n`,
/// following the output ordering of a discrete Fourier transform:
/// `0, 1, ..., ceil(n/2)-1, -floor(n/2), ..., -1`
#[inline]
pub fn signed_frequency(i: usize, n: usize) -> i64 {
    if i < n.div_ceil(2) {
        i as i64
    } else {
        i as i64 - n as i64
    }
}

/// The index along an axis of length `n` holding the frequency that is the
/// negative of the frequency at index `i`
#[inline]
pub fn conjugate_index(i: usize, n: usize) -> usize {
    (n - i) % n
}

/// Squared distance of the box `[lo, hi]` from `point` (zero if inside)
#[inline]
pub fn squared_distance_to_box(point: &[f64; 3], lo: &[f64; 3], hi: &[f64; 3]) -> f64 {
    let mut out = 0.0;
    for dim in 0..3 {
        let d = if point[dim] < lo[dim] {
            lo[dim] - point[dim]
        } else if point[dim] > hi[dim] {
            point[dim] - hi[dim]
        } else {
            0.0
        };
        out += d * d;
    }
    out
}
