// Fixed templates of the correlation filter. Matrices are indexed (y, x),
// so `height` is the number of rows.

use crate::all::*;

fn hann(n: usize) -> Vec<f64> {
  if n == 1 { return vec![1.] }
  let pi2 = 2. * std::f64::consts::PI;
  (0..n).map(|i| 0.5 * (1. - (pi2 * i as f64 / (n - 1) as f64).cos())).collect()
}

// Outer product of two raised-cosine windows, 0 at the borders and 1 in the middle.
pub fn create_smoothing_window(width: usize, height: usize) -> Matrixd {
  let wx = hann(width);
  let wy = hann(height);
  DMatrix::from_fn(height, width, |y, x| wy[y] * wx[x])
}

// Signed distance of index `i` from the origin of a periodic axis of length `n`.
// Indices past the midpoint wrap around to negative values.
#[inline(always)]
pub fn wrapped_offset(i: usize, n: usize) -> i64 {
  if i as f64 > n as f64 / 2. { i as i64 - n as i64 } else { i as i64 }
}

// Gaussian with its peak of 1 at index (0, 0), wrapped around the borders.
// The periodic layout is what the filter learns to reproduce, so the peak
// location of a correlation response is read back with `wrapped_offset`.
pub fn create_ideal_response(width: usize, height: usize, sigma: f64) -> Matrixd {
  let s = 2. * sigma * sigma;
  DMatrix::from_fn(height, width, |y, x| {
    let dx = wrapped_offset(x, width) as f64;
    let dy = wrapped_offset(y, height) as f64;
    (-(dx * dx + dy * dy) / s).exp()
  })
}
