// 2D discrete Fourier transform on column-major nalgebra matrices, done as
// 1D transforms along the columns and then along the rows.

use crate::all::*;

use rustfft::{Fft, FftPlanner};
use std::sync::Arc;

pub struct Fft2d {
  width: usize,
  height: usize,
  column_forward: Arc<dyn Fft<f64>>,
  column_inverse: Arc<dyn Fft<f64>>,
  row_forward: Arc<dyn Fft<f64>>,
  row_inverse: Arc<dyn Fft<f64>>,
  // Workspace.
  row: Vec<Complex64>,
}

impl Fft2d {
  pub fn new(width: usize, height: usize) -> Fft2d {
    let mut planner = FftPlanner::new();
    Fft2d {
      width,
      height,
      column_forward: planner.plan_fft_forward(height),
      column_inverse: planner.plan_fft_inverse(height),
      row_forward: planner.plan_fft_forward(width),
      row_inverse: planner.plan_fft_inverse(width),
      row: vec![Complex64::new(0., 0.); width],
    }
  }

  pub fn forward(&mut self, m: &Matrixd) -> Spectrum {
    assert_eq!((m.nrows(), m.ncols()), (self.height, self.width));
    let mut s = m.map(|v| Complex64::new(v, 0.));
    self.process(&mut s, false);
    s
  }

  // Real part of the inverse transform, normalized.
  pub fn inverse_real(&mut self, s: &Spectrum) -> Matrixd {
    let mut s = s.clone();
    self.process(&mut s, true);
    let scale = 1. / (self.width * self.height) as f64;
    s.map(|c| c.re * scale)
  }

  fn process(&mut self, s: &mut Spectrum, inverse: bool) {
    let (column_fft, row_fft) = if inverse {
      (&self.column_inverse, &self.row_inverse)
    }
    else {
      (&self.column_forward, &self.row_forward)
    };
    // Columns are contiguous in the storage.
    for column in s.as_mut_slice().chunks_exact_mut(self.height) {
      column_fft.process(column);
    }
    for y in 0..self.height {
      for x in 0..self.width {
        self.row[x] = s[(y, x)];
      }
      row_fft.process(&mut self.row);
      for x in 0..self.width {
        s[(y, x)] = self.row[x];
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_impulse() {
    let mut fft = Fft2d::new(4, 3);
    let mut m = Matrixd::zeros(3, 4);
    m[(0, 0)] = 1.;
    let s = fft.forward(&m);
    for c in s.iter() {
      assert!((c - Complex64::new(1., 0.)).norm() < 1e-12);
    }
  }

  #[test]
  fn test_constant() {
    let mut fft = Fft2d::new(5, 6);
    let s = fft.forward(&Matrixd::repeat(6, 5, 2.));
    assert!((s[(0, 0)] - Complex64::new(60., 0.)).norm() < 1e-9);
    for (i, c) in s.iter().enumerate() {
      if i == 0 { continue }
      assert!(c.norm() < 1e-9);
    }
  }

  #[test]
  fn test_inverse() {
    let mut fft = Fft2d::new(7, 4);
    let m = Matrixd::from_fn(4, 7, |y, x| (3 * y + x * x) as f64 - 5.);
    let s = fft.forward(&m);
    let back = fft.inverse_real(&s);
    assert!((back - m).amax() < 1e-9);
  }

  #[test]
  fn test_shift_is_phase() {
    // Circular shift by (dx, dy) multiplies the spectrum by a unit phase, so
    // magnitudes are unchanged.
    let mut fft = Fft2d::new(6, 5);
    let m = Matrixd::from_fn(5, 6, |y, x| ((y * 6 + x) % 7) as f64);
    let shifted = Matrixd::from_fn(5, 6, |y, x| m[((y + 3) % 5, (x + 4) % 6)]);
    let a = fft.forward(&m);
    let b = fft.forward(&shifted);
    for (ca, cb) in a.iter().zip(b.iter()) {
      assert!((ca.norm() - cb.norm()).abs() < 1e-9);
    }
  }
}
