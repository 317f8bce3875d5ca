use crate::all::*;

pub struct Patch {
  pub values: Matrixd,
  // True for pixels read from the image, false for border replication.
  pub mask: DMatrix<bool>,
}

impl Patch {
  pub fn valid_count(&self) -> usize {
    self.mask.iter().filter(|v| **v).count()
  }
}

// Cuts a `width` x `height` window centered at `center`. Parts outside the
// image replicate the nearest border pixel, so the patch geometry never
// depends on where the target is.
pub fn get_patch(image: &Image, center: Vector2d, width: usize, height: usize) -> Patch {
  assert!(!image.is_empty());
  let ax = (center[0] - width as f64 / 2.).floor() as i64;
  let ay = (center[1] - height as f64 / 2.).floor() as i64;
  let values = DMatrix::from_fn(height, width, |y, x| {
    image.value_clamped(ax + x as i64, ay + y as i64) as f64
  });
  let mask = DMatrix::from_fn(height, width, |y, x| {
    image.contains(ax + x as i64, ay + y as i64)
  });
  Patch { values, mask }
}

#[cfg(test)]
mod tests {
  use super::*;
  use nalgebra::dmatrix;

  fn ramp() -> Image {
    Image::from_fn(6, 5, |x, y| (10 * y + x) as u8)
  }

  #[test]
  fn test_inside() {
    let patch = get_patch(&ramp(), Vector2d::new(3.5, 2.5), 3, 3);
    let expected = dmatrix!(
      12., 13., 14.;
      22., 23., 24.;
      32., 33., 34.;
    );
    assert_eq!(patch.values, expected);
    assert_eq!(patch.valid_count(), 9);
  }

  #[test]
  fn test_replicated_border() {
    let patch = get_patch(&ramp(), Vector2d::new(0.5, 0.5), 3, 3);
    let expected = dmatrix!(
      0., 0., 1.;
      0., 0., 1.;
      10., 10., 11.;
    );
    assert_eq!(patch.values, expected);
    let mask = dmatrix!(
      false, false, false;
      false, true, true;
      false, true, true;
    );
    assert_eq!(patch.mask, mask);
    assert_eq!(patch.valid_count(), 4);
  }

  #[test]
  fn test_fully_outside() {
    let patch = get_patch(&ramp(), Vector2d::new(100., -100.), 2, 2);
    assert_eq!(patch.values, DMatrix::repeat(2, 2, 5.));
    assert_eq!(patch.valid_count(), 0);
  }
}
