use crate::all::*;

// Axis-aligned bounding box in pixel coordinates, (x, y) is the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Region {
  pub x: f64,
  pub y: f64,
  pub width: f64,
  pub height: f64,
}

impl Region {
  pub fn new(x: f64, y: f64, width: f64, height: f64) -> Region {
    Region { x, y, width, height }
  }

  pub fn from_center(center: Vector2d, width: f64, height: f64) -> Region {
    Region::new(center[0] - width / 2., center[1] - height / 2., width, height)
  }

  // Bounding rectangle of a polygon given as x0,y0,x1,y1,... The size is
  // inclusive of the last pixel, matching the annotation convention.
  pub fn from_polygon(points: &[f64]) -> Result<Region> {
    if points.len() < 6 || points.len() % 2 != 0 {
      bail!("Polygon needs an even number of at least 6 coordinates, got {}.", points.len());
    }
    let mut min = Vector2d::repeat(f64::INFINITY);
    let mut max = Vector2d::repeat(f64::NEG_INFINITY);
    for p in points.chunks_exact(2) {
      for i in 0..2 {
        min[i] = min[i].min(p[i]);
        max[i] = max[i].max(p[i]);
      }
    }
    Ok(Region::new(min[0], min[1], max[0] - min[0] + 1., max[1] - min[1] + 1.))
  }

  // Parses either `x,y,w,h` or an 8-value polygon.
  pub fn from_values(values: &[f64]) -> Result<Region> {
    match values.len() {
      4 => Ok(Region::new(values[0], values[1], values[2], values[3])),
      8 => Region::from_polygon(values),
      n => bail!("Expected 4 or 8 region values, got {}.", n),
    }
  }

  // Corners clockwise from the top-left, inverse of `from_polygon`.
  #[cfg(test)]
  pub fn to_polygon(&self) -> [f64; 8] {
    let right = self.x + self.width - 1.;
    let bottom = self.y + self.height - 1.;
    [self.x, self.y, right, self.y, right, bottom, self.x, bottom]
  }

  pub fn center(&self) -> Vector2d {
    Vector2d::new(self.x + self.width / 2., self.y + self.height / 2.)
  }

  pub fn right(&self) -> f64 {
    self.x + self.width
  }

  pub fn bottom(&self) -> f64 {
    self.y + self.height
  }

  pub fn area(&self) -> f64 {
    self.width.max(0.) * self.height.max(0.)
  }

  pub fn is_valid(&self) -> bool {
    [self.x, self.y, self.width, self.height].iter().all(|v| v.is_finite())
      && self.width > 0.
      && self.height > 0.
  }

  // True if any part of the region lies inside a `width` x `height` image.
  pub fn intersects_image(&self, width: usize, height: usize) -> bool {
    self.right() > 0.
      && self.bottom() > 0.
      && self.x < width as f64
      && self.y < height as f64
  }

  // Jaccard index of the two rectangles.
  pub fn overlap(&self, other: &Region) -> f64 {
    let left = self.x.max(other.x);
    let top = self.y.max(other.y);
    let right = self.right().min(other.right());
    let bottom = self.bottom().min(other.bottom());
    let intersection = (right - left).max(0.) * (bottom - top).max(0.);
    let union = self.area() + other.area() - intersection;
    if union <= 0. { return 0. }
    intersection / union
  }
}

impl fmt::Display for Region {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{:.4},{:.4},{:.4},{:.4}", self.x, self.y, self.width, self.height)
  }
}

// Per-frame output of a tracking run. The numeric codes are the ones used in
// VOT result files.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FrameOutcome {
  Initialized,
  Tracked(Region),
  Lost,
  Skipped,
}

const CODE_INITIALIZED: u8 = 1;
const CODE_LOST: u8 = 2;
const CODE_SKIPPED: u8 = 0;

impl FrameOutcome {
  pub fn region(&self) -> Option<&Region> {
    match self {
      FrameOutcome::Tracked(region) => Some(region),
      _ => None,
    }
  }

  pub fn to_line(&self) -> String {
    match self {
      FrameOutcome::Initialized => CODE_INITIALIZED.to_string(),
      FrameOutcome::Tracked(region) => region.to_string(),
      FrameOutcome::Lost => CODE_LOST.to_string(),
      FrameOutcome::Skipped => CODE_SKIPPED.to_string(),
    }
  }

  pub fn parse(line: &str) -> Result<FrameOutcome> {
    let values = line.trim()
      .split(',')
      .map(|s| s.trim().parse::<f64>())
      .collect::<std::result::Result<Vec<_>, _>>()
      .context(format!("Failed to parse region line `{}`.", line.trim()))?;
    if values.len() == 1 {
      if values[0].fract() != 0. || values[0] < 0. || values[0] > 255. {
        bail!("Invalid frame code {}.", values[0]);
      }
      return match values[0] as u8 {
        CODE_INITIALIZED => Ok(FrameOutcome::Initialized),
        CODE_LOST => Ok(FrameOutcome::Lost),
        CODE_SKIPPED => Ok(FrameOutcome::Skipped),
        _ => bail!("Unknown frame code {}.", values[0]),
      };
    }
    Ok(FrameOutcome::Tracked(Region::from_values(&values)?))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_overlap() {
    let a = Region::new(10., 20., 30., 40.);
    assert_eq!(a.overlap(&a), 1.);
    assert_eq!(a.overlap(&Region::new(100., 20., 30., 40.)), 0.);
    // Touching edges have zero intersection area.
    assert_eq!(a.overlap(&Region::new(40., 20., 30., 40.)), 0.);
    let b = Region::new(25., 20., 30., 40.);
    assert!((a.overlap(&b) - 1. / 3.).abs() < 1e-12);
    assert_eq!(a.overlap(&b), b.overlap(&a));
    assert_eq!(a.overlap(&Region::new(0., 0., 0., 0.)), 0.);
  }

  #[test]
  fn test_polygon_round_trip() {
    let region = Region::new(12., 7., 31., 18.);
    assert_eq!(Region::from_polygon(&region.to_polygon()).unwrap(), region);

    let rotated = [5., 0., 10., 5., 5., 10., 0., 5.];
    assert_eq!(Region::from_polygon(&rotated).unwrap(), Region::new(0., 0., 11., 11.));
    assert!(Region::from_polygon(&[1., 2., 3.]).is_err());
  }

  #[test]
  fn test_validity() {
    assert!(Region::new(0., 0., 1., 1.).is_valid());
    assert!(!Region::new(0., 0., 0., 1.).is_valid());
    assert!(!Region::new(0., 0., 5., -1.).is_valid());
    assert!(!Region::new(f64::NAN, 0., 5., 5.).is_valid());

    let r = Region::new(-10., -10., 10., 10.);
    assert!(!r.intersects_image(100, 100));
    assert!(Region::new(-10., -10., 11., 11.).intersects_image(100, 100));
    assert!(!Region::new(100., 0., 5., 5.).intersects_image(100, 100));
  }

  #[test]
  fn test_frame_outcome_lines() {
    assert_eq!(FrameOutcome::parse("1").unwrap(), FrameOutcome::Initialized);
    assert_eq!(FrameOutcome::parse("2\n").unwrap(), FrameOutcome::Lost);
    assert_eq!(FrameOutcome::parse("0").unwrap(), FrameOutcome::Skipped);
    assert_eq!(
      FrameOutcome::parse("1.5,2,30,40").unwrap(),
      FrameOutcome::Tracked(Region::new(1.5, 2., 30., 40.)),
    );
    assert_eq!(
      FrameOutcome::parse("0,0,9,0,9,9,0,9").unwrap(),
      FrameOutcome::Tracked(Region::new(0., 0., 10., 10.)),
    );
    assert!(FrameOutcome::parse("7").is_err());
    assert!(FrameOutcome::parse("a,b").is_err());
    assert_eq!(FrameOutcome::Tracked(Region::new(1., 2., 3., 4.5)).to_line(), "1.0000,2.0000,3.0000,4.5000");
  }
}
