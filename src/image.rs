use crate::all::*;

// Luma weights of ITU-R BT.601, the same as most video toolkits use for
// RGB to gray conversion.
const LUMA_R: f64 = 0.299;
const LUMA_G: f64 = 0.587;
const LUMA_B: f64 = 0.114;

// Row-major grayscale image storage.
// Could also have used nalgebra::DMatrix, but the tracker only ever reads
// pixels through patches which are converted to floats anyway.
#[derive(Clone, Debug, PartialEq)]
pub struct Image {
  pub data: Vec<u8>,
  pub width: usize,
  pub height: usize,
}

impl Image {
  pub fn new(width: usize, height: usize, value: u8) -> Image {
    Image {
      data: vec![value; width * height],
      width,
      height,
    }
  }

  pub fn from_fn<F: FnMut(usize, usize) -> u8>(width: usize, height: usize, mut f: F) -> Image {
    let mut data = Vec::with_capacity(width * height);
    for y in 0..height {
      for x in 0..width {
        data.push(f(x, y));
      }
    }
    Image { data, width, height }
  }

  // Decodes a frame from disk and converts it to gray.
  pub fn load(path: &Path) -> Result<Image> {
    let decoded = ::image::open(path)
      .context(format!("Failed to decode frame {}.", path.display()))?;
    Ok(Image::from_dynamic(&decoded))
  }

  pub fn from_dynamic(decoded: &::image::DynamicImage) -> Image {
    let rgb = decoded.to_rgb8();
    let (width, height) = rgb.dimensions();
    let data = rgb.pixels()
      .map(|p| {
        let v = LUMA_R * p[0] as f64 + LUMA_G * p[1] as f64 + LUMA_B * p[2] as f64;
        v.round().clamp(0., 255.) as u8
      })
      .collect();
    Image {
      data,
      width: width as usize,
      height: height as usize,
    }
  }

  pub fn is_empty(&self) -> bool {
    self.width == 0 || self.height == 0
  }

  #[inline(always)]
  pub fn value(&self, x: usize, y: usize) -> u8 {
    self.data[y * self.width + x]
  }

  // Coordinates outside the image read the nearest border pixel.
  #[inline(always)]
  pub fn value_clamped(&self, x: i64, y: i64) -> u8 {
    let x = x.clamp(0, self.width as i64 - 1) as usize;
    let y = y.clamp(0, self.height as i64 - 1) as usize;
    self.value(x, y)
  }

  #[inline(always)]
  pub fn contains(&self, x: i64, y: i64) -> bool {
    x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
  }

  #[inline(always)]
  pub fn set_value(&mut self, x: usize, y: usize, value: u8) {
    self.data[y * self.width + x] = value;
  }

  // Copies `image` with its top-left corner at (ax, ay), dropping pixels that
  // fall outside.
  pub fn set_sub_image_i32(&mut self, ax: i32, ay: i32, image: &Image) {
    for y in 0..image.height {
      for x in 0..image.width {
        let tx = ax as i64 + x as i64;
        let ty = ay as i64 + y as i64;
        if !self.contains(tx, ty) { continue }
        self.set_value(tx as usize, ty as usize, image.value(x, y));
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_gray_conversion() {
    let mut rgb = ::image::RgbImage::new(2, 1);
    rgb.put_pixel(0, 0, ::image::Rgb([255, 255, 255]));
    rgb.put_pixel(1, 0, ::image::Rgb([255, 0, 0]));
    let image = Image::from_dynamic(&::image::DynamicImage::ImageRgb8(rgb));
    assert_eq!(image.width, 2);
    assert_eq!(image.height, 1);
    assert_eq!(image.data, vec![255, 76]);
  }

  #[test]
  fn test_clamped_access() {
    let image = Image::from_fn(3, 2, |x, y| (10 * y + x) as u8);
    assert_eq!(image.value(2, 1), 12);
    assert_eq!(image.value_clamped(-5, -5), 0);
    assert_eq!(image.value_clamped(7, 0), 2);
    assert_eq!(image.value_clamped(1, 9), 11);
    assert!(image.contains(2, 1));
    assert!(!image.contains(3, 1));
  }

  #[test]
  fn test_set_sub_image() {
    let mut image = Image::new(4, 4, 0);
    image.set_sub_image_i32(-1, 2, &Image::new(3, 3, 9));
    assert_eq!(image.data, vec![
      0, 0, 0, 0,
      0, 0, 0, 0,
      9, 9, 0, 0,
      9, 9, 0, 0,
    ]);
  }
}
