// Generated sequences of a textured square moving over a flat background,
// for benchmarking without a dataset on disk.

use crate::all::*;

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

const BACKGROUND: u8 = 30;

pub struct SyntheticTexture {
  pub image: Image,
}

impl SyntheticTexture {
  pub fn new(seed: u64, width: usize, height: usize) -> SyntheticTexture {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    SyntheticTexture {
      image: Image::from_fn(width, height, |_, _| rng.gen_range(80..=255)),
    }
  }
}

#[derive(Clone, Debug)]
pub struct SyntheticOptions {
  pub frame_count: usize,
  pub frame_width: usize,
  pub frame_height: usize,
  pub target_size: usize,
  // Largest per-frame speed along each axis, in pixels.
  pub max_speed: f64,
}

impl Default for SyntheticOptions {
  fn default() -> SyntheticOptions {
    SyntheticOptions {
      frame_count: 50,
      frame_width: 160,
      frame_height: 120,
      target_size: 24,
      max_speed: 1.5,
    }
  }
}

pub fn synthetic_sequence(name: &str, seed: u64, options: &SyntheticOptions) -> Sequence {
  let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
  let texture = SyntheticTexture::new(rng.gen(), options.target_size, options.target_size);
  let size = options.target_size as f64;
  let max_x = (options.frame_width as f64 - size).max(0.);
  let max_y = (options.frame_height as f64 - size).max(0.);
  let mut position = Vector2d::new(rng.gen_range(0. ..= max_x), rng.gen_range(0. ..= max_y));
  let mut velocity = Vector2d::new(
    rng.gen_range(-options.max_speed ..= options.max_speed),
    rng.gen_range(-options.max_speed ..= options.max_speed),
  );

  let mut frames = Vec::with_capacity(options.frame_count);
  let mut groundtruth = Vec::with_capacity(options.frame_count);
  for _ in 0..options.frame_count {
    let corner = Vector2i::new(position[0].round() as i32, position[1].round() as i32);
    let mut frame = Image::new(options.frame_width, options.frame_height, BACKGROUND);
    frame.set_sub_image_i32(corner[0], corner[1], &texture.image);
    frames.push(frame);
    groundtruth.push(Region::new(corner[0] as f64, corner[1] as f64, size, size));

    // Bounce off the frame borders.
    position += velocity;
    for i in 0..2 {
      let max = if i == 0 { max_x } else { max_y };
      if position[i] < 0. || position[i] > max {
        velocity[i] = -velocity[i];
        position[i] = position[i].clamp(0., max);
      }
    }
  }
  Sequence::from_images(name, frames, groundtruth)
}

pub fn synthetic_dataset(sequence_count: usize, seed: u64, options: &SyntheticOptions) -> Result<Dataset> {
  let sequences = (0..sequence_count)
    .map(|i| synthetic_sequence(&format!("synthetic-{:02}", i + 1), seed + i as u64, options))
    .collect();
  Dataset::new(sequences)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_deterministic() {
    let options = SyntheticOptions { frame_count: 4, ..SyntheticOptions::default() };
    let a = synthetic_sequence("a", 3, &options);
    let b = synthetic_sequence("b", 3, &options);
    assert_eq!(a.groundtruth, b.groundtruth);
    assert_eq!(a.frame(3).unwrap(), b.frame(3).unwrap());
    assert_ne!(a.groundtruth, synthetic_sequence("c", 4, &options).groundtruth);
  }

  #[test]
  fn test_target_inside_frame() {
    let options = SyntheticOptions { frame_count: 200, max_speed: 4., ..SyntheticOptions::default() };
    let sequence = synthetic_sequence("s", 11, &options);
    assert_eq!(sequence.len(), 200);
    for region in &sequence.groundtruth {
      assert!(region.x >= 0. && region.right() <= options.frame_width as f64);
      assert!(region.y >= 0. && region.bottom() <= options.frame_height as f64);
    }
    let frame = sequence.frame(0).unwrap();
    let r = sequence.groundtruth[0];
    assert!(frame.value(r.x as usize, r.y as usize) >= 80);
  }

  #[test]
  fn test_dataset_names() {
    let options = SyntheticOptions { frame_count: 2, ..SyntheticOptions::default() };
    let dataset = synthetic_dataset(3, 0, &options).unwrap();
    let names: Vec<&str> = dataset.sequences.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["synthetic-01", "synthetic-02", "synthetic-03"]);
  }
}
