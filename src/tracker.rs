use crate::all::*;

#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
  #[error("Invalid initialization region {region} for a {width}x{height} frame.")]
  InvalidRegion { region: Region, width: usize, height: usize },
  #[error("Tracker must be initialized before tracking.")]
  NotInitialized,
  #[error("Invalid value {value} for parameter {name}.")]
  InvalidParameter { name: String, value: f64 },
}

// Single-target tracker driven one frame at a time by the evaluation.
pub trait Tracker {
  fn name(&self) -> &str;

  // (Re)starts tracking the target in `region`, discarding any earlier state.
  fn initialize(&mut self, image: &Image, region: &Region) -> Result<()>;

  fn track(&mut self, image: &Image) -> Result<Region>;
}
