// Decides when a tracker has lost its target. The tracker never reports this
// itself; the evaluation asks the policy after every tracked frame.

use crate::all::*;

pub trait FailurePolicy {
  fn is_failure(&self, predicted: &Region, groundtruth: &Region) -> bool;

  // Frames to leave out after a failure before re-initializing.
  fn skip_frames(&self) -> usize;
}

// Supervised VOT protocol: zero overlap with the ground truth is a failure.
#[derive(Clone, Debug)]
pub struct ReinitializeOnFailure {
  pub skip_frames: usize,
}

impl FailurePolicy for ReinitializeOnFailure {
  fn is_failure(&self, predicted: &Region, groundtruth: &Region) -> bool {
    // Frames without a usable annotation can't be judged.
    if !groundtruth.is_valid() { return false }
    !predicted.is_valid() || predicted.overlap(groundtruth) <= 0.
  }

  fn skip_frames(&self) -> usize {
    self.skip_frames
  }
}

// Accepts every prediction, the tracker runs through the sequence once.
#[derive(Clone, Debug)]
pub struct NeverFail;

impl FailurePolicy for NeverFail {
  fn is_failure(&self, _predicted: &Region, _groundtruth: &Region) -> bool {
    false
  }

  fn skip_frames(&self) -> usize {
    0
  }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[derive(clap::ArgEnum)]
pub enum FailurePolicyKind {
  Reinitialize,
  Never,
}
