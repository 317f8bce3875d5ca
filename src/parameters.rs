use crate::all::*;

// Tunables of the correlation filter tracker. Immutable once a tracker is
// built; every tracker instance gets its own copy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[derive(clap::Args)]
pub struct TrackerParameters {
  /// Search window side relative to the larger side of the target.
  #[clap(long, default_value = "1.1")]
  pub enlarge_factor: f64,

  /// Standard deviation of the ideal response peak, in pixels.
  #[clap(long, default_value = "2")]
  pub gaussian_sigma: f64,

  /// Regularization of the filter denominator.
  #[clap(long, default_value = "1")]
  pub filter_lambda: f64,

  /// Weight of the newest frame in the running filter average.
  #[clap(long, default_value = "0.1")]
  pub update_factor: f64,
}

impl Default for TrackerParameters {
  fn default() -> TrackerParameters {
    TrackerParameters {
      enlarge_factor: 1.1,
      gaussian_sigma: 2.,
      filter_lambda: 1.,
      update_factor: 0.1,
    }
  }
}

impl TrackerParameters {
  pub fn validate(&self) -> std::result::Result<(), TrackerError> {
    let invalid = |name: &str, value: f64| TrackerError::InvalidParameter {
      name: name.to_string(),
      value,
    };
    if !(self.enlarge_factor > 0.) { return Err(invalid("enlarge_factor", self.enlarge_factor)) }
    if !(self.gaussian_sigma > 0.) { return Err(invalid("gaussian_sigma", self.gaussian_sigma)) }
    if !(self.filter_lambda > 0.) { return Err(invalid("filter_lambda", self.filter_lambda)) }
    if !(0. ..= 1.).contains(&self.update_factor) {
      return Err(invalid("update_factor", self.update_factor));
    }
    Ok(())
  }

  // Copy with one parameter replaced, used by parameter sweeps.
  pub fn with(&self, parameter: SweepParameter, value: f64) -> TrackerParameters {
    let mut p = self.clone();
    match parameter {
      SweepParameter::EnlargeFactor => p.enlarge_factor = value,
      SweepParameter::GaussianSigma => p.gaussian_sigma = value,
      SweepParameter::FilterLambda => p.filter_lambda = value,
      SweepParameter::UpdateFactor => p.update_factor = value,
    }
    p
  }
}

// Options of the evaluation protocol shared by the subcommands.
#[derive(Clone, Debug)]
#[derive(clap::Args)]
pub struct ProtocolParameters {
  /// Results are stored under this name below the tracker's directory.
  #[clap(long)]
  pub parameter_set: Option<String>,

  #[clap(long, arg_enum, default_value = "reinitialize")]
  pub failure_policy: FailurePolicyKind,

  /// Frames left out after a failure before the tracker is re-initialized.
  #[clap(long, default_value = "5")]
  pub skip_frames: usize,
}

impl ProtocolParameters {
  pub fn policy(&self) -> Box<dyn FailurePolicy> {
    match self.failure_policy {
      FailurePolicyKind::Reinitialize => Box::new(ReinitializeOnFailure { skip_frames: self.skip_frames }),
      FailurePolicyKind::Never => Box::new(NeverFail),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_validate() {
    assert!(TrackerParameters::default().validate().is_ok());
    let p = TrackerParameters::default();
    assert!(p.with(SweepParameter::UpdateFactor, 1.).validate().is_ok());
    assert!(p.with(SweepParameter::UpdateFactor, 0.).validate().is_ok());
    assert!(p.with(SweepParameter::UpdateFactor, 1.5).validate().is_err());
    assert!(p.with(SweepParameter::FilterLambda, 0.).validate().is_err());
    assert!(p.with(SweepParameter::GaussianSigma, -1.).validate().is_err());
    assert!(p.with(SweepParameter::EnlargeFactor, f64::NAN).validate().is_err());
  }

  #[test]
  fn test_with() {
    let p = TrackerParameters::default().with(SweepParameter::EnlargeFactor, 2.);
    assert_eq!(p.enlarge_factor, 2.);
    assert_eq!(p.gaussian_sigma, 2.);
  }
}
