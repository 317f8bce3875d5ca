// Evaluates the correlation filter for several values of one parameter, each
// stored under its own parameter set.

use crate::all::*;

#[derive(Clone, Copy, Debug, PartialEq)]
#[derive(clap::ArgEnum)]
pub enum SweepParameter {
  EnlargeFactor,
  GaussianSigma,
  FilterLambda,
  UpdateFactor,
}

impl SweepParameter {
  pub fn name(&self) -> &'static str {
    match self {
      SweepParameter::EnlargeFactor => "enlarge_factor",
      SweepParameter::GaussianSigma => "gaussian_sigma",
      SweepParameter::FilterLambda => "filter_lambda",
      SweepParameter::UpdateFactor => "update_factor",
    }
  }

  pub fn parameter_set(&self, value: f64) -> String {
    format!("{}_{}", self.name(), value)
  }
}

pub struct SweepRow {
  pub value: f64,
  pub result: EvaluationResult,
}

pub fn sweep(
  workspace: &Path,
  dataset: &Dataset,
  base: &TrackerParameters,
  parameter: SweepParameter,
  values: &[f64],
  policy: &dyn FailurePolicy,
) -> Result<Vec<SweepRow>> {
  let store = ResultsStore::new(workspace);
  let mut rows = vec![];
  for value in values {
    let parameters = base.with(parameter, *value);
    let parameter_set = parameter.parameter_set(*value);
    info!("Evaluating {}.", parameter_set);
    let mut tracker = CorrelationFilterTracker::new(parameters.clone())?;
    run_dataset(&mut tracker, dataset, policy, &store, Some(&parameter_set))?;
    let result = evaluate_dataset(tracker.name(), dataset, &store, Some(&parameter_set), Some(&parameters))?;
    export_result(workspace, &result)?;
    rows.push(SweepRow { value: *value, result });
  }
  Ok(rows)
}

pub fn format_sweep(parameter: SweepParameter, rows: &[SweepRow]) -> Vec<String> {
  let mut lines = vec![format!("{:<16}{:>10}{:>10}{:>10}", parameter.name(), "Overlap", "Failures", "FPS")];
  for row in rows {
    let r = &row.result;
    lines.push(format!("{:<16}{:>10}{:>10}{:>10}",
      row.value,
      r.average_overlap.map(|v| format!("{:.2}", v)).unwrap_or("-".to_string()),
      r.total_failures,
      r.average_speed.map(|v| format!("{:.0}", v)).unwrap_or("-".to_string()),
    ));
  }
  lines
}
