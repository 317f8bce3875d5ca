use crate::all::*;

const ANALYSIS_DIRECTORY: &str = "analysis";
const ANALYSIS_FILE_NAME: &str = "results.json";

pub fn analysis_directory(workspace: &Path, tracker: &str, parameter_set: Option<&str>) -> PathBuf {
  let mut path = workspace.join(ANALYSIS_DIRECTORY).join(tracker);
  if let Some(parameter_set) = parameter_set {
    path = path.join(parameter_set);
  }
  path
}

fn format_option(value: Option<f64>, precision: usize) -> String {
  match value {
    Some(v) => format!("{:.*}", precision, v),
    None => "-".to_string(),
  }
}

pub fn format_table(result: &EvaluationResult) -> Vec<String> {
  let mut lines = vec![format!("{:<24}{:>10}{:>10}{:>10}", "Sequence", "Overlap", "Failures", "FPS")];
  for s in &result.sequences {
    lines.push(format!("{:<24}{:>10}{:>10}{:>10}",
      s.name,
      format_option(s.overlap, 3),
      s.failures,
      format_option(s.speed, 1),
    ));
  }
  lines.push(format!("{:<24}{:>10}{:>10}{:>10}",
    "Average",
    format_option(result.average_overlap, 3),
    result.total_failures,
    format_option(result.average_speed, 1),
  ));
  lines
}

pub fn print_report(result: &EvaluationResult) {
  match &result.parameter_set {
    Some(p) => info!("Results for tracker {} ({}):", result.tracker, p),
    None => info!("Results for tracker {}:", result.tracker),
  }
  for line in format_table(result) {
    info!("{}", line);
  }
}

pub fn export_result(workspace: &Path, result: &EvaluationResult) -> Result<PathBuf> {
  let directory = analysis_directory(workspace, &result.tracker, result.parameter_set.as_deref());
  std::fs::create_dir_all(&directory)
    .context(format!("Failed to create {}.", directory.display()))?;
  let path = directory.join(ANALYSIS_FILE_NAME);
  let s = serde_json::to_string_pretty(result)
    .context("Failed to serialize evaluation result.")?;
  std::fs::write(&path, s)
    .context(format!("Failed to write {}.", path.display()))?;
  info!("Wrote {}.", path.display());
  Ok(path)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn result() -> EvaluationResult {
    aggregate("Corr", Some("sigma_2"), Some(&TrackerParameters::default()), vec![
      SequenceScore {
        name: "ball".to_string(),
        overlap: Some(0.5),
        failures: 2,
        average_time: Some(0.01),
        average_init_time: Some(0.02),
        speed: Some(100.),
      },
      SequenceScore {
        name: "car".to_string(),
        overlap: None,
        failures: 1,
        average_time: None,
        average_init_time: None,
        speed: None,
      },
    ])
  }

  #[test]
  fn test_format_table() {
    let lines = format_table(&result());
    assert_eq!(lines.len(), 4);
    assert!(lines[1].starts_with("ball"));
    assert!(lines[1].contains("0.500"));
    assert!(lines[1].contains("100.0"));
    assert!(lines[2].contains(" -"));
    assert!(lines[3].starts_with("Average"));
    assert!(lines[3].contains("3"));
  }

  #[test]
  fn test_export() {
    let workspace = tempfile::tempdir().unwrap();
    let path = export_result(workspace.path(), &result()).unwrap();
    assert_eq!(path, workspace.path().join("analysis/Corr/sigma_2/results.json"));
    let s = std::fs::read_to_string(&path).unwrap();
    let read: EvaluationResult = serde_json::from_str(&s).unwrap();
    assert_eq!(read, result());
    let value: serde_json::Value = serde_json::from_str(&s).unwrap();
    assert!(value["sequences"][1]["overlap"].is_null());
  }
}
