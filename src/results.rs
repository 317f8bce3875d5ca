// On-disk store of raw tracking outputs, so that scoring can run separately
// from tracking. Layout:
//   <workspace>/results/<tracker>[/<parameter set>]/<sequence>/<sequence>_001.txt
// with `_time.txt` and `_init_time.txt` companions.

use crate::all::*;

const RESULTS_DIRECTORY: &str = "results";
// Index of the repetition, VOT runs stochastic trackers several times.
const REPETITION: usize = 1;

pub struct ResultsStore {
  root: PathBuf,
}

#[derive(Clone, Copy, Debug)]
pub struct ResultKey<'a> {
  pub tracker: &'a str,
  pub parameter_set: Option<&'a str>,
  pub sequence: &'a str,
}

impl<'a> ResultKey<'a> {
  pub fn new(tracker: &'a str, parameter_set: Option<&'a str>, sequence: &'a str) -> ResultKey<'a> {
    ResultKey { tracker, parameter_set, sequence }
  }
}

struct ResultPaths {
  regions: PathBuf,
  times: PathBuf,
  init_time: PathBuf,
}

impl ResultsStore {
  pub fn new(workspace: &Path) -> ResultsStore {
    ResultsStore {
      root: workspace.join(RESULTS_DIRECTORY),
    }
  }

  pub fn sequence_directory(&self, key: &ResultKey) -> PathBuf {
    let mut path = self.root.join(key.tracker);
    if let Some(parameter_set) = key.parameter_set {
      path = path.join(parameter_set);
    }
    path.join(key.sequence)
  }

  fn paths(&self, key: &ResultKey) -> ResultPaths {
    let directory = self.sequence_directory(key);
    let stem = format!("{}_{:03}", key.sequence, REPETITION);
    ResultPaths {
      regions: directory.join(format!("{}.txt", stem)),
      times: directory.join(format!("{}_time.txt", stem)),
      init_time: directory.join(format!("{}_init_time.txt", stem)),
    }
  }

  pub fn write(&self, key: &ResultKey, run: &SequenceRun) -> Result<()> {
    let directory = self.sequence_directory(key);
    std::fs::create_dir_all(&directory)
      .context(format!("Failed to create {}.", directory.display()))?;
    let paths = self.paths(key);
    write_lines(&paths.regions, run.outcomes.iter().map(|o| o.to_line()))?;
    write_lines(&paths.times, run.times.iter().map(|t| t.to_string()))?;
    if let Some(init_time) = run.init_time {
      write_lines(&paths.init_time, std::iter::once(init_time.to_string()))?;
    }
    debug!("Wrote {} frames to {}.", run.outcomes.len(), paths.regions.display());
    Ok(())
  }

  // Missing region or time files are not an error, the sequence just has no
  // results yet. A missing initialization time is recomputed from the frames.
  pub fn read(&self, key: &ResultKey) -> Result<Option<SequenceRun>> {
    let paths = self.paths(key);
    for path in [&paths.regions, &paths.times] {
      if !path.exists() {
        warn!("Results file does not exist ({}).", path.display());
        return Ok(None);
      }
    }
    let outcomes = read_lines(&paths.regions)?
      .iter()
      .enumerate()
      .map(|(i, line)| FrameOutcome::parse(line)
        .context(format!("{}:{}", paths.regions.display(), i + 1)))
      .collect::<Result<Vec<_>>>()?;
    let times = read_lines(&paths.times)?
      .iter()
      .map(|line| line.parse::<f64>()
        .context(format!("Failed to parse time `{}` in {}.", line, paths.times.display())))
      .collect::<Result<Vec<_>>>()?;
    if outcomes.len() != times.len() {
      bail!(
        "{} has {} frames but {} has {}.",
        paths.regions.display(), outcomes.len(), paths.times.display(), times.len(),
      );
    }
    let init_time = if paths.init_time.exists() {
      let lines = read_lines(&paths.init_time)?;
      let line = lines.first()
        .ok_or(anyhow!("{} is empty.", paths.init_time.display()))?;
      Some(line.parse::<f64>()
        .context(format!("Failed to parse initialization time in {}.", paths.init_time.display()))?)
    }
    else {
      average_init_time(&times, &outcomes)
    };
    Ok(Some(SequenceRun { outcomes, times, init_time }))
  }
}

fn write_lines<I: Iterator<Item = String>>(path: &Path, lines: I) -> Result<()> {
  let file = File::create(path)
    .context(format!("Failed to create {}.", path.display()))?;
  let mut writer = std::io::BufWriter::new(file);
  for line in lines {
    writeln!(writer, "{}", line)?;
  }
  writer.flush()?;
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn run() -> SequenceRun {
    SequenceRun {
      outcomes: vec![
        FrameOutcome::Initialized,
        FrameOutcome::Tracked(Region::new(1.5, 2., 10., 12.)),
        FrameOutcome::Lost,
        FrameOutcome::Skipped,
        FrameOutcome::Initialized,
      ],
      times: vec![0.5, 0.25, 0.125, 0., 0.75],
      init_time: Some(0.625),
    }
  }

  #[test]
  fn test_paths() {
    let store = ResultsStore::new(Path::new("/w"));
    let key = ResultKey::new("Corr", Some("sigma_2"), "ball");
    assert_eq!(
      store.paths(&key).regions,
      PathBuf::from("/w/results/Corr/sigma_2/ball/ball_001.txt"),
    );
    let key = ResultKey::new("Corr", None, "ball");
    assert_eq!(
      store.paths(&key).init_time,
      PathBuf::from("/w/results/Corr/ball/ball_001_init_time.txt"),
    );
  }

  #[test]
  fn test_write_read() {
    let workspace = tempfile::tempdir().unwrap();
    let store = ResultsStore::new(workspace.path());
    let key = ResultKey::new("Corr", None, "ball");
    assert!(store.read(&key).unwrap().is_none());

    store.write(&key, &run()).unwrap();
    let read = store.read(&key).unwrap().unwrap();
    assert_eq!(read.outcomes, run().outcomes);
    assert_eq!(read.times, run().times);
    assert_eq!(read.init_time, Some(0.625));

    // Falls back to the initialization frames.
    std::fs::remove_file(store.paths(&key).init_time).unwrap();
    assert_eq!(store.read(&key).unwrap().unwrap().init_time, Some(0.625));

    std::fs::remove_file(store.paths(&key).times).unwrap();
    assert!(store.read(&key).unwrap().is_none());
  }

  #[test]
  fn test_length_mismatch() {
    let workspace = tempfile::tempdir().unwrap();
    let store = ResultsStore::new(workspace.path());
    let key = ResultKey::new("Corr", None, "ball");
    let mut bad = run();
    bad.times.pop();
    store.write(&key, &bad).unwrap();
    assert!(store.read(&key).is_err());
  }
}
