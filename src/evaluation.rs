// Runs trackers over sequences and scores the stored outputs against the
// ground truth. Tracking and scoring are separate passes that only share
// the results store.

use crate::all::*;

// Raw output of one tracker on one sequence.
#[derive(Clone, Debug, PartialEq)]
pub struct SequenceRun {
  pub outcomes: Vec<FrameOutcome>,
  // Seconds spent on each frame, zero for skipped frames.
  pub times: Vec<f64>,
  pub init_time: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SequenceScore {
  pub name: String,
  // Mean overlap of valid frames, `None` if there are none.
  pub overlap: Option<f64>,
  pub failures: usize,
  pub average_time: Option<f64>,
  pub average_init_time: Option<f64>,
  // Frames per second.
  pub speed: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
  pub tracker: String,
  pub parameter_set: Option<String>,
  pub parameters: Option<TrackerParameters>,
  pub sequences: Vec<SequenceScore>,
  pub average_overlap: Option<f64>,
  pub total_failures: usize,
  pub average_speed: Option<f64>,
}

// Tracks the whole sequence, re-initializing from the ground truth after
// every failure the policy reports.
pub fn run_sequence(
  tracker: &mut dyn Tracker,
  sequence: &Sequence,
  policy: &dyn FailurePolicy,
) -> Result<SequenceRun> {
  let n = sequence.len();
  let mut outcomes = Vec::with_capacity(n);
  let mut times = Vec::with_capacity(n);
  let mut frame = 0;
  while frame < n {
    let image = sequence.frame(frame)?;
    let t = Instant::now();
    match tracker.initialize(&image, &sequence.groundtruth[frame]) {
      Ok(()) => {},
      // Only the first frame's annotation is required, later re-initializations
      // move on to the next usable one.
      Err(err) if frame > 0 && is_invalid_region(&err) => {
        debug!("{}: cannot re-initialize on frame {}: {}", sequence.name, frame, err);
        outcomes.push(FrameOutcome::Skipped);
        times.push(0.);
        frame += 1;
        continue;
      },
      Err(err) => {
        return Err(err.context(format!("Initialization failed on frame {} of {}.", frame, sequence.name)));
      },
    }
    times.push(t.elapsed().as_secs_f64());
    outcomes.push(FrameOutcome::Initialized);
    frame += 1;

    while frame < n {
      let image = sequence.frame(frame)?;
      let t = Instant::now();
      let region = tracker.track(&image)?;
      times.push(t.elapsed().as_secs_f64());

      if policy.is_failure(&region, &sequence.groundtruth[frame]) {
        debug!("{}: failure on frame {}.", sequence.name, frame);
        outcomes.push(FrameOutcome::Lost);
        frame += 1;
        let skip = policy.skip_frames().min(n - frame);
        for _ in 0..skip {
          outcomes.push(FrameOutcome::Skipped);
          times.push(0.);
        }
        frame += skip;
        break;
      }
      outcomes.push(FrameOutcome::Tracked(region));
      frame += 1;
    }
  }
  let init_time = average_init_time(&times, &outcomes);
  Ok(SequenceRun { outcomes, times, init_time })
}

// Per-frame overlap with the ground truth. Frames without a tracked region
// or without a valid annotation are marked invalid and have overlap 0.
pub fn compute_overlap(outcomes: &[FrameOutcome], groundtruth: &[Region]) -> Result<(Vec<f64>, Vec<bool>)> {
  if outcomes.len() != groundtruth.len() {
    bail!("Trajectory has {} frames but ground truth has {}.", outcomes.len(), groundtruth.len());
  }
  Ok(outcomes.iter()
    .zip(groundtruth)
    .map(|(outcome, gt)| match outcome.region() {
      Some(region) if gt.is_valid() => (region.overlap(gt), true),
      _ => (0., false),
    })
    .unzip())
}

pub fn count_failures(outcomes: &[FrameOutcome]) -> usize {
  outcomes.iter().filter(|o| **o == FrameOutcome::Lost).count()
}

// Mean time of tracked frames.
pub fn average_time(times: &[f64], outcomes: &[FrameOutcome]) -> Option<f64> {
  mean(times.iter()
    .zip(outcomes)
    .filter(|(_, o)| matches!(o, FrameOutcome::Tracked(_)))
    .map(|(t, _)| *t))
}

// Mean time of initialization frames.
pub fn average_init_time(times: &[f64], outcomes: &[FrameOutcome]) -> Option<f64> {
  mean(times.iter()
    .zip(outcomes)
    .filter(|(_, o)| **o == FrameOutcome::Initialized)
    .map(|(t, _)| *t))
}

pub fn score_sequence(sequence: &Sequence, run: &SequenceRun) -> Result<SequenceScore> {
  let (overlaps, valid) = compute_overlap(&run.outcomes, &sequence.groundtruth)?;
  let valid_count = valid.iter().filter(|v| **v).count();
  let overlap = if valid_count == 0 {
    warn!("Sequence {} has no valid frames, overlap is undefined.", sequence.name);
    None
  }
  else {
    Some(overlaps.iter().sum::<f64>() / valid_count as f64)
  };
  let average_time = average_time(&run.times, &run.outcomes);
  Ok(SequenceScore {
    name: sequence.name.clone(),
    overlap,
    failures: count_failures(&run.outcomes),
    average_time,
    average_init_time: run.init_time,
    speed: average_time.filter(|t| *t > 0.).map(|t| 1. / t),
  })
}

// Dataset-wide means over the sequences where each measure is defined.
pub fn aggregate(
  tracker: &str,
  parameter_set: Option<&str>,
  parameters: Option<&TrackerParameters>,
  sequences: Vec<SequenceScore>,
) -> EvaluationResult {
  EvaluationResult {
    tracker: tracker.to_string(),
    parameter_set: parameter_set.map(|s| s.to_string()),
    parameters: parameters.cloned(),
    average_overlap: mean(sequences.iter().filter_map(|s| s.overlap)),
    total_failures: sequences.iter().map(|s| s.failures).sum(),
    average_speed: mean(sequences.iter().filter_map(|s| s.speed)),
    sequences,
  }
}

// Tracks every sequence and stores the outputs. Sequences the tracker can't
// be initialized on are skipped with a warning.
pub fn run_dataset(
  tracker: &mut dyn Tracker,
  dataset: &Dataset,
  policy: &dyn FailurePolicy,
  store: &ResultsStore,
  parameter_set: Option<&str>,
) -> Result<()> {
  let name = tracker.name().to_string();
  for (i, sequence) in dataset.sequences.iter().enumerate() {
    info!("[{}/{}] Tracking {} ({} frames).", i + 1, dataset.sequences.len(), sequence.name, sequence.len());
    let run = match run_sequence(tracker, sequence, policy) {
      Ok(run) => run,
      Err(err) if is_invalid_region(&err) => {
        warn!("Skipping sequence {}: {:#}", sequence.name, err);
        continue;
      },
      Err(err) => return Err(err),
    };
    store.write(&ResultKey::new(&name, parameter_set, &sequence.name), &run)?;
  }
  Ok(())
}

// Also finds the error through added context.
fn is_invalid_region(err: &anyhow::Error) -> bool {
  matches!(err.downcast_ref::<TrackerError>(), Some(TrackerError::InvalidRegion { .. }))
}

// Scores the stored outputs. Sequences without results or with unreadable
// results are left out with a warning.
pub fn evaluate_dataset(
  tracker: &str,
  dataset: &Dataset,
  store: &ResultsStore,
  parameter_set: Option<&str>,
  parameters: Option<&TrackerParameters>,
) -> Result<EvaluationResult> {
  let mut scores = vec![];
  for sequence in &dataset.sequences {
    let key = ResultKey::new(tracker, parameter_set, &sequence.name);
    let score = store.read(&key)
      .and_then(|run| run.map(|run| score_sequence(sequence, &run)).transpose());
    match score {
      Ok(Some(score)) => scores.push(score),
      Ok(None) => {},
      Err(err) => warn!("Skipping sequence {}: {:#}", sequence.name, err),
    }
  }
  if scores.is_empty() {
    warn!("No results found for tracker {}.", tracker);
  }
  Ok(aggregate(tracker, parameter_set, parameters, scores))
}
