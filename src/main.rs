mod all;
mod correlation_filter;
mod dataset;
mod evaluation;
mod failure;
mod fft;
mod image;
mod parameters;
mod patch;
mod region;
mod report;
mod results;
mod sweep;
mod synthetic;
mod tracker;
mod types;
mod util;
mod window;

use all::*;

use clap::Parser;

#[derive(Parser)]
#[clap(about = "Correlation filter tracker and VOT-style benchmark.")]
struct Args {
  #[clap(subcommand)]
  command: Command,

  #[clap(short, long, global = true)]
  verbose: bool,
}

#[derive(clap::Subcommand)]
enum Command {
  /// Track every sequence of a workspace and store the results.
  Run(WorkspaceArgs),
  /// Score stored results against the ground truth.
  Evaluate(WorkspaceArgs),
  /// Run and evaluate.
  Benchmark(WorkspaceArgs),
  /// Benchmark several values of one tracker parameter.
  Sweep(SweepArgs),
  /// Benchmark on generated sequences, without a workspace.
  Synthetic(SyntheticArgs),
}

#[derive(clap::Args)]
struct WorkspaceArgs {
  #[clap(short, long)]
  workspace_path: PathBuf,
  #[clap(flatten)]
  parameters: TrackerParameters,
  #[clap(flatten)]
  protocol: ProtocolParameters,
}

#[derive(clap::Args)]
struct SweepArgs {
  #[clap(short, long)]
  workspace_path: PathBuf,
  #[clap(long, arg_enum)]
  parameter: SweepParameter,
  #[clap(long, use_value_delimiter = true, required = true)]
  values: Vec<f64>,
  #[clap(flatten)]
  parameters: TrackerParameters,
  #[clap(flatten)]
  protocol: ProtocolParameters,
}

#[derive(clap::Args)]
struct SyntheticArgs {
  #[clap(long, default_value = "5")]
  sequences: usize,
  #[clap(long, default_value = "100")]
  frames: usize,
  #[clap(long, default_value = "0")]
  seed: u64,
  #[clap(flatten)]
  parameters: TrackerParameters,
  #[clap(flatten)]
  protocol: ProtocolParameters,
}

fn handle_error(err: &anyhow::Error) {
  error!("{}", err);
  for (i, e) in err.chain().skip(1).enumerate() {
    error!("  {}: {}", i + 1, e);
  }
}

fn main() {
  let args = Args::parse();
  util::init_logging(args.verbose);
  if let Err(err) = run(args.command) {
    handle_error(&err);
    std::process::exit(1);
  }
}

fn run(command: Command) -> Result<()> {
  match command {
    Command::Run(args) => {
      let dataset = Dataset::load(&args.workspace_path)?;
      track(&args, &dataset)
    },
    Command::Evaluate(args) => {
      let dataset = Dataset::load(&args.workspace_path)?;
      evaluate(&args, &dataset)
    },
    Command::Benchmark(args) => {
      let dataset = Dataset::load(&args.workspace_path)?;
      track(&args, &dataset)?;
      evaluate(&args, &dataset)
    },
    Command::Sweep(args) => {
      let dataset = Dataset::load(&args.workspace_path)?;
      let policy = args.protocol.policy();
      let rows = sweep(
        &args.workspace_path,
        &dataset,
        &args.parameters,
        args.parameter,
        &args.values,
        policy.as_ref(),
      )?;
      for line in format_sweep(args.parameter, &rows) {
        info!("{}", line);
      }
      Ok(())
    },
    Command::Synthetic(args) => synthetic(&args),
  }
}

fn track(args: &WorkspaceArgs, dataset: &Dataset) -> Result<()> {
  let mut tracker = CorrelationFilterTracker::new(args.parameters.clone())?;
  let store = ResultsStore::new(&args.workspace_path);
  let policy = args.protocol.policy();
  run_dataset(&mut tracker, dataset, policy.as_ref(), &store, args.protocol.parameter_set.as_deref())
}

fn evaluate(args: &WorkspaceArgs, dataset: &Dataset) -> Result<()> {
  let store = ResultsStore::new(&args.workspace_path);
  let parameter_set = args.protocol.parameter_set.as_deref();
  let result = evaluate_dataset(CORRELATION_FILTER_NAME, dataset, &store, parameter_set, Some(&args.parameters))?;
  print_report(&result);
  export_result(&args.workspace_path, &result)?;
  Ok(())
}

// Scores directly from memory, nothing is written to disk.
fn synthetic(args: &SyntheticArgs) -> Result<()> {
  let options = SyntheticOptions { frame_count: args.frames, ..SyntheticOptions::default() };
  let dataset = synthetic_dataset(args.sequences, args.seed, &options)?;
  let mut tracker = CorrelationFilterTracker::new(args.parameters.clone())?;
  let policy = args.protocol.policy();
  let mut scores = vec![];
  for sequence in &dataset.sequences {
    let run = run_sequence(&mut tracker, sequence, policy.as_ref())?;
    scores.push(score_sequence(sequence, &run)?);
  }
  let result = aggregate(tracker.name(), None, Some(&args.parameters), scores);
  print_report(&result);
  Ok(())
}
