// VOT workspace layout:
//   <workspace>/sequences/list.txt               one sequence name per line
//   <workspace>/sequences/<name>/groundtruth.txt one region per frame
//   <workspace>/sequences/<name>/color/*.jpg     frames, or directly in <name>/

use crate::all::*;

use std::collections::HashSet;

const SEQUENCES_DIRECTORY: &str = "sequences";
const LIST_FILE_NAME: &str = "list.txt";
const GROUNDTRUTH_FILE_NAME: &str = "groundtruth.txt";
const COLOR_DIRECTORY: &str = "color";
const FRAME_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

enum Frames {
  Files(Vec<PathBuf>),
  Images(Vec<Image>),
}

pub struct Sequence {
  pub name: String,
  pub groundtruth: Vec<Region>,
  frames: Frames,
}

impl Sequence {
  pub fn from_files(name: &str, frames: Vec<PathBuf>, groundtruth: Vec<Region>) -> Sequence {
    Sequence {
      name: name.to_string(),
      groundtruth,
      frames: Frames::Files(frames),
    }
  }

  pub fn from_images(name: &str, frames: Vec<Image>, groundtruth: Vec<Region>) -> Sequence {
    Sequence {
      name: name.to_string(),
      groundtruth,
      frames: Frames::Images(frames),
    }
  }

  pub fn load(directory: &Path, name: &str) -> Result<Sequence> {
    let groundtruth = read_groundtruth(&directory.join(GROUNDTRUTH_FILE_NAME))?;
    let color = directory.join(COLOR_DIRECTORY);
    let frame_directory = if color.is_dir() { color } else { directory.to_path_buf() };
    let frames = list_frames(&frame_directory)?;
    if frames.len() != groundtruth.len() {
      bail!(
        "Sequence {} has {} frames but {} ground truth regions.",
        name, frames.len(), groundtruth.len(),
      );
    }
    Ok(Sequence::from_files(name, frames, groundtruth))
  }

  pub fn len(&self) -> usize {
    self.groundtruth.len()
  }

  pub fn frame(&self, index: usize) -> Result<Image> {
    match &self.frames {
      Frames::Files(paths) => {
        let path = paths.get(index)
          .ok_or(anyhow!("Frame {} is out of range for sequence {}.", index, self.name))?;
        Image::load(path)
      },
      Frames::Images(images) => images.get(index)
        .cloned()
        .ok_or(anyhow!("Frame {} is out of range for sequence {}.", index, self.name)),
    }
  }
}

pub struct Dataset {
  pub sequences: Vec<Sequence>,
}

impl Dataset {
  pub fn new(sequences: Vec<Sequence>) -> Result<Dataset> {
    let mut names = HashSet::new();
    for sequence in &sequences {
      if !names.insert(sequence.name.as_str()) {
        bail!("Duplicate sequence name {}.", sequence.name);
      }
    }
    Ok(Dataset { sequences })
  }

  pub fn load(workspace: &Path) -> Result<Dataset> {
    let directory = workspace.join(SEQUENCES_DIRECTORY);
    let names = read_lines(&directory.join(LIST_FILE_NAME))?;
    let sequences = names.iter()
      .map(|name| Sequence::load(&directory.join(name), name)
        .context(format!("Failed to load sequence {}.", name)))
      .collect::<Result<Vec<_>>>()?;
    info!("Loaded {} sequences from {}.", sequences.len(), directory.display());
    Dataset::new(sequences)
  }
}

pub fn read_groundtruth(path: &Path) -> Result<Vec<Region>> {
  read_lines(path)?
    .iter()
    .enumerate()
    .map(|(i, line)| parse_region_line(line)
      .context(format!("{}:{}", path.display(), i + 1)))
    .collect()
}

fn parse_region_line(line: &str) -> Result<Region> {
  let values = line.split(',')
    .map(|s| s.trim().parse::<f64>())
    .collect::<std::result::Result<Vec<_>, _>>()
    .context(format!("Failed to parse region `{}`.", line))?;
  Region::from_values(&values)
}

fn list_frames(directory: &Path) -> Result<Vec<PathBuf>> {
  let mut frames = vec![];
  let entries = std::fs::read_dir(directory)
    .context(format!("Failed to list frames in {}.", directory.display()))?;
  for entry in entries {
    let path = entry?.path();
    let is_frame = path.extension()
      .and_then(|e| e.to_str())
      .map(|e| FRAME_EXTENSIONS.contains(&e.to_lowercase().as_str()))
      .unwrap_or(false);
    if is_frame { frames.push(path) }
  }
  frames.sort();
  Ok(frames)
}
