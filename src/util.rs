use crate::all::*;

pub fn format_log(
  buf: &mut env_logger::fmt::Formatter,
  record: &log::Record,
) -> std::io::Result<()> {
  let mut style = buf.style();
  use env_logger::fmt::Color::*;
  use log::Level::*;
  style.set_color(match record.level() {
    Error => Red,
    Warn => Yellow,
    Info => Green,
    Debug => Magenta,
    Trace => Blue,
  });

  let s = format!("{:30}{}",
    format!("{}:{}",
      record.file().unwrap_or("?"),
      record.line().unwrap_or(0),
    ),
    record.args()
  );
  writeln!(buf, "{}", style.value(s))
}

pub fn init_logging(verbose: bool) {
  let level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };
  // `try_init` so that repeated calls (tests) don't panic.
  let _ = env_logger::Builder::new()
    .filter_level(level)
    .format(format_log)
    .try_init();
}

// Non-empty trimmed lines of a text file.
pub fn read_lines(path: &Path) -> Result<Vec<String>> {
  let file = File::open(path)
    .context(format!("Failed to open {}.", path.display()))?;
  let mut reader = BufReader::new(file);
  let mut line = String::new();
  let mut lines = vec![];
  loop {
    line.clear();
    match reader.read_line(&mut line) {
      Ok(0) => return Ok(lines),
      Err(err) => bail!("Failed to read line from {}. {}", path.display(), err),
      _ => {},
    }
    let trimmed = line.trim();
    if !trimmed.is_empty() {
      lines.push(trimmed.to_string());
    }
  }
}

// Mean of the values, `None` for an empty input.
pub fn mean<I: IntoIterator<Item = f64>>(values: I) -> Option<f64> {
  let mut sum = 0.;
  let mut n = 0;
  for v in values {
    sum += v;
    n += 1;
  }
  if n == 0 { None } else { Some(sum / n as f64) }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_mean() {
    assert_eq!(mean(vec![]), None);
    assert_eq!(mean(vec![1., 2., 6.]), Some(3.));
  }

  #[test]
  fn test_read_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("list.txt");
    std::fs::write(&path, "  ball \n\n\ncar\r\n  \n").unwrap();
    assert_eq!(read_lines(&path).unwrap(), vec!["ball", "car"]);
    assert!(read_lines(&dir.path().join("missing.txt")).is_err());
  }
}
