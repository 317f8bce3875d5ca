// NOTE This kind of import-all file isn't a common Rust idiom.

pub use crate::{
  correlation_filter::*,
  dataset::*,
  evaluation::*,
  failure::*,
  fft::*,
  image::*,
  parameters::*,
  patch::*,
  region::*,
  report::*,
  results::*,
  sweep::*,
  synthetic::*,
  tracker::*,
  types::*,
  util::*,
  window::*,
};

pub use {
  std::{
    fmt,
    fs::File,
    io::{BufRead, BufReader, Write},
    path::{Path, PathBuf},
    time::Instant,
  },
  log::{debug, error, info, warn, LevelFilter},
  nalgebra::DMatrix,
  rustfft::num_complex::Complex64,
  anyhow::{anyhow, bail, Context as AnyhowContext, Result},
  serde::{Deserialize, Serialize},
};
