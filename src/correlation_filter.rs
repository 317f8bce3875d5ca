// MOSSE-style correlation filter tracker: a filter is learned in the
// frequency domain so that correlating it with the target patch gives a
// Gaussian peak at the target center, and the peak is searched in the next
// frame around the previous position.

use crate::all::*;

pub const CORRELATION_FILTER_NAME: &str = "Corr";

pub struct CorrelationFilterTracker {
  parameters: TrackerParameters,
  state: Option<FilterState>,
}

// Everything derived from one `initialize()` call.
pub struct FilterState {
  // Target center in sub-pixel image coordinates.
  pub position: Vector2d,
  // Target width and height, fixed at initialization.
  pub size: Vector2d,
  // Square search window side, always odd.
  pub patch_size: usize,
  pub ideal_response_spectrum: Spectrum,
  pub smoothing_window: Matrixd,
  pub filter_spectrum_conjugate: Spectrum,
  fft: Fft2d,
}

impl CorrelationFilterTracker {
  pub fn new(parameters: TrackerParameters) -> Result<CorrelationFilterTracker> {
    parameters.validate()?;
    Ok(CorrelationFilterTracker {
      parameters,
      state: None,
    })
  }

  #[cfg(test)]
  pub fn state(&self) -> Option<&FilterState> {
    self.state.as_ref()
  }
}

// Side of the square search window for a target of the given size. The side
// is forced odd so that the wrapped origin of the response has as many
// positive as negative displacements around it.
pub fn search_window_size(width: f64, height: f64, enlarge_factor: f64) -> usize {
  let s = (width.max(height) * enlarge_factor).round().max(1.) as usize;
  2 * (s / 2) + 1
}

// Beyond this the window only adds replicated border pixels.
fn max_search_window_size(image: &Image) -> usize {
  2 * image.width.max(image.height) + 1
}

impl FilterState {
  fn new(
    parameters: &TrackerParameters,
    image: &Image,
    region: &Region,
  ) -> FilterState {
    let patch_size = search_window_size(region.width, region.height, parameters.enlarge_factor)
      .min(max_search_window_size(image));
    let mut fft = Fft2d::new(patch_size, patch_size);
    let ideal_response = create_ideal_response(patch_size, patch_size, parameters.gaussian_sigma);
    let ideal_response_spectrum = fft.forward(&ideal_response);
    let smoothing_window = create_smoothing_window(patch_size, patch_size);
    let mut state = FilterState {
      position: region.center(),
      size: Vector2d::new(region.width, region.height),
      patch_size,
      ideal_response_spectrum,
      smoothing_window,
      filter_spectrum_conjugate: Spectrum::zeros(patch_size, patch_size),
      fft,
    };
    let patch_spectrum = state.patch_spectrum(image);
    state.filter_spectrum_conjugate = state.construct_filter(&patch_spectrum, parameters.filter_lambda);
    state
  }

  // Windowed patch at the current position, in the frequency domain.
  fn patch_spectrum(&mut self, image: &Image) -> Spectrum {
    let patch = get_patch(image, self.position, self.patch_size, self.patch_size);
    if patch.valid_count() == 0 {
      debug!("Search window around {:?} is outside the frame.", self.position.as_slice());
    }
    let windowed = patch.values.component_mul(&self.smoothing_window);
    self.fft.forward(&windowed)
  }

  // H* = G P* / (lambda + P P*), per frequency bin.
  pub fn construct_filter(&self, patch_spectrum: &Spectrum, filter_lambda: f64) -> Spectrum {
    self.ideal_response_spectrum.zip_map(patch_spectrum, |g, p| {
      let p_conj = p.conj();
      (g * p_conj) / (filter_lambda + p * p_conj)
    })
  }

  // Displacement of the target relative to the patch center, in whole pixels.
  fn localize(&mut self, patch_spectrum: &Spectrum) -> Vector2i {
    let product = patch_spectrum.component_mul(&self.filter_spectrum_conjugate);
    let response = self.fft.inverse_real(&product);
    let (y_max, x_max) = argmax(&response);
    Vector2i::new(
      wrapped_offset(x_max, response.ncols()) as i32,
      wrapped_offset(y_max, response.nrows()) as i32,
    )
  }

  pub fn region(&self) -> Region {
    Region::from_center(self.position, self.size[0], self.size[1])
  }
}

// Row and column of the largest value; the first one wins on ties.
fn argmax(m: &Matrixd) -> (usize, usize) {
  let mut best = 0;
  let mut best_value = f64::NEG_INFINITY;
  for (i, v) in m.iter().enumerate() {
    if *v > best_value {
      best_value = *v;
      best = i;
    }
  }
  // Column-major storage.
  (best % m.nrows(), best / m.nrows())
}

impl Tracker for CorrelationFilterTracker {
  fn name(&self) -> &str {
    CORRELATION_FILTER_NAME
  }

  fn initialize(&mut self, image: &Image, region: &Region) -> Result<()> {
    if image.is_empty()
      || !region.is_valid()
      || !region.intersects_image(image.width, image.height)
    {
      return Err(TrackerError::InvalidRegion {
        region: *region,
        width: image.width,
        height: image.height,
      }.into());
    }
    let state = FilterState::new(&self.parameters, image, region);
    debug!("Initialized at {} with a {}px search window.", region, state.patch_size);
    self.state = Some(state);
    Ok(())
  }

  fn track(&mut self, image: &Image) -> Result<Region> {
    let p = &self.parameters;
    let state = self.state.as_mut().ok_or(TrackerError::NotInitialized)?;
    if image.is_empty() {
      bail!("Cannot track on an empty frame.");
    }

    let patch_spectrum = state.patch_spectrum(image);
    let displacement = state.localize(&patch_spectrum);
    state.position[0] += displacement[0] as f64;
    state.position[1] += displacement[1] as f64;

    let patch_spectrum = state.patch_spectrum(image);
    let new_filter = state.construct_filter(&patch_spectrum, p.filter_lambda);
    let u = p.update_factor;
    state.filter_spectrum_conjugate = state.filter_spectrum_conjugate.zip_map(&new_filter, |old, new| {
      old * (1. - u) + new * u
    });

    Ok(state.region())
  }
}
