// Eigen-like aliases.
pub type Vector2d = nalgebra::Vector2::<f64>;
pub type Vector2i = nalgebra::Vector2::<i32>;
pub type Matrixd = nalgebra::DMatrix::<f64>;
pub type Spectrum = nalgebra::DMatrix::<rustfft::num_complex::Complex64>;
