//! Phase-mask optical cloak and naive reconstruction.
//!
//! An object is hidden behind an annular phase mask, and a sequence of elementwise
//! inversions tries to recover it. [`Session`] holds every stage of the pipeline and
//! reacts to the improve and reset controls, [`render`] draws the stages as a figure.

use ndarray::{Array2, ArrayView2};
use num_complex::Complex;

pub mod cloak;
mod error;
pub mod mask;
mod params;
pub mod reconstruct;
pub mod render;
mod session;

pub use error::{Error, Result};
pub use params::SimulationParams;
pub use session::{Event, Panel, Session, FIGURE_TITLE};

/// Represents a complex scalar field, the square of which is the Irradiance.
#[derive(Clone, Debug)]
pub struct Field {
    pub values: Array2<Complex<f64>>,
}

impl Field {
    /// A field with zero phase whose irradiance equals `intensity`.
    ///
    /// Negative intensities have no amplitude and produce NaN samples.
    pub fn from_intensity(intensity: ArrayView2<f64>) -> Self {
        Field {
            values: intensity.map(|&e| Complex::new(e.sqrt(), 0.0)),
        }
    }

    pub fn intensity(&self) -> Array2<f64> {
        self.values.map(|e| e.norm_sqr())
    }

    pub fn amplitude(&self) -> Array2<f64> {
        self.values.map(|e| e.norm())
    }

    /// Calculates the sum of the squared norm of the field.
    pub fn intensity_integral(&self) -> f64 {
        self.values.iter().fold(0.0, |sum, e| sum + e.norm_sqr())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_from_intensity_round_trips() {
        let intensity = Array2::from_shape_vec([2, 2], vec![0.0, 1.0, 4.0, 0.25]).unwrap();
        let field = Field::from_intensity(intensity.view());
        assert_eq!(field.amplitude().into_raw_vec(), vec![0.0, 1.0, 2.0, 0.5]);
        assert_eq!(field.intensity(), intensity);
        assert_eq!(field.intensity_integral(), 5.25);
    }
}
