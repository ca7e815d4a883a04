use crate::{Error, Result};

/// Parameters of the cloaking simulation.
///
/// Lengths are in pixels. The defaults reproduce the classic demo: a 20 px square
/// hidden behind an annulus spanning radii 40 to 70 on a 256 px grid.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationParams {
    pub grid_size: usize,
    pub wavelength: f64,
    pub object_size: usize,
    pub cloak_outer_radius: f64,
    pub cloak_inner_radius: f64,
    /// Refractive index of the cloaking material
    pub refractive_index: f64,
    /// Iterations used by the advanced reconstruction before any improve step
    pub base_iterations: usize,
    /// Extra iterations added by each improve step
    pub iteration_step: usize,
    /// Padding between the object edge and the support edge
    pub support_margin: usize,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            grid_size: 256,
            wavelength: 0.05,
            object_size: 20,
            cloak_outer_radius: 70.0,
            cloak_inner_radius: 40.0,
            refractive_index: 2.0,
            base_iterations: 5,
            iteration_step: 2,
            support_margin: 10,
        }
    }
}

impl SimulationParams {
    pub fn grid_size(self, grid_size: usize) -> Self {
        Self { grid_size, ..self }
    }
    pub fn wavelength(self, wavelength: f64) -> Self {
        Self { wavelength, ..self }
    }
    pub fn object_size(self, object_size: usize) -> Self {
        Self {
            object_size,
            ..self
        }
    }
    pub fn cloak_radii(self, inner: f64, outer: f64) -> Self {
        Self {
            cloak_inner_radius: inner,
            cloak_outer_radius: outer,
            ..self
        }
    }
    pub fn refractive_index(self, refractive_index: f64) -> Self {
        Self {
            refractive_index,
            ..self
        }
    }
    pub fn iterations(self, base_iterations: usize, iteration_step: usize) -> Self {
        Self {
            base_iterations,
            iteration_step,
            ..self
        }
    }
    pub fn support_margin(self, support_margin: usize) -> Self {
        Self {
            support_margin,
            ..self
        }
    }

    /// Checks the parameters describe a drawable scene.
    pub fn validate(&self) -> Result<()> {
        if self.grid_size == 0 {
            return Err(Error::InvalidParams("grid size must be positive".into()));
        }
        if self.object_size > self.grid_size {
            return Err(Error::InvalidParams(format!(
                "object size {} exceeds grid size {}",
                self.object_size, self.grid_size
            )));
        }
        if !(self.wavelength.is_finite() && self.wavelength > 0.0) {
            return Err(Error::InvalidParams(format!(
                "wavelength must be positive, got {}",
                self.wavelength
            )));
        }
        if !self.refractive_index.is_finite() {
            return Err(Error::InvalidParams(format!(
                "refractive index must be finite, got {}",
                self.refractive_index
            )));
        }
        let (inner, outer) = (self.cloak_inner_radius, self.cloak_outer_radius);
        if !(inner.is_finite() && outer.is_finite()) || inner < 0.0 || inner > outer {
            return Err(Error::InvalidParams(format!(
                "cloak radii must satisfy 0 <= inner <= outer, got inner {} outer {}",
                inner, outer
            )));
        }
        Ok(())
    }

    /// Iteration count of the advanced reconstruction after `improve_count` improve steps.
    pub fn iterations_after(&self, improve_count: usize) -> usize {
        self.base_iterations + improve_count * self.iteration_step
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let params = SimulationParams::default();
        assert!(params.validate().is_ok());
        assert_eq!(params.iterations_after(0), 5);
        assert_eq!(params.iterations_after(3), 11);
    }

    #[test]
    fn rejects_inverted_radii() {
        let params = SimulationParams::default().cloak_radii(80.0, 70.0);
        assert!(matches!(params.validate(), Err(Error::InvalidParams(_))));
    }

    #[test]
    fn rejects_oversized_object() {
        let params = SimulationParams::default().grid_size(16).object_size(20);
        assert!(params.validate().is_err());
        let params = SimulationParams::default().grid_size(0);
        assert!(params.validate().is_err());
    }

    #[test]
    fn rejects_bad_wavelength() {
        assert!(SimulationParams::default().wavelength(0.0).validate().is_err());
        assert!(SimulationParams::default()
            .wavelength(f64::NAN)
            .validate()
            .is_err());
    }
}
