use ndarray::Array2;

use crate::cloak::{apparent_image, apply_cloaking, phase_shift};
use crate::mask::{generate_cloak, generate_object, generate_support};
use crate::reconstruct::{reconstruct_advanced, reconstruct_basic, reconstruction_error, Stats};
use crate::render::{ColorLimits, Colormap};
use crate::{Error, Field, Result, SimulationParams};

pub const FIGURE_TITLE: &str = "Optical Cloaking and Digital Reconstruction Simulation";

const OBJECT: usize = 0;
const PHASE: usize = 1;
const APPARENT: usize = 2;
const BASIC: usize = 3;
const ADVANCED: usize = 4;
const ERROR: usize = 5;

/// Number of panel rows and columns in the figure.
pub const LAYOUT: (usize, usize) = (2, 3);

/// One image of the figure.
#[derive(Debug, Clone)]
pub struct Panel {
    pub title: &'static str,
    pub data: Array2<f64>,
    pub colormap: Colormap,
    pub limits: ColorLimits,
}

impl Panel {
    fn new(title: &'static str, data: Array2<f64>, colormap: Colormap) -> Self {
        Panel {
            title,
            data,
            colormap,
            limits: ColorLimits::DataRange,
        }
    }
}

/// User controls of the figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Improve,
    Reset,
}

impl std::str::FromStr for Event {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "i" | "improve" => Ok(Event::Improve),
            "r" | "reset" => Ok(Event::Reset),
            other => Err(Error::UnknownCommand(other.to_string())),
        }
    }
}

/// Every stage of the cloak simulation along with the improve counter.
pub struct Session {
    params: SimulationParams,
    support: Array2<f64>,
    cloaked: Field,
    improve_count: usize,
    panels: Vec<Panel>,
}

impl Session {
    pub fn new(params: SimulationParams) -> Result<Self> {
        params.validate()?;
        let g = params.grid_size;

        let object = generate_object(g, params.object_size);
        let cloak = generate_cloak(g, params.cloak_outer_radius, params.cloak_inner_radius);
        let phase = phase_shift(cloak.view(), params.refractive_index, params.wavelength);
        let support = generate_support(g, params.object_size, params.support_margin);

        let wave = Field::from_intensity(object.view());
        let cloaked = apply_cloaking(&wave, phase.view())?;
        let apparent = apparent_image(&cloaked);

        let basic = reconstruct_basic(&cloaked, phase.view())?;
        let advanced = reconstruct_advanced(
            &cloaked,
            phase.view(),
            support.view(),
            params.iterations_after(0),
        )?;
        // the first draw compares against the basic reconstruction
        let error = reconstruction_error(object.view(), basic.view())?;

        log::info!(
            "grid {0}x{0}, phase shift {1:.3} rad in cloak",
            g,
            Stats::of(phase.view()).max
        );

        let panels = vec![
            Panel::new("Original Object", object, Colormap::Gray),
            Panel::new("Cloaking Phase Shift", phase, Colormap::Viridis),
            Panel::new("Apparent Image (After Cloaking)", apparent, Colormap::Gray),
            Panel::new("Basic Reconstruction", basic, Colormap::Gray),
            Panel::new("Advanced Reconstruction", advanced, Colormap::Gray),
            Panel::new("Reconstruction Error", error, Colormap::Hot),
        ];
        let session = Session {
            params,
            support,
            cloaked,
            improve_count: 0,
            panels,
        };
        session.log_stats();
        Ok(session)
    }

    pub fn handle(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Improve => {
                self.improve_count += 1;
                self.update_advanced()?;
                self.panels[ERROR].limits = ColorLimits::DataRange;
            }
            Event::Reset => {
                self.improve_count = 0;
                self.update_advanced()?;
                self.panels[ERROR].limits = ColorLimits::Fixed(0.0, 1.0);
            }
        }
        log::info!(
            "{:?}: {} improve steps, {} iterations",
            event,
            self.improve_count,
            self.iterations()
        );
        Ok(())
    }

    fn update_advanced(&mut self) -> Result<()> {
        let advanced = reconstruct_advanced(
            &self.cloaked,
            self.phase_shift().view(),
            self.support.view(),
            self.iterations(),
        )?;
        let error = reconstruction_error(self.object().view(), advanced.view())?;

        self.panels[ADVANCED].data = advanced;
        self.panels[ADVANCED].limits = ColorLimits::DataRange;
        self.panels[ERROR].data = error;
        Ok(())
    }

    fn log_stats(&self) {
        for panel in &self.panels {
            let Stats { min, max, sum, .. } = Stats::of(panel.data.view());
            log::debug!("{}: min {} max {} sum {}", panel.title, min, max, sum);
        }
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    pub fn improve_count(&self) -> usize {
        self.improve_count
    }

    /// Iterations of the current advanced reconstruction.
    pub fn iterations(&self) -> usize {
        self.params.iterations_after(self.improve_count)
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    pub fn object(&self) -> &Array2<f64> {
        &self.panels[OBJECT].data
    }

    pub fn phase_shift(&self) -> &Array2<f64> {
        &self.panels[PHASE].data
    }

    pub fn apparent(&self) -> &Array2<f64> {
        &self.panels[APPARENT].data
    }

    pub fn basic(&self) -> &Array2<f64> {
        &self.panels[BASIC].data
    }

    pub fn advanced(&self) -> &Array2<f64> {
        &self.panels[ADVANCED].data
    }

    pub fn error(&self) -> &Array2<f64> {
        &self.panels[ERROR].data
    }
}
