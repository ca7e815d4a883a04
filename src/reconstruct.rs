use ndarray::{Array2, ArrayView2, Zip};

use crate::cloak::rotate;
use crate::error::check_shape;
use crate::{Field, Result};

/// Undoes the cloak's phase shift and returns the recovered amplitude `|u * exp(-i * phase)|`.
pub fn reconstruct_basic(cloaked: &Field, phase: ArrayView2<f64>) -> Result<Array2<f64>> {
    Ok(rotate(cloaked, phase, -1.0)?.amplitude())
}

/// Refines the basic reconstruction with positivity and support constraints.
///
/// Each iteration clamps the estimate to be non-negative and multiplies it by `support`.
/// Both constraints are idempotent, so every `iterations >= 1` gives the same estimate.
pub fn reconstruct_advanced(
    cloaked: &Field,
    phase: ArrayView2<f64>,
    support: ArrayView2<f64>,
    iterations: usize,
) -> Result<Array2<f64>> {
    let mut estimate = reconstruct_basic(cloaked, phase)?;
    check_shape("support", estimate.shape(), support.shape())?;

    for _ in 0..iterations {
        Zip::from(&mut estimate).and(&support).par_for_each(|e, &s| {
            *e = e.max(0.0) * s;
        });
    }
    Ok(estimate)
}

/// Per-pixel absolute difference between the object and an estimate of it.
pub fn reconstruction_error(
    object: ArrayView2<f64>,
    estimate: ArrayView2<f64>,
) -> Result<Array2<f64>> {
    check_shape("estimate", object.shape(), estimate.shape())?;
    Ok(Zip::from(&object)
        .and(&estimate)
        .par_map_collect(|&o, &e| (o - e).abs()))
}

/// Summary statistics of a real image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stats {
    pub min: f64,
    pub max: f64,
    pub sum: f64,
    pub mean: f64,
}

impl Stats {
    pub fn of(arr: ArrayView2<f64>) -> Self {
        let min = arr.iter().fold(f64::INFINITY, |min, &e| e.min(min));
        let max = arr.iter().fold(f64::NEG_INFINITY, |max, &e| e.max(max));
        let sum = arr.sum();
        let mean = if arr.is_empty() {
            0.0
        } else {
            sum / arr.len() as f64
        };
        Stats { min, max, sum, mean }
    }
}
