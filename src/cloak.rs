use ndarray::{Array2, ArrayView2, Zip};
use num_complex::Complex;

use crate::error::check_shape;
use crate::{Field, Result};

/// Phase shift imparted by the cloak.
///
/// A constant shift of `(n - 1) * 10 * wavelength` is applied wherever the cloak mask is set,
/// standing in for refraction through a slab of index `n`.
pub fn phase_shift(cloak: ArrayView2<f64>, refractive_index: f64, wavelength: f64) -> Array2<f64> {
    let scale = (refractive_index - 1.0) * 10.0 * wavelength;
    cloak.map(|&e| e * scale)
}

/// Multiplies every sample of the wave by `exp(i * phase)`.
pub fn apply_cloaking(wave: &Field, phase: ArrayView2<f64>) -> Result<Field> {
    rotate(wave, phase, 1.0)
}

/// The intensity an observer sees through the cloak.
pub fn apparent_image(cloaked: &Field) -> Array2<f64> {
    cloaked.intensity()
}

pub(crate) fn rotate(wave: &Field, phase: ArrayView2<f64>, sign: f64) -> Result<Field> {
    check_shape("phase shift", wave.values.shape(), phase.shape())?;

    let mut values = wave.values.clone();
    Zip::from(&mut values).and(&phase).par_for_each(|u, &p| {
        *u = *u * Complex::new(0.0, sign * p).exp();
    });
    Ok(Field { values })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mask::{generate_cloak, generate_object};
    use crate::Error;

    #[test]
    fn default_phase_is_half_radian() {
        let cloak = generate_cloak(256, 70.0, 40.0);
        let phase = phase_shift(cloak.view(), 2.0, 0.05);
        assert!((phase[[128, 180]] - 0.5).abs() < 1e-12);
        assert_eq!(phase[[128, 128]], 0.0);
    }

    #[test]
    fn unit_index_gives_no_shift() {
        let cloak = generate_cloak(64, 20.0, 10.0);
        let phase = phase_shift(cloak.view(), 1.0, 0.05);
        assert!(phase.iter().all(|&p| p == 0.0));
    }

    #[test]
    fn cloaking_preserves_intensity() {
        let object = generate_object(64, 10);
        let wave = Field::from_intensity(object.view());
        let phase = Array2::from_elem([64, 64], 0.5);
        let cloaked = apply_cloaking(&wave, phase.view()).unwrap();

        let apparent = apparent_image(&cloaked);
        Zip::from(&apparent).and(&object).for_each(|&a, &o| {
            assert!((a - o).abs() < 1e-12);
        });
        let u = cloaked.values[[32, 32]];
        assert!((u.arg() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn shape_mismatch_is_reported() {
        let wave = Field::from_intensity(Array2::<f64>::ones([8, 8]).view());
        let phase = Array2::<f64>::zeros([8, 4]);
        match apply_cloaking(&wave, phase.view()) {
            Err(Error::ShapeMismatch { expected, found, .. }) => {
                assert_eq!(expected, vec![8, 8]);
                assert_eq!(found, vec![8, 4]);
            }
            other => panic!("unexpected result: {:?}", other.map(|f| f.values.dim())),
        }
    }
}
