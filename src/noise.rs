//! Built-in noise sources pre-registered by
//! [`NoiseRegistry::with_builtins`](crate::registry::NoiseRegistry::with_builtins).

use ndarray::Array2;
use rand::{Rng, RngCore};
use rand_distr::StandardNormal;

use crate::error::NoiseError;
use crate::registry::Shape;

/// Key of the standard normal noise source.
pub const NORMAL: &str = "normal";
/// Key of the unit-hypersphere noise source.
pub const UNIT: &str = "unit";
/// Key of the `[0, 1)` uniform noise source.
pub const UNIFORM_0_1: &str = "uniform_0_1";

/// Draw i.i.d. samples from N(0, 1).
///
/// # Errors
///
/// Returns [`NoiseError::InvalidShape`] if either dimension is zero.
pub fn normal(rng: &mut dyn RngCore, shape: Shape) -> Result<Array2<f32>, NoiseError> {
    check_shape(shape)?;
    Ok(Array2::from_shape_fn(shape, |_| rng.sample::<f32, _>(StandardNormal)))
}

/// Draw standard normal rows and rescale each to unit L2 norm.
///
/// Every row lies on the unit hypersphere of dimension `shape.1`.
///
/// # Errors
///
/// Returns [`NoiseError::InvalidShape`] if either dimension is zero.
pub fn unit(rng: &mut dyn RngCore, shape: Shape) -> Result<Array2<f32>, NoiseError> {
    let mut z = normal(rng, shape)?;
    for mut row in z.rows_mut() {
        let norm = row.dot(&row).sqrt();
        // An all-zero draw has no direction; leave it as is.
        if norm > 0.0 {
            row.mapv_inplace(|v| v / norm);
        }
    }
    Ok(z)
}

/// Draw i.i.d. samples from U[0, 1).
///
/// # Errors
///
/// Returns [`NoiseError::InvalidShape`] if either dimension is zero.
pub fn uniform_0_1(rng: &mut dyn RngCore, shape: Shape) -> Result<Array2<f32>, NoiseError> {
    check_shape(shape)?;
    Ok(Array2::from_shape_fn(shape, |_| rng.gen::<f32>()))
}

fn check_shape((count, z_size): Shape) -> Result<(), NoiseError> {
    if count == 0 || z_size == 0 {
        return Err(NoiseError::InvalidShape { count, z_size });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn normal_has_requested_shape() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let z = normal(&mut rng, (5, 3)).unwrap();
        assert_eq!(z.dim(), (5, 3));
    }

    #[test]
    fn normal_moments_match_standard_normal() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let z = normal(&mut rng, (20_000, 8)).unwrap();
        let mean = z.mean().unwrap();
        let var = z.mapv(|v| (v - mean).powi(2)).mean().unwrap();
        assert!(mean.abs() < 0.02, "mean = {mean}");
        assert!((var - 1.0).abs() < 0.03, "variance = {var}");
    }

    #[test]
    fn unit_rows_have_unit_norm() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let z = unit(&mut rng, (64, 16)).unwrap();
        for row in z.rows() {
            let norm = row.dot(&row).sqrt();
            assert!((norm - 1.0).abs() < 1e-5, "norm = {norm}");
        }
    }

    #[test]
    fn uniform_values_in_half_open_unit_interval() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let z = uniform_0_1(&mut rng, (1000, 4)).unwrap();
        assert!(z.iter().all(|&v| (0.0..1.0).contains(&v)));
        let mean = z.mean().unwrap();
        assert!((mean - 0.5).abs() < 0.02, "mean = {mean}");
    }

    #[test]
    fn zero_dimension_rejected() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert!(matches!(
            normal(&mut rng, (0, 4)),
            Err(NoiseError::InvalidShape { count: 0, z_size: 4 })
        ));
        assert!(matches!(
            uniform_0_1(&mut rng, (2, 0)),
            Err(NoiseError::InvalidShape { count: 2, z_size: 0 })
        ));
    }
}
