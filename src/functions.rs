// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::sync::Arc;

/// Elevation as a function of a position along an edge or a route.
///
/// Sampled functions interpolate linearly between samples spread evenly
/// over `[0, x_max]`, and are clamped to the first/last sample outside that range.
#[derive(Debug, Clone, PartialEq)]
pub enum ElevationFunction {
    Constant(f64),
    Sampled { samples: Arc<[f32]>, x_max: f64 },
}

impl ElevationFunction {
    /// Elevation used for edges and routes without any elevation data.
    pub const FLAT: Self = Self::Constant(0.0);

    /// Creates a piecewise-linear function over at least 2 samples and a positive `x_max`.
    pub fn sampled<S: Into<Arc<[f32]>>>(samples: S, x_max: f64) -> Self {
        let samples = samples.into();
        assert!(samples.len() >= 2, "sampled function needs at least 2 samples");
        assert!(x_max > 0.0, "sampled function needs a positive domain");
        Self::Sampled { samples, x_max }
    }

    /// Picks the right representation for arbitrary (possibly degenerate) sample sets:
    /// no samples give [ElevationFunction::FLAT], a single sample or an empty domain
    /// give a constant function.
    pub fn from_samples(samples: Vec<f32>, x_max: f64) -> Self {
        match samples.len() {
            0 => Self::FLAT,
            _ if samples.len() == 1 || x_max <= 0.0 => Self::Constant(samples[0] as f64),
            _ => Self::sampled(samples, x_max),
        }
    }

    /// Evaluates the function at `x`.
    pub fn at(&self, x: f64) -> f64 {
        match self {
            Self::Constant(y) => *y,
            Self::Sampled { samples, x_max } => {
                let last = samples.len() - 1;
                if x <= 0.0 {
                    return samples[0] as f64;
                } else if x >= *x_max {
                    return samples[last] as f64;
                }

                let spacing = x_max / last as f64;
                let i = ((x / spacing) as usize).min(last - 1);
                let t = (x - i as f64 * spacing) / spacing;
                let y0 = samples[i] as f64;
                let y1 = samples[i + 1] as f64;
                y0 + (y1 - y0) * t
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! assert_almost_eq {
        ($a:expr, $b:expr) => {
            assert!((($a - $b).abs() < 1e-9), "assertion failed: {} ≈ {}", $a, $b)
        };
    }

    #[test]
    fn constant() {
        let f = ElevationFunction::Constant(12.5);
        assert_eq!(f.at(-1.0), 12.5);
        assert_eq!(f.at(1e9), 12.5);
        assert_eq!(ElevationFunction::FLAT.at(3.0), 0.0);
    }

    #[test]
    fn sampled_interpolates_and_clamps() {
        let samples: Vec<f32> = vec![30.0, 31.0, 30.5, 34.0, 29.0, 30.0, 35.0, 29.5, 33.0, 31.0, 60.0];
        let f = ElevationFunction::sampled(samples, 10.0);
        assert_eq!(f.at(-10.0), 30.0);
        assert_eq!(f.at(0.0), 30.0);
        assert_eq!(f.at(10.0), 60.0);
        assert_eq!(f.at(92.0), 60.0);
        assert_almost_eq!(f.at(9.5), 45.5);
        assert_almost_eq!(f.at(2.5), 32.25);
        assert_almost_eq!(f.at(3.0), 34.0);
    }

    #[test]
    fn from_degenerate_samples() {
        assert_eq!(ElevationFunction::from_samples(vec![], 10.0), ElevationFunction::FLAT);
        assert_eq!(
            ElevationFunction::from_samples(vec![42.0], 0.0),
            ElevationFunction::Constant(42.0)
        );
        assert_eq!(
            ElevationFunction::from_samples(vec![42.0, 43.0], 0.0),
            ElevationFunction::Constant(42.0)
        );
        assert_almost_eq!(ElevationFunction::from_samples(vec![1.0, 3.0], 4.0).at(1.0), 1.5);
    }

    #[test]
    #[should_panic]
    fn sampled_needs_two_samples() {
        ElevationFunction::sampled(vec![1.0f32], 2.0);
    }
}
