// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use crate::{ElevationFunction, Route};

/// Recommended maximum distance (in meters) between samples of an [ElevationProfile].
pub const DEFAULT_MAX_STEP_LENGTH: f64 = 5.0;

/// Elevation samples spread evenly over a route, with aggregate statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct ElevationProfile {
    length: f64,
    function: ElevationFunction,
    samples: Arc<[f32]>,
    min_elevation: f64,
    max_elevation: f64,
    total_ascent: f64,
    total_descent: f64,
}

impl ElevationProfile {
    /// Creates a profile of the given (non-negative) length from at least 2 samples.
    pub fn new(length: f64, samples: Vec<f32>) -> Self {
        assert!(length >= 0.0, "profile length must not be negative");
        assert!(samples.len() >= 2, "profile needs at least 2 samples");

        let mut min_elevation = f64::INFINITY;
        let mut max_elevation = f64::NEG_INFINITY;
        for &s in &samples {
            min_elevation = min_elevation.min(s as f64);
            max_elevation = max_elevation.max(s as f64);
        }

        let mut total_ascent = 0.0;
        let mut total_descent = 0.0;
        for w in samples.windows(2) {
            let delta = w[1] as f64 - w[0] as f64;
            if delta > 0.0 {
                total_ascent += delta;
            } else {
                total_descent -= delta;
            }
        }

        let samples: Arc<[f32]> = samples.into();
        let function = if length > 0.0 {
            ElevationFunction::sampled(samples.clone(), length)
        } else {
            ElevationFunction::Constant(samples[0] as f64)
        };

        Self {
            length,
            function,
            samples,
            min_elevation,
            max_elevation,
            total_ascent,
            total_descent,
        }
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn min_elevation(&self) -> f64 {
        self.min_elevation
    }

    pub fn max_elevation(&self) -> f64 {
        self.max_elevation
    }

    /// Sum of all positive differences between consecutive samples.
    pub fn total_ascent(&self) -> f64 {
        self.total_ascent
    }

    /// Sum of absolute values of all negative differences between consecutive samples.
    pub fn total_descent(&self) -> f64 {
        self.total_descent
    }

    /// Elevation at the given position, interpolated between the samples.
    /// Positions outside of the profile are clamped.
    pub fn elevation_at(&self, position: f64) -> f64 {
        self.function.at(position)
    }

    /// Average slope (rise over run) between `position` and `position + run`.
    /// Returns 0 for a non-positive `run`.
    pub fn slope(&self, position: f64, run: f64) -> f64 {
        if run <= 0.0 {
            return 0.0;
        }
        (self.elevation_at(position + run) - self.elevation_at(position)) / run
    }
}

/// Resamples the elevation of a route at evenly spaced positions,
/// at most `max_step_length` meters apart.
///
/// The number of samples is `ceil(length / max_step_length) + 1`, but never less than 2,
/// and the first and last samples are taken at the very start and end of the route.
pub fn elevation_profile(route: &Route, max_step_length: f64) -> ElevationProfile {
    assert!(max_step_length > 0.0, "max step length must be positive");

    let length = route.length();
    let count = ((length / max_step_length).ceil() as usize + 1).max(2);
    let step = length / (count - 1) as f64;

    let samples = (0..count)
        .map(|i| route.elevation_at(i as f64 * step) as f32)
        .collect();

    log::debug!("elevation profile of {:.1} m: {} samples, {:.3} m apart", length, count, step);
    ElevationProfile::new(length, samples)
}
