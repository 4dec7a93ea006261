// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

/// A point in the Swiss LV95 planar coordinate system, in meters.
///
/// `e` grows eastwards and `n` northwards; distances between points
/// are plain euclidean distances.
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct PointCh {
    pub e: f64,
    pub n: f64,
}

impl PointCh {
    pub const fn new(e: f64, n: f64) -> Self {
        Self { e, n }
    }

    /// Returns the squared distance to another point, in square meters.
    #[inline]
    pub fn squared_distance_to(&self, other: PointCh) -> f64 {
        let de = other.e - self.e;
        let dn = other.n - self.n;
        de * de + dn * dn
    }

    /// Returns the distance to another point, in meters.
    #[inline]
    pub fn distance_to(&self, other: PointCh) -> f64 {
        (other.e - self.e).hypot(other.n - self.n)
    }

    /// Converts the point to WGS84 `(lon, lat)` degrees, using the approximate
    /// formulas published by swisstopo (accurate to about a meter).
    pub fn to_wgs84(&self) -> (f64, f64) {
        let x = 1e-6 * (self.e - 2_600_000.0);
        let y = 1e-6 * (self.n - 1_200_000.0);

        let lon0 = 2.6779094 + 4.728982 * x + 0.791484 * x * y + 0.1306 * x * y * y
            - 0.0436 * x * x * x;
        let lat0 = 16.9023892 + 3.238272 * y
            - 0.270978 * x * x
            - 0.002528 * y * y
            - 0.0447 * x * x * y
            - 0.0140 * y * y * y;

        (lon0 * 100.0 / 36.0, lat0 * 100.0 / 36.0)
    }
}
