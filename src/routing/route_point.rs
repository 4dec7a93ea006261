// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::PointCh;

/// The point of a [Route](super::Route) closest to some reference point.
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct RoutePoint {
    /// The point on the route
    pub point: PointCh,

    /// Position of the point along the route, in meters
    pub position: f64,

    /// Distance between the point and the reference point, in meters
    pub distance_to_reference: f64,
}

impl RoutePoint {
    /// A non-existent point, infinitely far away from any reference;
    /// the identity of [RoutePoint::min].
    pub const NONE: Self = Self {
        point: PointCh::new(f64::NAN, f64::NAN),
        position: f64::NAN,
        distance_to_reference: f64::INFINITY,
    };

    pub fn is_none(&self) -> bool {
        self.distance_to_reference == f64::INFINITY
    }

    /// Returns the same point, with its position moved by `difference` meters.
    pub fn with_position_shifted_by(self, difference: f64) -> Self {
        if difference == 0.0 {
            self
        } else {
            Self {
                position: self.position + difference,
                ..self
            }
        }
    }

    /// Returns the point closer to the reference, preferring `self` on ties.
    pub fn min(self, that: Self) -> Self {
        if that.distance_to_reference < self.distance_to_reference {
            that
        } else {
            self
        }
    }

    /// Like [RoutePoint::min], but without constructing the other point up-front.
    pub fn min_with(self, point: PointCh, position: f64, distance_to_reference: f64) -> Self {
        if distance_to_reference < self.distance_to_reference {
            Self {
                point,
                position,
                distance_to_reference,
            }
        } else {
            self
        }
    }
}
