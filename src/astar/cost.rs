// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::EdgeId;

/// Policy assigning a traversal cost to every edge of a [Graph](crate::Graph).
pub trait CostFunction {
    /// Returns the non-negative cost of traversing an edge of the given length (in meters).
    /// Edges which must not be used should cost [f64::INFINITY].
    fn cost(&self, edge_id: EdgeId, length: f64) -> f64;

    /// Whether [CostFunction::cost] is never smaller than the edge length.
    ///
    /// Enables the straight-line distance to the target as an A* heuristic. The distance
    /// is multiplied by [Graph::heuristic_scale](crate::Graph::heuristic_scale), so it never
    /// exceeds the cost of reaching the target, even through edges stored shorter than
    /// the straight-line distance between their endpoints.
    /// Searches with unbounded cost functions fall back to plain Dijkstra ordering.
    fn distance_bounded(&self) -> bool {
        false
    }
}

/// Cost equal to the edge length - finds the shortest routes.
#[derive(Debug, Clone, Copy, Default)]
pub struct DistanceCost;

impl CostFunction for DistanceCost {
    fn cost(&self, _: EdgeId, length: f64) -> f64 {
        length
    }

    fn distance_bounded(&self) -> bool {
        true
    }
}

impl<F: Fn(EdgeId, f64) -> f64> CostFunction for F {
    fn cost(&self, edge_id: EdgeId, length: f64) -> f64 {
        self(edge_id, length)
    }
}
