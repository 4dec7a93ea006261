// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::{EdgeId, ElevationFunction, Graph, NodeId, PointCh};

/// A single edge of a [Route](super::Route), with its geometry resolved from the [Graph].
///
/// The edge is modelled as a straight segment between its end points, `length` meters long.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub from_node_id: NodeId,
    pub to_node_id: NodeId,
    pub from_point: PointCh,
    pub to_point: PointCh,
    pub length: f64,
    pub profile: ElevationFunction,
}

impl Edge {
    /// Resolves an edge of the graph, which goes from `from_node_id` to `to_node_id`.
    pub fn of(graph: &Graph, edge_id: EdgeId, from_node_id: NodeId, to_node_id: NodeId) -> Self {
        Self {
            from_node_id,
            to_node_id,
            from_point: graph.node_point(from_node_id),
            to_point: graph.node_point(to_node_id),
            length: graph.edge_length(edge_id),
            profile: graph.edge_profile(edge_id),
        }
    }

    /// Creates a zero-length, flat edge which starts and ends at a single node.
    pub fn stationary(graph: &Graph, node_id: NodeId) -> Self {
        let point = graph.node_point(node_id);
        Self {
            from_node_id: node_id,
            to_node_id: node_id,
            from_point: point,
            to_point: point,
            length: 0.0,
            profile: ElevationFunction::FLAT,
        }
    }

    /// Returns the position along the edge of the orthogonal projection of `point`
    /// onto the line through both ends of the edge.
    ///
    /// The result isn't clamped, and may be negative or exceed the edge length.
    pub fn position_closest_to(&self, point: PointCh) -> f64 {
        let ue = self.to_point.e - self.from_point.e;
        let un = self.to_point.n - self.from_point.n;
        let norm = ue.hypot(un);
        if norm == 0.0 {
            return 0.0;
        }

        let ve = point.e - self.from_point.e;
        let vn = point.n - self.from_point.n;
        (ve * ue + vn * un) / norm
    }

    /// Returns the point at the given position along the edge. Positions outside
    /// `[0, length]` are extrapolated.
    pub fn point_at(&self, position: f64) -> PointCh {
        if self.length == 0.0 {
            return self.from_point;
        }

        let t = position / self.length;
        PointCh::new(
            self.from_point.e + t * (self.to_point.e - self.from_point.e),
            self.from_point.n + t * (self.to_point.n - self.from_point.n),
        )
    }

    /// Returns the elevation at the given position along the edge.
    pub fn elevation_at(&self, position: f64) -> f64 {
        self.profile.at(position)
    }
}
