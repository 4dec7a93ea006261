// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use super::{Edge, RoutePoint};
use crate::{NodeId, PointCh};

#[derive(Debug, Clone, PartialEq)]
enum RouteKind {
    /// A chain of edges
    Simple(Vec<Edge>),

    /// A chain of sub-routes, each starting where the previous one ends
    Composite(Vec<Arc<Route>>),
}

/// An immutable, non-empty and connected chain of [edges](Edge), which can be queried
/// by position (distance from the start of the route, in meters) or by point.
///
/// A route is either *simple* (made directly of edges) or *composite*
/// (made of sub-routes, or *segments*, usually computed between consecutive waypoints).
/// Both kinds answer all queries the same way.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    kind: RouteKind,

    /// Position of the start of every edge (simple) or segment (composite),
    /// followed by the length of the whole route.
    positions: Vec<f64>,
}

impl Route {
    /// Creates a simple route from a non-empty chain of edges.
    pub fn simple(edges: Vec<Edge>) -> Self {
        assert!(!edges.is_empty(), "a route needs at least one edge");
        let positions = cumulative(edges.iter().map(|e| e.length));
        Self {
            kind: RouteKind::Simple(edges),
            positions,
        }
    }

    /// Creates a composite route from a non-empty chain of routes.
    pub fn composite(segments: Vec<Arc<Route>>) -> Self {
        assert!(!segments.is_empty(), "a route needs at least one segment");
        let positions = cumulative(segments.iter().map(|s| s.length()));
        Self {
            kind: RouteKind::Composite(segments),
            positions,
        }
    }

    pub fn is_composite(&self) -> bool {
        matches!(self.kind, RouteKind::Composite(_))
    }

    /// Returns the sub-routes of a composite route; empty for simple routes.
    pub fn segments(&self) -> &[Arc<Route>] {
        match &self.kind {
            RouteKind::Simple(_) => &[],
            RouteKind::Composite(segments) => segments,
        }
    }

    /// Returns the positions at which every edge (or segment, for composite routes) starts,
    /// followed by the length of the route. Never decreasing.
    pub fn positions(&self) -> &[f64] {
        &self.positions
    }

    /// Returns the length of the route, in meters.
    pub fn length(&self) -> f64 {
        self.positions[self.positions.len() - 1]
    }

    /// Returns all edges of the route, in order.
    pub fn edges(&self) -> Vec<&Edge> {
        match &self.kind {
            RouteKind::Simple(edges) => edges.iter().collect(),
            RouteKind::Composite(segments) => segments.iter().flat_map(|s| s.edges()).collect(),
        }
    }

    /// Returns the points at the ends of all edges. Points shared by consecutive segments
    /// of composite routes are listed once, and zero-length segments contribute no points.
    pub fn points(&self) -> Vec<PointCh> {
        match &self.kind {
            RouteKind::Simple(edges) => {
                let mut points: Vec<PointCh> = edges.iter().map(|e| e.from_point).collect();
                points.push(edges[edges.len() - 1].to_point);
                points
            }

            RouteKind::Composite(segments) => {
                let mut points: Vec<PointCh> = Vec::new();
                for segment in segments.iter().filter(|s| s.length() > 0.0) {
                    let segment_points = segment.points();
                    let skip = usize::from(points.last() == segment_points.first());
                    points.extend_from_slice(&segment_points[skip..]);
                }

                if points.is_empty() {
                    segments[0].points()
                } else {
                    points
                }
            }
        }
    }

    /// Returns the index of the segment at the given position.
    ///
    /// Simple routes consist of a single segment. For composite routes, a position
    /// at the boundary of two segments belongs to the first one, and zero-length
    /// segments are skipped entirely - they are never reported and don't affect
    /// the indices of the following segments.
    pub fn index_of_segment_at(&self, position: f64) -> usize {
        match &self.kind {
            RouteKind::Simple(_) => 0,
            RouteKind::Composite(segments) => {
                let position = self.clamp(position);
                let mut index = 0;

                for (i, segment) in segments.iter().enumerate() {
                    let length = segment.length();
                    if length == 0.0 {
                        continue;
                    }

                    if position <= self.positions[i + 1] {
                        return index + segment.index_of_segment_at(position - self.positions[i]);
                    }
                    index += segment.index_of_segment_at(length) + 1;
                }

                index.saturating_sub(1)
            }
        }
    }

    /// Returns the point at the given position, clamped to the route.
    pub fn point_at(&self, position: f64) -> PointCh {
        let position = self.clamp(position);
        let i = self.index_at(position);
        let local = position - self.positions[i];

        match &self.kind {
            RouteKind::Simple(edges) => edges[i].point_at(local),
            RouteKind::Composite(segments) => segments[i].point_at(local),
        }
    }

    /// Returns the elevation at the given position, clamped to the route.
    pub fn elevation_at(&self, position: f64) -> f64 {
        let position = self.clamp(position);
        let i = self.index_at(position);
        let local = position - self.positions[i];

        match &self.kind {
            RouteKind::Simple(edges) => edges[i].elevation_at(local),
            RouteKind::Composite(segments) => segments[i].elevation_at(local),
        }
    }

    /// Returns the id of the node closest to the given position, clamped to the route:
    /// the start of the edge containing the position, if it's at most halfway through
    /// the edge, or its end otherwise.
    pub fn node_closest_to(&self, position: f64) -> NodeId {
        let position = self.clamp(position);
        let i = self.index_at(position);
        let local = position - self.positions[i];

        match &self.kind {
            RouteKind::Simple(edges) => {
                let edge = &edges[i];
                if local <= edge.length / 2.0 {
                    edge.from_node_id
                } else {
                    edge.to_node_id
                }
            }
            RouteKind::Composite(segments) => segments[i].node_closest_to(local),
        }
    }

    /// Returns the point of the route closest to the given reference point.
    ///
    /// If multiple points are equally close, the one with the smallest position is returned.
    pub fn point_closest_to(&self, point: PointCh) -> RoutePoint {
        match &self.kind {
            RouteKind::Simple(edges) => {
                edges
                    .iter()
                    .zip(&self.positions)
                    .fold(RoutePoint::NONE, |closest, (edge, &start)| {
                        let on_edge = edge.position_closest_to(point).clamp(0.0, edge.length);
                        let p = edge.point_at(on_edge);
                        closest.min_with(p, start + on_edge, point.distance_to(p))
                    })
            }

            RouteKind::Composite(segments) => segments
                .iter()
                .zip(&self.positions)
                .fold(RoutePoint::NONE, |closest, (segment, &start)| {
                    closest.min(segment.point_closest_to(point).with_position_shifted_by(start))
                }),
        }
    }

    #[inline]
    fn clamp(&self, position: f64) -> f64 {
        position.clamp(0.0, self.length())
    }

    /// Returns the index of the edge (or segment) containing an already-clamped position.
    ///
    /// A position exactly between two edges belongs to the one starting there,
    /// except for the end of the route, which belongs to the last edge.
    fn index_at(&self, position: f64) -> usize {
        let last = self.positions.len() - 2;
        self.positions
            .partition_point(|&p| p <= position)
            .saturating_sub(1)
            .min(last)
    }
}

fn cumulative<I: Iterator<Item = f64>>(lengths: I) -> Vec<f64> {
    let mut positions = vec![0.0];
    let mut total = 0.0;
    for length in lengths {
        total += length;
        positions.push(total);
    }
    positions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{ORIGIN_E, ORIGIN_N};
    use crate::ElevationFunction;

    macro_rules! assert_almost_eq {
        ($a:expr, $b:expr) => {
            assert!((($a - $b).abs() < 1e-6), "assertion failed: {} ≈ {}", $a, $b)
        };
    }

    fn p(de: f64, dn: f64) -> PointCh {
        PointCh::new(ORIGIN_E + de, ORIGIN_N + dn)
    }

    fn straight_edge(from: NodeId, to: NodeId, a: PointCh, b: PointCh) -> Edge {
        Edge {
            from_node_id: from,
            to_node_id: to,
            from_point: a,
            to_point: b,
            length: a.distance_to(b),
            profile: ElevationFunction::FLAT,
        }
    }

    /// Zig-zag of 4 edges, each 500 m long:
    /// (0,0) -> (300,400) -> (600,0) -> (900,400) -> (1200,0),
    /// climbing linearly by 10 m on every edge.
    fn zig_zag() -> Route {
        let points = [p(0.0, 0.0), p(300.0, 400.0), p(600.0, 0.0), p(900.0, 400.0), p(1200.0, 0.0)];
        let edges = (0..4)
            .map(|i| Edge {
                profile: ElevationFunction::sampled(
                    vec![i as f32 * 10.0, (i + 1) as f32 * 10.0],
                    500.0,
                ),
                ..straight_edge(i as NodeId, (i + 1) as NodeId, points[i], points[i + 1])
            })
            .collect();
        Route::simple(edges)
    }

    fn straight_segment(from: NodeId, e0: f64, e1: f64) -> Arc<Route> {
        Arc::new(Route::simple(vec![straight_edge(
            from,
            from + 1,
            p(e0, 0.0),
            p(e1, 0.0),
        )]))
    }

    #[test]
    fn length_and_positions() {
        let r = zig_zag();
        assert_eq!(r.length(), 2000.0);
        assert_eq!(r.positions(), &[0.0, 500.0, 1000.0, 1500.0, 2000.0]);
        assert!(r.positions().windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(*r.positions().last().unwrap(), r.length());
        assert_eq!(r.edges().len(), 4);
        assert!(!r.is_composite());
        assert!(r.segments().is_empty());
        assert_eq!(r.index_of_segment_at(1234.0), 0);
    }

    #[test]
    fn points() {
        let r = zig_zag();
        assert_eq!(
            r.points(),
            vec![p(0.0, 0.0), p(300.0, 400.0), p(600.0, 0.0), p(900.0, 400.0), p(1200.0, 0.0)]
        );
    }

    #[test]
    fn point_at() {
        let r = zig_zag();
        assert_eq!(r.point_at(-10.0), p(0.0, 0.0));
        assert_eq!(r.point_at(0.0), p(0.0, 0.0));
        assert_almost_eq!(r.point_at(250.0).e, ORIGIN_E + 150.0);
        assert_almost_eq!(r.point_at(250.0).n, ORIGIN_N + 200.0);
        assert_almost_eq!(r.point_at(500.0).e, ORIGIN_E + 300.0);
        assert_almost_eq!(r.point_at(750.0).n, ORIGIN_N + 200.0);
        assert_almost_eq!(r.point_at(2000.0).e, ORIGIN_E + 1200.0);
        assert_almost_eq!(r.point_at(5000.0).e, ORIGIN_E + 1200.0);
    }

    #[test]
    fn point_at_is_continuous_across_edges() {
        let r = zig_zag();
        for &boundary in &[500.0, 1000.0, 1500.0] {
            let node = r.point_at(boundary);
            for &eps in &[1e-3, 1e-6, 1e-9] {
                assert!(r.point_at(boundary - eps).distance_to(node) < 2.0 * eps + 1e-6);
                assert!(r.point_at(boundary + eps).distance_to(node) < 2.0 * eps + 1e-6);
            }
        }
    }

    #[test]
    fn elevation_at() {
        let r = zig_zag();
        assert_eq!(r.elevation_at(-1.0), 0.0);
        assert_almost_eq!(r.elevation_at(250.0), 5.0);
        assert_almost_eq!(r.elevation_at(500.0), 10.0);
        assert_almost_eq!(r.elevation_at(1750.0), 35.0);
        assert_eq!(r.elevation_at(2000.0), 40.0);
        assert_eq!(r.elevation_at(2500.0), 40.0);
    }

    #[test]
    fn node_closest_to() {
        let r = zig_zag();
        assert_eq!(r.node_closest_to(-5.0), 0);
        assert_eq!(r.node_closest_to(100.0), 0);
        assert_eq!(r.node_closest_to(250.0), 0);
        assert_eq!(r.node_closest_to(251.0), 1);
        assert_eq!(r.node_closest_to(500.0), 1);
        assert_eq!(r.node_closest_to(1900.0), 4);
        assert_eq!(r.node_closest_to(2000.0), 4);
        assert_eq!(r.node_closest_to(3000.0), 4);
    }

    #[test]
    fn point_closest_to() {
        let r = zig_zag();

        // Exactly on the second edge
        let on_edge = r.point_at(700.0);
        let closest = r.point_closest_to(on_edge);
        assert_almost_eq!(closest.position, 700.0);
        assert_almost_eq!(closest.distance_to_reference, 0.0);

        // Above the first peak, closest to the node itself
        let closest = r.point_closest_to(p(300.0, 500.0));
        assert_eq!(closest.point, p(300.0, 400.0));
        assert_eq!(closest.position, 500.0);
        assert_almost_eq!(closest.distance_to_reference, 100.0);

        // Before the start of the route
        let closest = r.point_closest_to(p(-30.0, -40.0));
        assert_eq!(closest.position, 0.0);
        assert_almost_eq!(closest.distance_to_reference, 50.0);

        // Never farther than the route ends
        for &(de, dn) in &[(100.0, -300.0), (700.0, 900.0), (1500.0, 100.0), (-200.0, 250.0)] {
            let reference = p(de, dn);
            let closest = r.point_closest_to(reference);
            assert!(!closest.is_none());
            assert!(closest.distance_to_reference <= reference.distance_to(p(0.0, 0.0)));
            assert!(closest.distance_to_reference <= reference.distance_to(p(1200.0, 0.0)));
        }
    }

    #[test]
    fn point_closest_to_prefers_first_edge_on_ties() {
        // There and back again
        let a = p(0.0, 0.0);
        let b = p(100.0, 0.0);
        let r = Route::simple(vec![straight_edge(0, 1, a, b), straight_edge(1, 0, b, a)]);
        let closest = r.point_closest_to(p(50.0, 10.0));
        assert_eq!(closest.position, 50.0);
        assert_eq!(closest.distance_to_reference, 10.0);
    }

    #[test]
    fn composite() {
        let r = Route::composite(vec![
            straight_segment(0, 0.0, 1000.0),
            straight_segment(1, 1000.0, 2000.0),
            straight_segment(2, 2000.0, 3000.0),
        ]);

        assert!(r.is_composite());
        assert_eq!(r.segments().len(), 3);
        assert_eq!(r.length(), 3000.0);
        assert_eq!(r.positions(), &[0.0, 1000.0, 2000.0, 3000.0]);
        assert_eq!(r.edges().len(), 3);
        assert_eq!(
            r.points(),
            vec![p(0.0, 0.0), p(1000.0, 0.0), p(2000.0, 0.0), p(3000.0, 0.0)]
        );

        assert_eq!(r.point_at(1500.0), p(1500.0, 0.0));
        assert_eq!(r.point_at(3000.0), p(3000.0, 0.0));
        assert_eq!(r.node_closest_to(1400.0), 1);
        assert_eq!(r.node_closest_to(1600.0), 2);
        assert_eq!(r.node_closest_to(3000.0), 3);

        let closest = r.point_closest_to(p(2100.0, 50.0));
        assert_almost_eq!(closest.position, 2100.0);
        assert_almost_eq!(closest.distance_to_reference, 50.0);
    }

    #[test]
    fn index_of_segment_at() {
        let segments: Vec<_> = (0..3)
            .map(|i| straight_segment(i, 0.0, 1000.0))
            .cycle()
            .take(6)
            .collect();
        let r = Route::composite(segments);

        assert_eq!(r.length(), 6000.0);
        assert_eq!(r.index_of_segment_at(-1.0), 0);
        assert_eq!(r.index_of_segment_at(0.0), 0);
        assert_eq!(r.index_of_segment_at(999.0), 0);
        assert_eq!(r.index_of_segment_at(1000.0), 0);
        assert_eq!(r.index_of_segment_at(1000.5), 1);
        assert_eq!(r.index_of_segment_at(5500.0), 5);
        assert_eq!(r.index_of_segment_at(6000.0), 5);
        assert_eq!(r.index_of_segment_at(7000.0), 5);
    }

    #[test]
    fn index_of_segment_at_skips_zero_length_segments() {
        let stationary = Arc::new(Route::simple(vec![straight_edge(
            1,
            1,
            p(1000.0, 0.0),
            p(1000.0, 0.0),
        )]));
        let r = Route::composite(vec![
            straight_segment(0, 0.0, 1000.0),
            stationary,
            straight_segment(1, 1000.0, 2000.0),
        ]);

        assert_eq!(r.length(), 2000.0);
        assert_eq!(r.index_of_segment_at(500.0), 0);
        assert_eq!(r.index_of_segment_at(1000.0), 0);
        assert_eq!(r.index_of_segment_at(1500.0), 1);
        assert_eq!(r.index_of_segment_at(2000.0), 1);
        assert_eq!(r.points().len(), 3);
    }

    #[test]
    fn nested_composite() {
        let inner = Arc::new(Route::composite(vec![
            straight_segment(0, 0.0, 1000.0),
            straight_segment(1, 1000.0, 2000.0),
        ]));
        let r = Route::composite(vec![inner, straight_segment(2, 2000.0, 3000.0)]);

        assert_eq!(r.index_of_segment_at(500.0), 0);
        assert_eq!(r.index_of_segment_at(1500.0), 1);
        assert_eq!(r.index_of_segment_at(2500.0), 2);
        assert_eq!(r.points().len(), 4);
        assert_eq!(r.point_at(2500.0), p(2500.0, 0.0));
    }

    #[test]
    #[should_panic]
    fn empty_route_is_rejected() {
        Route::simple(Vec::new());
    }
}
