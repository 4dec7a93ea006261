// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Routing over a compact, read-only binary road graph, with elevation profiles.
//!
//! A [Graph] is loaded once from a directory of binary tables (nodes, edges,
//! per-edge elevation profiles and attribute sets) and then shared read-only.
//! [RouteComputer] finds the best [Route] between two nodes according to a
//! pluggable [CostFunction], and [elevation_profile] resamples the elevation along
//! a route. [RouteAssembler] keeps a route through a list of waypoints up to date,
//! memoizing computed segments in a [RouteCache].
//!
//! Coordinates are planar (Swiss LV95 east/north, in meters), see [PointCh].
//!
//! # Example
//!
//! ```no_run
//! use ridgeway::{DistanceCost, Graph, PointCh, RouteComputer};
//!
//! let g = Graph::load_from("path/to/graph").expect("failed to load the graph");
//! let start = g.node_closest_to(PointCh::new(2_532_697.0, 1_152_350.0), 500.0).unwrap();
//! let end = g.node_closest_to(PointCh::new(2_538_659.0, 1_154_350.0), 500.0).unwrap();
//!
//! let route = RouteComputer::new(&g, DistanceCost)
//!     .best_route_between(start, end)
//!     .expect("search failed")
//!     .expect("no route");
//! let profile = ridgeway::elevation_profile(&route, ridgeway::DEFAULT_MAX_STEP_LENGTH);
//!
//! println!("{:.0} m, {:.0} m up", route.length(), profile.total_ascent());
//! ```

mod assembler;
mod astar;
pub mod bits;
pub mod c;
mod cache;
mod functions;
pub mod graph;
mod kd;
mod point;
mod profile;
pub mod q28_4;
mod routing;

#[cfg(test)]
mod test_utils;

pub use assembler::{RouteAssembler, Waypoint};
pub use astar::{
    CancelToken, CostFunction, DistanceCost, RouteComputer, SearchError, DEFAULT_STEP_LIMIT,
};
pub use cache::{RouteCache, DEFAULT_CACHE_CAPACITY};
pub use functions::ElevationFunction;
pub use graph::{AttributeSet, Graph};
pub use kd::KDTree;
pub use point::PointCh;
pub use profile::{elevation_profile, ElevationProfile, DEFAULT_MAX_STEP_LENGTH};
pub use routing::{Edge, Route, RoutePoint};

/// Identifier of a node of a [Graph]: an index into its node table.
pub type NodeId = u32;

/// Identifier of an edge of a [Graph]: an index into its edge table.
pub type EdgeId = u32;
