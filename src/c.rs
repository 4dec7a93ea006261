// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! C bindings for presentation layers.
//!
//! Objects returned by pointer are owned by the caller and must be released
//! with the matching `_delete` function. All functions accept NULL pointers,
//! returning NaN, -1 or NULL as appropriate.

use super::*;

use std::ffi::{c_char, CStr, OsStr};
use std::mem::ManuallyDrop;
use std::os::unix::ffi::OsStrExt;
use std::ptr::null_mut;
use std::slice;

#[inline]
fn node_id_to_c(id: Option<NodeId>) -> i64 {
    id.map(i64::from).unwrap_or(-1)
}

#[inline]
fn node_id_from_c(id: i64) -> NodeId {
    // Out-of-range ids are mapped to a non-existent node, so that searches
    // report them as invalid references.
    NodeId::try_from(id).unwrap_or(NodeId::MAX)
}

/// Loads a [Graph] from a directory, returning NULL on failure.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ridgeway_graph_load(c_dir: *const c_char) -> *mut Graph {
    if c_dir.is_null() {
        return null_mut();
    }

    let dir = OsStr::from_bytes(CStr::from_ptr(c_dir).to_bytes());
    match Graph::load_from(dir) {
        Ok(g) => Box::into_raw(Box::new(g)),
        Err(e) => {
            log::error!("{}", e);
            null_mut()
        }
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn ridgeway_graph_delete(ptr: *mut Graph) {
    if !ptr.is_null() {
        drop(Box::from_raw(ptr));
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn ridgeway_graph_node_count(graph: *const Graph) -> usize {
    graph.as_ref().map(|g| g.node_count()).unwrap_or(0)
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn ridgeway_graph_node_point(graph: *const Graph, node_id: i64) -> PointCh {
    graph
        .as_ref()
        .filter(|g| node_id >= 0 && (node_id as u64) < g.node_count() as u64)
        .map(|g| g.node_point(node_id as NodeId))
        .unwrap_or(PointCh::new(f64::NAN, f64::NAN))
}

/// Returns the id of the node closest to `point` within `search_distance` meters, or -1.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ridgeway_graph_node_closest_to(
    graph: *const Graph,
    point: PointCh,
    search_distance: f64,
) -> i64 {
    node_id_to_c(
        graph
            .as_ref()
            .and_then(|g| g.node_closest_to(point, search_distance)),
    )
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(C)]
pub enum CRouteResultType {
    Ok = 0,
    NoRoute = 1,
    InvalidReference = 2,
    StepLimitExceeded = 3,
}

#[derive(Clone, Copy)]
#[repr(C)]
pub struct CRouteResultInvalidReference {
    pub invalid_node_id: i64,
}

#[repr(C)]
pub union CRouteResultInner {
    pub ok: ManuallyDrop<*mut Route>,
    pub invalid_reference: CRouteResultInvalidReference,
    pub empty: (),
}

#[repr(C)]
pub struct CRouteResult {
    pub inner: CRouteResultInner,
    pub type_: CRouteResultType,
}

impl CRouteResult {
    fn ok(route: Route) -> Self {
        CRouteResult {
            inner: CRouteResultInner {
                ok: ManuallyDrop::new(Box::into_raw(Box::new(route))),
            },
            type_: CRouteResultType::Ok,
        }
    }

    fn invalid_reference(invalid_node_id: i64) -> Self {
        CRouteResult {
            inner: CRouteResultInner {
                invalid_reference: CRouteResultInvalidReference { invalid_node_id },
            },
            type_: CRouteResultType::InvalidReference,
        }
    }

    fn empty(type_: CRouteResultType) -> Self {
        CRouteResult {
            inner: CRouteResultInner { empty: () },
            type_,
        }
    }
}

/// Finds the shortest route between two nodes.
///
/// An `Ok` result owns its route, which must be released with [ridgeway_route_delete]
/// or [ridgeway_route_result_delete].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ridgeway_graph_find_route(
    graph: *const Graph,
    from_id: i64,
    to_id: i64,
    max_steps: usize,
) -> CRouteResult {
    let Some(graph) = graph.as_ref() else {
        return CRouteResult::empty(CRouteResultType::NoRoute);
    };

    let computer = RouteComputer::new(graph, DistanceCost).with_step_limit(max_steps);
    match computer.best_route_between(node_id_from_c(from_id), node_id_from_c(to_id)) {
        Ok(Some(route)) => CRouteResult::ok(route),
        Ok(None) => CRouteResult::empty(CRouteResultType::NoRoute),
        Err(SearchError::InvalidReference(_)) => {
            let graph_len = graph.node_count() as i64;
            let invalid = if (0..graph_len).contains(&from_id) { to_id } else { from_id };
            CRouteResult::invalid_reference(invalid)
        }
        Err(SearchError::StepLimitExceeded) | Err(SearchError::Cancelled) => {
            CRouteResult::empty(CRouteResultType::StepLimitExceeded)
        }
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn ridgeway_route_result_delete(result: CRouteResult) {
    match result.type_ {
        CRouteResultType::Ok => ridgeway_route_delete(ManuallyDrop::into_inner(result.inner.ok)),

        CRouteResultType::NoRoute
        | CRouteResultType::InvalidReference
        | CRouteResultType::StepLimitExceeded => {
            // Nothing to free
        }
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn ridgeway_route_delete(ptr: *mut Route) {
    if !ptr.is_null() {
        drop(Box::from_raw(ptr));
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn ridgeway_route_length(route: *const Route) -> f64 {
    route.as_ref().map(|r| r.length()).unwrap_or(f64::NAN)
}

/// Copies up to `capacity` points of the route into `out_points`,
/// returning the total number of points.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn ridgeway_route_points(
    route: *const Route,
    out_points: *mut PointCh,
    capacity: usize,
) -> usize {
    let Some(route) = route.as_ref() else {
        return 0;
    };

    let points = route.points();
    if !out_points.is_null() {
        let n = points.len().min(capacity);
        slice::from_raw_parts_mut(out_points, n).copy_from_slice(&points[..n]);
    }
    points.len()
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn ridgeway_route_point_at(route: *const Route, position: f64) -> PointCh {
    route
        .as_ref()
        .map(|r| r.point_at(position))
        .unwrap_or(PointCh::new(f64::NAN, f64::NAN))
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn ridgeway_route_elevation_at(route: *const Route, position: f64) -> f64 {
    route
        .as_ref()
        .map(|r| r.elevation_at(position))
        .unwrap_or(f64::NAN)
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn ridgeway_route_node_closest_to(route: *const Route, position: f64) -> i64 {
    node_id_to_c(route.as_ref().map(|r| r.node_closest_to(position)))
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn ridgeway_route_point_closest_to(
    route: *const Route,
    point: PointCh,
) -> RoutePoint {
    route
        .as_ref()
        .map(|r| r.point_closest_to(point))
        .unwrap_or(RoutePoint::NONE)
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn ridgeway_elevation_profile_new(
    route: *const Route,
    max_step_length: f64,
) -> *mut ElevationProfile {
    match route.as_ref() {
        Some(route) if max_step_length > 0.0 => {
            Box::into_raw(Box::new(elevation_profile(route, max_step_length)))
        }
        _ => null_mut(),
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn ridgeway_elevation_profile_delete(ptr: *mut ElevationProfile) {
    if !ptr.is_null() {
        drop(Box::from_raw(ptr));
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[repr(C)]
pub struct CElevationStatistics {
    pub length: f64,
    pub min_elevation: f64,
    pub max_elevation: f64,
    pub total_ascent: f64,
    pub total_descent: f64,
}

impl CElevationStatistics {
    const NAN: Self = Self {
        length: f64::NAN,
        min_elevation: f64::NAN,
        max_elevation: f64::NAN,
        total_ascent: f64::NAN,
        total_descent: f64::NAN,
    };
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn ridgeway_elevation_profile_statistics(
    profile: *const ElevationProfile,
) -> CElevationStatistics {
    profile
        .as_ref()
        .map(|p| CElevationStatistics {
            length: p.length(),
            min_elevation: p.min_elevation(),
            max_elevation: p.max_elevation(),
            total_ascent: p.total_ascent(),
            total_descent: p.total_descent(),
        })
        .unwrap_or(CElevationStatistics::NAN)
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn ridgeway_elevation_profile_elevation_at(
    profile: *const ElevationProfile,
    position: f64,
) -> f64 {
    profile
        .as_ref()
        .map(|p| p.elevation_at(position))
        .unwrap_or(f64::NAN)
}
