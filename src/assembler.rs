// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use crate::{
    elevation_profile, CancelToken, CostFunction, ElevationProfile, Graph, NodeId, PointCh, Route,
    RouteCache, RouteComputer, SearchError, DEFAULT_MAX_STEP_LENGTH,
};

/// A point chosen by the user, together with the graph node it was resolved to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    pub point: PointCh,
    pub node_id: NodeId,
}

impl Waypoint {
    pub fn new(point: PointCh, node_id: NodeId) -> Self {
        Self { point, node_id }
    }

    /// Resolves `point` to the closest node of the graph within `search_distance` meters.
    pub fn closest_to(graph: &Graph, point: PointCh, search_distance: f64) -> Option<Self> {
        graph
            .node_closest_to(point, search_distance)
            .map(|node_id| Self { point, node_id })
    }
}

/// Keeps a route through an ordered list of [waypoints](Waypoint) up to date.
///
/// Every pair of consecutive waypoints resolved to different nodes contributes one segment
/// of the assembled, composite [Route]; pairs resolved to the same node contribute nothing.
/// Segments are computed through a [RouteCache], so changing some waypoints
/// only recomputes the segments whose ends have changed.
///
/// The route (and its [ElevationProfile]) is absent if there are fewer than 2 waypoints,
/// if all waypoints resolve to a single node, or if any segment can't be routed.
#[derive(Debug)]
pub struct RouteAssembler<'g, C> {
    computer: RouteComputer<'g, C>,
    cache: RouteCache,
    max_step_length: f64,
    waypoints: Vec<Waypoint>,
    route: Option<Arc<Route>>,
    profile: Option<ElevationProfile>,
}

impl<'g, C: CostFunction> RouteAssembler<'g, C> {
    pub fn new(computer: RouteComputer<'g, C>) -> Self {
        Self::with_cache(computer, RouteCache::default())
    }

    pub fn with_cache(computer: RouteComputer<'g, C>, cache: RouteCache) -> Self {
        Self {
            computer,
            cache,
            max_step_length: DEFAULT_MAX_STEP_LENGTH,
            waypoints: Vec::new(),
            route: None,
            profile: None,
        }
    }

    /// Sets the maximum distance between samples of computed elevation profiles.
    pub fn with_max_step_length(mut self, max_step_length: f64) -> Self {
        assert!(max_step_length > 0.0, "max step length must be positive");
        self.max_step_length = max_step_length;
        self
    }

    pub fn cache(&self) -> &RouteCache {
        &self.cache
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn route(&self) -> Option<&Arc<Route>> {
        self.route.as_ref()
    }

    pub fn elevation_profile(&self) -> Option<&ElevationProfile> {
        self.profile.as_ref()
    }

    /// Replaces the waypoints and recomputes the route.
    ///
    /// On error, the route and profile are cleared.
    pub fn set_waypoints(&mut self, waypoints: Vec<Waypoint>) -> Result<(), SearchError> {
        self.waypoints = waypoints;
        self.recompute()
    }

    /// Replaces the waypoints and recomputes the route, giving up with
    /// [SearchError::Cancelled] once `cancel` is set.
    ///
    /// On error, the route and profile are cleared.
    pub fn set_waypoints_cancellable(
        &mut self,
        waypoints: Vec<Waypoint>,
        cancel: &CancelToken,
    ) -> Result<(), SearchError> {
        self.waypoints = waypoints;
        self.recompute_cancellable(cancel)
    }

    /// Recomputes the route and elevation profile for the current waypoints.
    pub fn recompute(&mut self) -> Result<(), SearchError> {
        self.recompute_with(None)
    }

    /// Like [RouteAssembler::recompute], but searches for missing segments give up
    /// with [SearchError::Cancelled] once `cancel` is set. Cached segments are still used.
    pub fn recompute_cancellable(&mut self, cancel: &CancelToken) -> Result<(), SearchError> {
        self.recompute_with(Some(cancel))
    }

    fn recompute_with(&mut self, cancel: Option<&CancelToken>) -> Result<(), SearchError> {
        self.route = None;
        self.profile = None;

        let mut segments = Vec::with_capacity(self.waypoints.len().saturating_sub(1));
        for pair in self.waypoints.windows(2) {
            let (from, to) = (pair[0].node_id, pair[1].node_id);
            if from == to {
                continue;
            }

            let segment = self.cache.get_or_compute(from, to, || match cancel {
                Some(cancel) => self.computer.best_route_between_cancellable(from, to, cancel),
                None => self.computer.best_route_between(from, to),
            })?;

            match segment {
                Some(segment) => segments.push(segment),
                None => {
                    log::info!("no route between waypoints {} -> {}", from, to);
                    return Ok(());
                }
            }
        }

        if segments.is_empty() {
            return Ok(());
        }

        let route = Route::composite(segments);
        self.profile = Some(elevation_profile(&route, self.max_step_length));
        log::debug!(
            "assembled route through {} waypoints: {:.1} m",
            self.waypoints.len(),
            route.length(),
        );
        self.route = Some(Arc::new(route));
        Ok(())
    }

    /// Maps a position on the route to the index of the waypoint pair whose segment
    /// contains it. Pairs of waypoints resolved to the same node are accounted for,
    /// even though they have no segment of their own.
    ///
    /// Returns `None` if there's no route.
    pub fn index_of_non_empty_segment_at(&self, position: f64) -> Option<usize> {
        let route = self.route.as_ref()?;
        let mut index = route.index_of_segment_at(position);

        let mut i = 0;
        while i <= index && i + 1 < self.waypoints.len() {
            if self.waypoints[i].node_id == self.waypoints[i + 1].node_id {
                index += 1;
            }
            i += 1;
        }

        Some(index)
    }

    /// Clamps a position to the route, or returns `None` if there's no route.
    pub fn clamp_position(&self, position: f64) -> Option<f64> {
        self.route
            .as_ref()
            .map(|route| position.clamp(0.0, route.length()))
    }
}
