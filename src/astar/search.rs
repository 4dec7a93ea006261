// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use super::{CancelToken, CostFunction, SearchError, DEFAULT_STEP_LIMIT};
use crate::{Edge, EdgeId, Graph, NodeId, Route};

#[derive(Debug, Clone, Copy)]
struct QueueItem {
    at: NodeId,
    cost: f64,
    score: f64,
}

impl PartialEq for QueueItem {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueItem {}

impl PartialOrd for QueueItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueItem {
    fn cmp(&self, other: &Self) -> Ordering {
        // NOTE: The order of comparison is reverted, as lower scores (and lower node ids
        // on equal scores) are considered better ("higher"), and Rust's BinaryHeap is a max-heap.
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| other.at.cmp(&self.at))
    }
}

/// Finds the best routes between nodes of a [Graph], according to a [CostFunction].
#[derive(Debug, Clone)]
pub struct RouteComputer<'g, C> {
    graph: &'g Graph,
    cost: C,
    step_limit: usize,
}

impl<'g, C: CostFunction> RouteComputer<'g, C> {
    pub fn new(graph: &'g Graph, cost: C) -> Self {
        Self {
            graph,
            cost,
            step_limit: DEFAULT_STEP_LIMIT,
        }
    }

    /// Limits how many nodes may be expanded by a single search
    /// before returning [SearchError::StepLimitExceeded].
    pub fn with_step_limit(mut self, step_limit: usize) -> Self {
        self.step_limit = step_limit;
        self
    }

    pub fn graph(&self) -> &'g Graph {
        self.graph
    }

    /// Uses the [A* algorithm](https://en.wikipedia.org/wiki/A*_search_algorithm)
    /// to find the cheapest route from `from` to `to`.
    ///
    /// Returns `Ok(None)` if `to` can't be reached from `from`. If both nodes are the same,
    /// the result is a route with a single, zero-length edge.
    ///
    /// The straight-line distance to `to` is only used as a heuristic when the
    /// [CostFunction] is [distance-bounded](CostFunction::distance_bounded); otherwise
    /// nodes are expanded in plain Dijkstra order. Among equally good candidates
    /// the node with the lowest id is expanded first, and a node's predecessor is only
    /// replaced by a strictly cheaper one, so results are deterministic.
    pub fn best_route_between(&self, from: NodeId, to: NodeId) -> Result<Option<Route>, SearchError> {
        self.search(from, to, None)
    }

    /// Same as [RouteComputer::best_route_between], but the search stops with
    /// [SearchError::Cancelled] once `cancel` is triggered.
    pub fn best_route_between_cancellable(
        &self,
        from: NodeId,
        to: NodeId,
        cancel: &CancelToken,
    ) -> Result<Option<Route>, SearchError> {
        self.search(from, to, Some(cancel))
    }

    fn search(
        &self,
        from: NodeId,
        to: NodeId,
        cancel: Option<&CancelToken>,
    ) -> Result<Option<Route>, SearchError> {
        let g = self.graph;
        let node_count = g.node_count();
        for id in [from, to] {
            if id as usize >= node_count {
                return Err(SearchError::InvalidReference(id));
            }
        }

        if from == to {
            return Ok(Some(Route::simple(vec![Edge::stationary(g, from)])));
        }

        let to_point = g.node_point(to);
        let scale = if self.cost.distance_bounded() { g.heuristic_scale() } else { 0.0 };
        let heuristic = |node: NodeId| {
            if scale > 0.0 {
                scale * g.node_point(node).distance_to(to_point)
            } else {
                0.0
            }
        };

        let mut queue: BinaryHeap<QueueItem> = BinaryHeap::default();
        let mut came_from: Vec<Option<(NodeId, EdgeId)>> = vec![None; node_count];
        let mut known_costs: Vec<f64> = vec![f64::INFINITY; node_count];
        let mut steps: usize = 0;

        known_costs[from as usize] = 0.0;
        queue.push(QueueItem {
            at: from,
            cost: 0.0,
            score: heuristic(from),
        });

        while let Some(item) = queue.pop() {
            if item.at == to {
                log::debug!("route {} -> {} found after {} steps", from, to, steps);
                return Ok(Some(reconstruct_route(g, &came_from, to)));
            }

            // Multiple items for the same node may be present in the queue - skip outdated ones.
            if item.cost > known_costs[item.at as usize] {
                continue;
            }

            if cancel.is_some_and(CancelToken::is_cancelled) {
                log::debug!("route {} -> {} cancelled after {} steps", from, to, steps);
                return Err(SearchError::Cancelled);
            }

            steps += 1;
            if steps > self.step_limit {
                log::warn!("route {} -> {}: step limit of {} exceeded", from, to, self.step_limit);
                return Err(SearchError::StepLimitExceeded);
            }

            for edge_id in g.node_out_edges(item.at) {
                let edge_cost = self.cost.cost(edge_id, g.edge_length(edge_id));
                if !edge_cost.is_finite() {
                    continue;
                }
                debug_assert!(edge_cost >= 0.0, "negative cost of edge {edge_id}");

                let neighbor = g.edge_target_node_id(edge_id);
                let neighbor_cost = item.cost + edge_cost;
                if neighbor_cost >= known_costs[neighbor as usize] {
                    continue;
                }

                came_from[neighbor as usize] = Some((item.at, edge_id));
                known_costs[neighbor as usize] = neighbor_cost;
                queue.push(QueueItem {
                    at: neighbor,
                    cost: neighbor_cost,
                    score: neighbor_cost + heuristic(neighbor),
                });
            }
        }

        log::debug!("no route {} -> {} (exhausted after {} steps)", from, to, steps);
        Ok(None)
    }
}

fn reconstruct_route(g: &Graph, came_from: &[Option<(NodeId, EdgeId)>], mut last: NodeId) -> Route {
    let mut edges = Vec::new();

    while let Some((prev, edge_id)) = came_from[last as usize] {
        edges.push(Edge::of(g, edge_id, prev, last));
        last = prev;
    }

    edges.reverse();
    Route::simple(edges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{line_with_shortcut, TestGraphBuilder};
    use crate::DistanceCost;

    fn node_ids(route: &Route) -> Vec<NodeId> {
        let edges = route.edges();
        let mut ids = vec![edges[0].from_node_id];
        ids.extend(edges.iter().map(|e| e.to_node_id));
        ids
    }

    #[test]
    fn shortest_route() {
        let g = line_with_shortcut();
        let computer = RouteComputer::new(&g, DistanceCost);

        let route = computer.best_route_between(0, 3).unwrap().unwrap();
        assert_eq!(node_ids(&route), vec![0, 1, 2, 3]);
        assert_eq!(route.length(), 300.0);
        assert!(!route.is_composite());
    }

    #[test]
    fn shortest_route_one_way() {
        let g = line_with_shortcut();
        let computer = RouteComputer::new(&g, DistanceCost);

        // The shortcut can't be used backwards
        let route = computer.best_route_between(3, 0).unwrap().unwrap();
        assert_eq!(node_ids(&route), vec![3, 2, 1, 0]);
    }

    #[test]
    fn custom_cost() {
        let g = line_with_shortcut();
        let expensive_road = g
            .node_out_edges(1)
            .find(|&e| g.edge_target_node_id(e) == 2)
            .unwrap();
        let computer = RouteComputer::new(&g, |edge_id: EdgeId, length: f64| {
            if edge_id == expensive_road {
                f64::INFINITY
            } else {
                length
            }
        });

        let route = computer.best_route_between(0, 3).unwrap().unwrap();
        assert_eq!(node_ids(&route), vec![0, 3]);
        assert_eq!(route.length(), 350.0);
    }

    #[test]
    fn no_route() {
        let mut b = TestGraphBuilder::new();
        let a = b.node(0.0, 0.0);
        let c = b.node(100.0, 0.0);
        let isolated = b.node(0.0, 100.0);
        b.road(a, c);
        let g = b.build();

        let computer = RouteComputer::new(&g, DistanceCost);
        assert_eq!(computer.best_route_between(a, isolated), Ok(None));
        assert_eq!(computer.best_route_between(isolated, c), Ok(None));
    }

    #[test]
    fn same_node() {
        let g = line_with_shortcut();
        let computer = RouteComputer::new(&g, DistanceCost);

        let route = computer.best_route_between(2, 2).unwrap().unwrap();
        assert_eq!(route.length(), 0.0);
        assert_eq!(route.edges().len(), 1);
        assert_eq!(route.edges()[0].from_node_id, 2);
        assert_eq!(route.edges()[0].to_node_id, 2);
        assert_eq!(route.elevation_at(0.0), 0.0);
    }

    #[test]
    fn invalid_reference() {
        let g = line_with_shortcut();
        let computer = RouteComputer::new(&g, DistanceCost);

        assert_eq!(
            computer.best_route_between(0, 4),
            Err(SearchError::InvalidReference(4)),
        );
        assert_eq!(
            computer.best_route_between(42, 0),
            Err(SearchError::InvalidReference(42)),
        );
    }

    #[test]
    fn step_limit() {
        let g = line_with_shortcut();
        let computer = RouteComputer::new(&g, DistanceCost).with_step_limit(1);

        assert_eq!(
            computer.best_route_between(3, 0),
            Err(SearchError::StepLimitExceeded),
        );
    }

    #[test]
    fn cancelled() {
        let g = line_with_shortcut();
        let computer = RouteComputer::new(&g, DistanceCost);
        let cancel = CancelToken::new();

        assert!(computer.best_route_between_cancellable(0, 3, &cancel).unwrap().is_some());

        cancel.cancel();
        assert_eq!(
            computer.best_route_between_cancellable(0, 3, &cancel),
            Err(SearchError::Cancelled),
        );
    }

    #[test]
    fn equal_cost_prefers_lower_node_ids() {
        let mut b = TestGraphBuilder::new();
        let start = b.node(0.0, 0.0);
        let north = b.node(100.0, 100.0);
        let south = b.node(100.0, -100.0);
        let end = b.node(200.0, 0.0);
        b.edge(start, south).edge(start, north).edge(north, end).edge(south, end);
        let g = b.build();

        for bounded in [true, false] {
            let route = if bounded {
                RouteComputer::new(&g, DistanceCost).best_route_between(start, end)
            } else {
                RouteComputer::new(&g, |_: EdgeId, length: f64| length).best_route_between(start, end)
            };
            assert_eq!(node_ids(&route.unwrap().unwrap()), vec![start, north, end]);
        }
    }

    #[test]
    fn edges_shorter_than_straight_line() {
        let mut b = TestGraphBuilder::new();
        let s = b.node(0.0, 0.0);
        let t = b.node(0.0, 100.0);
        let x = b.node(1000.0, 0.0);
        b.edge_with(s, t, 100.0, vec![])
            .edge_with(s, x, 10.0, vec![])
            .edge_with(x, t, 10.0, vec![]);
        let g = b.build();

        let shortest = RouteComputer::new(&g, DistanceCost)
            .best_route_between(s, t)
            .unwrap()
            .unwrap();
        let dijkstra = RouteComputer::new(&g, |_: EdgeId, length: f64| length)
            .best_route_between(s, t)
            .unwrap()
            .unwrap();

        assert_eq!(node_ids(&shortest), vec![s, x, t]);
        assert_eq!(shortest.length(), 20.0);
        assert_eq!(shortest, dijkstra);
    }

    #[test]
    fn deterministic() {
        let g = line_with_shortcut();
        let computer = RouteComputer::new(&g, DistanceCost);

        let first = computer.best_route_between(0, 3).unwrap();
        for _ in 0..10 {
            assert_eq!(computer.best_route_between(0, 3).unwrap(), first);
        }
    }
}
