// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::{NodeId, PointCh};

/// KDTree implements the [k-d tree data structure](https://en.wikipedia.org/wiki/K-d_tree)
/// over node positions, used to answer nearest-node queries for waypoints
/// without scanning the whole [Graph](crate::Graph).
#[derive(Debug, Clone)]
pub struct KDTree {
    pivot: (NodeId, PointCh),
    left: Option<Box<KDTree>>,
    right: Option<Box<KDTree>>,
}

impl KDTree {
    /// Finds the node closest to the given point, returning its id and squared distance.
    ///
    /// Equidistant nodes are resolved in favor of the lowest id.
    pub fn find_nearest_node(&self, point: PointCh) -> (NodeId, f64) {
        self.find_nearest_node_impl(point, false)
    }

    fn find_nearest_node_impl(&self, point: PointCh, n_divides: bool) -> (NodeId, f64) {
        // Start by assuming that pivot is the closest
        let mut best = self.pivot.0;
        let mut best_dist = point.squared_distance_to(self.pivot.1);

        // Select which branch to recurse into first
        let first_left = if n_divides {
            point.n < self.pivot.1.n
        } else {
            point.e < self.pivot.1.e
        };
        let (first, second) = if first_left {
            (&self.left, &self.right)
        } else {
            (&self.right, &self.left)
        };

        // Recurse into the first branch
        if let Some(ref branch) = first {
            let (alt, alt_dist) = branch.find_nearest_node_impl(point, !n_divides);
            if is_better(alt, alt_dist, best, best_dist) {
                best = alt;
                best_dist = alt_dist;
            }
        }

        // (Optionally) recurse into the second branch
        if let Some(ref branch) = second {
            // A closer (or equally close) node is possible in the second branch if and only if
            // the splitting axis is not farther than the current best candidate.
            let to_axis = if n_divides {
                point.n - self.pivot.1.n
            } else {
                point.e - self.pivot.1.e
            };

            if to_axis * to_axis <= best_dist {
                let (alt, alt_dist) = branch.find_nearest_node_impl(point, !n_divides);
                if is_better(alt, alt_dist, best, best_dist) {
                    best = alt;
                    best_dist = alt_dist;
                }
            }
        }

        (best, best_dist)
    }

    /// Builds a k-d tree from an iterable of node ids and their positions.
    pub fn from_iter<I: IntoIterator<Item = (NodeId, PointCh)>>(nodes: I) -> Option<Self> {
        let mut nodes = nodes.into_iter().collect::<Vec<_>>();
        Self::build(nodes.as_mut_slice())
    }

    /// Builds a k-d tree from a mutable slice of nodes. Nodes will be reordered
    /// in the slice to facilitate building the tree.
    pub fn build(nodes: &mut [(NodeId, PointCh)]) -> Option<Self> {
        Self::build_impl(nodes, false)
    }

    fn build_impl(nodes: &mut [(NodeId, PointCh)], n_divides: bool) -> Option<Self> {
        match nodes.len() {
            0 => None,
            1 => Some(Self {
                pivot: nodes[0],
                left: None,
                right: None,
            }),
            _ => {
                if n_divides {
                    nodes.sort_by(|a, b| a.1.n.total_cmp(&b.1.n));
                } else {
                    nodes.sort_by(|a, b| a.1.e.total_cmp(&b.1.e));
                }
                let median = nodes.len() / 2;
                let pivot = nodes[median];
                let (left, right_and_pivot) = nodes.split_at_mut(median);
                let right = &mut right_and_pivot[1..];
                Some(Self {
                    pivot,
                    left: Self::build_impl(left, !n_divides).map(Box::new),
                    right: Self::build_impl(right, !n_divides).map(Box::new),
                })
            }
        }
    }
}

#[inline]
fn is_better(id: NodeId, dist: f64, best: NodeId, best_dist: f64) -> bool {
    dist < best_dist || (dist == best_dist && id < best)
}
