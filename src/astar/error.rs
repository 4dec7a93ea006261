// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::NodeId;

/// Recommended number of allowed node expansions in
/// [RouteComputer::best_route_between](crate::RouteComputer::best_route_between)
/// before [SearchError::StepLimitExceeded] is returned.
pub const DEFAULT_STEP_LIMIT: usize = 1_000_000;

/// Error conditions which may occur during a route search.
///
/// Note that the absence of a route is not an error - searches return `Ok(None)` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// The start or end nodes don't exist in a graph.
    #[error("invalid node: {0}")]
    InvalidReference(NodeId),

    /// Route search has exceeded its limit of steps.
    ///
    /// Concluding that no route exists requires traversing everything reachable
    /// from the start, which can take very long on large graphs. The step limit
    /// protects against resource exhaustion.
    #[error("step limit exceeded")]
    StepLimitExceeded,

    /// The search was abandoned through its [CancelToken](crate::CancelToken).
    #[error("search cancelled")]
    Cancelled,
}
