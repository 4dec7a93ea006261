// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

mod cancel;
mod cost;
mod error;
mod search;

pub use cancel::CancelToken;
pub use cost::{CostFunction, DistanceCost};
pub use error::{SearchError, DEFAULT_STEP_LIMIT};
pub use search::RouteComputer;
