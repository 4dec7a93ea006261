// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

mod edge;
mod route;
mod route_point;

pub use edge::Edge;
pub use route::Route;
pub use route_point::RoutePoint;
