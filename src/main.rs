// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::error::Error;
use std::path::{Path, PathBuf};

use clap::Parser;
use ridgeway::{DistanceCost, PointCh, RouteComputer};

#[derive(Debug, thiserror::Error)]
#[error("{0}: {1}")]
struct GraphLoadError(PathBuf, #[source] ridgeway::graph::LoadError);

#[derive(Debug, thiserror::Error)]
#[error("no node within {1} m of ({0:?})")]
struct NoNodeError(PointCh, f64);

#[derive(Parser)]
struct Cli {
    /// The directory with graph files
    graph_dir: PathBuf,

    /// East coordinate (LV95) of the start point
    start_e: f64,

    /// North coordinate (LV95) of the start point
    start_n: f64,

    /// East coordinate (LV95) of the end point
    end_e: f64,

    /// North coordinate (LV95) of the end point
    end_n: f64,

    /// How far (in meters) to look for the nodes closest to the start and end points
    #[arg(long, default_value_t = 1000.0)]
    search_distance: f64,

    /// Maximum distance (in meters) between samples of the elevation profile
    #[arg(long, default_value_t = ridgeway::DEFAULT_MAX_STEP_LENGTH, value_parser = positive_length)]
    max_step_length: f64,

    /// Log more details (repeat for even more)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn positive_length(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(format!("expected a positive number of meters, got {value}"))
    }
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    colog::default_builder()
        .filter_level(match cli.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        })
        .init();

    let g = load_graph(&cli.graph_dir)?;

    let start_point = PointCh::new(cli.start_e, cli.start_n);
    let start = g
        .node_closest_to(start_point, cli.search_distance)
        .ok_or(NoNodeError(start_point, cli.search_distance))?;

    let end_point = PointCh::new(cli.end_e, cli.end_n);
    let end = g
        .node_closest_to(end_point, cli.search_distance)
        .ok_or(NoNodeError(end_point, cli.search_distance))?;

    let Some(route) = RouteComputer::new(&g, DistanceCost).best_route_between(start, end)? else {
        log::error!("no route between nodes {} and {}", start, end);
        std::process::exit(1);
    };
    let profile = ridgeway::elevation_profile(&route, cli.max_step_length);

    println!("{{");
    println!("  \"type\": \"FeatureCollection\",");
    println!("  \"features\": [");
    println!("    {{");
    println!("      \"type\": \"Feature\",");
    println!("      \"properties\": {{");
    println!("        \"length\": {:.1},", route.length());
    println!("        \"ascent\": {:.1},", profile.total_ascent());
    println!("        \"descent\": {:.1},", profile.total_descent());
    println!("        \"min_elevation\": {:.1},", profile.min_elevation());
    println!("        \"max_elevation\": {:.1}", profile.max_elevation());
    println!("      }},");

    println!("      \"geometry\": {{");
    println!("        \"type\": \"LineString\",");
    println!("        \"coordinates\": [");

    let mut points = route.points().into_iter().peekable();
    while let Some(point) = points.next() {
        let (lon, lat) = point.to_wgs84();
        let suffix = if points.peek().is_some() { "," } else { "" };
        println!("          [{:.6}, {:.6}]{}", lon, lat, suffix);
    }

    println!("        ]");
    println!("      }}");
    println!("    }}");
    println!("  ]");
    println!("}}");

    Ok(())
}

fn load_graph<P: AsRef<Path>>(path: P) -> Result<ridgeway::Graph, GraphLoadError> {
    ridgeway::Graph::load_from(path.as_ref())
        .map_err(|e| GraphLoadError(PathBuf::from(path.as_ref()), e))
}
