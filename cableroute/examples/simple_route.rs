//! Simple route example: analyse a route request and print the results.

use cableroute::prelude::*;
use std::path::Path;

fn main() -> Result<(), CableRouteError> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "tests/fixtures/plant_room_route.json".to_string());
    let path = Path::new(&path);

    if !path.exists() {
        eprintln!("File not found: {}", path.display());
        eprintln!("Usage: cargo run --example simple_route [path/to/route.json]");
        std::process::exit(1);
    }

    let analysis = CableRouteCore::analyze_file(path, &RouteSettings::default())?;

    println!("Route: {}", analysis.name.as_deref().unwrap_or("unnamed"));
    if let Some(reason) = analysis.path.fallback_reason() {
        println!("No routed path ({}); using a straight line", reason);
    }
    for point in &analysis.route_points {
        println!(
            "  {} ({:.2}, {:.2}, {:.2})",
            point.label.as_deref().unwrap_or("-"),
            point.x,
            point.y,
            point.z
        );
    }

    let metrics = &analysis.metrics;
    println!();
    println!("Length:     {:.2} m", metrics.total_length);
    println!("Bends:      {}", metrics.bend_count);
    println!("Supports:   {}", metrics.support_count);
    println!("Complexity: {}", metrics.complexity);
    println!("Cost:       {:.2}", metrics.total_cost);

    if analysis.has_failures() {
        println!("\nRoute has compliance failures.");
        std::process::exit(1);
    }

    println!("\nRoute passed compliance checks.");
    Ok(())
}
