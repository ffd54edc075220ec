//! CableRoute CLI - cable route design and BS 7671 checks from the command line.

use anyhow::{bail, Context, Result};
use cableroute::clash::ClashSummary;
use cableroute::{
    CableRouteCore, Clash, ComplianceEvaluator, ComplianceStatus, GridPathFinder, Obstacle,
    PathResult, Point, RouteAnalysis, RouteSettings,
};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "cableroute")]
#[command(about = "Cable route pathfinding and BS 7671 compliance tool", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', action = clap::ArgAction::Count, global = true)]
    verbosity: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Route a cable and check the result
    Route {
        /// Path to a route request (.json)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Settings file (.json)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,

        /// Exit with error code if checks reach this status
        #[arg(long, value_enum)]
        fail_on: Option<FailOn>,
    },

    /// Find a path on a plane without running the checks
    Path {
        #[arg(long)]
        width: f64,

        #[arg(long)]
        height: f64,

        /// Start point as X,Y
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        start: Point,

        /// End point as X,Y
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        end: Point,

        /// Grid step; overrides the settings file
        #[arg(long)]
        grid_size: Option<f64>,

        /// Node expansions before giving up; overrides the settings file
        #[arg(long)]
        max_expansions: Option<usize>,

        /// Rectangular obstacle as X,Y,W,H (repeatable)
        #[arg(long = "obstacle", value_parser = parse_obstacle, allow_hyphen_values = true)]
        obstacles: Vec<Obstacle>,

        /// Settings file (.json)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,
    },

    /// List the compliance rules
    Rules {
        /// Show rule descriptions
        #[arg(long)]
        verbose: bool,
    },

    /// Detect clashes between building services elements
    Clash {
        /// Path to a JSON array of elements
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Settings file (.json)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output for CI/CD
    Json,
}

#[derive(Clone, ValueEnum)]
enum FailOn {
    /// Any failed check
    Fail,
    /// Any warning or failed check
    Warning,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbosity);

    let result = match cli.command {
        Commands::Route {
            file,
            config,
            format,
            fail_on,
        } => handle_route(&file, config.as_deref(), &format, fail_on.as_ref()),
        Commands::Path {
            width,
            height,
            start,
            end,
            grid_size,
            max_expansions,
            obstacles,
            config,
            format,
        } => {
            let plane = Plane {
                width,
                height,
                obstacles,
            };
            let overrides = SearchOverrides {
                grid_size,
                max_expansions,
            };
            handle_path(plane, start, end, overrides, config.as_deref(), &format)
        }
        Commands::Rules { verbose } => {
            handle_rules(verbose);
            Ok(0)
        }
        Commands::Clash {
            file,
            config,
            format,
        } => handle_clash(&file, config.as_deref(), &format),
    };

    let exit_code = match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            1
        }
    };

    process::exit(exit_code);
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_settings(config: Option<&Path>) -> Result<RouteSettings> {
    match config {
        Some(path) => RouteSettings::from_file(path)
            .with_context(|| format!("failed to load settings from {}", path.display())),
        None => Ok(RouteSettings::default()),
    }
}

fn parse_numbers(s: &str, expected: usize) -> std::result::Result<Vec<f64>, String> {
    let values = s
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid number in '{}': {}", s, e))?;
    if values.len() != expected {
        return Err(format!(
            "expected {} comma-separated numbers, got {}",
            expected,
            values.len()
        ));
    }
    Ok(values)
}

fn parse_point(s: &str) -> std::result::Result<Point, String> {
    let v = parse_numbers(s, 2)?;
    Ok(Point::new(v[0], v[1]))
}

fn parse_obstacle(s: &str) -> std::result::Result<Obstacle, String> {
    let v = parse_numbers(s, 4)?;
    Ok(Obstacle::new(v[0], v[1], v[2], v[3]))
}

fn handle_route(
    file: &Path,
    config: Option<&Path>,
    format: &OutputFormat,
    fail_on: Option<&FailOn>,
) -> Result<i32> {
    let settings = load_settings(config)?;
    let analysis = CableRouteCore::analyze_file(file, &settings)
        .with_context(|| format!("failed to analyse {}", file.display()))?;

    match format {
        OutputFormat::Human => output_route_human(file, &analysis),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&analysis)?),
    }

    let failed = match fail_on {
        Some(FailOn::Fail) => analysis.has_failures(),
        Some(FailOn::Warning) => analysis.has_warnings_or_failures(),
        None => false,
    };
    Ok(if failed { 1 } else { 0 })
}

fn status_label(status: ComplianceStatus) -> &'static str {
    match status {
        ComplianceStatus::Pass => "PASS",
        ComplianceStatus::Warning => "WARN",
        ComplianceStatus::Fail => "FAIL",
        ComplianceStatus::Info => "INFO",
    }
}

fn output_route_human(file: &Path, analysis: &RouteAnalysis) {
    println!("\nRoute: {}", analysis.name.as_deref().unwrap_or("unnamed"));
    println!("File:  {}", file.display());
    println!("{}", "─".repeat(60));

    match analysis.path.fallback_reason() {
        None => println!("\n  Path ({} vertices):", analysis.path.path().len()),
        Some(reason) => println!("\n  No routed path ({}); straight line used:", reason),
    }
    for point in &analysis.route_points {
        println!(
            "    {:<4} ({:.2}, {:.2}, {:.2}) m",
            point.label.as_deref().unwrap_or("-"),
            point.x,
            point.y,
            point.z
        );
    }

    let m = &analysis.metrics;
    println!("\n  Metrics:");
    println!("    Length:     {:.2} m", m.total_length);
    println!("    Bends:      {}", m.bend_count);
    println!("    Supports:   {}", m.support_count);
    println!("    Complexity: {}", m.complexity);
    println!("    Cost:       {:.2}", m.total_cost);

    println!("\n  Checks:");
    for check in &analysis.checks {
        println!(
            "    [{}] {}: {}",
            status_label(check.status),
            check.regulation,
            check.message
        );
        if let Some(ref suggestion) = check.suggestion {
            if check.status != ComplianceStatus::Pass {
                println!("           {}", suggestion);
            }
        }
    }

    let s = &analysis.summary;
    println!("\n  Summary:");
    println!("    Pass:    {}", s.pass);
    println!("    Warning: {}", s.warning);
    println!("    Fail:    {}", s.fail);
    println!("    Info:    {}", s.info);
}

struct Plane {
    width: f64,
    height: f64,
    obstacles: Vec<Obstacle>,
}

struct SearchOverrides {
    grid_size: Option<f64>,
    max_expansions: Option<usize>,
}

fn handle_path(
    plane: Plane,
    start: Point,
    end: Point,
    overrides: SearchOverrides,
    config: Option<&Path>,
    format: &OutputFormat,
) -> Result<i32> {
    let mut settings = load_settings(config)?;
    if let Some(grid_size) = overrides.grid_size {
        settings.pathfinding.grid_size = grid_size;
    }
    if let Some(max) = overrides.max_expansions {
        settings.pathfinding.max_expansions = Some(max);
    }

    let finder = CableRouteCore::grid_path_finder(
        plane.width,
        plane.height,
        plane.obstacles,
        &settings.pathfinding,
    )?;
    let result = finder.find_path(start, end);

    match format {
        OutputFormat::Human => output_path_human(&finder, &result),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
    }
    Ok(0)
}

fn output_path_human(finder: &GridPathFinder, result: &PathResult) {
    println!(
        "Grid {} with {} obstacles",
        finder.grid_size(),
        finder.obstacles().len()
    );
    match result {
        PathResult::Found { path } => println!("Path found ({} vertices):", path.len()),
        PathResult::Fallback { reason, .. } => {
            println!("No path found ({}); straight line:", reason)
        }
    }
    for point in result.path() {
        println!("  ({}, {})", point.x, point.y);
    }
}

fn handle_rules(verbose: bool) {
    println!("Available compliance rules:\n");

    let evaluator = ComplianceEvaluator::with_default_rules();
    for rule in evaluator.rules() {
        println!("  {}", rule.id());
        println!("    {}", rule.regulation());
        if verbose {
            println!("    {}", rule.description());
        }
        println!();
    }
}

fn handle_clash(file: &Path, config: Option<&Path>, format: &OutputFormat) -> Result<i32> {
    if !file.exists() {
        bail!("file not found: {}", file.display());
    }
    let settings = load_settings(config)?;
    let clashes = CableRouteCore::check_clashes_file(file, &settings)
        .with_context(|| format!("failed to check {}", file.display()))?;
    let summary = ClashSummary::from_clashes(&clashes);

    match format {
        OutputFormat::Human => output_clashes_human(&clashes, &summary),
        OutputFormat::Json => {
            let output = serde_json::json!({
                "clashes": clashes,
                "summary": summary,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(0)
}

fn output_clashes_human(clashes: &[Clash], summary: &ClashSummary) {
    if clashes.is_empty() {
        println!("No clashes found");
        return;
    }

    for clash in clashes {
        println!(
            "  [{:?}] {} ({}) x {} ({}): {:.1} deep",
            clash.severity,
            clash.element_a,
            clash.discipline_a,
            clash.element_b,
            clash.discipline_b,
            clash.penetration_depth
        );
    }

    println!("\n  Summary:");
    println!("    Critical: {}", summary.critical);
    println!("    Major:    {}", summary.major);
    println!("    Minor:    {}", summary.minor);
}
