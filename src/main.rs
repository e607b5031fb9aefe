use anyhow::{Context, Result, bail};
use clap::Parser;
use geo::coord;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Instant;

use sprayplan::commands::dispatch;
use sprayplan::config::{ExclusionMode, FileConfig};
use sprayplan::domain::DEFAULT_DRONE;
use sprayplan::export::{CsvExporter, GeoJsonExporter, RouteExporter};
use sprayplan::metrics::estimate;
use sprayplan::mission::{load_mission, load_mission_layers};
use sprayplan::planning::{flatten_paths, plan_coverage, raster_field_route};
use sprayplan::simulation::simulate;

/// Plan agricultural spraying missions and estimate drone resources
///
/// Examples:
///   # Plan a mission with the default drone
///   sprayplan -m field.json
///
///   # Pick a drone, clip zones out of cells instead of dropping them
///   sprayplan -m field.json -d "DJI Agras T30" --exclusion clip
///
///   # Also write a waypoint table and skip the battery/tank simulation
///   sprayplan -m field.json --csv paths.csv --no-simulate
///
///   # Field, zones and start point as separate GeoJSON files
///   sprayplan -m field.geojson --zones restrict_area.geojson --start-point point_start.geojson
///
///   # Simulate a back-and-forth spray pass instead of out-and-back paths
///   sprayplan -m field.json --raster
///
///   # Ask what the drone does on an operator command
///   sprayplan -m field.json --command return_to_base --at 420 180
#[derive(Parser, Debug)]
#[command(name = "sprayplan")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to config file (optional, auto-searches sprayplan.toml if not provided)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Mission document (field outline, restricted zones, start point)
    #[arg(short = 'm', long)]
    mission: Option<PathBuf>,

    /// Separate GeoJSON file with restricted zones (overrides the mission's)
    #[arg(long)]
    zones: Option<PathBuf>,

    /// Separate GeoJSON file with the start point (overrides the mission's)
    #[arg(long)]
    start_point: Option<PathBuf>,

    /// Drone model from the catalog
    #[arg(short = 'd', long)]
    drone: Option<String>,

    /// GeoJSON output for flight paths (defaults to flight_paths.geojson)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Optional CSV waypoint table
    #[arg(long)]
    csv: Option<PathBuf>,

    /// How restricted zones act on grid cells
    #[arg(long, value_enum)]
    exclusion: Option<ExclusionMode>,

    /// Skip the battery/tank route simulation
    #[arg(long)]
    no_simulate: bool,

    /// Simulate a boustrophedon spray pass over the field instead of the cell paths
    #[arg(long)]
    raster: bool,

    /// List catalog drones and exit
    #[arg(long)]
    list_drones: bool,

    /// Operator command to resolve: return_to_base, emergency_landing, hold_position
    #[arg(long)]
    command: Option<String>,

    /// Current drone position for --command, in projected meters
    #[arg(long, num_args = 2, value_names = ["X", "Y"], allow_hyphen_values = true)]
    at: Option<Vec<f64>>,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let total_start = Instant::now();

    let file_config = if let Some(ref config_path) = args.config {
        if config_path.exists() {
            let contents = std::fs::read_to_string(config_path)
                .context(format!("Failed to read config file: {:?}", config_path))?;
            Some(toml::from_str::<FileConfig>(&contents).context("Failed to parse config file")?)
        } else {
            bail!("Config file not found: {:?}", config_path);
        }
    } else {
        FileConfig::load()
    };
    let file_config = file_config.unwrap_or_default();

    let verbose = args.verbose || file_config.verbose;
    init_logging(verbose)?;

    let catalog = file_config.catalog().context("Invalid drone in config file")?;
    if args.list_drones {
        for name in catalog.names() {
            println!("{}", name);
        }
        return Ok(());
    }

    let drone_name = args.drone.clone().unwrap_or_else(|| {
        if file_config.drone.is_empty() {
            DEFAULT_DRONE.to_string()
        } else {
            file_config.drone.clone()
        }
    });
    let drone = catalog.get(&drone_name)?.clone();

    let mut policy = file_config.policy.clone().unwrap_or_default();
    if let Some(mode) = args.exclusion {
        policy = policy.with_exclusion_mode(mode);
    }
    policy.validate().context("Invalid planning policy")?;

    let Some(mission_path) = args.mission.clone().or_else(|| file_config.mission.clone()) else {
        bail!("Must provide a mission document with --mission/-m or in the config file");
    };
    let output_path = args
        .output
        .clone()
        .or_else(|| file_config.output.clone())
        .unwrap_or_else(|| PathBuf::from("flight_paths.geojson"));
    let csv_path = args.csv.clone().or_else(|| file_config.csv_output.clone());

    println!("sprayplan - Spraying Mission Planner");
    println!("====================================");
    println!();

    if verbose {
        println!("Configuration:");
        println!("  Mission: {}", mission_path.display());
        println!("  Drone: {}", drone.name);
        println!(
            "  Speed: {} m/s, tank: {} l, flight time: {} min, spray width: {} m",
            drone.speed_mps, drone.tank_capacity_l, drone.flight_time_min, drone.spray_width_m
        );
        println!("  Exclusion mode: {:?}", policy.exclusion_mode);
        println!("  Output: {}", output_path.display());
        println!();
    }

    let spinner = create_spinner("Loading mission...");
    let mission = if args.zones.is_some() || args.start_point.is_some() {
        load_mission_layers(&mission_path, args.zones.as_deref(), args.start_point.as_deref())
    } else {
        load_mission(&mission_path)
    };
    let area_ha = mission.field.area_hectares();
    spinner.finish_with_message(format!(
        "Field area: {:.2} ha, {} restricted zones",
        area_ha,
        mission.zones.len()
    ));

    let metrics = estimate(&drone, area_ha, &policy).context("Failed to estimate mission")?;
    println!();
    println!("Mission estimate ({}):", drone.name);
    println!("{}", metrics);
    println!();

    let spinner = create_spinner("Generating coverage grid...");
    let start = Instant::now();
    let plan = plan_coverage(&mission, &drone, &policy).context("Failed to plan coverage")?;
    spinner.finish_with_message(format!(
        "Grid: {} cells, {} kept after restricted zones ({} affected, {} invalid skipped) [{:.1}s]",
        plan.candidate_cells,
        plan.cells().len(),
        plan.filter.affected,
        plan.filter.invalid_cells + plan.filter.invalid_zones,
        start.elapsed().as_secs_f32()
    ));

    if mission.start.is_none() {
        println!("No start point in mission; skipping simulation and export.");
    } else if plan.paths.is_empty() {
        println!("No flyable cells; nothing to route.");
    }

    if let (false, Some(base)) = (args.no_simulate, mission.start) {
        let route = if args.raster {
            let pass = raster_field_route(&mission.field, &mission.zones, drone.spray_width_m, &policy)
                .context("Failed to build raster spray pass")?;
            if pass.is_empty() {
                Vec::new()
            } else {
                std::iter::once(base).chain(pass).chain(std::iter::once(base)).collect()
            }
        } else {
            flatten_paths(&plan.paths)
        };

        if !route.is_empty() {
            let spinner = create_spinner("Simulating battery and tank usage...");
            let start = Instant::now();
            let report =
                simulate(&drone, &route, base, &policy).context("Route cannot be flown")?;
            spinner.finish_with_message(format!(
                "Route: {:.0} m over {} legs, {} returns to base [{:.1}s]",
                report.total_distance_m,
                report.legs,
                report.returns_to_base,
                start.elapsed().as_secs_f32()
            ));
        }
    }

    let mut written = 0;
    if !plan.paths.is_empty() {
        let spinner = create_spinner("Exporting flight paths...");
        let exporter = GeoJsonExporter::new(mission.projector.clone());
        written = exporter
            .export(&plan.paths, &output_path)
            .context("Failed to write GeoJSON")?;
        if let Some(ref csv_path) = csv_path {
            CsvExporter::new(mission.projector.clone())
                .export(&plan.paths, csv_path)
                .context("Failed to write CSV")?;
        }
        spinner.finish_with_message(format!("Exported {} flight paths", written));
    }

    if let Some(ref command) = args.command {
        let base = mission.start.context("--command needs a mission start point")?;
        let position = match args.at.as_deref() {
            Some([x, y]) => coord! { x: *x, y: *y },
            _ => base,
        };
        let response = dispatch(command, position, base);
        println!();
        println!(
            "{} -> ({:.1}, {:.1})",
            response.status, response.target.x, response.target.y
        );
    }

    println!();
    println!(
        "Done! Total time: {:.1}s",
        total_start.elapsed().as_secs_f32()
    );
    if written > 0 {
        println!("Output: {}", output_path.display());
    }

    Ok(())
}

fn init_logging(verbose: bool) -> Result<()> {
    use tracing_subscriber::EnvFilter;

    let default_level = if verbose { "sprayplan=debug" } else { "sprayplan=warn" };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .context("Invalid log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}
