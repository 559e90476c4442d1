use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::Parser;
use debris_capture::base::state::StateVector;
use debris_capture::config::{MissionConfig, default_catalog, load_catalog, load_mission_config};
use debris_capture::export::open_output;
use debris_capture::mission::{Orchestrator, Simulation};
use debris_capture::{logging, report};
use tracing::info;

/// Simulate a debris capture mission from payload separation to re-entry.
#[derive(Parser, Debug)]
#[command(author, version, about = "Debris capture mission simulator")]
struct Cli {
    /// Simulated duration in seconds (defaults to the configuration)
    #[arg(long)]
    duration: Option<f64>,

    /// Time step in seconds (defaults to the configuration)
    #[arg(long)]
    dt: Option<f64>,

    /// Mission configuration file (YAML or TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Debris catalog file (YAML list or TOML `[[debris]]` tables)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Initial stage position in metres
    #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], allow_negative_numbers = true)]
    start: Option<Vec<f64>>,

    /// Write per-tick telemetry CSV to this path (`-` for stdout)
    #[arg(long)]
    telemetry_csv: Option<PathBuf>,

    /// Write a JSON run summary to this path (`-` for stdout)
    #[arg(long)]
    summary_json: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    logging::init("info");
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_mission_config(path)
            .with_context(|| format!("loading configuration {}", path.display()))?,
        None => MissionConfig::default(),
    };
    let catalog = match &cli.catalog {
        Some(path) => load_catalog(path)
            .with_context(|| format!("loading catalog {}", path.display()))?,
        None => default_catalog(),
    };
    let duration = cli.duration.unwrap_or(config.simulation.duration_s);
    let dt = cli.dt.unwrap_or(config.simulation.dt_s);
    if !(duration.is_finite() && duration > 0.0) {
        bail!("--duration must be positive, got {duration}");
    }
    if !(dt.is_finite() && dt > 0.0) {
        bail!("--dt must be positive, got {dt}");
    }
    let start = match cli.start.as_deref() {
        Some([x, y, z]) => [*x, *y, *z],
        Some(_) => bail!("--start takes exactly three values"),
        None => [0.0; 3],
    };

    let mut orchestrator = Orchestrator::new(config)?;
    orchestrator.set_catalog(catalog)?;

    println!("{}", "=".repeat(60));
    println!("DEBRIS CAPTURE MISSION");
    println!("{}", "=".repeat(60));
    println!("Catalog : {} object(s)", orchestrator.catalog().len());
    println!("Run     : {duration}s @ dt={dt}s\n");
    info!(duration, dt, "simulation started");

    let sim = Simulation::new(orchestrator, StateVector::new(start, [0.0; 3]));
    let report = sim.run(duration, dt)?;

    if let Some(target) = &report.target {
        println!(
            "Target  : [{:.1}, {:.1}, {:.1}] m, mass {} kg",
            target.pos[0], target.pos[1], target.pos[2], target.mass_kg
        );
    }
    for event in &report.phases {
        println!(
            "t={:6.1}s | Phase: {:20} | dist={:>10} | u_norm={:.4}",
            event.time_s,
            event.phase.as_str(),
            event
                .distance_m
                .map(|d| format!("{d:.2}m"))
                .unwrap_or_else(|| "-".to_string()),
            event.accel_norm_m_s2,
        );
    }

    println!("\n{}", "=".repeat(60));
    if report.completed() {
        println!("MISSION COMPLETE");
    } else {
        println!("MISSION SIMULATION ENDED");
    }
    println!("{}", "=".repeat(60));
    println!("Phases: {}", report.phase_summary());
    match report.captured_mass_kg {
        Some(mass) => println!("Captured mass: {mass} kg"),
        None => println!("Captured mass: none"),
    }
    println!("Battery SOC: {:.1}%", report.soc * 100.0);
    println!("Fuel remaining: {:.1} kg", report.fuel_kg);

    if let Some(path) = &cli.telemetry_csv {
        let writer = open_output(path)
            .with_context(|| format!("opening telemetry output {}", path.display()))?;
        report::write_telemetry_csv(writer, &report)?;
    }
    if let Some(path) = &cli.summary_json {
        let writer = open_output(path)
            .with_context(|| format!("opening summary output {}", path.display()))?;
        report::write_summary_json(writer, &report, dt)?;
    }

    Ok(())
}
