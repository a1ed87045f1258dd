use clap::{Parser, Subcommand};
use ls_app::{load_scenario, query, run_service, AppError, AppResult, RunOutcome};
use ls_plant::PlantCatalog;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "ls-cli")]
#[command(about = "Loopsim CLI - closed-loop PID simulation tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate scenario file syntax and configuration
    Validate {
        /// Path to the scenario YAML file
        scenario_path: PathBuf,
    },
    /// List plants in the built-in catalog
    Plants,
    /// Run a scenario and report its performance metrics
    Run {
        /// Path to the scenario YAML file
        scenario_path: PathBuf,
        /// Export all channels to a CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Print the full outcome as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
    /// Run several scenario files as one concurrent batch
    Batch {
        /// Paths to scenario YAML files
        scenario_paths: Vec<PathBuf>,
    },
}

fn main() -> AppResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let catalog = PlantCatalog::builtin();

    match cli.command {
        Commands::Validate { scenario_path } => cmd_validate(&catalog, &scenario_path),
        Commands::Plants => cmd_plants(&catalog),
        Commands::Run {
            scenario_path,
            csv,
            json,
        } => cmd_run(&catalog, &scenario_path, csv.as_deref(), json),
        Commands::Batch { scenario_paths } => cmd_batch(&catalog, &scenario_paths),
    }
}

fn cmd_validate(catalog: &PlantCatalog, scenario_path: &Path) -> AppResult<()> {
    println!("Validating scenario: {}", scenario_path.display());
    let scenario = load_scenario(scenario_path)?;
    scenario.validate(catalog)?;
    println!("✓ Scenario is valid");
    Ok(())
}

fn cmd_plants(catalog: &PlantCatalog) -> AppResult<()> {
    println!("Plants in catalog:");
    for spec in catalog.iter() {
        println!("  {} ({})", spec.name(), spec.kind());
    }
    Ok(())
}

fn cmd_run(
    catalog: &PlantCatalog,
    scenario_path: &Path,
    csv: Option<&Path>,
    json: bool,
) -> AppResult<()> {
    let scenario = load_scenario(scenario_path)?;
    let outcome = run_service::run_scenario(catalog, &scenario)?;

    if json {
        let rendered =
            serde_json::to_string_pretty(&outcome).map_err(|e| AppError::Backend {
                message: e.to_string(),
            })?;
        println!("{rendered}");
    } else {
        print_outcome_summary(&scenario.name, &outcome, scenario.tolerance);
    }

    if let Some(csv_path) = csv {
        export_csv(&outcome, csv_path)?;
        println!("  CSV written to {}", csv_path.display());
    }

    Ok(())
}

fn cmd_batch(catalog: &PlantCatalog, scenario_paths: &[PathBuf]) -> AppResult<()> {
    if scenario_paths.is_empty() {
        return Err(AppError::InvalidInput(
            "batch needs at least one scenario file".to_string(),
        ));
    }

    let mut scenarios = Vec::with_capacity(scenario_paths.len());
    for path in scenario_paths {
        scenarios.push(load_scenario(path)?);
    }

    info!(count = scenarios.len(), "running scenario batch");
    let outcomes = run_service::run_batch(catalog, &scenarios);

    for (scenario, outcome) in scenarios.iter().zip(outcomes) {
        match outcome {
            Ok(outcome) => {
                let settle = outcome
                    .metrics
                    .settling_time
                    .map(|t| format!("settled at {t:.2}"))
                    .unwrap_or_else(|| "did not settle".to_string());
                let overshoot = outcome
                    .metrics
                    .overshoot_pct
                    .map(|p| format!("overshoot {p:.1}%"))
                    .unwrap_or_else(|| "no overshoot".to_string());
                println!("✓ {} - {}, {}", scenario.name, settle, overshoot);
            }
            Err(err) => {
                println!("✗ {} - {}", scenario.name, err);
            }
        }
    }

    Ok(())
}

fn print_outcome_summary(name: &str, outcome: &RunOutcome, tolerance: f64) {
    println!("✓ Simulation completed: {name}");
    println!("  Samples: {}", outcome.len());

    if let (Some(peak), Some(peak_time)) = (outcome.metrics.peak_value, outcome.metrics.peak_time)
    {
        println!("  Peak {}: {:.3} at t = {:.2}", outcome.measured, peak, peak_time);
    }
    match outcome.metrics.overshoot_pct {
        Some(pct) => println!("  Overshoot: {pct:.1}%"),
        None => println!("  Overshoot: none"),
    }
    match outcome.metrics.settling_time {
        Some(t) => println!(
            "  Settling time (±{:.0}%): {:.2}",
            tolerance * 100.0,
            t
        ),
        None => println!(
            "  Settling time (±{:.0}%): not reached within the horizon",
            tolerance * 100.0
        ),
    }
}

fn export_csv(outcome: &RunOutcome, path: &Path) -> AppResult<()> {
    let channel_names = query::list_channels(outcome);

    let mut csv = String::from("time");
    for name in &channel_names {
        csv.push(',');
        csv.push_str(name);
    }
    csv.push('\n');

    for (i, t) in outcome.time.iter().enumerate() {
        csv.push_str(&format!("{t}"));
        for name in &channel_names {
            let channel = outcome
                .channel(name)
                .ok_or_else(|| AppError::InvalidInput(format!("Unknown channel: {name}")))?;
            csv.push_str(&format!(",{}", channel.values[i]));
        }
        csv.push('\n');
    }

    std::fs::write(path, csv)?;
    Ok(())
}
