use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Deserialize;
use std::error::Error;
use std::path::{Path, PathBuf};

use ballistics_solver::{
    atmosphere::AtmosphericState, BallisticsError, DragLawKind, DragModel, IntegrationMethod,
    ShotParameters, ShotReport, ShotSolver, SolverOptions, UnitConverter, UnitSystem, Wind,
    FIELD_LABELS,
};

#[derive(Parser)]
#[command(name = "ballistics-cli")]
#[command(version)]
#[command(about = "Point-mass shot solver: drop, windage and trajectory tables", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve drop and windage at the target distance
    Solve {
        #[command(flatten)]
        shot: ShotArgs,

        #[command(flatten)]
        solver: SolverArgs,

        /// Output format
        #[arg(short = 'o', long, default_value = "table")]
        output: OutputFormat,
    },

    /// Print a trajectory table from the muzzle to the target
    Table {
        #[command(flatten)]
        shot: ShotArgs,

        #[command(flatten)]
        solver: SolverArgs,

        /// Row spacing (m, or yd with --units imperial)
        #[arg(short = 'i', long, default_value = "50")]
        interval: f64,

        /// Output format
        #[arg(short = 'o', long, default_value = "table")]
        output: OutputFormat,
    },

    /// List the input fields with their labels and units
    Fields,

    /// Display solver information
    Info,
}

/// Shot inputs. Unset flags fall back to the config file, then the defaults.
#[derive(Args)]
struct ShotArgs {
    /// JSON file with "parameters" and/or "options" objects
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Unit system for flag values and output
    #[arg(short = 'u', long, default_value = "metric")]
    units: Units,

    /// Muzzle velocity (m/s or fps)
    #[arg(short = 'v', long)]
    velocity: Option<f64>,

    /// Ballistic coefficient
    #[arg(short = 'b', long)]
    bc: Option<f64>,

    /// Bullet mass (grains)
    #[arg(short = 'm', long)]
    mass: Option<f64>,

    /// Bullet diameter (mm or in)
    #[arg(short = 'd', long)]
    diameter: Option<f64>,

    /// Sight height above the bore (m or in)
    #[arg(long)]
    sight_height: Option<f64>,

    /// Zero distance (m or yd)
    #[arg(short = 'z', long)]
    zero: Option<f64>,

    /// Target distance (m or yd)
    #[arg(short = 'r', long)]
    range: Option<f64>,

    /// Wind speed (m/s or mph)
    #[arg(long)]
    wind_speed: Option<f64>,

    /// Bearing the wind blows from (degrees, 0 = headwind, 90 = from the right)
    #[arg(long)]
    wind_direction: Option<f64>,

    /// Temperature (°C or °F)
    #[arg(long, allow_negative_numbers = true)]
    temperature: Option<f64>,

    /// Station pressure (hPa or inHg)
    #[arg(long)]
    pressure: Option<f64>,

    /// Relative humidity (0-100)
    #[arg(long)]
    humidity: Option<f64>,

    /// Drag model
    #[arg(long)]
    drag_model: Option<DragModelArg>,
}

#[derive(Args)]
struct SolverArgs {
    /// Integration step (s)
    #[arg(long)]
    time_step: Option<f64>,

    /// Integration scheme
    #[arg(long)]
    method: Option<MethodArg>,

    /// Drag law
    #[arg(long)]
    drag_law: Option<DragLawArg>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Csv,
    Table,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Units {
    Metric,
    Imperial,
}

impl From<Units> for UnitSystem {
    fn from(units: Units) -> Self {
        match units {
            Units::Metric => UnitSystem::Metric,
            Units::Imperial => UnitSystem::Imperial,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DragModelArg {
    None,
    G1,
    G7,
}

impl From<DragModelArg> for DragModel {
    fn from(arg: DragModelArg) -> Self {
        match arg {
            DragModelArg::None => DragModel::None,
            DragModelArg::G1 => DragModel::G1,
            DragModelArg::G7 => DragModel::G7,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum MethodArg {
    Euler,
    Rk4,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DragLawArg {
    /// BC-normalized retardation
    Bc,
    /// Cross-section and mass of the bullet itself
    Sectional,
}

/// Contents of a `--config` file
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    parameters: ShotParameters,
    options: SolverOptions,
}

fn load_config(path: &Path) -> Result<ConfigFile, BallisticsError> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Layer flags over the config file over the defaults
fn build_inputs(shot: &ShotArgs, solver: &SolverArgs) -> Result<(ShotParameters, SolverOptions), BallisticsError> {
    let ConfigFile {
        parameters: mut params,
        options: mut options,
    } = match &shot.config {
        Some(path) => {
            log::info!("loading parameters from {}", path.display());
            load_config(path)?
        }
        None => ConfigFile::default(),
    };

    let units = UnitSystem::from(shot.units);

    if let Some(v) = shot.velocity {
        params.muzzle_velocity = UnitConverter::velocity_to_metric(v, units);
    }
    if let Some(bc) = shot.bc {
        params.ballistic_coefficient = bc;
    }
    if let Some(grains) = shot.mass {
        params = params.with_mass_grains(grains);
    }
    if let Some(d) = shot.diameter {
        params.bullet_diameter_mm = match units {
            UnitSystem::Metric => d,
            UnitSystem::Imperial => UnitConverter::offset_to_metric(d, units) * 1000.0,
        };
    }
    if let Some(h) = shot.sight_height {
        params.sight_height = UnitConverter::offset_to_metric(h, units);
    }
    if let Some(z) = shot.zero {
        params.zero_distance = UnitConverter::distance_to_metric(z, units);
    }
    if let Some(r) = shot.range {
        params.target_distance = UnitConverter::distance_to_metric(r, units);
    }
    if let Some(w) = shot.wind_speed {
        params.wind_speed = UnitConverter::wind_speed_to_metric(w, units);
    }
    if let Some(dir) = shot.wind_direction {
        params.wind_direction_deg = dir;
    }
    if let Some(t) = shot.temperature {
        params.temperature_c = UnitConverter::temperature_to_metric(t, units);
    }
    if let Some(p) = shot.pressure {
        params.pressure_hpa = UnitConverter::pressure_to_metric(p, units);
    }
    if let Some(h) = shot.humidity {
        params.relative_humidity_percent = h;
    }
    if let Some(model) = shot.drag_model {
        params.drag_model = model.into();
    }

    if let Some(dt) = solver.time_step {
        options.time_step = dt;
    }
    if let Some(method) = solver.method {
        options.method = match method {
            MethodArg::Euler => IntegrationMethod::Euler,
            MethodArg::Rk4 => IntegrationMethod::Rk4,
        };
    }
    if let Some(law) = solver.drag_law {
        options.drag_law = match law {
            DragLawArg::Bc => DragLawKind::BallisticCoefficient,
            DragLawArg::Sectional => DragLawKind::Sectional,
        };
    }

    Ok((params, options))
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Solve { shot, solver, output } => {
            let (params, options) = build_inputs(&shot, &solver)?;
            let solver = ShotSolver::new(params, options)?;
            let report = solver.solve()?.in_units(shot.units.into());
            display_report(&report, solver.atmosphere(), solver.parameters().wind(), output)?;
        }

        Commands::Table {
            shot,
            solver,
            interval,
            output,
        } => {
            let (params, options) = build_inputs(&shot, &solver)?;
            let units = UnitSystem::from(shot.units);
            let solver = ShotSolver::new(params, options)?;
            let interval_m = UnitConverter::distance_to_metric(interval, units);
            let report = solver.trajectory_table(interval_m)?.in_units(units);
            display_report(&report, solver.atmosphere(), solver.parameters().wind(), output)?;
        }

        Commands::Fields => {
            println!("{:<28} {:<24} unit", "field", "label");
            for (name, label, unit) in FIELD_LABELS {
                println!("{:<28} {:<24} {}", name, label, unit);
            }
        }

        Commands::Info => {
            println!("╔════════════════════════════════════════╗");
            println!("║      BALLISTICS SOLVER v{:<15}║", env!("CARGO_PKG_VERSION"));
            println!("╠════════════════════════════════════════╣");
            println!("║ Point-mass shot solver.                ║");
            println!("╠════════════════════════════════════════╣");
            println!("║ Features:                              ║");
            println!("║ • Moist-air density and sound speed    ║");
            println!("║ • G1 / G7 drag tables                  ║");
            println!("║ • Zero-angle bisection                 ║");
            println!("║ • Euler and RK4 integration            ║");
            println!("║ • Constant crosswind and headwind      ║");
            println!("╚════════════════════════════════════════╝");
        }
    }

    Ok(())
}

fn display_report(
    report: &ShotReport,
    atmosphere: AtmosphericState,
    wind: Wind,
    format: OutputFormat,
) -> Result<(), Box<dyn Error>> {
    let units = report.units;
    let range_unit = units.range_unit();
    let offset_unit = units.offset_unit();
    let velocity_unit = units.velocity_unit();
    let energy_unit = units.energy_unit();

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(report)?);
        }

        OutputFormat::Csv => {
            if report.samples.is_empty() {
                println!("range,drop,windage,time,velocity,energy,elevation_moa,windage_moa");
                println!(
                    "{:.2},{:.4},{:.4},{:.4},{:.2},{:.1},{:.2},{:.2}",
                    report.range,
                    report.vertical_drop,
                    report.windage,
                    report.time_of_flight,
                    report.impact_velocity,
                    report.impact_energy,
                    report.elevation_moa,
                    report.windage_moa
                );
            } else {
                println!("range,drop,windage,time,velocity,energy");
                for s in &report.samples {
                    println!(
                        "{:.2},{:.4},{:.4},{:.4},{:.2},{:.1}",
                        s.range, s.drop, s.windage, s.time, s.velocity, s.energy
                    );
                }
            }
        }

        OutputFormat::Table => {
            println!("╔════════════════════════════════════════╗");
            println!("║            SHOT SOLUTION               ║");
            println!("╠════════════════════════════════════════╣");
            println!("║ Range:             {:>9.1} {:<9} ║", report.range, range_unit);
            println!("║ Drop:              {:>9.3} {:<9} ║", report.vertical_drop, offset_unit);
            println!("║ Windage:           {:>9.3} {:<9} ║", report.windage, offset_unit);
            println!("║ Elevation:         {:>9.2} {:<9} ║", report.elevation_moa, "MOA");
            println!("║ Windage corr.:     {:>9.2} {:<9} ║", report.windage_moa, "MOA");
            println!("║ Time of Flight:    {:>9.3} {:<9} ║", report.time_of_flight, "s");
            println!("║ Impact Velocity:   {:>9.1} {:<9} ║", report.impact_velocity, velocity_unit);
            println!("║ Impact Energy:     {:>9.0} {:<9} ║", report.impact_energy, energy_unit);
            println!("║ Zero Angle:        {:>9.3} {:<9} ║", report.zero_angle_moa, "MOA");
            println!("║ Air Density:       {:>9.4} {:<9} ║", atmosphere.air_density, "kg/m³");
            println!("║ Speed of Sound:    {:>9.1} {:<9} ║", atmosphere.speed_of_sound, "m/s");
            println!("║ Crosswind:         {:>9.2} {:<9} ║", wind.crosswind(), "m/s");
            println!("║ Headwind:          {:>9.2} {:<9} ║", wind.headwind(), "m/s");
            println!("╚════════════════════════════════════════╝");
            println!("Confidence: {:?}, termination: {}", report.confidence, report.termination);

            if !report.samples.is_empty() {
                println!();
                println!("┌──────────┬──────────┬──────────┬──────────┬──────────┬──────────┐");
                println!(
                    "│ {:>8} │ {:>8} │ {:>8} │ {:>8} │ {:>8} │ {:>8} │",
                    format!("R({range_unit})"),
                    format!("D({offset_unit})"),
                    format!("W({offset_unit})"),
                    "T(s)",
                    format!("V({velocity_unit})"),
                    format!("E({energy_unit})")
                );
                println!("├──────────┼──────────┼──────────┼──────────┼──────────┼──────────┤");
                for s in &report.samples {
                    println!(
                        "│ {:>8.1} │ {:>8.3} │ {:>8.3} │ {:>8.3} │ {:>8.1} │ {:>8.0} │",
                        s.range, s.drop, s.windage, s.time, s.velocity, s.energy
                    );
                }
                println!("└──────────┴──────────┴──────────┴──────────┴──────────┴──────────┘");
            }
        }
    }

    Ok(())
}
