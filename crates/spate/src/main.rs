//! `spate` command-line runner.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use spate::engine::scenario::{self, Scenario};
use spate::engine::{run_batch, HistoryBuffer, RegionOfInterest, RunConfig, Simulation};
use spate::space::{ObstacleKind, ObstacleLayout};

#[derive(Parser, Debug)]
#[command(name = "spate")]
#[command(version, about = "Viscous Burgers' equation solver for flood and river flow scenarios")]
struct Cli {
    /// Print only the summary, not the per-frame table.
    #[arg(long, short, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a scenario described by a YAML file.
    Run {
        /// Path to the configuration.
        config: PathBuf,
        #[command(flatten)]
        region: RegionArg,
    },
    /// Run a built-in scenario.
    Preset {
        /// Which scenario.
        #[arg(value_enum)]
        name: PresetName,
        /// Distance to the city in km (city and levee scenarios).
        #[arg(long, default_value_t = 20.0)]
        distance: f64,
        /// Obstacle shape (river and oscillating scenarios).
        #[arg(long, default_value = "square")]
        obstacle: ObstacleKind,
        /// Obstacle placement (river scenario).
        #[arg(long, default_value = "single")]
        layout: ObstacleLayout,
        /// Print the scenario as YAML instead of running it.
        #[arg(long)]
        emit_config: bool,
        #[command(flatten)]
        region: RegionArg,
    },
    /// Run the single, pair and trio river layouts side by side.
    Layouts {
        /// Obstacle shape.
        #[arg(default_value = "square")]
        obstacle: ObstacleKind,
    },
    /// Validate a configuration and report its stability limits.
    Check {
        /// Path to the configuration.
        config: PathBuf,
    },
}

#[derive(clap::Args, Debug)]
struct RegionArg {
    /// Report the integrated value over `[START, END]` along x.
    #[arg(long, num_args = 2, value_names = ["START", "END"], allow_negative_numbers = true)]
    region: Option<Vec<f64>>,
}

impl RegionArg {
    fn bounds(&self) -> Option<[f64; 2]> {
        match self.region.as_deref() {
            Some(&[a, b]) => Some([a, b]),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum PresetName {
    /// Gaussian flood pulse toward a city.
    CityPulse,
    /// Pulsing source at the channel mouth.
    CitySource,
    /// Uniform river flow past obstacles.
    River,
    /// Ramped flood wave in a levee-lined valley.
    Levee,
    /// Oscillating inflow past one obstacle.
    Oscillating,
}

fn preset(
    name: PresetName,
    distance: f64,
    kind: ObstacleKind,
    layout: ObstacleLayout,
) -> Result<Scenario> {
    let scenario = match name {
        PresetName::CityPulse => scenario::city_pulse(distance)?,
        PresetName::CitySource => scenario::city_source(distance)?,
        PresetName::River => scenario::river_obstacles(kind, layout)?,
        PresetName::Levee => scenario::levee_flood(distance)?,
        PresetName::Oscillating => scenario::oscillating_inflow(kind)?,
    };
    Ok(scenario)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let default_level = if cli.quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match cli.command {
        Command::Run { config, region } => {
            let cfg = RunConfig::load(&config)
                .with_context(|| format!("loading {}", config.display()))?;
            simulate(&config.display().to_string(), &cfg, region.bounds(), cli.quiet)
        }
        Command::Preset {
            name,
            distance,
            obstacle,
            layout,
            emit_config,
            region,
        } => {
            let scenario = preset(name, distance, obstacle, layout)?;
            if emit_config {
                print!("{}", scenario.config.to_yaml_string()?);
                return Ok(());
            }
            let bounds = region.bounds().or(scenario.region);
            simulate(&scenario.name, &scenario.config, bounds, cli.quiet)
        }
        Command::Layouts { obstacle } => {
            let configs = scenario::river_layouts(obstacle)?;
            let results = run_batch(configs)?;
            for (name, history) in &results {
                summarize(name, history, None);
            }
            Ok(())
        }
        Command::Check { config } => {
            let cfg = RunConfig::load(&config)
                .with_context(|| format!("loading {}", config.display()))?;
            let sim = Simulation::new(&cfg)?;
            println!("{}: ok", config.display());
            println!(
                "  grid      {} cells, dims {:?}",
                sim.grid().cell_count(),
                sim.grid().shape().dims().as_slice()
            );
            println!("  obstacles {} solid cells", sim.mask().solid_count());
            println!("  steps     {} (dt = {})", sim.total_steps(), sim.dt());
            println!("  stride    {}", sim.history().stride());
            println!("  stability {}", sim.stability());
            Ok(())
        }
    }
}

fn simulate(name: &str, cfg: &RunConfig, bounds: Option<[f64; 2]>, quiet: bool) -> Result<()> {
    let mut sim = Simulation::new(cfg)?;
    let region = match bounds {
        Some([x0, x1]) => Some(RegionOfInterest::from_physical(sim.grid(), x0, x1)?),
        None => None,
    };
    if let Err(e) = sim.run().map(|_| ()) {
        eprintln!(
            "{name}: stopped after {} steps at t = {:.4}",
            sim.current_step(),
            sim.time()
        );
        bail!(e);
    }
    if !quiet {
        print_table(sim.history(), region.as_ref());
    }
    summarize(name, sim.history(), region.as_ref());
    println!(
        "  timing    {:.1} us/step over {} steps",
        sim.run_metrics().mean_step_us(),
        sim.run_metrics().steps
    );
    Ok(())
}

fn print_table(history: &HistoryBuffer, region: Option<&RegionOfInterest>) {
    println!(
        "{:>6} {:>8} {:>10} {:>10} {:>10} {:>12}",
        "frame", "step", "time", "peak", "max|u|", "region"
    );
    for (i, frame) in history.iter().enumerate() {
        let volume = region
            .map(|r| format!("{:12.5}", r.integrate(&frame.state)))
            .unwrap_or_else(|| format!("{:>12}", "-"));
        println!(
            "{:>6} {:>8} {:>10.4} {:>10.5} {:>10.5} {volume}",
            i,
            frame.step.0,
            frame.time,
            frame.state.peak(),
            frame.state.max_abs()
        );
    }
}

fn summarize(name: &str, history: &HistoryBuffer, region: Option<&RegionOfInterest>) {
    let (Some(first), Some(last)) = (history.first(), history.last()) else {
        println!("{name}: no frames");
        return;
    };
    println!("{name}");
    println!("  frames    {} (stride {})", history.len(), history.stride());
    println!("  final t   {:.4} (step {})", last.time, last.step);
    println!("  peak      {:.5} -> {:.5}", first.state.peak(), last.state.peak());
    if last.state.is_vector() {
        let speed = last.state.speed().into_iter().fold(0.0, f64::max);
        println!("  max speed {speed:.5}");
    }
    if let Some(r) = region {
        let series = history.region_series(r);
        let (t_max, v_max) = series
            .iter()
            .copied()
            .fold((0.0, f64::NEG_INFINITY), |best, s| if s.1 > best.1 { s } else { best });
        println!(
            "  region    cols {:?}: {:.5} now, max {:.5} at t = {:.4}",
            r.columns(),
            r.integrate(&last.state),
            v_max,
            t_max
        );
    }
}
