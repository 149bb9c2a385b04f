//! The shipped YAML configurations load, validate, and match the presets.

use std::path::PathBuf;

use spate::engine::scenario;
use spate::prelude::*;
use spate_test_utils::assert_close;

fn config(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../configs")
        .join(name)
}

#[test]
fn every_shipped_config_validates() {
    for name in ["city_pulse.yaml", "river_circle.yaml", "oscillating_inflow.yaml"] {
        let cfg = RunConfig::load(config(name)).unwrap_or_else(|e| panic!("{name}: {e}"));
        cfg.validate().unwrap_or_else(|e| panic!("{name}: {e}"));
    }
}

#[test]
fn city_pulse_file_runs_like_the_reference_channel() {
    let cfg = RunConfig::load(config("city_pulse.yaml")).unwrap();
    assert_eq!(cfg, RunConfig::default());
    let mut sim = Simulation::new(&cfg).unwrap();
    assert_eq!(sim.total_steps(), 500);
    sim.run().unwrap();
    assert!(sim.state().min() >= 0.0);
}

#[test]
fn oscillating_file_matches_the_preset_boundaries() {
    let cfg = RunConfig::load(config("oscillating_inflow.yaml")).unwrap();
    let preset = scenario::oscillating_inflow(ObstacleKind::Triangle).unwrap();
    assert_eq!(cfg.boundaries, preset.config.boundaries);
    assert_eq!(cfg.dt, preset.config.dt);
    assert_eq!(cfg.obstacles, preset.config.obstacles);
}

#[test]
fn river_file_builds_a_periodic_channel() {
    let cfg = RunConfig::load(config("river_circle.yaml")).unwrap();
    let sim = Simulation::new(&cfg).unwrap();
    assert_eq!(sim.grid().nx(), 101);
    assert_eq!(sim.grid().ny(), 101);
    assert_eq!(sim.grid().shape().dims().as_slice(), &[101, 101]);
    assert!(sim.mask().is_solid(50, 50));
    assert!(!sim.mask().is_solid(0, 0));
    assert_eq!(sim.total_steps(), 10_000);
    assert_close(sim.stability().limit(), 0.0025, 1e-12);
}

#[test]
fn preset_round_trips_through_yaml() {
    for s in [
        scenario::city_source(12.0).unwrap(),
        scenario::levee_flood(50.0).unwrap(),
        scenario::river_obstacles(ObstacleKind::Rectangle, ObstacleLayout::Pair).unwrap(),
    ] {
        let yaml = s.config.to_yaml_string().unwrap();
        assert_eq!(RunConfig::from_yaml_str(&yaml).unwrap(), s.config, "{}", s.name);
    }
}
