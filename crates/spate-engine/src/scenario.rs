//! Built-in scenarios.
//!
//! Each preset returns a [`Scenario`]: a ready [`RunConfig`] plus, for the
//! city runs, the physical x-range of the city whose integrated value is
//! worth reporting.

use indexmap::IndexMap;
use spate_propagators::{
    AdvectionScheme, BoundaryConditions, BoundaryPolicy, EdgeBoundary, SourceForcing, SourceKind,
};
use spate_space::{ObstacleKind, ObstacleLayout};

use crate::config::{ConfigError, DomainSpec, RunConfig};
use crate::initial::{InitialCondition, InitialState};

/// City extent along the channel, km.
pub const CITY_WIDTH: f64 = 8.0;

/// A named configuration with an optional region of interest.
#[derive(Clone, Debug, PartialEq)]
pub struct Scenario {
    /// Short label.
    pub name: String,
    /// What to run.
    pub config: RunConfig,
    /// Physical `[x0, x1]` to integrate over, if any.
    pub region: Option<[f64; 2]>,
}

fn positive_distance(distance: f64) -> Result<(), ConfigError> {
    if !distance.is_finite() || distance <= 0.0 {
        return Err(ConfigError::InvalidParameter {
            name: "distance",
            value: distance,
        });
    }
    Ok(())
}

/// A Gaussian flood pulse travelling down a channel toward a city
/// `distance` km away.
pub fn city_pulse(distance: f64) -> Result<Scenario, ConfigError> {
    positive_distance(distance)?;
    let length = distance + CITY_WIDTH + distance / 2.0;
    let center = distance / 4.0;
    let amplitude = 1.0;
    let speed = f64::max(amplitude, 0.1);
    Ok(Scenario {
        name: format!("city-pulse-{distance}"),
        config: RunConfig {
            domain: DomainSpec::Line { length, dx: 0.1 },
            dt: 0.01,
            nu: 0.1,
            scheme: AdvectionScheme::Central,
            initial: InitialState::scalar(InitialCondition::GaussianPulse {
                center,
                width: f64::max(1.0, distance / 10.0),
                amplitude,
                baseline: 0.01,
            }),
            total_time: 1.5 * (length - center) / speed,
            max_steps: 50_000,
            ..RunConfig::default()
        },
        region: Some([distance, distance + CITY_WIDTH]),
    })
}

/// A pulsing source at the channel mouth feeding water toward a city
/// `distance` km away.
pub fn city_source(distance: f64) -> Result<Scenario, ConfigError> {
    positive_distance(distance)?;
    let length = f64::max(distance + CITY_WIDTH + distance / 2.0, CITY_WIDTH + 10.0);
    let amplitude = 0.3;
    let source = SourceForcing {
        kind: SourceKind::Sinusoidal,
        amplitude,
        frequency: 0.8,
        baseline: 0.01,
    };
    Ok(Scenario {
        name: format!("city-source-{distance}"),
        config: RunConfig {
            domain: DomainSpec::Line { length, dx: 0.1 },
            dt: 0.01,
            nu: 0.1,
            scheme: AdvectionScheme::Central,
            boundaries: BoundaryConditions {
                left: BoundaryPolicy::Source(source).into(),
                ..BoundaryConditions::default()
            },
            initial: InitialState::scalar(InitialCondition::Flat(0.01)),
            total_time: 1.5 * (distance + CITY_WIDTH) / f64::max(amplitude, 0.1),
            max_steps: 10_000,
            ..RunConfig::default()
        },
        region: Some([distance, distance + CITY_WIDTH]),
    })
}

fn river_domain() -> DomainSpec {
    DomainSpec::Plane {
        length_x: 1.0,
        dx: 0.01,
        length_y: 2.0,
        dy: 0.02,
    }
}

/// Uniform northward river flow past obstacles of one kind.
pub fn river_obstacles(kind: ObstacleKind, layout: ObstacleLayout) -> Result<Scenario, ConfigError> {
    let domain = river_domain();
    let grid = domain.grid()?;
    let obstacles = if kind == ObstacleKind::None {
        Vec::new()
    } else {
        layout.specs(kind, &grid)?
    };
    Ok(Scenario {
        name: format!("river-{kind}-{layout}"),
        config: RunConfig {
            domain,
            dt: 1e-4,
            nu: 0.01,
            scheme: AdvectionScheme::Upwind,
            obstacles,
            boundaries: BoundaryConditions {
                bottom: BoundaryPolicy::Periodic.into(),
                top: BoundaryPolicy::Periodic.into(),
                ..BoundaryConditions::default()
            },
            initial: InitialState::vector(InitialCondition::Flat(0.0), InitialCondition::Flat(1.0)),
            total_time: 1.0,
            ..RunConfig::default()
        },
        region: None,
    })
}

/// Every [`ObstacleLayout`] of `kind`, keyed by scenario name, ready for
/// [`run_batch`](crate::run_batch).
pub fn river_layouts(kind: ObstacleKind) -> Result<IndexMap<String, RunConfig>, ConfigError> {
    ObstacleLayout::ALL
        .iter()
        .map(|&layout| river_obstacles(kind, layout).map(|s| (s.name, s.config)))
        .collect()
}

/// A flood wave entering a levee-lined valley from the top edge and
/// running down toward a city `distance` km away.
///
/// The source ramps up over the whole run and saturates at half its
/// nominal amplitude, with a small ripple on top.
pub fn levee_flood(distance: f64) -> Result<Scenario, ConfigError> {
    positive_distance(distance)?;
    let amplitude = 1.5;
    let total_time = 24.0 * 60.0;
    let source = SourceForcing {
        kind: SourceKind::RampedSinusoidal {
            ceiling: amplitude / 2.0,
            ripple_amplitude: 0.1,
            total_time,
        },
        amplitude,
        frequency: 0.5,
        baseline: 0.0,
    };
    Ok(Scenario {
        name: format!("levee-flood-{distance}"),
        config: RunConfig {
            domain: DomainSpec::Plane {
                length_x: 15.0,
                dx: 0.5,
                length_y: distance + CITY_WIDTH + distance / 2.0,
                dy: 0.5,
            },
            dt: 0.04,
            nu: 1.2,
            scheme: AdvectionScheme::ForwardBiased,
            boundaries: BoundaryConditions {
                top: EdgeBoundary::split(BoundaryPolicy::Fixed(0.0), BoundaryPolicy::Source(source)),
                ..BoundaryConditions::default()
            },
            initial: InitialState::vector(InitialCondition::Flat(0.0), InitialCondition::Flat(0.0)),
            total_time,
            target_frames: 150,
            ..RunConfig::default()
        },
        region: None,
    })
}

/// A river whose inflow speed oscillates, flowing past one obstacle of
/// `kind` between no-slip side walls.
pub fn oscillating_inflow(kind: ObstacleKind) -> Result<Scenario, ConfigError> {
    let domain = DomainSpec::Plane {
        length_x: 1.0,
        dx: 0.02,
        length_y: 1.0,
        dy: 0.02,
    };
    let grid = domain.grid()?;
    let obstacles = if kind == ObstacleKind::None {
        Vec::new()
    } else {
        ObstacleLayout::Single.specs(kind, &grid)?
    };
    let inflow = SourceForcing {
        kind: SourceKind::SignedSinusoidal,
        amplitude: 0.2,
        frequency: 2.5,
        baseline: 1.1,
    };
    let wall = EdgeBoundary::split(BoundaryPolicy::Fixed(0.0), BoundaryPolicy::ZeroGradient);
    Ok(Scenario {
        name: format!("oscillating-{kind}"),
        config: RunConfig {
            domain,
            dt: 5e-4,
            nu: 0.01,
            scheme: AdvectionScheme::Upwind,
            obstacles,
            boundaries: BoundaryConditions {
                bottom: EdgeBoundary::split(BoundaryPolicy::Fixed(0.0), BoundaryPolicy::Source(inflow)),
                top: BoundaryPolicy::ZeroGradient.into(),
                left: wall,
                right: wall,
            },
            initial: InitialState::vector(InitialCondition::Flat(0.0), InitialCondition::Flat(1.1)),
            total_time: 1.0,
            ..RunConfig::default()
        },
        region: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_preset_validates() {
        let mut all = vec![
            city_pulse(20.0).unwrap(),
            city_source(20.0).unwrap(),
            levee_flood(100.0).unwrap(),
        ];
        for kind in ObstacleKind::ALL {
            all.push(oscillating_inflow(kind).unwrap());
            for layout in ObstacleLayout::ALL {
                all.push(river_obstacles(kind, layout).unwrap());
            }
        }
        for s in &all {
            s.config
                .validate()
                .unwrap_or_else(|e| panic!("{}: {e}", s.name));
        }
    }

    #[test]
    fn presets_are_stable_at_their_dt() {
        for s in [
            city_pulse(20.0).unwrap(),
            city_source(5.0).unwrap(),
            levee_flood(100.0).unwrap(),
            oscillating_inflow(ObstacleKind::Square).unwrap(),
            river_obstacles(ObstacleKind::Circle, ObstacleLayout::Trio).unwrap(),
        ] {
            let p = s.config.prepare().unwrap();
            assert!(p.stability.stable, "{}: {}", s.name, p.stability);
        }
    }

    #[test]
    fn city_pulse_geometry() {
        let s = city_pulse(20.0).unwrap();
        assert_eq!(
            s.config.domain,
            DomainSpec::Line {
                length: 38.0,
                dx: 0.1
            }
        );
        assert_eq!(s.region, Some([20.0, 28.0]));
        assert!((s.config.total_time - 1.5 * 33.0).abs() < 1e-12);
        assert_eq!(s.config.scheme, AdvectionScheme::Central);
    }

    #[test]
    fn city_source_has_a_minimum_length_and_step_cap() {
        let s = city_source(2.0).unwrap();
        assert_eq!(
            s.config.domain,
            DomainSpec::Line {
                length: 18.0,
                dx: 0.1
            }
        );
        // 1.5 · 10 / 0.3 = 50 time units at dt 0.01 would be 5000 steps.
        assert_eq!(s.config.step_count(s.config.dt), 5000);
        let far = city_source(100.0).unwrap();
        assert_eq!(far.config.step_count(far.config.dt), 10_000);
    }

    #[test]
    fn distance_must_be_positive() {
        for d in [0.0, -3.0, f64::NAN] {
            assert!(city_pulse(d).is_err());
            assert!(city_source(d).is_err());
            assert!(levee_flood(d).is_err());
        }
    }

    #[test]
    fn river_layouts_name_each_layout() {
        let batch = river_layouts(ObstacleKind::Square).unwrap();
        let names: Vec<&str> = batch.keys().map(String::as_str).collect();
        assert_eq!(
            names,
            ["river-square-single", "river-square-pair", "river-square-trio"]
        );
        assert_eq!(batch["river-square-trio"].obstacles.len(), 3);
        let none = river_layouts(ObstacleKind::None).unwrap();
        assert!(none.values().all(|c| c.obstacles.is_empty()));
    }
}
