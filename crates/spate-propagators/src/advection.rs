//! Discretisations of the advective term.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How `a · ∂f/∂x` is differenced along one axis.
///
/// Each variant returns the contribution to `∂f/∂t`, so the sign convention
/// is part of the scheme.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvectionScheme {
    /// `-a · (f[i+1] - f[i-1]) / 2h`.
    Central,
    /// `-a · (f[i] - f[i-1]) / h` where `a > 0`, else `-a · (f[i+1] - f[i]) / h`.
    #[default]
    Upwind,
    /// `+a · (f[i+1] - f[i]) / h` regardless of the sign of `a`.
    ///
    /// Transports towards lower indices; used where the flow direction is
    /// fixed and points at the low edge.
    ForwardBiased,
}

impl AdvectionScheme {
    /// Every scheme.
    pub const ALL: [AdvectionScheme; 3] = [Self::Central, Self::Upwind, Self::ForwardBiased];

    /// Contribution to `∂f/∂t` of transport at velocity `a` along an axis of
    /// spacing `h`, given the previous, current and next values of `f`.
    #[inline]
    pub fn term(self, a: f64, prev: f64, here: f64, next: f64, h: f64) -> f64 {
        match self {
            Self::Central => -a * (next - prev) / (2.0 * h),
            Self::Upwind => {
                if a > 0.0 {
                    -a * (here - prev) / h
                } else {
                    -a * (next - here) / h
                }
            }
            Self::ForwardBiased => a * (next - here) / h,
        }
    }

    /// Lower-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Central => "central",
            Self::Upwind => "upwind",
            Self::ForwardBiased => "forward_biased",
        }
    }
}

impl fmt::Display for AdvectionScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdvectionScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == norm)
            .ok_or_else(|| format!("unknown advection scheme '{s}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upwind_follows_velocity_sign() {
        // f = [1, 2, 4]: backward diff 1, forward diff 2.
        let s = AdvectionScheme::Upwind;
        assert_eq!(s.term(1.0, 1.0, 2.0, 4.0, 1.0), -1.0);
        assert_eq!(s.term(-1.0, 1.0, 2.0, 4.0, 1.0), 2.0);
        assert_eq!(s.term(0.0, 1.0, 2.0, 4.0, 1.0), 0.0);
    }

    #[test]
    fn central_is_mean_of_one_sided() {
        let s = AdvectionScheme::Central;
        assert_eq!(s.term(2.0, 1.0, 2.0, 4.0, 0.5), -6.0);
    }

    #[test]
    fn forward_biased_ignores_sign() {
        let s = AdvectionScheme::ForwardBiased;
        assert_eq!(s.term(1.0, 0.0, 2.0, 4.0, 1.0), 2.0);
        assert_eq!(s.term(-1.0, 0.0, 2.0, 4.0, 1.0), -2.0);
    }

    #[test]
    fn parses_kebab_and_snake() {
        assert_eq!(
            "forward-biased".parse::<AdvectionScheme>(),
            Ok(AdvectionScheme::ForwardBiased)
        );
        assert_eq!("Upwind".parse::<AdvectionScheme>(), Ok(AdvectionScheme::Upwind));
        assert!("lax".parse::<AdvectionScheme>().is_err());
    }
}
