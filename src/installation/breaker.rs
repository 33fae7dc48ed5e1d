use std::fmt;

use serde::{
    Deserialize,
    Serialize,
};

use super::data::installation_data;
use super::error::ProjectError;

/// Trip curve of a thermomagnetic breaker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BreakerCurve {
    B,
    #[default]
    C,
    D,
}

impl BreakerCurve {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
        }
    }
}

impl fmt::Display for BreakerCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Circuit breaker of a given rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Breaker {
    /// Rated current (A)
    pub current: u32,
    pub curve: BreakerCurve,
}

impl Breaker {
    /// Available breakers of a curve, ascending.
    pub fn for_curve(curve: BreakerCurve) -> Result<Vec<Self>, ProjectError> {
        let currents = installation_data()?.breakers.get(&curve).map_or(&[][..], Vec::as_slice);
        Ok(currents.iter().map(|&current| Self { current, curve }).collect())
    }

    /// Smallest breaker of the curve rated for `current`.
    pub fn smallest_for(curve: BreakerCurve, current: f64) -> Result<Self, ProjectError> {
        Self::for_curve(curve)?
            .into_iter()
            .find(|breaker| f64::from(breaker.current) >= current)
            .ok_or_else(|| ProjectError::NoSuitableBreaker { current, curve: curve.to_string() })
    }
}

impl fmt::Display for Breaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.curve, self.current)
    }
}
