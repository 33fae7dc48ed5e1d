//! Current capacity correction factors
//!
//! See NBR 5410 6.2.5.3 (temperature) and 6.2.5.5 (grouping).

use super::data::installation_data;
use super::error::ProjectError;

/// Interpolated ambient temperature factor.
///
/// Temperatures below the table use its first factor.
pub fn temperature_factor(temperature: i32) -> Result<f64, ProjectError> {
    let points = &installation_data()?.temperature_correction;
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return Err(ProjectError::TemperatureOutOfRange { temperature, maximum: 0 });
    };

    if temperature <= first.temperature {
        return Ok(first.value);
    }

    points
        .windows(2)
        .find_map(|pair| match pair {
            [lower, upper] if upper.temperature >= temperature => {
                let span = f64::from(upper.temperature - lower.temperature);
                let offset = f64::from(temperature - lower.temperature);
                Some(lower.value + (upper.value - lower.value) * offset / span)
            }
            _ => None,
        })
        .ok_or(ProjectError::TemperatureOutOfRange { temperature, maximum: last.temperature })
}

/// Factor for `grouping` circuits sharing a run.
///
/// Groupings above the table use its last factor.
pub fn grouping_factor(grouping: u32) -> Result<f64, ProjectError> {
    let factors = &installation_data()?.grouping_correction;
    let grouping = grouping.max(1);

    Ok(factors
        .get(&grouping)
        .or_else(|| factors.range(..=grouping).next_back().map(|(_, factor)| factor))
        .copied()
        .unwrap_or(1.0))
}

/// Maximum voltage drop as a fraction of nominal voltage (NBR 5410 6.2.7)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoltageDropLimit;

impl VoltageDropLimit {
    pub const TERMINAL: f64 = 0.04;
}
