//! Conduits and conduit runs

use std::f64::consts::PI;
use std::fmt;

use serde::{
    Deserialize,
    Serialize,
};

use super::data::installation_data;
use super::error::ProjectError;
use super::ids::ConduitRunId;
use super::wire::ReferenceMethod;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConduitType {
    Rigid,
    Flexible,
}

/// One size of a conduit product
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Conduit {
    pub conduit_type: ConduitType,
    /// e.g. `3/4"`
    pub nominal_diameter: String,
    /// mm
    pub external_diameter: f64,
    /// mm
    pub internal_diameter: f64,
    pub brand: String,
    pub model: String,
}

impl Conduit {
    /// Every catalog conduit, ascending by size.
    pub fn all() -> Result<Vec<Self>, ProjectError> {
        let data = installation_data()?;
        let mut conduits: Vec<Self> = data
            .conduits
            .iter()
            .flat_map(|table| {
                table
                    .nominal_diameters
                    .iter()
                    .zip(&table.external_diameters)
                    .zip(&table.internal_diameters)
                    .map(|((nominal, &external_diameter), &internal_diameter)| Self {
                        conduit_type: table.conduit_type,
                        nominal_diameter: nominal.clone(),
                        external_diameter,
                        internal_diameter,
                        brand: table.brand.clone(),
                        model: table.model.clone(),
                    })
            })
            .collect();
        conduits.sort_by(|a, b| a.internal_diameter.total_cmp(&b.internal_diameter));
        Ok(conduits)
    }

    /// Internal section (mm²)
    #[must_use]
    pub fn section(&self) -> f64 {
        PI * (self.internal_diameter / 2.0).powi(2)
    }
}

impl fmt::Display for Conduit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.1} mm)", self.nominal_diameter, self.internal_diameter)
    }
}

/// Maximum fraction of the conduit section wires may occupy (NBR 5410 6.2.11.1.6).
#[must_use]
pub const fn max_fill_factor(conductor_count: u32) -> f64 {
    match conductor_count {
        1 => 0.53,
        2 => 0.31,
        _ => 0.40,
    }
}

/// Path shared by several circuits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConduitRun {
    #[serde(default)]
    pub id: ConduitRunId,
    pub name: String,
    /// m
    pub length: f64,
    pub reference_method: ReferenceMethod,
    /// Ambient temperature (°C)
    pub temperature: i32,
}

impl ConduitRun {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        length: f64,
        reference_method: ReferenceMethod,
        temperature: i32,
    ) -> Self {
        Self { id: ConduitRunId::new(), name: name.into(), length, reference_method, temperature }
    }
}

/// Conduit chosen for a run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConduitFill {
    pub conduit: Conduit,
    /// Sum of wire external sections (mm²)
    pub filled_section: f64,
    /// Fraction of the conduit section occupied
    pub fill_factor: f64,
    pub conductor_count: u32,
}

impl ConduitFill {
    /// Smallest conduit holding `filled_section` mm² of `conductor_count` wires.
    pub fn select(filled_section: f64, conductor_count: u32) -> Result<Self, ProjectError> {
        let max_fill = max_fill_factor(conductor_count);
        let conduit = Conduit::all()?
            .into_iter()
            .find(|conduit| conduit.section() * max_fill >= filled_section)
            .ok_or(ProjectError::NoSuitableConduit { filled_section })?;

        let fill_factor = filled_section / conduit.section();
        Ok(Self { conduit, filled_section, fill_factor, conductor_count })
    }
}
