//! Wire types and sizes
//!
//! See NBR 5410 6.2.3 and tables 36 to 39.

use std::f64::consts::PI;
use std::fmt;

use serde::{
    Deserialize,
    Serialize,
};

use super::data::{
    WireTable,
    installation_data,
};
use super::error::ProjectError;
use super::ids::WireTypeId;

/// Conductor material (NBR 5410 6.2.3.7)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireMaterial {
    Copper,
    Aluminium,
}

impl WireMaterial {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Copper => "copper",
            Self::Aluminium => "aluminium",
        }
    }
}

/// Insulation material (NBR 5410 6.2.3.2)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireInsulation {
    Pvc,
    Epr,
    Xlpe,
}

impl WireInsulation {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pvc => "pvc",
            Self::Epr => "epr",
            Self::Xlpe => "xlpe",
        }
    }
}

/// Reference installation method (NBR 5410 6.2.5.1.2)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReferenceMethod {
    A1,
    A2,
    B1,
    B2,
    C,
    D,
    E,
    F,
    FJuxtaposed,
    GHorizontal,
    GVertical,
}

impl ReferenceMethod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A1 => "A1",
            Self::A2 => "A2",
            Self::B1 => "B1",
            Self::B2 => "B2",
            Self::C => "C",
            Self::D => "D",
            Self::E => "E",
            Self::F => "F",
            Self::FJuxtaposed => "F_JUXTAPOSED",
            Self::GHorizontal => "G_HORIZONTAL",
            Self::GVertical => "G_VERTICAL",
        }
    }
}

impl fmt::Display for ReferenceMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A wire product available in every size of its table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireType {
    #[serde(default)]
    pub id: WireTypeId,
    pub material: WireMaterial,
    pub insulation: WireInsulation,
}

impl WireType {
    #[must_use]
    pub fn new(material: WireMaterial, insulation: WireInsulation) -> Self {
        Self { id: WireTypeId::new(), material, insulation }
    }

    fn table(&self) -> Result<&'static WireTable, ProjectError> {
        installation_data()?.wire_table(self.material, self.insulation).ok_or_else(|| {
            ProjectError::NoWireData {
                material: self.material.as_str().to_string(),
                insulation: self.insulation.as_str().to_string(),
            }
        })
    }

    /// Resistivity (Ω·m)
    pub fn resistivity(&self) -> Result<f64, ProjectError> {
        Ok(self.table()?.resistivity)
    }

    /// All sizes for an installation method and number of loaded conductors, ascending.
    ///
    /// Sizes without a commercial cable (no external diameter) are left out.
    pub fn wires(
        &self,
        method: ReferenceMethod,
        loaded_wire_count: u32,
        correction_factor: f64,
    ) -> Result<Vec<Wire>, ProjectError> {
        let table = self.table()?;
        let capacities = table
            .reference_methods
            .get(&method)
            .and_then(|by_count| by_count.get(&loaded_wire_count))
            .ok_or_else(|| ProjectError::NoCapacityData {
                method: method.to_string(),
                loaded: loaded_wire_count,
            })?;

        let wires = table
            .conductor_sections
            .iter()
            .zip(capacities)
            .zip(&table.conductor_diameters)
            .zip(&table.external_diameters)
            .filter_map(|(((&section, &uncorrected_capacity), &conductor_diameter), external)| {
                external.map(|external_diameter| Wire {
                    section,
                    uncorrected_capacity,
                    conductor_diameter,
                    external_diameter,
                    correction_factor,
                    resistivity: table.resistivity,
                })
            })
            .collect();
        Ok(wires)
    }
}

impl fmt::Display for WireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-insulated {} wire", self.insulation.as_str(), self.material.as_str())
    }
}

/// One size of a wire type, rated for a given installation
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Wire {
    /// mm²
    pub section: f64,
    /// A
    pub uncorrected_capacity: f64,
    /// mm
    pub conductor_diameter: f64,
    /// mm
    pub external_diameter: f64,
    /// Temperature × grouping
    pub correction_factor: f64,
    /// Ω·m
    pub resistivity: f64,
}

impl Wire {
    /// Current capacity corrected for temperature and grouping (A)
    #[must_use]
    pub fn capacity(&self) -> f64 {
        self.uncorrected_capacity * self.correction_factor
    }

    /// Ω/m
    #[must_use]
    pub fn resistance_per_meter(&self) -> f64 {
        self.resistivity / (self.section / 1_000_000.0)
    }

    /// Area taken by the insulated wire (mm²)
    #[must_use]
    pub fn external_section(&self) -> f64 {
        PI * (self.external_diameter / 2.0).powi(2)
    }
}

impl fmt::Display for Wire {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} mm²", self.section)
    }
}
