//! Embedded NBR 5410 data tables
//!
//! The tables live under `share/data/` as JSON with comments and are compiled into
//! the binary. They are parsed once on first use.

use std::collections::{
    BTreeMap,
    HashMap,
};
use std::sync::LazyLock;

use jsonc_parser::ParseOptions;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::breaker::BreakerCurve;
use super::conduit::ConduitType;
use super::error::DataError;
use super::wire::{
    ReferenceMethod,
    WireInsulation,
    WireMaterial,
};

const WIRE_TABLES: &[(&str, &str)] =
    &[("copper-pvc", include_str!("../../share/data/copper-pvc.jsonc"))];
const TEMPERATURE_CORRECTION: &str = include_str!("../../share/data/temperature-correction.jsonc");
const GROUPING_CORRECTION: &str = include_str!("../../share/data/grouping-correction.jsonc");
const BREAKERS: &str = include_str!("../../share/data/breakers.jsonc");
const RIGID_CONDUIT: &str = include_str!("../../share/data/rigid-conduit.jsonc");

/// Sizes and ampacities of one conductor material and insulation
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireTable {
    pub material: WireMaterial,
    pub insulation: WireInsulation,
    /// Ω·m
    pub resistivity: f64,
    /// mm², ascending
    pub conductor_sections: Vec<f64>,
    /// mm
    pub conductor_diameters: Vec<f64>,
    /// mm, `None` where no cable is available
    pub external_diameters: Vec<Option<f64>>,
    /// method → loaded conductor count → ampacity per section (A)
    pub reference_methods: HashMap<ReferenceMethod, BTreeMap<u32, Vec<f64>>>,
}

/// One point of the temperature correction table
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct TemperaturePoint {
    /// °C
    pub temperature: i32,
    pub value: f64,
}

/// Catalog of one conduit product line
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConduitTable {
    pub conduit_type: ConduitType,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub model: String,
    pub nominal_diameters: Vec<String>,
    pub external_diameters: Vec<f64>,
    pub internal_diameters: Vec<f64>,
}

/// All tables
#[derive(Debug, Clone, PartialEq)]
pub struct InstallationData {
    pub wire_tables: Vec<WireTable>,
    /// Ascending by temperature
    pub temperature_correction: Vec<TemperaturePoint>,
    /// circuits → factor
    pub grouping_correction: BTreeMap<u32, f64>,
    /// Ascending rated currents per curve
    pub breakers: HashMap<BreakerCurve, Vec<u32>>,
    pub conduits: Vec<ConduitTable>,
}

impl InstallationData {
    /// Wire table for a material and insulation.
    #[must_use]
    pub fn wire_table(
        &self,
        material: WireMaterial,
        insulation: WireInsulation,
    ) -> Option<&WireTable> {
        self.wire_tables
            .iter()
            .find(|table| table.material == material && table.insulation == insulation)
    }

    fn load() -> Result<Self, DataError> {
        let wire_tables = WIRE_TABLES
            .iter()
            .map(|(table, text)| {
                let wires: WireTable = parse(table, text)?;
                validate_wire_table(table, &wires)?;
                Ok(wires)
            })
            .collect::<Result<Vec<_>, DataError>>()?;

        let mut temperature_correction: Vec<TemperaturePoint> =
            parse("temperature-correction", TEMPERATURE_CORRECTION)?;
        temperature_correction.sort_by_key(|point| point.temperature);
        if temperature_correction.is_empty() {
            return Err(DataError::Inconsistent {
                table: "temperature-correction",
                message: "no temperature points".to_string(),
            });
        }

        let grouping_correction: BTreeMap<u32, f64> =
            parse("grouping-correction", GROUPING_CORRECTION)?;
        if grouping_correction.is_empty() {
            return Err(DataError::Inconsistent {
                table: "grouping-correction",
                message: "no grouping factors".to_string(),
            });
        }

        let mut breakers: HashMap<BreakerCurve, Vec<u32>> = parse("breakers", BREAKERS)?;
        for currents in breakers.values_mut() {
            currents.sort_unstable();
        }

        let rigid: ConduitTable = parse("rigid-conduit", RIGID_CONDUIT)?;
        let sizes = rigid.nominal_diameters.len();
        if rigid.external_diameters.len() != sizes || rigid.internal_diameters.len() != sizes {
            return Err(DataError::Inconsistent {
                table: "rigid-conduit",
                message: "diameter lists differ in length".to_string(),
            });
        }

        tracing::debug!(wire_tables = wire_tables.len(), "Loaded installation data");

        Ok(Self {
            wire_tables,
            temperature_correction,
            grouping_correction,
            breakers,
            conduits: vec![rigid],
        })
    }
}

fn validate_wire_table(table: &'static str, wires: &WireTable) -> Result<(), DataError> {
    let sizes = wires.conductor_sections.len();
    let inconsistent = |message: String| DataError::Inconsistent { table, message };

    if wires.conductor_diameters.len() != sizes || wires.external_diameters.len() != sizes {
        return Err(inconsistent("diameter lists differ from section list".to_string()));
    }
    for (method, by_count) in &wires.reference_methods {
        for (loaded, capacities) in by_count {
            if capacities.len() != sizes {
                return Err(inconsistent(format!(
                    "method {method} with {loaded} loaded conductors has {} capacities for {sizes} sections",
                    capacities.len()
                )));
            }
        }
    }
    Ok(())
}

fn parse<T: DeserializeOwned>(table: &'static str, text: &str) -> Result<T, DataError> {
    let value = jsonc_parser::parse_to_serde_value(text, &ParseOptions::default())
        .map_err(|e| DataError::Parse { table, message: e.to_string() })?
        .ok_or_else(|| DataError::Parse { table, message: "empty document".to_string() })?;
    serde_json::from_value(value).map_err(|e| DataError::Parse { table, message: e.to_string() })
}

static DATA: LazyLock<Result<InstallationData, DataError>> = LazyLock::new(InstallationData::load);

/// Shared, parsed data tables.
///
/// # Errors
/// An embedded table is malformed.
pub fn installation_data() -> Result<&'static InstallationData, DataError> {
    DATA.as_ref().map_err(Clone::clone)
}
