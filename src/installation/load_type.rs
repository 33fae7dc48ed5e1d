use serde::{
    Deserialize,
    Serialize,
};

use super::ids::LoadTypeId;

/// Load type, determines minimum wire section and demand factor
///
/// See NBR 5410 6.2.6.1.1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadType {
    #[serde(default)]
    pub id: LoadTypeId,
    pub name: String,
    /// mm²
    pub minimum_wire_section: f64,
    pub demand_factor: f64,
}

impl LoadType {
    #[must_use]
    pub fn new(name: impl Into<String>, minimum_wire_section: f64, demand_factor: f64) -> Self {
        Self { id: LoadTypeId::new(), name: name.into(), minimum_wire_section, demand_factor }
    }
}
