//! Electrical installation project
//!
//! Objects are stored in flat lists and referenced by id. Circuits form a tree through
//! upstream circuits.

use std::path::Path;

use serde::{
    Deserialize,
    Serialize,
};

use super::circuit::{
    Circuit,
    CircuitLoad,
    Sizing,
    SizingInput,
    size_circuit,
};
use super::conduit::{
    ConduitFill,
    ConduitRun,
};
use super::correction::{
    grouping_factor,
    temperature_factor,
};
use super::error::ProjectError;
use super::ids::{
    CircuitId,
    ConduitRunId,
    LoadTypeId,
    ProjectId,
    SupplyId,
    WireTypeId,
};
use super::load_type::LoadType;
use super::supply::Supply;
use super::wire::{
    ReferenceMethod,
    WireInsulation,
    WireMaterial,
    WireType,
};

/// Names given to objects created by [`Project::new_default_with`] and [`Project::new_circuit`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultNames {
    pub load_type: String,
    pub conduit_run: String,
    pub circuit: String,
}

impl Default for DefaultNames {
    fn default() -> Self {
        Self {
            load_type: "Power".to_string(),
            conduit_run: "New Conduit Run".to_string(),
            circuit: "New Circuit".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default)]
    pub id: ProjectId,
    pub name: String,
    #[serde(default)]
    pub supplies: Vec<Supply>,
    #[serde(default)]
    pub load_types: Vec<LoadType>,
    #[serde(default)]
    pub wire_types: Vec<WireType>,
    #[serde(default)]
    pub conduit_runs: Vec<ConduitRun>,
    /// Top level circuits
    #[serde(default)]
    pub circuits: Vec<Circuit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_supply: Option<SupplyId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_load_type: Option<LoadTypeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_wire_type: Option<WireTypeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_conduit_run: Option<ConduitRunId>,
}

impl Project {
    /// Empty project.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ProjectId::new(),
            name: name.into(),
            supplies: Vec::new(),
            load_types: Vec::new(),
            wire_types: Vec::new(),
            conduit_runs: Vec::new(),
            circuits: Vec::new(),
            default_supply: None,
            default_load_type: None,
            default_wire_type: None,
            default_conduit_run: None,
        }
    }

    /// Project with one object of each kind, set as defaults, and one circuit.
    #[must_use]
    pub fn new_default(name: impl Into<String>) -> Self {
        Self::new_default_with(name, &DefaultNames::default())
    }

    #[must_use]
    pub fn new_default_with(name: impl Into<String>, names: &DefaultNames) -> Self {
        let supply = Supply::new(127);
        let load_type = LoadType::new(names.load_type.as_str(), 2.5, 1.0);
        let wire_type = WireType::new(WireMaterial::Copper, WireInsulation::Pvc);
        let conduit_run = ConduitRun::new(names.conduit_run.as_str(), 10.0, ReferenceMethod::B1, 30);
        let circuit = Circuit::new(
            names.circuit.as_str(),
            supply.id,
            load_type.id,
            wire_type.id,
            CircuitLoad::Terminal { load_power: 1000.0 },
        )
        .with_conduit_run(conduit_run.id);

        Self {
            default_supply: Some(supply.id),
            default_load_type: Some(load_type.id),
            default_wire_type: Some(wire_type.id),
            default_conduit_run: Some(conduit_run.id),
            supplies: vec![supply],
            load_types: vec![load_type],
            wire_types: vec![wire_type],
            conduit_runs: vec![conduit_run],
            circuits: vec![circuit],
            ..Self::new(name)
        }
    }

    pub fn supply(&self, id: SupplyId) -> Result<&Supply, ProjectError> {
        self.supplies
            .iter()
            .find(|supply| supply.id == id)
            .ok_or(ProjectError::UnknownReference { kind: "supply", id: id.0 })
    }

    pub fn load_type(&self, id: LoadTypeId) -> Result<&LoadType, ProjectError> {
        self.load_types
            .iter()
            .find(|load_type| load_type.id == id)
            .ok_or(ProjectError::UnknownReference { kind: "load type", id: id.0 })
    }

    pub fn wire_type(&self, id: WireTypeId) -> Result<&WireType, ProjectError> {
        self.wire_types
            .iter()
            .find(|wire_type| wire_type.id == id)
            .ok_or(ProjectError::UnknownReference { kind: "wire type", id: id.0 })
    }

    pub fn conduit_run(&self, id: ConduitRunId) -> Result<&ConduitRun, ProjectError> {
        self.conduit_runs
            .iter()
            .find(|run| run.id == id)
            .ok_or(ProjectError::UnknownReference { kind: "conduit run", id: id.0 })
    }

    /// Every circuit in tree order with its depth.
    #[must_use]
    pub fn walk(&self) -> Vec<(usize, &Circuit)> {
        self.circuits.iter().flat_map(Circuit::walk).collect()
    }

    #[must_use]
    pub fn circuit(&self, id: CircuitId) -> Option<&Circuit> {
        self.walk().into_iter().map(|(_, circuit)| circuit).find(|circuit| circuit.id == id)
    }

    /// New circuit using the project defaults. It is not added to the project.
    pub fn new_circuit(
        &self,
        name: impl Into<String>,
        load: CircuitLoad,
    ) -> Result<Circuit, ProjectError> {
        let supply = self.default_supply.ok_or(ProjectError::MissingDefault { kind: "supply" })?;
        let load_type =
            self.default_load_type.ok_or(ProjectError::MissingDefault { kind: "load type" })?;
        let wire_type =
            self.default_wire_type.ok_or(ProjectError::MissingDefault { kind: "wire type" })?;

        let circuit = Circuit::new(name, supply, load_type, wire_type, load);
        Ok(match self.default_conduit_run {
            Some(run) => circuit.with_conduit_run(run),
            None => circuit,
        })
    }

    /// Adds a circuit at the top level or under an upstream circuit.
    pub fn add_circuit(
        &mut self,
        parent: Option<CircuitId>,
        circuit: Circuit,
    ) -> Result<(), ProjectError> {
        let Some(parent) = parent else {
            self.circuits.push(circuit);
            return Ok(());
        };

        let target = find_circuit_mut(&mut self.circuits, parent)
            .ok_or(ProjectError::UnknownReference { kind: "circuit", id: parent.0 })?;
        let name = target.name.clone();
        target.push_child(circuit).map_err(|_| ProjectError::NotUpstream { name })
    }

    /// Apparent power (W).
    ///
    /// Upstream circuits sum their children, each weighted by its load type demand factor.
    pub fn circuit_power(&self, circuit: &Circuit) -> Result<f64, ProjectError> {
        match &circuit.load {
            CircuitLoad::Terminal { load_power } => Ok(*load_power),
            CircuitLoad::Upstream { circuits } => circuits.iter().try_fold(0.0, |total, child| {
                let demand_factor = self.load_type(child.load_type)?.demand_factor;
                Ok(total + self.circuit_power(child)? * demand_factor)
            }),
        }
    }

    /// Number of circuits assigned to a conduit run.
    #[must_use]
    pub fn grouping(&self, run: ConduitRunId) -> u32 {
        let count = self.circuits_in_run(run).len();
        u32::try_from(count).unwrap_or(u32::MAX)
    }

    fn circuits_in_run(&self, run: ConduitRunId) -> Vec<&Circuit> {
        self.walk()
            .into_iter()
            .map(|(_, circuit)| circuit)
            .filter(|circuit| circuit.conduit_run == Some(run))
            .collect()
    }

    /// Temperature × grouping factor of a conduit run.
    pub fn correction_factor(&self, run: &ConduitRun) -> Result<f64, ProjectError> {
        Ok(temperature_factor(run.temperature)? * grouping_factor(self.grouping(run.id))?)
    }

    /// Sizes a circuit.
    pub fn calculate(&self, circuit: &Circuit) -> Result<Sizing, ProjectError> {
        let run_id = circuit
            .conduit_run
            .ok_or_else(|| ProjectError::UnassignedCircuit { name: circuit.name.clone() })?;
        let run = self.conduit_run(run_id)?;
        let supply = self.supply(circuit.supply)?;
        let load_type = self.load_type(circuit.load_type)?;
        let wire_type = self.wire_type(circuit.wire_type)?;

        let wires = wire_type.wires(
            run.reference_method,
            supply.loaded_wire_count(),
            self.correction_factor(run)?,
        )?;

        size_circuit(&SizingInput {
            power: self.circuit_power(circuit)?,
            voltage: supply.voltage,
            length: circuit.length,
            minimum_section: load_type.minimum_wire_section,
            breaker_curve: circuit.breaker_curve,
            wires: &wires,
        })
    }

    /// Conduit for a run, sized for the wires of every circuit in it.
    pub fn conduit_fill(&self, run: ConduitRunId) -> Result<ConduitFill, ProjectError> {
        self.conduit_run(run)?;

        let mut filled_section = 0.0;
        let mut conductor_count = 0;
        for circuit in self.circuits_in_run(run) {
            let wire_count = self.supply(circuit.supply)?.wire_count();
            let sizing = self.calculate(circuit)?;
            filled_section += sizing.wire.external_section() * f64::from(wire_count);
            conductor_count += wire_count;
        }

        ConduitFill::select(filled_section, conductor_count)
    }

    /// Checks that every reference resolves.
    pub fn validate(&self) -> Result<(), ProjectError> {
        for (_, circuit) in self.walk() {
            self.supply(circuit.supply)?;
            self.load_type(circuit.load_type)?;
            self.wire_type(circuit.wire_type)?;
            if let Some(run) = circuit.conduit_run {
                self.conduit_run(run)?;
            }
        }
        if let Some(id) = self.default_supply {
            self.supply(id)?;
        }
        if let Some(id) = self.default_load_type {
            self.load_type(id)?;
        }
        if let Some(id) = self.default_wire_type {
            self.wire_type(id)?;
        }
        if let Some(id) = self.default_conduit_run {
            self.conduit_run(id)?;
        }
        Ok(())
    }

    /// Parses and validates a project.
    pub fn from_json(text: &str) -> Result<Self, ProjectError> {
        let project: Self = serde_json::from_str(text)?;
        project.validate()?;
        Ok(project)
    }

    pub fn to_json(&self) -> Result<String, ProjectError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: &Path) -> Result<Self, ProjectError> {
        let text = std::fs::read_to_string(path)?;
        let project = Self::from_json(&text)?;
        tracing::debug!(path = %path.display(), circuits = project.walk().len(), "Loaded project");
        Ok(project)
    }

    pub fn save(&self, path: &Path) -> Result<(), ProjectError> {
        let mut text = self.to_json()?;
        text.push('\n');
        std::fs::write(path, text)?;
        tracing::debug!(path = %path.display(), "Saved project");
        Ok(())
    }
}

fn find_circuit_mut(circuits: &mut [Circuit], id: CircuitId) -> Option<&mut Circuit> {
    for circuit in circuits {
        if circuit.id == id {
            return Some(circuit);
        }
        if let CircuitLoad::Upstream { circuits } = &mut circuit.load
            && let Some(found) = find_circuit_mut(circuits, id)
        {
            return Some(found);
        }
    }
    None
}
