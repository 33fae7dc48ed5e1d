//! Circuits and their sizing
//!
//! A circuit either feeds a load directly (terminal) or feeds a group of downstream
//! circuits (upstream). Sizing picks the breaker first, then the smallest wire for each
//! criterion, and keeps the largest of those wires.

use serde::{
    Deserialize,
    Serialize,
};

use super::breaker::{
    Breaker,
    BreakerCurve,
};
use super::correction::VoltageDropLimit;
use super::error::ProjectError;
use super::ids::{
    CircuitId,
    ConduitRunId,
    LoadTypeId,
    SupplyId,
    WireTypeId,
};
use super::wire::Wire;

/// What a circuit feeds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum CircuitLoad {
    /// A single load
    Terminal {
        /// W
        load_power: f64,
    },
    /// Downstream circuits
    Upstream {
        #[serde(default)]
        circuits: Vec<Circuit>,
    },
}

/// Circuit of an installation
///
/// Supply, load type, wire type and conduit run are references into the project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Circuit {
    #[serde(default)]
    pub id: CircuitId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub supply: SupplyId,
    pub load_type: LoadTypeId,
    pub wire_type: WireTypeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conduit_run: Option<ConduitRunId>,
    #[serde(default)]
    pub breaker_curve: BreakerCurve,
    /// m
    pub length: f64,
    #[serde(flatten)]
    pub load: CircuitLoad,
}

impl Circuit {
    /// 10 m circuit on curve C, not yet assigned to a conduit run.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        supply: SupplyId,
        load_type: LoadTypeId,
        wire_type: WireTypeId,
        load: CircuitLoad,
    ) -> Self {
        Self {
            id: CircuitId::new(),
            name: name.into(),
            description: String::new(),
            supply,
            load_type,
            wire_type,
            conduit_run: None,
            breaker_curve: BreakerCurve::C,
            length: 10.0,
            load,
        }
    }

    #[must_use]
    pub const fn with_conduit_run(mut self, conduit_run: ConduitRunId) -> Self {
        self.conduit_run = Some(conduit_run);
        self
    }

    #[must_use]
    pub const fn with_length(mut self, length: f64) -> Self {
        self.length = length;
        self
    }

    #[must_use]
    pub const fn is_upstream(&self) -> bool {
        matches!(self.load, CircuitLoad::Upstream { .. })
    }

    /// Downstream circuits (empty for terminal circuits).
    #[must_use]
    pub fn children(&self) -> &[Self] {
        match &self.load {
            CircuitLoad::Upstream { circuits } => circuits,
            CircuitLoad::Terminal { .. } => &[],
        }
    }

    /// Adds a downstream circuit. Returns the circuit back when this one is terminal.
    pub fn push_child(&mut self, circuit: Self) -> Result<(), Self> {
        match &mut self.load {
            CircuitLoad::Upstream { circuits } => {
                circuits.push(circuit);
                Ok(())
            }
            CircuitLoad::Terminal { .. } => Err(circuit),
        }
    }

    /// This circuit and its descendants, depth first, with their depth.
    #[must_use]
    pub fn walk(&self) -> Vec<(usize, &Self)> {
        let mut circuits = Vec::new();
        self.walk_into(0, &mut circuits);
        circuits
    }

    fn walk_into<'a>(&'a self, depth: usize, circuits: &mut Vec<(usize, &'a Self)>) {
        circuits.push((depth, self));
        for child in self.children() {
            child.walk_into(depth + 1, circuits);
        }
    }
}

/// Resolved values a circuit is sized from
#[derive(Debug, Clone, Copy)]
pub struct SizingInput<'a> {
    /// W
    pub power: f64,
    /// V
    pub voltage: u32,
    /// m
    pub length: f64,
    /// mm²
    pub minimum_section: f64,
    pub breaker_curve: BreakerCurve,
    /// Corrected sizes of the wire type, ascending
    pub wires: &'a [Wire],
}

/// Smallest wire section found by each criterion (mm²)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SizingCriteria {
    pub minimum_section: f64,
    pub current_capacity: f64,
    pub voltage_drop: f64,
    pub breaker: f64,
}

/// Sizing result of a circuit
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sizing {
    /// W
    pub power: f64,
    /// A
    pub current: f64,
    pub breaker: Breaker,
    pub wire: Wire,
    /// Fraction of nominal voltage
    pub voltage_drop: f64,
    pub criteria: SizingCriteria,
}

/// Voltage drop over a circuit as a fraction of the nominal voltage.
#[must_use]
pub fn voltage_drop(wire: &Wire, current: f64, length: f64, voltage: u32) -> f64 {
    let resistance = wire.resistance_per_meter() * 2.0 * length;
    current * resistance / f64::from(voltage)
}

/// Picks breaker and wire for a circuit.
pub fn size_circuit(input: &SizingInput<'_>) -> Result<Sizing, ProjectError> {
    if input.voltage == 0 {
        return Err(ProjectError::InvalidVoltage);
    }
    let current = input.power / f64::from(input.voltage);
    let breaker = Breaker::smallest_for(input.breaker_curve, current)?;

    let smallest = |criterion: &'static str, fits: &dyn Fn(&Wire) -> bool| {
        input
            .wires
            .iter()
            .find(|wire| fits(wire))
            .ok_or(ProjectError::NoSuitableWire { criterion })
    };

    let by_minimum =
        smallest("minimum section", &|wire| wire.section >= input.minimum_section)?;
    let by_capacity = smallest("current capacity", &|wire| wire.capacity() >= current)?;
    let by_voltage_drop = smallest("voltage drop", &|wire| {
        voltage_drop(wire, current, input.length, input.voltage) <= VoltageDropLimit::TERMINAL
    })?;
    let by_breaker =
        smallest("breaker", &|wire| wire.capacity() >= f64::from(breaker.current))?;

    let criteria = SizingCriteria {
        minimum_section: by_minimum.section,
        current_capacity: by_capacity.section,
        voltage_drop: by_voltage_drop.section,
        breaker: by_breaker.section,
    };
    let wire = *[by_minimum, by_capacity, by_voltage_drop, by_breaker]
        .into_iter()
        .max_by(|a, b| a.section.total_cmp(&b.section))
        .unwrap_or(by_minimum);

    tracing::trace!(current, breaker = %breaker, wire = %wire, "Sized circuit");

    Ok(Sizing {
        power: input.power,
        current,
        breaker,
        voltage_drop: voltage_drop(&wire, current, input.length, input.voltage),
        wire,
        criteria,
    })
}
