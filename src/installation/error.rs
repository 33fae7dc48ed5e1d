use thiserror::Error;
use uuid::Uuid;

/// Embedded data tables failed to load
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DataError {
    #[error("Failed to parse data table '{table}': {message}")]
    Parse { table: &'static str, message: String },
    #[error("Data table '{table}' is inconsistent: {message}")]
    Inconsistent { table: &'static str, message: String },
}

/// Installation design errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProjectError {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error("Unknown {kind} reference: {id}")]
    UnknownReference { kind: &'static str, id: Uuid },

    #[error("No wire data for {material} conductors with {insulation} insulation")]
    NoWireData { material: String, insulation: String },

    #[error("No current capacity data for method {method} with {loaded} loaded conductors")]
    NoCapacityData { method: String, loaded: u32 },

    #[error("Temperature {temperature} °C is above the maximum of {maximum} °C")]
    TemperatureOutOfRange { temperature: i32, maximum: i32 },

    #[error("No suitable {curve} curve breaker for {current:.2} A")]
    NoSuitableBreaker { current: f64, curve: String },

    #[error("No suitable wire found by {criterion}")]
    NoSuitableWire { criterion: &'static str },

    #[error("No conduit fits {filled_section:.2} mm² of wires")]
    NoSuitableConduit { filled_section: f64 },

    #[error("Circuit '{name}' is not assigned to a conduit run")]
    UnassignedCircuit { name: String },

    #[error("Circuit '{name}' is not an upstream circuit")]
    NotUpstream { name: String },

    #[error("Project has no default {kind}")]
    MissingDefault { kind: &'static str },

    #[error("Supply voltage must be positive")]
    InvalidVoltage,

    #[error("Failed to read or write project file: {0}")]
    Io(String),

    #[error("Invalid project file: {0}")]
    Format(String),
}

impl From<std::io::Error> for ProjectError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}

impl From<serde_json::Error> for ProjectError {
    fn from(error: serde_json::Error) -> Self {
        Self::Format(error.to_string())
    }
}
