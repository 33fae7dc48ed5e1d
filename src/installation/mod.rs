//! NBR 5410 circuit sizing
//!
//! Breaker, wire section and conduit selection for low voltage installations.

pub mod breaker;
pub mod circuit;
pub mod conduit;
pub mod correction;
pub mod data;
pub mod error;
pub mod ids;
pub mod load_type;
pub mod project;
pub mod supply;
pub mod wire;

pub use breaker::{
    Breaker,
    BreakerCurve,
};
pub use circuit::{
    Circuit,
    CircuitLoad,
    Sizing,
    SizingCriteria,
};
pub use conduit::{
    Conduit,
    ConduitFill,
    ConduitRun,
    ConduitType,
};
pub use correction::VoltageDropLimit;
pub use error::{
    DataError,
    ProjectError,
};
pub use ids::{
    CircuitId,
    ConduitRunId,
    LoadTypeId,
    ProjectId,
    SupplyId,
    WireTypeId,
};
pub use load_type::LoadType;
pub use project::{
    DefaultNames,
    Project,
};
pub use supply::Supply;
pub use wire::{
    ReferenceMethod,
    Wire,
    WireInsulation,
    WireMaterial,
    WireType,
};
