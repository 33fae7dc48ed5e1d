//! Typed identifiers for project objects.
//!
//! Objects reference each other by id; the ids are serialized as UUID strings.

use std::fmt;

use serde::{
    Deserialize,
    Serialize,
};
use uuid::Uuid;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Random (v4) id.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

define_id!(ProjectId);
define_id!(SupplyId);
define_id!(LoadTypeId);
define_id!(WireTypeId);
define_id!(ConduitRunId);
define_id!(
    /// Shared by terminal and upstream circuits.
    CircuitId
);
