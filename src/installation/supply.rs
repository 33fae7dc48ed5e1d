use std::fmt;

use serde::{
    Deserialize,
    Serialize,
};

use super::ids::SupplyId;

/// Power supply feeding a circuit (e.g. 3 phase 220 V)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Supply {
    #[serde(default)]
    pub id: SupplyId,
    /// Nominal voltage (V)
    pub voltage: u32,
    #[serde(default = "default_phases")]
    pub phases: u32,
    #[serde(default = "default_true")]
    pub has_neutral: bool,
    #[serde(default = "default_true")]
    pub has_ground: bool,
}

const fn default_phases() -> u32 {
    1
}

const fn default_true() -> bool {
    true
}

impl Supply {
    /// Single phase supply with neutral and ground.
    #[must_use]
    pub fn new(voltage: u32) -> Self {
        Self { id: SupplyId::new(), voltage, phases: 1, has_neutral: true, has_ground: true }
    }

    /// Number of current carrying conductors.
    #[must_use]
    pub fn loaded_wire_count(&self) -> u32 {
        self.phases + u32::from(self.has_neutral)
    }

    /// Number of conductors, ground included.
    #[must_use]
    pub fn wire_count(&self) -> u32 {
        self.loaded_wire_count() + u32::from(self.has_ground)
    }
}

impl fmt::Display for Supply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let neutral = if self.has_neutral { "+N" } else { "" };
        write!(f, "{} V {}P{neutral}", self.voltage, self.phases)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::single_phase(1, true, true, 2, 3, "127 V 1P+N")]
    #[case::no_ground(1, true, false, 2, 2, "127 V 1P+N")]
    #[case::two_phases(2, false, true, 2, 3, "127 V 2P")]
    #[case::three_phases(3, true, true, 4, 5, "127 V 3P+N")]
    fn test_wire_counts(
        #[case] phases: u32,
        #[case] has_neutral: bool,
        #[case] has_ground: bool,
        #[case] loaded: u32,
        #[case] total: u32,
        #[case] display: &str,
    ) {
        let supply = Supply { phases, has_neutral, has_ground, ..Supply::new(127) };

        assert_eq!(supply.loaded_wire_count(), loaded);
        assert_eq!(supply.wire_count(), total);
        assert_eq!(supply.to_string(), display);
    }

    #[test]
    #[allow(clippy::unwrap_used)]
    fn test_deserialize_defaults() {
        let supply: Supply = serde_json::from_str(r#"{"voltage": 220}"#).unwrap();

        assert_eq!(supply.voltage, 220);
        assert_eq!(supply.loaded_wire_count(), 2);
        assert_eq!(supply.wire_count(), 3);
    }
}
