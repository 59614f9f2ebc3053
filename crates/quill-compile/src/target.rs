//! Execution target description.
//!
//! A [`Target`] bundles the device [`Connectivity`] with its
//! [`NativeGateSet`]. Execution clients usually supply it as JSON:
//!
//! ```
//! use quill_compile::Target;
//! use quill_ir::StandardGate;
//!
//! let json = r#"{
//!     "connectivity": { "kind": "line", "dimension": 5 },
//!     "native_gates": { "gates": ["cz", "x90", "phase_shift"] }
//! }"#;
//! let target = Target::from_json(json).unwrap();
//! assert!(target.native_gates.contains(&StandardGate::ControlZ));
//! assert!(!target.native_gates.contains(&StandardGate::ControlX));
//! ```

use quill_ir::{GateTag, StandardGate};
use serde::{Deserialize, Serialize};

use crate::connectivity::Connectivity;
use crate::error::{CompileError, CompileResult};

/// Gate symbols a backend executes directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeGateSet {
    gates: Vec<String>,
}

impl NativeGateSet {
    /// Create a native set from gate symbols.
    pub fn new(gates: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            gates: gates.into_iter().map(Into::into).collect(),
        }
    }

    /// CZ plus half rotations around X and the phase-gate family.
    ///
    /// This is the output vocabulary of the standard native pipeline.
    pub fn cz_phase_x90() -> Self {
        Self::new([
            "cz",
            "x",
            "x90",
            "xm90",
            "z",
            "z90",
            "zm90",
            "t",
            "tdg",
            "phase_shift",
        ])
    }

    /// Check whether a symbol is in the set.
    pub fn contains_symbol(&self, symbol: &str) -> bool {
        self.gates.iter().any(|g| g == symbol)
    }

    /// Check whether a gate's kind is in the set.
    pub fn contains(&self, gate: &StandardGate) -> bool {
        self.contains_symbol(gate.tag().symbol())
    }

    /// Get the gate symbols.
    pub fn gates(&self) -> &[String] {
        &self.gates
    }

    /// Every symbol must name a known gate kind.
    pub fn validate(&self) -> CompileResult<()> {
        for symbol in &self.gates {
            if GateTag::from_symbol(symbol).is_none() {
                return Err(CompileError::InvalidTarget(format!(
                    "unknown native gate '{symbol}'"
                )));
            }
        }
        Ok(())
    }
}

impl Default for NativeGateSet {
    fn default() -> Self {
        Self::cz_phase_x90()
    }
}

/// Connectivity plus native gate set of an execution target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    /// Device connectivity.
    pub connectivity: Connectivity,
    /// Gates the device runs directly.
    #[serde(default)]
    pub native_gates: NativeGateSet,
}

impl Target {
    /// Create a target.
    pub fn new(connectivity: Connectivity, native_gates: NativeGateSet) -> Self {
        Self {
            connectivity,
            native_gates,
        }
    }

    /// Parse and validate a target from JSON.
    pub fn from_json(json: &str) -> CompileResult<Self> {
        let target: Target =
            serde_json::from_str(json).map_err(|e| CompileError::InvalidTarget(e.to_string()))?;
        target.native_gates.validate()?;
        Ok(target)
    }

    /// Serialize the target to JSON.
    pub fn to_json(&self) -> CompileResult<String> {
        serde_json::to_string(self).map_err(|e| CompileError::InvalidTarget(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_gate_set() {
        let native = NativeGateSet::cz_phase_x90();
        assert!(native.contains(&StandardGate::ControlZ));
        assert!(native.contains(&StandardGate::PhaseShift(0.3)));
        assert!(!native.contains(&StandardGate::Hadamard));
        assert!(native.validate().is_ok());
    }

    #[test]
    fn test_target_json_roundtrip() {
        let target = Target::new(Connectivity::lattice(2, 3), NativeGateSet::cz_phase_x90());
        let json = target.to_json().unwrap();
        assert_eq!(Target::from_json(&json).unwrap(), target);
    }

    #[test]
    fn test_target_defaults_native_set() {
        let target = Target::from_json(r#"{"connectivity":{"kind":"all_to_all"}}"#).unwrap();
        assert_eq!(target.native_gates, NativeGateSet::cz_phase_x90());
    }

    #[test]
    fn test_target_rejects_unknown_gate() {
        let json = r#"{"connectivity":{"kind":"all_to_all"},"native_gates":{"gates":["warp"]}}"#;
        assert!(matches!(
            Target::from_json(json),
            Err(CompileError::InvalidTarget(_))
        ));
        assert!(matches!(
            Target::from_json("not json"),
            Err(CompileError::InvalidTarget(_))
        ));
    }
}
