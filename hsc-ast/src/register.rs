//! Register binding annotations
//!
//! A register annotation is a source-side binding slot such as
//! `register(b0)` or `register(vs, t1)`. A declaration carries an ordered
//! list of them; lookup picks the entry matching the current shader stage
//! and falls back to a stage-agnostic one.

use hsc_common::ShaderTarget;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single register slot annotation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Register {
    /// The stage this entry applies to; `None` applies to all stages
    pub target: Option<ShaderTarget>,
    /// The register class prefix letter (`b`, `t`, `s`, `u`)
    pub prefix: char,
    /// The slot index
    pub slot: u32,
}

impl Register {
    pub fn new(prefix: char, slot: u32) -> Self {
        Self {
            target: None,
            prefix,
            slot,
        }
    }

    pub fn for_stage(target: ShaderTarget, prefix: char, slot: u32) -> Self {
        Self {
            target: Some(target),
            prefix,
            slot,
        }
    }

    /// Find the best-matching register for a shader stage
    ///
    /// A stage-specific entry wins over a stage-agnostic one.
    pub fn for_target(slots: &[Register], target: ShaderTarget) -> Option<&Register> {
        slots
            .iter()
            .find(|reg| reg.target == Some(target))
            .or_else(|| slots.iter().find(|reg| reg.target.is_none()))
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.prefix, self.slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_target_prefers_stage_match() {
        let slots = vec![
            Register::new('t', 0),
            Register::for_stage(ShaderTarget::FragmentShader, 't', 3),
        ];

        let reg = Register::for_target(&slots, ShaderTarget::FragmentShader).unwrap();
        assert_eq!(reg.slot, 3);

        let reg = Register::for_target(&slots, ShaderTarget::VertexShader).unwrap();
        assert_eq!(reg.slot, 0);
    }

    #[test]
    fn test_for_target_empty() {
        assert!(Register::for_target(&[], ShaderTarget::VertexShader).is_none());
    }
}
