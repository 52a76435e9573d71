//! Shader semantics
//!
//! A semantic binds a variable or function return value to a slot of the
//! graphics pipeline. System-value semantics map to built-in identifiers
//! of the target language; user-defined semantics map to plain interface
//! variables.

use serde::{Deserialize, Serialize};
use std::fmt;

/// System-value semantics recognized by the compiler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SystemValue {
    ClipDistance,
    CullDistance,
    Depth,
    DispatchThreadId,
    GroupId,
    GroupIndex,
    GroupThreadId,
    InstanceId,
    IsFrontFace,
    Position,
    PrimitiveId,
    SampleIndex,
    Target,
    VertexId,
    /// SM3-style screen-space position (`VPOS`)
    VertexPosition,
}

impl fmt::Display for SystemValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SystemValue::ClipDistance => write!(f, "SV_ClipDistance"),
            SystemValue::CullDistance => write!(f, "SV_CullDistance"),
            SystemValue::Depth => write!(f, "SV_Depth"),
            SystemValue::DispatchThreadId => write!(f, "SV_DispatchThreadID"),
            SystemValue::GroupId => write!(f, "SV_GroupID"),
            SystemValue::GroupIndex => write!(f, "SV_GroupIndex"),
            SystemValue::GroupThreadId => write!(f, "SV_GroupThreadID"),
            SystemValue::InstanceId => write!(f, "SV_InstanceID"),
            SystemValue::IsFrontFace => write!(f, "SV_IsFrontFace"),
            SystemValue::Position => write!(f, "SV_Position"),
            SystemValue::PrimitiveId => write!(f, "SV_PrimitiveID"),
            SystemValue::SampleIndex => write!(f, "SV_SampleIndex"),
            SystemValue::Target => write!(f, "SV_Target"),
            SystemValue::VertexId => write!(f, "SV_VertexID"),
            SystemValue::VertexPosition => write!(f, "VPOS"),
        }
    }
}

/// A semantic annotation: name, index and optional system-value binding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Semantic {
    pub name: String,
    pub index: u32,
    pub system_value: Option<SystemValue>,
}

impl Semantic {
    /// Create a user-defined semantic (e.g. `TEXCOORD0`)
    pub fn user(name: &str, index: u32) -> Self {
        Self {
            name: name.to_string(),
            index,
            system_value: None,
        }
    }

    /// Create a system-value semantic with its canonical source name
    pub fn system(system_value: SystemValue, index: u32) -> Self {
        Self {
            name: system_value.to_string(),
            index,
            system_value: Some(system_value),
        }
    }

    pub fn is_system_value(&self) -> bool {
        self.system_value.is_some()
    }
}

impl fmt::Display for Semantic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.index > 0 {
            write!(f, "{}{}", self.name, self.index)
        } else {
            write!(f, "{}", self.name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_semantic() {
        let sem = Semantic::system(SystemValue::Position, 0);
        assert!(sem.is_system_value());
        assert_eq!(sem.name, "SV_Position");
        assert_eq!(format!("{}", sem), "SV_Position");
    }

    #[test]
    fn test_user_semantic() {
        let sem = Semantic::user("TEXCOORD", 2);
        assert!(!sem.is_system_value());
        assert_eq!(format!("{}", sem), "TEXCOORD2");
    }
}
