//! Shader pipeline stages
//!
//! The target stage is shared between the AST (register lookup is
//! stage-sensitive) and the back ends.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The shader pipeline stage a program is compiled for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShaderTarget {
    VertexShader,
    TessControlShader,
    TessEvaluationShader,
    GeometryShader,
    FragmentShader,
    ComputeShader,
}

impl fmt::Display for ShaderTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderTarget::VertexShader => write!(f, "vertex"),
            ShaderTarget::TessControlShader => write!(f, "tessellation control"),
            ShaderTarget::TessEvaluationShader => write!(f, "tessellation evaluation"),
            ShaderTarget::GeometryShader => write!(f, "geometry"),
            ShaderTarget::FragmentShader => write!(f, "fragment"),
            ShaderTarget::ComputeShader => write!(f, "compute"),
        }
    }
}
