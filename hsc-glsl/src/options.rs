//! Input and output descriptors for GLSL code generation

use hsc_common::ShaderTarget;
use serde::{Deserialize, Serialize};
use std::fmt;

/// GLSL output language versions
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GlslVersion {
    Glsl110,
    Glsl120,
    Glsl130,
    Glsl140,
    Glsl150,
    Glsl330,
    Glsl400,
    Glsl410,
    Glsl420,
    Glsl430,
    Glsl440,
    Glsl450,
    Glsl460,
}

impl GlslVersion {
    /// The integer value used in the `#version` directive
    pub fn number(self) -> u32 {
        match self {
            GlslVersion::Glsl110 => 110,
            GlslVersion::Glsl120 => 120,
            GlslVersion::Glsl130 => 130,
            GlslVersion::Glsl140 => 140,
            GlslVersion::Glsl150 => 150,
            GlslVersion::Glsl330 => 330,
            GlslVersion::Glsl400 => 400,
            GlslVersion::Glsl410 => 410,
            GlslVersion::Glsl420 => 420,
            GlslVersion::Glsl430 => 430,
            GlslVersion::Glsl440 => 440,
            GlslVersion::Glsl450 => 450,
            GlslVersion::Glsl460 => 460,
        }
    }

    /// Check if this version includes a feature that entered core at
    /// `version_number`
    pub fn has_core(self, version_number: u32) -> bool {
        self.number() >= version_number
    }
}

impl fmt::Display for GlslVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// Description of the shader source being compiled
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShaderInput {
    pub shader_target: ShaderTarget,
    /// Name of the source entry-point function; used for diagnostics and
    /// the header comment only
    pub entry_point: String,
}

impl ShaderInput {
    pub fn new(shader_target: ShaderTarget, entry_point: &str) -> Self {
        Self {
            shader_target,
            entry_point: entry_point.to_string(),
        }
    }
}

/// Code-generation options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Options {
    /// Allow `#extension` directives for features missing from the
    /// requested core version
    pub allow_extensions: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            allow_extensions: true,
        }
    }
}

/// Output formatting options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Formatting {
    /// Emit `#line` directives in front of declarations
    pub line_marks: bool,
    /// Prefix for renaming identifiers that collide with reserved words
    pub prefix: String,
}

impl Default for Formatting {
    fn default() -> Self {
        Self {
            line_marks: false,
            prefix: "xsc_".to_string(),
        }
    }
}

/// Description of the requested output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShaderOutput {
    pub shader_version: GlslVersion,
    pub options: Options,
    pub formatting: Formatting,
}

impl ShaderOutput {
    pub fn new(shader_version: GlslVersion) -> Self {
        Self {
            shader_version,
            options: Options::default(),
            formatting: Formatting::default(),
        }
    }
}

/// A texture binding recorded in the output statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureBinding {
    pub ident: String,
    pub binding: Option<u32>,
}

/// Accumulator for output statistics, filled during emission
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    /// Emitted texture samplers with their binding slots, in declaration
    /// order
    pub textures: Vec<TextureBinding>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_numbers() {
        assert_eq!(GlslVersion::Glsl330.number(), 330);
        assert_eq!(format!("{}", GlslVersion::Glsl450), "450");
    }

    #[test]
    fn test_has_core() {
        assert!(GlslVersion::Glsl430.has_core(420));
        assert!(GlslVersion::Glsl420.has_core(420));
        assert!(!GlslVersion::Glsl410.has_core(420));
    }

    #[test]
    fn test_version_ordering() {
        assert!(GlslVersion::Glsl150 < GlslVersion::Glsl330);
        assert!(GlslVersion::Glsl400 < GlslVersion::Glsl460);
    }
}
