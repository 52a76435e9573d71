//! HSC shader cross-compiler - GLSL back end
//!
//! This crate turns a parsed and semantically checked program AST into
//! GLSL source text for a chosen language version and shader stage:
//! - Control path analysis: marks functions that may miss a return
//! - Conversion: rewrites the AST into a GLSL-expressible form
//! - Reference analysis: marks declarations reachable from the entry point
//! - Extension selection: computes the required `#extension` set
//! - Generation: the depth-first emission traversal

pub mod control_path;
pub mod converter;
pub mod extensions;
pub mod generator;
pub mod intrinsics;
pub mod keywords;
pub mod options;
pub mod reference;
pub mod writer;

pub use control_path::ControlPathAnalyzer;
pub use converter::GlslConverter;
pub use extensions::ExtensionAgent;
pub use generator::generate;
pub use options::{
    Formatting, GlslVersion, Options, ShaderInput, ShaderOutput, Statistics, TextureBinding,
};
pub use reference::ReferenceAnalyzer;
pub use writer::SourceWriter;
