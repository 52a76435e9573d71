//! HSC shader cross-compiler - Common types
//!
//! This crate provides the infrastructure shared across compiler phases:
//! - Error types and the diagnostic reporter
//! - Source location tracking
//! - Shader pipeline stage identifiers

pub mod error;
pub mod source_loc;
pub mod target;

pub use error::{CompilerError, Diagnostic, Reporter, Severity};
pub use source_loc::{HasSpan, SourceLocation, SourceSpan};
pub use target::ShaderTarget;
