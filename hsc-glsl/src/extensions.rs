//! GLSL extension selection
//!
//! Determines the minimum set of `#extension` directives required to
//! express the reachable program at the requested GLSL version. Every
//! feature declares the core version it entered the language and the
//! extension providing it in earlier versions; when extensions are
//! disallowed and the feature is not in core, selection fails.

use crate::options::GlslVersion;
use hsc_ast::ast::{AstFlags, Program, ProgramFlags};
use hsc_ast::intrinsic::Intrinsic;
use hsc_ast::register::Register;
use hsc_ast::type_denoter::TypeDenoter;
use hsc_common::{CompilerError, ShaderTarget};
use log::debug;
use std::collections::BTreeSet;

pub const ARB_COMPUTE_SHADER: &str = "GL_ARB_compute_shader";
pub const ARB_DERIVATIVE_CONTROL: &str = "GL_ARB_derivative_control";
pub const ARB_FRAGMENT_COORD_CONVENTIONS: &str = "GL_ARB_fragment_coord_conventions";
pub const ARB_GPU_SHADER_FP64: &str = "GL_ARB_gpu_shader_fp64";
pub const ARB_SHADER_IMAGE_LOAD_STORE: &str = "GL_ARB_shader_image_load_store";
pub const ARB_SHADER_STORAGE_BUFFER_OBJECT: &str = "GL_ARB_shader_storage_buffer_object";
pub const ARB_SHADING_LANGUAGE_420PACK: &str = "GL_ARB_shading_language_420pack";
pub const ARB_TEXTURE_QUERY_LOD: &str = "GL_ARB_texture_query_lod";

/// Agent computing the required extension set
pub struct ExtensionAgent {
    version: GlslVersion,
    allow_extensions: bool,
    extensions: BTreeSet<&'static str>,
}

impl ExtensionAgent {
    pub fn new(version: GlslVersion, allow_extensions: bool) -> Self {
        Self {
            version,
            allow_extensions,
            extensions: BTreeSet::new(),
        }
    }

    /// Scan the reachable program and return the ordered extension set
    pub fn determine_required_extensions(
        mut self,
        program: &Program,
        target: ShaderTarget,
    ) -> Result<BTreeSet<&'static str>, CompilerError> {
        if let Some(entry) = program.entry_point_decl() {
            for attrib in &entry.attribs {
                match attrib.ident.as_str() {
                    "earlydepthstencil" => {
                        self.require("early fragment tests", 420, ARB_SHADER_IMAGE_LOAD_STORE)?
                    }
                    "numthreads" => {
                        self.require("compute work group size", 430, ARB_COMPUTE_SHADER)?
                    }
                    _ => {}
                }
            }
        }

        if program
            .used_intrinsics
            .iter()
            .any(|intrinsic| intrinsic.is_atomic())
        {
            self.require("atomic operations", 430, ARB_SHADER_STORAGE_BUFFER_OBJECT)?;
        }
        if program
            .used_intrinsics
            .iter()
            .any(|intrinsic| intrinsic.is_derivative_control())
        {
            self.require("derivative control", 450, ARB_DERIVATIVE_CONTROL)?;
        }
        if program
            .used_intrinsics
            .contains(&Intrinsic::CalculateLevelOfDetail)
        {
            self.require("texture query LOD", 400, ARB_TEXTURE_QUERY_LOD)?;
        }

        let explicit_binding = program
            .buffers
            .iter()
            .filter(|buffer| buffer.flags.contains(AstFlags::REACHABLE))
            .any(|buffer| Register::for_target(&buffer.slot_registers, target).is_some())
            || program
                .textures
                .iter()
                .filter(|texture| texture.flags.contains(AstFlags::REACHABLE))
                .any(|texture| Register::for_target(&texture.slot_registers, target).is_some());
        if explicit_binding {
            self.require("explicit binding layout", 420, ARB_SHADING_LANGUAGE_420PACK)?;
        }

        if program.flags.contains(ProgramFlags::USES_SM3_SCREEN_SPACE)
            && target == ShaderTarget::FragmentShader
        {
            self.require(
                "fragment coordinate conventions",
                150,
                ARB_FRAGMENT_COORD_CONVENTIONS,
            )?;
        }

        if self.program_uses_double(program) {
            self.require("double-precision types", 400, ARB_GPU_SHADER_FP64)?;
        }

        debug!("required extensions: {:?}", self.extensions);
        Ok(self.extensions)
    }

    fn program_uses_double(&self, program: &Program) -> bool {
        let reachable_var_double = program
            .variables
            .iter()
            .filter(|var| var.flags.contains(AstFlags::REACHABLE))
            .any(|var| Self::denoter_uses_double(&var.ty));

        let reachable_func_double = program
            .functions
            .iter()
            .filter(|func| func.flags.contains(AstFlags::REACHABLE))
            .any(|func| {
                Self::denoter_uses_double(&func.return_type.denoter)
                    || func
                        .parameters
                        .iter()
                        .any(|param| Self::denoter_uses_double(&param.var_type.denoter))
            });

        reachable_var_double || reachable_func_double
    }

    fn denoter_uses_double(denoter: &TypeDenoter) -> bool {
        match denoter {
            TypeDenoter::Base(dt) => dt.is_double(),
            TypeDenoter::Alias { aliased, .. } => Self::denoter_uses_double(aliased),
            TypeDenoter::Array { base, .. } => Self::denoter_uses_double(base),
            _ => false,
        }
    }

    /// Demand a feature: in core it is free, otherwise an extension is
    /// added, or selection fails when extensions are disallowed
    fn require(
        &mut self,
        feature: &str,
        core_version: u32,
        extension: &'static str,
    ) -> Result<(), CompilerError> {
        if self.version.has_core(core_version) {
            return Ok(());
        }
        if self.allow_extensions {
            self.extensions.insert(extension);
            return Ok(());
        }
        Err(CompilerError::extension_error(format!(
            "feature '{}' requires GLSL {} or extension '{}', but extensions are disabled",
            feature, core_version, extension
        )))
    }
}
