//! AST conversion for GLSL code generation
//!
//! Rewrites and annotates the program so the generator can stay free of
//! source-language knowledge beyond the keyword and intrinsic tables:
//!
//! - renames declarations that collide with GLSL reserved words
//! - classifies the entry-point interface into system-value copies and
//!   file-scope `in`/`out` declarations
//! - suppresses declarations with no GLSL counterpart (sampler states)
//! - collects nested struct declarations for hoisting
//! - validates register prefixes and detects SM3 screen-space addressing

use crate::keywords::is_reserved_word;
use hsc_ast::ast::{AstFlags, Program, ProgramFlags, StmntKind, StructId, VarId};
use hsc_ast::semantic::SystemValue;
use hsc_ast::type_denoter::TypeDenoter;
use hsc_common::{Reporter, ShaderTarget};
use log::debug;

/// Converter pass preparing the AST for GLSL emission
pub struct GlslConverter {
    target: ShaderTarget,
    prefix: String,
}

impl GlslConverter {
    pub fn new(target: ShaderTarget, prefix: &str) -> Self {
        Self {
            target,
            prefix: prefix.to_string(),
        }
    }

    /// Run all conversion steps on the program
    pub fn convert(&mut self, program: &mut Program, reporter: &mut Reporter) {
        self.mark_entry_point(program);
        self.rename_reserved_idents(program);
        self.convert_entry_point_interface(program);
        self.mark_suppressed_declarations(program);
        self.collect_nested_structs(program);
        self.normalize_registers(program, reporter);
    }

    fn mark_entry_point(&self, program: &mut Program) {
        if let Some(id) = program.entry_point {
            program.function_mut(id).flags |= AstFlags::IS_ENTRY_POINT;
        }
    }

    /// Rename declarations whose identifier is reserved in GLSL
    ///
    /// Identifier chains resolve their final spelling through the symbol
    /// reference at emission time, so renaming the declaration is enough.
    fn rename_reserved_idents(&self, program: &mut Program) {
        let prefix = self.prefix.as_str();

        let rename = |ident: &mut String| {
            if is_reserved_word(ident) {
                let renamed = format!("{}{}", prefix, ident);
                debug!("renaming reserved identifier '{}' to '{}'", ident, renamed);
                *ident = renamed;
            }
        };

        for decl in &mut program.functions {
            rename(&mut decl.ident);
        }
        for decl in &mut program.variables {
            rename(&mut decl.ident);
        }
        for decl in &mut program.structs {
            rename(&mut decl.ident);
        }
        for decl in &mut program.buffers {
            rename(&mut decl.ident);
        }
        for decl in &mut program.textures {
            rename(&mut decl.ident);
        }
    }

    /// Split the entry-point signature into the internal interface form
    ///
    /// Parameters carrying system-value semantics become locally
    /// re-declared copies; the rest become file-scope inputs. A struct
    /// return type becomes the output interface; otherwise the entry
    /// point's own return semantic drives the terminal assignment.
    fn convert_entry_point_interface(&self, program: &mut Program) {
        let Some(entry_id) = program.entry_point else {
            return;
        };

        let mut sv_inputs: Vec<VarId> = Vec::new();
        let mut global_inputs: Vec<VarId> = Vec::new();
        let mut input_structs: Vec<(StructId, String)> = Vec::new();
        let mut uses_sm3 = false;

        {
            let entry = program.function(entry_id);
            for param in &entry.parameters {
                for &vid in &param.var_decls {
                    let var = program.variable(vid);
                    match var.ty.resolved().as_ref() {
                        TypeDenoter::Struct(sid) => {
                            input_structs.push((*sid, var.ident.clone()));
                        }
                        _ => match &var.semantic {
                            Some(sem) if sem.is_system_value() => {
                                if sem.system_value == Some(SystemValue::VertexPosition) {
                                    uses_sm3 = true;
                                }
                                sv_inputs.push(vid);
                            }
                            _ => global_inputs.push(vid),
                        },
                    }
                }
            }
        }

        // System-value members of struct-typed inputs also become local
        // copies; the remaining members stay in the interface block.
        for (sid, _) in &input_structs {
            for member in &program.struct_decl(*sid).members {
                if let StmntKind::VarDecl(vds) = &member.kind {
                    for &vid in &vds.var_decls {
                        let var = program.variable(vid);
                        if let Some(sem) = &var.semantic {
                            if sem.is_system_value() {
                                if sem.system_value == Some(SystemValue::VertexPosition) {
                                    uses_sm3 = true;
                                }
                                sv_inputs.push(vid);
                            }
                        }
                    }
                }
            }
        }

        let mut sv_outputs: Vec<VarId> = Vec::new();
        let mut global_outputs: Vec<VarId> = Vec::new();

        let output_struct = {
            let entry = program.function(entry_id);
            match entry.return_type.denoter.resolved().as_ref() {
                TypeDenoter::Struct(sid) => Some(*sid),
                _ => None,
            }
        };

        if let Some(sid) = output_struct {
            for member in &program.struct_decl(sid).members {
                if let StmntKind::VarDecl(vds) = &member.kind {
                    for &vid in &vds.var_decls {
                        let var = program.variable(vid);
                        match &var.semantic {
                            Some(sem) if sem.is_system_value() => sv_outputs.push(vid),
                            _ => global_outputs.push(vid),
                        }
                    }
                }
            }
        }

        if uses_sm3 && self.target == ShaderTarget::FragmentShader {
            debug!("program uses SM3 screen-space addressing");
            program.flags |= ProgramFlags::USES_SM3_SCREEN_SPACE;
        }

        for (sid, instance) in input_structs {
            let decl = program.struct_decl_mut(sid);
            decl.flags |= AstFlags::IS_SHADER_INPUT;
            if decl.alias_name.is_empty() {
                decl.alias_name = instance;
            }
        }

        if let Some(sid) = output_struct {
            let decl = program.struct_decl_mut(sid);
            decl.flags |= AstFlags::IS_SHADER_OUTPUT;
            if decl.alias_name.is_empty() {
                decl.alias_name = format!("{}output", self.prefix);
            }
        }

        let entry = program.function_mut(entry_id);
        entry.input_semantics.var_refs_sv = sv_inputs;
        entry.input_semantics.var_refs = global_inputs;
        entry.output_semantics.var_refs_sv = sv_outputs;
        entry.output_semantics.var_refs = global_outputs;
    }

    /// Mark declarations that must not be emitted
    ///
    /// Sampler-state objects are merged into the GLSL sampler of the
    /// texture they are applied to, so their declarations disappear.
    fn mark_suppressed_declarations(&self, program: &mut Program) {
        for var in &mut program.variables {
            if matches!(var.ty.resolved().as_ref(), TypeDenoter::SamplerState) {
                var.flags |= AstFlags::DISABLE_CODEGEN;
            }
        }
    }

    /// Collect nested struct declarations on their enclosing root struct
    ///
    /// The list is stored outer-to-inner; the generator hoists it in
    /// reverse so every struct is defined textually before its first use.
    fn collect_nested_structs(&self, program: &mut Program) {
        let count = program.structs.len();

        let mut direct: Vec<Vec<StructId>> = Vec::with_capacity(count);
        for decl in &program.structs {
            let mut nested = Vec::new();
            for member in &decl.members {
                match &member.kind {
                    StmntKind::VarDecl(vds) => {
                        if let Some(sid) = vds.var_type.struct_decl {
                            nested.push(sid);
                        }
                    }
                    StmntKind::StructDecl(sid) => nested.push(*sid),
                    _ => {}
                }
            }
            direct.push(nested);
        }

        let mut is_nested = vec![false; count];
        for nested in &direct {
            for sid in nested {
                is_nested[sid.0 as usize] = true;
            }
        }
        for (index, nested) in is_nested.iter().enumerate() {
            if *nested {
                program.structs[index].flags |= AstFlags::IS_NESTED_STRUCT;
            }
        }

        fn gather(
            direct: &[Vec<StructId>],
            id: StructId,
            out: &mut Vec<StructId>,
            visited: &mut Vec<bool>,
        ) {
            for &nested in &direct[id.0 as usize] {
                if visited[nested.0 as usize] {
                    continue;
                }
                visited[nested.0 as usize] = true;
                out.push(nested);
                gather(direct, nested, out, visited);
            }
        }

        for index in 0..count {
            if is_nested[index] {
                continue;
            }
            let mut collected = Vec::new();
            let mut visited = vec![false; count];
            gather(&direct, StructId(index as u32), &mut collected, &mut visited);
            if !collected.is_empty() {
                program.structs[index].nested_struct_refs = collected;
            }
        }
    }

    /// Validate register prefixes against the declaration kind
    ///
    /// Uniform buffers bind through `b` registers; textures through `t`,
    /// or `u` for read-write resources. Mismatches are reported and the
    /// register is still used for binding emission.
    fn normalize_registers(&self, program: &Program, reporter: &mut Reporter) {
        for buffer in &program.buffers {
            for reg in &buffer.slot_registers {
                if reg.prefix != 'b' {
                    reporter.error(
                        format!(
                            "invalid register prefix '{}' for uniform buffer '{}' (expected 'b')",
                            reg.prefix, buffer.ident
                        ),
                        Some(buffer.span.clone()),
                    );
                }
            }
        }

        for texture in &program.textures {
            let expected = if texture.texture_type.is_rw() { 'u' } else { 't' };
            for reg in &texture.slot_registers {
                if reg.prefix != expected {
                    reporter.error(
                        format!(
                            "invalid register prefix '{}' for texture '{}' (expected '{}')",
                            reg.prefix, texture.ident, expected
                        ),
                        Some(texture.span.clone()),
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hsc_ast::ast::{
        BufferDecl, CodeBlock, FunctionDecl, StructDecl, TextureDecl, VarDecl, VarDeclStmnt,
        VarType,
    };
    use hsc_ast::register::Register;
    use hsc_ast::semantic::Semantic;
    use hsc_ast::type_denoter::{BufferType, ScalarType};
    use hsc_common::SourceSpan;
    use std::rc::Rc;

    fn span() -> SourceSpan {
        SourceSpan::dummy()
    }

    fn convert(program: &mut Program, target: ShaderTarget) -> Reporter {
        let mut reporter = Reporter::new();
        GlslConverter::new(target, "xsc_").convert(program, &mut reporter);
        reporter
    }

    #[test]
    fn test_reserved_ident_renamed() {
        let mut program = Program::new();
        let id = program.add_variable(VarDecl::new(
            "texture",
            TypeDenoter::scalar(ScalarType::Float),
            span(),
        ));
        let keep = program.add_variable(VarDecl::new(
            "color",
            TypeDenoter::scalar(ScalarType::Float),
            span(),
        ));

        convert(&mut program, ShaderTarget::VertexShader);

        assert_eq!(program.variable(id).ident, "xsc_texture");
        assert_eq!(program.variable(keep).ident, "color");
    }

    #[test]
    fn test_entry_point_parameter_classification() {
        let mut program = Program::new();

        let pos = program.add_variable(
            VarDecl::new("p", TypeDenoter::vector(ScalarType::Float, 3), span())
                .with_semantic(Semantic::user("POSITION", 0)),
        );
        let vid = program.add_variable(
            VarDecl::new("id", TypeDenoter::scalar(ScalarType::UInt), span())
                .with_semantic(Semantic::system(SystemValue::VertexId, 0)),
        );

        let mut entry = FunctionDecl::new(
            "VS",
            VarType::new(TypeDenoter::vector(ScalarType::Float, 4)),
            span(),
        );
        entry.parameters.push(VarDeclStmnt::new(
            VarType::new(TypeDenoter::vector(ScalarType::Float, 3)),
            vec![pos],
            span(),
        ));
        entry.parameters.push(VarDeclStmnt::new(
            VarType::new(TypeDenoter::scalar(ScalarType::UInt)),
            vec![vid],
            span(),
        ));
        entry.body = Some(CodeBlock::default());
        entry.semantic = Some(Semantic::system(SystemValue::Position, 0));
        let entry_id = program.add_function(entry);
        program.entry_point = Some(entry_id);

        convert(&mut program, ShaderTarget::VertexShader);

        let entry = program.function(entry_id);
        assert!(entry.is_entry_point());
        assert_eq!(entry.input_semantics.var_refs, vec![pos]);
        assert_eq!(entry.input_semantics.var_refs_sv, vec![vid]);
        assert!(entry.output_semantics.var_refs_sv.is_empty());
    }

    #[test]
    fn test_sm3_screen_space_detection() {
        let mut program = Program::new();

        let vpos = program.add_variable(
            VarDecl::new("screen", TypeDenoter::vector(ScalarType::Float, 4), span())
                .with_semantic(Semantic::system(SystemValue::VertexPosition, 0)),
        );
        let mut entry = FunctionDecl::new(
            "PS",
            VarType::new(TypeDenoter::vector(ScalarType::Float, 4)),
            span(),
        );
        entry.parameters.push(VarDeclStmnt::new(
            VarType::new(TypeDenoter::vector(ScalarType::Float, 4)),
            vec![vpos],
            span(),
        ));
        entry.body = Some(CodeBlock::default());
        let entry_id = program.add_function(entry);
        program.entry_point = Some(entry_id);

        convert(&mut program, ShaderTarget::FragmentShader);
        assert!(program.flags.contains(ProgramFlags::USES_SM3_SCREEN_SPACE));
    }

    #[test]
    fn test_sampler_state_suppressed() {
        let mut program = Program::new();
        let id = program.add_variable(VarDecl::new(
            "linearSampler",
            Rc::new(TypeDenoter::SamplerState),
            span(),
        ));

        convert(&mut program, ShaderTarget::FragmentShader);
        assert!(program.variable(id).flags.contains(AstFlags::DISABLE_CODEGEN));
    }

    #[test]
    fn test_nested_struct_collection() {
        let mut program = Program::new();

        let inner_id = program.add_struct(StructDecl::new("Inner", Vec::new(), span()));
        let inner_var = program.add_variable(VarDecl::new(
            "inner",
            Rc::new(TypeDenoter::Struct(inner_id)),
            span(),
        ));
        let member = hsc_ast::ast::Stmnt::new(
            StmntKind::VarDecl(VarDeclStmnt {
                var_type: VarType::with_struct(inner_id, Rc::new(TypeDenoter::Struct(inner_id))),
                var_decls: vec![inner_var],
                storage_classes: Vec::new(),
                type_modifiers: Vec::new(),
                input_modifier: None,
                flags: AstFlags::empty(),
                span: span(),
            }),
            span(),
        );
        let outer_id = program.add_struct(StructDecl::new("Outer", vec![member], span()));

        convert(&mut program, ShaderTarget::VertexShader);

        assert!(program
            .struct_decl(inner_id)
            .flags
            .contains(AstFlags::IS_NESTED_STRUCT));
        assert!(!program
            .struct_decl(outer_id)
            .flags
            .contains(AstFlags::IS_NESTED_STRUCT));
        assert_eq!(program.struct_decl(outer_id).nested_struct_refs, vec![inner_id]);
    }

    #[test]
    fn test_register_prefix_validation() {
        let mut program = Program::new();

        let mut buffer = BufferDecl::new("Scene", Vec::new(), span());
        buffer.slot_registers.push(Register::new('t', 0));
        program.add_buffer(buffer);

        let mut texture = TextureDecl::new("albedo", BufferType::Texture2D, span());
        texture.slot_registers.push(Register::new('t', 1));
        program.add_texture(texture);

        let reporter = convert(&mut program, ShaderTarget::FragmentShader);

        // The buffer register is wrong, the texture register is fine
        assert_eq!(reporter.error_count(), 1);
        assert!(reporter.diagnostics()[0]
            .message
            .contains("expected 'b'"));
    }
}
