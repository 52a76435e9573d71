//! GLSL code generation
//!
//! The generator is a depth-first traversal over the converted and
//! annotated AST, producing GLSL text through the [`SourceWriter`] sink.
//! Recoverable problems are recorded through the reporter and the
//! traversal keeps going so one run surfaces as many diagnostics as
//! possible; [`generate`] returns an error when any error-severity
//! diagnostic was recorded.

use crate::control_path::ControlPathAnalyzer;
use crate::converter::GlslConverter;
use crate::extensions::ExtensionAgent;
use crate::intrinsics::intrinsic_to_glsl_keyword;
use crate::keywords::{
    buffer_type_to_glsl_keyword, ctrl_transfer_to_glsl_keyword, data_type_to_glsl_keyword,
    semantic_to_glsl_keyword, storage_class_to_glsl_keyword,
};
use crate::options::{GlslVersion, ShaderInput, ShaderOutput, Statistics, TextureBinding};
use crate::reference::ReferenceAnalyzer;
use crate::writer::SourceWriter;
use hsc_ast::ast::{
    AstFlags, Attribute, CodeBlock, DeclRef, Expr, ExprKind, FunctionCall, FunctionId, Program,
    ProgramFlags, Stmnt, StmntKind, StructId, SwitchCase, TextureDeclStmnt, VarDeclStmnt, VarId,
    VarIdent, VarType,
};
use hsc_ast::intrinsic::Intrinsic;
use hsc_ast::register::Register;
use hsc_ast::type_denoter::{subscript_data_type, DataType, TypeDenoter};
use hsc_common::{CompilerError, Reporter, ShaderTarget, SourceSpan};
use log::debug;
use std::collections::BTreeSet;
use std::rc::Rc;

/// Generate GLSL source text for a program
///
/// Runs the annotation passes (control paths, conversion, reference
/// analysis, extension selection) and then emits the program. Returns
/// the produced source, or an error when at least one error-severity
/// diagnostic was recorded along the way.
pub fn generate(
    program: &mut Program,
    input_desc: &ShaderInput,
    output_desc: &ShaderOutput,
    stats: Option<&mut Statistics>,
    reporter: &mut Reporter,
) -> Result<String, CompilerError> {
    if program.entry_point.is_none() {
        reporter.error(
            format!("entry point \"{}\" not found", input_desc.entry_point),
            None,
        );
        return Err(CompilerError::generation_failed(
            "code generation failed: missing entry point".to_string(),
        ));
    }

    debug!(
        "generating GLSL {} for {} shader, entry point \"{}\"",
        output_desc.shader_version, input_desc.shader_target, input_desc.entry_point
    );

    ControlPathAnalyzer::new().mark_control_paths(program);
    GlslConverter::new(input_desc.shader_target, &output_desc.formatting.prefix)
        .convert(program, reporter);
    ReferenceAnalyzer::new().mark_references_from_entry_point(program);

    let extensions = match ExtensionAgent::new(
        output_desc.shader_version,
        output_desc.options.allow_extensions,
    )
    .determine_required_extensions(program, input_desc.shader_target)
    {
        Ok(extensions) => extensions,
        Err(err) => {
            reporter.error(err.to_string(), None);
            BTreeSet::new()
        }
    };

    let generator = Generator::new(program, input_desc, output_desc, stats, reporter);
    let source = generator.run(&extensions);

    if reporter.has_errors() {
        Err(CompilerError::generation_failed(format!(
            "code generation failed: {}",
            reporter.summary()
        )))
    } else {
        Ok(source)
    }
}

/// The emission traversal state
struct Generator<'a> {
    program: &'a Program,
    reporter: &'a mut Reporter,
    stats: Option<&'a mut Statistics>,
    writer: SourceWriter,
    target: ShaderTarget,
    version: GlslVersion,
    line_marks: bool,
    entry_point_name: String,
    inside_entry_point: bool,
    inside_interface_block: bool,
}

impl<'a> Generator<'a> {
    fn new(
        program: &'a Program,
        input_desc: &ShaderInput,
        output_desc: &ShaderOutput,
        stats: Option<&'a mut Statistics>,
        reporter: &'a mut Reporter,
    ) -> Self {
        Self {
            program,
            reporter,
            stats,
            writer: SourceWriter::new(),
            target: input_desc.shader_target,
            version: output_desc.shader_version,
            line_marks: output_desc.formatting.line_marks,
            entry_point_name: input_desc.entry_point.clone(),
            inside_entry_point: false,
            inside_interface_block: false,
        }
    }

    fn run(mut self, extensions: &BTreeSet<&'static str>) -> String {
        self.write_program(extensions);
        self.writer.into_source()
    }

    /* ------- Diagnostics ------- */

    fn error(&mut self, message: String, span: Option<&SourceSpan>) {
        self.reporter.error(message, span.cloned());
    }

    fn warning(&mut self, message: String, span: Option<&SourceSpan>) {
        self.reporter.warning(message, span.cloned());
    }

    fn error_invalid_num_args(&mut self, construct: &str, span: Option<&SourceSpan>) {
        self.error(
            format!("invalid number of arguments for {}", construct),
            span,
        );
    }

    /* ------- Writer helpers ------- */

    fn comment(&mut self, text: &str) {
        self.writer.write_ln(&format!("// {}", text));
    }

    fn line_mark(&mut self, span: &SourceSpan) {
        if self.line_marks && span.start.line > 0 {
            self.writer.write_ln(&format!("#line {}", span.start.line));
        }
    }

    fn open_scope(&mut self) {
        self.writer.write_ln("{");
        self.writer.inc_indent();
    }

    fn close_scope(&mut self, semicolon: bool) {
        self.writer.dec_indent();
        self.writer.write_ln(if semicolon { "};" } else { "}" });
    }

    fn is_version_at_least(&self, version_number: u32) -> bool {
        self.version.has_core(version_number)
    }

    /* ------- Program ------- */

    fn write_program(&mut self, extensions: &BTreeSet<&'static str>) {
        let program = self.program;

        // The version directive always leads the output
        self.writer
            .write_ln(&format!("#version {}", self.version.number()));
        self.writer.blank();

        if !extensions.is_empty() {
            for extension in extensions {
                self.writer
                    .write_ln(&format!("#extension {} : enable", extension));
            }
            self.writer.blank();
        }

        if self.entry_point_name.is_empty() {
            self.comment(&format!("GLSL {} shader", self.target));
        } else {
            let entry = self.entry_point_name.clone();
            self.comment(&format!("GLSL {} shader \"{}\"", self.target, entry));
        }
        self.comment("Generated by the HSC shader cross-compiler");
        self.writer.blank();

        if self.target == ShaderTarget::FragmentShader
            && program.flags.contains(ProgramFlags::USES_SM3_SCREEN_SPACE)
        {
            self.writer
                .write_ln("layout(origin_upper_left, pixel_center_integer) in vec4 gl_FragCoord;");
            self.writer.blank();
        }

        if let Some(entry) = program.entry_point_decl() {
            if !entry.attribs.is_empty() {
                for attrib in &entry.attribs {
                    self.write_attribute(attrib);
                }
                self.writer.blank();
            }
        }

        self.write_referenced_intrinsics();

        if self.target == ShaderTarget::VertexShader {
            self.write_global_input_semantics();
        } else if self.target == ShaderTarget::FragmentShader {
            self.write_global_output_semantics();
        }

        for stmnt in &program.global_stmnts {
            self.visit_stmnt(stmnt);
        }
    }

    /// Write helper definitions for intrinsics without a GLSL counterpart
    fn write_referenced_intrinsics(&mut self) {
        if self.program.used_intrinsics.contains(&Intrinsic::Clip) {
            self.write_clip_intrinsics();
        }
    }

    fn write_clip_intrinsics(&mut self) {
        self.writer
            .write_ln("void clip(float x) { if (x < 0.0) discard; }");
        for type_name in ["vec2", "vec3", "vec4"] {
            self.writer.write_ln(&format!(
                "void clip({0} x) {{ if (any(lessThan(x, {0}(0.0)))) discard; }}",
                type_name
            ));
        }
        self.writer.blank();
    }

    /* ------- Attributes ------- */

    fn write_attribute(&mut self, attrib: &Attribute) {
        match attrib.ident.as_str() {
            "numthreads" => self.write_attribute_num_threads(attrib),
            "earlydepthstencil" => self.writer.write_ln("layout(early_fragment_tests) in;"),
            // Unknown attributes have no GLSL meaning and are dropped
            _ => {}
        }
    }

    fn write_attribute_num_threads(&mut self, attrib: &Attribute) {
        if attrib.arguments.len() != 3 {
            self.error_invalid_num_args("\"numthreads\" attribute", Some(&attrib.span));
            return;
        }

        self.writer.begin_ln();
        self.writer.write("layout(local_size_x = ");
        self.visit_expr(&attrib.arguments[0]);
        self.writer.write(", local_size_y = ");
        self.visit_expr(&attrib.arguments[1]);
        self.writer.write(", local_size_z = ");
        self.visit_expr(&attrib.arguments[2]);
        self.writer.write(") in;");
        self.writer.end_ln();
    }

    /* ------- Statements ------- */

    fn visit_stmnt(&mut self, stmnt: &Stmnt) {
        match &stmnt.kind {
            StmntKind::Null => self.writer.write_ln(";"),

            StmntKind::CodeBlock(block) => self.visit_code_block(block),

            StmntKind::FunctionDecl(id) => self.write_function_decl(*id),

            StmntKind::BufferDecl(id) => self.write_buffer_decl_stmnt(*id, stmnt),

            StmntKind::TextureDecl(decl_stmnt) => {
                self.write_texture_decl_stmnt(decl_stmnt, stmnt)
            }

            StmntKind::StructDecl(id) => self.write_struct_decl_stmnt(*id, stmnt),

            StmntKind::AliasDecl(alias) => {
                if let Some(id) = alias.struct_decl {
                    self.write_alias_decl_stmnt(id, stmnt);
                }
            }

            StmntKind::VarDecl(decl_stmnt) => self.write_var_decl_stmnt(decl_stmnt),

            StmntKind::For {
                init,
                condition,
                iteration,
                body,
            } => self.write_for_stmnt(init, condition.as_ref(), iteration.as_ref(), body),

            StmntKind::While { condition, body } => {
                self.writer.begin_ln();
                self.writer.write("while (");
                self.visit_expr(condition);
                self.writer.write(")");
                self.writer.end_ln();
                self.write_scoped_stmnt(body);
            }

            StmntKind::DoWhile { body, condition } => {
                self.writer.write_ln("do");
                self.write_scoped_stmnt(body);
                self.writer.begin_ln();
                self.writer.write("while (");
                self.visit_expr(condition);
                self.writer.write(");");
                self.writer.end_ln();
            }

            StmntKind::If {
                condition,
                body,
                else_stmnt,
            } => self.write_if_stmnt(condition, body, else_stmnt.as_deref(), false),

            StmntKind::Switch { selector, cases } => {
                self.writer.begin_ln();
                self.writer.write("switch (");
                self.visit_expr(selector);
                self.writer.write(")");
                self.writer.end_ln();

                self.open_scope();
                for case in cases {
                    self.write_switch_case(case);
                }
                self.close_scope(false);
            }

            StmntKind::Expr(expr) => {
                self.writer.begin_ln();
                self.visit_expr(expr);
                self.writer.write(";");
                self.writer.end_ln();
            }

            StmntKind::Return { expr } => self.write_return_stmnt(stmnt, expr.as_ref()),

            StmntKind::CtrlTransfer(transfer) => {
                let keyword = ctrl_transfer_to_glsl_keyword(*transfer);
                self.writer.write_ln(&format!("{};", keyword));
            }
        }
    }

    fn visit_code_block(&mut self, block: &CodeBlock) {
        self.open_scope();
        for stmnt in &block.stmnts {
            self.visit_stmnt(stmnt);
        }
        self.close_scope(false);
    }

    /// Indent a single-statement body; blocks carry their own braces
    fn write_scoped_stmnt(&mut self, stmnt: &Stmnt) {
        if matches!(stmnt.kind, StmntKind::CodeBlock(_)) {
            self.visit_stmnt(stmnt);
        } else {
            self.writer.inc_indent();
            self.visit_stmnt(stmnt);
            self.writer.dec_indent();
        }
    }

    fn write_for_stmnt(
        &mut self,
        init: &Stmnt,
        condition: Option<&Expr>,
        iteration: Option<&Expr>,
        body: &Stmnt,
    ) {
        self.writer.begin_ln();
        self.writer.write("for (");

        // The init statement writes its own terminator
        self.writer.push_options(false, false);
        self.visit_stmnt(init);
        self.writer.write(" ");
        if let Some(condition) = condition {
            self.visit_expr(condition);
        }
        self.writer.write("; ");
        if let Some(iteration) = iteration {
            self.visit_expr(iteration);
        }
        self.writer.pop_options();

        self.writer.write(")");
        self.writer.end_ln();

        self.write_scoped_stmnt(body);
    }

    fn write_if_stmnt(
        &mut self,
        condition: &Expr,
        body: &Stmnt,
        else_stmnt: Option<&Stmnt>,
        from_else: bool,
    ) {
        if !from_else {
            self.writer.begin_ln();
        }
        self.writer.write("if (");
        self.visit_expr(condition);
        self.writer.write(")");
        self.writer.end_ln();

        self.write_scoped_stmnt(body);

        if let Some(else_stmnt) = else_stmnt {
            self.write_else_stmnt(else_stmnt);
        }
    }

    fn write_else_stmnt(&mut self, stmnt: &Stmnt) {
        if let StmntKind::If {
            condition,
            body,
            else_stmnt,
        } = &stmnt.kind
        {
            // Fold the chain onto one header line: "else if (...)"
            self.writer.begin_ln();
            self.writer.write("else ");
            self.write_if_stmnt(condition, body, else_stmnt.as_deref(), true);
        } else {
            self.writer.write_ln("else");
            self.write_scoped_stmnt(stmnt);
        }
    }

    fn write_switch_case(&mut self, case: &SwitchCase) {
        if let Some(expr) = &case.expr {
            self.writer.begin_ln();
            self.writer.write("case ");
            self.visit_expr(expr);
            self.writer.write(":");
            self.writer.end_ln();
        } else {
            self.writer.write_ln("default:");
        }

        self.writer.inc_indent();
        for stmnt in &case.stmnts {
            self.visit_stmnt(stmnt);
        }
        self.writer.dec_indent();
    }

    fn write_return_stmnt(&mut self, stmnt: &Stmnt, expr: Option<&Expr>) {
        if self.inside_entry_point {
            // Inside main, returning means assigning the output semantics
            self.write_output_semantics_assignment(expr);
            if !stmnt.flags.contains(AstFlags::IS_END_OF_FUNCTION) {
                self.writer.write_ln("return;");
            }
        } else if let Some(expr) = expr {
            self.writer.begin_ln();
            self.writer.write("return ");
            self.visit_expr(expr);
            self.writer.write(";");
            self.writer.end_ln();
        } else if !stmnt.flags.contains(AstFlags::IS_END_OF_FUNCTION) {
            self.writer.write_ln("return;");
        }
    }

    /* ------- Declarations ------- */

    fn write_function_decl(&mut self, id: FunctionId) {
        let program = self.program;
        let func = program.function(id);

        if !func.flags.contains(AstFlags::REACHABLE) {
            if func.flags.contains(AstFlags::HAS_NON_RETURN_CONTROL_PATH) {
                self.warning(
                    format!(
                        "not all control paths in unreferenced function '{}' return a value",
                        func.ident
                    ),
                    Some(&func.span),
                );
            }
            return;
        }

        if func.flags.contains(AstFlags::HAS_NON_RETURN_CONTROL_PATH) {
            self.error(
                format!(
                    "not all control paths in function '{}' return a value",
                    func.ident
                ),
                Some(&func.span),
            );
            return;
        }

        self.line_mark(&func.span);

        self.writer.begin_ln();
        if func.is_entry_point() {
            self.writer.write("void main()");
        } else {
            self.visit_var_type(&func.return_type, Some(&func.span));
            self.writer.write(&format!(" {}(", func.ident));
            for (index, param) in func.parameters.iter().enumerate() {
                self.write_parameter(param);
                if index + 1 < func.parameters.len() {
                    self.writer.write(", ");
                }
            }
            self.writer.write(")");
            if func.body.is_none() {
                // Forward declaration
                self.writer.write(";");
            }
        }
        self.writer.end_ln();

        if let Some(body) = &func.body {
            if func.is_entry_point() {
                self.open_scope();

                self.write_local_input_semantics();
                self.write_local_output_semantics();

                self.inside_entry_point = true;
                for stmnt in &body.stmnts {
                    self.visit_stmnt(stmnt);
                }
                self.inside_entry_point = false;

                // Without a trailing return statement the output
                // semantics still have to be assigned
                let ends_with_return = body.stmnts.last().is_some_and(Stmnt::is_return);
                if !ends_with_return {
                    self.write_output_semantics_assignment(None);
                }

                self.close_scope(false);
            } else {
                self.visit_code_block(body);
            }
        }

        self.writer.blank();
    }

    fn write_parameter(&mut self, param: &VarDeclStmnt) {
        if let Some(modifier) = param.input_modifier {
            self.writer.write(&format!("{} ", modifier));
        }
        for modifier in &param.type_modifiers {
            if modifier == "const" {
                self.writer.write("const ");
            }
        }

        self.visit_var_type(&param.var_type, Some(&param.span));
        self.writer.write(" ");

        if param.var_decls.len() == 1 {
            self.write_var_decl(param.var_decls[0]);
        } else {
            self.error(
                "invalid number of variables in function parameter".to_string(),
                Some(&param.span),
            );
        }
    }

    fn write_buffer_decl_stmnt(&mut self, id: hsc_ast::ast::BufferId, stmnt: &Stmnt) {
        let program = self.program;
        let buffer = program.buffer(id);

        if !buffer.flags.contains(AstFlags::REACHABLE) {
            return;
        }

        self.line_mark(&stmnt.span);

        self.writer.begin_ln();
        self.writer.write("layout(std140");
        if let Some(reg) = Register::for_target(&buffer.slot_registers, self.target) {
            self.writer.write(&format!(", binding = {}", reg.slot));
        }
        self.writer.write(") uniform ");
        self.writer.write(&buffer.ident);
        self.writer.end_ln();

        self.open_scope();
        for member in &buffer.members {
            self.visit_stmnt(member);
        }
        self.close_scope(true);

        self.writer.blank();
    }

    fn write_texture_decl_stmnt(&mut self, decl_stmnt: &TextureDeclStmnt, stmnt: &Stmnt) {
        let program = self.program;

        let any_reachable = decl_stmnt
            .decls
            .iter()
            .any(|&id| program.texture(id).flags.contains(AstFlags::REACHABLE));
        if !any_reachable {
            return;
        }

        let Some(sampler_type) = buffer_type_to_glsl_keyword(decl_stmnt.texture_type) else {
            self.error(
                "failed to map texture type to GLSL sampler type".to_string(),
                Some(&stmnt.span),
            );
            return;
        };

        for &id in &decl_stmnt.decls {
            let texture = program.texture(id);
            if !texture.flags.contains(AstFlags::REACHABLE) {
                continue;
            }

            self.writer.begin_ln();
            let mut binding = None;
            if let Some(reg) = Register::for_target(&texture.slot_registers, self.target) {
                self.writer
                    .write(&format!("layout(binding = {}) ", reg.slot));
                binding = Some(reg.slot);
            }
            self.writer
                .write(&format!("uniform {} {};", sampler_type, texture.ident));
            self.writer.end_ln();

            if let Some(stats) = &mut self.stats {
                stats.textures.push(TextureBinding {
                    ident: texture.ident.clone(),
                    binding,
                });
            }
        }

        self.writer.blank();
    }

    fn write_struct_decl_stmnt(&mut self, id: StructId, stmnt: &Stmnt) {
        let program = self.program;
        let decl = program.struct_decl(id);

        if !decl.flags.contains(AstFlags::REACHABLE) {
            return;
        }

        self.line_mark(&stmnt.span);
        self.visit_struct_decl(id, true);
        self.writer.blank();
    }

    fn write_alias_decl_stmnt(&mut self, id: StructId, stmnt: &Stmnt) {
        let program = self.program;
        let decl = program.struct_decl(id);

        if decl.is_anonymous() || !decl.flags.contains(AstFlags::REACHABLE) {
            return;
        }

        self.line_mark(&stmnt.span);
        self.visit_struct_decl(id, true);
        self.writer.blank();
    }

    fn write_var_decl_stmnt(&mut self, decl_stmnt: &VarDeclStmnt) {
        let program = self.program;

        // Filter out suppressed declarations and system values inside
        // interface blocks (those become built-in accesses instead)
        let inside_interface_block = self.inside_interface_block;
        let var_decls: Vec<VarId> = decl_stmnt
            .var_decls
            .iter()
            .copied()
            .filter(|&id| {
                let var = program.variable(id);
                if var.flags.contains(AstFlags::DISABLE_CODEGEN) {
                    return false;
                }
                if !var.flags.contains(AstFlags::REACHABLE) {
                    return false;
                }
                if inside_interface_block
                    && var.semantic.as_ref().is_some_and(|sem| sem.is_system_value())
                {
                    return false;
                }
                true
            })
            .collect();

        if var_decls.is_empty() {
            return;
        }

        self.writer.begin_ln();

        if decl_stmnt.flags.contains(AstFlags::IS_SHADER_INPUT) {
            self.writer.write("in ");
        } else if decl_stmnt.flags.contains(AstFlags::IS_SHADER_OUTPUT) {
            self.writer.write("out ");
        }

        for &storage_class in &decl_stmnt.storage_classes {
            match storage_class_to_glsl_keyword(storage_class) {
                Some(keyword) => self.writer.write(&format!("{} ", keyword)),
                None => self.error(
                    format!(
                        "storage class '{}' cannot be mapped to a GLSL keyword",
                        storage_class
                    ),
                    Some(&decl_stmnt.span),
                ),
            }
        }

        for modifier in &decl_stmnt.type_modifiers {
            if modifier == "const" {
                self.writer.write("const ");
            }
        }

        if decl_stmnt.var_type.struct_decl.is_some() {
            // An inline struct definition precedes the declared names
            self.visit_var_type(&decl_stmnt.var_type, Some(&decl_stmnt.span));
            self.writer.begin_ln();
        } else {
            self.visit_var_type(&decl_stmnt.var_type, Some(&decl_stmnt.span));
            self.writer.write(" ");
        }

        for (index, &id) in var_decls.iter().enumerate() {
            self.write_var_decl(id);
            if index + 1 < var_decls.len() {
                self.writer.write(", ");
            }
        }

        self.writer.write(";");
        self.writer.end_ln();
    }

    fn write_var_decl(&mut self, id: VarId) {
        let program = self.program;
        let var = program.variable(id);

        self.writer.write(&var.ident);
        self.write_array_dims(&var.array_dims);

        if let Some(init) = &var.initializer {
            self.writer.write(" = ");
            self.visit_expr(init);
        }
    }

    fn visit_var_type(&mut self, var_type: &VarType, span: Option<&SourceSpan>) {
        if let Some(id) = var_type.struct_decl {
            self.visit_struct_decl(id, false);
        } else {
            self.write_type_denoter(&var_type.denoter, span);
        }
    }

    /* ------- Structures ------- */

    fn visit_struct_decl(&mut self, id: StructId, semicolon: bool) {
        let program = self.program;
        let decl = program.struct_decl(id);

        // Hoist nested structures of a root struct, innermost first
        if !decl.flags.contains(AstFlags::IS_NESTED_STRUCT) {
            for &nested in decl.nested_struct_refs.iter().rev() {
                self.write_struct_decl(nested, true, true);
                self.writer.blank();
            }
        }

        self.write_struct_decl(id, semicolon, false);
    }

    fn write_struct_decl(&mut self, id: StructId, write_semicolon: bool, allow_nested: bool) {
        let program = self.program;
        let decl = program.struct_decl(id);

        if !decl.flags.contains(AstFlags::IS_NESTED_STRUCT) || allow_nested {
            if decl
                .flags
                .intersects(AstFlags::IS_SHADER_INPUT | AstFlags::IS_SHADER_OUTPUT)
            {
                // Interface block
                self.writer.begin_ln();
                if decl.flags.contains(AstFlags::IS_SHADER_INPUT) {
                    self.writer.write("in ");
                } else {
                    self.writer.write("out ");
                }
                self.writer.write(&decl.ident);
                self.writer.end_ln();

                self.open_scope();
                self.inside_interface_block = true;
                for member in &decl.members {
                    self.visit_stmnt(member);
                }
                self.inside_interface_block = false;
                self.close_scope(false);

                self.writer.write_ln(&format!("{};", decl.alias_name));
            } else {
                self.writer.begin_ln();
                self.writer.write("struct");
                if !decl.ident.is_empty() {
                    self.writer.write(&format!(" {}", decl.ident));
                }
                self.writer.end_ln();

                self.open_scope();
                self.write_struct_decl_members(id);
                self.close_scope(write_semicolon);
            }
        } else if !write_semicolon {
            // A nested struct used as a member type: just its name; the
            // declaring statement continues the line
            self.writer.begin_ln();
            self.writer.write(&format!("{} ", decl.ident));
        }
    }

    /// Base struct members come first, then the struct's own
    fn write_struct_decl_members(&mut self, id: StructId) {
        let program = self.program;
        let decl = program.struct_decl(id);

        if let Some(base) = decl.base_struct {
            self.write_struct_decl_members(base);
        }
        for member in &decl.members {
            self.visit_stmnt(member);
        }
    }

    /* ------- Input/output semantics ------- */

    fn write_local_input_semantics(&mut self) {
        let program = self.program;
        let Some(entry) = program.entry_point_decl() else {
            return;
        };

        let mut written = false;
        for &id in &entry.input_semantics.var_refs_sv {
            let var = program.variable(id);
            if let Some(semantic) = &var.semantic {
                match semantic_to_glsl_keyword(semantic, self.target) {
                    Some(keyword) => {
                        self.writer.begin_ln();
                        self.write_type_denoter(&var.ty, Some(&var.span));
                        self.writer
                            .write(&format!(" {} = {};", var.ident, keyword));
                        self.writer.end_ln();
                    }
                    None => self.error(
                        format!(
                            "failed to map semantic '{}' to GLSL keyword",
                            semantic
                        ),
                        Some(&var.span),
                    ),
                }
                written = true;
            }
        }

        if written {
            self.writer.blank();
        }
    }

    fn write_global_input_semantics(&mut self) {
        let program = self.program;
        let Some(entry) = program.entry_point_decl() else {
            return;
        };

        let mut written = false;
        for &id in &entry.input_semantics.var_refs {
            let var = program.variable(id);
            self.writer.begin_ln();
            self.writer.write("in ");
            self.write_type_denoter(&var.ty, Some(&var.span));
            self.writer.write(&format!(" {};", var.ident));
            self.writer.end_ln();
            written = true;
        }

        if written {
            self.writer.blank();
        }
    }

    fn write_local_output_semantics(&mut self) {
        let program = self.program;
        let Some(entry) = program.entry_point_decl() else {
            return;
        };

        let mut written = false;
        for &id in &entry.output_semantics.var_refs_sv {
            let var = program.variable(id);
            self.writer.begin_ln();
            self.write_type_denoter(&var.ty, Some(&var.span));
            self.writer.write(&format!(" {};", var.ident));
            self.writer.end_ln();
            written = true;
        }

        if written {
            self.writer.blank();
        }
    }

    fn write_global_output_semantics(&mut self) {
        let program = self.program;
        let Some(entry) = program.entry_point_decl() else {
            return;
        };

        let mut written = false;
        for &id in &entry.output_semantics.var_refs {
            let var = program.variable(id);
            self.writer.begin_ln();
            if let Some(semantic) = &var.semantic {
                self.writer
                    .write(&format!("layout(location = {}) out ", semantic.index));
            } else {
                self.writer.write("out ");
            }
            self.write_type_denoter(&var.ty, Some(&var.span));
            self.writer.write(&format!(" {};", var.ident));
            self.writer.end_ln();
            written = true;
        }

        if written {
            self.writer.blank();
        }
    }

    /// Assign the entry point's outputs at a return point
    ///
    /// System-value output variables win; otherwise the entry point's own
    /// return semantic receives the return expression. A missing output
    /// semantic is an error in every stage except compute.
    fn write_output_semantics_assignment(&mut self, expr: Option<&Expr>) {
        let program = self.program;
        let Some(entry) = program.entry_point_decl() else {
            return;
        };

        let sv_refs = &entry.output_semantics.var_refs_sv;
        if !sv_refs.is_empty() {
            for &id in sv_refs {
                let var = program.variable(id);
                if let Some(semantic) = &var.semantic {
                    if let Some(keyword) = semantic_to_glsl_keyword(semantic, self.target) {
                        self.writer
                            .write_ln(&format!("{} = {};", keyword, var.ident));
                    }
                }
            }
        } else if entry
            .semantic
            .as_ref()
            .is_some_and(|sem| sem.is_system_value())
            && expr.is_some()
        {
            let semantic = entry.semantic.as_ref().unwrap();
            match semantic_to_glsl_keyword(semantic, self.target) {
                Some(keyword) => {
                    self.writer.begin_ln();
                    self.writer.write(keyword);
                    self.writer.write(" = ");
                    self.visit_expr(expr.unwrap());
                    self.writer.write(";");
                    self.writer.end_ln();
                }
                None => self.error(
                    format!(
                        "failed to map output semantic '{}' to GLSL keyword",
                        semantic
                    ),
                    Some(&entry.span),
                ),
            }
        } else if self.target != ShaderTarget::ComputeShader {
            self.error(
                "missing output semantic".to_string(),
                expr.map(|e| &e.span),
            );
        }
    }

    /* ------- Expressions ------- */

    fn visit_expr(&mut self, expr: &Expr) {
        match &expr.kind {
            ExprKind::Literal(value) => self.writer.write(value),

            ExprKind::Unary { op, expr } => {
                self.writer.write(&op.to_string());
                self.visit_expr(expr);
            }

            ExprKind::PostUnary { op, expr } => {
                self.visit_expr(expr);
                self.writer.write(&op.to_string());
            }

            ExprKind::Binary { op, lhs, rhs } => {
                self.visit_expr(lhs);
                self.writer.write(&format!(" {} ", op));
                self.visit_expr(rhs);
            }

            ExprKind::Ternary {
                cond,
                then_expr,
                else_expr,
            } => {
                self.visit_expr(cond);
                self.writer.write(" ? ");
                self.visit_expr(then_expr);
                self.writer.write(" : ");
                self.visit_expr(else_expr);
            }

            ExprKind::List { first, next } => {
                self.visit_expr(first);
                self.writer.write(", ");
                self.visit_expr(next);
            }

            ExprKind::Bracket(inner) => {
                self.writer.write("(");
                self.visit_expr(inner);
                self.writer.write(")");
            }

            ExprKind::Cast { type_expr, expr } => {
                self.visit_expr(type_expr);
                self.writer.write("(");
                self.visit_expr(expr);
                self.writer.write(")");
            }

            ExprKind::Call(call) => self.write_function_call(call, &expr.span),

            ExprKind::VarAccess { var_ident, assign } => {
                self.write_var_ident(var_ident, true);
                if let Some((op, value)) = assign {
                    self.writer.write(&format!(" {} ", op));
                    self.visit_expr(value);
                }
            }

            ExprKind::Suffix {
                expr: inner,
                var_ident,
            } => self.write_suffix_expr(inner, var_ident),

            ExprKind::ArrayAccess { expr, indices } => {
                self.visit_expr(expr);
                self.write_array_dims(indices);
            }

            ExprKind::Initializer(exprs) => {
                self.writer.write("{ ");
                for (index, expr) in exprs.iter().enumerate() {
                    self.visit_expr(expr);
                    if index + 1 < exprs.len() {
                        self.writer.write(", ");
                    }
                }
                self.writer.write(" }");
            }

            ExprKind::TypeName(denoter) => self.write_type_denoter(denoter, Some(&expr.span)),
        }
    }

    fn write_array_dims(&mut self, dims: &[Expr]) {
        for dim in dims {
            self.writer.write("[");
            self.visit_expr(dim);
            self.writer.write("]");
        }
    }

    /* ------- Identifier chains ------- */

    /// The emitted spelling of a segment: renames applied during
    /// conversion surface through the resolved declaration
    fn final_ident(&self, var_ident: &VarIdent) -> String {
        let program = self.program;
        match var_ident.symbol_ref {
            Some(DeclRef::Function(id)) => program.function(id).ident.clone(),
            Some(DeclRef::Var(id)) => program.variable(id).ident.clone(),
            Some(DeclRef::Struct(id)) => program.struct_decl(id).ident.clone(),
            Some(DeclRef::Buffer(id)) => program.buffer(id).ident.clone(),
            Some(DeclRef::Texture(id)) => program.texture(id).ident.clone(),
            None => var_ident.ident.clone(),
        }
    }

    fn write_var_ident(&mut self, var_ident: &VarIdent, recursive: bool) {
        let ident = self.final_ident(var_ident);
        self.writer.write(&ident);
        self.write_array_dims(&var_ident.array_indices);

        if recursive {
            if let Some(next) = &var_ident.next {
                self.writer.write(".");
                self.write_var_ident(next, true);
            }
        }
    }

    /* ------- Suffix expressions ------- */

    /// Emit a suffix chain, wrapping swizzles on scalars as vector
    /// constructors: `1.0.xxxx` becomes `vec4(1.0)` and chains recurse,
    /// `1.0.xx.y.xxx` becomes `vec3(vec2(1.0).y)`
    fn write_suffix_expr(&mut self, inner: &Expr, var_ident: &VarIdent) {
        match inner.ty.as_ref().map(|ty| ty.resolved()) {
            Some(denoter) => {
                self.write_suffix_var_ident_begin(&denoter, var_ident);
                self.visit_expr(inner);
                self.write_suffix_var_ident_end(&denoter, var_ident);
            }
            None => {
                // No type information: emit the plain member chain
                self.visit_expr(inner);
                self.writer.write(".");
                self.write_var_ident(var_ident, true);
            }
        }
    }

    /// Type of the chain after applying one suffix segment
    fn suffix_type_denoter(
        &self,
        lhs: &Rc<TypeDenoter>,
        var_ident: &VarIdent,
    ) -> Rc<TypeDenoter> {
        if let TypeDenoter::Base(dt) = lhs.as_ref() {
            match subscript_data_type(*dt, &var_ident.ident) {
                Some(result) => Rc::new(TypeDenoter::Base(result)),
                None => Rc::new(TypeDenoter::Void),
            }
        } else if let Some(DeclRef::Var(id)) = var_ident.symbol_ref {
            self.program.variable(id).ty.resolved()
        } else {
            Rc::new(TypeDenoter::Void)
        }
    }

    fn write_suffix_var_ident_begin(&mut self, lhs: &Rc<TypeDenoter>, var_ident: &VarIdent) {
        // Deeper segments open their constructors first
        if let Some(next) = &var_ident.next {
            let denoter = self.suffix_type_denoter(lhs, var_ident);
            self.write_suffix_var_ident_begin(&denoter, next);
        }

        if lhs.is_scalar() {
            if let TypeDenoter::Base(dt) = lhs.as_ref() {
                match subscript_data_type(*dt, &var_ident.ident) {
                    Some(result) => self.write_data_type(result, Some(&var_ident.span)),
                    None => self.error(
                        format!("invalid vector subscript '{}'", var_ident.ident),
                        Some(&var_ident.span),
                    ),
                }
                self.writer.write("(");
            }
        }
    }

    fn write_suffix_var_ident_end(&mut self, lhs: &Rc<TypeDenoter>, var_ident: &VarIdent) {
        if lhs.is_scalar() {
            // Close the vector constructor
            self.writer.write(")");
        } else {
            self.writer.write(".");
            self.write_var_ident(var_ident, false);
        }

        if let Some(next) = &var_ident.next {
            let denoter = self.suffix_type_denoter(lhs, var_ident);
            self.write_suffix_var_ident_end(&denoter, next);
        }
    }

    /* ------- Function calls ------- */

    fn write_function_call(&mut self, call: &FunctionCall, span: &SourceSpan) {
        match call.intrinsic {
            Some(Intrinsic::Mul) => self.write_intrinsic_mul(call, span),
            Some(Intrinsic::Rcp) => self.write_intrinsic_rcp(call, span),
            Some(intrinsic) if intrinsic.is_atomic() => {
                self.write_intrinsic_atomic(call, span)
            }
            _ => self.write_function_call_standard(call, span),
        }
    }

    fn call_name(call: &FunctionCall) -> String {
        call.name
            .as_ref()
            .map(|name| name.last().ident.clone())
            .unwrap_or_default()
    }

    fn write_function_call_standard(&mut self, call: &FunctionCall, span: &SourceSpan) {
        if let Some(intrinsic) = call.intrinsic {
            match intrinsic_to_glsl_keyword(intrinsic) {
                Some(keyword) => self.writer.write(keyword),
                None => {
                    self.error(
                        format!(
                            "failed to map intrinsic '{}' to GLSL keyword",
                            Self::call_name(call)
                        ),
                        Some(span),
                    );
                    return;
                }
            }
        } else if let Some(name) = &call.name {
            self.write_var_ident(name, true);
        } else if let Some(denoter) = &call.type_denoter {
            self.write_type_denoter(denoter, Some(span));
        } else {
            self.error("missing function name".to_string(), Some(span));
            return;
        }

        self.writer.write("(");
        for (index, arg) in call.args.iter().enumerate() {
            self.visit_expr(arg);
            if index + 1 < call.args.len() {
                self.writer.write(", ");
            }
        }
        self.writer.write(")");
    }

    /// `mul(a, b)` becomes `(a * b)`; operands that are themselves
    /// unary, binary or ternary expressions get extra brackets
    fn write_intrinsic_mul(&mut self, call: &FunctionCall, span: &SourceSpan) {
        if call.args.len() != 2 {
            self.error_invalid_num_args("intrinsic 'mul'", Some(span));
            return;
        }

        self.writer.write("(");
        self.write_mul_argument(&call.args[0]);
        self.writer.write(" * ");
        self.write_mul_argument(&call.args[1]);
        self.writer.write(")");
    }

    fn write_mul_argument(&mut self, expr: &Expr) {
        let needs_brackets = matches!(
            expr.kind,
            ExprKind::Ternary { .. }
                | ExprKind::Binary { .. }
                | ExprKind::Unary { .. }
                | ExprKind::PostUnary { .. }
        );

        if needs_brackets {
            self.writer.write("(");
            self.visit_expr(expr);
            self.writer.write(")");
        } else {
            self.visit_expr(expr);
        }
    }

    /// `rcp(x)` of base type `T` becomes `(T(1) / (x))`
    fn write_intrinsic_rcp(&mut self, call: &FunctionCall, span: &SourceSpan) {
        if call.args.len() != 1 {
            self.error_invalid_num_args("intrinsic 'rcp'", Some(span));
            return;
        }

        let expr = &call.args[0];
        let denoter = expr.ty.as_ref().map(|ty| ty.resolved());

        match denoter {
            Some(denoter) if denoter.is_base() => {
                self.writer.write("(");
                self.write_type_denoter(&denoter, Some(span));
                self.writer.write("(1) / (");
                self.visit_expr(expr);
                self.writer.write("))");
            }
            _ => self.error(
                "invalid argument type for intrinsic 'rcp'".to_string(),
                Some(&expr.span),
            ),
        }
    }

    /// Atomic calls relocate the optional result argument:
    /// `InterlockedAdd(dst, v, prev)` becomes `prev = atomicAdd(dst, v)`
    fn write_intrinsic_atomic(&mut self, call: &FunctionCall, span: &SourceSpan) {
        if call.args.len() < 2 || call.args.len() > 3 {
            self.error_invalid_num_args("atomic intrinsic", Some(span));
            return;
        }

        let Some(keyword) = call.intrinsic.and_then(intrinsic_to_glsl_keyword) else {
            self.error(
                format!(
                    "failed to map intrinsic '{}' to GLSL keyword",
                    Self::call_name(call)
                ),
                Some(span),
            );
            return;
        };

        if call.args.len() == 3 {
            self.visit_expr(&call.args[2]);
            self.writer.write(" = ");
        }
        self.writer.write(keyword);
        self.writer.write("(");
        self.visit_expr(&call.args[0]);
        self.writer.write(", ");
        self.visit_expr(&call.args[1]);
        self.writer.write(")");
    }

    /* ------- Type denoters ------- */

    fn write_data_type(&mut self, data_type: DataType, span: Option<&SourceSpan>) {
        // Doubles require GLSL 400
        let data_type = if self.is_version_at_least(400) {
            data_type
        } else {
            data_type.double_to_float()
        };

        match data_type_to_glsl_keyword(data_type) {
            Some(keyword) => self.writer.write(keyword),
            None => self.error(
                "failed to map data type to GLSL keyword".to_string(),
                span,
            ),
        }
    }

    fn write_type_denoter(&mut self, denoter: &Rc<TypeDenoter>, span: Option<&SourceSpan>) {
        let program = self.program;

        match denoter.as_ref() {
            TypeDenoter::Void => self.writer.write("void"),

            TypeDenoter::Base(data_type) => self.write_data_type(*data_type, span),

            TypeDenoter::Struct(id) => {
                let ident = &program.struct_decl(*id).ident;
                self.writer.write(ident);
            }

            TypeDenoter::Texture {
                buffer_type,
                texture_ref,
            } => {
                let buffer_type = (*buffer_type)
                    .or_else(|| (*texture_ref).map(|id| program.texture(id).texture_type));
                match buffer_type {
                    Some(buffer_type) => match buffer_type_to_glsl_keyword(buffer_type) {
                        Some(keyword) => self.writer.write(keyword),
                        None => self.error(
                            "failed to map texture type to GLSL keyword".to_string(),
                            span,
                        ),
                    },
                    None => self.error(
                        "missing reference to texture type denoter".to_string(),
                        span,
                    ),
                }
            }

            TypeDenoter::SamplerState => self.error(
                "sampler state has no GLSL type".to_string(),
                span,
            ),

            TypeDenoter::Alias { aliased, .. } => self.write_type_denoter(aliased, span),

            TypeDenoter::Array { base, dims } => {
                self.write_type_denoter(base, span);
                self.write_array_dims(dims);
            }
        }
    }
}
