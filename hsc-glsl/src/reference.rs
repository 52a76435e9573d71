//! Reference analysis
//!
//! Computes the set of declarations reachable from the entry point and
//! marks them with the `REACHABLE` flag; the generator suppresses
//! everything else. The walk is closed over indirect reachability: a
//! reachable function reaches its callees, referenced variables, and the
//! structs and textures named by any type denoter it touches.
//!
//! Intrinsics encountered during the walk are recorded in
//! `Program::used_intrinsics`, so helper emission and extension demands
//! are driven by reachable code only.

use hsc_ast::ast::{
    AstFlags, BufferId, CodeBlock, DeclRef, Expr, ExprKind, FunctionCall, FunctionId, Program,
    Stmnt, StmntKind, StructId, TextureId, VarId, VarIdent, VarType,
};
use hsc_ast::intrinsic::Intrinsic;
use hsc_ast::type_denoter::TypeDenoter;
use log::debug;
use std::collections::{BTreeSet, HashSet};

/// Analyzer pass marking declarations reachable from the entry point
pub struct ReferenceAnalyzer {
    functions: HashSet<FunctionId>,
    variables: HashSet<VarId>,
    structs: HashSet<StructId>,
    buffers: HashSet<BufferId>,
    textures: HashSet<TextureId>,
    intrinsics: BTreeSet<Intrinsic>,
    func_queue: Vec<FunctionId>,
    var_queue: Vec<VarId>,
    struct_queue: Vec<StructId>,
}

impl ReferenceAnalyzer {
    pub fn new() -> Self {
        Self {
            functions: HashSet::new(),
            variables: HashSet::new(),
            structs: HashSet::new(),
            buffers: HashSet::new(),
            textures: HashSet::new(),
            intrinsics: BTreeSet::new(),
            func_queue: Vec::new(),
            var_queue: Vec::new(),
            struct_queue: Vec::new(),
        }
    }

    /// Run the reachability walk and annotate the program
    pub fn mark_references_from_entry_point(&mut self, program: &mut Program) {
        let Some(entry) = program.entry_point else {
            return;
        };

        self.reach_function(entry);

        // Process the work queues to a fixed point. Each queue item is
        // walked with shared access; the flags are applied afterwards.
        loop {
            if let Some(id) = self.func_queue.pop() {
                let func = program.function(id);
                self.walk_var_type(&func.return_type);
                for param in &func.parameters {
                    self.walk_var_type(&param.var_type);
                    for &vid in &param.var_decls {
                        self.reach_variable(vid);
                    }
                }
                for attrib in &func.attribs {
                    for arg in &attrib.arguments {
                        self.walk_expr(arg);
                    }
                }
                if let Some(body) = &func.body {
                    self.walk_code_block(body);
                }
                continue;
            }

            if let Some(id) = self.var_queue.pop() {
                let var = program.variable(id);
                self.walk_denoter(&var.ty);
                for dim in &var.array_dims {
                    self.walk_expr(dim);
                }
                if let Some(init) = &var.initializer {
                    self.walk_expr(init);
                }
                continue;
            }

            if let Some(id) = self.struct_queue.pop() {
                let decl = program.struct_decl(id);
                if let Some(base) = decl.base_struct {
                    self.reach_struct(base);
                }
                // Member declarations are part of the reachable layout
                for member in &decl.members {
                    self.walk_stmnt(member);
                }
                continue;
            }

            break;
        }

        // A uniform buffer is reachable when any of its members is
        self.reach_buffers(program);

        debug!(
            "reference analysis: {} functions, {} variables, {} structs, {} buffers, {} textures reachable",
            self.functions.len(),
            self.variables.len(),
            self.structs.len(),
            self.buffers.len(),
            self.textures.len()
        );

        self.apply(program);
    }

    fn reach_function(&mut self, id: FunctionId) {
        if self.functions.insert(id) {
            self.func_queue.push(id);
        }
    }

    fn reach_variable(&mut self, id: VarId) {
        if self.variables.insert(id) {
            self.var_queue.push(id);
        }
    }

    fn reach_struct(&mut self, id: StructId) {
        if self.structs.insert(id) {
            self.struct_queue.push(id);
        }
    }

    fn reach_buffers(&mut self, program: &Program) {
        for (index, buffer) in program.buffers.iter().enumerate() {
            let reached = buffer.members.iter().any(|member| {
                if let StmntKind::VarDecl(vds) = &member.kind {
                    vds.var_decls.iter().any(|vid| self.variables.contains(vid))
                } else {
                    false
                }
            });
            if reached {
                let id = BufferId(index as u32);
                if self.buffers.insert(id) {
                    // The whole block layout is part of the interface
                    for member in &buffer.members {
                        if let StmntKind::VarDecl(vds) = &member.kind {
                            for &vid in &vds.var_decls {
                                self.variables.insert(vid);
                            }
                        }
                    }
                }
            }
        }
    }

    fn walk_code_block(&mut self, block: &CodeBlock) {
        for stmnt in &block.stmnts {
            self.walk_stmnt(stmnt);
        }
    }

    fn walk_stmnt(&mut self, stmnt: &Stmnt) {
        match &stmnt.kind {
            StmntKind::Null
            | StmntKind::FunctionDecl(_)
            | StmntKind::BufferDecl(_)
            | StmntKind::TextureDecl(_)
            | StmntKind::StructDecl(_)
            | StmntKind::AliasDecl(_)
            | StmntKind::CtrlTransfer(_) => {}

            StmntKind::CodeBlock(block) => self.walk_code_block(block),

            StmntKind::VarDecl(vds) => {
                self.walk_var_type(&vds.var_type);
                // Local declarations of a reachable function are reachable
                for &vid in &vds.var_decls {
                    self.reach_variable(vid);
                }
            }

            StmntKind::For {
                init,
                condition,
                iteration,
                body,
            } => {
                self.walk_stmnt(init);
                if let Some(condition) = condition {
                    self.walk_expr(condition);
                }
                if let Some(iteration) = iteration {
                    self.walk_expr(iteration);
                }
                self.walk_stmnt(body);
            }

            StmntKind::While { condition, body } | StmntKind::DoWhile { body, condition } => {
                self.walk_expr(condition);
                self.walk_stmnt(body);
            }

            StmntKind::If {
                condition,
                body,
                else_stmnt,
            } => {
                self.walk_expr(condition);
                self.walk_stmnt(body);
                if let Some(else_stmnt) = else_stmnt {
                    self.walk_stmnt(else_stmnt);
                }
            }

            StmntKind::Switch { selector, cases } => {
                self.walk_expr(selector);
                for case in cases {
                    if let Some(expr) = &case.expr {
                        self.walk_expr(expr);
                    }
                    for stmnt in &case.stmnts {
                        self.walk_stmnt(stmnt);
                    }
                }
            }

            StmntKind::Expr(expr) => self.walk_expr(expr),

            StmntKind::Return { expr } => {
                if let Some(expr) = expr {
                    self.walk_expr(expr);
                }
            }
        }
    }

    fn walk_expr(&mut self, expr: &Expr) {
        if let Some(ty) = &expr.ty {
            self.walk_denoter(ty);
        }

        match &expr.kind {
            ExprKind::Literal(_) => {}

            ExprKind::Unary { expr, .. } | ExprKind::PostUnary { expr, .. } => {
                self.walk_expr(expr)
            }

            ExprKind::Binary { lhs, rhs, .. } => {
                self.walk_expr(lhs);
                self.walk_expr(rhs);
            }

            ExprKind::Ternary {
                cond,
                then_expr,
                else_expr,
            } => {
                self.walk_expr(cond);
                self.walk_expr(then_expr);
                self.walk_expr(else_expr);
            }

            ExprKind::List { first, next } => {
                self.walk_expr(first);
                self.walk_expr(next);
            }

            ExprKind::Bracket(expr) => self.walk_expr(expr),

            ExprKind::Cast { type_expr, expr } => {
                self.walk_expr(type_expr);
                self.walk_expr(expr);
            }

            ExprKind::Call(call) => self.walk_call(call),

            ExprKind::VarAccess { var_ident, assign } => {
                self.walk_var_ident(var_ident);
                if let Some((_, expr)) = assign {
                    self.walk_expr(expr);
                }
            }

            ExprKind::Suffix { expr, var_ident } => {
                self.walk_expr(expr);
                self.walk_var_ident(var_ident);
            }

            ExprKind::ArrayAccess { expr, indices } => {
                self.walk_expr(expr);
                for index in indices {
                    self.walk_expr(index);
                }
            }

            ExprKind::Initializer(exprs) => {
                for expr in exprs {
                    self.walk_expr(expr);
                }
            }

            ExprKind::TypeName(ty) => self.walk_denoter(ty),
        }
    }

    fn walk_call(&mut self, call: &FunctionCall) {
        if let Some(intrinsic) = call.intrinsic {
            self.intrinsics.insert(intrinsic);
        }
        if let Some(name) = &call.name {
            self.walk_var_ident(name);
        }
        if let Some(ty) = &call.type_denoter {
            self.walk_denoter(ty);
        }
        for arg in &call.args {
            self.walk_expr(arg);
        }
    }

    fn walk_var_ident(&mut self, var_ident: &VarIdent) {
        match var_ident.symbol_ref {
            Some(DeclRef::Function(id)) => self.reach_function(id),
            Some(DeclRef::Var(id)) => self.reach_variable(id),
            Some(DeclRef::Struct(id)) => self.reach_struct(id),
            Some(DeclRef::Buffer(id)) => {
                self.buffers.insert(id);
            }
            Some(DeclRef::Texture(id)) => {
                self.textures.insert(id);
            }
            None => {}
        }
        for index in &var_ident.array_indices {
            self.walk_expr(index);
        }
        if let Some(next) = &var_ident.next {
            self.walk_var_ident(next);
        }
    }

    fn walk_var_type(&mut self, var_type: &VarType) {
        if let Some(id) = var_type.struct_decl {
            self.reach_struct(id);
        }
        self.walk_denoter(&var_type.denoter);
    }

    fn walk_denoter(&mut self, denoter: &TypeDenoter) {
        match denoter {
            TypeDenoter::Void | TypeDenoter::Base(_) | TypeDenoter::SamplerState => {}

            TypeDenoter::Struct(id) => self.reach_struct(*id),

            TypeDenoter::Texture { texture_ref, .. } => {
                if let Some(id) = texture_ref {
                    self.textures.insert(*id);
                }
            }

            TypeDenoter::Alias { aliased, .. } => self.walk_denoter(aliased),

            TypeDenoter::Array { base, dims } => {
                self.walk_denoter(base);
                for dim in dims {
                    self.walk_expr(dim);
                }
            }
        }
    }

    fn apply(&self, program: &mut Program) {
        for &id in &self.functions {
            program.function_mut(id).flags |= AstFlags::REACHABLE;
        }
        for &id in &self.variables {
            program.variable_mut(id).flags |= AstFlags::REACHABLE;
        }
        for &id in &self.structs {
            program.struct_decl_mut(id).flags |= AstFlags::REACHABLE;
        }
        for &id in &self.buffers {
            program.buffer_mut(id).flags |= AstFlags::REACHABLE;
        }
        for &id in &self.textures {
            program.texture_mut(id).flags |= AstFlags::REACHABLE;
        }
        program.used_intrinsics.extend(self.intrinsics.iter().copied());
    }
}

impl Default for ReferenceAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
