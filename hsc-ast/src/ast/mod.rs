//! Abstract Syntax Tree definitions
//!
//! This module defines the AST produced by the upstream frontend and
//! consumed by the code-emission back ends. Declarations are stored in
//! arenas on the [`Program`]; all cross-references between nodes are
//! typed ids into those arenas, so the tree has single ownership and the
//! reference graph may still contain cycles.

pub mod declarations;
pub mod expressions;
pub mod ops;
pub mod statements;

pub use declarations::{
    BufferDecl, FunctionDecl, InterfaceSemantics, StructDecl, TextureDecl, VarDecl, VarType,
};
pub use expressions::{Expr, ExprKind, FunctionCall};
pub use ops::{AssignOp, BinaryOp, CtrlTransfer, UnaryOp};
pub use statements::{
    AliasDeclStmnt, Attribute, CodeBlock, InputModifier, Stmnt, StmntKind, StorageClass,
    SwitchCase, TextureDeclStmnt, VarDeclStmnt,
};

use crate::intrinsic::Intrinsic;
use bitflags::bitflags;
use hsc_common::SourceSpan;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

bitflags! {
    /// Per-node analysis flags, annotated by the back-end passes
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct AstFlags: u32 {
        /// Reachable from the entry point
        const REACHABLE = 1 << 0;
        /// This function is the designated entry point
        const IS_ENTRY_POINT = 1 << 1;
        /// Not all control paths through this function return a value
        const HAS_NON_RETURN_CONTROL_PATH = 1 << 2;
        /// Declaration has no target-language counterpart; skip emission
        const DISABLE_CODEGEN = 1 << 3;
        /// Struct declared inside another struct
        const IS_NESTED_STRUCT = 1 << 4;
        /// Declaration belongs to the stage input interface
        const IS_SHADER_INPUT = 1 << 5;
        /// Declaration belongs to the stage output interface
        const IS_SHADER_OUTPUT = 1 << 6;
        /// Return statement is the lexically last statement of its function
        const IS_END_OF_FUNCTION = 1 << 7;
    }
}

bitflags! {
    /// Program-level flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ProgramFlags: u32 {
        /// The program addresses the screen the SM3 way (`VPOS`)
        const USES_SM3_SCREEN_SPACE = 1 << 0;
    }
}

/// Id of a function declaration in the program arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FunctionId(pub u32);

/// Id of a variable declaration in the program arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VarId(pub u32);

/// Id of a struct declaration in the program arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StructId(pub u32);

/// Id of a uniform buffer declaration in the program arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BufferId(pub u32);

/// Id of a texture declaration in the program arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TextureId(pub u32);

/// A resolved reference to some declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeclRef {
    Function(FunctionId),
    Var(VarId),
    Struct(StructId),
    Buffer(BufferId),
    Texture(TextureId),
}

/// One segment of a possibly dotted identifier chain, `name[idx]*`
///
/// `a.b[0].c` is three chained segments. A segment either resolved to a
/// declaration during semantic analysis (`symbol_ref`) or is a
/// free-standing name emitted verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct VarIdent {
    pub ident: String,
    pub array_indices: Vec<Expr>,
    pub next: Option<Box<VarIdent>>,
    pub symbol_ref: Option<DeclRef>,
    pub span: SourceSpan,
}

impl VarIdent {
    pub fn new(ident: &str, span: SourceSpan) -> Self {
        Self {
            ident: ident.to_string(),
            array_indices: Vec::new(),
            next: None,
            symbol_ref: None,
            span,
        }
    }

    pub fn with_symbol(mut self, symbol_ref: DeclRef) -> Self {
        self.symbol_ref = Some(symbol_ref);
        self
    }

    pub fn with_next(mut self, next: VarIdent) -> Self {
        self.next = Some(Box::new(next));
        self
    }

    /// Get the last segment of the chain
    pub fn last(&self) -> &VarIdent {
        match &self.next {
            Some(next) => next.last(),
            None => self,
        }
    }
}

impl fmt::Display for VarIdent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ident)?;
        if let Some(next) = &self.next {
            write!(f, ".{}", next)?;
        }
        Ok(())
    }
}

/// The root of the AST
///
/// Owns the top-level statements and the declaration arenas. The entry
/// point is a non-owning reference into the function arena.
#[derive(Debug, Clone, Default)]
pub struct Program {
    pub global_stmnts: Vec<Stmnt>,
    pub functions: Vec<FunctionDecl>,
    pub variables: Vec<VarDecl>,
    pub structs: Vec<StructDecl>,
    pub buffers: Vec<BufferDecl>,
    pub textures: Vec<TextureDecl>,
    pub entry_point: Option<FunctionId>,
    /// Intrinsics referenced by reachable code; populated during analysis
    pub used_intrinsics: BTreeSet<Intrinsic>,
    pub flags: ProgramFlags,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_function(&mut self, decl: FunctionDecl) -> FunctionId {
        let id = FunctionId(self.functions.len() as u32);
        self.functions.push(decl);
        id
    }

    pub fn add_variable(&mut self, decl: VarDecl) -> VarId {
        let id = VarId(self.variables.len() as u32);
        self.variables.push(decl);
        id
    }

    pub fn add_struct(&mut self, decl: StructDecl) -> StructId {
        let id = StructId(self.structs.len() as u32);
        self.structs.push(decl);
        id
    }

    pub fn add_buffer(&mut self, decl: BufferDecl) -> BufferId {
        let id = BufferId(self.buffers.len() as u32);
        self.buffers.push(decl);
        id
    }

    pub fn add_texture(&mut self, decl: TextureDecl) -> TextureId {
        let id = TextureId(self.textures.len() as u32);
        self.textures.push(decl);
        id
    }

    pub fn function(&self, id: FunctionId) -> &FunctionDecl {
        &self.functions[id.0 as usize]
    }

    pub fn function_mut(&mut self, id: FunctionId) -> &mut FunctionDecl {
        &mut self.functions[id.0 as usize]
    }

    pub fn variable(&self, id: VarId) -> &VarDecl {
        &self.variables[id.0 as usize]
    }

    pub fn variable_mut(&mut self, id: VarId) -> &mut VarDecl {
        &mut self.variables[id.0 as usize]
    }

    pub fn struct_decl(&self, id: StructId) -> &StructDecl {
        &self.structs[id.0 as usize]
    }

    pub fn struct_decl_mut(&mut self, id: StructId) -> &mut StructDecl {
        &mut self.structs[id.0 as usize]
    }

    pub fn buffer(&self, id: BufferId) -> &BufferDecl {
        &self.buffers[id.0 as usize]
    }

    pub fn buffer_mut(&mut self, id: BufferId) -> &mut BufferDecl {
        &mut self.buffers[id.0 as usize]
    }

    pub fn texture(&self, id: TextureId) -> &TextureDecl {
        &self.textures[id.0 as usize]
    }

    pub fn texture_mut(&mut self, id: TextureId) -> &mut TextureDecl {
        &mut self.textures[id.0 as usize]
    }

    /// Get the entry-point function declaration, if one was resolved
    pub fn entry_point_decl(&self) -> Option<&FunctionDecl> {
        self.entry_point.map(|id| self.function(id))
    }
}
