//! Statement AST nodes
//!
//! Statements own their child statements and expressions; declaration
//! statements refer into the program's declaration arenas by id.

use super::declarations::VarType;
use super::expressions::Expr;
use super::ops::CtrlTransfer;
use super::{AstFlags, BufferId, FunctionId, StructId, TextureId, VarId};
use crate::type_denoter::BufferType;
use hsc_common::{HasSpan, SourceSpan};
use serde::{Deserialize, Serialize};
use std::fmt;

/// AST statement node
#[derive(Debug, Clone, PartialEq)]
pub struct Stmnt {
    pub kind: StmntKind,
    pub span: SourceSpan,
    pub flags: AstFlags,
}

impl Stmnt {
    pub fn new(kind: StmntKind, span: SourceSpan) -> Self {
        Self {
            kind,
            span,
            flags: AstFlags::empty(),
        }
    }

    /// Check if this is a return statement
    pub fn is_return(&self) -> bool {
        matches!(self.kind, StmntKind::Return { .. })
    }
}

impl HasSpan for Stmnt {
    fn span(&self) -> SourceSpan {
        self.span.clone()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StmntKind {
    /// Empty statement (a stray `;`)
    Null,

    /// Braced statement block
    CodeBlock(CodeBlock),

    /// Function declaration or definition
    FunctionDecl(FunctionId),

    /// Uniform buffer declaration
    BufferDecl(BufferId),

    /// Texture declaration statement (may declare several samplers)
    TextureDecl(TextureDeclStmnt),

    /// Structure declaration
    StructDecl(StructId),

    /// Type alias declaration, possibly carrying a struct definition
    AliasDecl(AliasDeclStmnt),

    /// Variable declaration statement
    VarDecl(VarDeclStmnt),

    /// For loop; the init statement carries its own terminator
    For {
        init: Box<Stmnt>,
        condition: Option<Expr>,
        iteration: Option<Expr>,
        body: Box<Stmnt>,
    },

    /// While loop
    While { condition: Expr, body: Box<Stmnt> },

    /// Do-while loop
    DoWhile { body: Box<Stmnt>, condition: Expr },

    /// If statement with optional else branch (else-if chains nest here)
    If {
        condition: Expr,
        body: Box<Stmnt>,
        else_stmnt: Option<Box<Stmnt>>,
    },

    /// Switch statement
    Switch {
        selector: Expr,
        cases: Vec<SwitchCase>,
    },

    /// Expression statement
    Expr(Expr),

    /// Return statement
    Return { expr: Option<Expr> },

    /// Break, continue or discard
    CtrlTransfer(CtrlTransfer),
}

/// A braced list of statements
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CodeBlock {
    pub stmnts: Vec<Stmnt>,
}

impl CodeBlock {
    pub fn new(stmnts: Vec<Stmnt>) -> Self {
        Self { stmnts }
    }
}

/// A single `case` label with its statements; `expr` is `None` for the
/// `default` label
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchCase {
    pub expr: Option<Expr>,
    pub stmnts: Vec<Stmnt>,
    pub span: SourceSpan,
}

impl SwitchCase {
    pub fn is_default(&self) -> bool {
        self.expr.is_none()
    }
}

/// A texture declaration statement declaring one or more samplers of the
/// same texture type
#[derive(Debug, Clone, PartialEq)]
pub struct TextureDeclStmnt {
    pub texture_type: BufferType,
    pub decls: Vec<TextureId>,
}

/// A type alias declaration (`typedef`-style); may define a struct inline
#[derive(Debug, Clone, PartialEq)]
pub struct AliasDeclStmnt {
    pub struct_decl: Option<StructId>,
}

/// Parameter input modifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputModifier {
    In,
    Out,
    InOut,
    Uniform,
}

impl fmt::Display for InputModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputModifier::In => write!(f, "in"),
            InputModifier::Out => write!(f, "out"),
            InputModifier::InOut => write!(f, "inout"),
            InputModifier::Uniform => write!(f, "uniform"),
        }
    }
}

/// Storage classes of the source language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StorageClass {
    Extern,
    Static,
    GroupShared,
    Volatile,
    Precise,
}

impl fmt::Display for StorageClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageClass::Extern => write!(f, "extern"),
            StorageClass::Static => write!(f, "static"),
            StorageClass::GroupShared => write!(f, "groupshared"),
            StorageClass::Volatile => write!(f, "volatile"),
            StorageClass::Precise => write!(f, "precise"),
        }
    }
}

/// A variable declaration statement
///
/// Used both as a statement (global or local declarations) and as a
/// function parameter, in which case it declares exactly one variable.
#[derive(Debug, Clone, PartialEq)]
pub struct VarDeclStmnt {
    pub var_type: VarType,
    pub var_decls: Vec<VarId>,
    pub storage_classes: Vec<StorageClass>,
    pub type_modifiers: Vec<String>,
    pub input_modifier: Option<InputModifier>,
    pub flags: AstFlags,
    pub span: SourceSpan,
}

impl VarDeclStmnt {
    pub fn new(var_type: VarType, var_decls: Vec<VarId>, span: SourceSpan) -> Self {
        Self {
            var_type,
            var_decls,
            storage_classes: Vec::new(),
            type_modifiers: Vec::new(),
            input_modifier: None,
            flags: AstFlags::empty(),
            span,
        }
    }
}

/// An attribute attached to a declaration, e.g. `[numthreads(8, 8, 1)]`
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub ident: String,
    pub arguments: Vec<Expr>,
    pub span: SourceSpan,
}

impl Attribute {
    pub fn new(ident: &str, arguments: Vec<Expr>, span: SourceSpan) -> Self {
        Self {
            ident: ident.to_string(),
            arguments,
            span,
        }
    }
}
