//! Declaration AST nodes
//!
//! Declarations live in arenas on the `Program`; statements and variable
//! identifiers refer to them by id. Analysis passes annotate the `flags`
//! bitsets in place.

use super::statements::{Attribute, CodeBlock, Stmnt, VarDeclStmnt};
use super::{AstFlags, StructId, VarId};
use crate::ast::expressions::Expr;
use crate::register::Register;
use crate::semantic::Semantic;
use crate::type_denoter::{BufferType, TypeDenoter};
use hsc_common::SourceSpan;
use std::rc::Rc;

/// The written type of a declaration statement
///
/// `struct_decl` is set when the type was spelled as an inline struct
/// definition; the denoter then refers to that struct.
#[derive(Debug, Clone, PartialEq)]
pub struct VarType {
    pub struct_decl: Option<StructId>,
    pub denoter: Rc<TypeDenoter>,
}

impl VarType {
    pub fn new(denoter: Rc<TypeDenoter>) -> Self {
        Self {
            struct_decl: None,
            denoter,
        }
    }

    pub fn with_struct(struct_decl: StructId, denoter: Rc<TypeDenoter>) -> Self {
        Self {
            struct_decl: Some(struct_decl),
            denoter,
        }
    }
}

/// A single declared variable
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub ident: String,
    pub ty: Rc<TypeDenoter>,
    pub array_dims: Vec<Expr>,
    pub initializer: Option<Expr>,
    pub semantic: Option<Semantic>,
    pub flags: AstFlags,
    pub span: SourceSpan,
}

impl VarDecl {
    pub fn new(ident: &str, ty: Rc<TypeDenoter>, span: SourceSpan) -> Self {
        Self {
            ident: ident.to_string(),
            ty,
            array_dims: Vec::new(),
            initializer: None,
            semantic: None,
            flags: AstFlags::empty(),
            span,
        }
    }

    pub fn with_semantic(mut self, semantic: Semantic) -> Self {
        self.semantic = Some(semantic);
        self
    }
}

/// Entry-point interface variables, split by system-value classification
///
/// Filled by the converter from the entry point's parameters and return
/// type. System values become locally re-declared copies inside `main`;
/// the rest become file-scope `in`/`out` declarations.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InterfaceSemantics {
    pub var_refs: Vec<VarId>,
    pub var_refs_sv: Vec<VarId>,
}

/// A function declaration or definition
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub ident: String,
    pub return_type: VarType,
    pub parameters: Vec<VarDeclStmnt>,
    /// Semantic of the return value
    pub semantic: Option<Semantic>,
    pub attribs: Vec<Attribute>,
    /// `None` for forward declarations
    pub body: Option<CodeBlock>,
    pub input_semantics: InterfaceSemantics,
    pub output_semantics: InterfaceSemantics,
    pub flags: AstFlags,
    pub span: SourceSpan,
}

impl FunctionDecl {
    pub fn new(ident: &str, return_type: VarType, span: SourceSpan) -> Self {
        Self {
            ident: ident.to_string(),
            return_type,
            parameters: Vec::new(),
            semantic: None,
            attribs: Vec::new(),
            body: None,
            input_semantics: InterfaceSemantics::default(),
            output_semantics: InterfaceSemantics::default(),
            flags: AstFlags::empty(),
            span,
        }
    }

    pub fn is_entry_point(&self) -> bool {
        self.flags.contains(AstFlags::IS_ENTRY_POINT)
    }

    /// Check if this is only a forward declaration
    pub fn is_forward_decl(&self) -> bool {
        self.body.is_none()
    }
}

/// A structure declaration
#[derive(Debug, Clone, PartialEq)]
pub struct StructDecl {
    pub ident: String,
    pub base_struct: Option<StructId>,
    /// Member declaration statements
    pub members: Vec<Stmnt>,
    /// Instance name when emitted as an interface block
    pub alias_name: String,
    /// Structs declared inside this one, in declaration order
    pub nested_struct_refs: Vec<StructId>,
    pub flags: AstFlags,
    pub span: SourceSpan,
}

impl StructDecl {
    pub fn new(ident: &str, members: Vec<Stmnt>, span: SourceSpan) -> Self {
        Self {
            ident: ident.to_string(),
            base_struct: None,
            members,
            alias_name: String::new(),
            nested_struct_refs: Vec::new(),
            flags: AstFlags::empty(),
            span,
        }
    }

    pub fn is_anonymous(&self) -> bool {
        self.ident.is_empty()
    }
}

/// A uniform buffer (constant buffer) declaration
#[derive(Debug, Clone, PartialEq)]
pub struct BufferDecl {
    pub ident: String,
    pub members: Vec<Stmnt>,
    pub slot_registers: Vec<Register>,
    pub flags: AstFlags,
    pub span: SourceSpan,
}

impl BufferDecl {
    pub fn new(ident: &str, members: Vec<Stmnt>, span: SourceSpan) -> Self {
        Self {
            ident: ident.to_string(),
            members,
            slot_registers: Vec::new(),
            flags: AstFlags::empty(),
            span,
        }
    }
}

/// A single texture object declaration
#[derive(Debug, Clone, PartialEq)]
pub struct TextureDecl {
    pub ident: String,
    pub texture_type: BufferType,
    pub slot_registers: Vec<Register>,
    pub flags: AstFlags,
    pub span: SourceSpan,
}

impl TextureDecl {
    pub fn new(ident: &str, texture_type: BufferType, span: SourceSpan) -> Self {
        Self {
            ident: ident.to_string(),
            texture_type,
            slot_registers: Vec::new(),
            flags: AstFlags::empty(),
            span,
        }
    }
}
