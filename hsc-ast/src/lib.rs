//! HSC shader cross-compiler - AST
//!
//! This crate defines the data model shared between the frontend and the
//! code-emission back ends:
//! - AST: program, declarations, statements, expressions
//! - Type denoters: resolved types as shared immutable value trees
//! - Semantics, register bindings and intrinsic identifiers

pub mod ast;
pub mod intrinsic;
pub mod register;
pub mod semantic;
pub mod type_denoter;

pub use ast::{
    AliasDeclStmnt, AssignOp, AstFlags, Attribute, BinaryOp, BufferDecl, BufferId, CodeBlock,
    CtrlTransfer, DeclRef, Expr, ExprKind, FunctionCall, FunctionDecl, FunctionId, InputModifier,
    InterfaceSemantics, Program, ProgramFlags, Stmnt, StmntKind, StorageClass, StructDecl,
    StructId, SwitchCase, TextureDecl, TextureDeclStmnt, TextureId, UnaryOp, VarDecl,
    VarDeclStmnt, VarId, VarIdent, VarType,
};
pub use intrinsic::Intrinsic;
pub use register::Register;
pub use semantic::{Semantic, SystemValue};
pub use type_denoter::{subscript_data_type, BufferType, DataType, ScalarType, TypeDenoter};
