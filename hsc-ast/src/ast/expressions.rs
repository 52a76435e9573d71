//! Expression AST nodes
//!
//! Expressions form owned trees below statements. Every node carries its
//! source span and, where the back end needs it, the resolved type
//! denoter filled in by the upstream semantic analyzer.

use super::ops::{AssignOp, BinaryOp, UnaryOp};
use super::VarIdent;
use crate::intrinsic::Intrinsic;
use crate::type_denoter::TypeDenoter;
use hsc_common::{HasSpan, SourceSpan};
use std::rc::Rc;

/// AST expression node
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: SourceSpan,
    /// Resolved type; filled by the upstream type resolver where the back
    /// end depends on it (suffix bases, intrinsic arguments)
    pub ty: Option<Rc<TypeDenoter>>,
}

impl Expr {
    pub fn new(kind: ExprKind, span: SourceSpan) -> Self {
        Self {
            kind,
            span,
            ty: None,
        }
    }

    pub fn with_ty(kind: ExprKind, span: SourceSpan, ty: Rc<TypeDenoter>) -> Self {
        Self {
            kind,
            span,
            ty: Some(ty),
        }
    }

    /// Shorthand for a literal expression without type information
    pub fn literal(value: &str, span: SourceSpan) -> Self {
        Self::new(ExprKind::Literal(value.to_string()), span)
    }
}

impl HasSpan for Expr {
    fn span(&self) -> SourceSpan {
        self.span.clone()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// A literal token, stored verbatim
    Literal(String),

    /// Prefix unary operation
    Unary { op: UnaryOp, expr: Box<Expr> },

    /// Postfix unary operation
    PostUnary { op: UnaryOp, expr: Box<Expr> },

    /// Binary operation
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },

    /// Ternary conditional
    Ternary {
        cond: Box<Expr>,
        then_expr: Box<Expr>,
        else_expr: Box<Expr>,
    },

    /// Comma-separated expression pair
    List { first: Box<Expr>, next: Box<Expr> },

    /// Parenthesized sub-expression
    Bracket(Box<Expr>),

    /// Type cast: a type-name expression applied to an operand
    Cast {
        type_expr: Box<Expr>,
        expr: Box<Expr>,
    },

    /// Function, intrinsic or type-constructor call
    Call(FunctionCall),

    /// Variable access with optional assignment
    VarAccess {
        var_ident: VarIdent,
        assign: Option<(AssignOp, Box<Expr>)>,
    },

    /// Member or swizzle suffix on an arbitrary expression
    Suffix {
        expr: Box<Expr>,
        var_ident: VarIdent,
    },

    /// Array subscript on an arbitrary expression
    ArrayAccess { expr: Box<Expr>, indices: Vec<Expr> },

    /// Braced initializer list
    Initializer(Vec<Expr>),

    /// A type name used in expression position (cast targets)
    TypeName(Rc<TypeDenoter>),
}

/// A call expression: a named function, a resolved intrinsic, or a type
/// constructor (when `type_denoter` is set instead of a name)
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub name: Option<VarIdent>,
    pub type_denoter: Option<Rc<TypeDenoter>>,
    pub intrinsic: Option<Intrinsic>,
    pub args: Vec<Expr>,
}

impl FunctionCall {
    /// Create a call to a named function
    pub fn named(name: VarIdent, args: Vec<Expr>) -> Self {
        Self {
            name: Some(name),
            type_denoter: None,
            intrinsic: None,
            args,
        }
    }

    /// Create a resolved intrinsic call, keeping the source spelling
    pub fn intrinsic(intrinsic: Intrinsic, name: VarIdent, args: Vec<Expr>) -> Self {
        Self {
            name: Some(name),
            type_denoter: None,
            intrinsic: Some(intrinsic),
            args,
        }
    }

    /// Create a type-constructor call
    pub fn type_constructor(type_denoter: Rc<TypeDenoter>, args: Vec<Expr>) -> Self {
        Self {
            name: None,
            type_denoter: Some(type_denoter),
            intrinsic: None,
            args,
        }
    }
}
