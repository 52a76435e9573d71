//! Type denoters
//!
//! The type denoter tree represents the resolved type of an expression or
//! declaration. It is distinct from the AST: denoters are immutable value
//! trees shared behind `Rc` handles, because many AST nodes refer to the
//! same type and some denoters are constructed on the fly during code
//! generation (e.g. the result type of a vector subscript).

use crate::ast::{Expr, StructId, TextureId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

/// Scalar component types of the source language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScalarType {
    Bool,
    Int,
    UInt,
    Half,
    Float,
    Double,
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarType::Bool => write!(f, "bool"),
            ScalarType::Int => write!(f, "int"),
            ScalarType::UInt => write!(f, "uint"),
            ScalarType::Half => write!(f, "half"),
            ScalarType::Float => write!(f, "float"),
            ScalarType::Double => write!(f, "double"),
        }
    }
}

/// A scalar, vector or matrix type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    Scalar(ScalarType),
    /// Vector with 1-4 components
    Vector(ScalarType, u8),
    /// Matrix with rows x columns dimensions
    Matrix(ScalarType, u8, u8),
}

impl DataType {
    /// Get the component type
    pub fn scalar_type(&self) -> ScalarType {
        match self {
            DataType::Scalar(ty) => *ty,
            DataType::Vector(ty, _) => *ty,
            DataType::Matrix(ty, _, _) => *ty,
        }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, DataType::Scalar(_))
    }

    pub fn is_vector(&self) -> bool {
        matches!(self, DataType::Vector(_, _))
    }

    pub fn is_matrix(&self) -> bool {
        matches!(self, DataType::Matrix(_, _, _))
    }

    /// Check if the component type is double precision
    pub fn is_double(&self) -> bool {
        self.scalar_type() == ScalarType::Double
    }

    /// Replace a double-precision component type with single precision
    ///
    /// Used when the target GLSL version has no double support.
    pub fn double_to_float(self) -> DataType {
        let demote = |ty: ScalarType| {
            if ty == ScalarType::Double {
                ScalarType::Float
            } else {
                ty
            }
        };
        match self {
            DataType::Scalar(ty) => DataType::Scalar(demote(ty)),
            DataType::Vector(ty, n) => DataType::Vector(demote(ty), n),
            DataType::Matrix(ty, r, c) => DataType::Matrix(demote(ty), r, c),
        }
    }
}

/// Determine the result type of a vector subscript ("swizzle")
///
/// A scalar base type behaves like a single-component vector, so `1.0.xxx`
/// yields a three-component vector. Returns `None` for invalid subscripts
/// (bad component characters, more than four components, matrix base).
pub fn subscript_data_type(base: DataType, subscript: &str) -> Option<DataType> {
    let scalar = base.scalar_type();

    let component_count = match base {
        DataType::Scalar(_) => 1u8,
        DataType::Vector(_, n) => n,
        DataType::Matrix(_, _, _) => return None,
    };

    if subscript.is_empty() || subscript.len() > 4 {
        return None;
    }

    // All components must come from the same naming set and stay in range.
    let in_range = |idx: u8| idx < component_count;
    let valid = subscript.chars().all(|c| match c {
        'x' | 'r' => in_range(0),
        'y' | 'g' => in_range(1),
        'z' | 'b' => in_range(2),
        'w' | 'a' => in_range(3),
        _ => false,
    });
    if !valid {
        return None;
    }

    match subscript.len() {
        1 => Some(DataType::Scalar(scalar)),
        n => Some(DataType::Vector(scalar, n as u8)),
    }
}

/// Texture and buffer object types of the source language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BufferType {
    Texture1D,
    Texture1DArray,
    Texture2D,
    Texture2DArray,
    Texture3D,
    TextureCube,
    TextureCubeArray,
    Texture2DMS,
    Texture2DMSArray,
    Buffer,
    RwTexture1D,
    RwTexture2D,
    RwTexture3D,
    RwBuffer,
}

impl BufferType {
    /// Check if this is a read-write (UAV) resource type
    pub fn is_rw(&self) -> bool {
        matches!(
            self,
            BufferType::RwTexture1D
                | BufferType::RwTexture2D
                | BufferType::RwTexture3D
                | BufferType::RwBuffer
        )
    }
}

/// The resolved type of an expression or declaration
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDenoter {
    Void,
    Base(DataType),
    /// A structure type, referring to its declaration
    Struct(StructId),
    /// A texture type; either the buffer type or the declaration reference
    /// may be absent, but not both
    Texture {
        buffer_type: Option<BufferType>,
        texture_ref: Option<TextureId>,
    },
    /// A sampler-state object; has no GLSL counterpart
    SamplerState,
    /// A named alias for another type
    Alias {
        ident: String,
        aliased: Rc<TypeDenoter>,
    },
    /// An array over a base type with one expression per dimension
    Array {
        base: Rc<TypeDenoter>,
        dims: Vec<Expr>,
    },
}

impl TypeDenoter {
    pub fn is_void(&self) -> bool {
        matches!(self, TypeDenoter::Void)
    }

    pub fn is_base(&self) -> bool {
        matches!(self, TypeDenoter::Base(_))
    }

    /// Check if this is a scalar base type
    pub fn is_scalar(&self) -> bool {
        matches!(self, TypeDenoter::Base(dt) if dt.is_scalar())
    }

    pub fn is_struct(&self) -> bool {
        matches!(self, TypeDenoter::Struct(_))
    }

    /// Strip alias indirections, yielding the underlying denoter
    pub fn resolved(self: &Rc<Self>) -> Rc<TypeDenoter> {
        match self.as_ref() {
            TypeDenoter::Alias { aliased, .. } => aliased.resolved(),
            _ => Rc::clone(self),
        }
    }

    /// Shorthand for a scalar base denoter
    pub fn scalar(ty: ScalarType) -> Rc<TypeDenoter> {
        Rc::new(TypeDenoter::Base(DataType::Scalar(ty)))
    }

    /// Shorthand for a vector base denoter
    pub fn vector(ty: ScalarType, n: u8) -> Rc<TypeDenoter> {
        Rc::new(TypeDenoter::Base(DataType::Vector(ty, n)))
    }

    /// Shorthand for a matrix base denoter
    pub fn matrix(ty: ScalarType, rows: u8, cols: u8) -> Rc<TypeDenoter> {
        Rc::new(TypeDenoter::Base(DataType::Matrix(ty, rows, cols)))
    }
}
