//! Intrinsic function identifiers
//!
//! Intrinsics are built-in functions of the source language. The semantic
//! analyzer resolves calls to them before the back end runs; the back end
//! maps each identifier to target syntax, sometimes rewriting the call
//! shape entirely (`mul`, `rcp`, the atomic family).

use serde::{Deserialize, Serialize};

/// Built-in functions of the source language
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Intrinsic {
    Abs,
    Acos,
    All,
    Any,
    Asin,
    Atan,
    Atan2,
    CalculateLevelOfDetail,
    Ceil,
    Clamp,
    Clip,
    Cos,
    Cosh,
    Cross,
    Ddx,
    DdxCoarse,
    DdxFine,
    Ddy,
    DdyCoarse,
    DdyFine,
    Degrees,
    Determinant,
    Distance,
    Dot,
    Exp,
    Exp2,
    Floor,
    Fmod,
    Frac,
    Fwidth,
    Length,
    Lerp,
    Log,
    Log2,
    Max,
    Min,
    Mul,
    Normalize,
    Pow,
    Radians,
    Rcp,
    Reflect,
    Refract,
    Round,
    Rsqrt,
    Sample,
    SampleLevel,
    Sign,
    Sin,
    Sincos,
    Sinh,
    SmoothStep,
    Sqrt,
    Step,
    Tan,
    Tanh,
    TexelLoad,
    Transpose,
    Trunc,
    InterlockedAdd,
    InterlockedAnd,
    InterlockedExchange,
    InterlockedMax,
    InterlockedMin,
    InterlockedOr,
    InterlockedXor,
}

impl Intrinsic {
    /// Check if this is one of the atomic intrinsics
    ///
    /// Atomic calls relocate their optional third argument to the left of
    /// an assignment during emission.
    pub fn is_atomic(&self) -> bool {
        matches!(
            self,
            Intrinsic::InterlockedAdd
                | Intrinsic::InterlockedAnd
                | Intrinsic::InterlockedExchange
                | Intrinsic::InterlockedMax
                | Intrinsic::InterlockedMin
                | Intrinsic::InterlockedOr
                | Intrinsic::InterlockedXor
        )
    }

    /// Check if this intrinsic computes coarse or fine derivatives
    pub fn is_derivative_control(&self) -> bool {
        matches!(
            self,
            Intrinsic::DdxCoarse | Intrinsic::DdxFine | Intrinsic::DdyCoarse | Intrinsic::DdyFine
        )
    }
}
