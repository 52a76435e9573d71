//! GLSL intrinsic mapping table
//!
//! Maps resolved source-language intrinsics to GLSL function names.
//! `mul`, `rcp` and the atomic family are not looked up here on the
//! normal call path; the generator rewrites their call shape instead.

use hsc_ast::intrinsic::Intrinsic;

/// Map an intrinsic to its GLSL function name
pub fn intrinsic_to_glsl_keyword(intrinsic: Intrinsic) -> Option<&'static str> {
    use Intrinsic::*;

    match intrinsic {
        Abs => Some("abs"),
        Acos => Some("acos"),
        All => Some("all"),
        Any => Some("any"),
        Asin => Some("asin"),
        Atan => Some("atan"),
        Atan2 => Some("atan"),
        CalculateLevelOfDetail => Some("textureQueryLod"),
        Ceil => Some("ceil"),
        Clamp => Some("clamp"),
        // Resolves to the generated helper overloads
        Clip => Some("clip"),
        Cos => Some("cos"),
        Cosh => Some("cosh"),
        Cross => Some("cross"),
        Ddx => Some("dFdx"),
        DdxCoarse => Some("dFdxCoarse"),
        DdxFine => Some("dFdxFine"),
        Ddy => Some("dFdy"),
        DdyCoarse => Some("dFdyCoarse"),
        DdyFine => Some("dFdyFine"),
        Degrees => Some("degrees"),
        Determinant => Some("determinant"),
        Distance => Some("distance"),
        Dot => Some("dot"),
        Exp => Some("exp"),
        Exp2 => Some("exp2"),
        Floor => Some("floor"),
        Fmod => Some("mod"),
        Frac => Some("fract"),
        Fwidth => Some("fwidth"),
        Length => Some("length"),
        Lerp => Some("mix"),
        Log => Some("log"),
        Log2 => Some("log2"),
        Max => Some("max"),
        Min => Some("min"),
        // Rewritten to a binary multiplication
        Mul => None,
        Normalize => Some("normalize"),
        Pow => Some("pow"),
        Radians => Some("radians"),
        // Rewritten to a division
        Rcp => None,
        Reflect => Some("reflect"),
        Refract => Some("refract"),
        Round => Some("round"),
        Rsqrt => Some("inversesqrt"),
        Sample => Some("texture"),
        SampleLevel => Some("textureLod"),
        Sign => Some("sign"),
        Sin => Some("sin"),
        Sincos => None,
        Sinh => Some("sinh"),
        SmoothStep => Some("smoothstep"),
        Sqrt => Some("sqrt"),
        Step => Some("step"),
        Tan => Some("tan"),
        Tanh => Some("tanh"),
        TexelLoad => Some("texelFetch"),
        Transpose => Some("transpose"),
        Trunc => Some("trunc"),
        InterlockedAdd => Some("atomicAdd"),
        InterlockedAnd => Some("atomicAnd"),
        InterlockedExchange => Some("atomicExchange"),
        InterlockedMax => Some("atomicMax"),
        InterlockedMin => Some("atomicMin"),
        InterlockedOr => Some("atomicOr"),
        InterlockedXor => Some("atomicXor"),
    }
}
