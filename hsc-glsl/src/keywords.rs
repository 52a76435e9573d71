//! GLSL keyword tables
//!
//! Lookup functions from source-language constructs to GLSL spellings.
//! All mappings are partial: a `None` result means the construct has no
//! counterpart in GLSL and the caller reports a diagnostic.

use hsc_ast::ast::{CtrlTransfer, StorageClass};
use hsc_ast::semantic::{Semantic, SystemValue};
use hsc_ast::type_denoter::{BufferType, DataType, ScalarType};
use hsc_common::ShaderTarget;

/// Map a base data type to its GLSL keyword
///
/// Half precision maps to `float`; GLSL has no half type. Double types
/// must be downgraded by the caller first when the target version has no
/// double support.
pub fn data_type_to_glsl_keyword(data_type: DataType) -> Option<&'static str> {
    use ScalarType::*;

    match data_type {
        DataType::Scalar(Bool) => Some("bool"),
        DataType::Scalar(Int) => Some("int"),
        DataType::Scalar(UInt) => Some("uint"),
        DataType::Scalar(Half) | DataType::Scalar(Float) => Some("float"),
        DataType::Scalar(Double) => Some("double"),

        DataType::Vector(Bool, 2) => Some("bvec2"),
        DataType::Vector(Bool, 3) => Some("bvec3"),
        DataType::Vector(Bool, 4) => Some("bvec4"),
        DataType::Vector(Int, 2) => Some("ivec2"),
        DataType::Vector(Int, 3) => Some("ivec3"),
        DataType::Vector(Int, 4) => Some("ivec4"),
        DataType::Vector(UInt, 2) => Some("uvec2"),
        DataType::Vector(UInt, 3) => Some("uvec3"),
        DataType::Vector(UInt, 4) => Some("uvec4"),
        DataType::Vector(Half, 2) | DataType::Vector(Float, 2) => Some("vec2"),
        DataType::Vector(Half, 3) | DataType::Vector(Float, 3) => Some("vec3"),
        DataType::Vector(Half, 4) | DataType::Vector(Float, 4) => Some("vec4"),
        DataType::Vector(Double, 2) => Some("dvec2"),
        DataType::Vector(Double, 3) => Some("dvec3"),
        DataType::Vector(Double, 4) => Some("dvec4"),

        DataType::Matrix(Half, r, c) => matrix_keyword(r, c, false),
        DataType::Matrix(Float, r, c) => matrix_keyword(r, c, false),
        DataType::Matrix(Double, r, c) => matrix_keyword(r, c, true),

        _ => None,
    }
}

fn matrix_keyword(rows: u8, cols: u8, double: bool) -> Option<&'static str> {
    match (rows, cols, double) {
        (2, 2, false) => Some("mat2"),
        (3, 3, false) => Some("mat3"),
        (4, 4, false) => Some("mat4"),
        (2, 3, false) => Some("mat2x3"),
        (2, 4, false) => Some("mat2x4"),
        (3, 2, false) => Some("mat3x2"),
        (3, 4, false) => Some("mat3x4"),
        (4, 2, false) => Some("mat4x2"),
        (4, 3, false) => Some("mat4x3"),
        (2, 2, true) => Some("dmat2"),
        (3, 3, true) => Some("dmat3"),
        (4, 4, true) => Some("dmat4"),
        (2, 3, true) => Some("dmat2x3"),
        (2, 4, true) => Some("dmat2x4"),
        (3, 2, true) => Some("dmat3x2"),
        (3, 4, true) => Some("dmat3x4"),
        (4, 2, true) => Some("dmat4x2"),
        (4, 3, true) => Some("dmat4x3"),
        _ => None,
    }
}

/// Map a texture type to its GLSL sampler (or image) keyword
pub fn buffer_type_to_glsl_keyword(buffer_type: BufferType) -> Option<&'static str> {
    match buffer_type {
        BufferType::Texture1D => Some("sampler1D"),
        BufferType::Texture1DArray => Some("sampler1DArray"),
        BufferType::Texture2D => Some("sampler2D"),
        BufferType::Texture2DArray => Some("sampler2DArray"),
        BufferType::Texture3D => Some("sampler3D"),
        BufferType::TextureCube => Some("samplerCube"),
        BufferType::TextureCubeArray => Some("samplerCubeArray"),
        BufferType::Texture2DMS => Some("sampler2DMS"),
        BufferType::Texture2DMSArray => Some("sampler2DMSArray"),
        BufferType::Buffer => Some("samplerBuffer"),
        BufferType::RwTexture1D => Some("image1D"),
        BufferType::RwTexture2D => Some("image2D"),
        BufferType::RwTexture3D => Some("image3D"),
        BufferType::RwBuffer => Some("imageBuffer"),
    }
}

/// Map a system-value semantic to the GLSL built-in identifier
///
/// The position semantic is stage-sensitive: it names the rasterizer
/// input `gl_FragCoord` in a fragment shader and the vertex-pipeline
/// output `gl_Position` everywhere else.
pub fn semantic_to_glsl_keyword(semantic: &Semantic, target: ShaderTarget) -> Option<&'static str> {
    let system_value = semantic.system_value?;

    let keyword = match system_value {
        SystemValue::ClipDistance => "gl_ClipDistance",
        SystemValue::CullDistance => "gl_CullDistance",
        SystemValue::Depth => "gl_FragDepth",
        SystemValue::DispatchThreadId => "gl_GlobalInvocationID",
        SystemValue::GroupId => "gl_WorkGroupID",
        SystemValue::GroupIndex => "gl_LocalInvocationIndex",
        SystemValue::GroupThreadId => "gl_LocalInvocationID",
        SystemValue::InstanceId => "gl_InstanceID",
        SystemValue::IsFrontFace => "gl_FrontFacing",
        SystemValue::Position => {
            if target == ShaderTarget::FragmentShader {
                "gl_FragCoord"
            } else {
                "gl_Position"
            }
        }
        SystemValue::PrimitiveId => "gl_PrimitiveID",
        SystemValue::SampleIndex => "gl_SampleID",
        SystemValue::Target => "gl_FragColor",
        SystemValue::VertexId => "gl_VertexID",
        SystemValue::VertexPosition => "gl_FragCoord",
    };

    Some(keyword)
}

/// Map a storage class to its GLSL keyword
pub fn storage_class_to_glsl_keyword(storage_class: StorageClass) -> Option<&'static str> {
    match storage_class {
        StorageClass::GroupShared => Some("shared"),
        StorageClass::Precise => Some("precise"),
        StorageClass::Volatile => Some("volatile"),
        StorageClass::Extern | StorageClass::Static => None,
    }
}

/// Spelling of a control transfer statement
pub fn ctrl_transfer_to_glsl_keyword(transfer: CtrlTransfer) -> &'static str {
    match transfer {
        CtrlTransfer::Break => "break",
        CtrlTransfer::Continue => "continue",
        CtrlTransfer::Discard => "discard",
    }
}

/// GLSL reserved words and commonly colliding built-in identifiers,
/// sorted for binary search
static RESERVED_WORDS: &[&str] = &[
    "active",
    "attribute",
    "bool",
    "break",
    "buffer",
    "bvec2",
    "bvec3",
    "bvec4",
    "case",
    "centroid",
    "coherent",
    "common",
    "const",
    "continue",
    "default",
    "discard",
    "dmat2",
    "dmat3",
    "dmat4",
    "do",
    "double",
    "dvec2",
    "dvec3",
    "dvec4",
    "else",
    "false",
    "filter",
    "flat",
    "float",
    "for",
    "fract",
    "highp",
    "if",
    "image1D",
    "image2D",
    "image3D",
    "imageBuffer",
    "imageCube",
    "in",
    "inout",
    "input",
    "int",
    "invariant",
    "isampler2D",
    "isampler3D",
    "isamplerCube",
    "ivec2",
    "ivec3",
    "ivec4",
    "layout",
    "lowp",
    "main",
    "mat2",
    "mat2x3",
    "mat2x4",
    "mat3",
    "mat3x2",
    "mat3x4",
    "mat4",
    "mat4x2",
    "mat4x3",
    "mediump",
    "mix",
    "noperspective",
    "out",
    "output",
    "partition",
    "patch",
    "precision",
    "readonly",
    "restrict",
    "return",
    "sample",
    "sampler1D",
    "sampler1DArray",
    "sampler2D",
    "sampler2DArray",
    "sampler2DMS",
    "sampler2DMSArray",
    "sampler3D",
    "samplerBuffer",
    "samplerCube",
    "samplerCubeArray",
    "shared",
    "smooth",
    "struct",
    "subroutine",
    "superp",
    "switch",
    "texture",
    "true",
    "uimage2D",
    "uint",
    "uniform",
    "usampler2D",
    "usampler3D",
    "uvec2",
    "uvec3",
    "uvec4",
    "varying",
    "vec2",
    "vec3",
    "vec4",
    "void",
    "volatile",
    "while",
    "writeonly",
];

/// Check if an identifier collides with a GLSL reserved word or built-in
///
/// Any identifier starting with `gl_` is reserved by the GLSL
/// specification regardless of the word list.
pub fn is_reserved_word(ident: &str) -> bool {
    ident.starts_with("gl_") || RESERVED_WORDS.binary_search(&ident).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_words_sorted() {
        // binary_search requires the table to stay sorted
        assert!(RESERVED_WORDS.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_is_reserved_word() {
        assert!(is_reserved_word("uniform"));
        assert!(is_reserved_word("vec4"));
        assert!(is_reserved_word("main"));
        assert!(is_reserved_word("gl_Position"));
        assert!(!is_reserved_word("color"));
        assert!(!is_reserved_word("worldMatrix"));
    }

    #[test]
    fn test_data_type_keywords() {
        assert_eq!(
            data_type_to_glsl_keyword(DataType::Scalar(ScalarType::Float)),
            Some("float")
        );
        assert_eq!(
            data_type_to_glsl_keyword(DataType::Vector(ScalarType::Float, 4)),
            Some("vec4")
        );
        assert_eq!(
            data_type_to_glsl_keyword(DataType::Vector(ScalarType::Half, 3)),
            Some("vec3")
        );
        assert_eq!(
            data_type_to_glsl_keyword(DataType::Matrix(ScalarType::Float, 4, 4)),
            Some("mat4")
        );
        assert_eq!(
            data_type_to_glsl_keyword(DataType::Matrix(ScalarType::Double, 3, 4)),
            Some("dmat3x4")
        );
        // GLSL has no integer matrices
        assert_eq!(
            data_type_to_glsl_keyword(DataType::Matrix(ScalarType::Int, 2, 2)),
            None
        );
    }

    #[test]
    fn test_semantic_keywords() {
        let pos = Semantic::system(SystemValue::Position, 0);
        assert_eq!(
            semantic_to_glsl_keyword(&pos, ShaderTarget::VertexShader),
            Some("gl_Position")
        );
        assert_eq!(
            semantic_to_glsl_keyword(&pos, ShaderTarget::FragmentShader),
            Some("gl_FragCoord")
        );

        let user = Semantic::user("TEXCOORD", 0);
        assert_eq!(
            semantic_to_glsl_keyword(&user, ShaderTarget::VertexShader),
            None
        );
    }

    #[test]
    fn test_storage_class_keywords() {
        assert_eq!(
            storage_class_to_glsl_keyword(StorageClass::GroupShared),
            Some("shared")
        );
        assert_eq!(storage_class_to_glsl_keyword(StorageClass::Static), None);
    }
}
