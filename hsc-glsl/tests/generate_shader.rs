use hsc_ast::ast::*;
use hsc_ast::intrinsic::Intrinsic;
use hsc_ast::register::Register;
use hsc_ast::semantic::{Semantic, SystemValue};
use hsc_ast::type_denoter::{ScalarType, TypeDenoter};
use hsc_common::{Reporter, ShaderTarget, SourceSpan};
use hsc_glsl::{generate, GlslVersion, ShaderInput, ShaderOutput};
use pretty_assertions::assert_eq;
use std::rc::Rc;

fn span() -> SourceSpan {
    SourceSpan::dummy()
}

fn lit(value: &str) -> Expr {
    Expr::literal(value, span())
}

fn access_var(name: &str, id: VarId) -> Expr {
    Expr::new(
        ExprKind::VarAccess {
            var_ident: VarIdent::new(name, span()).with_symbol(DeclRef::Var(id)),
            assign: None,
        },
        span(),
    )
}

#[test]
fn test_minimal_vertex_shader_golden() {
    // float4 VS(float3 p : POSITION) : SV_Position { return float4(p, 1); }
    let mut program = Program::new();

    let p = program.add_variable(
        VarDecl::new("p", TypeDenoter::vector(ScalarType::Float, 3), span())
            .with_semantic(Semantic::user("POSITION", 0)),
    );

    let ctor = FunctionCall::type_constructor(
        TypeDenoter::vector(ScalarType::Float, 4),
        vec![access_var("p", p), lit("1")],
    );
    let ret = Stmnt::new(
        StmntKind::Return {
            expr: Some(Expr::new(ExprKind::Call(ctor), span())),
        },
        span(),
    );

    let mut entry = FunctionDecl::new(
        "VS",
        VarType::new(TypeDenoter::vector(ScalarType::Float, 4)),
        span(),
    );
    entry.parameters.push(VarDeclStmnt::new(
        VarType::new(TypeDenoter::vector(ScalarType::Float, 3)),
        vec![p],
        span(),
    ));
    entry.semantic = Some(Semantic::system(SystemValue::Position, 0));
    entry.body = Some(CodeBlock::new(vec![ret]));
    let id = program.add_function(entry);
    program.entry_point = Some(id);
    program
        .global_stmnts
        .push(Stmnt::new(StmntKind::FunctionDecl(id), span()));

    let input = ShaderInput::new(ShaderTarget::VertexShader, "VS");
    let output = ShaderOutput::new(GlslVersion::Glsl330);
    let mut reporter = Reporter::new();

    let source = generate(&mut program, &input, &output, None, &mut reporter).unwrap();

    let expected = "\
#version 330

// GLSL vertex shader \"VS\"
// Generated by the HSC shader cross-compiler

in vec3 p;

void main()
{
    gl_Position = vec4(p, 1);
}

";
    assert_eq!(source, expected);
    assert_eq!(reporter.error_count(), 0);
    assert_eq!(reporter.warning_count(), 0);
}

#[test]
fn test_fragment_shader_with_clip() {
    // float4 PS() : SV_Target { clip(-1.0); return float4(1, 1, 1, 1); }
    let mut program = Program::new();

    let clip_call = FunctionCall::intrinsic(
        Intrinsic::Clip,
        VarIdent::new("clip", span()),
        vec![lit("-1.0")],
    );
    let ctor = FunctionCall::type_constructor(
        TypeDenoter::vector(ScalarType::Float, 4),
        vec![lit("1"), lit("1"), lit("1"), lit("1")],
    );

    let mut entry = FunctionDecl::new(
        "PS",
        VarType::new(TypeDenoter::vector(ScalarType::Float, 4)),
        span(),
    );
    entry.semantic = Some(Semantic::system(SystemValue::Target, 0));
    entry.body = Some(CodeBlock::new(vec![
        Stmnt::new(
            StmntKind::Expr(Expr::new(ExprKind::Call(clip_call), span())),
            span(),
        ),
        Stmnt::new(
            StmntKind::Return {
                expr: Some(Expr::new(ExprKind::Call(ctor), span())),
            },
            span(),
        ),
    ]));
    let id = program.add_function(entry);
    program.entry_point = Some(id);
    program
        .global_stmnts
        .push(Stmnt::new(StmntKind::FunctionDecl(id), span()));

    let input = ShaderInput::new(ShaderTarget::FragmentShader, "PS");
    let output = ShaderOutput::new(GlslVersion::Glsl330);
    let mut reporter = Reporter::new();

    let source = generate(&mut program, &input, &output, None, &mut reporter).unwrap();

    // The clip helpers are defined before main and the scalar overload
    // is used as a plain call
    assert!(source.contains("void clip(float x) { if (x < 0.0) discard; }"));
    assert!(source.contains("void clip(vec4 x) { if (any(lessThan(x, vec4(0.0)))) discard; }"));
    assert!(source.find("void clip(float x)").unwrap() < source.find("void main()").unwrap());
    assert!(source.contains("clip(-1.0);"));
    assert!(source.contains("gl_FragColor = vec4(1, 1, 1, 1);"));
}

#[test]
fn test_compute_shader_with_atomics_and_extensions() {
    // [numthreads(64, 1, 1)] void CS() { InterlockedAdd(counter, 1, prev); }
    let mut program = Program::new();

    let counter = program.add_variable(VarDecl::new(
        "counter",
        TypeDenoter::scalar(ScalarType::UInt),
        span(),
    ));
    let member = Stmnt::new(
        StmntKind::VarDecl(VarDeclStmnt::new(
            VarType::new(TypeDenoter::scalar(ScalarType::UInt)),
            vec![counter],
            span(),
        )),
        span(),
    );
    let mut buffer = BufferDecl::new("Counters", vec![member], span());
    buffer.slot_registers.push(Register::new('b', 1));
    let buffer_id = program.add_buffer(buffer);
    program
        .global_stmnts
        .push(Stmnt::new(StmntKind::BufferDecl(buffer_id), span()));

    let atomic = FunctionCall::intrinsic(
        Intrinsic::InterlockedAdd,
        VarIdent::new("InterlockedAdd", span()),
        vec![
            access_var("counter", counter),
            lit("1"),
            Expr::new(
                ExprKind::VarAccess {
                    var_ident: VarIdent::new("prev", span()),
                    assign: None,
                },
                span(),
            ),
        ],
    );

    let mut entry = FunctionDecl::new("CS", VarType::new(Rc::new(TypeDenoter::Void)), span());
    entry.attribs.push(Attribute::new(
        "numthreads",
        vec![lit("64"), lit("1"), lit("1")],
        span(),
    ));
    entry.body = Some(CodeBlock::new(vec![Stmnt::new(
        StmntKind::Expr(Expr::new(ExprKind::Call(atomic), span())),
        span(),
    )]));
    let id = program.add_function(entry);
    program.entry_point = Some(id);
    program
        .global_stmnts
        .push(Stmnt::new(StmntKind::FunctionDecl(id), span()));

    let input = ShaderInput::new(ShaderTarget::ComputeShader, "CS");
    let output = ShaderOutput::new(GlslVersion::Glsl420);
    let mut reporter = Reporter::new();

    let source = generate(&mut program, &input, &output, None, &mut reporter).unwrap();

    // Atomics and compute need extensions below GLSL 430
    assert!(source.contains("#extension GL_ARB_compute_shader : enable"));
    assert!(source.contains("#extension GL_ARB_shader_storage_buffer_object : enable"));
    assert!(source.contains("layout(local_size_x = 64, local_size_y = 1, local_size_z = 1) in;"));
    assert!(source.contains("layout(std140, binding = 1) uniform Counters"));
    assert!(source.contains("prev = atomicAdd(counter, 1);"));

    // Extensions come right after the version directive
    let version_pos = source.find("#version 420").unwrap();
    let ext_pos = source.find("#extension").unwrap();
    let body_pos = source.find("layout(").unwrap();
    assert!(version_pos < ext_pos);
    assert!(ext_pos < body_pos);
}
