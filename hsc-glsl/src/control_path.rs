//! Control path analysis
//!
//! Marks every function whose body can fall off the end without
//! returning a value. The analysis is conservative: loops are assumed to
//! possibly not execute, so they never satisfy a return requirement.
//!
//! The generator turns the mark into an error for reachable functions
//! and a warning for unreferenced ones.

use hsc_ast::ast::{AstFlags, Program, Stmnt, StmntKind};
use log::debug;

/// Analyzer pass marking non-returning control paths
pub struct ControlPathAnalyzer;

impl ControlPathAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Analyze all functions of the program
    ///
    /// Sets `HAS_NON_RETURN_CONTROL_PATH` on functions with a non-void
    /// return type whose body does not return on every path, and
    /// `IS_END_OF_FUNCTION` on a return statement that is the lexically
    /// last statement of its function body.
    pub fn mark_control_paths(&mut self, program: &mut Program) {
        for func in &mut program.functions {
            let needs_return = !func.return_type.denoter.resolved().is_void();

            if let Some(body) = &mut func.body {
                if needs_return && !Self::block_returns(&body.stmnts) {
                    debug!(
                        "control path analysis: function '{}' does not return on all paths",
                        func.ident
                    );
                    func.flags |= AstFlags::HAS_NON_RETURN_CONTROL_PATH;
                }

                if let Some(last) = body.stmnts.last_mut() {
                    if last.is_return() {
                        last.flags |= AstFlags::IS_END_OF_FUNCTION;
                    }
                }
            }
        }
    }

    /// A block returns iff its last statement returns
    fn block_returns(stmnts: &[Stmnt]) -> bool {
        stmnts.last().is_some_and(Self::stmnt_returns)
    }

    fn stmnt_returns(stmnt: &Stmnt) -> bool {
        match &stmnt.kind {
            StmntKind::Return { .. } => true,

            StmntKind::CodeBlock(block) => Self::block_returns(&block.stmnts),

            // An if returns only when both branches return
            StmntKind::If {
                body, else_stmnt, ..
            } => match else_stmnt {
                Some(else_stmnt) => {
                    Self::stmnt_returns(body) && Self::stmnt_returns(else_stmnt)
                }
                None => false,
            },

            // A switch returns only when a default case is present and
            // every case returns
            StmntKind::Switch { cases, .. } => {
                cases.iter().any(|case| case.is_default())
                    && cases.iter().all(|case| Self::block_returns(&case.stmnts))
            }

            // Loops may not execute at all
            _ => false,
        }
    }
}

impl Default for ControlPathAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hsc_ast::ast::{CodeBlock, FunctionDecl, SwitchCase, VarType};
    use hsc_ast::type_denoter::{ScalarType, TypeDenoter};
    use hsc_common::SourceSpan;
    use std::rc::Rc;

    fn span() -> SourceSpan {
        SourceSpan::dummy()
    }

    fn ret_stmnt() -> Stmnt {
        Stmnt::new(StmntKind::Return { expr: None }, span())
    }

    fn null_stmnt() -> Stmnt {
        Stmnt::new(StmntKind::Null, span())
    }

    fn float_func(body: Vec<Stmnt>) -> FunctionDecl {
        let mut func = FunctionDecl::new(
            "f",
            VarType::new(TypeDenoter::scalar(ScalarType::Float)),
            span(),
        );
        func.body = Some(CodeBlock::new(body));
        func
    }

    fn analyze(func: FunctionDecl) -> AstFlags {
        let mut program = Program::new();
        let id = program.add_function(func);
        ControlPathAnalyzer::new().mark_control_paths(&mut program);
        program.function(id).flags
    }

    #[test]
    fn test_plain_return() {
        let flags = analyze(float_func(vec![ret_stmnt()]));
        assert!(!flags.contains(AstFlags::HAS_NON_RETURN_CONTROL_PATH));
    }

    #[test]
    fn test_missing_return() {
        let flags = analyze(float_func(vec![null_stmnt()]));
        assert!(flags.contains(AstFlags::HAS_NON_RETURN_CONTROL_PATH));
    }

    #[test]
    fn test_void_function_exempt() {
        let mut func = FunctionDecl::new(
            "f",
            VarType::new(Rc::new(TypeDenoter::Void)),
            span(),
        );
        func.body = Some(CodeBlock::new(vec![null_stmnt()]));
        let flags = analyze(func);
        assert!(!flags.contains(AstFlags::HAS_NON_RETURN_CONTROL_PATH));
    }

    #[test]
    fn test_if_without_else_does_not_return() {
        let cond = hsc_ast::ast::Expr::literal("true", span());
        let if_stmnt = Stmnt::new(
            StmntKind::If {
                condition: cond,
                body: Box::new(ret_stmnt()),
                else_stmnt: None,
            },
            span(),
        );
        let flags = analyze(float_func(vec![if_stmnt]));
        assert!(flags.contains(AstFlags::HAS_NON_RETURN_CONTROL_PATH));
    }

    #[test]
    fn test_if_else_both_return() {
        let cond = hsc_ast::ast::Expr::literal("true", span());
        let if_stmnt = Stmnt::new(
            StmntKind::If {
                condition: cond,
                body: Box::new(ret_stmnt()),
                else_stmnt: Some(Box::new(ret_stmnt())),
            },
            span(),
        );
        let flags = analyze(float_func(vec![if_stmnt]));
        assert!(!flags.contains(AstFlags::HAS_NON_RETURN_CONTROL_PATH));
    }

    #[test]
    fn test_switch_requires_default() {
        let selector = hsc_ast::ast::Expr::literal("x", span());
        let case = SwitchCase {
            expr: Some(hsc_ast::ast::Expr::literal("0", span())),
            stmnts: vec![ret_stmnt()],
            span: span(),
        };
        let switch = Stmnt::new(
            StmntKind::Switch {
                selector: selector.clone(),
                cases: vec![case.clone()],
            },
            span(),
        );
        let flags = analyze(float_func(vec![switch]));
        assert!(flags.contains(AstFlags::HAS_NON_RETURN_CONTROL_PATH));

        let default_case = SwitchCase {
            expr: None,
            stmnts: vec![ret_stmnt()],
            span: span(),
        };
        let switch = Stmnt::new(
            StmntKind::Switch {
                selector,
                cases: vec![case, default_case],
            },
            span(),
        );
        let flags = analyze(float_func(vec![switch]));
        assert!(!flags.contains(AstFlags::HAS_NON_RETURN_CONTROL_PATH));
    }

    #[test]
    fn test_loop_does_not_count() {
        let cond = hsc_ast::ast::Expr::literal("true", span());
        let while_stmnt = Stmnt::new(
            StmntKind::While {
                condition: cond,
                body: Box::new(ret_stmnt()),
            },
            span(),
        );
        let flags = analyze(float_func(vec![while_stmnt]));
        assert!(flags.contains(AstFlags::HAS_NON_RETURN_CONTROL_PATH));
    }

    #[test]
    fn test_end_of_function_mark() {
        let mut program = Program::new();
        let id = program.add_function(float_func(vec![null_stmnt(), ret_stmnt()]));
        ControlPathAnalyzer::new().mark_control_paths(&mut program);

        let body = program.function(id).body.as_ref().unwrap();
        assert!(!body.stmnts[0].flags.contains(AstFlags::IS_END_OF_FUNCTION));
        assert!(body.stmnts[1].flags.contains(AstFlags::IS_END_OF_FUNCTION));
    }
}
