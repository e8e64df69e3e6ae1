//! Short-circuit desugaring: single evaluation of the left operand, the
//! original value preserved on the short-circuit path, one temp per
//! operator boundary.

use jspy_ast::py::{PyExpr, PyStmt};
use jspy_ast::AstBuilder;
use jspy_transform::{transform, RuntimeSymbol};

/// `var a; var x; var y; <expr>;` and return the lowered expression
/// statement.
fn lower_expr(build: impl FnOnce(&mut AstBuilder) -> jspy_ast::js::Node) -> PyExpr {
    let mut b = AstBuilder::new();
    let a = b.var("a", None);
    let x = b.var("x", None);
    let y = b.var("y", None);
    let expr = build(&mut b);
    let stmt = b.expr_stmt(expr);
    let program = b.program(vec![a, x, y, stmt]);
    let output = transform(&program).expect("transform failed");
    // Three hoist stores, then the expression statement.
    match output.module.body.into_iter().nth(3) {
        Some(PyStmt::Expr(expr)) => expr,
        other => panic!("expected expression statement, got {other:?}"),
    }
}

#[test]
fn and_preserves_original_left_value() {
    // a && (x = y)
    let lowered = lower_expr(|b| {
        let a = b.ident("a");
        let x = b.ident("x");
        let y = b.ident("y");
        let assign = b.assign(x, y);
        b.logical(jspy_ast::js::LogicalOp::And, a, assign)
    });

    let PyExpr::Conditional {
        condition,
        when_true,
        when_false,
    } = lowered
    else {
        panic!("expected conditional expression");
    };

    // Condition binds `a` once inside the truthiness test.
    let PyExpr::Call { callee, args } = *condition else {
        panic!("expected js_truthy call");
    };
    assert_eq!(*callee, PyExpr::Name("js_truthy".to_string()));
    let PyExpr::Named { target, value } = &args[0] else {
        panic!("expected walrus binding of the left operand");
    };
    assert_eq!(target, "_js_tmp1");
    assert_eq!(**value, PyExpr::Name("a".to_string()));

    // True branch evaluates the right operand (the nested assignment as
    // a walrus); false branch yields the temp, not a coerced boolean.
    let PyExpr::Named { target, value } = *when_true else {
        panic!("expected walrus binding for assignment-as-value");
    };
    assert_eq!(target, "x");
    assert_eq!(*value, PyExpr::Name("y".to_string()));
    assert_eq!(*when_false, PyExpr::Name("_js_tmp1".to_string()));
}

#[test]
fn or_yields_temp_on_truthy_path() {
    let lowered = lower_expr(|b| {
        let a = b.ident("a");
        let x = b.ident("x");
        b.logical(jspy_ast::js::LogicalOp::Or, a, x)
    });

    let PyExpr::Conditional {
        when_true,
        when_false,
        ..
    } = lowered
    else {
        panic!("expected conditional expression");
    };
    assert_eq!(*when_true, PyExpr::Name("_js_tmp1".to_string()));
    assert_eq!(*when_false, PyExpr::Name("x".to_string()));
}

#[test]
fn chain_uses_one_temp_per_boundary() {
    // a && x && y — two operators, two temps.
    let lowered = lower_expr(|b| {
        let a = b.ident("a");
        let x = b.ident("x");
        let y = b.ident("y");
        let inner = b.logical(jspy_ast::js::LogicalOp::And, a, x);
        b.logical(jspy_ast::js::LogicalOp::And, inner, y)
    });

    let mut temps = Vec::new();
    collect_walrus_targets(&lowered, &mut temps);
    temps.sort();
    assert_eq!(temps, vec!["_js_tmp1".to_string(), "_js_tmp2".to_string()]);
}

#[test]
fn truthiness_symbol_is_reported() {
    let mut b = AstBuilder::new();
    let a = b.var("a", None);
    let lhs = b.ident("a");
    let rhs = b.ident("a");
    let expr = b.logical(jspy_ast::js::LogicalOp::And, lhs, rhs);
    let stmt = b.expr_stmt(expr);
    let program = b.program(vec![a, stmt]);
    let output = transform(&program).unwrap();
    assert!(output.required_symbols.contains(RuntimeSymbol::Truthy));
    assert!(output.required_symbols.contains(RuntimeSymbol::Undefined));
    assert!(!output.required_symbols.contains(RuntimeSymbol::Add));
}

fn collect_walrus_targets(expr: &PyExpr, out: &mut Vec<String>) {
    match expr {
        PyExpr::Named { target, value } => {
            out.push(target.clone());
            collect_walrus_targets(value, out);
        }
        PyExpr::Conditional {
            condition,
            when_true,
            when_false,
        } => {
            collect_walrus_targets(condition, out);
            collect_walrus_targets(when_true, out);
            collect_walrus_targets(when_false, out);
        }
        PyExpr::Call { callee, args } => {
            collect_walrus_targets(callee, out);
            for arg in args {
                collect_walrus_targets(arg, out);
            }
        }
        PyExpr::Subscript { object, index } => {
            collect_walrus_targets(object, out);
            collect_walrus_targets(index, out);
        }
        PyExpr::BinOp { left, right, .. } => {
            collect_walrus_targets(left, out);
            collect_walrus_targets(right, out);
        }
        PyExpr::UnaryOp { operand, .. } => collect_walrus_targets(operand, out),
        _ => {}
    }
}
