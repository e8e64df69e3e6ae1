//! Hoisting and identifier resolution: declarations float to function
//! entry as unset-sentinel stores, reserved names get deterministic
//! renames, and each function gets fresh temps and a fresh scope.

use jspy_ast::js::LogicalOp;
use jspy_ast::py::{PyExpr, PyStmt};
use jspy_ast::AstBuilder;
use jspy_transform::{transform, ErrorKind, RuntimeSymbol};

fn name(s: &str) -> PyExpr {
    PyExpr::Name(s.to_string())
}

fn hoist_store(stmt: &PyStmt) -> Option<&str> {
    match stmt {
        PyStmt::Assign {
            target: PyExpr::Name(target),
            value: PyExpr::Name(value),
        } if value == "JSUndefined" => Some(target),
        _ => None,
    }
}

/// Declarations anywhere in a function body, nested statements included,
/// float to the top in source order.
#[test]
fn declarations_hoist_to_module_entry_in_source_order() {
    // var b; if (b) { var a = 1; }
    let mut b = AstBuilder::new();
    let b_decl = b.var("b", None);
    let b_ref = b.ident("b");
    let one = b.num("1");
    let a_decl = b.var("a", Some(one));
    let then = b.block(vec![a_decl]);
    let if_stmt = b.if_stmt(b_ref, then, None);
    let program = b.program(vec![b_decl, if_stmt]);

    let output = transform(&program).expect("transform failed");
    let body = &output.module.body;
    assert_eq!(hoist_store(&body[0]), Some("b"));
    assert_eq!(hoist_store(&body[1]), Some("a"));
    // The initializer stays where it was written, inside the branch.
    let PyStmt::If { body: then, .. } = &body[2] else {
        panic!("expected if statement");
    };
    assert!(matches!(
        &then[0],
        PyStmt::Assign { target, .. } if *target == name("a")
    ));
    assert!(output.required_symbols.contains(RuntimeSymbol::Undefined));
}

/// Names the output language reserves are renamed the same way at every
/// mention.
#[test]
fn reserved_names_rename_consistently() {
    // var class = 1; var x = class;
    let mut b = AstBuilder::new();
    let one = b.num("1");
    let class_decl = b.var("class", Some(one));
    let class_ref = b.ident("class");
    let x_decl = b.var("x", Some(class_ref));
    let program = b.program(vec![class_decl, x_decl]);

    let output = transform(&program).expect("transform failed");
    let body = &output.module.body;
    assert_eq!(hoist_store(&body[0]), Some("class_"));
    assert_eq!(hoist_store(&body[1]), Some("x"));
    assert!(matches!(
        &body[2],
        PyStmt::Assign { target, .. } if *target == name("class_")
    ));
    assert!(matches!(
        &body[3],
        PyStmt::Assign { target, value } if *target == name("x") && *value == name("class_")
    ));
}

/// A user variable named after a runtime helper is renamed away from it,
/// so the generated helper calls still reach the real helper.
#[test]
fn user_name_never_shadows_a_runtime_helper() {
    // var js_truthy = 1; if (js_truthy) {}
    let mut b = AstBuilder::new();
    let one = b.num("1");
    let decl = b.var("js_truthy", Some(one));
    let cond = b.ident("js_truthy");
    let then = b.block(vec![]);
    let if_stmt = b.if_stmt(cond, then, None);
    let program = b.program(vec![decl, if_stmt]);

    let output = transform(&program).expect("transform failed");
    let PyStmt::If { condition, .. } = &output.module.body[2] else {
        panic!("expected if statement");
    };
    let PyExpr::Call { callee, args } = condition else {
        panic!("expected truthiness call");
    };
    assert_eq!(**callee, name("js_truthy"));
    assert_eq!(args.as_slice(), &[name("js_truthy_")]);
}

/// Each function body starts with fresh temps; the enclosing counter is
/// restored afterwards.
#[test]
fn function_bodies_get_fresh_temps() {
    // var a; var r;
    // r = a && a;
    // function f(p) { var q; q = p && p; return q; }
    // r = a && a;
    let mut b = AstBuilder::new();
    let decls = b.var_list(vec![("a", None), ("r", None)]);

    let make_outer_assign = |b: &mut AstBuilder| {
        let r = b.ident("r");
        let a1 = b.ident("a");
        let a2 = b.ident("a");
        let and = b.logical(LogicalOp::And, a1, a2);
        let assign = b.assign(r, and);
        b.expr_stmt(assign)
    };
    let first = make_outer_assign(&mut b);

    let q_decl = b.var("q", None);
    let q1 = b.ident("q");
    let p1 = b.ident("p");
    let p2 = b.ident("p");
    let and = b.logical(LogicalOp::And, p1, p2);
    let q_assign = b.assign(q1, and);
    let q_stmt = b.expr_stmt(q_assign);
    let q2 = b.ident("q");
    let ret = b.return_stmt(Some(q2));
    let func = b.function("f", vec!["p"], vec![q_decl, q_stmt, ret]);

    let second = make_outer_assign(&mut b);
    let program = b.program(vec![decls, first, func, second]);

    let output = transform(&program).expect("transform failed");
    let body = &output.module.body;
    // hoists (a, r), assign, def, assign
    assert_eq!(body.len(), 5);

    let walrus_target = |stmt: &PyStmt| -> String {
        let PyStmt::Assign { value, .. } = stmt else {
            panic!("expected assignment, got {stmt:?}");
        };
        let PyExpr::Conditional { condition, .. } = value else {
            panic!("expected conditional, got {value:?}");
        };
        let PyExpr::Call { args, .. } = &**condition else {
            panic!("expected truthiness call");
        };
        let PyExpr::Named { target, .. } = &args[0] else {
            panic!("expected walrus binding");
        };
        target.clone()
    };

    assert_eq!(walrus_target(&body[2]), "_js_tmp1");

    let PyStmt::FunctionDef {
        name: fn_name,
        params,
        body: fbody,
    } = &body[3]
    else {
        panic!("expected function def");
    };
    assert_eq!(fn_name, "f");
    assert_eq!(params.as_slice(), &["p".to_string()]);
    // hoist q, assignment, return
    assert_eq!(hoist_store(&fbody[0]), Some("q"));
    assert_eq!(walrus_target(&fbody[1]), "_js_tmp1");
    assert!(matches!(&fbody[2], PyStmt::Return(value) if *value == name("q")));

    // Back at module level the counter continues where it left off.
    assert_eq!(walrus_target(&body[4]), "_js_tmp2");
}

/// Parameters resolve in the function scope but are never hoisted.
#[test]
fn params_resolve_without_hoisting() {
    // function f(p) { var a; p = 1; }
    let mut b = AstBuilder::new();
    let a_decl = b.var("a", None);
    let p = b.ident("p");
    let one = b.num("1");
    let p_assign = b.assign(p, one);
    let p_stmt = b.expr_stmt(p_assign);
    let func = b.function("f", vec!["p"], vec![a_decl, p_stmt]);
    let program = b.program(vec![func]);

    let output = transform(&program).expect("transform failed");
    let PyStmt::FunctionDef { body, .. } = &output.module.body[0] else {
        panic!("expected function def");
    };
    assert_eq!(body.len(), 2, "only 'a' is hoisted");
    assert_eq!(hoist_store(&body[0]), Some("a"));
    assert!(matches!(
        &body[1],
        PyStmt::Assign { target, .. } if *target == name("p")
    ));
}

/// A function name becomes a binding in the enclosing scope, callable
/// after its declaration.
#[test]
fn function_name_is_callable_in_the_enclosing_scope() {
    let mut b = AstBuilder::new();
    let ret = b.return_stmt(None);
    let func = b.function("f", vec![], vec![ret]);
    let callee = b.ident("f");
    let call = b.call(callee, vec![]);
    let call_stmt = b.expr_stmt(call);
    let program = b.program(vec![func, call_stmt]);

    let output = transform(&program).expect("transform failed");
    let body = &output.module.body;
    assert!(matches!(&body[0], PyStmt::FunctionDef { name, .. } if name == "f"));
    let PyStmt::Expr(PyExpr::Call { callee, args }) = &body[1] else {
        panic!("expected call statement");
    };
    assert_eq!(**callee, name("f"));
    assert!(args.is_empty());

    // A bare return yields the unset sentinel, not None.
    let PyStmt::FunctionDef { body: fbody, .. } = &body[0] else {
        unreachable!();
    };
    assert!(matches!(&fbody[0], PyStmt::Return(value) if *value == name("JSUndefined")));
}

/// Reading a name declared only inside a function fails outside it.
#[test]
fn function_locals_do_not_leak_out() {
    // function f() { var x; }  x;
    let mut b = AstBuilder::new();
    let x_decl = b.var("x", None);
    let func = b.function("f", vec![], vec![x_decl]);
    let x_ref = b.ident("x");
    let x_stmt = b.expr_stmt(x_ref);
    let program = b.program(vec![func, x_stmt]);

    let err = transform(&program).unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnresolvedBinding);
}
