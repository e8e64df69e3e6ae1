//! Switch lowering: dispatch through an always-true loop over an if/elif
//! chain with identity-aware equality against a cached discriminant.

use jspy_ast::py::{PyBinOp, PyExpr, PyStmt};
use jspy_ast::AstBuilder;
use jspy_transform::{transform, ErrorKind, RuntimeSymbol};

fn name(s: &str) -> PyExpr {
    PyExpr::Name(s.to_string())
}

/// Is `expr` a `js_strict_eq(_js_tmp1, <literal>)` call?
fn is_dispatch_test(expr: &PyExpr) -> bool {
    let PyExpr::Call { callee, args } = expr else {
        return false;
    };
    **callee == name("js_strict_eq") && args.len() == 2 && args[0] == name("_js_tmp1")
}

/// `switch (x) { case 1: case 2: y = 1; break; case 3: y = 2; break;
/// default: y = 3; }` — empty alias cases merge into the next non-empty
/// case with `or`, the default becomes the final else.
#[test]
fn alias_cases_merge_and_default_becomes_else() {
    let mut b = AstBuilder::new();
    let decls = b.var_list(vec![("x", None), ("y", None)]);
    let disc = b.ident("x");

    let one = b.num("1");
    let alias = b.case(one, vec![]);

    let two = b.num("2");
    let y1 = b.ident("y");
    let v1 = b.num("1");
    let a1 = b.assign(y1, v1);
    let s1 = b.expr_stmt(a1);
    let brk1 = b.break_stmt();
    let case2 = b.case(two, vec![s1, brk1]);

    let three = b.num("3");
    let y2 = b.ident("y");
    let v2 = b.num("2");
    let a2 = b.assign(y2, v2);
    let s2 = b.expr_stmt(a2);
    let brk2 = b.break_stmt();
    let case3 = b.case(three, vec![s2, brk2]);

    let y3 = b.ident("y");
    let v3 = b.num("3");
    let a3 = b.assign(y3, v3);
    let s3 = b.expr_stmt(a3);
    let default = b.default_case(vec![s3]);

    let sw = b.switch(disc, vec![alias, case2, case3, default]);
    let program = b.program(vec![decls, sw]);

    let output = transform(&program).expect("transform failed");
    let body = &output.module.body;

    // hoists (x, y), discriminant cache, dispatch loop.
    assert_eq!(body.len(), 4);
    let PyStmt::Assign { target, value } = &body[2] else {
        panic!("expected discriminant cache");
    };
    assert_eq!(*target, name("_js_tmp1"));
    assert_eq!(*value, name("x"));

    let PyStmt::While { condition, body } = &body[3] else {
        panic!("expected dispatch loop");
    };
    assert_eq!(*condition, PyExpr::Bool(true));
    // chain + trailing safety break
    assert_eq!(body.len(), 2);
    assert_eq!(body[1], PyStmt::Break);

    let PyStmt::If {
        condition,
        body: arm1,
        orelse,
    } = &body[0]
    else {
        panic!("expected if/elif chain");
    };
    // The alias condition merges in source order: eq(tmp,1) or eq(tmp,2).
    let PyExpr::BinOp { op, left, right } = condition else {
        panic!("expected merged alias condition, got {condition:?}");
    };
    assert_eq!(*op, PyBinOp::Or);
    assert!(is_dispatch_test(left));
    assert!(is_dispatch_test(right));
    // The explicit break survives as the arm terminator.
    assert_eq!(arm1.last(), Some(&PyStmt::Break));

    let [PyStmt::If {
        condition,
        body: arm2,
        orelse: else_body,
    }] = orelse.as_slice()
    else {
        panic!("expected elif arm");
    };
    assert!(is_dispatch_test(condition));
    assert_eq!(arm2.last(), Some(&PyStmt::Break));

    // Default arm, with its terminator synthesized.
    assert_eq!(else_body.len(), 2);
    assert_eq!(else_body[1], PyStmt::Break);

    assert!(output.required_symbols.contains(RuntimeSymbol::StrictEq));
}

/// A case body without an explicit terminator still leaves the dispatch
/// loop when it is the last case.
#[test]
fn terminator_is_synthesized_for_the_final_case() {
    let mut b = AstBuilder::new();
    let decls = b.var_list(vec![("x", None), ("y", None)]);
    let disc = b.ident("x");
    let one = b.num("1");
    let y = b.ident("y");
    let v = b.num("1");
    let a = b.assign(y, v);
    let s = b.expr_stmt(a);
    let case = b.case(one, vec![s]);
    let sw = b.switch(disc, vec![case]);
    let program = b.program(vec![decls, sw]);

    let output = transform(&program).expect("transform failed");
    let PyStmt::While { body, .. } = &output.module.body[3] else {
        panic!("expected dispatch loop");
    };
    let PyStmt::If { body: arm, .. } = &body[0] else {
        panic!("expected dispatch arm");
    };
    assert_eq!(arm.len(), 2);
    assert_eq!(arm[1], PyStmt::Break);
}

/// Trailing empty cases with nothing to fall into match and exit.
#[test]
fn trailing_empty_cases_become_a_break_only_arm() {
    let mut b = AstBuilder::new();
    let x_decl = b.var("x", None);
    let disc = b.ident("x");
    let one = b.num("1");
    let two = b.num("2");
    let c1 = b.case(one, vec![]);
    let c2 = b.case(two, vec![]);
    let sw = b.switch(disc, vec![c1, c2]);
    let program = b.program(vec![x_decl, sw]);

    let output = transform(&program).expect("transform failed");
    let PyStmt::While { body, .. } = &output.module.body[2] else {
        panic!("expected dispatch loop");
    };
    let PyStmt::If {
        condition,
        body: arm,
        orelse,
    } = &body[0]
    else {
        panic!("expected dispatch arm");
    };
    assert!(matches!(
        condition,
        PyExpr::BinOp {
            op: PyBinOp::Or,
            ..
        }
    ));
    assert_eq!(arm.as_slice(), &[PyStmt::Break]);
    assert!(orelse.is_empty());
}

/// A break at the end of a trailing block terminates its case: blocks
/// flatten during lowering, so the pre-check must look through them.
#[test]
fn break_inside_a_trailing_block_terminates_the_case() {
    // switch (x) { case 1: { y = 1; break; } case 2: y = 2; break; }
    let mut b = AstBuilder::new();
    let decls = b.var_list(vec![("x", None), ("y", None)]);
    let one = b.num("1");
    let y1 = b.ident("y");
    let v1 = b.num("1");
    let a1 = b.assign(y1, v1);
    let s1 = b.expr_stmt(a1);
    let brk1 = b.break_stmt();
    let block = b.block(vec![s1, brk1]);
    let c1 = b.case(one, vec![block]);
    let two = b.num("2");
    let y2 = b.ident("y");
    let v2 = b.num("2");
    let a2 = b.assign(y2, v2);
    let s2 = b.expr_stmt(a2);
    let brk2 = b.break_stmt();
    let c2 = b.case(two, vec![s2, brk2]);
    let disc = b.ident("x");
    let sw = b.switch(disc, vec![c1, c2]);
    let program = b.program(vec![decls, sw]);

    let output = transform(&program).expect("transform failed");
    let PyStmt::While { body, .. } = &output.module.body[3] else {
        panic!("expected dispatch loop");
    };
    let PyStmt::If { body: arm, .. } = &body[0] else {
        panic!("expected dispatch arm");
    };
    // The block flattened; its break survives as the arm terminator.
    assert_eq!(arm.len(), 2);
    assert_eq!(arm[1], PyStmt::Break);
}

/// An if/else whose branches both leave the dispatch terminates its case.
#[test]
fn if_else_terminating_both_branches_satisfies_the_pre_check() {
    // function f(x) {
    //   switch (x) { case 1: if (x) return 1; else return 2; case 2: break; }
    // }
    let mut b = AstBuilder::new();
    let x1 = b.ident("x");
    let one = b.num("1");
    let r1 = b.return_stmt(Some(one));
    let two = b.num("2");
    let r2 = b.return_stmt(Some(two));
    let if_stmt = b.if_stmt(x1, r1, Some(r2));
    let c1_test = b.num("1");
    let c1 = b.case(c1_test, vec![if_stmt]);
    let c2_test = b.num("2");
    let brk = b.break_stmt();
    let c2 = b.case(c2_test, vec![brk]);
    let disc = b.ident("x");
    let sw = b.switch(disc, vec![c1, c2]);
    let func = b.function("f", vec!["x"], vec![sw]);
    let program = b.program(vec![func]);

    let output = transform(&program).expect("transform failed");
    let PyStmt::FunctionDef { body, .. } = &output.module.body[0] else {
        panic!("expected function def");
    };
    assert!(matches!(&body[1], PyStmt::While { .. }));
}

/// Empty aliases folding into the default's else branch leave no trace:
/// their tests are never emitted, so the equality helper is not reported.
#[test]
fn aliases_before_default_leave_no_symbol_trace() {
    // switch (x) { case 1: default: y = 1; }
    let mut b = AstBuilder::new();
    let decls = b.var_list(vec![("x", None), ("y", None)]);
    let one = b.num("1");
    let alias = b.case(one, vec![]);
    let y = b.ident("y");
    let v = b.num("1");
    let a = b.assign(y, v);
    let s = b.expr_stmt(a);
    let default = b.default_case(vec![s]);
    let disc = b.ident("x");
    let sw = b.switch(disc, vec![alias, default]);
    let program = b.program(vec![decls, sw]);

    let output = transform(&program).expect("transform failed");
    let PyStmt::While { body, .. } = &output.module.body[3] else {
        panic!("expected dispatch loop");
    };
    // The chain is just the default body; no arm, no comparison.
    assert!(body.iter().all(|stmt| !matches!(stmt, PyStmt::If { .. })));
    assert!(!output.required_symbols.contains(RuntimeSymbol::StrictEq));
}

/// A non-empty case that can fall into the next non-empty case cannot be
/// lowered without changing behavior.
#[test]
fn fall_through_into_a_non_empty_case_is_rejected() {
    let mut b = AstBuilder::new();
    let decls = b.var_list(vec![("x", None), ("y", None)]);
    let disc = b.ident("x");
    let one = b.num("1");
    let y1 = b.ident("y");
    let v1 = b.num("1");
    let a1 = b.assign(y1, v1);
    let s1 = b.expr_stmt(a1);
    let c1 = b.case(one, vec![s1]); // no terminator
    let two = b.num("2");
    let y2 = b.ident("y");
    let v2 = b.num("2");
    let a2 = b.assign(y2, v2);
    let s2 = b.expr_stmt(a2);
    let brk = b.break_stmt();
    let c2 = b.case(two, vec![s2, brk]);
    let sw = b.switch(disc, vec![c1, c2]);
    let program = b.program(vec![decls, sw]);

    let err = transform(&program).unwrap_err();
    assert_eq!(err.kind, ErrorKind::AmbiguousFallThrough);
    assert_eq!(err.kind.code(), 1004);
}

/// A default clause followed by more cases would be matched out of order
/// in an if/elif chain.
#[test]
fn default_clause_must_be_the_final_case() {
    let mut b = AstBuilder::new();
    let x_decl = b.var("x", None);
    let disc = b.ident("x");
    let brk1 = b.break_stmt();
    let default = b.default_case(vec![brk1]);
    let one = b.num("1");
    let brk2 = b.break_stmt();
    let c1 = b.case(one, vec![brk2]);
    let sw = b.switch(disc, vec![default, c1]);
    let program = b.program(vec![x_decl, sw]);

    let err = transform(&program).unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnsupportedConstruct);
}

/// Each switch caches its discriminant exactly once, before any arm runs.
#[test]
fn discriminant_is_cached_in_a_fresh_temp() {
    let mut b = AstBuilder::new();
    let decls = b.var_list(vec![("x", None), ("y", None)]);
    // switch (x) { case 1: break; }  twice in a row: two distinct temps.
    let mut switches = Vec::new();
    for _ in 0..2 {
        let disc = b.ident("x");
        let one = b.num("1");
        let brk = b.break_stmt();
        let case = b.case(one, vec![brk]);
        switches.push(b.switch(disc, vec![case]));
    }
    let mut stmts = vec![decls];
    stmts.extend(switches);
    let program = b.program(stmts);

    let output = transform(&program).expect("transform failed");
    let body = &output.module.body;
    // hoists, (cache + loop) per switch.
    assert_eq!(body.len(), 6);
    let PyStmt::Assign { target: t1, .. } = &body[2] else {
        panic!("expected first cache");
    };
    let PyStmt::Assign { target: t2, .. } = &body[4] else {
        panic!("expected second cache");
    };
    assert_eq!(*t1, name("_js_tmp1"));
    assert_eq!(*t2, name("_js_tmp2"));
}
