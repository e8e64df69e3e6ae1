//! Transformation engine — the node-rewrite pass.
//!
//! Walks the input tree depth-first and rewrites each node into zero or
//! more Python output nodes, consulting the pre-pass annotations, the
//! scope resolver, and the temp allocator. Dispatch is exhaustive over the
//! closed input vocabulary; any kind/feature combination without a rewrite
//! rule fails fast with `UnsupportedConstruct`.
//!
//! # Desugaring algorithms
//!
//! - member access is normalized to subscripts (`a.b` → `a['b']`), with
//!   `.length` reads becoming `len(...)` calls;
//! - short-circuit operators bind their left operand to a temp inside a
//!   truthiness test so the original value, not a coerced boolean, is
//!   preserved when short-circuiting;
//! - assignments nested in expressions become walrus bindings;
//! - compound/update member targets cache base and key in temps so each is
//!   evaluated exactly once;
//! - classic for loops become while loops with the update cloned before
//!   every `continue` the loop owns and appended at the body end;
//! - do-while loops become `while True` with a trailing exit check, which
//!   is likewise injected before owned `continue`s;
//! - switch statements become a `while True` wrapping an if/elif chain
//!   over identity-aware equality against a cached discriminant;
//! - for-in loops call the enumeration contract;
//! - declared variables are hoisted to a store-to-`JSUndefined` at
//!   function entry.
//!
//! The statement transforms live here; the expression transforms live in
//! the `engine_exprs` helper module.

#[path = "engine_exprs.rs"]
mod engine_exprs;

use jspy_ast::js::{BinaryOp, Node, NodeId, NodeKind, SwitchCase, UpdateOp};
use jspy_ast::py::{PyBinOp, PyExpr, PyModule, PyStmt, PyUnaryOp};
use jspy_common::limits::MAX_AST_DEPTH;
use jspy_common::Span;

use crate::errors::{ErrorKind, TransformError};
use crate::prepass::{Annotations, LoopId};
use crate::runtime::{RequiredSymbols, RuntimeSymbol};
use crate::scopes::ScopeResolver;
use crate::temp::TempAllocator;

/// Result of transforming one compilation unit: the output tree plus the
/// exact set of runtime-contract symbols it references.
#[derive(Debug)]
pub struct TransformOutput {
    pub module: PyModule,
    pub required_symbols: RequiredSymbols,
}

/// One enclosing loop during body transformation. `updates` holds the
/// already-lowered statements to clone in front of every `continue` this
/// loop owns (the for-loop update clause, or the do-while exit check).
struct LoopFrame {
    loop_id: LoopId,
    updates: Vec<PyStmt>,
}

/// Depth-first rewriter for one compilation unit.
///
/// Each instance owns an independent scope resolver, temp allocator, and
/// required-symbol set; nothing is shared across runs.
pub struct Transformer<'a> {
    annotations: &'a Annotations,
    scopes: ScopeResolver,
    temps: TempAllocator,
    symbols: RequiredSymbols,
    loop_frames: Vec<LoopFrame>,
    function_depth: u32,
    visit_depth: u32,
}

impl<'a> Transformer<'a> {
    pub fn new(annotations: &'a Annotations) -> Self {
        Transformer {
            annotations,
            scopes: ScopeResolver::new(),
            temps: TempAllocator::new(),
            symbols: RequiredSymbols::new(),
            loop_frames: Vec::new(),
            function_depth: 0,
            visit_depth: 0,
        }
    }

    /// Transform a unit rooted at a `Program` node.
    pub fn run(mut self, program: &Node) -> Result<TransformOutput, TransformError> {
        let NodeKind::Program(stmts) = &program.kind else {
            return Err(TransformError::unsupported(
                program,
                "engine expects a Program root",
                "wrap the statements in a Program node",
            ));
        };

        // The module root is a function boundary: temps reset, fresh
        // scope, hoist emission before any other statement.
        self.temps.reset();
        self.scopes.enter_scope();
        let mut body = Vec::new();
        self.emit_hoist(program.id, &mut body);
        let result = self.transform_stmts(stmts, &mut body);
        self.scopes.exit_scope();
        result?;

        tracing::debug!(
            statements = body.len(),
            symbols = self.symbols.len(),
            "unit transformed"
        );
        Ok(TransformOutput {
            module: PyModule { body },
            required_symbols: self.symbols,
        })
    }

    // =========================================================================
    // Hoisting
    // =========================================================================

    /// Emit one store-to-`JSUndefined` per hoisted name of a function root
    /// and declare the names in the current scope.
    fn emit_hoist(&mut self, root: NodeId, out: &mut Vec<PyStmt>) {
        for name in self.annotations.hoisted_names(root).to_vec() {
            let resolved = self.scopes.declare(&name);
            let sentinel = self.undefined_expr();
            out.push(PyStmt::Assign {
                target: PyExpr::Name(resolved),
                value: sentinel,
            });
        }
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn transform_stmts(
        &mut self,
        stmts: &[Node],
        out: &mut Vec<PyStmt>,
    ) -> Result<(), TransformError> {
        for stmt in stmts {
            self.transform_stmt(stmt, out)?;
        }
        Ok(())
    }

    /// Transform one statement suite, guaranteeing a non-empty result
    /// (Python requires at least `pass`).
    fn transform_suite(&mut self, stmt: &Node) -> Result<Vec<PyStmt>, TransformError> {
        let mut out = Vec::new();
        self.transform_stmt(stmt, &mut out)?;
        if out.is_empty() {
            out.push(PyStmt::Pass);
        }
        Ok(out)
    }

    fn transform_stmt(&mut self, node: &Node, out: &mut Vec<PyStmt>) -> Result<(), TransformError> {
        if self.visit_depth >= MAX_AST_DEPTH {
            return Err(TransformError::unsupported(
                node,
                "statement nesting exceeds the traversal depth limit",
                "flatten the deeply nested statements",
            ));
        }
        self.visit_depth += 1;
        let result = self.transform_stmt_inner(node, out);
        self.visit_depth -= 1;
        result
    }

    fn transform_stmt_inner(
        &mut self,
        node: &Node,
        out: &mut Vec<PyStmt>,
    ) -> Result<(), TransformError> {
        match &node.kind {
            NodeKind::VarStmt(decls) => {
                // Names were declared during hoist emission; initializers
                // become plain stores in statement order, bare declarators
                // emit nothing in place.
                for decl in decls {
                    if let Some(init) = &decl.init {
                        let value = self.transform_expr(init)?;
                        let resolved = self.scopes.lookup(&decl.name);
                        out.push(PyStmt::Assign {
                            target: PyExpr::Name(resolved),
                            value,
                        });
                    }
                }
            }
            NodeKind::ExprStmt(expr) => self.lower_expr_statement(expr, out)?,
            NodeKind::Block(stmts) => {
                // The subset has no block scoping; blocks flatten into the
                // enclosing suite.
                self.transform_stmts(stmts, out)?;
            }
            NodeKind::If {
                test,
                consequent,
                alternate,
            } => {
                let test = self.transform_expr(test)?;
                let condition = self.truthy(test);
                let body = self.transform_suite(consequent)?;
                let orelse = match alternate {
                    Some(alternate) => self.transform_suite(alternate)?,
                    None => Vec::new(),
                };
                out.push(PyStmt::If {
                    condition,
                    body,
                    orelse,
                });
            }
            NodeKind::While { test, body } => {
                let test = self.transform_expr(test)?;
                let condition = self.truthy(test);
                let body = self.transform_loop_body(node, body, Vec::new())?;
                out.push(PyStmt::While { condition, body });
            }
            NodeKind::DoWhile { body, test } => {
                // `do body while (test)` runs the body at least once, so it
                // lowers to `while True` with a trailing exit check. The
                // exit check doubles as the injected statement in front of
                // every continue this loop owns, so a continue re-tests
                // instead of looping forever.
                let test = self.transform_expr(test)?;
                let truthy = self.truthy(test);
                let exit_check = PyStmt::If {
                    condition: PyExpr::UnaryOp {
                        op: PyUnaryOp::Not,
                        operand: Box::new(truthy),
                    },
                    body: vec![PyStmt::Break],
                    orelse: Vec::new(),
                };
                let mut body = self.transform_loop_body(node, body, vec![exit_check.clone()])?;
                body.push(exit_check);
                out.push(PyStmt::While {
                    condition: PyExpr::Bool(true),
                    body,
                });
            }
            NodeKind::For {
                init,
                test,
                update,
                body,
            } => {
                // Init runs once, before the loop; comma sequences split
                // into ordered statements.
                if let Some(init) = init {
                    match &init.kind {
                        NodeKind::VarStmt(_) => self.transform_stmt(init, out)?,
                        _ => self.lower_expr_statement(init, out)?,
                    }
                }
                let condition = match test {
                    Some(test) => {
                        let test = self.transform_expr(test)?;
                        self.truthy(test)
                    }
                    None => PyExpr::Bool(true),
                };
                let updates = match update {
                    Some(update) => {
                        let mut updates = Vec::new();
                        self.lower_expr_statement(update, &mut updates)?;
                        updates
                    }
                    None => Vec::new(),
                };
                let mut body = self.transform_loop_body(node, body, updates.clone())?;
                // Natural fall-through reaches the update too.
                body.extend(updates);
                out.push(PyStmt::While { condition, body });
            }
            NodeKind::ForIn {
                declares,
                name,
                object,
                body,
            } => {
                if !*declares && !self.scopes.is_declared(name) {
                    return Err(TransformError::new(
                        ErrorKind::UnresolvedBinding,
                        node,
                        format!("for-in target '{name}' is not declared"),
                        "declare the loop variable with var",
                    ));
                }
                let object = self.transform_expr(object)?;
                let iter = self.helper_call(RuntimeSymbol::ForInKeys, vec![object]);
                let target = self.scopes.lookup(name);
                let body = self.transform_loop_body(node, body, Vec::new())?;
                out.push(PyStmt::For { target, iter, body });
            }
            NodeKind::Switch {
                discriminant,
                cases,
            } => self.transform_switch(node, discriminant, cases, out)?,
            NodeKind::Break => out.push(PyStmt::Break),
            NodeKind::Continue => {
                // Clone the owning loop's injected statements (for-update
                // or do-while exit check) in front of the continue.
                if let Some(owner) = self.annotations.continue_owner(node.id) {
                    if let Some(frame) =
                        self.loop_frames.iter().rev().find(|f| f.loop_id == owner)
                    {
                        out.extend(frame.updates.iter().cloned());
                    }
                }
                out.push(PyStmt::Continue);
            }
            NodeKind::Return(value) => {
                if self.function_depth == 0 {
                    return Err(TransformError::unsupported(
                        node,
                        "return outside a function",
                        "move the return into a function body",
                    ));
                }
                let value = match value {
                    Some(value) => self.transform_expr(value)?,
                    // Bare exit yields the unset sentinel, not None.
                    None => self.undefined_expr(),
                };
                out.push(PyStmt::Return(value));
            }
            NodeKind::FunctionDecl { name, params, body } => {
                self.transform_function(node, name, params, body, out)?;
            }
            NodeKind::Throw(value) => {
                let value = self.transform_expr(value)?;
                let exception = self.symbols.record(RuntimeSymbol::Exception);
                out.push(PyStmt::Raise(PyExpr::Call {
                    callee: Box::new(PyExpr::Name(exception.to_string())),
                    args: vec![value],
                }));
            }
            NodeKind::Try {
                block,
                handler,
                finalizer,
            } => {
                let mut body = Vec::new();
                self.transform_stmts(block, &mut body)?;
                if body.is_empty() {
                    body.push(PyStmt::Pass);
                }
                let handler = match handler {
                    Some(clause) => {
                        let exception = self.symbols.record(RuntimeSymbol::Exception);
                        let binding = self.temps.next();
                        // The catch binding is scoped to the handler: it
                        // shadows an outer declaration of the same name
                        // inside the clause and stops resolving after it.
                        self.scopes.enter_scope();
                        let param = self.scopes.declare(&clause.param);
                        // The handler sees the thrown value, not the wrapper.
                        let mut handler_body = vec![PyStmt::Assign {
                            target: PyExpr::Name(param),
                            value: PyExpr::Attribute {
                                object: Box::new(PyExpr::Name(binding.clone())),
                                name: "value".to_string(),
                            },
                        }];
                        let result = self.transform_stmts(&clause.body, &mut handler_body);
                        self.scopes.exit_scope();
                        result?;
                        Some(jspy_ast::py::PyExceptHandler {
                            class_name: exception.to_string(),
                            binding,
                            body: handler_body,
                        })
                    }
                    None => None,
                };
                let finalizer = match finalizer {
                    Some(stmts) => {
                        let mut fin = Vec::new();
                        self.transform_stmts(stmts, &mut fin)?;
                        if fin.is_empty() {
                            fin.push(PyStmt::Pass);
                        }
                        fin
                    }
                    None => Vec::new(),
                };
                if handler.is_none() && finalizer.is_empty() {
                    return Err(TransformError::unsupported(
                        node,
                        "try without catch or finally",
                        "add a catch or finally clause",
                    ));
                }
                out.push(PyStmt::Try {
                    body,
                    handler,
                    finalizer,
                });
            }
            NodeKind::Empty => {}
            NodeKind::Program(_) => {
                return Err(TransformError::unsupported(
                    node,
                    "nested Program node",
                    "a unit has exactly one Program root",
                ));
            }
            // An expression kind in statement position means the parser
            // violated its contract.
            _ => {
                return Err(TransformError::unsupported(
                    node,
                    "expression node in statement position",
                    "wrap the expression in an ExpressionStatement",
                ));
            }
        }
        Ok(())
    }

    /// Transform a loop body under a new loop frame.
    fn transform_loop_body(
        &mut self,
        loop_node: &Node,
        body: &Node,
        updates: Vec<PyStmt>,
    ) -> Result<Vec<PyStmt>, TransformError> {
        let loop_id = self.annotations.loop_id(loop_node.id).ok_or_else(|| {
            TransformError::unsupported(
                loop_node,
                "loop was not annotated by the pre-pass",
                "run the pre-pass on the same tree",
            )
        })?;
        self.loop_frames.push(LoopFrame { loop_id, updates });
        let result = self.transform_suite(body);
        self.loop_frames.pop();
        result
    }

    /// Transform a function declaration: fresh temps, fresh scope, params,
    /// hoist emission, then the body.
    fn transform_function(
        &mut self,
        node: &Node,
        name: &str,
        params: &[String],
        body: &[Node],
        out: &mut Vec<PyStmt>,
    ) -> Result<(), TransformError> {
        let resolved_name = self.scopes.declare(name);

        let saved_temps = self.temps.save();
        self.temps.reset();
        self.scopes.enter_scope();
        self.function_depth += 1;

        let mut resolved_params = Vec::with_capacity(params.len());
        for param in params {
            resolved_params.push(self.scopes.declare(param));
        }
        let mut py_body = Vec::new();
        self.emit_hoist(node.id, &mut py_body);
        let result = self.transform_stmts(body, &mut py_body);

        // Strict unwind, error path included.
        self.function_depth -= 1;
        self.scopes.exit_scope();
        self.temps.restore(saved_temps);
        result?;

        if py_body.is_empty() {
            py_body.push(PyStmt::Pass);
        }
        out.push(PyStmt::FunctionDef {
            name: resolved_name,
            params: resolved_params,
            body: py_body,
        });
        Ok(())
    }

    // =========================================================================
    // Expression-statement lowering
    // =========================================================================

    /// Lower an expression in statement position. Assignments, compound
    /// assignments, and updates get statement-level rewrites (the only
    /// position where multi-statement expansion is legal); comma sequences
    /// split into ordered statements; everything else becomes an
    /// expression statement.
    fn lower_expr_statement(
        &mut self,
        expr: &Node,
        out: &mut Vec<PyStmt>,
    ) -> Result<(), TransformError> {
        match &expr.kind {
            NodeKind::Seq(exprs) => {
                for item in exprs {
                    self.lower_expr_statement(item, out)?;
                }
            }
            NodeKind::Assign { target, value } => self.lower_assign(expr, target, value, out)?,
            NodeKind::CompoundAssign { op, target, value } => {
                self.lower_compound(expr, *op, target, value, out)?;
            }
            NodeKind::Update { op, target, .. } => {
                // Statement position discards the value, so prefix and
                // postfix lower identically.
                let one = one_literal(expr.span);
                let binary_op = match op {
                    UpdateOp::Inc => BinaryOp::Add,
                    UpdateOp::Dec => BinaryOp::Sub,
                };
                self.lower_compound(expr, binary_op, target, &one, out)?;
            }
            NodeKind::Call { callee, args } => {
                // `arr.push(v)` is only meaningful as a statement; in value
                // position it is rejected by the expression transform.
                if let Some(stmt) = self.try_lower_push(callee, args)? {
                    out.push(stmt);
                } else {
                    let call = self.transform_expr(expr)?;
                    out.push(PyStmt::Expr(call));
                }
            }
            _ => {
                let value = self.transform_expr(expr)?;
                out.push(PyStmt::Expr(value));
            }
        }
        Ok(())
    }

    /// `target = value` in statement position.
    fn lower_assign(
        &mut self,
        node: &Node,
        target: &Node,
        value: &Node,
        out: &mut Vec<PyStmt>,
    ) -> Result<(), TransformError> {
        match &target.kind {
            NodeKind::Ident(name) => {
                let resolved = self.resolve_assign_target(node, name)?;
                let value = self.transform_expr(value)?;
                out.push(PyStmt::Assign {
                    target: PyExpr::Name(resolved),
                    value,
                });
            }
            NodeKind::Member { object, property } => {
                let (object, index) = self.member_write_parts(target, object, property)?;
                let value = self.transform_expr(value)?;
                out.push(PyStmt::Assign {
                    target: PyExpr::Subscript {
                        object: Box::new(object),
                        index: Box::new(index),
                    },
                    value,
                });
            }
            _ => {
                return Err(TransformError::unsupported(
                    node,
                    "assignment target must be an identifier or member access",
                    "assign to a variable or to base[key]",
                ));
            }
        }
        Ok(())
    }

    /// `target op= value` / `target++` in statement position. Member
    /// targets bind base and key to fresh temps before any read or write,
    /// so each original sub-expression is evaluated exactly once.
    fn lower_compound(
        &mut self,
        node: &Node,
        op: BinaryOp,
        target: &Node,
        value: &Node,
        out: &mut Vec<PyStmt>,
    ) -> Result<(), TransformError> {
        if !op.is_arithmetic() {
            return Err(TransformError::unsupported(
                node,
                "compound assignment supports arithmetic operators only",
                "expand to target = target op value",
            ));
        }
        let symbol = arith_symbol(op);
        match &target.kind {
            NodeKind::Ident(name) => {
                let resolved = self.resolve_assign_target(node, name)?;
                let value = self.transform_expr(value)?;
                let combined =
                    self.helper_call(symbol, vec![PyExpr::Name(resolved.clone()), value]);
                out.push(PyStmt::Assign {
                    target: PyExpr::Name(resolved),
                    value: combined,
                });
            }
            NodeKind::Member { object, property } => {
                let (object, index) = self.member_write_parts(target, object, property)?;
                let base_tmp = self.temps.next();
                let key_tmp = self.temps.next();
                out.push(PyStmt::Assign {
                    target: PyExpr::Name(base_tmp.clone()),
                    value: object,
                });
                out.push(PyStmt::Assign {
                    target: PyExpr::Name(key_tmp.clone()),
                    value: index,
                });
                let slot = PyExpr::Subscript {
                    object: Box::new(PyExpr::Name(base_tmp)),
                    index: Box::new(PyExpr::Name(key_tmp)),
                };
                let value = self.transform_expr(value)?;
                let combined = self.helper_call(symbol, vec![slot.clone(), value]);
                out.push(PyStmt::Assign {
                    target: slot,
                    value: combined,
                });
            }
            _ => {
                return Err(TransformError::unsupported(
                    node,
                    "compound assignment target must be an identifier or member access",
                    "assign to a variable or to base[key]",
                ));
            }
        }
        Ok(())
    }

    // =========================================================================
    // Switch lowering
    // =========================================================================

    fn transform_switch(
        &mut self,
        node: &Node,
        discriminant: &Node,
        cases: &[SwitchCase],
        out: &mut Vec<PyStmt>,
    ) -> Result<(), TransformError> {
        // Fall-through pre-check: a non-empty case without a terminator
        // immediately followed by another non-empty case cannot be lowered
        // to an if/elif chain without changing behavior.
        for (i, case) in cases.iter().enumerate() {
            if case.body.is_empty() || input_ends_with_terminator(&case.body) {
                continue;
            }
            if let Some(next) = cases.get(i + 1) {
                if !next.body.is_empty() {
                    return Err(TransformError {
                        kind: ErrorKind::AmbiguousFallThrough,
                        node_kind: node.kind_name(),
                        span: case.span,
                        message: "case body falls through into the next non-empty case"
                            .to_string(),
                        suggestion: "end the case with break, return, or throw".to_string(),
                    });
                }
            }
        }
        // A default clause anywhere but last would change match order in
        // an if/elif chain.
        if let Some(pos) = cases.iter().position(|c| c.test.is_none()) {
            if pos + 1 != cases.len() {
                return Err(TransformError::unsupported(
                    node,
                    "default clause must be the final case",
                    "move the default clause to the end of the switch",
                ));
            }
        }

        // The dispatch value is evaluated exactly once.
        let tmp = self.temps.next();
        let disc = self.transform_expr(discriminant)?;
        out.push(PyStmt::Assign {
            target: PyExpr::Name(tmp.clone()),
            value: disc,
        });

        struct Arm {
            condition: PyExpr,
            body: Vec<PyStmt>,
        }
        let mut arms: Vec<Arm> = Vec::new();
        let mut default_body: Option<Vec<PyStmt>> = None;
        // Tests of empty alias cases awaiting the next non-empty case.
        // Kept untransformed until an arm actually emits them, so aliases
        // that fold into the default's else branch neither evaluate their
        // tests nor record the equality helper.
        let mut pending: Vec<&Node> = Vec::new();

        for case in cases {
            match &case.test {
                Some(test) => {
                    if case.body.is_empty() {
                        pending.push(test);
                    } else {
                        let mut parts = Vec::with_capacity(pending.len() + 1);
                        for alias in pending.drain(..) {
                            parts.push(self.dispatch_test(&tmp, alias)?);
                        }
                        parts.push(self.dispatch_test(&tmp, test)?);
                        let mut body = Vec::new();
                        self.transform_stmts(&case.body, &mut body)?;
                        synthesize_terminator(&mut body);
                        arms.push(Arm {
                            condition: fold_or(parts),
                            body,
                        });
                    }
                }
                None => {
                    // Empty aliases directly before the default fall into
                    // it either way; the else branch already covers them.
                    pending.clear();
                    let mut body = Vec::new();
                    self.transform_stmts(&case.body, &mut body)?;
                    synthesize_terminator(&mut body);
                    default_body = Some(body);
                }
            }
        }
        // Trailing empty cases with no following non-empty case match and
        // immediately exit.
        if !pending.is_empty() {
            let mut parts = Vec::with_capacity(pending.len());
            for alias in pending.drain(..) {
                parts.push(self.dispatch_test(&tmp, alias)?);
            }
            arms.push(Arm {
                condition: fold_or(parts),
                body: vec![PyStmt::Break],
            });
        }

        // Build the if/elif/else chain inside out.
        let mut chain: Vec<PyStmt> = default_body.unwrap_or_default();
        for arm in arms.into_iter().rev() {
            chain = vec![PyStmt::If {
                condition: arm.condition,
                body: arm.body,
                orelse: chain,
            }];
        }

        // Always-true loop so `break` inside a taken branch exits the
        // dispatch; the trailing break is the safety exit for a chain
        // where nothing matched.
        let mut body = chain;
        body.push(PyStmt::Break);
        out.push(PyStmt::While {
            condition: PyExpr::Bool(true),
            body,
        });
        Ok(())
    }

    /// One dispatch-arm comparison: `js_strict_eq(<cached discriminant>,
    /// <case test>)`, recording the helper at emission time.
    fn dispatch_test(&mut self, tmp: &str, test: &Node) -> Result<PyExpr, TransformError> {
        let test = self.transform_expr(test)?;
        let eq = self.symbols.record(RuntimeSymbol::StrictEq);
        Ok(PyExpr::Call {
            callee: Box::new(PyExpr::Name(eq.to_string())),
            args: vec![PyExpr::Name(tmp.to_string()), test],
        })
    }
}

/// Synthesized `1` literal for update-expression lowering.
fn one_literal(span: Span) -> Node {
    Node {
        // Synthetic node; no side-table entry will ever be keyed by it.
        id: jspy_ast::js::NodeId(u32::MAX),
        span,
        kind: NodeKind::Number("1".to_string()),
    }
}

fn arith_symbol(op: BinaryOp) -> RuntimeSymbol {
    match op {
        BinaryOp::Add => RuntimeSymbol::Add,
        BinaryOp::Sub => RuntimeSymbol::Sub,
        BinaryOp::Mul => RuntimeSymbol::Mul,
        BinaryOp::Div => RuntimeSymbol::Div,
        BinaryOp::Mod => RuntimeSymbol::Mod,
        _ => unreachable!("arith_symbol called with a non-arithmetic operator"),
    }
}

/// Does a case body end with an explicit terminator in the input?
fn input_ends_with_terminator(body: &[Node]) -> bool {
    body.last().is_some_and(input_stmt_terminates)
}

/// Does this statement unconditionally leave the enclosing dispatch?
/// Blocks flatten during lowering, so a terminator sitting at the end of a
/// trailing block counts; an if/else terminates when both branches do.
fn input_stmt_terminates(stmt: &Node) -> bool {
    match &stmt.kind {
        NodeKind::Break | NodeKind::Return(_) | NodeKind::Throw(_) => true,
        NodeKind::Block(body) => body.last().is_some_and(input_stmt_terminates),
        NodeKind::If {
            consequent,
            alternate,
            ..
        } => match alternate {
            Some(alternate) => {
                input_stmt_terminates(consequent) && input_stmt_terminates(alternate)
            }
            None => false,
        },
        _ => false,
    }
}

/// Append a `break` to a lowered branch that does not already leave the
/// dispatch loop.
fn synthesize_terminator(body: &mut Vec<PyStmt>) {
    if !body.last().is_some_and(PyStmt::is_terminator) {
        body.push(PyStmt::Break);
    }
}

/// Left-fold dispatch comparisons into one `or`-disjunction, in source
/// order. Callers never pass an empty list.
fn fold_or(parts: Vec<PyExpr>) -> PyExpr {
    let mut iter = parts.into_iter();
    let Some(first) = iter.next() else {
        return PyExpr::Bool(false);
    };
    iter.fold(first, |acc, next| PyExpr::BinOp {
        op: PyBinOp::Or,
        left: Box::new(acc),
        right: Box::new(next),
    })
}
