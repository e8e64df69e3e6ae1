//! Expression rewrites for the transformation engine.
//!
//! Split out of `engine.rs` the same way the statement/expression halves
//! of the emitter are split: this file holds the `impl Transformer` block
//! for expression-position lowering — short-circuit desugaring,
//! assignment-as-value, member-access normalization, identifier
//! resolution, and the fixed stdlib-alias tables.

use jspy_ast::js::{BinaryOp, LogicalOp, MemberProp, Node, NodeKind, UnaryOp};
use jspy_ast::py::{PyBinOp, PyExpr, PyUnaryOp};
use jspy_common::limits::MAX_AST_DEPTH;

use crate::errors::{ErrorKind, TransformError};
use crate::runtime::RuntimeSymbol;

use super::Transformer;

impl Transformer<'_> {
    pub(super) fn transform_expr(&mut self, node: &Node) -> Result<PyExpr, TransformError> {
        if self.visit_depth >= MAX_AST_DEPTH {
            return Err(TransformError::unsupported(
                node,
                "expression nesting exceeds the traversal depth limit",
                "split the expression into simpler statements",
            ));
        }
        self.visit_depth += 1;
        let result = self.transform_expr_inner(node);
        self.visit_depth -= 1;
        result
    }

    fn transform_expr_inner(&mut self, node: &Node) -> Result<PyExpr, TransformError> {
        match &node.kind {
            NodeKind::Number(text) => Ok(PyExpr::Num(text.clone())),
            NodeKind::Str(value) => Ok(PyExpr::Str(value.clone())),
            NodeKind::Bool(value) => Ok(PyExpr::Bool(*value)),
            NodeKind::Null => Ok(PyExpr::None),
            NodeKind::Regex { pattern, flags } => {
                let helper = self.symbols.record(RuntimeSymbol::CompileRegex);
                Ok(PyExpr::Call {
                    callee: Box::new(PyExpr::Name(helper.to_string())),
                    args: vec![PyExpr::Str(pattern.clone()), PyExpr::Str(flags.clone())],
                })
            }
            NodeKind::Ident(name) => self.resolve_ident_expr(node, name),
            NodeKind::Unary { op, operand } => self.transform_unary(node, *op, operand),
            NodeKind::Binary { op, left, right } => {
                let left = self.transform_expr(left)?;
                let right = self.transform_expr(right)?;
                Ok(self.lower_binary(*op, left, right))
            }
            NodeKind::Logical { op, left, right } => {
                // Bind the left operand once so short-circuiting yields the
                // original value, not a coerced boolean. Every boundary in
                // a chain gets its own temp.
                let tmp = self.temps.next();
                let left = self.transform_expr(left)?;
                let right = self.transform_expr(right)?;
                let bound = PyExpr::Named {
                    target: tmp.clone(),
                    value: Box::new(left),
                };
                let condition = self.truthy(bound);
                let (when_true, when_false) = match op {
                    LogicalOp::And => (right, PyExpr::Name(tmp)),
                    LogicalOp::Or => (PyExpr::Name(tmp), right),
                };
                Ok(PyExpr::Conditional {
                    condition: Box::new(condition),
                    when_true: Box::new(when_true),
                    when_false: Box::new(when_false),
                })
            }
            NodeKind::Conditional {
                test,
                consequent,
                alternate,
            } => {
                let test = self.transform_expr(test)?;
                let condition = self.truthy(test);
                let when_true = self.transform_expr(consequent)?;
                let when_false = self.transform_expr(alternate)?;
                Ok(PyExpr::Conditional {
                    condition: Box::new(condition),
                    when_true: Box::new(when_true),
                    when_false: Box::new(when_false),
                })
            }
            NodeKind::Assign { target, value } => {
                // Assignment nested in an expression: evaluate the
                // right-hand side once, store it, yield the stored value.
                // Python's binding expression only binds names.
                match &target.kind {
                    NodeKind::Ident(name) => {
                        let resolved = self.resolve_assign_target(node, name)?;
                        let value = self.transform_expr(value)?;
                        Ok(PyExpr::Named {
                            target: resolved,
                            value: Box::new(value),
                        })
                    }
                    _ => Err(TransformError::unsupported(
                        node,
                        "member assignment cannot be used as a value",
                        "assign in a separate statement first",
                    )),
                }
            }
            NodeKind::CompoundAssign { .. } => Err(TransformError::unsupported(
                node,
                "compound assignment cannot be used as a value",
                "assign in a separate statement first",
            )),
            NodeKind::Update { .. } => Err(TransformError::unsupported(
                node,
                "increment/decrement cannot be used as a value",
                "update in a separate statement first",
            )),
            NodeKind::Call { callee, args } => self.transform_call(node, callee, args),
            NodeKind::Member { object, property } => {
                self.transform_member_read(object, property)
            }
            NodeKind::Array(elements) => {
                let mut items = Vec::with_capacity(elements.len());
                for element in elements {
                    items.push(self.transform_expr(element)?);
                }
                Ok(PyExpr::List(items))
            }
            NodeKind::Object(props) => {
                // Keys are literal text; they never pass through the scope
                // resolver because reads are always indexed.
                let mut entries = Vec::with_capacity(props.len());
                for (key, value) in props {
                    let value = self.transform_expr(value)?;
                    entries.push((key.text().to_string(), value));
                }
                Ok(PyExpr::Dict(entries))
            }
            NodeKind::Seq(_) => Err(TransformError::new(
                ErrorKind::AmbiguousEvaluationContext,
                node,
                "comma sequence outside a for clause or statement position",
                "split the sequence into separate statements",
            )),
            // Statement kinds never appear in expression position.
            _ => Err(TransformError::unsupported(
                node,
                "statement node in expression position",
                "the parser must only place expressions here",
            )),
        }
    }

    // =========================================================================
    // Identifiers
    // =========================================================================

    /// Resolve an identifier reference. Undeclared names are an error,
    /// except the fixed global aliases.
    fn resolve_ident_expr(&mut self, node: &Node, name: &str) -> Result<PyExpr, TransformError> {
        if self.scopes.is_declared(name) {
            return Ok(PyExpr::Name(self.scopes.lookup(name)));
        }
        match name {
            "undefined" => Ok(self.undefined_expr()),
            "NaN" => Ok(float_call("nan")),
            "Infinity" => Ok(float_call("inf")),
            _ => Err(TransformError::new(
                ErrorKind::UnresolvedBinding,
                node,
                format!("'{name}' is not declared"),
                "declare it with var before use",
            )),
        }
    }

    /// Identifier target of an assignment; must resolve.
    pub(super) fn resolve_assign_target(
        &mut self,
        node: &Node,
        name: &str,
    ) -> Result<String, TransformError> {
        if !self.scopes.is_declared(name) {
            return Err(TransformError::new(
                ErrorKind::UnresolvedBinding,
                node,
                format!("assignment to undeclared name '{name}'"),
                "declare it with var first",
            ));
        }
        Ok(self.scopes.lookup(name))
    }

    // =========================================================================
    // Unary operators
    // =========================================================================

    fn transform_unary(
        &mut self,
        node: &Node,
        op: UnaryOp,
        operand: &Node,
    ) -> Result<PyExpr, TransformError> {
        match op {
            UnaryOp::Not => {
                let operand = self.transform_expr(operand)?;
                let truthy = self.truthy(operand);
                Ok(PyExpr::UnaryOp {
                    op: PyUnaryOp::Not,
                    operand: Box::new(truthy),
                })
            }
            UnaryOp::Neg => {
                let operand = self.transform_expr(operand)?;
                let number = self.helper_call(RuntimeSymbol::ToNumber, vec![operand]);
                Ok(PyExpr::UnaryOp {
                    op: PyUnaryOp::Neg,
                    operand: Box::new(number),
                })
            }
            UnaryOp::Plus => {
                let operand = self.transform_expr(operand)?;
                Ok(self.helper_call(RuntimeSymbol::ToNumber, vec![operand]))
            }
            UnaryOp::TypeOf => {
                // Type introspection is exempt from resolution: an
                // undeclared operand reports 'undefined' instead of
                // failing the unit.
                if let NodeKind::Ident(name) = &operand.kind {
                    if !self.scopes.is_declared(name)
                        && !matches!(name.as_str(), "undefined" | "NaN" | "Infinity")
                    {
                        let sentinel = self.undefined_expr();
                        return Ok(self.helper_call(RuntimeSymbol::TypeOf, vec![sentinel]));
                    }
                }
                let operand = self.transform_expr(operand)?;
                Ok(self.helper_call(RuntimeSymbol::TypeOf, vec![operand]))
            }
            UnaryOp::Delete => match &operand.kind {
                NodeKind::Member { object, property } => {
                    let object = self.transform_expr(object)?;
                    let key = match property {
                        MemberProp::Name(name) => PyExpr::Str(name.clone()),
                        MemberProp::Computed(expr) => self.transform_expr(expr)?,
                    };
                    // The runtime never shifts a sequence: it overwrites
                    // with the missing sentinel to preserve holes.
                    Ok(self.helper_call(RuntimeSymbol::Delete, vec![object, key]))
                }
                _ => Err(TransformError::unsupported(
                    node,
                    "delete applies to member access only",
                    "use delete base[key] or delete base.key",
                )),
            },
        }
    }

    // =========================================================================
    // Binary operators
    // =========================================================================

    fn lower_binary(&mut self, op: BinaryOp, left: PyExpr, right: PyExpr) -> PyExpr {
        let symbol = match op {
            BinaryOp::Add => RuntimeSymbol::Add,
            BinaryOp::Sub => RuntimeSymbol::Sub,
            BinaryOp::Mul => RuntimeSymbol::Mul,
            BinaryOp::Div => RuntimeSymbol::Div,
            BinaryOp::Mod => RuntimeSymbol::Mod,
            BinaryOp::StrictEq => RuntimeSymbol::StrictEq,
            BinaryOp::StrictNeq => RuntimeSymbol::StrictNeq,
            BinaryOp::LooseEq => RuntimeSymbol::LooseEq,
            BinaryOp::LooseNeq => RuntimeSymbol::LooseNeq,
            // Relational comparison maps directly; the runtime contract
            // has no relational helper.
            BinaryOp::Lt | BinaryOp::LtEq | BinaryOp::Gt | BinaryOp::GtEq => {
                let py_op = match op {
                    BinaryOp::Lt => PyBinOp::Lt,
                    BinaryOp::LtEq => PyBinOp::LtEq,
                    BinaryOp::Gt => PyBinOp::Gt,
                    _ => PyBinOp::GtEq,
                };
                return PyExpr::BinOp {
                    op: py_op,
                    left: Box::new(left),
                    right: Box::new(right),
                };
            }
        };
        self.helper_call(symbol, vec![left, right])
    }

    // =========================================================================
    // Member access
    // =========================================================================

    /// Normalize a member read to a subscript, except the length
    /// pseudo-property, which becomes a size query.
    fn transform_member_read(
        &mut self,
        object: &Node,
        property: &MemberProp,
    ) -> Result<PyExpr, TransformError> {
        let object = self.transform_expr(object)?;
        match property {
            MemberProp::Name(name) if name == "length" => Ok(PyExpr::Call {
                callee: Box::new(PyExpr::Name("len".to_string())),
                args: vec![object],
            }),
            MemberProp::Name(name) => Ok(PyExpr::Subscript {
                object: Box::new(object),
                index: Box::new(PyExpr::Str(name.clone())),
            }),
            MemberProp::Computed(expr) => {
                let index = self.transform_expr(expr)?;
                Ok(PyExpr::Subscript {
                    object: Box::new(object),
                    index: Box::new(index),
                })
            }
        }
    }

    /// Object and key of a member write target.
    pub(super) fn member_write_parts(
        &mut self,
        target: &Node,
        object: &Node,
        property: &MemberProp,
    ) -> Result<(PyExpr, PyExpr), TransformError> {
        if matches!(property, MemberProp::Name(name) if name == "length") {
            return Err(TransformError::unsupported(
                target,
                "assignment to the length pseudo-property",
                "resize the array explicitly instead",
            ));
        }
        let object = self.transform_expr(object)?;
        let index = match property {
            MemberProp::Name(name) => PyExpr::Str(name.clone()),
            MemberProp::Computed(expr) => self.transform_expr(expr)?,
        };
        Ok((object, index))
    }

    // =========================================================================
    // Calls and stdlib aliases
    // =========================================================================

    fn transform_call(
        &mut self,
        node: &Node,
        callee: &Node,
        args: &[Node],
    ) -> Result<PyExpr, TransformError> {
        if let NodeKind::Member { object, property } = &callee.kind {
            if let MemberProp::Name(method) = property {
                // Global namespace aliases apply only while the base name
                // is not shadowed by a user declaration.
                if let NodeKind::Ident(base) = &object.kind {
                    if !self.scopes.is_declared(base) {
                        if let Some(expr) =
                            self.try_lower_global_alias(node, base, method, args)?
                        {
                            return Ok(expr);
                        }
                    }
                }
                if let Some(expr) = self.try_lower_method_alias(node, object, method, args)? {
                    return Ok(expr);
                }
                if method == "push" {
                    return Err(TransformError::unsupported(
                        node,
                        "push result cannot be used as a value",
                        "call push as its own statement",
                    ));
                }
            }
        }
        let callee = self.transform_expr(callee)?;
        let mut py_args = Vec::with_capacity(args.len());
        for arg in args {
            py_args.push(self.transform_expr(arg)?);
        }
        Ok(PyExpr::Call {
            callee: Box::new(callee),
            args: py_args,
        })
    }

    /// `console.log(...)`, `Math.round(x)`, `Date.now()`.
    fn try_lower_global_alias(
        &mut self,
        node: &Node,
        base: &str,
        method: &str,
        args: &[Node],
    ) -> Result<Option<PyExpr>, TransformError> {
        let symbol = match (base, method) {
            ("console", "log") => RuntimeSymbol::ConsoleLog,
            ("Math", "round") => RuntimeSymbol::Round,
            ("Date", "now") => RuntimeSymbol::DateNow,
            ("console" | "Math" | "Date", _) => {
                return Err(TransformError::unsupported(
                    node,
                    format!("no runtime alias for {base}.{method}"),
                    "supported: console.log, Math.round, Date.now",
                ));
            }
            _ => return Ok(None),
        };
        let expected = match symbol {
            RuntimeSymbol::Round => Some(1),
            RuntimeSymbol::DateNow => Some(0),
            _ => None,
        };
        if let Some(expected) = expected {
            if args.len() != expected {
                return Err(TransformError::unsupported(
                    node,
                    format!("{base}.{method} takes {expected} argument(s), got {}", args.len()),
                    "adjust the argument count",
                ));
            }
        }
        let mut py_args = Vec::with_capacity(args.len());
        for arg in args {
            py_args.push(self.transform_expr(arg)?);
        }
        Ok(Some(self.helper_call(symbol, py_args)))
    }

    /// Method aliases with runtime counterparts: `charCodeAt`, `substring`,
    /// `pop`. The receiver becomes the helper's first argument.
    fn try_lower_method_alias(
        &mut self,
        node: &Node,
        object: &Node,
        method: &str,
        args: &[Node],
    ) -> Result<Option<PyExpr>, TransformError> {
        let (symbol, min_args, max_args) = match method {
            "charCodeAt" => (RuntimeSymbol::CharCodeAt, 1, 1),
            "substring" => (RuntimeSymbol::Substring, 1, 2),
            "pop" => (RuntimeSymbol::ArrayPop, 0, 0),
            _ => return Ok(None),
        };
        if args.len() < min_args || args.len() > max_args {
            return Err(TransformError::unsupported(
                node,
                format!("{method} takes {min_args}..={max_args} argument(s), got {}", args.len()),
                "adjust the argument count",
            ));
        }
        let receiver = self.transform_expr(object)?;
        let mut py_args = vec![receiver];
        for arg in args {
            py_args.push(self.transform_expr(arg)?);
        }
        Ok(Some(self.helper_call(symbol, py_args)))
    }

    /// `arr.push(v)` in statement position lowers to `arr.append(v)`.
    pub(super) fn try_lower_push(
        &mut self,
        callee: &Node,
        args: &[Node],
    ) -> Result<Option<jspy_ast::py::PyStmt>, TransformError> {
        let NodeKind::Member { object, property } = &callee.kind else {
            return Ok(None);
        };
        let MemberProp::Name(method) = property else {
            return Ok(None);
        };
        if method != "push" {
            return Ok(None);
        }
        if args.len() != 1 {
            return Err(TransformError::unsupported(
                callee,
                format!("push takes 1 argument, got {}", args.len()),
                "push exactly one element per call",
            ));
        }
        let receiver = self.transform_expr(object)?;
        let value = self.transform_expr(&args[0])?;
        Ok(Some(jspy_ast::py::PyStmt::Expr(PyExpr::Call {
            callee: Box::new(PyExpr::Attribute {
                object: Box::new(receiver),
                name: "append".to_string(),
            }),
            args: vec![value],
        })))
    }

    // =========================================================================
    // Runtime helpers
    // =========================================================================

    /// `js_truthy(expr)`, recording the symbol.
    pub(super) fn truthy(&mut self, expr: PyExpr) -> PyExpr {
        self.helper_call(RuntimeSymbol::Truthy, vec![expr])
    }

    /// The unset sentinel, recording the symbol.
    pub(super) fn undefined_expr(&mut self) -> PyExpr {
        let name = self.symbols.record(RuntimeSymbol::Undefined);
        PyExpr::Name(name.to_string())
    }

    /// Call a runtime helper by symbol, recording the use.
    pub(super) fn helper_call(&mut self, symbol: RuntimeSymbol, args: Vec<PyExpr>) -> PyExpr {
        let name = self.symbols.record(symbol);
        PyExpr::Call {
            callee: Box::new(PyExpr::Name(name.to_string())),
            args,
        }
    }
}

fn float_call(value: &str) -> PyExpr {
    PyExpr::Call {
        callee: Box::new(PyExpr::Name("float".to_string())),
        args: vec![PyExpr::Str(value.to_string())],
    }
}
