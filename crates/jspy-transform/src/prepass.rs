//! Structural pre-pass.
//!
//! One read-only, top-down traversal of the statement tree that runs
//! before any rewriting:
//!
//! - assigns a fresh monotonic id to every loop and records which loop
//!   owns each `continue`,
//! - validates `break`/`continue` placement (a `continue` directly inside
//!   a switch body is illegal even when a loop encloses the switch,
//!   because the switch's own lowering is a loop the `continue` must not
//!   escape into),
//! - collects each function's hoistable declaration names (static descent,
//!   stopping at nested function boundaries, parameters excluded).
//!
//! Results are recorded in an [`Annotations`] side table keyed by node id;
//! the input tree is never mutated.

use indexmap::IndexSet;
use rustc_hash::FxHashMap;

use jspy_ast::js::{Node, NodeId, NodeKind};
use jspy_common::limits::MAX_AST_DEPTH;

use crate::errors::{ErrorKind, TransformError};

/// Identifies one loop construct instance for a transformation run. Once
/// assigned, never reassigned.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct LoopId(pub u32);

/// Side table produced by the pre-pass, read-only to the engine.
#[derive(Debug, Default)]
pub struct Annotations {
    /// Loop node -> its own id.
    loop_ids: FxHashMap<NodeId, LoopId>,
    /// Continue node -> id of the loop it exits to.
    continue_owners: FxHashMap<NodeId, LoopId>,
    /// Function-root node -> ordered hoist set (source order, deduplicated,
    /// parameter names excluded).
    hoisted: FxHashMap<NodeId, Vec<String>>,
}

impl Annotations {
    /// Id assigned to a loop node.
    pub fn loop_id(&self, node: NodeId) -> Option<LoopId> {
        self.loop_ids.get(&node).copied()
    }

    /// Owning loop of a continue node.
    pub fn continue_owner(&self, node: NodeId) -> Option<LoopId> {
        self.continue_owners.get(&node).copied()
    }

    /// Hoist set of a function-root node (program root included).
    pub fn hoisted_names(&self, node: NodeId) -> &[String] {
        self.hoisted.get(&node).map_or(&[], |v| v.as_slice())
    }

    pub fn loop_count(&self) -> usize {
        self.loop_ids.len()
    }
}

/// One entry of the combined loop/dispatch nesting stack.
#[derive(Copy, Clone, Debug)]
enum Frame {
    Loop(LoopId),
    Dispatch,
}

/// The pre-pass traversal state. One instance per compilation unit.
pub struct Prepass {
    next_loop_id: u32,
    frames: Vec<Frame>,
    annotations: Annotations,
    depth: u32,
}

impl Prepass {
    pub fn new() -> Self {
        Prepass {
            next_loop_id: 0,
            frames: Vec::new(),
            annotations: Annotations::default(),
            depth: 0,
        }
    }

    /// Analyze one compilation unit rooted at a `Program` node.
    pub fn run(mut self, program: &Node) -> Result<Annotations, TransformError> {
        let NodeKind::Program(body) = &program.kind else {
            return Err(TransformError::unsupported(
                program,
                "pre-pass expects a Program root",
                "wrap the statements in a Program node",
            ));
        };

        self.collect_hoist(program.id, body, &[]);
        for stmt in body {
            self.visit_stmt(stmt)?;
        }

        tracing::debug!(
            loops = self.annotations.loop_ids.len(),
            continues = self.annotations.continue_owners.len(),
            functions = self.annotations.hoisted.len(),
            "pre-pass complete"
        );
        Ok(self.annotations)
    }

    fn fresh_loop_id(&mut self) -> LoopId {
        let id = LoopId(self.next_loop_id);
        self.next_loop_id += 1;
        id
    }

    fn visit_stmt(&mut self, node: &Node) -> Result<(), TransformError> {
        if self.depth >= MAX_AST_DEPTH {
            return Err(TransformError::unsupported(
                node,
                "statement nesting exceeds the traversal depth limit",
                "flatten the deeply nested statements",
            ));
        }
        self.depth += 1;
        let result = self.visit_stmt_inner(node);
        self.depth -= 1;
        result
    }

    fn visit_stmt_inner(&mut self, node: &Node) -> Result<(), TransformError> {
        match &node.kind {
            NodeKind::While { body, .. } | NodeKind::DoWhile { body, .. } => {
                self.visit_loop_body(node.id, body)?;
            }
            NodeKind::For { body, .. } => {
                // Init/test/update clauses are expressions (or a var
                // statement) and cannot contain jumps; only the body runs
                // under the loop frame.
                self.visit_loop_body(node.id, body)?;
            }
            NodeKind::ForIn { body, .. } => {
                self.visit_loop_body(node.id, body)?;
            }
            NodeKind::Switch { cases, .. } => {
                self.frames.push(Frame::Dispatch);
                let mut result = Ok(());
                'cases: for case in cases {
                    for stmt in &case.body {
                        result = self.visit_stmt(stmt);
                        if result.is_err() {
                            break 'cases;
                        }
                    }
                }
                self.frames.pop();
                result?;
            }
            NodeKind::Break => {
                if self.frames.is_empty() {
                    return Err(TransformError::new(
                        ErrorKind::JumpOutsideTarget,
                        node,
                        "break with no enclosing loop or switch",
                        "remove the break or move it inside a loop or switch",
                    ));
                }
            }
            NodeKind::Continue => {
                let owner = self.nearest_loop(node)?;
                self.annotations.continue_owners.insert(node.id, owner);
            }
            NodeKind::FunctionDecl { params, body, .. } => {
                self.collect_hoist(node.id, body, params);
                // Jumps cannot escape a function boundary.
                let saved = std::mem::take(&mut self.frames);
                let mut result = Ok(());
                for stmt in body {
                    result = self.visit_stmt(stmt);
                    if result.is_err() {
                        break;
                    }
                }
                self.frames = saved;
                result?;
            }
            NodeKind::Block(body) | NodeKind::Program(body) => {
                for stmt in body {
                    self.visit_stmt(stmt)?;
                }
            }
            NodeKind::If {
                consequent,
                alternate,
                ..
            } => {
                self.visit_stmt(consequent)?;
                if let Some(alternate) = alternate {
                    self.visit_stmt(alternate)?;
                }
            }
            NodeKind::Try {
                block,
                handler,
                finalizer,
            } => {
                for stmt in block {
                    self.visit_stmt(stmt)?;
                }
                if let Some(handler) = handler {
                    for stmt in &handler.body {
                        self.visit_stmt(stmt)?;
                    }
                }
                if let Some(finalizer) = finalizer {
                    for stmt in finalizer {
                        self.visit_stmt(stmt)?;
                    }
                }
            }
            // Expression-bearing statements: the subset has no
            // statement-bearing expressions, so there is nothing to
            // descend into.
            NodeKind::VarStmt(_)
            | NodeKind::ExprStmt(_)
            | NodeKind::Return(_)
            | NodeKind::Throw(_)
            | NodeKind::Empty => {}
            // Expression kinds never appear in statement position here.
            _ => {}
        }
        Ok(())
    }

    fn visit_loop_body(&mut self, loop_node: NodeId, body: &Node) -> Result<(), TransformError> {
        let id = self.fresh_loop_id();
        self.annotations.loop_ids.insert(loop_node, id);
        self.frames.push(Frame::Loop(id));
        let result = self.visit_stmt(body);
        self.frames.pop();
        result
    }

    /// Find the loop a `continue` exits to, rejecting a dispatch marker
    /// sitting above the nearest loop on the combined stack.
    fn nearest_loop(&self, node: &Node) -> Result<LoopId, TransformError> {
        for frame in self.frames.iter().rev() {
            match frame {
                Frame::Loop(id) => return Ok(*id),
                Frame::Dispatch => {
                    return Err(TransformError::new(
                        ErrorKind::ContinueInsideDispatch,
                        node,
                        "continue directly inside a switch body",
                        "restructure the switch as if/else, or move the continue out of the switch",
                    ));
                }
            }
        }
        Err(TransformError::new(
            ErrorKind::JumpOutsideTarget,
            node,
            "continue with no enclosing loop",
            "remove the continue or move it inside a loop",
        ))
    }

    /// Collect every declared-variable name statically reachable from a
    /// function root, in source order, stopping at nested function
    /// boundaries and excluding parameter names.
    fn collect_hoist(&mut self, root: NodeId, body: &[Node], params: &[String]) {
        let mut names: IndexSet<String> = IndexSet::new();
        for stmt in body {
            collect_hoist_names(stmt, &mut names);
        }
        let names: Vec<String> = names
            .into_iter()
            .filter(|name| !params.contains(name))
            .collect();
        self.annotations.hoisted.insert(root, names);
    }
}

impl Default for Prepass {
    fn default() -> Self {
        Self::new()
    }
}

fn collect_hoist_names(node: &Node, names: &mut IndexSet<String>) {
    match &node.kind {
        NodeKind::VarStmt(decls) => {
            for decl in decls {
                names.insert(decl.name.clone());
            }
        }
        NodeKind::ForIn {
            declares, name, body, ..
        } => {
            if *declares {
                names.insert(name.clone());
            }
            collect_hoist_names(body, names);
        }
        NodeKind::For { init, body, .. } => {
            if let Some(init) = init {
                collect_hoist_names(init, names);
            }
            collect_hoist_names(body, names);
        }
        NodeKind::While { body, .. } | NodeKind::DoWhile { body, .. } => {
            collect_hoist_names(body, names);
        }
        NodeKind::Block(body) | NodeKind::Program(body) => {
            for stmt in body {
                collect_hoist_names(stmt, names);
            }
        }
        NodeKind::If {
            consequent,
            alternate,
            ..
        } => {
            collect_hoist_names(consequent, names);
            if let Some(alternate) = alternate {
                collect_hoist_names(alternate, names);
            }
        }
        NodeKind::Switch { cases, .. } => {
            for case in cases {
                for stmt in &case.body {
                    collect_hoist_names(stmt, names);
                }
            }
        }
        NodeKind::Try {
            block,
            handler,
            finalizer,
        } => {
            for stmt in block {
                collect_hoist_names(stmt, names);
            }
            if let Some(handler) = handler {
                for stmt in &handler.body {
                    collect_hoist_names(stmt, names);
                }
            }
            if let Some(finalizer) = finalizer {
                for stmt in finalizer {
                    collect_hoist_names(stmt, names);
                }
            }
        }
        // Nested function bodies keep their own hoist sets.
        NodeKind::FunctionDecl { .. } => {}
        _ => {}
    }
}
