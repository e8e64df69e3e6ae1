//! Programmatic construction of input trees.
//!
//! The upstream parser contract only requires uniquely-identified,
//! span-carrying nodes; `AstBuilder` satisfies it for callers that build
//! trees in memory — primarily the engine's own tests. Ids are assigned
//! monotonically; spans default to [`Span::DUMMY`] and can be overridden
//! with [`AstBuilder::spanned`].

use jspy_common::Span;

use crate::js::{
    BinaryOp, CatchClause, LogicalOp, MemberProp, Node, NodeId, NodeKind, PropKey, SwitchCase,
    UnaryOp, UpdateOp, VarDeclarator,
};

/// Builds input nodes with unique ids.
pub struct AstBuilder {
    next_id: u32,
}

impl AstBuilder {
    pub fn new() -> Self {
        AstBuilder { next_id: 0 }
    }

    fn fresh_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Wrap a kind into a node with a fresh id and a dummy span.
    pub fn node(&mut self, kind: NodeKind) -> Node {
        Node {
            id: self.fresh_id(),
            span: Span::DUMMY,
            kind,
        }
    }

    /// Wrap a kind into a node with a fresh id and an explicit span.
    pub fn spanned(&mut self, kind: NodeKind, span: Span) -> Node {
        Node {
            id: self.fresh_id(),
            span,
            kind,
        }
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    pub fn num(&mut self, text: &str) -> Node {
        self.node(NodeKind::Number(text.to_string()))
    }

    pub fn str_lit(&mut self, value: &str) -> Node {
        self.node(NodeKind::Str(value.to_string()))
    }

    pub fn bool_lit(&mut self, value: bool) -> Node {
        self.node(NodeKind::Bool(value))
    }

    pub fn null(&mut self) -> Node {
        self.node(NodeKind::Null)
    }

    pub fn regex(&mut self, pattern: &str, flags: &str) -> Node {
        self.node(NodeKind::Regex {
            pattern: pattern.to_string(),
            flags: flags.to_string(),
        })
    }

    pub fn ident(&mut self, name: &str) -> Node {
        self.node(NodeKind::Ident(name.to_string()))
    }

    pub fn unary(&mut self, op: UnaryOp, operand: Node) -> Node {
        self.node(NodeKind::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    pub fn binary(&mut self, op: BinaryOp, left: Node, right: Node) -> Node {
        self.node(NodeKind::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn logical(&mut self, op: LogicalOp, left: Node, right: Node) -> Node {
        self.node(NodeKind::Logical {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn conditional(&mut self, test: Node, consequent: Node, alternate: Node) -> Node {
        self.node(NodeKind::Conditional {
            test: Box::new(test),
            consequent: Box::new(consequent),
            alternate: Box::new(alternate),
        })
    }

    pub fn assign(&mut self, target: Node, value: Node) -> Node {
        self.node(NodeKind::Assign {
            target: Box::new(target),
            value: Box::new(value),
        })
    }

    pub fn compound_assign(&mut self, op: BinaryOp, target: Node, value: Node) -> Node {
        self.node(NodeKind::CompoundAssign {
            op,
            target: Box::new(target),
            value: Box::new(value),
        })
    }

    pub fn update(&mut self, op: UpdateOp, prefix: bool, target: Node) -> Node {
        self.node(NodeKind::Update {
            op,
            prefix,
            target: Box::new(target),
        })
    }

    pub fn call(&mut self, callee: Node, args: Vec<Node>) -> Node {
        self.node(NodeKind::Call {
            callee: Box::new(callee),
            args,
        })
    }

    /// `object.name`
    pub fn member(&mut self, object: Node, name: &str) -> Node {
        self.node(NodeKind::Member {
            object: Box::new(object),
            property: MemberProp::Name(name.to_string()),
        })
    }

    /// `object[index]`
    pub fn index(&mut self, object: Node, index: Node) -> Node {
        self.node(NodeKind::Member {
            object: Box::new(object),
            property: MemberProp::Computed(Box::new(index)),
        })
    }

    pub fn array(&mut self, elements: Vec<Node>) -> Node {
        self.node(NodeKind::Array(elements))
    }

    pub fn object(&mut self, props: Vec<(PropKey, Node)>) -> Node {
        self.node(NodeKind::Object(props))
    }

    pub fn seq(&mut self, exprs: Vec<Node>) -> Node {
        self.node(NodeKind::Seq(exprs))
    }

    // =========================================================================
    // Statements
    // =========================================================================

    pub fn program(&mut self, body: Vec<Node>) -> Node {
        self.node(NodeKind::Program(body))
    }

    /// `var name;` / `var name = init;`
    pub fn var(&mut self, name: &str, init: Option<Node>) -> Node {
        let decl = VarDeclarator {
            span: Span::DUMMY,
            name: name.to_string(),
            init,
        };
        self.node(NodeKind::VarStmt(vec![decl]))
    }

    /// `var a = ..., b = ...;`
    pub fn var_list(&mut self, decls: Vec<(&str, Option<Node>)>) -> Node {
        let decls = decls
            .into_iter()
            .map(|(name, init)| VarDeclarator {
                span: Span::DUMMY,
                name: name.to_string(),
                init,
            })
            .collect();
        self.node(NodeKind::VarStmt(decls))
    }

    pub fn expr_stmt(&mut self, expr: Node) -> Node {
        self.node(NodeKind::ExprStmt(Box::new(expr)))
    }

    pub fn block(&mut self, body: Vec<Node>) -> Node {
        self.node(NodeKind::Block(body))
    }

    pub fn if_stmt(&mut self, test: Node, consequent: Node, alternate: Option<Node>) -> Node {
        self.node(NodeKind::If {
            test: Box::new(test),
            consequent: Box::new(consequent),
            alternate: alternate.map(Box::new),
        })
    }

    pub fn while_stmt(&mut self, test: Node, body: Node) -> Node {
        self.node(NodeKind::While {
            test: Box::new(test),
            body: Box::new(body),
        })
    }

    pub fn do_while(&mut self, body: Node, test: Node) -> Node {
        self.node(NodeKind::DoWhile {
            body: Box::new(body),
            test: Box::new(test),
        })
    }

    pub fn for_stmt(
        &mut self,
        init: Option<Node>,
        test: Option<Node>,
        update: Option<Node>,
        body: Node,
    ) -> Node {
        self.node(NodeKind::For {
            init: init.map(Box::new),
            test: test.map(Box::new),
            update: update.map(Box::new),
            body: Box::new(body),
        })
    }

    pub fn for_in(&mut self, declares: bool, name: &str, object: Node, body: Node) -> Node {
        self.node(NodeKind::ForIn {
            declares,
            name: name.to_string(),
            object: Box::new(object),
            body: Box::new(body),
        })
    }

    pub fn switch(&mut self, discriminant: Node, cases: Vec<SwitchCase>) -> Node {
        self.node(NodeKind::Switch {
            discriminant: Box::new(discriminant),
            cases,
        })
    }

    /// `case test: body`
    pub fn case(&mut self, test: Node, body: Vec<Node>) -> SwitchCase {
        SwitchCase {
            span: Span::DUMMY,
            test: Some(test),
            body,
        }
    }

    /// `default: body`
    pub fn default_case(&mut self, body: Vec<Node>) -> SwitchCase {
        SwitchCase {
            span: Span::DUMMY,
            test: None,
            body,
        }
    }

    pub fn break_stmt(&mut self) -> Node {
        self.node(NodeKind::Break)
    }

    pub fn continue_stmt(&mut self) -> Node {
        self.node(NodeKind::Continue)
    }

    pub fn return_stmt(&mut self, value: Option<Node>) -> Node {
        self.node(NodeKind::Return(value.map(Box::new)))
    }

    pub fn function(&mut self, name: &str, params: Vec<&str>, body: Vec<Node>) -> Node {
        self.node(NodeKind::FunctionDecl {
            name: name.to_string(),
            params: params.into_iter().map(str::to_string).collect(),
            body,
        })
    }

    pub fn throw(&mut self, value: Node) -> Node {
        self.node(NodeKind::Throw(Box::new(value)))
    }

    pub fn try_stmt(
        &mut self,
        block: Vec<Node>,
        handler: Option<(&str, Vec<Node>)>,
        finalizer: Option<Vec<Node>>,
    ) -> Node {
        let handler = handler.map(|(param, body)| CatchClause {
            span: Span::DUMMY,
            param: param.to_string(),
            body,
        });
        self.node(NodeKind::Try {
            block,
            handler,
            finalizer,
        })
    }

    pub fn empty(&mut self) -> Node {
        self.node(NodeKind::Empty)
    }
}

impl Default for AstBuilder {
    fn default() -> Self {
        Self::new()
    }
}
