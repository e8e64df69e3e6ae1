//! Input tree: the JavaScript subset accepted by the engine.
//!
//! The upstream parser produces a tree of these nodes. Each node carries a
//! unique [`NodeId`] and a source [`Span`]; the tree itself is immutable
//! after construction. Analysis passes never mutate nodes — anything they
//! learn is recorded in side tables keyed by `NodeId`.
//!
//! [`NodeKind`] is a closed sum type: adding a new construct to the subset
//! forces every exhaustive match in the pre-pass and engine to be updated,
//! so an unhandled kind is a build-time error rather than a runtime one.

use jspy_common::Span;
use serde::{Deserialize, Serialize};

/// Identity of one input node, unique within a compilation unit.
///
/// Side tables (loop ids, hoist sets, continue ownership) are keyed by
/// `NodeId` so the input tree stays immutable.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

/// One node of the input tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub span: Span,
    pub kind: NodeKind,
}

/// Unary operators of the subset.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    /// `!x`
    Not,
    /// `-x`
    Neg,
    /// `+x`
    Plus,
    /// `typeof x`
    TypeOf,
    /// `delete base[key]` / `delete base.key`
    Delete,
}

/// Binary operators of the subset.
///
/// `in` and `instanceof` are intentionally absent — they are outside the
/// supported subset, and leaving them out of the vocabulary means the
/// parser cannot even hand them to the engine.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    /// `===`
    StrictEq,
    /// `!==`
    StrictNeq,
    /// `==`
    LooseEq,
    /// `!=`
    LooseNeq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

impl BinaryOp {
    /// True for the coercing arithmetic operators (the only ones legal in
    /// compound assignment).
    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod
        )
    }
}

/// Short-circuit operators. Kept separate from [`BinaryOp`] because their
/// lowering is structural (a conditional expression), not a helper call.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogicalOp {
    And,
    Or,
}

/// `++` / `--`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpdateOp {
    Inc,
    Dec,
}

/// Property part of a member access.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum MemberProp {
    /// `base.name`
    Name(String),
    /// `base[expr]`
    Computed(Box<Node>),
}

/// Key of an object-literal property. Keys are literal text and never pass
/// through identifier resolution.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PropKey {
    Ident(String),
    Str(String),
    Num(String),
}

impl PropKey {
    /// The literal text the key contributes to the output dict display.
    pub fn text(&self) -> &str {
        match self {
            PropKey::Ident(s) | PropKey::Str(s) | PropKey::Num(s) => s,
        }
    }
}

/// One declarator of a variable statement: `name` or `name = init`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VarDeclarator {
    pub span: Span,
    pub name: String,
    pub init: Option<Node>,
}

/// One `case test:` / `default:` clause of a switch statement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SwitchCase {
    pub span: Span,
    /// `None` for the default clause.
    pub test: Option<Node>,
    pub body: Vec<Node>,
}

/// `catch (param) { body }`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CatchClause {
    pub span: Span,
    pub param: String,
    pub body: Vec<Node>,
}

/// The closed set of input node kinds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    // =========================================================================
    // Expressions
    // =========================================================================
    /// Numeric literal, kept as source text: `42`, `3.14`
    Number(String),

    /// String literal (cooked value, no quotes)
    Str(String),

    /// `true` / `false`
    Bool(bool),

    /// `null`
    Null,

    /// Regex literal: `/pattern/flags`
    Regex { pattern: String, flags: String },

    /// Identifier reference
    Ident(String),

    /// Unary expression: `!x`, `-x`, `+x`, `typeof x`, `delete x.k`
    Unary { op: UnaryOp, operand: Box<Node> },

    /// Binary expression: `left op right`
    Binary {
        op: BinaryOp,
        left: Box<Node>,
        right: Box<Node>,
    },

    /// Short-circuit expression: `left && right`, `left || right`
    Logical {
        op: LogicalOp,
        left: Box<Node>,
        right: Box<Node>,
    },

    /// Conditional expression: `test ? consequent : alternate`
    Conditional {
        test: Box<Node>,
        consequent: Box<Node>,
        alternate: Box<Node>,
    },

    /// Assignment: `target = value` (target is an identifier or member access)
    Assign { target: Box<Node>, value: Box<Node> },

    /// Compound assignment: `target op= value` (arithmetic ops only)
    CompoundAssign {
        op: BinaryOp,
        target: Box<Node>,
        value: Box<Node>,
    },

    /// Update expression: `++x`, `x--`
    Update {
        op: UpdateOp,
        prefix: bool,
        target: Box<Node>,
    },

    /// Call expression: `callee(args)`
    Call { callee: Box<Node>, args: Vec<Node> },

    /// Member access: `object.name` or `object[expr]`
    Member {
        object: Box<Node>,
        property: MemberProp,
    },

    /// Array literal: `[a, b, c]`
    Array(Vec<Node>),

    /// Object literal: `{ key: value, ... }`
    Object(Vec<(PropKey, Node)>),

    /// Comma sequence: `a, b, c`
    Seq(Vec<Node>),

    // =========================================================================
    // Statements
    // =========================================================================
    /// Compilation-unit root
    Program(Vec<Node>),

    /// Variable statement: `var a = 1, b;`
    VarStmt(Vec<VarDeclarator>),

    /// Expression statement
    ExprStmt(Box<Node>),

    /// Block: `{ statements }`
    Block(Vec<Node>),

    /// If statement
    If {
        test: Box<Node>,
        consequent: Box<Node>,
        alternate: Option<Box<Node>>,
    },

    /// While loop
    While { test: Box<Node>, body: Box<Node> },

    /// Do-while loop
    DoWhile { body: Box<Node>, test: Box<Node> },

    /// Classic three-clause for loop; any clause may be absent
    For {
        init: Option<Box<Node>>,
        test: Option<Box<Node>>,
        update: Option<Box<Node>>,
        body: Box<Node>,
    },

    /// For-in enumeration: `for (var name in object)` / `for (name in object)`
    ForIn {
        /// True when written with a `var` declaration in the head.
        declares: bool,
        name: String,
        object: Box<Node>,
        body: Box<Node>,
    },

    /// Switch statement
    Switch {
        discriminant: Box<Node>,
        cases: Vec<SwitchCase>,
    },

    /// `break;`
    Break,

    /// `continue;`
    Continue,

    /// `return;` / `return expr;`
    Return(Option<Box<Node>>),

    /// Function declaration: `function name(params) { body }`
    FunctionDecl {
        name: String,
        params: Vec<String>,
        body: Vec<Node>,
    },

    /// `throw expr;`
    Throw(Box<Node>),

    /// `try { block } catch (e) { handler } finally { finalizer }`
    Try {
        block: Vec<Node>,
        handler: Option<CatchClause>,
        finalizer: Option<Vec<Node>>,
    },

    /// `;`
    Empty,
}

impl NodeKind {
    /// Stable kind name, used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Number(_) => "NumberLiteral",
            NodeKind::Str(_) => "StringLiteral",
            NodeKind::Bool(_) => "BooleanLiteral",
            NodeKind::Null => "NullLiteral",
            NodeKind::Regex { .. } => "RegexLiteral",
            NodeKind::Ident(_) => "Identifier",
            NodeKind::Unary { .. } => "UnaryExpression",
            NodeKind::Binary { .. } => "BinaryExpression",
            NodeKind::Logical { .. } => "LogicalExpression",
            NodeKind::Conditional { .. } => "ConditionalExpression",
            NodeKind::Assign { .. } => "AssignmentExpression",
            NodeKind::CompoundAssign { .. } => "CompoundAssignmentExpression",
            NodeKind::Update { .. } => "UpdateExpression",
            NodeKind::Call { .. } => "CallExpression",
            NodeKind::Member { .. } => "MemberExpression",
            NodeKind::Array(_) => "ArrayLiteral",
            NodeKind::Object(_) => "ObjectLiteral",
            NodeKind::Seq(_) => "SequenceExpression",
            NodeKind::Program(_) => "Program",
            NodeKind::VarStmt(_) => "VariableStatement",
            NodeKind::ExprStmt(_) => "ExpressionStatement",
            NodeKind::Block(_) => "BlockStatement",
            NodeKind::If { .. } => "IfStatement",
            NodeKind::While { .. } => "WhileStatement",
            NodeKind::DoWhile { .. } => "DoWhileStatement",
            NodeKind::For { .. } => "ForStatement",
            NodeKind::ForIn { .. } => "ForInStatement",
            NodeKind::Switch { .. } => "SwitchStatement",
            NodeKind::Break => "BreakStatement",
            NodeKind::Continue => "ContinueStatement",
            NodeKind::Return(_) => "ReturnStatement",
            NodeKind::FunctionDecl { .. } => "FunctionDeclaration",
            NodeKind::Throw(_) => "ThrowStatement",
            NodeKind::Try { .. } => "TryStatement",
            NodeKind::Empty => "EmptyStatement",
        }
    }
}

impl Node {
    /// Stable kind name, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        self.kind.name()
    }
}
