//! Output tree: the Python vocabulary handed to the downstream printer.
//!
//! The engine produces trees of these nodes instead of strings. The
//! printer walks them and emits Python source; the engine's responsibility
//! ends at producing correctly-shaped, correctly-populated nodes
//! (parenthesization and indentation are the printer's concern).
//!
//! The vocabulary is deliberately small: only the constructs the
//! desugaring algorithms actually emit. Attribute access exists solely for
//! fixed stdlib aliases (`list.append`, `JSException.value`) — user member
//! access is always lowered to subscripts.

/// Python expression node.
#[derive(Debug, Clone, PartialEq)]
pub enum PyExpr {
    // =========================================================================
    // Literals
    // =========================================================================
    /// Numeric literal, printed as-is: `42`, `3.14`
    Num(String),

    /// String literal (unquoted value)
    Str(String),

    /// `True` / `False`
    Bool(bool),

    /// `None`
    None,

    // =========================================================================
    // Names and bindings
    // =========================================================================
    /// Resolved name reference
    Name(String),

    /// Binding (walrus) expression: `(target := value)`
    Named { target: String, value: Box<PyExpr> },

    // =========================================================================
    // Compound expressions
    // =========================================================================
    /// Conditional expression: `when_true if condition else when_false`
    Conditional {
        condition: Box<PyExpr>,
        when_true: Box<PyExpr>,
        when_false: Box<PyExpr>,
    },

    /// Call: `callee(args)`
    Call {
        callee: Box<PyExpr>,
        args: Vec<PyExpr>,
    },

    /// Indexed access: `object[index]`
    Subscript {
        object: Box<PyExpr>,
        index: Box<PyExpr>,
    },

    /// Attribute access: `object.name` — fixed stdlib aliases only
    Attribute { object: Box<PyExpr>, name: String },

    /// Binary operation: `left op right`
    BinOp {
        op: PyBinOp,
        left: Box<PyExpr>,
        right: Box<PyExpr>,
    },

    /// Unary operation: `not x`, `-x`
    UnaryOp { op: PyUnaryOp, operand: Box<PyExpr> },

    /// List display: `[a, b, c]`
    List(Vec<PyExpr>),

    /// Dict display: `{'k': v, ...}` — keys are literal strings
    Dict(Vec<(String, PyExpr)>),
}

/// Binary operators the engine emits directly (everything coercing goes
/// through runtime helper calls instead).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PyBinOp {
    Lt,
    LtEq,
    Gt,
    GtEq,
    /// `or` — used for merged dispatch-case conditions
    Or,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PyUnaryOp {
    Not,
    Neg,
}

/// Python statement node.
#[derive(Debug, Clone, PartialEq)]
pub enum PyStmt {
    /// Assignment: `target = value` (target is a name or subscript)
    Assign { target: PyExpr, value: PyExpr },

    /// Expression statement
    Expr(PyExpr),

    /// `return value` — always carries an explicit value
    Return(PyExpr),

    /// `if condition: body` with optional `orelse` (`elif` is an orelse
    /// holding a single nested `If`)
    If {
        condition: PyExpr,
        body: Vec<PyStmt>,
        orelse: Vec<PyStmt>,
    },

    /// `while condition: body`
    While {
        condition: PyExpr,
        body: Vec<PyStmt>,
    },

    /// `for target in iter: body`
    For {
        target: String,
        iter: PyExpr,
        body: Vec<PyStmt>,
    },

    /// `def name(params): body`
    FunctionDef {
        name: String,
        params: Vec<String>,
        body: Vec<PyStmt>,
    },

    /// `break`
    Break,

    /// `continue`
    Continue,

    /// `pass`
    Pass,

    /// `raise value`
    Raise(PyExpr),

    /// `try: body except <class> as <binding>: handler finally: finalizer`
    Try {
        body: Vec<PyStmt>,
        handler: Option<PyExceptHandler>,
        finalizer: Vec<PyStmt>,
    },
}

/// One `except <class> as <binding>:` clause.
#[derive(Debug, Clone, PartialEq)]
pub struct PyExceptHandler {
    /// Exception class name (the runtime's wrapper type)
    pub class_name: String,
    /// Temp the caught exception is bound to
    pub binding: String,
    pub body: Vec<PyStmt>,
}

/// Root of one transformed compilation unit.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PyModule {
    pub body: Vec<PyStmt>,
}

impl PyStmt {
    /// True when the statement unconditionally leaves the enclosing suite
    /// (used when synthesizing dispatch-branch terminators).
    pub fn is_terminator(&self) -> bool {
        matches!(self, PyStmt::Break | PyStmt::Return(_) | PyStmt::Raise(_))
    }
}
