//! The AST node the back end walks. A single wide record would blur which
//! fields are meaningful for which node; instead `Node` carries only what
//! every node has (a result type and a source line) and `NodeKind` is a
//! tagged union with kind-specific payloads, matched exhaustively at every
//! use site.

use crate::local::Local;
use crate::ty::{Member, Type};

/// Either a local (resolved to its typed index) or a global (resolved to
/// its linker symbol name). A front end has already done name resolution
/// by the time a `Node` exists.
#[derive(Debug, Clone)]
pub enum VarRef {
    Local(Local),
    Global(String),
}

#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    /// `None` only for pure statement kinds (§3 invariant: every other node
    /// carries a valid type).
    pub ty: Option<Type>,
    pub line: u32,
}

impl Node {
    pub fn new(kind: NodeKind, ty: Option<Type>, line: u32) -> Self {
        Node { kind, ty, line }
    }
}

#[derive(Debug, Clone)]
pub struct CaseArm {
    pub value: i64,
    pub label: String,
    pub body: Box<Node>,
}

#[derive(Debug, Clone)]
pub enum NodeKind {
    // --- leaf expressions ---
    Num(i64),
    Var(VarRef),
    NullExpr,

    // --- unary expressions ---
    Neg(Box<Node>),
    Deref(Box<Node>),
    Addr(Box<Node>),
    Not(Box<Node>),
    BitNot(Box<Node>),
    Cast(Box<Node>),

    // --- lvalue-producing compounds ---
    Member {
        base: Box<Node>,
        member: Member,
    },
    Memzero(Local),

    // --- binary arithmetic/relational/bitwise ---
    Add(Box<Node>, Box<Node>),
    Sub(Box<Node>, Box<Node>),
    Mul(Box<Node>, Box<Node>),
    Div(Box<Node>, Box<Node>),
    Mod(Box<Node>, Box<Node>),
    BitAnd(Box<Node>, Box<Node>),
    BitOr(Box<Node>, Box<Node>),
    BitXor(Box<Node>, Box<Node>),
    Eq(Box<Node>, Box<Node>),
    Ne(Box<Node>, Box<Node>),
    Lt(Box<Node>, Box<Node>),
    Le(Box<Node>, Box<Node>),
    Shl(Box<Node>, Box<Node>),
    Shr(Box<Node>, Box<Node>),

    // --- short-circuiting / sequencing ---
    LogAnd {
        lhs: Box<Node>,
        rhs: Box<Node>,
    },
    LogOr {
        lhs: Box<Node>,
        rhs: Box<Node>,
    },
    Comma {
        lhs: Box<Node>,
        rhs: Box<Node>,
    },
    Cond {
        cond: Box<Node>,
        then: Box<Node>,
        els: Box<Node>,
    },

    // --- assignment / calls / statement-expressions ---
    Assign {
        lhs: Box<Node>,
        rhs: Box<Node>,
    },
    FunCall {
        name: String,
        args: Vec<Node>,
        ret_ty: Type,
    },
    StmtExpr(Box<Node>),

    // --- statements ---
    If {
        cond: Box<Node>,
        then: Box<Node>,
        els: Option<Box<Node>>,
    },
    For {
        init: Option<Box<Node>>,
        cond: Option<Box<Node>>,
        inc: Option<Box<Node>>,
        body: Box<Node>,
        brk_label: String,
        cont_label: String,
    },
    Do {
        body: Box<Node>,
        cond: Box<Node>,
        brk_label: String,
        cont_label: String,
    },
    Switch {
        cond: Box<Node>,
        cases: Vec<CaseArm>,
        /// A case arm with no comparison value: dispatch falls through to
        /// it directly when no `cases` entry matches.
        default_case: Option<CaseArm>,
        body: Box<Node>,
        brk_label: String,
    },
    Case(CaseArm),
    Block(Vec<Node>),
    Goto(String),
    Label {
        name: String,
        unique_label: String,
        body: Box<Node>,
    },
    Return(Option<Box<Node>>),
    ExprStmt(Box<Node>),
}

impl NodeKind {
    /// Whether a node of this kind permits address-taking: `VAR`, `DEREF`,
    /// `MEMBER`, and `COMMA` (whose lvalue-ness follows its `rhs`).
    pub fn is_lvalue(&self) -> bool {
        matches!(
            self,
            NodeKind::Var(_) | NodeKind::Deref(_) | NodeKind::Member { .. } | NodeKind::Comma { .. }
        )
    }
}
