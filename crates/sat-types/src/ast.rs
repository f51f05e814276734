//! Expression tree and runtime values for the SAT language.
//!
//! Every expression carries a [`Location`] for diagnostics. Composite
//! primitives (`Object`, `Array`) hold unevaluated [`Expression`]s: their
//! elements are evaluated each time they are read and never cached.

use crate::scope::{ScopeId, Scopes};
use crate::Location;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::io;
use std::process::Child;
use std::rc::Rc;

// ══════════════════════════════════════════════════════════════════════════════
// Top Level
// ══════════════════════════════════════════════════════════════════════════════

/// A parsed program: the root statements plus every scope they create.
#[derive(Debug)]
pub struct Program {
    pub expressions: Vec<Expression>,
    pub scopes: Scopes,
    /// The scope root statements run in.
    pub root: ScopeId,
}

// ══════════════════════════════════════════════════════════════════════════════
// Expressions
// ══════════════════════════════════════════════════════════════════════════════

/// A located expression node.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub kind: ExprKind,
    pub location: Location,
}

impl Expression {
    pub fn new(kind: ExprKind, location: Location) -> Self {
        Self { kind, location }
    }

    /// Wrap a primitive value as a literal expression.
    pub fn primitive(value: Primitive, location: Location) -> Self {
        Self::new(ExprKind::Primitive(value), location)
    }

    /// Short description of the node kind, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            ExprKind::Primitive(_) => "primitive",
            ExprKind::Assignment { .. } => "assignment",
            ExprKind::Equality { .. } => "equality",
            ExprKind::Ref(_) => "ref",
            ExprKind::MultiRef(_) => "multi ref",
            ExprKind::Assert(_) => "assert",
            ExprKind::Test { .. } => "test",
            ExprKind::Get(_) => "get",
            ExprKind::Run(_) => "run",
            ExprKind::Spawn(_) => "spawn",
            ExprKind::Kill(_) => "kill",
            ExprKind::Healthcheck(_) => "healthcheck",
            ExprKind::Block(_) => "block",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// Literal value: `true`, `1.5`, `"text"`, `{a: 1}`, `[1, 2]`
    Primitive(Primitive),
    /// `target = value`
    Assignment {
        left: Box<Expression>,
        right: Box<Expression>,
    },
    /// `left == right`
    Equality {
        left: Box<Expression>,
        right: Box<Expression>,
    },
    /// Variable or dotted path: `name`, `res.body.items.0`
    Ref(String),
    /// Destructuring target: `status, body`
    MultiRef(Vec<String>),
    /// `assert: condition`
    Assert(Box<Expression>),
    /// `test "name" { ... }`
    Test { name: String, block: Block },
    /// `get: url`
    Get(Box<Expression>),
    /// `run: command`
    Run(Box<Expression>),
    /// `spawn: command`
    Spawn(Box<Expression>),
    /// `kill: process`
    Kill(Box<Expression>),
    /// `healthcheck: url`
    Healthcheck(Box<Expression>),
    /// `{ ... }` with its own scope
    Block(Block),
}

/// A sequence of statements bound to the child scope created for it.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub expressions: Vec<Expression>,
    pub scope: ScopeId,
    pub location: Location,
}

// ══════════════════════════════════════════════════════════════════════════════
// Primitives
// ══════════════════════════════════════════════════════════════════════════════

/// A runtime value.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Void,
    Boolean(bool),
    Number(f32),
    String(String),
    /// Key order is not significant.
    Object(BTreeMap<String, Expression>),
    Array(Vec<Expression>),
    /// Several results at once, e.g. `status, body` from `get:`.
    Multi(Vec<Primitive>),
    Process(ProcessHandle),
}

impl Primitive {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Void => "void",
            Self::Boolean(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Object(_) => "object",
            Self::Array(_) => "array",
            Self::Multi(_) => "multi",
            Self::Process(_) => "process",
        }
    }
}

/// Handle to a background process started by `spawn:`.
///
/// Clones share the same OS process.
#[derive(Debug, Clone)]
pub struct ProcessHandle {
    command: String,
    child: Rc<RefCell<Child>>,
}

impl ProcessHandle {
    pub fn new(command: impl Into<String>, child: Child) -> Self {
        Self {
            command: command.into(),
            child: Rc::new(RefCell::new(child)),
        }
    }

    /// The command line the process was started with.
    pub fn command(&self) -> &str {
        &self.command
    }

    /// OS process id.
    pub fn id(&self) -> u32 {
        self.child.borrow().id()
    }

    /// Terminate the process and reap it.
    pub fn kill(&self) -> io::Result<()> {
        let mut child = self.child.borrow_mut();
        child.kill()?;
        child.wait()?;
        Ok(())
    }
}

impl PartialEq for ProcessHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.child, &other.child)
    }
}

impl fmt::Display for ProcessHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "process {} ({})", self.id(), self.command)
    }
}
