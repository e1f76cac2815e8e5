//! Comprehension AST (the decompiler collaborator's output vocabulary) and
//! the compile-time environment visible to it.

use compact_str::CompactString;
use smallvec::SmallVec;
use std::collections::HashMap;
use std::fmt;

const DOCUMENT_MARKER: &str = "DOM";
const ITER_SLOT: &str = "$0";
const WILDCARD: &str = "X";

/// An identifier as it appeared in the host comprehension.
///
/// Three spellings are reserved by the input contract: [`Ident::document`]
/// marks the document root, [`Ident::iter_slot`] is the synthetic name a
/// decompiler assigns the prepared outer iterator (also treated as root, and
/// rendered as `.`), and [`Ident::wildcard`] matches any element name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ident(CompactString);

impl Ident {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(CompactString::new(name.as_ref()))
    }

    pub fn document() -> Self {
        Self::new(DOCUMENT_MARKER)
    }

    pub fn iter_slot() -> Self {
        Self::new(ITER_SLOT)
    }

    pub fn wildcard() -> Self {
        Self::new(WILDCARD)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_document_marker(&self) -> bool {
        self.0 == DOCUMENT_MARKER
    }

    pub fn is_iter_slot(&self) -> bool {
        self.0 == ITER_SLOT
    }

    pub fn is_wildcard(&self) -> bool {
        self.0 == WILDCARD
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Ident {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Str(String),
    Int(i64),
    Float(f64),
    /// A finite sequence. Only meaningful as the right side of a membership
    /// test, where normalization expands it away; one that survives to the
    /// output fails the grammar check.
    Seq(Vec<Literal>),
}

/// Comparison operators of the host comprehension syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    In,
    NotIn,
}

impl CmpOp {
    /// The operator of the negated comparison. Every pair is listed in both
    /// directions, so `op.negated().negated() == op`.
    pub fn negated(self) -> Self {
        match self {
            CmpOp::Eq => CmpOp::Ne,
            CmpOp::Ne => CmpOp::Eq,
            CmpOp::In => CmpOp::NotIn,
            CmpOp::NotIn => CmpOp::In,
            CmpOp::Gt => CmpOp::Le,
            CmpOp::Le => CmpOp::Gt,
            CmpOp::Lt => CmpOp::Ge,
            CmpOp::Ge => CmpOp::Lt,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Ident(Ident),
    Attribute {
        base: Box<Expr>,
        name: Ident,
    },
    Literal(Literal),
    Comparison {
        left: Box<Expr>,
        op: CmpOp,
        right: Box<Expr>,
    },
    And(Vec<Expr>),
    Or(Vec<Expr>),
    Not(Box<Expr>),
    /// A quantifier or counting call over a nested comprehension.
    Call {
        function: Ident,
        arg: Box<Expr>,
    },
    /// Workaround form for names containing a subtraction-like separator:
    /// the parts render joined by `-` (`@data-bind` from an attribute part
    /// and an identifier part).
    HyphenJoin(Vec<Expr>),
    /// A comprehension in operand position: quantifier arguments on input,
    /// plus the forms normalization produces (lifted boolean yields,
    /// eliminated universal quantifiers).
    Comprehension(Box<Comprehension>),
}

impl Expr {
    /// Short label for diagnostics.
    pub(crate) fn kind_name(&self) -> &'static str {
        match self {
            Expr::Ident(_) => "an identifier",
            Expr::Attribute { .. } => "an attribute access",
            Expr::Literal(_) => "a literal",
            Expr::Comparison { .. } => "a comparison",
            Expr::And(_) => "a conjunction",
            Expr::Or(_) => "a disjunction",
            Expr::Not(_) => "a negation",
            Expr::Call { .. } => "a call",
            Expr::HyphenJoin(_) => "a hyphenated name",
            Expr::Comprehension(_) => "a comprehension",
        }
    }
}

/// One nesting level of iteration: a bound name, the expression it iterates,
/// and the conditions attached at this level. Clause order is outermost
/// first; each clause iterates nodes reachable from the previous clause's
/// bound node (the document root for the first).
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    pub var: Ident,
    pub source: Expr,
    pub predicates: SmallVec<[Expr; 2]>,
}

impl Clause {
    pub fn new(var: impl Into<Ident>, source: Expr) -> Self {
        Self {
            var: var.into(),
            source,
            predicates: SmallVec::new(),
        }
    }

    pub fn with_predicate(mut self, predicate: Expr) -> Self {
        self.predicates.push(predicate);
        self
    }
}

/// The whole iterate-filter-yield construct.
#[derive(Debug, Clone, PartialEq)]
pub struct Comprehension {
    pub return_expr: Expr,
    pub clauses: Vec<Clause>,
}

impl Comprehension {
    pub fn new(return_expr: Expr, clauses: impl IntoIterator<Item = Clause>) -> Self {
        Self {
            return_expr,
            clauses: clauses.into_iter().collect(),
        }
    }
}

/// A compile-time value bound to a free identifier of the defining scope.
#[derive(Debug, Clone, PartialEq)]
pub enum Binding {
    /// A standalone document-element reference. Identifiers bound to one
    /// count as root-level iteration sources.
    Element,
    /// A finite iterable with known contents, eligible for membership
    /// expansion.
    Sequence(Vec<Literal>),
    /// A string value. Membership against it is a substring test, not
    /// element equality.
    Text(String),
}

impl Binding {
    pub fn sequence<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Binding::Sequence(items.into_iter().map(|s| Literal::Str(s.into())).collect())
    }

    pub fn text(value: impl Into<String>) -> Self {
        Binding::Text(value.into())
    }
}

/// Free identifiers visible to the comprehension, with their compile-time
/// values. Supplied once per compile call and never mutated by the compiler;
/// consulted only for membership expansion and root detection.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    bindings: HashMap<String, Binding>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_binding(mut self, name: impl Into<String>, value: Binding) -> Self {
        self.bindings.insert(name.into(), value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.bindings.get(name)
    }

    pub fn is_element(&self, name: &str) -> bool {
        matches!(self.get(name), Some(Binding::Element))
    }
}

/// Whether a clause source denotes the document root: the root marker, the
/// synthetic iterator slot, or a name the environment binds to a standalone
/// element.
pub(crate) fn is_root_source(source: &Expr, env: &Environment) -> bool {
    match source {
        Expr::Ident(id) => {
            id.is_document_marker() || id.is_iter_slot() || env.is_element(id.as_str())
        }
        _ => false,
    }
}
