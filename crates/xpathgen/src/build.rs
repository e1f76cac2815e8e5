//! Free-function constructors for assembling comprehension trees.
//!
//! The functions mirror the shapes a decompiler collaborator produces, so
//! hand-built trees in tests and examples read close to the comprehension
//! they stand for. Constructors never validate; malformed shapes are
//! rejected by whichever compile pass first cannot interpret them.

use crate::ast::{Clause, CmpOp, Comprehension, Expr, Ident, Literal};

pub fn ident(name: &str) -> Expr {
    Expr::Ident(Ident::new(name))
}

/// The document-root marker.
pub fn document() -> Expr {
    Expr::Ident(Ident::document())
}

/// The synthetic name bound to a prepared outer iterator.
pub fn iter_slot() -> Expr {
    Expr::Ident(Ident::iter_slot())
}

/// The any-name wildcard.
pub fn wildcard() -> Expr {
    Expr::Ident(Ident::wildcard())
}

pub fn attr(base: Expr, name: &str) -> Expr {
    Expr::Attribute { base: Box::new(base), name: Ident::new(name) }
}

pub fn s(value: &str) -> Expr {
    Expr::Literal(Literal::Str(value.to_string()))
}

pub fn i(value: i64) -> Expr {
    Expr::Literal(Literal::Int(value))
}

pub fn f(value: f64) -> Expr {
    Expr::Literal(Literal::Float(value))
}

/// A literal sequence of strings, the common membership right-hand side.
pub fn str_seq<'a>(items: impl IntoIterator<Item = &'a str>) -> Expr {
    let items = items.into_iter().map(|item| Literal::Str(item.to_string())).collect();
    Expr::Literal(Literal::Seq(items))
}

pub fn cmp(left: Expr, op: CmpOp, right: Expr) -> Expr {
    Expr::Comparison { left: Box::new(left), op, right: Box::new(right) }
}

pub fn eq(left: Expr, right: Expr) -> Expr {
    cmp(left, CmpOp::Eq, right)
}

pub fn ne(left: Expr, right: Expr) -> Expr {
    cmp(left, CmpOp::Ne, right)
}

pub fn lt(left: Expr, right: Expr) -> Expr {
    cmp(left, CmpOp::Lt, right)
}

pub fn le(left: Expr, right: Expr) -> Expr {
    cmp(left, CmpOp::Le, right)
}

pub fn gt(left: Expr, right: Expr) -> Expr {
    cmp(left, CmpOp::Gt, right)
}

pub fn ge(left: Expr, right: Expr) -> Expr {
    cmp(left, CmpOp::Ge, right)
}

pub fn is_in(left: Expr, right: Expr) -> Expr {
    cmp(left, CmpOp::In, right)
}

pub fn not_in(left: Expr, right: Expr) -> Expr {
    cmp(left, CmpOp::NotIn, right)
}

pub fn and(terms: impl IntoIterator<Item = Expr>) -> Expr {
    Expr::And(terms.into_iter().collect())
}

pub fn or(terms: impl IntoIterator<Item = Expr>) -> Expr {
    Expr::Or(terms.into_iter().collect())
}

pub fn not(inner: Expr) -> Expr {
    Expr::Not(Box::new(inner))
}

/// Existential quantification over a nested comprehension.
pub fn any(comprehension: Comprehension) -> Expr {
    call("any", Expr::Comprehension(Box::new(comprehension)))
}

/// Universal quantification over a nested comprehension.
pub fn all(comprehension: Comprehension) -> Expr {
    call("all", Expr::Comprehension(Box::new(comprehension)))
}

/// Element count of a nested comprehension.
pub fn len(comprehension: Comprehension) -> Expr {
    call("len", Expr::Comprehension(Box::new(comprehension)))
}

pub fn call(function: &str, arg: Expr) -> Expr {
    Expr::Call { function: Ident::new(function), arg: Box::new(arg) }
}

/// Hyphen-joined name parts, the workaround for attribute names the
/// comprehension syntax cannot spell directly (`data-bind`).
pub fn hyphen(parts: impl IntoIterator<Item = Expr>) -> Expr {
    Expr::HyphenJoin(parts.into_iter().collect())
}

pub fn clause(var: &str, source: Expr) -> Clause {
    Clause::new(var, source)
}

pub fn comp(return_expr: Expr, clauses: impl IntoIterator<Item = Clause>) -> Comprehension {
    Comprehension::new(return_expr, clauses)
}
