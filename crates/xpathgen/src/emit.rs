//! Renders a normalized expression as a path-query string.

use itertools::Itertools;

use crate::ast::{self, Clause, CmpOp, Comprehension, Environment, Expr, Ident, Literal};
use crate::tables;

/// Rendering position. `nested` is set inside predicates, where a
/// comprehension has to choose between a `.`-scoped and an absolute path.
#[derive(Clone, Copy)]
struct Position {
    nested: bool,
}

/// Renders `expr` from the document root. Total over normalized trees; the
/// grammar check catches anything that slips through without a textual
/// form in the output subset.
pub fn emit(expr: &Expr, env: &Environment) -> String {
    render(expr, env, Position { nested: false })
}

fn render(expr: &Expr, env: &Environment, position: Position) -> String {
    match expr {
        Expr::Ident(id) => node_test(id).to_string(),
        Expr::Attribute { name, .. } => attribute(name),
        Expr::Literal(literal) => literal_token(literal),
        Expr::Comparison { left, op, right } => comparison(left, *op, right, env, position),
        Expr::And(terms) => terms.iter().map(|term| render(term, env, position)).join(" and "),
        Expr::Or(terms) => terms.iter().map(|term| render(term, env, position)).join(" or "),
        Expr::Not(inner) => format!("not({})", render(inner, env, position)),
        Expr::Call { arg, .. } => format!("count({})", render(arg, env, position)),
        Expr::HyphenJoin(parts) => hyphen_join(parts, env, position),
        Expr::Comprehension(comprehension) => comprehension_path(comprehension, env, position),
    }
}

/// A comprehension renders as its clause steps concatenated. In nested
/// position a path over a non-root source scopes to the current node with a
/// leading `.`; an attribute or hyphen-join yield appends a final selector
/// step.
fn comprehension_path(
    comprehension: &Comprehension,
    env: &Environment,
    position: Position,
) -> String {
    let mut out = String::new();
    let anchored = comprehension
        .clauses
        .first()
        .is_some_and(|clause| ast::is_root_source(&clause.source, env));
    if position.nested && !anchored {
        out.push('.');
    }
    for clause in &comprehension.clauses {
        clause_step(&mut out, clause, env);
    }
    match &comprehension.return_expr {
        Expr::Attribute { name, .. } => {
            out.push('/');
            out.push_str(&attribute(name));
        }
        Expr::HyphenJoin(parts) => {
            out.push('/');
            out.push_str(&hyphen_join(parts, env, Position { nested: true }));
        }
        _ => {}
    }
    out
}

fn clause_step(out: &mut String, clause: &Clause, env: &Environment) {
    let axis = match &clause.source {
        Expr::Attribute { name, .. } => tables::axis_token(name.as_str()),
        _ => "//",
    };
    out.push_str(axis);
    out.push_str(node_test(&clause.var));
    if let Some(predicate) = clause.predicates.first() {
        out.push('[');
        out.push_str(&render(predicate, env, Position { nested: true }));
        out.push(']');
    }
}

fn comparison(
    left: &Expr,
    op: CmpOp,
    right: &Expr,
    env: &Environment,
    position: Position,
) -> String {
    let symbol = match op {
        CmpOp::Eq => "=",
        CmpOp::Ne => "!=",
        CmpOp::Lt => "<",
        CmpOp::Le => "<=",
        CmpOp::Gt => ">",
        CmpOp::Ge => ">=",
        // Membership that survives normalization is a substring test: the
        // right operand is the haystack.
        CmpOp::In => {
            return format!(
                "contains({}, {})",
                render(right, env, position),
                render(left, env, position)
            );
        }
        CmpOp::NotIn => {
            return format!(
                "not(contains({}, {}))",
                render(right, env, position),
                render(left, env, position)
            );
        }
    };
    format!("{}{symbol}{}", render(left, env, position), render(right, env, position))
}

fn node_test(id: &Ident) -> &str {
    if id.is_wildcard() {
        "*"
    } else if id.is_iter_slot() {
        "."
    } else {
        id.as_str()
    }
}

/// Attribute bases never render; the selector applies to the node test of
/// the clause step it appears under.
fn attribute(name: &Ident) -> String {
    tables::attribute_selector(tables::attribute_name(name.as_str()))
}

/// Parts joined by `-`: the first part carries the selector form, the rest
/// render as bare name text.
fn hyphen_join(parts: &[Expr], env: &Environment, position: Position) -> String {
    let mut out = String::new();
    for (index, part) in parts.iter().enumerate() {
        if index > 0 {
            out.push('-');
        }
        let piece = match part {
            Expr::Attribute { name, .. } if index == 0 => attribute(name),
            Expr::Attribute { name, .. } => tables::attribute_name(name.as_str()).to_string(),
            Expr::Ident(id) => node_test(id).to_string(),
            other => render(other, env, position),
        };
        out.push_str(&piece);
    }
    out
}

fn literal_token(literal: &Literal) -> String {
    match literal {
        Literal::Str(value) => quoted(value),
        Literal::Int(value) => value.to_string(),
        Literal::Float(value) => float_token(*value),
        Literal::Seq(items) => format!("({})", items.iter().map(literal_token).join(", ")),
    }
}

/// Single quotes preferred, double quotes when the value contains a single
/// quote. The output language has no escape syntax; a value containing both
/// kinds is left for the grammar check to reject.
fn quoted(value: &str) -> String {
    if value.contains('\'') { format!("\"{value}\"") } else { format!("'{value}'") }
}

fn float_token(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}
