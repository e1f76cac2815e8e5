pub mod ast;
pub mod build;
pub mod emit;
pub mod error;
pub mod normalize;
pub mod query;
mod tables;
pub mod validate;

pub use ast::{Binding, Clause, CmpOp, Comprehension, Environment, Expr, Ident, Literal};
pub use emit::emit;
pub use error::{CompileError, QueryError};
pub use normalize::normalize;
pub use query::{DocumentTarget, query};
pub use validate::{GrammarCheck, SubsetGrammar};

use tracing::debug;

/// Compiles a comprehension into a query string, gated by the built-in
/// subset grammar.
pub fn compile(comprehension: Comprehension, env: &Environment) -> Result<String, CompileError> {
    compile_with_check(comprehension, env, &SubsetGrammar)
}

/// Compiles with a caller-supplied grammar check.
///
/// The comprehension is taken by value: normalization rewrites the tree in
/// place, so every call owns its input outright. The root-scope check runs
/// before any rewriting or emission.
pub fn compile_with_check(
    comprehension: Comprehension,
    env: &Environment,
    check: &dyn GrammarCheck,
) -> Result<String, CompileError> {
    ensure_root_scope(&comprehension, env)?;
    let normalized = normalize::normalize(comprehension, env)?;
    let expression = emit::emit(&normalized, env);
    debug!(query = %expression, "emitted query");
    validate::validate(&expression, check)?;
    Ok(expression)
}

fn ensure_root_scope(comprehension: &Comprehension, env: &Environment) -> Result<(), CompileError> {
    let Some(first) = comprehension.clauses.first() else {
        return Err(CompileError::ScopeViolation {
            found: "comprehension has no clauses".to_string(),
        });
    };
    if ast::is_root_source(&first.source, env) {
        return Ok(());
    }
    let found = match &first.source {
        Expr::Ident(id) => format!("outer clause iterates `{id}`"),
        other => format!("outer clause iterates {}", other.kind_name()),
    };
    Err(CompileError::ScopeViolation { found })
}
