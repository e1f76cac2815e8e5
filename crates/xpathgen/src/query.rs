//! Evaluating comprehensions against a live document.

use tracing::debug;

use crate::ast::{Comprehension, Environment};
use crate::error::QueryError;

/// A document handle a compiled query runs against.
///
/// The query arrives prefixed with `.`, scoping it to the node the handle
/// represents; a handle for a whole document treats that node as the root.
/// A handle whose backing cursor is already exhausted returns an empty
/// vector rather than an error. A handle with no path-query facility fails
/// with [`QueryError::UnsupportedDocument`].
pub trait DocumentTarget {
    /// The node type evaluation produces.
    type Node;

    fn evaluate_scoped(&self, query: &str) -> Result<Vec<Self::Node>, QueryError>;
}

/// Compiles `comprehension` and evaluates it against `target`, scoped to
/// the target's node.
pub fn query<T: DocumentTarget>(
    target: &T,
    comprehension: Comprehension,
    env: &Environment,
) -> Result<Vec<T::Node>, QueryError> {
    let expression = crate::compile(comprehension, env)?;
    let scoped = format!(".{expression}");
    debug!(query = %scoped, "evaluating against document target");
    target.evaluate_scoped(&scoped)
}
