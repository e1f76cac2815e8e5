//! Error taxonomy for compilation and document queries.

use thiserror::Error;

/// A failed compilation. Every variant is terminal for the call; nothing is
/// retried or downgraded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// The tree contains a shape no pass can interpret.
    #[error("unsupported construct: {detail}")]
    UnsupportedConstruct {
        /// What was encountered, in input terms.
        detail: String,
    },

    /// The outermost clause does not iterate the document root.
    #[error("only root-level comprehensions are supported ({found})")]
    ScopeViolation {
        /// What the outermost clause iterates instead.
        found: String,
    },

    /// The grammar check rejected the emitted string. Signals a defect in
    /// normalization or emission rather than a caller mistake.
    #[error("generated query `{query}` failed the grammar check: {reason}")]
    InvalidQuerySyntax {
        /// The rejected query text.
        query: String,
        /// The checker's diagnostic.
        reason: String,
    },
}

impl CompileError {
    pub(crate) fn unsupported(detail: impl Into<String>) -> Self {
        CompileError::UnsupportedConstruct { detail: detail.into() }
    }
}

/// A failed document query: compilation failed, the document handle cannot
/// run path queries, or the backing engine reported an evaluation error.
#[derive(Error, Debug)]
pub enum QueryError {
    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error("unsupported document type: {0}")]
    UnsupportedDocument(String),

    #[error("query evaluation failed: {0}")]
    Backend(String),
}

#[cfg(test)]
mod tests {
    use super::{CompileError, QueryError};

    #[test]
    fn messages_carry_the_diagnostic_payload() {
        let error = CompileError::InvalidQuerySyntax {
            query: "//div[@id=('a', 'b')]".to_string(),
            reason: "expected value".to_string(),
        };
        let rendered = error.to_string();
        assert!(rendered.contains("//div[@id=('a', 'b')]"));
        assert!(rendered.contains("expected value"));
    }

    #[test]
    fn compile_errors_convert_into_query_errors() {
        let compile = CompileError::unsupported("call to `sorted`");
        let query = QueryError::from(compile.clone());
        assert_eq!(query.to_string(), compile.to_string());
    }
}
