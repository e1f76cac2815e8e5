//! Grammar gate for emitted queries.

use pest::Parser;

use crate::error::CompileError;

#[derive(pest_derive::Parser)]
#[grammar = "xpath1.pest"]
struct SubsetParser;

/// Syntax check for compiled queries.
///
/// The built-in implementation is [`SubsetGrammar`]; a caller integrating a
/// real query engine can substitute that engine's own parser so nothing the
/// engine would reject ever leaves the compiler.
pub trait GrammarCheck {
    /// Returns the reason `query` is not well-formed, if it is not.
    fn check(&self, query: &str) -> Result<(), String>;
}

/// Checks against the exact subset the emitter is allowed to produce.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubsetGrammar;

impl GrammarCheck for SubsetGrammar {
    fn check(&self, query: &str) -> Result<(), String> {
        match SubsetParser::parse(Rule::xpath, query) {
            Ok(_) => Ok(()),
            Err(error) => Err(reason(&error)),
        }
    }
}

fn reason(error: &pest::error::Error<Rule>) -> String {
    let column = match error.line_col {
        pest::error::LineColLocation::Pos((_, column)) => column,
        pest::error::LineColLocation::Span((_, column), _) => column,
    };
    format!("{} at column {column}", error.variant.message())
}

/// Runs the grammar check, turning a rejection into the compile failure
/// carrying the offending query.
pub(crate) fn validate(query: &str, check: &dyn GrammarCheck) -> Result<(), CompileError> {
    check
        .check(query)
        .map_err(|reason| CompileError::InvalidQuerySyntax { query: query.to_string(), reason })
}
