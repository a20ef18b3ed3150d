//! Execution of statement groups and assembly of test cases.

use std::fmt;

use crate::parsing::directives::DirectiveError;
use crate::Table;

pub mod cases;

/// Failure inside the database collaborator while running a statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionError {
    pub problem: String,
    pub details: String,
}

impl fmt::Display for ExecutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.problem, self.details)
    }
}

/// The capability to run one SQL string against the database under test.
///
/// The result set comes back fully materialized, every column already
/// rendered to its display string; nothing database-flavored crosses this
/// boundary. Whether and how to retry a failed statement is entirely the
/// implementation's business.
#[allow(async_fn_in_trait)]
pub trait Executor {
    async fn query(&self, sql: &str) -> Result<Table, ExecutionError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunningError {
    UnexpectedInstructions,
    UnexpectedStatement,
    UnexpectedGroup,
    Directive(DirectiveError),
    Execution(ExecutionError),
}

impl RunningError {
    pub fn message(&self) -> String {
        match self {
            RunningError::UnexpectedInstructions => {
                "unexpected instructions block: expected rows already declared".to_string()
            }
            RunningError::UnexpectedStatement => {
                "unexpected statement: results already captured".to_string()
            }
            RunningError::UnexpectedGroup => "unexpected group kind".to_string(),
            RunningError::Directive(error) => {
                format!("unable to extract instructions: {}", error)
            }
            RunningError::Execution(error) => {
                format!("unable to query: {}", error)
            }
        }
    }
}

impl fmt::Display for RunningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}
