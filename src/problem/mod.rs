// Program wide top-level error handling

use std::fmt;

use owo_colors::OwoColorize;

use crate::database::CredentialsError;
use crate::parsing::groups::GroupingError;
use crate::parsing::LoadingError;
use crate::running::{ExecutionError, RunningError};

/// Everything that can stop a script run, tagged by the stage that failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Problem {
    Loading(LoadingError),
    Grouping(GroupingError),
    Running(RunningError),
    Credentials(CredentialsError),
    Connection(ExecutionError),
}

impl Problem {
    pub fn stage(&self) -> &'static str {
        match self {
            Problem::Loading(_) => "loading",
            Problem::Grouping(_) => "parsing",
            Problem::Running(_) => "running",
            Problem::Credentials(_) => "environment",
            Problem::Connection(_) => "database",
        }
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Problem::Loading(error) => write!(f, "{}", error),
            Problem::Grouping(error) => write!(f, "unable to group script: {}", error),
            Problem::Running(error) => write!(f, "{}", error),
            Problem::Credentials(error) => write!(f, "{}", error),
            Problem::Connection(error) => write!(f, "{}", error),
        }
    }
}

/// Concise single-line rendering for the terminal.
pub fn render(problem: &Problem) -> String {
    format!(
        "{}: [{}] {}",
        "error".bright_red(),
        problem.stage(),
        problem
    )
}
