//! Parsing of annotated SQL scripts into instruction and statement groups.

use std::fmt;
use std::path::Path;

use tracing::debug;

pub mod directives;
pub mod groups;
pub mod lines;

/// Failure to get the script's content off disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadingError {
    pub problem: String,
    pub details: String,
}

impl fmt::Display for LoadingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self
            .details
            .is_empty()
        {
            write!(f, "{}", self.problem)
        } else {
            write!(f, "{}: {}", self.problem, self.details)
        }
    }
}

/// Read a script file and return an owned String for the pipeline to consume.
pub fn load(filename: &Path) -> Result<String, LoadingError> {
    match std::fs::read_to_string(filename) {
        Ok(content) => Ok(content),
        Err(error) => {
            debug!(?error);
            match error.kind() {
                std::io::ErrorKind::NotFound => Err(LoadingError {
                    problem: "File not found".to_string(),
                    details: String::new(),
                }),
                _ => Err(LoadingError {
                    problem: "Failed reading".to_string(),
                    details: error
                        .kind()
                        .to_string(),
                }),
            }
        }
    }
}

/// Classify the script's lines and partition them into ordered groups.
pub fn parse(content: &str) -> Result<Vec<groups::Group>, groups::GroupingError> {
    let classified: Vec<_> = content
        .lines()
        .map(lines::classify)
        .collect();

    let count = classified.len();
    let groups = groups::collect(classified)?;

    debug!("{} lines in {} groups", count, groups.len());

    Ok(groups)
}
