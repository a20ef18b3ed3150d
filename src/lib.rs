//! Embedded expected-result assertions for SQL scripts.
//!
//! A script is read line by line, partitioned into instruction blocks and
//! statement blocks, and each statement's live result set is verified against
//! the expectation its instruction block declared.

pub mod comparing;
pub mod database;
pub mod parsing;
pub mod problem;
pub mod running;

/// A result table: an ordered sequence of rows of string cells. Rows are not
/// required to be rectangular until comparison time.
pub type Table = Vec<Vec<String>>;

/// Compile a regular expression once and cache it for subsequent calls.
#[macro_export]
macro_rules! compile {
    ($pattern:expr) => {{
        use std::sync::OnceLock;
        static REGEX: OnceLock<regex::Regex> = OnceLock::new();
        REGEX.get_or_init(|| regex::Regex::new($pattern).unwrap_or_else(|e| panic!("{}", e)))
    }};
}
