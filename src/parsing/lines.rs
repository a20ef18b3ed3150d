//! Classification of raw script lines.
//!
//! Every line of a script plays exactly one lexical role. The test markers
//! hide inside SQL comments so that an annotated script remains runnable by
//! any ordinary client; we only ever look at one line at a time, and a line's
//! classification never depends on its neighbours.

use crate::compile;

/// The lexical role a single line of the script plays.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LineKind {
    Plain,       // ordinary text, almost always SQL
    StartMarker, // a comment carrying the START_TEST token
    EndMarker,   // a comment carrying the END_TEST token
    Comment,     // any other comment line
}

/// A raw line together with its classification. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedLine {
    pub text: String,
    pub kind: LineKind,
}

/// Classify one line of text. The patterns are checked in precedence order;
/// a line that could be read as both a start and an end marker is a start
/// marker.
pub fn classify(text: &str) -> ClassifiedLine {
    let kind = if compile!(r"^\s*(--)*\s*START_TEST(.*)").is_match(text)
        || compile!(r"^\s*/\*\s*START_TEST(.*)").is_match(text)
    {
        LineKind::StartMarker
    } else if compile!(r"^\s*(--)*\s*END_TEST(.*)").is_match(text)
        || compile!(r"(.*)END_TEST$").is_match(text)
    {
        LineKind::EndMarker
    } else if compile!(r"\s*\*/").is_match(text) || compile!(r"^\s*--+(.*)").is_match(text) {
        LineKind::Comment
    } else {
        LineKind::Plain
    };

    ClassifiedLine {
        text: text.to_owned(),
        kind,
    }
}
