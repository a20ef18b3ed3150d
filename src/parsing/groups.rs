//! Grouping of classified lines into instruction and statement blocks.
//!
//! A small automaton walks the line stream and cuts it into contiguous
//! groups. The current group kind starts out undetermined and is resolved by
//! the first marker or plain line seen; a group that closes while still
//! undetermined is kept as `Unresolved` and rejected later, when the runner
//! discovers it has no use for it.

use std::fmt;
use std::mem;

use crate::parsing::lines::{ClassifiedLine, LineKind};

/// What a contiguous run of lines is for.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GroupKind {
    Unresolved,   // closed before any marker or statement line was seen
    Instructions, // between a start and an end marker; declares expected data
    Statement,    // literal SQL to forward to the database
}

impl fmt::Display for GroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKind::Unresolved => write!(f, "Unresolved"),
            GroupKind::Instructions => write!(f, "Instructions"),
            GroupKind::Statement => write!(f, "Statement"),
        }
    }
}

/// A contiguous run of lines, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub kind: GroupKind,
    pub lines: Vec<ClassifiedLine>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupingError {
    StartInsideInstructions,
    EndInsideStatement,
}

impl GroupingError {
    pub fn message(&self) -> String {
        match self {
            GroupingError::StartInsideInstructions => {
                "start marker inside an instructions block".to_string()
            }
            GroupingError::EndInsideStatement => {
                "end marker inside a statement block".to_string()
            }
        }
    }
}

impl fmt::Display for GroupingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

/// Partition the classified line stream into ordered groups.
pub fn collect(lines: Vec<ClassifiedLine>) -> Result<Vec<Group>, GroupingError> {
    let mut groups = Vec::new();
    let mut buffer: Vec<ClassifiedLine> = Vec::new();
    let mut state = GroupKind::Unresolved;

    for line in lines {
        match state {
            GroupKind::Unresolved => match line.kind {
                LineKind::Plain => {
                    buffer.push(line);
                    state = GroupKind::Statement;
                }
                LineKind::StartMarker => {
                    buffer.push(line);
                    state = GroupKind::Instructions;
                }
                LineKind::EndMarker => {
                    // the lone end marker: close what we have, still
                    // unresolved, and let the runner refuse it.
                    buffer.push(line);
                    groups.push(Group {
                        kind: state,
                        lines: mem::take(&mut buffer),
                    });
                }
                LineKind::Comment => buffer.push(line),
            },
            GroupKind::Instructions => match line.kind {
                LineKind::Plain | LineKind::Comment => buffer.push(line),
                LineKind::StartMarker => {
                    return Err(GroupingError::StartInsideInstructions);
                }
                LineKind::EndMarker => {
                    buffer.push(line);
                    groups.push(Group {
                        kind: state,
                        lines: mem::take(&mut buffer),
                    });
                    state = GroupKind::Unresolved;
                }
            },
            GroupKind::Statement => match line.kind {
                LineKind::Plain | LineKind::Comment => buffer.push(line),
                LineKind::StartMarker => {
                    // the marker belongs to the next group, not this one
                    groups.push(Group {
                        kind: state,
                        lines: mem::take(&mut buffer),
                    });
                    buffer.push(line);
                    state = GroupKind::Instructions;
                }
                LineKind::EndMarker => {
                    return Err(GroupingError::EndInsideStatement);
                }
            },
        }
    }

    if !buffer.is_empty() {
        groups.push(Group {
            kind: state,
            lines: buffer,
        });
    }

    Ok(groups)
}
