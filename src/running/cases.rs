//! Assembly of expected/actual pairs from the ordered group list.

use tracing::debug;

use crate::parsing::directives;
use crate::parsing::groups::{Group, GroupKind};
use crate::running::{Executor, RunningError};
use crate::Table;

/// One verifiable unit: what a statement actually returned, alongside what
/// the script declared it should return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    pub name: Option<String>,
    pub expected: Table,
    pub actual: Table,
}

/// A case under construction. Either side may be filled first; the case is
/// complete the moment both are. An empty table is a legitimate value, which
/// is why "not yet filled" needs its own representation.
#[derive(Debug, Default)]
struct PendingCase {
    name: Option<String>,
    expected: Option<Table>,
    actual: Option<Table>,
}

impl PendingCase {
    fn complete(&mut self) -> Option<TestCase> {
        if self
            .expected
            .is_some()
            && self
                .actual
                .is_some()
        {
            Some(TestCase {
                name: self
                    .name
                    .take(),
                expected: self
                    .expected
                    .take()
                    .unwrap_or_default(),
                actual: self
                    .actual
                    .take()
                    .unwrap_or_default(),
            })
        } else {
            None
        }
    }
}

/// Walk the groups in source order, filling the expected side of the current
/// case from instruction blocks and the actual side from executed statement
/// blocks, in whichever order the script interleaves them. A completed case
/// is emitted immediately and a fresh one begins; a case left half-filled
/// when the groups run out is dropped.
pub async fn assemble<E: Executor>(
    groups: &[Group],
    executor: &E,
) -> Result<Vec<TestCase>, RunningError> {
    let mut cases = Vec::new();
    let mut pending = PendingCase::default();

    for group in groups {
        match group.kind {
            GroupKind::Instructions => {
                let directive =
                    directives::extract(group).map_err(RunningError::Directive)?;

                if pending
                    .expected
                    .is_some()
                {
                    return Err(RunningError::UnexpectedInstructions);
                }

                pending.name = directive.name;
                pending.expected = Some(directive.table);
            }
            GroupKind::Statement => {
                let sql = rebuild_query(group);
                debug!("executing statement of {} lines", group.lines.len());

                let table = executor
                    .query(&sql)
                    .await
                    .map_err(RunningError::Execution)?;

                if pending
                    .actual
                    .is_some()
                {
                    return Err(RunningError::UnexpectedStatement);
                }

                pending.actual = Some(table);
            }
            GroupKind::Unresolved => return Err(RunningError::UnexpectedGroup),
        }

        if let Some(case) = pending.complete() {
            cases.push(case);
            pending = PendingCase::default();
        }
    }

    debug!("{} cases assembled", cases.len());

    Ok(cases)
}

/// The statement forwarded to the database is the group's lines rejoined
/// verbatim, comments included.
fn rebuild_query(group: &Group) -> String {
    let mut sql = String::new();
    for line in &group.lines {
        sql.push_str(&line.text);
        sql.push('\n');
    }
    sql
}
