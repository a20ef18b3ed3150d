//! Extraction of the single directive carried by an instructions block.
//!
//! Inside a block, only lines opening with a recognized all-caps keyword
//! matter; everything else is passed over without complaint, which is what
//! lets the markers share space with ordinary commentary.

use std::fmt;
use std::fs::File;
use std::path::Path;

use crate::compile;
use crate::parsing::groups::Group;
use crate::Table;

/// Keywords recognized inside an instructions block.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Keyword {
    StartTest,
    EndTest,
    Count,
    File,
    Row,
}

impl Keyword {
    fn from_token(token: &str) -> Option<Keyword> {
        match token {
            "START_TEST" => Some(Keyword::StartTest),
            "END_TEST" => Some(Keyword::EndTest),
            "COUNT" => Some(Keyword::Count),
            "FILE" => Some(Keyword::File),
            "ROW" => Some(Keyword::Row),
            _ => None,
        }
    }

    /// Only ROW may appear more than once in a block; it accumulates.
    fn repeatable(&self) -> bool {
        matches!(self, Keyword::Row)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::StartTest => "START_TEST",
            Keyword::EndTest => "END_TEST",
            Keyword::Count => "COUNT",
            Keyword::File => "FILE",
            Keyword::Row => "ROW",
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which of the three expectation forms a block declared.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DirectiveKind {
    Count,
    File,
    Row,
}

/// The expected-data declaration extracted from one instructions block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub kind: DirectiveKind,
    pub name: Option<String>,
    pub table: Table,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectiveError {
    Duplicate(Keyword),
    Conflicting(Vec<Keyword>),
    EmptyCount,
    UnreadableFile(String, String), // path, details
    MalformedRecord(String),        // details
    NoneFound,
    MultipleFound,
}

impl DirectiveError {
    pub fn message(&self) -> String {
        match self {
            DirectiveError::Duplicate(keyword) => {
                format!("duplicate instruction: {}", keyword)
            }
            DirectiveError::Conflicting(keywords) => {
                let names: Vec<&str> = keywords
                    .iter()
                    .map(|keyword| keyword.as_str())
                    .collect();
                format!("can't combine {} instructions", names.join(" and "))
            }
            DirectiveError::EmptyCount => "COUNT instruction has no values".to_string(),
            DirectiveError::UnreadableFile(path, details) => {
                format!("unable to open {}: {}", path, details)
            }
            DirectiveError::MalformedRecord(details) => {
                format!("malformed CSV record: {}", details)
            }
            DirectiveError::NoneFound => "no instructions found".to_string(),
            DirectiveError::MultipleFound => "multiple instructions found".to_string(),
        }
    }
}

impl fmt::Display for DirectiveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

/// Extract the one directive an instructions block declares.
///
/// The block's marker lines are consumed for bookkeeping (and the start
/// marker's trailing text becomes the test's name), COUNT/FILE/ROW build the
/// expected table, and any other line is skipped. Exactly one of the three
/// data forms must survive.
pub fn extract(group: &Group) -> Result<Directive, DirectiveError> {
    let mut seen: Vec<Keyword> = Vec::new();
    let mut name: Option<String> = None;
    let mut found: Vec<(DirectiveKind, Table)> = Vec::new();
    let mut rows: Table = Vec::new();

    for line in &group.lines {
        let captures = match compile!(r"^\s*(-{2,}|/\*|\s*)*\s*([A-Z_]+)(.*)$").captures(&line.text)
        {
            Some(captures) => captures,
            None => continue,
        };

        let keyword = match Keyword::from_token(&captures[2]) {
            Some(keyword) => keyword,
            None => continue,
        };
        let content = &captures[3];

        if seen.contains(&keyword) {
            if !keyword.repeatable() {
                return Err(DirectiveError::Duplicate(keyword));
            }
        } else {
            seen.push(keyword);
        }

        match keyword {
            Keyword::StartTest => {
                let title = content.trim();
                if !title.is_empty() {
                    name = Some(title.to_owned());
                }
            }
            Keyword::EndTest => {}
            Keyword::Count => {
                found.push((DirectiveKind::Count, count_table(content)?));
            }
            Keyword::File => {
                found.push((DirectiveKind::File, read_expected_file(content.trim())?));
            }
            Keyword::Row => {
                rows.push(parse_record(content.trim())?);
            }
        }
    }

    if !rows.is_empty() {
        found.push((DirectiveKind::Row, rows));
    }

    check_exclusive(&seen)?;

    match found.len() {
        0 => Err(DirectiveError::NoneFound),
        1 => {
            let (kind, table) = found.remove(0);
            Ok(Directive { kind, name, table })
        }
        _ => Err(DirectiveError::MultipleFound),
    }
}

/// COUNT, FILE and ROW each describe the whole expected table, so at most one
/// of them may appear in a block.
fn check_exclusive(seen: &[Keyword]) -> Result<(), DirectiveError> {
    let conflicting: Vec<Keyword> = [Keyword::Row, Keyword::File, Keyword::Count]
        .into_iter()
        .filter(|keyword| seen.contains(keyword))
        .collect();

    if conflicting.len() > 1 {
        return Err(DirectiveError::Conflicting(conflicting));
    }

    Ok(())
}

/// Each whitespace-separated token becomes its own one-cell row.
fn count_table(content: &str) -> Result<Table, DirectiveError> {
    let tokens: Vec<&str> = content
        .split_whitespace()
        .collect();

    if tokens.is_empty() {
        return Err(DirectiveError::EmptyCount);
    }

    Ok(tokens
        .into_iter()
        .map(|token| vec![token.to_owned()])
        .collect())
}

/// One CSV record. Quoting is lenient: a stray quote inside a field does not
/// abort the parse.
fn parse_record(content: &str) -> Result<Vec<String>, DirectiveError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    match reader
        .records()
        .next()
    {
        Some(Ok(record)) => Ok(record
            .iter()
            .map(|cell| cell.to_owned())
            .collect()),
        Some(Err(error)) => Err(DirectiveError::MalformedRecord(error.to_string())),
        None => Err(DirectiveError::MalformedRecord("empty record".to_string())),
    }
}

/// Every record of the named CSV document becomes a row.
fn read_expected_file(path: &str) -> Result<Table, DirectiveError> {
    let file = File::open(Path::new(path))
        .map_err(|error| DirectiveError::UnreadableFile(path.to_owned(), error.to_string()))?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file);

    let mut table = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|error| DirectiveError::MalformedRecord(error.to_string()))?;
        table.push(
            record
                .iter()
                .map(|cell| cell.to_owned())
                .collect(),
        );
    }

    Ok(table)
}
