use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Arg, Command};
use owo_colors::OwoColorize;

use sqlassay::comparing;
use sqlassay::database::client::Database;
use sqlassay::database::retry::Retry;
use sqlassay::database::Credentials;
use sqlassay::parsing;
use sqlassay::parsing::groups::GroupKind;
use sqlassay::problem::{render, Problem};
use sqlassay::running::cases::{self, TestCase};
use sqlassay::running::RunningError;

#[tokio::main]
async fn main() -> ExitCode {
    const VERSION: &str = concat!("v", env!("CARGO_PKG_VERSION"));

    tracing_subscriber::fmt::init();

    let matches = Command::new("sqlassay")
        .version(VERSION)
        .propagate_version(true)
        .author("Adrien Kiren")
        .about("Verify annotated SQL scripts against a live database.")
        .disable_help_subcommand(true)
        .subcommand(
            Command::new("run")
                .about("Execute the script's statements and verify each declared expectation")
                .arg(
                    Arg::new("filename")
                        .required(false)
                        .help("The annotated SQL script to run. Falls back to the SQL_FILE environment variable."),
                ),
        )
        .subcommand(
            Command::new("check")
                .about("Validate the script's annotations without touching a database")
                .arg(
                    Arg::new("filename")
                        .required(true)
                        .help("The annotated SQL script to check."),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("run", submatches)) => {
            let filename = match submatches.get_one::<String>("filename") {
                Some(filename) => PathBuf::from(filename),
                None => match std::env::var("SQL_FILE") {
                    Ok(value) if !value.is_empty() => PathBuf::from(value),
                    _ => {
                        eprintln!(
                            "{}: no script given and SQL_FILE is not set",
                            "error".bright_red()
                        );
                        return ExitCode::FAILURE;
                    }
                },
            };
            match run(&filename).await {
                Ok(cases) => report(&cases),
                Err(problem) => {
                    eprintln!("{}", render(&problem));
                    ExitCode::FAILURE
                }
            }
        }
        Some(("check", submatches)) => {
            let Some(filename) = submatches.get_one::<String>("filename") else {
                return ExitCode::FAILURE;
            };
            match check(Path::new(filename)) {
                Ok((blocks, statements)) => {
                    println!(
                        "{}: {} instruction blocks, {} statements",
                        "ok".bright_green(),
                        blocks,
                        statements
                    );
                    ExitCode::SUCCESS
                }
                Err(problem) => {
                    eprintln!("{}", render(&problem));
                    ExitCode::FAILURE
                }
            }
        }
        _ => {
            println!("usage: sqlassay [COMMAND] ...");
            println!("Try '--help' for more information.");
            ExitCode::FAILURE
        }
    }
}

/// Parse the script, connect, and execute every statement group in source
/// order, producing the completed test cases.
async fn run(filename: &Path) -> Result<Vec<TestCase>, Problem> {
    let content = parsing::load(filename).map_err(Problem::Loading)?;
    let groups = parsing::parse(&content).map_err(Problem::Grouping)?;

    let credentials = Credentials::from_env().map_err(Problem::Credentials)?;
    let database = Database::connect(&credentials, Retry::default())
        .await
        .map_err(Problem::Connection)?;

    cases::assemble(&groups, &database)
        .await
        .map_err(Problem::Running)
}

/// Validate the script's structure and every instruction block, without a
/// database in sight.
fn check(filename: &Path) -> Result<(usize, usize), Problem> {
    let content = parsing::load(filename).map_err(Problem::Loading)?;
    let groups = parsing::parse(&content).map_err(Problem::Grouping)?;

    let mut blocks = 0;
    let mut statements = 0;

    for group in &groups {
        match group.kind {
            GroupKind::Instructions => {
                parsing::directives::extract(group)
                    .map_err(|error| Problem::Running(RunningError::Directive(error)))?;
                blocks += 1;
            }
            GroupKind::Statement => statements += 1,
            GroupKind::Unresolved => {
                return Err(Problem::Running(RunningError::UnexpectedGroup));
            }
        }
    }

    Ok((blocks, statements))
}

/// One line per case, the way a test harness reports, and a nonzero exit if
/// anything failed.
fn report(cases: &[TestCase]) -> ExitCode {
    let mut failures = 0;

    for (index, case) in cases
        .iter()
        .enumerate()
    {
        let name = match &case.name {
            Some(name) => name.clone(),
            None => format!("case {}", index + 1),
        };

        match comparing::verify(case) {
            Ok(()) => println!("{} {}", "ok".bright_green(), name),
            Err(error) => {
                failures += 1;
                println!("{} {}", "FAILED".bright_red(), name);
                println!("    {}", error);
            }
        }
    }

    println!("{} cases, {} failures", cases.len(), failures);

    if failures == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
