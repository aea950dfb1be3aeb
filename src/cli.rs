//! Command line arguments

use std::path::PathBuf;
use thiserror::Error;

pub const USAGE: &str = "\
Fetch Finnish apartment sales and dwelling counts per postal code area,
compute turnover (sales / dwellings) and store it in a new SQLite database.

Usage: housing-turnover <DB_PATH>

Arguments:
  <DB_PATH>  Path for the generated SQLite database. It should not exist.

Options:
  -h, --help  Print help

Environment:
  TURNOVER_YEARS  Years to process, e.g. 2013-2019 (default)
  PAAVO_BASE_URL  Base URL of the Paavo dwellings API
  SALES_URL       URL of the apartment sales table
  RUST_LOG        Log filter (default: info)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Run { db_path: PathBuf },
    Help,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CliError {
    #[error("missing required argument <DB_PATH>")]
    MissingPath,

    #[error("unexpected argument {0:?}")]
    UnexpectedArgument(String),

    #[error("unknown option {0:?}")]
    UnknownOption(String),
}

/// Parse arguments, excluding the program name
pub fn parse_args<I>(args: I) -> Result<Command, CliError>
where
    I: IntoIterator<Item = String>,
{
    let mut db_path = None;

    for arg in args {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            option if option.starts_with('-') && option.len() > 1 => {
                return Err(CliError::UnknownOption(arg))
            }
            _ if db_path.is_some() => return Err(CliError::UnexpectedArgument(arg)),
            _ => db_path = Some(PathBuf::from(arg)),
        }
    }

    db_path
        .map(|db_path| Command::Run { db_path })
        .ok_or(CliError::MissingPath)
}
