//! Error and result types for the pattern-language front end.
//!
//! Only two things are real errors here (spec §7): a pattern string that
//! does not match the grammar, and a caller passing both `start_id` and
//! `start_ids` to a query call. Every other logical misuse — unknown
//! identifiers, absent properties, unsatisfiable hop bounds — is handled
//! by producing an empty result, never by returning `Err`.

use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// The pattern text does not match the grammar (spec §4.2, §7).
    Parse {
        message: String,
        line: usize,
        column: usize,
    },
    /// Both `start_id` and `start_ids` were supplied to a query call
    /// (spec §4.7, §7).
    InvalidArgument(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Parse {
                message,
                line,
                column,
            } => write!(f, "parse error at {line}:{column}: {message}"),
            Error::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
        }
    }
}

impl std::error::Error for Error {}
