use crate::formula::lexer::ParseError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read the formula: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// More free variables than the search is allowed to enumerate.
    #[error("the formula has {count} free variables, the limit is {limit}")]
    TooManyVariables { count: usize, limit: usize },
}
