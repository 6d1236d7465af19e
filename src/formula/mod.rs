mod expr;
pub mod lexer;
pub mod parser;

pub use expr::{Expression, FALSE, TRUE};

#[cfg(test)]
pub(crate) use expr::expression_strategy;
