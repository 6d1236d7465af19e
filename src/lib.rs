pub mod error;
pub mod formula;
pub mod ir;
pub mod optimize;
mod options;
mod solver;

#[cfg(test)]
mod brute_force;

pub use error::Error;
pub use formula::lexer::{tokenize, ParseError, Token, TokenKind};
pub use formula::parser::{parse, Parsed, Parser, MAX_NESTING_DEPTH};
pub use formula::Expression;
pub use ir::{execute, lower, Environment, OpKind, Operation};
pub use optimize::optimize;
pub use options::{Options, MAX_SEARCH_VARIABLES};
pub use solver::{solve, Solver};

#[derive(PartialEq, Clone, Debug)]
pub enum SatResult {
    /// The first satisfying assignment found, including the temporaries the
    /// program computed under it.
    Satisfiable(Environment),
    Unsatisfiable,
}

impl SatResult {
    pub fn is_satisfiable(&self) -> bool {
        matches!(self, SatResult::Satisfiable(_))
    }
}

/// A formula ready for the search.
#[derive(Debug)]
pub struct Compiled {
    /// The tree that was lowered: optimized unless disabled in the options.
    pub expr: Expression,
    pub program: Vec<Operation>,
    /// Free variables of the program, all `false`.
    pub environment: Environment,
}

/// Tokenizes, parses, optimizes and lowers `input`.
pub fn compile(input: &str, options: &Options) -> Result<Compiled, Error> {
    let tokens = tokenize(input)?;
    let mut expr = parse(&tokens)?;
    if options.optimize {
        expr = optimize(expr);
    }
    let (program, environment) = lower(&expr);

    let limit = options.variable_limit();
    if environment.len() > limit {
        return Err(Error::TooManyVariables {
            count: environment.len(),
            limit,
        });
    }

    Ok(Compiled {
        expr,
        program,
        environment,
    })
}

/// Decides whether `input` is satisfiable.
pub fn check(input: &str, options: &Options) -> Result<SatResult, Error> {
    let compiled = compile(input, options)?;
    let mut solver = Solver::new(&compiled.program, compiled.environment).parallel(options.parallel);
    Ok(solver.solve())
}
