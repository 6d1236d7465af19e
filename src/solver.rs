use crate::ir::{execute, Environment, Operation};
use crate::SatResult;
use log::{debug, trace};
use rayon::prelude::*;
use std::sync::atomic::{AtomicU64, Ordering};

/// Exhaustive search over the assignments of a lowered program's variables.
///
/// Candidate `i` gives the `j`-th variable (in the environment's order, which
/// is the order variables were first met during lowering) the value of bit `j`
/// of `i`. Candidates are tried from `0` to `2^k - 1` and the first one that
/// makes the program return `true` wins. This takes exponential time in the
/// number of variables; there is no propagation or learning.
pub struct Solver<'a> {
    program: &'a [Operation],
    base: Environment,
    variables: Vec<String>,
    parallel: bool,
    evaluations: u64,
}

impl<'a> Solver<'a> {
    pub fn new(program: &'a [Operation], base: Environment) -> Self {
        let variables: Vec<String> = base.names().map(String::from).collect();
        assert!(
            variables.len() < 64,
            "cannot enumerate the assignments of {} variables",
            variables.len()
        );
        Self {
            program,
            base,
            variables,
            parallel: false,
            evaluations: 0,
        }
    }

    /// Spread the candidates over rayon's thread pool. The model found is the
    /// same as for the sequential search.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Number of times the program was executed by the last [`solve`](Self::solve).
    pub fn evaluations(&self) -> u64 {
        self.evaluations
    }

    pub fn num_candidates(&self) -> u64 {
        1 << self.variables.len()
    }

    fn candidate(variables: &[String], i: u64) -> Environment {
        let mut env = Environment::default();
        for (j, name) in variables.iter().enumerate() {
            env.set(name, i >> j & 1 == 1);
        }
        env
    }

    pub fn solve(&mut self) -> SatResult {
        debug!(
            "searching {} candidates over {} variables",
            self.num_candidates(),
            self.variables.len()
        );
        let found = if self.parallel {
            self.search_parallel()
        } else {
            self.search()
        };
        debug!("{} evaluations", self.evaluations);

        match found {
            Some(env) => SatResult::Satisfiable(env),
            None => SatResult::Unsatisfiable,
        }
    }

    fn search(&mut self) -> Option<Environment> {
        self.evaluations = 0;
        for i in 0..self.num_candidates() {
            trace!("candidate {}", i);
            let mut env = Self::candidate(&self.variables, i);
            self.evaluations += 1;
            if execute(self.program, &mut env) {
                trace!("candidate {} satisfies", i);
                return Some(env);
            }
        }
        None
    }

    fn search_parallel(&mut self) -> Option<Environment> {
        let evaluations = AtomicU64::new(0);
        let program = self.program;
        let variables = &self.variables;

        let found = (0..self.num_candidates())
            .into_par_iter()
            .map(|i| {
                trace!("candidate {}", i);
                let mut env = Self::candidate(variables, i);
                evaluations.fetch_add(1, Ordering::Relaxed);
                let satisfied = execute(program, &mut env);
                (env, satisfied)
            })
            .find_first(|(_, satisfied)| *satisfied)
            .map(|(env, _)| env);

        self.evaluations = evaluations.into_inner();
        found
    }

    /// Gives back the environment the solver was created with.
    pub fn into_base(self) -> Environment {
        self.base
    }
}

/// Searches for an assignment that makes `program` return `true`.
///
/// Returns the satisfying environment and `true`, or `base` unchanged and
/// `false` if there is none.
pub fn solve(program: &[Operation], base: Environment) -> (Environment, bool) {
    let mut solver = Solver::new(program, base);
    match solver.solve() {
        SatResult::Satisfiable(env) => (env, true),
        SatResult::Unsatisfiable => (solver.into_base(), false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brute_force::solve_brute_force;
    use crate::formula::lexer::tokenize;
    use crate::formula::parser::parse;
    use crate::formula::{expression_strategy, Expression};
    use crate::ir::lower;
    use crate::optimize::optimize;
    use proptest::prelude::*;
    use test_env_log::test;

    fn compile(text: &str) -> (Expression, Vec<Operation>, Environment) {
        let expr = parse(&tokenize(text).expect("failed to tokenize")).expect("failed to parse");
        let (program, env) = lower(&optimize(expr.clone()));
        (expr, program, env)
    }

    #[test]
    fn solve_contradiction() {
        let (_, program, env) = compile("A AND NOT A");
        assert!(env.is_empty());
        let mut solver = Solver::new(&program, env.clone());
        assert_eq!(solver.solve(), SatResult::Unsatisfiable);
        assert_eq!(solver.evaluations(), 1);
        assert_eq!(solve(&program, env.clone()), (env, false));
    }

    #[test]
    fn solve_tautology() {
        let (_, program, env) = compile("A OR NOT A");
        let mut solver = Solver::new(&program, env);
        match solver.solve() {
            SatResult::Satisfiable(model) => assert_eq!(model.free_variables().count(), 0),
            SatResult::Unsatisfiable => panic!("expected a model"),
        }
        assert_eq!(solver.evaluations(), 1);
    }

    #[test]
    fn solve_grouped_or() {
        let (expr, program, env) = compile("(A OR B) AND NOT A");
        let (model, sat) = solve(&program, env);
        assert!(sat);
        assert!(expr.eval(&model));
        assert!(!model.get("A"));
        assert!(model.get("B"));
    }

    #[test]
    fn solve_duplicates() {
        let (expr, program, env) = compile("A AND B AND A");
        assert_eq!(env.names().collect::<Vec<_>>(), vec!["A", "B"]);
        let mut solver = Solver::new(&program, env);
        match solver.solve() {
            SatResult::Satisfiable(model) => assert!(expr.eval(&model)),
            SatResult::Unsatisfiable => panic!("expected a model"),
        }
        // A = B = true is the last candidate
        assert_eq!(solver.evaluations(), 4);
    }

    #[test]
    fn first_model_in_enumeration_order() {
        // A OR B: candidate 1 sets only A
        let (_, program, env) = compile("A OR B");
        let (model, sat) = solve(&program, env);
        assert!(sat);
        assert_eq!(model.free_variables().collect::<Vec<_>>(), vec![("A", true), ("B", false)]);
    }

    #[test]
    fn model_keeps_temporaries() {
        let (_, program, env) = compile("A AND NOT B");
        let (model, sat) = solve(&program, env);
        assert!(sat);
        assert!(model.names().any(crate::ir::is_temporary));
        assert_eq!(model.free_variables().collect::<Vec<_>>(), vec![("A", true), ("B", false)]);
    }

    #[test]
    fn unsat_tries_every_candidate() {
        let (_, program, env) = compile("(A OR B) AND NOT A AND NOT B");
        let mut solver = Solver::new(&program, env);
        assert_eq!(solver.solve(), SatResult::Unsatisfiable);
        assert_eq!(solver.evaluations(), 4);
    }

    #[test]
    fn parallel_finds_same_model() {
        let (_, program, env) = compile("(A OR B OR C) AND NOT (A AND C) AND (C OR D)");
        let sequential = Solver::new(&program, env.clone()).solve();
        let parallel = Solver::new(&program, env).parallel(true).solve();
        assert!(sequential.is_satisfiable());
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn parallel_unsat() {
        let (_, program, env) = compile("(A OR B) AND NOT A AND NOT B");
        let mut solver = Solver::new(&program, env).parallel(true);
        assert_eq!(solver.solve(), SatResult::Unsatisfiable);
        assert_eq!(solver.evaluations(), 4);
    }

    proptest! {
        #[test]
        fn proptest_solve(e in expression_strategy()) {
            let brute_force = solve_brute_force(&e);
            let (program, env) = lower(&optimize(e.clone()));
            let (model, sat) = solve(&program, env);
            log::trace!("{} => {}", e, sat);
            prop_assert_eq!(sat, brute_force.is_satisfiable());
            if sat {
                prop_assert!(e.eval(&model));
            }
        }

        #[test]
        fn proptest_parallel_matches_sequential(e in expression_strategy()) {
            let (program, env) = lower(&optimize(e));
            let sequential = Solver::new(&program, env.clone()).solve();
            let parallel = Solver::new(&program, env).parallel(true).solve();
            prop_assert_eq!(sequential, parallel);
        }
    }
}
