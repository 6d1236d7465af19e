use crate::*;

/// Every assignment of `names`, in the same order as the solver: the `j`-th
/// name takes bit `j` of the candidate index.
pub(crate) fn assignments<'a>(names: &'a [&'a str]) -> impl Iterator<Item = Environment> + 'a {
    assert!(names.len() <= 16); // just for safety

    (0..1u32 << names.len()).map(move |i| {
        let mut env = Environment::default();
        for (j, name) in names.iter().enumerate() {
            env.set(name, i >> j & 1 == 1);
        }
        env
    })
}

// Simple brute-force evaluation of the formula tree, for checking the
// optimizer, the lowering and the solver against
pub(crate) fn solve_brute_force(expr: &Expression) -> SatResult {
    let names = expr.variables();
    let result = match assignments(&names).find(|env| expr.eval(env)) {
        Some(env) => SatResult::Satisfiable(env),
        None => SatResult::Unsatisfiable,
    };
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_env_log::test;

    fn v(name: &str) -> Expression {
        Expression::var(name)
    }

    #[test]
    fn assignments_count_up() {
        let all: Vec<Vec<bool>> = assignments(&["A", "B"])
            .map(|env| vec![env.get("A"), env.get("B")])
            .collect();
        assert_eq!(
            all,
            vec![vec![false, false], vec![true, false], vec![false, true], vec![true, true]]
        );
        assert_eq!(assignments(&[]).count(), 1);
    }

    #[test]
    fn solve_with_owned_names() {
        // the names live only inside `solve_brute_force`
        let e = Expression::and(v("A"), v("B"));
        match solve_brute_force(&e) {
            SatResult::Satisfiable(env) => assert!(env.get("A") && env.get("B")),
            SatResult::Unsatisfiable => panic!("expected a model"),
        }
    }

    #[test]
    fn solve_sat() {
        // (A OR B) AND NOT A
        let e = Expression::and(Expression::paren(Expression::or(v("A"), v("B"))), Expression::not(v("A")));
        match solve_brute_force(&e) {
            SatResult::Satisfiable(env) => {
                assert!(!env.get("A"));
                assert!(env.get("B"));
            }
            SatResult::Unsatisfiable => panic!("expected a model"),
        }
    }

    #[test]
    fn solve_unsat() {
        let e = Expression::and(v("A"), Expression::not(v("A")));
        assert_eq!(solve_brute_force(&e), SatResult::Unsatisfiable);
    }

    #[test]
    fn solve_constants() {
        assert!(solve_brute_force(&Expression::constant(true)).is_satisfiable());
        assert!(!solve_brute_force(&Expression::constant(false)).is_satisfiable());
    }
}
