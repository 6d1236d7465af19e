use crate::ir::Environment;
use indexmap::IndexSet;
use std::fmt::{self, Display, Formatter};

/// Name of the literal that is always true.
pub const TRUE: &str = "1";
/// Name of the literal that is always false.
pub const FALSE: &str = "0";

/// A propositional formula.
///
/// `And`/`Or` are the binary forms built by the parser; `AndList`/`OrList` are
/// the n-ary forms introduced by the optimizer. Equality is structural and
/// positional, so `AndList([A, B]) != AndList([B, A])`.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Expression {
    Not(Box<Expression>),
    And(Box<Expression>, Box<Expression>),
    Or(Box<Expression>, Box<Expression>),
    AndList(Vec<Expression>),
    OrList(Vec<Expression>),
    Paren(Box<Expression>),
    Var(String),
}

// Constructors
impl Expression {
    pub fn var(name: impl Into<String>) -> Self {
        Expression::Var(name.into())
    }

    pub fn constant(value: bool) -> Self {
        Expression::var(if value { TRUE } else { FALSE })
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(arg: Self) -> Self {
        Expression::Not(Box::new(arg))
    }

    pub fn and(lhs: Self, rhs: Self) -> Self {
        Expression::And(Box::new(lhs), Box::new(rhs))
    }

    pub fn or(lhs: Self, rhs: Self) -> Self {
        Expression::Or(Box::new(lhs), Box::new(rhs))
    }

    pub fn and_list(items: impl IntoIterator<Item = Self>) -> Self {
        Expression::AndList(items.into_iter().collect())
    }

    pub fn or_list(items: impl IntoIterator<Item = Self>) -> Self {
        Expression::OrList(items.into_iter().collect())
    }

    pub fn paren(arg: Self) -> Self {
        Expression::Paren(Box::new(arg))
    }
}

impl Expression {
    /// Is this the literal `1` (for `true`) or `0` (for `false`)?
    pub fn is_constant(&self, value: bool) -> bool {
        match self {
            Expression::Var(name) => name == if value { TRUE } else { FALSE },
            _ => false,
        }
    }

    /// Is `self` exactly `Not(other)`?
    pub fn is_negation_of(&self, other: &Expression) -> bool {
        match self {
            Expression::Not(arg) => **arg == *other,
            _ => false,
        }
    }

    /// Evaluates the tree directly, without lowering it.
    ///
    /// Names missing from `env` read as `false`.
    pub fn eval(&self, env: &Environment) -> bool {
        match self {
            Expression::Not(arg) => !arg.eval(env),
            Expression::And(lhs, rhs) => lhs.eval(env) & rhs.eval(env),
            Expression::Or(lhs, rhs) => lhs.eval(env) | rhs.eval(env),
            Expression::AndList(items) => items.iter().fold(true, |acc, e| acc & e.eval(env)),
            Expression::OrList(items) => items.iter().fold(false, |acc, e| acc | e.eval(env)),
            Expression::Paren(arg) => arg.eval(env),
            Expression::Var(name) => env.get(name),
        }
    }

    /// Free variables in order of first occurrence, left to right.
    pub fn variables(&self) -> Vec<&str> {
        fn collect<'a>(e: &'a Expression, seen: &mut IndexSet<&'a str>) {
            match e {
                Expression::Not(arg) | Expression::Paren(arg) => collect(arg, seen),
                Expression::And(lhs, rhs) | Expression::Or(lhs, rhs) => {
                    collect(lhs, seen);
                    collect(rhs, seen);
                }
                Expression::AndList(items) | Expression::OrList(items) => {
                    for item in items {
                        collect(item, seen);
                    }
                }
                Expression::Var(name) => {
                    if name != TRUE && name != FALSE {
                        seen.insert(name);
                    }
                }
            }
        }

        let mut seen = IndexSet::new();
        collect(self, &mut seen);
        seen.into_iter().collect()
    }

    /// Number of nodes in the tree.
    pub fn size(&self) -> usize {
        match self {
            Expression::Not(arg) | Expression::Paren(arg) => 1 + arg.size(),
            Expression::And(lhs, rhs) | Expression::Or(lhs, rhs) => 1 + lhs.size() + rhs.size(),
            Expression::AndList(items) | Expression::OrList(items) => {
                1 + items.iter().map(Expression::size).sum::<usize>()
            }
            Expression::Var(_) => 1,
        }
    }

    fn fmt_tree(&self, f: &mut Formatter, depth: usize) -> fmt::Result {
        if depth > 0 {
            for _ in 1..depth {
                f.write_str("│   ")?;
            }
            f.write_str("└── ")?;
        }
        let children: Vec<&Expression> = match self {
            Expression::Var(name) => return write!(f, "VAR({})", name),
            Expression::Not(arg) => {
                f.write_str("NOT")?;
                vec![&**arg]
            }
            Expression::Paren(arg) => {
                f.write_str("PAREN")?;
                vec![&**arg]
            }
            Expression::And(lhs, rhs) => {
                f.write_str("AND")?;
                vec![&**lhs, &**rhs]
            }
            Expression::Or(lhs, rhs) => {
                f.write_str("OR")?;
                vec![&**lhs, &**rhs]
            }
            Expression::AndList(items) => {
                f.write_str("ANDLIST")?;
                items.iter().collect()
            }
            Expression::OrList(items) => {
                f.write_str("ORLIST")?;
                items.iter().collect()
            }
        };
        for child in children {
            f.write_str("\n")?;
            child.fmt_tree(f, depth + 1)?;
        }
        Ok(())
    }

    fn fmt_list(f: &mut Formatter, items: &[Expression], sep: &str) -> fmt::Result {
        f.write_str("[")?;
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                f.write_str(sep)?;
            }
            write!(f, "{}", item)?;
        }
        f.write_str("]")
    }
}

/// `{}` prints the formula in the input syntax, with lists shown as
/// `[A AND B AND C]`. `{:#}` prints an indented tree, one node per line.
impl Display for Expression {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        if f.alternate() {
            return self.fmt_tree(f, 0);
        }
        match self {
            Expression::Not(arg) => match **arg {
                Expression::And(..) | Expression::Or(..) => write!(f, "NOT ({})", arg),
                _ => write!(f, "NOT {}", arg),
            },
            Expression::And(lhs, rhs) => {
                // OR binds looser than AND
                for (i, operand) in [lhs, rhs].iter().enumerate() {
                    if i > 0 {
                        f.write_str(" AND ")?;
                    }
                    match ***operand {
                        Expression::Or(..) => write!(f, "({})", operand)?,
                        _ => write!(f, "{}", operand)?,
                    }
                }
                Ok(())
            }
            Expression::Or(lhs, rhs) => write!(f, "{} OR {}", lhs, rhs),
            Expression::AndList(items) => Expression::fmt_list(f, items, " AND "),
            Expression::OrList(items) => Expression::fmt_list(f, items, " OR "),
            Expression::Paren(arg) => write!(f, "({})", arg),
            Expression::Var(name) => f.write_str(name),
        }
    }
}

#[cfg(test)]
pub(crate) fn expression_strategy() -> impl proptest::strategy::Strategy<Value = Expression> {
    use proptest::prelude::*;

    let leaf = prop_oneof![
        1 => Just(Expression::constant(true)),
        1 => Just(Expression::constant(false)),
        6 => prop::sample::select(vec!["A", "B", "C", "D"]).prop_map(|name| Expression::var(name)),
    ];
    leaf.prop_recursive(5, 48, 4, |inner| {
        prop_oneof![
            inner.clone().prop_map(Expression::not),
            inner.clone().prop_map(Expression::paren),
            (inner.clone(), inner.clone()).prop_map(|(lhs, rhs)| Expression::and(lhs, rhs)),
            (inner.clone(), inner.clone()).prop_map(|(lhs, rhs)| Expression::or(lhs, rhs)),
            prop::collection::vec(inner.clone(), 1..4).prop_map(Expression::AndList),
            prop::collection::vec(inner, 1..4).prop_map(Expression::OrList),
        ]
    })
}
