//! Rewriting of formulas to a fixed point.
//!
//! Stage 1 simplifies locally using the literals and the identity and
//! complement laws. Stage 2 normalizes the structure: it pushes negations
//! inwards (De Morgan) and flattens nested `AND`/`OR` into lists. Both stages
//! rewrite children before their parent and fire at most one rule per node,
//! the first that matches.

use crate::formula::Expression;
use log::{debug, trace};

/// The two associative connectives, so that each rule is written once for
/// both of them.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Connective {
    And,
    Or,
}

impl Connective {
    /// The literal that leaves the other operand unchanged: `1` for AND, `0` for OR.
    fn neutral(self) -> bool {
        self == Connective::And
    }

    /// The literal that decides the result on its own.
    fn absorbing(self) -> bool {
        !self.neutral()
    }

    fn binary(self, lhs: Expression, rhs: Expression) -> Expression {
        match self {
            Connective::And => Expression::and(lhs, rhs),
            Connective::Or => Expression::or(lhs, rhs),
        }
    }

    fn list(self, items: Vec<Expression>) -> Expression {
        match self {
            Connective::And => Expression::AndList(items),
            Connective::Or => Expression::OrList(items),
        }
    }

    /// Splits `expr`, seen through one paren, into its operands if it is
    /// built with this connective. Gives `expr` back otherwise.
    fn split(self, expr: Expression) -> Result<Nested, Expression> {
        match (self, expr) {
            (Connective::And, Expression::And(lhs, rhs)) | (Connective::Or, Expression::Or(lhs, rhs)) => {
                Ok(Nested::Binary(*lhs, *rhs))
            }
            (Connective::And, Expression::AndList(items)) | (Connective::Or, Expression::OrList(items)) => {
                Ok(Nested::List(items))
            }
            (_, Expression::Paren(inner)) if self.nests(&inner) => self.split(*inner),
            (_, expr) => Err(expr),
        }
    }

    fn nests(self, expr: &Expression) -> bool {
        matches!(
            (self, expr),
            (Connective::And, Expression::And(..))
                | (Connective::And, Expression::AndList(..))
                | (Connective::Or, Expression::Or(..))
                | (Connective::Or, Expression::OrList(..))
        )
    }
}

enum Nested {
    Binary(Expression, Expression),
    List(Vec<Expression>),
}

impl Nested {
    fn into_operands(self) -> Vec<Expression> {
        match self {
            Nested::Binary(lhs, rhs) => vec![lhs, rhs],
            Nested::List(items) => items,
        }
    }
}

/// One stage-1 pass over `expr`. Returns the rewritten tree and whether
/// anything changed.
pub fn rewrite1(expr: Expression) -> (Expression, bool) {
    match expr {
        Expression::Var(_) => (expr, false),
        Expression::Not(arg) => {
            let (arg, changed) = rewrite1(*arg);
            match arg {
                // NOT NOT X => X
                Expression::Not(inner) => (*inner, true),
                // NOT (X) => NOT X
                Expression::Paren(inner) => (Expression::Not(inner), true),
                arg => (Expression::not(arg), changed),
            }
        }
        Expression::And(lhs, rhs) => simplify_binary(Connective::And, *lhs, *rhs),
        Expression::Or(lhs, rhs) => simplify_binary(Connective::Or, *lhs, *rhs),
        Expression::AndList(items) => simplify_list(Connective::And, items),
        Expression::OrList(items) => simplify_list(Connective::Or, items),
        Expression::Paren(arg) => {
            let (arg, changed) = rewrite1(*arg);
            match arg {
                // (X) => X for variables and negations, ((X)) => (X)
                arg @ Expression::Var(_) | arg @ Expression::Not(_) | arg @ Expression::Paren(_) => (arg, true),
                arg => (Expression::paren(arg), changed),
            }
        }
    }
}

fn simplify_binary(conn: Connective, lhs: Expression, rhs: Expression) -> (Expression, bool) {
    let (lhs, lhs_changed) = rewrite1(lhs);
    let (rhs, rhs_changed) = rewrite1(rhs);
    let absorbing = conn.absorbing();

    if lhs == rhs {
        (lhs, true)
    } else if lhs.is_constant(conn.neutral()) {
        (rhs, true)
    } else if rhs.is_constant(conn.neutral()) {
        (lhs, true)
    } else if lhs.is_constant(absorbing) || rhs.is_constant(absorbing) {
        (Expression::constant(absorbing), true)
    } else if rhs.is_negation_of(&lhs) || lhs.is_negation_of(&rhs) {
        (Expression::constant(absorbing), true)
    } else {
        (conn.binary(lhs, rhs), lhs_changed || rhs_changed)
    }
}

fn simplify_list(conn: Connective, mut items: Vec<Expression>) -> (Expression, bool) {
    if items.len() == 1 {
        let (only, _) = rewrite1(items.remove(0));
        return (only, true);
    }

    let mut changed = false;
    let mut items: Vec<Expression> = items
        .into_iter()
        .map(|item| {
            let (item, c) = rewrite1(item);
            changed |= c;
            item
        })
        .collect();

    let absorbing = conn.absorbing();
    for i in 0..items.len() {
        if items[i].is_constant(absorbing) {
            return (Expression::constant(absorbing), true);
        }
        if items[i].is_constant(conn.neutral()) {
            items.remove(i);
            return (conn.list(items), true);
        }
        for j in i + 1..items.len() {
            if items[i] == items[j] {
                items.remove(j);
                return (conn.list(items), true);
            }
            if items[j].is_negation_of(&items[i]) || items[i].is_negation_of(&items[j]) {
                return (Expression::constant(absorbing), true);
            }
        }
    }

    (conn.list(items), changed)
}

/// One stage-2 pass over `expr`. Returns the rewritten tree and whether
/// anything changed.
pub fn rewrite2(expr: Expression) -> (Expression, bool) {
    match expr {
        Expression::Var(_) => (expr, false),
        Expression::Paren(arg) => {
            let (arg, changed) = rewrite2(*arg);
            (Expression::paren(arg), changed)
        }
        Expression::Not(arg) => {
            let (arg, changed) = rewrite2(*arg);
            match arg {
                Expression::Or(lhs, rhs) => (Expression::and(Expression::Not(lhs), Expression::Not(rhs)), true),
                Expression::And(lhs, rhs) => (Expression::or(Expression::Not(lhs), Expression::Not(rhs)), true),
                Expression::OrList(items) => (Expression::and_list(items.into_iter().map(Expression::not)), true),
                Expression::AndList(items) => (Expression::or_list(items.into_iter().map(Expression::not)), true),
                arg => (Expression::not(arg), changed),
            }
        }
        Expression::And(lhs, rhs) => flatten_binary(Connective::And, *lhs, *rhs),
        Expression::Or(lhs, rhs) => flatten_binary(Connective::Or, *lhs, *rhs),
        Expression::AndList(items) => splice_list(Connective::And, items),
        Expression::OrList(items) => splice_list(Connective::Or, items),
    }
}

fn flatten_binary(conn: Connective, lhs: Expression, rhs: Expression) -> (Expression, bool) {
    let (lhs, lhs_changed) = rewrite2(lhs);
    let (rhs, rhs_changed) = rewrite2(rhs);

    let lhs = match conn.split(lhs) {
        Ok(Nested::Binary(a, b)) => return (conn.list(vec![a, b, rhs]), true),
        Ok(Nested::List(mut items)) => {
            items.push(rhs);
            return (conn.list(items), true);
        }
        Err(lhs) => lhs,
    };
    match conn.split(rhs) {
        Ok(Nested::Binary(a, b)) => (conn.list(vec![lhs, a, b]), true),
        Ok(Nested::List(mut items)) => {
            items.push(lhs);
            (conn.list(items), true)
        }
        Err(rhs) => (conn.binary(lhs, rhs), lhs_changed || rhs_changed),
    }
}

fn splice_list(conn: Connective, items: Vec<Expression>) -> (Expression, bool) {
    let mut changed = false;
    let items: Vec<Expression> = items
        .into_iter()
        .map(|item| {
            let (item, c) = rewrite2(item);
            changed |= c;
            item
        })
        .collect();

    let mut rest = Vec::with_capacity(items.len() + 1);
    let mut items = items.into_iter();
    while let Some(item) = items.next() {
        match conn.split(item) {
            Ok(nested) => {
                // the nested operands go to the end
                rest.extend(items);
                rest.extend(nested.into_operands());
                return (conn.list(rest), true);
            }
            Err(item) => rest.push(item),
        }
    }

    (conn.list(rest), changed)
}

/// Rewrites `expr` to a fixed point.
///
/// Stage 1 runs until it changes nothing, then stage 2 gets one pass; any
/// change by stage 2 starts stage 1 over. The ordering decides which of the
/// equivalent normal forms comes out.
pub fn optimize(mut expr: Expression) -> Expression {
    let mut rounds = 0;
    loop {
        rounds += 1;
        let (next, changed) = rewrite1(expr);
        expr = next;
        if changed {
            trace!("stage 1: {}", expr);
            continue;
        }

        let (next, changed) = rewrite2(expr);
        expr = next;
        if !changed {
            break;
        }
        trace!("stage 2: {}", expr);
    }
    debug!("optimized in {} rounds to {} nodes", rounds, expr.size());
    expr
}
