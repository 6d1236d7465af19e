//! Lowering of formulas into a flat boolean circuit, and its evaluator.

mod environment;

pub use environment::{is_temporary, Environment, TEMP_PREFIX};

use crate::formula::Expression;
use std::fmt::{self, Display, Formatter};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum OpKind {
    /// A reference to a variable. Only present before [`build`].
    Nop,
    Not,
    And,
    Or,
    /// Returns the value of `result`. Always the last operation of a program.
    Ret,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Operation {
    pub result: String,
    pub kind: OpKind,
    pub operands: Vec<String>,
}

impl Operation {
    fn new(result: impl Into<String>, kind: OpKind, operands: Vec<String>) -> Self {
        Self {
            result: result.into(),
            kind,
            operands,
        }
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let name = match self.kind {
            OpKind::Nop => return write!(f, "{}", self.result),
            OpKind::Ret => return write!(f, "RET {}", self.result),
            OpKind::Not => "NOT",
            OpKind::And => "AND",
            OpKind::Or => "OR",
        };
        write!(f, "{} = {} {}", self.result, name, self.operands.join(", "))
    }
}

struct Lowering {
    ops: Vec<Operation>,
    counter: usize,
}

impl Lowering {
    fn fresh(&mut self) -> String {
        let name = format!("{}{}", TEMP_PREFIX, self.counter);
        self.counter += 1;
        name
    }

    fn emit(&mut self, result: String, kind: OpKind, operands: Vec<String>) -> String {
        self.ops.push(Operation::new(result.clone(), kind, operands));
        result
    }

    /// Lowers `expr`, returning the name holding its value.
    fn lower(&mut self, expr: &Expression) -> String {
        match expr {
            Expression::Var(name) => self.emit(name.clone(), OpKind::Nop, vec![]),
            Expression::Paren(arg) => self.lower(arg),
            Expression::Not(arg) => {
                let operand = self.lower(arg);
                let result = self.fresh();
                self.emit(result, OpKind::Not, vec![operand])
            }
            Expression::And(lhs, rhs) => self.lower_all(OpKind::And, [&**lhs, &**rhs].iter().copied()),
            Expression::Or(lhs, rhs) => self.lower_all(OpKind::Or, [&**lhs, &**rhs].iter().copied()),
            Expression::AndList(items) => self.lower_all(OpKind::And, items.iter()),
            Expression::OrList(items) => self.lower_all(OpKind::Or, items.iter()),
        }
    }

    fn lower_all<'e>(&mut self, kind: OpKind, operands: impl Iterator<Item = &'e Expression>) -> String {
        let operands = operands.map(|e| self.lower(e)).collect();
        let result = self.fresh();
        self.emit(result, kind, operands)
    }
}

/// Lowers `expr` into operations over named temporaries, keeping the `Nop`
/// references to variables. Temporaries are numbered `*0`, `*1`, ... in
/// emission order.
pub fn pre_lower(expr: &Expression) -> Vec<Operation> {
    let mut lowering = Lowering {
        ops: vec![],
        counter: 0,
    };
    lowering.lower(expr);
    lowering.ops
}

/// Turns pre-lowered operations into an executable program: strips the `Nop`
/// references, recording each referenced variable in the returned environment
/// as `false`, and terminates the program with a `Ret` of the last result.
pub fn build(pre_lowered: Vec<Operation>) -> (Vec<Operation>, Environment) {
    let mut env = Environment::default();
    let mut program = Vec::with_capacity(pre_lowered.len() + 1);
    let mut last = None;

    for op in pre_lowered {
        last = Some(op.result.clone());
        if op.kind == OpKind::Nop {
            env.set(&op.result, false);
        } else {
            program.push(op);
        }
    }
    if let Some(last) = last {
        program.push(Operation::new(last, OpKind::Ret, vec![]));
    }
    (program, env)
}

/// Lowers `expr` into a program and the environment of its free variables.
pub fn lower(expr: &Expression) -> (Vec<Operation>, Environment) {
    let (program, env) = build(pre_lower(expr));
    log::debug!("lowered to {} operations over {} variables", program.len(), env.len());
    (program, env)
}

/// Runs `program` against `env`, recording every temporary in it, and returns
/// the program's result.
///
/// Panics if the program is malformed: empty, containing a `Nop`, or missing
/// its `Ret`.
pub fn execute(program: &[Operation], env: &mut Environment) -> bool {
    assert!(!program.is_empty(), "nothing to execute");

    for op in program {
        match op.kind {
            OpKind::Not => {
                let value = !env.get(&op.operands[0]);
                env.set(&op.result, value);
            }
            OpKind::And => {
                let value = op.operands.iter().fold(true, |acc, x| acc & env.get(x));
                env.set(&op.result, value);
            }
            OpKind::Or => {
                let value = op.operands.iter().fold(false, |acc, x| acc | env.get(x));
                env.set(&op.result, value);
            }
            OpKind::Ret => return env.get(&op.result),
            OpKind::Nop => panic!("reference to `{}` was not lowered away", op.result),
        }
    }

    panic!("program has no return")
}
