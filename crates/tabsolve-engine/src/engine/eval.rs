//! Arithmetic evaluation with the shunting-yard algorithm.
//!
//! Formulas reach this module as a flat stream of numbers and binary
//! operators (references already substituted, unary minus already applied).
//! The stream is reordered into postfix form according to operator
//! precedence and then reduced on a value stack.
//!
//! Division by zero and invalid powers are not errors: they produce the usual
//! floating-point infinities and NaNs.

use std::collections::VecDeque;
use std::fmt;

use thiserror::Error;

use super::classify::is_number;
use super::syntax::{SplitError, split_terms};

/// A binary arithmetic operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl Operator {
    pub fn from_char(c: char) -> Option<Operator> {
        match c {
            '+' => Some(Operator::Add),
            '-' => Some(Operator::Sub),
            '*' => Some(Operator::Mul),
            '/' => Some(Operator::Div),
            '^' => Some(Operator::Pow),
            _ => None,
        }
    }

    pub fn is_operator_char(c: char) -> bool {
        Operator::from_char(c).is_some()
    }

    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Sub => '-',
            Operator::Mul => '*',
            Operator::Div => '/',
            Operator::Pow => '^',
        }
    }

    fn precedence(self) -> u8 {
        match self {
            Operator::Add | Operator::Sub => 1,
            Operator::Mul | Operator::Div => 2,
            Operator::Pow => 3,
        }
    }

    pub fn apply(self, left: f64, right: f64) -> f64 {
        match self {
            Operator::Add => left + right,
            Operator::Sub => left - right,
            Operator::Mul => left * right,
            Operator::Div => left / right,
            Operator::Pow => left.powf(right),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// One entry of an infix or postfix token stream.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Element {
    Number(f64),
    Operator(Operator),
}

/// Errors for token streams that cannot be reduced to a single value.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("Empty expression")]
    Empty,

    #[error("Dangling operator in expression")]
    DanglingOperator,

    #[error("Not a number: {0}")]
    NotANumber(String),

    #[error("Operator {0} is missing an operand")]
    MissingOperand(Operator),

    #[error("Expression left {0} values on the stack")]
    LeftoverOperands(usize),

    #[error("Reference {0} has no value")]
    Unresolved(String),
}

/// Reorder an infix stream into postfix.
///
/// Operators are popped while the stack top does not have strictly lower
/// precedence than the incoming one, so equal precedence groups left to
/// right: `1-2-3` becomes `1 2 - 3 -`.
pub fn to_postfix(infix: &[Element]) -> VecDeque<Element> {
    let mut output = VecDeque::with_capacity(infix.len());
    let mut stack: Vec<Operator> = Vec::new();

    for element in infix {
        match *element {
            Element::Number(_) => output.push_back(*element),
            Element::Operator(op) => {
                while let Some(&top) = stack.last() {
                    if top.precedence() < op.precedence() {
                        break;
                    }
                    output.push_back(Element::Operator(top));
                    stack.pop();
                }
                stack.push(op);
            }
        }
    }

    while let Some(op) = stack.pop() {
        output.push_back(Element::Operator(op));
    }

    output
}

/// Reduce a postfix stream to its value.
pub fn evaluate_postfix(mut postfix: VecDeque<Element>) -> Result<f64, EvalError> {
    let mut stack: Vec<f64> = Vec::with_capacity(postfix.len());

    while let Some(element) = postfix.pop_front() {
        match element {
            Element::Number(n) => stack.push(n),
            Element::Operator(op) => {
                let right = stack.pop().ok_or(EvalError::MissingOperand(op))?;
                let left = stack.pop().ok_or(EvalError::MissingOperand(op))?;
                stack.push(op.apply(left, right));
            }
        }
    }

    match stack.as_slice() {
        [] => Err(EvalError::Empty),
        [value] => Ok(*value),
        rest => Err(EvalError::LeftoverOperands(rest.len())),
    }
}

/// Evaluate an infix stream of numbers and operators.
pub fn evaluate(infix: &[Element]) -> Result<f64, EvalError> {
    evaluate_postfix(to_postfix(infix))
}

/// Evaluate numeric-only formula text such as `"2^3*2"` or `"-4 / 2"`.
///
/// A leading formula marker is not accepted here; strip it first. Cell
/// references are rejected with [`EvalError::NotANumber`].
pub fn evaluate_str(text: &str) -> Result<f64, EvalError> {
    let (terms, operators) = split_terms(text).map_err(|e| match e {
        SplitError::Empty => EvalError::Empty,
        SplitError::DanglingOperator => EvalError::DanglingOperator,
    })?;

    let mut infix = Vec::with_capacity(terms.len() + operators.len());
    for (idx, term) in terms.iter().enumerate() {
        if !is_number(term.token) {
            return Err(EvalError::NotANumber(term.token.to_string()));
        }
        let value = term
            .token
            .parse::<f64>()
            .map_err(|_| EvalError::NotANumber(term.token.to_string()))?;
        infix.push(Element::Number(if term.negated { -value } else { value }));
        if let Some(op) = operators.get(idx) {
            infix.push(Element::Operator(*op));
        }
    }

    evaluate(&infix)
}
