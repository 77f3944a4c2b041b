//! Error types for expression construction, indexing and simplification.
//!
//! Failed pattern matches and re-entrant simplification requests are not
//! errors: the former is a `false` answer, the latter returns its input.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ExprError>;

/// Errors raised by the expression engine.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ExprError {
    /// A function term was requested with no arguments.
    #[error("cannot apply {head} to an empty argument list")]
    EmptyArguments {
        /// Printed form of the head.
        head: String,
    },

    /// An operator's numeric evaluator rejected its operands.
    #[error("could not evaluate {lhs} {op} {rhs}: {reason}")]
    Evaluation {
        /// Name of the operator symbol.
        op: String,
        /// Left operand.
        lhs: f64,
        /// Right operand.
        rhs: f64,
        /// Why evaluation failed.
        reason: EvalFailure,
    },

    /// Indexing past an expression's structural bounds.
    #[error("index {index} out of range for expression of length {len}")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// `len()` of the indexed expression.
        len: usize,
    },

    /// The rewrite loop hit its pass ceiling without reaching a fixed point.
    #[error("non-terminating simplification: no fixed point after {passes} passes")]
    NonTerminating {
        /// Number of passes performed.
        passes: usize,
    },
}

/// Reasons a numeric evaluator can fail.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum EvalFailure {
    /// Division (or reciprocal) by zero.
    #[error("division by zero")]
    DivisionByZero,
    /// An integer cast was applied to a value with no integer representation.
    #[error("value is not representable as an integer")]
    NotInteger,
    /// Shift by a negative amount.
    #[error("negative shift count")]
    NegativeShift,
    /// The result was infinite or NaN.
    #[error("result is not finite")]
    NonFinite,
}
