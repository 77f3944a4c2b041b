//! Operator descriptors, numeric evaluators and the standard operators.
//!
//! An [`OperatorSpec`] records the algebraic properties the constructor and
//! the rewriter consult for an operator symbol. The standard arithmetic,
//! bitwise and comparison operators are defined here, together with the
//! Rust operator overloads that build terms headed by them.

use std::ops;

use once_cell::sync::Lazy;

use crate::error::{EvalFailure, ExprError, Result};
use crate::expr::Expr;

/// Algebraic properties of an operator symbol.
///
/// Built with the chaining methods:
///
/// ```rust
/// use symath_core::{NumericOp, OperatorSpec};
///
/// let spec = OperatorSpec::new()
///     .commutative()
///     .associative()
///     .identity(0)
///     .numeric(NumericOp::Add);
/// assert!(spec.commutative);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OperatorSpec {
    /// Operand order is irrelevant.
    pub commutative: bool,
    /// Nested applications may be re-associated.
    pub associative: bool,
    /// Value that vanishes on either side.
    pub identity: Option<Expr>,
    /// Value that vanishes on the left; overrides `identity`.
    pub left_identity: Option<Expr>,
    /// Value that vanishes on the right; overrides `identity`.
    pub right_identity: Option<Expr>,
    /// Absorbing value.
    pub zero: Option<Expr>,
    /// Direct evaluator for two numeric literals.
    pub numeric: Option<NumericOp>,
    /// Coercion applied to both operands before evaluation.
    pub cast: Option<Cast>,
}

impl OperatorSpec {
    /// An operator with no properties.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the operator commutative.
    #[must_use]
    pub fn commutative(mut self) -> Self {
        self.commutative = true;
        self
    }

    /// Marks the operator associative.
    #[must_use]
    pub fn associative(mut self) -> Self {
        self.associative = true;
        self
    }

    /// Sets the two-sided identity.
    #[must_use]
    pub fn identity(mut self, value: impl Into<Expr>) -> Self {
        self.identity = Some(value.into());
        self
    }

    /// Sets the left identity.
    #[must_use]
    pub fn left_identity(mut self, value: impl Into<Expr>) -> Self {
        self.left_identity = Some(value.into());
        self
    }

    /// Sets the right identity.
    #[must_use]
    pub fn right_identity(mut self, value: impl Into<Expr>) -> Self {
        self.right_identity = Some(value.into());
        self
    }

    /// Sets the absorbing value.
    #[must_use]
    pub fn zero(mut self, value: impl Into<Expr>) -> Self {
        self.zero = Some(value.into());
        self
    }

    /// Sets the numeric evaluator.
    #[must_use]
    pub fn numeric(mut self, op: NumericOp) -> Self {
        self.numeric = Some(op);
        self
    }

    /// Sets the operand cast.
    #[must_use]
    pub fn cast(mut self, cast: Cast) -> Self {
        self.cast = Some(cast);
        self
    }

    /// The identity that vanishes on the left, if any.
    #[must_use]
    pub fn effective_left_identity(&self) -> Option<&Expr> {
        self.left_identity.as_ref().or(self.identity.as_ref())
    }

    /// The identity that vanishes on the right, if any.
    #[must_use]
    pub fn effective_right_identity(&self) -> Option<&Expr> {
        self.right_identity.as_ref().or(self.identity.as_ref())
    }

    /// Evaluates the operator on two numeric literals.
    ///
    /// Returns `None` when the operator has no numeric evaluator.
    pub fn evaluate(&self, name: &str, lhs: f64, rhs: f64) -> Option<Result<Expr>> {
        let op = self.numeric?;
        let outcome = (|| {
            let (a, b) = match self.cast {
                Some(cast) => (cast.apply(lhs)?, cast.apply(rhs)?),
                None => (lhs, rhs),
            };
            op.evaluate(a, b)
        })();
        Some(outcome.map_err(|reason| ExprError::Evaluation {
            op: name.to_string(),
            lhs,
            rhs,
            reason,
        }))
    }
}

/// Value coercion applied before numeric evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cast {
    /// Truncate toward zero; fails for non-finite or out-of-range values.
    Integer,
}

impl Cast {
    /// Applies the cast.
    ///
    /// # Errors
    ///
    /// Returns [`EvalFailure::NotInteger`] when the value has no integer form.
    pub fn apply(self, value: f64) -> std::result::Result<f64, EvalFailure> {
        match self {
            Cast::Integer => {
                let truncated = value.trunc();
                if truncated.is_finite() && truncated.abs() < I64_LIMIT {
                    Ok(truncated)
                } else {
                    Err(EvalFailure::NotInteger)
                }
            }
        }
    }
}

// 2^63: the first magnitude that no longer fits an i64.
const I64_LIMIT: f64 = 9_223_372_036_854_775_808.0;

/// Numeric evaluators for binary operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NumericOp {
    /// `a + b`
    Add,
    /// `a - b`
    Sub,
    /// `a * b`
    Mul,
    /// `a / b`
    Div,
    /// `a ** b`
    Pow,
    /// `a & b` on integers
    BitAnd,
    /// `a | b` on integers
    BitOr,
    /// `a ^ b` on integers
    BitXor,
    /// `a << b` on integers
    Shl,
    /// `a >> b` on integers (arithmetic)
    Shr,
    /// `a < b`
    Lt,
    /// `a > b`
    Gt,
    /// `a <= b`
    Le,
    /// `a >= b`
    Ge,
}

impl NumericOp {
    /// Evaluates the operator.
    ///
    /// # Errors
    ///
    /// Fails on division by zero, non-integral bitwise operands, negative
    /// shift counts, and non-finite results.
    pub fn evaluate(self, a: f64, b: f64) -> std::result::Result<Expr, EvalFailure> {
        let value = match self {
            NumericOp::Add => a + b,
            NumericOp::Sub => a - b,
            NumericOp::Mul => a * b,
            NumericOp::Div => {
                if b == 0.0 {
                    return Err(EvalFailure::DivisionByZero);
                }
                a / b
            }
            NumericOp::Pow => {
                if a == 0.0 && b < 0.0 {
                    return Err(EvalFailure::DivisionByZero);
                }
                a.powf(b)
            }
            NumericOp::BitAnd => (integer(a)? & integer(b)?) as f64,
            NumericOp::BitOr => (integer(a)? | integer(b)?) as f64,
            NumericOp::BitXor => (integer(a)? ^ integer(b)?) as f64,
            NumericOp::Shl => {
                let (value, count) = (integer(a)?, shift_count(b)?);
                value as f64 * 2f64.powi(count)
            }
            NumericOp::Shr => {
                let (value, count) = (integer(a)?, shift_count(b)?);
                (value >> count.min(63)) as f64
            }
            NumericOp::Lt => return Ok(Expr::boolean(a < b)),
            NumericOp::Gt => return Ok(Expr::boolean(a > b)),
            NumericOp::Le => return Ok(Expr::boolean(a <= b)),
            NumericOp::Ge => return Ok(Expr::boolean(a >= b)),
        };

        if value.is_finite() {
            Ok(Expr::number(value))
        } else {
            Err(EvalFailure::NonFinite)
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn integer(value: f64) -> std::result::Result<i64, EvalFailure> {
    if value.fract() == 0.0 && value.abs() < I64_LIMIT {
        Ok(value as i64)
    } else {
        Err(EvalFailure::NotInteger)
    }
}

#[allow(clippy::cast_possible_truncation)]
fn shift_count(value: f64) -> std::result::Result<i32, EvalFailure> {
    let count = integer(value)?;
    if count < 0 {
        return Err(EvalFailure::NegativeShift);
    }
    Ok(count.min(i64::from(i32::MAX)) as i32)
}

/// The standard operators, in registration order.
pub(crate) fn standard_operators() -> Vec<(&'static str, OperatorSpec)> {
    let arithmetic = |op| OperatorSpec::new().numeric(op);
    let bitwise = |op| OperatorSpec::new().numeric(op).cast(Cast::Integer);

    vec![
        (
            "+",
            arithmetic(NumericOp::Add).commutative().associative().identity(0),
        ),
        ("-", arithmetic(NumericOp::Sub).right_identity(0)),
        (
            "*",
            arithmetic(NumericOp::Mul)
                .commutative()
                .associative()
                .identity(1)
                .zero(0),
        ),
        ("/", arithmetic(NumericOp::Div).right_identity(1)),
        ("**", arithmetic(NumericOp::Pow).right_identity(1)),
        (
            "&",
            bitwise(NumericOp::BitAnd).commutative().associative().zero(0),
        ),
        (
            "|",
            bitwise(NumericOp::BitOr).commutative().associative().identity(0),
        ),
        (
            "^",
            bitwise(NumericOp::BitXor).commutative().associative().identity(0),
        ),
        ("<<", bitwise(NumericOp::Shl).right_identity(0)),
        (">>", bitwise(NumericOp::Shr).right_identity(0)),
        ("<", arithmetic(NumericOp::Lt)),
        (">", arithmetic(NumericOp::Gt)),
        ("<=", arithmetic(NumericOp::Le)),
        (">=", arithmetic(NumericOp::Ge)),
    ]
}

// === Standard operator symbols ===

/// Addition.
pub static ADD: Lazy<Expr> = Lazy::new(|| Expr::symbol("+"));
/// Subtraction.
pub static SUB: Lazy<Expr> = Lazy::new(|| Expr::symbol("-"));
/// Multiplication.
pub static MUL: Lazy<Expr> = Lazy::new(|| Expr::symbol("*"));
/// Division.
pub static DIV: Lazy<Expr> = Lazy::new(|| Expr::symbol("/"));
/// Exponentiation.
pub static POW: Lazy<Expr> = Lazy::new(|| Expr::symbol("**"));
/// Bitwise and.
pub static BIT_AND: Lazy<Expr> = Lazy::new(|| Expr::symbol("&"));
/// Bitwise or.
pub static BIT_OR: Lazy<Expr> = Lazy::new(|| Expr::symbol("|"));
/// Bitwise exclusive or.
pub static BIT_XOR: Lazy<Expr> = Lazy::new(|| Expr::symbol("^"));
/// Left shift.
pub static SHL: Lazy<Expr> = Lazy::new(|| Expr::symbol("<<"));
/// Arithmetic right shift.
pub static SHR: Lazy<Expr> = Lazy::new(|| Expr::symbol(">>"));
/// Less than.
pub static LESS_THAN: Lazy<Expr> = Lazy::new(|| Expr::symbol("<"));
/// Greater than.
pub static GREATER_THAN: Lazy<Expr> = Lazy::new(|| Expr::symbol(">"));
/// Less than or equal.
pub static LESS_EQUAL: Lazy<Expr> = Lazy::new(|| Expr::symbol("<="));
/// Greater than or equal.
pub static GREATER_EQUAL: Lazy<Expr> = Lazy::new(|| Expr::symbol(">="));

/// Builds `op(lhs, rhs)`, panicking if numeric evaluation fails.
fn binary(op: &Expr, lhs: Expr, rhs: Expr) -> Expr {
    match Expr::apply(op.clone(), [lhs, rhs]) {
        Ok(expr) => expr,
        Err(err) => panic!("{err}"),
    }
}

impl Expr {
    /// `self ** exponent`.
    ///
    /// # Panics
    ///
    /// Panics if both operands are numbers and the power is not finite.
    #[must_use]
    pub fn pow(&self, exponent: impl Into<Expr>) -> Expr {
        binary(&POW, self.clone(), exponent.into())
    }

    /// `self < rhs`.
    #[must_use]
    pub fn less_than(&self, rhs: impl Into<Expr>) -> Expr {
        binary(&LESS_THAN, self.clone(), rhs.into())
    }

    /// `self > rhs`.
    #[must_use]
    pub fn greater_than(&self, rhs: impl Into<Expr>) -> Expr {
        binary(&GREATER_THAN, self.clone(), rhs.into())
    }

    /// `self <= rhs`.
    #[must_use]
    pub fn less_equal(&self, rhs: impl Into<Expr>) -> Expr {
        binary(&LESS_EQUAL, self.clone(), rhs.into())
    }

    /// `self >= rhs`.
    #[must_use]
    pub fn greater_equal(&self, rhs: impl Into<Expr>) -> Expr {
        binary(&GREATER_EQUAL, self.clone(), rhs.into())
    }
}

// Each overload panics if both operands are numbers and evaluation fails,
// the way integer division by zero panics. Use `Expr::apply` to get an error.
macro_rules! binary_operator {
    ($trait:ident, $method:ident, $op:ident) => {
        impl<T: Into<Expr>> ops::$trait<T> for Expr {
            type Output = Expr;

            fn $method(self, rhs: T) -> Expr {
                binary(&$op, self, rhs.into())
            }
        }

        impl<T: Into<Expr>> ops::$trait<T> for &Expr {
            type Output = Expr;

            fn $method(self, rhs: T) -> Expr {
                binary(&$op, self.clone(), rhs.into())
            }
        }

        binary_operator!(@host $trait, $method, $op, i32 i64 u32 f64);
    };
    (@host $trait:ident, $method:ident, $op:ident, $($host:ty)*) => {
        $(
            impl ops::$trait<Expr> for $host {
                type Output = Expr;

                fn $method(self, rhs: Expr) -> Expr {
                    binary(&$op, Expr::from(self), rhs)
                }
            }

            impl ops::$trait<&Expr> for $host {
                type Output = Expr;

                fn $method(self, rhs: &Expr) -> Expr {
                    binary(&$op, Expr::from(self), rhs.clone())
                }
            }
        )*
    };
}

binary_operator!(Add, add, ADD);
binary_operator!(Sub, sub, SUB);
binary_operator!(Mul, mul, MUL);
binary_operator!(Div, div, DIV);
binary_operator!(BitAnd, bitand, BIT_AND);
binary_operator!(BitOr, bitor, BIT_OR);
binary_operator!(BitXor, bitxor, BIT_XOR);
binary_operator!(Shl, shl, SHL);
binary_operator!(Shr, shr, SHR);

impl ops::Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        self * -1
    }
}

impl ops::Neg for &Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        self * -1
    }
}
