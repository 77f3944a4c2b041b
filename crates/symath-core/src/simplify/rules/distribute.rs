//! Distribution of a product-like operator over a sum-like one.

use crate::error::Result;
use crate::expr::Expr;
use crate::ops::{ADD, BIT_AND, BIT_OR, MUL};

use super::or_input;

/// `(a + b) * c` becomes `a*c + b*c`, in either operand order.
#[must_use]
pub fn mul_over_add(expr: &Expr) -> Expr {
    distribute(expr, &MUL, &ADD)
}

/// `(a | b) & c` becomes `(a & c) | (b & c)`, in either operand order.
#[must_use]
pub fn and_over_or(expr: &Expr) -> Expr {
    distribute(expr, &BIT_AND, &BIT_OR)
}

fn distribute(expr: &Expr, outer: &Expr, inner: &Expr) -> Expr {
    if !expr.is_binary_of(outer) {
        return expr.clone();
    }
    let Some((lhs, rhs)) = expr.binary_args() else {
        return expr.clone();
    };
    let (sum, factor) = if lhs.is_binary_of(inner) {
        (lhs, rhs)
    } else if rhs.is_binary_of(inner) {
        (rhs, lhs)
    } else {
        return expr.clone();
    };
    let Some((a, b)) = sum.binary_args() else {
        return expr.clone();
    };

    or_input(expr, spread(outer, inner, factor, a, b))
}

/// `inner(outer(a, factor), outer(b, factor))`
fn spread(outer: &Expr, inner: &Expr, factor: &Expr, a: &Expr, b: &Expr) -> Result<Expr> {
    let left = Expr::apply(outer.clone(), [a.clone(), factor.clone()])?;
    let right = Expr::apply(outer.clone(), [b.clone(), factor.clone()])?;
    Expr::apply(inner.clone(), [left, right])
}
