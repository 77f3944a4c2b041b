//! Associative chains.
//!
//! A chain is a nest of binary terms headed by one associative operator.
//! The canonical shape is right-nested: `op(a1, op(a2, op(a3, a4)))`.

use crate::error::{ExprError, Result};
use crate::expr::Expr;

/// Operands of the `op`-chain rooted at `expr`, left to right.
///
/// A term not headed by `op` is a chain of one.
pub(crate) fn flatten(op: &Expr, expr: &Expr) -> Vec<Expr> {
    let mut operands = Vec::new();
    collect(op, expr, &mut operands);
    operands
}

fn collect(op: &Expr, expr: &Expr, out: &mut Vec<Expr>) {
    if expr.is_apply_of(op) {
        for arg in expr.args() {
            collect(op, arg, out);
        }
    } else {
        out.push(expr.clone());
    }
}

/// True if `expr` already has the right-nested binary shape.
pub(crate) fn is_right_nested(op: &Expr, expr: &Expr) -> bool {
    let mut node = expr;
    while node.is_apply_of(op) {
        match node.binary_args() {
            Some((lhs, rhs)) if !lhs.is_apply_of(op) => node = rhs,
            _ => return false,
        }
    }
    true
}

/// Rebuilds a right-nested chain from `operands`, in the given order.
pub(crate) fn build(op: &Expr, operands: Vec<Expr>) -> Result<Expr> {
    let mut rest = operands.into_iter().rev();
    let Some(mut chain) = rest.next() else {
        return Err(ExprError::EmptyArguments {
            head: op.to_string(),
        });
    };
    for operand in rest {
        chain = Expr::apply(op.clone(), [operand, chain])?;
    }
    Ok(chain)
}
