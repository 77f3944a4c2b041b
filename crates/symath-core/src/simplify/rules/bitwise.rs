//! Bit-logic identities.

use crate::expr::Expr;
use crate::ops::{BIT_AND, BIT_OR, BIT_XOR, SHL, SHR};
use crate::order::canonical_cmp;
use crate::simplify::chain;

use super::or_input;

/// Idempotence and self-inverse laws of the bitwise operators.
///
/// - equal operands of an `^` chain cancel in pairs (`a ^ a` becomes `0`)
/// - repeated operands of an `&` or `|` chain collapse to one
/// - `(a << k) >> k` and `(a >> k) << k` become `a`
#[must_use]
pub fn bit_identities(expr: &Expr) -> Expr {
    if expr.is_apply_of(&BIT_XOR) {
        cancel_pairs(expr)
    } else if expr.is_apply_of(&BIT_AND) {
        deduplicate(&BIT_AND, expr)
    } else if expr.is_apply_of(&BIT_OR) {
        deduplicate(&BIT_OR, expr)
    } else if expr.is_binary_of(&SHR) {
        cancel_shift(expr, &SHL)
    } else if expr.is_binary_of(&SHL) {
        cancel_shift(expr, &SHR)
    } else {
        expr.clone()
    }
}

fn cancel_pairs(expr: &Expr) -> Expr {
    let operands = chain::flatten(&BIT_XOR, expr);
    let mut kept: Vec<Expr> = Vec::with_capacity(operands.len());
    for operand in &operands {
        match kept.iter().position(|k| k == operand) {
            Some(index) => {
                kept.swap_remove(index);
            }
            None => kept.push(operand.clone()),
        }
    }
    if kept.len() == operands.len() {
        return expr.clone();
    }
    if kept.is_empty() {
        return Expr::number(0.0);
    }
    kept.sort_by(canonical_cmp);
    or_input(expr, chain::build(&BIT_XOR, kept))
}

fn deduplicate(op: &Expr, expr: &Expr) -> Expr {
    let operands = chain::flatten(op, expr);
    let mut kept: Vec<Expr> = Vec::with_capacity(operands.len());
    for operand in &operands {
        if !kept.contains(operand) {
            kept.push(operand.clone());
        }
    }
    if kept.len() == operands.len() {
        return expr.clone();
    }
    kept.sort_by(canonical_cmp);
    or_input(expr, chain::build(op, kept))
}

fn cancel_shift(expr: &Expr, inverse: &Expr) -> Expr {
    let Some((shifted, count)) = expr.binary_args() else {
        return expr.clone();
    };
    match shifted.binary_args() {
        Some((value, inner_count)) if shifted.is_apply_of(inverse) && inner_count == count => {
            value.clone()
        }
        _ => expr.clone(),
    }
}
