//! Canonical ordering of expressions.
//!
//! Numbers sort first by value, then symbols by name, then everything else
//! by canonical printed form. Commutative operands and flattened associative
//! chains are stored in this order.

use std::cmp::Ordering;

use crate::expr::{Expr, ExprNode};

fn rank(expr: &Expr) -> u8 {
    match expr.node() {
        ExprNode::Number(_) => 0,
        ExprNode::Symbol(_) => 1,
        _ => 2,
    }
}

/// Total canonical order on expressions.
#[must_use]
pub fn canonical_cmp(a: &Expr, b: &Expr) -> Ordering {
    if a.ptr_eq(b) {
        return Ordering::Equal;
    }
    match (a.node(), b.node()) {
        (ExprNode::Number(x), ExprNode::Number(y)) => x.total_cmp(y),
        (ExprNode::Symbol(x), ExprNode::Symbol(y)) => x.name().cmp(y.name()),
        _ => rank(a)
            .cmp(&rank(b))
            .then_with(|| a.canonical_string().cmp(b.canonical_string()))
            .then_with(|| same_print_cmp(a, b)),
    }
}

/// Separates distinct terms that print alike, i.e. ones built from
/// different wildcards sharing a name.
fn same_print_cmp(a: &Expr, b: &Expr) -> Ordering {
    match (a.node(), b.node()) {
        (ExprNode::Wildcard(x), ExprNode::Wildcard(y)) => x.id().cmp(&y.id()),
        (ExprNode::Apply(x), ExprNode::Apply(y)) => canonical_cmp(&x.head, &y.head)
            .then_with(|| x.args.len().cmp(&y.args.len()))
            .then_with(|| {
                x.args
                    .iter()
                    .zip(&y.args)
                    .map(|(l, r)| canonical_cmp(l, r))
                    .find(|ord| ord.is_ne())
                    .unwrap_or(Ordering::Equal)
            }),
        _ => Ordering::Equal,
    }
}

/// Operand order for a commutative operator `op`.
///
/// Operands headed by `op` itself go last, so a pairwise-sorted binary term
/// has the same shape as a right-nested chain rebuilt from sorted operands.
#[must_use]
pub fn operand_cmp(op: &Expr, a: &Expr, b: &Expr) -> Ordering {
    a.is_apply_of(op)
        .cmp(&b.is_apply_of(op))
        .then_with(|| canonical_cmp(a, b))
}
