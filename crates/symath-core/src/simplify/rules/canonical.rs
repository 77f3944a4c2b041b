//! Canonical-form rules.
//!
//! Operand order, identity elements, constant evaluation, absorbing values
//! and associative chain shape. These rules only consult the head's
//! [`OperatorSpec`], so they apply to user-registered operators as well.

use std::cmp::Ordering;

use crate::expr::Expr;
use crate::intern::Symbol;
use crate::ops::OperatorSpec;
use crate::order::{canonical_cmp, operand_cmp};
use crate::simplify::chain;

use super::{binary_parts, or_input};

/// Sorts the operands of a commutative operator.
#[must_use]
pub fn commutative_order(expr: &Expr) -> Expr {
    let head = expr.head();
    if expr.is_leaf() || !head.spec().is_some_and(|spec| spec.commutative) {
        return expr.clone();
    }
    let sorted = expr
        .args()
        .windows(2)
        .all(|pair| operand_cmp(head, &pair[0], &pair[1]) != Ordering::Greater);
    if sorted {
        return expr.clone();
    }
    // Construction sorts commutative operands.
    or_input(expr, Expr::apply(head.clone(), expr.args().iter().cloned()))
}

/// Drops identity operands, repeating until none is left at this node.
#[must_use]
pub fn strip_identities(expr: &Expr) -> Expr {
    let mut current = expr.clone();
    while let Some(stripped) = strip_once(&current) {
        current = stripped;
    }
    current
}

fn strip_once(expr: &Expr) -> Option<Expr> {
    let (spec, lhs, rhs) = binary_parts(expr)?;
    if spec.effective_left_identity() == Some(lhs) {
        return Some(rhs.clone());
    }
    if spec.effective_right_identity() == Some(rhs) {
        return Some(lhs.clone());
    }
    None
}

/// Evaluates a numeric operator applied to two numeric literals.
#[must_use]
pub fn evaluate_numeric(expr: &Expr) -> Expr {
    let Some((spec, lhs, rhs)) = binary_parts(expr) else {
        return expr.clone();
    };
    let (Some(a), Some(b)) = (lhs.as_number(), rhs.as_number()) else {
        return expr.clone();
    };
    match spec.evaluate(operator_name(expr.head()), a, b) {
        Some(Ok(value)) => value,
        _ => expr.clone(),
    }
}

/// Collapses a term containing its operator's absorbing value.
#[must_use]
pub fn absorb_zero(expr: &Expr) -> Expr {
    match expr.head().spec().and_then(|spec| spec.zero.as_ref()) {
        Some(zero) if expr.args().contains(zero) => zero.clone(),
        _ => expr.clone(),
    }
}

/// Flattens an associative chain and rebuilds it right-nested.
///
/// For commutative operators the operands are also sorted, numeric operands
/// are folded into one constant, an identity constant is dropped and an
/// absorbing one takes over the whole chain.
#[must_use]
pub fn reassociate(expr: &Expr) -> Expr {
    let op = expr.head();
    let Some(spec) = op.spec().filter(|spec| spec.associative) else {
        return expr.clone();
    };
    if expr.is_leaf() {
        return expr.clone();
    }

    let flat = chain::flatten(op, expr);
    if !spec.commutative {
        if chain::is_right_nested(op, expr) {
            return expr.clone();
        }
        return or_input(expr, chain::build(op, flat));
    }

    let (mut operands, others): (Vec<Expr>, Vec<Expr>) =
        flat.iter().cloned().partition(Expr::is_number);
    if spec.numeric.is_some() && operands.len() > 1 {
        match fold_constants(operator_name(op), spec, &operands) {
            Some(constant) => operands = vec![constant],
            None => return expr.clone(),
        }
    }
    if let [constant] = operands.as_slice() {
        if spec.zero.as_ref() == Some(constant) {
            return constant.clone();
        }
        let is_identity = spec.effective_left_identity() == Some(constant)
            || spec.effective_right_identity() == Some(constant);
        if is_identity && !others.is_empty() {
            operands.clear();
        }
    }

    operands.extend(others);
    operands.sort_by(canonical_cmp);
    if operands == flat && chain::is_right_nested(op, expr) {
        return expr.clone();
    }
    or_input(expr, chain::build(op, operands))
}

fn fold_constants(name: &str, spec: &OperatorSpec, constants: &[Expr]) -> Option<Expr> {
    let (first, rest) = constants.split_first()?;
    rest.iter().try_fold(first.clone(), |acc, next| {
        let value = spec.evaluate(name, acc.as_number()?, next.as_number()?)?.ok()?;
        value.is_number().then_some(value)
    })
}

fn operator_name(head: &Expr) -> &str {
    head.as_symbol().map_or("", Symbol::name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::{ADD, BIT_AND, DIV, MUL};
    use crate::simplify::SimplifyGuard;
    use crate::symbols;

    #[test]
    fn test_strip_identities() {
        let x = Expr::symbol("x");
        let _guard = SimplifyGuard::acquire().expect("no active simplification");

        let raw = Expr::apply(ADD.clone(), [x.clone(), Expr::from(0)]).expect("x + 0");
        assert_eq!(strip_identities(&raw), x);

        // `/` only has a right identity.
        let raw = Expr::apply(DIV.clone(), [Expr::from(1), x.clone()]).expect("1 / x");
        assert_eq!(strip_identities(&raw), raw);

        let nested = Expr::apply(MUL.clone(), [Expr::from(1), raw.clone()]).expect("1 * (1 / x)");
        assert_eq!(strip_identities(&nested), raw);
    }

    #[test]
    fn test_reassociate_folds_and_sorts() {
        let xs = symbols("x y z");
        let (x, y, z) = (&xs[0], &xs[1], &xs[2]);
        let _guard = SimplifyGuard::acquire().expect("no active simplification");

        let left = Expr::apply(ADD.clone(), [z.clone(), Expr::from(2)]).expect("2 + z");
        let right = Expr::apply(ADD.clone(), [Expr::from(3), x.clone()]).expect("3 + x");
        let raw = Expr::apply(ADD.clone(), [left, right]).expect("(2 + z) + (3 + x)");
        let raw = Expr::apply(ADD.clone(), [raw, y.clone()]).expect("... + y");

        assert_eq!(reassociate(&raw).to_string(), "(5 + (x + (y + z)))");
    }

    #[test]
    fn test_reassociate_identity_and_zero() {
        let xs = symbols("x y");
        let (x, y) = (&xs[0], &xs[1]);
        let _guard = SimplifyGuard::acquire().expect("no active simplification");

        let inner = Expr::apply(ADD.clone(), [Expr::from(-2), x.clone()]).expect("-2 + x");
        let raw = Expr::apply(ADD.clone(), [Expr::from(2), inner]).expect("2 + (-2 + x)");
        assert_eq!(reassociate(&raw), *x);

        let inner = Expr::apply(BIT_AND.clone(), [Expr::from(4), x.clone()]).expect("4 & x");
        let inner = Expr::apply(BIT_AND.clone(), [y.clone(), inner]).expect("y & (4 & x)");
        let raw = Expr::apply(BIT_AND.clone(), [Expr::from(3), inner]).expect("3 & ...");
        assert_eq!(reassociate(&raw), Expr::from(0));
    }

    #[test]
    fn test_absorb_and_evaluate() {
        let x = Expr::symbol("x");
        let _guard = SimplifyGuard::acquire().expect("no active simplification");

        // Construction short-circuits on zero, so the raw term is built by hand.
        let raw = Expr::from_node(crate::expr::ExprNode::Apply(crate::expr::Apply {
            head: MUL.clone(),
            args: smallvec::smallvec![Expr::from(0), x.clone()],
        }));
        assert_eq!(absorb_zero(&raw), Expr::from(0));
        assert_eq!(absorb_zero(&x), x);

        let sum = Expr::from_node(crate::expr::ExprNode::Apply(crate::expr::Apply {
            head: ADD.clone(),
            args: smallvec::smallvec![Expr::from(2), Expr::from(5)],
        }));
        assert_eq!(evaluate_numeric(&sum), Expr::from(7));
    }
}
