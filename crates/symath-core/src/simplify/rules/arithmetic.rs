//! Arithmetic rules: powers, subtraction, division and like terms.

use crate::error::Result;
use crate::expr::Expr;
use crate::ops::{ADD, DIV, MUL, POW, SUB};
use crate::order::canonical_cmp;
use crate::simplify::chain;
use crate::simplify::factors::Factors;

use super::or_input;

/// Collects repeated factors into powers: `x*x*x` becomes `x**3`.
///
/// Numeric factors fold into one leading coefficient, nested powers multiply
/// their exponents and zero exponents vanish.
#[must_use]
pub fn convert_powers(expr: &Expr) -> Expr {
    if !(expr.is_apply_of(&MUL) || expr.is_binary_of(&POW)) {
        return expr.clone();
    }
    Factors::of(expr)
        .and_then(|factors| factors.rebuild())
        .unwrap_or_else(|| expr.clone())
}

/// `a - b` becomes `a + b*-1`.
#[must_use]
pub fn remove_subtraction(expr: &Expr) -> Expr {
    let Some((a, b)) = expr.binary_args().filter(|_| expr.is_apply_of(&SUB)) else {
        return expr.clone();
    };
    let rewritten = Expr::apply(MUL.clone(), [b.clone(), Expr::number(-1.0)])
        .and_then(|negated| Expr::apply(ADD.clone(), [a.clone(), negated]));
    or_input(expr, rewritten)
}

/// Cancels and normalizes quotients.
///
/// - `c * (b / c)` becomes `b`
/// - `a * (b / c)` becomes `(a * b) / c`
/// - `a / n` becomes `a * (1/n)` for a numeric `n`
/// - `a / b` becomes the quotient of their factors when every factor of `b`
///   occurs in `a`
#[must_use]
pub fn cancel_division(expr: &Expr) -> Expr {
    if expr.is_binary_of(&MUL) {
        cancel_product(expr)
    } else if expr.is_binary_of(&DIV) {
        cancel_quotient(expr)
    } else {
        expr.clone()
    }
}

fn cancel_product(expr: &Expr) -> Expr {
    let Some((lhs, rhs)) = expr.binary_args() else {
        return expr.clone();
    };
    for (factor, other) in [(lhs, rhs), (rhs, lhs)] {
        if !other.is_binary_of(&DIV) {
            continue;
        }
        let Some((numerator, denominator)) = other.binary_args() else {
            continue;
        };
        if factor == denominator {
            return numerator.clone();
        }
        let rewritten = Expr::apply(MUL.clone(), [factor.clone(), numerator.clone()])
            .and_then(|product| Expr::apply(DIV.clone(), [product, denominator.clone()]));
        return or_input(expr, rewritten);
    }
    expr.clone()
}

fn cancel_quotient(expr: &Expr) -> Expr {
    let Some((numerator, denominator)) = expr.binary_args() else {
        return expr.clone();
    };
    if let Some(n) = denominator.as_number() {
        let reciprocal = 1.0 / n;
        if !reciprocal.is_finite() {
            return expr.clone();
        }
        return or_input(
            expr,
            Expr::apply(MUL.clone(), [numerator.clone(), Expr::number(reciprocal)]),
        );
    }
    Factors::of(numerator)
        .zip(Factors::of(denominator))
        .and_then(|(a, b)| a.divide(&b))
        .and_then(|quotient| quotient.rebuild())
        .unwrap_or_else(|| expr.clone())
}

/// Combines like terms of an addition chain.
///
/// `a + a` becomes `2*a` and `a + n*a` becomes `(n+1)*a` for a numeric `n`.
/// A term that is one factor of a binary product elsewhere in the chain is
/// pulled out of it: `a + a*b` becomes `(1+b)*a`.
#[must_use]
pub fn fold_additions(expr: &Expr) -> Expr {
    if !expr.is_apply_of(&ADD) {
        return expr.clone();
    }

    let mut constants = Vec::new();
    let mut groups: Vec<(Expr, f64)> = Vec::new();
    let mut terms = 0;
    for term in chain::flatten(&ADD, expr) {
        if term.is_number() {
            constants.push(term);
            continue;
        }
        terms += 1;
        let (coefficient, rest) = split_coefficient(&term);
        match groups.iter_mut().find(|(base, _)| *base == rest) {
            Some((_, total)) => *total += coefficient,
            None => groups.push((rest, coefficient)),
        }
    }
    let mut merged = false;
    while let Some((i, j, cofactor)) = shared_factor(&groups) {
        let (base, c1) = groups[i].clone();
        let c2 = groups[j].1;
        let combined = scaled(c2, cofactor)
            .and_then(|term| Expr::apply(ADD.clone(), [Expr::number(c1), term]))
            .and_then(|coefficient| Expr::apply(MUL.clone(), [coefficient, base]));
        let Ok(combined) = combined else {
            return expr.clone();
        };
        groups[i] = (combined, 1.0);
        groups.remove(j);
        merged = true;
    }
    if !merged && groups.len() == terms {
        return expr.clone();
    }

    let mut operands = constants;
    for (rest, coefficient) in groups {
        if !coefficient.is_finite() {
            return expr.clone();
        }
        if coefficient == 0.0 {
            continue;
        }
        if coefficient == 1.0 {
            operands.push(rest);
            continue;
        }
        match Expr::apply(MUL.clone(), [Expr::number(coefficient), rest]) {
            Ok(term) => operands.push(term),
            Err(_) => return expr.clone(),
        }
    }
    if operands.is_empty() {
        return Expr::number(0.0);
    }
    operands.sort_by(canonical_cmp);
    or_input(expr, chain::build(&ADD, operands))
}

/// Indices `(i, j)` of two groups where group `j` is `base * b` or
/// `b * base` for the base of group `i`, together with `b`.
fn shared_factor(groups: &[(Expr, f64)]) -> Option<(usize, usize, Expr)> {
    for (i, (base, c1)) in groups.iter().enumerate() {
        if *c1 == 0.0 {
            continue;
        }
        for (j, (product, c2)) in groups.iter().enumerate() {
            if i == j || *c2 == 0.0 || !product.is_binary_of(&MUL) {
                continue;
            }
            let Some((lhs, rhs)) = product.binary_args() else {
                continue;
            };
            if lhs == base {
                return Some((i, j, rhs.clone()));
            }
            if rhs == base {
                return Some((i, j, lhs.clone()));
            }
        }
    }
    None
}

/// `c * term`, or `term` itself for a unit coefficient.
fn scaled(c: f64, term: Expr) -> Result<Expr> {
    if c == 1.0 {
        Ok(term)
    } else {
        Expr::apply(MUL.clone(), [Expr::number(c), term])
    }
}

/// `n * rest` for a leading numeric factor, `1 * term` otherwise.
fn split_coefficient(term: &Expr) -> (f64, Expr) {
    if term.is_binary_of(&MUL) {
        if let Some((lhs, rhs)) = term.binary_args() {
            if let Some(coefficient) = lhs.as_number() {
                return (coefficient, rhs.clone());
            }
        }
    }
    (1.0, term.clone())
}
