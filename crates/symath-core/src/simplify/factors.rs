//! Factor extraction for products and powers.
//!
//! A product/power nest is decomposed into a numeric coefficient and a list
//! of `(base, exponent)` pairs. Repeated bases add their exponents; a power
//! of a power multiplies them; a power of a product spreads over its
//! factors.

use crate::expr::Expr;
use crate::ops::{ADD, MUL, POW};
use crate::order::canonical_cmp;

use super::chain;

/// A product decomposed into coefficient and powers.
#[derive(Clone, Debug)]
pub(crate) struct Factors {
    coefficient: f64,
    powers: Vec<(Expr, Expr)>,
}

impl Factors {
    /// Decomposes `expr`. Returns `None` if an exponent cannot be combined.
    pub(crate) fn of(expr: &Expr) -> Option<Self> {
        let mut factors = Self {
            coefficient: 1.0,
            powers: Vec::new(),
        };
        factors.collect(expr, &Expr::number(1.0))?;
        Some(factors)
    }

    fn collect(&mut self, expr: &Expr, exponent: &Expr) -> Option<()> {
        if expr.is_apply_of(&MUL) {
            for factor in expr.args() {
                self.collect(factor, exponent)?;
            }
        } else if let (true, Some((base, power))) = (expr.is_apply_of(&POW), expr.binary_args()) {
            let combined = scale_exponent(exponent, power)?;
            self.collect(base, &combined)?;
        } else if let (Some(value), Some(e)) = (expr.as_number(), exponent.as_number()) {
            self.coefficient *= value.powf(e);
        } else {
            self.push(expr, exponent)?;
        }
        Some(())
    }

    fn push(&mut self, base: &Expr, exponent: &Expr) -> Option<()> {
        match self.powers.iter_mut().find(|(b, _)| b == base) {
            Some((_, existing)) => *existing = add_exponents(existing, exponent)?,
            None => self.powers.push((base.clone(), exponent.clone())),
        }
        Some(())
    }

    /// `self / divisor`, if every base of `divisor` occurs in `self`.
    pub(crate) fn divide(&self, divisor: &Factors) -> Option<Factors> {
        if divisor.coefficient == 0.0 {
            return None;
        }
        let mut quotient = self.clone();
        quotient.coefficient /= divisor.coefficient;
        for (base, exponent) in &divisor.powers {
            let (_, existing) = quotient.powers.iter_mut().find(|(b, _)| b == base)?;
            let negated = scale_exponent(exponent, &Expr::number(-1.0))?;
            *existing = add_exponents(existing, &negated)?;
        }
        Some(quotient)
    }

    /// The canonical product: sorted operands, right-nested chain.
    ///
    /// Zero exponents drop out and unit exponents leave the bare base.
    pub(crate) fn rebuild(&self) -> Option<Expr> {
        if !self.coefficient.is_finite() {
            return None;
        }
        if self.coefficient == 0.0 {
            return Some(Expr::number(0.0));
        }

        let mut operands = Vec::with_capacity(self.powers.len() + 1);
        for (base, exponent) in &self.powers {
            match exponent.as_number() {
                Some(e) if e == 0.0 => {}
                Some(e) if e == 1.0 => operands.push(base.clone()),
                _ => operands.push(Expr::apply(POW.clone(), [base.clone(), exponent.clone()]).ok()?),
            }
        }
        if self.coefficient != 1.0 || operands.is_empty() {
            operands.push(Expr::number(self.coefficient));
        }

        operands.sort_by(canonical_cmp);
        chain::build(&MUL, operands).ok()
    }
}

/// `outer * inner` for exponents, without introducing unit factors.
fn scale_exponent(outer: &Expr, inner: &Expr) -> Option<Expr> {
    match (outer.as_number(), inner.as_number()) {
        (Some(o), _) if o == 1.0 => Some(inner.clone()),
        (_, Some(i)) if i == 1.0 => Some(outer.clone()),
        _ => Expr::apply(MUL.clone(), [outer.clone(), inner.clone()]).ok(),
    }
}

fn add_exponents(a: &Expr, b: &Expr) -> Option<Expr> {
    Expr::apply(ADD.clone(), [a.clone(), b.clone()]).ok()
}
