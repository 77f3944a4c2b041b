//! Simplification rules organized by category.
//!
//! Every rule is a total function on expressions: input it does not apply
//! to comes back unchanged, and a rewrite whose construction fails is
//! abandoned the same way.

pub mod arithmetic;
pub mod bitwise;
pub mod canonical;
pub mod distribute;

use std::fmt;

use crate::error::Result;
use crate::expr::Expr;
use crate::ops::OperatorSpec;

/// A named node rewrite.
#[derive(Clone, Copy)]
pub struct Rule {
    name: &'static str,
    apply: fn(&Expr) -> Expr,
}

impl Rule {
    /// Creates a rule.
    #[must_use]
    pub const fn new(name: &'static str, apply: fn(&Expr) -> Expr) -> Self {
        Self { name, apply }
    }

    /// The rule's name, as it appears in trace output.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Rewrites a single node.
    #[must_use]
    pub fn apply(&self, expr: &Expr) -> Expr {
        (self.apply)(expr)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Rule").field(&self.name).finish()
    }
}

/// The default catalog, in the order a pass applies it.
#[must_use]
pub fn all_rules() -> Vec<Rule> {
    vec![
        Rule::new("commutative-order", canonical::commutative_order),
        Rule::new("strip-identities", canonical::strip_identities),
        Rule::new("evaluate-numeric", canonical::evaluate_numeric),
        Rule::new("convert-powers", arithmetic::convert_powers),
        Rule::new("remove-subtraction", arithmetic::remove_subtraction),
        Rule::new("distribute-mul-add", distribute::mul_over_add),
        Rule::new("distribute-and-or", distribute::and_over_or),
        Rule::new("cancel-division", arithmetic::cancel_division),
        Rule::new("fold-additions", arithmetic::fold_additions),
        Rule::new("absorb-zero", canonical::absorb_zero),
        Rule::new("reassociate", canonical::reassociate),
        Rule::new("bit-identities", bitwise::bit_identities),
    ]
}

/// The rewrite if it was built, otherwise the input.
fn or_input(expr: &Expr, rewritten: Result<Expr>) -> Expr {
    rewritten.unwrap_or_else(|_| expr.clone())
}

/// The head's operator descriptor plus both operands of a binary term.
fn binary_parts(expr: &Expr) -> Option<(&OperatorSpec, &Expr, &Expr)> {
    let (lhs, rhs) = expr.binary_args()?;
    Some((expr.head().spec()?, lhs, rhs))
}
