//! Function-term construction.
//!
//! Every function term goes through [`Expr::apply`], which normalizes it
//! before handing it back. Direct numeric evaluation, absorbing values and
//! commutative ordering are settled here. The rewriter's fixed point then
//! runs on the result, unless a simplification is already active on this
//! thread.

use crate::error::{ExprError, Result};
use crate::expr::{Apply, Args, Expr, ExprNode};
use crate::intern::Symbol;
use crate::order::operand_cmp;
use crate::simplify;

impl Expr {
    /// Builds `head(args...)` in simplified canonical form.
    ///
    /// # Errors
    ///
    /// Returns [`ExprError::EmptyArguments`] for an empty argument list,
    /// [`ExprError::Evaluation`] when the head's numeric evaluator rejects
    /// its operands, and [`ExprError::NonTerminating`] when the rewriter
    /// hits its pass ceiling.
    pub fn apply<I>(head: impl Into<Expr>, args: I) -> Result<Expr>
    where
        I: IntoIterator,
        I::Item: Into<Expr>,
    {
        let raw = construct(head.into(), args.into_iter().map(Into::into).collect())?;
        if raw.is_leaf() {
            return Ok(raw);
        }
        simplify::simplify(&raw)
    }

    /// Applies this expression as an operator: `self(args...)`.
    ///
    /// # Errors
    ///
    /// See [`Expr::apply`].
    pub fn call<I>(&self, args: I) -> Result<Expr>
    where
        I: IntoIterator,
        I::Item: Into<Expr>,
    {
        Expr::apply(self.clone(), args)
    }
}

/// Settles the construction-time shortcuts and builds the raw term.
fn construct(head: Expr, mut args: Args) -> Result<Expr> {
    if args.is_empty() {
        return Err(ExprError::EmptyArguments {
            head: head.to_string(),
        });
    }

    if let Some(spec) = head.spec() {
        if let [lhs, rhs] = args.as_slice() {
            if let (Some(a), Some(b)) = (lhs.as_number(), rhs.as_number()) {
                let name = head.as_symbol().map_or("", Symbol::name);
                if let Some(outcome) = spec.evaluate(name, a, b) {
                    return outcome;
                }
            }
        }

        if let Some(zero) = &spec.zero {
            if args.contains(zero) {
                return Ok(zero.clone());
            }
        }

        if spec.commutative {
            args.sort_by(|a, b| operand_cmp(&head, a, b));
        }
    }

    Ok(Expr::from_node(ExprNode::Apply(Apply { head, args })))
}
