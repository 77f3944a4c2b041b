//! Bottom-up tree transformations.
//!
//! Both traversals rebuild changed nodes through [`Expr::apply`], so their
//! results are renormalized like any other constructed term.

use std::collections::HashMap;
use std::hash::BuildHasher;

use smallvec::SmallVec;

use crate::error::Result;
use crate::expr::{Expr, ExprNode};

impl Expr {
    /// Replaces every subterm that is a key of `map` with its value.
    ///
    /// Arguments are substituted first, then the rebuilt node is looked up
    /// itself, so `f(x)` with `{x: y, f(y): z}` becomes `z`.
    ///
    /// # Errors
    ///
    /// Propagates construction errors from rebuilding changed nodes, e.g. a
    /// division that becomes `n / 0`.
    pub fn substitute<S: BuildHasher>(&self, map: &HashMap<Expr, Expr, S>) -> Result<Expr> {
        let rebuilt = match self.node() {
            ExprNode::Apply(app) => {
                let head = app.head.substitute(map)?;
                let args = app
                    .args
                    .iter()
                    .map(|arg| arg.substitute(map))
                    .collect::<Result<SmallVec<[Expr; 2]>>>()?;
                rebuild(self, head, args)?
            }
            _ => self.clone(),
        };
        Ok(map.get(&rebuilt).cloned().unwrap_or(rebuilt))
    }

    /// Applies `transforms` bottom-up.
    ///
    /// Head and arguments are walked first and the node is rebuilt if any of
    /// them changed; then each transform runs on the node, left to right,
    /// each one seeing the previous one's output.
    ///
    /// # Errors
    ///
    /// Propagates construction errors from rebuilding changed nodes.
    pub fn walk<F>(&self, transforms: &[F]) -> Result<Expr>
    where
        F: Fn(&Expr) -> Expr,
    {
        let mut current = match self.node() {
            ExprNode::Apply(app) => {
                let head = app.head.walk(transforms)?;
                let args = app
                    .args
                    .iter()
                    .map(|arg| arg.walk(transforms))
                    .collect::<Result<SmallVec<[Expr; 2]>>>()?;
                rebuild(self, head, args)?
            }
            _ => self.clone(),
        };
        for transform in transforms {
            current = transform(&current);
        }
        Ok(current)
    }
}

/// Rebuilds `original` from new parts, reusing it when nothing changed.
fn rebuild(original: &Expr, head: Expr, args: SmallVec<[Expr; 2]>) -> Result<Expr> {
    let unchanged = head.ptr_eq(original.head())
        && args.len() == original.args().len()
        && args
            .iter()
            .zip(original.args())
            .all(|(new, old)| new.ptr_eq(old));
    if unchanged {
        Ok(original.clone())
    } else {
        Expr::apply(head, args)
    }
}
