//! Term rewriting to a canonical fixed point.
//!
//! Construction runs the default [`Simplifier`] on every new function term,
//! so user code rarely calls it directly. A custom rule set can be run with
//! [`Simplifier::with_rules`] or [`Simplifier::add_rules`].
//!
//! ```rust
//! use symath_core::{simplify, symbols, Expr};
//!
//! let xs = symbols("x y");
//! let (x, y) = (&xs[0], &xs[1]);
//!
//! // Distribution and like-term collection happen at construction.
//! let e = (x + y) * 2 - y * 2;
//! assert_eq!(e, Expr::from(2) * x);
//! assert_eq!(simplify(&e), Ok(e.clone()));
//! ```

mod chain;
mod engine;
mod factors;
pub mod rules;

#[cfg(test)]
pub(crate) use engine::SimplifyGuard;
pub use engine::{
    config, configure, simplify, SimplificationStats, Simplifier, SimplifierConfig,
};
pub use rules::{all_rules, Rule};
