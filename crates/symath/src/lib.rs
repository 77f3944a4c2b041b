//! # Symath
//!
//! Symbolic expressions for program analysis and algebra.
//!
//! Symath represents arithmetic and machine-instruction-like expressions as
//! immutable terms, matches them against patterns with wildcards, and keeps
//! every constructed term in a canonical simplified form.
//!
//! ## Features
//!
//! - **Canonical Construction**: every function term is simplified as it is built
//! - **Structural Equality**: commutative and associative chains have one shape
//! - **Pattern Matching**: wildcards with consistent-binding semantics
//! - **Custom Rules**: run your own rule catalog with a [`simplify::Simplifier`]
//!
//! ## Quick Start
//!
//! ```rust
//! use symath::prelude::*;
//!
//! let xs = symbols("x y");
//! let (x, y) = (&xs[0], &xs[1]);
//!
//! let e = (x + 1) * y - y;
//! assert_eq!(e, x * y);
//!
//! let load = Expr::symbol("load");
//! let w = Expr::wildcard("w");
//! let term = load.call([e.clone()]).expect("load(x * y)");
//! let pattern = load.call([w.clone()]).expect("load(w)");
//! let bindings = term.captures(&pattern).expect("matches");
//! assert_eq!(bindings[&w], e);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub use symath_core as core;
pub use symath_core::simplify;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use symath_core::simplify::{Simplifier, SimplifierConfig};
    pub use symath_core::{match_pattern, symbols, wildcards, Bindings, Expr, ExprError, ExprMap};
}
