//! # symath-core
//!
//! Core expression engine for symath.
//!
//! This crate provides:
//! - Immutable, reference-counted expression values with cached hashes
//! - A process-wide symbol table with typed operator descriptors
//! - Structural pattern matching with wildcard bindings
//! - A fixed-point term rewriter that keeps every constructed term canonical
//!
//! ## Design Principles
//!
//! - **Construction is simplification**: `Expr::apply` always returns a term
//!   that is already at the rewriter's fixed point.
//! - **Structural equality is mathematical equality**: commutative and
//!   associative operators are stored in one canonical shape, so `==` is a
//!   valid equivalence check for the covered rule set.
//! - **Typed operator tags**: algebraic properties live in an
//!   [`OperatorSpec`] attached to the operator's interned symbol.
//!
//! ## Quick Start
//!
//! ```rust
//! use symath_core::{symbols, Expr};
//!
//! let xs = symbols("x y");
//! let (x, y) = (&xs[0], &xs[1]);
//!
//! assert_eq!(x + 0, x.clone());
//! assert_eq!(x + x, Expr::from(2) * x);
//! assert_eq!((x * y) / y, x.clone());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod build;
pub mod display;
pub mod error;
pub mod expr;
pub mod handle;
pub mod intern;
pub mod matcher;
pub mod ops;
pub mod order;
pub mod simplify;
pub mod transform;

mod proptests;
mod tests;

pub use display::{number_format, set_number_format, FloatFormat, IntegerFormat, NumberFormat};
pub use error::{EvalFailure, ExprError, Result};
pub use expr::{symbols, wildcards, Apply, Expr, ExprMap, ExprNode};
pub use handle::{Wildcard, WildcardId};
pub use intern::{Symbol, SymbolTable};
pub use matcher::{match_either, match_pattern, Bindings};
pub use ops::{Cast, NumericOp, OperatorSpec};
pub use order::canonical_cmp;
pub use simplify::{
    config, configure, simplify, Rule, SimplificationStats, Simplifier, SimplifierConfig,
};
