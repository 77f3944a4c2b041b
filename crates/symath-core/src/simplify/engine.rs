//! The fixed-point rewrite engine.
//!
//! A pass walks the expression bottom-up once, running the rule list at
//! every node. Passes repeat until one returns an expression equal to its
//! input, or until the configured pass ceiling is hit.
//!
//! Rules build their rewrites through ordinary construction, which would
//! normally simplify again. A thread-local flag, held by [`SimplifyGuard`]
//! for the duration of a fixed-point run, turns those nested requests into
//! no-ops. Other threads are unaffected.

use std::cell::Cell;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use tracing::{debug, trace, warn};

use crate::error::{ExprError, Result};
use crate::expr::Expr;

use super::rules::{self, Rule};

/// Configuration for the simplification engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimplifierConfig {
    /// Maximum number of passes before giving up with
    /// [`ExprError::NonTerminating`].
    pub max_passes: usize,
}

impl Default for SimplifierConfig {
    fn default() -> Self {
        Self { max_passes: 256 }
    }
}

static CONFIG: Lazy<RwLock<SimplifierConfig>> =
    Lazy::new(|| RwLock::new(SimplifierConfig::default()));

static DEFAULT_RULES: Lazy<Vec<Rule>> = Lazy::new(rules::all_rules);

/// Replaces the process-wide configuration used by construction and
/// [`simplify`], returning the previous one.
pub fn configure(config: SimplifierConfig) -> SimplifierConfig {
    std::mem::replace(&mut *CONFIG.write(), config)
}

/// The process-wide configuration.
#[must_use]
pub fn config() -> SimplifierConfig {
    CONFIG.read().clone()
}

thread_local! {
    static ACTIVE: Cell<bool> = const { Cell::new(false) };
}

/// Marks this thread as simplifying until dropped.
pub(crate) struct SimplifyGuard(());

impl SimplifyGuard {
    /// Takes the flag, or returns `None` if this thread already holds it.
    pub(crate) fn acquire() -> Option<Self> {
        // A refused guard must never be constructed: its drop would clear
        // the flag the holder still owns.
        ACTIVE.with(|active| {
            if active.replace(true) {
                None
            } else {
                Some(SimplifyGuard(()))
            }
        })
    }
}

impl Drop for SimplifyGuard {
    fn drop(&mut self) {
        ACTIVE.with(|active| active.set(false));
    }
}

/// Statistics about one simplification request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SimplificationStats {
    /// Number of passes run, including the final unchanged one.
    pub passes: usize,
    /// Number of rule applications that changed a node.
    pub rewrites: usize,
    /// The request arrived while this thread was already simplifying and
    /// returned its input unchanged.
    pub reentrant: bool,
}

/// The main simplification engine.
#[derive(Clone, Debug)]
pub struct Simplifier {
    /// Configuration.
    config: SimplifierConfig,
    /// Rewrite rules, in pass order.
    rules: Vec<Rule>,
}

impl Default for Simplifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Simplifier {
    /// Creates a simplifier with the default rules and configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(SimplifierConfig::default())
    }

    /// Creates a simplifier with the default rules and a custom configuration.
    #[must_use]
    pub fn with_config(config: SimplifierConfig) -> Self {
        Self {
            config,
            rules: rules::all_rules(),
        }
    }

    /// Sets custom rules (replaces default rules).
    #[must_use]
    pub fn with_rules(mut self, rules: Vec<Rule>) -> Self {
        self.rules = rules;
        self
    }

    /// Appends rules after the existing ones.
    pub fn add_rules(&mut self, rules: impl IntoIterator<Item = Rule>) {
        self.rules.extend(rules);
    }

    /// The rules, in pass order.
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// The configuration.
    #[must_use]
    pub fn config(&self) -> &SimplifierConfig {
        &self.config
    }

    /// Rewrites `expr` to its fixed point.
    ///
    /// # Errors
    ///
    /// Returns [`ExprError::NonTerminating`] if no fixed point is reached
    /// within `max_passes`, and propagates construction errors raised while
    /// rebuilding rewritten nodes.
    pub fn simplify(&self, expr: &Expr) -> Result<Expr> {
        self.simplify_with_stats(expr).map(|(simplified, _)| simplified)
    }

    /// Simplifies and returns both the result and statistics.
    ///
    /// # Errors
    ///
    /// See [`Simplifier::simplify`].
    pub fn simplify_with_stats(&self, expr: &Expr) -> Result<(Expr, SimplificationStats)> {
        match SimplifyGuard::acquire() {
            Some(guard) => fixed_point(&self.rules, &self.config, expr, guard),
            None => Ok(reentrant(expr)),
        }
    }
}

/// Simplifies `expr` with the default rules and the process-wide
/// configuration.
///
/// Called from within an active simplification on the same thread, this
/// returns `expr` unchanged.
///
/// # Errors
///
/// See [`Simplifier::simplify`].
pub fn simplify(expr: &Expr) -> Result<Expr> {
    match SimplifyGuard::acquire() {
        Some(guard) => fixed_point(&DEFAULT_RULES, &config(), expr, guard).map(|(e, _)| e),
        None => Ok(reentrant(expr).0),
    }
}

impl Expr {
    /// Runs the default simplifier on this expression again.
    ///
    /// Constructed terms are already simplified, so this is the identity
    /// unless rules or configuration changed in between.
    ///
    /// # Errors
    ///
    /// See [`Simplifier::simplify`].
    pub fn simplify(&self) -> Result<Expr> {
        simplify(self)
    }
}

fn reentrant(expr: &Expr) -> (Expr, SimplificationStats) {
    trace!(expr = %expr, "simplification already active on this thread; returning input");
    let stats = SimplificationStats {
        reentrant: true,
        ..SimplificationStats::default()
    };
    (expr.clone(), stats)
}

fn fixed_point(
    rules: &[Rule],
    config: &SimplifierConfig,
    expr: &Expr,
    _guard: SimplifyGuard,
) -> Result<(Expr, SimplificationStats)> {
    let rewrites = Cell::new(0usize);
    let steps: Vec<_> = rules
        .iter()
        .map(|rule| {
            let rewrites = &rewrites;
            move |node: &Expr| -> Expr {
                let rewritten = rule.apply(node);
                if rewritten != *node {
                    rewrites.set(rewrites.get() + 1);
                    trace!(rule = rule.name(), before = %node, after = %rewritten, "rule fired");
                }
                rewritten
            }
        })
        .collect();

    let mut current = expr.clone();
    for pass in 1..=config.max_passes {
        let next = current.walk(&steps)?;
        if next == current {
            debug!(
                passes = pass,
                rewrites = rewrites.get(),
                result = %next,
                "simplification reached a fixed point"
            );
            let stats = SimplificationStats {
                passes: pass,
                rewrites: rewrites.get(),
                reentrant: false,
            };
            return Ok((next, stats));
        }
        current = next;
    }

    warn!(
        passes = config.max_passes,
        expr = %expr,
        "non-terminating simplification"
    );
    Err(ExprError::NonTerminating {
        passes: config.max_passes,
    })
}
