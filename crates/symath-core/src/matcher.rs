//! Structural pattern matching.
//!
//! A pattern is an ordinary expression that may contain wildcards. Matching
//! walks subject and pattern in lockstep: a wildcard binds whatever it faces,
//! a repeated wildcard must face equal subterms each time, and everything
//! else has to agree structurally.

use std::ops::Index;

use rustc_hash::FxHashMap;

use crate::error::Result;
use crate::expr::{Expr, ExprMap, ExprNode};
use crate::handle::WildcardId;

/// Wildcard bindings produced by a successful match.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Bindings {
    /// Keyed by wildcard identity; holds the wildcard itself and its value.
    map: FxHashMap<WildcardId, (Expr, Expr)>,
}

impl Bindings {
    /// Creates an empty binding set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The value bound to `wildcard`.
    #[must_use]
    pub fn get(&self, wildcard: &Expr) -> Option<&Expr> {
        let id = wildcard.as_wildcard()?.id();
        self.map.get(&id).map(|(_, value)| value)
    }

    /// The value bound to a wildcard named `name`.
    ///
    /// If several bound wildcards share the name, the oldest one wins.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&Expr> {
        self.map
            .iter()
            .filter(|(_, (wildcard, _))| wildcard.as_wildcard().is_some_and(|w| w.name() == name))
            .min_by_key(|(id, _)| **id)
            .map(|(_, (_, value))| value)
    }

    /// Number of bound wildcards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns true if nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterates over `(wildcard, value)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&Expr, &Expr)> {
        self.map.values().map(|(wildcard, value)| (wildcard, value))
    }

    /// Removes every binding.
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// The bindings as a substitution map, ready for [`Expr::substitute`].
    #[must_use]
    pub fn to_substitution(&self) -> ExprMap<Expr> {
        self.map.values().cloned().collect()
    }

    /// Instantiates `template` with these bindings.
    ///
    /// # Errors
    ///
    /// Propagates construction errors from rebuilding the template.
    pub fn instantiate(&self, template: &Expr) -> Result<Expr> {
        template.substitute(&self.to_substitution())
    }

    fn bind(&mut self, pattern: &Expr, subject: &Expr) -> bool {
        let Some(wildcard) = pattern.as_wildcard() else {
            return false;
        };
        match self.map.get(&wildcard.id()) {
            Some((_, bound)) => bound == subject,
            None => {
                self.map
                    .insert(wildcard.id(), (pattern.clone(), subject.clone()));
                true
            }
        }
    }
}

impl Index<&Expr> for Bindings {
    type Output = Expr;

    fn index(&self, wildcard: &Expr) -> &Expr {
        match self.get(wildcard) {
            Some(value) => value,
            None => panic!("wildcard {wildcard} is not bound"),
        }
    }
}

/// Matches `subject` against `pattern`.
///
/// When `bindings` is given it is cleared first and filled only if the match
/// succeeds, so a failed match never leaves partial bindings behind.
pub fn match_pattern(subject: &Expr, pattern: &Expr, bindings: Option<&mut Bindings>) -> bool {
    let mut scratch = Bindings::new();
    let matched = unify(subject, pattern, &mut scratch);
    if let Some(out) = bindings {
        *out = if matched { scratch } else { Bindings::new() };
    }
    matched
}

/// Tries `a` against `b`, then `b` against `a`.
pub fn match_either(a: &Expr, b: &Expr, bindings: Option<&mut Bindings>) -> bool {
    match bindings {
        Some(out) => match_pattern(a, b, Some(&mut *out)) || match_pattern(b, a, Some(out)),
        None => match_pattern(a, b, None) || match_pattern(b, a, None),
    }
}

fn unify(subject: &Expr, pattern: &Expr, bindings: &mut Bindings) -> bool {
    if pattern.is_wildcard() {
        return bindings.bind(pattern, subject);
    }
    match (subject.node(), pattern.node()) {
        (ExprNode::Apply(s), ExprNode::Apply(p)) => {
            s.args.len() == p.args.len()
                && unify(&s.head, &p.head, bindings)
                && s.args
                    .iter()
                    .zip(&p.args)
                    .all(|(s, p)| unify(s, p, bindings))
        }
        (_, ExprNode::Apply(_)) => false,
        _ => subject == pattern,
    }
}

impl Expr {
    /// True if this expression matches `pattern`.
    #[must_use]
    pub fn matches(&self, pattern: &Expr) -> bool {
        match_pattern(self, pattern, None)
    }

    /// The bindings of a successful match against `pattern`.
    #[must_use]
    pub fn captures(&self, pattern: &Expr) -> Option<Bindings> {
        let mut bindings = Bindings::new();
        match_pattern(self, pattern, Some(&mut bindings)).then_some(bindings)
    }
}
