//! Expression values.
//!
//! An [`Expr`] is an immutable, reference-counted node. Cloning is a pointer
//! copy. Each node caches its structural hash and its canonical printed form,
//! so equality checks, hashing and canonical ordering stay cheap on deep
//! terms.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Index;
use std::sync::{Arc, OnceLock};

use rustc_hash::{FxHashMap, FxHasher};
use smallvec::SmallVec;

use crate::display;
use crate::error::{ExprError, Result};
use crate::handle::Wildcard;
use crate::intern::{Symbol, SymbolTable};
use crate::ops::OperatorSpec;

/// Argument storage for function terms.
pub type Args = SmallVec<[Expr; 2]>;

/// A map keyed by expression value, e.g. a machine-state valuation table.
pub type ExprMap<V> = FxHashMap<Expr, V>;

/// A function term: an operator applied to an ordered argument list.
#[derive(Clone, PartialEq)]
pub struct Apply {
    /// The operator.
    pub head: Expr,
    /// The arguments. Never empty.
    pub args: Args,
}

/// The node behind an [`Expr`].
#[derive(Clone)]
pub enum ExprNode {
    // === Atoms ===
    /// An interned named atom.
    Symbol(Symbol),
    /// A pattern placeholder, equal only to itself.
    Wildcard(Wildcard),
    /// A floating-point literal. `-0.0` is stored as `0.0`.
    Number(f64),
    /// A logical constant.
    Boolean(bool),

    // === Compound ===
    /// An operator application.
    Apply(Apply),
}

impl PartialEq for ExprNode {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ExprNode::Symbol(a), ExprNode::Symbol(b)) => a == b,
            (ExprNode::Wildcard(a), ExprNode::Wildcard(b)) => a == b,
            (ExprNode::Number(a), ExprNode::Number(b)) => a.to_bits() == b.to_bits(),
            (ExprNode::Boolean(a), ExprNode::Boolean(b)) => a == b,
            (ExprNode::Apply(a), ExprNode::Apply(b)) => a == b,
            _ => false,
        }
    }
}

struct Inner {
    node: ExprNode,
    hash: u64,
    canonical: OnceLock<Box<str>>,
}

/// An immutable symbolic expression.
#[derive(Clone)]
pub struct Expr(Arc<Inner>);

impl Expr {
    pub(crate) fn from_node(node: ExprNode) -> Self {
        let hash = structural_hash(&node);
        Self(Arc::new(Inner {
            node,
            hash,
            canonical: OnceLock::new(),
        }))
    }

    // === Leaf constructors ===

    /// The interned symbol named `name`.
    #[must_use]
    pub fn symbol(name: &str) -> Self {
        Self::from_node(ExprNode::Symbol(SymbolTable::global().intern(name, None)))
    }

    /// The interned symbol named `name`, registered as an operator.
    ///
    /// The first registration of a name decides its descriptor.
    #[must_use]
    pub fn operator(name: &str, spec: OperatorSpec) -> Self {
        Self::from_node(ExprNode::Symbol(
            SymbolTable::global().intern(name, Some(spec)),
        ))
    }

    /// A fresh wildcard. Never equal to any other wildcard, whatever its name.
    #[must_use]
    pub fn wildcard(name: &str) -> Self {
        Self::from_node(ExprNode::Wildcard(Wildcard::new(name)))
    }

    /// A numeric literal.
    #[must_use]
    pub fn number(value: f64) -> Self {
        // Collapses -0.0 into 0.0 so equal values share one representation.
        let value = if value == 0.0 { 0.0 } else { value };
        Self::from_node(ExprNode::Number(value))
    }

    /// A boolean literal.
    #[must_use]
    pub fn boolean(value: bool) -> Self {
        Self::from_node(ExprNode::Boolean(value))
    }

    // === Structure ===

    /// The underlying node.
    #[must_use]
    pub fn node(&self) -> &ExprNode {
        &self.0.node
    }

    /// The operator of a function term, or the expression itself for a leaf.
    #[must_use]
    pub fn head(&self) -> &Expr {
        match self.node() {
            ExprNode::Apply(app) => &app.head,
            _ => self,
        }
    }

    /// The arguments of a function term; empty for a leaf.
    #[must_use]
    pub fn args(&self) -> &[Expr] {
        match self.node() {
            ExprNode::Apply(app) => &app.args,
            _ => &[],
        }
    }

    /// Argument count plus one for function terms, one for leaves.
    #[must_use]
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.args().len() + 1
    }

    /// `expr[0]` is the head, `expr[i]` the i-th argument.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Expr> {
        match index {
            0 => Some(self.head()),
            i => self.args().get(i - 1),
        }
    }

    /// Like [`get`](Self::get), reporting an index error.
    ///
    /// # Errors
    ///
    /// Returns [`ExprError::IndexOutOfRange`] past the last argument.
    pub fn try_index(&self, index: usize) -> Result<&Expr> {
        self.get(index).ok_or(ExprError::IndexOutOfRange {
            index,
            len: self.len(),
        })
    }

    /// Both arguments of a two-argument function term.
    #[must_use]
    pub fn binary_args(&self) -> Option<(&Expr, &Expr)> {
        match self.args() {
            [lhs, rhs] => Some((lhs, rhs)),
            _ => None,
        }
    }

    /// True if this is a function term headed by `op`.
    #[must_use]
    pub fn is_apply_of(&self, op: &Expr) -> bool {
        matches!(self.node(), ExprNode::Apply(app) if app.head == *op)
    }

    /// True if this is a two-argument function term headed by `op`.
    #[must_use]
    pub fn is_binary_of(&self, op: &Expr) -> bool {
        self.is_apply_of(op) && self.args().len() == 2
    }

    // === Leaf queries ===

    /// True for anything that is not a function term.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        !matches!(self.node(), ExprNode::Apply(_))
    }

    /// The value of a numeric literal.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self.node() {
            ExprNode::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// The value of a boolean literal.
    #[must_use]
    pub fn as_boolean(&self) -> Option<bool> {
        match self.node() {
            ExprNode::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// The symbol, if this is one.
    #[must_use]
    pub fn as_symbol(&self) -> Option<&Symbol> {
        match self.node() {
            ExprNode::Symbol(s) => Some(s),
            _ => None,
        }
    }

    /// The wildcard, if this is one.
    #[must_use]
    pub fn as_wildcard(&self) -> Option<&Wildcard> {
        match self.node() {
            ExprNode::Wildcard(w) => Some(w),
            _ => None,
        }
    }

    /// True for numeric literals.
    #[must_use]
    pub fn is_number(&self) -> bool {
        matches!(self.node(), ExprNode::Number(_))
    }

    /// True for numeric literals with an integral value.
    #[must_use]
    pub fn is_integer(&self) -> bool {
        self.as_number()
            .is_some_and(|n| n.is_finite() && n.fract() == 0.0)
    }

    /// True for wildcards.
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        matches!(self.node(), ExprNode::Wildcard(_))
    }

    /// The operator descriptor of this symbol, if any.
    #[must_use]
    pub fn spec(&self) -> Option<&OperatorSpec> {
        self.as_symbol().and_then(Symbol::spec)
    }

    // === Whole-tree queries ===

    /// True if `needle` occurs anywhere in this expression, heads included.
    #[must_use]
    pub fn contains(&self, needle: &Expr) -> bool {
        if self == needle {
            return true;
        }
        match self.node() {
            ExprNode::Apply(app) => {
                app.head.contains(needle) || app.args.iter().any(|arg| arg.contains(needle))
            }
            _ => false,
        }
    }

    /// True if any wildcard occurs in this expression.
    #[must_use]
    pub fn has_wildcards(&self) -> bool {
        match self.node() {
            ExprNode::Wildcard(_) => true,
            ExprNode::Apply(app) => {
                app.head.has_wildcards() || app.args.iter().any(Expr::has_wildcards)
            }
            _ => false,
        }
    }

    /// Number of nodes in the tree.
    #[must_use]
    pub fn size(&self) -> usize {
        match self.node() {
            ExprNode::Apply(app) => 1 + app.head.size() + app.args.iter().map(Expr::size).sum::<usize>(),
            _ => 1,
        }
    }

    /// The printed form under the default number format.
    ///
    /// Used as the canonical-ordering tiebreaker, so it ignores the
    /// process-wide display switch.
    #[must_use]
    pub fn canonical_string(&self) -> &str {
        self.0
            .canonical
            .get_or_init(|| display::canonical(self).into_boxed_str())
    }

    /// True if both handles point at the same allocation.
    #[must_use]
    pub fn ptr_eq(&self, other: &Expr) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

fn structural_hash(node: &ExprNode) -> u64 {
    let mut hasher = FxHasher::default();
    match node {
        ExprNode::Symbol(s) => {
            0u8.hash(&mut hasher);
            s.hash(&mut hasher);
        }
        ExprNode::Wildcard(w) => {
            1u8.hash(&mut hasher);
            w.hash(&mut hasher);
        }
        ExprNode::Number(n) => {
            2u8.hash(&mut hasher);
            n.to_bits().hash(&mut hasher);
        }
        ExprNode::Boolean(b) => {
            3u8.hash(&mut hasher);
            b.hash(&mut hasher);
        }
        ExprNode::Apply(app) => {
            4u8.hash(&mut hasher);
            app.head.0.hash.hash(&mut hasher);
            app.args.len().hash(&mut hasher);
            for arg in &app.args {
                arg.0.hash.hash(&mut hasher);
            }
        }
    }
    hasher.finish()
}

impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || (self.0.hash == other.0.hash && self.0.node == other.0.node)
    }
}

impl Eq for Expr {}

impl Hash for Expr {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.0.hash);
    }
}

impl Index<usize> for Expr {
    type Output = Expr;

    fn index(&self, index: usize) -> &Expr {
        match self.get(index) {
            Some(expr) => expr,
            None => panic!(
                "index {index} out of range for expression of length {}",
                self.len()
            ),
        }
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_string())
    }
}

// === Coercions ===

impl From<&Expr> for Expr {
    fn from(expr: &Expr) -> Self {
        expr.clone()
    }
}

impl From<f64> for Expr {
    fn from(value: f64) -> Self {
        Expr::number(value)
    }
}

impl From<f32> for Expr {
    fn from(value: f32) -> Self {
        Expr::number(f64::from(value))
    }
}

impl From<i32> for Expr {
    fn from(value: i32) -> Self {
        Expr::number(f64::from(value))
    }
}

impl From<u32> for Expr {
    fn from(value: u32) -> Self {
        Expr::number(f64::from(value))
    }
}

impl From<i64> for Expr {
    #[allow(clippy::cast_precision_loss)]
    fn from(value: i64) -> Self {
        Expr::number(value as f64)
    }
}

impl From<bool> for Expr {
    fn from(value: bool) -> Self {
        Expr::boolean(value)
    }
}

impl From<&str> for Expr {
    fn from(name: &str) -> Self {
        Expr::symbol(name)
    }
}

impl From<String> for Expr {
    fn from(name: String) -> Self {
        Expr::symbol(&name)
    }
}

/// Symbols for each whitespace-separated name.
#[must_use]
pub fn symbols(names: &str) -> Vec<Expr> {
    names.split_whitespace().map(Expr::symbol).collect()
}

/// Fresh wildcards for each whitespace-separated name.
#[must_use]
pub fn wildcards(names: &str) -> Vec<Expr> {
    names.split_whitespace().map(Expr::wildcard).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::ADD;

    #[test]
    fn test_symbol_interning() {
        let x = Expr::symbol("x");
        let x2 = Expr::symbol("x");
        let y = Expr::symbol("y");

        assert_eq!(x, x2);
        assert_ne!(x, y);

        let mut map = ExprMap::default();
        map.insert(x.clone(), 1);
        assert_eq!(map.get(&x2), Some(&1));
    }

    #[test]
    fn test_wildcards_equal_by_instance() {
        let a = Expr::wildcard("a");
        let a2 = Expr::wildcard("a");

        assert_eq!(a, a.clone());
        assert_ne!(a, a2);
    }

    #[test]
    fn test_negative_zero_normalized() {
        assert_eq!(Expr::number(-0.0), Expr::number(0.0));
        assert_ne!(Expr::number(1.0), Expr::boolean(true));
    }

    #[test]
    fn test_indexing() {
        let xs = symbols("x y");
        let (x, y) = (&xs[0], &xs[1]);

        assert_eq!(x.len(), 1);
        assert_eq!(x[0], *x);

        let sum = x + y * 3;
        assert_eq!(sum.len(), 3);
        assert_eq!(sum[0], *ADD);
        assert_eq!(sum[0].as_symbol().map(Symbol::name), Some("+"));
        assert!(sum.get(3).is_none());
        assert_eq!(
            sum.try_index(3),
            Err(ExprError::IndexOutOfRange { index: 3, len: 3 })
        );
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_index_out_of_range_panics() {
        let x = Expr::symbol("x");
        let _ = &x[1];
    }

    #[test]
    fn test_contains() {
        let xs = symbols("x y z");
        let (x, y, z) = (&xs[0], &xs[1], &xs[2]);
        let f = Expr::symbol("f");

        let e = f.call([x + y]).expect("f(x + y)");
        assert!(e.contains(x));
        assert!(e.contains(&f));
        assert!(!e.contains(z));
        assert!(!e.has_wildcards());

        let a = Expr::wildcard("a");
        assert!(f.call([a]).expect("f(a)").has_wildcards());
    }

    #[test]
    fn test_is_integer() {
        assert!(Expr::from(4).is_integer());
        assert!(!Expr::from(4.5).is_integer());
        assert!(!Expr::symbol("x").is_integer());
    }
}
