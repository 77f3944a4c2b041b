//! Textual rendering.
//!
//! A two-argument term headed by a symbol whose name starts with a
//! non-alphanumeric character prints infix as `(lhs OP rhs)`; every other
//! function term prints as `head(arg1,arg2,...)`.
//!
//! How numbers print is a process-wide setting. The canonical form used for
//! ordering and caching always renders with the default [`NumberFormat`].

use std::fmt::{self, Write};

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use crate::expr::{Expr, ExprNode};

/// Rendering of integral numeric literals.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IntegerFormat {
    /// `255`, `-3`
    #[default]
    Decimal,
    /// `0xff`, `-0x3`
    Hex,
}

/// Rendering of non-integral numeric literals.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FloatFormat {
    /// Shortest representation that round-trips.
    #[default]
    Plain,
    /// Fixed number of digits after the decimal point.
    Precision(usize),
    /// `1.5e-7`
    Scientific,
}

/// Process-wide number display settings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NumberFormat {
    /// How integral values print.
    pub integer: IntegerFormat,
    /// How other values print.
    pub float: FloatFormat,
}

static FORMAT: Lazy<RwLock<NumberFormat>> = Lazy::new(|| RwLock::new(NumberFormat::default()));

/// Replaces the process-wide number format, returning the previous one.
pub fn set_number_format(format: NumberFormat) -> NumberFormat {
    std::mem::replace(&mut *FORMAT.write(), format)
}

/// The current process-wide number format.
#[must_use]
pub fn number_format() -> NumberFormat {
    *FORMAT.read()
}

// Integral values below 2^63 in magnitude print as integers.
const INTEGER_LIMIT: f64 = 9_223_372_036_854_775_808.0;

#[allow(clippy::cast_possible_truncation)]
fn write_number(out: &mut impl Write, value: f64, format: NumberFormat) -> fmt::Result {
    if value.fract() == 0.0 && value.abs() < INTEGER_LIMIT {
        let int = value as i64;
        return match format.integer {
            IntegerFormat::Decimal => write!(out, "{int}"),
            IntegerFormat::Hex if int < 0 => write!(out, "-{:#x}", int.unsigned_abs()),
            IntegerFormat::Hex => write!(out, "{int:#x}"),
        };
    }
    match format.float {
        FloatFormat::Plain => write!(out, "{value}"),
        FloatFormat::Precision(digits) => write!(out, "{value:.digits$}"),
        FloatFormat::Scientific => write!(out, "{value:e}"),
    }
}

fn write_expr(out: &mut impl Write, expr: &Expr, format: NumberFormat) -> fmt::Result {
    match expr.node() {
        ExprNode::Symbol(s) => out.write_str(s.name()),
        ExprNode::Wildcard(w) => out.write_str(w.name()),
        ExprNode::Number(n) => write_number(out, *n, format),
        ExprNode::Boolean(true) => out.write_str("True"),
        ExprNode::Boolean(false) => out.write_str("False"),
        ExprNode::Apply(app) => {
            if let (Some(op), [lhs, rhs]) = (app.head.as_symbol(), app.args.as_slice()) {
                if op.name().chars().next().is_some_and(|c| !c.is_alphanumeric()) {
                    out.write_char('(')?;
                    write_expr(out, lhs, format)?;
                    write!(out, " {} ", op.name())?;
                    write_expr(out, rhs, format)?;
                    return out.write_char(')');
                }
            }
            write_expr(out, &app.head, format)?;
            out.write_char('(')?;
            for (i, arg) in app.args.iter().enumerate() {
                if i > 0 {
                    out.write_char(',')?;
                }
                write_expr(out, arg, format)?;
            }
            out.write_char(')')
        }
    }
}

/// Renders `expr` with the default number format.
pub(crate) fn canonical(expr: &Expr) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_expr(&mut out, expr, NumberFormat::default());
    out
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let format = number_format();
        if format == NumberFormat::default() {
            f.write_str(self.canonical_string())
        } else {
            write_expr(f, self, format)
        }
    }
}
