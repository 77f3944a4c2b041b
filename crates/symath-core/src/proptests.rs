//! Property-based tests for construction and canonical rewriting.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::ops::{
        ADD, BIT_AND, BIT_OR, BIT_XOR, DIV, MUL, POW, SHL, SHR, SUB,
    };
    use crate::{simplify, symbols, Expr, ExprMap, NumericOp, Result};

    #[derive(Clone, Copy, Debug)]
    enum Op {
        Add,
        Sub,
        Mul,
        Div,
        Pow,
        And,
        Or,
        Xor,
        Shl,
        Shr,
    }

    impl Op {
        fn numeric(self) -> NumericOp {
            match self {
                Op::Add => NumericOp::Add,
                Op::Sub => NumericOp::Sub,
                Op::Mul => NumericOp::Mul,
                Op::Div => NumericOp::Div,
                Op::Pow => NumericOp::Pow,
                Op::And => NumericOp::BitAnd,
                Op::Or => NumericOp::BitOr,
                Op::Xor => NumericOp::BitXor,
                Op::Shl => NumericOp::Shl,
                Op::Shr => NumericOp::Shr,
            }
        }

        fn head(self) -> Expr {
            match self {
                Op::Add => ADD.clone(),
                Op::Sub => SUB.clone(),
                Op::Mul => MUL.clone(),
                Op::Div => DIV.clone(),
                Op::Pow => POW.clone(),
                Op::And => BIT_AND.clone(),
                Op::Or => BIT_OR.clone(),
                Op::Xor => BIT_XOR.clone(),
                Op::Shl => SHL.clone(),
                Op::Shr => SHR.clone(),
            }
        }
    }

    // A recipe for an expression over three variables.
    #[derive(Clone, Debug)]
    enum Term {
        Var(usize),
        Int(i64),
        Node(Op, Box<Term>, Box<Term>),
    }

    const VARIABLES: &str = "x y z";

    // Operators that stay total on small integers.
    fn ring_op() -> BoxedStrategy<Op> {
        prop_oneof![
            Just(Op::Add),
            Just(Op::Sub),
            Just(Op::Mul),
            Just(Op::And),
            Just(Op::Or),
            Just(Op::Xor),
        ]
        .boxed()
    }

    fn any_op() -> BoxedStrategy<Op> {
        prop_oneof![
            ring_op(),
            Just(Op::Div),
            Just(Op::Pow),
            Just(Op::Shl),
            Just(Op::Shr),
        ]
        .boxed()
    }

    fn small_int() -> impl Strategy<Value = i64> {
        -8i64..8i64
    }

    fn tree(ops: BoxedStrategy<Op>) -> impl Strategy<Value = Term> {
        let leaf = prop_oneof![(0usize..3).prop_map(Term::Var), small_int().prop_map(Term::Int)];
        leaf.prop_recursive(3, 12, 2, move |inner| {
            (ops.clone(), inner.clone(), inner)
                .prop_map(|(op, lhs, rhs)| Term::Node(op, Box::new(lhs), Box::new(rhs)))
        })
    }

    fn term() -> impl Strategy<Value = Term> {
        tree(ring_op())
    }

    fn wide_term() -> impl Strategy<Value = Term> {
        tree(any_op())
    }

    // Built through the operator overloads; only total for `ring_op` trees.
    fn build(term: &Term, vars: &[Expr]) -> Expr {
        match term {
            Term::Var(i) => vars[*i].clone(),
            Term::Int(n) => Expr::from(*n),
            Term::Node(op, lhs, rhs) => {
                let (a, b) = (build(lhs, vars), build(rhs, vars));
                match op {
                    Op::Add => a + b,
                    Op::Sub => a - b,
                    Op::Mul => a * b,
                    Op::Div => a / b,
                    Op::Pow => a.pow(b),
                    Op::And => a & b,
                    Op::Or => a | b,
                    Op::Xor => a ^ b,
                    Op::Shl => a << b,
                    Op::Shr => a >> b,
                }
            }
        }
    }

    // Division by zero, negative shifts and friends surface as errors.
    fn try_build(term: &Term, vars: &[Expr]) -> Result<Expr> {
        match term {
            Term::Var(i) => Ok(vars[*i].clone()),
            Term::Int(n) => Ok(Expr::from(*n)),
            Term::Node(op, lhs, rhs) => {
                let (a, b) = (try_build(lhs, vars)?, try_build(rhs, vars)?);
                Expr::apply(op.head(), [a, b])
            }
        }
    }

    fn evaluate(term: &Term, values: &[i64]) -> Option<f64> {
        match term {
            Term::Var(i) => Some(values[*i] as f64),
            Term::Int(n) => Some(*n as f64),
            Term::Node(op, lhs, rhs) => {
                let (a, b) = (evaluate(lhs, values)?, evaluate(rhs, values)?);
                op.numeric().evaluate(a, b).ok()?.as_number()
            }
        }
    }

    proptest! {
        // Construction already reaches the fixed point.

        #[test]
        fn construction_is_idempotent(t in wide_term()) {
            let vars = symbols(VARIABLES);
            let built = try_build(&t, &vars);
            prop_assume!(built.is_ok());
            let e = built.unwrap();
            prop_assert_eq!(simplify(&e), Ok(e.clone()));
        }

        #[test]
        fn commutative_operands_are_ordered(a in wide_term(), b in wide_term()) {
            let vars = symbols(VARIABLES);
            let (a, b) = (try_build(&a, &vars), try_build(&b, &vars));
            prop_assume!(a.is_ok() && b.is_ok());
            let (a, b) = (a.unwrap(), b.unwrap());

            for op in [Op::Add, Op::Mul, Op::And, Op::Or, Op::Xor] {
                let ab = Expr::apply(op.head(), [a.clone(), b.clone()]);
                let ba = Expr::apply(op.head(), [b.clone(), a.clone()]);
                prop_assert_eq!(ab.is_ok(), ba.is_ok());
                if let (Ok(ab), Ok(ba)) = (ab, ba) {
                    prop_assert_eq!(ab, ba);
                }
            }
        }

        #[test]
        fn ring_overloads_match_apply(t in term()) {
            let vars = symbols(VARIABLES);
            prop_assert_eq!(try_build(&t, &vars), Ok(build(&t, &vars)));
        }

        // Identity and zero elements

        #[test]
        fn identities_vanish(t in term()) {
            let vars = symbols(VARIABLES);
            let e = build(&t, &vars);
            prop_assert_eq!(&e + 0, e.clone());
            prop_assert_eq!(&e * 1, e.clone());
            prop_assert_eq!(&e | 0, e.clone());
            prop_assert_eq!(&e ^ 0, e.clone());
        }

        #[test]
        fn zeros_absorb(t in term()) {
            let vars = symbols(VARIABLES);
            let e = build(&t, &vars);
            prop_assert_eq!(&e * 0, Expr::from(0));
            prop_assert_eq!(&e & 0, Expr::from(0));
        }

        #[test]
        fn xor_self_cancels(t in term()) {
            let vars = symbols(VARIABLES);
            let e = build(&t, &vars);
            prop_assert_eq!(&e ^ &e, Expr::from(0));
        }

        // Rewriting never changes what an expression evaluates to.

        #[test]
        fn rewriting_preserves_value(
            t in term(),
            values in prop::array::uniform3(small_int()),
        ) {
            let expected = evaluate(&t, &values);
            prop_assume!(expected.is_some());

            let vars = symbols(VARIABLES);
            let e = build(&t, &vars);
            let env: ExprMap<Expr> = vars
                .iter()
                .cloned()
                .zip(values.iter().map(|&v| Expr::from(v)))
                .collect();
            let substituted = e.substitute(&env).expect("integer operands evaluate");
            prop_assert_eq!(substituted.as_number(), expected);
        }

        #[test]
        fn canonical_string_is_stable(t in term()) {
            let vars = symbols(VARIABLES);
            let e = build(&t, &vars);
            prop_assert_eq!(e.canonical_string(), e.to_string());
            let rebuilt = build(&t, &vars);
            prop_assert_eq!(e.canonical_string(), rebuilt.canonical_string());
        }
    }
}
