//! Integration tests for symath-core.

#[cfg(test)]
mod integration_tests {
    use std::cell::Cell;

    use rayon::prelude::*;

    use crate::error::ExprError;
    use crate::simplify::{config, configure, Rule, Simplifier, SimplifierConfig};
    use crate::{match_pattern, simplify, symbols, wildcards, Bindings, Expr, ExprMap};

    #[test]
    fn test_identity_and_zero_laws() {
        let x = Expr::symbol("x");

        assert_eq!(&x + 0, x);
        assert_eq!(&x * 1, x);
        assert_eq!(&x * 0, Expr::from(0));
        assert_eq!(simplify(&x), Ok(x.clone()));
    }

    #[test]
    fn test_repeated_wildcard_must_bind_consistently() {
        let xs = symbols("x y");
        let (x, y) = (&xs[0], &xs[1]);
        let ws = wildcards("P w");
        let (p, w) = (&ws[0], &ws[1]);
        let f = Expr::symbol("f");

        let pattern = p.call([w.clone(), w.clone()]).expect("P(w, w)");
        let same = f.call([x.clone(), x.clone()]).expect("f(x, x)");
        let different = f.call([x.clone(), y.clone()]).expect("f(x, y)");

        let mut bindings = Bindings::new();
        assert!(match_pattern(&same, &pattern, Some(&mut bindings)));
        assert_eq!(bindings[w], *x);
        assert_eq!(bindings[p], f);

        assert!(!match_pattern(&different, &pattern, Some(&mut bindings)));
        assert!(bindings.is_empty());
    }

    #[test]
    fn test_folding() {
        let x = Expr::symbol("x");

        assert_eq!(&x + &x, 2 * &x);
        assert_eq!(&x ^ &x, Expr::from(0));
        assert_eq!(&x & &x, x);
        assert_eq!((&x << 8) >> 8, x);
    }

    #[test]
    fn test_shared_factor_folding() {
        let xs = symbols("x y");
        let (x, y) = (&xs[0], &xs[1]);
        let factored = (y + 1) * x;

        assert_eq!(x + x * y, factored);
        assert_eq!(x * y + x, factored);
        assert_eq!(factored.to_string(), "(x * (1 + y))");
        assert_eq!(simplify(&factored), Ok(factored.clone()));
    }

    #[test]
    fn test_numeric_evaluation() {
        assert_eq!(Expr::from(3) + 4, Expr::from(7));
        assert_eq!(Expr::from(2).pow(3), Expr::from(8));
        assert_eq!(Expr::from(7) & 3, Expr::from(3));
        assert_eq!(Expr::from(1).less_than(2), Expr::from(true));

        let err = Expr::apply(crate::ops::DIV.clone(), [1, 0]).unwrap_err();
        assert!(matches!(err, ExprError::Evaluation { .. }));
    }

    #[test]
    fn test_substitution_renormalizes() {
        let xs = symbols("x y");
        let (x, y) = (&xs[0], &xs[1]);
        let e = x + y * 3;

        let mut env = ExprMap::default();
        env.insert(x.clone(), Expr::from(3));
        env.insert(y.clone(), Expr::from(4));
        assert_eq!(e.substitute(&env), Ok(Expr::from(15)));
    }

    #[test]
    fn test_division_cancellation() {
        let xs = symbols("x y");
        let (x, y) = (&xs[0], &xs[1]);

        assert_eq!((x * y) / y, *x);
        assert_eq!(x / 2, 0.5 * x);
    }

    #[test]
    fn test_distribution_round_trip() {
        let xs = symbols("x y z");
        let (x, y, z) = (&xs[0], &xs[1], &xs[2]);

        let factored = x & (y | z);
        let distributed = (x & y) | (x & z);
        assert_eq!(factored, distributed);
        assert_eq!(factored.to_string(), "((x & y) | (x & z))");
    }

    #[test]
    fn test_canonical_printing() {
        let xs = symbols("x y");
        let (x, y) = (&xs[0], &xs[1]);

        assert_eq!((y + x).to_string(), "(x + y)");
        assert_eq!((x - y).to_string(), "(x + (-1 * y))");
        assert_eq!((x * x).to_string(), "(x ** 2)");
        let f = Expr::symbol("f").call([x.clone(), y.clone()]).expect("f(x, y)");
        assert_eq!(f.to_string(), "f(x,y)");
    }

    // f(a) becomes g(a + 0). The rule body constructs terms while the pass is
    // active, so `a + 0` comes back raw and is cleaned up by the next pass.
    fn wrap_f_in_g(expr: &Expr) -> Expr {
        let f = Expr::symbol("f");
        if !expr.is_apply_of(&f) || expr.args().len() != 1 {
            return expr.clone();
        }
        let padded = &expr.args()[0] + 0;
        Expr::symbol("g").call([padded]).unwrap_or_else(|_| expr.clone())
    }

    #[test]
    fn test_rule_constructing_terms_terminates() {
        let x = Expr::symbol("x");
        let fx = Expr::symbol("f").call([x.clone()]).expect("f(x)");

        let mut simplifier = Simplifier::new();
        simplifier.add_rules([Rule::new("wrap-f-in-g", wrap_f_in_g)]);

        let (result, stats) = simplifier.simplify_with_stats(&fx).expect("terminates");
        assert_eq!(result, Expr::symbol("g").call([x]).expect("g(x)"));
        assert_eq!(stats.passes, 3);
        assert_eq!(stats.rewrites, 2);
        assert!(!stats.reentrant);
    }

    thread_local! {
        static SAW_REENTRANT: Cell<bool> = const { Cell::new(false) };
    }

    fn record_nested_simplify(expr: &Expr) -> Expr {
        if let Ok((_, stats)) = Simplifier::new().simplify_with_stats(expr) {
            SAW_REENTRANT.with(|seen| seen.set(stats.reentrant));
        }
        expr.clone()
    }

    #[test]
    fn test_nested_simplify_is_noop() {
        let x = Expr::symbol("x");
        let simplifier = Simplifier::new()
            .with_rules(vec![Rule::new("record-nested-simplify", record_nested_simplify)]);

        SAW_REENTRANT.with(|seen| seen.set(false));
        let result = simplifier.simplify(&(&x + 1)).expect("terminates");
        assert_eq!(result, &x + 1);
        assert!(SAW_REENTRANT.with(Cell::get));

        // Outside a pass the same call runs normally.
        let (_, stats) = Simplifier::new()
            .simplify_with_stats(&x)
            .expect("terminates");
        assert!(!stats.reentrant);
    }

    fn toggle_h_k(expr: &Expr) -> Expr {
        let (h, k) = (Expr::symbol("h"), Expr::symbol("k"));
        let target = if expr.is_apply_of(&h) {
            k
        } else if expr.is_apply_of(&k) {
            h
        } else {
            return expr.clone();
        };
        target
            .call(expr.args().iter().cloned())
            .unwrap_or_else(|_| expr.clone())
    }

    #[test]
    fn test_oscillating_rules_fail_loudly() {
        let x = Expr::symbol("x");
        let hx = Expr::symbol("h").call([x]).expect("h(x)");

        let mut simplifier = Simplifier::with_config(SimplifierConfig { max_passes: 5 });
        simplifier.add_rules([Rule::new("toggle-h-k", toggle_h_k)]);

        let err = simplifier.simplify(&hx).unwrap_err();
        assert_eq!(err, ExprError::NonTerminating { passes: 5 });
        assert_eq!(
            err.to_string(),
            "non-terminating simplification: no fixed point after 5 passes"
        );
    }

    #[test]
    fn test_configure_round_trip() {
        let roomier = SimplifierConfig {
            max_passes: config().max_passes + 64,
        };
        let previous = configure(roomier.clone());
        assert_eq!(config(), roomier);

        let x = Expr::symbol("x");
        assert_eq!(&x + &x, 2 * &x);

        assert_eq!(configure(previous), roomier);
    }

    #[test]
    fn test_parallel_construction() {
        let printed: Vec<String> = (1..=64i32)
            .into_par_iter()
            .map(|i| {
                let x = Expr::symbol(&format!("v{}", i % 4));
                (&x + &x + i).to_string()
            })
            .collect();

        for (i, p) in (1..=64i32).zip(&printed) {
            assert_eq!(*p, format!("({i} + (2 * v{}))", i % 4));
        }
    }

    #[test]
    fn test_parallel_interning() {
        let shared: Vec<Expr> = (0..32)
            .into_par_iter()
            .map(|_| Expr::symbol("shared"))
            .collect();

        assert!(shared.windows(2).all(|pair| pair[0] == pair[1]));
        assert!(shared
            .iter()
            .all(|s| s.as_symbol() == shared[0].as_symbol()));
    }
}
