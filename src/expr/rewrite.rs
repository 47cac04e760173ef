//! Bottom-up expression rewriting.

use super::Expr;

impl Expr {
    /// Rebuilds the tree bottom-up, handing every node to `f` after its
    /// children have been rewritten. The original tree is left untouched.
    pub fn transform_up(&self, f: &mut impl FnMut(Expr) -> Expr) -> Expr {
        let rebuilt = match self {
            Expr::Function { name, args } => Expr::Function {
                name: name.clone(),
                args: args.iter().map(|a| a.transform_up(f)).collect(),
            },
            Expr::Tuple(items) => Expr::Tuple(items.iter().map(|i| i.transform_up(f)).collect()),
            leaf => leaf.clone(),
        };
        f(rebuilt)
    }

    /// Copy of the tree with every call to `from` renamed to `to`.
    pub fn rename_function(&self, from: &str, to: &str) -> Expr {
        self.transform_up(&mut |node| match node {
            Expr::Function { name, args } if name == from => Expr::Function {
                name: to.to_string(),
                args,
            },
            other => other,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rename_nested_function() {
        let original = Expr::Tuple(vec![
            Expr::function("toYYYYMM", vec![Expr::column("date")]),
            Expr::function(
                "intDiv",
                vec![
                    Expr::function("modulo", vec![Expr::column("id"), Expr::uint(100)]),
                    Expr::uint(10),
                ],
            ),
        ]);

        let renamed = original.rename_function("modulo", "moduloLegacy");
        assert_eq!(
            renamed.to_string(),
            "(toYYYYMM(date), intDiv(moduloLegacy(id, 100), 10))"
        );
        // The source tree is not modified
        assert!(original.contains_function("modulo"));
        assert!(!renamed.contains_function("modulo"));
    }

    #[test]
    fn test_transform_without_match_is_identity() {
        let original = Expr::function("toDate", vec![Expr::column("ts")]);
        assert_eq!(original.rename_function("modulo", "moduloLegacy"), original);
    }

    #[test]
    fn test_transform_visits_children_first() {
        let expr = Expr::function("f", vec![Expr::function("g", vec![Expr::column("x")])]);
        let mut order = Vec::new();
        expr.transform_up(&mut |node| {
            order.push(node.to_string());
            node
        });
        assert_eq!(order, vec!["x", "g(x)", "f(g(x))"]);
    }
}
