use crate::core::{builders, names, Expr};
use crate::matchers::ArgumentSpec;

/// Emit an argument list for Mockito.
///
/// All-literal lists keep plain equality. Once any matcher is present every
/// literal is wrapped in `eq(...)`, since Mockito rejects a mix of raw
/// values and matchers in one call.
pub fn normalize(args: &[ArgumentSpec]) -> Vec<Expr> {
    let mixed = args.iter().any(ArgumentSpec::is_matcher);
    args.iter()
        .map(|arg| match arg {
            ArgumentSpec::Literal(expr) if mixed => builders::eq(expr.clone()),
            ArgumentSpec::Literal(expr) => expr.clone(),
            ArgumentSpec::Matcher(expr) => retarget_matcher(expr),
        })
        .collect()
}

/// Point a pass-through matcher call at Mockito so it gets a static import.
fn retarget_matcher(expr: &Expr) -> Expr {
    match expr {
        Expr::Call(call) if call.receiver.is_none() => {
            let owner = if call.name == "eq" {
                names::ARGUMENT_MATCHERS
            } else {
                names::MOCKITO
            };
            Expr::Call(call.clone().declared_by(owner))
        }
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{MethodCall, TypeRef};

    fn any_string() -> Expr {
        MethodCall::bare(
            "any",
            vec![Expr::class_literal(TypeRef::of("java.lang.String"))],
        )
        .declared_by(names::JMOCK_EXPECTATIONS)
        .into_expr()
    }

    fn render(args: &[Expr]) -> Vec<String> {
        args.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_all_literal_arguments_are_unchanged() {
        let args = vec![
            ArgumentSpec::Literal(Expr::string("a")),
            ArgumentSpec::Literal(Expr::int(1)),
        ];
        assert_eq!(render(&normalize(&args)), vec!["\"a\"", "1"]);
    }

    #[test]
    fn test_mixed_arguments_wrap_literals_in_eq() {
        let args = vec![
            ArgumentSpec::Literal(Expr::string("val1")),
            ArgumentSpec::Matcher(any_string()),
        ];
        let normalized = normalize(&args);
        assert_eq!(render(&normalized), vec!["eq(\"val1\")", "any(String.class)"]);
        assert_eq!(
            normalized[0].as_call().and_then(|c| c.declaring_type.as_deref()),
            Some(names::ARGUMENT_MATCHERS)
        );
        assert_eq!(
            normalized[1].as_call().and_then(|c| c.declaring_type.as_deref()),
            Some(names::MOCKITO)
        );
    }
}
