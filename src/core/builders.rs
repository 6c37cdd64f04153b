//! Constructors for the nodes the rewrite synthesizes.

use super::ast::{Annotation, Expr, MethodCall, Stmt, TypeRef};
use super::names;

/// `@ExtendWith(MockitoExtension.class)`
pub fn extend_with_mockito() -> Annotation {
    Annotation::marker(names::JUPITER_EXTEND_WITH)
        .with_value(Expr::class_literal(TypeRef::of(names::MOCKITO_EXTENSION)))
}

/// `@Mock`, or `@Mock(name = "...")` when the source mock was named
pub fn mockito_mock(name: Option<Expr>) -> Annotation {
    let annotation = Annotation::marker(names::MOCKITO_MOCK);
    match name {
        Some(value) => annotation.with_named("name", value),
        None => annotation,
    }
}

pub fn jupiter_test() -> Annotation {
    Annotation::marker(names::JUPITER_TEST)
}

/// Statically imported call declared by `org.mockito.Mockito`
pub fn mockito_call(name: &str, args: Vec<Expr>) -> MethodCall {
    MethodCall::bare(name, args).declared_by(names::MOCKITO)
}

/// `eq(value)` from `ArgumentMatchers`
pub fn eq(value: Expr) -> Expr {
    MethodCall::bare("eq", vec![value])
        .declared_by(names::ARGUMENT_MATCHERS)
        .into_expr()
}

/// `target.method(args)`
pub fn invocation(target: &str, method: &str, args: Vec<Expr>) -> MethodCall {
    MethodCall::on(Expr::ident(target), method, args)
}

/// `when(invocation).thenReturn(value);`
pub fn stub(invocation: MethodCall, value: Expr) -> Stmt {
    let when = mockito_call("when", vec![invocation.into_expr()]);
    MethodCall::on(when.into_expr(), "thenReturn", vec![value]).into_stmt()
}

/// `verify(target, times(count)).method(args);`
pub fn verify(target: &str, count: usize, method: &str, args: Vec<Expr>) -> Stmt {
    let times = mockito_call("times", vec![Expr::int(count as i64)]);
    let verify = mockito_call("verify", vec![Expr::ident(target), times.into_expr()]);
    MethodCall::on(verify.into_expr(), method, args).into_stmt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stub_renders_when_then_return() {
        let stmt = stub(
            invocation("mockedList", "get", vec![Expr::int(0)]),
            Expr::string("first"),
        );
        assert_eq!(
            stmt.to_string(),
            "when(mockedList.get(0)).thenReturn(\"first\");"
        );
    }

    #[test]
    fn test_verify_renders_times() {
        let stmt = verify("mockedList", 2, "size", vec![]);
        assert_eq!(stmt.to_string(), "verify(mockedList, times(2)).size();");
    }

    #[test]
    fn test_named_mock_annotation() {
        let annotation = mockito_mock(Some(Expr::string("dao")));
        assert_eq!(annotation.to_string(), "@Mock(name = \"dao\")");
        assert_eq!(mockito_mock(None).to_string(), "@Mock");
    }

    #[test]
    fn test_extend_with_renders_class_literal() {
        assert_eq!(
            extend_with_mockito().to_string(),
            "@ExtendWith(MockitoExtension.class)"
        );
    }
}
