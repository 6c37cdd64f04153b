//! Recognizes mock fields: `@Mock` from JMock or a `context.mock(Type.class)` initializer.

use crate::config::MigrationConfig;
use crate::core::{names, Expr, FieldDecl, TypeRef};
use crate::patterns::Pattern;

/// How the source test obtained the mock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockForm {
    /// `@Mock List<String> list;` with JMock's auto-mock annotation
    Annotated,
    /// `List<String> list = context.mock(List.class);`
    ContextMock,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MockFieldBinding {
    pub member: usize,
    pub field_name: String,
    pub declared_type: TypeRef,
    pub form: MockForm,
    /// Second argument of `context.mock(Type.class, "name")`
    pub mock_name: Option<Expr>,
}

/// Recognizes mock fields owned by one mock-context field.
pub struct MockFieldMatcher {
    context_mock: Pattern,
}

impl MockFieldMatcher {
    pub fn new(config: &MigrationConfig, context_field: &str) -> Self {
        let mock = || Pattern::call("mock").on(Pattern::ident(context_field));
        let declared_by = config.mockery_types();
        let context_mock = Pattern::Alt(vec![
            mock()
                .args(vec![Pattern::ClassLiteral])
                .declared_by(&declared_by)
                .build(),
            mock()
                .args(vec![
                    Pattern::ClassLiteral,
                    Pattern::capture("name", Pattern::Literal),
                ])
                .declared_by(&declared_by)
                .build(),
        ]);
        Self { context_mock }
    }

    pub fn match_field(&self, member: usize, field: &FieldDecl) -> Option<MockFieldBinding> {
        let (form, mock_name) = match &field.initializer {
            None if field.has_annotation(names::JMOCK_AUTO_MOCK) => (MockForm::Annotated, None),
            Some(init) if !field.has_annotation(names::JMOCK_AUTO_MOCK) => {
                let mut binding = self.context_mock.matches(init)?;
                (MockForm::ContextMock, binding.take("name"))
            }
            _ => return None,
        };

        Some(MockFieldBinding {
            member,
            field_name: field.name.clone(),
            declared_type: field.ty.clone(),
            form,
            mock_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Annotation, MethodCall};

    fn context_mock(args: Vec<Expr>, declared_by: Option<&str>) -> Expr {
        let call = MethodCall::on(Expr::ident("context"), "mock", args);
        match declared_by {
            Some(fqn) => call.declared_by(fqn).into_expr(),
            None => call.into_expr(),
        }
    }

    fn list_type() -> TypeRef {
        TypeRef::resolved("List<String>", "java.util.List")
    }

    #[test]
    fn test_annotated_form() {
        let config = MigrationConfig::default();
        let field = FieldDecl::new(list_type(), "mockedList")
            .with_annotation(Annotation::marker(names::JMOCK_AUTO_MOCK));
        let binding = MockFieldMatcher::new(&config, "context")
            .match_field(2, &field)
            .unwrap();
        assert_eq!(binding.form, MockForm::Annotated);
        assert_eq!(binding.field_name, "mockedList");
        assert_eq!(binding.declared_type, list_type());
    }

    #[test]
    fn test_context_mock_form() {
        let config = MigrationConfig::default();
        let field = FieldDecl::new(list_type(), "mockedList").with_initializer(context_mock(
            vec![Expr::class_literal(TypeRef::of("java.util.List"))],
            Some(names::JMOCK_MOCKERY),
        ));
        let binding = MockFieldMatcher::new(&config, "context")
            .match_field(1, &field)
            .unwrap();
        assert_eq!(binding.form, MockForm::ContextMock);
        assert_eq!(binding.mock_name, None);
    }

    #[test]
    fn test_named_context_mock_captures_name() {
        let config = MigrationConfig::default();
        let field = FieldDecl::new(list_type(), "mockedList").with_initializer(context_mock(
            vec![
                Expr::class_literal(TypeRef::of("java.util.List")),
                Expr::string("list"),
            ],
            Some(names::JUNIT_RULE_MOCKERY),
        ));
        let binding = MockFieldMatcher::new(&config, "context")
            .match_field(1, &field)
            .unwrap();
        assert_eq!(binding.mock_name, Some(Expr::string("list")));
    }

    #[test]
    fn test_other_context_or_unresolved_call_is_no_match() {
        let config = MigrationConfig::default();
        let class_arg = || vec![Expr::class_literal(TypeRef::of("java.util.List"))];
        let unresolved =
            FieldDecl::new(list_type(), "a").with_initializer(context_mock(class_arg(), None));
        let other_context = FieldDecl::new(list_type(), "b").with_initializer(
            MethodCall::on(Expr::ident("mockery"), "mock", class_arg())
                .declared_by(names::JMOCK_MOCKERY)
                .into_expr(),
        );
        let matcher = MockFieldMatcher::new(&config, "context");
        assert!(matcher.match_field(0, &unresolved).is_none());
        assert!(matcher.match_field(0, &other_context).is_none());
    }

    #[test]
    fn test_plain_field_is_no_match() {
        let config = MigrationConfig::default();
        let field = FieldDecl::new(list_type(), "items");
        assert!(MockFieldMatcher::new(&config, "context")
            .match_field(0, &field)
            .is_none());
    }
}
