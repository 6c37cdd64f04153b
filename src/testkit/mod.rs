//! Fixture builders for JMock-style test classes.
//!
//! Building syntax trees by hand is verbose; [`JmockClassBuilder`] assembles
//! the shapes the rewrite recognizes with fully resolved types, and
//! [`JmockClassBuilder::unit`] wraps the class in a compilation unit with
//! the imports the source file would declare.
//!
//! ```rust
//! use mockmigrate::testkit::JmockClassBuilder;
//!
//! let unit = JmockClassBuilder::new("ListTest")
//!     .annotated_mock("mockedList")
//!     .unit();
//! assert_eq!(unit.types[0].members.len(), 2);
//! ```

use crate::core::{
    names, Annotation, AnonymousBody, Block, ClassDecl, CompilationUnit, Expr, FieldDecl, Import,
    LocalVar, Member, MethodCall, MethodDecl, Modifier, NewClass, Stmt, TypeRef,
};
use std::collections::BTreeSet;

pub const LIST: &str = "java.util.List";

#[derive(Debug, Clone)]
pub struct JmockClassBuilder {
    name: String,
    contexts: Vec<FieldDecl>,
    members: Vec<Member>,
    static_imports: BTreeSet<String>,
    imports: BTreeSet<String>,
}

impl JmockClassBuilder {
    /// A public class with `@Rule public JUnitRuleMockery context = new JUnitRuleMockery();`
    pub fn new(name: &str) -> Self {
        let builder = Self {
            name: name.to_string(),
            contexts: Vec::new(),
            members: Vec::new(),
            static_imports: BTreeSet::new(),
            imports: BTreeSet::new(),
        };
        builder.with_context(None)
    }

    pub fn without_context(mut self) -> Self {
        self.contexts.clear();
        self
    }

    /// Context whose initializer block sets the imposteriser and threading policy
    pub fn configured_context(self) -> Self {
        let setters = Block::new([
            MethodCall::bare(
                "setImposteriser",
                vec![Expr::FieldAccess {
                    target: Box::new(Expr::ident("ByteBuddyClassImposteriser")),
                    name: "INSTANCE".into(),
                }],
            )
            .into_stmt(),
            MethodCall::bare(
                "setThreadingPolicy",
                vec![Expr::New(NewClass {
                    ty: TypeRef::of(names::JMOCK_SYNCHRONISER),
                    args: vec![],
                    body: None,
                })],
            )
            .into_stmt(),
        ]);
        let mut body = AnonymousBody::default();
        body.members.push_back(Member::Initializer(setters));
        self.without_context()
            .with_context(Some(body))
            .import(names::JMOCK_BYTE_BUDDY_IMPOSTERISER)
            .import(names::JMOCK_SYNCHRONISER)
    }

    pub fn with_second_context(mut self) -> Self {
        let second = Self::context_field("otherContext", None);
        self.contexts.push(second);
        self
    }

    /// Replace the JMock context with `@Rule public MockitoRule mockito = MockitoJUnit.rule();`
    pub fn mockito_rule(mut self) -> Self {
        self.contexts = vec![FieldDecl::new(TypeRef::of(names::MOCKITO_RULE), "mockito")
            .with_annotation(Annotation::marker(names::JUNIT4_RULE))
            .with_modifier(Modifier::Public)
            .with_initializer(
                MethodCall::on(Expr::ident("MockitoJUnit"), "rule", vec![])
                    .declared_by(names::MOCKITO_JUNIT)
                    .into_expr(),
            )];
        self.imports.remove(names::JUNIT_RULE_MOCKERY);
        self.import(names::MOCKITO_RULE).import(names::MOCKITO_JUNIT)
    }

    fn with_context(mut self, body: Option<AnonymousBody>) -> Self {
        self.contexts.push(Self::context_field("context", body));
        self.import(names::JUNIT_RULE_MOCKERY).import(names::JUNIT4_RULE)
    }

    fn context_field(name: &str, body: Option<AnonymousBody>) -> FieldDecl {
        FieldDecl::new(TypeRef::of(names::JUNIT_RULE_MOCKERY), name)
            .with_annotation(Annotation::marker(names::JUNIT4_RULE))
            .with_modifier(Modifier::Public)
            .with_initializer(Expr::New(NewClass {
                ty: TypeRef::of(names::JUNIT_RULE_MOCKERY),
                args: vec![],
                body,
            }))
    }

    pub fn import(mut self, fqn: &str) -> Self {
        self.imports.insert(fqn.to_string());
        self
    }

    pub fn static_import(mut self, path: &str) -> Self {
        self.static_imports.insert(path.to_string());
        self
    }

    pub fn member(mut self, member: Member) -> Self {
        self.members.push(member);
        self
    }

    /// `@Mock List<String> name;`
    pub fn annotated_mock(self, name: &str) -> Self {
        let field = FieldDecl::new(list_of_strings(), name)
            .with_annotation(Annotation::marker(names::JMOCK_AUTO_MOCK));
        self.member(Member::Field(field))
            .import(names::JMOCK_AUTO_MOCK)
            .import(LIST)
    }

    /// `Type name = context.mock(Type.class);`
    pub fn context_mock(self, name: &str, ty: TypeRef) -> Self {
        let class = TypeRef::resolved(ty.base_name(), ty.fqn.clone().unwrap_or_default());
        let init = MethodCall::on(
            Expr::ident("context"),
            "mock",
            vec![Expr::class_literal(class)],
        )
        .declared_by(names::JMOCK_MOCKERY)
        .into_expr();
        self.field(FieldDecl::new(ty, name).with_initializer(init))
    }

    /// `final List<String> name = context.mock(List.class, "label");`
    pub fn named_context_mock(self, name: &str, label: &str) -> Self {
        let init = MethodCall::on(
            Expr::ident("context"),
            "mock",
            vec![Expr::class_literal(TypeRef::of(LIST)), Expr::string(label)],
        )
        .declared_by(names::JMOCK_MOCKERY)
        .into_expr();
        self.field(
            FieldDecl::new(list_of_strings(), name)
                .with_modifier(Modifier::Final)
                .with_initializer(init),
        )
        .import(LIST)
    }

    pub fn field(self, field: FieldDecl) -> Self {
        let import = field.ty.fqn.clone();
        let builder = self.member(Member::Field(field));
        match import {
            Some(fqn) if fqn.contains('.') && !fqn.starts_with("java.lang.") => {
                builder.import(&fqn)
            }
            _ => builder,
        }
    }

    /// `@Test public void name() { statements }`
    pub fn test_method(self, name: &str, statements: Vec<Stmt>) -> Self {
        let method = MethodDecl::new(name)
            .with_annotation(Annotation::marker(names::JUNIT4_TEST))
            .with_modifier(Modifier::Public)
            .with_body(Block::new(statements));
        self.member(Member::Method(method)).import(names::JUNIT4_TEST)
    }

    pub fn build(&self) -> ClassDecl {
        let mut class = ClassDecl::new(&self.name).with_modifier(Modifier::Public);
        for context in &self.contexts {
            class = class.with_member(Member::Field(context.clone()));
        }
        for member in &self.members {
            class = class.with_member(member.clone());
        }
        class
    }

    pub fn unit(&self) -> CompilationUnit {
        let class = self.build();
        let mut imports = self.imports.clone();
        if self.contexts.is_empty() {
            imports.remove(names::JUNIT_RULE_MOCKERY);
            imports.remove(names::JUNIT4_RULE);
        }
        if self.members.iter().any(uses_expectations) {
            imports.insert(names::JMOCK_EXPECTATIONS.to_string());
        }
        let statics = self.static_imports.iter().cloned().map(Import::static_import);
        let types = imports.into_iter().map(Import::type_import);
        statics
            .chain(types)
            .fold(CompilationUnit::new(), CompilationUnit::with_import)
            .with_type(class)
    }

    /// `oneOf(target).method(args);`
    pub fn one_of(target: &str, method: &str, args: Vec<Expr>) -> Stmt {
        MethodCall::on(
            MethodCall::bare("oneOf", vec![Expr::ident(target)])
                .declared_by(names::JMOCK_EXPECTATIONS)
                .into_expr(),
            method,
            args,
        )
        .into_stmt()
    }

    /// `will(returnValue(value));`
    pub fn will_return(value: Expr) -> Stmt {
        let return_value = MethodCall::bare("returnValue", vec![value])
            .declared_by(names::JMOCK_EXPECTATIONS)
            .into_expr();
        MethodCall::bare("will", vec![return_value])
            .declared_by(names::JMOCK_EXPECTATIONS)
            .into_stmt()
    }

    /// `context.checking(new Expectations() {{ statements }});`
    pub fn checking(statements: Vec<Stmt>) -> Stmt {
        let mut body = AnonymousBody::default();
        body.members.push_back(Member::Initializer(Block::new(statements)));
        MethodCall::on(
            Expr::ident("context"),
            "checking",
            vec![Expr::New(NewClass {
                ty: TypeRef::of(names::JMOCK_EXPECTATIONS),
                args: vec![],
                body: Some(body),
            })],
        )
        .declared_by(names::JMOCK_MOCKERY)
        .into_stmt()
    }

    /// `with(inner)`
    pub fn with(inner: Expr) -> Expr {
        MethodCall::bare("with", vec![inner])
            .declared_by(names::JMOCK_EXPECTATIONS)
            .into_expr()
    }

    /// `any(Type.class)` as JMock resolves it
    pub fn any(fqn: &str) -> Expr {
        MethodCall::bare("any", vec![Expr::class_literal(TypeRef::of(fqn))])
            .declared_by(names::JMOCK_EXPECTATIONS)
            .into_expr()
    }
}

pub fn list_of_strings() -> TypeRef {
    TypeRef::resolved("List<String>", LIST)
}

fn uses_expectations(member: &Member) -> bool {
    match member {
        Member::Method(method) => method.body.as_ref().is_some_and(|body| {
            body.statements
                .iter()
                .any(|stmt| stmt.as_call().is_some_and(|call| call.name == "checking"))
        }),
        _ => false,
    }
}

/// `final Type name = init;`
pub fn final_local(ty: TypeRef, name: &str, init: Expr) -> Stmt {
    Stmt::Local(LocalVar {
        modifiers: vec![Modifier::Final],
        ty,
        name: name.to_string(),
        initializer: Some(init),
    })
}

/// `assertThat(actual, is(expected));`
pub fn assert_that_is(actual: &str, expected: Expr) -> Stmt {
    let is = MethodCall::bare("is", vec![expected])
        .declared_by("org.hamcrest.Matchers")
        .into_expr();
    MethodCall::bare("assertThat", vec![Expr::ident(actual), is])
        .declared_by("org.hamcrest.MatcherAssert")
        .into_stmt()
}

/// The two-pair expectation class:
///
/// ```java
/// @Test
/// public void testList() {
///     context.checking(new Expectations() {{
///         oneOf(mockedList).add("one"); will(returnValue(true));
///         oneOf(mockedList).size(); will(returnValue(100));
///     }});
///     final boolean wasAdded = mockedList.add("one");
///     assertThat(wasAdded, is(true));
///     final int sizeOfList = mockedList.size();
///     assertThat(sizeOfList, is(100));
/// }
/// ```
pub fn jmock_class_builder() -> JmockClassBuilder {
    let list = || Expr::ident("mockedList");
    JmockClassBuilder::new("A")
        .annotated_mock("mockedList")
        .test_method(
            "testList",
            vec![
                JmockClassBuilder::checking(vec![
                    JmockClassBuilder::one_of("mockedList", "add", vec![Expr::string("one")]),
                    JmockClassBuilder::will_return(Expr::boolean(true)),
                    JmockClassBuilder::one_of("mockedList", "size", vec![]),
                    JmockClassBuilder::will_return(Expr::int(100)),
                ]),
                final_local(
                    TypeRef::unresolved("boolean"),
                    "wasAdded",
                    MethodCall::on(list(), "add", vec![Expr::string("one")])
                        .declared_by(LIST)
                        .into_expr(),
                ),
                assert_that_is("wasAdded", Expr::boolean(true)),
                final_local(
                    TypeRef::unresolved("int"),
                    "sizeOfList",
                    MethodCall::on(list(), "size", vec![])
                        .declared_by(LIST)
                        .into_expr(),
                ),
                assert_that_is("sizeOfList", Expr::int(100)),
            ],
        )
        .static_import("org.hamcrest.MatcherAssert.assertThat")
        .static_import("org.hamcrest.Matchers.is")
}

pub fn jmock_class() -> ClassDecl {
    jmock_class_builder().build()
}
