pub mod ast;
pub mod builders;
pub mod display;
pub mod path;
pub mod visit;

pub use ast::{
    simple_name, Annotation, AnnotationArg, AnonymousBody, Block, ClassDecl, CompilationUnit,
    Expr, FieldDecl, Import, Literal, LiteralKind, LocalVar, Member, MethodCall, MethodDecl,
    Modifier, NewClass, Param, Stmt, TypeRef,
};
pub use path::{NodePath, Step};
pub use visit::Visit;

/// Fully qualified names of the types the rewrite recognizes and produces.
pub mod names {
    pub const JUNIT_RULE_MOCKERY: &str = "org.jmock.integration.junit4.JUnitRuleMockery";
    pub const JMOCK_MOCKERY: &str = "org.jmock.Mockery";
    pub const JMOCK_EXPECTATIONS: &str = "org.jmock.Expectations";
    pub const JMOCK_AUTO_MOCK: &str = "org.jmock.auto.Mock";
    pub const JMOCK_BYTE_BUDDY_IMPOSTERISER: &str =
        "org.jmock.imposters.ByteBuddyClassImposteriser";
    pub const JMOCK_CLASS_IMPOSTERISER: &str = "org.jmock.lib.legacy.ClassImposteriser";
    pub const JMOCK_SYNCHRONISER: &str = "org.jmock.lib.concurrent.Synchroniser";

    pub const JUNIT4_RULE: &str = "org.junit.Rule";
    pub const JUNIT4_TEST: &str = "org.junit.Test";
    pub const JUNIT4_RUN_WITH: &str = "org.junit.runner.RunWith";

    pub const MOCKITO_RULE: &str = "org.mockito.junit.MockitoRule";
    pub const MOCKITO_TEST_RULE: &str = "org.mockito.junit.MockitoTestRule";
    pub const MOCKITO_JUNIT: &str = "org.mockito.junit.MockitoJUnit";
    pub const MOCKITO_STRICTNESS: &str = "org.mockito.quality.Strictness";
    pub const MOCKITO_JUNIT_RUNNER: &str = "org.mockito.junit.MockitoJUnitRunner";
    pub const MOCKITO_LEGACY_JUNIT_RUNNER: &str = "org.mockito.runners.MockitoJUnitRunner";

    pub const JUPITER_TEST: &str = "org.junit.jupiter.api.Test";
    pub const JUPITER_EXTEND_WITH: &str = "org.junit.jupiter.api.extension.ExtendWith";
    pub const MOCKITO_EXTENSION: &str = "org.mockito.junit.jupiter.MockitoExtension";
    pub const MOCKITO_MOCK: &str = "org.mockito.Mock";
    pub const MOCKITO: &str = "org.mockito.Mockito";
    pub const ARGUMENT_MATCHERS: &str = "org.mockito.ArgumentMatchers";
}
