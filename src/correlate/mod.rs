//! Binding correlation for one class.
//!
//! Runs the matchers over a class body once and links their bindings:
//! the rule-context field gates everything, mock fields are recorded in a
//! [`SymbolTable`], and each expectation pair is resolved against it.
//! Whatever cannot be resolved is reported and left in place.

pub mod symbols;

pub use symbols::{FieldSymbol, SymbolTable};

use crate::config::MigrationConfig;
use crate::core::visit::{walk_expr, Visit};
use crate::core::{names, Block, ClassDecl, Expr, Member, MethodDecl, NodePath, Step, Stmt};
use crate::errors::{Diagnostic, RewriteError};
use crate::matchers::{
    ArgumentMatcher, ArgumentSpec, BlockEntry, ContextFlavor, ExpectationBlockMatcher,
    MockFieldBinding, MockFieldMatcher, RuleContextBinding, RuleContextMatcher,
};
use std::collections::HashSet;
use tracing::debug;

/// A resolved expectation statement
#[derive(Debug, Clone, PartialEq)]
pub struct ExpectationBinding {
    pub target: String,
    pub method: String,
    pub args: Vec<ArgumentSpec>,
    pub return_value: Option<Expr>,
}

/// One `checking` statement from the leading run of a test method
#[derive(Debug, Clone, PartialEq)]
pub struct LocatedBlock {
    pub statement: usize,
    pub expectations: Vec<ExpectationBinding>,
    /// Source statements of pairs that could not be resolved
    pub residual: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TestMethodModel {
    pub member: usize,
    pub blocks: Vec<LocatedBlock>,
    /// Statements rooted at the context field whose effect the extension subsumes
    pub cleanup: Vec<usize>,
}

impl TestMethodModel {
    pub fn expectations(&self) -> impl Iterator<Item = &ExpectationBinding> {
        self.blocks.iter().flat_map(|b| b.expectations.iter())
    }

    fn is_empty(&self) -> bool {
        self.blocks.is_empty() && self.cleanup.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TestClassModel {
    pub class_name: String,
    pub context: RuleContextBinding,
    pub mock_fields: Vec<MockFieldBinding>,
    pub methods: Vec<TestMethodModel>,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Correlation {
    /// No mock-context field; the class is left alone
    Untouched,
    /// The class cannot be rewritten safely
    Rejected(Diagnostic),
    Model(Box<TestClassModel>),
}

pub fn correlate(class: &ClassDecl, path: &NodePath, config: &MigrationConfig) -> Correlation {
    let rule_matcher = RuleContextMatcher::new(config);
    let contexts: Vec<RuleContextBinding> = class
        .fields()
        .filter_map(|(member, field)| rule_matcher.match_field(member, field))
        .collect();

    if contexts.len() > 1 {
        return Correlation::Rejected(Diagnostic::new(
            &class.name,
            path.clone(),
            &RewriteError::AmbiguousContext {
                count: contexts.len(),
            },
        ));
    }
    let Some(context) = contexts.into_iter().next() else {
        return Correlation::Untouched;
    };

    debug!(
        class = %class.name,
        context = %context.field_name,
        flavor = ?context.flavor,
        "Found mock-context field"
    );

    let correlator = Correlator::new(class, path, config, context);
    Correlation::Model(Box::new(correlator.run()))
}

struct Correlator<'a> {
    class: &'a ClassDecl,
    path: &'a NodePath,
    config: &'a MigrationConfig,
    context: RuleContextBinding,
    symbols: SymbolTable,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Correlator<'a> {
    fn new(
        class: &'a ClassDecl,
        path: &'a NodePath,
        config: &'a MigrationConfig,
        context: RuleContextBinding,
    ) -> Self {
        Self {
            class,
            path,
            config,
            context,
            symbols: SymbolTable::from_class(class),
            diagnostics: Vec::new(),
        }
    }

    fn run(mut self) -> TestClassModel {
        let mock_fields = match self.context.flavor {
            ContextFlavor::JMock => self.mock_fields(),
            ContextFlavor::Mockito => Vec::new(),
        };
        self.symbols.register_mocks(&mock_fields);
        self.report_field_references(&mock_fields);
        self.report_nested_references();

        let class = self.class;
        let methods = class
            .methods()
            .map(|(member, method)| self.method_model(member, method))
            .filter(|m| !m.is_empty())
            .collect();

        TestClassModel {
            class_name: self.class.name.clone(),
            context: self.context,
            mock_fields,
            methods,
            diagnostics: self.diagnostics,
        }
    }

    fn mock_fields(&self) -> Vec<MockFieldBinding> {
        let matcher = MockFieldMatcher::new(self.config, &self.context.field_name);
        self.class
            .fields()
            .filter(|(member, _)| *member != self.context.member)
            .filter_map(|(member, field)| matcher.match_field(member, field))
            .collect()
    }

    /// Field initializers that still use the context after mocks were matched
    fn report_field_references(&mut self, mocks: &[MockFieldBinding]) {
        let mock_members: HashSet<usize> = mocks.iter().map(|m| m.member).collect();
        let context = self.context.field_name.clone();
        let offending: Vec<(usize, String)> = self
            .class
            .fields()
            .filter(|(member, _)| *member != self.context.member && !mock_members.contains(member))
            .filter_map(|(member, field)| {
                field
                    .initializer
                    .as_ref()
                    .filter(|init| references(init, &context))
                    .map(|init| (member, init.to_string()))
            })
            .collect();

        for (member, text) in offending {
            let location = self.path.child(Step::Member(member));
            self.skip(
                location,
                RewriteError::UnresolvedBinding(format!(
                    "field initializer `{}` uses `{}`",
                    text, context
                )),
            );
        }
    }

    /// Initializer blocks and nested classes still using the context field
    fn report_nested_references(&mut self) {
        let context = self.context.field_name.clone();
        let offending: Vec<(usize, String)> = self
            .class
            .members
            .iter()
            .enumerate()
            .filter_map(|(member, decl)| match decl {
                Member::Initializer(block) if block_references(block, &context) => {
                    Some((member, "initializer block".to_string()))
                }
                // a nested field of the same name shadows the context
                Member::Class(nested)
                    if !nested.fields().any(|(_, f)| f.name == context)
                        && class_references(nested, &context) =>
                {
                    Some((member, format!("nested class {}", nested.name)))
                }
                _ => None,
            })
            .collect();

        for (member, what) in offending {
            let location = self.path.child(Step::Member(member));
            self.skip(
                location,
                RewriteError::UnresolvedBinding(format!("{} uses `{}`", what, context)),
            );
        }
    }

    fn method_model(&mut self, member: usize, method: &MethodDecl) -> TestMethodModel {
        let mut model = TestMethodModel {
            member,
            blocks: Vec::new(),
            cleanup: Vec::new(),
        };
        let Some(body) = &method.body else {
            return model;
        };

        let method_path = self.path.child(Step::Member(member));
        let is_test = method.annotation(names::JUNIT4_TEST).is_some()
            || method.annotation(names::JUPITER_TEST).is_some();
        let context = self.context.field_name.clone();
        let block_matcher = ExpectationBlockMatcher::new(self.config, &context);
        let mut leading = true;

        for (index, stmt) in body.statements.iter().enumerate() {
            let location = method_path.child(Step::Statement(index));

            if self.context.flavor == ContextFlavor::JMock {
                if let Some(block) = block_matcher.match_statement(stmt) {
                    if is_test && leading {
                        let located = self.locate_block(index, &location, block.entries);
                        model.blocks.push(located);
                    } else {
                        self.skip(
                            location,
                            RewriteError::UnresolvedBinding(
                                "expectation block is not in the leading statements of a test method"
                                    .to_string(),
                            ),
                        );
                    }
                    continue;
                }
            }
            leading = false;

            if self.is_cleanup(stmt) {
                model.cleanup.push(index);
            } else if self.context.flavor == ContextFlavor::JMock && stmt_references(stmt, &context)
            {
                self.skip(
                    location,
                    RewriteError::UnresolvedBinding(format!(
                        "statement `{}` uses `{}`",
                        stmt, context
                    )),
                );
            }
        }
        model
    }

    /// Statements the target idiom makes redundant
    fn is_cleanup(&self, stmt: &Stmt) -> bool {
        let Some(call) = stmt.as_call() else {
            return false;
        };
        let rooted = call
            .receiver
            .as_deref()
            .and_then(Expr::root_ident)
            .is_some_and(|root| root == self.context.field_name);
        match self.context.flavor {
            ContextFlavor::JMock => rooted && call.name == "assertIsSatisfied",
            ContextFlavor::Mockito => rooted,
        }
    }

    fn locate_block(
        &mut self,
        statement: usize,
        location: &NodePath,
        entries: Vec<BlockEntry>,
    ) -> LocatedBlock {
        let class_fields = self.symbols.field_names();
        let arguments = ArgumentMatcher::new(self.config, &class_fields);
        let mut expectations = Vec::new();
        let mut residual = Vec::new();

        for entry in entries {
            match entry {
                BlockEntry::Pair(pair) => {
                    let invocation = &pair.invocation;
                    let resolved = match self.symbols.resolve_mock(&invocation.target) {
                        None => Err(RewriteError::UnresolvedBinding(format!(
                            "`{}` is not a mock field of {}",
                            invocation.target, self.class.name
                        ))),
                        Some(_) => arguments.classify_all(&invocation.args),
                    };
                    match resolved {
                        Ok(args) => expectations.push(ExpectationBinding {
                            target: invocation.target.clone(),
                            method: invocation.method.clone(),
                            args,
                            return_value: pair.return_value,
                        }),
                        Err(error) => {
                            self.skip(location.clone(), error);
                            residual.extend(pair.statements);
                        }
                    }
                }
                BlockEntry::Unrecognized { statements, reason } => {
                    self.skip(location.clone(), RewriteError::UnresolvedBinding(reason));
                    residual.extend(statements);
                }
            }
        }

        LocatedBlock {
            statement,
            expectations,
            residual,
        }
    }

    fn skip(&mut self, location: NodePath, error: RewriteError) {
        debug!(
            class = %self.class.name,
            location = %location,
            code = error.code(),
            "Skipping fragment"
        );
        self.diagnostics
            .push(Diagnostic::new(&self.class.name, location, &error));
    }
}

/// Finds uses of one identifier.
struct IdentReferences<'a> {
    name: &'a str,
    found: bool,
}

impl Visit for IdentReferences<'_> {
    fn visit_expr(&mut self, expr: &Expr) {
        if let Expr::Ident(name) = expr {
            self.found |= name == self.name;
        }
        walk_expr(self, expr);
    }
}

fn references(expr: &Expr, name: &str) -> bool {
    let mut finder = IdentReferences { name, found: false };
    finder.visit_expr(expr);
    finder.found
}

fn stmt_references(stmt: &Stmt, name: &str) -> bool {
    let mut finder = IdentReferences { name, found: false };
    finder.visit_stmt(stmt);
    finder.found
}

fn block_references(block: &Block, name: &str) -> bool {
    let mut finder = IdentReferences { name, found: false };
    finder.visit_block(block);
    finder.found
}

fn class_references(class: &ClassDecl, name: &str) -> bool {
    let mut finder = IdentReferences { name, found: false };
    finder.visit_class(class);
    finder.found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::{jmock_class, JmockClassBuilder};

    fn model_of(class: &ClassDecl) -> TestClassModel {
        let path = NodePath::root().child(Step::Type(0));
        match correlate(class, &path, &MigrationConfig::default()) {
            Correlation::Model(model) => *model,
            other => panic!("expected a model, got {:?}", other),
        }
    }

    #[test]
    fn test_class_without_context_is_untouched() {
        let class = JmockClassBuilder::new("A").without_context().build();
        assert_eq!(
            correlate(&class, &NodePath::root(), &MigrationConfig::default()),
            Correlation::Untouched
        );
    }

    #[test]
    fn test_two_contexts_are_rejected() {
        let class = JmockClassBuilder::new("A").with_second_context().build();
        match correlate(&class, &NodePath::root(), &MigrationConfig::default()) {
            Correlation::Rejected(diagnostic) => {
                assert_eq!(diagnostic.code, "ambiguous-context")
            }
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[test]
    fn test_full_expectation_block_correlates() {
        let model = model_of(&jmock_class());
        assert_eq!(model.mock_fields.len(), 1);
        assert_eq!(model.methods.len(), 1);
        let expectations: Vec<_> = model.methods[0].expectations().collect();
        assert_eq!(expectations.len(), 2);
        assert_eq!(expectations[0].method, "add");
        assert_eq!(expectations[1].method, "size");
        assert!(model.diagnostics.is_empty());
    }

    #[test]
    fn test_unknown_target_is_reported_and_kept() {
        let class = JmockClassBuilder::new("A")
            .annotated_mock("mockedList")
            .test_method(
                "testList",
                vec![JmockClassBuilder::checking(vec![
                    JmockClassBuilder::one_of("stranger", "size", vec![]),
                    JmockClassBuilder::will_return(Expr::int(1)),
                ])],
            )
            .build();
        let model = model_of(&class);
        let block = &model.methods[0].blocks[0];
        assert!(block.expectations.is_empty());
        assert_eq!(block.residual.len(), 2);
        assert_eq!(model.diagnostics.len(), 1);
        assert_eq!(model.diagnostics[0].code, "unresolved-binding");
    }

    #[test]
    fn test_checking_after_other_statements_is_not_leading() {
        let class = JmockClassBuilder::new("A")
            .annotated_mock("mockedList")
            .test_method(
                "testList",
                vec![
                    Stmt::Opaque("int x = 1;".into()),
                    JmockClassBuilder::checking(vec![JmockClassBuilder::one_of(
                        "mockedList",
                        "size",
                        vec![],
                    )]),
                ],
            )
            .build();
        let model = model_of(&class);
        assert!(model.methods.is_empty());
        assert_eq!(model.diagnostics.len(), 1);
    }

    #[test]
    fn test_context_use_in_initializer_and_nested_class_is_reported() {
        let checking = JmockClassBuilder::checking(vec![JmockClassBuilder::one_of(
            "mockedList",
            "size",
            vec![],
        )]);
        let helper = ClassDecl::new("Helper").with_member(Member::Method(
            MethodDecl::new("prime").with_body(Block::new(vec![checking.clone()])),
        ));
        let shadowing = JmockClassBuilder::new("Shadowing").build();
        let class = JmockClassBuilder::new("A")
            .annotated_mock("mockedList")
            .member(Member::Initializer(Block::new(vec![checking])))
            .member(Member::Class(Box::new(helper)))
            .member(Member::Class(Box::new(shadowing)))
            .build();
        let model = model_of(&class);

        let locations: Vec<String> = model
            .diagnostics
            .iter()
            .map(|d| d.location.to_string())
            .collect();
        assert_eq!(
            locations,
            vec!["types[0].members[2]", "types[0].members[3]"]
        );
        assert!(model.diagnostics[1].message.contains("nested class Helper"));
        assert!(model
            .diagnostics
            .iter()
            .all(|d| d.code == "unresolved-binding"));
    }

    #[test]
    fn test_assert_is_satisfied_is_cleanup() {
        let class = JmockClassBuilder::new("A")
            .test_method(
                "testNothing",
                vec![crate::core::MethodCall::on(
                    Expr::ident("context"),
                    "assertIsSatisfied",
                    vec![],
                )
                .into_stmt()],
            )
            .build();
        let model = model_of(&class);
        assert_eq!(model.methods[0].cleanup, vec![0]);
        assert!(model.diagnostics.is_empty());
    }
}
