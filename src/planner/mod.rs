//! Rewrite planning.
//!
//! Turns a [`TestClassModel`] into a [`RewritePlan`]: member-level edits
//! keyed by member index, the class annotation to add, and the import
//! changes. Nothing here touches the tree; the emitter applies the plan.

pub mod arguments;
pub mod verify;

use crate::config::MigrationConfig;
use crate::core::{
    builders, names, Annotation, ClassDecl, Expr, FieldDecl, Member, MethodDecl, Modifier,
    NodePath, Step, Stmt,
};
use crate::correlate::{LocatedBlock, TestClassModel, TestMethodModel};
use crate::errors::{Diagnostic, RewriteError};
use crate::matchers::{ContextFlavor, MockFieldBinding, MockForm};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Imports whose removal is considered once the rewrite is applied
const REMOVABLE_IMPORTS: &[&str] = &[
    names::JUNIT4_RULE,
    names::JMOCK_MOCKERY,
    names::JMOCK_EXPECTATIONS,
    names::JMOCK_AUTO_MOCK,
    names::JMOCK_BYTE_BUDDY_IMPOSTERISER,
    names::JMOCK_CLASS_IMPOSTERISER,
    names::JMOCK_SYNCHRONISER,
    names::MOCKITO_RULE,
    names::MOCKITO_TEST_RULE,
    names::MOCKITO_JUNIT,
    names::MOCKITO_STRICTNESS,
];

/// Edit of a whole field member
#[derive(Debug, Clone, PartialEq)]
pub enum MemberEdit {
    Remove,
    ReplaceField(FieldDecl),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MethodEdit {
    pub annotations: Option<Vec<Annotation>>,
    pub modifiers: Option<Vec<Modifier>>,
    /// Statement index to its replacement; an empty replacement deletes
    pub replace: BTreeMap<usize, Vec<Stmt>>,
    /// Added at the end of the body, ahead of a trailing `return`
    pub append: Vec<Stmt>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportPlan {
    /// Type imports the rewritten class needs
    pub add: BTreeSet<String>,
    /// Type imports to drop if nothing references them afterwards
    pub remove: BTreeSet<String>,
    /// Classes whose statically imported members synthesized code calls
    pub static_owners: Vec<String>,
}

impl ImportPlan {
    /// Combine the import needs of several classes in one unit
    pub fn merge(&mut self, other: &ImportPlan) {
        self.add.extend(other.add.iter().cloned());
        self.remove.extend(other.remove.iter().cloned());
        for owner in &other.static_owners {
            if !self.static_owners.contains(owner) {
                self.static_owners.push(owner.clone());
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RewritePlan {
    pub class_annotation: Option<Annotation>,
    pub members: BTreeMap<usize, MemberEdit>,
    pub methods: BTreeMap<usize, MethodEdit>,
    pub imports: ImportPlan,
    pub diagnostics: Vec<Diagnostic>,
}

pub fn plan(
    class: &ClassDecl,
    class_path: &NodePath,
    model: &TestClassModel,
    config: &MigrationConfig,
) -> Result<RewritePlan, RewriteError> {
    let mut planner = Planner {
        class,
        class_path,
        config,
        plan: RewritePlan {
            diagnostics: model.diagnostics.clone(),
            ..RewritePlan::default()
        },
    };
    planner.swap_context(model);
    planner.normalize_mock_fields(&model.mock_fields)?;
    for method in &model.methods {
        planner.translate_expectations(method)?;
    }
    if config.modernize_test_methods {
        planner.modernize_test_methods();
    }

    debug!(
        class = %class.name,
        member_edits = planner.plan.members.len(),
        method_edits = planner.plan.methods.len(),
        added_imports = planner.plan.imports.add.len(),
        "Planned rewrite"
    );
    Ok(planner.plan)
}

struct Planner<'a> {
    class: &'a ClassDecl,
    class_path: &'a NodePath,
    config: &'a MigrationConfig,
    plan: RewritePlan,
}

impl Planner<'_> {
    /// Remove the rule field and add the extension annotation
    fn swap_context(&mut self, model: &TestClassModel) {
        self.plan
            .members
            .insert(model.context.member, MemberEdit::Remove);

        let imports = &mut self.plan.imports;
        imports.remove.extend(REMOVABLE_IMPORTS.iter().map(|s| s.to_string()));
        imports.remove.extend(self.config.context_types.iter().cloned());
        imports.static_owners = vec![
            names::MOCKITO.to_string(),
            names::ARGUMENT_MATCHERS.to_string(),
        ];

        if !has_mockito_runner(self.class) {
            self.plan.class_annotation = Some(builders::extend_with_mockito());
            imports.add.insert(names::JUPITER_EXTEND_WITH.to_string());
            imports.add.insert(names::MOCKITO_EXTENSION.to_string());
        }

        if model.context.flavor == ContextFlavor::JMock && !model.context.configuration.is_empty() {
            debug!(
                class = %self.class.name,
                setters = model.context.configuration.len(),
                "Dropping mock-context configuration"
            );
        }

        for method in &model.methods {
            let edit = self.method_edit(method.member);
            for &statement in &method.cleanup {
                edit.replace.insert(statement, Vec::new());
            }
        }
    }

    fn normalize_mock_fields(&mut self, mocks: &[MockFieldBinding]) -> Result<(), RewriteError> {
        for mock in mocks {
            let field = match self.class.members.get(mock.member) {
                Some(Member::Field(field)) => field,
                _ => return Err(self.violation(mock.member, "mock binding does not name a field")),
            };
            let rewritten = promote_mock_field(field, mock);
            self.plan
                .members
                .insert(mock.member, MemberEdit::ReplaceField(rewritten));
            self.plan.imports.add.insert(names::MOCKITO_MOCK.to_string());
        }
        Ok(())
    }

    fn translate_expectations(&mut self, method: &TestMethodModel) -> Result<(), RewriteError> {
        let decl = match self.class.members.get(method.member) {
            Some(Member::Method(decl)) => decl,
            _ => return Err(self.violation(method.member, "method model does not name a method")),
        };
        let body = decl.body.as_ref();

        let mut replacements = Vec::new();
        for block in &method.blocks {
            let original = body.and_then(|b| b.statements.get(block.statement));
            let Some(original) = original else {
                return Err(self.violation(method.member, "expectation block index out of range"));
            };
            let replacement = stub_block(original, block)
                .ok_or_else(|| self.violation(method.member, "expectation block lost its shape"))?;
            replacements.push((block.statement, replacement));
        }
        let verifications = verify::synthesize(method.expectations());

        let edit = self.method_edit(method.member);
        edit.replace.extend(replacements);
        edit.append.extend(verifications);
        Ok(())
    }

    /// JUnit 4 `@Test` to Jupiter, dropping `public`.
    ///
    /// All or nothing per class: a `@Test` with arguments keeps needing
    /// `org.junit.Test`, which cannot be imported next to the Jupiter one.
    fn modernize_test_methods(&mut self) {
        let class = self.class;
        let tests: Vec<_> = class
            .methods()
            .filter_map(|(member, method)| {
                method
                    .annotation(names::JUNIT4_TEST)
                    .map(|test| (member, method, test))
            })
            .collect();

        let mut unsupported = false;
        for (member, method, test) in &tests {
            if test.args.is_empty() {
                continue;
            }
            unsupported = true;
            let location = self.class_path.child(Step::Member(*member));
            let error = RewriteError::Unsupported(format!(
                "`{}` on {} has no direct Jupiter equivalent",
                test, method.name
            ));
            self.plan
                .diagnostics
                .push(Diagnostic::new(&class.name, location, &error));
        }
        if unsupported {
            debug!(class = %class.name, "Keeping JUnit 4 tests");
            return;
        }

        for (member, method, _) in tests {
            let (annotations, modifiers) = modernized_header(method);
            let edit = self.method_edit(member);
            edit.annotations = Some(annotations);
            edit.modifiers = Some(modifiers);
            self.plan.imports.add.insert(names::JUPITER_TEST.to_string());
            self.plan.imports.remove.insert(names::JUNIT4_TEST.to_string());
        }
    }

    fn method_edit(&mut self, member: usize) -> &mut MethodEdit {
        self.plan.methods.entry(member).or_default()
    }

    fn violation(&self, member: usize, message: &str) -> RewriteError {
        RewriteError::StructuralInvariantViolation(format!(
            "{} at {}",
            message,
            self.class_path.child(Step::Member(member))
        ))
    }
}

fn has_mockito_runner(class: &ClassDecl) -> bool {
    class.annotations.iter().any(|annotation| {
        let value_is = |fqns: &[&str]| match annotation.value() {
            Some(Expr::ClassLiteral(ty)) => fqns.iter().any(|f| ty.is(f)),
            _ => false,
        };
        (annotation.is(names::JUPITER_EXTEND_WITH) && value_is(&[names::MOCKITO_EXTENSION]))
            || (annotation.is(names::JUNIT4_RUN_WITH)
                && value_is(&[names::MOCKITO_JUNIT_RUNNER, names::MOCKITO_LEGACY_JUNIT_RUNNER]))
    })
}

/// The field as a Mockito `@Mock`: annotation swapped or added, no initializer
fn promote_mock_field(field: &FieldDecl, mock: &MockFieldBinding) -> FieldDecl {
    let mut rewritten = field.clone();
    let annotation = builders::mockito_mock(mock.mock_name.clone());
    match mock.form {
        MockForm::Annotated => {
            for existing in rewritten.annotations.iter_mut() {
                if existing.is(names::JMOCK_AUTO_MOCK) {
                    *existing = annotation.clone();
                }
            }
        }
        MockForm::ContextMock => {
            rewritten.annotations.insert(0, annotation);
            rewritten.initializer = None;
            rewritten.modifiers.retain(|m| *m != Modifier::Final);
        }
    }
    rewritten
}

/// Stubs for the resolved pairs, then whatever could not be translated
fn stub_block(original: &Stmt, block: &LocatedBlock) -> Option<Vec<Stmt>> {
    let mut statements: Vec<Stmt> = block
        .expectations
        .iter()
        .filter_map(|expectation| {
            let value = expectation.return_value.clone()?;
            let invocation = builders::invocation(
                &expectation.target,
                &expectation.method,
                arguments::normalize(&expectation.args),
            );
            Some(builders::stub(invocation, value))
        })
        .collect();

    if !block.residual.is_empty() {
        statements.push(with_expectations(original, &block.residual)?);
    }
    Some(statements)
}

/// The `checking` statement holding only the given initializer statements
fn with_expectations(original: &Stmt, residual: &[Stmt]) -> Option<Stmt> {
    let mut stmt = original.clone();
    let Stmt::Expr(Expr::Call(call)) = &mut stmt else {
        return None;
    };
    let Some(Expr::New(new)) = call.args.first_mut() else {
        return None;
    };
    let body = new.body.as_mut()?;
    match body.members.front_mut() {
        Some(Member::Initializer(block)) => {
            block.statements = residual.iter().cloned().collect();
        }
        _ => return None,
    }
    Some(stmt)
}

fn modernized_header(method: &MethodDecl) -> (Vec<Annotation>, Vec<Modifier>) {
    let annotations = method
        .annotations
        .iter()
        .map(|a| {
            if a.is(names::JUNIT4_TEST) {
                builders::jupiter_test()
            } else {
                a.clone()
            }
        })
        .collect();
    let modifiers = method
        .modifiers
        .iter()
        .copied()
        .filter(|m| *m != Modifier::Public)
        .collect();
    (annotations, modifiers)
}
