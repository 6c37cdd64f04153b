//! Unit-level rewrite driver.
//!
//! Every class in a unit, nested classes included, goes through
//! correlate, plan and apply independently. Import changes are merged and
//! applied once per unit, then the result is validated. A structural
//! failure anywhere returns the input unit untouched.

use crate::config::MigrationConfig;
use crate::core::{ClassDecl, CompilationUnit, Member, NodePath, Step};
use crate::correlate::{correlate, Correlation};
use crate::emit::{self, imports, validate::validate};
use crate::errors::{Diagnostic, RewriteError};
use crate::planner::{self, ImportPlan};
use serde::Serialize;
use tracing::{debug, debug_span, warn};

/// Outcome of rewriting one compilation unit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transformed {
    pub unit: CompilationUnit,
    pub diagnostics: Vec<Diagnostic>,
    /// `false` when the output equals the input
    pub changed: bool,
}

impl Transformed {
    pub fn has_fatal(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_fatal)
    }
}

/// Rewrite every JMock test class in `unit`.
///
/// Never fails: problems surface as diagnostics. Applying it to its own
/// output is a no-op because the rewritten classes no longer carry a
/// mock-context field.
pub fn transform(unit: &CompilationUnit, config: &MigrationConfig) -> Transformed {
    let _span = debug_span!(
        "transform",
        path = ?unit.path.as_deref().map(|p| p.display().to_string())
    )
    .entered();

    let mut rewriter = UnitRewriter {
        config,
        imports: ImportPlan::default(),
        diagnostics: Vec::new(),
        rewritten_classes: 0,
    };

    match rewriter.rewrite_unit(unit) {
        Ok(rewritten) => {
            let changed = rewritten != *unit;
            debug!(
                classes = rewriter.rewritten_classes,
                diagnostics = rewriter.diagnostics.len(),
                changed,
                "Rewrote unit"
            );
            Transformed {
                unit: rewritten,
                diagnostics: rewriter.diagnostics,
                changed,
            }
        }
        Err((class_name, location, error)) => {
            warn!(class = %class_name, %location, %error, "Leaving unit unchanged");
            let mut diagnostics = rewriter.diagnostics;
            diagnostics.push(Diagnostic::new(class_name, location, &error));
            Transformed {
                unit: unit.clone(),
                diagnostics,
                changed: false,
            }
        }
    }
}

type Failure = (String, NodePath, RewriteError);

struct UnitRewriter<'a> {
    config: &'a MigrationConfig,
    imports: ImportPlan,
    diagnostics: Vec<Diagnostic>,
    rewritten_classes: usize,
}

impl UnitRewriter<'_> {
    fn rewrite_unit(&mut self, unit: &CompilationUnit) -> Result<CompilationUnit, Failure> {
        let mut rewritten = unit.clone();
        for (index, class) in unit.types.iter().enumerate() {
            let path = NodePath::root().child(Step::Type(index));
            let class = self.rewrite_class(class, &path)?;
            rewritten.types.set(index, class);
        }

        if self.rewritten_classes == 0 {
            return Ok(rewritten);
        }
        imports::manage(
            &mut rewritten,
            &self.imports,
            self.config.static_star_threshold,
        );
        validate(&rewritten).map_err(|error| {
            let name = unit
                .types
                .front()
                .map(|c| c.name.clone())
                .unwrap_or_default();
            (name, NodePath::root(), error)
        })?;
        Ok(rewritten)
    }

    /// Nested classes first, so the outer plan's member indices refer to
    /// a member list whose length never changes underneath it.
    fn rewrite_class(&mut self, class: &ClassDecl, path: &NodePath) -> Result<ClassDecl, Failure> {
        let mut current = class.clone();
        for (member, nested) in class.members.iter().enumerate() {
            if let Member::Class(nested) = nested {
                let nested_path = path.child(Step::Member(member));
                let rewritten = self.rewrite_class(nested, &nested_path)?;
                current
                    .members
                    .set(member, Member::Class(Box::new(rewritten)));
            }
        }

        let model = match correlate(&current, path, self.config) {
            Correlation::Untouched => return Ok(current),
            Correlation::Rejected(diagnostic) => {
                debug!(class = %current.name, code = %diagnostic.code, "Class rejected");
                self.diagnostics.push(diagnostic);
                return Ok(current);
            }
            Correlation::Model(model) => model,
        };

        let plan = planner::plan(&current, path, &model, self.config)
            .map_err(|error| (current.name.clone(), path.clone(), error))?;
        self.diagnostics.extend(plan.diagnostics.iter().cloned());
        self.imports.merge(&plan.imports);
        self.rewritten_classes += 1;
        Ok(emit::apply(&current, &plan))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::builders;
    use crate::core::{names, ClassDecl, Import};
    use crate::testkit::{jmock_class_builder, JmockClassBuilder};
    use pretty_assertions::assert_eq;

    fn config() -> MigrationConfig {
        MigrationConfig::default()
    }

    #[test]
    fn test_unit_without_context_is_unchanged() {
        let unit = JmockClassBuilder::new("Plain").without_context().unit();
        let result = transform(&unit, &config());
        assert!(!result.changed);
        assert!(result.diagnostics.is_empty());
        assert_eq!(result.unit, unit);
    }

    #[test]
    fn test_rewrite_is_idempotent() {
        let unit = jmock_class_builder().unit();
        let first = transform(&unit, &config());
        assert!(first.changed);
        let second = transform(&first.unit, &config());
        assert!(!second.changed);
        assert_eq!(second.unit, first.unit);
    }

    #[test]
    fn test_nested_class_is_rewritten() {
        let inner = JmockClassBuilder::new("Inner").build();
        let outer = ClassDecl::new("Outer").with_member(Member::Class(Box::new(inner)));
        let unit = CompilationUnit::new()
            .with_import(Import::type_import(names::JUNIT4_RULE))
            .with_import(Import::type_import(names::JUNIT_RULE_MOCKERY))
            .with_type(outer);
        let result = transform(&unit, &config());
        assert!(result.changed);
        let Some(Member::Class(inner)) = result.unit.types[0].members.get(0) else {
            panic!("nested class should survive");
        };
        assert!(inner.members.is_empty());
        assert_eq!(
            inner.annotations.iter().collect::<Vec<_>>(),
            vec![&builders::extend_with_mockito()]
        );
        assert!(!result.unit.has_import(names::JUNIT4_RULE, false));
        assert!(result.unit.has_import(names::MOCKITO_EXTENSION, false));
    }

    #[test]
    fn test_two_contexts_reject_only_that_class() {
        let unit = JmockClassBuilder::new("Twice").with_second_context().unit();
        let result = transform(&unit, &config());
        assert!(!result.changed);
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].code, "ambiguous-context");
    }
}
