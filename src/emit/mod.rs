//! Plan materialization.
//!
//! Edits are applied bottom-up: members in descending index order and, in
//! a method body, statements in descending index order, so the indices the
//! planner recorded stay valid while earlier siblings are still untouched.

pub mod imports;
pub mod validate;

use crate::core::{simple_name, Annotation, ClassDecl, Member, MethodDecl, Stmt};
use crate::planner::{MemberEdit, MethodEdit, RewritePlan};
use im::Vector;
use std::collections::BTreeSet;

/// Apply a class's plan, returning the rewritten class.
pub fn apply(class: &ClassDecl, plan: &RewritePlan) -> ClassDecl {
    let mut rewritten = class.clone();

    let touched: BTreeSet<usize> = plan
        .members
        .keys()
        .chain(plan.methods.keys())
        .copied()
        .collect();

    for &index in touched.iter().rev() {
        if index >= rewritten.members.len() {
            continue;
        }
        if let Some(edit) = plan.members.get(&index) {
            match edit {
                MemberEdit::Remove => {
                    rewritten.members.remove(index);
                }
                MemberEdit::ReplaceField(field) => {
                    rewritten.members.set(index, Member::Field(field.clone()));
                }
            }
            continue;
        }
        if let (Some(edit), Some(Member::Method(method))) =
            (plan.methods.get(&index), rewritten.members.get(index))
        {
            let method = apply_method_edit(method, edit);
            rewritten.members.set(index, Member::Method(method));
        }
    }

    if let Some(annotation) = &plan.class_annotation {
        insert_annotation(&mut rewritten.annotations, annotation.clone());
    }
    rewritten
}

fn apply_method_edit(method: &MethodDecl, edit: &MethodEdit) -> MethodDecl {
    let mut method = method.clone();
    if let Some(annotations) = &edit.annotations {
        method.annotations = annotations.clone();
    }
    if let Some(modifiers) = &edit.modifiers {
        method.modifiers = modifiers.clone();
    }

    if let Some(body) = method.body.as_mut() {
        let statements = &mut body.statements;
        for (&index, replacement) in edit.replace.iter().rev() {
            if index >= statements.len() {
                continue;
            }
            statements.remove(index);
            for (offset, stmt) in replacement.iter().enumerate() {
                statements.insert(index + offset, stmt.clone());
            }
        }

        let mut position = match statements.back() {
            Some(Stmt::Return(_)) => statements.len() - 1,
            _ => statements.len(),
        };
        for stmt in &edit.append {
            statements.insert(position, stmt.clone());
            position += 1;
        }
    }
    method
}

/// Insert keeping class annotations ordered by simple name
fn insert_annotation(annotations: &mut Vector<Annotation>, annotation: Annotation) {
    let key = simple_name(&annotation.name).to_string();
    let position = annotations
        .iter()
        .position(|existing| simple_name(&existing.name) > key.as_str())
        .unwrap_or(annotations.len());
    annotations.insert(position, annotation);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{builders, names, Block, Expr, MethodCall};
    use std::collections::BTreeMap;

    fn call(name: &str) -> Stmt {
        MethodCall::bare(name, vec![]).into_stmt()
    }

    fn rendered(method: &MethodDecl) -> Vec<String> {
        method
            .body
            .iter()
            .flat_map(|b| b.statements.iter().map(ToString::to_string))
            .collect()
    }

    #[test]
    fn test_replacements_apply_bottom_up() {
        let method =
            MethodDecl::new("t").with_body(Block::new([call("a"), call("b"), call("c")]));
        let edit = MethodEdit {
            replace: BTreeMap::from([(0, vec![call("x"), call("y")]), (2, vec![])]),
            append: vec![call("z")],
            ..MethodEdit::default()
        };
        assert_eq!(
            rendered(&apply_method_edit(&method, &edit)),
            vec!["x();", "y();", "b();", "z();"]
        );
    }

    #[test]
    fn test_append_goes_before_trailing_return() {
        let method = MethodDecl::new("t")
            .with_body(Block::new([call("a"), Stmt::Return(Some(Expr::ident("r")))]));
        let edit = MethodEdit {
            append: vec![call("v1"), call("v2")],
            ..MethodEdit::default()
        };
        assert_eq!(
            rendered(&apply_method_edit(&method, &edit)),
            vec!["a();", "v1();", "v2();", "return r;"]
        );
    }

    #[test]
    fn test_class_annotation_sorted_by_simple_name() {
        let class = ClassDecl::new("A")
            .with_annotation(Annotation::marker("org.example.Disabled"))
            .with_annotation(Annotation::marker("org.example.Tag"));
        let plan = RewritePlan {
            class_annotation: Some(builders::extend_with_mockito()),
            ..RewritePlan::default()
        };
        let names: Vec<String> = apply(&class, &plan)
            .annotations
            .iter()
            .map(|a| a.name.clone())
            .collect();
        assert_eq!(names, vec!["Disabled", "ExtendWith", "Tag"]);
    }

    #[test]
    fn test_member_removal_keeps_lower_indices_valid() {
        let class = ClassDecl::new("A")
            .with_member(Member::Method(MethodDecl::new("first")))
            .with_member(Member::Method(MethodDecl::new("second")))
            .with_member(Member::Method(
                MethodDecl::new("third").with_body(Block::new([call("a")])),
            ));
        let plan = RewritePlan {
            members: BTreeMap::from([(0, MemberEdit::Remove)]),
            methods: BTreeMap::from([(
                2,
                MethodEdit {
                    annotations: Some(vec![Annotation::marker(names::JUPITER_TEST)]),
                    ..MethodEdit::default()
                },
            )]),
            ..RewritePlan::default()
        };
        let rewritten = apply(&class, &plan);
        assert_eq!(rewritten.members.len(), 2);
        match rewritten.members.get(1) {
            Some(Member::Method(method)) => {
                assert_eq!(method.name, "third");
                assert!(method.annotation(names::JUPITER_TEST).is_some());
            }
            other => panic!("unexpected member {:?}", other),
        }
    }
}
