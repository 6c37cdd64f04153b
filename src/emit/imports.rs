//! Import maintenance for a rewritten compilation unit.
//!
//! Imports form two groups, static first. New imports are inserted at their
//! alphabetical position inside their group. A removal candidate is only
//! dropped when nothing left in the unit refers to it, either by resolved
//! name or by an unresolved simple name.

use crate::core::visit::{walk_annotation, walk_call, walk_expr, walk_stmt, Visit};
use crate::core::{simple_name, Annotation, CompilationUnit, Expr, Import, MethodCall, Stmt, TypeRef};
use crate::planner::ImportPlan;
use im::Vector;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use tracing::debug;

/// Names used by a unit after rewriting
#[derive(Debug, Default)]
pub struct References {
    /// Fully qualified names of resolved type and annotation references
    pub resolved: HashSet<String>,
    /// Identifiers that may refer to an import but carry no resolution
    pub simple: HashSet<String>,
    /// `(declaring type, member)` of receiver-less resolved calls
    pub static_members: BTreeSet<(String, String)>,
}

impl References {
    pub fn of(unit: &CompilationUnit) -> Self {
        let mut references = Self::default();
        references.visit_unit(unit);
        references
    }

    pub fn mentions(&self, fqn: &str) -> bool {
        self.resolved.contains(fqn) || self.simple.contains(simple_name(fqn))
    }

    fn add_tokens(&mut self, text: &str) {
        self.simple.extend(identifier_tokens(text).map(str::to_string));
    }
}

impl Visit for References {
    fn visit_type_ref(&mut self, ty: &TypeRef) {
        match &ty.fqn {
            Some(fqn) => {
                self.resolved.insert(fqn.clone());
                // type arguments carry no resolution of their own
                if let Some((_, arguments)) = ty.name.split_once('<') {
                    self.add_tokens(arguments);
                }
            }
            None => self.add_tokens(&ty.name),
        }
    }

    fn visit_annotation(&mut self, annotation: &Annotation) {
        match &annotation.fqn {
            Some(fqn) => {
                self.resolved.insert(fqn.clone());
            }
            None => self.add_tokens(&annotation.name),
        }
        walk_annotation(self, annotation);
    }

    fn visit_stmt(&mut self, stmt: &Stmt) {
        if let Stmt::Opaque(text) = stmt {
            self.add_tokens(text);
        }
        walk_stmt(self, stmt);
    }

    fn visit_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Ident(name) => {
                self.simple.insert(name.clone());
            }
            Expr::Opaque(text) => self.add_tokens(text),
            _ => {}
        }
        walk_expr(self, expr);
    }

    fn visit_call(&mut self, call: &MethodCall) {
        if call.receiver.is_none() {
            match &call.declaring_type {
                Some(owner) => {
                    self.static_members
                        .insert((owner.clone(), call.name.clone()));
                }
                None => {
                    self.simple.insert(call.name.clone());
                }
            }
        }
        walk_call(self, call);
    }
}

fn identifier_tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_' || c == '$'))
        .filter(|token| token.chars().next().is_some_and(|c| !c.is_ascii_digit()))
}

/// Bring the unit's imports in line with the rewritten code
pub fn manage(unit: &mut CompilationUnit, plan: &ImportPlan, static_star_threshold: usize) {
    let references = References::of(unit);

    let before = unit.imports.len();
    unit.imports.retain(|import| {
        import.is_static
            || import.is_wildcard()
            || !plan.remove.contains(&import.path)
            || references.mentions(&import.path)
    });
    debug!(removed = before - unit.imports.len(), "Removed unused imports");

    for path in &plan.add {
        if !is_type_covered(&unit.imports, path) {
            insert_sorted(&mut unit.imports, Import::type_import(path.clone()));
        }
    }

    for owner in &plan.static_owners {
        let needed: BTreeSet<&str> = references
            .static_members
            .iter()
            .filter(|(declaring, _)| declaring == owner)
            .map(|(_, member)| member.as_str())
            .collect();
        add_static_members(unit, owner, &needed, static_star_threshold);
    }
}

fn is_type_covered(imports: &Vector<Import>, path: &str) -> bool {
    let wildcard = format!("{}.*", path.rsplit_once('.').map(|(q, _)| q).unwrap_or(""));
    imports
        .iter()
        .any(|i| !i.is_static && (i.path == path || i.path == wildcard))
}

fn add_static_members(
    unit: &mut CompilationUnit,
    owner: &str,
    needed: &BTreeSet<&str>,
    threshold: usize,
) {
    if needed.is_empty() {
        return;
    }
    let wildcard = format!("{}.*", owner);
    if unit.has_import(&wildcard, true) {
        return;
    }

    let existing: BTreeMap<String, usize> = unit
        .imports
        .iter()
        .enumerate()
        .filter(|(_, i)| i.is_static && i.qualifier() == owner && !i.is_wildcard())
        .map(|(index, i)| (i.simple_name().to_string(), index))
        .collect();
    let missing: Vec<&str> = needed
        .iter()
        .copied()
        .filter(|member| !existing.contains_key(*member))
        .collect();
    if missing.is_empty() {
        return;
    }

    let distinct = existing.len() + missing.len();
    if distinct >= threshold {
        debug!(owner, members = distinct, "Folding static imports into wildcard");
        unit.imports
            .retain(|i| !(i.is_static && i.qualifier() == owner && !i.is_wildcard()));
        insert_sorted(&mut unit.imports, Import::static_import(wildcard));
    } else {
        for member in missing {
            let import = Import::static_import(format!("{}.{}", owner, member));
            insert_sorted(&mut unit.imports, import);
        }
    }
}

/// Insert at the alphabetical position within the import's group
pub fn insert_sorted(imports: &mut Vector<Import>, import: Import) {
    if imports.contains(&import) {
        return;
    }
    let group: Vec<usize> = imports
        .iter()
        .enumerate()
        .filter(|(_, i)| i.is_static == import.is_static)
        .map(|(index, _)| index)
        .collect();

    let position = match group
        .iter()
        .find(|&&index| imports[index].path > import.path)
    {
        Some(&index) => index,
        None => match group.last() {
            Some(&last) => last + 1,
            None if import.is_static => 0,
            None => imports.len(),
        },
    };
    imports.insert(position, import);
}
