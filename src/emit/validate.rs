//! Structural checks on a rewritten unit before it is handed back.

use crate::core::{names, ClassDecl, CompilationUnit, Member};
use crate::errors::RewriteError;
use std::collections::{HashMap, HashSet};

pub fn validate(unit: &CompilationUnit) -> Result<(), RewriteError> {
    let mut seen = HashSet::new();
    let mut single_types: HashMap<&str, &str> = HashMap::new();
    for import in &unit.imports {
        let segments: Vec<&str> = import.path.split('.').collect();
        if segments.len() < 2 || segments.iter().any(|s| s.is_empty()) {
            return Err(violation(format!("malformed import `{}`", import.path)));
        }
        if !seen.insert((import.path.as_str(), import.is_static)) {
            return Err(violation(format!("duplicate import `{}`", import.path)));
        }
        if import.is_static || import.is_wildcard() {
            continue;
        }
        // two single-type imports may not share a simple name
        if let Some(other) = single_types.insert(import.simple_name(), &import.path) {
            return Err(violation(format!(
                "imports `{}` and `{}` both bind `{}`",
                other,
                import.path,
                import.simple_name()
            )));
        }
    }
    unit.types.iter().try_for_each(validate_class)
}

fn validate_class(class: &ClassDecl) -> Result<(), RewriteError> {
    if class.name.is_empty() {
        return Err(violation("class without a name".to_string()));
    }
    let extensions = class
        .annotations
        .iter()
        .filter(|a| a.is(names::JUPITER_EXTEND_WITH))
        .count();
    if extensions > 1 {
        return Err(violation(format!(
            "{} carries {} @ExtendWith annotations",
            class.name, extensions
        )));
    }

    for member in &class.members {
        match member {
            Member::Field(field) => {
                if field.name.is_empty() || field.ty.name.is_empty() {
                    return Err(violation(format!("unnamed field in {}", class.name)));
                }
                if field.has_annotation(names::MOCKITO_MOCK) && field.initializer.is_some() {
                    return Err(violation(format!(
                        "@Mock field {}.{} keeps an initializer",
                        class.name, field.name
                    )));
                }
            }
            Member::Method(method) if method.name.is_empty() => {
                return Err(violation(format!("unnamed method in {}", class.name)));
            }
            Member::Class(nested) => validate_class(nested)?,
            Member::Method(_) | Member::Initializer(_) => {}
        }
    }
    Ok(())
}

fn violation(message: String) -> RewriteError {
    RewriteError::StructuralInvariantViolation(message)
}
