// Shared helpers for mockmigrate integration tests
#![allow(dead_code)]

use mockmigrate::core::{ClassDecl, CompilationUnit, Member, MethodDecl, Modifier};
use mockmigrate::{transform, MigrationConfig, Transformed};

const INDENT: &str = "    ";

/// Java-like outline of a unit: imports, then each class with one member
/// per paragraph and one statement per line.
pub fn render_unit(unit: &CompilationUnit) -> String {
    let mut lines = Vec::new();
    for import in &unit.imports {
        if import.is_static {
            lines.push(format!("import static {};", import.path));
        } else {
            lines.push(format!("import {};", import.path));
        }
    }
    for class in &unit.types {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        render_class(class, 0, &mut lines);
    }
    lines.join("\n") + "\n"
}

fn modifiers(modifiers: &[Modifier]) -> String {
    modifiers.iter().map(|m| format!("{} ", m.keyword())).collect()
}

fn render_class(class: &ClassDecl, depth: usize, lines: &mut Vec<String>) {
    let pad = INDENT.repeat(depth);
    for annotation in &class.annotations {
        lines.push(format!("{}{}", pad, annotation));
    }
    lines.push(format!(
        "{}{}class {} {{",
        pad,
        modifiers(&class.modifiers),
        class.name
    ));
    for (index, member) in class.members.iter().enumerate() {
        if index > 0 {
            lines.push(String::new());
        }
        match member {
            Member::Field(field) => lines.push(format!("{}{}{}", pad, INDENT, field)),
            Member::Method(method) => render_method(method, depth + 1, lines),
            Member::Class(nested) => render_class(nested, depth + 1, lines),
            Member::Initializer(block) => lines.push(format!("{}{}{}", pad, INDENT, block)),
        }
    }
    lines.push(format!("{}}}", pad));
}

fn render_method(method: &MethodDecl, depth: usize, lines: &mut Vec<String>) {
    let pad = INDENT.repeat(depth);
    for annotation in &method.annotations {
        lines.push(format!("{}{}", pad, annotation));
    }
    let params: Vec<String> = method
        .params
        .iter()
        .map(|p| format!("{} {}", p.ty, p.name))
        .collect();
    let throws = if method.throws.is_empty() {
        String::new()
    } else {
        let names: Vec<String> = method.throws.iter().map(ToString::to_string).collect();
        format!(" throws {}", names.join(", "))
    };
    let header = format!(
        "{}{}{} {}({}){}",
        pad,
        modifiers(&method.modifiers),
        method.return_type,
        method.name,
        params.join(", "),
        throws
    );
    match &method.body {
        None => lines.push(format!("{};", header)),
        Some(body) => {
            lines.push(format!("{} {{", header));
            for stmt in &body.statements {
                lines.push(format!("{}{}{}", pad, INDENT, stmt));
            }
            lines.push(format!("{}}}", pad));
        }
    }
}

pub fn rewrite(unit: &CompilationUnit) -> Transformed {
    transform(unit, &MigrationConfig::default())
}

pub fn codes(result: &Transformed) -> Vec<&str> {
    result.diagnostics.iter().map(|d| d.code.as_str()).collect()
}
