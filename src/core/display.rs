//! Source-text rendering of expressions and statements.
//!
//! Produces single-line Java spelling. It is used to compare captured
//! argument expressions by text and to quote fragments in diagnostics; it is
//! not a formatter and makes no attempt at layout.

use super::ast::{
    Annotation, AnonymousBody, Block, Expr, FieldDecl, LocalVar, Member, MethodCall, Modifier,
    NewClass, Stmt, TypeRef,
};
use std::fmt;

fn join<T: fmt::Display>(items: &[T], sep: &str) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(sep)
}

fn modifiers_prefix(modifiers: &[Modifier]) -> String {
    modifiers.iter().map(|m| format!("{} ", m.keyword())).collect()
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.name)?;
        if self.args.is_empty() {
            return Ok(());
        }
        let args: Vec<String> = self
            .args
            .iter()
            .map(|arg| match &arg.name {
                Some(name) => format!("{} = {}", name, arg.value),
                None => arg.value.to_string(),
            })
            .collect();
        write!(f, "({})", args.join(", "))
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Ident(name) => write!(f, "{}", name),
            Expr::Literal(lit) => write!(f, "{}", lit.source),
            Expr::ClassLiteral(ty) => write!(f, "{}.class", ty.base_name()),
            Expr::FieldAccess { target, name } => write!(f, "{}.{}", target, name),
            Expr::Call(call) => write!(f, "{}", call),
            Expr::New(new) => write!(f, "{}", new),
            Expr::Opaque(text) => write!(f, "{}", text),
        }
    }
}

impl fmt::Display for MethodCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(receiver) = &self.receiver {
            write!(f, "{}.", receiver)?;
        }
        write!(f, "{}({})", self.name, join(&self.args, ", "))
    }
}

impl fmt::Display for NewClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "new {}({})", self.ty, join(&self.args, ", "))?;
        if let Some(body) = &self.body {
            write!(f, " {}", body)?;
        }
        Ok(())
    }
}

impl fmt::Display for AnonymousBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let members: Vec<String> = self.members.iter().map(ToString::to_string).collect();
        if members.is_empty() {
            write!(f, "{{}}")
        } else {
            write!(f, "{{ {} }}", members.join(" "))
        }
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Member::Field(field) => write!(f, "{}", field),
            Member::Method(method) => write!(
                f,
                "{}{} {}(...)",
                modifiers_prefix(&method.modifiers),
                method.return_type,
                method.name
            ),
            Member::Class(class) => write!(f, "class {} {{ ... }}", class.name),
            Member::Initializer(block) => write!(f, "{}", block),
        }
    }
}

impl fmt::Display for FieldDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for annotation in &self.annotations {
            write!(f, "{} ", annotation)?;
        }
        write!(f, "{}{} {}", modifiers_prefix(&self.modifiers), self.ty, self.name)?;
        if let Some(init) = &self.initializer {
            write!(f, " = {}", init)?;
        }
        write!(f, ";")
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let statements: Vec<String> = self.statements.iter().map(ToString::to_string).collect();
        if statements.is_empty() {
            write!(f, "{{}}")
        } else {
            write!(f, "{{ {} }}", statements.join(" "))
        }
    }
}

impl fmt::Display for LocalVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{} {}", modifiers_prefix(&self.modifiers), self.ty, self.name)?;
        if let Some(init) = &self.initializer {
            write!(f, " = {}", init)?;
        }
        write!(f, ";")
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::Expr(expr) => write!(f, "{};", expr),
            Stmt::Local(local) => write!(f, "{}", local),
            Stmt::Return(Some(expr)) => write!(f, "return {};", expr),
            Stmt::Return(None) => write!(f, "return;"),
            Stmt::Block(block) => write!(f, "{}", block),
            Stmt::Opaque(text) => write!(f, "{}", text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ast::{AnonymousBody, Block, Member, MethodCall, NewClass};

    #[test]
    fn test_renders_stub_statement() {
        let stub = MethodCall::on(
            MethodCall::bare(
                "when",
                vec![
                    MethodCall::on(Expr::ident("mockedList"), "add", vec![Expr::string("one")])
                        .into_expr(),
                ],
            )
            .into_expr(),
            "thenReturn",
            vec![Expr::boolean(true)],
        )
        .into_stmt();
        assert_eq!(
            stub.to_string(),
            r#"when(mockedList.add("one")).thenReturn(true);"#
        );
    }

    #[test]
    fn test_renders_double_brace_initializer() {
        let block = Block::new([MethodCall::bare("setThreadingPolicy", vec![]).into_stmt()]);
        let new = Expr::New(NewClass {
            ty: TypeRef::of("org.jmock.Expectations"),
            args: vec![],
            body: Some(AnonymousBody {
                members: [Member::Initializer(block)].into_iter().collect(),
            }),
        });
        assert_eq!(
            new.to_string(),
            "new Expectations() { { setThreadingPolicy(); } }"
        );
    }

    #[test]
    fn test_renders_named_annotation_argument() {
        let annotation =
            Annotation::marker("org.mockito.Mock").with_named("name", Expr::string("dao"));
        assert_eq!(annotation.to_string(), r#"@Mock(name = "dao")"#);
    }

    #[test]
    fn test_class_literal_drops_type_arguments() {
        let literal = Expr::class_literal(TypeRef::resolved("List<String>", "java.util.List"));
        assert_eq!(literal.to_string(), "List.class");
    }
}
