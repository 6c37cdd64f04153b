//! The statement grammar of anonymous-subclass initializer blocks.
//!
//! Both the mock-context configuration block and expectation blocks are
//! finite declarative lists, so each statement is read as one
//! [`Instruction`] instead of modelling general anonymous-class semantics.

use crate::core::{Block, Expr, MethodCall, Stmt};
use crate::patterns::Pattern;
use once_cell::sync::Lazy;

/// Setters that tune the mock context and have no counterpart in Mockito
pub const CONFIGURATION_SETTERS: &[&str] = &["setImposteriser", "setThreadingPolicy"];

#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    /// `setImposteriser(...)`, `setThreadingPolicy(...)`
    Configuration(ConfigurationCall),
    /// `oneOf(target).method(args)`
    Invocation(InvocationExpectation),
    /// `will(...)`
    Will(WillClause),
    Unrecognized(Stmt),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConfigurationCall {
    pub name: String,
    pub args: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvocationExpectation {
    pub target: String,
    pub method: String,
    pub args: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WillClause {
    /// `will(returnValue(v))`
    ReturnValue(Expr),
    /// Any other action, e.g. `will(throwException(e))`
    Other(Expr),
}

static CONFIGURATION: Lazy<Pattern> = Lazy::new(|| {
    let mut call = Pattern::call_any_name().unqualified();
    call.names = CONFIGURATION_SETTERS.iter().map(|s| s.to_string()).collect();
    call.build()
});

static INVOCATION: Lazy<Pattern> = Lazy::new(|| {
    let one_of = Pattern::call("oneOf")
        .unqualified()
        .args(vec![Pattern::capture("target", Pattern::any_ident())])
        .build();
    Pattern::capture("invocation", Pattern::call_any_name().on(one_of).build())
});

static RETURN_VALUE: Lazy<Pattern> = Lazy::new(|| {
    let return_value = Pattern::call("returnValue")
        .unqualified()
        .args(vec![Pattern::capture("value", Pattern::Any)])
        .build();
    Pattern::call("will")
        .unqualified()
        .args(vec![return_value])
        .build()
});

static WILL: Lazy<Pattern> = Lazy::new(|| {
    Pattern::call("will")
        .unqualified()
        .args(vec![Pattern::capture("action", Pattern::Any)])
        .build()
});

/// Read every statement of an initializer block, in order
pub fn parse_block(block: &Block) -> Vec<Instruction> {
    block.statements.iter().map(parse_statement).collect()
}

pub fn parse_statement(stmt: &Stmt) -> Instruction {
    let expr = match stmt {
        Stmt::Expr(expr) => expr,
        other => return Instruction::Unrecognized(other.clone()),
    };

    if let Some(call) = CONFIGURATION.matches(expr).and(expr.as_call()) {
        return Instruction::Configuration(ConfigurationCall {
            name: call.name.clone(),
            args: call.args.clone(),
        });
    }

    if let Some(mut binding) = INVOCATION.matches(expr) {
        let target = binding.ident("target").map(str::to_string);
        if let (Some(target), Some(Expr::Call(call))) = (target, binding.take("invocation")) {
            return Instruction::Invocation(invocation_from(target, call));
        }
    }

    if let Some(mut binding) = RETURN_VALUE.matches(expr) {
        if let Some(value) = binding.take("value") {
            return Instruction::Will(WillClause::ReturnValue(value));
        }
    }

    if let Some(mut binding) = WILL.matches(expr) {
        if let Some(action) = binding.take("action") {
            return Instruction::Will(WillClause::Other(action));
        }
    }

    Instruction::Unrecognized(stmt.clone())
}

fn invocation_from(target: String, call: MethodCall) -> InvocationExpectation {
    InvocationExpectation {
        target,
        method: call.name,
        args: call.args,
    }
}

/// True when every statement is a configuration setter
pub fn is_configuration_only(block: &Block) -> bool {
    parse_block(block)
        .iter()
        .all(|i| matches!(i, Instruction::Configuration(_)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{NewClass, TypeRef};

    fn one_of(target: &str, method: &str, args: Vec<Expr>) -> Stmt {
        MethodCall::on(
            MethodCall::bare("oneOf", vec![Expr::ident(target)]).into_expr(),
            method,
            args,
        )
        .into_stmt()
    }

    fn will_return(value: Expr) -> Stmt {
        MethodCall::bare(
            "will",
            vec![MethodCall::bare("returnValue", vec![value]).into_expr()],
        )
        .into_stmt()
    }

    #[test]
    fn test_parses_invocation_expectation() {
        let instruction = parse_statement(&one_of("mockedList", "add", vec![Expr::string("one")]));
        assert_eq!(
            instruction,
            Instruction::Invocation(InvocationExpectation {
                target: "mockedList".into(),
                method: "add".into(),
                args: vec![Expr::string("one")],
            })
        );
    }

    #[test]
    fn test_parses_will_return_value() {
        assert_eq!(
            parse_statement(&will_return(Expr::int(100))),
            Instruction::Will(WillClause::ReturnValue(Expr::int(100)))
        );
    }

    #[test]
    fn test_other_will_action_is_kept_apart() {
        let throw = MethodCall::bare("throwException", vec![Expr::ident("e")]).into_expr();
        let stmt = MethodCall::bare("will", vec![throw.clone()]).into_stmt();
        assert_eq!(
            parse_statement(&stmt),
            Instruction::Will(WillClause::Other(throw))
        );
    }

    #[test]
    fn test_configuration_setters() {
        let stmt = MethodCall::bare(
            "setThreadingPolicy",
            vec![Expr::New(NewClass {
                ty: TypeRef::of("org.jmock.lib.concurrent.Synchroniser"),
                args: vec![],
                body: None,
            })],
        )
        .into_stmt();
        assert!(matches!(
            parse_statement(&stmt),
            Instruction::Configuration(ConfigurationCall { ref name, .. }) if name == "setThreadingPolicy"
        ));
        assert!(is_configuration_only(&Block::new([stmt])));
    }

    #[test]
    fn test_other_cardinalities_are_unrecognized() {
        let allowing = MethodCall::on(
            MethodCall::bare("allowing", vec![Expr::ident("mockedList")]).into_expr(),
            "size",
            vec![],
        )
        .into_stmt();
        assert!(matches!(
            parse_statement(&allowing),
            Instruction::Unrecognized(_)
        ));
        assert!(!is_configuration_only(&Block::new([allowing])));
    }

    #[test]
    fn test_one_of_on_non_identifier_is_unrecognized() {
        let stmt = MethodCall::on(
            MethodCall::bare("oneOf", vec![Expr::Opaque("mocks[0]".into())]).into_expr(),
            "size",
            vec![],
        )
        .into_stmt();
        assert!(matches!(parse_statement(&stmt), Instruction::Unrecognized(_)));
    }
}
