//! Classifies expectation arguments as literals or matcher calls.

use crate::config::MigrationConfig;
use crate::core::{Expr, MethodCall};
use crate::errors::RewriteError;
use std::collections::HashSet;

/// One expectation argument, tagged by how it compares
#[derive(Debug, Clone, PartialEq)]
pub enum ArgumentSpec {
    /// Compared by equality: literals, class literals, constants, fields
    Literal(Expr),
    /// A matcher-constructing call such as `any(String.class)`
    Matcher(Expr),
}

impl ArgumentSpec {
    pub fn expr(&self) -> &Expr {
        match self {
            ArgumentSpec::Literal(expr) | ArgumentSpec::Matcher(expr) => expr,
        }
    }

    pub fn is_matcher(&self) -> bool {
        matches!(self, ArgumentSpec::Matcher(_))
    }

    /// Variant tag plus source text; equal keys mean the same argument
    pub fn key(&self) -> (bool, String) {
        (self.is_matcher(), self.expr().to_string())
    }
}

/// Classifies invocation arguments as literal or matcher.
pub struct ArgumentMatcher<'a> {
    config: &'a MigrationConfig,
    class_fields: &'a HashSet<String>,
}

impl<'a> ArgumentMatcher<'a> {
    pub fn new(config: &'a MigrationConfig, class_fields: &'a HashSet<String>) -> Self {
        Self {
            config,
            class_fields,
        }
    }

    pub fn classify(&self, arg: &Expr) -> Result<ArgumentSpec, RewriteError> {
        let inner = unwrap_with(arg).unwrap_or(arg);
        if self.is_matcher_call(inner) {
            return Ok(ArgumentSpec::Matcher(inner.clone()));
        }
        if self.is_literal(inner) {
            return Ok(ArgumentSpec::Literal(inner.clone()));
        }
        Err(RewriteError::AmbiguousArgumentMix {
            argument: arg.to_string(),
        })
    }

    /// Classify every argument, failing on the first ambiguous one
    pub fn classify_all(&self, args: &[Expr]) -> Result<Vec<ArgumentSpec>, RewriteError> {
        args.iter().map(|arg| self.classify(arg)).collect()
    }

    fn is_matcher_call(&self, expr: &Expr) -> bool {
        match expr {
            Expr::Call(MethodCall {
                receiver: None,
                name,
                ..
            }) => self.config.is_matcher_function(name),
            _ => false,
        }
    }

    fn is_literal(&self, expr: &Expr) -> bool {
        match expr {
            Expr::Literal(_) | Expr::ClassLiteral(_) => true,
            Expr::Ident(name) => self.class_fields.contains(name),
            Expr::FieldAccess { target, .. } => is_dotted_name(target),
            _ => false,
        }
    }
}

/// The argument of a JMock `with(...)` marker
fn unwrap_with(expr: &Expr) -> Option<&Expr> {
    match expr {
        Expr::Call(MethodCall {
            receiver: None,
            name,
            args,
            ..
        }) if name == "with" && args.len() == 1 => args.first(),
        _ => None,
    }
}

fn is_dotted_name(expr: &Expr) -> bool {
    match expr {
        Expr::Ident(_) => true,
        Expr::FieldAccess { target, .. } => is_dotted_name(target),
        _ => false,
    }
}
