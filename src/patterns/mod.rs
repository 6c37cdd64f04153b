//! Structural expression templates with named placeholders.
//!
//! A [`Pattern`] describes the shape of an expression tree: node kinds,
//! method names, receivers, argument lists and resolved declaring types.
//! Matching is pure and yields at most one [`Binding`], a map from
//! placeholder name to the captured expression.

pub mod binding;

pub use binding::Binding;

use crate::core::{Expr, MethodCall, NewClass};

#[derive(Clone, Debug)]
pub enum Pattern {
    /// Any expression
    Any,
    /// Whatever the inner pattern matched, recorded under a name
    Capture(String, Box<Pattern>),
    /// An identifier; `Some` requires the exact spelling
    Ident(Option<String>),
    /// Any literal (`"a"`, `1`, `true`, `null`)
    Literal,
    /// `Type.class`
    ClassLiteral,
    Call(CallPattern),
    New(NewPattern),
    /// First alternative that matches
    Alt(Vec<Pattern>),
}

#[derive(Clone, Debug)]
pub enum Receiver {
    /// Unqualified call, e.g. `oneOf(x)`
    Absent,
    Any,
    Matching(Box<Pattern>),
}

#[derive(Clone, Debug)]
pub struct CallPattern {
    pub receiver: Receiver,
    /// Accepted method names; empty accepts any name
    pub names: Vec<String>,
    /// Positional argument patterns; `None` accepts any argument list
    pub args: Option<Vec<Pattern>>,
    /// Accepted resolved declaring types; empty skips the check
    pub declared_by: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BodyRule {
    Absent,
    Present,
    Optional,
}

#[derive(Clone, Debug)]
pub struct NewPattern {
    pub types: Vec<String>,
    pub body: BodyRule,
}

impl Pattern {
    pub fn capture(name: impl Into<String>, inner: Pattern) -> Self {
        Pattern::Capture(name.into(), Box::new(inner))
    }

    pub fn ident(name: impl Into<String>) -> Self {
        Pattern::Ident(Some(name.into()))
    }

    pub fn any_ident() -> Self {
        Pattern::Ident(None)
    }

    pub fn call(name: impl Into<String>) -> CallPattern {
        CallPattern {
            receiver: Receiver::Any,
            names: vec![name.into()],
            args: None,
            declared_by: Vec::new(),
        }
    }

    pub fn call_any_name() -> CallPattern {
        CallPattern {
            receiver: Receiver::Any,
            names: Vec::new(),
            args: None,
            declared_by: Vec::new(),
        }
    }

    pub fn new_instance(types: &[String], body: BodyRule) -> Self {
        Pattern::New(NewPattern {
            types: types.to_vec(),
            body,
        })
    }

    /// Match against an expression, returning the captured placeholders.
    pub fn matches(&self, expr: &Expr) -> Option<Binding> {
        let mut binding = Binding::default();
        if self.match_into(expr, &mut binding) {
            Some(binding)
        } else {
            None
        }
    }

    fn match_into(&self, expr: &Expr, binding: &mut Binding) -> bool {
        match self {
            Pattern::Any => true,
            Pattern::Capture(name, inner) => {
                if inner.match_into(expr, binding) {
                    binding.insert(name.clone(), expr.clone());
                    true
                } else {
                    false
                }
            }
            Pattern::Ident(expected) => match expr {
                Expr::Ident(name) => expected.as_ref().is_none_or(|e| e == name),
                _ => false,
            },
            Pattern::Literal => matches!(expr, Expr::Literal(_)),
            Pattern::ClassLiteral => matches!(expr, Expr::ClassLiteral(_)),
            Pattern::Call(call) => match expr {
                Expr::Call(actual) => call.match_into(actual, binding),
                _ => false,
            },
            Pattern::New(new) => match expr {
                Expr::New(actual) => new.matches(actual),
                _ => false,
            },
            Pattern::Alt(alternatives) => alternatives.iter().any(|alt| {
                let mut attempt = Binding::default();
                if alt.match_into(expr, &mut attempt) {
                    binding.extend(attempt);
                    true
                } else {
                    false
                }
            }),
        }
    }
}

impl CallPattern {
    pub fn unqualified(mut self) -> Self {
        self.receiver = Receiver::Absent;
        self
    }

    pub fn on(mut self, receiver: Pattern) -> Self {
        self.receiver = Receiver::Matching(Box::new(receiver));
        self
    }

    pub fn or_named(mut self, name: impl Into<String>) -> Self {
        self.names.push(name.into());
        self
    }

    pub fn args(mut self, args: Vec<Pattern>) -> Self {
        self.args = Some(args);
        self
    }

    pub fn declared_by(mut self, types: &[String]) -> Self {
        self.declared_by = types.to_vec();
        self
    }

    pub fn build(self) -> Pattern {
        Pattern::Call(self)
    }

    fn match_into(&self, call: &MethodCall, binding: &mut Binding) -> bool {
        if !self.names.is_empty() && !self.names.iter().any(|n| n == &call.name) {
            return false;
        }
        if !self.declared_by.is_empty() {
            let declared = call
                .declaring_type
                .as_deref()
                .is_some_and(|d| self.declared_by.iter().any(|t| t == d));
            if !declared {
                return false;
            }
        }
        let receiver_ok = match (&self.receiver, call.receiver.as_deref()) {
            (Receiver::Absent, None) => true,
            (Receiver::Absent, Some(_)) => false,
            (Receiver::Any, _) => true,
            (Receiver::Matching(_), None) => false,
            (Receiver::Matching(pattern), Some(actual)) => pattern.match_into(actual, binding),
        };
        if !receiver_ok {
            return false;
        }
        match &self.args {
            None => true,
            Some(patterns) => {
                patterns.len() == call.args.len()
                    && patterns
                        .iter()
                        .zip(&call.args)
                        .all(|(pattern, arg)| pattern.match_into(arg, binding))
            }
        }
    }
}

impl NewPattern {
    fn matches(&self, new: &NewClass) -> bool {
        let body_ok = match self.body {
            BodyRule::Absent => new.body.is_none(),
            BodyRule::Present => new.body.is_some(),
            BodyRule::Optional => true,
        };
        body_ok && new.ty.is_any_of(&self.types)
    }
}
