use crate::core::{Expr, MethodCall};
use std::collections::HashMap;

/// Placeholder name to captured expression. Insertion order carries no meaning.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Binding {
    captures: HashMap<String, Expr>,
}

impl Binding {
    pub fn insert(&mut self, name: String, expr: Expr) {
        self.captures.insert(name, expr);
    }

    pub fn extend(&mut self, other: Binding) {
        self.captures.extend(other.captures);
    }

    pub fn get(&self, name: &str) -> Option<&Expr> {
        self.captures.get(name)
    }

    pub fn ident(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Expr::as_ident)
    }

    pub fn call(&self, name: &str) -> Option<&MethodCall> {
        self.get(name).and_then(Expr::as_call)
    }

    pub fn take(&mut self, name: &str) -> Option<Expr> {
        self.captures.remove(name)
    }

    pub fn len(&self) -> usize {
        self.captures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.captures.is_empty()
    }
}
