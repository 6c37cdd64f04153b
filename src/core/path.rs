//! Explicit paths from a compilation unit root down to a node.
//!
//! The tree has no parent pointers; traversals accumulate a `NodePath` as
//! they descend, and the emitter follows it back down to apply edits.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Step {
    /// Index into `CompilationUnit::types`
    Type(usize),
    /// Index into `ClassDecl::members`
    Member(usize),
    /// Index into `Block::statements`
    Statement(usize),
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodePath(Vec<Step>);

impl NodePath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn child(&self, step: Step) -> Self {
        let mut steps = self.0.clone();
        steps.push(step);
        Self(steps)
    }

    pub fn steps(&self) -> &[Step] {
        &self.0
    }

    pub fn last(&self) -> Option<Step> {
        self.0.last().copied()
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "<unit>");
        }
        let rendered: Vec<String> = self
            .0
            .iter()
            .map(|step| match step {
                Step::Type(i) => format!("types[{}]", i),
                Step::Member(i) => format!("members[{}]", i),
                Step::Statement(i) => format!("statements[{}]", i),
            })
            .collect();
        write!(f, "{}", rendered.join("."))
    }
}
