//! Recognizes `context.checking(new Expectations() {{ ... }})` statements.
//!
//! The initializer block is read as an ordered list of pairs: an
//! invocation expectation followed by at most one `will(returnValue(v))`.
//! Statements outside that grammar are grouped with the invocation they
//! follow and surface as [`BlockEntry::Unrecognized`], so a half-understood
//! pair is never translated.

use super::instructions::{parse_block, Instruction, InvocationExpectation, WillClause};
use crate::config::MigrationConfig;
use crate::core::{names, Expr, Stmt};
use crate::patterns::{BodyRule, Pattern};

#[derive(Debug, Clone, PartialEq)]
pub struct ExpectationPair {
    pub invocation: InvocationExpectation,
    pub return_value: Option<Expr>,
    /// Source statements of the pair, in order
    pub statements: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BlockEntry {
    Pair(ExpectationPair),
    Unrecognized { statements: Vec<Stmt>, reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpectationBlockBinding {
    pub entries: Vec<BlockEntry>,
}

impl ExpectationBlockBinding {
    pub fn pairs(&self) -> impl Iterator<Item = &ExpectationPair> {
        self.entries.iter().filter_map(|e| match e {
            BlockEntry::Pair(pair) => Some(pair),
            BlockEntry::Unrecognized { .. } => None,
        })
    }
}

pub struct ExpectationBlockMatcher {
    checking: Pattern,
}

impl ExpectationBlockMatcher {
    pub fn new(config: &MigrationConfig, context_field: &str) -> Self {
        let expectations = vec![names::JMOCK_EXPECTATIONS.to_string()];
        let checking = Pattern::call("checking")
            .on(Pattern::ident(context_field))
            .args(vec![Pattern::capture(
                "expectations",
                Pattern::new_instance(&expectations, BodyRule::Present),
            )])
            .declared_by(&config.mockery_types())
            .build();
        Self { checking }
    }

    pub fn match_statement(&self, stmt: &Stmt) -> Option<ExpectationBlockBinding> {
        let expr = match stmt {
            Stmt::Expr(expr) => expr,
            _ => return None,
        };
        let binding = self.checking.matches(expr)?;
        let block = match binding.get("expectations")? {
            Expr::New(new) => new.body.as_ref()?.single_initializer()?,
            _ => return None,
        };
        let entries = group_entries(parse_block(block), block.statements.iter().cloned());
        Some(ExpectationBlockBinding { entries })
    }
}

struct Pending {
    invocation: InvocationExpectation,
    statement: Stmt,
}

fn group_entries(
    instructions: Vec<Instruction>,
    statements: impl Iterator<Item = Stmt>,
) -> Vec<BlockEntry> {
    let mut entries = Vec::new();
    let mut pending: Option<Pending> = None;
    // A will(...) orphaned by an unrecognized statement belongs to that group
    let mut poisoned: Option<(Vec<Stmt>, String)> = None;

    for (instruction, stmt) in instructions.into_iter().zip(statements) {
        match instruction {
            Instruction::Invocation(invocation) => {
                flush(&mut entries, pending.take(), poisoned.take());
                pending = Some(Pending {
                    invocation,
                    statement: stmt,
                });
            }
            Instruction::Will(WillClause::ReturnValue(value)) if pending.is_some() => {
                if let Some(p) = pending.take() {
                    entries.push(BlockEntry::Pair(ExpectationPair {
                        invocation: p.invocation,
                        return_value: Some(value),
                        statements: vec![p.statement, stmt],
                    }));
                }
            }
            Instruction::Will(WillClause::Other(action)) if pending.is_some() => {
                let mut statements: Vec<Stmt> =
                    pending.take().map(|p| p.statement).into_iter().collect();
                statements.push(stmt);
                entries.push(BlockEntry::Unrecognized {
                    statements,
                    reason: format!("unsupported action `{}`", action),
                });
            }
            Instruction::Will(_) => {
                if let Some((statements, _)) = poisoned.as_mut() {
                    statements.push(stmt);
                } else {
                    entries.push(BlockEntry::Unrecognized {
                        statements: vec![stmt],
                        reason: "will(...) without a preceding invocation".to_string(),
                    });
                }
            }
            Instruction::Configuration(call) => {
                let reason = format!("configuration call `{}` in expectations", call.name);
                let group = absorb(pending.take(), poisoned.take(), stmt);
                poisoned = Some((group, reason));
            }
            Instruction::Unrecognized(ref unrecognized) => {
                let reason = format!("unrecognized expectation `{}`", unrecognized);
                let group = absorb(pending.take(), poisoned.take(), stmt);
                poisoned = Some((group, reason));
            }
        }
    }
    flush(&mut entries, pending, poisoned);
    entries
}

fn absorb(
    pending: Option<Pending>,
    poisoned: Option<(Vec<Stmt>, String)>,
    stmt: Stmt,
) -> Vec<Stmt> {
    let mut group = poisoned.map(|(statements, _)| statements).unwrap_or_default();
    group.extend(pending.map(|p| p.statement));
    group.push(stmt);
    group
}

fn flush(
    entries: &mut Vec<BlockEntry>,
    pending: Option<Pending>,
    poisoned: Option<(Vec<Stmt>, String)>,
) {
    if let Some((statements, reason)) = poisoned {
        entries.push(BlockEntry::Unrecognized { statements, reason });
    }
    if let Some(p) = pending {
        entries.push(BlockEntry::Pair(ExpectationPair {
            invocation: p.invocation,
            return_value: None,
            statements: vec![p.statement],
        }));
    }
}
