//! Recognizes the `@Rule` mock-context field, JMock or Mockito flavored.

use super::instructions::{parse_block, ConfigurationCall, Instruction};
use crate::config::MigrationConfig;
use crate::core::{names, Expr, FieldDecl};
use crate::patterns::{BodyRule, Pattern};

/// Which framework the rule field belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextFlavor {
    /// `@Rule JUnitRuleMockery context`
    JMock,
    /// `@Rule MockitoRule rule`, already Mockito but still JUnit 4 style
    Mockito,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RuleContextBinding {
    /// Index of the field in its class's member list
    pub member: usize,
    pub field_name: String,
    pub flavor: ContextFlavor,
    /// Setter calls from the initializer block; dropped by the planner
    pub configuration: Vec<ConfigurationCall>,
}

/// Recognizes the rule-annotated mock-context field that gates the whole rewrite.
pub struct RuleContextMatcher<'a> {
    config: &'a MigrationConfig,
    constructor: Pattern,
    mockito_rule_types: Vec<String>,
}

impl<'a> RuleContextMatcher<'a> {
    pub fn new(config: &'a MigrationConfig) -> Self {
        Self {
            config,
            constructor: Pattern::new_instance(&config.context_types, BodyRule::Optional),
            mockito_rule_types: vec![
                names::MOCKITO_RULE.to_string(),
                names::MOCKITO_TEST_RULE.to_string(),
            ],
        }
    }

    pub fn match_field(&self, member: usize, field: &FieldDecl) -> Option<RuleContextBinding> {
        if !field.has_annotation(names::JUNIT4_RULE) {
            return None;
        }

        let (flavor, configuration) = if field.ty.is_any_of(&self.config.context_types) {
            let configuration = match &field.initializer {
                None => Vec::new(),
                Some(init) => self.configuration_of(init)?,
            };
            (ContextFlavor::JMock, configuration)
        } else if self.config.migrate_mockito_rules && field.ty.is_any_of(&self.mockito_rule_types)
        {
            (ContextFlavor::Mockito, Vec::new())
        } else {
            return None;
        };

        Some(RuleContextBinding {
            member,
            field_name: field.name.clone(),
            flavor,
            configuration,
        })
    }

    /// `new JUnitRuleMockery()` optionally followed by a block of setter calls
    fn configuration_of(&self, init: &Expr) -> Option<Vec<ConfigurationCall>> {
        self.constructor.matches(init)?;
        let new = match init {
            Expr::New(new) if new.args.is_empty() => new,
            _ => return None,
        };
        let body = match &new.body {
            None => return Some(Vec::new()),
            Some(body) => body,
        };
        if body.members.is_empty() {
            return Some(Vec::new());
        }

        parse_block(body.single_initializer()?)
            .into_iter()
            .map(|instruction| match instruction {
                Instruction::Configuration(call) => Some(call),
                _ => None,
            })
            .collect()
    }
}
