//! The four structural matchers.
//!
//! Each matcher is pure: it inspects one member or statement and returns a
//! typed binding when its idiom is present, `None` otherwise.

pub mod argument;
pub mod expectation_block;
pub mod instructions;
pub mod mock_field;
pub mod rule_context;

pub use argument::{ArgumentMatcher, ArgumentSpec};
pub use expectation_block::{
    BlockEntry, ExpectationBlockBinding, ExpectationBlockMatcher, ExpectationPair,
};
pub use instructions::{ConfigurationCall, Instruction, InvocationExpectation, WillClause};
pub use mock_field::{MockFieldBinding, MockFieldMatcher, MockForm};
pub use rule_context::{ContextFlavor, RuleContextBinding, RuleContextMatcher};
