//! CLI command implementations.
//!
//! Available commands:
//! - **rewrite**: Transform serialized test-class trees and report diagnostics
//! - **init**: Write a default configuration file

pub mod init;
pub mod rewrite;
