//! Structural rewrite of JMock-based Java tests into Mockito tests.
//!
//! The library operates on an already parsed and type-resolved syntax tree
//! ([`core::CompilationUnit`]); producing that tree and printing Java source
//! from it is left to an external parser. [`transform`] is the single entry
//! point of the rewrite; the `cli`, `commands` and `io` modules make up the
//! driver binary that feeds it serialized trees.

pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod correlate;
pub mod emit;
pub mod errors;
pub mod io;
pub mod matchers;
pub mod patterns;
pub mod planner;
pub mod testkit;
pub mod transform;

pub use crate::config::{load_config, parse_config, MigrationConfig};
pub use crate::core::{CompilationUnit, NodePath};
pub use crate::errors::{Diagnostic, RewriteError, Severity};
pub use crate::transform::{transform, Transformed};
