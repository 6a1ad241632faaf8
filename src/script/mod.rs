// file: src/script/mod.rs
// version: 1.0.0
// guid: 5d0c7e82-41f9-4a6b-8c35-9b12de64a0f7

//! Shell command sequencing for the remote job entry point
//!
//! Commands are accumulated in program order, each preceded by a
//! credential-masked echo, and executed as a single joined shell invocation.

pub mod builder;
pub mod mask;

pub use builder::{ScriptBuilder, ShellRunner, SystemShell, ECHO_PREFIX};
pub use mask::{mask_credentials, REDACTION_MARKER};
