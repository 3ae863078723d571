//! # meshport
//!
//! Library half of the meshport binary: configuration, artifact loading,
//! registry transport and the CLI commands built on top of them.
//!
//! Exposed as a library so the integration tests can drive the import
//! pipeline against an in-process registry.

pub mod cli;
pub mod client;
pub mod config;
pub mod source;
