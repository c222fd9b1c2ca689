//! Embeddable core library for optbind.
//!
//! Provides a clap-free, I/O-abstracted entry point for generating and
//! checking option bindings.
//!
//! # Port traits
//!
//! All I/O is abstracted behind port traits in [`ports`]:
//! - [`SchemaSource`](ports::SchemaSource): load the option schema
//! - [`TemplateSource`]: load a target's template set
//! - [`OutputView`](ports::OutputView): read what is currently on disk
//! - [`WritePort`](ports::WritePort): write, create and clear directories
//!
//! The [`adapters`] module provides filesystem-backed and in-memory
//! implementations.
//!
//! # Entry points
//!
//! - [`run_generate`](pipeline::run_generate): generate or check sources
//! - [`write_reports`](pipeline::write_reports): write `generation.json`/`.md`

pub mod adapters;
pub mod pipeline;
pub mod ports;
pub mod settings;

// Re-exported so embedders don't need optbind-domain directly.
pub use optbind_domain::{
    BuiltinTemplateSource, FsTemplateSource, GenerateRequest, InMemoryTemplateSource,
    TargetProfile, TemplateSource,
};
