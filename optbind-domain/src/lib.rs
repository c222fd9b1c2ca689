//! Domain logic: turn an option schema and a template set into build-tool
//! source files.
//!
//! Everything here is pure and deterministic. Reading templates from disk
//! sits behind the [`TemplateSource`] port; writing output is the pipeline's
//! job (`optbind-core`).

mod builtin;
mod cache;
mod defaults;
mod describe;
mod error;
mod generator;
mod naming;
mod ports;
mod targets;
mod template;

pub use builtin::{builtin_template_files, builtin_templates};
pub use cache::{GENERATOR_VERSION, cache_key};
pub use defaults::{TypedDefault, typed_default};
pub use describe::{OptionDoc, cleanup, java_literal, javadoc_escape, option_doc};
pub use error::GenerationError;
pub use generator::{BoundSchema, bind_schema, generate};
pub use naming::{accessor_name, create_name, package_dir};
pub use ports::{BuiltinTemplateSource, FsTemplateSource, InMemoryTemplateSource, TemplateSource};
pub use targets::{
    Binding, BoundOption, GenerateRequest, GradleTarget, MavenTarget, OutputSpec, RenderContext,
    Target, TargetProfile, builtin_targets, target_for,
};
pub use template::{Expansion, TemplateSet, directive_of, render};
