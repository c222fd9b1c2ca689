//! Option schema ingestion.
//!
//! The file format is tolerant (TOML, JSON or YAML, picked by extension); the
//! content is not. A schema that loads is guaranteed to satisfy the invariants
//! checked in [`validate_schema`], so generators never re-check them.

mod load;
mod validate;

pub use load::{SchemaError, SchemaFormat, load_schema, parse_schema};
pub use validate::{Violation, validate_schema};
