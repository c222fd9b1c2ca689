//! Maven POM reading for build glue.
//!
//! Only the parts of a POM that decide dependency versions are modelled:
//! project coordinates (with `<parent>` fallback), `<properties>`, direct
//! `<dependencies>` and `<dependencyManagement>`.

mod error;
mod parser;
mod resolve;

pub use error::{PomError, Result};
pub use parser::{Dependency, Pom, load_pom, parse_pom};
pub use resolve::{Coordinate, VersionResolver, interpolate, resolve_coordinates};
