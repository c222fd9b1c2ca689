use crate::validate::{Violation, validate_schema};
use camino::Utf8Path;
use fs_err as fs;
use optbind_types::options::OptionSchema;
use std::fmt;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaFormat {
    Toml,
    Json,
    Yaml,
}

impl SchemaFormat {
    pub fn from_path(path: &Utf8Path) -> Option<Self> {
        match path.extension()?.to_ascii_lowercase().as_str() {
            "toml" => Some(SchemaFormat::Toml),
            "json" => Some(SchemaFormat::Json),
            "yaml" | "yml" => Some(SchemaFormat::Yaml),
            _ => None,
        }
    }
}

impl fmt::Display for SchemaFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SchemaFormat::Toml => "toml",
            SchemaFormat::Json => "json",
            SchemaFormat::Yaml => "yaml",
        })
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("io error: {message}")]
    Io { message: String },

    #[error("unsupported schema file extension for {path} (expected .toml, .json, .yaml or .yml)")]
    UnsupportedFormat { path: String },

    #[error("{format} parse error: {message}")]
    Parse {
        format: SchemaFormat,
        message: String,
    },

    #[error("unknown schema identifier '{found}' (expected '{expected}')")]
    UnknownSchema {
        found: String,
        expected: &'static str,
    },

    #[error("invalid option schema: {}", join_violations(.0))]
    Invalid(Vec<Violation>),
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Read and validate a schema file; the format follows the file extension.
pub fn load_schema(path: &Utf8Path) -> Result<OptionSchema, SchemaError> {
    let format = SchemaFormat::from_path(path).ok_or_else(|| SchemaError::UnsupportedFormat {
        path: path.to_string(),
    })?;
    debug!(path = %path, %format, "loading option schema");

    let contents = fs::read_to_string(path).map_err(|e| SchemaError::Io {
        message: e.to_string(),
    })?;
    parse_schema(&contents, format)
}

/// Parse and validate schema text.
pub fn parse_schema(contents: &str, format: SchemaFormat) -> Result<OptionSchema, SchemaError> {
    let parse_err = |message: String| SchemaError::Parse { format, message };
    let schema: OptionSchema = match format {
        SchemaFormat::Toml => toml::from_str(contents).map_err(|e| parse_err(e.to_string()))?,
        SchemaFormat::Json => {
            serde_json::from_str(contents).map_err(|e| parse_err(e.to_string()))?
        }
        SchemaFormat::Yaml => {
            serde_yaml::from_str(contents).map_err(|e| parse_err(e.to_string()))?
        }
    };

    if schema.schema != optbind_types::schema::OPTBIND_OPTIONS_V1 {
        return Err(SchemaError::UnknownSchema {
            found: schema.schema,
            expected: optbind_types::schema::OPTBIND_OPTIONS_V1,
        });
    }

    let violations = validate_schema(&schema);
    if !violations.is_empty() {
        return Err(SchemaError::Invalid(violations));
    }

    debug!(options = schema.options.len(), "option schema loaded");
    Ok(schema)
}
