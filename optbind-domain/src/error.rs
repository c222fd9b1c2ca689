use optbind_types::target::TargetId;
use thiserror::Error;

/// Why a generation run could not produce output.
///
/// Every variant names the offending template or option so the build log
/// points at the input that needs fixing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("template '{template}' not found")]
    MissingTemplate { template: String },

    #[error("option '{option}' cannot be expressed by the {target} target: {reason}")]
    UnsupportedType {
        option: String,
        target: TargetId,
        reason: String,
    },

    #[error("description of option '{option}' is invalid: {reason}")]
    InvalidDescription { option: String, reason: String },

    #[error("default of option '{option}' is invalid: {reason}")]
    InvalidDefault { option: String, reason: String },

    #[error("unknown directive '${{{directive}}}' in template '{template}' at line {line}")]
    UnknownDirective {
        template: String,
        line: usize,
        directive: String,
    },

    #[error("template '{template}' includes itself")]
    IncludeCycle { template: String },

    #[error("cannot encode {what}: {message}")]
    Encode { what: &'static str, message: String },

    #[error("io error: {message}")]
    Io { message: String },
}

impl GenerationError {
    pub(crate) fn unsupported(
        option: &str,
        target: TargetId,
        reason: impl Into<String>,
    ) -> Self {
        GenerationError::UnsupportedType {
            option: option.to_string(),
            target,
            reason: reason.into(),
        }
    }
}
