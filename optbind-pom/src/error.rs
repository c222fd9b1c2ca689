use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PomError {
    #[error("io error: {message}")]
    Io { message: String },

    #[error("failed to parse POM: {message}")]
    Parse { message: String },

    #[error("no managed version for {group}:{artifact}")]
    MissingDependency { group: String, artifact: String },

    #[error("dependency in {pom} is missing its {field}")]
    IncompleteDependency { pom: String, field: &'static str },

    #[error("unresolved property '${{{name}}}' in '{value}'")]
    UnresolvedProperty { name: String, value: String },
}

pub type Result<T> = std::result::Result<T, PomError>;
