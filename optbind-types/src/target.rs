use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Build tools optbind can emit bindings for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetId {
    Gradle,
    Maven,
}

impl TargetId {
    pub const ALL: [TargetId; 2] = [TargetId::Gradle, TargetId::Maven];

    pub fn as_str(self) -> &'static str {
        match self {
            TargetId::Gradle => "gradle",
            TargetId::Maven => "maven",
        }
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTarget(pub String);

impl fmt::Display for UnknownTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let known: Vec<&str> = TargetId::ALL.iter().map(|t| t.as_str()).collect();
        write!(
            f,
            "unknown target '{}' (known: {})",
            self.0,
            known.join(", ")
        )
    }
}

impl std::error::Error for UnknownTarget {}

impl FromStr for TargetId {
    type Err = UnknownTarget;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gradle" => Ok(TargetId::Gradle),
            "maven" => Ok(TargetId::Maven),
            _ => Err(UnknownTarget(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Gradle".parse::<TargetId>().unwrap(), TargetId::Gradle);
        assert_eq!(" maven ".parse::<TargetId>().unwrap(), TargetId::Maven);
    }

    #[test]
    fn unknown_target_lists_known_ones() {
        let err = "ant".parse::<TargetId>().unwrap_err();
        assert!(err.to_string().contains("gradle, maven"));
    }
}
