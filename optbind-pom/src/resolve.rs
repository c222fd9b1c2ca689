use crate::error::{PomError, Result};
use crate::parser::Pom;
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// Property expansion depth; deeper chains are treated as cycles.
const MAX_EXPANSIONS: usize = 32;

/// A fully resolved `group:artifact:version`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Coordinate {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }
}

/// Resolves dependency versions the way the build glue does: the project's
/// own group resolves to the project version, everything else must be
/// managed in the root POM.
#[derive(Debug, Clone, Copy)]
pub struct VersionResolver<'a> {
    project: &'a Pom,
    root: &'a Pom,
}

impl<'a> VersionResolver<'a> {
    pub fn new(project: &'a Pom, root: &'a Pom) -> Self {
        Self { project, root }
    }

    pub fn resolve_version(&self, group_id: &str, artifact_id: &str) -> Result<String> {
        let missing = || PomError::MissingDependency {
            group: group_id.to_string(),
            artifact: artifact_id.to_string(),
        };

        if self.project.group_id.as_deref() == Some(group_id) {
            let version = self.project.version.as_deref().ok_or_else(missing)?;
            debug!(group = group_id, artifact = artifact_id, "project group, using project version");
            return interpolate(version, |name| self.property(name));
        }

        let raw = self
            .root
            .managed_dependency(group_id, artifact_id)
            .and_then(|d| d.version.as_deref())
            .ok_or_else(missing)?;
        interpolate(raw, |name| self.property(name))
    }

    pub fn resolve(&self, group_id: &str, artifact_id: &str) -> Result<Coordinate> {
        Ok(Coordinate {
            group_id: group_id.to_string(),
            artifact_id: artifact_id.to_string(),
            version: self.resolve_version(group_id, artifact_id)?,
        })
    }

    fn property(&self, name: &str) -> Option<String> {
        match name {
            "project.version" | "pom.version" => self.root.version.clone(),
            "project.groupId" | "pom.groupId" => self.root.group_id.clone(),
            _ => self
                .project
                .properties
                .get(name)
                .or_else(|| self.root.properties.get(name))
                .cloned(),
        }
    }
}

/// Every direct dependency of `project`, versioned from `root`.
///
/// The first unresolvable dependency aborts; there is no partial result.
pub fn resolve_coordinates(project: &Pom, root: &Pom) -> Result<Vec<Coordinate>> {
    let resolver = VersionResolver::new(project, root);
    project
        .dependencies
        .iter()
        .map(|d| resolver.resolve(&d.group_id, &d.artifact_id))
        .collect()
}

/// Expand `${name}` references until none remain.
pub fn interpolate<F>(value: &str, lookup: F) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = value.to_string();
    for _ in 0..MAX_EXPANSIONS {
        let Some(start) = out.find("${") else {
            return Ok(out);
        };
        let Some(len) = out[start + 2..].find('}') else {
            return Ok(out);
        };
        let name = &out[start + 2..start + 2 + len];
        let replacement = lookup(name).ok_or_else(|| PomError::UnresolvedProperty {
            name: name.to_string(),
            value: value.to_string(),
        })?;
        out.replace_range(start..start + 3 + len, &replacement);
    }

    match out.find("${") {
        None => Ok(out),
        Some(start) => Err(PomError::UnresolvedProperty {
            name: out[start + 2..]
                .split('}')
                .next()
                .unwrap_or_default()
                .to_string(),
            value: value.to_string(),
        }),
    }
}
