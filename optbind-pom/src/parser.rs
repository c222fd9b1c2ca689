//! pom.xml reader built on the quick-xml SAX API.
//!
//! Elements are matched by their full path from `<project>`, so dependencies
//! nested under `<build>`, `<profiles>` or plugins are never mistaken for
//! project dependencies.

use crate::error::{PomError, Result};
use camino::Utf8Path;
use fs_err as fs;
use quick_xml::Reader;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::Event;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Dependency {
    pub group_id: String,
    pub artifact_id: String,
    /// Raw text, possibly a `${property}` reference.
    pub version: Option<String>,
    pub scope: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Pom {
    /// Own `<groupId>`, else the parent's.
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    /// Own `<version>`, else the parent's.
    pub version: Option<String>,
    pub properties: BTreeMap<String, String>,
    /// Direct dependencies, document order.
    pub dependencies: Vec<Dependency>,
    /// `<dependencyManagement>` entries, document order.
    pub managed: Vec<Dependency>,
}

impl Pom {
    /// First managed entry matching both coordinates.
    pub fn managed_dependency(&self, group_id: &str, artifact_id: &str) -> Option<&Dependency> {
        self.managed
            .iter()
            .find(|d| d.group_id == group_id && d.artifact_id == artifact_id)
    }
}

#[derive(Default)]
struct DepAccum {
    group_id: Option<String>,
    artifact_id: Option<String>,
    version: Option<String>,
    scope: Option<String>,
}

impl DepAccum {
    fn set(&mut self, field: &str, text: String) {
        match field {
            "groupId" => self.group_id = Some(text),
            "artifactId" => self.artifact_id = Some(text),
            "version" => self.version = Some(text),
            "scope" => self.scope = Some(text),
            _ => {}
        }
    }

    fn finish(self, pom: &str) -> Result<Dependency> {
        let missing = |field| PomError::IncompleteDependency {
            pom: pom.to_string(),
            field,
        };
        Ok(Dependency {
            group_id: self.group_id.ok_or_else(|| missing("groupId"))?,
            artifact_id: self.artifact_id.ok_or_else(|| missing("artifactId"))?,
            version: self.version,
            scope: self.scope,
        })
    }
}

#[derive(Default)]
struct ParentAccum {
    group_id: Option<String>,
    version: Option<String>,
}

/// Read and parse a POM file.
pub fn load_pom(path: &Utf8Path) -> Result<Pom> {
    let contents = fs::read_to_string(path).map_err(|e| PomError::Io {
        message: e.to_string(),
    })?;
    let pom = parse_pom(&contents, path.as_str())?;
    debug!(
        path = %path,
        dependencies = pom.dependencies.len(),
        managed = pom.managed.len(),
        "parsed POM"
    );
    Ok(pom)
}

/// Parse POM text; `origin` names the document in error messages.
pub fn parse_pom(content: &str, origin: &str) -> Result<Pom> {
    let mut reader = Reader::from_str(content);

    let mut pom = Pom::default();
    let mut parent = ParentAccum::default();
    let mut own_group = None;
    let mut own_version = None;

    let mut path: Vec<String> = Vec::new();
    let mut text = String::new();
    let mut dep: Option<DepAccum> = None;

    loop {
        let event = reader.read_event().map_err(|e| PomError::Parse {
            message: format!("{origin}: {e}"),
        })?;

        match event {
            Event::Start(ref e) => {
                let tag = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                path.push(tag);
                text.clear();
                if is_dependency(&path) {
                    dep = Some(DepAccum::default());
                }
            }
            Event::Text(ref e) => {
                let decoded = e.decode().map_err(|e| PomError::Parse {
                    message: format!("{origin}: {e}"),
                })?;
                text.push_str(&decoded);
            }
            Event::CData(ref e) => {
                text.push_str(&String::from_utf8_lossy(e.as_ref()));
            }
            Event::GeneralRef(ref e) => {
                let name = e.decode().map_err(|e| PomError::Parse {
                    message: format!("{origin}: {e}"),
                })?;
                match resolve_predefined_entity(&name) {
                    Some(resolved) => text.push_str(resolved),
                    None => {
                        text.push('&');
                        text.push_str(&name);
                        text.push(';');
                    }
                }
            }
            Event::End(_) => {
                let value = text.trim().to_string();
                text.clear();
                let segments: Vec<&str> = path.iter().map(String::as_str).collect();
                match segments.as_slice() {
                    ["project", "groupId"] => own_group = Some(value),
                    ["project", "artifactId"] => pom.artifact_id = Some(value),
                    ["project", "version"] => own_version = Some(value),
                    ["project", "parent", "groupId"] => parent.group_id = Some(value),
                    ["project", "parent", "version"] => parent.version = Some(value),
                    ["project", "properties", key] => {
                        pom.properties.insert((*key).to_string(), value);
                    }
                    ["project", "dependencies", "dependency", field]
                    | ["project", "dependencyManagement", "dependencies", "dependency", field] => {
                        if let Some(d) = dep.as_mut() {
                            d.set(field, value);
                        }
                    }
                    ["project", "dependencies", "dependency"] => {
                        if let Some(d) = dep.take() {
                            pom.dependencies.push(d.finish(origin)?);
                        }
                    }
                    ["project", "dependencyManagement", "dependencies", "dependency"] => {
                        if let Some(d) = dep.take() {
                            pom.managed.push(d.finish(origin)?);
                        }
                    }
                    _ => {}
                }
                path.pop();
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !path.is_empty() {
        return Err(PomError::Parse {
            message: format!("{origin}: unexpected end of document inside <{}>", path.join("/")),
        });
    }
    if pom.artifact_id.is_none() && own_group.is_none() && parent.group_id.is_none() {
        return Err(PomError::Parse {
            message: format!("{origin}: no <project> element"),
        });
    }

    pom.group_id = own_group.or(parent.group_id);
    pom.version = own_version.or(parent.version);
    Ok(pom)
}

fn is_dependency(path: &[String]) -> bool {
    let segments: Vec<&str> = path.iter().map(String::as_str).collect();
    matches!(
        segments.as_slice(),
        ["project", "dependencies", "dependency"]
            | ["project", "dependencyManagement", "dependencies", "dependency"]
    )
}
