use crate::defaults::TypedDefault;
use crate::describe::{OptionDoc, java_literal};
use crate::error::GenerationError;
use crate::naming::{self, is_java_identifier};
use crate::template::Expansion;
use optbind_types::options::{OptionDescriptor, OptionKind, ValueType};
use optbind_types::target::TargetId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

mod gradle;
mod maven;

pub use gradle::GradleTarget;
pub use maven::MavenTarget;

/// Tool-specific naming knobs for one target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetProfile {
    /// id → name used before case conversion.
    pub renames: BTreeMap<String, String>,

    /// Ids the target does not expose as properties.
    pub unsupported: BTreeSet<String>,

    /// Maven user-property prefix, e.g. `rat` for `-Drat.addLicense`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_prefix: Option<String>,
}

/// Everything besides schema and templates that shapes the output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub package: String,
    pub class_name: String,

    #[serde(default)]
    pub profile: TargetProfile,
}

impl GenerateRequest {
    pub fn new(package: impl Into<String>, class_name: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            class_name: class_name.into(),
            profile: TargetProfile::default(),
        }
    }

    pub fn with_profile(mut self, profile: TargetProfile) -> Self {
        self.profile = profile;
        self
    }
}

/// One file a target writes: which template renders it and how it is named.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputSpec {
    pub template: &'static str,
    /// Appended to the request class name.
    pub suffix: &'static str,
    /// Placed in an `internal` sub-package.
    pub internal: bool,
}

impl OutputSpec {
    pub fn class_name(&self, base: &str) -> String {
        format!("{base}{}", self.suffix)
    }

    pub fn package(&self, base: &str) -> String {
        if self.internal {
            if base.is_empty() {
                "internal".to_string()
            } else {
                format!("{base}.internal")
            }
        } else {
            base.to_string()
        }
    }

    /// Output path relative to the output directory, `/`-separated.
    pub fn path(&self, request: &GenerateRequest) -> String {
        let dir = naming::package_dir(&self.package(&request.package));
        let file = format!("{}.java", self.class_name(&request.class_name));
        if dir.is_empty() {
            file
        } else {
            format!("{dir}/{file}")
        }
    }
}

/// How one option surfaces in a target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Binding {
    pub option: String,
    /// lowerCamel name.
    pub name: String,
    /// Getter or setter method name.
    pub accessor: String,
    /// Java type of the generated member.
    pub declared_type: String,
    pub deprecated: bool,
}

/// An option the target exposes, with everything needed to render it.
#[derive(Debug, Clone)]
pub struct BoundOption<'a> {
    pub option: &'a OptionDescriptor,
    pub binding: Binding,
    pub doc: OptionDoc,
    pub default: Option<TypedDefault>,
}

/// Inputs available while expanding directives of one output file.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub request: &'a GenerateRequest,
    pub output: &'a OutputSpec,
    pub bound: &'a [BoundOption<'a>],
    pub unsupported: &'a [&'a OptionDescriptor],
}

impl RenderContext<'_> {
    pub fn file_class(&self) -> String {
        self.output.class_name(&self.request.class_name)
    }

    pub fn base_class(&self) -> &str {
        &self.request.class_name
    }

    pub fn file_package(&self) -> String {
        self.output.package(&self.request.package)
    }
}

/// A build tool the generator can emit bindings for.
pub trait Target: Send + Sync {
    fn id(&self) -> TargetId;

    fn description(&self) -> &'static str;

    fn outputs(&self) -> &'static [OutputSpec];

    /// Directive names this target expands, for diagnostics and `explain`.
    fn directives(&self) -> &'static [&'static str];

    /// Bind one option, or explain why the target cannot express it.
    fn bind(
        &self,
        option: &OptionDescriptor,
        profile: &TargetProfile,
    ) -> Result<Binding, GenerationError>;

    /// Expand one directive; `None` for directives the target does not know.
    fn expand(&self, directive: &str, ctx: &RenderContext<'_>) -> Option<Expansion>;
}

pub fn builtin_targets() -> Vec<Box<dyn Target>> {
    vec![Box::new(GradleTarget), Box::new(MavenTarget)]
}

pub fn target_for(id: TargetId) -> Box<dyn Target> {
    match id {
        TargetId::Gradle => Box::new(GradleTarget),
        TargetId::Maven => Box::new(MavenTarget),
    }
}

/// Shape checks every target applies before mapping types.
fn check_shape(opt: &OptionDescriptor, target: TargetId, name: &str) -> Result<(), GenerationError> {
    if !is_java_identifier(name) {
        return Err(GenerationError::unsupported(
            &opt.id,
            target,
            format!("'{name}' is not a valid Java identifier"),
        ));
    }
    match (opt.kind, opt.value_type) {
        (OptionKind::Flag, ValueType::String) => Ok(()),
        (OptionKind::Flag, vt) => Err(GenerationError::unsupported(
            &opt.id,
            target,
            format!("flag options take no value, but value type {vt} was declared"),
        )),
        (OptionKind::Choice, ValueType::String) => Ok(()),
        (OptionKind::Choice, vt) => Err(GenerationError::unsupported(
            &opt.id,
            target,
            format!("choice values must be strings, not {vt}"),
        )),
        (OptionKind::Value, ValueType::Counter) => Err(GenerationError::unsupported(
            &opt.id,
            target,
            "counter values are only supported on repeatable options",
        )),
        _ => Ok(()),
    }
}

/// The `${static}` block: renames, unsupported ids and deprecation warnings.
fn static_block(ctx: &RenderContext<'_>) -> String {
    let mut out = String::new();
    for (from, to) in &ctx.request.profile.renames {
        out.push_str(&format!(
            "        xlateName.put({}, {});\n",
            java_literal(from),
            java_literal(to)
        ));
    }
    for opt in ctx.unsupported {
        out.push_str(&format!(
            "        unsupportedArgs.add({});\n",
            java_literal(&opt.id)
        ));
    }
    for bound in ctx.bound {
        let Some(dep) = &bound.doc.deprecation else {
            continue;
        };
        let message = format!("Use of deprecated option '{}'. {}", bound.binding.name, dep);
        out.push_str(&format!(
            "        deprecatedArgs.put({}, {});\n",
            java_literal(&bound.option.id),
            java_literal(&message)
        ));
    }
    out
}

/// A Javadoc block at `indent`, from an already-escaped summary.
fn javadoc(indent: &str, doc: &OptionDoc, tags: &[String]) -> String {
    let mut out = format!("{indent}/**\n{indent} * {}\n", doc.summary);
    for tag in tags {
        out.push_str(&format!("{indent} * {tag}\n"));
    }
    out.push_str(&format!("{indent} */\n"));
    out
}

/// Joins per-option blocks with a blank line between them.
fn join_blocks(blocks: impl IntoIterator<Item = String>) -> String {
    blocks.into_iter().collect::<Vec<_>>().join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_paths_follow_package_and_suffix() {
        let request = GenerateRequest::new("org.apache.rat.gradle", "RatOptions");
        let spec = OutputSpec {
            template: "GradleConfiguration.tpl",
            suffix: "ToConfiguration",
            internal: true,
        };
        assert_eq!(
            spec.path(&request),
            "org/apache/rat/gradle/internal/RatOptionsToConfiguration.java"
        );
        assert_eq!(spec.package(&request.package), "org.apache.rat.gradle.internal");

        let flat = GenerateRequest::new("", "Opts");
        let spec = OutputSpec {
            template: "Maven.tpl",
            suffix: "",
            internal: false,
        };
        assert_eq!(spec.path(&flat), "Opts.java");
    }

    #[test]
    fn registry_covers_every_target_id() {
        let ids: Vec<TargetId> = builtin_targets().iter().map(|t| t.id()).collect();
        assert_eq!(ids, TargetId::ALL.to_vec());
        for id in TargetId::ALL {
            assert_eq!(target_for(id).id(), id);
        }
    }

    #[test]
    fn counters_must_be_repeatable() {
        let mut opt = OptionDescriptor::new("counter-max", "Max.", OptionKind::Value);
        opt.value_type = ValueType::Counter;
        let err = check_shape(&opt, TargetId::Gradle, "counterMax").unwrap_err();
        assert!(matches!(err, GenerationError::UnsupportedType { .. }));
    }
}
