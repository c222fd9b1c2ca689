//! Maven: an abstract mojo with one annotated setter per option.

use super::{
    Binding, BoundOption, OutputSpec, RenderContext, Target, TargetProfile, check_shape,
    javadoc, join_blocks, static_block,
};
use crate::describe::{java_literal, javadoc_escape};
use crate::error::GenerationError;
use crate::naming::{accessor_name, create_name};
use crate::template::Expansion;
use optbind_types::options::{OptionDescriptor, OptionKind, ValueType};
use optbind_types::target::TargetId;

const OUTPUTS: &[OutputSpec] = &[OutputSpec {
    template: "Maven.tpl",
    suffix: "",
    internal: false,
}];

const DIRECTIVES: &[&str] = &["package", "class", "constructor", "static", "methods"];

const INDENT: &str = "    ";

#[derive(Debug, Clone, Copy, Default)]
pub struct MavenTarget;

impl Target for MavenTarget {
    fn id(&self) -> TargetId {
        TargetId::Maven
    }

    fn description(&self) -> &'static str {
        "Maven abstract mojo with @Parameter setters"
    }

    fn outputs(&self) -> &'static [OutputSpec] {
        OUTPUTS
    }

    fn directives(&self) -> &'static [&'static str] {
        DIRECTIVES
    }

    fn bind(
        &self,
        option: &OptionDescriptor,
        profile: &TargetProfile,
    ) -> Result<Binding, GenerationError> {
        let name = create_name(&option.id, &profile.renames);
        check_shape(option, TargetId::Maven, &name)?;
        if option.value_type == ValueType::Counter {
            return Err(GenerationError::unsupported(
                &option.id,
                TargetId::Maven,
                "counter values have no @Parameter form",
            ));
        }

        let multiple = option.takes_args();
        let declared_type = match option.kind {
            OptionKind::Flag => "boolean",
            OptionKind::Repeatable => "String[]",
            OptionKind::Value | OptionKind::Choice => "String",
        };
        Ok(Binding {
            option: option.id.clone(),
            accessor: accessor_name("set", &name, multiple),
            declared_type: declared_type.to_string(),
            deprecated: option.is_deprecated(),
            name,
        })
    }

    fn expand(&self, directive: &str, ctx: &RenderContext<'_>) -> Option<Expansion> {
        let text = match directive {
            "package" => format!("package {};\n", ctx.file_package()),
            "class" => format!(
                "public abstract class {} extends AbstractMojo {{\n",
                ctx.file_class()
            ),
            "constructor" => format!("{INDENT}protected {}() {{}}\n", ctx.file_class()),
            "static" => static_block(ctx),
            "methods" => {
                let prefix = ctx.request.profile.property_prefix.as_deref();
                join_blocks(ctx.bound.iter().map(|b| setter(b, prefix)))
            }
            _ => return None,
        };
        Some(Expansion::Text(text))
    }
}

/// `@Parameter(property = "rat.x", defaultValue = "y")`, leaving out the
/// parts that do not apply.
fn parameter_annotation(bound: &BoundOption<'_>, prefix: Option<&str>) -> String {
    let mut parts = Vec::new();
    if let Some(prefix) = prefix.filter(|_| !bound.option.takes_args()) {
        parts.push(format!(
            "property = {}",
            java_literal(&format!("{prefix}.{}", bound.binding.name))
        ));
    }
    if !bound.binding.deprecated
        && let Some(default) = &bound.option.default
    {
        parts.push(format!("defaultValue = {}", java_literal(&default.to_string())));
    }

    if parts.is_empty() {
        "@Parameter".to_string()
    } else {
        format!("@Parameter({})", parts.join(", "))
    }
}

fn setter(bound: &BoundOption<'_>, prefix: Option<&str>) -> String {
    let name = &bound.binding.name;
    let key = java_literal(&bound.option.id);

    let mut tags = vec![format!("@param {name} the argument.")];
    if let Some(dep) = &bound.doc.deprecation {
        tags.push(format!("@deprecated {}", javadoc_escape(dep)));
    }

    let mut out = javadoc(INDENT, &bound.doc, &tags);
    if bound.binding.deprecated {
        out.push_str(&format!("{INDENT}@Deprecated\n"));
    }
    out.push_str(&format!(
        "{INDENT}{}\n{INDENT}public void {}({} {name}) {{\n",
        parameter_annotation(bound, prefix),
        bound.binding.accessor,
        bound.binding.declared_type,
    ));

    let i = INDENT;
    if bound.option.takes_arg() {
        let verb = if bound.option.takes_args() { "add" } else { "set" };
        out.push_str(&format!("{i}{i}{verb}Arg({key}, {name});\n"));
    } else {
        out.push_str(&format!(
            "{i}{i}if ({name}) {{\n\
             {i}{i}{i}setArg({key}, null);\n\
             {i}{i}}} else {{\n\
             {i}{i}{i}removeArg({key});\n\
             {i}{i}}}\n"
        ));
    }
    out.push_str(&format!("{INDENT}}}\n"));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::typed_default;
    use crate::describe::OptionDoc;
    use optbind_types::options::{DefaultValue, Deprecation};
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    fn profile() -> TargetProfile {
        TargetProfile {
            renames: BTreeMap::from([("addLicense".into(), "add-license".into())]),
            property_prefix: Some("rat".into()),
            ..TargetProfile::default()
        }
    }

    fn bound(opt: &OptionDescriptor) -> BoundOption<'_> {
        BoundOption {
            option: opt,
            binding: MavenTarget.bind(opt, &profile()).unwrap(),
            doc: OptionDoc {
                summary: opt.description.clone(),
                deprecation: opt.deprecated.as_ref().map(|d| d.to_string()),
            },
            default: typed_default(opt).unwrap(),
        }
    }

    #[test]
    fn flag_setter_with_property_and_default() {
        let mut opt = OptionDescriptor::flag("addLicense", "Adds a license.");
        opt.default = Some(DefaultValue::Bool(false));
        assert_eq!(
            setter(&bound(&opt), Some("rat")),
            "    /**\n\
             \x20    * Adds a license.\n\
             \x20    * @param addLicense the argument.\n\
             \x20    */\n\
             \x20   @Parameter(property = \"rat.addLicense\", defaultValue = \"false\")\n\
             \x20   public void setAddLicense(boolean addLicense) {\n\
             \x20       if (addLicense) {\n\
             \x20           setArg(\"addLicense\", null);\n\
             \x20       } else {\n\
             \x20           removeArg(\"addLicense\");\n\
             \x20       }\n\
             \x20   }\n"
        );
    }

    #[test]
    fn repeatable_setter_adds_and_has_no_property() {
        let mut opt =
            OptionDescriptor::new("input-exclude", "Excludes files.", OptionKind::Repeatable);
        opt.default = Some(DefaultValue::List(vec!["a".into(), "b".into()]));
        let out = setter(&bound(&opt), Some("rat"));
        assert!(out.contains("    @Parameter(defaultValue = \"a,b\")\n"));
        assert!(out.contains("public void setInputExcludes(String[] inputExclude) {"));
        assert!(out.contains("        addArg(\"input-exclude\", inputExclude);\n"));
    }

    #[test]
    fn deprecated_options_drop_default_value() {
        let mut opt = OptionDescriptor::new("old-dir", "Old dir.", OptionKind::Value);
        opt.default = Some(DefaultValue::Text("x".into()));
        opt.deprecated = Some(Deprecation::default());
        let out = setter(&bound(&opt), None);
        assert!(out.contains("     * @deprecated Deprecated\n"));
        assert!(out.contains("    @Deprecated\n    @Parameter\n"));
        assert!(out.contains("        setArg(\"old-dir\", oldDir);\n"));
    }

    #[test]
    fn counters_are_unsupported() {
        let mut opt = OptionDescriptor::new("counter-max", "Max.", OptionKind::Repeatable);
        opt.value_type = ValueType::Counter;
        let err = MavenTarget.bind(&opt, &profile()).unwrap_err();
        assert!(matches!(
            err,
            GenerationError::UnsupportedType {
                target: TargetId::Maven,
                ..
            }
        ));
    }
}
