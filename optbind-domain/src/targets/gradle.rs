//! Gradle: an options interface, a task base with input annotations and an
//! internal converter that turns property values into CLI arguments.

use super::{
    Binding, BoundOption, OutputSpec, RenderContext, Target, TargetProfile, check_shape,
    javadoc, join_blocks, static_block,
};
use crate::defaults::TypedDefault;
use crate::describe::{java_literal, javadoc_escape};
use crate::error::GenerationError;
use crate::naming::{accessor_name, create_name};
use crate::template::Expansion;
use optbind_types::options::{OptionDescriptor, OptionKind, ValueType};
use optbind_types::target::TargetId;

pub const ARGS_TEMPLATE: &str = "Args.tpl";

const OUTPUTS: &[OutputSpec] = &[
    OutputSpec {
        template: "GradleOptions.tpl",
        suffix: "",
        internal: false,
    },
    OutputSpec {
        template: "GradleTaskBase.tpl",
        suffix: "TaskBase",
        internal: false,
    },
    OutputSpec {
        template: "GradleConfiguration.tpl",
        suffix: "ToConfiguration",
        internal: true,
    },
];

const DIRECTIVES: &[&str] = &[
    "package",
    "baseImport",
    "interface",
    "taskBaseInterface",
    "class",
    "constructor",
    "constructorBody",
    "static",
    "properties",
    "applyConventions",
    "conventions",
    "converterBody",
    "taskBaseBody",
    "commonArgs",
];

const INDENT: &str = "    ";
const BODY_INDENT: &str = "        ";

#[derive(Debug, Clone, Copy, Default)]
pub struct GradleTarget;

impl Target for GradleTarget {
    fn id(&self) -> TargetId {
        TargetId::Gradle
    }

    fn description(&self) -> &'static str {
        "Gradle extension interface, task base and CLI argument converter"
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
        check_shape(option, TargetId::Gradle, &name)?;
        Ok(Binding {
            option: option.id.clone(),
            accessor: accessor_name("get", &name, option.takes_args()),
            declared_type: property_type(option).to_string(),
            deprecated: option.is_deprecated(),
            name,
        })
    }

    fn expand(&self, directive: &str, ctx: &RenderContext<'_>) -> Option<Expansion> {
        let text = match directive {
            "package" => format!("package {};\n", ctx.file_package()),
            "baseImport" => format!("import {}.*;\n", ctx.request.package),
            "interface" => format!("public interface {} {{\n", ctx.file_class()),
            "taskBaseInterface" => format!(
                "public interface {} extends {} {{\n",
                ctx.file_class(),
                ctx.base_class()
            ),
            "class" => format!("public class {} {{\n", ctx.file_class()),
            "constructor" => format!(
                "{INDENT}public {}({} options) {{\n",
                ctx.file_class(),
                ctx.base_class()
            ),
            "constructorBody" => format!("{BODY_INDENT}setDeprecationReporter();\n"),
            "static" => static_block(ctx),
            "properties" => join_blocks(ctx.bound.iter().map(property_decl)),
            "applyConventions" => apply_conventions(ctx),
            "conventions" => default_conventions(ctx),
            "converterBody" => join_blocks(ctx.bound.iter().map(converter_body)),
            "taskBaseBody" => join_blocks(ctx.bound.iter().map(task_base_override)),
            "commonArgs" => return Some(Expansion::Include(ARGS_TEMPLATE)),
            _ => return None,
        };
        Some(Expansion::Text(text))
    }
}

/// Gradle managed-property type for an option whose shape already passed
/// `check_shape`.
fn property_type(opt: &OptionDescriptor) -> &'static str {
    match (opt.kind, opt.value_type) {
        (OptionKind::Flag, _) => "Property<Boolean>",
        (OptionKind::Repeatable, ValueType::File) => "ConfigurableFileCollection",
        (OptionKind::Repeatable, ValueType::Integer) => "ListProperty<Integer>",
        (OptionKind::Repeatable, ValueType::Long) => "ListProperty<Long>",
        (OptionKind::Repeatable, ValueType::Counter) => "MapProperty<String, Integer>",
        (OptionKind::Repeatable, ValueType::String) => "ListProperty<String>",
        (_, ValueType::File) => "RegularFileProperty",
        (_, ValueType::Integer) => "Property<Integer>",
        (_, ValueType::Long) => "Property<Long>",
        (_, _) => "Property<String>",
    }
}

fn is_file(opt: &OptionDescriptor) -> bool {
    opt.value_type == ValueType::File && opt.takes_arg()
}

fn signature(bound: &BoundOption<'_>) -> String {
    let mut out = String::new();
    if bound.binding.deprecated {
        out.push_str(&format!("{INDENT}@Deprecated\n"));
    }
    out.push_str(&format!(
        "{INDENT}{} {}();\n",
        bound.binding.declared_type, bound.binding.accessor
    ));
    out
}

fn property_decl(bound: &BoundOption<'_>) -> String {
    let tags: Vec<String> = bound
        .doc
        .deprecation
        .iter()
        .map(|d| format!("@deprecated {}", javadoc_escape(d)))
        .collect();
    format!("{}{}", javadoc(INDENT, &bound.doc, &tags), signature(bound))
}

fn task_base_override(bound: &BoundOption<'_>) -> String {
    let mut out = format!("{INDENT}@Override\n");
    let input = if is_file(bound.option) {
        out.push_str(&format!("{INDENT}@PathSensitive(PathSensitivity.RELATIVE)\n"));
        if bound.option.takes_args() {
            "@InputFiles"
        } else {
            "@InputFile"
        }
    } else {
        "@Input"
    };
    out.push_str(&format!("{INDENT}{input}\n{INDENT}@Optional\n"));
    out.push_str(&signature(bound));
    out
}

fn apply_conventions(ctx: &RenderContext<'_>) -> String {
    let mut out = format!(
        "{INDENT}default void applyConventions({} from) {{\n",
        ctx.base_class()
    );
    for bound in ctx.bound {
        out.push_str(&format!(
            "{BODY_INDENT}{0}().convention(from.{0}());\n",
            bound.binding.accessor
        ));
    }
    out.push_str(&format!("{INDENT}}}\n"));
    out
}

fn default_conventions(ctx: &RenderContext<'_>) -> String {
    let mut out = format!("{INDENT}default void applyDefaultConventions() {{\n");
    for bound in ctx.bound {
        let Some(default) = &bound.default else {
            continue;
        };
        let accessor = &bound.binding.accessor;
        match convention_value(default) {
            Some(value) => out.push_str(&format!(
                "{BODY_INDENT}{accessor}().convention({value});\n"
            )),
            // File defaults are documented, not applied.
            None => out.push_str(&format!(
                "{BODY_INDENT}// {accessor}() defaults to {}\n",
                file_default_text(default)
            )),
        }
    }
    out.push_str(&format!("{INDENT}}}\n"));
    out
}

fn convention_value(default: &TypedDefault) -> Option<String> {
    let value = match default {
        TypedDefault::Bool(b) => b.to_string(),
        TypedDefault::Text(s) => java_literal(s),
        TypedDefault::Integer(n) => n.to_string(),
        TypedDefault::Long(n) => format!("{n}L"),
        TypedDefault::Texts(items) => list_of(items.iter().map(|s| java_literal(s))),
        TypedDefault::Integers(items) => list_of(items.iter().map(|n| n.to_string())),
        TypedDefault::Longs(items) => list_of(items.iter().map(|n| format!("{n}L"))),
        TypedDefault::Counters(pairs) => {
            let entries: Vec<String> = pairs
                .iter()
                .map(|(name, count)| format!("java.util.Map.entry({}, {count})", java_literal(name)))
                .collect();
            format!("java.util.Map.ofEntries({})", entries.join(", "))
        }
        TypedDefault::File(_) | TypedDefault::Files(_) => return None,
    };
    Some(value)
}

fn list_of(items: impl Iterator<Item = String>) -> String {
    format!("java.util.List.of({})", items.collect::<Vec<_>>().join(", "))
}

fn file_default_text(default: &TypedDefault) -> String {
    match default {
        TypedDefault::File(path) => path.clone(),
        TypedDefault::Files(paths) => paths.join(", "),
        _ => String::new(),
    }
}

fn converter_body(bound: &BoundOption<'_>) -> String {
    let i = BODY_INDENT;
    let key = java_literal(&bound.option.id);
    let prop = format!("options.{}()", bound.binding.accessor);
    let opt = bound.option;

    if !opt.takes_arg() {
        return format!(
            "{i}if ({prop}.isPresent() && {prop}.get()) {{\n\
             {i}    setArg({key}, null);\n\
             {i}}} else {{\n\
             {i}    removeArg({key});\n\
             {i}}}\n"
        );
    }

    match (opt.takes_args(), opt.value_type) {
        (true, ValueType::File) => format!(
            "{i}for (File file : {prop}.getFiles()) {{\n\
             {i}    addArg({key}, file.getAbsolutePath());\n\
             {i}}}\n"
        ),
        (false, ValueType::File) => format!(
            "{i}if ({prop}.isPresent()) {{\n\
             {i}    setArg({key}, {prop}.get().getAsFile().getAbsolutePath());\n\
             {i}}}\n"
        ),
        (true, ValueType::Counter) => format!(
            "{i}if ({prop}.isPresent()) {{\n\
             {i}    for (Map.Entry<?, ?> entry : {prop}.get().entrySet()) {{\n\
             {i}        addArg({key}, entry.getKey().toString() + ':' + entry.getValue());\n\
             {i}    }}\n\
             {i}}}\n"
        ),
        (true, _) => format!(
            "{i}if ({prop}.isPresent()) {{\n\
             {i}    for (Object elem : {prop}.get()) {{\n\
             {i}        addArg({key}, elem.toString());\n\
             {i}    }}\n\
             {i}}}\n"
        ),
        (false, _) => format!(
            "{i}if ({prop}.isPresent()) {{\n\
             {i}    setArg({key}, {prop}.get().toString());\n\
             {i}}}\n"
        ),
    }
}
