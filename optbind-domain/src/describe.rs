//! Turns option descriptions into documentation and Java source literals.

use crate::error::GenerationError;
use crate::naming::create_name;
use optbind_types::options::{OptionDescriptor, OptionSchema};
use quick_xml::escape::partial_escape;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// `--option-id` style references inside free text.
static OPTION_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-(-[a-z0-9]+)+").expect("invalid option reference regex"));

/// Rewrite `--id` references to known options into the target display form
/// `<camelName>`. Unknown references are left alone.
pub fn cleanup(text: &str, schema: &OptionSchema, renames: &BTreeMap<String, String>) -> String {
    OPTION_REF
        .replace_all(text, |caps: &regex::Captures<'_>| {
            let matched = &caps[0];
            match schema.find_by_key(&matched[2..]) {
                Some(opt) => format!("<{}>", create_name(&opt.id, renames)),
                None => matched.to_string(),
            }
        })
        .into_owned()
}

/// Documentation for one option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionDoc {
    /// Escaped for a Javadoc block.
    pub summary: String,
    /// Plain text with option references cleaned up; escape before use in
    /// comments, quote before use in literals.
    pub deprecation: Option<String>,
}

pub fn option_doc(
    opt: &OptionDescriptor,
    schema: &OptionSchema,
    renames: &BTreeMap<String, String>,
) -> Result<OptionDoc, GenerationError> {
    let desc = cleanup(&opt.description, schema, renames);
    if !desc.contains('.') {
        return Err(GenerationError::InvalidDescription {
            option: opt.id.clone(),
            reason: "first sentence must end with a '.'".to_string(),
        });
    }

    let desc = match (&opt.arg_name, opt.takes_arg()) {
        (Some(arg_name), true) => {
            let many = opt.takes_args();
            format!(
                "{desc} Argument{} should be {}{arg_name}. (See Argument Types for clarification)",
                if many { "s" } else { "" },
                if many { "" } else { "a " },
            )
        }
        _ => desc,
    };

    let deprecation = opt
        .deprecated
        .as_ref()
        .map(|d| cleanup(&d.to_string(), schema, renames));

    Ok(OptionDoc {
        summary: javadoc_escape(&desc),
        deprecation,
    })
}

/// HTML-escape `&`, `<`, `>` and break up comment terminators.
pub fn javadoc_escape(text: &str) -> String {
    partial_escape(text).replace("*/", "*&#47;")
}

/// Quote `value` as a Java string literal.
pub fn java_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
