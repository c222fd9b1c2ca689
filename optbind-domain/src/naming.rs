//! Naming conventions shared by every target.

use heck::ToLowerCamelCase;
use std::collections::BTreeMap;

/// Target-side name of an option: the rename (if any) or the id, converted
/// to lowerCamel case.
///
/// Kebab ids are lower-cased word by word (`input-exclude` becomes
/// `inputExclude`, `Log-LEVEL` becomes `logLevel`). Ids without a `-` keep
/// their camel humps, so `addLicense` stays `addLicense`.
pub fn create_name(id: &str, renames: &BTreeMap<String, String>) -> String {
    let source = renames.get(id).map(String::as_str).unwrap_or(id);
    if source.contains('-') {
        source.to_lowercase().to_lower_camel_case()
    } else {
        source.to_lower_camel_case()
    }
}

/// Accessor name such as `getInputExcludes` or `setAddLicense`.
///
/// Multi-valued options get a trailing `s` unless the name already reads as
/// a plural or as an approved/denied list.
pub fn accessor_name(prefix: &str, name: &str, multiple: bool) -> String {
    let mut fname = capitalize(name);
    if multiple
        && !(fname.ends_with('s') || fname.ends_with("Approved") || fname.ends_with("Denied"))
    {
        fname.push('s');
    }
    format!("{prefix}{fname}")
}

pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `org.apache.rat` → `org/apache/rat`. Empty segments are dropped.
pub fn package_dir(package: &str) -> String {
    package
        .split('.')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

const JAVA_KEYWORDS: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "false", "final", "finally",
    "float", "for", "goto", "if", "implements", "import", "instanceof", "int", "interface", "long",
    "native", "new", "null", "package", "private", "protected", "public", "return", "short",
    "static", "strictfp", "super", "switch", "synchronized", "this", "throw", "throws",
    "transient", "true", "try", "void", "volatile", "while",
];

/// Whether `name` can be used verbatim as a Java identifier.
pub fn is_java_identifier(name: &str) -> bool {
    if JAVA_KEYWORDS.contains(&name) {
        return false;
    }
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}
