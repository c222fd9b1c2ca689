use serde::{Deserialize, Serialize};
use std::fmt;

/// The canonical, tool-agnostic option list.
///
/// Order is significant: generators emit members in schema order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSchema {
    pub schema: String,

    #[serde(default)]
    pub options: Vec<OptionDescriptor>,
}

impl OptionSchema {
    pub fn new(options: Vec<OptionDescriptor>) -> Self {
        Self {
            schema: crate::schema::OPTBIND_OPTIONS_V1.to_string(),
            options,
        }
    }

    pub fn find(&self, id: &str) -> Option<&OptionDescriptor> {
        self.options.iter().find(|o| o.id == id)
    }

    /// Looks an option up by id or by its short alias.
    pub fn find_by_key(&self, key: &str) -> Option<&OptionDescriptor> {
        self.options
            .iter()
            .find(|o| o.id == key || o.short.as_deref() == Some(key))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionDescriptor {
    /// Long option name; the stable identifier.
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short: Option<String>,

    pub description: String,

    pub kind: OptionKind,

    #[serde(default, skip_serializing_if = "ValueType::is_string")]
    pub value_type: ValueType,

    /// Display name of the argument type, e.g. `File` or `LicenseID`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arg_name: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<DefaultValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<Deprecation>,
}

impl OptionDescriptor {
    /// Convenience constructor for a flag with no default.
    pub fn flag(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(id, description, OptionKind::Flag)
    }

    pub fn new(id: impl Into<String>, description: impl Into<String>, kind: OptionKind) -> Self {
        Self {
            id: id.into(),
            short: None,
            description: description.into(),
            kind,
            value_type: ValueType::String,
            arg_name: None,
            choices: Vec::new(),
            default: None,
            deprecated: None,
        }
    }

    pub fn takes_arg(&self) -> bool {
        !matches!(self.kind, OptionKind::Flag)
    }

    pub fn takes_args(&self) -> bool {
        matches!(self.kind, OptionKind::Repeatable)
    }

    pub fn is_deprecated(&self) -> bool {
        self.deprecated.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionKind {
    /// Boolean switch.
    Flag,
    /// Exactly one value.
    Value,
    /// One value out of `choices`.
    Choice,
    /// Zero or more values.
    Repeatable,
}

impl OptionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            OptionKind::Flag => "flag",
            OptionKind::Value => "value",
            OptionKind::Choice => "choice",
            OptionKind::Repeatable => "repeatable",
        }
    }
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    #[default]
    String,
    File,
    Integer,
    Long,
    /// A `name:count` pair.
    Counter,
}

impl ValueType {
    pub fn is_string(&self) -> bool {
        matches!(self, ValueType::String)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ValueType::String => "string",
            ValueType::File => "file",
            ValueType::Integer => "integer",
            ValueType::Long => "long",
            ValueType::Counter => "counter",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DefaultValue {
    Bool(bool),
    Text(String),
    List(Vec<String>),
}

impl DefaultValue {
    pub fn shape(&self) -> &'static str {
        match self {
            DefaultValue::Bool(_) => "bool",
            DefaultValue::Text(_) => "string",
            DefaultValue::List(_) => "list",
        }
    }
}

impl fmt::Display for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultValue::Bool(b) => write!(f, "{}", b),
            DefaultValue::Text(s) => f.write_str(s),
            DefaultValue::List(items) => f.write_str(&items.join(",")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deprecation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub since: Option<String>,

    #[serde(default)]
    pub for_removal: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl fmt::Display for Deprecation {
    /// `Deprecated for removal since 0.17: Use --edit-license`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Deprecated")?;
        if self.for_removal {
            f.write_str(" for removal")?;
        }
        if let Some(since) = &self.since {
            write!(f, " since {}", since)?;
        }
        if let Some(note) = &self.note {
            write!(f, ": {}", note)?;
        }
        Ok(())
    }
}
