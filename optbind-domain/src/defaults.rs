//! Typed option defaults.

use crate::error::GenerationError;
use optbind_types::options::{DefaultValue, OptionDescriptor, OptionKind, ValueType};
use std::collections::BTreeSet;

/// A default checked against the option's kind and value type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypedDefault {
    Bool(bool),
    Text(String),
    Integer(i32),
    Long(i64),
    File(String),
    Texts(Vec<String>),
    Integers(Vec<i32>),
    Longs(Vec<i64>),
    Files(Vec<String>),
    /// `name:count` pairs, in declaration order.
    Counters(Vec<(String, i32)>),
}

/// Parse the declared default of `opt`, if any.
pub fn typed_default(opt: &OptionDescriptor) -> Result<Option<TypedDefault>, GenerationError> {
    let Some(default) = &opt.default else {
        return Ok(None);
    };
    let invalid = |reason: String| GenerationError::InvalidDefault {
        option: opt.id.clone(),
        reason,
    };

    let typed = match (opt.kind, default) {
        (OptionKind::Flag, DefaultValue::Bool(b)) => TypedDefault::Bool(*b),
        (OptionKind::Value | OptionKind::Choice, DefaultValue::Text(s)) => match opt.value_type {
            ValueType::String => TypedDefault::Text(s.clone()),
            ValueType::File => TypedDefault::File(s.clone()),
            ValueType::Integer => TypedDefault::Integer(parse_number(s).map_err(invalid)?),
            ValueType::Long => TypedDefault::Long(parse_number(s).map_err(invalid)?),
            ValueType::Counter => TypedDefault::Counters(vec![parse_counter(s).map_err(invalid)?]),
        },
        (OptionKind::Repeatable, DefaultValue::List(items)) => match opt.value_type {
            ValueType::String => TypedDefault::Texts(items.clone()),
            ValueType::File => TypedDefault::Files(items.clone()),
            ValueType::Integer => TypedDefault::Integers(
                items
                    .iter()
                    .map(|s| parse_number(s))
                    .collect::<Result<_, _>>()
                    .map_err(invalid)?,
            ),
            ValueType::Long => TypedDefault::Longs(
                items
                    .iter()
                    .map(|s| parse_number(s))
                    .collect::<Result<_, _>>()
                    .map_err(invalid)?,
            ),
            ValueType::Counter => TypedDefault::Counters(parse_counters(items).map_err(invalid)?),
        },
        (kind, other) => {
            return Err(invalid(format!(
                "a {} default does not fit a {kind} option",
                other.shape()
            )));
        }
    };
    Ok(Some(typed))
}

fn parse_number<T>(s: &str) -> Result<T, String>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    s.trim()
        .parse::<T>()
        .map_err(|e| format!("'{s}' is not a valid number: {e}"))
}

fn parse_counter(s: &str) -> Result<(String, i32), String> {
    let (name, count) = s
        .rsplit_once(':')
        .ok_or_else(|| format!("'{s}' is not a name:count pair"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("'{s}' has an empty counter name"));
    }
    Ok((name.to_string(), parse_number(count)?))
}

/// Counter pairs become map entries, so every name may appear only once.
fn parse_counters(items: &[String]) -> Result<Vec<(String, i32)>, String> {
    let mut seen = BTreeSet::new();
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        let (name, count) = parse_counter(item)?;
        if !seen.insert(name.clone()) {
            return Err(format!("counter '{name}' is given more than once"));
        }
        out.push((name, count));
    }
    Ok(out)
}
