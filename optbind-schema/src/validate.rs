use optbind_types::options::{DefaultValue, OptionDescriptor, OptionKind, OptionSchema};
use std::collections::BTreeSet;
use std::fmt;

/// One broken invariant, attributed to the option it was found on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub option: String,
    pub message: String,
}

impl Violation {
    fn new(option: &str, message: impl Into<String>) -> Self {
        Self {
            option: option.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "option '{}': {}", self.option, self.message)
    }
}

/// Check schema content invariants. Returns every violation, in schema order.
pub fn validate_schema(schema: &OptionSchema) -> Vec<Violation> {
    let mut out = Vec::new();
    let mut ids = BTreeSet::new();
    let mut shorts = BTreeSet::new();

    for opt in &schema.options {
        if !is_valid_id(&opt.id) {
            out.push(Violation::new(
                &opt.id,
                "id must start with a letter or digit and contain only letters, digits and '-'",
            ));
        }
        if !ids.insert(opt.id.as_str()) {
            out.push(Violation::new(&opt.id, "duplicate id"));
        }
        if let Some(short) = &opt.short {
            if short.chars().count() != 1 {
                out.push(Violation::new(&opt.id, "short alias must be a single character"));
            }
            if !shorts.insert(short.as_str()) {
                out.push(Violation::new(
                    &opt.id,
                    format!("short alias '{}' already used", short),
                ));
            }
        }
        if opt.description.trim().is_empty() {
            out.push(Violation::new(&opt.id, "description must not be empty"));
        }
        check_choices(opt, &mut out);
        check_default(opt, &mut out);
    }

    out
}

fn is_valid_id(id: &str) -> bool {
    let mut chars = id.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphanumeric() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '-')
}

fn check_choices(opt: &OptionDescriptor, out: &mut Vec<Violation>) {
    match opt.kind {
        OptionKind::Choice if opt.choices.is_empty() => {
            out.push(Violation::new(&opt.id, "choice option declares no choices"));
        }
        OptionKind::Choice => {
            let unique: BTreeSet<&str> = opt.choices.iter().map(String::as_str).collect();
            if unique.len() != opt.choices.len() {
                out.push(Violation::new(&opt.id, "choices contain duplicates"));
            }
        }
        _ if !opt.choices.is_empty() => {
            out.push(Violation::new(
                &opt.id,
                format!("choices are only allowed on choice options, not {}", opt.kind),
            ));
        }
        _ => {}
    }
}

fn check_default(opt: &OptionDescriptor, out: &mut Vec<Violation>) {
    let Some(default) = &opt.default else {
        return;
    };

    let shape_ok = matches!(
        (opt.kind, default),
        (OptionKind::Flag, DefaultValue::Bool(_))
            | (OptionKind::Value, DefaultValue::Text(_))
            | (OptionKind::Choice, DefaultValue::Text(_))
            | (OptionKind::Repeatable, DefaultValue::List(_))
    );
    if !shape_ok {
        out.push(Violation::new(
            &opt.id,
            format!(
                "default of shape {} does not fit a {} option",
                default.shape(),
                opt.kind
            ),
        ));
        return;
    }

    if let (OptionKind::Choice, DefaultValue::Text(value)) = (opt.kind, default)
        && !opt.choices.contains(value)
    {
        out.push(Violation::new(
            &opt.id,
            format!("default '{}' is not one of the declared choices", value),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use optbind_types::options::OptionDescriptor;

    fn choice(id: &str, choices: &[&str], default: Option<&str>) -> OptionDescriptor {
        let mut opt = OptionDescriptor::new(id, "Pick one.", OptionKind::Choice);
        opt.choices = choices.iter().map(|c| c.to_string()).collect();
        opt.default = default.map(|d| DefaultValue::Text(d.to_string()));
        opt
    }

    #[test]
    fn valid_schema_has_no_violations() {
        let schema = OptionSchema::new(vec![
            OptionDescriptor::flag("addLicense", "Adds a license."),
            choice("output-style", &["xml", "plain"], Some("xml")),
        ]);
        assert!(validate_schema(&schema).is_empty());
    }

    #[test]
    fn duplicate_ids_are_reported() {
        let schema = OptionSchema::new(vec![
            OptionDescriptor::flag("force", "Forces."),
            OptionDescriptor::flag("force", "Forces again."),
        ]);
        let v = validate_schema(&schema);
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].message, "duplicate id");
    }

    #[test]
    fn default_outside_choices_is_reported() {
        let schema = OptionSchema::new(vec![choice("style", &["xml"], Some("html"))]);
        let v = validate_schema(&schema);
        assert_eq!(v.len(), 1);
        assert!(v[0].message.contains("'html'"));
    }

    #[test]
    fn empty_choice_list_is_reported() {
        let schema = OptionSchema::new(vec![choice("style", &[], None)]);
        assert_eq!(
            validate_schema(&schema)[0].message,
            "choice option declares no choices"
        );
    }

    #[test]
    fn default_shape_must_match_kind() {
        let mut opt = OptionDescriptor::flag("force", "Forces.");
        opt.default = Some(DefaultValue::Text("yes".into()));
        let v = validate_schema(&OptionSchema::new(vec![opt]));
        assert!(v[0].message.contains("shape string"));
    }

    #[test]
    fn ids_with_spaces_or_leading_dash_are_rejected() {
        assert!(!is_valid_id("-x"));
        assert!(!is_valid_id("a b"));
        assert!(!is_valid_id(""));
        assert!(is_valid_id("input-exclude-std"));
        assert!(is_valid_id("addLicense"));
    }

    #[test]
    fn short_aliases_must_be_unique_single_chars() {
        let mut a = OptionDescriptor::flag("force", "Forces.");
        a.short = Some("f".into());
        let mut b = OptionDescriptor::flag("fast", "Goes fast.");
        b.short = Some("f".into());
        let mut c = OptionDescriptor::flag("copy", "Copies.");
        c.short = Some("cp".into());
        let v = validate_schema(&OptionSchema::new(vec![a, b, c]));
        assert_eq!(v.len(), 2);
    }
}
