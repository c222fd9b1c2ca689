//! Line-directive template engine.
//!
//! A template is plain text. A line whose trimmed content is exactly
//! `${name}` is a directive and gets replaced by the target's expansion;
//! every other line is copied verbatim. `${include:Other.tpl}` inlines
//! another template of the same set, with its own directives expanded.
//!
//! Output always uses `\n` line endings, whatever the template file used.

use crate::error::GenerationError;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

static DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\$\{([A-Za-z][A-Za-z0-9_.:-]*)\}$").expect("invalid directive regex")
});

const INCLUDE_PREFIX: &str = "include:";

/// Named templates, iterated in name order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateSet {
    templates: BTreeMap<String, String>,
}

impl TemplateSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, contents: impl Into<String>) {
        self.templates.insert(name.into(), contents.into());
    }

    pub fn with(mut self, name: impl Into<String>, contents: impl Into<String>) -> Self {
        self.insert(name, contents);
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.templates.get(name).map(String::as_str)
    }

    pub fn require(&self, name: &str) -> Result<&str, GenerationError> {
        self.get(name).ok_or_else(|| GenerationError::MissingTemplate {
            template: name.to_string(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.templates
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TemplateSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = TemplateSet::new();
        for (k, v) in iter {
            set.insert(k, v);
        }
        set
    }
}

/// What a target produces for one directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expansion {
    /// Literal text; each line already terminated by `\n`.
    Text(String),
    /// Inline another template of the set.
    Include(&'static str),
}

/// Extract the directive name if `line` is a directive line.
pub fn directive_of(line: &str) -> Option<&str> {
    DIRECTIVE
        .captures(line.trim())
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Render template `name` from `set`, asking `expand` for every directive.
///
/// `expand` returns `None` for directives it does not know, which is an
/// error: a typo in a template must never silently drop output.
pub fn render<F>(set: &TemplateSet, name: &str, mut expand: F) -> Result<String, GenerationError>
where
    F: FnMut(&str) -> Option<Expansion>,
{
    let mut out = String::new();
    let mut stack = Vec::new();
    render_into(set, name, &mut expand, &mut stack, &mut out)?;
    Ok(out)
}

fn render_into<F>(
    set: &TemplateSet,
    name: &str,
    expand: &mut F,
    stack: &mut Vec<String>,
    out: &mut String,
) -> Result<(), GenerationError>
where
    F: FnMut(&str) -> Option<Expansion>,
{
    if stack.iter().any(|s| s == name) {
        return Err(GenerationError::IncludeCycle {
            template: name.to_string(),
        });
    }
    let contents = set.require(name)?;
    stack.push(name.to_string());

    for (idx, line) in contents.lines().enumerate() {
        let Some(directive) = directive_of(line) else {
            out.push_str(line);
            out.push('\n');
            continue;
        };

        if let Some(included) = directive.strip_prefix(INCLUDE_PREFIX) {
            render_into(set, included, expand, stack, out)?;
            continue;
        }

        match expand(directive) {
            Some(Expansion::Text(text)) => out.push_str(&text),
            Some(Expansion::Include(included)) => {
                render_into(set, included, expand, stack, out)?;
            }
            None => {
                return Err(GenerationError::UnknownDirective {
                    template: name.to_string(),
                    line: idx + 1,
                    directive: directive.to_string(),
                });
            }
        }
    }

    stack.pop();
    Ok(())
}
