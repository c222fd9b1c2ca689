//! `META-INF/MANIFEST.MF` text for reproducible archives.
//!
//! Only fixed attributes are written. Nothing derived from the clock, the
//! host or the VCS ends up in the manifest.

use serde::{Deserialize, Serialize};

pub const MANIFEST_PATH: &str = "META-INF/MANIFEST.MF";

/// Maximum line length in bytes, excluding the line break.
const LINE_LIMIT: usize = 72;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveAttributes {
    pub title: String,
    pub vendor: String,
    pub url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Render the main manifest section with CRLF line endings.
pub fn render_manifest(attrs: &ArchiveAttributes) -> String {
    let mut out = String::new();
    push_attribute(&mut out, "Manifest-Version", "1.0");
    push_attribute(&mut out, "Implementation-Title", &attrs.title);
    if let Some(version) = &attrs.version {
        push_attribute(&mut out, "Implementation-Version", version);
    }
    push_attribute(&mut out, "Implementation-Vendor", &attrs.vendor);
    push_attribute(&mut out, "Implementation-URL", &attrs.url);
    out.push_str("\r\n");
    out
}

/// Write `Name: value`, wrapping at 72 bytes with single-space continuation
/// lines. Wrapping never splits a UTF-8 sequence.
fn push_attribute(out: &mut String, name: &str, value: &str) {
    let line = format!("{name}: {value}");
    let mut rest = line.as_str();
    let mut limit = LINE_LIMIT;
    let mut first = true;

    while !rest.is_empty() {
        let mut cut = rest.len().min(limit);
        while !rest.is_char_boundary(cut) {
            cut -= 1;
        }
        if !first {
            out.push(' ');
        }
        out.push_str(&rest[..cut]);
        out.push_str("\r\n");
        rest = &rest[cut..];
        first = false;
        limit = LINE_LIMIT - 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn rat() -> ArchiveAttributes {
        ArchiveAttributes {
            title: "Apache Creadur RAT™".into(),
            vendor: "Apache Software Foundation".into(),
            url: "https://creadur.apache.org/rat/".into(),
            version: None,
        }
    }

    #[test]
    fn renders_fixed_attributes_in_order() {
        assert_eq!(
            render_manifest(&rat()),
            "Manifest-Version: 1.0\r\n\
             Implementation-Title: Apache Creadur RAT™\r\n\
             Implementation-Vendor: Apache Software Foundation\r\n\
             Implementation-URL: https://creadur.apache.org/rat/\r\n\
             \r\n"
        );
    }

    #[test]
    fn version_is_optional() {
        let mut attrs = rat();
        attrs.version = Some("0.17".into());
        let text = render_manifest(&attrs);
        assert!(text.contains("Implementation-Title: Apache Creadur RAT™\r\nImplementation-Version: 0.17\r\n"));
    }

    #[test]
    fn long_values_wrap_at_72_bytes() {
        let mut attrs = rat();
        attrs.url = format!("https://example.org/{}", "a".repeat(100));
        let text = render_manifest(&attrs);

        let url_lines: Vec<&str> = text
            .split("\r\n")
            .skip_while(|l| !l.starts_with("Implementation-URL"))
            .take_while(|l| !l.is_empty())
            .collect();
        assert!(url_lines.len() > 1);
        assert!(url_lines.iter().all(|l| l.len() <= 72));
        assert!(url_lines[1..].iter().all(|l| l.starts_with(' ')));
        let joined: String = url_lines
            .iter()
            .enumerate()
            .map(|(i, l)| if i == 0 { *l } else { &l[1..] })
            .collect();
        assert_eq!(joined, format!("Implementation-URL: {}", attrs.url));
    }

    #[test]
    fn wrapping_keeps_multibyte_characters_whole() {
        let mut attrs = rat();
        attrs.title = "™".repeat(40);
        let text = render_manifest(&attrs);
        for line in text.split("\r\n") {
            assert!(line.len() <= 72, "{line}");
        }
        assert!(text.contains(&"™".repeat(10)));
    }
}
