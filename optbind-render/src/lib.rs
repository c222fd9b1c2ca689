//! Rendering helpers for human-readable and archive artifacts.

mod manifest;

pub use manifest::{ArchiveAttributes, MANIFEST_PATH, render_manifest};

use optbind_types::report::{DriftKind, GenerationReport};

pub fn render_generation_md(report: &GenerationReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("# optbind {}\n\n", report.target));
    out.push_str(&format!("- Status: `{}`\n", report.status.as_str()));
    out.push_str(&format!("- Output: `{}`\n", report.out_dir));
    out.push_str(&format!("- Cache key: `{}`\n", report.cache_key));
    out.push_str(&format!(
        "- Options: {} bound, {} unsupported, {} deprecated\n\n",
        report.options.bound, report.options.unsupported, report.options.deprecated
    ));

    out.push_str("## Files\n\n");
    if report.files.is_empty() {
        out.push_str("_No files generated._\n");
    } else {
        for f in &report.files {
            out.push_str(&format!("- `{}` ({} bytes, sha256 `{}`)\n", f.path, f.bytes, f.sha256));
        }
    }

    if !report.drift.is_empty() {
        out.push_str("\n## Drift\n\n");
        for d in &report.drift {
            out.push_str(&format!("### {} `{}`\n\n", drift_label(d.kind), d.path));
            if let Some(patch) = &d.patch {
                out.push_str("```diff\n");
                out.push_str(patch);
                if !patch.ends_with('\n') {
                    out.push('\n');
                }
                out.push_str("```\n\n");
            }
        }
    }

    out
}

fn drift_label(k: DriftKind) -> &'static str {
    match k {
        DriftKind::Missing => "Missing",
        DriftKind::Modified => "Modified",
        DriftKind::Extra => "Extra",
    }
}
