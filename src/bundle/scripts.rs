//! Inline external `<script src>` references.

use std::fs;
use std::path::Path;

use regex::Captures;

use crate::asset_paths::{resolve_local_reference, should_ignore_asset_reference};
use crate::models::{PackReport, PackWarning};

use super::js_patch::{ConcatPatcher, escape_inline_script};
use super::tags::{attribute, parse_attributes, render_attributes, script_element_pattern};

const DROPPED_ATTRIBUTES: &[&str] = &["src", "async", "defer", "integrity", "crossorigin"];

/// Replace each local, empty-bodied `<script src>` with an inline block of its source.
///
/// When `patcher` is given the source gets the same `concat` path normalisation as the
/// HTML shell. Scripts that cannot be read are kept as they are and reported.
pub fn inline_scripts(
    html: &str,
    base_dir: &Path,
    patcher: Option<&ConcatPatcher>,
    report: &mut PackReport,
) -> String {
    script_element_pattern()
        .replace_all(html, |caps: &Captures| {
            let original = caps[0].to_string();
            if !caps[2].trim().is_empty() {
                return original;
            }

            let attributes = parse_attributes(&caps[1]);
            let Some(src) = attribute(&attributes, "src") else {
                return original;
            };
            if should_ignore_asset_reference(src) {
                return original;
            }

            let Some(path) = resolve_local_reference(base_dir, src) else {
                report.warn(PackWarning::ScriptSkipped {
                    src: src.to_string(),
                    reason: "path leaves the project directory".into(),
                });
                return original;
            };

            let source = match fs::read_to_string(&path) {
                Ok(source) => source,
                Err(err) => {
                    report.warn(PackWarning::ScriptSkipped {
                        src: src.to_string(),
                        reason: err.to_string(),
                    });
                    return original;
                }
            };

            let source = match patcher {
                Some(patcher) => patcher.apply(&source),
                None => source,
            };
            tracing::debug!(src, bytes = source.len(), "inlined script");

            format!(
                "<script{}>\n{}\n</script>",
                render_attributes(&attributes, DROPPED_ATTRIBUTES),
                escape_inline_script(&source)
            )
        })
        .into_owned()
}
