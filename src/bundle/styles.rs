//! Inline external stylesheets referenced by `<link rel="stylesheet">`.

use std::fs;
use std::path::Path;

use regex::Captures;

use crate::asset_paths::{resolve_local_reference, should_ignore_asset_reference};
use crate::models::{PackReport, PackWarning};

use super::js_patch::escape_inline_style;
use super::tags::{attribute, link_tag_pattern, parse_attributes, render_attributes};

const DROPPED_ATTRIBUTES: &[&str] = &["rel", "href", "type", "integrity", "crossorigin", "as"];

/// Replace each local stylesheet link with a `<style>` block holding the file's contents.
///
/// Links that cannot be read are kept as they are and reported.
pub fn inline_stylesheets(html: &str, base_dir: &Path, report: &mut PackReport) -> String {
    link_tag_pattern()
        .replace_all(html, |caps: &Captures| {
            let original = caps[0].to_string();
            let attributes = parse_attributes(&caps[1]);

            let is_stylesheet = attribute(&attributes, "rel").is_some_and(|rel| {
                rel
                    .split_ascii_whitespace()
                    .any(|token| token.eq_ignore_ascii_case("stylesheet"))
            });
            let Some(href) = attribute(&attributes, "href") else {
                return original;
            };
            if !is_stylesheet || should_ignore_asset_reference(href) {
                return original;
            }

            let Some(path) = resolve_local_reference(base_dir, href) else {
                report.warn(PackWarning::StylesheetSkipped {
                    href: href.to_string(),
                    reason: "path leaves the project directory".into(),
                });
                return original;
            };

            match fs::read_to_string(&path) {
                Ok(content) => {
                    tracing::debug!(href, bytes = content.len(), "inlined stylesheet");
                    format!(
                        "<style{}>\n{}\n</style>",
                        render_attributes(&attributes, DROPPED_ATTRIBUTES),
                        escape_inline_style(&content)
                    )
                }
                Err(err) => {
                    report.warn(PackWarning::StylesheetSkipped {
                        href: href.to_string(),
                        reason: err.to_string(),
                    });
                    original
                }
            }
        })
        .into_owned()
}
