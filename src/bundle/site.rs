//! HTML shell rewriting: the ordered passes that turn a Unity export page into one file.

use std::path::Path;

use anyhow::Result;

use crate::models::{EmbeddedAssets, Manifest, PackReport};

use super::js_patch::ConcatPatcher;
use super::scripts::inline_scripts;
use super::shim::{insert_runtime_shim, render_runtime_shim, shim_script_block};
use super::styles::inline_stylesheets;

/// Inputs shared by every pass over the HTML shell.
#[derive(Debug, Clone, Copy)]
pub struct SiteContext<'a> {
    /// Directory relative `src`/`href` references resolve against.
    pub base_dir: &'a Path,
    /// Build directory name as it appears in URLs.
    pub build_prefix: &'a str,
    /// Manifest extension without the dot.
    pub manifest_extension: &'a str,
    /// Also normalise `concat` paths in inlined scripts.
    pub patch_script_paths: bool,
    /// Loader manifest embedded into the shim.
    pub manifest: &'a Manifest,
    /// Asset records embedded into the shim.
    pub assets: &'a EmbeddedAssets,
}

/// Run the passes in order: path normalisation, stylesheet inlining, shim insertion and
/// script inlining.
///
/// The shim is inserted before scripts are inlined so it lands ahead of the loader code.
pub fn patch_site_index(html: &str, context: &SiteContext<'_>) -> Result<(String, PackReport)> {
    let mut report = PackReport::default();

    let patcher = ConcatPatcher::new(context.build_prefix);
    let text = patcher.apply(html);
    let text = inline_stylesheets(&text, context.base_dir, &mut report);

    let shim = render_runtime_shim(
        context.manifest,
        context.assets,
        context.manifest_extension,
    )?;
    let text = insert_runtime_shim(&text, &shim_script_block(&shim));

    let script_patcher = context.patch_script_paths.then_some(&patcher);
    let text = inline_scripts(&text, context.base_dir, script_patcher, &mut report);

    Ok((text, report))
}
