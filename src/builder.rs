//! Packing orchestrator: manifest, assets, HTML rewriting, output.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::assets::resolve_assets;
use crate::bundle::manifest::discover_manifest;
use crate::bundle::site::{SiteContext, patch_site_index};
use crate::models::{EmbeddedAssets, Manifest, PackReport};
use crate::project::PackLayout;

/// Everything produced by one packing run, before it is written to disk.
#[derive(Debug, Clone)]
pub struct PackOutput {
    /// The self-contained HTML page.
    pub html: String,
    /// Manifest file that was embedded.
    pub manifest_path: PathBuf,
    /// Parsed manifest.
    pub manifest: Manifest,
    /// Assets embedded into the runtime shim.
    pub assets: EmbeddedAssets,
    /// Soft failures raised along the way.
    pub report: PackReport,
}

/// High-level helper that packs one Unity WebGL export.
pub struct UnityPacker {
    layout: PackLayout,
}

impl UnityPacker {
    /// Create a packer for the provided layout.
    pub fn new(layout: PackLayout) -> Self {
        Self { layout }
    }

    /// Produce the bundled page in memory.
    ///
    /// Fails only when the manifest or the HTML shell cannot be loaded. Everything else is
    /// recorded in [`PackOutput::report`].
    pub fn pack(&self) -> Result<PackOutput> {
        let layout = &self.layout;
        let build_dir = layout.build_dir_path();

        let (manifest_path, manifest) = discover_manifest(&build_dir, &layout.manifest_extension)
            .context("cannot pack without a loader manifest")?;
        tracing::debug!(path = %manifest_path.display(), "loaded loader manifest");

        let (assets, mut report) = resolve_assets(&manifest, &build_dir);

        if let Some(template_data) = layout.template_data_path() {
            tracing::debug!(path = %template_data.display(), "template data present");
        }

        let html_path = layout.index_html_path();
        let html = fs::read_to_string(&html_path)
            .with_context(|| format!("failed to read {}", html_path.display()))?;

        let base_dir = layout.html_base_dir();
        let build_prefix = layout.build_url_prefix();
        let context = SiteContext {
            base_dir: &base_dir,
            build_prefix: &build_prefix,
            manifest_extension: &layout.manifest_extension,
            patch_script_paths: layout.patch_script_paths,
            manifest: &manifest,
            assets: &assets,
        };
        let (html, site_report) = patch_site_index(&html, &context)?;
        report.extend(site_report);

        Ok(PackOutput {
            html,
            manifest_path,
            manifest,
            assets,
            report,
        })
    }

    /// Write a packed page to the configured output path, creating directories as needed.
    pub fn write(&self, output: &PackOutput) -> Result<PathBuf> {
        let target = self.layout.output_path();
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        fs::write(&target, &output.html)
            .with_context(|| format!("failed to write {}", target.display()))?;
        Ok(target)
    }

    /// Pack and write in one step.
    pub fn run(&self) -> Result<(PathBuf, PackOutput)> {
        let output = self.pack()?;
        let target = self.write(&output)?;
        tracing::info!(
            assets = output.assets.len(),
            warnings = output.report.warnings.len(),
            "Bundled HTML written to {}",
            target.display()
        );
        Ok((target, output))
    }
}
