//! Project configuration loader describing where the Unity export lives and where the bundle goes.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::project::PackLayout;

/// File name searched for in the project root when no explicit config path is given.
pub const DEFAULT_CONFIG_FILE: &str = "unity-pack.config.json";

/// Discoverable project configuration describing the export layout and output paths.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// HTML shell produced by the Unity export.
    pub index_html_file: String,
    /// Directory holding the loader manifest and the binary assets.
    pub build_dir: String,
    /// Optional directory with template styles and images.
    pub template_data_dir: String,
    /// Directory the bundled page is written to.
    pub output_dir: String,
    /// File name of the bundled page inside `output_dir`.
    pub output_file: String,
    /// Extension (without the dot) identifying the loader manifest.
    pub manifest_extension: String,
    /// Apply the `concat` path normalisation to inlined script sources as well.
    pub patch_script_paths: bool,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            index_html_file: "index.html".into(),
            build_dir: "Build".into(),
            template_data_dir: "TemplateData".into(),
            output_dir: "dist".into(),
            output_file: "index.html".into(),
            manifest_extension: "json".into(),
            patch_script_paths: true,
        }
    }
}

impl ProjectConfig {
    /// Attempt to load configuration from the provided project root.
    ///
    /// A missing or malformed configuration file falls back to the defaults, which match the
    /// directory layout of a stock Unity WebGL export.
    pub fn discover(root: &Path) -> Self {
        let candidate = root.join(DEFAULT_CONFIG_FILE);
        Self::from_path(&candidate).unwrap_or_default()
    }

    /// Read configuration from a specific JSON file.
    pub fn from_path(path: &Path) -> Option<Self> {
        let content = fs::read_to_string(path).ok()?;
        match serde_json::from_str(&content) {
            Ok(config) => Some(config),
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "ignoring malformed pack config"
                );
                None
            }
        }
    }

    /// Convert the configuration into a layout anchored at `root`.
    pub fn into_layout(self, root: &Path) -> PackLayout {
        PackLayout {
            root: root.to_path_buf(),
            index_html_file: self.index_html_file,
            build_dir: self.build_dir,
            template_data_dir: self.template_data_dir,
            output_dir: self.output_dir,
            output_file: self.output_file,
            manifest_extension: self.manifest_extension,
            patch_script_paths: self.patch_script_paths,
        }
    }

    /// Borrowing conversion into a layout, cloning the underlying strings.
    pub fn to_layout(&self, root: &Path) -> PackLayout {
        self.clone().into_layout(root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn discovers_defaults_without_config_file() {
        let dir = tempdir().unwrap();
        let config = ProjectConfig::discover(dir.path());
        assert_eq!(config, ProjectConfig::default());
        assert_eq!(config.build_dir, "Build");
        assert_eq!(config.output_dir, "dist");
    }

    #[test]
    fn reads_partial_config_and_keeps_defaults() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(DEFAULT_CONFIG_FILE),
            r#"{"output_dir": "out", "patch_script_paths": false}"#,
        )
        .unwrap();

        let config = ProjectConfig::discover(dir.path());
        assert_eq!(config.output_dir, "out");
        assert!(!config.patch_script_paths);
        assert_eq!(config.index_html_file, "index.html");
    }

    #[test]
    fn malformed_config_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(DEFAULT_CONFIG_FILE), "{ not json").unwrap();
        assert_eq!(ProjectConfig::discover(dir.path()), ProjectConfig::default());
    }
}
