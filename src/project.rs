//! Resolved filesystem layout of a Unity WebGL export.

use std::path::{Path, PathBuf};

/// Paths describing one packing run, anchored at the project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackLayout {
    /// Directory the relative paths below are resolved against.
    pub root: PathBuf,
    /// HTML shell file name, relative to `root`.
    pub index_html_file: String,
    /// Build directory name, relative to `root`.
    pub build_dir: String,
    /// Template data directory name, relative to `root`.
    pub template_data_dir: String,
    /// Output directory, relative to `root`.
    pub output_dir: String,
    /// Output file name inside `output_dir`.
    pub output_file: String,
    /// Manifest extension without the leading dot.
    pub manifest_extension: String,
    /// Normalise `concat` paths inside inlined scripts.
    pub patch_script_paths: bool,
}

impl PackLayout {
    /// Path of the HTML shell.
    pub fn index_html_path(&self) -> PathBuf {
        self.root.join(&self.index_html_file)
    }

    /// Directory holding the manifest and its assets.
    pub fn build_dir_path(&self) -> PathBuf {
        self.root.join(&self.build_dir)
    }

    /// Directory with template styles and images, when the export ships one.
    pub fn template_data_path(&self) -> Option<PathBuf> {
        let path = self.root.join(&self.template_data_dir);
        path.is_dir().then_some(path)
    }

    /// Directory the bundled page is written into.
    pub fn output_dir_path(&self) -> PathBuf {
        self.root.join(&self.output_dir)
    }

    /// Full path of the bundled page.
    pub fn output_path(&self) -> PathBuf {
        self.output_dir_path().join(&self.output_file)
    }

    /// Directory that relative `src`/`href` references in the HTML shell resolve against.
    pub fn html_base_dir(&self) -> PathBuf {
        self
            .index_html_path()
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.root.clone())
    }

    /// Build directory name as it appears in URLs, without surrounding slashes.
    pub fn build_url_prefix(&self) -> String {
        self.build_dir.replace('\\', "/").trim_matches('/').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProjectConfig;

    #[test]
    fn resolves_default_paths_against_root() {
        let layout = ProjectConfig::default().into_layout(Path::new("/export"));
        assert_eq!(layout.index_html_path(), PathBuf::from("/export/index.html"));
        assert_eq!(layout.build_dir_path(), PathBuf::from("/export/Build"));
        assert_eq!(layout.output_path(), PathBuf::from("/export/dist/index.html"));
        assert_eq!(layout.html_base_dir(), PathBuf::from("/export"));
    }

    #[test]
    fn html_base_dir_follows_nested_shell() {
        let mut config = ProjectConfig::default();
        config.index_html_file = "web/index.html".into();
        let layout = config.into_layout(Path::new("/export"));
        assert_eq!(layout.html_base_dir(), PathBuf::from("/export/web"));
    }

    #[test]
    fn build_url_prefix_trims_slashes() {
        let mut config = ProjectConfig::default();
        config.build_dir = "/Build/".into();
        let layout = config.into_layout(Path::new("."));
        assert_eq!(layout.build_url_prefix(), "Build");
    }
}
