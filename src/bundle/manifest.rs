//! Locating and loading the Unity loader manifest from the build directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::models::Manifest;

/// Errors that abort a packing run because no manifest could be loaded.
#[derive(Debug)]
pub enum ManifestError {
    /// The build directory holds no file with the manifest extension.
    NotFound {
        /// Directory that was searched.
        dir: PathBuf,
        /// Extension that was looked for.
        extension: String,
    },
    /// The build directory or manifest file could not be read.
    Io {
        /// Path that caused the error.
        path: PathBuf,
        /// Source I/O error.
        source: std::io::Error,
    },
    /// The manifest is not a JSON object.
    Parse {
        /// Path that caused the error.
        path: PathBuf,
        /// Source parse error, absent when the JSON was valid but not an object.
        source: Option<serde_json::Error>,
    },
}

impl std::fmt::Display for ManifestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { dir, extension } => {
                write!(f, "no .{} manifest found in {}", extension, dir.display())
            }
            Self::Io { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
            Self::Parse {
                path,
                source: Some(source),
            } => write!(f, "failed to parse {}: {}", path.display(), source),
            Self::Parse { path, source: None } => {
                write!(f, "manifest {} is not a JSON object", path.display())
            }
        }
    }
}

impl std::error::Error for ManifestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NotFound { .. } => None,
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => source
                .as_ref()
                .map(|err| err as &(dyn std::error::Error + 'static)),
        }
    }
}

/// Find the manifest inside `build_dir`.
///
/// Candidates are sorted by file name so the same tree always yields the same manifest.
pub fn find_manifest(build_dir: &Path, extension: &str) -> Result<PathBuf, ManifestError> {
    let entries = fs::read_dir(build_dir).map_err(|source| match source.kind() {
        std::io::ErrorKind::NotFound => ManifestError::NotFound {
            dir: build_dir.to_path_buf(),
            extension: extension.to_string(),
        },
        _ => ManifestError::Io {
            path: build_dir.to_path_buf(),
            source,
        },
    })?;

    let suffix = format!(".{}", extension.trim_start_matches('.'));
    let mut matches: Vec<PathBuf> = entries
        .flatten()
        .filter(|entry| entry.file_type().is_ok_and(|ft| ft.is_file()))
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.ends_with(&suffix))
        })
        .map(|entry| entry.path())
        .collect();

    matches.sort();
    matches
        .into_iter()
        .next()
        .ok_or_else(|| ManifestError::NotFound {
            dir: build_dir.to_path_buf(),
            extension: extension.to_string(),
        })
}

/// Load a manifest from disk. No keys are required to be present.
pub fn load_manifest(path: &Path) -> Result<Manifest, ManifestError> {
    let content = fs::read_to_string(path).map_err(|source| ManifestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let value: Value = serde_json::from_str(&content).map_err(|source| ManifestError::Parse {
        path: path.to_path_buf(),
        source: Some(source),
    })?;

    match value {
        Value::Object(entries) => Ok(Manifest::new(entries)),
        _ => Err(ManifestError::Parse {
            path: path.to_path_buf(),
            source: None,
        }),
    }
}

/// Locate and load the manifest in one step.
pub fn discover_manifest(
    build_dir: &Path,
    extension: &str,
) -> Result<(PathBuf, Manifest), ManifestError> {
    let path = find_manifest(build_dir, extension)?;
    let manifest = load_manifest(&path)?;
    Ok((path, manifest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn picks_first_json_file_by_name() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("game.wasm"), [0u8]).unwrap();
        fs::write(dir.path().join("zeta.json"), "{}").unwrap();
        fs::write(dir.path().join("alpha.json"), "{}").unwrap();

        let path = find_manifest(dir.path(), "json").unwrap();
        assert_eq!(path, dir.path().join("alpha.json"));
    }

    #[test]
    fn missing_manifest_is_not_found() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("game.data"), [0u8]).unwrap();

        let err = find_manifest(dir.path(), "json").unwrap_err();
        assert!(matches!(err, ManifestError::NotFound { .. }));
        assert!(err.to_string().contains("no .json manifest"));
    }

    #[test]
    fn missing_build_dir_is_not_found() {
        let dir = tempdir().unwrap();
        let err = find_manifest(&dir.path().join("Build"), "json").unwrap_err();
        assert!(matches!(err, ManifestError::NotFound { .. }));
    }

    #[test]
    fn loads_manifest_without_required_keys() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("game.json");
        fs::write(&path, r#"{"companyName": "Acme"}"#).unwrap();

        let manifest = load_manifest(&path).unwrap();
        assert_eq!(manifest.get_str("companyName"), Some("Acme"));
        assert!(manifest.asset_references().is_empty());
    }

    #[test]
    fn rejects_non_object_manifest() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("game.json");
        fs::write(&path, "[1, 2]").unwrap();

        let err = load_manifest(&path).unwrap_err();
        assert!(matches!(err, ManifestError::Parse { source: None, .. }));
    }
}
