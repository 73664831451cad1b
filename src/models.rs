//! Data structures produced while packing a Unity WebGL export.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use serde_json::{Map, Value};

/// Manifest keys known to reference downloadable binary assets.
///
/// The first six are the classic loader contract (WebAssembly plus asm.js fallbacks); the
/// remainder are the names newer loaders use for the same files.
pub const ASSET_KEYS: &[&str] = &[
    "dataUrl",
    "wasmCodeUrl",
    "wasmFrameworkUrl",
    "asmCodeUrl",
    "asmMemoryUrl",
    "asmFrameworkUrl",
    "codeUrl",
    "frameworkUrl",
    "memoryUrl",
    "symbolsUrl",
];

/// Parsed loader manifest. Unknown keys are kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Manifest {
    entries: Map<String, Value>,
}

impl Manifest {
    /// Wrap an already parsed JSON object.
    pub fn new(entries: Map<String, Value>) -> Self {
        Self { entries }
    }

    /// String value stored under `key`, if any.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.entries.get(key).and_then(Value::as_str)
    }

    /// Filenames referenced by the known asset keys, de-duplicated in key order.
    pub fn asset_references(&self) -> Vec<(&'static str, &str)> {
        let mut seen = Vec::new();
        let mut references = Vec::new();
        for key in ASSET_KEYS {
            let Some(file) = self.get_str(key) else {
                continue;
            };
            if file.is_empty() || seen.contains(&file) {
                continue;
            }
            seen.push(file);
            references.push((*key, file));
        }
        references
    }

}

/// Codec that produced an asset payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Codec {
    /// Stored uncompressed.
    Raw,
    /// Brotli stream.
    Brotli,
    /// Gzip member.
    Gzip,
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Raw => "raw",
            Self::Brotli => "brotli",
            Self::Gzip => "gzip",
        })
    }
}

/// Embedded representation of one asset referenced by the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetRecord {
    /// MIME type served by the runtime shim.
    pub mime: String,
    /// Base64 of the decoded payload.
    pub base64: String,
    /// Codec the on-disk bytes were stored with.
    #[serde(skip)]
    pub codec: Codec,
    /// Size of the file on disk.
    #[serde(skip)]
    pub source_len: usize,
    /// Size of the payload after decompression.
    #[serde(skip)]
    pub decoded_len: usize,
}

/// Asset records keyed by the filename exactly as the manifest references it.
pub type EmbeddedAssets = BTreeMap<String, AssetRecord>;

/// Recoverable problem encountered while packing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackWarning {
    /// Manifest referenced a file that does not exist.
    MissingAsset {
        /// Filename as written in the manifest.
        file: String,
        /// Path that was probed.
        path: PathBuf,
    },
    /// Asset exists but could not be read.
    UnreadableAsset {
        /// Filename as written in the manifest.
        file: String,
        /// Underlying I/O error message.
        reason: String,
    },
    /// Compressed extension, but neither codec accepted the bytes.
    UndecodableAsset {
        /// Filename as written in the manifest.
        file: String,
    },
    /// Stylesheet link left untouched.
    StylesheetSkipped {
        /// `href` of the link tag.
        href: String,
        /// Why it could not be inlined.
        reason: String,
    },
    /// Script tag left untouched.
    ScriptSkipped {
        /// `src` of the script tag.
        src: String,
        /// Why it could not be inlined.
        reason: String,
    },
}

impl fmt::Display for PackWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingAsset { file, path } => {
                write!(f, "could not embed {file}: {} does not exist", path.display())
            }
            Self::UnreadableAsset { file, reason } => write!(f, "could not read {file}: {reason}"),
            Self::UndecodableAsset { file } => {
                write!(f, "could not decompress {file}, embedding raw bytes")
            }
            Self::StylesheetSkipped { href, reason } => {
                write!(f, "could not inline CSS file {href}: {reason}")
            }
            Self::ScriptSkipped { src, reason } => {
                write!(f, "could not inline JS file {src}: {reason}")
            }
        }
    }
}

/// Warnings collected across all passes of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackReport {
    /// Warnings in the order they were raised.
    pub warnings: Vec<PackWarning>,
}

impl PackReport {
    /// Record a warning and emit it through `tracing`.
    pub fn warn(&mut self, warning: PackWarning) {
        tracing::warn!("{warning}");
        self.warnings.push(warning);
    }

    /// Append the warnings of another report.
    pub fn extend(&mut self, other: PackReport) {
        self.warnings.extend(other.warnings);
    }
}
