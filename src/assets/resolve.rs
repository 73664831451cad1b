use std::fs;
use std::path::Path;

use base64::{Engine as _, engine::general_purpose};

use crate::asset_paths::{resolve_local_reference, should_ignore_asset_reference};
use crate::models::{AssetRecord, EmbeddedAssets, Manifest, PackReport, PackWarning};

use super::decode::decode_payload;
use super::mime::mime_for;

/// Embed every file the manifest's asset keys reference from `build_dir`.
///
/// Nothing here is fatal: a missing, unreadable or undecodable file is reported and either
/// omitted or embedded raw, leaving the runtime shim to fall through to the network.
pub fn resolve_assets(manifest: &Manifest, build_dir: &Path) -> (EmbeddedAssets, PackReport) {
    let mut assets = EmbeddedAssets::new();
    let mut report = PackReport::default();

    for (key, file) in manifest.asset_references() {
        if should_ignore_asset_reference(file) {
            tracing::debug!(key, file, "leaving remote asset to the network");
            continue;
        }

        let Some(path) = resolve_local_reference(build_dir, file) else {
            report.warn(PackWarning::MissingAsset {
                file: file.to_string(),
                path: build_dir.join(file),
            });
            continue;
        };

        if !path.is_file() {
            report.warn(PackWarning::MissingAsset {
                file: file.to_string(),
                path,
            });
            continue;
        }

        let raw = match fs::read(&path) {
            Ok(raw) => raw,
            Err(err) => {
                report.warn(PackWarning::UnreadableAsset {
                    file: file.to_string(),
                    reason: err.to_string(),
                });
                continue;
            }
        };

        let source_len = raw.len();
        let decoded = decode_payload(file, raw);
        if decoded.fell_back {
            report.warn(PackWarning::UndecodableAsset {
                file: file.to_string(),
            });
        }

        let mime = mime_for(file);
        tracing::debug!(
            key,
            file,
            mime,
            codec = %decoded.codec,
            source_len,
            decoded_len = decoded.bytes.len(),
            "embedded asset"
        );

        assets.insert(file.to_string(), AssetRecord {
            mime: mime.to_string(),
            base64: general_purpose::STANDARD.encode(&decoded.bytes),
            codec: decoded.codec,
            source_len,
            decoded_len: decoded.bytes.len(),
        });
    }

    (assets, report)
}
