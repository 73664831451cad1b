use std::path::Path;

use crate::asset_paths::file_name_of;

use super::decode::compressed_suffix;

const WASM: &str = "application/wasm";
const JAVASCRIPT: &str = "application/javascript";
const OCTET_STREAM: &str = "application/octet-stream";

/// MIME type served for an asset, judged from its filename.
///
/// `.br`/`.gz` wrappers are looked through. `.unityweb` says nothing about the payload, so
/// the rest of the name is searched for a hint instead.
pub fn mime_for(file: &str) -> &'static str {
    let name = file_name_of(file).to_ascii_lowercase();
    let inner = match compressed_suffix(&name) {
        Some(suffix @ ("br" | "gz")) => &name[..name.len() - suffix.len() - 1],
        _ => name.as_str(),
    };

    let extension = Path::new(inner)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default();

    match extension {
        "wasm" => WASM,
        "js" => JAVASCRIPT,
        "data" | "mem" => OCTET_STREAM,
        "json" => "application/json",
        "css" => "text/css",
        "html" | "htm" => "text/html",
        "unityweb" => sniff_unityweb(inner),
        _ => OCTET_STREAM,
    }
}

/// Guess the payload type of a `.unityweb` file from the rest of its name.
///
/// `framework` is checked before `wasm`, ahead of the wasm-then-js order the hints are
/// usually listed in: classic exports name the JavaScript framework
/// `x.wasm.framework.unityweb`, which would otherwise be labelled as wasm.
fn sniff_unityweb(name: &str) -> &'static str {
    if name.contains("framework") {
        JAVASCRIPT
    } else if name.contains("wasm") {
        WASM
    } else if name.contains("js") {
        JAVASCRIPT
    } else {
        OCTET_STREAM
    }
}

#[cfg(test)]
mod tests {
    use super::mime_for;

    #[test]
    fn maps_plain_extensions() {
        assert_eq!(mime_for("game.wasm"), "application/wasm");
        assert_eq!(mime_for("game.framework.js"), "application/javascript");
        assert_eq!(mime_for("game.data"), "application/octet-stream");
        assert_eq!(mime_for("game.asm.memory.mem"), "application/octet-stream");
        assert_eq!(mime_for("game.json"), "application/json");
        assert_eq!(mime_for("style.css"), "text/css");
        assert_eq!(mime_for("index.HTM"), "text/html");
        assert_eq!(mime_for("symbols.bin"), "application/octet-stream");
        assert_eq!(mime_for("noextension"), "application/octet-stream");
    }

    #[test]
    fn looks_through_br_and_gz_wrappers() {
        assert_eq!(mime_for("Build/game.wasm.br"), "application/wasm");
        assert_eq!(mime_for("Build/game.framework.js.gz"), "application/javascript");
        assert_eq!(mime_for("game.data.br"), "application/octet-stream");
    }

    #[test]
    fn infers_unityweb_payloads_from_name() {
        assert_eq!(mime_for("game.wasm.code.unityweb"), "application/wasm");
        assert_eq!(mime_for("game.wasm.framework.unityweb"), "application/javascript");
        assert_eq!(mime_for("game.asm.code.js.unityweb"), "application/javascript");
        assert_eq!(mime_for("game.data.unityweb"), "application/octet-stream");
    }
}
