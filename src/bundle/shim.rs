//! Runtime shim that serves the loader manifest and embedded assets from memory.

use std::collections::BTreeMap;

use anyhow::{Context, Result};

use crate::asset_paths::file_name_of;
use crate::models::{AssetRecord, EmbeddedAssets, Manifest};

use super::js_patch::escape_embedded_json;
use super::tags::script_open_pattern;

const CONFIG_TOKEN: &str = "__UNITY_PACK_CONFIG__";
const ASSETS_TOKEN: &str = "__UNITY_PACK_ASSETS__";
const SUFFIX_TOKEN: &str = "__UNITY_PACK_MANIFEST_SUFFIX__";

const RUNTIME_SHIM_TEMPLATE: &str = r##"(function () {
  var packedConfig = __UNITY_PACK_CONFIG__;
  var packedAssets = __UNITY_PACK_ASSETS__;
  var manifestSuffix = __UNITY_PACK_MANIFEST_SUFFIX__;
  var hasOwn = Object.prototype.hasOwnProperty;
  var nativeFetch = typeof window.fetch === "function" ? window.fetch.bind(window) : null;

  function decodeBase64(encoded) {
    var binary = atob(encoded);
    var length = binary.length;
    var bytes = new Uint8Array(length);
    for (var i = 0; i < length; i++) {
      bytes[i] = binary.charCodeAt(i);
    }
    return bytes;
  }

  function requestUrl(input) {
    if (typeof input === "string") {
      return input;
    }
    if (input && typeof input.url === "string") {
      return input.url;
    }
    return String(input);
  }

  function stripQuery(url) {
    return url.split("#")[0].split("?")[0];
  }

  function fileName(url) {
    var segments = stripQuery(url).split("/");
    return segments[segments.length - 1];
  }

  function embeddedResponse(body, mime) {
    return Promise.resolve(new Response(body, {
      status: 200,
      headers: { "Content-Type": mime }
    }));
  }

  window.fetch = function (input, init) {
    var url = requestUrl(input);
    var path = stripQuery(url).toLowerCase();
    if (path.slice(-manifestSuffix.length) === manifestSuffix) {
      return embeddedResponse(JSON.stringify(packedConfig), "application/json");
    }
    var name = fileName(url);
    if (hasOwn.call(packedAssets, name)) {
      var asset = packedAssets[name];
      return embeddedResponse(decodeBase64(asset.base64), asset.mime);
    }
    if (!nativeFetch) {
      return Promise.reject(new TypeError("fetch is not available for " + url));
    }
    return nativeFetch(input, init);
  };

  if (typeof WebAssembly === "object" && WebAssembly !== null) {
    var nativeInstantiateStreaming = typeof WebAssembly.instantiateStreaming === "function"
      ? WebAssembly.instantiateStreaming.bind(WebAssembly)
      : null;

    WebAssembly.instantiateStreaming = function (source, importObject) {
      var isUrl = typeof source === "string" ||
        (typeof URL === "function" && source instanceof URL);
      var buffered = Promise.resolve(isUrl ? window.fetch(String(source)) : source)
        .then(function (response) { return response.arrayBuffer(); })
        .then(function (buffer) { return WebAssembly.instantiate(buffer, importObject); });
      if (!nativeInstantiateStreaming) {
        return buffered;
      }
      return buffered.catch(function (error) {
        return nativeInstantiateStreaming(source, importObject).catch(function () {
          throw error;
        });
      });
    };
  }
})();"##;

/// Render the shim as JavaScript source.
///
/// Assets are keyed by their final path segment, which is what the fetch override compares
/// request URLs against. When two manifest entries share a file name the first one in key
/// order is served.
pub fn render_runtime_shim(
    manifest: &Manifest,
    assets: &EmbeddedAssets,
    manifest_extension: &str,
) -> Result<String> {
    let mut by_file_name: BTreeMap<&str, &AssetRecord> = BTreeMap::new();
    for (file, record) in assets {
        by_file_name.entry(file_name_of(file)).or_insert(record);
    }

    let config_json =
        serde_json::to_string(manifest).context("failed to serialise loader manifest")?;
    let assets_json =
        serde_json::to_string(&by_file_name).context("failed to serialise embedded assets")?;
    let suffix = format!(".{}", manifest_extension.trim_start_matches('.')).to_ascii_lowercase();
    let suffix_json =
        serde_json::to_string(&suffix).context("failed to serialise manifest suffix")?;

    // The manifest goes in last: it is the only user-controlled text that could spell a token.
    Ok(
        RUNTIME_SHIM_TEMPLATE
            .replace(SUFFIX_TOKEN, &escape_embedded_json(&suffix_json))
            .replace(ASSETS_TOKEN, &escape_embedded_json(&assets_json))
            .replace(CONFIG_TOKEN, &escape_embedded_json(&config_json)),
    )
}

/// Wrap shim source in the script block inserted into the page.
pub fn shim_script_block(shim: &str) -> String {
    format!("<script>\n{shim}\n</script>\n")
}

/// Insert `block` so it runs before any other script.
///
/// The block goes before the first `<script`, else before `</head>`, else before `</body>`,
/// else at the end of the document.
pub fn insert_runtime_shim(html: &str, block: &str) -> String {
    let position = script_open_pattern()
        .find(html)
        .map(|m| m.start())
        .or_else(|| find_ignore_case(html, "</head"))
        .or_else(|| find_ignore_case(html, "</body"))
        .unwrap_or(html.len());

    let mut output = String::with_capacity(html.len() + block.len());
    output.push_str(&html[..position]);
    output.push_str(block);
    output.push_str(&html[position..]);
    output
}

fn find_ignore_case(haystack: &str, needle: &str) -> Option<usize> {
    haystack.to_ascii_lowercase().find(needle)
}
