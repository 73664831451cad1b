//! Helpers for classifying and resolving references found in the HTML shell and manifest.
//!
//! Filtering decides whether a reference can be served from disk at all; local resolution
//! turns a URL-style reference into a filesystem path under a base directory.

mod filters;
mod local;

pub use filters::should_ignore_asset_reference;
pub use local::{file_name_of, resolve_local_reference, strip_query_and_fragment};
