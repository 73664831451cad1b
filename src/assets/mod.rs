//! Asset resolution: reading manifest-referenced files, undoing transport compression and
//! recording them as base64 payloads for the runtime shim.

mod decode;
mod mime;
mod resolve;

pub use decode::{Decoded, compressed_suffix, decode_payload};
pub use mime::mime_for;
pub use resolve::resolve_assets;
