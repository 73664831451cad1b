use std::io::Read;

use brotli::enc::StandardAlloc;
use brotli::{BrotliDecompressStream, BrotliResult, BrotliState};
use flate2::read::MultiGzDecoder;

use crate::asset_paths::file_name_of;
use crate::models::Codec;

const BUFFER_SIZE: usize = 4096;
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Transport-compression suffixes that wrap an asset payload.
const COMPRESSED_SUFFIXES: &[&str] = &["unityweb", "br", "gz"];

/// Payload bytes after undoing any transport compression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    /// Bytes to embed.
    pub bytes: Vec<u8>,
    /// Codec that accepted the input.
    pub codec: Codec,
    /// True when a compressed name could not be decoded and the raw bytes were kept.
    pub fell_back: bool,
}

/// Lowercase compression suffix of `file`, if it names a compressed asset.
pub fn compressed_suffix(file: &str) -> Option<&'static str> {
    let name = file_name_of(file);
    let (_, extension) = name.rsplit_once('.')?;
    COMPRESSED_SUFFIXES
        .iter()
        .copied()
        .find(|suffix| extension.eq_ignore_ascii_case(suffix))
}

/// Undo transport compression for an asset named `file`.
///
/// Names without a compressed suffix are returned untouched. Otherwise the gzip magic is
/// sniffed to pick the first codec to try, the other codec is tried next, and the raw bytes
/// are kept when neither accepts the input.
pub fn decode_payload(file: &str, bytes: Vec<u8>) -> Decoded {
    if compressed_suffix(file).is_none() {
        return Decoded {
            bytes,
            codec: Codec::Raw,
            fell_back: false,
        };
    }

    let order = if bytes.starts_with(&GZIP_MAGIC) {
        [Codec::Gzip, Codec::Brotli]
    } else {
        [Codec::Brotli, Codec::Gzip]
    };

    for codec in order {
        let attempt = match codec {
            Codec::Brotli => decompress_brotli(&bytes),
            Codec::Gzip => decompress_gzip(&bytes),
            Codec::Raw => continue,
        };
        match attempt {
            Ok(decoded) => {
                return Decoded {
                    bytes: decoded,
                    codec,
                    fell_back: false,
                };
            }
            Err(err) => {
                tracing::debug!(file, %codec, error = %err, "codec rejected asset");
            }
        }
    }

    Decoded {
        bytes,
        codec: Codec::Raw,
        fell_back: true,
    }
}

fn decompress_brotli(bytes: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut state = BrotliState::new(
        StandardAlloc::default(),
        StandardAlloc::default(),
        StandardAlloc::default(),
    );
    let mut decompressed = Vec::new();
    let mut buffer = [0u8; BUFFER_SIZE];
    let mut available_in = bytes.len();
    let mut input_offset = 0;
    let mut total_out = 0;

    loop {
        let mut available_out = buffer.len();
        let mut output_offset = 0;
        let result = BrotliDecompressStream(
            &mut available_in,
            &mut input_offset,
            bytes,
            &mut available_out,
            &mut output_offset,
            &mut buffer,
            &mut total_out,
            &mut state,
        );
        decompressed.extend_from_slice(&buffer[..output_offset]);

        match result {
            BrotliResult::NeedsMoreOutput => continue,
            // Bytes left after the end of the stream mean the input was not one brotli stream.
            BrotliResult::ResultSuccess if available_in == 0 => return Ok(decompressed),
            BrotliResult::ResultSuccess => {
                return Err(invalid_data("brotli stream ended before the input did"));
            }
            BrotliResult::NeedsMoreInput => return Err(invalid_data("truncated brotli stream")),
            BrotliResult::ResultFailure => return Err(invalid_data("corrupt brotli stream")),
        }
    }
}

fn invalid_data(message: &'static str) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::InvalidData, message)
}

fn decompress_gzip(bytes: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut decompressed = Vec::new();
    let mut reader = MultiGzDecoder::new(bytes);
    reader.read_to_end(&mut decompressed)?;
    Ok(decompressed)
}
