//! Compact link codec: gzip then URL-safe base64.
//!
//! The output carries no format tag; the surrounding query-parameter name
//! tells the caller which decoder to apply. The byte substitution (`+`→`-`,
//! `/`→`_`) keeps standard-alphabet payloads from older wallet builds
//! decodable, so this is not the same as the base64 URL_SAFE alphabet with
//! its different padding rules.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use std::io::{Read, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("gzip error: {0}")]
    Gzip(#[from] std::io::Error),

    #[error("base64 error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("decompressed payload is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Compress a string for embedding in a URL query value.
pub fn compress(data: &str) -> Result<String, CodecError> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::new(6));
    encoder.write_all(data.as_bytes())?;
    let gzipped = encoder.finish()?;
    Ok(STANDARD.encode(gzipped).replace('+', "-").replace('/', "_"))
}

/// Invert [`compress`].
pub fn decompress(data: &str) -> Result<String, CodecError> {
    let restored = data.replace('-', "+").replace('_', "/");
    let gzipped = STANDARD.decode(restored)?;
    let mut decoder = GzDecoder::new(gzipped.as_slice());
    let mut out = Vec::new();
    decoder.read_to_end(&mut out)?;
    Ok(String::from_utf8(out)?)
}
