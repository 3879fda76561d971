//! Share-link encode/decode
//!
//! Turns note content into a URL fragment small enough for a scannable QR
//! code and reverses it. The wire form is deflate-compressed UTF-8 text,
//! base64url-encoded, tagged with a literal `c:` prefix:
//!
//! ```text
//! <origin>/view#c:<base64url(deflate(markdown))>
//! ```
//!
//! Links produced before compression existed carry no prefix and decode as
//! plain base64url, or as the even older escaped standard-base64 form.

use std::io::{Read, Write};

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine as _;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use serde_json::Value;
use tracing::{debug, warn};

use super::{ShareError, ShareLink};
use crate::blocks;
use crate::convert::blocks_to_markdown;

/// Fragment prefix marking compressed payloads
pub const COMPRESSED_PREFIX: &str = "c:";

/// Path + fragment separator appended to the origin
pub const VIEW_PATH: &str = "/view#";

/// Placeholder text shared for documents whose Markdown renders empty
pub const EMPTY_DOCUMENT_PLACEHOLDER: &str = "[Empty Document]";

/// Title used when the shared text has no leading H1
pub const FALLBACK_TITLE: &str = "Note";

/// Pre-compression estimate: deflate keeps ~60% of text
const ESTIMATED_COMPRESSION_RATIO: f64 = 0.6;
/// Pre-compression estimate: base64url grows the payload ~40%
const ESTIMATED_ENCODING_OVERHEAD: f64 = 1.4;

/// Estimated URLs above this length are rejected before compressing
pub const ESTIMATE_MAX_URL_LEN: usize = 2800;
/// Realized URLs above this length get a scan-difficulty warning
pub const SOFT_MAX_URL_LEN: usize = 2000;
/// Realized URLs above this length are rejected outright
pub const HARD_MAX_URL_LEN: usize = 3000;

/// Compression backend
///
/// The codec takes this as a parameter so runtimes without compression can
/// pass `None` (degrading to plain base64url) and tests can count calls.
pub trait Compressor {
    fn compress(&self, data: &[u8]) -> std::io::Result<Vec<u8>>;
    fn decompress(&self, data: &[u8]) -> std::io::Result<Vec<u8>>;
}

/// Default deflate (zlib) backend
#[derive(Debug, Default, Clone, Copy)]
pub struct Deflate;

impl Compressor for Deflate {
    fn compress(&self, data: &[u8]) -> std::io::Result<Vec<u8>> {
        let mut encoder = ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(data)?;
        encoder.finish()
    }

    fn decompress(&self, data: &[u8]) -> std::io::Result<Vec<u8>> {
        let mut decoder = ZlibDecoder::new(data);
        let mut out = Vec::new();
        decoder.read_to_end(&mut out)?;
        Ok(out)
    }
}

/// How the fragment payload ended up encoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareEncoding {
    /// Deflate + base64url with the `c:` prefix
    Compressed,
    /// Plain base64url, no prefix (compression unavailable)
    Plain,
    /// Standard base64 of the UTF-8 bytes (last-resort fallback)
    Escaped,
}

/// Decoded share-link payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedNote {
    /// The shared Markdown text
    pub text: String,
    /// Display title: the first `# ` line, or a generic fallback
    pub title: String,
}

/// Encode note content as a share link using the default deflate backend
pub fn encode(blocks_json: &str, origin: &str) -> Result<ShareLink, ShareError> {
    encode_with(blocks_json, origin, Some(&Deflate))
}

/// Encode note content as a share link
///
/// The cheap size estimate runs before any compression: content that cannot
/// fit is rejected without invoking the compressor at all. The realized URL
/// is re-checked against the stricter hard ceiling afterwards, since the
/// estimate can undershoot.
pub fn encode_with(
    blocks_json: &str,
    origin: &str,
    compressor: Option<&dyn Compressor>,
) -> Result<ShareLink, ShareError> {
    let parsed: Vec<Value> = serde_json::from_str(blocks_json).unwrap_or_default();
    let markdown = blocks_to_markdown(&parsed);
    let content = if markdown.trim().is_empty() {
        EMPTY_DOCUMENT_PLACEHOLDER.to_string()
    } else {
        markdown
    };

    let estimated_compressed = (content.len() as f64 * ESTIMATED_COMPRESSION_RATIO).ceil() as usize;
    let estimated_encoded =
        (estimated_compressed as f64 * ESTIMATED_ENCODING_OVERHEAD).ceil() as usize;
    let estimated_url = origin.len() + VIEW_PATH.len() + estimated_encoded;
    if estimated_url > ESTIMATE_MAX_URL_LEN {
        return Err(ShareError::TooLarge {
            estimated: estimated_url,
            limit: ESTIMATE_MAX_URL_LEN,
            image_count: blocks::count_images(&parsed),
        });
    }

    let (encoded, encoding) = match compressor {
        Some(compressor) => match compressor.compress(content.as_bytes()) {
            Ok(compressed) => {
                debug!(
                    original = content.len(),
                    compressed = compressed.len(),
                    "compressed share payload"
                );
                (
                    format!("{}{}", COMPRESSED_PREFIX, URL_SAFE_NO_PAD.encode(&compressed)),
                    ShareEncoding::Compressed,
                )
            }
            Err(err) => {
                warn!(%err, "compression failed, falling back to escaped base64");
                (STANDARD.encode(content.as_bytes()), ShareEncoding::Escaped)
            }
        },
        None => (
            URL_SAFE_NO_PAD.encode(content.as_bytes()),
            ShareEncoding::Plain,
        ),
    };

    let url = format!("{}{}{}", origin, VIEW_PATH, encoded);
    if url.len() > HARD_MAX_URL_LEN {
        return Err(ShareError::UrlTooLong {
            actual: url.len(),
            limit: HARD_MAX_URL_LEN,
        });
    }

    let warning = (url.len() > SOFT_MAX_URL_LEN).then(|| {
        format!(
            "share URL is {} characters; the QR code may be hard to scan",
            url.len()
        )
    });

    Ok(ShareLink {
        url,
        encoding,
        content_len: content.len(),
        warning,
    })
}

/// Decode a share-link fragment back to its text
///
/// Handles the compressed `c:` form, plain base64url, and legacy standard
/// base64 with percent-escapes. Every failure collapses into
/// [`ShareError::Decode`]; callers render it as a display state.
pub fn decode(fragment: &str) -> Result<SharedNote, ShareError> {
    let text = if let Some(payload) = fragment.strip_prefix(COMPRESSED_PREFIX) {
        let compressed = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| ShareError::Decode)?;
        let bytes = Deflate
            .decompress(&compressed)
            .map_err(|_| ShareError::Decode)?;
        String::from_utf8(bytes).map_err(|_| ShareError::Decode)?
    } else {
        decode_uncompressed(fragment)?
    };

    Ok(SharedNote {
        title: extract_title(&text),
        text,
    })
}

/// Extract the fragment part of a full share URL, or pass a bare fragment
/// through unchanged
pub fn fragment_of(link: &str) -> &str {
    match link.split_once('#') {
        Some((_, fragment)) => fragment,
        None => link,
    }
}

fn decode_uncompressed(fragment: &str) -> Result<String, ShareError> {
    // Uncompressed fragments predate the `c:` tag; the oldest of them
    // percent-escaped the text before encoding, so every uncompressed
    // payload gets unescaped after decoding.
    if let Ok(bytes) = URL_SAFE_NO_PAD.decode(fragment) {
        if let Ok(text) = String::from_utf8(bytes) {
            return Ok(percent_decode(&text));
        }
    }

    let bytes = STANDARD.decode(fragment).map_err(|_| ShareError::Decode)?;
    let text = String::from_utf8(bytes).map_err(|_| ShareError::Decode)?;
    Ok(percent_decode(&text))
}

/// Title from the first line when it is a Markdown H1
fn extract_title(text: &str) -> String {
    let first_line = text.lines().next().unwrap_or("");
    match first_line.strip_prefix("# ") {
        Some(rest) if !rest.trim().is_empty() => rest.trim().to_string(),
        _ => FALLBACK_TITLE.to_string(),
    }
}

/// Decode %XX escape sequences, leaving malformed ones untouched
fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_digit(bytes[i + 1]), hex_digit(bytes[i + 2])) {
                out.push(hi * 16 + lo);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_digit(byte: u8) -> Option<u8> {
    (byte as char).to_digit(16).map(|d| d as u8)
}
