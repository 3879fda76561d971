//! Share-link codec
//!
//! Compresses document text into a URL fragment bounded for QR transfer and
//! reverses it. See [`codec`] for the wire format and [`qr`] for rendering.
//!
//! The encode path converts the note to Markdown, fast-fails on a cheap
//! size estimate before doing any compression work, then deflates and
//! base64url-encodes the text. Decoding accepts the compressed form and two
//! legacy uncompressed forms. Encode→decode is lossless for the Markdown
//! text; it is a one-way export, not a save format.

mod codec;
mod qr;

use thiserror::Error;

pub use codec::{
    decode, encode, encode_with, fragment_of, Compressor, Deflate, ShareEncoding, SharedNote,
    COMPRESSED_PREFIX, EMPTY_DOCUMENT_PLACEHOLDER, ESTIMATE_MAX_URL_LEN, FALLBACK_TITLE,
    HARD_MAX_URL_LEN, SOFT_MAX_URL_LEN, VIEW_PATH,
};
pub use qr::{render_svg, render_terminal, settings_for, QrSettings};

/// A successfully encoded share link
#[derive(Debug, Clone)]
pub struct ShareLink {
    /// Full URL: `<origin>/view#<payload>`
    pub url: String,
    /// How the payload was encoded
    pub encoding: ShareEncoding,
    /// Length of the shared Markdown text
    pub content_len: usize,
    /// Set when the URL exceeds the soft scannability threshold
    pub warning: Option<String>,
}

/// Errors from the share codec
#[derive(Error, Debug)]
pub enum ShareError {
    /// The cheap pre-check estimated a URL over the limit; no compression
    /// work was done
    #[error(
        "Document too large for a QR code: estimated {estimated} characters (limit {limit})"
    )]
    TooLarge {
        estimated: usize,
        limit: usize,
        /// Embedded images dominate size; counted for the error message
        image_count: usize,
    },

    /// The realized URL exceeded the hard ceiling even after compression
    #[error("Share URL too long: {actual} characters (limit {limit})")]
    UrlTooLong { actual: usize, limit: usize },

    /// The fragment could not be decoded
    #[error("Could not decode share link - the link may be corrupted")]
    Decode,

    /// QR symbol construction failed
    #[error("QR code generation failed: {0}")]
    Qr(String),
}

impl ShareError {
    /// Actionable mitigations to show alongside the error
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            ShareError::TooLarge { image_count, .. } => {
                let mut tips = vec![
                    "Export the document and share the file instead".to_string(),
                    "Reduce the amount of text".to_string(),
                ];
                if *image_count > 0 {
                    tips.push(format!(
                        "Remove the {} embedded image{}",
                        image_count,
                        if *image_count == 1 { "" } else { "s" }
                    ));
                }
                tips
            }
            ShareError::UrlTooLong { .. } => vec![
                "Export the document and share the file instead".to_string(),
                "Reduce the amount of text".to_string(),
            ],
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_too_large_suggestions_mention_images_only_when_present() {
        let with_images = ShareError::TooLarge {
            estimated: 5000,
            limit: 2800,
            image_count: 2,
        };
        assert!(with_images.suggestions().iter().any(|s| s.contains("images")));

        let text_only = ShareError::TooLarge {
            estimated: 5000,
            limit: 2800,
            image_count: 0,
        };
        assert!(!text_only.suggestions().iter().any(|s| s.contains("image")));
    }

    #[test]
    fn test_decode_error_has_no_suggestions() {
        assert!(ShareError::Decode.suggestions().is_empty());
    }
}
