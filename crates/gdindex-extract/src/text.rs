//! Byte-to-text decoding.
//!
//! A byte-order mark selects UTF-8 or UTF-16; without one the bytes must be
//! valid UTF-8. Anything else yields no text and an
//! [`DecodeStatus::Undecodable`] status. The file is still hashed and
//! listed, it just contributes no metadata.

use encoding_rs::{Encoding, UTF_8};

use gdindex_core::DecodeStatus;

/// Decoded file text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    pub text: String,
    pub status: DecodeStatus,
}

impl DecodedText {
    fn new(text: String, status: DecodeStatus) -> Self {
        Self { text, status }
    }
}

/// Decode raw file bytes.
pub fn decode_text(bytes: &[u8]) -> DecodedText {
    if bytes.is_empty() {
        return DecodedText::new(String::new(), DecodeStatus::Empty);
    }

    let (encoding, bom_len) = Encoding::for_bom(bytes).unwrap_or((UTF_8, 0));
    let status = if encoding == UTF_8 {
        DecodeStatus::Utf8
    } else {
        DecodeStatus::Utf16
    };
    match encoding.decode_without_bom_handling_and_without_replacement(&bytes[bom_len..]) {
        Some(text) => DecodedText::new(text.into_owned(), status),
        None => DecodedText::new(String::new(), DecodeStatus::Undecodable),
    }
}
