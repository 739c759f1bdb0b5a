//! UTF-8 first, Latin-1 second.

use std::borrow::Cow;

use crate::types::TextEncoding;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Decode a byte sample, stripping a UTF-8 BOM.
///
/// A multi-byte sequence cut off at the end of the sample (the sample is a prefix of a
/// larger object) is dropped rather than forcing the Latin-1 fallback. Latin-1 decoding
/// cannot fail, so this always returns text.
pub fn decode_sample(bytes: &[u8]) -> (Cow<'_, str>, TextEncoding) {
    let bytes = strip_bom(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => (Cow::Borrowed(text), TextEncoding::Utf8),
        Err(e) if e.error_len().is_none() => {
            // Only the tail is incomplete; everything before it is valid.
            let valid = &bytes[..e.valid_up_to()];
            let text = std::str::from_utf8(valid).unwrap_or_default();
            (Cow::Borrowed(text), TextEncoding::Utf8)
        }
        Err(_) => (decode_latin1(bytes), TextEncoding::Latin1),
    }
}

/// `bytes` without a leading UTF-8 BOM.
pub fn strip_bom(bytes: &[u8]) -> &[u8] {
    bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes)
}

/// Decode as ISO-8859-1: every byte is the code point of the same value, so 0x80..=0x9F
/// stay C1 control characters.
pub fn decode_latin1(bytes: &[u8]) -> Cow<'_, str> {
    encoding_rs::mem::decode_latin1(bytes)
}

#[cfg(test)]
mod tests {
    use super::{decode_latin1, decode_sample};
    use crate::types::TextEncoding;

    #[test]
    fn decodes_plain_utf8() {
        let (text, enc) = decode_sample("código;preço\n".as_bytes());
        assert_eq!(text, "código;preço\n");
        assert_eq!(enc, TextEncoding::Utf8);
    }

    #[test]
    fn falls_back_to_latin1_on_invalid_utf8() {
        // "preço" in Latin-1: 0xE7 is not valid UTF-8 here.
        let (text, enc) = decode_sample(b"pre\xE7o;qtd\n");
        assert_eq!(text, "preço;qtd\n");
        assert_eq!(enc, TextEncoding::Latin1);
    }

    #[test]
    fn truncated_utf8_tail_stays_utf8() {
        let mut bytes = "a;b\nçã".as_bytes().to_vec();
        bytes.pop();
        let (text, enc) = decode_sample(&bytes);
        assert_eq!(enc, TextEncoding::Utf8);
        assert_eq!(text, "a;b\nç");
    }

    #[test]
    fn strips_bom() {
        let (text, _) = decode_sample(b"\xEF\xBB\xBFid,name\n");
        assert_eq!(text, "id,name\n");
    }

    #[test]
    fn latin1_keeps_c1_range_as_controls() {
        let text = decode_latin1(b"\x80\x93\x9F\xA0\xFF");
        let chars: Vec<char> = text.chars().collect();
        assert_eq!(chars, vec!['\u{80}', '\u{93}', '\u{9F}', '\u{A0}', '\u{FF}']);
        assert!(chars[..3].iter().all(|c| c.is_control()));
    }
}
