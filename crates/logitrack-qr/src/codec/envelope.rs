//! Textual framing of sealed tokens.
//!
//! ```text
//! v1.<base64url-no-pad(nonce)>.<base64url-no-pad(ciphertext+tag)>
//! ```
//!
//! The framed string is then percent-encoded with the unreserved set, which
//! leaves every character above untouched but keeps the contract that any
//! token is a valid query-parameter value as-is.

use std::borrow::Cow;

use base64::engine::general_purpose::URL_SAFE_NO_PAD as BASE64URL;
use base64::Engine as _;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use super::cipher::{Sealed, NONCE_LEN, TAG_LEN};
use super::DecodeStage;

/// Version prefix of the current token format.
pub const TOKEN_VERSION: &str = "v1";

/// Characters left as-is by the percent-encoder (RFC 3986 unreserved).
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Frame a sealed payload as a URL-safe token.
#[must_use]
pub fn frame(sealed: &Sealed) -> String {
    let framed = format!(
        "{TOKEN_VERSION}.{}.{}",
        BASE64URL.encode(sealed.nonce),
        BASE64URL.encode(&sealed.ciphertext)
    );
    utf8_percent_encode(&framed, QUERY_VALUE).to_string()
}

/// Undo [`frame`], checking the version and part lengths.
///
/// # Errors
///
/// Returns the [`DecodeStage`] that rejected the input.
pub fn unframe(token: &str) -> Result<Sealed, DecodeStage> {
    let framed = percent_decode_token(token)?;

    let mut parts = framed.split('.');
    let (Some(version), Some(nonce), Some(ciphertext), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(DecodeStage::Framing);
    };

    if version != TOKEN_VERSION {
        return Err(DecodeStage::Framing);
    }

    let nonce = BASE64URL.decode(nonce).map_err(|_| DecodeStage::Base64)?;
    let ciphertext = BASE64URL.decode(ciphertext).map_err(|_| DecodeStage::Base64)?;

    let nonce =
        <[u8; NONCE_LEN]>::try_from(nonce.as_slice()).map_err(|_| DecodeStage::Framing)?;
    if ciphertext.len() < TAG_LEN {
        return Err(DecodeStage::Framing);
    }

    Ok(Sealed { nonce, ciphertext })
}

/// Percent-decode a token, rejecting malformed escapes and invalid UTF-8.
fn percent_decode_token(token: &str) -> Result<Cow<'_, str>, DecodeStage> {
    if has_malformed_escape(token) {
        return Err(DecodeStage::PercentDecoding);
    }
    percent_decode_str(token)
        .decode_utf8()
        .map_err(|_| DecodeStage::PercentDecoding)
}

/// `%` must be followed by two hex digits.
fn has_malformed_escape(input: &str) -> bool {
    let bytes = input.as_bytes();
    bytes
        .iter()
        .enumerate()
        .filter(|(_, b)| **b == b'%')
        .any(|(i, _)| {
            !matches!(
                (bytes.get(i + 1), bytes.get(i + 2)),
                (Some(hi), Some(lo)) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit()
            )
        })
}
