//! `X-Line-Signature` verification.
//!
//! The platform signs each webhook delivery with
//! Base64(HMAC-SHA256(channel secret, raw request body)). Verification runs
//! against the exact bytes on the wire, before any JSON parsing.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::Error;

type HmacSha256 = Hmac<Sha256>;

/// Verify the `X-Line-Signature` header value against the raw body.
///
/// Every failure mode — missing header, bad base64, mismatched digest —
/// collapses into [`Error::BadSignature`]; callers reject with 400.
pub fn verify(
  channel_secret: &str,
  header: Option<&str>,
  body: &[u8],
) -> Result<(), Error> {
  let header = header.ok_or(Error::BadSignature)?;
  let claimed = B64.decode(header).map_err(|_| Error::BadSignature)?;

  let mut mac = HmacSha256::new_from_slice(channel_secret.as_bytes())
    .map_err(|_| Error::BadSignature)?;
  mac.update(body);
  // Constant-time comparison.
  mac.verify_slice(&claimed).map_err(|_| Error::BadSignature)
}

/// Produce the signature value the platform would send for `body`.
#[cfg(test)]
pub(crate) fn sign(channel_secret: &str, body: &[u8]) -> String {
  let mut mac = HmacSha256::new_from_slice(channel_secret.as_bytes())
    .expect("hmac accepts any key length");
  mac.update(body);
  B64.encode(mac.finalize().into_bytes())
}
