//! Reversal of the Cloudflare email-obfuscation scheme.
//!
//! SMILES strings containing `@` trip Cloudflare's email protection, which
//! replaces the fragment with a hex payload in a `data-cfemail` attribute.
//! The first byte of the payload is an XOR key; every following byte is one
//! obfuscated character of the original fragment.

use anyhow::{bail, Context, Result};

/// Decode one `data-cfemail` payload back to its plaintext fragment.
///
/// Malformed payloads (odd length, non-hex digits, missing key byte, or a
/// result that is not valid UTF-8) are hard errors; a garbled fragment must
/// never end up concatenated into a SMILES string.
pub fn decode_cfemail(encoded: &str) -> Result<String> {
    if !encoded.is_ascii() {
        bail!("Obfuscated fragment contains non-ASCII data");
    }
    if encoded.len() < 2 || encoded.len() % 2 != 0 {
        bail!("Obfuscated fragment has invalid length {}", encoded.len());
    }

    let key = u8::from_str_radix(&encoded[..2], 16)
        .with_context(|| format!("Invalid hex key in obfuscated fragment: {:?}", &encoded[..2]))?;

    let mut bytes = Vec::with_capacity(encoded.len() / 2 - 1);
    for offset in (2..encoded.len()).step_by(2) {
        let byte = u8::from_str_radix(&encoded[offset..offset + 2], 16).with_context(|| {
            format!(
                "Invalid hex pair {:?} at offset {} in obfuscated fragment",
                &encoded[offset..offset + 2],
                offset
            )
        })?;
        bytes.push(byte ^ key);
    }

    String::from_utf8(bytes).context("Obfuscated fragment did not decode to valid UTF-8")
}

/// Obfuscate `plain` with `key` the way Cloudflare does. Fixture builder for
/// this module's tests and the extraction tests.
#[cfg(test)]
pub(crate) fn encode_cfemail(plain: &str, key: u8) -> String {
    let mut encoded = format!("{:02x}", key);
    for byte in plain.bytes() {
        encoded.push_str(&format!("{:02x}", byte ^ key));
    }
    encoded
}
