//! Binary encoding helpers
//!
//! Every signed byte layout in the Scalar DL protocol encodes integers as
//! fixed-width big-endian and strings as raw UTF-8, without length prefixes.

/// Encode a u32 as 4 bytes big-endian
#[inline]
pub fn u32_be(n: u32) -> [u8; 4] {
    n.to_be_bytes()
}

/// Encode an i32 as 4 bytes big-endian (two's complement)
#[inline]
pub fn i32_be(n: i32) -> [u8; 4] {
    n.to_be_bytes()
}

/// Hex rendering of a hash or signature, for logs
pub fn short_hex(bytes: &[u8]) -> String {
    let shown = bytes.len().min(8);
    let mut out = hex::encode(&bytes[..shown]);
    if bytes.len() > shown {
        out.push_str("..");
    }
    out
}
