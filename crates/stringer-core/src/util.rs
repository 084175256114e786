use std::fmt::Write as _;

use sha2::{Digest, Sha256};

/// Lowercase hex digest recorded in generated headers.
pub fn sha256_hex(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .fold(String::with_capacity(64), |mut hex, b| {
            let _ = write!(hex, "{b:02x}");
            hex
        })
}
