//! SHA hashing, used directly by key-block hash mode and by the optional
//! `rsa-backend` reference [`RsaVerifier`][crate::crypto::rsa::RsaVerifier].
//!
//! The hashing primitive itself is an external collaborator per the spec;
//! this module is a thin wrapper over `sha2`/`sha1` so the rest of the
//! crate never names a hash crate directly.

use crate::algorithm::{Algorithm, DigestKind, SHA512_DIGEST_SIZE};
use sha2::{Digest as _, Sha512};

/// SHA-512 digest of `data`, used by key-block hash-mode verification.
pub fn sha512(data: &[u8]) -> [u8; SHA512_DIGEST_SIZE] {
    let mut hasher = Sha512::new();
    hasher.update(data);
    let out = hasher.finalize();
    let mut buf = [0u8; SHA512_DIGEST_SIZE];
    buf.copy_from_slice(&out);
    buf
}

/// Dispatches to the digest algorithm an [`Algorithm`] specifies, returning
/// the digest in a heapless buffer sized to the largest supported digest.
pub fn digest_for(algorithm: Algorithm, data: &[u8]) -> heapless::Vec<u8, 64> {
    let mut out = heapless::Vec::new();
    match algorithm.digest_kind() {
        DigestKind::Sha1 => {
            use sha1::Sha1;
            let mut hasher = Sha1::new();
            hasher.update(data);
            let digest = hasher.finalize();
            out.extend_from_slice(&digest).ok();
        }
        DigestKind::Sha256 => {
            use sha2::Sha256;
            let mut hasher = Sha256::new();
            hasher.update(data);
            let digest = hasher.finalize();
            out.extend_from_slice(&digest).ok();
        }
        DigestKind::Sha512 => {
            let digest = sha512(data);
            out.extend_from_slice(&digest).ok();
        }
    }
    out
}
