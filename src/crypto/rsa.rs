//! The RSA verifier adapter: the sole boundary through which the rest of
//! this crate touches RSA-PKCS#1-v1_5 verification.
//!
//! The modexp primitive is an external collaborator (see the crate's
//! top-level docs); [`RsaVerifier`] is its contract. `verify_data` and
//! `verify_digest` perform the structural pre-checks the spec requires
//! (signature length matches the algorithm, `data_size` doesn't exceed the
//! buffer) before delegating, so a malformed `data_size` can never reach
//! the external primitive.

use crate::algorithm::Algorithm;
use core::convert::TryFrom;

/// A public key as it appears on the wire: an algorithm index the attacker
/// controls, a claimed size, and the key bytes. [`resolve_public_key`] is
/// the only place this is turned into an [`RsaKeyView`].
pub struct RawPublicKey<'a> {
    pub algorithm: u64,
    pub key_size: u64,
    pub key_data: &'a [u8],
}

/// `PublicKeyToRSA`: validate a wire-supplied algorithm index and key size
/// against the algorithm table before handing the key bytes to the RSA
/// backend. Rejects an out-of-range algorithm index and a key size that
/// disagrees with what that algorithm's processed-key layout requires.
pub fn resolve_public_key<'a>(raw: &RawPublicKey<'a>) -> Option<RsaKeyView<'a>> {
    let algorithm = Algorithm::try_from(raw.algorithm).ok()?;
    if raw.key_size != algorithm.processed_pubkey_len() {
        return None;
    }
    if raw.key_data.len() as u64 != raw.key_size {
        return None;
    }
    Some(RsaKeyView {
        algorithm,
        processed_key: raw.key_data,
    })
}

/// A verified public key: an algorithm plus the raw "processed" key bytes,
/// in the layout the `RsaVerifier` backend expects (see
/// [`crate::rsa_backend`] for the reference backend's convention).
/// Constructing one is the `PublicKeyToRSA` step of the original; it is
/// only ever built after `VbPublicKey`'s algorithm and size have been
/// checked against the algorithm table.
#[derive(Clone, Copy)]
pub struct RsaKeyView<'a> {
    pub algorithm: Algorithm,
    pub processed_key: &'a [u8],
}

/// The external RSA-PKCS#1-v1_5 verification primitive. An embedder
/// supplies an implementation backed by whatever modexp engine the
/// platform has (hardware crypto block, a vetted bignum library, ...);
/// the optional `rsa-backend` feature provides a reference one for host
/// testing over the `rsa`/`sha2`/`sha1` crates.
pub trait RsaVerifier {
    /// SHA-hash `data`, DigestInfo-prefix and PKCS#1-v1_5-pad it, modexp
    /// under `key`, and constant-time-compare against `signature`.
    fn verify_data(&self, key: RsaKeyView<'_>, data: &[u8], signature: &[u8]) -> bool;

    /// As `verify_data`, but the caller has already hashed `data` down to
    /// `digest`.
    fn verify_digest(&self, key: RsaKeyView<'_>, digest: &[u8], signature: &[u8]) -> bool;
}

/// `VerifyData`: validate `sig` against `data[0..sig.data_size]` under `key`.
///
/// `data_size` — not `data.len()` — is what gets hashed; `data.len()` only
/// bounds how much of the caller's buffer the primitive may read.
pub fn verify_data(
    data: &[u8],
    data_size: u64,
    sig_size: u64,
    signature: &[u8],
    key: RsaKeyView<'_>,
    rsa: &dyn RsaVerifier,
) -> bool {
    if sig_size != key.algorithm.sig_len() {
        return false;
    }
    if data_size > data.len() as u64 {
        return false;
    }
    let covered = &data[..data_size as usize];
    rsa.verify_data(key, covered, signature)
}

/// `VerifyDigest`: identical contract, caller supplies the digest directly.
pub fn verify_digest(
    digest: &[u8],
    sig_size: u64,
    signature: &[u8],
    key: RsaKeyView<'_>,
    rsa: &dyn RsaVerifier,
) -> bool {
    if sig_size != key.algorithm.sig_len() {
        return false;
    }
    rsa.verify_digest(key, digest, signature)
}
