//! Reference [`RsaVerifier`] backed by the `rsa` crate, for host testing
//! and non-firmware embedders. Not part of the verifier's trusted core —
//! see the crate's top-level docs on the RSA modexp boundary.
//!
//! `processed_key` bytes are a fixed layout: an 8-byte reserved header
//! (unused by this backend) followed by the modulus in big-endian order,
//! `algorithm.modulus_bytes()` long, followed in turn by a same-length
//! block of Montgomery `R^2 mod n` limbs. This backend does its own modexp
//! via `rsa`'s bignum arithmetic rather than Montgomery multiplication, so
//! it reads only the modulus and ignores the trailing limbs. The public
//! exponent is always F4 (65537), matching the convention the key blocks
//! this crate verifies are generated under.

use crate::crypto::rsa::{RsaKeyView, RsaVerifier};
use rsa::pkcs1v15::Pkcs1v15Sign;
use rsa::{BigUint, RsaPublicKey};
use sha1::Sha1;
use sha2::{Sha256, Sha512};

use crate::algorithm::DigestKind;

const RESERVED_HEADER_LEN: usize = 8;
const PUBLIC_EXPONENT: u32 = 65537;

fn build_public_key(view: RsaKeyView<'_>) -> Option<RsaPublicKey> {
    let modulus_bytes = view.algorithm.modulus_bytes() as usize;
    let modulus_start = RESERVED_HEADER_LEN;
    let modulus_end = modulus_start.checked_add(modulus_bytes)?;
    let modulus = view.processed_key.get(modulus_start..modulus_end)?;
    let n = BigUint::from_bytes_be(modulus);
    let e = BigUint::from(PUBLIC_EXPONENT);
    RsaPublicKey::new(n, e).ok()
}

fn verify_digest_with_scheme(pub_key: &RsaPublicKey, kind: DigestKind, digest: &[u8], signature: &[u8]) -> bool {
    match kind {
        DigestKind::Sha1 => pub_key
            .verify(Pkcs1v15Sign::new::<Sha1>(), digest, signature)
            .is_ok(),
        DigestKind::Sha256 => pub_key
            .verify(Pkcs1v15Sign::new::<Sha256>(), digest, signature)
            .is_ok(),
        DigestKind::Sha512 => pub_key
            .verify(Pkcs1v15Sign::new::<Sha512>(), digest, signature)
            .is_ok(),
    }
}

/// Reference backend over `rsa`/`sha2`/`sha1`. Stateless; construct one per
/// call or keep a single `const` instance around, it carries no data of
/// its own.
#[derive(Debug, Clone, Copy, Default)]
pub struct RustCryptoRsaVerifier;

impl RsaVerifier for RustCryptoRsaVerifier {
    fn verify_data(&self, key: RsaKeyView<'_>, data: &[u8], signature: &[u8]) -> bool {
        let digest = crate::crypto::digest::digest_for(key.algorithm, data);
        self.verify_digest(key, &digest, signature)
    }

    fn verify_digest(&self, key: RsaKeyView<'_>, digest: &[u8], signature: &[u8]) -> bool {
        let Some(pub_key) = build_public_key(key) else {
            return false;
        };
        verify_digest_with_scheme(&pub_key, key.algorithm.digest_kind(), digest, signature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::Algorithm;
    use rand::rngs::OsRng;
    use rsa::traits::PublicKeyParts;
    use rsa::RsaPrivateKey;

    /// Builds a `processed_key` buffer: reserved header, big-endian modulus,
    /// and a trailing zeroed block the size of the (unused by this backend)
    /// Montgomery limbs, matching `Algorithm::processed_pubkey_len`.
    fn processed_key_for(pub_key: &RsaPublicKey, modulus_bytes: usize) -> std::vec::Vec<u8> {
        let mut out = std::vec::Vec::with_capacity(RESERVED_HEADER_LEN + 2 * modulus_bytes);
        out.extend_from_slice(&[0u8; RESERVED_HEADER_LEN]);
        let n_bytes = pub_key.n().to_bytes_be();
        let mut padded = std::vec::Vec::with_capacity(modulus_bytes);
        padded.resize(modulus_bytes - n_bytes.len(), 0);
        padded.extend_from_slice(&n_bytes);
        out.extend_from_slice(&padded);
        out.extend_from_slice(&vec![0u8; modulus_bytes]);
        out
    }

    #[test]
    fn verifies_a_real_rsa2048_sha256_signature() {
        let mut rng = OsRng;
        let priv_key = RsaPrivateKey::new(&mut rng, 2048).expect("key generation");
        let pub_key = RsaPublicKey::from(&priv_key);

        let message = b"verified boot preamble contents";
        let digest = crate::crypto::digest::digest_for(Algorithm::Rsa2048Sha256, message);
        let signature = priv_key
            .sign(Pkcs1v15Sign::new::<Sha256>(), &digest)
            .expect("signing");

        let processed_key = processed_key_for(&pub_key, 256);
        let view = RsaKeyView {
            algorithm: Algorithm::Rsa2048Sha256,
            processed_key: &processed_key,
        };

        let backend = RustCryptoRsaVerifier;
        assert!(backend.verify_data(view, message, &signature));
    }

    #[test]
    fn rejects_tampered_message() {
        let mut rng = OsRng;
        let priv_key = RsaPrivateKey::new(&mut rng, 2048).expect("key generation");
        let pub_key = RsaPublicKey::from(&priv_key);

        let message = b"verified boot preamble contents";
        let digest = crate::crypto::digest::digest_for(Algorithm::Rsa2048Sha256, message);
        let signature = priv_key
            .sign(Pkcs1v15Sign::new::<Sha256>(), &digest)
            .expect("signing");

        let processed_key = processed_key_for(&pub_key, 256);
        let view = RsaKeyView {
            algorithm: Algorithm::Rsa2048Sha256,
            processed_key: &processed_key,
        };

        let backend = RustCryptoRsaVerifier;
        assert!(!backend.verify_data(view, b"tampered contents!!!!!!!!!!!!!!!", &signature));
    }
}
