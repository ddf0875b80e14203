//! Key-block verification: `KeyBlockVerify` from the original firmware,
//! rebuilt over the checked `(buffer, base, len)` model in [`crate::bounds`].
//!
//! A key block carries a data key (the one the firmware or kernel preamble
//! is actually signed with) authenticated one of two ways: against an
//! externally supplied root-of-trust key (signature mode), or by its own
//! embedded SHA-512 checksum (hash mode, used when no root key is
//! provisioned yet). Exactly one of those two paths runs per call.

use crate::algorithm::SHA512_DIGEST_SIZE;
use crate::bounds::{member_inside, subslice};
use crate::config::VerifierConfig;
use crate::crypto::ctcmp::ct_eq;
use crate::crypto::digest::sha512;
use crate::crypto::rsa::{self, RawPublicKey, RsaKeyView, RsaVerifier};
use crate::error::VbootError;
use crate::log::logger::{log_info, log_warn};
use crate::structs::{VbKeyBlockHeaderRaw, VbPublicKeyRaw, VbSignatureRaw, KEY_BLOCK_HEADER_VERSION_MAJOR, KEY_BLOCK_MAGIC};

const LOG_CATEGORY: &str = "keyblock";

/// The data key a key block authenticates, resolved to something the RSA
/// backend can use directly, plus its declared rollback version.
pub struct VerifiedDataKey<'a> {
    pub key_version: u64,
    pub rsa_key: RsaKeyView<'a>,
}

fn signature_inside(parent_size: u64, member_base: u64, sig: &VbSignatureRaw) -> bool {
    member_inside(
        0,
        parent_size,
        member_base,
        VbSignatureRaw::SIZE,
        sig.sig_offset(),
        sig.sig_size(),
    )
}

fn public_key_inside(parent_size: u64, member_base: u64, key: &VbPublicKeyRaw) -> bool {
    member_inside(
        0,
        parent_size,
        member_base,
        VbPublicKeyRaw::SIZE,
        key.key_offset(),
        key.key_size(),
    )
}

fn signature_bytes<'a>(buf: &'a [u8], member_base: u64, sig: &VbSignatureRaw) -> Option<&'a [u8]> {
    subslice(buf, 0, member_base + sig.sig_offset(), sig.sig_size())
}

fn public_key_bytes<'a>(buf: &'a [u8], member_base: u64, key: &VbPublicKeyRaw) -> Option<&'a [u8]> {
    subslice(buf, 0, member_base + key.key_offset(), key.key_size())
}

/// `KeyBlockVerify`. `root_key` is the externally supplied trust root; when
/// `None`, the key block is accepted on its own embedded checksum instead
/// (hash mode), matching the original's `key == NULL` branch.
pub fn verify_key_block<'a>(
    buf: &'a [u8],
    size: u64,
    root_key: Option<RsaKeyView<'_>>,
    rsa_backend: &dyn RsaVerifier,
    cfg: &VerifierConfig,
) -> Result<VerifiedDataKey<'a>, VbootError> {
    crate::log::logger::set_log_level(cfg.log_level as usize);

    let block = VbKeyBlockHeaderRaw::parse(buf).ok_or(VbootError::KeyBlockInvalid)?;

    if !ct_eq(&block.magic, &KEY_BLOCK_MAGIC) {
        log_warn(LOG_CATEGORY, "not a valid verified boot key block");
        return Err(VbootError::KeyBlockInvalid);
    }
    if block.header_version_major() != KEY_BLOCK_HEADER_VERSION_MAJOR {
        log_warn(LOG_CATEGORY, "incompatible key block header version");
        return Err(VbootError::KeyBlockInvalid);
    }
    let key_block_size = block.key_block_size();
    if size < key_block_size {
        log_warn(LOG_CATEGORY, "not enough data for key block");
        return Err(VbootError::KeyBlockInvalid);
    }

    let data_size = if let Some(root_key) = root_key {
        let sig = &block.key_block_signature;

        if !signature_inside(key_block_size, VbKeyBlockHeaderRaw::SIGNATURE_OFFSET, sig) {
            log_warn(LOG_CATEGORY, "key block signature off end of block");
            return Err(VbootError::KeyBlockInvalid);
        }
        if key_block_size < sig.data_size() {
            log_warn(LOG_CATEGORY, "signature calculated past end of the block");
            return Err(VbootError::KeyBlockInvalid);
        }

        let sig_bytes = signature_bytes(buf, VbKeyBlockHeaderRaw::SIGNATURE_OFFSET, sig)
            .ok_or(VbootError::KeyBlockInvalid)?;

        if !rsa::verify_data(buf, sig.data_size(), sig.sig_size(), sig_bytes, root_key, rsa_backend) {
            log_warn(LOG_CATEGORY, "key block signature check failed");
            return Err(VbootError::KeyBlockSignature);
        }

        sig.data_size()
    } else {
        let sig = &block.key_block_checksum;

        if !signature_inside(key_block_size, VbKeyBlockHeaderRaw::CHECKSUM_OFFSET, sig) {
            log_warn(LOG_CATEGORY, "key block hash off end of block");
            return Err(VbootError::KeyBlockInvalid);
        }
        if sig.sig_size() != SHA512_DIGEST_SIZE as u64 {
            log_warn(LOG_CATEGORY, "wrong hash size for key block");
            return Err(VbootError::KeyBlockInvalid);
        }
        if key_block_size < sig.data_size() {
            log_warn(LOG_CATEGORY, "checksum calculated past end of the block");
            return Err(VbootError::KeyBlockInvalid);
        }

        let checksum_bytes = signature_bytes(buf, VbKeyBlockHeaderRaw::CHECKSUM_OFFSET, sig)
            .ok_or(VbootError::KeyBlockInvalid)?;
        let covered = subslice(buf, 0, 0, sig.data_size()).ok_or(VbootError::KeyBlockInvalid)?;
        let computed = sha512(covered);

        if !ct_eq(&computed, checksum_bytes) {
            log_warn(LOG_CATEGORY, "invalid key block hash");
            return Err(VbootError::KeyBlockHash);
        }

        sig.data_size()
    };

    if data_size < VbKeyBlockHeaderRaw::SIZE {
        log_warn(LOG_CATEGORY, "didn't sign enough data");
        return Err(VbootError::KeyBlockInvalid);
    }

    if !public_key_inside(key_block_size, VbKeyBlockHeaderRaw::DATA_KEY_OFFSET, &block.data_key) {
        log_warn(LOG_CATEGORY, "data key off end of key block");
        return Err(VbootError::KeyBlockInvalid);
    }
    if !public_key_inside(data_size, VbKeyBlockHeaderRaw::DATA_KEY_OFFSET, &block.data_key) {
        log_warn(LOG_CATEGORY, "data key off end of signed data");
        return Err(VbootError::KeyBlockInvalid);
    }

    let data_key = &block.data_key;
    let key_bytes = public_key_bytes(buf, VbKeyBlockHeaderRaw::DATA_KEY_OFFSET, data_key)
        .ok_or(VbootError::KeyBlockInvalid)?;

    let raw = RawPublicKey {
        algorithm: data_key.algorithm(),
        key_size: data_key.key_size(),
        key_data: key_bytes,
    };
    let rsa_key = rsa::resolve_public_key(&raw).ok_or_else(|| {
        log_warn(LOG_CATEGORY, "data key has an invalid algorithm or size");
        VbootError::PublicKeyInvalid
    })?;

    if let Some(floor) = cfg.min_rsa_modulus_bits {
        if rsa_key.algorithm.modulus_bits() < floor {
            log_warn(LOG_CATEGORY, "data key modulus narrower than policy floor");
            return Err(VbootError::PublicKeyInvalid);
        }
    }

    log_info(LOG_CATEGORY, "key block verified");
    Ok(VerifiedDataKey {
        key_version: data_key.key_version(),
        rsa_key,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::vec::Vec;
    use zerocopy::byteorder::{LittleEndian, U64};
    use zerocopy::AsBytes;

    struct AlwaysOk;
    impl RsaVerifier for AlwaysOk {
        fn verify_data(&self, _key: RsaKeyView<'_>, _data: &[u8], _sig: &[u8]) -> bool {
            true
        }
        fn verify_digest(&self, _key: RsaKeyView<'_>, _digest: &[u8], _sig: &[u8]) -> bool {
            true
        }
    }

    struct AlwaysFail;
    impl RsaVerifier for AlwaysFail {
        fn verify_data(&self, _key: RsaKeyView<'_>, _data: &[u8], _sig: &[u8]) -> bool {
            false
        }
        fn verify_digest(&self, _key: RsaKeyView<'_>, _digest: &[u8], _sig: &[u8]) -> bool {
            false
        }
    }

    fn u64le(v: u64) -> U64<LittleEndian> {
        U64::new(v)
    }

    /// Builds a minimal, self-consistent key block in hash mode: magic,
    /// versions, a checksum covering the header, and a data key whose bytes
    /// trail the header.
    fn build_hash_mode_block(algorithm: u64, key_body: &[u8]) -> Vec<u8> {
        build_hash_mode_block_with_minor(algorithm, 0, key_body)
    }

    fn build_hash_mode_block_with_minor(algorithm: u64, minor: u64, key_body: &[u8]) -> Vec<u8> {
        let header_size = VbKeyBlockHeaderRaw::SIZE as usize;
        let key_block_size = header_size + key_body.len();

        let data_key = VbPublicKeyRaw {
            key_offset: u64le(VbPublicKeyRaw::SIZE),
            key_size: u64le(key_body.len() as u64),
            algorithm: u64le(algorithm),
            key_version: u64le(1),
        };

        // checksum sig_offset points past the key block entirely (hash mode
        // has no signature data stored there beyond the digest itself); the
        // digest is appended right after the key body.
        let checksum_sig = VbSignatureRaw {
            sig_offset: u64le((key_block_size - VbKeyBlockHeaderRaw::CHECKSUM_OFFSET as usize) as u64),
            sig_size: u64le(SHA512_DIGEST_SIZE as u64),
            data_size: u64le(header_size as u64),
        };
        let key_block_signature = VbSignatureRaw {
            sig_offset: u64le(0),
            sig_size: u64le(0),
            data_size: u64le(0),
        };

        let header = VbKeyBlockHeaderRaw {
            magic: KEY_BLOCK_MAGIC,
            header_version_major: u64le(KEY_BLOCK_HEADER_VERSION_MAJOR),
            header_version_minor: u64le(minor),
            key_block_size: u64le((key_block_size + SHA512_DIGEST_SIZE) as u64),
            key_block_checksum: checksum_sig,
            key_block_signature,
            data_key,
        };

        let mut buf = Vec::new();
        buf.extend_from_slice(header.as_bytes());
        buf.extend_from_slice(key_body);
        let digest = sha512(&buf[..header_size]);
        buf.extend_from_slice(&digest);
        buf
    }

    #[test]
    fn hash_mode_passes_structural_checks_then_fails_key_resolution() {
        // The data key's algorithm id (99) is out of range, so a
        // structurally and hash-wise valid block still surfaces
        // `PublicKeyInvalid` rather than succeeding.
        let key_body = [7u8; 16];
        let buf = build_hash_mode_block(99, &key_body);
        let cfg = VerifierConfig::default();
        let result = verify_key_block(&buf, buf.len() as u64, None, &AlwaysFail, &cfg);
        assert_eq!(result.err(), Some(VbootError::PublicKeyInvalid));
    }

    #[test]
    fn hash_mode_rejects_corrupted_checksum() {
        let key_body = [7u8; 16];
        let mut buf = build_hash_mode_block(99, &key_body);
        let last = buf.len() - 1;
        buf[last] ^= 0xff;
        let cfg = VerifierConfig::default();
        let result = verify_key_block(&buf, buf.len() as u64, None, &AlwaysFail, &cfg);
        assert_eq!(result.err(), Some(VbootError::KeyBlockHash));
    }

    #[test]
    fn rejects_bad_magic() {
        let key_body = [7u8; 16];
        let mut buf = build_hash_mode_block(99, &key_body);
        buf[0] = b'X';
        let cfg = VerifierConfig::default();
        let result = verify_key_block(&buf, buf.len() as u64, None, &AlwaysFail, &cfg);
        assert_eq!(result.err(), Some(VbootError::KeyBlockInvalid));
    }

    #[test]
    fn accepts_incremented_minor_version() {
        // Only header_version_major gates compatibility; a newer minor
        // version on an otherwise well-formed, correctly hashed block
        // still verifies.
        use crate::algorithm::Algorithm;
        let algorithm = Algorithm::Rsa1024Sha256;
        let key_body = vec![0u8; algorithm.processed_pubkey_len() as usize];
        let buf = build_hash_mode_block_with_minor(algorithm as u64, 7, &key_body);
        let cfg = VerifierConfig::default();
        let result = verify_key_block(&buf, buf.len() as u64, None, &AlwaysFail, &cfg);
        assert!(result.is_ok(), "a higher header_version_minor must not be rejected");
    }

    #[test]
    fn rejects_truncated_buffer() {
        let key_body = [7u8; 16];
        let buf = build_hash_mode_block(99, &key_body);
        let cfg = VerifierConfig::default();
        let result = verify_key_block(&buf[..buf.len() - 4], buf.len() as u64 - 4, None, &AlwaysFail, &cfg);
        assert!(result.is_err());
    }
}
