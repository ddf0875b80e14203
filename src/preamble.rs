//! Firmware and kernel preamble verification: `VerifyFirmwarePreamble` and
//! `VerifyKernelPreamble` from the original firmware.
//!
//! Both preambles are signed the same way (a `VbSignature` naming a
//! `data_size` prefix of the preamble, RSA-verified against a key already
//! resolved by [`crate::keyblock::verify_key_block`]). The firmware
//! preamble additionally carries a kernel subkey and a body signature that
//! must themselves stay inside the preamble; the kernel preamble carries
//! only the body signature, plus load-address bookkeeping this crate does
//! not interpret.

use crate::bounds::{member_inside, subslice};
use crate::config::VerifierConfig;
use crate::crypto::rsa::{self, RsaKeyView, RsaVerifier};
use crate::error::VbootError;
use crate::log::logger::{log_info, log_warn};
use crate::structs::{
    VbFirmwarePreambleHeaderRaw, VbKernelPreambleHeaderRaw, VbPublicKeyRaw, VbSignatureRaw,
    FIRMWARE_PREAMBLE_HEADER_VERSION_MAJOR, KERNEL_PREAMBLE_HEADER_VERSION_MAJOR,
};

const FW_LOG_CATEGORY: &str = "fw_preamble";
const KERNEL_LOG_CATEGORY: &str = "kernel_preamble";

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

/// Resolved kernel subkey carried by a firmware preamble, ready to verify
/// whatever kernel key block comes next.
pub struct VerifiedKernelSubkey<'a> {
    pub key_version: u64,
    pub rsa_key: RsaKeyView<'a>,
}

/// `VerifyFirmwarePreamble`.
pub fn verify_firmware_preamble<'a>(
    buf: &'a [u8],
    size: u64,
    key: RsaKeyView<'_>,
    rsa_backend: &dyn RsaVerifier,
    cfg: &VerifierConfig,
) -> Result<VerifiedKernelSubkey<'a>, VbootError> {
    crate::log::logger::set_log_level(cfg.log_level as usize);

    let preamble = VbFirmwarePreambleHeaderRaw::parse(buf).ok_or(VbootError::PreambleInvalid)?;

    if preamble.header_version_major() != FIRMWARE_PREAMBLE_HEADER_VERSION_MAJOR {
        log_warn(FW_LOG_CATEGORY, "incompatible firmware preamble header version");
        return Err(VbootError::PreambleInvalid);
    }
    let preamble_size = preamble.preamble_size();
    if size < preamble_size {
        log_warn(FW_LOG_CATEGORY, "not enough data for preamble");
        return Err(VbootError::PreambleInvalid);
    }

    let sig = &preamble.preamble_signature;
    if !signature_inside(preamble_size, VbFirmwarePreambleHeaderRaw::PREAMBLE_SIGNATURE_OFFSET, sig) {
        log_warn(FW_LOG_CATEGORY, "preamble signature off end of preamble");
        return Err(VbootError::PreambleInvalid);
    }
    if preamble_size < sig.data_size() {
        log_warn(FW_LOG_CATEGORY, "signature calculated past end of the preamble");
        return Err(VbootError::PreambleInvalid);
    }

    let sig_bytes = signature_bytes(buf, VbFirmwarePreambleHeaderRaw::PREAMBLE_SIGNATURE_OFFSET, sig)
        .ok_or(VbootError::PreambleInvalid)?;

    if !rsa::verify_data(buf, sig.data_size(), sig.sig_size(), sig_bytes, key, rsa_backend) {
        log_warn(FW_LOG_CATEGORY, "preamble signature validation failed");
        return Err(VbootError::PreambleSignature);
    }

    if sig.data_size() < VbFirmwarePreambleHeaderRaw::SIZE {
        log_warn(FW_LOG_CATEGORY, "didn't sign enough data");
        return Err(VbootError::PreambleInvalid);
    }

    // The original bounds kernel_subkey and body_signature against the
    // whole preamble. `require_subobjects_in_signed_prefix` optionally
    // tightens that to the signed prefix instead.
    let subobject_bound = if cfg.require_subobjects_in_signed_prefix {
        sig.data_size()
    } else {
        preamble_size
    };

    if !signature_inside(subobject_bound, VbFirmwarePreambleHeaderRaw::BODY_SIGNATURE_OFFSET, &preamble.body_signature) {
        log_warn(FW_LOG_CATEGORY, "firmware body signature off end of preamble");
        return Err(VbootError::PreambleInvalid);
    }

    if !public_key_inside(subobject_bound, VbFirmwarePreambleHeaderRaw::KERNEL_SUBKEY_OFFSET, &preamble.kernel_subkey) {
        log_warn(FW_LOG_CATEGORY, "kernel subkey off end of preamble");
        return Err(VbootError::PreambleInvalid);
    }

    let kernel_subkey = &preamble.kernel_subkey;
    let key_bytes = public_key_bytes(buf, VbFirmwarePreambleHeaderRaw::KERNEL_SUBKEY_OFFSET, kernel_subkey)
        .ok_or(VbootError::PreambleInvalid)?;

    let raw = rsa::RawPublicKey {
        algorithm: kernel_subkey.algorithm(),
        key_size: kernel_subkey.key_size(),
        key_data: key_bytes,
    };
    let rsa_key = rsa::resolve_public_key(&raw).ok_or_else(|| {
        log_warn(FW_LOG_CATEGORY, "kernel subkey has an invalid algorithm or size");
        VbootError::PublicKeyInvalid
    })?;

    if let Some(floor) = cfg.min_rsa_modulus_bits {
        if rsa_key.algorithm.modulus_bits() < floor {
            log_warn(FW_LOG_CATEGORY, "kernel subkey modulus narrower than policy floor");
            return Err(VbootError::PublicKeyInvalid);
        }
    }

    log_info(FW_LOG_CATEGORY, "firmware preamble verified");
    Ok(VerifiedKernelSubkey {
        key_version: kernel_subkey.key_version(),
        rsa_key,
    })
}

/// `VerifyKernelPreamble`.
///
/// Unlike the firmware preamble, the original never checks that
/// `body_signature.data_size` fits within `preamble_size` here — it relies
/// entirely on `VerifySignatureInside` bounding the signature sub-object
/// itself. This rebuild adds that check unconditionally, since a
/// `body_signature` naming a `data_size` larger than the body it is meant
/// to describe should never pass as "verified", preamble bounds aside.
pub fn verify_kernel_preamble(
    buf: &[u8],
    size: u64,
    key: RsaKeyView<'_>,
    rsa_backend: &dyn RsaVerifier,
    cfg: &VerifierConfig,
) -> Result<(), VbootError> {
    crate::log::logger::set_log_level(cfg.log_level as usize);

    if let Some(floor) = cfg.min_rsa_modulus_bits {
        if key.algorithm.modulus_bits() < floor {
            log_warn(KERNEL_LOG_CATEGORY, "kernel key modulus narrower than policy floor");
            return Err(VbootError::PublicKeyInvalid);
        }
    }

    let preamble = VbKernelPreambleHeaderRaw::parse(buf).ok_or(VbootError::PreambleInvalid)?;

    if preamble.header_version_major() != KERNEL_PREAMBLE_HEADER_VERSION_MAJOR {
        log_warn(KERNEL_LOG_CATEGORY, "incompatible kernel preamble header version");
        return Err(VbootError::PreambleInvalid);
    }
    let preamble_size = preamble.preamble_size();
    if size < preamble_size {
        log_warn(KERNEL_LOG_CATEGORY, "not enough data for preamble");
        return Err(VbootError::PreambleInvalid);
    }

    let sig = &preamble.preamble_signature;
    if !signature_inside(preamble_size, VbKernelPreambleHeaderRaw::PREAMBLE_SIGNATURE_OFFSET, sig) {
        log_warn(KERNEL_LOG_CATEGORY, "preamble signature off end of preamble");
        return Err(VbootError::PreambleInvalid);
    }

    let sig_bytes = signature_bytes(buf, VbKernelPreambleHeaderRaw::PREAMBLE_SIGNATURE_OFFSET, sig)
        .ok_or(VbootError::PreambleInvalid)?;

    if !rsa::verify_data(buf, sig.data_size(), sig.sig_size(), sig_bytes, key, rsa_backend) {
        log_warn(KERNEL_LOG_CATEGORY, "preamble signature validation failed");
        return Err(VbootError::PreambleSignature);
    }

    if sig.data_size() < VbKernelPreambleHeaderRaw::SIZE {
        log_warn(KERNEL_LOG_CATEGORY, "didn't sign enough data");
        return Err(VbootError::PreambleInvalid);
    }

    if !signature_inside(preamble_size, VbKernelPreambleHeaderRaw::BODY_SIGNATURE_OFFSET, &preamble.body_signature) {
        log_warn(KERNEL_LOG_CATEGORY, "kernel body signature off end of preamble");
        return Err(VbootError::PreambleInvalid);
    }

    if preamble.body_signature.data_size() > preamble_size {
        log_warn(KERNEL_LOG_CATEGORY, "kernel body data_size exceeds preamble size");
        return Err(VbootError::PreambleInvalid);
    }

    log_info(KERNEL_LOG_CATEGORY, "kernel preamble verified");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::Algorithm;
    use crate::structs::VbKernelPreambleHeaderRaw;
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

    fn u64le(v: u64) -> U64<LittleEndian> {
        U64::new(v)
    }

    fn test_key() -> RsaKeyView<'static> {
        RsaKeyView {
            algorithm: Algorithm::Rsa2048Sha256,
            processed_key: &[],
        }
    }

    fn build_kernel_preamble(sig_len: usize) -> Vec<u8> {
        let header_size = VbKernelPreambleHeaderRaw::SIZE as usize;

        let preamble_signature = VbSignatureRaw {
            sig_offset: u64le((header_size - VbKernelPreambleHeaderRaw::PREAMBLE_SIGNATURE_OFFSET as usize) as u64),
            sig_size: u64le(sig_len as u64),
            data_size: u64le(header_size as u64),
        };
        let body_signature = VbSignatureRaw {
            sig_offset: u64le(0),
            sig_size: u64le(0),
            data_size: u64le(0),
        };

        let header = VbKernelPreambleHeaderRaw {
            header_version_major: u64le(KERNEL_PREAMBLE_HEADER_VERSION_MAJOR),
            header_version_minor: u64le(0),
            preamble_size: u64le((header_size + sig_len) as u64),
            kernel_version: u64le(1),
            body_load_address: u64le(0),
            bootloader_address: u64le(0),
            bootloader_size: u64le(0),
            body_signature,
            preamble_signature,
        };

        let mut buf = Vec::new();
        buf.extend_from_slice(header.as_bytes());
        buf.extend_from_slice(&alloc_zeros(sig_len));
        buf
    }

    fn alloc_zeros(n: usize) -> Vec<u8> {
        let mut v = Vec::with_capacity(n);
        v.resize(n, 0u8);
        v
    }

    #[test]
    fn accepts_well_formed_kernel_preamble() {
        let buf = build_kernel_preamble(256);
        let key = test_key();
        let result = verify_kernel_preamble(&buf, buf.len() as u64, key, &AlwaysOk, &VerifierConfig::default());
        assert!(result.is_ok());
    }

    #[test]
    fn rejects_wrong_header_version() {
        let mut buf = build_kernel_preamble(256);
        buf[0] = 9;
        let key = test_key();
        let result = verify_kernel_preamble(&buf, buf.len() as u64, key, &AlwaysOk, &VerifierConfig::default());
        assert_eq!(result.err(), Some(VbootError::PreambleInvalid));
    }

    #[test]
    fn rejects_truncated_size() {
        let buf = build_kernel_preamble(256);
        let key = test_key();
        let result = verify_kernel_preamble(&buf, buf.len() as u64 - 1, key, &AlwaysOk, &VerifierConfig::default());
        assert_eq!(result.err(), Some(VbootError::PreambleInvalid));
    }
}
