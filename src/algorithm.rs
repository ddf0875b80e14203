//! The algorithm table: `alg_id -> {sig_len, digest_len, digest_info, processed_pubkey_len}`.
//!
//! The original indexes parallel C arrays (`siglen_map`, `hash_size_map`,
//! `hash_digestinfo_map`) by a `uint8_t` the attacker controls. Here the
//! identifier is lifted into a sum type whose constructors carry their own
//! sizes and DigestInfo prefix as associated constants, so dispatch cannot
//! go out of bounds and cannot mix up sizes between algorithms.

/// DigestInfo prefixes per RFC 3447 / PKCS#1 v2.1, Appendix B (9.2, Note 1).
const SHA1_DIGEST_INFO: &[u8] = &[
    0x30, 0x21, 0x30, 0x09, 0x06, 0x05, 0x2b, 0x0e, 0x03, 0x02, 0x1a, 0x05, 0x00, 0x04, 0x14,
];
const SHA256_DIGEST_INFO: &[u8] = &[
    0x30, 0x31, 0x30, 0x0d, 0x06, 0x09, 0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02, 0x01,
    0x05, 0x00, 0x04, 0x20,
];
const SHA512_DIGEST_INFO: &[u8] = &[
    0x30, 0x51, 0x30, 0x0d, 0x06, 0x09, 0x60, 0x86, 0x48, 0x01, 0x65, 0x03, 0x04, 0x02, 0x03,
    0x05, 0x00, 0x04, 0x40,
];

pub const SHA1_DIGEST_SIZE: usize = 20;
pub const SHA256_DIGEST_SIZE: usize = 32;
pub const SHA512_DIGEST_SIZE: usize = 64;

/// Number of table entries. The wire value equal to this count is the
/// `kNumAlgorithms` sentinel meaning "no algorithm / key absent".
pub const NUM_ALGORITHMS: u64 = 12;

/// One enumerated RSA-modulus-size x digest-algorithm combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Algorithm {
    Rsa1024Sha1 = 0,
    Rsa1024Sha256 = 1,
    Rsa1024Sha512 = 2,
    Rsa2048Sha1 = 3,
    Rsa2048Sha256 = 4,
    Rsa2048Sha512 = 5,
    Rsa4096Sha1 = 6,
    Rsa4096Sha256 = 7,
    Rsa4096Sha512 = 8,
    Rsa8192Sha1 = 9,
    Rsa8192Sha256 = 10,
    Rsa8192Sha512 = 11,
}

/// Which SHA variant an [`Algorithm`] hashes with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestKind {
    Sha1,
    Sha256,
    Sha512,
}

impl Algorithm {
    /// RSA modulus size in bytes.
    pub const fn modulus_bytes(self) -> u64 {
        match self {
            Algorithm::Rsa1024Sha1 | Algorithm::Rsa1024Sha256 | Algorithm::Rsa1024Sha512 => 128,
            Algorithm::Rsa2048Sha1 | Algorithm::Rsa2048Sha256 | Algorithm::Rsa2048Sha512 => 256,
            Algorithm::Rsa4096Sha1 | Algorithm::Rsa4096Sha256 | Algorithm::Rsa4096Sha512 => 512,
            Algorithm::Rsa8192Sha1 | Algorithm::Rsa8192Sha256 | Algorithm::Rsa8192Sha512 => 1024,
        }
    }

    /// RSA modulus size in bits, for `VerifierConfig::min_rsa_modulus_bits` policy checks.
    pub const fn modulus_bits(self) -> u32 {
        (self.modulus_bytes() as u32) * 8
    }

    /// Expected signature length: equal to the RSA modulus size in bytes.
    pub const fn sig_len(self) -> u64 {
        self.modulus_bytes()
    }

    pub const fn digest_kind(self) -> DigestKind {
        match self {
            Algorithm::Rsa1024Sha1
            | Algorithm::Rsa2048Sha1
            | Algorithm::Rsa4096Sha1
            | Algorithm::Rsa8192Sha1 => DigestKind::Sha1,
            Algorithm::Rsa1024Sha256
            | Algorithm::Rsa2048Sha256
            | Algorithm::Rsa4096Sha256
            | Algorithm::Rsa8192Sha256 => DigestKind::Sha256,
            Algorithm::Rsa1024Sha512
            | Algorithm::Rsa2048Sha512
            | Algorithm::Rsa4096Sha512
            | Algorithm::Rsa8192Sha512 => DigestKind::Sha512,
        }
    }

    /// Digest length in bytes for this algorithm's hash.
    pub const fn digest_len(self) -> u64 {
        match self.digest_kind() {
            DigestKind::Sha1 => SHA1_DIGEST_SIZE as u64,
            DigestKind::Sha256 => SHA256_DIGEST_SIZE as u64,
            DigestKind::Sha512 => SHA512_DIGEST_SIZE as u64,
        }
    }

    /// PKCS#1-v1_5 DigestInfo DER prefix prepended to the digest before padding.
    pub const fn digest_info(self) -> &'static [u8] {
        match self.digest_kind() {
            DigestKind::Sha1 => SHA1_DIGEST_INFO,
            DigestKind::Sha256 => SHA256_DIGEST_INFO,
            DigestKind::Sha512 => SHA512_DIGEST_INFO,
        }
    }

    /// Size of the serialized "processed" public key this algorithm expects:
    /// an 8-byte reserved header, the big-endian modulus, and a trailing
    /// `modulus_bytes`-long block of Montgomery `R^2 mod n` limbs, per the
    /// `processed_key` convention documented in [`crate::rsa_backend`].
    pub const fn processed_pubkey_len(self) -> u64 {
        8 + 2 * self.modulus_bytes()
    }
}

impl core::convert::TryFrom<u64> for Algorithm {
    type Error = ();

    /// The only place a wire-supplied algorithm index is accepted or
    /// rejected; every other use of `Algorithm` is dispatch on an
    /// already-validated value.
    fn try_from(v: u64) -> Result<Self, ()> {
        match v {
            0 => Ok(Algorithm::Rsa1024Sha1),
            1 => Ok(Algorithm::Rsa1024Sha256),
            2 => Ok(Algorithm::Rsa1024Sha512),
            3 => Ok(Algorithm::Rsa2048Sha1),
            4 => Ok(Algorithm::Rsa2048Sha256),
            5 => Ok(Algorithm::Rsa2048Sha512),
            6 => Ok(Algorithm::Rsa4096Sha1),
            7 => Ok(Algorithm::Rsa4096Sha256),
            8 => Ok(Algorithm::Rsa4096Sha512),
            9 => Ok(Algorithm::Rsa8192Sha1),
            10 => Ok(Algorithm::Rsa8192Sha256),
            11 => Ok(Algorithm::Rsa8192Sha512),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::TryFrom;

    #[test]
    fn sentinel_is_rejected() {
        assert!(Algorithm::try_from(NUM_ALGORITHMS).is_err());
        assert!(Algorithm::try_from(NUM_ALGORITHMS + 1000).is_err());
    }

    #[test]
    fn every_table_row_round_trips() {
        for i in 0..NUM_ALGORITHMS {
            let alg = Algorithm::try_from(i).expect("in-range index");
            assert_eq!(alg as u64, i);
        }
    }

    #[test]
    fn digest_len_matches_digest_info_tail() {
        // DigestInfo encodes an OCTET STRING tag+length right before the digest bytes;
        // its own length plus the digest length is what gets PKCS#1-padded.
        for i in 0..NUM_ALGORITHMS {
            let alg = Algorithm::try_from(i).unwrap();
            assert!(alg.digest_info().len() > 0);
            assert!(alg.sig_len() > alg.digest_info().len() as u64 + alg.digest_len());
        }
    }

    #[test]
    fn processed_pubkey_len_scales_with_modulus() {
        assert_eq!(Algorithm::Rsa1024Sha256.processed_pubkey_len(), 8 + 2 * 128);
        assert_eq!(Algorithm::Rsa2048Sha256.processed_pubkey_len(), 8 + 2 * 256);
    }
}
