//! Verdict and error taxonomy for the verified-boot structure verifier.
//!
//! Deliberately coarse: five failure categories plus success, mirroring the
//! original firmware's `VBOOT_*` return codes and `kVbootErrors` message
//! table. No `std::error::Error` impl is available in `no_std`, so callers
//! get `message()` instead of a trait-object source chain.

/// Outcome of a verification call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VbootError {
    /// Structural malformation: bad magic, version mismatch, truncation,
    /// a sub-object escaping its parent range, or a signature that doesn't
    /// cover enough of the header.
    KeyBlockInvalid,
    /// Key block is structurally sound but its RSA signature didn't verify.
    KeyBlockSignature,
    /// Key block is structurally sound but its SHA-512 checksum didn't match.
    KeyBlockHash,
    /// The supplied trust-root public key is unusable (bad algorithm index
    /// or a key size that disagrees with the algorithm table).
    PublicKeyInvalid,
    /// Preamble is structurally malformed (see `KeyBlockInvalid` for the
    /// shape of these failures, applied to the preamble object instead).
    PreambleInvalid,
    /// Preamble is structurally sound but its RSA signature didn't verify.
    PreambleSignature,
}

impl VbootError {
    /// Human-readable diagnostic message, analogous to the original's
    /// `kVbootErrors[]` string table.
    pub const fn message(self) -> &'static str {
        match self {
            VbootError::KeyBlockInvalid => "Key block invalid.",
            VbootError::KeyBlockSignature => "Key block signature failed.",
            VbootError::KeyBlockHash => "Key block hash failed.",
            VbootError::PublicKeyInvalid => "Public key invalid.",
            VbootError::PreambleInvalid => "Preamble invalid.",
            VbootError::PreambleSignature => "Preamble signature check failed.",
        }
    }
}

impl core::fmt::Display for VbootError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.message())
    }
}
