//! Verifier configuration.
//!
//! A small policy surface, in the style of the teacher's own
//! `BootloaderConfig`: a plain `Debug + Clone` struct of policy
//! enums/bools with a `Default` impl and builder-style setters, rather
//! than a cascade of free-standing boolean parameters threaded through
//! every call.

use crate::log::LogLevel;

/// Runtime policy for [`crate::keyblock::verify_key_block`] and the
/// preamble verifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifierConfig {
    /// When `true`, `kernel_subkey` and `body_signature` in a firmware
    /// preamble must be contained within `preamble_signature.data_size`
    /// (the signed prefix) rather than merely within the whole preamble.
    ///
    /// The original firmware bounds them against the whole preamble; that
    /// remains this crate's default for compatibility. See the design
    /// notes on "firmware preamble bounds choice".
    pub require_subobjects_in_signed_prefix: bool,

    /// Optional policy floor on RSA modulus size, in bits. When set, a key
    /// block, firmware preamble, or kernel preamble that is otherwise
    /// structurally and cryptographically valid but uses a narrower
    /// modulus than this is still rejected. Checked after every structural
    /// check and before the RSA call, as a pure policy filter over the
    /// already-validated algorithm table entry.
    pub min_rsa_modulus_bits: Option<u32>,

    /// Log level applied to this verifier's log sink.
    pub log_level: LogLevel,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        VerifierConfig {
            require_subobjects_in_signed_prefix: false,
            min_rsa_modulus_bits: None,
            log_level: LogLevel::Info,
        }
    }
}

impl VerifierConfig {
    /// The hardened variant: sub-objects must live in the signed prefix.
    pub fn hardened() -> Self {
        VerifierConfig {
            require_subobjects_in_signed_prefix: true,
            ..Default::default()
        }
    }

    pub fn with_require_subobjects_in_signed_prefix(mut self, value: bool) -> Self {
        self.require_subobjects_in_signed_prefix = value;
        self
    }

    pub fn with_min_rsa_modulus_bits(mut self, bits: u32) -> Self {
        self.min_rsa_modulus_bits = Some(bits);
        self
    }

    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_original_firmware_behavior() {
        let cfg = VerifierConfig::default();
        assert!(!cfg.require_subobjects_in_signed_prefix);
        assert_eq!(cfg.min_rsa_modulus_bits, None);
    }

    #[test]
    fn hardened_only_tightens_the_default() {
        let cfg = VerifierConfig::hardened();
        assert!(cfg.require_subobjects_in_signed_prefix);
    }

    #[test]
    fn builder_methods_compose() {
        let cfg = VerifierConfig::default()
            .with_require_subobjects_in_signed_prefix(true)
            .with_min_rsa_modulus_bits(2048);
        assert!(cfg.require_subobjects_in_signed_prefix);
        assert_eq!(cfg.min_rsa_modulus_bits, Some(2048));
    }
}
