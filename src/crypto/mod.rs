//! Cryptographic primitives and adapters.
//!
//! `ctcmp` is the constant-time comparator used across the verifier;
//! `digest` wraps the SHA hashing contract; `rsa` is the RSA-PKCS#1-v1_5
//! verifier adapter boundary described in the crate's top-level docs.

pub mod ctcmp;
pub mod digest;
pub mod rsa;
