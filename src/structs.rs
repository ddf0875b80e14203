//! Packed, little-endian on-disk header layouts.
//!
//! Every multi-byte field is read through a `zerocopy` byte-order wrapper
//! rather than a native integer, so a host built on a big-endian target
//! still parses the on-disk format correctly and we never hand out a
//! reference to a misaligned native integer out of a `packed` struct.

use zerocopy::byteorder::{LittleEndian, U64};
use zerocopy::{AsBytes, FromBytes, LayoutVerified, Unaligned};

pub const KEY_BLOCK_MAGIC: [u8; 8] = *b"CHROMEOS";
pub const KEY_BLOCK_HEADER_VERSION_MAJOR: u64 = 2;
pub const FIRMWARE_PREAMBLE_HEADER_VERSION_MAJOR: u64 = 2;
pub const KERNEL_PREAMBLE_HEADER_VERSION_MAJOR: u64 = 2;

/// On-disk signature sub-object header (`VbSignature`).
#[repr(C, packed)]
#[derive(FromBytes, AsBytes, Unaligned, Clone, Copy, Debug)]
pub struct VbSignatureRaw {
    pub sig_offset: U64<LittleEndian>,
    pub sig_size: U64<LittleEndian>,
    pub data_size: U64<LittleEndian>,
}

impl VbSignatureRaw {
    pub const SIZE: u64 = core::mem::size_of::<Self>() as u64;

    pub fn sig_offset(&self) -> u64 {
        self.sig_offset.get()
    }
    pub fn sig_size(&self) -> u64 {
        self.sig_size.get()
    }
    pub fn data_size(&self) -> u64 {
        self.data_size.get()
    }
}

/// On-disk public-key sub-object header (`VbPublicKey`).
#[repr(C, packed)]
#[derive(FromBytes, AsBytes, Unaligned, Clone, Copy, Debug)]
pub struct VbPublicKeyRaw {
    pub key_offset: U64<LittleEndian>,
    pub key_size: U64<LittleEndian>,
    pub algorithm: U64<LittleEndian>,
    pub key_version: U64<LittleEndian>,
}

impl VbPublicKeyRaw {
    pub const SIZE: u64 = core::mem::size_of::<Self>() as u64;

    pub fn key_offset(&self) -> u64 {
        self.key_offset.get()
    }
    pub fn key_size(&self) -> u64 {
        self.key_size.get()
    }
    pub fn algorithm(&self) -> u64 {
        self.algorithm.get()
    }
    pub fn key_version(&self) -> u64 {
        self.key_version.get()
    }
}

/// `VbKeyBlockHeader`: magic tag, version, and the two alternative
/// authentication sub-objects plus the embedded data key.
#[repr(C, packed)]
#[derive(FromBytes, AsBytes, Unaligned, Clone, Copy, Debug)]
pub struct VbKeyBlockHeaderRaw {
    pub magic: [u8; 8],
    pub header_version_major: U64<LittleEndian>,
    pub header_version_minor: U64<LittleEndian>,
    pub key_block_size: U64<LittleEndian>,
    pub key_block_checksum: VbSignatureRaw,
    pub key_block_signature: VbSignatureRaw,
    pub data_key: VbPublicKeyRaw,
}

impl VbKeyBlockHeaderRaw {
    pub const SIZE: u64 = core::mem::size_of::<Self>() as u64;

    pub const CHECKSUM_OFFSET: u64 = 8 + 8 + 8 + 8;
    pub const SIGNATURE_OFFSET: u64 = Self::CHECKSUM_OFFSET + VbSignatureRaw::SIZE;
    pub const DATA_KEY_OFFSET: u64 = Self::SIGNATURE_OFFSET + VbSignatureRaw::SIZE;

    pub fn header_version_major(&self) -> u64 {
        self.header_version_major.get()
    }
    pub fn header_version_minor(&self) -> u64 {
        self.header_version_minor.get()
    }
    pub fn key_block_size(&self) -> u64 {
        self.key_block_size.get()
    }

    /// Parse the header prefix of `bytes`. Fails only if `bytes` is shorter
    /// than the fixed header; everything after that is bounds-checked by
    /// the caller against the (untrusted) `key_block_size`.
    pub fn parse(bytes: &[u8]) -> Option<&Self> {
        let (header, _rest) = LayoutVerified::<_, Self>::new_unaligned_from_prefix(bytes)?;
        Some(header.into_ref())
    }
}

/// `VbFirmwarePreambleHeader`: version, kernel subkey, body signature bounds,
/// and the preamble's own signature.
#[repr(C, packed)]
#[derive(FromBytes, AsBytes, Unaligned, Clone, Copy, Debug)]
pub struct VbFirmwarePreambleHeaderRaw {
    pub header_version_major: U64<LittleEndian>,
    pub header_version_minor: U64<LittleEndian>,
    pub preamble_size: U64<LittleEndian>,
    pub firmware_version: U64<LittleEndian>,
    pub kernel_subkey: VbPublicKeyRaw,
    pub body_signature: VbSignatureRaw,
    pub preamble_signature: VbSignatureRaw,
}

impl VbFirmwarePreambleHeaderRaw {
    pub const SIZE: u64 = core::mem::size_of::<Self>() as u64;

    pub const KERNEL_SUBKEY_OFFSET: u64 = 8 + 8 + 8 + 8;
    pub const BODY_SIGNATURE_OFFSET: u64 = Self::KERNEL_SUBKEY_OFFSET + VbPublicKeyRaw::SIZE;
    pub const PREAMBLE_SIGNATURE_OFFSET: u64 = Self::BODY_SIGNATURE_OFFSET + VbSignatureRaw::SIZE;

    pub fn header_version_major(&self) -> u64 {
        self.header_version_major.get()
    }
    pub fn header_version_minor(&self) -> u64 {
        self.header_version_minor.get()
    }
    pub fn preamble_size(&self) -> u64 {
        self.preamble_size.get()
    }
    pub fn firmware_version(&self) -> u64 {
        self.firmware_version.get()
    }

    pub fn parse(bytes: &[u8]) -> Option<&Self> {
        let (header, _rest) = LayoutVerified::<_, Self>::new_unaligned_from_prefix(bytes)?;
        Some(header.into_ref())
    }
}

/// `VbKernelPreambleHeader`: as the firmware preamble, but carrying the
/// kernel body's load/bootloader addressing instead of a kernel subkey.
#[repr(C, packed)]
#[derive(FromBytes, AsBytes, Unaligned, Clone, Copy, Debug)]
pub struct VbKernelPreambleHeaderRaw {
    pub header_version_major: U64<LittleEndian>,
    pub header_version_minor: U64<LittleEndian>,
    pub preamble_size: U64<LittleEndian>,
    pub kernel_version: U64<LittleEndian>,
    pub body_load_address: U64<LittleEndian>,
    pub bootloader_address: U64<LittleEndian>,
    pub bootloader_size: U64<LittleEndian>,
    pub body_signature: VbSignatureRaw,
    pub preamble_signature: VbSignatureRaw,
}

impl VbKernelPreambleHeaderRaw {
    pub const SIZE: u64 = core::mem::size_of::<Self>() as u64;

    pub const BODY_SIGNATURE_OFFSET: u64 = 8 * 7;
    pub const PREAMBLE_SIGNATURE_OFFSET: u64 = Self::BODY_SIGNATURE_OFFSET + VbSignatureRaw::SIZE;

    pub fn header_version_major(&self) -> u64 {
        self.header_version_major.get()
    }
    pub fn header_version_minor(&self) -> u64 {
        self.header_version_minor.get()
    }
    pub fn preamble_size(&self) -> u64 {
        self.preamble_size.get()
    }

    pub fn parse(bytes: &[u8]) -> Option<&Self> {
        let (header, _rest) = LayoutVerified::<_, Self>::new_unaligned_from_prefix(bytes)?;
        Some(header.into_ref())
    }
}
