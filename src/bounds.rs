//! Bounds arithmetic: the member-inside predicate and the checked-slice
//! accessor built on top of it.
//!
//! The original firmware computes a sub-object's payload address by adding
//! an untrusted offset to a struct pointer and checks the result after the
//! fact (`VerifyMemberInside` in `vboot_common.c`). Here every object is a
//! `(buffer, start, len)` view and sub-ranges are derived only through
//! [`subslice`], which fails closed on overflow or out-of-range rather than
//! trusting an offset before bounding it.

/// Returns `true` iff a nested member — its header and its trailing
/// variable-length payload — is entirely contained within a parent range.
///
/// `parent_base`/`member_base` are byte offsets from the start of the same
/// underlying buffer (not raw pointers), so `member_base < parent_base` is
/// rejected explicitly by the `checked_sub` below rather than relying on
/// wraparound plus a later bounds test.
pub fn member_inside(
    parent_base: u64,
    parent_size: u64,
    member_base: u64,
    member_header_size: u64,
    payload_offset: u64,
    payload_size: u64,
) -> bool {
    let rel = match member_base.checked_sub(parent_base) {
        Some(v) => v,
        None => return false,
    };
    if rel > parent_size {
        return false;
    }
    let header_end = match rel.checked_add(member_header_size) {
        Some(v) => v,
        None => return false,
    };
    if header_end > parent_size {
        return false;
    }
    let payload_start = match rel.checked_add(payload_offset) {
        Some(v) => v,
        None => return false,
    };
    if payload_start > parent_size {
        return false;
    }
    let payload_end = match payload_start.checked_add(payload_size) {
        Some(v) => v,
        None => return false,
    };
    payload_end <= parent_size
}

/// Carves `[base + offset, base + offset + size)` out of `buf`, returning
/// `None` on overflow or if the range escapes `buf`. The one operation
/// through which every sub-object payload is read.
pub fn subslice(buf: &[u8], base: usize, offset: u64, size: u64) -> Option<&[u8]> {
    let offset = usize::try_from(offset).ok()?;
    let size = usize::try_from(size).ok()?;
    let start = base.checked_add(offset)?;
    let end = start.checked_add(size)?;
    buf.get(start..end)
}
