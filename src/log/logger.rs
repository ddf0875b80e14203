//! Logging backend.
//!
//! Off the `uefi` feature, log lines are routed through the `log` crate's
//! facade macros with the call site's category folded into the message —
//! the teacher repo declares `log = "0.4"` in its manifest but never
//! actually calls it; this crate puts that dependency to use. Under the
//! `uefi` feature, log lines go straight to a firmware-stage `SystemTable`,
//! the same writer the bootloader this verifier was extracted from used
//! pre-OS, before any `log` subscriber exists to receive them.

use core::sync::atomic::{AtomicUsize, Ordering};

/// Global log level filter.
/// 0 = TRACE, 1 = DEBUG, 2 = INFO, 3 = WARN, 4 = ERROR, 5 = CRIT/FATAL
static LOG_LEVEL: AtomicUsize = AtomicUsize::new(2); // Default = INFO

/// Change the current log level filter.
pub fn set_log_level(level: usize) {
    LOG_LEVEL.store(level, Ordering::Relaxed);
}

#[cfg(feature = "uefi")]
mod uefi_sink {
    extern crate alloc;

    use alloc::{format, vec::Vec};
    use spin::Once;
    use uefi::prelude::*;
    use uefi::CStr16;

    /// Wrapper to mark a raw UEFI SystemTable pointer as Sync.
    /// UEFI boot services are not multi-threaded at this stage,
    /// so this is safe as long as we only use it in the boot phase.
    struct SystemTablePtr(*mut SystemTable<Boot>);
    unsafe impl Send for SystemTablePtr {}
    unsafe impl Sync for SystemTablePtr {}

    /// Global storage for the UEFI SystemTable pointer.
    static SYSTEM_TABLE: Once<SystemTablePtr> = Once::new();

    /// Initialize the logger with the UEFI SystemTable. Must be called once,
    /// early, before any log call, when embedding this verifier directly in
    /// a UEFI boot stage.
    pub fn init_logger(st: &mut SystemTable<Boot>) {
        SYSTEM_TABLE.call_once(|| SystemTablePtr(st as *mut _));
    }

    pub fn write_log(level: &str, category: &str, message: &str) {
        if let Some(SystemTablePtr(st_ptr)) = SYSTEM_TABLE.get() {
            unsafe {
                if let Some(st) = st_ptr.as_mut() {
                    let formatted = format!("[{}][{}] {}\r\n", level, category, message);

                    let mut utf16: Vec<u16> = formatted.encode_utf16().collect();
                    utf16.push(0);

                    if let Ok(cstr) = CStr16::from_u16_with_nul(&utf16) {
                        let _ = st.stdout().output_string(cstr);
                    }
                }
            }
        }
    }
}

#[cfg(feature = "uefi")]
pub use uefi_sink::init_logger;

fn dispatch(level_num: usize, level_name: &str, category: &str, message: &str) {
    if level_num < LOG_LEVEL.load(Ordering::Relaxed) {
        return;
    }

    #[cfg(feature = "uefi")]
    {
        uefi_sink::write_log(level_name, category, message);
    }

    #[cfg(not(feature = "uefi"))]
    {
        let _ = level_name;
        match level_num {
            0 => log::trace!("[{}] {}", category, message),
            1 => log::debug!("[{}] {}", category, message),
            2 => log::info!("[{}] {}", category, message),
            3 => log::warn!("[{}] {}", category, message),
            _ => log::error!("[{}] {}", category, message),
        }
    }
}

pub fn log_trace(category: &str, message: &str) {
    dispatch(0, "TRACE", category, message);
}

pub fn log_debug(category: &str, message: &str) {
    dispatch(1, "DEBUG", category, message);
}

pub fn log_info(category: &str, message: &str) {
    dispatch(2, "INFO", category, message);
}

pub fn log_warn(category: &str, message: &str) {
    dispatch(3, "WARN", category, message);
}

pub fn log_error(category: &str, message: &str) {
    dispatch(4, "ERROR", category, message);
}

pub fn log_critical(category: &str, message: &str) {
    dispatch(5, "CRIT", category, message);
}

/// Fatal error log: halts after logging. Not used by the verifier itself
/// (every failure path returns a `VbootError` instead of halting), kept
/// for embedders that want a last-resort trap on an unrecoverable condition.
pub fn log_fatal(category: &str, message: &str) -> ! {
    dispatch(5, "FATAL", category, message);
    loop {}
}
