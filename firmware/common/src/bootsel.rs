//! Console trigger for rebooting into the ROM USB bootloader.
//!
//! The host sends `BOOTSEL` followed by CR or LF. Bytes are collected into an
//! 8-byte line buffer; a terminator checks the buffer against the magic word
//! (ASCII case-insensitive) and then clears it. A byte arriving while the
//! buffer is full discards the line and is itself dropped.

use heapless::Vec;

const MAGIC: &[u8; 7] = b"BOOTSEL";

/// Line buffer capacity.
pub const LINE_CAPACITY: usize = 8;

/// Incremental matcher fed one console byte at a time.
#[derive(Debug, Clone, Default)]
pub struct BootselDetector {
    line: Vec<u8, LINE_CAPACITY>,
}

impl BootselDetector {
    pub const fn new() -> Self { Self { line: Vec::new() } }

    /// Feed one byte; `true` once a full `BOOTSEL` line has been received.
    pub fn feed(
        &mut self,
        byte: u8,
    ) -> bool {
        if byte == b'\r' || byte == b'\n' {
            let matched = self.line.eq_ignore_ascii_case(MAGIC);
            self.line.clear();
            return matched;
        }

        if self.line.push(byte).is_err() {
            self.line.clear();
        }
        false
    }

    /// Feed a run of bytes, stopping at the first match.
    pub fn feed_all(
        &mut self,
        bytes: &[u8],
    ) -> bool {
        bytes.iter().any(|&b| self.feed(b))
    }

    /// Bytes buffered for the current line.
    #[inline]
    pub fn pending(&self) -> usize { self.line.len() }
}

// =============================================================================
// Unit Tests
// =============================================================================
