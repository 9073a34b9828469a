//! Host-testable part of the RP2350-GEEK LCD firmware.
//!
//! The binary (`main.rs`) adds the embassy tasks; everything here is plain
//! data and logic that can be checked on the development machine.
//!
//! # Testing
//!
//! Run tests on host with:
//! ```bash
//! cargo test -p geek-lcd-pico2 --lib --target x86_64-unknown-linux-gnu  # Linux/macOS
//! cargo test -p geek-lcd-pico2 --lib --target x86_64-pc-windows-msvc    # Windows
//! ```
//!
//! Tests run with `std` enabled (via `cfg_attr`), allowing use of the standard
//! test framework while the actual firmware runs as `no_std`.

// Use no_std only when NOT testing (tests need std for the test harness)
#![cfg_attr(not(test), no_std)]

pub mod board;
