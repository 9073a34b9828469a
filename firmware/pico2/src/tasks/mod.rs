//! Embassy tasks for the LCD firmware.
//!
//! - `heartbeat`: status log per heartbeat entry (core 0)
//! - `pages`: page cycle, sole owner of the panel and framebuffer (core 1)
//! - `console`: UART0 listener for the `BOOTSEL` command (core 0)
//! - `single_loop`: cooperative alternative to the first two

pub mod console;
pub mod heartbeat;
pub mod pages;
pub mod single_loop;

pub use console::bootsel_task;
pub use heartbeat::{heartbeat_task, install_led};
pub use pages::page_cycle_task;
pub use single_loop::run_single_loop;
