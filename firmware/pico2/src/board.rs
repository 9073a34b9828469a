//! Board wiring and the feature-selected configuration.
//!
//! Pin map of the Waveshare RP2350-GEEK:
//!
//! | Signal     | GPIO | Notes                            |
//! |------------|------|----------------------------------|
//! | LCD SCK    | 10   | SPI1 SCK                         |
//! | LCD MOSI   | 11   | SPI1 TX                          |
//! | LCD CS     | 9    | GPIO, active low                 |
//! | LCD DC     | 8    | GPIO, high = data                |
//! | LCD RST    | 12   | GPIO, active low                 |
//! | LCD BL     | 13   | GPIO, high = backlight on        |
//! | Status LED | 25   | held high                        |
//! | UART0 TX   | 0    | console                          |
//! | UART0 RX   | 1    | console, `BOOTSEL` trigger input |
//! | I2C0 SDA   | 4    | heartbeat bus scan               |
//! | I2C0 SCL   | 5    | heartbeat bus scan               |
//! | SPI0 MISO  | 16   | loopback, jumper to GPIO19       |
//! | SPI0 CS    | 17   | GPIO, active low                 |
//! | SPI0 SCK   | 18   |                                  |
//! | SPI0 MOSI  | 19   | loopback, jumper to GPIO16       |
//! | ADC0       | 26   | heartbeat voltage reading        |

use geek_lcd_common::BoardConfig;
use geek_lcd_common::schedule::ScheduleError;

/// GPIO numbers, for logs and picotool metadata.
pub mod pins {
    pub const LCD_SCK: u8 = 10;
    pub const LCD_MOSI: u8 = 11;
    pub const LCD_CS: u8 = 9;
    pub const LCD_DC: u8 = 8;
    pub const LCD_RST: u8 = 12;
    pub const LCD_BL: u8 = 13;
    pub const LED: u8 = 25;
    pub const UART0_TX: u8 = 0;
    pub const UART0_RX: u8 = 1;
    pub const I2C0_SDA: u8 = 4;
    pub const I2C0_SCL: u8 = 5;
    pub const SPI0_MISO: u8 = 16;
    pub const SPI0_CS: u8 = 17;
    pub const SPI0_SCK: u8 = 18;
    pub const SPI0_MOSI: u8 = 19;
    pub const ADC0: u8 = 26;
}

/// SPI1 clock for the panel.
pub const LCD_SPI_FREQUENCY_HZ: u32 = 40_000_000;

/// I2C0 clock for the heartbeat bus scan.
pub const STATUS_I2C_FREQUENCY_HZ: u32 = 400_000;

/// SPI0 clock for the heartbeat loopback check.
pub const STATUS_SPI_FREQUENCY_HZ: u32 = 2_000_000;

/// Console baud rate.
pub const CONSOLE_BAUD: u32 = 115_200;

/// Time for the log line to drain before rebooting into the bootloader.
pub const BOOTSEL_REBOOT_DELAY_MS: u64 = 50;

/// Heartbeat task instances that can run at once (embassy `pool_size`).
pub const HEARTBEAT_POOL_SIZE: usize = 2;

/// Build the configuration selected by cargo features.
///
/// `single-loop` picks the cooperative preset, otherwise the concurrent one.
/// `no-rotate` and `no-invert` clear the matching panel options.
pub fn board_config() -> Result<BoardConfig, ScheduleError> {
    let config = if cfg!(feature = "single-loop") { BoardConfig::single_loop()? } else { BoardConfig::concurrent()? };
    Ok(config.with_panel_options(!cfg!(feature = "no-rotate"), !cfg!(feature = "no-invert")))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use geek_lcd_common::schedule::RunMode;

    use super::*;

    #[test]
    fn test_board_config_builds() {
        let config = board_config().unwrap();
        assert_eq!(config.panel.rotate_180, !cfg!(feature = "no-rotate"));
        assert_eq!(config.panel.invert, !cfg!(feature = "no-invert"));
        if cfg!(feature = "single-loop") {
            assert!(matches!(config.mode, RunMode::SingleLoop { .. }));
        } else {
            assert_eq!(config.mode, RunMode::Concurrent);
        }
    }

    #[test]
    fn test_heartbeats_fit_task_pool() {
        let concurrent = BoardConfig::concurrent().unwrap();
        assert!(concurrent.heartbeat_count() <= HEARTBEAT_POOL_SIZE);
    }

    #[test]
    fn test_pins_are_distinct() {
        let mut all = [
            pins::LCD_SCK,
            pins::LCD_MOSI,
            pins::LCD_CS,
            pins::LCD_DC,
            pins::LCD_RST,
            pins::LCD_BL,
            pins::LED,
            pins::UART0_TX,
            pins::UART0_RX,
            pins::I2C0_SDA,
            pins::I2C0_SCL,
            pins::SPI0_MISO,
            pins::SPI0_CS,
            pins::SPI0_SCK,
            pins::SPI0_MOSI,
            pins::ADC0,
        ];
        all.sort_unstable();
        assert!(all.windows(2).all(|w| w[0] != w[1]));
    }
}
