//! Board status sample carried by every heartbeat.
//!
//! Three cheap checks of the expansion header:
//!
//! - I2C0 bus scan over the non-reserved 7-bit range (`0x08..0x78`)
//! - SPI0 loopback of a fixed pattern (needs MOSI tied to MISO)
//! - one raw ADC conversion, reported in volts against a 3.3 V reference
//!
//! The checks only need `embedded-hal` traits, so the same [`BusSampler`] runs
//! on the board and in the simulator.

use embedded_hal::digital::OutputPin;
use embedded_hal::i2c::I2c;
use embedded_hal::spi::SpiBus;

/// First address read by [`scan_i2c`].
pub const I2C_SCAN_START: u8 = 0x08;
/// One past the last address read by [`scan_i2c`].
pub const I2C_SCAN_END: u8 = 0x78;

/// Bytes clocked out (and expected back) by [`spi_loopback`].
pub const SPI_LOOPBACK_PATTERN: [u8; 6] = [0xAA, 0x55, 0xF0, 0x0F, 0x12, 0x34];

/// Largest 12-bit conversion result.
pub const ADC_FULL_SCALE: u16 = 4095;
/// ADC reference in hundredths of a volt.
pub const ADC_VREF_CENTIVOLTS: u32 = 330;

// =============================================================================
// Checks
// =============================================================================

/// Result of one I2C bus scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2cScan {
    pub devices: u8,
    /// Lowest responding address.
    pub first: Option<u8>,
}

/// Read one byte from every address in `0x08..0x78`; an acknowledged read
/// counts as a device.
pub fn scan_i2c<I: I2c>(bus: &mut I) -> I2cScan {
    let mut scan = I2cScan::default();
    let mut byte = [0u8; 1];
    for address in I2C_SCAN_START..I2C_SCAN_END {
        if bus.read(address, &mut byte).is_ok() {
            scan.devices += 1;
            scan.first.get_or_insert(address);
        }
    }
    scan
}

/// Clock [`SPI_LOOPBACK_PATTERN`] out with CS held low and check that the same
/// bytes came back.
pub fn spi_loopback<SPI, CS>(
    spi: &mut SPI,
    cs: &mut CS,
) -> bool
where
    SPI: SpiBus,
    CS: OutputPin,
{
    let mut rx = [0u8; SPI_LOOPBACK_PATTERN.len()];
    cs.set_low().ok();
    let sent = spi.transfer(&mut rx, &SPI_LOOPBACK_PATTERN).is_ok() && spi.flush().is_ok();
    cs.set_high().ok();
    sent && rx == SPI_LOOPBACK_PATTERN
}

/// Raw 12-bit reading to hundredths of a volt, rounded to nearest.
pub const fn adc_centivolts(raw: u16) -> u32 {
    let raw = if raw > ADC_FULL_SCALE { ADC_FULL_SCALE } else { raw };
    (raw as u32 * ADC_VREF_CENTIVOLTS + ADC_FULL_SCALE as u32 / 2) / ADC_FULL_SCALE as u32
}

// =============================================================================
// Sample
// =============================================================================

/// Everything a heartbeat reports about the expansion header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusSample {
    pub i2c: I2cScan,
    pub spi_loopback_ok: bool,
    /// `None` when the conversion failed.
    pub adc_raw: Option<u16>,
}

impl StatusSample {
    /// First I2C address, 0 when the bus is empty.
    #[inline]
    pub fn first_i2c_or_zero(&self) -> u8 { self.i2c.first.unwrap_or(0) }

    #[inline]
    pub const fn spi_loop_label(&self) -> &'static str { if self.spi_loopback_ok { "ok" } else { "check wiring" } }

    /// ADC input in hundredths of a volt (0 when the conversion failed).
    pub fn adc_centivolts(&self) -> u32 { self.adc_raw.map_or(0, adc_centivolts) }
}

/// One-shot ADC conversion.
pub trait AdcInput {
    fn read_raw(&mut self) -> Option<u16>;
}

/// Source of heartbeat status samples.
pub trait StatusSampler {
    fn sample(&mut self) -> StatusSample;
}

/// Sampler over an I2C bus, a full-duplex SPI bus with its chip-select and
/// one ADC input.
pub struct BusSampler<I, SPI, CS, A> {
    i2c: I,
    spi: SPI,
    cs: CS,
    adc: A,
}

impl<I, SPI, CS, A> BusSampler<I, SPI, CS, A>
where
    I: I2c,
    SPI: SpiBus,
    CS: OutputPin,
    A: AdcInput,
{
    /// Take the buses. Chip-select is released straight away.
    pub fn new(
        i2c: I,
        spi: SPI,
        mut cs: CS,
        adc: A,
    ) -> Self {
        cs.set_high().ok();
        Self { i2c, spi, cs, adc }
    }
}

impl<I, SPI, CS, A> StatusSampler for BusSampler<I, SPI, CS, A>
where
    I: I2c,
    SPI: SpiBus,
    CS: OutputPin,
    A: AdcInput,
{
    fn sample(&mut self) -> StatusSample {
        StatusSample {
            i2c: scan_i2c(&mut self.i2c),
            spi_loopback_ok: spi_loopback(&mut self.spi, &mut self.cs),
            adc_raw: self.adc.read_raw(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
