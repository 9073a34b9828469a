//! Host stand-ins for the expansion-header buses the heartbeats check.
//!
//! The I2C bus acknowledges a fixed set of addresses, the SPI bus echoes what
//! it sends when the loopback jumper is fitted and reads zeros otherwise, and
//! the ADC returns one fixed conversion.

use std::convert::Infallible;
use std::sync::{Arc, Mutex};

use embedded_hal::i2c::{ErrorKind, ErrorType as I2cErrorType, I2c, NoAcknowledgeSource, Operation};
use embedded_hal::spi::{ErrorType as SpiErrorType, SpiBus};
use geek_lcd_common::status::{AdcInput, BusSampler, StatusSample, StatusSampler};

use crate::hal::SimPin;

/// I2C bus with devices at fixed addresses. Reads from a device return zeros.
#[derive(Debug, Clone, Default)]
pub struct SimI2c {
    devices: Vec<u8>,
}

impl SimI2c {
    pub fn new(devices: &[u8]) -> Self { Self { devices: devices.to_vec() } }
}

impl I2cErrorType for SimI2c {
    type Error = ErrorKind;
}

impl I2c for SimI2c {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        if !self.devices.contains(&address) {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }
        for op in operations {
            if let Operation::Read(buf) = op {
                buf.fill(0);
            }
        }
        Ok(())
    }
}

/// Full-duplex SPI bus with an optional MOSI-to-MISO jumper.
#[derive(Debug, Clone, Copy)]
pub struct LoopbackSpi {
    jumpered: bool,
}

impl LoopbackSpi {
    pub fn new(jumpered: bool) -> Self { Self { jumpered } }
}

impl SpiErrorType for LoopbackSpi {
    type Error = Infallible;
}

impl SpiBus for LoopbackSpi {
    fn read(
        &mut self,
        words: &mut [u8],
    ) -> Result<(), Self::Error> {
        words.fill(0);
        Ok(())
    }

    fn write(
        &mut self,
        _words: &[u8],
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    fn transfer(
        &mut self,
        read: &mut [u8],
        write: &[u8],
    ) -> Result<(), Self::Error> {
        read.fill(0);
        if self.jumpered {
            let n = read.len().min(write.len());
            read[..n].copy_from_slice(&write[..n]);
        }
        Ok(())
    }

    fn transfer_in_place(
        &mut self,
        words: &mut [u8],
    ) -> Result<(), Self::Error> {
        if !self.jumpered {
            words.fill(0);
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> { Ok(()) }
}

/// ADC input held at one raw reading.
#[derive(Debug, Clone, Copy)]
pub struct SimAdc {
    raw: u16,
}

impl SimAdc {
    pub fn new(raw: u16) -> Self { Self { raw } }
}

impl AdcInput for SimAdc {
    fn read_raw(&mut self) -> Option<u16> { Some(self.raw) }
}

pub type SimSampler = BusSampler<SimI2c, LoopbackSpi, SimPin, SimAdc>;

/// Sampler shared by all heartbeat threads.
pub type SharedSampler = Arc<Mutex<SimSampler>>;

/// What the simulated expansion header looks like.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusSetup {
    pub i2c_devices: Vec<u8>,
    pub spi_jumper: bool,
    pub adc_raw: u16,
}

impl Default for BusSetup {
    fn default() -> Self { Self { i2c_devices: Vec::new(), spi_jumper: true, adc_raw: 2048 } }
}

impl BusSetup {
    pub fn sampler(&self) -> SharedSampler {
        Arc::new(Mutex::new(BusSampler::new(
            SimI2c::new(&self.i2c_devices),
            LoopbackSpi::new(self.spi_jumper),
            SimPin::new("SPI0_CS", true),
            SimAdc::new(self.adc_raw),
        )))
    }
}

/// Take one sample; `None` if another thread panicked while sampling.
pub fn sample(sampler: &SharedSampler) -> Option<StatusSample> { sampler.lock().ok().map(|mut s| s.sample()) }

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use geek_lcd_common::status::I2cScan;

    use super::*;

    #[test]
    fn test_default_setup_passes_loopback() {
        let status = sample(&BusSetup::default().sampler()).unwrap();
        assert_eq!(status.i2c, I2cScan { devices: 0, first: None });
        assert!(status.spi_loopback_ok);
        assert_eq!(status.adc_centivolts(), 165);
    }

    #[test]
    fn test_missing_jumper_fails_loopback() {
        let setup = BusSetup { i2c_devices: vec![0x6B, 0x3C], spi_jumper: false, adc_raw: 0 };
        let status = sample(&setup.sampler()).unwrap();
        assert_eq!(status.i2c, I2cScan { devices: 2, first: Some(0x3C) });
        assert!(!status.spi_loopback_ok);
        assert_eq!(status.spi_loop_label(), "check wiring");
    }

    #[test]
    fn test_absent_address_is_not_acknowledged() {
        let mut bus = SimI2c::new(&[0x50]);
        let mut byte = [0xFF];
        assert!(bus.read(0x51, &mut byte).is_err());
        assert!(bus.read(0x50, &mut byte).is_ok());
        assert_eq!(byte, [0]);
    }
}
