//! Expansion-header status checks sampled by the heartbeats.
//!
//! I2C0 on GPIO4/5, SPI0 on GPIO16/17/18/19 (loopback needs GPIO19 jumpered
//! to GPIO16) and ADC0 on GPIO26. The sampler lives behind an async mutex so
//! two heartbeats never scan the bus at the same time.

use embassy_rp::Peri;
use embassy_rp::adc::{self, Adc, Channel};
use embassy_rp::gpio::{Level, Output, Pull};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::{ADC, I2C0, PIN_4, PIN_5, PIN_16, PIN_17, PIN_18, PIN_19, PIN_26, SPI0};
use embassy_rp::spi::{self, Spi};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use geek_lcd_common::status::{AdcInput, BusSampler, StatusSample, StatusSampler};
use geek_lcd_pico2::board::{STATUS_I2C_FREQUENCY_HZ, STATUS_SPI_FREQUENCY_HZ};

/// ADC0 on GPIO26.
pub struct BoardAdc {
    adc: Adc<'static, adc::Blocking>,
    channel: Channel<'static>,
}

impl AdcInput for BoardAdc {
    fn read_raw(&mut self) -> Option<u16> { self.adc.blocking_read(&mut self.channel).ok() }
}

pub type BoardSampler =
    BusSampler<I2c<'static, I2C0, i2c::Blocking>, Spi<'static, SPI0, spi::Blocking>, Output<'static>, BoardAdc>;

static SAMPLER: Mutex<CriticalSectionRawMutex, Option<BoardSampler>> = Mutex::new(None);

/// Peripherals the status checks take over.
pub struct StatusPeripherals {
    pub i2c: Peri<'static, I2C0>,
    pub sda: Peri<'static, PIN_4>,
    pub scl: Peri<'static, PIN_5>,
    pub spi: Peri<'static, SPI0>,
    pub miso: Peri<'static, PIN_16>,
    pub cs: Peri<'static, PIN_17>,
    pub sck: Peri<'static, PIN_18>,
    pub mosi: Peri<'static, PIN_19>,
    pub adc: Peri<'static, ADC>,
    pub adc_pin: Peri<'static, PIN_26>,
}

/// Bring up the three buses and park the sampler for the heartbeats.
pub async fn install_sampler(p: StatusPeripherals) {
    let mut i2c_config = i2c::Config::default();
    i2c_config.frequency = STATUS_I2C_FREQUENCY_HZ;
    let i2c = I2c::new_blocking(p.i2c, p.scl, p.sda, i2c_config);

    let mut spi_config = spi::Config::default();
    spi_config.frequency = STATUS_SPI_FREQUENCY_HZ;
    let spi = Spi::new_blocking(p.spi, p.sck, p.mosi, p.miso, spi_config);
    let cs = Output::new(p.cs, Level::High);

    let adc = BoardAdc {
        adc: Adc::new_blocking(p.adc, adc::Config::default()),
        channel: Channel::new_pin(p.adc_pin, Pull::None),
    };

    *SAMPLER.lock().await = Some(BusSampler::new(i2c, spi, cs, adc));
}

/// Run all checks, or `None` before [`install_sampler`].
pub async fn sample_status() -> Option<StatusSample> { SAMPLER.lock().await.as_mut().map(StatusSampler::sample) }
