use anyhow::{bail, Result};
use rppal::spi::{Bus, Mode, SlaveSelect, Spi};

/// Full-scale 12-bit conversion value.
pub const ADC_MAX: u16 = 4095;

pub struct AdcReader {
    spi: Spi,
}

impl AdcReader {
    pub fn new() -> Result<Self> {
        let spi = Spi::new(Bus::Spi0, SlaveSelect::Ss0, 1_000_000, Mode::Mode0)?;
        println!("MCP3208 ADC initialized on SPI0.0");
        Ok(AdcReader { spi })
    }

    /// Single-ended conversion on one of the eight input channels.
    pub fn read_channel(&mut self, channel: u8) -> Result<u16> {
        if channel >= 8 {
            bail!("Channel must be 0-7");
        }

        // Start bit + single-ended mode, then the channel number, MSB first.
        let tx_buffer = [
            0x06 | (channel >> 2),
            (channel & 0x03) << 6,
            0x00,
        ];
        let mut rx_buffer = [0u8; 3];

        self.spi.transfer(&mut rx_buffer, &tx_buffer)?;

        let value = (((rx_buffer[1] & 0x0F) as u16) << 8) | (rx_buffer[2] as u16);
        Ok(value)
    }
}
