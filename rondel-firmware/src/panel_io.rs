//! SPI transport for the panel command protocol
//!
//! 8-bit commands and parameters with a separate data/command line, the
//! classic 4-wire panel wiring. Pixel streams go out through the same
//! path; the DMA-backed write resolving is the transfer-completion
//! signal the flush pipeline relies on.

use embassy_rp::gpio::Output;
use embassy_rp::spi::{self, Async, Spi};

use rondel_core::traits::PanelIo;

/// Panel command/parameter transport over SPI + D/C + CS
pub struct SpiPanelIo<'d> {
    spi: Spi<'d, Async>,
    dc: Output<'d>,
    cs: Output<'d>,
}

impl<'d> SpiPanelIo<'d> {
    pub fn new(spi: Spi<'d, Async>, dc: Output<'d>, cs: Output<'d>) -> Self {
        Self { spi, dc, cs }
    }
}

impl<'d> PanelIo for SpiPanelIo<'d> {
    type Error = spi::Error;

    async fn write_command(&mut self, cmd: u8, params: &[u8]) -> Result<(), spi::Error> {
        self.cs.set_low();
        self.dc.set_low();
        let mut result = self.spi.write(&[cmd]).await;
        if result.is_ok() && !params.is_empty() {
            self.dc.set_high();
            result = self.spi.write(params).await;
        }
        self.cs.set_high();
        result
    }

    async fn write_pixels(&mut self, cmd: u8, pixels: &[u8]) -> Result<(), spi::Error> {
        self.cs.set_low();
        self.dc.set_low();
        let mut result = self.spi.write(&[cmd]).await;
        if result.is_ok() {
            self.dc.set_high();
            result = self.spi.write(pixels).await;
        }
        self.cs.set_high();
        result
    }
}
