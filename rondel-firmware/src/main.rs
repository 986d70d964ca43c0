//! Rondel - Smart Knob Firmware
//!
//! Main firmware binary for RP2040-based knob controllers: a rotary
//! encoder with push button wrapped around a round GC9A01 LCD. Encoder
//! edges are relayed through a bounded queue to a decoder task; frames
//! are flushed to the panel synchronized to its tearing-effect line.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::spi::{self, Spi};
use embassy_time::Delay;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use rondel_core::input::Phase;
use rondel_core::traits::{ColorOrder, Panel, PanelConfig, PanelError};
use rondel_drivers::button::PushButton;
use rondel_drivers::flush::FrameFlusher;
use rondel_drivers::gc9a01::Gc9a01;

use crate::channels::TEAR_GATE;
use crate::panel_io::SpiPanelIo;
use crate::tasks::ui::{FrameBuffer, KnobPanel, FRAME_BYTES};

mod channels;
mod panel_io;
mod tasks;

/// SPI clock for the panel; the GC9A01 write path is comfortable here
const LCD_PIXEL_CLOCK_HZ: u32 = 62_500_000;

/// Synchronize every flush to the blanking interval (tear avoidance)
const FULL_REFRESH: bool = true;

// Frame buffer and backlight pin must live forever
static FRAME: StaticCell<FrameBuffer> = StaticCell::new();
static BACKLIGHT: StaticCell<Output<'static>> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Rondel firmware starting...");

    let p = embassy_rp::init(Default::default());

    // Panel SPI (SPI1: SCLK=GP10, MOSI=GP11) with DMA-backed writes
    let mut spi_config = spi::Config::default();
    spi_config.frequency = LCD_PIXEL_CLOCK_HZ;
    let lcd_spi = Spi::new_txonly(p.SPI1, p.PIN_10, p.PIN_11, p.DMA_CH0, spi_config);

    let dc = Output::new(p.PIN_8, Level::Low);
    let cs = Output::new(p.PIN_9, Level::High);
    let rst = Output::new(p.PIN_12, Level::High);

    info!("Install GC9A01 panel driver");
    let io = SpiPanelIo::new(lcd_spi, dc, cs);
    let panel_config = PanelConfig {
        color_order: ColorOrder::Rgb,
        bits_per_pixel: 16,
        reset_active_high: false,
    };
    let mut panel: KnobPanel = Gc9a01::new(io, Some(rst), Delay, panel_config).unwrap();

    if let Err(e) = bring_up(&mut panel).await {
        error!("Panel bring-up failed: {:?}", e);
    }

    // Backlight solid on; duty-cycle dimming is not this firmware's job
    BACKLIGHT.init(Output::new(p.PIN_25, Level::High));

    // TE line from the panel, toggling with its refresh window
    let te = Input::new(p.PIN_21, Pull::None);

    // EC11 encoder with integrated push button
    let enc_a = Input::new(p.PIN_14, Pull::Up);
    let enc_b = Input::new(p.PIN_15, Pull::Up);
    let initial_a = enc_a.is_high();
    let initial_b = enc_b.is_high();
    let button = PushButton::new(Input::new(p.PIN_16, Pull::Up));

    let flusher = FrameFlusher::new(panel, &TEAR_GATE, FULL_REFRESH);
    let frame = FRAME.init([0; FRAME_BYTES]);

    spawner
        .spawn(tasks::input::edge_relay_task(enc_a, Phase::A))
        .unwrap();
    spawner
        .spawn(tasks::input::edge_relay_task(enc_b, Phase::B))
        .unwrap();
    spawner
        .spawn(tasks::input::decoder_task(initial_a, initial_b))
        .unwrap();
    spawner.spawn(tasks::tear::tear_watch_task(te)).unwrap();
    spawner
        .spawn(tasks::ui::ui_task(flusher, button, frame))
        .unwrap();

    info!("All tasks spawned");
}

/// Panel session bring-up: reset, vendor init, inversion, output on
///
/// Creation-time failures abort before any of this runs; transport
/// failures here are fatal to the panel session.
async fn bring_up(panel: &mut KnobPanel) -> Result<(), PanelError<spi::Error>> {
    panel.reset().await?;
    panel.init().await?;
    // This module wants inversion on for correct colors
    panel.invert(true).await?;
    panel.power(true).await?;
    Ok(())
}
