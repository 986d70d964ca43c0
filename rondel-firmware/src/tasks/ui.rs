//! Render loop task
//!
//! Polls the encoder accumulator and button level each tick (the same
//! diff-since-last-poll contract an input layer like LVGL expects),
//! renders a trivial test pattern into its frame buffer and drives the
//! flush pipeline. Scene composition is deliberately minimal here; the
//! interesting part is the flush contract, not the pixels.

use defmt::*;
use embassy_rp::gpio::{Input, Output};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_time::{Delay, Duration, Ticker};
use portable_atomic::{AtomicU32, Ordering};

use rondel_drivers::button::PushButton;
use rondel_drivers::flush::FrameFlusher;
use rondel_drivers::gc9a01::Gc9a01;
use rondel_core::traits::Rect;

use crate::channels::ENCODER;
use crate::panel_io::SpiPanelIo;

/// Panel resolution
pub const LCD_H_RES: usize = 240;
pub const LCD_V_RES: usize = 240;

/// One full RGB565 frame
pub const FRAME_BYTES: usize = LCD_H_RES * LCD_V_RES * 2;
pub type FrameBuffer = [u8; FRAME_BYTES];

/// Concrete panel and flusher types for this board
pub type KnobPanel = Gc9a01<SpiPanelIo<'static>, Output<'static>, Delay>;
pub type KnobFlusher = FrameFlusher<'static, KnobPanel, CriticalSectionRawMutex>;

/// Frames whose buffers have been handed back by the flush pipeline
static FRAMES_FLUSHED: AtomicU32 = AtomicU32::new(0);

fn mark_buffer_free() {
    FRAMES_FLUSHED.fetch_add(1, Ordering::Relaxed);
}

/// Simple step palette; one entry per encoder detent
const PALETTE: [u16; 8] = [
    0xF800, // red
    0xFD20, // orange
    0xFFE0, // yellow
    0x07E0, // green
    0x07FF, // cyan
    0x001F, // blue
    0x781F, // violet
    0xFFFF, // white
];

fn knob_color(value: i32, pressed: bool) -> u16 {
    let color = PALETTE[value.rem_euclid(PALETTE.len() as i32) as usize];
    if pressed {
        !color
    } else {
        color
    }
}

fn fill(frame: &mut FrameBuffer, color: u16) {
    for px in frame.chunks_exact_mut(2) {
        px.copy_from_slice(&color.to_be_bytes());
    }
}

#[embassy_executor::task]
pub async fn ui_task(
    mut flusher: KnobFlusher,
    mut button: PushButton<Input<'static>>,
    frame: &'static mut FrameBuffer,
) {
    info!("UI task started");

    flusher.register_flush_done(&mark_buffer_free);

    let mut ticker = Ticker::every(Duration::from_millis(16));
    let mut last_value = ENCODER.get();
    let mut last_pressed = button.is_pressed();
    let mut dirty = true;

    loop {
        let value = ENCODER.get();
        let diff = value - last_value;
        let pressed = button.is_pressed();

        if diff != 0 || pressed != last_pressed {
            debug!("Encoder value {} (diff {}), pressed {}", value, diff, pressed);
            last_value = value;
            last_pressed = pressed;
            dirty = true;
        }

        if dirty {
            fill(frame, knob_color(value, pressed));
            let area = Rect::new(0, 0, LCD_H_RES as u16, LCD_V_RES as u16);
            match flusher.flush(area, frame).await {
                Ok(()) => {
                    trace!("Frame {} flushed", FRAMES_FLUSHED.load(Ordering::Relaxed));
                    dirty = false;
                }
                Err(e) => {
                    // Repeated I/O failure here is fatal to the panel
                    // session; keep logging rather than half-render
                    error!("Flush failed: {:?}", e);
                }
            }
        }

        ticker.next().await;
    }
}
