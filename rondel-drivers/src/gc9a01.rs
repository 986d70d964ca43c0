//! GC9A01 LCD panel driver
//!
//! Driver for 240x240 round GC9A01-based panels behind a command/parameter
//! transport (SPI + D/C line in practice). Implements the [`Panel`]
//! capability set: reset, vendor init replay, addressing-window pixel
//! streaming, inversion, mirroring, axis swap and gap offsets.

use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;

use rondel_core::traits::{ColorOrder, Panel, PanelConfig, PanelError, PanelIo, Rect};

/// GC9A01 command set (shared MIPI DCS opcodes)
mod cmd {
    pub const SWRESET: u8 = 0x01;
    pub const SLPOUT: u8 = 0x11;
    pub const INVOFF: u8 = 0x20;
    pub const INVON: u8 = 0x21;
    pub const DISPOFF: u8 = 0x28;
    pub const DISPON: u8 = 0x29;
    pub const CASET: u8 = 0x2A;
    pub const RASET: u8 = 0x2B;
    pub const RAMWR: u8 = 0x2C;
    pub const TEON: u8 = 0x35;
    pub const MADCTL: u8 = 0x36;
    pub const STE: u8 = 0x44;
    pub const COLMOD: u8 = 0x3A;
}

/// MADCTL mode-control bits
const MADCTL_MY: u8 = 0x80;
const MADCTL_MX: u8 = 0x40;
const MADCTL_MV: u8 = 0x20;
const MADCTL_BGR: u8 = 0x08;

/// COLMOD values for the supported pixel formats
const COLMOD_16BPP: u8 = 0x55;
const COLMOD_18BPP: u8 = 0x66;

/// Vendor-specific init sequence
///
/// Panel tuning (inter-register access, gamma, voltage, charge pump and
/// TE timing) straight from the controller vendor. The sequence must be
/// replayed byte-for-byte and in order; reordering or omission risks
/// visually wrong output, not protocol failure.
const VENDOR_INIT: &[(u8, &[u8])] = &[
    // Enable inter-register access
    (0xfe, &[]),
    (0xef, &[]),
    (0xeb, &[0x14]),
    (0x84, &[0x60]),
    (0x85, &[0xff]),
    (0x86, &[0xff]),
    (0x87, &[0xff]),
    (0x8e, &[0xff]),
    (0x8f, &[0xff]),
    (0x88, &[0x0a]),
    (0x89, &[0x21]),
    (0x8a, &[0x00]),
    (0x8b, &[0x80]),
    (0x8c, &[0x01]),
    (0x8d, &[0x03]),
    (0xb5, &[0x08, 0x09, 0x14, 0x08]),
    (0xb6, &[0x00, 0x00]),
    (cmd::MADCTL, &[0x48]),
    (cmd::COLMOD, &[0x05]),
    (0x90, &[0x08, 0x08, 0x08, 0x08]),
    (0xbd, &[0x06]),
    (0xba, &[0x01]),
    (0xbc, &[0x00]),
    (0xff, &[0x60, 0x01, 0x04]),
    (0xc3, &[0x13]),
    (0xc4, &[0x13]),
    (0xc9, &[0x25]),
    (0xbe, &[0x11]),
    (0xe1, &[0x10, 0x0e]),
    (0xdf, &[0x21, 0x0c, 0x02]),
    // Gamma curves
    (0xf0, &[0x45, 0x09, 0x08, 0x08, 0x26, 0x2a]),
    (0xf1, &[0x43, 0x70, 0x72, 0x36, 0x37, 0x6f]),
    (0xf2, &[0x45, 0x09, 0x08, 0x08, 0x26, 0x2a]),
    (0xf3, &[0x43, 0x70, 0x72, 0x36, 0x37, 0x6f]),
    (0xed, &[0x1b, 0x0b]),
    (0xae, &[0x77]),
    (0xcd, &[0x63]),
    (0x70, &[0x07, 0x07, 0x04, 0x0e, 0x0f, 0x09, 0x07, 0x08, 0x03]),
    (0xe8, &[0x04]),
    (0x62, &[0x18, 0x0d, 0x71, 0xed, 0x70, 0x70, 0x18, 0x0f, 0x71, 0xef, 0x70, 0x70]),
    (0x63, &[0x18, 0x11, 0x71, 0xf1, 0x70, 0x70, 0x18, 0x13, 0x71, 0xf3, 0x70, 0x70]),
    (0x64, &[0x28, 0x29, 0xf1, 0x01, 0xf1, 0x00, 0x07]),
    (0x66, &[0x3c, 0x00, 0xcd, 0x67, 0x45, 0x45, 0x10, 0x00, 0x00, 0x00]),
    (0x67, &[0x00, 0x3c, 0x00, 0x00, 0x00, 0x01, 0x54, 0x10, 0x32, 0x98]),
    (0x74, &[0x10, 0x85, 0x80, 0x00, 0x00, 0x4e, 0x00]),
    (0x98, &[0x3e, 0x07]),
    (0x99, &[0x3e, 0x07]),
    // Tearing effect line on, V-blanking only, with tear scanline
    (cmd::TEON, &[0x00]),
    (cmd::STE, &[0x00, 0x4a]),
    (cmd::INVON, &[]),
    (cmd::CASET, &[0x00, 0x00, 0x00, 0xef]),
    (cmd::RASET, &[0x00, 0x00, 0x00, 0xef]),
    (cmd::RAMWR, &[]),
    (cmd::SLPOUT, &[]),
    (cmd::DISPON, &[]),
];

/// GC9A01 panel driver
///
/// Owns the command transport, the optional reset pin and a delay
/// provider for reset settle times. The MADCTL and COLMOD shadow bytes
/// live here; dropping the driver releases the reset pin.
pub struct Gc9a01<IO, RST, D> {
    io: IO,
    reset_pin: Option<RST>,
    delay: D,
    reset_active_high: bool,
    x_gap: u16,
    y_gap: u16,
    bits_per_pixel: u8,
    madctl: u8,
    colmod: u8,
}

impl<IO, RST, D> Gc9a01<IO, RST, D>
where
    IO: PanelIo,
    RST: OutputPin,
    D: DelayNs,
{
    /// Create a new GC9A01 driver
    ///
    /// Fails with [`PanelError::NotSupported`] for bit depths other than
    /// 16 or 18; on failure nothing is half-constructed and the reset pin
    /// is released (dropped) rather than left configured.
    pub fn new(
        io: IO,
        reset_pin: Option<RST>,
        delay: D,
        config: PanelConfig,
    ) -> Result<Self, PanelError<IO::Error>> {
        let colmod = match config.bits_per_pixel {
            16 => COLMOD_16BPP,
            18 => COLMOD_18BPP,
            _ => return Err(PanelError::NotSupported),
        };

        let madctl = match config.color_order {
            ColorOrder::Rgb => 0x00,
            ColorOrder::Bgr => MADCTL_BGR,
        };

        Ok(Self {
            io,
            reset_pin,
            delay,
            reset_active_high: config.reset_active_high,
            x_gap: 0,
            y_gap: 0,
            bits_per_pixel: config.bits_per_pixel,
            madctl,
            colmod,
        })
    }

    /// Stored COLMOD value for the configured pixel format
    pub fn color_format(&self) -> u8 {
        self.colmod
    }

    async fn write_madctl(&mut self) -> Result<(), PanelError<IO::Error>> {
        self.io.write_command(cmd::MADCTL, &[self.madctl]).await?;
        Ok(())
    }
}

impl<IO, RST, D> Panel for Gc9a01<IO, RST, D>
where
    IO: PanelIo,
    RST: OutputPin,
    D: DelayNs,
{
    type Error = PanelError<IO::Error>;

    async fn reset(&mut self) -> Result<(), Self::Error> {
        if let Some(rst) = self.reset_pin.as_mut() {
            if self.reset_active_high {
                let _ = rst.set_high();
            } else {
                let _ = rst.set_low();
            }
            self.delay.delay_ms(10).await;
            if self.reset_active_high {
                let _ = rst.set_low();
            } else {
                let _ = rst.set_high();
            }
            self.delay.delay_ms(10).await;
        } else {
            self.io.write_command(cmd::SWRESET, &[]).await?;
            // Datasheet mandates at least 5ms before the next command
            self.delay.delay_ms(20).await;
        }
        Ok(())
    }

    async fn init(&mut self) -> Result<(), Self::Error> {
        for &(command, params) in VENDOR_INIT {
            self.io.write_command(command, params).await?;
        }
        Ok(())
    }

    async fn draw_window(&mut self, area: Rect, pixels: &[u8]) -> Result<(), Self::Error> {
        assert!(
            area.x0 < area.x1 && area.y0 < area.y1,
            "window start must be smaller than end"
        );

        let len =
            area.width() as usize * area.height() as usize * self.bits_per_pixel as usize / 8;
        if pixels.len() < len {
            return Err(PanelError::InvalidArgument);
        }

        let x_start = area.x0 as u32 + self.x_gap as u32;
        let x_end = area.x1 as u32 + self.x_gap as u32;
        let y_start = area.y0 as u32 + self.y_gap as u32;
        let y_end = area.y1 as u32 + self.y_gap as u32;

        // Frame memory window the pixel stream applies to; the address
        // registers take inclusive big-endian 16-bit bounds.
        self.io
            .write_command(
                cmd::CASET,
                &[
                    (x_start >> 8) as u8,
                    x_start as u8,
                    ((x_end - 1) >> 8) as u8,
                    (x_end - 1) as u8,
                ],
            )
            .await?;
        self.io
            .write_command(
                cmd::RASET,
                &[
                    (y_start >> 8) as u8,
                    y_start as u8,
                    ((y_end - 1) >> 8) as u8,
                    (y_end - 1) as u8,
                ],
            )
            .await?;
        self.io.write_pixels(cmd::RAMWR, &pixels[..len]).await?;

        Ok(())
    }

    async fn invert(&mut self, on: bool) -> Result<(), Self::Error> {
        let command = if on { cmd::INVON } else { cmd::INVOFF };
        self.io.write_command(command, &[]).await?;
        Ok(())
    }

    async fn mirror(&mut self, mirror_x: bool, mirror_y: bool) -> Result<(), Self::Error> {
        if mirror_x {
            self.madctl |= MADCTL_MX;
        } else {
            self.madctl &= !MADCTL_MX;
        }
        if mirror_y {
            self.madctl |= MADCTL_MY;
        } else {
            self.madctl &= !MADCTL_MY;
        }
        self.write_madctl().await
    }

    async fn swap_axes(&mut self, swap: bool) -> Result<(), Self::Error> {
        if swap {
            self.madctl |= MADCTL_MV;
        } else {
            self.madctl &= !MADCTL_MV;
        }
        self.write_madctl().await
    }

    fn set_gap(&mut self, x_gap: u16, y_gap: u16) {
        self.x_gap = x_gap;
        self.y_gap = y_gap;
    }

    async fn power(&mut self, on: bool) -> Result<(), Self::Error> {
        let command = if on { cmd::DISPON } else { cmd::DISPOFF };
        self.io.write_command(command, &[]).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use core::sync::atomic::{AtomicBool, Ordering};
    use embassy_futures::block_on;
    use heapless::Vec;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Op {
        Command(u8, Vec<u8, 16>),
        Pixels(u8, usize),
    }

    #[derive(Default)]
    struct RecordingIo {
        ops: Vec<Op, 64>,
    }

    impl PanelIo for RecordingIo {
        type Error = Infallible;

        async fn write_command(&mut self, cmd: u8, params: &[u8]) -> Result<(), Infallible> {
            let mut data = Vec::new();
            data.extend_from_slice(params).unwrap();
            self.ops.push(Op::Command(cmd, data)).unwrap();
            Ok(())
        }

        async fn write_pixels(&mut self, cmd: u8, pixels: &[u8]) -> Result<(), Infallible> {
            self.ops.push(Op::Pixels(cmd, pixels.len())).unwrap();
            Ok(())
        }
    }

    static RESET_PIN_RELEASED: AtomicBool = AtomicBool::new(false);

    struct MockResetPin;

    impl Drop for MockResetPin {
        fn drop(&mut self) {
            RESET_PIN_RELEASED.store(true, Ordering::Relaxed);
        }
    }

    impl embedded_hal::digital::ErrorType for MockResetPin {
        type Error = Infallible;
    }

    impl OutputPin for MockResetPin {
        fn set_high(&mut self) -> Result<(), Infallible> {
            Ok(())
        }

        fn set_low(&mut self) -> Result<(), Infallible> {
            Ok(())
        }
    }

    struct NoDelay;

    impl DelayNs for NoDelay {
        async fn delay_ns(&mut self, _ns: u32) {}
    }

    fn panel_16bpp() -> Gc9a01<RecordingIo, MockResetPin, NoDelay> {
        Gc9a01::new(
            RecordingIo::default(),
            None,
            NoDelay,
            PanelConfig::default(),
        )
        .unwrap()
    }

    fn command(cmd: u8, params: &[u8]) -> Op {
        Op::Command(cmd, Vec::from_slice(params).unwrap())
    }

    #[test]
    fn draw_window_emits_inclusive_big_endian_bounds() {
        let mut panel = panel_16bpp();
        let pixels = [0u8; 40 * 40 * 2];

        block_on(panel.draw_window(Rect::new(10, 10, 50, 50), &pixels)).unwrap();

        assert_eq!(
            panel.io.ops.as_slice(),
            &[
                command(cmd::CASET, &[0x00, 0x0A, 0x00, 0x31]),
                command(cmd::RASET, &[0x00, 0x0A, 0x00, 0x31]),
                Op::Pixels(cmd::RAMWR, 40 * 40 * 2),
            ]
        );
    }

    #[test]
    fn draw_window_applies_gap_offsets() {
        let mut panel = panel_16bpp();
        let pixels = [0u8; 4 * 4 * 2];

        panel.set_gap(3, 7);
        block_on(panel.draw_window(Rect::new(0, 0, 4, 4), &pixels)).unwrap();

        assert_eq!(
            panel.io.ops[0],
            command(cmd::CASET, &[0x00, 0x03, 0x00, 0x06])
        );
        assert_eq!(
            panel.io.ops[1],
            command(cmd::RASET, &[0x00, 0x07, 0x00, 0x0A])
        );
    }

    #[test]
    #[should_panic(expected = "window start must be smaller than end")]
    fn draw_window_rejects_non_monotonic_coordinates() {
        let mut panel = panel_16bpp();
        let pixels = [0u8; 0];

        let _ = block_on(panel.draw_window(Rect::new(50, 10, 50, 50), &pixels));
    }

    #[test]
    fn draw_window_rejects_short_pixel_buffer() {
        let mut panel = panel_16bpp();
        let pixels = [0u8; 8];

        let result = block_on(panel.draw_window(Rect::new(0, 0, 4, 4), &pixels));

        assert_eq!(result, Err(PanelError::InvalidArgument));
        // Precondition failed before any command went out
        assert!(panel.io.ops.is_empty());
    }

    #[test]
    fn unsupported_bit_depth_fails_and_releases_reset_pin() {
        RESET_PIN_RELEASED.store(false, Ordering::Relaxed);

        let config = PanelConfig {
            bits_per_pixel: 24,
            ..PanelConfig::default()
        };
        let result = Gc9a01::new(
            RecordingIo::default(),
            Some(MockResetPin),
            NoDelay,
            config,
        );

        assert!(matches!(result, Err(PanelError::NotSupported)));
        assert!(RESET_PIN_RELEASED.load(Ordering::Relaxed));
    }

    #[test]
    fn supported_bit_depths_select_colmod() {
        let panel = panel_16bpp();
        assert_eq!(panel.color_format(), COLMOD_16BPP);

        let config = PanelConfig {
            bits_per_pixel: 18,
            ..PanelConfig::default()
        };
        let panel: Gc9a01<_, MockResetPin, _> =
            Gc9a01::new(RecordingIo::default(), None, NoDelay, config).unwrap();
        assert_eq!(panel.color_format(), COLMOD_18BPP);
    }

    #[test]
    fn mirror_and_swap_preserve_color_order_bit() {
        let config = PanelConfig {
            color_order: ColorOrder::Bgr,
            ..PanelConfig::default()
        };
        let mut panel: Gc9a01<_, MockResetPin, _> =
            Gc9a01::new(RecordingIo::default(), None, NoDelay, config).unwrap();

        block_on(panel.mirror(true, false)).unwrap();
        block_on(panel.swap_axes(true)).unwrap();

        assert_eq!(
            panel.io.ops.as_slice(),
            &[
                command(cmd::MADCTL, &[MADCTL_BGR | MADCTL_MX]),
                command(cmd::MADCTL, &[MADCTL_BGR | MADCTL_MX | MADCTL_MV]),
            ]
        );
    }

    #[test]
    fn mirror_clears_previously_set_axes() {
        let mut panel = panel_16bpp();

        block_on(panel.mirror(true, true)).unwrap();
        block_on(panel.mirror(false, true)).unwrap();

        assert_eq!(
            panel.io.ops.as_slice(),
            &[
                command(cmd::MADCTL, &[MADCTL_MX | MADCTL_MY]),
                command(cmd::MADCTL, &[MADCTL_MY]),
            ]
        );
    }

    #[test]
    fn init_replays_vendor_sequence_in_order() {
        let mut panel = panel_16bpp();

        block_on(panel.init()).unwrap();

        assert_eq!(panel.io.ops.len(), VENDOR_INIT.len());
        for (op, &(command_byte, params)) in panel.io.ops.iter().zip(VENDOR_INIT) {
            assert_eq!(*op, command(command_byte, params));
        }
        // The sequence ends by waking the panel and enabling output
        assert_eq!(panel.io.ops[VENDOR_INIT.len() - 2], command(cmd::SLPOUT, &[]));
        assert_eq!(panel.io.ops[VENDOR_INIT.len() - 1], command(cmd::DISPON, &[]));
    }

    #[test]
    fn reset_without_pin_sends_software_reset() {
        let mut panel = panel_16bpp();

        block_on(panel.reset()).unwrap();

        assert_eq!(panel.io.ops.as_slice(), &[command(cmd::SWRESET, &[])]);
    }

    #[test]
    fn reset_with_pin_stays_off_the_command_bus() {
        let mut panel: Gc9a01<_, MockResetPin, _> = Gc9a01::new(
            RecordingIo::default(),
            Some(MockResetPin),
            NoDelay,
            PanelConfig::default(),
        )
        .unwrap();

        block_on(panel.reset()).unwrap();

        assert!(panel.io.ops.is_empty());
    }

    #[test]
    fn power_and_invert_use_display_control_opcodes() {
        let mut panel = panel_16bpp();

        block_on(panel.invert(true)).unwrap();
        block_on(panel.invert(false)).unwrap();
        block_on(panel.power(false)).unwrap();
        block_on(panel.power(true)).unwrap();

        assert_eq!(
            panel.io.ops.as_slice(),
            &[
                command(cmd::INVON, &[]),
                command(cmd::INVOFF, &[]),
                command(cmd::DISPOFF, &[]),
                command(cmd::DISPON, &[]),
            ]
        );
    }
}
