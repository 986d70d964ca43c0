//! Panel command interface and capability traits
//!
//! The wire protocol to the LCD controller is an 8-bit command followed
//! by 8-bit parameter bytes; pixel streams ride behind a memory-write
//! command. [`PanelIo`] abstracts that transport (SPI + D/C line in the
//! firmware, a recording mock in tests) and [`Panel`] is the capability
//! set a controller driver exposes to the flush pipeline. New controller
//! families add a new implementing type, not a new function-pointer table.

/// Errors surfaced by panel creation and the command protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PanelError<E> {
    /// Unsupported color format or bit depth at creation
    NotSupported,
    /// Malformed argument (e.g. a pixel buffer shorter than the window)
    InvalidArgument,
    /// Failure in the underlying command transport
    Io(E),
}

impl<E> From<E> for PanelError<E> {
    fn from(err: E) -> Self {
        PanelError::Io(err)
    }
}

/// Color component order expected by the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ColorOrder {
    Rgb,
    Bgr,
}

/// Panel creation configuration
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PanelConfig {
    pub color_order: ColorOrder,
    /// Bits per pixel; only 16 and 18 are representable on this bus
    pub bits_per_pixel: u8,
    /// Electrical level that asserts the reset pin
    pub reset_active_high: bool,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            color_order: ColorOrder::Rgb,
            bits_per_pixel: 16,
            reset_active_high: false,
        }
    }
}

/// An addressing window in panel coordinates
///
/// `x0..x1` and `y0..y1` are half-open: the end coordinates are
/// exclusive, matching the renderer's buffer math. The controller's
/// inclusive address registers are derived by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rect {
    pub x0: u16,
    pub y0: u16,
    pub x1: u16,
    pub y1: u16,
}

impl Rect {
    pub const fn new(x0: u16, y0: u16, x1: u16, y1: u16) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub const fn width(&self) -> u16 {
        self.x1 - self.x0
    }

    pub const fn height(&self) -> u16 {
        self.y1 - self.y0
    }
}

/// Command/parameter transport to the LCD controller
///
/// Implementations own the physical bus discipline (chip select, the
/// data/command line, DMA). `write_pixels` resolving is the transfer
/// completion signal: the pixel buffer may be reused once it returns.
#[allow(async_fn_in_trait)]
pub trait PanelIo {
    type Error;

    /// Transmit a command byte followed by its parameter bytes
    async fn write_command(&mut self, cmd: u8, params: &[u8]) -> Result<(), Self::Error>;

    /// Transmit a command byte followed by a pixel stream
    async fn write_pixels(&mut self, cmd: u8, pixels: &[u8]) -> Result<(), Self::Error>;
}

/// Capability set of one LCD controller family
///
/// Single-writer by convention: `mirror` and `swap_axes` read-modify-write
/// a shared mode-control byte and assume no concurrent caller.
#[allow(async_fn_in_trait)]
pub trait Panel {
    type Error;

    /// Hardware reset when a reset pin exists, software reset otherwise
    async fn reset(&mut self) -> Result<(), Self::Error>;

    /// Replay the controller's init sequence
    async fn init(&mut self) -> Result<(), Self::Error>;

    /// Set the addressing window and stream the pixel payload
    ///
    /// Requires `x0 < x1` and `y0 < y1`; violation is a fatal
    /// precondition, not a recoverable error.
    async fn draw_window(&mut self, area: Rect, pixels: &[u8]) -> Result<(), Self::Error>;

    /// Enable or disable color inversion
    async fn invert(&mut self, on: bool) -> Result<(), Self::Error>;

    /// Mirror along the X and/or Y axis
    async fn mirror(&mut self, mirror_x: bool, mirror_y: bool) -> Result<(), Self::Error>;

    /// Swap the X and Y axes
    async fn swap_axes(&mut self, swap: bool) -> Result<(), Self::Error>;

    /// Store coordinate offsets; applied on the next `draw_window`
    fn set_gap(&mut self, x_gap: u16, y_gap: u16);

    /// Turn the display output on or off
    async fn power(&mut self, on: bool) -> Result<(), Self::Error>;
}
