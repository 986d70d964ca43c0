//! Tear-synchronized frame flush pipeline
//!
//! Sits between the renderer and the panel driver. When full-refresh
//! (tear-avoidance) mode is on, every flush first blocks on the
//! [`TearGate`] so the pixel stream lands inside the panel's blanking
//! window. The pipeline owns no frame memory; double buffering is the
//! renderer's concern, the pipeline only tells it when a buffer is free.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::signal::Signal;

use rondel_core::tear::TearGate;
use rondel_core::traits::{Panel, Rect};

/// Frame flush pipeline over one panel session
///
/// The transfer-done notification fires once the pixel write has
/// resolved, i.e. once the transport's DMA completion has released the
/// buffer: listeners may reuse the just-sent buffer at that point.
pub struct FrameFlusher<'a, P, M: RawMutex> {
    panel: P,
    gate: &'a TearGate<M>,
    /// Synchronize every flush to the blanking interval
    full_refresh: bool,
    on_flush_done: Option<&'a (dyn Fn() + Sync)>,
    flush_done: Signal<M, ()>,
}

impl<'a, P, M> FrameFlusher<'a, P, M>
where
    P: Panel,
    M: RawMutex,
{
    pub fn new(panel: P, gate: &'a TearGate<M>, full_refresh: bool) -> Self {
        Self {
            panel,
            gate,
            full_refresh,
            on_flush_done: None,
            flush_done: Signal::new(),
        }
    }

    /// Register the single transfer-done listener
    ///
    /// One-time setup before steady-state flushing; the listener runs in
    /// the flushing task's context.
    pub fn register_flush_done(&mut self, listener: &'a (dyn Fn() + Sync)) {
        self.on_flush_done = Some(listener);
    }

    /// Access the panel for session control (invert, mirror, power, gap)
    pub fn panel(&mut self) -> &mut P {
        &mut self.panel
    }

    /// Stream one rendered region to the panel
    ///
    /// Blocks on the tear gate first when full-refresh mode is enabled;
    /// in practice the wait is bounded by the panel refresh rate. On
    /// completion the registered listener is invoked and the flush-done
    /// signal fires, releasing the buffer back to the renderer.
    pub async fn flush(&mut self, area: Rect, pixels: &[u8]) -> Result<(), P::Error> {
        if self.full_refresh {
            self.gate.wait_ready().await;
        }

        self.panel.draw_window(area, pixels).await?;

        if let Some(cb) = self.on_flush_done {
            cb();
        }
        self.flush_done.signal(());

        Ok(())
    }

    /// Wait until the last flushed buffer may be reused
    pub async fn wait_flush_done(&self) {
        self.flush_done.wait().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use core::sync::atomic::{AtomicU32, Ordering};
    use embassy_futures::block_on;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;

    #[derive(Default)]
    struct MockPanel {
        windows: u32,
    }

    impl Panel for MockPanel {
        type Error = Infallible;

        async fn reset(&mut self) -> Result<(), Infallible> {
            Ok(())
        }

        async fn init(&mut self) -> Result<(), Infallible> {
            Ok(())
        }

        async fn draw_window(&mut self, _area: Rect, _pixels: &[u8]) -> Result<(), Infallible> {
            self.windows += 1;
            Ok(())
        }

        async fn invert(&mut self, _on: bool) -> Result<(), Infallible> {
            Ok(())
        }

        async fn mirror(&mut self, _x: bool, _y: bool) -> Result<(), Infallible> {
            Ok(())
        }

        async fn swap_axes(&mut self, _swap: bool) -> Result<(), Infallible> {
            Ok(())
        }

        fn set_gap(&mut self, _x: u16, _y: u16) {}

        async fn power(&mut self, _on: bool) -> Result<(), Infallible> {
            Ok(())
        }
    }

    const AREA: Rect = Rect::new(0, 0, 8, 8);

    #[test]
    fn flush_without_full_refresh_ignores_the_gate() {
        let gate: TearGate<NoopRawMutex> = TearGate::new();
        let mut flusher = FrameFlusher::new(MockPanel::default(), &gate, false);

        // Gate is Blocked; a non-synchronized flush must not care
        block_on(flusher.flush(AREA, &[0u8; 128])).unwrap();

        assert_eq!(flusher.panel().windows, 1);
    }

    #[test]
    fn full_refresh_flush_consumes_gate_readiness() {
        let gate: TearGate<NoopRawMutex> = TearGate::new();
        let mut flusher = FrameFlusher::new(MockPanel::default(), &gate, true);

        gate.on_te_edge(true);
        block_on(flusher.flush(AREA, &[0u8; 128])).unwrap();

        assert_eq!(flusher.panel().windows, 1);
        // The readiness token is gone until the next blanking interval
        assert!(!gate.try_acquire());
    }

    #[test]
    fn flush_fires_done_listener_and_signal() {
        static DONE_HITS: AtomicU32 = AtomicU32::new(0);

        let gate: TearGate<NoopRawMutex> = TearGate::new();
        let mut flusher = FrameFlusher::new(MockPanel::default(), &gate, false);
        let release_buffer = || {
            DONE_HITS.fetch_add(1, Ordering::Relaxed);
        };
        flusher.register_flush_done(&release_buffer);

        block_on(flusher.flush(AREA, &[0u8; 128])).unwrap();

        assert_eq!(DONE_HITS.load(Ordering::Relaxed), 1);
        block_on(flusher.wait_flush_done());
    }
}
