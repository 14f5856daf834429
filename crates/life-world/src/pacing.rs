//! Output sink sharing and the display primitives used while a turn is paused.

use life_core::{Result, SpinnerConfig};
use parking_lot::Mutex;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::trace;

/// Output stream shared by the renderer and the spinner. Holding the lock is the
/// only way to write, so their output never interleaves.
pub type SharedSink<W> = Arc<Mutex<W>>;

pub fn shared_sink<W: Write>(sink: W) -> SharedSink<W> {
    Arc::new(Mutex::new(sink))
}

/// Each message lets an interactive run take one more turn. The run stops with
/// `Error::InputClosed` once every sender is dropped.
pub type AdvanceSignal = mpsc::Receiver<()>;

/// Clears the display before a rendering is written.
pub trait ScreenClearer: Send + Sync {
    fn clear(&self, out: &mut dyn Write) -> std::io::Result<()>;
}

/// Busy indicator drawn in place while a turn is paused
#[derive(Debug, Clone)]
pub struct Spinner {
    frames: Vec<String>,
    interval: Duration,
}

impl Spinner {
    pub fn new(config: &SpinnerConfig) -> Self {
        Self {
            frames: config.frames.clone(),
            // tokio intervals reject a zero period
            interval: config.interval().max(Duration::from_millis(1)),
        }
    }

    /// Start animating on `sink` until `token` is cancelled. The task erases the
    /// last frame before it finishes, so awaiting the handle guarantees nothing
    /// more will be written.
    pub fn spawn<W>(&self, sink: SharedSink<W>, token: CancellationToken) -> JoinHandle<Result<()>>
    where
        W: Write + Send + 'static,
    {
        tokio::spawn(animate(self.frames.clone(), self.interval, sink, token))
    }
}

async fn animate<W: Write>(
    frames: Vec<String>,
    interval: Duration,
    sink: SharedSink<W>,
    token: CancellationToken,
) -> Result<()> {
    if frames.is_empty() {
        token.cancelled().await;
        return Ok(());
    }

    let mut ticker = tokio::time::interval(interval);
    for frame in frames.iter().cycle() {
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = ticker.tick() => {
                trace!(frame = frame.as_str(), "spinner frame");
                let mut out = sink.lock();
                out.write_all(format!("{}\u{8}", frame).as_bytes())?;
                out.flush()?;
            }
        }
    }

    let mut out = sink.lock();
    out.write_all(b" \x08")?;
    out.flush()?;
    Ok(())
}

impl Default for Spinner {
    fn default() -> Self {
        Self::new(&SpinnerConfig::default())
    }
}
