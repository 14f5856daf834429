//! Terminal collaborators for the turn loop.

use crossterm::cursor::MoveTo;
use crossterm::terminal::{Clear, ClearType};
use crossterm::QueueableCommand;
use life_world::{AdvanceSignal, ScreenClearer};
use std::io::{BufRead, BufReader, Write};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Clears the whole screen and homes the cursor.
pub struct CrosstermClearer;

impl ScreenClearer for CrosstermClearer {
    fn clear(&self, out: &mut dyn Write) -> std::io::Result<()> {
        out.queue(Clear(ClearType::All))?.queue(MoveTo(0, 0))?;
        Ok(())
    }
}

/// Send one advance signal per line read from `reader`. The channel closes when the
/// reader hits end of input.
///
/// Reading happens on a plain thread: a blocked read must not keep the runtime
/// alive on shutdown.
pub fn spawn_line_advance<R>(reader: R) -> AdvanceSignal
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::channel(1);
    std::thread::spawn(move || {
        for line in reader.lines() {
            if let Err(e) = line {
                warn!("Failed to read advance signal: {}", e);
                break;
            }
            if tx.blocking_send(()).is_err() {
                break;
            }
        }
        debug!("Advance input closed");
    });
    rx
}

pub fn stdin_advance() -> AdvanceSignal {
    spawn_line_advance(BufReader::new(std::io::stdin()))
}
