//! Event handling for Moverwatch.
//!
//! Input arrives one line at a time from stdin (or any async reader in
//! tests) and is forwarded over a channel to the app loop.

mod handler;
mod input;

pub use handler::EventHandler;
pub use input::Command;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::LinesStream;

/// Input event types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// One line of user input, without the trailing newline.
    Input(String),
    /// Input reached end of file.
    Closed,
}

/// Event loop reading user input lines.
pub struct EventLoop {
    /// Event sender.
    event_tx: mpsc::UnboundedSender<Event>,
    /// Event receiver.
    event_rx: mpsc::UnboundedReceiver<Event>,
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLoop {
    /// Create a new event loop.
    pub fn new() -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        Self { event_tx, event_rx }
    }

    /// Start reading lines from `reader`.
    pub fn start_with<R>(
        self,
        reader: R,
    ) -> (mpsc::UnboundedReceiver<Event>, tokio::task::JoinHandle<()>)
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let event_tx = self.event_tx;

        let handle = tokio::spawn(async move {
            let mut lines = LinesStream::new(BufReader::new(reader).lines());

            while let Some(line) = lines.next().await {
                match line {
                    Ok(line) => {
                        if event_tx.send(Event::Input(line)).is_err() {
                            return;
                        }
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "failed to read input");
                        break;
                    }
                }
            }

            let _ = event_tx.send(Event::Closed);
        });

        (self.event_rx, handle)
    }
}
