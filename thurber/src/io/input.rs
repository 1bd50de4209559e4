//! Single-slot handoff between a blocking line reader and the scheduler.
//!
//! The reader publishes every line into a `watch` channel, so the slot only ever
//! holds the latest unseen line. If several lines arrive while the scheduler is
//! busy, only the most recent one is observed.

use std::io::BufRead;
use std::thread;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, warn};

/// Outcome of waiting for operator input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The operator entered a line.
    Input(String),
    /// The idle duration elapsed without input.
    Timeout,
    /// The input source is gone (end of input).
    Closed,
}

/// Producer half of the slot.
pub type LineSender = watch::Sender<Option<String>>;

/// Consumer half of the slot, owned by the scheduler.
#[derive(Debug)]
pub struct InputSlot {
    rx: watch::Receiver<Option<String>>,
}

/// Create a connected sender/slot pair. The slot starts empty.
pub fn input_slot() -> (LineSender, InputSlot) {
    let (tx, rx) = watch::channel(None);
    (tx, InputSlot { rx })
}

impl InputSlot {
    /// Wait up to `idle` for a line that has not been observed yet.
    pub async fn wait_for_event(&mut self, idle: Duration) -> Event {
        match tokio::time::timeout(idle, self.rx.changed()).await {
            Err(_) => Event::Timeout,
            Ok(Err(_)) => Event::Closed,
            Ok(Ok(())) => match self.rx.borrow_and_update().clone() {
                Some(line) => Event::Input(line),
                None => Event::Timeout,
            },
        }
    }
}

/// Read lines on a dedicated thread and publish each one into the slot.
///
/// The thread exits (dropping the sender, which closes the slot) at end of input,
/// on a read error, or once the slot has been dropped.
pub fn spawn_line_reader<R>(reader: R, tx: LineSender) -> thread::JoinHandle<()>
where
    R: BufRead + Send + 'static,
{
    thread::spawn(move || {
        for line in reader.lines() {
            match line {
                Ok(line) => {
                    tx.send_replace(Some(line));
                    if tx.is_closed() {
                        debug!("input slot dropped, stopping reader");
                        return;
                    }
                }
                Err(err) => {
                    warn!(err = %err, "failed to read input line");
                    return;
                }
            }
        }
        debug!("end of input");
    })
}
