//! Trailing-edge debouncing of a stream of values (e.g. search queries typed
//! one keystroke at a time).

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

pub const DEFAULT_DEBOUNCE_MS: u64 = 150;

/// Sending side of a debounced channel.
///
/// Only the last value of a burst is delivered, once `delay` has passed
/// without a newer one. Dropping the `Debouncer` flushes a pending value and
/// closes the output.
pub struct Debouncer<T> {
    input: mpsc::UnboundedSender<T>,
    task: JoinHandle<()>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new(delay: Duration) -> (Self, mpsc::UnboundedReceiver<T>) {
        let (input, input_rx) = mpsc::unbounded_channel();
        let (output_tx, output) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(input_rx, output_tx, delay));
        (Self { input, task }, output)
    }

    /// Pushes a new value, superseding any value still waiting.
    pub fn push(&self, value: T) {
        if self.input.send(value).is_err() {
            debug!("Debouncer task is gone, dropping value");
        }
    }

    /// Closes the input and waits for the pending value to be flushed.
    pub async fn finish(self) {
        let Self { input, task } = self;
        drop(input);
        let _ = task.await;
    }
}

async fn run<T>(
    mut input: mpsc::UnboundedReceiver<T>,
    output: mpsc::UnboundedSender<T>,
    delay: Duration,
) {
    while let Some(mut latest) = input.recv().await {
        loop {
            tokio::select! {
                next = input.recv() => match next {
                    Some(value) => latest = value,
                    None => {
                        let _ = output.send(latest);
                        return;
                    }
                },
                _ = tokio::time::sleep(delay) => break,
            }
        }
        if output.send(latest).is_err() {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delay() -> Duration {
        Duration::from_millis(DEFAULT_DEBOUNCE_MS)
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_delivers_last_value() {
        let (debouncer, mut output) = Debouncer::new(delay());
        debouncer.push("i");
        debouncer.push("iv");
        debouncer.push("ive");

        assert_eq!(output.recv().await, Some("ive"));
        assert!(output.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_bursts_deliver_each() {
        let (debouncer, mut output) = Debouncer::new(delay());
        debouncer.push("ive");
        tokio::time::sleep(Duration::from_millis(200)).await;
        debouncer.push("bts");

        assert_eq!(output.recv().await, Some("ive"));
        assert_eq!(output.recv().await, Some("bts"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_value_restarts_the_wait() {
        let (debouncer, mut output) = Debouncer::new(delay());
        debouncer.push(1);
        tokio::time::sleep(Duration::from_millis(100)).await;
        debouncer.push(2);
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert!(output.try_recv().is_err());
        assert_eq!(output.recv().await, Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_finish_flushes_pending_value() {
        let (debouncer, mut output) = Debouncer::new(delay());
        debouncer.push("pending");
        debouncer.finish().await;

        assert_eq!(output.recv().await, Some("pending"));
        assert_eq!(output.recv().await, None);
    }
}
