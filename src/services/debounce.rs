use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::sleep;

/// Quiet window applied to search input before a query is issued.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Coalesces bursts of values, emitting only the last one once `quiet` has
/// passed without a newer value.
///
/// Used for search boxes: every keystroke is pushed, only the settled term
/// reaches the API. Closing the input flushes the pending value.
#[derive(Debug)]
pub struct Debouncer<T> {
    input: mpsc::UnboundedSender<T>,
    output: mpsc::Receiver<T>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new(quiet: Duration) -> Self {
        let (input, mut inbox) = mpsc::unbounded_channel::<T>();
        let (outbox, output) = mpsc::channel::<T>(1);

        tokio::spawn(async move {
            while let Some(mut latest) = inbox.recv().await {
                loop {
                    tokio::select! {
                        next = inbox.recv() => match next {
                            Some(value) => latest = value,
                            None => {
                                let _ = outbox.send(latest).await;
                                return;
                            }
                        },
                        _ = sleep(quiet) => {
                            if outbox.send(latest).await.is_err() {
                                return;
                            }
                            break;
                        }
                    }
                }
            }
        });

        Self { input, output }
    }

    /// Record a new value, restarting the quiet window.
    pub fn push(&self, value: T) {
        // The worker only exits once the output side is gone.
        let _ = self.input.send(value);
    }

    /// Next settled value; `None` after [`close`](Debouncer::close) drains.
    pub async fn next(&mut self) -> Option<T> {
        self.output.recv().await
    }

    /// Stop accepting input. A pending value is still delivered.
    pub fn close(self) -> mpsc::Receiver<T> {
        self.output
    }
}
