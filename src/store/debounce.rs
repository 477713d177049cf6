//! Quiet-period coalescing of rapid input

use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Quiet period between the last keystroke and applying the query
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

/// Forwards only the last of a burst of values, once no new value has
/// arrived for the quiet period.
///
/// Each [`push`](Debouncer::push) resets the deadline. [`finish`](Debouncer::finish)
/// flushes a pending value immediately; [`cancel`](Debouncer::cancel) drops it.
pub struct Debouncer<T> {
    tx: mpsc::UnboundedSender<T>,
    task: JoinHandle<()>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new<F, Fut>(quiet: Duration, mut apply: F) -> Self
    where
        F: FnMut(T) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<T>();

        let task = tokio::spawn(async move {
            let mut pending: Option<T> = None;
            let sleep = tokio::time::sleep(quiet);
            tokio::pin!(sleep);

            loop {
                tokio::select! {
                    value = rx.recv() => match value {
                        Some(value) => {
                            pending = Some(value);
                            sleep.as_mut().reset(Instant::now() + quiet);
                        }
                        None => {
                            if let Some(value) = pending.take() {
                                apply(value).await;
                            }
                            break;
                        }
                    },
                    () = &mut sleep, if pending.is_some() => {
                        if let Some(value) = pending.take() {
                            apply(value).await;
                        }
                    }
                }
            }
        });

        Self { tx, task }
    }

    pub fn push(&self, value: T) {
        if self.tx.send(value).is_err() {
            log::debug!("Debouncer already stopped, input dropped");
        }
    }

    /// Apply any pending value now and wait for it to complete.
    pub async fn finish(self) {
        let Self { tx, task } = self;
        drop(tx);
        if let Err(e) = task.await {
            log::warn!("Debounce task failed: {}", e);
        }
    }

    /// Stop without applying the pending value.
    pub fn cancel(self) {
        self.task.abort();
    }
}
