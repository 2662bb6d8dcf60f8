use std::time::Duration;

use tokio::{
    sync::mpsc::{self, Receiver, Sender, UnboundedReceiver, UnboundedSender},
    task::JoinHandle,
    time,
};
use tracing::debug;

pub struct Debouncer<T> {
    sender: UnboundedSender<T>,
    handle: JoinHandle<()>,
}

impl<T> Debouncer<T>
where
    T: Send + 'static,
{
    pub fn spawn(window: Duration) -> (Self, Receiver<T>) {
        let (sender, input) = mpsc::unbounded_channel();
        let (output, settled) = mpsc::channel(1);
        let handle = tokio::spawn(Self::run(window, input, output));
        (Debouncer { sender, handle }, settled)
    }

    pub fn submit(&self, value: T) -> bool {
        self.sender.send(value).is_ok()
    }

    // A pending value is still flushed.
    pub async fn close(self) {
        drop(self.sender);
        let _ = self.handle.await;
    }

    async fn run(window: Duration, mut input: UnboundedReceiver<T>, output: Sender<T>) {
        while let Some(mut latest) = input.recv().await {
            let mut dropped = 0usize;
            loop {
                tokio::select! {
                    next = input.recv() => match next {
                        Some(value) => {
                            latest = value;
                            dropped += 1;
                        }
                        None => break,
                    },
                    _ = time::sleep(window) => break,
                }
            }
            if dropped > 0 {
                debug!("Debounce dropped {} superseded submissions", dropped);
            }
            if output.send(latest).await.is_err() {
                break;
            }
        }
        debug!("Debouncer exited");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(500);

    #[tokio::test(start_paused = true)]
    async fn test_burst_yields_last_value() {
        let (debouncer, mut settled) = Debouncer::spawn(WINDOW);
        for value in 0..5 {
            assert!(debouncer.submit(value));
        }
        assert_eq!(settled.recv().await, Some(4));
        assert!(time::timeout(Duration::from_secs(5), settled.recv())
            .await
            .is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_spaced_submissions_within_window_coalesce() {
        let (debouncer, mut settled) = Debouncer::spawn(WINDOW);
        for value in 0..4 {
            debouncer.submit(value);
            time::sleep(Duration::from_millis(100)).await;
        }
        assert_eq!(settled.recv().await, Some(3));
        assert!(time::timeout(Duration::from_secs(5), settled.recv())
            .await
            .is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_quiet_gap_lets_both_through() {
        let (debouncer, mut settled) = Debouncer::spawn(WINDOW);
        debouncer.submit("rock");
        time::sleep(Duration::from_millis(600)).await;
        debouncer.submit("paper");
        assert_eq!(settled.recv().await, Some("rock"));
        assert_eq!(settled.recv().await, Some("paper"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_flushes_pending_value() {
        let (debouncer, mut settled) = Debouncer::spawn(WINDOW);
        debouncer.submit(1);
        debouncer.submit(2);
        let receiver = tokio::spawn(async move { settled.recv().await });
        debouncer.close().await;
        assert_eq!(receiver.await.unwrap(), Some(2));
    }
}
