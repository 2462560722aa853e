use std::future::Future;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::{Result, ViewerError};

/// Cancels the operation it was taken from. Cancelling after the operation
/// has finished has no effect.
#[derive(Debug, Clone)]
pub struct CancelHandle(Arc<Notify>);

impl CancelHandle {
    pub fn cancel(&self) {
        // notify_one keeps a permit, so a cancel sent before the task is
        // first polled is not lost.
        self.0.notify_one();
    }
}

/// Work standing in for a remote call: runs `work` after `delay` on the
/// tokio runtime unless cancelled first.
#[derive(Debug)]
pub struct PendingOperation<T> {
    label: &'static str,
    handle: JoinHandle<Result<T>>,
    cancel: CancelHandle,
}

impl<T: Send + 'static> PendingOperation<T> {
    pub fn spawn<F>(label: &'static str, delay: Duration, work: F) -> Self
    where
        F: FnOnce() -> Result<T> + Send + 'static,
    {
        let notify = Arc::new(Notify::new());
        let signal = Arc::clone(&notify);

        let handle = tokio::spawn(async move {
            tokio::select! {
                _ = signal.notified() => {
                    warn!(operation = label, "operation cancelled");
                    Err(ViewerError::Cancelled)
                }
                _ = tokio::time::sleep(delay) => {
                    debug!(operation = label, ?delay, "operation finished waiting");
                    work()
                }
            }
        });

        Self {
            label,
            handle,
            cancel: CancelHandle(notify),
        }
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    pub async fn wait(self) -> Result<T> {
        match self.handle.await {
            Ok(result) => result,
            Err(err) if err.is_cancelled() => Err(ViewerError::Cancelled),
            Err(err) => Err(ViewerError::Task(format!("{}: {}", self.label, err))),
        }
    }
}

/// Waits for the operation, cancelling it once `interrupt` fires. An
/// interrupt source that fails to start is ignored and the wait goes on.
pub async fn wait_or_interrupt<T, I>(pending: PendingOperation<T>, interrupt: I) -> Result<T>
where
    T: Send + 'static,
    I: Future<Output = io::Result<()>>,
{
    let cancel = pending.cancel_handle();
    let wait = pending.wait();
    tokio::pin!(wait);

    tokio::select! {
        result = &mut wait => result,
        Ok(()) = interrupt => {
            cancel.cancel();
            wait.await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn resolves_with_work_result() {
        let op = PendingOperation::spawn("test", Duration::from_millis(5), || Ok(42));
        assert_eq!(op.wait().await.unwrap(), 42);
    }

    #[tokio::test]
    async fn cancel_stops_a_long_wait() {
        let op: PendingOperation<()> =
            PendingOperation::spawn("test", Duration::from_secs(600), || Ok(()));
        op.cancel_handle().cancel();

        let result = tokio::time::timeout(Duration::from_secs(5), op.wait())
            .await
            .expect("cancelled operation should resolve promptly");
        assert!(matches!(result, Err(ViewerError::Cancelled)));
    }

    #[tokio::test]
    async fn work_errors_propagate() {
        let op: PendingOperation<()> = PendingOperation::spawn("test", Duration::ZERO, || {
            Err(ViewerError::InvalidFileType("notes.txt".to_string()))
        });
        assert!(matches!(op.wait().await, Err(ViewerError::InvalidFileType(_))));
    }

    #[tokio::test]
    async fn panicking_work_is_reported_as_task_failure() {
        let op: PendingOperation<()> =
            PendingOperation::spawn("upload", Duration::ZERO, || panic!("parser crashed"));
        match op.wait().await {
            Err(ViewerError::Task(message)) => assert!(message.starts_with("upload")),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn interrupt_cancels_the_operation() {
        let op: PendingOperation<()> =
            PendingOperation::spawn("test", Duration::from_secs(600), || Ok(()));
        let result = wait_or_interrupt(op, std::future::ready(Ok(()))).await;
        assert!(matches!(result, Err(ViewerError::Cancelled)));
    }

    #[tokio::test]
    async fn failed_interrupt_source_keeps_waiting() {
        let op = PendingOperation::spawn("test", Duration::from_millis(20), || Ok(7));
        let broken = std::future::ready(Err(io::Error::new(io::ErrorKind::Other, "no signal handler")));
        assert_eq!(wait_or_interrupt(op, broken).await.unwrap(), 7);
    }
}
