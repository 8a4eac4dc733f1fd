use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;

/// Quiet interval used unless configured otherwise.
pub const DEFAULT_QUIET_INTERVAL: Duration = Duration::from_millis(300);

/// Runs an action once nothing else was scheduled for a quiet
/// interval. Scheduling again before the interval elapsed replaces
/// the pending action.
///
/// A fired action runs on its own task: `cancel` and `schedule`
/// only affect the action still waiting for its timer.
pub struct Debouncer {
    interval: Duration,
    /// Timer of the last scheduled action. Yields the task
    /// the action runs on once it fired.
    pending: Option<JoinHandle<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            pending: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Cancel the pending action and schedule `action` instead.
    pub fn schedule<F>(&mut self, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let interval = self.interval;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(interval).await;
            tokio::spawn(action)
        }));
    }

    /// Wait for the last scheduled action to fire and run to
    /// completion. Returns right away if nothing is scheduled.
    pub async fn settle(&mut self) {
        if let Some(pending) = self.pending.take() {
            // A cancelled timer yields an error, nothing to wait for
            if let Ok(running) = pending.await {
                let _ = running.await;
            }
        }
    }

    /// Drop the pending action, if any.
    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }

    /// Is an action waiting for its timer?
    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .map_or(false, |pending| !pending.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::Mutex;

    use super::*;

    fn recorder() -> Arc<Mutex<Vec<&'static str>>> {
        Arc::new(Mutex::new(Vec::new()))
    }

    fn record(
        log: &Arc<Mutex<Vec<&'static str>>>,
        value: &'static str,
    ) -> impl Future<Output = ()> + Send + 'static {
        let log = log.clone();
        async move { log.lock().unwrap().push(value) }
    }

    #[tokio::test(start_paused = true)]
    async fn test_debouncer_fires_after_interval() {
        let log = recorder();
        let mut debouncer = Debouncer::new(Duration::from_millis(300));
        debouncer.schedule(record(&log, "a"));
        assert!(debouncer.is_pending());

        tokio::time::sleep(Duration::from_millis(299)).await;
        assert!(log.lock().unwrap().is_empty());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(*log.lock().unwrap(), vec!["a"]);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_debouncer_coalesces() {
        let log = recorder();
        let mut debouncer = Debouncer::new(Duration::from_millis(300));
        debouncer.schedule(record(&log, "a"));
        tokio::time::sleep(Duration::from_millis(100)).await;
        debouncer.schedule(record(&log, "ab"));
        tokio::time::sleep(Duration::from_millis(250)).await;
        debouncer.schedule(record(&log, "abr"));
        tokio::time::sleep(Duration::from_millis(1000)).await;

        assert_eq!(*log.lock().unwrap(), vec!["abr"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_debouncer_settle_runs_last_action() {
        let log = recorder();
        let mut debouncer = Debouncer::new(Duration::from_millis(300));
        debouncer.schedule(record(&log, "ab"));
        debouncer.schedule(record(&log, "abr"));

        debouncer.settle().await;
        assert_eq!(*log.lock().unwrap(), vec!["abr"]);
        assert!(!debouncer.is_pending());

        // Nothing scheduled
        debouncer.settle().await;
        assert_eq!(log.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_debouncer_cancel() {
        let log = recorder();
        let mut debouncer = Debouncer::new(Duration::from_millis(300));
        debouncer.schedule(record(&log, "a"));
        debouncer.cancel();
        assert!(!debouncer.is_pending());
        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert!(log.lock().unwrap().is_empty());
    }
}
