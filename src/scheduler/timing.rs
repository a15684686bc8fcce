use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Local};

/// Current-time source, injected so scheduling logic can be tested against a
/// fixed clock.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

/// Reads the OS clock.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Opaque handle for a scheduled callback, used to cancel it before it fires.
#[derive(Debug)]
pub struct TimerHandle(pub(crate) u64);

/// One-shot deferred execution: run a callback once after a delay, cancelable
/// until it fires.
pub trait AlarmTimer: Send + Sync {
    fn schedule_after(&self, delay: Duration, callback: Box<dyn FnOnce() + Send>) -> TimerHandle;
    fn cancel(&self, handle: TimerHandle);
}

/// Timer backed by the tauri async runtime: each scheduled callback is a
/// task sleeping until its deadline, aborted on cancel. Fired tasks remove
/// their own registry entry.
pub struct TokioTimer {
    tasks: Arc<Mutex<HashMap<u64, tauri::async_runtime::JoinHandle<()>>>>,
    next_id: AtomicU64,
}

impl TokioTimer {
    pub fn new() -> Self {
        Self {
            tasks: Arc::new(Mutex::new(HashMap::new())),
            next_id: AtomicU64::new(0),
        }
    }
}

impl AlarmTimer for TokioTimer {
    fn schedule_after(&self, delay: Duration, callback: Box<dyn FnOnce() + Send>) -> TimerHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let registry = Arc::clone(&self.tasks);

        let mut tasks = self.tasks.lock().unwrap();
        let task = tauri::async_runtime::spawn(async move {
            tokio::time::sleep(delay).await;
            callback();
            registry.lock().unwrap().remove(&id);
        });
        tasks.insert(id, task);
        TimerHandle(id)
    }

    fn cancel(&self, handle: TimerHandle) {
        if let Some(task) = self.tasks.lock().unwrap().remove(&handle.0) {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;

    #[tokio::test]
    async fn scheduled_callback_runs_after_the_delay() {
        let timer = TokioTimer::new();
        let fired = Arc::new(AtomicBool::new(false));

        let flag = fired.clone();
        timer.schedule_after(
            Duration::from_millis(10),
            Box::new(move || flag.store(true, Ordering::Relaxed)),
        );

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(fired.load(Ordering::Relaxed));
    }

    #[tokio::test]
    async fn cancelled_callback_never_runs() {
        let timer = TokioTimer::new();
        let fired = Arc::new(AtomicBool::new(false));

        let flag = fired.clone();
        let handle = timer.schedule_after(
            Duration::from_millis(50),
            Box::new(move || flag.store(true, Ordering::Relaxed)),
        );
        timer.cancel(handle);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(!fired.load(Ordering::Relaxed));
    }

    #[tokio::test]
    async fn cancelling_an_already_fired_timer_is_harmless() {
        let timer = TokioTimer::new();
        let handle = timer.schedule_after(Duration::from_millis(1), Box::new(|| {}));

        tokio::time::sleep(Duration::from_millis(100)).await;
        timer.cancel(handle);
    }
}
