use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// 追蹤某個 repository 目前進行中的請求數量
#[derive(Debug, Clone)]
pub struct RequestMonitor {
    name: &'static str,
    in_flight: Arc<AtomicUsize>,
}

impl RequestMonitor {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// 開始一個操作，guard 被 drop 時自動結束
    pub fn begin(&self, operation: &'static str) -> InFlightGuard {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!("⏳ {}::{} started ({} in flight)", self.name, operation, now);
        InFlightGuard {
            monitor: self.clone(),
            operation,
            started: Instant::now(),
        }
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight() > 0
    }
}

pub struct InFlightGuard {
    monitor: RequestMonitor,
    operation: &'static str,
    started: Instant,
}

impl InFlightGuard {
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.monitor.in_flight.fetch_sub(1, Ordering::SeqCst);
        tracing::debug!(
            "📊 {}::{} finished in {:?}",
            self.monitor.name,
            self.operation,
            self.started.elapsed()
        );
    }
}
