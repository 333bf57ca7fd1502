use crate::domain::logging::LogComponent;
use crate::log_debug;
use std::any::Any;
use std::rc::Rc;

/// Keeps a timer alive. Dropping the handle cancels the timer.
pub struct TimerHandle {
    _guard: Box<dyn Any>,
}

impl TimerHandle {
    pub fn new<G: 'static>(guard: G) -> Self {
        Self { _guard: Box::new(guard) }
    }
}

/// Timer backend: gloo timers in the browser, virtual time in tests.
pub trait TimerDriver {
    /// Calls `tick` every `interval_ms` until the handle is dropped. No immediate call.
    fn every(&self, interval_ms: u32, tick: Box<dyn FnMut()>) -> TimerHandle;

    /// Calls `fire` once after `delay_ms` unless the handle is dropped first.
    fn once(&self, delay_ms: u32, fire: Box<dyn FnOnce()>) -> TimerHandle;
}

/// Periodic refresh with at most one live timer.
pub struct RefreshScheduler {
    driver: Rc<dyn TimerDriver>,
    active: Option<TimerHandle>,
    interval_ms: u32,
}

impl RefreshScheduler {
    pub fn new(driver: Rc<dyn TimerDriver>) -> Self {
        Self {
            driver,
            active: None,
            interval_ms: 0,
        }
    }

    /// Runs `callback` now, then every `interval_ms`. An interval of 0 means
    /// the immediate call only. Any previous schedule is stopped first.
    pub fn start<F>(&mut self, interval_ms: u32, mut callback: F)
    where
        F: FnMut() + 'static,
    {
        self.stop();
        callback();

        if interval_ms == 0 {
            log_debug!(
                LogComponent::Application("RefreshScheduler"),
                "Periodic refresh disabled"
            );
            return;
        }

        self.interval_ms = interval_ms;
        self.active = Some(self.driver.every(interval_ms, Box::new(callback)));
        log_debug!(
            LogComponent::Application("RefreshScheduler"),
            "Refreshing every {interval_ms} ms"
        );
    }

    /// Idempotent.
    pub fn stop(&mut self) {
        if self.active.take().is_some() {
            log_debug!(LogComponent::Application("RefreshScheduler"), "Refresh stopped");
        }
        self.interval_ms = 0;
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn interval_ms(&self) -> Option<u32> {
        self.active.as_ref().map(|_| self.interval_ms)
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}
