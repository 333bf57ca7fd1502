//! Timer backends: browser timers and a virtual clock for deterministic runs.

use crate::application::scheduler::{TimerDriver, TimerHandle};
use crate::domain::logging::TimeProvider;
use gloo_timers::callback::{Interval, Timeout};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// `setInterval` / `setTimeout` via gloo. Dropping the handle clears the timer.
#[derive(Debug, Default, Clone, Copy)]
pub struct GlooTimerDriver;

impl TimerDriver for GlooTimerDriver {
    fn every(&self, interval_ms: u32, tick: Box<dyn FnMut()>) -> TimerHandle {
        TimerHandle::new(Interval::new(interval_ms, tick))
    }

    fn once(&self, delay_ms: u32, fire: Box<dyn FnOnce()>) -> TimerHandle {
        TimerHandle::new(Timeout::new(delay_ms, fire))
    }
}

/// Settable millisecond clock. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(start_ms)),
        }
    }

    pub fn now(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }

    pub fn set(&self, ms: u64) {
        self.now.store(ms, Ordering::SeqCst);
    }
}

impl TimeProvider for ManualClock {
    fn current_timestamp(&self) -> u64 {
        self.now()
    }

    fn format_timestamp(&self, timestamp: u64) -> String {
        format!("t+{timestamp}ms")
    }
}

enum Callback {
    Repeat(Box<dyn FnMut()>),
    Once(Box<dyn FnOnce()>),
}

struct ManualTimer {
    due: u64,
    period: Option<u64>,
    /// None while the callback is running
    callback: Option<Callback>,
}

type TimerTable = RefCell<BTreeMap<u64, ManualTimer>>;

struct CancelOnDrop {
    id: u64,
    timers: Weak<TimerTable>,
}

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        if let Some(timers) = self.timers.upgrade() {
            let removed = timers.borrow_mut().remove(&self.id);
            // dropped outside the borrow; the closure may own other handles
            drop(removed);
        }
    }
}

/// Virtual-time timer driver. Nothing fires until [`advance`](Self::advance).
#[derive(Clone)]
pub struct ManualTimerDriver {
    clock: ManualClock,
    timers: Rc<TimerTable>,
    next_id: Rc<Cell<u64>>,
}

impl Default for ManualTimerDriver {
    fn default() -> Self {
        Self::new(ManualClock::new(0))
    }
}

impl ManualTimerDriver {
    pub fn new(clock: ManualClock) -> Self {
        Self {
            clock,
            timers: Rc::new(RefCell::new(BTreeMap::new())),
            next_id: Rc::new(Cell::new(0)),
        }
    }

    pub fn clock(&self) -> ManualClock {
        self.clock.clone()
    }

    pub fn now(&self) -> u64 {
        self.clock.now()
    }

    pub fn active_timers(&self) -> usize {
        self.timers.borrow().len()
    }

    fn register(&self, delay_ms: u64, period: Option<u64>, callback: Callback) -> TimerHandle {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.timers.borrow_mut().insert(
            id,
            ManualTimer {
                due: self.now() + delay_ms,
                period,
                callback: Some(callback),
            },
        );
        TimerHandle::new(CancelOnDrop {
            id,
            timers: Rc::downgrade(&self.timers),
        })
    }

    fn next_due(&self, until: u64) -> Option<(u64, u64)> {
        self.timers
            .borrow()
            .iter()
            .filter(|(_, t)| t.callback.is_some() && t.due <= until)
            .map(|(id, t)| (t.due, *id))
            .min()
    }

    /// Moves time forward by `ms`, firing due timers in deadline order.
    /// Timers scheduled by callbacks fire too if they fall inside the window.
    pub fn advance(&self, ms: u64) {
        let until = self.now() + ms;

        while let Some((due, id)) = self.next_due(until) {
            self.clock.set(due);
            let callback = self
                .timers
                .borrow_mut()
                .get_mut(&id)
                .and_then(|t| t.callback.take());

            match callback {
                Some(Callback::Once(fire)) => {
                    fire();
                    let removed = self.timers.borrow_mut().remove(&id);
                    drop(removed);
                }
                Some(Callback::Repeat(mut tick)) => {
                    tick();
                    let cancelled = {
                        let mut timers = self.timers.borrow_mut();
                        if let Some(timer) = timers.get_mut(&id) {
                            timer.due += timer.period.unwrap_or(1).max(1);
                            timer.callback = Some(Callback::Repeat(tick));
                            None
                        } else {
                            Some(tick)
                        }
                    };
                    drop(cancelled);
                }
                None => {}
            }
        }

        self.clock.set(until);
    }
}

impl TimerDriver for ManualTimerDriver {
    fn every(&self, interval_ms: u32, tick: Box<dyn FnMut()>) -> TimerHandle {
        let period = u64::from(interval_ms).max(1);
        self.register(period, Some(period), Callback::Repeat(tick))
    }

    fn once(&self, delay_ms: u32, fire: Box<dyn FnOnce()>) -> TimerHandle {
        self.register(u64::from(delay_ms), None, Callback::Once(fire))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_fires_until_handle_dropped() {
        let driver = ManualTimerDriver::default();
        let fired = Rc::new(RefCell::new(Vec::new()));
        let sink = fired.clone();
        let clock = driver.clock();
        let handle = driver.every(1000, Box::new(move || sink.borrow_mut().push(clock.now())));

        driver.advance(2500);
        assert_eq!(*fired.borrow(), vec![1000, 2000]);

        drop(handle);
        driver.advance(5000);
        assert_eq!(fired.borrow().len(), 2);
        assert_eq!(driver.active_timers(), 0);
    }

    #[test]
    fn timeout_fires_once() {
        let driver = ManualTimerDriver::default();
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        let _handle = driver.once(500, Box::new(move || c.set(c.get() + 1)));

        driver.advance(499);
        assert_eq!(count.get(), 0);
        driver.advance(1);
        assert_eq!(count.get(), 1);
        driver.advance(10_000);
        assert_eq!(count.get(), 1);
        assert_eq!(driver.now(), 10_500);
    }
}
