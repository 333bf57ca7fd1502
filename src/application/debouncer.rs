/// Trailing-edge debounce as a plain state machine. Callers pass the current
/// time explicitly; nothing here owns a timer.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay_ms: u64,
    pending: Option<Pending<T>>,
}

#[derive(Debug, Clone)]
struct Pending<T> {
    value: T,
    deadline: u64,
}

impl<T> Debouncer<T> {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            pending: None,
        }
    }

    /// Replaces any pending value and restarts the wait window, even when
    /// `value` equals the pending one. Returns the new deadline.
    pub fn observe(&mut self, value: T, now_ms: u64) -> u64 {
        let deadline = now_ms.saturating_add(self.delay_ms);
        self.pending = Some(Pending { value, deadline });
        deadline
    }

    /// Emits the pending value once its deadline has passed.
    pub fn poll(&mut self, now_ms: u64) -> Option<T> {
        match &self.pending {
            Some(pending) if now_ms >= pending.deadline => self.pending.take().map(|p| p.value),
            _ => None,
        }
    }

    pub fn deadline(&self) -> Option<u64> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drops the pending value without emitting it.
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}
