use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Binary signal: `raise` sets it, `wait` blocks until set and clears it.
#[derive(Debug, Default)]
pub struct Signal {
    raised: Mutex<bool>,
    cvar: Condvar,
}

impl Signal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        *lock(&self.raised) = true;
        self.cvar.notify_one();
    }

    pub fn wait(&self) {
        let mut raised = lock(&self.raised);
        while !*raised {
            raised = self.cvar.wait(raised).unwrap_or_else(PoisonError::into_inner);
        }
        *raised = false;
    }
}

#[derive(Debug)]
struct Slot<T> {
    value: Option<T>,
    abandoned: bool,
}

/// One-shot hand-off between exactly one sender and one receiver.
///
/// The sender deposits its value and raises "ready", then blocks on "ack".
/// The receiver waits for "ready", takes the value and raises "ack". The
/// sender therefore cannot return before the value has been consumed.
///
/// Either side can [`abandon`](Rendezvous::abandon) the hand-off instead:
/// a waiting receiver then gets `None` and a waiting sender is released.
#[derive(Debug)]
pub struct Rendezvous<T> {
    slot: Mutex<Slot<T>>,
    ready: Condvar,
    ack: Signal,
}

impl<T> Default for Rendezvous<T> {
    fn default() -> Self {
        Self {
            slot: Mutex::new(Slot { value: None, abandoned: false }),
            ready: Condvar::new(),
            ack: Signal::new(),
        }
    }
}

impl<T> Rendezvous<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hands `value` over and waits until the receiver has taken it or the
    /// hand-off was abandoned.
    pub fn send(&self, value: T) {
        {
            let mut slot = lock(&self.slot);
            debug_assert!(slot.value.is_none(), "rendezvous already holds a value");
            slot.value = Some(value);
        }
        self.ready.notify_one();
        self.ack.wait();
    }

    /// Blocks until a value is ready, takes it and releases the sender.
    /// Returns `None` once the hand-off is abandoned with no value pending.
    pub fn recv(&self) -> Option<T> {
        let value = {
            let mut slot = lock(&self.slot);
            loop {
                if let Some(value) = slot.value.take() {
                    break Some(value);
                }
                if slot.abandoned {
                    break None;
                }
                slot = self.ready.wait(slot).unwrap_or_else(PoisonError::into_inner);
            }
        };
        self.ack.raise();
        value
    }

    /// Marks the hand-off as never completing and wakes both sides.
    pub fn abandon(&self) {
        lock(&self.slot).abandoned = true;
        self.ready.notify_all();
        self.ack.raise();
    }
}
