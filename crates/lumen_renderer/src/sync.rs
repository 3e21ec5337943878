//! Binary handshake between the caller and the render worker.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// Binary semaphore: `signal` makes one pending `wait` return.
///
/// Signals do not accumulate; several signals before a wait release it once.
#[derive(Debug, Default)]
pub struct Handshake {
    signaled: Mutex<bool>,
    condvar: Condvar,
}

impl Handshake {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signal(&self) {
        *lock(&self.signaled) = true;
        self.condvar.notify_one();
    }

    /// Block until signaled, then consume the signal.
    pub fn wait(&self) {
        let mut signaled = lock(&self.signaled);
        while !*signaled {
            signaled = self
                .condvar
                .wait(signaled)
                .unwrap_or_else(PoisonError::into_inner);
        }
        *signaled = false;
    }
}

/// Lock a mutex, ignoring poisoning. State guarded here stays consistent even
/// if a holder panicked.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
