//! Exclusive use of the display.
//!
//! Only one owner at a time may synthesize input. An owner may acquire the
//! lock several times; it is free again once every acquisition is released.

use crate::error::ScreenLockError;
use once_cell::sync::Lazy;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use web_time::Instant;

/// Identity of a screen lock holder.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LockOwner(String);

static NEXT_OWNER: AtomicU64 = AtomicU64::new(1);

impl LockOwner {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// A fresh owner that equals no other, labelled with `prefix`.
    pub fn unique(prefix: &str) -> Self {
        let id = NEXT_OWNER.fetch_add(1, Ordering::Relaxed);
        Self(format!("{prefix}-{id}"))
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LockOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Default)]
struct LockState {
    owner: Option<LockOwner>,
    count: usize,
}

impl LockState {
    fn try_take(&mut self, owner: &LockOwner) -> bool {
        match &self.owner {
            Some(current) if current == owner => {
                self.count += 1;
                true
            }
            Some(_) => false,
            None => {
                self.owner = Some(owner.clone());
                self.count = 1;
                true
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct ScreenLock {
    state: Mutex<LockState>,
    released: Condvar,
}

static GLOBAL: Lazy<Arc<ScreenLock>> = Lazy::new(|| Arc::new(ScreenLock::new()));

impl ScreenLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// The lock shared by every robot in this process.
    pub fn global() -> Arc<ScreenLock> {
        GLOBAL.clone()
    }

    fn state(&self) -> MutexGuard<'_, LockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Blocks until no other owner holds the lock, then records `owner`.
    pub fn acquire(&self, owner: &LockOwner) {
        let mut state = self.state();
        while !state.try_take(owner) {
            state = self
                .released
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
        log::debug!("screen lock acquired by {} (count {})", owner, state.count);
    }

    /// Like [`acquire`](Self::acquire) but gives up after `timeout`.
    pub fn try_acquire_for(&self, owner: &LockOwner, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut state = self.state();
        while !state.try_take(owner) {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            state = self
                .released
                .wait_timeout(state, deadline - now)
                .map(|(guard, _)| guard)
                .unwrap_or_else(|poisoned| poisoned.into_inner().0);
        }
        log::debug!("screen lock acquired by {} (count {})", owner, state.count);
        true
    }

    /// Undoes one acquisition by `owner`.
    pub fn release(&self, owner: &LockOwner) -> Result<(), ScreenLockError> {
        let mut state = self.state();
        if state.owner.as_ref() != Some(owner) {
            return Err(ScreenLockError::NotOwner {
                owner: owner.to_string(),
                holder: state.owner.as_ref().map(ToString::to_string),
            });
        }
        state.count -= 1;
        if state.count == 0 {
            state.owner = None;
            drop(state);
            self.released.notify_all();
            log::debug!("screen lock released by {}", owner);
        }
        Ok(())
    }

    pub fn is_acquired(&self) -> bool {
        self.state().owner.is_some()
    }

    pub fn is_acquired_by(&self, owner: &LockOwner) -> bool {
        self.state().owner.as_ref() == Some(owner)
    }

    /// Acquires the lock for `owner` until the guard is dropped.
    pub fn lock(&self, owner: LockOwner) -> ScreenLockGuard<'_> {
        self.acquire(&owner);
        ScreenLockGuard { lock: self, owner }
    }
}

/// Releases one acquisition when dropped.
#[must_use = "the screen lock is released as soon as the guard is dropped"]
pub struct ScreenLockGuard<'a> {
    lock: &'a ScreenLock,
    owner: LockOwner,
}

impl ScreenLockGuard<'_> {
    pub fn owner(&self) -> &LockOwner {
        &self.owner
    }
}

impl Drop for ScreenLockGuard<'_> {
    fn drop(&mut self) {
        if let Err(err) = self.lock.release(&self.owner) {
            log::warn!("failed to release screen lock: {}", err);
        }
    }
}

#[cfg(test)]
#[path = "tests/screen_lock_tests.rs"]
mod tests;
