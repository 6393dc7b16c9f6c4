//! Free-lists for objects that are reused across many short-lived checks.

use std::sync::{Mutex, PoisonError};

/// Idle items each pool keeps around. Anything released beyond this is
/// dropped, so a burst of concurrent checks can't pin memory forever.
pub(crate) const POOL_RETAIN_LIMIT: usize = 64;

/// An object that can be handed out again after use.
pub(crate) trait Recycle {
    /// Construct a fresh item when the pool is empty.
    fn create() -> Self;
    /// Wipe all state left by the previous user.
    fn reset(&mut self);
}

/// A mutex-guarded free-list of reusable objects.
///
/// [`acquire`](Self::acquire) pops an idle item (or creates one) and resets
/// it before handing it out; [`release`](Self::release) pushes it back.
pub(crate) struct Pool<T> {
    free: Mutex<Vec<T>>,
    limit: usize,
}

impl<T: Recycle> Pool<T> {
    pub(crate) const fn new(limit: usize) -> Self {
        Self { free: Mutex::new(Vec::new()), limit }
    }

    pub(crate) fn acquire(&self) -> T {
        // A panic while holding the lock can't leave the Vec half-updated.
        let recycled = self.free.lock().unwrap_or_else(PoisonError::into_inner).pop();
        let mut item = recycled.unwrap_or_else(T::create);
        item.reset();
        item
    }

    pub(crate) fn release(&self, item: T) {
        let mut free = self.free.lock().unwrap_or_else(PoisonError::into_inner);
        if free.len() < self.limit {
            free.push(item);
        }
    }

    #[cfg(test)]
    pub(crate) fn idle(&self) -> usize {
        self.free.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}
