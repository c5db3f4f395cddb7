use std::cell::UnsafeCell;
use std::ops::{Deref, DerefMut};

/// A mutex over raw pthread primitives.
///
/// Besides the usual RAII guard it exposes `lock_raw`/`unlock_raw` so the
/// lock can be held across the `pthread_atfork` prepare and parent/child
/// callbacks, which run in separate stack frames.
pub struct GateMutex<T> {
    inner: UnsafeCell<libc::pthread_mutex_t>,
    data: UnsafeCell<T>,
}

unsafe impl<T: Send> Send for GateMutex<T> {}
unsafe impl<T: Send> Sync for GateMutex<T> {}

impl<T> GateMutex<T> {
    pub const fn new(data: T) -> Self {
        Self {
            inner: UnsafeCell::new(libc::PTHREAD_MUTEX_INITIALIZER),
            data: UnsafeCell::new(data),
        }
    }

    pub fn lock(&self) -> GateMutexGuard<'_, T> {
        unsafe {
            libc::pthread_mutex_lock(self.inner.get());
        }
        GateMutexGuard { mutex: self }
    }

    /// Acquire without a guard. Must be paired with `unlock_raw`.
    pub unsafe fn lock_raw(&self) {
        libc::pthread_mutex_lock(self.inner.get());
    }

    /// Release a lock taken with `lock_raw`.
    pub unsafe fn unlock_raw(&self) {
        libc::pthread_mutex_unlock(self.inner.get());
    }

    /// Access the data while the lock is held through `lock_raw`.
    #[allow(clippy::mut_from_ref)]
    pub unsafe fn data_unchecked(&self) -> &mut T {
        &mut *self.data.get()
    }
}

impl<T> Drop for GateMutex<T> {
    fn drop(&mut self) {
        unsafe {
            libc::pthread_mutex_destroy(self.inner.get());
        }
    }
}

pub struct GateMutexGuard<'a, T> {
    mutex: &'a GateMutex<T>,
}

impl<'a, T> Deref for GateMutexGuard<'a, T> {
    type Target = T;

    fn deref(&self) -> &T {
        unsafe { &*self.mutex.data.get() }
    }
}

impl<'a, T> DerefMut for GateMutexGuard<'a, T> {
    fn deref_mut(&mut self) -> &mut T {
        unsafe { &mut *self.mutex.data.get() }
    }
}

impl<'a, T> Drop for GateMutexGuard<'a, T> {
    fn drop(&mut self) {
        unsafe {
            libc::pthread_mutex_unlock(self.mutex.inner.get());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn lock_serializes_writers() {
        let mutex = Arc::new(GateMutex::new(0u64));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let mutex = Arc::clone(&mutex);
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        *mutex.lock() += 1;
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(*mutex.lock(), 8000);
    }

    #[test]
    fn raw_lock_pairs_with_guarded_lock() {
        let mutex = GateMutex::new(false);
        unsafe {
            mutex.lock_raw();
            *mutex.data_unchecked() = true;
            mutex.unlock_raw();
        }
        assert!(*mutex.lock());
    }
}
