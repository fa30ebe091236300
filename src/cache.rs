use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    Empty,
    Building,
    Populated,
}

enum Slot<T> {
    Empty,
    Building,
    Populated(Arc<T>),
}

/// Read-through memo for one value with no expiry. Callers racing on an empty
/// cell may each run the build; the first finished value is kept. A build
/// that was overtaken by `invalidate` hands its value back uncached.
pub struct CacheCell<T> {
    name: &'static str,
    inner: Mutex<Guarded<T>>,
}

struct Guarded<T> {
    slot: Slot<T>,
    generation: u64,
}

impl<T> CacheCell<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            inner: Mutex::new(Guarded {
                slot: Slot::Empty,
                generation: 0,
            }),
        }
    }

    pub fn state(&self) -> CacheState {
        match &self.lock().slot {
            Slot::Empty => CacheState::Empty,
            Slot::Building => CacheState::Building,
            Slot::Populated(_) => CacheState::Populated,
        }
    }

    pub fn peek(&self) -> Option<Arc<T>> {
        match &self.lock().slot {
            Slot::Populated(value) => Some(Arc::clone(value)),
            _ => None,
        }
    }

    pub fn get_or_try_build<E>(&self, build: impl FnOnce() -> Result<T, E>) -> Result<Arc<T>, E> {
        let started = {
            let mut guard = self.lock();
            if let Slot::Populated(value) = &guard.slot {
                debug!(cache = self.name, "cache hit");
                return Ok(Arc::clone(value));
            }
            guard.slot = Slot::Building;
            guard.generation
        };

        match build() {
            Ok(value) => {
                let value = Arc::new(value);
                let mut guard = self.lock();
                if guard.generation != started {
                    debug!(cache = self.name, "cache invalidated mid-build, value not stored");
                    return Ok(value);
                }
                if let Slot::Populated(existing) = &guard.slot {
                    return Ok(Arc::clone(existing));
                }
                guard.slot = Slot::Populated(Arc::clone(&value));
                debug!(cache = self.name, "cache populated");
                Ok(value)
            }
            Err(err) => {
                let mut guard = self.lock();
                if guard.generation == started && matches!(guard.slot, Slot::Building) {
                    guard.slot = Slot::Empty;
                }
                Err(err)
            }
        }
    }

    pub fn invalidate(&self) {
        let mut guard = self.lock();
        guard.slot = Slot::Empty;
        guard.generation = guard.generation.wrapping_add(1);
        debug!(cache = self.name, "cache invalidated");
    }

    fn lock(&self) -> MutexGuard<'_, Guarded<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
