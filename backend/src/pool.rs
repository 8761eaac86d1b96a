use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

#[derive(Default)]
struct PoolState {
    live: AtomicUsize,
    bytes: AtomicUsize,
    total: AtomicUsize,
}

/// Allocation accounting domain shared by every object created from it.
///
/// Cloning a pool yields another handle to the same counters.
#[derive(Clone)]
pub struct MemoryPool {
    state: Arc<PoolState>,
}

static GLOBAL_POOL: OnceLock<MemoryPool> = OnceLock::new();

impl Default for MemoryPool {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryPool {
    pub fn new() -> Self {
        Self {
            state: Arc::new(PoolState::default()),
        }
    }

    /// Process-wide pool used when no pool is forwarded.
    pub fn global() -> MemoryPool {
        GLOBAL_POOL.get_or_init(MemoryPool::new).clone()
    }

    pub fn allocate(&self, bytes: usize) -> Allocation {
        self.state.live.fetch_add(1, Ordering::AcqRel);
        self.state.bytes.fetch_add(bytes, Ordering::AcqRel);
        self.state.total.fetch_add(1, Ordering::AcqRel);
        Allocation {
            pool: self.clone(),
            bytes,
        }
    }

    pub fn live_allocations(&self) -> usize {
        self.state.live.load(Ordering::Acquire)
    }

    pub fn live_bytes(&self) -> usize {
        self.state.bytes.load(Ordering::Acquire)
    }

    /// Number of allocations ever made from this pool.
    pub fn total_allocations(&self) -> usize {
        self.state.total.load(Ordering::Acquire)
    }

    pub fn ptr_eq(&self, other: &MemoryPool) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }
}

impl fmt::Debug for MemoryPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryPool")
            .field("live", &self.live_allocations())
            .field("bytes", &self.live_bytes())
            .finish()
    }
}

/// Live allocation registered on a [`MemoryPool`]; released on drop.
pub struct Allocation {
    pool: MemoryPool,
    bytes: usize,
}

impl Allocation {
    pub fn pool(&self) -> &MemoryPool {
        &self.pool
    }

    pub fn bytes(&self) -> usize {
        self.bytes
    }
}

impl Clone for Allocation {
    fn clone(&self) -> Self {
        self.pool.allocate(self.bytes)
    }
}

impl Drop for Allocation {
    fn drop(&mut self) {
        self.pool.state.live.fetch_sub(1, Ordering::AcqRel);
        self.pool.state.bytes.fetch_sub(self.bytes, Ordering::AcqRel);
    }
}

impl fmt::Debug for Allocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Allocation({} bytes)", self.bytes)
    }
}
