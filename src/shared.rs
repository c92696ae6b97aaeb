use std::sync::Arc;

use parking_lot::Mutex;

use crate::constants::Pid;
use crate::error::Result;
use crate::mmu::{MemoryStats, Mmu};

/// Cloneable handle to one MMU shared between threads.
///
/// Each operation runs under a single lock, so an allocation's reserve and
/// map steps, or a write's grow and copy steps, are never interleaved with
/// another caller.
#[derive(Clone)]
pub struct SharedMmu {
    inner: Arc<Mutex<Mmu>>,
}

impl SharedMmu {
    pub fn new(mmu: Mmu) -> Self {
        SharedMmu {
            inner: Arc::new(Mutex::new(mmu)),
        }
    }

    pub fn alloc(&self, pid: Pid, n: usize) -> Result<()> {
        self.inner.lock().alloc(pid, n)
    }

    pub fn write(&self, pid: Pid, virtual_address: usize, content: &[u8]) -> Result<()> {
        self.inner.lock().write(pid, virtual_address, content)
    }

    pub fn read(&self, pid: Pid, virtual_address: usize, n: usize) -> Result<Vec<u8>> {
        self.inner.lock().read(pid, virtual_address, n)
    }

    pub fn free(&self, pid: Pid, n: usize) -> Result<()> {
        self.inner.lock().free(pid, n)
    }

    pub fn stats(&self) -> MemoryStats {
        self.inner.lock().stats()
    }

    pub fn check_invariants(&self) -> Result<()> {
        self.inner.lock().check_invariants()
    }

    /// Run `f` with exclusive access to the MMU
    pub fn with<R>(&self, f: impl FnOnce(&mut Mmu) -> R) -> R {
        f(&mut self.inner.lock())
    }
}

impl From<Mmu> for SharedMmu {
    fn from(mmu: Mmu) -> Self {
        Self::new(mmu)
    }
}
