use crate::error::{MmuError, Result};

/// Per-process mapping from virtual page number (index) to physical frame index (value)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageTable {
    frame_indices: Vec<usize>,
}

impl PageTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `frames` onto the next virtual pages, in order
    pub fn append(&mut self, frames: &[usize]) {
        self.frame_indices.extend_from_slice(frames);
    }

    /// Unmap the last `n` pages and return their frames in VPN order.
    ///
    /// The caller owns clearing the frames and handing them back to the free list.
    pub fn free(&mut self, n: usize) -> Result<Vec<usize>> {
        if n < 1 {
            return Err(MmuError::NothingToAllocate);
        }
        if n > self.len() {
            return Err(MmuError::FreeOutOfBounds);
        }
        let keep = self.len() - n;
        Ok(self.frame_indices.split_off(keep))
    }

    /// Frame mapped at `vpn`
    #[inline]
    pub fn lookup(&self, vpn: usize) -> Result<usize> {
        self.frame_indices
            .get(vpn)
            .copied()
            .ok_or(MmuError::AddressOutOfBounds)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.frame_indices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frame_indices.is_empty()
    }

    /// Mapped frames, indexed by VPN
    pub fn frames(&self) -> &[usize] {
        &self.frame_indices
    }
}
