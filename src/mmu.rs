//! The memory management unit: owns physical memory, the free list and one
//! page table per process, and performs every translation.

use std::collections::HashMap;

use log::{debug, trace, warn};

use crate::config::MmuConfig;
use crate::constants::Pid;
use crate::error::{MmuError, Result};
use crate::free_list::FreeList;
use crate::memory::FrameStore;
use crate::page_table::PageTable;
use crate::translation::VirtualAddress;

/// Point-in-time frame accounting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryStats {
    pub total_frames: usize,
    pub free_frames: usize,
    pub used_frames: usize,
    pub processes: usize,
}

pub struct Mmu {
    frames: FrameStore,
    free_list: FreeList,
    processes: HashMap<Pid, PageTable>,
    offset_bits: u32,
}

impl Mmu {
    /// Create an MMU with `mem_size` bytes of memory split into `frame_size` byte frames
    pub fn new(mem_size: usize, frame_size: usize) -> Result<Self> {
        Self::with_config(MmuConfig::new(mem_size, frame_size))
    }

    pub fn with_config(config: MmuConfig) -> Result<Self> {
        let offset_bits = config.validate()?;
        let num_frames = config.num_frames();
        debug!(
            "mmu: {} frames of {} bytes ({} offset bits)",
            num_frames, config.frame_size, offset_bits
        );

        Ok(Mmu {
            frames: FrameStore::new(num_frames, config.frame_size),
            free_list: FreeList::new(num_frames),
            processes: HashMap::new(),
            offset_bits,
        })
    }

    /// Allocate `n` bytes, rounded up to whole frames, at the top of `pid`'s address space.
    ///
    /// The page table is only created once the frames are known to be available.
    pub fn alloc(&mut self, pid: Pid, n: usize) -> Result<()> {
        if n < 1 {
            return Err(MmuError::NothingToAllocate);
        }

        let needed = n.div_ceil(self.frame_size());
        let frames = self.free_list.find_free_frames(needed).inspect_err(|_| {
            warn!(
                "alloc: pid {} wants {} frames, only {} free",
                pid,
                needed,
                self.free_list.free_count()
            );
        })?;

        self.processes.entry(pid).or_default().append(&frames);
        self.free_list.remove_frames(&frames);

        debug!("alloc: pid {} mapped frames {:?} for {} bytes", pid, frames, n);
        Ok(())
    }

    /// Write `content` into `pid`'s address space starting at `virtual_address`.
    ///
    /// The start address must already be mapped. Content running past the last
    /// mapped page grows the address space first; nothing is written if that fails.
    pub fn write(&mut self, pid: Pid, virtual_address: usize, content: &[u8]) -> Result<()> {
        let start = self.translate_and_check(pid, virtual_address)?;
        self.ensure_capacity(pid, start, content.len())?;

        let frame_size = self.frame_size();
        let table = self.processes.get(&pid).ok_or(MmuError::InvalidProcess)?;

        let mut vpn = start.vpn;
        let mut offset = start.offset;
        let mut remaining = content;
        while !remaining.is_empty() {
            let frame = table.lookup(vpn)?;
            let chunk = remaining.len().min(frame_size - offset);
            self.frames.frame_mut(frame)[offset..offset + chunk].copy_from_slice(&remaining[..chunk]);

            remaining = &remaining[chunk..];
            vpn += 1;
            offset = 0;
        }

        trace!("write: pid {} {} bytes at {}", pid, content.len(), start);
        Ok(())
    }

    /// Read `n` bytes from `pid`'s address space starting at `virtual_address`.
    ///
    /// Every byte must fall inside the mapped range; reads never grow the address space.
    pub fn read(&self, pid: Pid, virtual_address: usize, n: usize) -> Result<Vec<u8>> {
        if n < 1 {
            return Err(MmuError::NothingToRead);
        }
        let table = self.page_table(pid)?;
        let end = virtual_address
            .checked_add(n)
            .ok_or(MmuError::AddressOutOfBounds)?;
        // Pages are mapped contiguously from VPN 0
        if end > table.len() * self.frame_size() {
            return Err(MmuError::AddressOutOfBounds);
        }

        let mut content = Vec::with_capacity(n);
        for address in virtual_address..end {
            let va = VirtualAddress::from_raw(address, self.offset_bits);
            let frame = table.lookup(va.vpn)?;
            content.push(self.frames.read(frame, va.offset));
        }

        trace!("read: pid {} {} bytes at {}", pid, n, virtual_address);
        Ok(content)
    }

    /// Release the last `n` pages of `pid`, zeroing their frames.
    pub fn free(&mut self, pid: Pid, n: usize) -> Result<()> {
        let table = self
            .processes
            .get_mut(&pid)
            .ok_or(MmuError::InvalidProcess)?;
        if n > table.len() {
            return Err(MmuError::FreeOutOfBounds);
        }

        let freed = table.free(n)?;
        for &frame in &freed {
            self.frames.zero_frame(frame);
        }
        self.free_list.add_frames(&freed);

        debug!("free: pid {} released frames {:?}", pid, freed);
        Ok(())
    }

    /// Decompose `virtual_address` and check that its page is mapped for `pid`
    pub fn translate_and_check(&self, pid: Pid, virtual_address: usize) -> Result<VirtualAddress> {
        let va = VirtualAddress::from_raw(virtual_address, self.offset_bits);
        let table = self.page_table(pid)?;
        let frame = table.lookup(va.vpn)?;
        trace!("translate: pid {} {} -> frame {}", pid, va, frame);
        Ok(va)
    }

    /// Bytes addressable from `start` to the end of the last mapped page
    fn remaining_capacity(&self, table: &PageTable, start: VirtualAddress) -> usize {
        let frame_size = self.frame_size();
        (frame_size - start.offset) + (table.len() - start.vpn - 1) * frame_size
    }

    /// Grow `pid`'s address space so that `len` bytes fit from `start` onward.
    fn ensure_capacity(&mut self, pid: Pid, start: VirtualAddress, len: usize) -> Result<()> {
        let table = self.page_table(pid)?;
        let capacity = self.remaining_capacity(table, start);
        if len <= capacity {
            return Ok(());
        }

        let shortfall = len - capacity;
        debug!("write: pid {} needs {} more bytes, growing", pid, shortfall);
        self.alloc(pid, shortfall)
    }

    pub fn page_table(&self, pid: Pid) -> Result<&PageTable> {
        self.processes.get(&pid).ok_or(MmuError::InvalidProcess)
    }

    /// Number of pages mapped for `pid`
    pub fn page_count(&self, pid: Pid) -> Result<usize> {
        self.page_table(pid).map(PageTable::len)
    }

    /// Known process ids in ascending order
    pub fn processes(&self) -> Vec<Pid> {
        let mut pids: Vec<Pid> = self.processes.keys().copied().collect();
        pids.sort_unstable();
        pids
    }

    #[inline]
    pub fn frame_size(&self) -> usize {
        self.frames.frame_size()
    }

    #[inline]
    pub fn num_frames(&self) -> usize {
        self.frames.num_frames()
    }

    #[inline]
    pub fn free_frame_count(&self) -> usize {
        self.free_list.free_count()
    }

    /// Raw bytes of a physical frame
    pub fn frame(&self, index: usize) -> Option<&[u8]> {
        (index < self.num_frames()).then(|| self.frames.frame(index))
    }

    pub fn stats(&self) -> MemoryStats {
        let free_frames = self.free_frame_count();
        MemoryStats {
            total_frames: self.num_frames(),
            free_frames,
            used_frames: self.num_frames() - free_frames,
            processes: self.processes.len(),
        }
    }

    /// Verify that every frame is either free or owned by exactly one page table.
    pub fn check_invariants(&self) -> Result<()> {
        let num_frames = self.num_frames();
        let mut owner: Vec<Option<Pid>> = vec![None; num_frames];
        let mut mapped = 0;

        for pid in self.processes() {
            let table = self.page_table(pid)?;
            for &frame in table.frames() {
                if frame >= num_frames {
                    return Err(MmuError::InvariantViolation(format!(
                        "pid {} maps nonexistent frame {}",
                        pid, frame
                    )));
                }
                if let Some(other) = owner[frame] {
                    return Err(MmuError::InvariantViolation(format!(
                        "frame {} mapped by pid {} and pid {}",
                        frame, other, pid
                    )));
                }
                if self.free_list.is_free(frame) {
                    return Err(MmuError::InvariantViolation(format!(
                        "frame {} mapped by pid {} is also free",
                        frame, pid
                    )));
                }
                owner[frame] = Some(pid);
                mapped += 1;
            }
        }

        if mapped + self.free_frame_count() != num_frames {
            return Err(MmuError::InvariantViolation(format!(
                "{} mapped + {} free != {} frames",
                mapped,
                self.free_frame_count(),
                num_frames
            )));
        }
        Ok(())
    }
}

impl std::fmt::Debug for Mmu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mmu")
            .field("frame_size", &self.frame_size())
            .field("num_frames", &self.num_frames())
            .field("free_frames", &self.free_frame_count())
            .field("processes", &self.processes)
            .finish()
    }
}
