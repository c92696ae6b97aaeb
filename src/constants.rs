/// Physical memory size used when none is configured (4 frames).
pub const DEFAULT_MEM_SIZE: usize = 1024;
pub const DEFAULT_FRAME_SIZE: usize = 256;

/// Largest physical memory the simulator will back (1 GiB).
pub const MAX_MEM_SIZE: usize = 1 << 30;

/// Widest offset field the translator supports.
pub const MAX_OFFSET_BITS: u32 = 32;

/// Process identifier as seen by the MMU.
pub type Pid = u32;
