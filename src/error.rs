use thiserror::Error;

/// Rejected MMU geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("frame size must be greater than zero")]
    ZeroFrameSize,
    #[error("frame size {0} is not a power of two")]
    FrameSizeNotPowerOfTwo(usize),
    #[error("frame size {0} exceeds the {1}-bit offset limit")]
    FrameSizeTooLarge(usize, u32),
    #[error("memory size {mem_size} is smaller than frame size {frame_size}")]
    MemoryTooSmall { mem_size: usize, frame_size: usize },
    #[error("memory size {0} exceeds the {1} byte limit")]
    MemoryTooLarge(usize, usize),
    #[error("memory size {mem_size} is not a multiple of frame size {frame_size}")]
    MemoryNotFrameAligned { mem_size: usize, frame_size: usize },
}

/// Errors returned by MMU operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MmuError {
    #[error("nothing to allocate")]
    NothingToAllocate,
    #[error("nothing to read")]
    NothingToRead,
    #[error("out of memory")]
    OutOfMemory,
    #[error("invalid process")]
    InvalidProcess,
    #[error("address out of bounds")]
    AddressOutOfBounds,
    #[error("free out of bounds")]
    FreeOutOfBounds,
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
}

pub type Result<T> = std::result::Result<T, MmuError>;
