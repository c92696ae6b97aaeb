use crate::constants::{DEFAULT_FRAME_SIZE, DEFAULT_MEM_SIZE, MAX_MEM_SIZE, MAX_OFFSET_BITS};
use crate::error::ConfigError;
use crate::translation::log2;

/// Geometry of the simulated physical memory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MmuConfig {
    pub mem_size: usize,
    pub frame_size: usize,
}

impl MmuConfig {
    pub fn new(mem_size: usize, frame_size: usize) -> Self {
        MmuConfig { mem_size, frame_size }
    }

    /// Check the geometry and return the number of offset bits in an address.
    ///
    /// The frame size has to be a power of two so that translation can split
    /// addresses with a shift and a mask.
    pub fn validate(&self) -> Result<u32, ConfigError> {
        let frame_size = self.frame_size;
        let mem_size = self.mem_size;

        if frame_size == 0 {
            return Err(ConfigError::ZeroFrameSize);
        }
        let bits = log2(frame_size).ok_or(ConfigError::FrameSizeNotPowerOfTwo(frame_size))?;
        if bits > MAX_OFFSET_BITS {
            return Err(ConfigError::FrameSizeTooLarge(frame_size, MAX_OFFSET_BITS));
        }
        if mem_size < frame_size {
            return Err(ConfigError::MemoryTooSmall { mem_size, frame_size });
        }
        if mem_size > MAX_MEM_SIZE {
            return Err(ConfigError::MemoryTooLarge(mem_size, MAX_MEM_SIZE));
        }
        if mem_size % frame_size != 0 {
            return Err(ConfigError::MemoryNotFrameAligned { mem_size, frame_size });
        }
        Ok(bits)
    }

    #[inline]
    pub fn num_frames(&self) -> usize {
        self.mem_size / self.frame_size
    }
}

impl Default for MmuConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MEM_SIZE, DEFAULT_FRAME_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_geometry() {
        let config = MmuConfig::default();
        assert_eq!(config.validate(), Ok(8));
        assert_eq!(config.num_frames(), 4);
    }

    #[test]
    fn test_rejects_bad_geometry() {
        assert_eq!(MmuConfig::new(1024, 0).validate(), Err(ConfigError::ZeroFrameSize));
        assert_eq!(
            MmuConfig::new(900, 300).validate(),
            Err(ConfigError::FrameSizeNotPowerOfTwo(300))
        );
        assert_eq!(
            MmuConfig::new(128, 256).validate(),
            Err(ConfigError::MemoryTooSmall { mem_size: 128, frame_size: 256 })
        );
        assert_eq!(
            MmuConfig::new(1000, 256).validate(),
            Err(ConfigError::MemoryNotFrameAligned { mem_size: 1000, frame_size: 256 })
        );
    }

    #[test]
    fn test_rejects_oversized_memory() {
        assert_eq!(
            MmuConfig::new(1 << 62, 4096).validate(),
            Err(ConfigError::MemoryTooLarge(1 << 62, MAX_MEM_SIZE))
        );
        assert_eq!(
            MmuConfig::new(MAX_MEM_SIZE + 4096, 4096).validate(),
            Err(ConfigError::MemoryTooLarge(MAX_MEM_SIZE + 4096, MAX_MEM_SIZE))
        );
        assert_eq!(MmuConfig::new(MAX_MEM_SIZE, 4096).validate(), Ok(12));
    }

    #[test]
    fn test_single_frame_memory() {
        let config = MmuConfig::new(64, 64);
        assert_eq!(config.validate(), Ok(6));
        assert_eq!(config.num_frames(), 1);
    }
}
