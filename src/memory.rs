/// Simulated physical memory: one zeroed arena split into equally sized frames
#[derive(Debug, Clone)]
pub struct FrameStore {
    data: Box<[u8]>,
    frame_size: usize,
}

impl FrameStore {
    /// Create `num_frames` zero-filled frames of `frame_size` bytes each
    pub fn new(num_frames: usize, frame_size: usize) -> Self {
        FrameStore {
            data: vec![0u8; num_frames * frame_size].into_boxed_slice(),
            frame_size,
        }
    }

    #[inline]
    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    #[inline]
    pub fn num_frames(&self) -> usize {
        if self.frame_size == 0 {
            0
        } else {
            self.data.len() / self.frame_size
        }
    }

    /// Calculate the starting arena address of a frame
    #[inline]
    pub fn frame_to_address(&self, frame: usize) -> usize {
        frame * self.frame_size
    }

    /// Read a byte from a frame
    #[inline]
    pub fn read(&self, frame: usize, offset: usize) -> u8 {
        self.data[self.frame_to_address(frame) + offset]
    }

    pub fn frame(&self, frame: usize) -> &[u8] {
        let start = self.frame_to_address(frame);
        &self.data[start..start + self.frame_size]
    }

    pub fn frame_mut(&mut self, frame: usize) -> &mut [u8] {
        let start = self.frame_to_address(frame);
        &mut self.data[start..start + self.frame_size]
    }

    /// Set every byte of a frame back to zero
    pub fn zero_frame(&mut self, frame: usize) {
        self.frame_mut(frame).fill(0);
    }
}
