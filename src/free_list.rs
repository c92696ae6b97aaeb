use crate::error::{MmuError, Result};

/// Tracks which frames are available for allocation
#[derive(Debug, Clone)]
pub struct FreeList {
    free: Vec<bool>,
    num_free: usize,
}

impl FreeList {
    /// Create a free list where every one of `num_frames` frames is available
    pub fn new(num_frames: usize) -> Self {
        FreeList {
            free: vec![true; num_frames],
            num_free: num_frames,
        }
    }

    /// Find `n` free frames, lowest index first.
    ///
    /// Nothing is reserved here; callers hand the result to `remove_frames`
    /// once the allocation is committed.
    pub fn find_free_frames(&self, n: usize) -> Result<Vec<usize>> {
        if n > self.num_free {
            return Err(MmuError::OutOfMemory);
        }

        let frames: Vec<usize> = self
            .free
            .iter()
            .enumerate()
            .filter(|&(_, &is_free)| is_free)
            .map(|(index, _)| index)
            .take(n)
            .collect();

        if frames.len() < n {
            return Err(MmuError::OutOfMemory);
        }
        Ok(frames)
    }

    /// Mark frames as owned
    pub fn remove_frames(&mut self, frames: &[usize]) {
        for &index in frames {
            debug_assert!(self.free[index], "frame {} is already owned", index);
            if self.free[index] {
                self.free[index] = false;
                self.num_free -= 1;
            }
        }
    }

    /// Return frames to the pool
    pub fn add_frames(&mut self, frames: &[usize]) {
        for &index in frames {
            debug_assert!(!self.free[index], "frame {} is already free", index);
            if !self.free[index] {
                self.free[index] = true;
                self.num_free += 1;
            }
        }
    }

    #[inline]
    pub fn free_count(&self) -> usize {
        self.num_free
    }

    #[inline]
    pub fn is_free(&self, index: usize) -> bool {
        self.free.get(index).copied().unwrap_or(false)
    }

    /// Total number of frames tracked
    #[inline]
    pub fn len(&self) -> usize {
        self.free.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.free.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_list_is_all_free() {
        let fl = FreeList::new(4);
        assert_eq!(fl.len(), 4);
        assert_eq!(fl.free_count(), 4);
        assert!((0..4).all(|i| fl.is_free(i)));
        assert!(!fl.is_free(4));
    }

    #[test]
    fn test_find_is_first_fit_and_read_only() {
        let fl = FreeList::new(8);
        assert_eq!(fl.find_free_frames(3).unwrap(), vec![0, 1, 2]);
        // Finding does not reserve anything
        assert_eq!(fl.free_count(), 8);
        assert_eq!(fl.find_free_frames(3).unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_find_skips_owned_frames() {
        let mut fl = FreeList::new(6);
        fl.remove_frames(&[0, 2, 3]);
        assert_eq!(fl.find_free_frames(3).unwrap(), vec![1, 4, 5]);
        assert_eq!(fl.find_free_frames(0).unwrap(), Vec::<usize>::new());
    }

    #[test]
    fn test_find_out_of_memory() {
        let mut fl = FreeList::new(4);
        fl.remove_frames(&[1, 3]);
        assert_eq!(fl.find_free_frames(3), Err(MmuError::OutOfMemory));
        assert_eq!(fl.free_count(), 2);
    }

    #[test]
    fn test_remove_and_add_keep_count() {
        let mut fl = FreeList::new(4);
        fl.remove_frames(&[0, 1, 2]);
        assert_eq!(fl.free_count(), 1);
        assert!(!fl.is_free(1));

        fl.add_frames(&[1, 2]);
        assert_eq!(fl.free_count(), 3);
        assert!(fl.is_free(1));
        assert!(fl.is_free(2));
        assert!(!fl.is_free(0));
    }
}
