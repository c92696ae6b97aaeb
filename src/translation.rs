use crate::constants::MAX_OFFSET_BITS;

/// Represents the decomposed components of a virtual address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VirtualAddress {
    pub va: usize,
    pub vpn: usize,
    pub offset: usize,
}

impl VirtualAddress {
    /// Split `va` into page number and offset for an offset field of `offset_bits` bits
    pub fn from_raw(va: usize, offset_bits: u32) -> Self {
        let offset = va & offset_mask(offset_bits);
        let vpn = va >> offset_bits;
        VirtualAddress { va, vpn, offset }
    }
}

impl std::fmt::Display for VirtualAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "VA({}) = (vpn={}, offset={})", self.va, self.vpn, self.offset)
    }
}

/// Mask selecting the low `bits` bits of an address
#[inline]
pub fn offset_mask(bits: u32) -> usize {
    debug_assert!(bits <= MAX_OFFSET_BITS);
    (1usize << bits) - 1
}

/// Exponent `m` such that `n == 2^m`, or `None` if `n` is not a power of two
pub fn log2(n: usize) -> Option<u32> {
    n.is_power_of_two().then(|| n.trailing_zeros())
}
