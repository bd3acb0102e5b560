//! Plain integer flag arithmetic.
//!
//! Severity bits and destination bits share one integer space (see
//! [`Facilities`](crate::Facilities)); these helpers are what every flag
//! check in the crate goes through.

/// Returns `true` if any bit of `mask` is set in `flags`.
#[inline]
#[must_use]
pub fn test_bits(flags: u32, mask: u32) -> bool {
    flags & mask != 0
}

/// Returns `flags` with all bits of `mask` set.
#[inline]
#[must_use]
pub fn set_bits(flags: u32, mask: u32) -> u32 {
    flags | mask
}

/// Returns `flags` with all bits of `mask` cleared.
#[inline]
#[must_use]
pub fn clear_bits(flags: u32, mask: u32) -> u32 {
    flags & !mask
}

#[cfg(test)]
mod test {
    use super::{clear_bits, set_bits, test_bits};

    #[test]
    fn test_any_bit_matches() {
        assert!(test_bits(0b1010, 0b0010));
        assert!(test_bits(0b1010, 0b0011));
        assert!(!test_bits(0b1010, 0b0101));
        assert!(!test_bits(0, u32::MAX));
    }

    #[test]
    fn test_set_and_clear() {
        let flags = set_bits(0b0001, 0b0100);
        assert_eq!(flags, 0b0101);
        assert_eq!(set_bits(flags, 0b0100), flags);
        assert_eq!(clear_bits(flags, 0b0001), 0b0100);
        assert_eq!(clear_bits(flags, 0b1000), flags);
    }
}
