//! FAW frame checksum.
//!
//! The checksum covers the block between a frame's start marker and its
//! checksum field, read as 16-bit little-endian words. The low half-word of
//! the result is the wrapping sum of the words, the high half-word their XOR.
//! It is weak on purpose and must stay bit-exact with existing captures.
//!
//! For an odd block length the last word takes its high byte from the byte
//! following the block, which on the wire is the first byte of the checksum
//! field itself.

/// Length in bytes of the checksum field.
pub const CHECKSUM_LEN: usize = 4;

/// Computes the checksum over `block`, using `tail` as the high byte of the
/// final word when the length is odd.
pub fn checksum(block: &[u8], tail: u8) -> u32 {
    let mut sum = 0u16;
    let mut xor = 0u16;

    let mut words = block.chunks_exact(2);
    for word in words.by_ref() {
        let v = u16::from_le_bytes([word[0], word[1]]);
        sum = sum.wrapping_add(v);
        xor ^= v;
    }
    if let [last] = words.remainder() {
        let v = u16::from_le_bytes([*last, tail]);
        sum = sum.wrapping_add(v);
        xor ^= v;
    }

    sum as u32 | ((xor as u32) << 16)
}

/// Computes the checksum to store after `block`.
///
/// The stored field starts with the low byte of the word sum. That byte only
/// depends on the low bytes of the words, so it is computed first and then
/// folded into an odd trailing word.
pub fn checksum_for_block(block: &[u8]) -> u32 {
    if block.len() % 2 == 0 {
        return checksum(block, 0);
    }
    let tail = checksum(block, 0) as u8;
    checksum(block, tail)
}

/// Reads a stored checksum field.
#[inline]
pub fn read_checksum(field: &[u8; CHECKSUM_LEN]) -> u32 {
    u32::from_le_bytes(*field)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sum_and_xor_halves() {
        let block = [0x01, 0x00, 0x03, 0x00, 0xFF, 0xFF];
        // words: 0x0001, 0x0003, 0xFFFF
        let sum = 0x0001u16.wrapping_add(0x0003).wrapping_add(0xFFFF);
        let xor = 0x0001u16 ^ 0x0003 ^ 0xFFFF;
        assert_eq!(checksum(&block, 0), sum as u32 | ((xor as u32) << 16));
    }

    #[test]
    fn empty_block() {
        assert_eq!(checksum(&[], 0xAB), 0);
        assert_eq!(checksum_for_block(&[]), 0);
    }

    #[test]
    fn odd_block_uses_tail_byte() {
        let block = [0x10, 0x20, 0x30];
        let a = checksum(&block, 0x00);
        let b = checksum(&block, 0x01);
        assert_ne!(a, b);
        assert_eq!(a & 0xFF, b & 0xFF);
    }

    #[test]
    fn odd_block_stored_checksum_is_self_consistent() {
        let block: Vec<u8> = (0..13u8).map(|i| i.wrapping_mul(37).wrapping_add(5)).collect();
        let stored = checksum_for_block(&block);
        let field = stored.to_le_bytes();

        // What a reader computes when the word straddles into the field
        assert_eq!(checksum(&block, field[0]), stored);
        assert_eq!(read_checksum(&field), stored);
    }
}
