pub trait WriteBytesLe {
    fn write_le(&self, dst: &mut Vec<u8>);
}

pub trait WriteBytesBe {
    fn write_be(&self, dst: &mut Vec<u8>);
}

macro_rules! impl_num_le_be {
    ($($t:ty),+) => { $(
        impl WriteBytesLe for $t { #[inline] fn write_le(&self, dst: &mut Vec<u8>) { dst.extend_from_slice(&self.to_le_bytes()); }}
        impl WriteBytesBe for $t { #[inline] fn write_be(&self, dst: &mut Vec<u8>) { dst.extend_from_slice(&self.to_be_bytes()); }}
    )+ }
}

impl_num_le_be!(u8, u16, u32);

macro_rules! impl_array {
    ($trait:ident, $method:ident) => {
        impl<T: $trait, const N: usize> $trait for [T; N] {
            #[inline]
            fn $method(&self, dst: &mut Vec<u8>) {
                self.iter().for_each(|item| item.$method(dst));
            }
        }
    };
}

impl_array!(WriteBytesLe, write_le);
impl_array!(WriteBytesBe, write_be);

#[cfg(test)]
mod tests {
    use crate::byteorder::{WriteBytesBe, WriteBytesLe};
    use fawutil_macros::ToBytes;

    #[derive(ToBytes)]
    struct ChunkHead {
        id: [u8; 4],
        size: u32,
        tag: u16,
    }

    #[test]
    fn to_bytes_field_order() {
        let s = ChunkHead {
            id: *b"fmt ",
            size: 0x0000_0010,
            tag: 0xFFFE,
        };

        let vec_le = &mut Vec::new();
        let vec_be = &mut Vec::new();

        s.write_le(vec_le);
        s.write_be(vec_be);

        let expected_le = [b'f', b'm', b't', b' ', 0x10, 0, 0, 0, 0xFE, 0xFF];
        let expected_be = [b'f', b'm', b't', b' ', 0, 0, 0, 0x10, 0xFF, 0xFE];

        assert_eq!(&vec_le[..], &expected_le);
        assert_eq!(&vec_be[..], &expected_be);
    }
}
