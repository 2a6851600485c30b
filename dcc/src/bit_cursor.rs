//! Unaligned bit reader over a borrowed byte slice.
//!
//! Bits are consumed from the least significant bit of each byte upward, and the
//! first bit read becomes bit 0 of the returned value.

use crate::error::DccError;

#[derive(Debug, Clone)]
pub struct BitCursor<'a> {
    data: &'a [u8],
    bit_pos: usize,
}

impl<'a> BitCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, bit_pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.bit_pos
    }

    pub fn len_bits(&self) -> usize {
        self.data.len() * 8
    }

    pub fn remaining(&self) -> usize {
        self.len_bits() - self.bit_pos
    }

    /// Moves to an absolute bit position. The end of the buffer is a valid position.
    pub fn seek(&mut self, bit_pos: usize) -> Result<(), DccError> {
        if bit_pos > self.len_bits() {
            return Err(DccError::SeekOutOfRange {
                position: bit_pos,
                length: self.len_bits(),
            });
        }

        self.bit_pos = bit_pos;

        Ok(())
    }

    fn ensure(&self, n: usize) -> Result<(), DccError> {
        if n > self.remaining() {
            return Err(DccError::BufferUnderrun {
                requested: n,
                remaining: self.remaining(),
            });
        }

        Ok(())
    }

    pub fn read_bits(&mut self, n: usize) -> Result<u64, DccError> {
        if n > 64 {
            return Err(DccError::TooManyBits { requested: n });
        }

        self.ensure(n)?;

        let mut value = 0u64;

        for i in 0..n {
            let byte = self.data[self.bit_pos / 8];
            let bit = (byte >> (self.bit_pos % 8)) & 1;

            value |= (bit as u64) << i;
            self.bit_pos += 1;
        }

        Ok(value)
    }

    /// Reads `n` bits as a two's complement number of width `n`.
    pub fn read_signed_bits(&mut self, n: usize) -> Result<i64, DccError> {
        let value = self.read_bits(n)?;

        Ok(sign_extend(value, n))
    }

    pub fn read_bit(&mut self) -> Result<bool, DccError> {
        Ok(self.read_bits(1)? == 1)
    }

    pub fn read_u8(&mut self) -> Result<u8, DccError> {
        Ok(self.read_bits(8)? as u8)
    }

    pub fn read_u32(&mut self) -> Result<u32, DccError> {
        Ok(self.read_bits(32)? as u32)
    }

    /// Reads `n` whole bytes starting at the current bit, aligned or not.
    pub fn read_byte_string(&mut self, n: usize) -> Result<Vec<u8>, DccError> {
        self.ensure(n.saturating_mul(8))?;

        if self.bit_pos % 8 == 0 {
            let start = self.bit_pos / 8;
            self.bit_pos += n * 8;

            return Ok(self.data[start..start + n].to_vec());
        }

        (0..n).map(|_| self.read_u8()).collect()
    }

    pub fn skip_bits(&mut self, n: usize) -> Result<(), DccError> {
        self.ensure(n)?;
        self.bit_pos += n;

        Ok(())
    }

    pub fn skip_bytes(&mut self, n: usize) -> Result<(), DccError> {
        self.skip_bits(n.saturating_mul(8))
    }

    /// Rounds the position up to the next byte boundary.
    pub fn align_to_byte(&mut self) -> Result<(), DccError> {
        let rem = self.bit_pos % 8;

        if rem != 0 {
            self.skip_bits(8 - rem)?;
        }

        Ok(())
    }
}

pub fn sign_extend(value: u64, bits: usize) -> i64 {
    if bits == 0 {
        return 0;
    }

    let shift = 64 - bits;
    ((value << shift) as i64) >> shift
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn read_bits_low_bit_first() {
        let mut cursor = BitCursor::new(&[0b1010_0110, 0xff]);

        assert_eq!(cursor.read_bits(1).unwrap(), 0);
        assert_eq!(cursor.read_bits(2).unwrap(), 0b11);
        assert_eq!(cursor.read_bits(5).unwrap(), 0b10100);
        assert_eq!(cursor.position(), 8);
    }

    #[test]
    fn read_bits_across_bytes() {
        let mut cursor = BitCursor::new(&[0xf0, 0x0f]);
        cursor.skip_bits(4).unwrap();

        assert_eq!(cursor.read_bits(8).unwrap(), 0xff);
    }

    #[test]
    fn read_u32_little_endian() {
        let mut cursor = BitCursor::new(&[0x78, 0x56, 0x34, 0x12]);

        assert_eq!(cursor.read_u32().unwrap(), 0x1234_5678);
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn read_64_bits() {
        let mut cursor = BitCursor::new(&[0xff; 8]);

        assert_eq!(cursor.read_bits(64).unwrap(), u64::MAX);
    }

    #[test]
    fn read_zero_bits() {
        let mut cursor = BitCursor::new(&[]);

        assert_eq!(cursor.read_bits(0).unwrap(), 0);
        assert_eq!(cursor.read_signed_bits(0).unwrap(), 0);
    }

    #[test]
    fn read_signed() {
        let mut cursor = BitCursor::new(&[0b0111_1111, 0b0000_0011]);

        // low nibble 0xf, then 0x7, then 0b11
        assert_eq!(cursor.read_signed_bits(4).unwrap(), -1);
        assert_eq!(cursor.read_signed_bits(4).unwrap(), 7);
        assert_eq!(cursor.read_signed_bits(2).unwrap(), -1);
    }

    #[test]
    fn reread_after_seek() {
        let data = [0x3c, 0xa5, 0x5a];
        let mut cursor = BitCursor::new(&data);
        cursor.skip_bits(3).unwrap();

        let start = cursor.position();
        let first = cursor.read_bits(13).unwrap();

        cursor.seek(start).unwrap();
        assert_eq!(cursor.read_bits(13).unwrap(), first);
    }

    #[test]
    fn seek_to_end_then_underrun() {
        let data = [1, 2, 3];
        let mut cursor = BitCursor::new(&data);

        cursor.seek(24).unwrap();

        assert!(matches!(
            cursor.read_bits(1),
            Err(DccError::BufferUnderrun {
                requested: 1,
                remaining: 0
            })
        ));
    }

    #[test]
    fn seek_past_end() {
        let mut cursor = BitCursor::new(&[0]);

        assert!(matches!(
            cursor.seek(9),
            Err(DccError::SeekOutOfRange {
                position: 9,
                length: 8
            })
        ));
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn failed_read_does_not_move() {
        let mut cursor = BitCursor::new(&[0xff]);
        cursor.skip_bits(3).unwrap();

        assert!(cursor.read_bits(6).is_err());
        assert_eq!(cursor.position(), 3);
        assert!(matches!(
            cursor.read_bits(65),
            Err(DccError::TooManyBits { requested: 65 })
        ));
    }

    #[test]
    fn byte_string_aligned_and_unaligned() {
        let data = [b'B', b'I', b'K', 0x00];
        let mut cursor = BitCursor::new(&data);

        assert_eq!(cursor.read_byte_string(3).unwrap(), b"BIK".to_vec());

        let data = [0x10, 0x32, 0x04];
        let mut cursor = BitCursor::new(&data);
        cursor.skip_bits(4).unwrap();

        assert_eq!(cursor.read_byte_string(2).unwrap(), vec![0x21, 0x43]);
        assert!(cursor.read_byte_string(1).is_err());
    }

    #[test]
    fn skip_and_align() {
        let mut cursor = BitCursor::new(&[0, 0, 0]);

        cursor.skip_bits(3).unwrap();
        cursor.align_to_byte().unwrap();
        assert_eq!(cursor.position(), 8);

        cursor.align_to_byte().unwrap();
        assert_eq!(cursor.position(), 8);

        cursor.skip_bytes(2).unwrap();
        assert_eq!(cursor.remaining(), 0);
        assert!(cursor.skip_bytes(1).is_err());
    }

    #[test]
    fn sign_extend_widths() {
        assert_eq!(sign_extend(0b1111_1111, 8), -1);
        assert_eq!(sign_extend(0b0111_1111, 8), 127);
        assert_eq!(sign_extend(u64::MAX, 64), -1);
    }
}
