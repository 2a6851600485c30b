//! Bit-granular writer for LSB-first packed formats.
//!
//! Bits fill each byte from its least significant bit upward, which makes plain
//! multi-byte values come out little-endian.

pub struct BitWriter {
    pub data: Vec<u8>,
    bit_offset: usize,
}

impl Default for BitWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl BitWriter {
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            bit_offset: 0,
        }
    }

    /// Current position in bits.
    pub fn get_bit_offset(&self) -> usize {
        self.bit_offset
    }

    /// Current position in whole bytes, rounded up.
    pub fn get_offset(&self) -> usize {
        self.bit_offset.div_ceil(8)
    }

    /// Appends the low `count` bits of `value`, low bit first.
    pub fn append_bits(&mut self, value: u64, count: usize) {
        assert!(count <= 64, "cannot append more than 64 bits at once");

        for bit in 0..count {
            let byte_index = self.bit_offset / 8;

            if byte_index == self.data.len() {
                self.data.push(0);
            }

            if (value >> bit) & 1 == 1 {
                self.data[byte_index] |= 1 << (self.bit_offset % 8);
            }

            self.bit_offset += 1;
        }
    }

    /// Appends the two's complement form of `value` truncated to `count` bits.
    pub fn append_signed_bits(&mut self, value: i64, count: usize) {
        self.append_bits(value as u64, count);
    }

    pub fn append_bool(&mut self, value: bool) {
        self.append_bits(value as u64, 1);
    }

    pub fn append_u8(&mut self, i: u8) {
        self.append_bits(i as u64, 8);
    }

    pub fn append_u32(&mut self, i: u32) {
        self.append_bits(i as u64, 32);
    }

    pub fn append_u8_slice(&mut self, i: &[u8]) {
        if self.bit_offset % 8 == 0 {
            self.data.extend_from_slice(i);
            self.bit_offset += i.len() * 8;
        } else {
            i.iter().for_each(|byte| self.append_u8(*byte));
        }
    }

    /// Pads with zero bits up to the next byte boundary.
    pub fn align_to_byte(&mut self) {
        self.bit_offset = self.get_offset() * 8;
    }

    pub fn replace(&mut self, start: usize, length: usize, slice: &[u8]) {
        self.data[start..(length + start)].copy_from_slice(&slice[..length]);
    }

    pub fn replace_with_u32(&mut self, start: usize, val: u32) {
        let bytes = val.to_le_bytes();
        self.replace(start, 4, &bytes);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn bits_fill_low_to_high() {
        let mut writer = BitWriter::new();

        writer.append_bits(0b1, 1);
        writer.append_bits(0b01, 2);
        writer.append_bits(0b11111, 5);

        assert_eq!(writer.data, vec![0b1111_1011]);
        assert_eq!(writer.get_bit_offset(), 8);
    }

    #[test]
    fn u32_is_little_endian() {
        let mut writer = BitWriter::new();
        writer.append_u32(0x1234_5678);

        assert_eq!(writer.data, vec![0x78, 0x56, 0x34, 0x12]);
    }

    #[test]
    fn signed_bits_truncate() {
        let mut writer = BitWriter::new();
        writer.append_signed_bits(-1, 4);

        assert_eq!(writer.data, vec![0b0000_1111]);
        assert_eq!(writer.get_bit_offset(), 4);
    }

    #[test]
    fn align_and_unaligned_slice() {
        let mut writer = BitWriter::new();

        writer.append_bool(true);
        writer.append_u8_slice(&[0xff]);

        assert_eq!(writer.data, vec![0xff, 0x01]);
        assert_eq!(writer.get_bit_offset(), 9);

        writer.align_to_byte();
        assert_eq!(writer.get_bit_offset(), 16);

        writer.append_u8_slice(&[0xab]);
        assert_eq!(writer.data, vec![0xff, 0x01, 0xab]);
    }

    #[test]
    fn patch_u32() {
        let mut writer = BitWriter::new();
        writer.append_u32(0);
        writer.append_u8(7);

        writer.replace_with_u32(0, 42);

        assert_eq!(writer.data, vec![42, 0, 0, 0, 7]);
    }
}
