use std::{ffi::OsStr, path::Path};

use crate::{
    bit_cursor::BitCursor,
    error::DccError,
    parser::{parse_dcc, parse_direction, parse_header},
    Dcc, DecodeOptions, Direction,
};

impl Dcc {
    pub fn open_from_bytes(i: &[u8]) -> Result<Dcc, DccError> {
        Self::open_from_bytes_with(i, DecodeOptions::default())
    }

    pub fn open_from_bytes_with(i: &[u8], options: DecodeOptions) -> Result<Dcc, DccError> {
        parse_dcc(i, options)
    }

    pub fn open_from_file(
        path: impl AsRef<OsStr> + AsRef<Path>,
        options: DecodeOptions,
    ) -> Result<Dcc, DccError> {
        let file = std::fs::read(path)?;

        Self::open_from_bytes_with(&file, options)
    }

    /// Decodes a single direction without touching the others.
    pub fn decode_direction(
        i: &[u8],
        direction_index: usize,
        options: DecodeOptions,
    ) -> Result<Direction, DccError> {
        let mut cursor = BitCursor::new(i);
        let header = parse_header(&mut cursor)?;

        parse_direction(i, &header, direction_index, options.layout)
    }

    pub fn frame_count(&self) -> usize {
        self.directions.iter().map(|direction| direction.frames.len()).sum()
    }
}

impl Direction {
    /// Optional bytes of every frame, in frame order.
    ///
    /// They start at the first byte boundary after the frame headers. `i` must be the
    /// buffer this direction was decoded from.
    pub fn read_optional_data(&self, i: &[u8]) -> Result<Vec<Vec<u8>>, DccError> {
        let mut cursor = BitCursor::new(i);

        cursor.seek(self.payload_bit_offset)?;
        cursor.align_to_byte()?;

        self.frames
            .iter()
            .map(|frame| cursor.read_byte_string(frame.optional_bytes as usize))
            .collect()
    }

    /// Total payload bytes the frame headers announce.
    pub fn payload_len(&self) -> u64 {
        self.frames
            .iter()
            .map(|frame| frame.optional_bytes as u64 + frame.coded_bytes as u64)
            .sum()
    }
}
