use rayon::prelude::*;

use crate::{
    bit_cursor::BitCursor,
    cells::{CellGrid, MAX_FRAME_CELLS},
    error::DccError,
    Dcc, DccHeader, DecodeOptions, DescriptorLayout, Direction, DirectionBitWidths, Frame,
    Rectangle, DCC_SIGNATURE, DIRECTION_OFFSET_MULTIPLIER, MAX_FIELD_BITS, PACKED_BIT_WIDTHS,
};

pub fn parse_header(cursor: &mut BitCursor) -> Result<DccHeader, DccError> {
    let signature = cursor.read_u8()?;

    if signature != DCC_SIGNATURE {
        return Err(DccError::InvalidSignature { found: signature });
    }

    let version = cursor.read_u8()?;
    let direction_count = cursor.read_u8()?;
    let frames_per_direction = cursor.read_u32()?;

    let sentinel = cursor.read_u32()?;

    if sentinel != 1 {
        return Err(DccError::InvalidSentinel { found: sentinel });
    }

    // total size coded
    cursor.read_u32()?;

    let direction_offsets = (0..direction_count)
        .map(|_| cursor.read_u32())
        .collect::<Result<Vec<u32>, DccError>>()?;

    Ok(DccHeader {
        signature,
        version,
        direction_count,
        frames_per_direction,
        direction_offsets,
    })
}

/// Returns `(coded_size, compression_flags, bit_widths)`.
///
/// The first two are only stored by the packed layout.
pub fn parse_bit_widths(
    cursor: &mut BitCursor,
    layout: DescriptorLayout,
) -> Result<(Option<u32>, Option<u8>, DirectionBitWidths), DccError> {
    let mut widths = [0u32; 7];

    match layout {
        DescriptorLayout::Plain => {
            for (width, field) in widths.iter_mut().zip(DirectionBitWidths::FIELD_NAMES) {
                let bits = cursor.read_u8()? as u32;

                if bits > MAX_FIELD_BITS {
                    return Err(DccError::InvalidBitWidth { field, bits });
                }

                *width = bits;
            }

            Ok((None, None, DirectionBitWidths::from_array(widths)))
        }
        DescriptorLayout::Packed => {
            let coded_size = cursor.read_u32()?;
            let compression_flags = cursor.read_bits(2)? as u8;

            for width in widths.iter_mut() {
                let code = cursor.read_bits(4)? as usize;
                *width = PACKED_BIT_WIDTHS[code];
            }

            Ok((
                Some(coded_size),
                Some(compression_flags),
                DirectionBitWidths::from_array(widths),
            ))
        }
    }
}

/// Reads one frame header. Cells are left empty until the direction box is known.
pub fn parse_frame_header(
    cursor: &mut BitCursor,
    widths: DirectionBitWidths,
    direction_index: usize,
    frame_index: usize,
) -> Result<Frame, DccError> {
    // variable0, meaning unknown
    cursor.read_bits(widths.variable0 as usize)?;

    let width = cursor.read_bits(widths.width as usize)? as u32;
    let height = cursor.read_bits(widths.height as usize)? as u32;
    let x_offset = cursor.read_signed_bits(widths.x_offset as usize)? as i32;
    let y_offset = cursor.read_signed_bits(widths.y_offset as usize)? as i32;
    let optional_bytes = cursor.read_bits(widths.optional_data as usize)? as u32;
    let coded_bytes = cursor.read_bits(widths.coded_bytes as usize)? as u32;
    let bottom_up = cursor.read_bit()?;

    if bottom_up {
        return Err(DccError::UnsupportedFrameOrientation {
            direction: direction_index,
            frame: frame_index,
        });
    }

    let bounding_box = Rectangle {
        left: x_offset as i64,
        top: y_offset as i64 - height as i64 + 1,
        width: width as u64,
        height: height as u64,
    };

    log::trace!(
        "direction {} frame {}: {}x{} at ({}, {})",
        direction_index,
        frame_index,
        width,
        height,
        x_offset,
        y_offset
    );

    Ok(Frame {
        width,
        height,
        x_offset,
        y_offset,
        optional_bytes,
        coded_bytes,
        bottom_up,
        bounding_box,
        horizontal_cell_count: 0,
        vertical_cell_count: 0,
        cells: vec![],
    })
}

/// Decodes one direction with its own cursor over the shared buffer.
pub fn parse_direction(
    data: &[u8],
    header: &DccHeader,
    direction_index: usize,
    layout: DescriptorLayout,
) -> Result<Direction, DccError> {
    let offset = *header
        .direction_offsets
        .get(direction_index)
        .ok_or(DccError::DirectionOutOfRange {
            index: direction_index,
            count: header.direction_offsets.len(),
        })? as usize;

    let mut cursor = BitCursor::new(data);
    cursor.seek(offset * DIRECTION_OFFSET_MULTIPLIER)?;

    let (coded_size, compression_flags, bit_widths) = parse_bit_widths(&mut cursor, layout)?;

    log::debug!(
        "direction {} at byte {}: bit widths {:?}",
        direction_index,
        offset,
        bit_widths.to_array()
    );

    let mut frames = (0..header.frames_per_direction as usize)
        .map(|frame_index| {
            parse_frame_header(&mut cursor, bit_widths, direction_index, frame_index)
        })
        .collect::<Result<Vec<Frame>, DccError>>()?;

    let payload_bit_offset = cursor.position();

    let bounding_box = frames
        .iter()
        .map(|frame| frame.bounding_box)
        .reduce(|acc, next| acc.union(&next))
        .unwrap_or_default();

    for (frame_index, frame) in frames.iter_mut().enumerate() {
        let cells = CellGrid::cell_count(&frame.bounding_box, &bounding_box);

        if cells > MAX_FRAME_CELLS {
            return Err(DccError::TooManyCells {
                direction: direction_index,
                frame: frame_index,
                cells,
                max: MAX_FRAME_CELLS,
            });
        }

        let grid = CellGrid::new(&frame.bounding_box, &bounding_box);

        frame.horizontal_cell_count = grid.horizontal_count;
        frame.vertical_cell_count = grid.vertical_count;
        frame.cells = grid.cells;
    }

    Ok(Direction {
        coded_size,
        compression_flags,
        bit_widths,
        bounding_box,
        payload_bit_offset,
        frames,
    })
}

pub fn parse_dcc(data: &[u8], options: DecodeOptions) -> Result<Dcc, DccError> {
    let mut cursor = BitCursor::new(data);
    let header = parse_header(&mut cursor)?;

    log::debug!(
        "DCC version {}: {} directions, {} frames per direction",
        header.version,
        header.direction_count,
        header.frames_per_direction
    );

    let direction_count = header.direction_offsets.len();

    let directions = if options.parallel {
        (0..direction_count)
            .into_par_iter()
            .map(|index| parse_direction(data, &header, index, options.layout))
            .collect::<Result<Vec<Direction>, DccError>>()?
    } else {
        (0..direction_count)
            .map(|index| parse_direction(data, &header, index, options.layout))
            .collect::<Result<Vec<Direction>, DccError>>()?
    };

    Ok(Dcc { header, directions })
}
