use bit_writer::BitWriter;

use crate::{
    error::DccError, Dcc, DccHeader, DescriptorLayout, Direction, DirectionBitWidths, Frame,
    MAX_FIELD_BITS, PACKED_BIT_WIDTHS,
};

trait WriteToWriter {
    fn write_to_bytes(
        &self,
        writer: &mut BitWriter,
        layout: DescriptorLayout,
    ) -> Result<(), DccError>;
}

impl Dcc {
    /// Encodes the container, direction and frame headers. Frame payloads are not written.
    ///
    /// Direction offsets are recomputed, every direction starts on a byte boundary.
    pub fn write_to_bytes(&self, layout: DescriptorLayout) -> Result<Vec<u8>, DccError> {
        let mut writer = BitWriter::new();

        let Self { header, directions } = self;

        let DccHeader {
            signature,
            version,
            frames_per_direction,
            ..
        } = header;

        let direction_count = u8::try_from(directions.len()).map_err(|_| {
            DccError::TooManyDirections {
                count: directions.len(),
            }
        })?;

        writer.append_u8(*signature);
        writer.append_u8(*version);
        writer.append_u8(direction_count);
        writer.append_u32(*frames_per_direction);
        writer.append_u32(1);

        let total_size_offset = writer.get_offset();
        writer.append_u32(0);

        let offset_table = writer.get_offset();
        directions.iter().for_each(|_| writer.append_u32(0));

        for (index, direction) in directions.iter().enumerate() {
            writer.align_to_byte();

            let direction_offset = writer.get_offset() as u32;
            writer.replace_with_u32(offset_table + index * 4, direction_offset);

            direction.write_to_bytes(&mut writer, layout)?;
        }

        writer.align_to_byte();

        let total_size = writer.data.len() as u32;
        writer.replace_with_u32(total_size_offset, total_size);

        Ok(writer.data)
    }
}

impl WriteToWriter for DirectionBitWidths {
    fn write_to_bytes(
        &self,
        writer: &mut BitWriter,
        layout: DescriptorLayout,
    ) -> Result<(), DccError> {
        for (bits, field) in self.to_array().into_iter().zip(Self::FIELD_NAMES) {
            match layout {
                DescriptorLayout::Plain => {
                    if bits > MAX_FIELD_BITS {
                        return Err(DccError::UnencodableBitWidth { field, bits });
                    }

                    writer.append_u8(bits as u8);
                }
                DescriptorLayout::Packed => {
                    let code = PACKED_BIT_WIDTHS
                        .iter()
                        .position(|&width| width == bits)
                        .ok_or(DccError::UnencodableBitWidth { field, bits })?;

                    writer.append_bits(code as u64, 4);
                }
            }
        }

        Ok(())
    }
}

impl WriteToWriter for Direction {
    fn write_to_bytes(
        &self,
        writer: &mut BitWriter,
        layout: DescriptorLayout,
    ) -> Result<(), DccError> {
        if layout == DescriptorLayout::Packed {
            writer.append_u32(self.coded_size.unwrap_or(0));
            writer.append_bits(self.compression_flags.unwrap_or(0) as u64, 2);
        }

        self.bit_widths.write_to_bytes(writer, layout)?;

        for frame in &self.frames {
            write_frame_header(frame, self.bit_widths, writer)?;
        }

        Ok(())
    }
}

fn check_unsigned(field: &'static str, value: u64, bits: u32) -> Result<(), DccError> {
    if bits < 64 && value >> bits != 0 {
        return Err(DccError::UnencodableValue {
            field,
            value: value as i64,
            bits,
        });
    }

    Ok(())
}

/// Two's complement range of `bits`. Zero bits only holds 0.
fn check_signed(field: &'static str, value: i64, bits: u32) -> Result<(), DccError> {
    let fits = match bits {
        0 => value == 0,
        64.. => true,
        _ => {
            let half = 1i64 << (bits - 1);
            (-half..half).contains(&value)
        }
    };

    if !fits {
        return Err(DccError::UnencodableValue { field, value, bits });
    }

    Ok(())
}

fn write_frame_header(
    frame: &Frame,
    widths: DirectionBitWidths,
    writer: &mut BitWriter,
) -> Result<(), DccError> {
    let Frame {
        width,
        height,
        x_offset,
        y_offset,
        optional_bytes,
        coded_bytes,
        bottom_up,
        ..
    } = frame;

    check_unsigned("width", *width as u64, widths.width)?;
    check_unsigned("height", *height as u64, widths.height)?;
    check_signed("x_offset", *x_offset as i64, widths.x_offset)?;
    check_signed("y_offset", *y_offset as i64, widths.y_offset)?;
    check_unsigned("optional_data", *optional_bytes as u64, widths.optional_data)?;
    check_unsigned("coded_bytes", *coded_bytes as u64, widths.coded_bytes)?;

    // variable0 is never kept
    writer.append_bits(0, widths.variable0 as usize);
    writer.append_bits(*width as u64, widths.width as usize);
    writer.append_bits(*height as u64, widths.height as usize);
    writer.append_signed_bits(*x_offset as i64, widths.x_offset as usize);
    writer.append_signed_bits(*y_offset as i64, widths.y_offset as usize);
    writer.append_bits(*optional_bytes as u64, widths.optional_data as usize);
    writer.append_bits(*coded_bytes as u64, widths.coded_bytes as usize);
    writer.append_bool(*bottom_up);

    Ok(())
}
