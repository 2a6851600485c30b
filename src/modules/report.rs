use std::fmt::{self, Write};

use dcc::{Cell, Dcc, Direction, Frame, Rectangle};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct BoxReport {
    pub left: i64,
    pub top: i64,
    pub width: u64,
    pub height: u64,
}

impl From<&Rectangle> for BoxReport {
    fn from(value: &Rectangle) -> Self {
        Self {
            left: value.left,
            top: value.top,
            width: value.width,
            height: value.height,
        }
    }
}

impl fmt::Display for BoxReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{} at ({}, {})",
            self.width, self.height, self.left, self.top
        )
    }
}

#[derive(Debug, Serialize)]
pub struct CellReport {
    pub x_offset: u64,
    pub y_offset: u64,
    pub width: u32,
    pub height: u32,
}

impl From<&Cell> for CellReport {
    fn from(value: &Cell) -> Self {
        Self {
            x_offset: value.x_offset,
            y_offset: value.y_offset,
            width: value.width,
            height: value.height,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FrameReport {
    pub width: u32,
    pub height: u32,
    pub x_offset: i32,
    pub y_offset: i32,
    pub optional_bytes: u32,
    pub coded_bytes: u32,
    pub bounding_box: BoxReport,
    pub horizontal_cells: usize,
    pub vertical_cells: usize,
}

impl From<&Frame> for FrameReport {
    fn from(value: &Frame) -> Self {
        Self {
            width: value.width,
            height: value.height,
            x_offset: value.x_offset,
            y_offset: value.y_offset,
            optional_bytes: value.optional_bytes,
            coded_bytes: value.coded_bytes,
            bounding_box: (&value.bounding_box).into(),
            horizontal_cells: value.horizontal_cell_count,
            vertical_cells: value.vertical_cell_count,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BitWidthReport {
    pub variable0: u32,
    pub width: u32,
    pub height: u32,
    pub x_offset: u32,
    pub y_offset: u32,
    pub optional_data: u32,
    pub coded_bytes: u32,
}

#[derive(Debug, Serialize)]
pub struct DirectionReport {
    pub offset: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coded_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compression_flags: Option<u8>,
    pub bit_widths: BitWidthReport,
    pub bounding_box: BoxReport,
    pub frames: Vec<FrameReport>,
}

impl DirectionReport {
    fn new(offset: u32, direction: &Direction) -> Self {
        let widths = direction.bit_widths;

        Self {
            offset,
            coded_size: direction.coded_size,
            compression_flags: direction.compression_flags,
            bit_widths: BitWidthReport {
                variable0: widths.variable0,
                width: widths.width,
                height: widths.height,
                x_offset: widths.x_offset,
                y_offset: widths.y_offset,
                optional_data: widths.optional_data,
                coded_bytes: widths.coded_bytes,
            },
            bounding_box: (&direction.bounding_box).into(),
            frames: direction.frames.iter().map(FrameReport::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DccReport {
    pub version: u8,
    pub direction_count: u8,
    pub frames_per_direction: u32,
    pub directions: Vec<DirectionReport>,
}

impl From<&Dcc> for DccReport {
    fn from(value: &Dcc) -> Self {
        Self {
            version: value.header.version,
            direction_count: value.header.direction_count,
            frames_per_direction: value.header.frames_per_direction,
            directions: value
                .header
                .direction_offsets
                .iter()
                .zip(&value.directions)
                .map(|(offset, direction)| DirectionReport::new(*offset, direction))
                .collect(),
        }
    }
}

impl DccReport {
    pub fn to_text(&self) -> Result<String, fmt::Error> {
        let mut out = String::new();

        writeln!(
            out,
            "DCC version {}, {} directions, {} frames per direction",
            self.version, self.direction_count, self.frames_per_direction
        )?;

        for (index, direction) in self.directions.iter().enumerate() {
            let widths = &direction.bit_widths;

            writeln!(
                out,
                "direction {} @ {}: box {}",
                index, direction.offset, direction.bounding_box
            )?;
            writeln!(
                out,
                "  bits: variable0 {} width {} height {} x {} y {} optional {} coded {}",
                widths.variable0,
                widths.width,
                widths.height,
                widths.x_offset,
                widths.y_offset,
                widths.optional_data,
                widths.coded_bytes
            )?;

            for (frame_index, frame) in direction.frames.iter().enumerate() {
                writeln!(
                    out,
                    "  frame {}: box {}, {}x{} cells, {} optional + {} coded bytes",
                    frame_index,
                    frame.bounding_box,
                    frame.horizontal_cells,
                    frame.vertical_cells,
                    frame.optional_bytes,
                    frame.coded_bytes
                )?;
            }
        }

        Ok(out)
    }
}
