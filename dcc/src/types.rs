pub const DCC_SIGNATURE: u8 = 0x74;

/// Byte offsets in the header are turned into bit offsets with this.
pub const DIRECTION_OFFSET_MULTIPLIER: usize = 8;

/// Bit counts addressed by the 4-bit codes of [`DescriptorLayout::Packed`].
pub const PACKED_BIT_WIDTHS: [u32; 16] = [0, 1, 2, 4, 6, 8, 10, 12, 14, 16, 20, 24, 26, 28, 30, 32];

pub const MAX_FIELD_BITS: u32 = 32;

/// How the seven bit-width descriptors at the start of a direction are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DescriptorLayout {
    /// One byte per descriptor holding the bit count itself.
    #[default]
    Plain,
    /// 32-bit coded size, 2-bit compression flags, then seven 4-bit codes
    /// looked up in [`PACKED_BIT_WIDTHS`].
    Packed,
}

/// Defaults to the plain layout, decoded sequentially on the calling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecodeOptions {
    pub layout: DescriptorLayout,
    /// Decode directions on the rayon pool. Off by default, `dcctool` turns it on.
    pub parallel: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rectangle {
    pub left: i64,
    pub top: i64,
    pub width: u64,
    pub height: u64,
}

impl Rectangle {
    /// Exclusive.
    pub fn right(&self) -> i64 {
        self.left + self.width as i64
    }

    /// Exclusive.
    pub fn bottom(&self) -> i64 {
        self.top + self.height as i64
    }

    pub fn union(&self, other: &Rectangle) -> Rectangle {
        let left = self.left.min(other.left);
        let top = self.top.min(other.top);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());

        Rectangle {
            left,
            top,
            width: (right - left) as u64,
            height: (bottom - top) as u64,
        }
    }
}

/// Per-direction schema for every frame header in that direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DirectionBitWidths {
    pub variable0: u32,
    pub width: u32,
    pub height: u32,
    pub x_offset: u32,
    pub y_offset: u32,
    pub optional_data: u32,
    pub coded_bytes: u32,
}

impl DirectionBitWidths {
    pub const FIELD_NAMES: [&'static str; 7] = [
        "variable0",
        "width",
        "height",
        "x_offset",
        "y_offset",
        "optional_data",
        "coded_bytes",
    ];

    pub fn uniform(bits: u32) -> Self {
        Self::from_array([bits; 7])
    }

    pub fn from_array(arr: [u32; 7]) -> Self {
        let [variable0, width, height, x_offset, y_offset, optional_data, coded_bytes] = arr;

        Self {
            variable0,
            width,
            height,
            x_offset,
            y_offset,
            optional_data,
            coded_bytes,
        }
    }

    pub fn to_array(self) -> [u32; 7] {
        [
            self.variable0,
            self.width,
            self.height,
            self.x_offset,
            self.y_offset,
            self.optional_data,
            self.coded_bytes,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// Relative to the direction box, not the frame.
    pub x_offset: u64,
    pub y_offset: u64,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub x_offset: i32,
    pub y_offset: i32,
    pub optional_bytes: u32,
    pub coded_bytes: u32,
    pub bottom_up: bool,
    pub bounding_box: Rectangle,
    pub horizontal_cell_count: usize,
    pub vertical_cell_count: usize,
    pub cells: Vec<Cell>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Direction {
    /// Only present for [`DescriptorLayout::Packed`].
    pub coded_size: Option<u32>,
    /// Only present for [`DescriptorLayout::Packed`].
    pub compression_flags: Option<u8>,
    pub bit_widths: DirectionBitWidths,
    pub bounding_box: Rectangle,
    /// Where the frame payload starts, right after the last frame header.
    pub payload_bit_offset: usize,
    pub frames: Vec<Frame>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DccHeader {
    pub signature: u8,
    pub version: u8,
    pub direction_count: u8,
    pub frames_per_direction: u32,
    /// In bytes from the start of the file.
    pub direction_offsets: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dcc {
    pub header: DccHeader,
    pub directions: Vec<Direction>,
}
