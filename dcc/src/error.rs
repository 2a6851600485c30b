#[derive(Debug, thiserror::Error)]
pub enum DccError {
    #[error("Invalid DCC signature: {found:#04x}")]
    InvalidSignature { found: u8 },
    #[error("Header field after frame count must be 1. Have ({found})")]
    InvalidSentinel { found: u32 },
    #[error("Buffer underrun. Requested ({requested}) bits. Remaining ({remaining}) bits")]
    BufferUnderrun { requested: usize, remaining: usize },
    #[error("Cannot read more than 64 bits at once. Requested ({requested})")]
    TooManyBits { requested: usize },
    #[error("Seek to bit ({position}) is past the end of a {length} bit buffer")]
    SeekOutOfRange { position: usize, length: usize },
    #[error("Direction {direction} frame {frame} is bottom up, which is not supported")]
    UnsupportedFrameOrientation { direction: usize, frame: usize },
    #[error("Direction index ({index}) out of range. Have ({count}) directions")]
    DirectionOutOfRange { index: usize, count: usize },
    #[error("Direction {direction} frame {frame} has too many cells: {cells}. Max ({max})")]
    TooManyCells {
        direction: usize,
        frame: usize,
        cells: u64,
        max: u64,
    },
    #[error("Bit width of {field} is out of range: {bits}")]
    InvalidBitWidth { field: &'static str, bits: u32 },
    #[error("Bit width of {field} cannot be encoded in this layout: {bits}")]
    UnencodableBitWidth { field: &'static str, bits: u32 },
    #[error("Value of {field} does not fit in {bits} bits: {value}")]
    UnencodableValue {
        field: &'static str,
        value: i64,
        bits: u32,
    },
    #[error("Cannot write more than 255 directions. Have ({count})")]
    TooManyDirections { count: usize },
    #[error("IOError: {source}")]
    IOError {
        #[from]
        source: std::io::Error,
    },
}
