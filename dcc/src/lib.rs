//! DCC sprite animation container.
//!
//! A DCC file holds several directions, each with the same number of frames.
//! Every direction begins with a table of bit widths that says how wide each
//! field of its frame headers is, so frame headers are packed at bit granularity.
//!
//! Only container, direction and frame headers are decoded, plus the cell grid
//! every frame is cut into. Pixel data is left untouched.
pub mod bit_cursor;
pub mod cells;
pub mod error;
mod parser;
mod types;
mod utils;
mod writer;

pub use types::*;
