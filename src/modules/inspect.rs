use std::path::Path;

use dcc::{Dcc, DecodeOptions};
use eyre::eyre;

use super::report::{CellReport, DccReport};

pub fn inspect(path: &Path, options: DecodeOptions) -> eyre::Result<DccReport> {
    let dcc = Dcc::open_from_file(path, options)?;

    log::info!(
        "{}: {} directions, {} frames",
        path.display(),
        dcc.directions.len(),
        dcc.frame_count()
    );

    Ok((&dcc).into())
}

/// Cells of one frame. Only the requested direction is decoded.
pub fn frame_cells(
    path: &Path,
    direction_index: usize,
    frame_index: usize,
    options: DecodeOptions,
) -> eyre::Result<Vec<CellReport>> {
    let bytes = std::fs::read(path)?;
    let direction = Dcc::decode_direction(&bytes, direction_index, options)?;

    let frame = direction.frames.get(frame_index).ok_or_else(|| {
        eyre!(
            "Frame index ({}) out of range. Have ({}) frames",
            frame_index,
            direction.frames.len()
        )
    })?;

    Ok(frame.cells.iter().map(CellReport::from).collect())
}
