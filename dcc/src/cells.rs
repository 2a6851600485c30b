//! Splits a frame into cells on the 4 pixel grid anchored at the direction box.
//!
//! Frames of one direction share the same grid, so a cell boundary in one frame
//! lines up with the same boundary in every other frame.

use crate::{Cell, Rectangle};

pub const CELL_SIZE: i64 = 4;

/// Upper bound on cells per frame, a 1024x1024 pixel frame.
///
/// Frame sizes come straight from the file, larger frames are rejected before
/// any cell is allocated.
pub const MAX_FRAME_CELLS: u64 = 1 << 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellGrid {
    pub horizontal_count: usize,
    pub vertical_count: usize,
    /// Row major.
    pub cells: Vec<Cell>,
}

fn first_span(frame_start: i64, direction_start: i64) -> i64 {
    CELL_SIZE - (frame_start - direction_start).rem_euclid(CELL_SIZE)
}

/// Number of cells along one axis.
pub fn axis_span_count(frame_start: i64, direction_start: i64, length: u32) -> u64 {
    let first = first_span(frame_start, direction_start);
    let length_i = length as i64;

    if length_i - first <= 1 {
        return 1;
    }

    let tmp = length_i - first - 1;
    let count = 2 + tmp / CELL_SIZE;

    if tmp % CELL_SIZE == 0 {
        (count - 1) as u64
    } else {
        count as u64
    }
}

/// Sizes of the cells along one axis.
///
/// The first cell only reaches the next grid line, so it is 1 to 4 wide. The
/// last cell absorbs whatever is left, which can be up to 5 wide.
pub fn axis_spans(frame_start: i64, direction_start: i64, length: u32) -> Vec<u32> {
    let count = axis_span_count(frame_start, direction_start, length) as i64;

    if count == 1 {
        return vec![length];
    }

    let first = first_span(frame_start, direction_start);
    let length_i = length as i64;

    let last = length_i - first - CELL_SIZE * (count - 2);

    let mut spans = Vec::with_capacity(count as usize);
    spans.push(first as u32);
    spans.extend(std::iter::repeat(CELL_SIZE as u32).take((count - 2) as usize));
    spans.push(last as u32);

    spans
}

impl CellGrid {
    /// Cell count of the grid [`CellGrid::new`] would build, without building it.
    pub fn cell_count(frame_box: &Rectangle, direction_box: &Rectangle) -> u64 {
        let horizontal =
            axis_span_count(frame_box.left, direction_box.left, frame_box.width as u32);
        let vertical = axis_span_count(frame_box.top, direction_box.top, frame_box.height as u32);

        horizontal.saturating_mul(vertical)
    }

    pub fn new(frame_box: &Rectangle, direction_box: &Rectangle) -> Self {
        let widths = axis_spans(frame_box.left, direction_box.left, frame_box.width as u32);
        let heights = axis_spans(frame_box.top, direction_box.top, frame_box.height as u32);

        let start_x = (frame_box.left - direction_box.left) as u64;
        let mut offset_y = (frame_box.top - direction_box.top) as u64;

        let mut cells = Vec::with_capacity(widths.len() * heights.len());

        for &height in &heights {
            let mut offset_x = start_x;

            for &width in &widths {
                cells.push(Cell {
                    x_offset: offset_x,
                    y_offset: offset_y,
                    width,
                    height,
                });

                offset_x += width as u64;
            }

            offset_y += height as u64;
        }

        Self {
            horizontal_count: widths.len(),
            vertical_count: heights.len(),
            cells,
        }
    }
}

#[cfg(test)]
mod test {
    use proptest::prelude::*;

    use super::*;

    fn rect(left: i64, top: i64, width: u64, height: u64) -> Rectangle {
        Rectangle {
            left,
            top,
            width,
            height,
        }
    }

    #[test]
    fn spans_table() {
        // aligned, exactly one grid step
        assert_eq!(axis_spans(0, 0, 4), vec![4]);
        // leftover of 1 merges into the single cell
        assert_eq!(axis_spans(0, 0, 5), vec![5]);
        assert_eq!(axis_spans(0, 0, 6), vec![4, 2]);
        assert_eq!(axis_spans(0, 0, 9), vec![4, 5]);
        assert_eq!(axis_spans(0, 0, 10), vec![4, 4, 2]);
        assert_eq!(axis_spans(0, 0, 13), vec![4, 4, 5]);
    }

    #[test]
    fn spans_unaligned_start() {
        // one pixel to the next grid line
        assert_eq!(axis_spans(3, 0, 2), vec![2]);
        assert_eq!(axis_spans(3, 0, 3), vec![1, 2]);
        assert_eq!(axis_spans(3, 0, 8), vec![1, 4, 3]);
        assert_eq!(axis_spans(-7, -9, 7), vec![2, 5]);
    }

    #[test]
    fn spans_degenerate() {
        assert_eq!(axis_spans(0, 0, 0), vec![0]);
        assert_eq!(axis_spans(1, 0, 1), vec![1]);
    }

    #[test]
    fn count_matches_spans() {
        for start in -5..5 {
            for length in 0..40 {
                assert_eq!(
                    axis_span_count(start, -3, length),
                    axis_spans(start, -3, length).len() as u64
                );
            }
        }
    }

    #[test]
    fn cell_count_of_huge_frame() {
        let frame = rect(0, 0, 1 << 24, 1 << 24);

        // counted, never allocated
        assert_eq!(CellGrid::cell_count(&frame, &frame), 1 << 44);
        assert!(CellGrid::cell_count(&frame, &frame) > MAX_FRAME_CELLS);

        let widest = rect(0, 0, u32::MAX as u64, u32::MAX as u64);
        assert!(CellGrid::cell_count(&widest, &widest) > MAX_FRAME_CELLS);
    }

    #[test]
    fn single_cell_when_frame_equals_first_column() {
        let frame = rect(0, 0, 4, 4);
        let grid = CellGrid::new(&frame, &frame);

        assert_eq!(grid.horizontal_count, 1);
        assert_eq!(grid.vertical_count, 1);
        assert_eq!(
            grid.cells,
            vec![Cell {
                x_offset: 0,
                y_offset: 0,
                width: 4,
                height: 4
            }]
        );
    }

    #[test]
    fn two_by_two_grid() {
        let frame = rect(0, 0, 8, 8);
        let grid = CellGrid::new(&frame, &frame);

        assert_eq!(grid.cells.len(), 4);
        assert!(grid.cells.iter().all(|c| c.width == 4 && c.height == 4));

        let offsets: Vec<_> = grid.cells.iter().map(|c| (c.x_offset, c.y_offset)).collect();
        assert_eq!(offsets, vec![(0, 0), (4, 0), (0, 4), (4, 4)]);
    }

    #[test]
    fn offsets_are_relative_to_direction() {
        let direction = rect(-10, -20, 40, 40);
        let frame = rect(-5, -18, 9, 3);
        let grid = CellGrid::new(&frame, &direction);

        // 5 mod 4 = 1, first column is 3 wide; 2 mod 4 = 2, first row is 2 high
        assert_eq!(grid.horizontal_count, 3);
        assert_eq!(grid.vertical_count, 1);

        let spans: Vec<_> = grid
            .cells
            .iter()
            .map(|c| (c.x_offset, c.y_offset, c.width, c.height))
            .collect();
        assert_eq!(spans, vec![(5, 2, 3, 3), (8, 2, 4, 3), (12, 2, 2, 3)]);
    }

    proptest! {
        #[test]
        fn grid_covers_frame(
            dir_left in -64i64..64,
            dir_top in -64i64..64,
            dx in 0i64..32,
            dy in 0i64..32,
            width in 0u64..80,
            height in 0u64..80,
        ) {
            let direction = rect(dir_left, dir_top, 200, 200);
            let frame = rect(dir_left + dx, dir_top + dy, width, height);
            let grid = CellGrid::new(&frame, &direction);

            prop_assert_eq!(grid.cells.len(), grid.horizontal_count * grid.vertical_count);

            for row in grid.cells.chunks(grid.horizontal_count) {
                let row_width: u64 = row.iter().map(|c| c.width as u64).sum();
                prop_assert_eq!(row_width, width);
            }

            for x in 0..grid.horizontal_count {
                let column_height: u64 = grid
                    .cells
                    .iter()
                    .skip(x)
                    .step_by(grid.horizontal_count)
                    .map(|c| c.height as u64)
                    .sum();
                prop_assert_eq!(column_height, height);
            }

            let first = grid.cells[0];
            prop_assert_eq!(first.x_offset, dx as u64);
            prop_assert_eq!(first.y_offset, dy as u64);

            // every cell after the first column starts on the grid
            for (i, cell) in grid.cells.iter().enumerate() {
                if i % grid.horizontal_count != 0 {
                    prop_assert_eq!(cell.x_offset % 4, 0);
                }
            }
        }
    }
}
