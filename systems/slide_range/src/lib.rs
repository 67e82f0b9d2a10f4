#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that computes how far a block may slide along its free axis.
//!
//! Adapters query the range when a drag gesture starts and clamp the dragged
//! block to it. The range is advisory: the world re-validates every slide it
//! receives.

use unblock_jam_core::{Axis, Block, BlockIndex, Coordinate, Level, SlideRange};

/// Computes the inclusive range of origins the block may occupy.
///
/// The range grows from the block's current origin in both directions until
/// it meets another block or the grid edge. The main block additionally gets
/// the exit extension: when it sits on the exit row and nothing stands between
/// it and the grid edge, the upper bound becomes the exit column so the block
/// can slide out of the grid.
///
/// Returns `None` when the index does not name a block.
#[must_use]
pub fn slide_range(level: &Level, index: BlockIndex) -> Option<SlideRange> {
    let block = level.block(index)?;
    let range = match block.axis() {
        Axis::Horizontal => horizontal_range(level, index, block),
        Axis::Vertical => vertical_range(level, index, block),
    };
    Some(range)
}

fn horizontal_range(level: &Level, index: BlockIndex, block: &Block) -> SlideRange {
    let grid_width = level.dimension().width();
    let column_free = |column: i32| {
        (block.y()..block.top())
            .all(|row| !level.is_occupied(Coordinate::new(column, row), index))
    };

    let mut min = block.x();
    while min > 0 && column_free(min - 1) {
        min -= 1;
    }

    let mut max = block.x();
    while max + block.width() < grid_width && column_free(max + block.width()) {
        max += 1;
    }

    let exit = level.exit();
    if index.is_main()
        && block.y() == exit.y()
        && level.row_clear(block.y(), max + block.width()..grid_width, index)
    {
        max = exit.x();
    }

    SlideRange::new(Axis::Horizontal, min, max)
}

fn vertical_range(level: &Level, index: BlockIndex, block: &Block) -> SlideRange {
    let grid_height = level.dimension().height();
    let row_free = |row: i32| {
        (block.x()..block.right())
            .all(|column| !level.is_occupied(Coordinate::new(column, row), index))
    };

    let mut min = block.y();
    while min > 0 && row_free(min - 1) {
        min -= 1;
    }

    let mut max = block.y();
    while max + block.height() < grid_height && row_free(max + block.height()) {
        max += 1;
    }

    SlideRange::new(Axis::Vertical, min, max)
}
