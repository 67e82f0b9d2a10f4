//! Move validation and win detection over immutable level snapshots.

use unblock_jam_core::{
    rectangles_overlap, within_bounds, Axis, Block, BlockIndex, Coordinate, Level, MoveRejection,
};

/// Result of a slide that the rules accepted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The block slid inside the grid; carries the next board snapshot.
    Moved(Level),
    /// The main block slid out through the exit.
    Won,
}

/// Validates a proposed slide and produces the next board snapshot.
///
/// A winning slide of the main block skips the bounds and overlap checks on
/// its final position because the block leaves the grid, but the exit row
/// between the block and the grid edge must be free. Every other slide must
/// keep the block on its free axis, inside the grid, and clear of all other
/// blocks. The input level is never modified.
///
/// The exit-row guard is stricter than the bare win rule in
/// [`is_winning_position`], which only looks at the target column.
pub fn attempt_move(
    level: &Level,
    index: BlockIndex,
    to: Coordinate,
) -> Result<MoveOutcome, MoveRejection> {
    let block = level.block(index).ok_or(MoveRejection::UnknownBlock)?;
    if to == block.position() {
        return Err(MoveRejection::Unchanged);
    }

    if is_winning_position(level, index, to) {
        if !exit_path_clear(level, index, block) {
            return Err(MoveRejection::Occupied);
        }
        return Ok(MoveOutcome::Won);
    }

    let stays_on_axis = match block.axis() {
        Axis::Horizontal => to.y() == block.y(),
        Axis::Vertical => to.x() == block.x(),
    };
    if !stays_on_axis {
        return Err(MoveRejection::ConstrainedAxis);
    }

    let candidate = block.with_position(to);
    if !within_bounds(&candidate, level.dimension()) {
        return Err(MoveRejection::OutOfBounds);
    }
    if level
        .other_blocks(index)
        .any(|other| rectangles_overlap(&candidate, other))
    {
        return Err(MoveRejection::Occupied);
    }

    level
        .with_block(index, candidate)
        .map(MoveOutcome::Moved)
        .ok_or(MoveRejection::UnknownBlock)
}

/// Reports whether placing the block at `to` satisfies the win condition.
///
/// The rule holds for the main block only: it must slide horizontally on the
/// exit row and its trailing column (`x + width - 1`) must reach or pass the
/// exit column. The same rule serves the mid-drag check and the drag-end check.
#[must_use]
pub fn is_winning_position(level: &Level, index: BlockIndex, to: Coordinate) -> bool {
    if !index.is_main() {
        return false;
    }
    let Some(block) = level.block(index) else {
        return false;
    };
    let exit = level.exit();

    block.axis() == Axis::Horizontal
        && block.y() == exit.y()
        && to.y() == block.y()
        && i64::from(to.x()) + i64::from(block.width()) - 1 >= i64::from(exit.x())
}

fn exit_path_clear(level: &Level, index: BlockIndex, block: &Block) -> bool {
    level.row_clear(block.y(), block.right()..level.dimension().width(), index)
}
