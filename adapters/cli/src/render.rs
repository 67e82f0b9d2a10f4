//! Text presentation of boards and session status.

use unblock_jam_core::{Axis, BlockIndex, Coordinate, Level, ScoreBook, SlideRange};
use unblock_jam_world::{query, World};

/// Labels assigned to blocks by index. The main block is always `0`.
const BLOCK_LABELS: &str = "0abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
const UNLABELLED_BLOCK: char = '?';
const EMPTY_CELL: char = '.';

/// Label shown on the board for the block at `index`.
pub(crate) fn block_label(index: BlockIndex) -> char {
    BLOCK_LABELS
        .chars()
        .nth(index.get())
        .unwrap_or(UNLABELLED_BLOCK)
}

/// Resolves a label typed by the player back to a block index.
pub(crate) fn parse_block_label(label: &str) -> Option<BlockIndex> {
    let mut chars = label.chars();
    let first = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    BLOCK_LABELS.find(first).map(BlockIndex::new)
}

/// Status lines shown above the board.
pub(crate) fn header(world: &World, scores: &ScoreBook) -> String {
    let level = query::level_index(world);
    let board = query::current_level(world);
    let completed = if scores.is_completed(level) {
        "  (Completed)"
    } else {
        ""
    };
    let best = scores
        .best_score(level)
        .map_or_else(|| "-".to_owned(), |score| score.to_string());

    format!(
        "Puzzle {}/{}{completed}\nMoves: {}   Best / optimal: {best} / {}",
        level.get() + 1,
        query::level_count(world),
        query::moves(world),
        board.optimal_moves(),
    )
}

/// Draws the board with row numbers on the left and column numbers below.
///
/// Row 0 is printed last so the picture matches the bottom-left coordinates
/// used by `move` and `drag`. The exit replaces the border cell next to it.
pub(crate) fn board(level: &Level) -> String {
    let width = level.dimension().width();
    let height = level.dimension().height();
    let exit = level.exit();
    let gutter = (height - 1).max(0).to_string().len();
    let margin = " ".repeat(gutter);

    let edge = |row: i32, marker: char| {
        let cells: String = (0..width)
            .map(|column| {
                if exit == Coordinate::new(column, row) {
                    marker
                } else {
                    '-'
                }
            })
            .collect();
        format!("{margin} +{cells}+")
    };

    let mut lines = vec![edge(height, '^')];
    for row in (0..height).rev() {
        let left = if exit == Coordinate::new(-1, row) {
            '<'
        } else {
            '|'
        };
        let right = if exit == Coordinate::new(width, row) {
            '>'
        } else {
            '|'
        };
        let cells: String = (0..width)
            .map(|column| cell(level, Coordinate::new(column, row)))
            .collect();
        lines.push(format!("{row:>gutter$} {left}{cells}{right}"));
    }
    lines.push(edge(-1, 'v'));

    let columns: String = (0..width)
        .filter_map(|column| char::from_digit(column.unsigned_abs() % 10, 10))
        .collect();
    lines.push(format!("{margin}  {columns}"));
    lines.join("\n")
}

fn cell(level: &Level, position: Coordinate) -> char {
    level
        .blocks()
        .iter()
        .position(|block| block.contains(position))
        .map_or(EMPTY_CELL, |index| block_label(BlockIndex::new(index)))
}

/// One-line description of a block's slide range.
pub(crate) fn slide_range(index: BlockIndex, range: SlideRange) -> String {
    let (direction, coordinate) = match range.axis() {
        Axis::Horizontal => ("horizontally", "x"),
        Axis::Vertical => ("vertically", "y"),
    };
    format!(
        "Block {} slides {direction}: {coordinate} from {} to {}",
        block_label(index),
        range.min(),
        range.max()
    )
}
