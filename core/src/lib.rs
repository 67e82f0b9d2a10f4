#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Unblock Jam engine.
//!
//! This crate defines the puzzle vocabulary and the message surface that
//! connects adapters, the authoritative world, and pure systems. Adapters
//! submit [`Command`] values describing player intents, the world executes
//! those commands via its `apply` entry point, and then broadcasts [`Event`]
//! values for systems and adapters to react to. Systems consume event streams,
//! query immutable [`Level`] snapshots, and respond exclusively with new
//! command batches.
//!
//! Coordinates use a bottom-left origin with rows increasing upward. A block
//! anchored at `(x, y)` with size `(w, h)` covers the half-open rectangle
//! `[x, x + w) × [y, y + h)`.

use std::{collections::BTreeMap, ops::Range, ops::RangeInclusive, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Unblock Jam.";

/// Commands that express all permissible session mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Requests that a block finish a slide at the provided position.
    SlideBlock {
        /// Block being moved.
        block: BlockIndex,
        /// Position the block's origin should occupy after the slide.
        to: Coordinate,
    },
    /// Reports the position of a block that is still being dragged.
    ///
    /// The world only reacts when the position wins the level; any other
    /// position leaves the board untouched.
    DragBlock {
        /// Block being dragged.
        block: BlockIndex,
        /// Position the block's origin currently snaps to.
        to: Coordinate,
    },
    /// Requests that the most recent accepted move be reverted.
    Undo,
    /// Requests that the active level return to its initial layout.
    Restart,
    /// Requests that the session switch to another level.
    ChangeLevel {
        /// Desired level; clamped to the registry bounds.
        level: LevelIndex,
    },
    /// Advances the session clock by the provided delta time.
    Tick {
        /// Duration of time that elapsed since the previous tick.
        dt: Duration,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the session clock advanced.
    TimeAdvanced {
        /// Duration of time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that a block slid to a new position.
    BlockMoved {
        /// Block that moved.
        block: BlockIndex,
        /// Origin of the block before the slide.
        from: Coordinate,
        /// Origin of the block after the slide.
        to: Coordinate,
        /// Move counter after the slide.
        moves: u32,
    },
    /// Reports that a slide request was rejected and the board is unchanged.
    MoveRejected {
        /// Block targeted by the request.
        block: BlockIndex,
        /// Requested origin.
        to: Coordinate,
        /// Specific reason the slide failed.
        reason: MoveRejection,
    },
    /// Announces that the main block reached the exit.
    LevelWon {
        /// Level that was solved.
        level: LevelIndex,
        /// Moves spent, including the exiting slide.
        moves: u32,
    },
    /// Confirms that the most recent move was reverted.
    MoveUndone {
        /// Move counter after the revert.
        moves: u32,
    },
    /// Reports that an undo request could not be honoured.
    UndoRejected {
        /// Specific reason the undo failed.
        reason: HistoryError,
    },
    /// Confirms that the active level returned to its initial layout.
    LevelRestarted {
        /// Level that restarted.
        level: LevelIndex,
    },
    /// Confirms that a level was loaded into the session.
    LevelChanged {
        /// Level that became active after clamping.
        level: LevelIndex,
    },
}

/// Location of a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coordinate {
    x: i32,
    y: i32,
}

impl Coordinate {
    /// Creates a new grid coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Column of the cell, counted from the left edge.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Row of the cell, counted from the bottom edge.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }
}

/// Size of a grid or block measured in whole cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimension {
    width: i32,
    height: i32,
}

impl Dimension {
    /// Creates a new size descriptor with explicit dimensions.
    #[must_use]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Width in cells.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Height in cells.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }
}

/// Axis along which a block may slide.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// Movement along columns.
    Horizontal,
    /// Movement along rows.
    Vertical,
}

/// Axis-aligned rectangular block placed on the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Block {
    position: Coordinate,
    dimension: Dimension,
}

impl Block {
    /// Constructs a block from its origin cell and size.
    #[must_use]
    pub const fn new(position: Coordinate, dimension: Dimension) -> Self {
        Self {
            position,
            dimension,
        }
    }

    /// Bottom-left cell anchoring the block.
    #[must_use]
    pub const fn position(&self) -> Coordinate {
        self.position
    }

    /// Size of the block in cells.
    #[must_use]
    pub const fn dimension(&self) -> Dimension {
        self.dimension
    }

    /// First column covered by the block.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.position.x
    }

    /// First row covered by the block.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.position.y
    }

    /// Width of the block in cells.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.dimension.width
    }

    /// Height of the block in cells.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.dimension.height
    }

    /// Column immediately to the right of the block, saturating at `i32::MAX`.
    #[must_use]
    pub const fn right(&self) -> i32 {
        self.position.x.saturating_add(self.dimension.width)
    }

    /// Row immediately above the block, saturating at `i32::MAX`.
    #[must_use]
    pub const fn top(&self) -> i32 {
        self.position.y.saturating_add(self.dimension.height)
    }

    const fn right_edge(&self) -> i64 {
        self.position.x as i64 + self.dimension.width as i64
    }

    const fn top_edge(&self) -> i64 {
        self.position.y as i64 + self.dimension.height as i64
    }

    /// Axis the block is free to slide along.
    ///
    /// Blocks wider than they are tall slide horizontally; every other shape,
    /// squares included, slides vertically.
    #[must_use]
    pub const fn axis(&self) -> Axis {
        if self.dimension.width > self.dimension.height {
            Axis::Horizontal
        } else {
            Axis::Vertical
        }
    }

    /// Returns a copy of the block anchored at a new origin.
    #[must_use]
    pub const fn with_position(self, position: Coordinate) -> Self {
        Self {
            position,
            dimension: self.dimension,
        }
    }

    /// Reports whether the block covers the provided cell.
    #[must_use]
    pub const fn contains(&self, cell: Coordinate) -> bool {
        cell.x >= self.x()
            && (cell.x as i64) < self.right_edge()
            && cell.y >= self.y()
            && (cell.y as i64) < self.top_edge()
    }
}

/// Reports whether two blocks cover at least one common cell.
///
/// Blocks that merely share an edge do not overlap. Edges are compared in
/// `i64`, so blocks at the extremes of the `i32` range never wrap.
#[must_use]
pub const fn rectangles_overlap(a: &Block, b: &Block) -> bool {
    (a.x() as i64) < b.right_edge()
        && a.right_edge() > b.x() as i64
        && (a.y() as i64) < b.top_edge()
        && a.top_edge() > b.y() as i64
}

/// Reports whether the block lies entirely inside a grid of the given size.
#[must_use]
pub const fn within_bounds(block: &Block, dimension: Dimension) -> bool {
    block.x() >= 0
        && block.y() >= 0
        && block.right_edge() <= dimension.width as i64
        && block.top_edge() <= dimension.height as i64
}

/// Position of a block inside a level's block list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockIndex(usize);

impl BlockIndex {
    /// Index of the main block that must reach the exit.
    pub const MAIN: Self = Self(0);

    /// Creates a new block index with the provided numeric value.
    #[must_use]
    pub const fn new(value: usize) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the index.
    #[must_use]
    pub const fn get(&self) -> usize {
        self.0
    }

    /// Reports whether the index designates the main block.
    #[must_use]
    pub const fn is_main(&self) -> bool {
        self.0 == 0
    }
}

/// Zero-based position of a level inside the level registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LevelIndex(u32);

impl LevelIndex {
    /// Creates a new level index with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the index.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Index of the following level. Clamping happens when the world loads it.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Index of the preceding level, saturating at the first level.
    #[must_use]
    pub const fn previous(self) -> Self {
        Self(self.0.saturating_sub(1))
    }

    /// Key identifying the level inside persisted score books.
    #[must_use]
    pub fn storage_key(&self) -> String {
        self.0.to_string()
    }
}

/// Immutable description of a puzzle instance or of a board snapshot.
///
/// `blocks[0]` is always the main block. Moves never mutate a level in place;
/// they produce a new value with a single block replaced.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Level {
    dimension: Dimension,
    exit: Coordinate,
    blocks: Vec<Block>,
    optimal_moves: u32,
}

impl Level {
    /// Creates a level from its parts.
    #[must_use]
    pub fn new(
        dimension: Dimension,
        exit: Coordinate,
        blocks: Vec<Block>,
        optimal_moves: u32,
    ) -> Self {
        Self {
            dimension,
            exit,
            blocks,
            optimal_moves,
        }
    }

    /// Size of the grid.
    #[must_use]
    pub const fn dimension(&self) -> Dimension {
        self.dimension
    }

    /// Cell the main block must reach.
    #[must_use]
    pub const fn exit(&self) -> Coordinate {
        self.exit
    }

    /// Blocks in their canonical order, main block first.
    #[must_use]
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Looks up a block by index.
    #[must_use]
    pub fn block(&self, index: BlockIndex) -> Option<&Block> {
        self.blocks.get(index.get())
    }

    /// The block that must reach the exit.
    #[must_use]
    pub fn main_block(&self) -> Option<&Block> {
        self.block(BlockIndex::MAIN)
    }

    /// Number of moves in the recorded optimal solution. Display only.
    #[must_use]
    pub const fn optimal_moves(&self) -> u32 {
        self.optimal_moves
    }

    /// Returns a copy of the level with one block replaced.
    ///
    /// Returns `None` when the index does not name a block.
    #[must_use]
    pub fn with_block(&self, index: BlockIndex, block: Block) -> Option<Self> {
        if index.get() >= self.blocks.len() {
            return None;
        }
        let mut next = self.clone();
        next.blocks[index.get()] = block;
        Some(next)
    }

    /// Iterates over every block except the one at `except`.
    pub fn other_blocks(&self, except: BlockIndex) -> impl Iterator<Item = &Block> + '_ {
        self.blocks
            .iter()
            .enumerate()
            .filter(move |(index, _)| *index != except.get())
            .map(|(_, block)| block)
    }

    /// Reports whether any block other than `except` covers the cell.
    #[must_use]
    pub fn is_occupied(&self, cell: Coordinate, except: BlockIndex) -> bool {
        self.other_blocks(except).any(|block| block.contains(cell))
    }

    /// Reports whether every column of `columns` on `row` is free of blocks
    /// other than `except`. Empty ranges are clear.
    #[must_use]
    pub fn row_clear(&self, row: i32, columns: Range<i32>, except: BlockIndex) -> bool {
        columns
            .into_iter()
            .all(|column| !self.is_occupied(Coordinate::new(column, row), except))
    }
}

/// Inclusive range of origins a block may occupy along its free axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlideRange {
    axis: Axis,
    min: i32,
    max: i32,
}

impl SlideRange {
    /// Creates a new slide range.
    #[must_use]
    pub const fn new(axis: Axis, min: i32, max: i32) -> Self {
        Self { axis, min, max }
    }

    /// Axis the range is measured along.
    #[must_use]
    pub const fn axis(&self) -> Axis {
        self.axis
    }

    /// Smallest reachable column or row.
    #[must_use]
    pub const fn min(&self) -> i32 {
        self.min
    }

    /// Largest reachable column or row.
    #[must_use]
    pub const fn max(&self) -> i32 {
        self.max
    }

    /// Reports whether the provided column or row lies inside the range.
    #[must_use]
    pub const fn contains(&self, value: i32) -> bool {
        value >= self.min && value <= self.max
    }

    /// Iterates over every value of the range in ascending order.
    #[must_use]
    pub fn values(&self) -> RangeInclusive<i32> {
        self.min..=self.max
    }

    /// Origin the block would occupy at `value` along the range's axis.
    #[must_use]
    pub const fn position_at(&self, block: &Block, value: i32) -> Coordinate {
        match self.axis {
            Axis::Horizontal => Coordinate::new(value, block.y()),
            Axis::Vertical => Coordinate::new(block.x(), value),
        }
    }
}

/// Reasons a slide request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum MoveRejection {
    /// No block with the provided index exists.
    #[error("no block with that index exists")]
    UnknownBlock,
    /// The requested origin equals the block's current origin.
    #[error("the block is already at that position")]
    Unchanged,
    /// The request moves the block along the axis it cannot slide on.
    #[error("the block cannot move along that axis")]
    ConstrainedAxis,
    /// The requested footprint extends beyond the grid.
    #[error("the block would leave the grid")]
    OutOfBounds,
    /// The requested footprint overlaps another block.
    #[error("another block is in the way")]
    Occupied,
    /// The level is already solved; the board is locked.
    #[error("the level is already solved")]
    LevelAlreadyWon,
}

/// Reasons an undo request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum HistoryError {
    /// There is no move left to revert.
    #[error("there is no move to undo")]
    Empty,
    /// The level is already solved; the board is locked.
    #[error("the level is already solved")]
    LevelAlreadyWon,
}

/// Persisted statistics for a single level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LevelStats {
    /// Fewest moves ever spent winning the level.
    #[serde(rename = "bestScore")]
    pub best_score: u32,
}

/// Best scores keyed by level.
///
/// Keys are the decimal form of the level index. Entries only exist for levels
/// that were won at least once, and a stored best score never increases.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreBook {
    entries: BTreeMap<String, LevelStats>,
}

impl ScoreBook {
    /// Creates an empty score book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Best score recorded for the level, if it was ever won.
    #[must_use]
    pub fn best_score(&self, level: LevelIndex) -> Option<u32> {
        self.entries
            .get(&level.storage_key())
            .map(|stats| stats.best_score)
    }

    /// Reports whether the level was won at least once.
    #[must_use]
    pub fn is_completed(&self, level: LevelIndex) -> bool {
        self.entries.contains_key(&level.storage_key())
    }

    /// Records a winning move count, keeping the lowest score seen.
    ///
    /// Returns `true` when the book changed.
    pub fn record(&mut self, level: LevelIndex, score: u32) -> bool {
        let key = level.storage_key();
        if self
            .entries
            .get(&key)
            .is_some_and(|existing| existing.best_score <= score)
        {
            return false;
        }
        let _ = self.entries.insert(key, LevelStats { best_score: score });
        true
    }

    /// Iterates over the raw entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &LevelStats)> {
        self.entries.iter().map(|(key, stats)| (key.as_str(), stats))
    }

    /// Number of levels with a recorded score.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reports whether no level has a recorded score.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{de::DeserializeOwned, Serialize};

    fn block(x: i32, y: i32, width: i32, height: i32) -> Block {
        Block::new(Coordinate::new(x, y), Dimension::new(width, height))
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn touching_edges_do_not_overlap() {
        let left = block(0, 0, 2, 1);
        let right = block(2, 0, 1, 2);
        assert!(!rectangles_overlap(&left, &right));
        assert!(!rectangles_overlap(&right, &left));

        let below = block(2, 2, 1, 2);
        let above = block(2, 4, 1, 1);
        assert!(!rectangles_overlap(&below, &above));
    }

    #[test]
    fn overlap_is_symmetric() {
        let shapes = [
            block(0, 0, 2, 1),
            block(1, 0, 1, 3),
            block(2, 2, 1, 2),
            block(0, 2, 3, 1),
            block(3, 3, 1, 1),
            block(1, 1, 2, 2),
        ];
        for a in &shapes {
            for b in &shapes {
                assert_eq!(rectangles_overlap(a, b), rectangles_overlap(b, a));
            }
        }
        assert!(rectangles_overlap(&shapes[0], &shapes[1]));
        assert!(rectangles_overlap(&shapes[2], &shapes[3]));
    }

    #[test]
    fn bounds_are_half_open() {
        let grid = Dimension::new(4, 4);
        assert!(within_bounds(&block(2, 3, 2, 1), grid));
        assert!(!within_bounds(&block(3, 3, 2, 1), grid));
        assert!(!within_bounds(&block(0, 3, 1, 2), grid));
        assert!(!within_bounds(&block(-1, 0, 2, 1), grid));
        assert!(!within_bounds(&block(0, -1, 1, 2), grid));
    }

    #[test]
    fn extreme_origins_stay_out_of_bounds_without_wrapping() {
        let grid = Dimension::new(4, 4);
        let high = block(2, i32::MAX, 1, 2);
        let far = block(i32::MAX, 2, 2, 1);
        let low = block(i32::MIN, i32::MIN, 2, 1);
        for candidate in [high, far, low] {
            assert!(!within_bounds(&candidate, grid), "{candidate:?}");
        }

        assert_eq!(high.top(), i32::MAX);
        assert_eq!(far.right(), i32::MAX);
        assert!(high.contains(Coordinate::new(2, i32::MAX)));
        assert!(rectangles_overlap(&high, &block(2, i32::MAX, 1, 1)));
        assert!(!rectangles_overlap(&high, &block(2, 0, 1, 2)));
        assert!(!rectangles_overlap(&low, &block(0, 0, 2, 1)));
    }

    #[test]
    fn axis_follows_block_shape() {
        assert_eq!(block(0, 0, 2, 1).axis(), Axis::Horizontal);
        assert_eq!(block(0, 0, 1, 3).axis(), Axis::Vertical);
        assert_eq!(block(0, 0, 2, 2).axis(), Axis::Vertical);
    }

    #[test]
    fn occupancy_ignores_the_excluded_block() {
        let level = Level::new(
            Dimension::new(4, 4),
            Coordinate::new(4, 2),
            vec![block(0, 2, 2, 1), block(2, 2, 1, 2)],
            1,
        );

        assert!(level.is_occupied(Coordinate::new(1, 2), BlockIndex::new(1)));
        assert!(!level.is_occupied(Coordinate::new(1, 2), BlockIndex::MAIN));
        assert!(level.is_occupied(Coordinate::new(2, 3), BlockIndex::MAIN));
        assert!(!level.row_clear(2, 2..4, BlockIndex::MAIN));
        assert!(level.row_clear(1, 0..4, BlockIndex::MAIN));
        assert!(level.row_clear(2, 4..4, BlockIndex::MAIN));
    }

    #[test]
    fn with_block_replaces_only_the_target() {
        let level = Level::new(
            Dimension::new(4, 4),
            Coordinate::new(4, 2),
            vec![block(0, 2, 2, 1), block(2, 2, 1, 2)],
            3,
        );
        let moved = level
            .with_block(BlockIndex::new(1), block(2, 0, 1, 2))
            .expect("block exists");

        assert_eq!(moved.blocks()[0], level.blocks()[0]);
        assert_eq!(moved.blocks()[1], block(2, 0, 1, 2));
        assert_eq!(moved.exit(), level.exit());
        assert_eq!(moved.optimal_moves(), 3);
        assert!(level.with_block(BlockIndex::new(2), block(0, 0, 1, 1)).is_none());
    }

    #[test]
    fn score_book_keeps_the_lowest_score() {
        let mut book = ScoreBook::new();
        let level = LevelIndex::new(4);

        assert!(book.record(level, 12));
        assert!(!book.record(level, 15));
        assert!(!book.record(level, 12));
        assert!(book.record(level, 9));
        assert_eq!(book.best_score(level), Some(9));
        assert!(book.is_completed(level));
        assert!(!book.is_completed(LevelIndex::new(3)));
    }

    #[test]
    fn score_book_serializes_as_keyed_map() {
        let mut book = ScoreBook::new();
        let _ = book.record(LevelIndex::new(0), 7);
        let _ = book.record(LevelIndex::new(11), 20);

        let json = serde_json::to_string(&book).expect("serialize");
        assert_eq!(json, r#"{"0":{"bestScore":7},"11":{"bestScore":20}}"#);

        let restored: ScoreBook = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(restored, book);
    }

    #[test]
    fn level_round_trips_through_bincode() {
        let level = Level::new(
            Dimension::new(6, 6),
            Coordinate::new(6, 3),
            vec![block(0, 3, 2, 1), block(2, 1, 1, 3)],
            8,
        );
        assert_round_trip(&level);
    }

    #[test]
    fn move_rejection_round_trips_through_bincode() {
        assert_round_trip(&MoveRejection::Occupied);
    }

    #[test]
    fn level_index_navigation_saturates_at_zero() {
        assert_eq!(LevelIndex::new(0).previous(), LevelIndex::new(0));
        assert_eq!(LevelIndex::new(3).previous(), LevelIndex::new(2));
        assert_eq!(LevelIndex::new(3).next(), LevelIndex::new(4));
        assert_eq!(LevelIndex::new(12).storage_key(), "12");
    }
}
