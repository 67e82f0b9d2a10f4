#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Loader for Unblock Jam level definitions stored as JSON.
//!
//! Level files describe boards with a top-left origin and rows growing
//! downwards. The loader flips them into the bottom-left coordinate system used
//! by the rest of the workspace and validates every record before handing it
//! out, so downstream crates may assume blocks are in bounds and disjoint.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;
use unblock_jam_core::{rectangles_overlap, within_bounds, Block, Coordinate, Dimension, Level};

/// Separator between the steps of a recorded solution.
const SOLUTION_STEP_DELIMITER: char = ';';

/// Errors raised while reading or validating level definitions.
#[derive(Debug, Error)]
pub enum LevelDataError {
    /// The level file could not be read.
    #[error("could not read level file {path}")]
    Io {
        /// Location of the file that failed to load.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The document is not a JSON array.
    #[error("level data is not a JSON array of levels")]
    InvalidJson(#[from] serde_json::Error),
    /// A record is missing a field or carries a field of the wrong type.
    #[error("level {index} is malformed")]
    Malformed {
        /// Position of the record in the file.
        index: usize,
        /// Decoder failure describing the offending field.
        #[source]
        source: serde_json::Error,
    },
    /// The grid has a zero or negative side.
    #[error("level {index} has a non-positive grid size {width}x{height}")]
    InvalidGrid {
        /// Position of the record in the file.
        index: usize,
        /// Declared grid width.
        width: i32,
        /// Declared grid height.
        height: i32,
    },
    /// A block has a zero or negative side.
    #[error("level {index} block {block} has a non-positive size {width}x{height}")]
    InvalidBlockSize {
        /// Position of the record in the file.
        index: usize,
        /// Position of the block within the record.
        block: usize,
        /// Declared block width.
        width: i32,
        /// Declared block height.
        height: i32,
    },
    /// A block extends beyond the grid.
    #[error("level {index} block {block} lies outside the grid")]
    BlockOutOfBounds {
        /// Position of the record in the file.
        index: usize,
        /// Position of the block within the record.
        block: usize,
    },
    /// The exit row cannot be expressed once flipped to bottom-left rows.
    #[error("level {index} has an exit row outside the representable range")]
    ExitOutOfRange {
        /// Position of the record in the file.
        index: usize,
    },
    /// Two blocks cover the same cell.
    #[error("level {index} blocks {first} and {second} overlap")]
    OverlappingBlocks {
        /// Position of the record in the file.
        index: usize,
        /// Lower block position.
        first: usize,
        /// Higher block position.
        second: usize,
    },
    /// The record has no main block.
    #[error("level {index} has no blocks")]
    NoBlocks {
        /// Position of the record in the file.
        index: usize,
    },
    /// The document contains no records.
    #[error("level data contains no levels")]
    Empty,
}

#[derive(Debug, Deserialize)]
struct RawLevel {
    w: i32,
    h: i32,
    e: RawCoordinate,
    b: Vec<RawBlock>,
    c: String,
}

#[derive(Debug, Deserialize)]
struct RawCoordinate {
    x: i32,
    y: i32,
}

#[derive(Debug, Deserialize)]
struct RawBlock {
    #[serde(default)]
    x: i32,
    #[serde(default)]
    y: i32,
    w: i32,
    h: i32,
}

impl RawLevel {
    fn into_level(self, index: usize) -> Result<Level, LevelDataError> {
        if self.w <= 0 || self.h <= 0 {
            return Err(LevelDataError::InvalidGrid {
                index,
                width: self.w,
                height: self.h,
            });
        }
        if self.b.is_empty() {
            return Err(LevelDataError::NoBlocks { index });
        }

        let dimension = Dimension::new(self.w, self.h);
        let exit_row =
            flip_row(self.h, self.e.y, 1).ok_or(LevelDataError::ExitOutOfRange { index })?;
        let exit = Coordinate::new(self.e.x, exit_row);

        let mut blocks = Vec::with_capacity(self.b.len());
        for (position, raw) in self.b.into_iter().enumerate() {
            if raw.w <= 0 || raw.h <= 0 {
                return Err(LevelDataError::InvalidBlockSize {
                    index,
                    block: position,
                    width: raw.w,
                    height: raw.h,
                });
            }
            let row = flip_row(self.h, raw.y, raw.h).ok_or(LevelDataError::BlockOutOfBounds {
                index,
                block: position,
            })?;
            let block = Block::new(Coordinate::new(raw.x, row), Dimension::new(raw.w, raw.h));
            if !within_bounds(&block, dimension) {
                return Err(LevelDataError::BlockOutOfBounds {
                    index,
                    block: position,
                });
            }
            if let Some(first) = blocks
                .iter()
                .position(|placed| rectangles_overlap(placed, &block))
            {
                return Err(LevelDataError::OverlappingBlocks {
                    index,
                    first,
                    second: position,
                });
            }
            blocks.push(block);
        }

        Ok(Level::new(
            dimension,
            exit,
            blocks,
            count_solution_steps(&self.c),
        ))
    }
}

/// Converts a top-left row into a bottom-left row for a span of `span` rows.
/// Returns `None` when the result does not fit in an `i32`.
fn flip_row(grid_height: i32, row: i32, span: i32) -> Option<i32> {
    grid_height.checked_sub(row)?.checked_sub(span)
}

fn count_solution_steps(solution: &str) -> u32 {
    let steps = solution
        .split(SOLUTION_STEP_DELIMITER)
        .filter(|step| !step.is_empty())
        .count();
    u32::try_from(steps).unwrap_or(u32::MAX)
}

/// Parses and validates a JSON array of level records.
///
/// Records keep their file order; the first block of each record becomes the
/// main block. Parsing stops at the first invalid record.
pub fn parse_levels(json: &str) -> Result<Vec<Level>, LevelDataError> {
    let records: Vec<serde_json::Value> = serde_json::from_str(json)?;
    if records.is_empty() {
        return Err(LevelDataError::Empty);
    }

    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            let raw: RawLevel = serde_json::from_value(record)
                .map_err(|source| LevelDataError::Malformed { index, source })?;
            raw.into_level(index)
        })
        .collect()
}

/// Reads a level file from disk and parses it with [`parse_levels`].
pub fn load_levels(path: impl AsRef<Path>) -> Result<Vec<Level>, LevelDataError> {
    let path = path.as_ref();
    let json = fs::read_to_string(path).map_err(|source| LevelDataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let levels = parse_levels(&json)?;
    tracing::info!(path = %path.display(), count = levels.len(), "loaded level definitions");
    Ok(levels)
}
