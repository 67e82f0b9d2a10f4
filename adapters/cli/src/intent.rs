//! Parsing of the line-based commands typed during play.

use std::{error::Error, fmt, str::SplitWhitespace};

use unblock_jam_core::{BlockIndex, Coordinate, LevelIndex};

use crate::render::parse_block_label;

/// Action requested by a single input line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Intent {
    /// Print the board again.
    Show,
    /// Print the command reference.
    Help,
    /// Report where a block can slide.
    Range { block: BlockIndex },
    /// Slide a block straight to a position.
    Move { block: BlockIndex, to: Coordinate },
    /// Drag a block towards a position and release it there.
    Drag { block: BlockIndex, to: Coordinate },
    /// Revert the last move.
    Undo,
    /// Reload the current puzzle.
    Restart,
    /// Go to the following puzzle.
    Next,
    /// Go to the preceding puzzle.
    Previous,
    /// Jump to a puzzle by index.
    Level { level: LevelIndex },
    /// Leave the game.
    Quit,
}

/// Reference printed by the `help` command.
pub(crate) const HELP: &str = "\
Commands:
  show                    print the board
  range <block>           show where a block can slide
  move <block> <x> <y>    slide a block to a position
  drag <block> <x> <y>    drag a block as far as it goes towards a position
  undo                    revert the last move
  restart                 start the puzzle over
  next | prev             change puzzle
  level <n>               jump to puzzle n
  quit                    leave the game
Blocks are named by the labels on the board; the red block is 0.
Positions name the lower-left cell of the block.";

/// Errors produced while interpreting an input line.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum IntentError {
    /// The line did not contain a command.
    Empty,
    /// The command word is not recognised.
    UnknownCommand(String),
    /// A required argument was not supplied.
    MissingArgument(&'static str),
    /// The block label does not name a block.
    InvalidBlock(String),
    /// A numeric argument could not be parsed.
    InvalidNumber(String),
    /// Puzzle numbers start at one.
    PuzzleNumberZero,
    /// The line carried more arguments than the command accepts.
    UnexpectedArgument(String),
}

impl fmt::Display for IntentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "type a command, or `help` for a list"),
            Self::UnknownCommand(command) => {
                write!(f, "unknown command '{command}', type `help` for a list")
            }
            Self::MissingArgument(argument) => write!(f, "missing {argument}"),
            Self::InvalidBlock(label) => write!(f, "'{label}' is not a block label"),
            Self::InvalidNumber(value) => write!(f, "'{value}' is not a number"),
            Self::PuzzleNumberZero => write!(f, "puzzle numbers start at 1"),
            Self::UnexpectedArgument(argument) => {
                write!(f, "unexpected argument '{argument}'")
            }
        }
    }
}

impl Error for IntentError {}

/// Parses one input line into an [`Intent`].
pub(crate) fn parse_intent(line: &str) -> Result<Intent, IntentError> {
    let mut words = line.split_whitespace();
    let command = words.next().ok_or(IntentError::Empty)?;

    let intent = match command.to_ascii_lowercase().as_str() {
        "show" | "s" => Intent::Show,
        "help" | "h" | "?" => Intent::Help,
        "range" | "r" => Intent::Range {
            block: block_argument(&mut words)?,
        },
        "move" | "m" => Intent::Move {
            block: block_argument(&mut words)?,
            to: coordinate_argument(&mut words)?,
        },
        "drag" | "d" => Intent::Drag {
            block: block_argument(&mut words)?,
            to: coordinate_argument(&mut words)?,
        },
        "undo" | "u" => Intent::Undo,
        "restart" => Intent::Restart,
        "next" | "n" => Intent::Next,
        "prev" | "p" => Intent::Previous,
        "level" | "l" => {
            let number: u32 = number_argument(&mut words, "puzzle number")?;
            let index = number
                .checked_sub(1)
                .ok_or(IntentError::PuzzleNumberZero)?;
            Intent::Level {
                level: LevelIndex::new(index),
            }
        }
        "quit" | "q" | "exit" => Intent::Quit,
        other => return Err(IntentError::UnknownCommand(other.to_owned())),
    };

    match words.next() {
        Some(extra) => Err(IntentError::UnexpectedArgument(extra.to_owned())),
        None => Ok(intent),
    }
}

fn block_argument(words: &mut SplitWhitespace<'_>) -> Result<BlockIndex, IntentError> {
    let label = words.next().ok_or(IntentError::MissingArgument("block label"))?;
    parse_block_label(label).ok_or_else(|| IntentError::InvalidBlock(label.to_owned()))
}

fn coordinate_argument(words: &mut SplitWhitespace<'_>) -> Result<Coordinate, IntentError> {
    let x = number_argument(words, "x coordinate")?;
    let y = number_argument(words, "y coordinate")?;
    Ok(Coordinate::new(x, y))
}

fn number_argument<T: std::str::FromStr>(
    words: &mut SplitWhitespace<'_>,
    name: &'static str,
) -> Result<T, IntentError> {
    let value = words.next().ok_or(IntentError::MissingArgument(name))?;
    value
        .parse()
        .map_err(|_| IntentError::InvalidNumber(value.to_owned()))
}
