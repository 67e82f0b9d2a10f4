#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative session state management for Unblock Jam.
//!
//! The world owns the level registry, the active board snapshot, the move
//! history and counter, and the won flag. It changes only through [`apply`],
//! which reports every outcome as an [`Event`].

mod history;
mod registry;
pub mod rules;

use unblock_jam_core::{
    BlockIndex, Command, Coordinate, Event, HistoryError, Level, LevelIndex, MoveRejection,
    WELCOME_BANNER,
};

use crate::history::MoveHistory;
pub use crate::registry::{LevelRegistry, RegistryError};
use crate::rules::MoveOutcome;

/// Represents the authoritative Unblock Jam session state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    registry: LevelRegistry,
    level_index: LevelIndex,
    current: Level,
    history: MoveHistory,
    moves: u32,
    won: bool,
}

impl World {
    /// Creates a session positioned on the first level of the registry.
    #[must_use]
    pub fn new(registry: LevelRegistry) -> Self {
        Self::starting_at(registry, LevelIndex::new(0))
    }

    /// Creates a session positioned on the provided level, clamped to the
    /// registry bounds.
    #[must_use]
    pub fn starting_at(registry: LevelRegistry, level: LevelIndex) -> Self {
        let level_index = registry.clamp(level);
        let current = registry.get_clamped(level_index).clone();
        Self {
            banner: WELCOME_BANNER,
            registry,
            level_index,
            current,
            history: MoveHistory::new(),
            moves: 0,
            won: false,
        }
    }

    fn slide(&mut self, block: BlockIndex, to: Coordinate, out_events: &mut Vec<Event>) {
        if self.won {
            out_events.push(Event::MoveRejected {
                block,
                to,
                reason: MoveRejection::LevelAlreadyWon,
            });
            return;
        }

        match rules::attempt_move(&self.current, block, to) {
            Ok(MoveOutcome::Moved(next)) => {
                let from = self
                    .current
                    .block(block)
                    .map_or(to, |previous| previous.position());
                let previous = std::mem::replace(&mut self.current, next);
                self.history.record(previous);
                self.moves = self.moves.saturating_add(1);
                out_events.push(Event::BlockMoved {
                    block,
                    from,
                    to,
                    moves: self.moves,
                });
            }
            Ok(MoveOutcome::Won) => self.win(out_events),
            Err(reason) => out_events.push(Event::MoveRejected { block, to, reason }),
        }
    }

    fn win(&mut self, out_events: &mut Vec<Event>) {
        if self.won {
            return;
        }
        self.moves = self.moves.saturating_add(1);
        self.won = true;
        out_events.push(Event::LevelWon {
            level: self.level_index,
            moves: self.moves,
        });
    }

    fn undo(&mut self, out_events: &mut Vec<Event>) {
        if self.won {
            out_events.push(Event::UndoRejected {
                reason: HistoryError::LevelAlreadyWon,
            });
            return;
        }

        let Some(previous) = self.history.pop() else {
            out_events.push(Event::UndoRejected {
                reason: HistoryError::Empty,
            });
            return;
        };
        self.current = previous;
        self.moves = self.moves.saturating_sub(1);
        out_events.push(Event::MoveUndone { moves: self.moves });
    }

    fn load(&mut self, level: LevelIndex) {
        self.level_index = self.registry.clamp(level);
        self.current = self.registry.get_clamped(self.level_index).clone();
        self.history.clear();
        self.moves = 0;
        self.won = false;
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::SlideBlock { block, to } => world.slide(block, to, out_events),
        Command::DragBlock { block, to } => {
            if world.won {
                return;
            }
            if let Ok(MoveOutcome::Won) = rules::attempt_move(&world.current, block, to) {
                world.win(out_events);
            }
        }
        Command::Undo => world.undo(out_events),
        Command::Restart => {
            let level = world.level_index;
            world.load(level);
            out_events.push(Event::LevelRestarted { level });
        }
        Command::ChangeLevel { level } => {
            world.load(level);
            out_events.push(Event::LevelChanged {
                level: world.level_index,
            });
        }
        Command::Tick { dt } => out_events.push(Event::TimeAdvanced { dt }),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{LevelRegistry, World};
    use unblock_jam_core::{Level, LevelIndex};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides read-only access to the level registry.
    #[must_use]
    pub fn registry(world: &World) -> &LevelRegistry {
        &world.registry
    }

    /// Number of levels available to the session.
    #[must_use]
    pub fn level_count(world: &World) -> u32 {
        world.registry.len()
    }

    /// Index of the active level.
    #[must_use]
    pub fn level_index(world: &World) -> LevelIndex {
        world.level_index
    }

    /// Current board snapshot of the active level.
    #[must_use]
    pub fn current_level(world: &World) -> &Level {
        &world.current
    }

    /// Layout the active level starts from.
    #[must_use]
    pub fn initial_level(world: &World) -> &Level {
        world.registry.get_clamped(world.level_index)
    }

    /// Moves spent on the active level so far.
    #[must_use]
    pub fn moves(world: &World) -> u32 {
        world.moves
    }

    /// Reports whether the active level is solved and the board locked.
    #[must_use]
    pub fn is_won(world: &World) -> bool {
        world.won
    }

    /// Reports whether an undo request would be honoured.
    #[must_use]
    pub fn can_undo(world: &World) -> bool {
        !world.won && !world.history.is_empty()
    }

    /// Number of snapshots stored in the move history.
    #[must_use]
    pub fn history_len(world: &World) -> usize {
        world.history.len()
    }
}
