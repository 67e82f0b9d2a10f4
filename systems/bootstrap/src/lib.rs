#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure bootstrap system that prepares an Unblock Jam session.

use unblock_jam_core::{LevelIndex, ScoreBook};
use unblock_jam_world::{query, LevelRegistry, World};

/// Produces data required to start a session and greet the player.
#[derive(Debug, Default)]
pub struct Bootstrap;

impl Bootstrap {
    /// Derives the banner that should be shown when the experience starts.
    #[must_use]
    pub fn welcome_banner<'world>(&self, world: &'world World) -> &'world str {
        query::welcome_banner(world)
    }

    /// Picks the level a fresh session starts on.
    ///
    /// Levels that already have a best score are skipped in order. When every
    /// level is completed the session wraps around to the first level.
    #[must_use]
    pub fn starting_level(&self, registry: &LevelRegistry, scores: &ScoreBook) -> LevelIndex {
        registry
            .iter()
            .map(|(index, _)| index)
            .find(|index| !scores.is_completed(*index))
            .unwrap_or(LevelIndex::new(0))
    }

    /// Builds a world positioned on [`Bootstrap::starting_level`].
    #[must_use]
    pub fn start(&self, registry: LevelRegistry, scores: &ScoreBook) -> World {
        let level = self.starting_level(&registry, scores);
        World::starting_at(registry, level)
    }
}
