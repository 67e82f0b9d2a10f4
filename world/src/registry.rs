//! Immutable, densely indexed list of the levels available to a session.

use thiserror::Error;
use unblock_jam_core::{Level, LevelIndex};

/// Errors raised while assembling a level registry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// The registry must hold at least one level.
    #[error("a level registry needs at least one level")]
    Empty,
    /// More levels were supplied than a [`LevelIndex`] can address.
    #[error("{0} levels exceed the addressable range")]
    TooManyLevels(usize),
}

/// Levels loaded once at session start, addressed by [`LevelIndex`].
#[derive(Clone, Debug)]
pub struct LevelRegistry {
    levels: Vec<Level>,
}

impl LevelRegistry {
    /// Builds a registry from parsed levels in their canonical order.
    pub fn new(levels: Vec<Level>) -> Result<Self, RegistryError> {
        if levels.is_empty() {
            return Err(RegistryError::Empty);
        }
        if u32::try_from(levels.len()).is_err() {
            return Err(RegistryError::TooManyLevels(levels.len()));
        }
        Ok(Self { levels })
    }

    /// Number of levels in the registry. Never zero.
    #[must_use]
    pub fn len(&self) -> u32 {
        // Bounded by the constructor.
        self.levels.len() as u32
    }

    /// Always `false`: construction rejects an empty level list. Kept as the
    /// companion to [`LevelRegistry::len`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Looks up a level by index.
    #[must_use]
    pub fn get(&self, index: LevelIndex) -> Option<&Level> {
        usize::try_from(index.get())
            .ok()
            .and_then(|position| self.levels.get(position))
    }

    /// Looks up a level, saturating the index into the registry bounds.
    #[must_use]
    pub fn get_clamped(&self, index: LevelIndex) -> &Level {
        let position = usize::try_from(index.get()).unwrap_or(usize::MAX);
        &self.levels[position.min(self.levels.len() - 1)]
    }

    /// Saturates an index into `[0, len - 1]`.
    #[must_use]
    pub fn clamp(&self, index: LevelIndex) -> LevelIndex {
        LevelIndex::new(index.get().min(self.len() - 1))
    }

    /// Iterates over the levels with their indices.
    pub fn iter(&self) -> impl Iterator<Item = (LevelIndex, &Level)> {
        self.levels
            .iter()
            .enumerate()
            .map(|(position, level)| (LevelIndex::new(position as u32), level))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use unblock_jam_core::{Block, Coordinate, Dimension};

    fn level(width: i32) -> Level {
        Level::new(
            Dimension::new(width, 4),
            Coordinate::new(width, 1),
            vec![Block::new(Coordinate::new(0, 1), Dimension::new(2, 1))],
            1,
        )
    }

    #[test]
    fn empty_registry_is_rejected() {
        assert_eq!(LevelRegistry::new(Vec::new()).unwrap_err(), RegistryError::Empty);
    }

    #[test]
    fn clamp_saturates_at_last_level() {
        let registry = LevelRegistry::new(vec![level(4), level(5), level(6)]).expect("registry");
        assert_eq!(registry.clamp(LevelIndex::new(1)), LevelIndex::new(1));
        assert_eq!(registry.clamp(LevelIndex::new(3)), LevelIndex::new(2));
        assert_eq!(registry.clamp(LevelIndex::new(u32::MAX)), LevelIndex::new(2));
    }

    #[test]
    fn lookup_follows_insertion_order() {
        let registry = LevelRegistry::new(vec![level(4), level(5)]).expect("registry");
        assert_eq!(registry.len(), 2);
        assert!(!registry.is_empty());
        assert_eq!(
            registry.get(LevelIndex::new(1)).map(|level| level.dimension().width()),
            Some(5)
        );
        assert!(registry.get(LevelIndex::new(2)).is_none());

        let indices: Vec<u32> = registry.iter().map(|(index, _)| index.get()).collect();
        assert_eq!(indices, vec![0, 1]);
    }
}
