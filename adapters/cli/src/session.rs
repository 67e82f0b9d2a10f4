//! Interactive play loop driving the world from text commands.

use std::{
    io::{self, BufRead, Write},
    thread,
};

use unblock_jam_core::{Axis, BlockIndex, Command, Coordinate, Event, LevelIndex, ScoreBook};
use unblock_jam_scores::{BlobStore, ScoreStore};
use unblock_jam_system_auto_advance::AutoAdvance;
use unblock_jam_system_slide_range::slide_range;
use unblock_jam_world::{self as world, query, World};

use crate::{
    intent::{parse_intent, Intent, HELP},
    render,
};

const PROMPT: &str = "> ";

/// A single player's session: world state, systems, and score persistence.
pub(crate) struct Session<S> {
    world: World,
    auto_advance: AutoAdvance,
    scores: ScoreStore<S>,
    book: ScoreBook,
}

impl<S: BlobStore> Session<S> {
    /// Creates a session around an initialised world and the stored scores.
    pub(crate) fn new(
        world: World,
        auto_advance: AutoAdvance,
        scores: ScoreStore<S>,
        book: ScoreBook,
    ) -> Self {
        Self {
            world,
            auto_advance,
            scores,
            book,
        }
    }

    pub(crate) fn world(&self) -> &World {
        &self.world
    }

    #[cfg(test)]
    pub(crate) fn book(&self) -> &ScoreBook {
        &self.book
    }

    #[cfg(test)]
    pub(crate) fn scores(&self) -> &ScoreStore<S> {
        &self.scores
    }

    /// Reads commands line by line until `quit` or end of input.
    pub(crate) fn run<R, W>(&mut self, input: R, out: &mut W) -> io::Result<()>
    where
        R: BufRead,
        W: Write,
    {
        self.show(out)?;
        prompt(out)?;
        for line in input.lines() {
            let line = line?;
            if line.trim().is_empty() {
                prompt(out)?;
                continue;
            }
            match parse_intent(&line) {
                Ok(Intent::Quit) => return Ok(()),
                Ok(intent) => self.perform(intent, out)?,
                Err(error) => writeln!(out, "{error}")?,
            }
            prompt(out)?;
        }
        writeln!(out)
    }

    fn perform<W: Write>(&mut self, intent: Intent, out: &mut W) -> io::Result<()> {
        let current = query::level_index(&self.world);
        match intent {
            Intent::Show => self.show(out),
            Intent::Help => writeln!(out, "{HELP}"),
            Intent::Range { block } => {
                match slide_range(query::current_level(&self.world), block) {
                    Some(range) => writeln!(out, "{}", render::slide_range(block, range)),
                    None => writeln!(out, "There is no block {}.", render::block_label(block)),
                }
            }
            Intent::Move { block, to } => self.dispatch(Command::SlideBlock { block, to }, out),
            Intent::Drag { block, to } => self.drag(block, to, out),
            Intent::Undo => self.dispatch(Command::Undo, out),
            Intent::Restart => self.dispatch(Command::Restart, out),
            Intent::Next => self.change_level(current.next(), out),
            Intent::Previous => self.change_level(current.previous(), out),
            Intent::Level { level } => self.change_level(level, out),
            Intent::Quit => Ok(()),
        }
    }

    fn change_level<W: Write>(&mut self, level: LevelIndex, out: &mut W) -> io::Result<()> {
        self.dispatch(Command::ChangeLevel { level }, out)
    }

    /// Plays a drag gesture: the block follows the pointer up to the edge of
    /// its slide range, and is released at the furthest reachable position.
    fn drag<W: Write>(
        &mut self,
        block: BlockIndex,
        to: Coordinate,
        out: &mut W,
    ) -> io::Result<()> {
        let level = query::current_level(&self.world);
        let current = level.block(block).copied();
        let (Some(current), Some(range)) = (current, slide_range(level, block)) else {
            return self.dispatch(Command::SlideBlock { block, to }, out);
        };

        let requested = match range.axis() {
            Axis::Horizontal => to.x(),
            Axis::Vertical => to.y(),
        };
        let target = range.position_at(&current, requested.clamp(range.min(), range.max()));

        let mut events = Vec::new();
        world::apply(
            &mut self.world,
            Command::DragBlock { block, to: target },
            &mut events,
        );
        if events.is_empty() {
            if target == current.position() {
                let label = render::block_label(block);
                writeln!(out, "Block {label} cannot move that way.")?;
                return Ok(());
            }
            world::apply(
                &mut self.world,
                Command::SlideBlock { block, to: target },
                &mut events,
            );
        }
        self.settle(events, out)
    }

    fn dispatch<W: Write>(&mut self, command: Command, out: &mut W) -> io::Result<()> {
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);
        self.settle(events, out)
    }

    /// Routes events through the systems until the world is quiet, waiting
    /// out any pending level transition.
    fn settle<W: Write>(&mut self, events: Vec<Event>, out: &mut W) -> io::Result<()> {
        let mut pending = events;
        let mut board_changed = false;

        while !pending.is_empty() {
            let mut commands = Vec::new();
            self.auto_advance.handle(&pending, &mut commands);
            for event in pending.drain(..) {
                board_changed |= self.report(event, out)?;
            }
            for command in commands {
                world::apply(&mut self.world, command, &mut pending);
            }

            if pending.is_empty() {
                if let Some(remaining) = self.auto_advance.remaining() {
                    out.flush()?;
                    thread::sleep(remaining);
                    world::apply(
                        &mut self.world,
                        Command::Tick { dt: remaining },
                        &mut pending,
                    );
                }
            }
        }

        if board_changed {
            self.show(out)?;
        }
        Ok(())
    }

    /// Prints feedback for one event and reports whether the board changed.
    fn report<W: Write>(&mut self, event: Event, out: &mut W) -> io::Result<bool> {
        match event {
            Event::BlockMoved { .. }
            | Event::MoveUndone { .. }
            | Event::LevelRestarted { .. }
            | Event::LevelChanged { .. } => Ok(true),
            Event::MoveRejected { block, reason, .. } => {
                writeln!(
                    out,
                    "Cannot move block {}: {reason}.",
                    render::block_label(block)
                )?;
                Ok(false)
            }
            Event::UndoRejected { reason } => {
                writeln!(out, "Cannot undo: {reason}.")?;
                Ok(false)
            }
            Event::LevelWon { level, moves } => {
                self.record_win(level, moves, out)?;
                Ok(true)
            }
            Event::TimeAdvanced { .. } => Ok(false),
        }
    }

    fn record_win<W: Write>(
        &mut self,
        level: LevelIndex,
        moves: u32,
        out: &mut W,
    ) -> io::Result<()> {
        writeln!(out, "Puzzle {} solved in {moves} moves!", level.get() + 1)?;
        if self.book.record(level, moves) {
            writeln!(out, "New best score.")?;
        }
        if let Err(error) = self.scores.update_best_score(level, moves) {
            tracing::error!(
                error = %error,
                level = level.get(),
                moves,
                "failed to persist best score, keeping it in memory"
            );
        }
        if let Some(delay) = self.auto_advance.remaining() {
            writeln!(out, "Next puzzle in {:.1}s...", delay.as_secs_f32())?;
        }
        Ok(())
    }

    fn show<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "{}", render::header(&self.world, &self.book))?;
        writeln!(out, "{}", render::board(query::current_level(&self.world)))
    }
}

fn prompt<W: Write>(out: &mut W) -> io::Result<()> {
    write!(out, "{PROMPT}")?;
    out.flush()
}
