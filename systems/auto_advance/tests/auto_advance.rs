use std::time::Duration;

use unblock_jam_core::{
    Block, BlockIndex, Command, Coordinate, Dimension, Event, Level, LevelIndex,
};
use unblock_jam_system_auto_advance::{AutoAdvance, Config};
use unblock_jam_world::{self as world, query, LevelRegistry, World};

fn quick_level(width: i32) -> Level {
    Level::new(
        Dimension::new(width, 3),
        Coordinate::new(width, 1),
        vec![Block::new(Coordinate::new(0, 1), Dimension::new(2, 1))],
        1,
    )
}

fn world_with_levels(count: i32) -> World {
    let levels = (0..count).map(|offset| quick_level(3 + offset)).collect();
    World::new(LevelRegistry::new(levels).expect("registry"))
}

fn win_current_level(world: &mut World) -> Vec<Event> {
    let width = query::current_level(world).dimension().width();
    let mut events = Vec::new();
    world::apply(
        world,
        Command::SlideBlock {
            block: BlockIndex::MAIN,
            to: Coordinate::new(width, 1),
        },
        &mut events,
    );
    events
}

fn pump(world: &mut World, system: &mut AutoAdvance, events: Vec<Event>) -> Vec<Event> {
    let mut pending = events;
    let mut all = Vec::new();
    while !pending.is_empty() {
        let mut commands = Vec::new();
        system.handle(&pending, &mut commands);
        all.append(&mut pending);
        for command in commands {
            world::apply(world, command, &mut pending);
        }
    }
    all
}

fn tick(world: &mut World, dt: Duration) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, Command::Tick { dt }, &mut events);
    events
}

#[test]
fn advances_to_next_level_after_delay() {
    let mut world = world_with_levels(3);
    let mut system = AutoAdvance::new(Config::new(Duration::from_millis(1_000)));

    let events = win_current_level(&mut world);
    let _ = pump(&mut world, &mut system, events);
    assert!(query::is_won(&world));
    assert_eq!(system.remaining(), Some(Duration::from_millis(1_000)));

    let events = tick(&mut world, Duration::from_millis(400));
    let _ = pump(&mut world, &mut system, events);
    assert_eq!(query::level_index(&world), LevelIndex::new(0));
    assert_eq!(system.remaining(), Some(Duration::from_millis(600)));

    let events = tick(&mut world, Duration::from_millis(600));
    let processed = pump(&mut world, &mut system, events);
    assert!(processed.contains(&Event::LevelChanged {
        level: LevelIndex::new(1),
    }));
    assert_eq!(query::level_index(&world), LevelIndex::new(1));
    assert!(!query::is_won(&world));
    assert_eq!(system.remaining(), None);
}

#[test]
fn restart_before_delay_cancels_transition() {
    let mut world = world_with_levels(3);
    let mut system = AutoAdvance::default();

    let events = win_current_level(&mut world);
    let _ = pump(&mut world, &mut system, events);

    let mut events = Vec::new();
    world::apply(&mut world, Command::Restart, &mut events);
    let _ = pump(&mut world, &mut system, events);
    assert_eq!(system.remaining(), None);

    let events = tick(&mut world, Duration::from_secs(5));
    let _ = pump(&mut world, &mut system, events);
    assert_eq!(query::level_index(&world), LevelIndex::new(0));
}

#[test]
fn manual_level_change_supersedes_transition() {
    let mut world = world_with_levels(3);
    let mut system = AutoAdvance::default();

    let events = win_current_level(&mut world);
    let _ = pump(&mut world, &mut system, events);

    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::ChangeLevel {
            level: LevelIndex::new(2),
        },
        &mut events,
    );
    let _ = pump(&mut world, &mut system, events);

    let events = tick(&mut world, Duration::from_secs(5));
    let _ = pump(&mut world, &mut system, events);
    assert_eq!(query::level_index(&world), LevelIndex::new(2));
}

#[test]
fn winning_last_level_reloads_it() {
    let mut world = world_with_levels(2);
    let mut system = AutoAdvance::new(Config::new(Duration::from_millis(10)));

    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::ChangeLevel {
            level: LevelIndex::new(1),
        },
        &mut events,
    );
    let _ = pump(&mut world, &mut system, events);

    let events = win_current_level(&mut world);
    let _ = pump(&mut world, &mut system, events);
    let events = tick(&mut world, Duration::from_millis(10));
    let _ = pump(&mut world, &mut system, events);

    assert_eq!(query::level_index(&world), LevelIndex::new(1));
    assert!(!query::is_won(&world));
    assert_eq!(query::moves(&world), 0);
}
