use snowfall_core::{
    Command, EnemyType, EntityKind, Event, Group, LevelTokens, PixelOffset, Precision,
    SpriteCatalog, Tick, Tuning,
};
use snowfall_system_spawning::{Config, Spawning};
use snowfall_world::{self as world, query, World};

fn world_from(text: &str) -> World {
    World::new(
        text,
        Tuning::default(),
        LevelTokens::default(),
        SpriteCatalog::default(),
    )
    .expect("valid level")
}

fn run_ai(world: &mut World, spawning: &mut Spawning, tick: Tick) -> Vec<Event> {
    let enemies = query::snapshots(world, Group::Enemies);
    let animated = query::snapshots(world, Group::AnimatedItems);
    let ambient = query::snapshots(world, Group::Ambient);
    let mut commands = Vec::new();
    spawning.handle(
        &[Event::TimeAdvanced { tick }],
        &enemies,
        &animated,
        &ambient,
        |enemy, velocity| {
            query::collides_with(
                &*world,
                enemy.id,
                velocity,
                Group::AnimatedItems,
                Precision::Mask,
            )
        },
        &mut commands,
    );

    let mut events = Vec::new();
    for command in commands {
        world::apply(world, command, &mut events);
    }
    events
}

#[test]
fn enemies_only_move_on_throttled_ticks() {
    let mut world = world_from("@AAAA\n+AAAA\n");
    let mut events = Vec::new();
    let mut commands = Vec::new();
    Spawning::spawn_all(&mut commands);
    for command in commands {
        world::apply(&mut world, command, &mut events);
    }
    let enemy = query::first_of_kind(&world, EntityKind::Enemy).expect("enemy");

    let mut spawning = Spawning::new(Config::from_tuning(&Tuning::default()));
    for tick in 1..=10 {
        let _ = run_ai(&mut world, &mut spawning, Tick::new(tick));
    }

    let moved = query::entity(&world, enemy.id).expect("enemy alive");
    assert_eq!(
        moved.rect,
        enemy.rect.translated(PixelOffset::new(2, 0)),
        "two throttled updates at unit velocity"
    );
    assert_eq!(moved.frame.map(|frame| frame.frame), Some(2));
}

#[test]
fn retargeted_spawners_emit_the_new_type() {
    let mut world = world_from("@*\n");
    let mut commands = Vec::new();
    Spawning::retarget(EnemyType::new(1), &mut commands);
    Spawning::spawn_all(&mut commands);
    let mut events = Vec::new();
    for command in commands {
        world::apply(&mut world, command, &mut events);
    }

    let enemy = query::first_of_kind(&world, EntityKind::Enemy).expect("enemy");
    assert_eq!(enemy.damage, Some(2));
    assert_eq!(enemy.velocity, Some(PixelOffset::new(0, 1)));
}

#[test]
fn enemy_touching_the_objective_damages_it_and_dies() {
    // The spawner sits just right of the objective and emits leftwards.
    let mut world = world_from("AAAA\nAA=-\n@AAA\n");
    let objective = query::first_of_kind(&world, EntityKind::Objective).expect("objective");
    let mut events = Vec::new();
    world::apply(&mut world, Command::SpawnEnemies, &mut events);
    let enemy = query::first_of_kind(&world, EntityKind::Enemy).expect("enemy");

    let mut spawning = Spawning::new(Config::new(1, 3));
    let events = run_ai(&mut world, &mut spawning, Tick::new(1));

    assert!(events.contains(&Event::ObjectiveDamaged {
        objective: objective.id,
        amount: 1,
        remaining: 29,
    }));
    assert!(events.contains(&Event::EntityKilled {
        entity: enemy.id,
        kind: EntityKind::Enemy,
    }));
    assert!(query::first_of_kind(&world, EntityKind::Particle).is_some());

    for tick in 2..=4 {
        let _ = run_ai(&mut world, &mut spawning, Tick::new(tick));
    }
    assert!(query::first_of_kind(&world, EntityKind::Particle).is_none());
}

#[test]
fn objectives_animate_on_throttled_ticks() {
    let mut world = world_from("AAA\nA=A\n@AA\n");
    let mut spawning = Spawning::new(Config::from_tuning(&Tuning::default()));

    let _ = run_ai(&mut world, &mut spawning, Tick::new(4));
    let objective = query::first_of_kind(&world, EntityKind::Objective).expect("objective");
    assert_eq!(objective.frame.map(|frame| frame.frame), Some(0));

    let _ = run_ai(&mut world, &mut spawning, Tick::new(5));
    let objective = query::first_of_kind(&world, EntityKind::Objective).expect("objective");
    assert_eq!(objective.frame.map(|frame| frame.frame), Some(1));
}
