use snowfall_core::{
    CollectibleBatch, Command, EnemyType, EntityKind, Event, Group, LevelTokens, Overlay,
    PixelOffset, PlatformEffect, SessionOutcome, SpriteCatalog, Tick, Tuning,
};
use snowfall_system_quests::{
    script, CheckResult, Evaluation, QuestOutput, QuestState, ScheduledQuest, Scheduler,
    TimedProximityQuest,
};
use snowfall_world::{self as world, query, World};

const MEADOW: &str = "@#AAAAAA\nAAAAAAAA\nAAAAAAAA\nAAAAAAAA\nAAAAAAAA\n";
const GROVE: &str = "@AAAAA\nA=AAA+\nAAAAAA\n";

fn world_from(text: &str) -> World {
    World::new(
        text,
        Tuning::default(),
        LevelTokens::default(),
        SpriteCatalog::default(),
    )
    .expect("valid level")
}

fn apply_all(world: &mut World, output: &mut QuestOutput) -> Vec<Event> {
    let mut events = Vec::new();
    for command in output.commands.drain(..) {
        world::apply(world, command, &mut events);
    }
    events
}

fn advance(world: &mut World, ticks: u64) {
    let mut events = Vec::new();
    for _ in 0..ticks {
        world::apply(world, Command::Tick, &mut events);
    }
}

fn walk_player_onto(world: &mut World, target: EntityKind) {
    let player = query::player(world).expect("player");
    let goal = query::last_of_kind(world, target).expect("target");
    let offset = PixelOffset::new(
        goal.rect.origin().x - player.rect.origin().x,
        goal.rect.origin().y - player.rect.origin().y,
    );
    world::apply(
        world,
        Command::MoveEntity {
            entity: player.id,
            offset,
        },
        &mut Vec::new(),
    );
}

fn send_player_away(world: &mut World) {
    let player = query::player(world).expect("player");
    world::apply(
        world,
        Command::MoveEntity {
            entity: player.id,
            offset: PixelOffset::new(400, 250),
        },
        &mut Vec::new(),
    );
}

#[test]
fn mandarin_hunt_succeeds_once_every_item_is_collected() {
    let tuning = Tuning::default();
    let mut world = world_from(MEADOW);
    let mut output = QuestOutput::default();
    let mut quest = TimedProximityQuest::new(
        script::mandarins(&tuning, 15),
        CollectibleBatch::new(0),
        query::tick(&world),
        &mut output,
    );
    assert!(output.is_empty());
    assert_eq!(quest.state(), QuestState::Pending);

    assert_eq!(quest.check(&world, &mut output), CheckResult::Active);
    assert!(matches!(
        output.effects.as_slice(),
        [PlatformEffect::Narrative { .. }]
    ));
    let events = apply_all(&mut world, &mut output);
    assert!(events.contains(&Event::CollectiblesScattered {
        batch: CollectibleBatch::new(0),
        count: 15,
    }));

    let mut result = Evaluation::Ongoing;
    while !query::members(&world, Group::Collectibles).is_empty() {
        assert_eq!(result, Evaluation::Ongoing);
        let item = query::members(&world, Group::Collectibles)[0];
        let item = query::entity(&world, item).expect("item");
        let player = query::player(&world).expect("player");
        world::apply(
            &mut world,
            Command::MoveEntity {
                entity: player.id,
                offset: PixelOffset::new(
                    item.rect.origin().x - player.rect.origin().x,
                    item.rect.origin().y - player.rect.origin().y,
                ),
            },
            &mut Vec::new(),
        );
        result = quest.evaluate(&world, &mut output);
        let _ = apply_all(&mut world, &mut output);
    }

    assert_eq!(result, Evaluation::Succeeded);
    assert_eq!(quest.collected(), 15);
    assert_eq!(quest.state(), QuestState::Succeeded);
}

#[test]
fn proximity_targets_the_last_generated_grandmother() {
    let tuning = Tuning::default();
    let mut world = world_from("@#AAAA#\nAAAAAAA\n");
    let mut output = QuestOutput::default();
    let mut quest = TimedProximityQuest::new(
        script::mandarins(&tuning, 1),
        CollectibleBatch::new(0),
        query::tick(&world),
        &mut output,
    );

    assert_eq!(quest.check(&world, &mut output), CheckResult::NotYetTriggered);

    walk_player_onto(&mut world, EntityKind::Npc);
    assert_eq!(quest.check(&world, &mut output), CheckResult::Active);
}

#[test]
fn mandarin_hunt_expires_when_never_triggered() {
    let tuning = Tuning::default();
    let mut world = world_from(MEADOW);
    send_player_away(&mut world);
    let mut output = QuestOutput::default();
    let mut quest = TimedProximityQuest::new(
        script::mandarins(&tuning, 15),
        CollectibleBatch::new(0),
        query::tick(&world),
        &mut output,
    );

    advance(&mut world, tuning.seconds(45));
    assert_eq!(quest.check(&world, &mut output), CheckResult::NotYetTriggered);
    advance(&mut world, 1);
    assert_eq!(quest.check(&world, &mut output), CheckResult::Expired);
    assert_eq!(quest.state(), QuestState::Failed);
    assert!(output.is_empty());
}

#[test]
fn mandarin_hunt_fails_after_its_deadline() {
    let tuning = Tuning::default();
    let mut world = world_from(MEADOW);
    let mut output = QuestOutput::default();
    let mut quest = TimedProximityQuest::new(
        script::mandarins(&tuning, 15),
        CollectibleBatch::new(0),
        query::tick(&world),
        &mut output,
    );
    assert_eq!(quest.check(&world, &mut output), CheckResult::Active);
    let _ = apply_all(&mut world, &mut output);
    send_player_away(&mut world);

    advance(&mut world, tuning.seconds(60));
    assert_eq!(quest.evaluate(&world, &mut output), Evaluation::Ongoing);
    advance(&mut world, 1);
    assert_eq!(quest.evaluate(&world, &mut output), Evaluation::Failed);

    output.effects.clear();
    quest.fail(&mut output);
    assert!(output.is_empty());
}

#[test]
fn night_fails_when_the_tree_falls() {
    let tuning = Tuning::default();
    let mut world = world_from(GROVE);
    let mut output = QuestOutput::default();
    let mut quest = TimedProximityQuest::new(
        script::night(&tuning, EnemyType::new(1)),
        CollectibleBatch::new(0),
        query::tick(&world),
        &mut output,
    );
    let events = apply_all(&mut world, &mut output);
    assert!(events.contains(&Event::SpawnersRetargeted {
        enemy_type: EnemyType::new(1),
        spawners: 1,
    }));

    walk_player_onto(&mut world, EntityKind::Objective);
    assert_eq!(quest.check(&world, &mut output), CheckResult::Active);
    assert_eq!(
        output.effects,
        vec![PlatformEffect::PlayAudio {
            track: script::NIGHT_TRACK.to_owned()
        }]
    );
    assert_eq!(quest.overlay(), Some(Overlay::Darkness { alpha: 70 }));

    assert_eq!(quest.evaluate(&world, &mut output), Evaluation::Ongoing);
    assert_eq!(output.commands, vec![Command::SpawnEnemies]);
    let _ = apply_all(&mut world, &mut output);

    let tree = query::first_of_kind(&world, EntityKind::Objective).expect("tree");
    world::apply(
        &mut world,
        Command::DamageObjective {
            objective: tree.id,
            amount: 30,
        },
        &mut Vec::new(),
    );
    advance(&mut world, 1);
    output.effects.clear();
    assert_eq!(quest.evaluate(&world, &mut output), Evaluation::Failed);

    quest.fail(&mut output);
    assert_eq!(
        output.effects,
        vec![PlatformEffect::StopAudio {
            track: script::NIGHT_TRACK.to_owned()
        }]
    );
}

#[test]
fn scheduler_stops_the_night_track_when_the_tree_falls() {
    let tuning = Tuning::default();
    let mut world = world_from(GROVE);
    walk_player_onto(&mut world, EntityKind::Objective);
    let mut scheduler = Scheduler::new(vec![ScheduledQuest {
        at: 0,
        narrative: Vec::new(),
        quest: script::night(&tuning, EnemyType::new(1)),
    }]);
    let mut output = QuestOutput::default();
    scheduler.pre_update(Tick::ZERO, &mut output);
    assert!(output.effects.is_empty(), "empty narratives are skipped");
    let _ = apply_all(&mut world, &mut output);

    assert_eq!(
        scheduler.update(&world, &mut output),
        SessionOutcome::Continue
    );
    let _ = apply_all(&mut world, &mut output);

    let tree = query::first_of_kind(&world, EntityKind::Objective).expect("tree");
    world::apply(
        &mut world,
        Command::DamageObjective {
            objective: tree.id,
            amount: tuning.objective_health,
        },
        &mut Vec::new(),
    );
    advance(&mut world, 1);

    assert_eq!(scheduler.update(&world, &mut output), SessionOutcome::Lost);
    let track = script::NIGHT_TRACK.to_owned();
    assert_eq!(
        output.effects,
        vec![
            PlatformEffect::PlayAudio {
                track: track.clone()
            },
            PlatformEffect::StopAudio { track },
        ]
    );
}

#[test]
fn night_spawns_waves_and_ends_at_dawn() {
    let tuning = Tuning::default();
    let mut world = world_from(GROVE);
    walk_player_onto(&mut world, EntityKind::Objective);
    let mut output = QuestOutput::default();
    let mut quest = TimedProximityQuest::new(
        script::night(&tuning, EnemyType::new(0)),
        CollectibleBatch::new(0),
        query::tick(&world),
        &mut output,
    );
    let _ = apply_all(&mut world, &mut output);
    assert_eq!(quest.check(&world, &mut output), CheckResult::Active);
    output.effects.clear();

    let mut waves = 0;
    let mut result = Evaluation::Ongoing;
    for _ in 0..=tuning.seconds(300) {
        result = quest.evaluate(&world, &mut output);
        waves += output
            .commands
            .iter()
            .filter(|command| **command == Command::SpawnEnemies)
            .count();
        output.commands.clear();
        if result != Evaluation::Ongoing {
            break;
        }
        advance(&mut world, 1);
    }

    assert_eq!(result, Evaluation::Succeeded);
    assert_eq!(waves, 9, "one wave at start and one every 35 seconds");

    quest.end(&mut output);
    assert!(output.commands.contains(&Command::ClearEnemies));
    assert!(output.effects.contains(&PlatformEffect::StopAudio {
        track: script::NIGHT_TRACK.to_owned()
    }));
}

#[test]
fn scheduler_replaces_quests_at_thresholds() {
    let tuning = Tuning::default();
    let mut world = world_from(GROVE);
    send_player_away(&mut world);
    let mut scheduler = Scheduler::new(script::default_script(&tuning));
    let mut output = QuestOutput::default();

    scheduler.pre_update(Tick::new(tuning.seconds(5) - 1), &mut output);
    assert!(scheduler.current().is_none());
    assert!(output.is_empty());

    scheduler.pre_update(Tick::new(tuning.seconds(5)), &mut output);
    assert_eq!(
        scheduler.current().map(|quest| quest.config().name.as_str()),
        Some("mandarins")
    );
    assert_eq!(output.effects.len(), 1);

    scheduler.pre_update(Tick::new(tuning.seconds(15)), &mut output);
    assert_eq!(
        scheduler.current().map(|quest| quest.config().name.as_str()),
        Some("night")
    );
    assert_eq!(output.effects.len(), 2);
    assert!(output.commands.contains(&Command::RetargetSpawners {
        enemy_type: EnemyType::new(1)
    }));
    assert_eq!(
        scheduler.update(&world, &mut output),
        SessionOutcome::Continue
    );
    assert_eq!(scheduler.overlay(), None);
}

#[test]
fn scheduler_reports_loss_on_expiry() {
    let tuning = Tuning {
        ticks_per_second: 2,
        ..Tuning::default()
    };
    let mut world = world_from(GROVE);
    send_player_away(&mut world);
    let mut scheduler = Scheduler::new(vec![ScheduledQuest {
        at: 0,
        narrative: script::narrative(&["Go!"]),
        quest: script::night(&tuning, EnemyType::new(0)),
    }]);
    let mut output = QuestOutput::default();
    scheduler.pre_update(query::tick(&world), &mut output);

    let mut outcome = SessionOutcome::Continue;
    for _ in 0..=tuning.seconds(45) {
        advance(&mut world, 1);
        outcome = scheduler.update(&world, &mut output);
        if outcome != SessionOutcome::Continue {
            break;
        }
    }
    assert_eq!(outcome, SessionOutcome::Lost);
    assert_eq!(query::tick(&world).get(), tuning.seconds(45) + 1);
}

#[test]
fn scheduler_clears_succeeded_quests() {
    let tuning = Tuning {
        ticks_per_second: 1,
        ..Tuning::default()
    };
    let mut world = world_from(GROVE);
    walk_player_onto(&mut world, EntityKind::Objective);
    let mut scheduler = Scheduler::new(vec![ScheduledQuest {
        at: 0,
        narrative: Vec::new(),
        quest: script::night(&tuning, EnemyType::new(0)),
    }]);
    let mut output = QuestOutput::default();
    scheduler.pre_update(Tick::ZERO, &mut output);

    for _ in 0..tuning.seconds(300) {
        assert_eq!(
            scheduler.update(&world, &mut output),
            SessionOutcome::Continue
        );
        assert!(scheduler.current().is_some());
        advance(&mut world, 1);
    }
    assert_eq!(
        scheduler.update(&world, &mut output),
        SessionOutcome::Continue
    );
    assert!(scheduler.current().is_none());
    assert!(output.effects.iter().any(|effect| matches!(
        effect,
        PlatformEffect::Narrative { lines } if lines[0].contains("night is over")
    )));
}

#[test]
fn stale_collectibles_are_not_credited_to_a_new_quest() {
    let tuning = Tuning::default();
    let mut world = world_from(MEADOW);
    let mut scheduler = Scheduler::new(vec![
        ScheduledQuest {
            at: 0,
            narrative: Vec::new(),
            quest: script::mandarins(&tuning, 3),
        },
        ScheduledQuest {
            at: 1,
            narrative: Vec::new(),
            quest: script::mandarins(&tuning, 3),
        },
    ]);
    let mut output = QuestOutput::default();
    scheduler.pre_update(Tick::ZERO, &mut output);
    let _ = scheduler.update(&world, &mut output);
    let _ = apply_all(&mut world, &mut output);
    let stale = query::members(&world, Group::Collectibles);
    assert_eq!(stale.len(), 3);

    advance(&mut world, 1);
    scheduler.pre_update(Tick::new(1), &mut output);
    let _ = scheduler.update(&world, &mut output);
    let _ = apply_all(&mut world, &mut output);
    assert_eq!(query::members(&world, Group::Collectibles).len(), 6);

    let item = query::entity(&world, stale[0]).expect("stale item");
    let player = query::player(&world).expect("player");
    world::apply(
        &mut world,
        Command::MoveEntity {
            entity: player.id,
            offset: PixelOffset::new(
                item.rect.origin().x - player.rect.origin().x,
                item.rect.origin().y - player.rect.origin().y,
            ),
        },
        &mut Vec::new(),
    );
    let _ = scheduler.update(&world, &mut output);
    assert!(!output
        .commands
        .iter()
        .any(|command| matches!(command, Command::CollectItem { item, .. } if *item == stale[0])));
}
