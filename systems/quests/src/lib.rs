#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Quest sequencer: a generic time- and proximity-gated quest state machine
//! plus the scheduler that starts scripted quests at fixed ticks.

mod scheduler;
pub mod script;

use log::info;
use snowfall_core::{
    CollectibleBatch, Command, EnemyType, EntityKind, Group, Overlay, PlatformEffect, Precision,
    Tick,
};
use snowfall_world::{query, World};

pub use scheduler::{ScheduledQuest, Scheduler};

/// Lifecycle of a quest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum QuestState {
    /// Created and waiting for its proximity trigger.
    Pending,
    /// Triggered and being evaluated every tick.
    Active,
    /// Success condition met.
    Succeeded,
    /// Expired before triggering or failed while active.
    Failed,
}

/// Result of [`TimedProximityQuest::check`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CheckResult {
    /// Still waiting for the player to approach the target.
    NotYetTriggered,
    /// Running; evaluate it this tick.
    Active,
    /// The grace window passed without a trigger.
    Expired,
}

/// Result of [`TimedProximityQuest::evaluate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Evaluation {
    /// Keep evaluating.
    Ongoing,
    /// The success condition holds.
    Succeeded,
    /// The deadline passed or the failure condition holds.
    Failed,
}

/// Predicate over the running quest and the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Condition {
    /// At least this many collectibles of the quest's batch were picked up.
    CollectedAtLeast(u32),
    /// This many ticks passed since the quest started.
    SurvivedFor(u64),
    /// The target's health dropped to zero or below, or the target is gone.
    TargetDepleted,
}

/// Side effect run when a quest is created, starts, or ends.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum QuestAction {
    /// Pause on narrative text.
    Narrative(Vec<String>),
    /// Place collectibles tagged with the quest's batch.
    ScatterCollectibles(u32),
    /// Retarget every spawner.
    RetargetSpawners(EnemyType),
    /// Reset every objective to the given health.
    RestoreObjective(i32),
    /// Remove every enemy.
    ClearEnemies,
    /// Emit one enemy from every spawner.
    SpawnEnemies,
    /// Start an ambient audio loop.
    PlayAudio(String),
    /// Stop an ambient audio loop.
    StopAudio(String),
}

/// Data describing one quest type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct QuestConfig {
    /// Name used in logs.
    pub name: String,
    /// Kind of the entity the player must approach. With several of that
    /// kind the most recently generated one counts.
    pub target: EntityKind,
    /// Squared distance between top-left corners below which the quest starts.
    pub trigger_distance_sq: i64,
    /// Ticks after creation before an untriggered quest expires.
    pub grace: u64,
    /// Ticks after the start before an unfinished quest fails.
    pub deadline: Option<u64>,
    /// Spawners fire every this many ticks since the start, start included.
    pub wave_interval: Option<u64>,
    /// Failure predicate checked before success.
    pub fail_when: Option<Condition>,
    /// Success predicate.
    pub succeed_when: Condition,
    /// Overlay drawn while the quest is active.
    pub overlay: Option<Overlay>,
    /// Actions run once when the quest is created.
    pub on_create: Vec<QuestAction>,
    /// Actions run once when the quest triggers.
    pub on_start: Vec<QuestAction>,
    /// Actions run once when the quest succeeds.
    pub on_end: Vec<QuestAction>,
    /// Actions run once when a started quest fails.
    pub on_fail: Vec<QuestAction>,
}

/// Commands and platform effects requested by the quest layer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QuestOutput {
    /// Commands for the world.
    pub commands: Vec<Command>,
    /// Effects for the platform.
    pub effects: Vec<PlatformEffect>,
}

impl QuestOutput {
    /// Reports whether nothing was requested.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty() && self.effects.is_empty()
    }
}

/// Quest state machine parameterized by a [`QuestConfig`].
#[derive(Clone, Debug)]
pub struct TimedProximityQuest {
    config: QuestConfig,
    batch: CollectibleBatch,
    state: QuestState,
    created: Tick,
    started: Option<Tick>,
    collected: u32,
}

impl TimedProximityQuest {
    /// Creates a pending quest and runs its creation actions.
    pub fn new(
        config: QuestConfig,
        batch: CollectibleBatch,
        created: Tick,
        out: &mut QuestOutput,
    ) -> Self {
        run_actions(&config.on_create, batch, out);
        Self {
            config,
            batch,
            state: QuestState::Pending,
            created,
            started: None,
            collected: 0,
        }
    }

    /// Configuration the quest was built from.
    #[must_use]
    pub fn config(&self) -> &QuestConfig {
        &self.config
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> QuestState {
        self.state
    }

    /// Collectibles picked up so far.
    #[must_use]
    pub const fn collected(&self) -> u32 {
        self.collected
    }

    /// Tick at which the quest triggered.
    #[must_use]
    pub const fn started(&self) -> Option<Tick> {
        self.started
    }

    /// Overlay requested while the quest is active.
    #[must_use]
    pub fn overlay(&self) -> Option<Overlay> {
        match self.state {
            QuestState::Active => self.config.overlay,
            _ => None,
        }
    }

    /// Triggers the quest when the player is near its target.
    pub fn check(&mut self, world: &World, out: &mut QuestOutput) -> CheckResult {
        match self.state {
            QuestState::Active => return CheckResult::Active,
            QuestState::Failed => return CheckResult::Expired,
            QuestState::Pending | QuestState::Succeeded => {}
        }

        let tick = query::tick(world);
        if tick.since(self.created) > self.config.grace {
            info!("quest {} expired before it started", self.config.name);
            self.state = QuestState::Failed;
            return CheckResult::Expired;
        }

        let near = match (
            query::player(world),
            query::last_of_kind(world, self.config.target),
        ) {
            (Some(player), Some(target)) => {
                player.rect.origin().squared_distance(target.rect.origin())
                    < self.config.trigger_distance_sq
            }
            _ => false,
        };
        if !near {
            return CheckResult::NotYetTriggered;
        }

        self.start(tick, out);
        CheckResult::Active
    }

    fn start(&mut self, tick: Tick, out: &mut QuestOutput) {
        info!("quest {} started at tick {}", self.config.name, tick.get());
        self.state = QuestState::Active;
        self.started = Some(tick);
        run_actions(&self.config.on_start, self.batch, out);
    }

    /// Advances an active quest by one tick.
    pub fn evaluate(&mut self, world: &World, out: &mut QuestOutput) -> Evaluation {
        let Some(started) = self.started else {
            return Evaluation::Ongoing;
        };
        let elapsed = query::tick(world).since(started);

        if self.config.deadline.is_some_and(|deadline| elapsed > deadline) {
            info!("quest {} missed its deadline", self.config.name);
            self.state = QuestState::Failed;
            return Evaluation::Failed;
        }
        if let Some(condition) = self.config.fail_when {
            if self.holds(condition, world, elapsed) {
                info!("quest {} failed", self.config.name);
                self.state = QuestState::Failed;
                return Evaluation::Failed;
            }
        }

        if let Some(interval) = self.config.wave_interval.filter(|interval| *interval > 0) {
            if elapsed % interval == 0 {
                out.commands.push(Command::SpawnEnemies);
            }
        }

        self.collect(world, out);

        if self.holds(self.config.succeed_when, world, elapsed) {
            info!("quest {} succeeded", self.config.name);
            self.state = QuestState::Succeeded;
            return Evaluation::Succeeded;
        }
        Evaluation::Ongoing
    }

    /// Runs the success actions.
    pub fn end(&mut self, out: &mut QuestOutput) {
        run_actions(&self.config.on_end, self.batch, out);
    }

    /// Runs the failure actions of a quest that failed after starting.
    pub fn fail(&mut self, out: &mut QuestOutput) {
        if self.started.is_some() {
            run_actions(&self.config.on_fail, self.batch, out);
        }
    }

    fn collect(&mut self, world: &World, out: &mut QuestOutput) {
        let Some(player) = query::player(world) else {
            return;
        };
        for item in query::overlapping(world, player.id, Group::Collectibles, Precision::Mask) {
            let ours = query::entity(world, item)
                .and_then(|snapshot| snapshot.batch)
                .is_some_and(|batch| batch == self.batch);
            if ours {
                out.commands.push(Command::CollectItem {
                    item,
                    collector: player.id,
                });
                self.collected += 1;
            }
        }
    }

    fn holds(&self, condition: Condition, world: &World, elapsed: u64) -> bool {
        match condition {
            Condition::CollectedAtLeast(count) => self.collected >= count,
            Condition::SurvivedFor(ticks) => elapsed >= ticks,
            Condition::TargetDepleted => query::last_of_kind(world, self.config.target)
                .map_or(true, |target| target.health.is_some_and(|health| health <= 0)),
        }
    }
}

fn run_actions(actions: &[QuestAction], batch: CollectibleBatch, out: &mut QuestOutput) {
    for action in actions {
        match action {
            QuestAction::Narrative(lines) => out.effects.push(PlatformEffect::Narrative {
                lines: lines.clone(),
            }),
            QuestAction::ScatterCollectibles(count) => {
                out.commands.push(Command::ScatterCollectibles {
                    batch,
                    count: *count,
                });
            }
            QuestAction::RetargetSpawners(enemy_type) => {
                out.commands.push(Command::RetargetSpawners {
                    enemy_type: *enemy_type,
                });
            }
            QuestAction::RestoreObjective(health) => {
                out.commands
                    .push(Command::RestoreObjective { health: *health });
            }
            QuestAction::ClearEnemies => out.commands.push(Command::ClearEnemies),
            QuestAction::SpawnEnemies => out.commands.push(Command::SpawnEnemies),
            QuestAction::PlayAudio(track) => out.effects.push(PlatformEffect::PlayAudio {
                track: track.clone(),
            }),
            QuestAction::StopAudio(track) => out.effects.push(PlatformEffect::StopAudio {
                track: track.clone(),
            }),
        }
    }
}
