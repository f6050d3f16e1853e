#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Session driver composing every system into the fixed per-tick order.
//!
//! [`Session::tick`] advances the simulation by exactly one step and never
//! draws; callers render the returned [`FrameState`] against
//! [`Session::world`] afterwards.

use std::fmt;

use log::{info, warn};
use snowfall_core::{
    Command, Event, Group, InputIntent, LevelTokens, Overlay, PlatformEffect, Precision,
    SessionOutcome, SpriteCatalog, Tick, Tuning,
};
use snowfall_system_camera::Camera;
use snowfall_system_movement::PlayerController;
use snowfall_system_quests::{script, QuestOutput, ScheduledQuest, Scheduler};
use snowfall_system_spawning::{Config, Spawning};
use snowfall_world::{self as world, query, LevelError, World};
use thiserror::Error;

/// Failures that abort a session.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// The level could not be loaded.
    #[error(transparent)]
    Level(#[from] LevelError),
    /// Random placement ran out of attempts.
    #[error("placed only {placed} of {requested} collectibles")]
    PlacementExhausted {
        /// Number of items requested.
        requested: u32,
        /// Number of items placed.
        placed: u32,
    },
}

/// Everything a session needs besides the level text.
#[derive(Clone, Debug)]
pub struct SessionSettings {
    /// Simulation constants.
    pub tuning: Tuning,
    /// Level token table.
    pub tokens: LevelTokens,
    /// Sprite metadata.
    pub catalog: SpriteCatalog,
    /// Scheduled quests.
    pub script: Vec<ScheduledQuest>,
}

impl SessionSettings {
    /// Default tokens, sprites and campaign script for the given tuning.
    #[must_use]
    pub fn new(tuning: Tuning) -> Self {
        Self {
            catalog: SpriteCatalog::standard(tuning.tile_size),
            script: script::default_script(&tuning),
            tokens: LevelTokens::default(),
            tuning,
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self::new(Tuning::default())
    }
}

/// In-game time shown on the HUD.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Clock {
    minutes: u64,
    seconds: u64,
}

impl Clock {
    /// Converts a tick count into whole in-game minutes and seconds.
    #[must_use]
    pub fn from_ticks(tick: Tick, ticks_per_second: u32) -> Self {
        let total = tick.get() / u64::from(ticks_per_second.max(1));
        Self {
            minutes: total / 60,
            seconds: total % 60,
        }
    }

    /// Whole minutes.
    #[must_use]
    pub const fn minutes(&self) -> u64 {
        self.minutes
    }

    /// Seconds past the minute.
    #[must_use]
    pub const fn seconds(&self) -> u64 {
        self.seconds
    }
}

impl fmt::Display for Clock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02}", self.minutes, self.seconds)
    }
}

/// Result of one simulation step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameState {
    /// Tick reached by the step.
    pub tick: Tick,
    /// Whether the session continues.
    pub outcome: SessionOutcome,
    /// HUD clock.
    pub clock: Clock,
    /// Overlay requested by the active quest.
    pub overlay: Option<Overlay>,
    /// Platform effects requested during the step, in order.
    pub effects: Vec<PlatformEffect>,
}

/// One playthrough of a level.
#[derive(Debug)]
pub struct Session {
    world: World,
    controller: PlayerController,
    camera: Camera,
    spawning: Spawning,
    scheduler: Scheduler,
    session_ticks: u64,
    ticks_per_second: u32,
    finished: Option<SessionOutcome>,
}

impl Session {
    /// Loads the level and prepares every system.
    pub fn new(level_text: &str, settings: SessionSettings) -> Result<Self, SessionError> {
        let SessionSettings {
            tuning,
            tokens,
            catalog,
            script,
        } = settings;

        let controller = PlayerController::new(&tuning);
        let camera = Camera::new(&tuning);
        let spawning = Spawning::new(Config::from_tuning(&tuning));
        let session_ticks = tuning.session_ticks();
        let ticks_per_second = tuning.ticks_per_second;
        let world = World::new(level_text, tuning, tokens, catalog)?;

        Ok(Self {
            world,
            controller,
            camera,
            spawning,
            scheduler: Scheduler::new(script),
            session_ticks,
            ticks_per_second,
            finished: None,
        })
    }

    /// Read-only access to the simulated world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Quest scheduler state.
    #[must_use]
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Advances the session by one tick.
    ///
    /// Once the session has been won or lost further calls keep returning
    /// that outcome without simulating. A session aborted by exhausted
    /// placement counts as lost.
    pub fn tick(&mut self, input: InputIntent) -> Result<FrameState, SessionError> {
        if let Some(outcome) = self.finished {
            return Ok(self.frame(outcome, Vec::new()));
        }

        let mut events = Vec::new();
        self.apply(Command::Tick, &mut events);
        let tick = query::tick(&self.world);
        let tick_events = events.clone();

        let mut quests = QuestOutput::default();
        self.scheduler.pre_update(tick, &mut quests);
        self.apply_all(&mut quests.commands, &mut events);

        if input.spawn_wave {
            let mut commands = Vec::new();
            Spawning::spawn_all(&mut commands);
            self.apply_all(&mut commands, &mut events);
        }

        self.move_player(input, &mut events);

        if let Some(player) = query::player(&self.world) {
            self.camera.update(player.rect);
        }

        self.update_ai(&tick_events, &mut events);

        let mut commands = Vec::new();
        self.camera.apply(&mut commands);
        self.apply_all(&mut commands, &mut events);

        let mut outcome = self.scheduler.update(&self.world, &mut quests);
        self.apply_all(&mut quests.commands, &mut events);

        for event in &events {
            if let Event::PlacementExhausted {
                requested, placed, ..
            } = event
            {
                warn!("session aborted: placement exhausted");
                self.finished = Some(SessionOutcome::Lost);
                return Err(SessionError::PlacementExhausted {
                    requested: *requested,
                    placed: *placed,
                });
            }
        }

        if outcome == SessionOutcome::Continue && tick.get() >= self.session_ticks {
            outcome = SessionOutcome::Won;
        }
        if outcome != SessionOutcome::Continue {
            info!("session {:?} at tick {}", outcome, tick.get());
            self.finished = Some(outcome);
        }

        Ok(self.frame(outcome, quests.effects))
    }

    fn frame(&self, outcome: SessionOutcome, effects: Vec<PlatformEffect>) -> FrameState {
        let tick = query::tick(&self.world);
        FrameState {
            tick,
            outcome,
            clock: Clock::from_ticks(tick, self.ticks_per_second),
            overlay: self.scheduler.overlay(),
            effects,
        }
    }

    fn move_player(&mut self, input: InputIntent, events: &mut Vec<Event>) {
        let Some(player) = query::player(&self.world) else {
            return;
        };
        let world = &self.world;
        let enemies = query::overlapping(world, player.id, Group::Enemies, Precision::Rect);
        let mut commands = Vec::new();
        self.controller.handle(
            input,
            &player,
            &enemies,
            |offset| {
                query::collides_with(world, player.id, offset, Group::Boxes, Precision::Mask)
                    .is_some()
            },
            &mut commands,
        );
        self.apply_all(&mut commands, events);
    }

    fn update_ai(&mut self, tick_events: &[Event], events: &mut Vec<Event>) {
        let world = &self.world;
        let enemies = query::snapshots(world, Group::Enemies);
        let animated = query::snapshots(world, Group::AnimatedItems);
        let ambient = query::snapshots(world, Group::Ambient);
        let mut commands = Vec::new();
        self.spawning.handle(
            tick_events,
            &enemies,
            &animated,
            &ambient,
            |enemy, velocity| {
                query::collides_with(
                    world,
                    enemy.id,
                    velocity,
                    Group::AnimatedItems,
                    Precision::Mask,
                )
            },
            &mut commands,
        );
        self.apply_all(&mut commands, events);
    }

    fn apply(&mut self, command: Command, events: &mut Vec<Event>) {
        world::apply(&mut self.world, command, events);
    }

    fn apply_all(&mut self, commands: &mut Vec<Command>, events: &mut Vec<Event>) {
        for command in commands.drain(..) {
            self.apply(command, events);
        }
    }
}
