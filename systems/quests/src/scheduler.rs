//! Top-level quest scheduler keyed on elapsed ticks.

use log::info;
use snowfall_core::{CollectibleBatch, Overlay, PlatformEffect, SessionOutcome, Tick};
use snowfall_world::{query, World};

use crate::{CheckResult, Evaluation, QuestConfig, QuestOutput, TimedProximityQuest};

/// Quest started when the session reaches a tick threshold.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ScheduledQuest {
    /// Tick at which the quest is created.
    pub at: u64,
    /// Narrative shown right before the quest is created.
    pub narrative: Vec<String>,
    /// Configuration of the created quest.
    pub quest: QuestConfig,
}

/// Holds at most one quest and replaces it on every scheduled threshold.
#[derive(Debug)]
pub struct Scheduler {
    script: Vec<ScheduledQuest>,
    current: Option<TimedProximityQuest>,
    next_batch: u32,
}

impl Scheduler {
    /// Creates a scheduler for the provided script.
    #[must_use]
    pub fn new(script: Vec<ScheduledQuest>) -> Self {
        Self {
            script,
            current: None,
            next_batch: 0,
        }
    }

    /// Quest currently held, if any.
    #[must_use]
    pub fn current(&self) -> Option<&TimedProximityQuest> {
        self.current.as_ref()
    }

    /// Overlay requested by the current quest.
    #[must_use]
    pub fn overlay(&self) -> Option<Overlay> {
        self.current.as_ref().and_then(TimedProximityQuest::overlay)
    }

    /// Creates the quests scheduled for exactly `tick`, replacing any quest
    /// still running.
    pub fn pre_update(&mut self, tick: Tick, out: &mut QuestOutput) {
        let due: Vec<ScheduledQuest> = self
            .script
            .iter()
            .filter(|entry| entry.at == tick.get())
            .cloned()
            .collect();

        for entry in due {
            if !entry.narrative.is_empty() {
                out.effects.push(PlatformEffect::Narrative {
                    lines: entry.narrative,
                });
            }
            if let Some(previous) = &self.current {
                info!(
                    "quest {} replaced while {:?}",
                    previous.config().name,
                    previous.state()
                );
            }
            let batch = CollectibleBatch::new(self.next_batch);
            self.next_batch = self.next_batch.wrapping_add(1);
            info!("quest {} created at tick {}", entry.quest.name, tick.get());
            self.current = Some(TimedProximityQuest::new(entry.quest, batch, tick, out));
        }
    }

    /// Checks and evaluates the current quest.
    pub fn update(&mut self, world: &World, out: &mut QuestOutput) -> SessionOutcome {
        let Some(quest) = self.current.as_mut() else {
            return SessionOutcome::Continue;
        };

        match quest.check(world, out) {
            CheckResult::NotYetTriggered => return SessionOutcome::Continue,
            CheckResult::Expired => return SessionOutcome::Lost,
            CheckResult::Active => {}
        }

        match quest.evaluate(world, out) {
            Evaluation::Ongoing => SessionOutcome::Continue,
            Evaluation::Failed => {
                quest.fail(out);
                SessionOutcome::Lost
            }
            Evaluation::Succeeded => {
                quest.end(out);
                self.current = None;
                info!("quest cleared at tick {}", query::tick(world).get());
                SessionOutcome::Continue
            }
        }
    }
}
