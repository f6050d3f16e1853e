#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Throttled enemy AI, spawner control, and ambient updates.

use log::debug;
use snowfall_core::{
    Command, EnemyType, EntityId, EntityKind, EntitySnapshot, Event, PixelOffset, PixelPoint, Tick,
    Tuning,
};

const IMPACT_DRIFT: PixelOffset = PixelOffset::new(0, -1);

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    ai_throttle: u32,
    impact_lifetime: u32,
}

impl Config {
    /// Creates a configuration running AI on every `ai_throttle`-th tick and
    /// keeping impact particles alive for `impact_lifetime` ambient updates.
    #[must_use]
    pub const fn new(ai_throttle: u32, impact_lifetime: u32) -> Self {
        Self {
            ai_throttle,
            impact_lifetime,
        }
    }

    /// Configuration derived from the simulation tuning.
    #[must_use]
    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self::new(tuning.ai_throttle, 6)
    }
}

/// Pure system that advances enemies, objectives, and ambient entities on
/// the throttled cadence.
#[derive(Debug)]
pub struct Spawning {
    ai_throttle: u32,
    impact_lifetime: u32,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            ai_throttle: config.ai_throttle.max(1),
            impact_lifetime: config.impact_lifetime,
        }
    }

    /// Reports whether throttled updates run on `tick`.
    #[must_use]
    pub fn is_update_tick(&self, tick: Tick) -> bool {
        tick.get() % u64::from(self.ai_throttle) == 0
    }

    /// Emits the command retargeting every spawner.
    pub fn retarget(enemy_type: EnemyType, out: &mut Vec<Command>) {
        out.push(Command::RetargetSpawners { enemy_type });
    }

    /// Emits the command spawning one enemy per spawner.
    pub fn spawn_all(out: &mut Vec<Command>) {
        out.push(Command::SpawnEnemies);
    }

    /// Consumes world events and snapshots to emit AI and ambient commands.
    ///
    /// `strikes` reports the objective an enemy would overlap after one more
    /// step along its velocity. Such an enemy stays put, damages that
    /// objective, leaves an impact particle and dies.
    pub fn handle<F>(
        &mut self,
        events: &[Event],
        enemies: &[EntitySnapshot],
        animated: &[EntitySnapshot],
        ambient: &[EntitySnapshot],
        strikes: F,
        out: &mut Vec<Command>,
    ) where
        F: Fn(&EntitySnapshot, PixelOffset) -> Option<EntityId>,
    {
        let due = events.iter().any(|event| match event {
            Event::TimeAdvanced { tick } => self.is_update_tick(*tick),
            _ => false,
        });
        if !due {
            return;
        }

        for enemy in enemies {
            let velocity = enemy.velocity.unwrap_or_default();
            if let Some(objective) = strikes(enemy, velocity) {
                let amount = enemy.damage.unwrap_or(0);
                debug!(
                    "enemy {} struck objective {} for {amount}",
                    enemy.id.get(),
                    objective.get()
                );
                out.push(Command::DamageObjective { objective, amount });
                let centre = enemy.rect.center();
                out.push(Command::SpawnParticle {
                    at: PixelPoint::new(centre.x, enemy.rect.origin().y),
                    velocity: IMPACT_DRIFT,
                    lifetime: self.impact_lifetime,
                });
                out.push(Command::KillEntity { entity: enemy.id });
                continue;
            }
            out.push(Command::MoveEntity {
                entity: enemy.id,
                offset: velocity,
            });
            out.push(Command::AdvanceAnimation { entity: enemy.id });
        }

        for entity in animated {
            out.push(Command::AdvanceAnimation { entity: entity.id });
        }

        for entity in ambient {
            if entity.kind == EntityKind::Particle {
                out.push(Command::StepParticle {
                    particle: entity.id,
                });
            }
        }
    }
}
