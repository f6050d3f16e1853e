#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Player controller that turns input intent into movement, facing, attack
//! and animation commands.

use log::debug;
use snowfall_core::{Command, EntityId, EntitySnapshot, Facing, InputIntent, PixelOffset, Tuning};

/// Animation row shown while standing still.
pub const IDLE_ROW: u8 = 0;
/// Animation row shown while walking.
pub const WALK_ROW: u8 = 1;
/// Animation row shown while attacking.
pub const ATTACK_ROW: u8 = 2;

/// Pure system that reacts to input intent and emits player commands.
#[derive(Debug)]
pub struct PlayerController {
    speed: i32,
    attack_duration: u32,
    cadence: u32,
    attack_timer: u32,
    cadence_counter: u32,
}

impl PlayerController {
    /// Creates a controller using the provided tuning.
    #[must_use]
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            speed: tuning.player_speed,
            attack_duration: tuning.attack_duration.max(1),
            cadence: tuning.player_animation_cadence.max(1),
            attack_timer: 0,
            cadence_counter: 0,
        }
    }

    /// Reports whether an attack is in progress.
    #[must_use]
    pub const fn is_attacking(&self) -> bool {
        self.attack_timer != 0
    }

    /// Resolves one tick of player control.
    ///
    /// `enemies_in_reach` lists the enemies overlapping the player at its
    /// current position. `is_blocked` reports whether the player, displaced by
    /// the given offset, would overlap a collidable entity. The vertical axis
    /// is resolved first; the horizontal probe already includes the accepted
    /// vertical step. Facing follows the attempted step while the walk row
    /// needs an accepted one.
    pub fn handle<F>(
        &mut self,
        input: InputIntent,
        player: &EntitySnapshot,
        enemies_in_reach: &[EntityId],
        is_blocked: F,
        out: &mut Vec<Command>,
    ) where
        F: Fn(PixelOffset) -> bool,
    {
        let entity = player.id;

        if self.is_attacking() || input.attack {
            if !self.is_attacking() {
                debug!("player {} starts an attack", entity.get());
                out.push(Command::SetAnimationRow {
                    entity,
                    row: ATTACK_ROW,
                    reset_frame: true,
                });
            }
            self.attack_timer = (self.attack_timer + 1) % self.attack_duration;
            for enemy in enemies_in_reach {
                out.push(Command::KillEntity { entity: *enemy });
            }
        }

        let attempted_dy = axis(input.up, input.down) * self.speed;
        let dy = if attempted_dy != 0 && is_blocked(PixelOffset::new(0, attempted_dy)) {
            0
        } else {
            attempted_dy
        };

        let attempted_dx = axis(input.left, input.right) * self.speed;
        let dx = if attempted_dx != 0 && is_blocked(PixelOffset::new(attempted_dx, dy)) {
            0
        } else {
            attempted_dx
        };

        let step = PixelOffset::new(dx, dy);
        if !step.is_zero() {
            out.push(Command::MoveEntity {
                entity,
                offset: step,
            });
        }

        let facing = if attempted_dx < 0 {
            Some(Facing::Left)
        } else if attempted_dx > 0 || attempted_dy != 0 {
            Some(Facing::Right)
        } else {
            None
        };
        let row = if step.is_zero() { IDLE_ROW } else { WALK_ROW };
        if let Some(facing) = facing {
            out.push(Command::SetOrientation {
                entity,
                orientation: facing.orientation(),
            });
        }
        if !self.is_attacking() {
            out.push(Command::SetAnimationRow {
                entity,
                row,
                reset_frame: false,
            });
        }

        self.cadence_counter = (self.cadence_counter + 1) % self.cadence;
        if self.cadence_counter == 0 {
            out.push(Command::AdvanceAnimation { entity });
        }
    }
}

/// Direction applied only when exactly one of the opposed keys is held.
fn axis(negative: bool, positive: bool) -> i32 {
    match (negative, positive) {
        (true, false) => -1,
        (false, true) => 1,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposed_keys_cancel() {
        assert_eq!(axis(true, true), 0);
        assert_eq!(axis(false, false), 0);
        assert_eq!(axis(true, false), -1);
        assert_eq!(axis(false, true), 1);
    }
}
