#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Camera that keeps a focus entity centred on screen.

use snowfall_core::{Command, PixelOffset, PixelRect, Tuning};

/// World-to-screen translation recomputed from scratch every tick.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    screen_width: u32,
    screen_height: u32,
    offset: PixelOffset,
}

impl Camera {
    /// Creates a camera for the configured screen size.
    #[must_use]
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            screen_width: tuning.screen_width,
            screen_height: tuning.screen_height,
            offset: PixelOffset::ZERO,
        }
    }

    /// Most recently computed offset.
    #[must_use]
    pub const fn offset(&self) -> PixelOffset {
        self.offset
    }

    /// Recomputes the offset that moves `focus` to the screen centre.
    pub fn update(&mut self, focus: PixelRect) {
        let half_width = (self.screen_width / 2) as i32;
        let half_height = (self.screen_height / 2) as i32;
        let centre = focus.center();
        self.offset = PixelOffset::new(half_width - centre.x, half_height - centre.y);
    }

    /// Emits the command translating every entity by the current offset.
    pub fn apply(&self, out: &mut Vec<Command>) {
        if !self.offset.is_zero() {
            out.push(Command::TranslateAll {
                offset: self.offset,
            });
        }
    }
}
