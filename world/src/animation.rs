//! Frame cursor shared by every animated entity.

use snowfall_core::{AnimationLayout, FrameIndex};

/// Position within an `[orientation][row][frame]` frame table.
///
/// The cursor never stores the table itself; every operation receives the
/// layout of the entity's sprite and keeps `frame` inside the current
/// sequence.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AnimationCursor {
    orientation: u8,
    row: u8,
    frame: u16,
}

impl AnimationCursor {
    /// Cursor at the first frame of the given orientation and row 0.
    #[must_use]
    pub const fn new(orientation: u8) -> Self {
        Self {
            orientation,
            row: 0,
            frame: 0,
        }
    }

    /// Current position as a plain index.
    #[must_use]
    pub const fn index(&self) -> FrameIndex {
        FrameIndex {
            orientation: self.orientation,
            row: self.row,
            frame: self.frame,
        }
    }

    /// Steps to the next frame, wrapping at the end of the sequence.
    pub fn advance(&mut self, layout: &AnimationLayout) {
        let length = layout.frames(self.orientation, self.row);
        self.frame = if length == 0 {
            0
        } else {
            (self.frame + 1) % length
        };
    }

    /// Switches to another behavior row. Rows the layout does not have are
    /// ignored.
    pub fn set_row(&mut self, layout: &AnimationLayout, row: u8, reset_frame: bool) {
        if usize::from(row) >= layout.rows(self.orientation) {
            return;
        }
        self.row = row;
        if reset_frame {
            self.frame = 0;
        }
        self.clamp(layout);
    }

    /// Selects another orientation while preserving the frame.
    pub fn set_orientation(&mut self, layout: &AnimationLayout, orientation: u8) {
        if usize::from(orientation) >= layout.orientations() {
            return;
        }
        self.orientation = orientation;
        if usize::from(self.row) >= layout.rows(orientation) {
            self.row = 0;
        }
        self.clamp(layout);
    }

    fn clamp(&mut self, layout: &AnimationLayout) {
        let length = layout.frames(self.orientation, self.row);
        self.frame = if length == 0 { 0 } else { self.frame % length };
    }
}
