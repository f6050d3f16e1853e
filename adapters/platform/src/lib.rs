#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared platform contracts for Snowfall adapters.
//!
//! The simulation never draws or blocks. Adapters implement [`Platform`] and
//! hand it to [`run_campaign`], which drives sessions tick by tick and turns
//! each [`FrameState`](snowfall_system_session::FrameState) into draw calls
//! through [`render`].

mod campaign;
mod render;

use anyhow::Result as AnyResult;
use glam::Vec2;
use snowfall_core::{FrameIndex, InputIntent, PlatformEffect, SpriteKey};

pub use campaign::{run_campaign, Campaign, CampaignOutcome};
pub use render::{render, tile_layer, BACKGROUND, HUD_TEXT};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns the same color with a byte alpha channel.
    #[must_use]
    pub fn with_alpha_u8(self, alpha: u8) -> Self {
        Self {
            alpha: f32::from(alpha) / 255.0,
            ..self
        }
    }
}

/// One sprite region placed on screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteDraw {
    /// Sprite sheet the region is taken from.
    pub key: SpriteKey,
    /// Animation frame selecting the region; `None` for static sprites.
    pub frame: Option<FrameIndex>,
    /// Top-left screen position.
    pub position: Vec2,
}

/// Declarative draw instruction consumed by adapters in order.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCall {
    /// Fills the whole screen with a solid color.
    Clear(Color),
    /// Blits the tile layer prepared through [`Platform::prepare_tiles`].
    TileLayer {
        /// Screen position of the level's top-left corner.
        origin: Vec2,
    },
    /// Draws a sprite region.
    Sprite(SpriteDraw),
    /// Blends a translucent color over the whole screen.
    Overlay(Color),
    /// Draws a line of HUD text.
    Text {
        /// Top-left screen position.
        position: Vec2,
        /// Text content.
        text: String,
        /// Text color.
        color: Color,
    },
}

/// Input snapshot gathered by the adapter for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlatformInput {
    /// Logical keys held this tick.
    pub intent: InputIntent,
    /// Whether the player asked to close the game.
    pub quit: bool,
}

/// Answer of the platform after presenting an effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    /// Keep running.
    Continue,
    /// The player closed the game while the effect was shown.
    Quit,
}

/// Collaborator that owns the window, audio and input devices.
pub trait Platform {
    /// Reads the text of the named level.
    fn load_level(&mut self, name: &str) -> AnyResult<String>;

    /// Receives the static tile layer of a freshly generated level, with
    /// positions relative to the level's top-left corner.
    fn prepare_tiles(&mut self, tiles: &[SpriteDraw]) -> AnyResult<()>;

    /// Samples the logical input for the next tick.
    fn poll_input(&mut self) -> AnyResult<PlatformInput>;

    /// Presents an effect. Narratives block until acknowledged.
    fn present(&mut self, effect: &PlatformEffect) -> AnyResult<Flow>;

    /// Draws one frame.
    fn draw(&mut self, calls: &[DrawCall]) -> AnyResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_channels_are_normalised() {
        let color = Color::from_rgb_u8(255, 0, 51).with_alpha_u8(70);

        assert_eq!(color.red, 1.0);
        assert_eq!(color.green, 0.0);
        assert!((color.blue - 0.2).abs() < f32::EPSILON);
        assert!((color.alpha - 70.0 / 255.0).abs() < f32::EPSILON);
    }
}
