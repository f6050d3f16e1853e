use std::fs;

use anyhow::{Context, Result as AnyResult};
use log::{debug, info};
use snowfall_core::PlatformEffect;
use snowfall_platform::{DrawCall, Flow, Platform, PlatformInput, SpriteDraw};

use crate::script::InputScript;

/// Platform without a window: levels come from disk, input from a script,
/// narratives and audio cues go to the log.
#[derive(Debug)]
pub(crate) struct HeadlessPlatform {
    inputs: InputScript,
    frames: u64,
    sprites: usize,
    clock: String,
}

impl HeadlessPlatform {
    pub(crate) fn new(inputs: InputScript) -> Self {
        Self {
            inputs,
            frames: 0,
            sprites: 0,
            clock: String::from("0:00"),
        }
    }

    /// Frames drawn so far.
    pub(crate) fn frames(&self) -> u64 {
        self.frames
    }

    /// Clock text of the last drawn frame.
    pub(crate) fn clock(&self) -> &str {
        &self.clock
    }

    /// Scripted ticks that were never replayed.
    pub(crate) fn unused_inputs(&self) -> usize {
        self.inputs.remaining()
    }
}

impl Platform for HeadlessPlatform {
    fn load_level(&mut self, name: &str) -> AnyResult<String> {
        fs::read_to_string(name).with_context(|| format!("failed to read {name}"))
    }

    fn prepare_tiles(&mut self, tiles: &[SpriteDraw]) -> AnyResult<()> {
        debug!("tile layer with {} tiles", tiles.len());
        Ok(())
    }

    fn poll_input(&mut self) -> AnyResult<PlatformInput> {
        Ok(self.inputs.next_input())
    }

    fn present(&mut self, effect: &PlatformEffect) -> AnyResult<Flow> {
        match effect {
            PlatformEffect::Narrative { lines } => {
                for line in lines {
                    info!("| {line}");
                }
            }
            PlatformEffect::PlayAudio { track } => info!("audio: play {track}"),
            PlatformEffect::StopAudio { track } => info!("audio: stop {track}"),
        }
        Ok(Flow::Continue)
    }

    fn draw(&mut self, calls: &[DrawCall]) -> AnyResult<()> {
        self.frames += 1;
        self.sprites = 0;
        for call in calls {
            match call {
                DrawCall::Sprite(_) => self.sprites += 1,
                DrawCall::Text { text, .. } => text.clone_into(&mut self.clock),
                DrawCall::Clear(_) | DrawCall::TileLayer { .. } | DrawCall::Overlay(_) => {}
            }
        }
        debug!("frame {} at {}: {} sprites", self.frames, self.clock, self.sprites);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use snowfall_platform::Color;

    use super::*;

    #[test]
    fn draw_tracks_frames_and_the_clock() {
        let mut platform = HeadlessPlatform::new(InputScript::default());
        platform
            .draw(&[
                DrawCall::Clear(Color::from_rgb_u8(0, 0, 0)),
                DrawCall::Text {
                    position: glam::Vec2::ZERO,
                    text: "1:05".to_owned(),
                    color: Color::from_rgb_u8(255, 255, 255),
                },
            ])
            .expect("draw succeeds");

        assert_eq!(platform.frames(), 1);
        assert_eq!(platform.clock(), "1:05");
    }

    #[test]
    fn missing_level_files_name_the_path() {
        let mut platform = HeadlessPlatform::new(InputScript::default());
        let error = platform
            .load_level("does/not/exist.txt")
            .expect_err("missing file");
        assert_eq!(error.to_string(), "failed to read does/not/exist.txt");
    }
}
