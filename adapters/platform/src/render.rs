use std::collections::BTreeSet;

use glam::Vec2;
use snowfall_core::{EntitySnapshot, Group, Overlay, PixelPoint, PixelRect};
use snowfall_system_session::FrameState;
use snowfall_world::{query, World};

use crate::{Color, DrawCall, SpriteDraw};

/// Color used to clear the screen before each frame.
pub const BACKGROUND: Color = Color::from_rgb_u8(0, 0, 0);
/// Color of the HUD clock.
pub const HUD_TEXT: Color = Color::from_rgb_u8(255, 255, 255);

/// Back-to-front draw order of entity groups. Tiles live in the tile layer.
const LAYERS: [Group; 6] = [
    Group::Items,
    Group::AnimatedItems,
    Group::Npcs,
    Group::Ambient,
    Group::Player,
    Group::Enemies,
];

const CLOCK_POSITION: Vec2 = Vec2::new(10.0, 10.0);

/// Builds the draw calls for the current world state.
///
/// Every entity is drawn at most once, in the first layer it belongs to, and
/// entities entirely outside the screen are skipped.
#[must_use]
pub fn render(world: &World, frame: &FrameState) -> Vec<DrawCall> {
    let tuning = query::tuning(world);
    let screen = PixelRect::new(
        PixelPoint::new(0, 0),
        tuning.screen_width,
        tuning.screen_height,
    );

    let mut calls = vec![
        DrawCall::Clear(BACKGROUND),
        DrawCall::TileLayer {
            origin: to_screen(query::origin(world)),
        },
    ];

    let mut drawn = BTreeSet::new();
    for group in LAYERS {
        for entity in query::snapshots(world, group) {
            if !drawn.insert(entity.id) || !entity.rect.overlaps(&screen) {
                continue;
            }
            if let Some(sprite) = sprite_draw(&entity, PixelPoint::new(0, 0)) {
                calls.push(DrawCall::Sprite(sprite));
            }
        }
    }

    if let Some(Overlay::Darkness { alpha }) = frame.overlay {
        calls.push(DrawCall::Overlay(BACKGROUND.with_alpha_u8(alpha)));
    }

    calls.push(DrawCall::Text {
        position: CLOCK_POSITION,
        text: frame.clock.to_string(),
        color: HUD_TEXT,
    });
    calls
}

/// Static tiles of the level relative to its top-left corner, in creation
/// order.
#[must_use]
pub fn tile_layer(world: &World) -> Vec<SpriteDraw> {
    let origin = query::origin(world);
    query::snapshots(world, Group::Tiles)
        .iter()
        .filter_map(|tile| sprite_draw(tile, origin))
        .collect()
}

fn sprite_draw(entity: &EntitySnapshot, relative_to: PixelPoint) -> Option<SpriteDraw> {
    let key = entity.sprite?;
    let origin = entity.rect.origin();
    Some(SpriteDraw {
        key,
        frame: entity.frame,
        position: to_screen(PixelPoint::new(
            origin.x - relative_to.x,
            origin.y - relative_to.y,
        )),
    })
}

fn to_screen(point: PixelPoint) -> Vec2 {
    Vec2::new(point.x as f32, point.y as f32)
}
