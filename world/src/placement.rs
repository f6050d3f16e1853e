//! Random placement of quest collectibles on walkable terrain.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use snowfall_core::{Group, PixelPoint, PixelRect};

use crate::entities::EntityStore;

/// Attempts made for a single item before placement gives up.
pub const MAX_PLACEMENT_ATTEMPTS: u32 = 10_000;

/// A position is valid when it overlaps no collidable entity and at least
/// one tile, both by bounding rectangle.
#[must_use]
pub fn is_valid_placement(store: &EntityStore, rect: PixelRect) -> bool {
    let overlapping = |group: Group| {
        store
            .iter()
            .filter(|(_, entity)| entity.groups().contains(group))
            .any(|(_, entity)| entity.rect().overlaps(&rect))
    };
    !overlapping(Group::Boxes) && overlapping(Group::Tiles)
}

/// Samples top-left corners for a `width` x `height` item inside `bounds`
/// until a valid one is found or the attempt budget runs out.
pub(crate) fn sample(
    store: &EntityStore,
    rng: &mut ChaCha8Rng,
    bounds: PixelRect,
    width: u32,
    height: u32,
) -> Option<PixelPoint> {
    let origin = bounds.origin();
    let max_x = (bounds.right() - width as i32).max(origin.x);
    let max_y = (bounds.bottom() - height as i32).max(origin.y);

    (0..MAX_PLACEMENT_ATTEMPTS).find_map(|_| {
        let candidate = PixelPoint::new(
            rng.gen_range(origin.x..=max_x),
            rng.gen_range(origin.y..=max_y),
        );
        is_valid_placement(store, PixelRect::new(candidate, width, height)).then_some(candidate)
    })
}
