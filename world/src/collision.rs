//! Shape overlap tests between entities.

use snowfall_core::{PixelOffset, PixelRect, Precision, SpriteCatalog, SpriteKey};

use crate::entities::Entity;

/// Shape of an entity at a hypothetical position.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Shape {
    pub(crate) rect: PixelRect,
    pub(crate) sprite: Option<SpriteKey>,
}

impl Shape {
    pub(crate) fn of(entity: &Entity, offset: PixelOffset) -> Self {
        Self {
            rect: entity.rect().translated(offset),
            sprite: entity.sprite(),
        }
    }
}

/// Reports whether two shapes overlap at the requested precision.
///
/// Bounding rectangles are tested first; mask precision then compares the
/// opaque pixels of both sprites. Sprite-less shapes never collide.
pub(crate) fn overlaps(
    catalog: &SpriteCatalog,
    first: Shape,
    second: Shape,
    precision: Precision,
) -> bool {
    if !first.rect.overlaps(&second.rect) {
        return false;
    }
    match precision {
        Precision::Rect => true,
        Precision::Mask => {
            let (Some(first_key), Some(second_key)) = (first.sprite, second.sprite) else {
                return false;
            };
            let offset = PixelOffset::new(
                second.rect.origin().x - first.rect.origin().x,
                second.rect.origin().y - first.rect.origin().y,
            );
            catalog
                .spec(first_key)
                .mask
                .overlaps(&catalog.spec(second_key).mask, offset)
        }
    }
}

#[cfg(test)]
mod tests {
    use snowfall_core::{PixelPoint, SpriteMask, SpriteSpec};

    use super::*;

    #[test]
    fn transparent_pixels_pass_mask_tests_but_not_rect_tests() {
        // 4x4 ring with a transparent 2x2 hole in the middle.
        let ring: Vec<u8> = (0..16)
            .map(|index| {
                let (x, y) = (index % 4, index / 4);
                if (1..3).contains(&x) && (1..3).contains(&y) {
                    0
                } else {
                    255
                }
            })
            .collect();
        let catalog = SpriteCatalog::standard(4)
            .with_override(
                SpriteKey::Tile(1),
                SpriteSpec {
                    mask: SpriteMask::from_alpha(4, 4, &ring).expect("sizes match"),
                    layout: Default::default(),
                },
            )
            .with_override(SpriteKey::Particle, SpriteSpec::solid(2, 2));

        let ring = Shape {
            rect: PixelRect::new(PixelPoint::new(0, 0), 4, 4),
            sprite: Some(SpriteKey::Tile(1)),
        };
        let inside = Shape {
            rect: PixelRect::new(PixelPoint::new(1, 1), 2, 2),
            sprite: Some(SpriteKey::Particle),
        };
        let edge = Shape {
            rect: PixelRect::new(PixelPoint::new(0, 1), 2, 2),
            sprite: Some(SpriteKey::Particle),
        };

        assert!(overlaps(&catalog, ring, inside, Precision::Rect));
        assert!(!overlaps(&catalog, ring, inside, Precision::Mask));
        assert!(overlaps(&catalog, ring, edge, Precision::Mask));
        assert!(overlaps(&catalog, edge, ring, Precision::Mask));
    }
}
