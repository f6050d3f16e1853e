//! Sprite metadata: dimensions, collision masks, and animation layouts.

use std::collections::BTreeMap;

use crate::{EnemyType, PixelOffset};

/// Identifies the image an entity is drawn with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SpriteKey {
    /// Terrain tile by image index.
    Tile(i32),
    /// Fixed item by image index.
    Item(u8),
    /// Player sprite sheet.
    Player,
    /// Non-player character sprite.
    Npc,
    /// Enemy sprite sheet by archetype.
    Enemy(EnemyType),
    /// Objective sprite sheet.
    Objective,
    /// Ambient particle.
    Particle,
}

/// Opaque-pixel footprint of a sprite.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SpriteMask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl SpriteMask {
    /// Alpha value above which a pixel counts as opaque.
    pub const ALPHA_THRESHOLD: u8 = 127;

    /// Mask where every pixel is opaque.
    #[must_use]
    pub fn solid(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bits: vec![true; (width as usize) * (height as usize)],
        }
    }

    /// Builds a mask from row-major alpha values.
    ///
    /// Returns `None` when the number of samples does not match the
    /// dimensions.
    #[must_use]
    pub fn from_alpha(width: u32, height: u32, alpha: &[u8]) -> Option<Self> {
        if alpha.len() != (width as usize) * (height as usize) {
            return None;
        }
        Some(Self {
            width,
            height,
            bits: alpha
                .iter()
                .map(|value| *value > Self::ALPHA_THRESHOLD)
                .collect(),
        })
    }

    /// Width of the mask in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height of the mask in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Reports whether the pixel at `(x, y)` is opaque; out of range is clear.
    #[must_use]
    pub fn is_opaque(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return false;
        }
        let index = (y as usize) * (self.width as usize) + (x as usize);
        self.bits.get(index).copied().unwrap_or(false)
    }

    /// Reports whether any opaque pixel of `other`, placed at `offset`
    /// relative to this mask's top-left corner, lands on an opaque pixel here.
    #[must_use]
    pub fn overlaps(&self, other: &SpriteMask, offset: PixelOffset) -> bool {
        let x_start = offset.dx.max(0);
        let y_start = offset.dy.max(0);
        let x_end = (offset.dx + other.width as i32).min(self.width as i32);
        let y_end = (offset.dy + other.height as i32).min(self.height as i32);

        (y_start..y_end).any(|y| {
            (x_start..x_end).any(|x| {
                self.is_opaque(x, y) && other.is_opaque(x - offset.dx, y - offset.dy)
            })
        })
    }
}

/// Frame counts per orientation and row of a sprite sheet.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct AnimationLayout {
    sequences: Vec<Vec<u16>>,
}

impl AnimationLayout {
    /// Creates a layout from `sequences[orientation][row] = frame count`.
    #[must_use]
    pub fn new(sequences: Vec<Vec<u16>>) -> Self {
        Self { sequences }
    }

    /// Layout repeating the same rows for each orientation.
    #[must_use]
    pub fn mirrored(rows: &[u16], orientations: usize) -> Self {
        Self {
            sequences: vec![rows.to_vec(); orientations],
        }
    }

    /// Reports whether the sprite has no animation frames at all.
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.sequences.is_empty()
    }

    /// Number of orientation variants.
    #[must_use]
    pub fn orientations(&self) -> usize {
        self.sequences.len()
    }

    /// Number of rows in an orientation.
    #[must_use]
    pub fn rows(&self, orientation: u8) -> usize {
        self.sequences
            .get(usize::from(orientation))
            .map_or(0, Vec::len)
    }

    /// Number of frames in the selected sequence; zero when absent.
    #[must_use]
    pub fn frames(&self, orientation: u8, row: u8) -> u16 {
        self.sequences
            .get(usize::from(orientation))
            .and_then(|rows| rows.get(usize::from(row)))
            .copied()
            .unwrap_or(0)
    }
}

/// Everything needed to size, collide, and animate a sprite.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpriteSpec {
    /// Opaque footprint; its dimensions are the sprite's dimensions.
    pub mask: SpriteMask,
    /// Frame table layout.
    pub layout: AnimationLayout,
}

impl SpriteSpec {
    /// Fully opaque, non-animated sprite.
    #[must_use]
    pub fn solid(width: u32, height: u32) -> Self {
        Self {
            mask: SpriteMask::solid(width, height),
            layout: AnimationLayout::default(),
        }
    }

    /// Fully opaque sprite with the provided animation layout.
    #[must_use]
    pub fn animated(width: u32, height: u32, layout: AnimationLayout) -> Self {
        Self {
            mask: SpriteMask::solid(width, height),
            layout,
        }
    }

    /// Sprite width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.mask.width()
    }

    /// Sprite height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.mask.height()
    }
}

/// Sprite metadata by key with per-category defaults.
///
/// Platforms that load real images register decoded masks through
/// [`SpriteCatalog::with_override`]; headless runs use the solid defaults.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpriteCatalog {
    tile: SpriteSpec,
    item: SpriteSpec,
    player: SpriteSpec,
    npc: SpriteSpec,
    enemy: SpriteSpec,
    objective: SpriteSpec,
    particle: SpriteSpec,
    overrides: BTreeMap<SpriteKey, SpriteSpec>,
}

impl SpriteCatalog {
    /// Player rows: idle, walk, attack, then five unused action rows.
    pub const PLAYER_ROWS: [u16; 8] = [13, 8, 10, 10, 10, 6, 4, 7];

    /// Default catalog for the given tile size.
    #[must_use]
    pub fn standard(tile_size: u32) -> Self {
        Self {
            tile: SpriteSpec::solid(tile_size, tile_size),
            item: SpriteSpec::solid(48, 48),
            player: SpriteSpec::animated(
                64,
                64,
                AnimationLayout::mirrored(&Self::PLAYER_ROWS, 2),
            ),
            npc: SpriteSpec::solid(48, 48),
            enemy: SpriteSpec::animated(48, 48, AnimationLayout::mirrored(&[3], 4)),
            objective: SpriteSpec::animated(128, 128, AnimationLayout::new(vec![vec![2]])),
            particle: SpriteSpec::solid(8, 8),
            overrides: BTreeMap::new(),
        }
    }

    /// Returns the catalog with `spec` registered for `key`.
    #[must_use]
    pub fn with_override(mut self, key: SpriteKey, spec: SpriteSpec) -> Self {
        let _ = self.overrides.insert(key, spec);
        self
    }

    /// Resolves metadata for a sprite key.
    #[must_use]
    pub fn spec(&self, key: SpriteKey) -> &SpriteSpec {
        if let Some(spec) = self.overrides.get(&key) {
            return spec;
        }
        match key {
            SpriteKey::Tile(_) => &self.tile,
            SpriteKey::Item(_) => &self.item,
            SpriteKey::Player => &self.player,
            SpriteKey::Npc => &self.npc,
            SpriteKey::Enemy(_) => &self.enemy,
            SpriteKey::Objective => &self.objective,
            SpriteKey::Particle => &self.particle,
        }
    }
}

impl Default for SpriteCatalog {
    fn default() -> Self {
        Self::standard(64)
    }
}
