#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Snowfall engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Systems read immutable snapshots of
//! the world and submit [`Command`] values describing desired mutations, the
//! world executes those commands via its `apply` entry point, and then reports
//! [`Event`] values describing what actually happened. Adapters only ever see
//! snapshots, [`PlatformEffect`] requests, and the per-tick [`InputIntent`].

mod sprites;

use serde::{Deserialize, Serialize};

pub use sprites::{AnimationLayout, SpriteCatalog, SpriteKey, SpriteMask, SpriteSpec};

/// Identifier assigned to an entity by the world.
///
/// Identifiers are allocated monotonically and never reused, so a stale id
/// simply stops resolving once its entity has been killed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u32);

impl EntityId {
    /// Creates a new entity identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Discrete simulation step counter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tick(u64);

impl Tick {
    /// Tick value before the first simulation step.
    pub const ZERO: Tick = Tick(0);

    /// Creates a tick counter from a raw step count.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Raw number of steps represented by the counter.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }

    /// Returns the following tick.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Number of ticks elapsed since `earlier`, saturating at zero.
    #[must_use]
    pub const fn since(self, earlier: Tick) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

/// Integer pixel position in world space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelPoint {
    /// Horizontal coordinate growing to the right.
    pub x: i32,
    /// Vertical coordinate growing downward.
    pub y: i32,
}

impl PixelPoint {
    /// Creates a new pixel position.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the position shifted by `offset`.
    #[must_use]
    pub const fn offset_by(self, offset: PixelOffset) -> Self {
        Self {
            x: self.x + offset.dx,
            y: self.y + offset.dy,
        }
    }

    /// Squared Euclidean distance to `other`.
    #[must_use]
    pub fn squared_distance(self, other: PixelPoint) -> i64 {
        let dx = i64::from(self.x) - i64::from(other.x);
        let dy = i64::from(self.y) - i64::from(other.y);
        dx * dx + dy * dy
    }
}

/// Signed pixel displacement.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelOffset {
    /// Horizontal displacement.
    pub dx: i32,
    /// Vertical displacement.
    pub dy: i32,
}

impl PixelOffset {
    /// Displacement that leaves positions untouched.
    pub const ZERO: PixelOffset = PixelOffset { dx: 0, dy: 0 };

    /// Creates a new displacement.
    #[must_use]
    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    /// Reports whether the displacement is zero along both axes.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.dx == 0 && self.dy == 0
    }

    /// Inverse displacement.
    #[must_use]
    pub const fn reversed(self) -> Self {
        Self {
            dx: -self.dx,
            dy: -self.dy,
        }
    }
}

/// Axis-aligned rectangle measured in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PixelRect {
    origin: PixelPoint,
    width: u32,
    height: u32,
}

impl PixelRect {
    /// Creates a rectangle anchored at its top-left corner.
    #[must_use]
    pub const fn new(origin: PixelPoint, width: u32, height: u32) -> Self {
        Self {
            origin,
            width,
            height,
        }
    }

    /// Top-left corner of the rectangle.
    #[must_use]
    pub const fn origin(&self) -> PixelPoint {
        self.origin
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Exclusive right edge.
    #[must_use]
    pub const fn right(&self) -> i32 {
        self.origin.x + self.width as i32
    }

    /// Exclusive bottom edge.
    #[must_use]
    pub const fn bottom(&self) -> i32 {
        self.origin.y + self.height as i32
    }

    /// Center point, rounded toward the top-left like integer halving.
    #[must_use]
    pub const fn center(&self) -> PixelPoint {
        PixelPoint::new(
            self.origin.x + (self.width / 2) as i32,
            self.origin.y + (self.height / 2) as i32,
        )
    }

    /// Returns the rectangle shifted by `offset`.
    #[must_use]
    pub const fn translated(self, offset: PixelOffset) -> Self {
        Self {
            origin: self.origin.offset_by(offset),
            width: self.width,
            height: self.height,
        }
    }

    /// Reports whether the rectangle covers no area.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Strict overlap test; rectangles that only share an edge do not overlap
    /// and empty rectangles never overlap anything.
    #[must_use]
    pub const fn overlaps(&self, other: &PixelRect) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.origin.x < other.right()
            && other.origin.x < self.right()
            && self.origin.y < other.bottom()
            && other.origin.y < self.bottom()
    }
}

/// Offset measured in whole tiles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileOffset {
    /// Column displacement.
    pub columns: i32,
    /// Row displacement.
    pub rows: i32,
}

impl TileOffset {
    /// Creates a new tile offset.
    #[must_use]
    pub const fn new(columns: i32, rows: i32) -> Self {
        Self { columns, rows }
    }
}

/// Location of a cell within the level grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TilePosition {
    column: u32,
    row: u32,
}

impl TilePosition {
    /// Creates a new grid position.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

/// Membership tag used to select entities for collision queries, update
/// passes, and draw passes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Group {
    /// Static terrain tiles; anything walkable overlaps at least one.
    Tiles,
    /// Collidable obstacles that block player movement.
    Boxes,
    /// Fixed items placed on the map, including quest collectibles.
    Items,
    /// Animated obstacles that enemies damage on contact.
    AnimatedItems,
    /// Hostile actors.
    Enemies,
    /// Non-player characters.
    Npcs,
    /// The player-controlled actor.
    Player,
    /// Ambient entities updated on the throttled cadence.
    Ambient,
    /// Zero-size enemy emitters.
    Spawners,
    /// Items that can be picked up while a collection quest runs.
    Collectibles,
}

impl Group {
    /// Every group in declaration order.
    pub const ALL: [Group; 10] = [
        Group::Tiles,
        Group::Boxes,
        Group::Items,
        Group::AnimatedItems,
        Group::Enemies,
        Group::Npcs,
        Group::Player,
        Group::Ambient,
        Group::Spawners,
        Group::Collectibles,
    ];

    const fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

/// Non-exclusive set of [`Group`] memberships.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct GroupSet(u16);

impl GroupSet {
    /// Set without any memberships.
    pub const EMPTY: GroupSet = GroupSet(0);

    /// Builds a set from a slice of groups.
    #[must_use]
    pub const fn of(groups: &[Group]) -> Self {
        let mut bits = 0;
        let mut index = 0;
        while index < groups.len() {
            bits |= groups[index].bit();
            index += 1;
        }
        Self(bits)
    }

    /// Returns the set with `group` added.
    #[must_use]
    pub const fn with(self, group: Group) -> Self {
        Self(self.0 | group.bit())
    }

    /// Reports whether `group` is part of the set.
    #[must_use]
    pub const fn contains(&self, group: Group) -> bool {
        self.0 & group.bit() != 0
    }

    /// Reports whether the set has no memberships.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Iterates the memberships in [`Group::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = Group> + '_ {
        Group::ALL
            .into_iter()
            .filter(move |group| self.contains(*group))
    }
}

impl FromIterator<Group> for GroupSet {
    fn from_iter<T: IntoIterator<Item = Group>>(iter: T) -> Self {
        iter.into_iter().fold(GroupSet::EMPTY, GroupSet::with)
    }
}

/// Closed set of simulated object kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// Static terrain tile.
    Tile,
    /// Fixed item such as a crate, barrel, or collectible.
    FixedItem,
    /// Player-controlled actor.
    Player,
    /// Non-player character.
    Npc,
    /// Hostile actor emitted by spawners.
    Enemy,
    /// Zero-size enemy emitter.
    Spawner,
    /// Short-lived ambient effect.
    Particle,
    /// Health-bearing goal entity that enemies damage.
    Objective,
}

/// Horizontal facing of an actor; selects the orientation of its frame table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Facing {
    /// Facing toward increasing x.
    #[default]
    Right,
    /// Facing toward decreasing x.
    Left,
}

impl Facing {
    /// Orientation index used to select the frame table.
    #[must_use]
    pub const fn orientation(self) -> u8 {
        match self {
            Self::Right => 0,
            Self::Left => 1,
        }
    }
}

/// Fixed emission direction of a spawner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmissionDirection {
    /// Enemies travel toward increasing y.
    Down,
    /// Enemies travel toward decreasing x.
    Left,
    /// Enemies travel toward increasing x.
    Right,
    /// Enemies travel toward decreasing y.
    Up,
}

impl EmissionDirection {
    /// Numeric direction id: `0` down, `1` left, `2` right, `3` up.
    #[must_use]
    pub const fn id(self) -> u8 {
        match self {
            Self::Down => 0,
            Self::Left => 1,
            Self::Right => 2,
            Self::Up => 3,
        }
    }

    /// Resolves a numeric direction id.
    #[must_use]
    pub const fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(Self::Down),
            1 => Some(Self::Left),
            2 => Some(Self::Right),
            3 => Some(Self::Up),
            _ => None,
        }
    }

    /// Unit velocity applied to enemies emitted in this direction.
    #[must_use]
    pub const fn velocity(self) -> PixelOffset {
        match self {
            Self::Down => PixelOffset::new(0, 1),
            Self::Left => PixelOffset::new(-1, 0),
            Self::Right => PixelOffset::new(1, 0),
            Self::Up => PixelOffset::new(0, -1),
        }
    }
}

/// Enemy archetype selecting sprite sheet and damage.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct EnemyType(u8);

impl EnemyType {
    /// Creates an enemy type from its numeric id.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    /// Numeric id of the enemy type.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }
}

/// Tags the collectibles scattered by one quest so stale items from a
/// replaced quest are never credited to its successor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollectibleBatch(u32);

impl CollectibleBatch {
    /// Creates a batch tag.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Numeric value of the tag.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Precision used by overlap queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Precision {
    /// Bounding rectangles only.
    Rect,
    /// Opaque pixel footprints as described by sprite masks.
    Mask,
}

/// Cursor into an entity's frame table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FrameIndex {
    /// Orientation variant of the frame table.
    pub orientation: u8,
    /// Behavior-specific sequence within the orientation.
    pub row: u8,
    /// Position within the sequence.
    pub frame: u16,
}

/// Immutable representation of a single entity used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EntitySnapshot {
    /// Identifier allocated by the world.
    pub id: EntityId,
    /// Kind of simulated object.
    pub kind: EntityKind,
    /// Current bounding rectangle.
    pub rect: PixelRect,
    /// Sprite drawn for the entity; spawners have none.
    pub sprite: Option<SpriteKey>,
    /// Groups the entity belongs to.
    pub groups: GroupSet,
    /// Animation cursor for animated kinds.
    pub frame: Option<FrameIndex>,
    /// Per-update velocity for moving kinds.
    pub velocity: Option<PixelOffset>,
    /// Remaining health for objectives.
    pub health: Option<i32>,
    /// Damage dealt to objectives on contact.
    pub damage: Option<i32>,
    /// Collection batch for quest collectibles.
    pub batch: Option<CollectibleBatch>,
}

/// Pre-decoded logical input for a single tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct InputIntent {
    /// Logical "up" key held.
    pub up: bool,
    /// Logical "down" key held.
    pub down: bool,
    /// Logical "left" key held.
    pub left: bool,
    /// Logical "right" key held.
    pub right: bool,
    /// Logical attack key held.
    pub attack: bool,
    /// Debug request to emit one enemy from every spawner.
    pub spawn_wave: bool,
}

/// Side effects delegated to the platform layer.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PlatformEffect {
    /// Pause and show narrative text until acknowledged.
    Narrative {
        /// Lines of text in display order.
        lines: Vec<String>,
    },
    /// Start looping the named audio track.
    PlayAudio {
        /// Track name understood by the platform.
        track: String,
    },
    /// Stop the named audio track.
    StopAudio {
        /// Track name understood by the platform.
        track: String,
    },
}

/// Full-screen tint drawn over the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Overlay {
    /// Black veil with the given opacity.
    Darkness {
        /// Opacity in the range 0..=255.
        alpha: u8,
    },
}

/// Result of a single tick as seen by the outer restart loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SessionOutcome {
    /// Keep ticking.
    Continue,
    /// The session survived its full length.
    Won,
    /// A quest expired or failed; the level must be regenerated.
    Lost,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by one step.
    Tick,
    /// Translates a single entity.
    MoveEntity {
        /// Entity to move.
        entity: EntityId,
        /// Displacement applied to its rectangle.
        offset: PixelOffset,
    },
    /// Selects the orientation variant of an entity's frame table.
    SetOrientation {
        /// Animated entity.
        entity: EntityId,
        /// Orientation index.
        orientation: u8,
    },
    /// Switches the behavior sequence of an entity's frame table.
    SetAnimationRow {
        /// Animated entity.
        entity: EntityId,
        /// Row index within the current orientation.
        row: u8,
        /// Whether the frame cursor restarts at zero.
        reset_frame: bool,
    },
    /// Advances an entity's frame cursor by one.
    AdvanceAnimation {
        /// Animated entity.
        entity: EntityId,
    },
    /// Removes an entity from every group.
    KillEntity {
        /// Entity to remove.
        entity: EntityId,
    },
    /// Consumes a collectible touched by `collector`.
    CollectItem {
        /// Collectible to consume.
        item: EntityId,
        /// Entity credited with the pickup.
        collector: EntityId,
    },
    /// Subtracts health from an objective.
    DamageObjective {
        /// Objective to damage.
        objective: EntityId,
        /// Health removed.
        amount: i32,
    },
    /// Resets every objective to the provided health.
    RestoreObjective {
        /// New health value.
        health: i32,
    },
    /// Spawns a short-lived ambient particle.
    SpawnParticle {
        /// Top-left corner of the particle.
        at: PixelPoint,
        /// Displacement applied on every ambient update.
        velocity: PixelOffset,
        /// Ambient updates before the particle expires.
        lifetime: u32,
    },
    /// Moves a particle and ages it by one ambient update.
    StepParticle {
        /// Particle to advance.
        particle: EntityId,
    },
    /// Applies the camera offset to every entity and the level origin.
    TranslateAll {
        /// Displacement applied to every rectangle.
        offset: PixelOffset,
    },
    /// Retargets every spawner to emit the given enemy type.
    RetargetSpawners {
        /// Enemy type emitted from now on.
        enemy_type: EnemyType,
    },
    /// Emits one enemy from every spawner.
    SpawnEnemies,
    /// Removes every enemy.
    ClearEnemies,
    /// Places collectibles on random walkable, unobstructed terrain.
    ScatterCollectibles {
        /// Batch tag applied to every placed item.
        batch: CollectibleBatch,
        /// Number of items requested.
        count: u32,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Tick reached after advancing.
        tick: Tick,
    },
    /// Confirms that an entity was removed.
    EntityKilled {
        /// Identifier of the removed entity.
        entity: EntityId,
        /// Kind of the removed entity.
        kind: EntityKind,
    },
    /// Confirms that a spawner emitted an enemy.
    EnemySpawned {
        /// Identifier of the new enemy.
        enemy: EntityId,
        /// Spawner that emitted it.
        spawner: EntityId,
        /// Archetype of the new enemy.
        enemy_type: EnemyType,
    },
    /// Confirms that a collectible was consumed.
    ItemCollected {
        /// Identifier of the consumed item.
        item: EntityId,
        /// Entity credited with the pickup.
        collector: EntityId,
        /// Batch the item belonged to.
        batch: CollectibleBatch,
    },
    /// Reports damage dealt to an objective.
    ObjectiveDamaged {
        /// Damaged objective.
        objective: EntityId,
        /// Health removed.
        amount: i32,
        /// Health left after the hit.
        remaining: i32,
    },
    /// Confirms that an objective's health was reset.
    ObjectiveRestored {
        /// Restored objective.
        objective: EntityId,
        /// Health after the reset.
        health: i32,
    },
    /// Confirms that spawners now emit another enemy type.
    SpawnersRetargeted {
        /// Enemy type now emitted.
        enemy_type: EnemyType,
        /// Number of spawners retargeted.
        spawners: usize,
    },
    /// Confirms that collectibles were placed.
    CollectiblesScattered {
        /// Batch tag of the placed items.
        batch: CollectibleBatch,
        /// Number of items placed.
        count: u32,
    },
    /// Reports that random placement ran out of attempts.
    PlacementExhausted {
        /// Batch tag of the request.
        batch: CollectibleBatch,
        /// Number of items requested.
        requested: u32,
        /// Number of items placed before giving up.
        placed: u32,
    },
}

/// Fixed tuning constants of the simulation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Simulation ticks per in-game second.
    pub ticks_per_second: u32,
    /// Target presentation rate of the platform loop.
    pub frames_per_second: u32,
    /// Screen width in pixels.
    pub screen_width: u32,
    /// Screen height in pixels.
    pub screen_height: u32,
    /// Side length of a square tile in pixels.
    pub tile_size: u32,
    /// Pixels moved per tick along each pressed axis.
    pub player_speed: i32,
    /// Enemy AI and ambient updates run on every n-th tick.
    pub ai_throttle: u32,
    /// The player's animation advances on every n-th tick.
    pub player_animation_cadence: u32,
    /// Ticks an attack lasts once started.
    pub attack_duration: u32,
    /// Health of a freshly placed or restored objective.
    pub objective_health: i32,
    /// Damage dealt on contact, indexed by enemy type.
    pub enemy_damage: Vec<i32>,
    /// In-game seconds a session lasts before it counts as won.
    pub session_seconds: u32,
    /// Item sprite used for quest collectibles.
    pub collectible_item: u8,
    /// Seed for the placement random number generator.
    pub seed: u64,
}

impl Tuning {
    /// Converts in-game seconds into ticks.
    #[must_use]
    pub fn seconds(&self, seconds: u32) -> u64 {
        u64::from(seconds) * u64::from(self.ticks_per_second)
    }

    /// Total ticks in a session.
    #[must_use]
    pub fn session_ticks(&self) -> u64 {
        self.seconds(self.session_seconds)
    }

    /// Damage dealt by the given enemy type; unknown types deal one point.
    #[must_use]
    pub fn damage_for(&self, enemy_type: EnemyType) -> i32 {
        self.enemy_damage
            .get(usize::from(enemy_type.get()))
            .copied()
            .unwrap_or(1)
    }
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            ticks_per_second: 45,
            frames_per_second: 60,
            screen_width: 500,
            screen_height: 500,
            tile_size: 64,
            player_speed: 10,
            ai_throttle: 5,
            player_animation_cadence: 5,
            attack_duration: 40,
            objective_health: 30,
            enemy_damage: vec![1, 2],
            session_seconds: 1200,
            collectible_item: 6,
            seed: 0x5eed_f00d_cafe_d00d,
        }
    }
}

/// Character that places a spawner and the direction it emits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnerToken {
    /// Level character.
    pub token: char,
    /// Emission direction of the spawner.
    pub direction: EmissionDirection,
}

/// Sprite-alignment nudge applied to a specific item digit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemNudge {
    /// Digit the nudge applies to.
    pub digit: char,
    /// Whole-tile displacement of the anchor cell.
    pub tile_offset: TileOffset,
    /// Extra pixel displacement after the tile offset.
    pub pixel_offset: PixelOffset,
}

/// Per-level token table mapping level characters to entities.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelTokens {
    /// Filler used for spaces and short rows.
    pub filler: char,
    /// Marks the player start cell.
    pub player_start: char,
    /// Marks the objective placement cell.
    pub objective: char,
    /// Marks an NPC placement cell.
    pub npc: char,
    /// Spawner characters and their emission directions.
    pub spawners: Vec<SpawnerToken>,
    /// Characters decoded as collidable tiles.
    pub collidable: Vec<char>,
    /// Tile drawn under items and NPCs.
    pub floor_tile: i32,
    /// Tile drawn under the player start.
    pub start_tile: i32,
    /// Tile drawn under the objective marker.
    pub objective_tile: i32,
    /// Tile drawn under spawners.
    pub spawner_tile: i32,
    /// Objective anchor relative to its marker.
    pub objective_anchor: TileOffset,
    /// Per-digit item alignment nudges.
    pub item_nudges: Vec<ItemNudge>,
}

impl LevelTokens {
    /// Tile image index encoded by an ordinary level character.
    #[must_use]
    pub fn tile_index(token: char) -> i32 {
        token as i32 - 'A' as i32
    }

    /// Emission direction of a spawner character, if it is one.
    #[must_use]
    pub fn spawner_direction(&self, token: char) -> Option<EmissionDirection> {
        self.spawners
            .iter()
            .find(|spawner| spawner.token == token)
            .map(|spawner| spawner.direction)
    }

    /// Alignment nudge for an item digit, if one is configured.
    #[must_use]
    pub fn item_nudge(&self, digit: char) -> Option<ItemNudge> {
        self.item_nudges
            .iter()
            .copied()
            .find(|nudge| nudge.digit == digit)
    }
}

impl Default for LevelTokens {
    fn default() -> Self {
        Self {
            filler: 'K',
            player_start: '@',
            objective: '=',
            npc: '#',
            spawners: vec![
                SpawnerToken {
                    token: '+',
                    direction: EmissionDirection::Right,
                },
                SpawnerToken {
                    token: '-',
                    direction: EmissionDirection::Left,
                },
                SpawnerToken {
                    token: '*',
                    direction: EmissionDirection::Down,
                },
                SpawnerToken {
                    token: '/',
                    direction: EmissionDirection::Up,
                },
            ],
            collidable: vec!['K', '}'],
            floor_tile: 58,
            start_tile: 16,
            objective_tile: 16,
            spawner_tile: 40,
            objective_anchor: TileOffset::new(-1, -1),
            item_nudges: vec![ItemNudge {
                digit: '5',
                tile_offset: TileOffset::new(-1, 0),
                pixel_offset: PixelOffset::new(48, 0),
            }],
        }
    }
}
