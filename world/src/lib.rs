#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Snowfall.

pub mod animation;
mod collision;
pub mod entities;
pub mod generation;
mod level;
mod placement;

use log::{debug, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use snowfall_core::{
    AnimationLayout, Command, EntityId, EntityKind, Event, Group, LevelTokens, PixelOffset,
    PixelPoint, PixelRect, SpriteCatalog, SpriteKey, Tick, TilePosition, Tuning,
};

use crate::{
    animation::AnimationCursor,
    entities::{Entity, EntityState, EntityStore},
};

pub use level::{LevelError, LevelGrid};
pub use placement::{is_valid_placement, MAX_PLACEMENT_ATTEMPTS};

/// Represents the authoritative Snowfall world state.
#[derive(Debug)]
pub struct World {
    tuning: Tuning,
    tokens: LevelTokens,
    catalog: SpriteCatalog,
    entities: EntityStore,
    columns: u32,
    rows: u32,
    origin: PixelPoint,
    player: EntityId,
    player_start: TilePosition,
    tick: Tick,
    rng: ChaCha8Rng,
}

impl World {
    /// Parses and generates a level, yielding a world at tick zero.
    pub fn new(
        level_text: &str,
        tuning: Tuning,
        tokens: LevelTokens,
        catalog: SpriteCatalog,
    ) -> Result<Self, LevelError> {
        let grid = LevelGrid::parse(level_text, tokens.filler)?;
        let level = generation::generate(&grid, &tokens, &tuning, &catalog)?;

        let mut entities = EntityStore::new();
        let mut player = None;
        for entity in level.entities {
            let is_player = entity.kind() == EntityKind::Player;
            let id = entities.spawn(entity);
            if is_player {
                player = Some(id);
            }
        }
        let player = player.ok_or(LevelError::MissingPlayerStart)?;

        debug!(
            "generated {}x{} level with {} entities",
            level.columns,
            level.rows,
            entities.len()
        );

        Ok(Self {
            rng: ChaCha8Rng::seed_from_u64(tuning.seed),
            tuning,
            tokens,
            catalog,
            entities,
            columns: level.columns,
            rows: level.rows,
            origin: PixelPoint::default(),
            player,
            player_start: level.player_start,
            tick: Tick::ZERO,
        })
    }

    fn level_bounds(&self) -> PixelRect {
        PixelRect::new(
            self.origin,
            self.columns * self.tuning.tile_size,
            self.rows * self.tuning.tile_size,
        )
    }

    fn kill(&mut self, entity: EntityId, out_events: &mut Vec<Event>) {
        if let Some(removed) = self.entities.kill(entity) {
            debug!("killed {:?} {}", removed.kind(), entity.get());
            out_events.push(Event::EntityKilled {
                entity,
                kind: removed.kind(),
            });
        }
    }

    fn with_animation(
        &mut self,
        entity: EntityId,
        update: impl FnOnce(&mut AnimationCursor, &AnimationLayout),
    ) {
        let catalog = &self.catalog;
        if let Some(target) = self.entities.get_mut(entity) {
            let Some(sprite) = target.sprite() else {
                return;
            };
            let layout = &catalog.spec(sprite).layout;
            if let Some(cursor) = target.cursor_mut() {
                update(cursor, layout);
            }
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick => {
            world.tick = world.tick.next();
            out_events.push(Event::TimeAdvanced { tick: world.tick });
        }
        Command::MoveEntity { entity, offset } => {
            if let Some(target) = world.entities.get_mut(entity) {
                target.translate(offset);
            }
        }
        Command::SetOrientation {
            entity,
            orientation,
        } => world.with_animation(entity, |cursor, layout| {
            cursor.set_orientation(layout, orientation);
        }),
        Command::SetAnimationRow {
            entity,
            row,
            reset_frame,
        } => world.with_animation(entity, |cursor, layout| {
            cursor.set_row(layout, row, reset_frame);
        }),
        Command::AdvanceAnimation { entity } => {
            world.with_animation(entity, |cursor, layout| cursor.advance(layout));
        }
        Command::KillEntity { entity } => world.kill(entity, out_events),
        Command::CollectItem { item, collector } => {
            let batch = match world.entities.get(item).map(Entity::state) {
                Some(EntityState::Collectible { batch }) => *batch,
                _ => return,
            };
            let _ = world.entities.kill(item);
            debug!("collected item {} in batch {}", item.get(), batch.get());
            out_events.push(Event::ItemCollected {
                item,
                collector,
                batch,
            });
        }
        Command::DamageObjective { objective, amount } => {
            if let Some(EntityState::Objective { health, .. }) = world
                .entities
                .get_mut(objective)
                .map(Entity::state_mut)
            {
                *health -= amount;
                out_events.push(Event::ObjectiveDamaged {
                    objective,
                    amount,
                    remaining: *health,
                });
            }
        }
        Command::RestoreObjective { health: restored } => {
            for objective in world.entities.members(Group::AnimatedItems) {
                if let Some(EntityState::Objective { health, .. }) = world
                    .entities
                    .get_mut(objective)
                    .map(Entity::state_mut)
                {
                    *health = restored;
                    out_events.push(Event::ObjectiveRestored {
                        objective,
                        health: restored,
                    });
                }
            }
        }
        Command::SpawnParticle {
            at,
            velocity,
            lifetime,
        } => {
            let _ = world
                .entities
                .spawn(Entity::particle(&world.catalog, at, velocity, lifetime));
        }
        Command::StepParticle { particle } => {
            let Some(target) = world.entities.get_mut(particle) else {
                return;
            };
            let EntityState::Particle {
                velocity,
                remaining,
            } = *target.state()
            else {
                return;
            };
            target.translate(velocity);
            let remaining = remaining.saturating_sub(1);
            if let EntityState::Particle {
                remaining: stored, ..
            } = target.state_mut()
            {
                *stored = remaining;
            }
            if remaining == 0 {
                world.kill(particle, out_events);
            }
        }
        Command::TranslateAll { offset } => {
            if offset == PixelOffset::ZERO {
                return;
            }
            for entity in world.entities.iter_mut() {
                entity.translate(offset);
            }
            world.origin = world.origin.offset_by(offset);
        }
        Command::RetargetSpawners { enemy_type } => {
            let mut spawners = 0;
            for entity in world.entities.iter_mut() {
                if let EntityState::Spawner {
                    enemy_type: current,
                    ..
                } = entity.state_mut()
                {
                    *current = enemy_type;
                    spawners += 1;
                }
            }
            out_events.push(Event::SpawnersRetargeted {
                enemy_type,
                spawners,
            });
        }
        Command::SpawnEnemies => {
            for spawner in world.entities.members(Group::Spawners) {
                let Some(source) = world.entities.get(spawner) else {
                    continue;
                };
                let EntityState::Spawner {
                    direction,
                    enemy_type,
                } = *source.state()
                else {
                    continue;
                };
                let at = source.rect().origin();
                let enemy = world.entities.spawn(Entity::enemy(
                    &world.catalog,
                    at,
                    direction,
                    enemy_type,
                ));
                debug!(
                    "spawner {} emitted enemy {} heading {:?}",
                    spawner.get(),
                    enemy.get(),
                    direction
                );
                out_events.push(Event::EnemySpawned {
                    enemy,
                    spawner,
                    enemy_type,
                });
            }
        }
        Command::ClearEnemies => {
            for enemy in world.entities.members(Group::Enemies) {
                world.kill(enemy, out_events);
            }
        }
        Command::ScatterCollectibles { batch, count } => {
            let item = world.tuning.collectible_item;
            let spec = world.catalog.spec(SpriteKey::Item(item));
            let (width, height) = (spec.width(), spec.height());
            let bounds = world.level_bounds();

            let mut placed = 0;
            while placed < count {
                let Some(at) =
                    placement::sample(&world.entities, &mut world.rng, bounds, width, height)
                else {
                    break;
                };
                let _ = world
                    .entities
                    .spawn(Entity::collectible(&world.catalog, item, at, batch));
                placed += 1;
            }

            out_events.push(Event::CollectiblesScattered {
                batch,
                count: placed,
            });
            if placed < count {
                warn!(
                    "placement exhausted after {placed} of {count} collectibles in batch {}",
                    batch.get()
                );
                out_events.push(Event::PlacementExhausted {
                    batch,
                    requested: count,
                    placed,
                });
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use snowfall_core::{
        EntityId, EntityKind, EntitySnapshot, Group, LevelTokens, PixelOffset, PixelPoint,
        PixelRect, Precision, SpriteCatalog, Tick, TilePosition, Tuning,
    };

    use super::{
        collision::{self, Shape},
        entities::EntityStore,
        World,
    };

    /// Tick reached by the most recent `Command::Tick`.
    #[must_use]
    pub fn tick(world: &World) -> Tick {
        world.tick
    }

    /// Tuning constants the world was generated with.
    #[must_use]
    pub fn tuning(world: &World) -> &Tuning {
        &world.tuning
    }

    /// Token table the level was generated with.
    #[must_use]
    pub fn tokens(world: &World) -> &LevelTokens {
        &world.tokens
    }

    /// Sprite metadata used for sizing and masks.
    #[must_use]
    pub fn catalog(world: &World) -> &SpriteCatalog {
        &world.catalog
    }

    /// Read-only access to the entity store.
    #[must_use]
    pub fn entities(world: &World) -> &EntityStore {
        &world.entities
    }

    /// Level dimensions in tiles as `(columns, rows)`.
    #[must_use]
    pub fn dimensions(world: &World) -> (u32, u32) {
        (world.columns, world.rows)
    }

    /// Current screen-space position of the level's top-left corner.
    #[must_use]
    pub fn origin(world: &World) -> PixelPoint {
        world.origin
    }

    /// Current screen-space rectangle covered by the level grid.
    #[must_use]
    pub fn level_bounds(world: &World) -> PixelRect {
        world.level_bounds()
    }

    /// Cell that held the player start marker.
    #[must_use]
    pub fn player_start(world: &World) -> TilePosition {
        world.player_start
    }

    /// Snapshot of the player.
    #[must_use]
    pub fn player(world: &World) -> Option<EntitySnapshot> {
        entity(world, world.player)
    }

    /// Snapshot of a live entity; killed ids yield `None`.
    #[must_use]
    pub fn entity(world: &World, id: EntityId) -> Option<EntitySnapshot> {
        world
            .entities
            .get(id)
            .map(|entity| entity.snapshot(id, &world.tuning))
    }

    /// Members of a group in insertion order.
    #[must_use]
    pub fn members(world: &World, group: Group) -> Vec<EntityId> {
        world.entities.members(group)
    }

    /// Snapshots of every member of a group in insertion order.
    #[must_use]
    pub fn snapshots(world: &World, group: Group) -> Vec<EntitySnapshot> {
        world
            .entities
            .iter()
            .filter(|(_, entity)| entity.groups().contains(group))
            .map(|(id, entity)| entity.snapshot(id, &world.tuning))
            .collect()
    }

    /// First entity of a kind in insertion order.
    #[must_use]
    pub fn first_of_kind(world: &World, kind: EntityKind) -> Option<EntitySnapshot> {
        world
            .entities
            .iter()
            .find(|(_, entity)| entity.kind() == kind)
            .map(|(id, entity)| entity.snapshot(id, &world.tuning))
    }

    /// Most recently spawned entity of a kind.
    #[must_use]
    pub fn last_of_kind(world: &World, kind: EntityKind) -> Option<EntitySnapshot> {
        world
            .entities
            .iter()
            .rev()
            .find(|(_, entity)| entity.kind() == kind)
            .map(|(id, entity)| entity.snapshot(id, &world.tuning))
    }

    /// First member of `group` that `entity`, displaced by `offset`, would
    /// overlap. The entity never collides with itself.
    #[must_use]
    pub fn collides_with(
        world: &World,
        entity: EntityId,
        offset: PixelOffset,
        group: Group,
        precision: Precision,
    ) -> Option<EntityId> {
        overlaps_at(world, entity, offset, group, precision).next()
    }

    /// Every member of `group` the entity currently overlaps.
    #[must_use]
    pub fn overlapping(
        world: &World,
        entity: EntityId,
        group: Group,
        precision: Precision,
    ) -> Vec<EntityId> {
        overlaps_at(world, entity, PixelOffset::ZERO, group, precision).collect()
    }

    fn overlaps_at(
        world: &World,
        entity: EntityId,
        offset: PixelOffset,
        group: Group,
        precision: Precision,
    ) -> impl Iterator<Item = EntityId> + '_ {
        let shape = world
            .entities
            .get(entity)
            .map(|source| Shape::of(source, offset));
        world
            .entities
            .iter()
            .filter(move |(id, candidate)| *id != entity && candidate.groups().contains(group))
            .filter_map(move |(id, candidate)| {
                let shape = shape?;
                collision::overlaps(
                    &world.catalog,
                    shape,
                    Shape::of(candidate, PixelOffset::ZERO),
                    precision,
                )
                .then_some(id)
            })
    }

    /// Reports whether a rectangle is a valid collectible position.
    #[must_use]
    pub fn is_valid_placement(world: &World, rect: PixelRect) -> bool {
        super::placement::is_valid_placement(&world.entities, rect)
    }
}
