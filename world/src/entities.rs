//! Entity records and the owning store with group membership.

use std::collections::BTreeMap;

use snowfall_core::{
    CollectibleBatch, EmissionDirection, EnemyType, EntityId, EntityKind, EntitySnapshot, Group,
    GroupSet, PixelOffset, PixelPoint, PixelRect, SpriteCatalog, SpriteKey, Tuning,
};

use crate::animation::AnimationCursor;

/// Kind-specific state carried by an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityState {
    /// Tiles, fixed items and NPCs carry nothing beyond their rectangle.
    Inert,
    /// Quest collectible tagged with the batch that placed it.
    Collectible {
        /// Batch tag of the placing quest.
        batch: CollectibleBatch,
    },
    /// Player animation state.
    Player {
        /// Frame cursor.
        cursor: AnimationCursor,
    },
    /// Hostile actor moving at constant velocity.
    Enemy {
        /// Frame cursor; its orientation is the emission direction.
        cursor: AnimationCursor,
        /// Displacement per AI update.
        velocity: PixelOffset,
        /// Archetype of the enemy.
        enemy_type: EnemyType,
    },
    /// Zero-size emitter.
    Spawner {
        /// Direction emitted enemies travel in.
        direction: EmissionDirection,
        /// Archetype emitted next.
        enemy_type: EnemyType,
    },
    /// Short-lived ambient effect.
    Particle {
        /// Displacement per ambient update.
        velocity: PixelOffset,
        /// Ambient updates left before expiry.
        remaining: u32,
    },
    /// Health-bearing goal entity.
    Objective {
        /// Frame cursor.
        cursor: AnimationCursor,
        /// Remaining health; may drop below zero.
        health: i32,
    },
}

/// Single simulated object.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Entity {
    kind: EntityKind,
    rect: PixelRect,
    sprite: Option<SpriteKey>,
    groups: GroupSet,
    state: EntityState,
}

impl Entity {
    /// Walkable terrain tile in [`Group::Tiles`].
    #[must_use]
    pub fn tile(catalog: &SpriteCatalog, index: i32, at: PixelPoint) -> Self {
        Self::sized(
            catalog,
            EntityKind::Tile,
            SpriteKey::Tile(index),
            at,
            GroupSet::of(&[Group::Tiles]),
            EntityState::Inert,
        )
    }

    /// Replaces the memberships chosen by the constructor.
    #[must_use]
    pub const fn in_groups(mut self, groups: GroupSet) -> Self {
        self.groups = groups;
        self
    }

    /// Fixed item that blocks movement.
    #[must_use]
    pub fn item(catalog: &SpriteCatalog, index: u8, at: PixelPoint) -> Self {
        Self::sized(
            catalog,
            EntityKind::FixedItem,
            SpriteKey::Item(index),
            at,
            GroupSet::of(&[Group::Items, Group::Boxes]),
            EntityState::Inert,
        )
    }

    /// Walk-over item that a collection quest counts.
    #[must_use]
    pub fn collectible(
        catalog: &SpriteCatalog,
        index: u8,
        at: PixelPoint,
        batch: CollectibleBatch,
    ) -> Self {
        Self::sized(
            catalog,
            EntityKind::FixedItem,
            SpriteKey::Item(index),
            at,
            GroupSet::of(&[Group::Items, Group::Collectibles, Group::Ambient]),
            EntityState::Collectible { batch },
        )
    }

    /// Player-controlled actor.
    #[must_use]
    pub fn player(catalog: &SpriteCatalog, at: PixelPoint) -> Self {
        Self::sized(
            catalog,
            EntityKind::Player,
            SpriteKey::Player,
            at,
            GroupSet::of(&[Group::Player]),
            EntityState::Player {
                cursor: AnimationCursor::new(0),
            },
        )
    }

    /// Non-player character that blocks movement.
    #[must_use]
    pub fn npc(catalog: &SpriteCatalog, at: PixelPoint) -> Self {
        Self::sized(
            catalog,
            EntityKind::Npc,
            SpriteKey::Npc,
            at,
            GroupSet::of(&[Group::Npcs, Group::Boxes]),
            EntityState::Inert,
        )
    }

    /// Health-bearing objective.
    #[must_use]
    pub fn objective(catalog: &SpriteCatalog, at: PixelPoint, health: i32) -> Self {
        Self::sized(
            catalog,
            EntityKind::Objective,
            SpriteKey::Objective,
            at,
            GroupSet::of(&[Group::AnimatedItems, Group::Boxes]),
            EntityState::Objective {
                cursor: AnimationCursor::new(0),
                health,
            },
        )
    }

    /// Zero-size enemy emitter.
    #[must_use]
    pub fn spawner(at: PixelPoint, direction: EmissionDirection) -> Self {
        Self {
            kind: EntityKind::Spawner,
            rect: PixelRect::new(at, 0, 0),
            sprite: None,
            groups: GroupSet::of(&[Group::Spawners]),
            state: EntityState::Spawner {
                direction,
                enemy_type: EnemyType::default(),
            },
        }
    }

    /// Enemy emitted in `direction`.
    #[must_use]
    pub fn enemy(
        catalog: &SpriteCatalog,
        at: PixelPoint,
        direction: EmissionDirection,
        enemy_type: EnemyType,
    ) -> Self {
        Self::sized(
            catalog,
            EntityKind::Enemy,
            SpriteKey::Enemy(enemy_type),
            at,
            GroupSet::of(&[Group::Enemies]),
            EntityState::Enemy {
                cursor: AnimationCursor::new(direction.id()),
                velocity: direction.velocity(),
                enemy_type,
            },
        )
    }

    /// Ambient particle.
    #[must_use]
    pub fn particle(
        catalog: &SpriteCatalog,
        at: PixelPoint,
        velocity: PixelOffset,
        lifetime: u32,
    ) -> Self {
        Self::sized(
            catalog,
            EntityKind::Particle,
            SpriteKey::Particle,
            at,
            GroupSet::of(&[Group::Ambient]),
            EntityState::Particle {
                velocity,
                remaining: lifetime,
            },
        )
    }

    fn sized(
        catalog: &SpriteCatalog,
        kind: EntityKind,
        sprite: SpriteKey,
        at: PixelPoint,
        groups: GroupSet,
        state: EntityState,
    ) -> Self {
        let spec = catalog.spec(sprite);
        Self {
            kind,
            rect: PixelRect::new(at, spec.width(), spec.height()),
            sprite: Some(sprite),
            groups,
            state,
        }
    }

    /// Kind tag.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Current bounding rectangle.
    #[must_use]
    pub const fn rect(&self) -> PixelRect {
        self.rect
    }

    /// Sprite drawn for the entity.
    #[must_use]
    pub const fn sprite(&self) -> Option<SpriteKey> {
        self.sprite
    }

    /// Group memberships.
    #[must_use]
    pub const fn groups(&self) -> GroupSet {
        self.groups
    }

    /// Kind-specific state.
    #[must_use]
    pub const fn state(&self) -> &EntityState {
        &self.state
    }

    pub(crate) fn state_mut(&mut self) -> &mut EntityState {
        &mut self.state
    }

    pub(crate) fn translate(&mut self, offset: PixelOffset) {
        self.rect = self.rect.translated(offset);
    }

    pub(crate) fn cursor_mut(&mut self) -> Option<&mut AnimationCursor> {
        match &mut self.state {
            EntityState::Player { cursor }
            | EntityState::Enemy { cursor, .. }
            | EntityState::Objective { cursor, .. } => Some(cursor),
            _ => None,
        }
    }

    /// Read-only snapshot of the entity.
    #[must_use]
    pub fn snapshot(&self, id: EntityId, tuning: &Tuning) -> EntitySnapshot {
        let mut snapshot = EntitySnapshot {
            id,
            kind: self.kind,
            rect: self.rect,
            sprite: self.sprite,
            groups: self.groups,
            frame: None,
            velocity: None,
            health: None,
            damage: None,
            batch: None,
        };
        match self.state {
            EntityState::Inert | EntityState::Spawner { .. } => {}
            EntityState::Collectible { batch } => snapshot.batch = Some(batch),
            EntityState::Player { cursor } => snapshot.frame = Some(cursor.index()),
            EntityState::Enemy {
                cursor,
                velocity,
                enemy_type,
            } => {
                snapshot.frame = Some(cursor.index());
                snapshot.velocity = Some(velocity);
                snapshot.damage = Some(tuning.damage_for(enemy_type));
            }
            EntityState::Particle { velocity, .. } => snapshot.velocity = Some(velocity),
            EntityState::Objective { cursor, health } => {
                snapshot.frame = Some(cursor.index());
                snapshot.health = Some(health);
            }
        }
        snapshot
    }
}

/// Owner of every live entity.
///
/// Identifiers increase monotonically, so iterating the store yields
/// insertion order and killed ids never come back.
#[derive(Clone, Debug, Default)]
pub struct EntityStore {
    entities: BTreeMap<EntityId, Entity>,
    next_id: u32,
}

impl EntityStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes ownership of `entity` and returns its fresh identifier.
    pub fn spawn(&mut self, entity: Entity) -> EntityId {
        let id = EntityId::new(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        let _ = self.entities.insert(id, entity);
        id
    }

    /// Removes an entity from every group. Unknown ids yield `None`.
    pub fn kill(&mut self, id: EntityId) -> Option<Entity> {
        self.entities.remove(&id)
    }

    /// Looks up a live entity.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Members of `group` in insertion order.
    ///
    /// The result is a copy, so killing entities while walking it is safe.
    #[must_use]
    pub fn members(&self, group: Group) -> Vec<EntityId> {
        self.iter()
            .filter(|(_, entity)| entity.groups.contains(group))
            .map(|(id, _)| id)
            .collect()
    }

    /// Every live entity in insertion order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (EntityId, &Entity)> {
        self.entities.iter().map(|(id, entity)| (*id, entity))
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.values_mut()
    }

    /// Number of live entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Reports whether no entity is alive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn members_follow_insertion_order_and_survive_kills() {
        let catalog = SpriteCatalog::default();
        let mut store = EntityStore::new();
        let first = store.spawn(
            Entity::tile(&catalog, 3, PixelPoint::new(0, 0))
                .in_groups(GroupSet::of(&[Group::Tiles, Group::Boxes])),
        );
        let second = store.spawn(Entity::tile(&catalog, 4, PixelPoint::new(64, 0)));
        let third = store.spawn(Entity::item(&catalog, 1, PixelPoint::new(128, 0)));

        assert_eq!(store.members(Group::Tiles), vec![first, second]);
        assert_eq!(store.members(Group::Boxes), vec![first, third]);

        for id in store.members(Group::Boxes) {
            let _ = store.kill(id);
        }
        assert_eq!(store.members(Group::Tiles), vec![second]);
        assert!(store.members(Group::Boxes).is_empty());
        assert!(store.get(first).is_none());
        assert!(store.kill(first).is_none());
    }

    #[test]
    fn membership_is_chosen_at_spawn() {
        let catalog = SpriteCatalog::default();
        let mut store = EntityStore::new();
        let npc = store.spawn(
            Entity::npc(&catalog, PixelPoint::new(0, 0)).in_groups(GroupSet::of(&[Group::Npcs])),
        );
        let hidden = store
            .spawn(Entity::item(&catalog, 2, PixelPoint::new(0, 0)).in_groups(GroupSet::EMPTY));

        assert_eq!(store.members(Group::Npcs), vec![npc]);
        assert!(store.members(Group::Boxes).is_empty());
        assert!(store.members(Group::Items).is_empty());
        assert_eq!(store.get(hidden).map(Entity::groups), Some(GroupSet::EMPTY));
    }

    #[test]
    fn killed_ids_are_never_reused() {
        let catalog = SpriteCatalog::default();
        let mut store = EntityStore::new();
        let first = store.spawn(Entity::npc(&catalog, PixelPoint::new(0, 0)));
        let _ = store.kill(first);
        let second = store.spawn(Entity::npc(&catalog, PixelPoint::new(0, 0)));
        assert_ne!(first, second);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn snapshots_expose_kind_specific_state() {
        let catalog = SpriteCatalog::default();
        let tuning = Tuning::default();
        let enemy = Entity::enemy(
            &catalog,
            PixelPoint::new(5, 5),
            EmissionDirection::Left,
            EnemyType::new(1),
        );
        let snapshot = enemy.snapshot(EntityId::new(9), &tuning);
        assert_eq!(snapshot.velocity, Some(PixelOffset::new(-1, 0)));
        assert_eq!(snapshot.damage, Some(2));
        assert_eq!(snapshot.frame.map(|frame| frame.orientation), Some(1));
        assert_eq!(snapshot.rect.width(), 48);

        let spawner = Entity::spawner(PixelPoint::new(0, 0), EmissionDirection::Up);
        let snapshot = spawner.snapshot(EntityId::new(1), &tuning);
        assert!(snapshot.sprite.is_none());
        assert!(snapshot.rect.is_empty());
    }
}
