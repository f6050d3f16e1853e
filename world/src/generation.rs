//! Turns a parsed level grid into entities.

use snowfall_core::{
    Group, GroupSet, LevelTokens, PixelPoint, SpriteCatalog, TileOffset, TilePosition, Tuning,
};

use crate::{
    entities::Entity,
    level::{LevelError, LevelGrid},
};

/// Entities produced from a level grid, in creation order.
#[derive(Clone, Debug)]
pub struct GeneratedLevel {
    /// Every entity; the player is always last.
    pub entities: Vec<Entity>,
    /// Cell holding the player start marker.
    pub player_start: TilePosition,
    /// Number of columns.
    pub columns: u32,
    /// Number of rows.
    pub rows: u32,
}

/// Emits the entity set described by every grid cell.
pub fn generate(
    grid: &LevelGrid,
    tokens: &LevelTokens,
    tuning: &Tuning,
    catalog: &SpriteCatalog,
) -> Result<GeneratedLevel, LevelError> {
    let tile = tuning.tile_size as i32;
    let cell_origin = |position: TilePosition, offset: TileOffset| {
        PixelPoint::new(
            (position.column() as i32 + offset.columns) * tile,
            (position.row() as i32 + offset.rows) * tile,
        )
    };

    let mut entities = Vec::new();
    let mut player_start: Option<TilePosition> = None;

    for (position, token) in grid.cells() {
        let at = cell_origin(position, TileOffset::default());

        if let Some(digit) = token.to_digit(10) {
            let index = match digit.checked_sub(1) {
                Some(index) => index as u8,
                None => tuning.collectible_item,
            };
            let item_at = match tokens.item_nudge(token) {
                Some(nudge) => {
                    cell_origin(position, nudge.tile_offset).offset_by(nudge.pixel_offset)
                }
                None => at,
            };
            entities.push(Entity::item(catalog, index, item_at));
            entities.push(Entity::tile(catalog, tokens.floor_tile, at));
        } else if token == tokens.player_start {
            if let Some(first) = player_start {
                return Err(LevelError::AmbiguousPlayerStart {
                    first,
                    second: position,
                });
            }
            player_start = Some(position);
            entities.push(Entity::tile(catalog, tokens.start_tile, at));
        } else if token == tokens.objective {
            entities.push(Entity::tile(catalog, tokens.objective_tile, at));
            entities.push(Entity::objective(
                catalog,
                cell_origin(position, tokens.objective_anchor),
                tuning.objective_health,
            ));
        } else if let Some(direction) = tokens.spawner_direction(token) {
            entities.push(Entity::tile(catalog, tokens.spawner_tile, at));
            entities.push(Entity::spawner(at, direction));
        } else if token == tokens.npc {
            entities.push(Entity::tile(catalog, tokens.floor_tile, at));
            entities.push(Entity::npc(catalog, at));
        } else {
            let tile = Entity::tile(catalog, LevelTokens::tile_index(token), at);
            if tokens.collidable.contains(&token) {
                entities.push(tile.in_groups(GroupSet::of(&[Group::Tiles, Group::Boxes])));
            } else {
                entities.push(tile);
            }
        }
    }

    let player_start = player_start.ok_or(LevelError::MissingPlayerStart)?;
    entities.push(Entity::player(
        catalog,
        cell_origin(player_start, TileOffset::default()),
    ));

    Ok(GeneratedLevel {
        entities,
        player_start,
        columns: grid.width() as u32,
        rows: grid.height() as u32,
    })
}
