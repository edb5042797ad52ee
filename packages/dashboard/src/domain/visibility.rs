//! Fog of war over the tactical grid.
//!
//! Terrain is never hidden. A viewer sees the ships, trails and mines of
//! their own side and never those of the opponent.

use super::{
    entity::{Cell, Entity, EntityKind, SonarMap},
    value_object::{GridPosition, Owner},
};

/// What one viewer is allowed to see in a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellView {
    Terrain,
    /// A ship, with the side to tint it for (`None` for unowned entities)
    Ship(Option<Owner>),
    Trail(Option<Owner>),
    Empty,
}

/// Resolve a cell for `viewer`. First match wins: terrain, a visible ship,
/// a visible trail, otherwise empty.
pub fn resolve_cell(cell: &Cell, viewer: Owner) -> CellView {
    if cell.has_asteroid {
        return CellView::Terrain;
    }

    let visible = |kind: EntityKind| {
        cell.content
            .iter()
            .find(|entity| entity.kind == kind && is_visible(entity, viewer))
    };

    if let Some(ship) = visible(EntityKind::Ship) {
        return CellView::Ship(ship.owner);
    }
    if let Some(trail) = visible(EntityKind::Trail) {
        return CellView::Trail(trail.owner);
    }
    CellView::Empty
}

fn is_visible(entity: &Entity, viewer: Owner) -> bool {
    entity.owner != Some(viewer.opponent())
}

/// Mines `viewer` may know about, as `(uid, position)` in uid order.
///
/// A mine is listed only when its cell holds a matching mine entity that
/// the viewer can see. Positions outside the grid are dropped.
pub fn visible_mines(map: &SonarMap, viewer: Owner) -> Vec<(&str, GridPosition)> {
    map.mine_positions
        .iter()
        .filter(|(uid, position)| {
            map.cell(**position).is_some_and(|cell| {
                cell.content.iter().any(|entity| {
                    entity.kind == EntityKind::Mine
                        && entity.uid.as_deref().is_none_or(|mine| mine == uid.as_str())
                        && is_visible(entity, viewer)
                })
            })
        })
        .map(|(uid, position)| (uid.as_str(), *position))
        .collect()
}

/// Resolve every cell of a map for `viewer`, row by row (`[y][x]`).
pub fn visible_grid(map: &SonarMap, viewer: Owner) -> Vec<Vec<CellView>> {
    map.grid
        .iter()
        .map(|row| row.iter().map(|cell| resolve_cell(cell, viewer)).collect())
        .collect()
}
