#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Reference paint surface and focal-point source for Endless Ground.
//!
//! [`GridSurface`] is an in-memory tile surface suitable for headless runs
//! and tests; a graphical adapter would implement the same
//! [`TileSurface`] contract against its engine's tilemap. [`FocalSource`]
//! adapts a continuous world-space position (a camera, a tracked entity) to
//! the integer grid the streaming systems operate on.

use std::collections::HashMap;

use endless_ground_core::{TileId, TileSurface, WorldPosition};
use glam::Vec2;

/// Axis-aligned bounds over occupied cells, inclusive on both corners.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SurfaceBounds {
    min: WorldPosition,
    max: WorldPosition,
}

impl SurfaceBounds {
    /// Creates bounds covering exactly one cell.
    #[must_use]
    pub const fn at(position: WorldPosition) -> Self {
        Self {
            min: position,
            max: position,
        }
    }

    /// Lower corner of the bounds.
    #[must_use]
    pub const fn min(&self) -> WorldPosition {
        self.min
    }

    /// Upper corner of the bounds.
    #[must_use]
    pub const fn max(&self) -> WorldPosition {
        self.max
    }

    /// Reports whether the position lies within the bounds.
    #[must_use]
    pub fn contains(&self, position: WorldPosition) -> bool {
        position.x() >= self.min.x()
            && position.x() <= self.max.x()
            && position.z() >= self.min.z()
            && position.z() <= self.max.z()
    }

    fn expand_to(&mut self, position: WorldPosition) {
        self.min = WorldPosition::new(self.min.x().min(position.x()), self.min.z().min(position.z()));
        self.max = WorldPosition::new(self.max.x().max(position.x()), self.max.z().max(position.z()));
    }
}

/// In-memory tile surface addressed by world position.
///
/// Occupied bounds behave the way tilemap surfaces do: setting a tile grows
/// them immediately, clearing leaves them untouched until
/// [`compress_bounds`](TileSurface::compress_bounds) recomputes the tight
/// extent over the remaining tiles.
#[derive(Clone, Debug, Default)]
pub struct GridSurface {
    tiles: HashMap<WorldPosition, TileId>,
    bounds: Option<SurfaceBounds>,
}

impl GridSurface {
    /// Creates an empty surface.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Tile painted at the position, if any.
    #[must_use]
    pub fn tile_at(&self, position: WorldPosition) -> Option<TileId> {
        self.tiles.get(&position).copied()
    }

    /// Number of painted cells.
    #[must_use]
    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// Currently tracked occupied bounds, if any cell was ever painted.
    #[must_use]
    pub const fn bounds(&self) -> Option<SurfaceBounds> {
        self.bounds
    }

    /// Iterates over every painted cell.
    pub fn iter(&self) -> impl Iterator<Item = (WorldPosition, TileId)> + '_ {
        self.tiles.iter().map(|(position, tile)| (*position, *tile))
    }
}

impl TileSurface for GridSurface {
    fn set_tile(&mut self, position: WorldPosition, tile: Option<TileId>) {
        match tile {
            Some(id) => {
                let _ = self.tiles.insert(position, id);
                match self.bounds.as_mut() {
                    Some(bounds) => bounds.expand_to(position),
                    None => self.bounds = Some(SurfaceBounds::at(position)),
                }
            }
            None => {
                let _ = self.tiles.remove(&position);
            }
        }
    }

    fn compress_bounds(&mut self) {
        let mut bounds: Option<SurfaceBounds> = None;
        for position in self.tiles.keys() {
            match bounds.as_mut() {
                Some(bounds) => bounds.expand_to(*position),
                None => bounds = Some(SurfaceBounds::at(*position)),
            }
        }
        self.bounds = bounds;
    }
}

/// Focal-point source fed from a continuous world-space position.
///
/// The streaming systems receive the grid position explicitly each tick;
/// this adapter owns the float-to-grid conversion and nothing else.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FocalSource {
    world_space: Vec2,
}

impl FocalSource {
    /// Creates a source anchored at the provided world-space position.
    #[must_use]
    pub const fn at(world_space: Vec2) -> Self {
        Self { world_space }
    }

    /// Replaces the tracked world-space position.
    pub fn set_position(&mut self, world_space: Vec2) {
        self.world_space = world_space;
    }

    /// Current continuous world-space position.
    #[must_use]
    pub const fn world_space(&self) -> Vec2 {
        self.world_space
    }

    /// Current position floored to integer grid coordinates.
    #[must_use]
    pub fn grid_position(&self) -> WorldPosition {
        WorldPosition::new(
            self.world_space.x.floor() as i64,
            self.world_space.y.floor() as i64,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{FocalSource, GridSurface, SurfaceBounds};
    use endless_ground_core::{TileId, TileSurface, WorldPosition};
    use glam::Vec2;

    #[test]
    fn painting_grows_the_bounds_immediately() {
        let mut surface = GridSurface::new();
        surface.set_tile(WorldPosition::new(0, 0), Some(TileId::new(1)));
        surface.set_tile(WorldPosition::new(5, -3), Some(TileId::new(2)));

        let bounds = surface.bounds().expect("bounds after painting");
        assert_eq!(bounds.min(), WorldPosition::new(0, -3));
        assert_eq!(bounds.max(), WorldPosition::new(5, 0));
        assert!(bounds.contains(WorldPosition::new(3, -1)));
    }

    #[test]
    fn clearing_shrinks_bounds_only_after_compression() {
        let mut surface = GridSurface::new();
        surface.set_tile(WorldPosition::new(0, 0), Some(TileId::new(1)));
        surface.set_tile(WorldPosition::new(10, 10), Some(TileId::new(1)));

        surface.set_tile(WorldPosition::new(10, 10), None);
        let stale = surface.bounds().expect("bounds before compression");
        assert_eq!(stale.max(), WorldPosition::new(10, 10));

        surface.compress_bounds();
        let tight = surface.bounds().expect("bounds after compression");
        assert_eq!(tight, SurfaceBounds::at(WorldPosition::new(0, 0)));
    }

    #[test]
    fn compressing_an_empty_surface_clears_the_bounds() {
        let mut surface = GridSurface::new();
        surface.set_tile(WorldPosition::new(7, 7), Some(TileId::new(1)));
        surface.set_tile(WorldPosition::new(7, 7), None);

        surface.compress_bounds();
        assert_eq!(surface.bounds(), None);
        assert_eq!(surface.tile_count(), 0);
    }

    #[test]
    fn far_coordinates_are_accepted_without_preparation() {
        let mut surface = GridSurface::new();
        surface.set_tile(WorldPosition::new(-4_000_000_000, 12), Some(TileId::new(3)));
        surface.set_tile(WorldPosition::new(4_000_000_000, -12), None);

        assert_eq!(
            surface.tile_at(WorldPosition::new(-4_000_000_000, 12)),
            Some(TileId::new(3)),
        );
    }

    #[test]
    fn overwriting_a_cell_keeps_a_single_entry() {
        let mut surface = GridSurface::new();
        surface.set_tile(WorldPosition::new(1, 1), Some(TileId::new(1)));
        surface.set_tile(WorldPosition::new(1, 1), Some(TileId::new(2)));

        assert_eq!(surface.tile_count(), 1);
        assert_eq!(surface.tile_at(WorldPosition::new(1, 1)), Some(TileId::new(2)));
    }

    #[test]
    fn focal_source_floors_toward_negative_infinity() {
        let source = FocalSource::at(Vec2::new(-0.25, 3.75));
        assert_eq!(source.grid_position(), WorldPosition::new(-1, 3));

        let mut moved = source;
        moved.set_position(Vec2::new(2.0, -2.01));
        assert_eq!(moved.grid_position(), WorldPosition::new(2, -3));
    }
}
