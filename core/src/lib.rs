#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Endless Ground engine.
//!
//! This crate defines the value types and collaborator traits that connect
//! the backing-store world, the pure streaming systems, and adapters. The
//! world owns tile state addressed through wrapped indices, systems decide
//! when and where to repaint, and adapters supply the paint surface, the
//! focal position, and the random source. Everything that crosses one of
//! those seams is declared here.

use std::{fmt, num::NonZeroU64};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Absolute location on the unbounded world grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WorldPosition {
    x: i64,
    z: i64,
}

impl WorldPosition {
    /// Creates a new world-grid position.
    #[must_use]
    pub const fn new(x: i64, z: i64) -> Self {
        Self { x, z }
    }

    /// Coordinate along the x axis.
    #[must_use]
    pub const fn x(&self) -> i64 {
        self.x
    }

    /// Coordinate along the z axis.
    #[must_use]
    pub const fn z(&self) -> i64 {
        self.z
    }

    /// Computes the Manhattan distance between two world positions.
    #[must_use]
    pub fn manhattan_distance(self, other: WorldPosition) -> u64 {
        self.x
            .abs_diff(other.x)
            .saturating_add(self.z.abs_diff(other.z))
    }
}

/// Bounded address inside a backing store.
///
/// Both components lie below the store diameter on their axis. Any two world
/// positions separated by an exact multiple of the diameter alias to the
/// same index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StoreIndex {
    x: u32,
    z: u32,
}

impl StoreIndex {
    /// Creates a new backing-store index.
    #[must_use]
    pub const fn new(x: u32, z: u32) -> Self {
        Self { x, z }
    }

    /// Index along the x axis.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.x
    }

    /// Index along the z axis.
    #[must_use]
    pub const fn z(&self) -> u32 {
        self.z
    }
}

/// Per-axis half-extent of a rectangular view area, measured in whole cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ViewExtent {
    x: u32,
    z: u32,
}

impl ViewExtent {
    /// Creates a new half-extent descriptor.
    #[must_use]
    pub const fn new(x: u32, z: u32) -> Self {
        Self { x, z }
    }

    /// Half-extent along the x axis.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.x
    }

    /// Half-extent along the z axis.
    #[must_use]
    pub const fn z(&self) -> u32 {
        self.z
    }
}

/// Immutable window geometry for one streaming layer.
///
/// `radius` bounds the area actually painted around the focal point while
/// `radius_max` fixes the capacity of the backing store. The store diameter
/// is `2 * radius_max + 1` per axis and never changes after construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViewWindow {
    radius: ViewExtent,
    radius_max: ViewExtent,
}

impl ViewWindow {
    /// Creates a new window, rejecting radii that exceed the store capacity.
    pub fn new(radius: ViewExtent, radius_max: ViewExtent) -> Result<Self, ConfigError> {
        if radius.x() > radius_max.x() {
            return Err(ConfigError::RadiusExceedsMaximum {
                axis: GridAxis::X,
                radius: radius.x(),
                radius_max: radius_max.x(),
            });
        }
        if radius.z() > radius_max.z() {
            return Err(ConfigError::RadiusExceedsMaximum {
                axis: GridAxis::Z,
                radius: radius.z(),
                radius_max: radius_max.z(),
            });
        }

        Ok(Self { radius, radius_max })
    }

    /// Half-extent of the painted area around the focal point.
    #[must_use]
    pub const fn radius(&self) -> ViewExtent {
        self.radius
    }

    /// Half-extent that defines the backing-store capacity.
    #[must_use]
    pub const fn radius_max(&self) -> ViewExtent {
        self.radius_max
    }

    /// Full backing-store size per axis, `2 * radius_max + 1`.
    #[must_use]
    pub const fn diameter(&self) -> (u32, u32) {
        (
            self.radius_max.x().saturating_mul(2).saturating_add(1),
            self.radius_max.z().saturating_mul(2).saturating_add(1),
        )
    }
}

/// Opaque identifier of a paintable tile asset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileId(u32);

impl TileId {
    /// Creates a new tile identifier with the provided numeric value.
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

/// Ordered tile palette with per-slot selection weights.
///
/// Validated once at construction: the table is non-empty, tiles and weights
/// have equal lengths, and the weight total is positive. The total is
/// computed here and stored as a non-zero value, so selection never observes
/// an empty or zero-weight table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TilePalette {
    tiles: Vec<TileId>,
    weights: Vec<u32>,
    total_weight: NonZeroU64,
}

impl TilePalette {
    /// Creates a validated palette from parallel tile and weight lists.
    pub fn new(tiles: Vec<TileId>, weights: Vec<u32>) -> Result<Self, ConfigError> {
        if tiles.len() != weights.len() {
            return Err(ConfigError::PaletteMismatch {
                tiles: tiles.len(),
                weights: weights.len(),
            });
        }

        let total: u64 = weights.iter().map(|weight| u64::from(*weight)).sum();
        let total_weight = NonZeroU64::new(total).ok_or(ConfigError::DegenerateWeights)?;

        Ok(Self {
            tiles,
            weights,
            total_weight,
        })
    }

    /// Number of slots in the palette.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Reports whether the palette holds no slots. Never true after
    /// validation; provided for completeness.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Selection weights in palette order.
    #[must_use]
    pub fn weights(&self) -> &[u32] {
        &self.weights
    }

    /// Sum of all selection weights, positive by construction.
    #[must_use]
    pub const fn total_weight(&self) -> NonZeroU64 {
        self.total_weight
    }

    /// Tile identifier stored at the provided palette slot.
    ///
    /// Slots produced by weighted selection are always in bounds because the
    /// weight table and the tile list were validated to the same length.
    #[must_use]
    pub fn tile(&self, slot: u32) -> TileId {
        self.tiles[slot as usize]
    }
}

/// Half-open count range `[min, max)` used when seeding decorations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CountRange {
    min: u32,
    max: u32,
}

impl CountRange {
    /// Creates a new count range, rejecting inverted bounds.
    pub fn new(min: u32, max: u32) -> Result<Self, ConfigError> {
        if min > max {
            return Err(ConfigError::InvertedCountRange { min, max });
        }
        Ok(Self { min, max })
    }

    /// Inclusive lower bound of the range.
    #[must_use]
    pub const fn min(&self) -> u32 {
        self.min
    }

    /// Exclusive upper bound of the range.
    #[must_use]
    pub const fn max(&self) -> u32 {
        self.max
    }
}

/// Axis label used when reporting per-axis configuration failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GridAxis {
    /// The horizontal world axis.
    X,
    /// The depth world axis.
    Z,
}

impl fmt::Display for GridAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X => f.write_str("x"),
            Self::Z => f.write_str("z"),
        }
    }
}

/// Fatal configuration errors detected before any streaming begins.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The weight table is empty or its total weight is zero, leaving
    /// weighted selection undefined.
    #[error("tile weight table is empty or sums to zero")]
    DegenerateWeights,
    /// The tile list and the weight table disagree on length, so a selected
    /// slot could fall outside the palette.
    #[error("palette holds {tiles} tiles but {weights} weights")]
    PaletteMismatch {
        /// Number of tiles supplied.
        tiles: usize,
        /// Number of weights supplied.
        weights: usize,
    },
    /// The painted radius exceeds the backing-store radius on one axis.
    #[error("view radius {radius} exceeds backing maximum {radius_max} on the {axis} axis")]
    RadiusExceedsMaximum {
        /// Axis on which the bound was violated.
        axis: GridAxis,
        /// Painted half-extent requested for the axis.
        radius: u32,
        /// Backing-store half-extent configured for the axis.
        radius_max: u32,
    },
    /// The decoration count range has a minimum above its maximum.
    #[error("decoration count range minimum {min} exceeds maximum {max}")]
    InvertedCountRange {
        /// Inclusive lower bound supplied.
        min: u32,
        /// Exclusive upper bound supplied.
        max: u32,
    },
}

/// Uniform random source supplied by the embedding application.
pub trait UniformRng {
    /// Draws a uniform value in `[0, bound)`. Callers guarantee `bound >= 1`.
    fn sample_below(&mut self, bound: u64) -> u64;
}

/// External paint surface that materializes the visible window.
///
/// Implementations must tolerate coordinates far outside any previously
/// painted bounds; the streaming systems freely paint and clear wherever the
/// focal point wanders.
pub trait TileSurface {
    /// Sets the tile at a world position, or clears it when `tile` is `None`.
    fn set_tile(&mut self, position: WorldPosition, tile: Option<TileId>);

    /// Shrinks the surface's tracked occupied bounds to the current
    /// non-empty extent.
    fn compress_bounds(&mut self);
}

#[cfg(test)]
mod tests {
    use super::{
        ConfigError, CountRange, GridAxis, StoreIndex, TileId, TilePalette, ViewExtent, ViewWindow,
        WorldPosition,
    };
    use serde::{de::DeserializeOwned, Serialize};

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = WorldPosition::new(10, 10);
        let near = WorldPosition::new(11, 12);
        let far = WorldPosition::new(12, 12);
        assert_eq!(origin.manhattan_distance(near), 3);
        assert_eq!(origin.manhattan_distance(far), 4);
        assert_eq!(far.manhattan_distance(origin), 4);
    }

    #[test]
    fn manhattan_distance_spans_negative_coordinates() {
        let west = WorldPosition::new(-5, -3);
        let east = WorldPosition::new(2, 4);
        assert_eq!(west.manhattan_distance(east), 14);
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn world_position_round_trips_through_bincode() {
        assert_round_trip(&WorldPosition::new(-42, 9_000_000_000));
    }

    #[test]
    fn store_index_round_trips_through_bincode() {
        assert_round_trip(&StoreIndex::new(7, 199));
    }

    #[test]
    fn view_extent_round_trips_through_bincode() {
        assert_round_trip(&ViewExtent::new(10, 12));
    }

    #[test]
    fn tile_id_round_trips_through_bincode() {
        assert_round_trip(&TileId::new(3));
    }

    #[test]
    fn window_rejects_radius_beyond_maximum() {
        let result = ViewWindow::new(ViewExtent::new(11, 4), ViewExtent::new(10, 10));
        assert_eq!(
            result,
            Err(ConfigError::RadiusExceedsMaximum {
                axis: GridAxis::X,
                radius: 11,
                radius_max: 10,
            })
        );

        let result = ViewWindow::new(ViewExtent::new(4, 11), ViewExtent::new(10, 10));
        assert_eq!(
            result,
            Err(ConfigError::RadiusExceedsMaximum {
                axis: GridAxis::Z,
                radius: 11,
                radius_max: 10,
            })
        );
    }

    #[test]
    fn window_diameter_is_twice_the_maximum_plus_one() {
        let window =
            ViewWindow::new(ViewExtent::new(2, 2), ViewExtent::new(5, 7)).expect("valid window");
        assert_eq!(window.diameter(), (11, 15));
    }

    #[test]
    fn palette_rejects_mismatched_lengths() {
        let tiles = vec![TileId::new(0), TileId::new(1)];
        let weights = vec![1, 1, 1];
        assert_eq!(
            TilePalette::new(tiles, weights),
            Err(ConfigError::PaletteMismatch {
                tiles: 2,
                weights: 3,
            })
        );
    }

    #[test]
    fn palette_rejects_zero_total_weight() {
        let tiles = vec![TileId::new(0), TileId::new(1)];
        assert_eq!(
            TilePalette::new(tiles, vec![0, 0]),
            Err(ConfigError::DegenerateWeights)
        );
        assert_eq!(
            TilePalette::new(Vec::new(), Vec::new()),
            Err(ConfigError::DegenerateWeights)
        );
    }

    #[test]
    fn palette_caches_total_weight_at_construction() {
        let tiles = vec![TileId::new(4), TileId::new(5), TileId::new(6)];
        let palette = TilePalette::new(tiles, vec![1, 0, 3]).expect("valid palette");
        assert_eq!(palette.total_weight().get(), 4);
        assert_eq!(palette.len(), 3);
        assert_eq!(palette.tile(2), TileId::new(6));
    }

    #[test]
    fn count_range_rejects_inverted_bounds() {
        assert_eq!(
            CountRange::new(20, 10),
            Err(ConfigError::InvertedCountRange { min: 20, max: 10 })
        );
        let range = CountRange::new(10, 20).expect("valid range");
        assert_eq!(range.min(), 10);
        assert_eq!(range.max(), 20);
    }

    #[test]
    fn config_errors_render_contextual_messages() {
        let message = ConfigError::RadiusExceedsMaximum {
            axis: GridAxis::Z,
            radius: 12,
            radius_max: 10,
        }
        .to_string();
        assert!(message.contains("z axis"), "unexpected message: {message}");
    }
}
