//! Toroidal mapping from unbounded world coordinates to store indices.

use endless_ground_core::{StoreIndex, ViewExtent, ViewWindow, WorldPosition};

/// Pure mapper that folds world positions into the bounded address space of
/// a backing store.
///
/// Each axis is shifted by the backing half-extent and reduced with a
/// floored modulo against the store diameter, so positions separated by an
/// exact multiple of the diameter alias to the same index.
#[derive(Clone, Copy, Debug)]
pub struct TorusMapper {
    radius_max: ViewExtent,
    diameter: (u32, u32),
}

impl TorusMapper {
    /// Creates a mapper for the provided window geometry.
    #[must_use]
    pub fn new(window: &ViewWindow) -> Self {
        Self {
            radius_max: window.radius_max(),
            diameter: window.diameter(),
        }
    }

    /// Backing-store size per axis.
    #[must_use]
    pub const fn diameter(&self) -> (u32, u32) {
        self.diameter
    }

    /// Maps a world position to its backing-store index.
    #[must_use]
    pub fn to_index(&self, position: WorldPosition) -> StoreIndex {
        StoreIndex::new(
            wrap_axis(position.x(), self.radius_max.x(), self.diameter.0),
            wrap_axis(position.z(), self.radius_max.z(), self.diameter.1),
        )
    }
}

fn wrap_axis(coordinate: i64, radius_max: u32, diameter: u32) -> u32 {
    let shifted = i128::from(coordinate) + i128::from(radius_max);
    shifted.rem_euclid(i128::from(diameter)) as u32
}
