#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Backing stores holding tile state for the Endless Ground window.
//!
//! Two store variants live here behind one [`TileStore`] trait. The dense
//! [`GroundLayer`] covers every addressable cell and fills lazily on first
//! visit; the sparse [`DecoLayer`] is seeded completely at construction and
//! never changes afterward. Both are addressed through the toroidal mapper,
//! so one fixed allocation serves an unbounded world.

pub mod torus;
pub mod weights;

use std::collections::HashMap;

use endless_ground_core::{
    CountRange, StoreIndex, TileId, TilePalette, UniformRng, ViewWindow, WorldPosition,
};

use crate::torus::TorusMapper;

/// Resolves window cells to tile content.
pub trait TileStore {
    /// Resolves the tile at a world position, or `None` for an empty cell.
    ///
    /// Dense implementations may generate and cache content as a side effect
    /// of the first visit; sparse implementations are pure lookups.
    fn resolve(&mut self, position: WorldPosition, rng: &mut dyn UniformRng) -> Option<TileId>;
}

/// Dense, lazily filled ground store.
///
/// Every addressable cell starts unvisited. The first resolve of a cell
/// draws a weighted palette slot and stores it with a single assignment;
/// the cell then answers identically for the life of the store. Occupancy is
/// monotonic: a filled cell is never reset.
#[derive(Clone, Debug)]
pub struct GroundLayer {
    mapper: TorusMapper,
    palette: TilePalette,
    cells: Vec<Option<u32>>,
    columns: u32,
    generated: usize,
}

impl GroundLayer {
    /// Creates an all-unvisited ground store for the provided window.
    #[must_use]
    pub fn new(window: &ViewWindow, palette: TilePalette) -> Self {
        let mapper = TorusMapper::new(window);
        let (columns, rows) = mapper.diameter();
        let capacity_u64 = u64::from(columns) * u64::from(rows);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            mapper,
            palette,
            cells: vec![None; capacity],
            columns,
            generated: 0,
        }
    }

    /// Palette the layer draws from.
    #[must_use]
    pub const fn palette(&self) -> &TilePalette {
        &self.palette
    }

    /// Mapper that folds world positions into this store.
    #[must_use]
    pub const fn mapper(&self) -> &TorusMapper {
        &self.mapper
    }

    /// Number of cells generated so far.
    #[must_use]
    pub const fn generated_cells(&self) -> usize {
        self.generated
    }

    /// Palette slot stored at a backing index, or `None` when unvisited.
    #[must_use]
    pub fn slot_at(&self, index: StoreIndex) -> Option<u32> {
        self.flat_index(index)
            .and_then(|flat| self.cells.get(flat).copied().flatten())
    }

    fn flat_index(&self, index: StoreIndex) -> Option<usize> {
        let row = usize::try_from(index.z()).ok()?;
        let column = usize::try_from(index.x()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        Some(row * width + column)
    }
}

impl TileStore for GroundLayer {
    fn resolve(&mut self, position: WorldPosition, rng: &mut dyn UniformRng) -> Option<TileId> {
        let index = self.mapper.to_index(position);
        let flat = self.flat_index(index)?;

        let slot = match self.cells.get(flat).copied().flatten() {
            Some(slot) => slot,
            None => {
                let slot = weights::pick_slot(&self.palette, rng);
                if let Some(cell) = self.cells.get_mut(flat) {
                    *cell = Some(slot);
                    self.generated += 1;
                }
                slot
            }
        };

        Some(self.palette.tile(slot))
    }
}

/// Sparse, statically seeded decoration store.
///
/// All placements are drawn during construction: a count from the half-open
/// configuration range, then unique backing indices with weighted palette
/// slots, retrying on collision. The content never changes afterward, so
/// resolves are pure lookups and absence means "no decoration here".
#[derive(Clone, Debug)]
pub struct DecoLayer {
    mapper: TorusMapper,
    palette: TilePalette,
    placements: HashMap<StoreIndex, u32>,
}

impl DecoLayer {
    /// Creates a decoration store and seeds every placement it will ever
    /// hold.
    #[must_use]
    pub fn new(
        window: &ViewWindow,
        palette: TilePalette,
        count_range: CountRange,
        rng: &mut dyn UniformRng,
    ) -> Self {
        let mapper = TorusMapper::new(window);
        let (diameter_x, diameter_z) = mapper.diameter();
        // Placement draws stop one short of the diameter on each axis; the
        // top row and column are never seeded.
        let columns = diameter_x.saturating_sub(1);
        let rows = diameter_z.saturating_sub(1);

        let mut target = resolve_placement_count(count_range, rng);
        let capacity_u64 = u64::from(columns) * u64::from(rows);
        let capacity = usize::try_from(capacity_u64).unwrap_or(usize::MAX);
        target = target.min(capacity);

        let mut placements = HashMap::with_capacity(target);
        while placements.len() < target {
            let x = rng.sample_below(u64::from(columns)) as u32;
            let z = rng.sample_below(u64::from(rows)) as u32;
            let index = StoreIndex::new(x, z);
            if placements.contains_key(&index) {
                continue;
            }
            let slot = weights::pick_slot(&palette, rng);
            let _ = placements.insert(index, slot);
        }

        Self {
            mapper,
            palette,
            placements,
        }
    }

    /// Palette the layer draws from.
    #[must_use]
    pub const fn palette(&self) -> &TilePalette {
        &self.palette
    }

    /// Mapper that folds world positions into this store.
    #[must_use]
    pub const fn mapper(&self) -> &TorusMapper {
        &self.mapper
    }

    /// Number of seeded placements.
    #[must_use]
    pub fn placement_count(&self) -> usize {
        self.placements.len()
    }

    /// Palette slot seeded at a backing index, if any.
    #[must_use]
    pub fn slot_at(&self, index: StoreIndex) -> Option<u32> {
        self.placements.get(&index).copied()
    }

    /// Iterates over every seeded placement.
    pub fn placements(&self) -> impl Iterator<Item = (StoreIndex, u32)> + '_ {
        self.placements.iter().map(|(index, slot)| (*index, *slot))
    }
}

impl TileStore for DecoLayer {
    fn resolve(&mut self, position: WorldPosition, _rng: &mut dyn UniformRng) -> Option<TileId> {
        let index = self.mapper.to_index(position);
        self.placements
            .get(&index)
            .map(|slot| self.palette.tile(*slot))
    }
}

fn resolve_placement_count(range: CountRange, rng: &mut dyn UniformRng) -> usize {
    let width = u64::from(range.max() - range.min());
    let drawn = if width == 0 {
        range.min()
    } else {
        range.min() + rng.sample_below(width) as u32
    };
    usize::try_from(drawn).unwrap_or(usize::MAX)
}
