#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Full and incremental repaint of the visible window.
//!
//! The refresher is storage-agnostic: it resolves cell content through the
//! [`TileStore`] trait and issues paint or clear calls to the external
//! [`TileSurface`]. The first refresh paints the whole window; later
//! refreshes repaint only the bands of cells that entered or left the
//! window between two focal positions, falling back to a full repaint when
//! a single step is too large for banding.

use endless_ground_core::{TileSurface, UniformRng, ViewWindow, WorldPosition};
use endless_ground_world::TileStore;

/// Identifies which repaint strategy a refresh executed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefreshKind {
    /// First refresh: the whole window was painted into an empty surface.
    Full,
    /// Four-band repaint of the cells that entered or left the window.
    Incremental,
    /// The step was too large for banding; the previous window was cleared
    /// and the whole new window repainted.
    FullFallback,
}

/// Streaming repaint driver for a single layer.
///
/// Owns the window geometry and the previously applied center. One
/// refresher serves exactly one store/surface pair; independent layers run
/// independent refreshers.
#[derive(Clone, Copy, Debug)]
pub struct ViewRefresher {
    window: ViewWindow,
    last_center: Option<WorldPosition>,
}

impl ViewRefresher {
    /// Creates a refresher that has not painted anything yet.
    #[must_use]
    pub const fn new(window: ViewWindow) -> Self {
        Self {
            window,
            last_center: None,
        }
    }

    /// Window geometry the refresher paints within.
    #[must_use]
    pub const fn window(&self) -> ViewWindow {
        self.window
    }

    /// Center of the most recently applied refresh, if any.
    #[must_use]
    pub const fn last_center(&self) -> Option<WorldPosition> {
        self.last_center
    }

    /// Repaints the window around `center` and reports the strategy used.
    ///
    /// Runs to completion synchronously. The surface's occupied bounds are
    /// compressed after every refresh, whichever path executed.
    pub fn refresh<S, P>(
        &mut self,
        store: &mut S,
        surface: &mut P,
        rng: &mut dyn UniformRng,
        center: WorldPosition,
    ) -> RefreshKind
    where
        S: TileStore + ?Sized,
        P: TileSurface + ?Sized,
    {
        let kind = match self.last_center {
            None => {
                self.paint_window(store, surface, rng, center);
                RefreshKind::Full
            }
            Some(previous) => {
                let dx = center.x().saturating_sub(previous.x());
                let dz = center.z().saturating_sub(previous.z());

                if self.step_exceeds_band_limit(dx, dz) {
                    self.clear_window(surface, previous);
                    self.paint_window(store, surface, rng, center);
                    RefreshKind::FullFallback
                } else {
                    self.repaint_bands(store, surface, rng, previous, center, dx, dz);
                    RefreshKind::Incremental
                }
            }
        };

        surface.compress_bounds();
        self.last_center = Some(center);
        kind
    }

    /// A step at or beyond the painted radius on either axis leaves the
    /// band decomposition with gaps or stale cells, so it must repaint
    /// from scratch instead.
    fn step_exceeds_band_limit(&self, dx: i64, dz: i64) -> bool {
        let radius = self.window.radius();
        dx.unsigned_abs() >= u64::from(radius.x()) || dz.unsigned_abs() >= u64::from(radius.z())
    }

    fn paint_window<S, P>(
        &self,
        store: &mut S,
        surface: &mut P,
        rng: &mut dyn UniformRng,
        center: WorldPosition,
    ) where
        S: TileStore + ?Sized,
        P: TileSurface + ?Sized,
    {
        let radius = self.window.radius();
        let rx = i64::from(radius.x());
        let rz = i64::from(radius.z());

        for x in center.x().saturating_sub(rx)..center.x().saturating_add(rx) {
            for z in center.z().saturating_sub(rz)..center.z().saturating_add(rz) {
                let position = WorldPosition::new(x, z);
                surface.set_tile(position, store.resolve(position, rng));
            }
        }
    }

    fn clear_window<P>(&self, surface: &mut P, center: WorldPosition)
    where
        P: TileSurface + ?Sized,
    {
        let radius = self.window.radius();
        let rx = i64::from(radius.x());
        let rz = i64::from(radius.z());

        for x in center.x().saturating_sub(rx)..center.x().saturating_add(rx) {
            for z in center.z().saturating_sub(rz)..center.z().saturating_add(rz) {
                surface.set_tile(WorldPosition::new(x, z), None);
            }
        }
    }

    /// The four band passes, in a fixed order: clear the vacated x-band,
    /// clear the vacated z-band, paint the exposed x-band, paint the
    /// exposed z-band. The corner cell shared by two bands is touched more
    /// than once; the last pass wins.
    #[allow(clippy::too_many_arguments)]
    fn repaint_bands<S, P>(
        &self,
        store: &mut S,
        surface: &mut P,
        rng: &mut dyn UniformRng,
        previous: WorldPosition,
        center: WorldPosition,
        dx: i64,
        dz: i64,
    ) where
        S: TileStore + ?Sized,
        P: TileSurface + ?Sized,
    {
        let radius = self.window.radius();
        let rx = i64::from(radius.x());
        let rz = i64::from(radius.z());

        // Vacated x-band sits on the trailing edge and spans the z-extent
        // of both windows.
        let (from_x, to_x) = if dx > 0 {
            (previous.x().saturating_sub(rx), center.x().saturating_sub(rx))
        } else {
            (center.x().saturating_add(rx), previous.x().saturating_add(rx))
        };
        let span_from_z = previous.z().min(center.z()).saturating_sub(rz);
        let span_to_z = previous.z().max(center.z()).saturating_add(rz);
        for x in from_x..to_x {
            for z in span_from_z..span_to_z {
                surface.set_tile(WorldPosition::new(x, z), None);
            }
        }

        // Vacated z-band, spanning the x-extent of both windows.
        let (from_z, to_z) = if dz > 0 {
            (previous.z().saturating_sub(rz), center.z().saturating_sub(rz))
        } else {
            (center.z().saturating_add(rz), previous.z().saturating_add(rz))
        };
        let span_from_x = previous.x().min(center.x()).saturating_sub(rx);
        let span_to_x = previous.x().max(center.x()).saturating_add(rx);
        for z in from_z..to_z {
            for x in span_from_x..span_to_x {
                surface.set_tile(WorldPosition::new(x, z), None);
            }
        }

        // Exposed x-band on the leading edge, z-extent limited to the new
        // window.
        let (from_x, to_x) = if dx > 0 {
            (previous.x().saturating_add(rx), center.x().saturating_add(rx))
        } else {
            (center.x().saturating_sub(rx), previous.x().saturating_sub(rx))
        };
        for x in from_x..to_x {
            for z in center.z().saturating_sub(rz)..center.z().saturating_add(rz) {
                let position = WorldPosition::new(x, z);
                surface.set_tile(position, store.resolve(position, rng));
            }
        }

        // Exposed z-band, x-extent limited to the new window.
        let (from_z, to_z) = if dz > 0 {
            (previous.z().saturating_add(rz), center.z().saturating_add(rz))
        } else {
            (center.z().saturating_sub(rz), previous.z().saturating_sub(rz))
        };
        for z in from_z..to_z {
            for x in center.x().saturating_sub(rx)..center.x().saturating_add(rx) {
                let position = WorldPosition::new(x, z);
                surface.set_tile(position, store.resolve(position, rng));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{RefreshKind, ViewRefresher};
    use endless_ground_core::{
        TileId, TileSurface, UniformRng, ViewExtent, ViewWindow, WorldPosition,
    };
    use endless_ground_world::TileStore;
    use std::collections::HashMap;

    struct ConstantStore(TileId);

    impl TileStore for ConstantStore {
        fn resolve(
            &mut self,
            _position: WorldPosition,
            _rng: &mut dyn UniformRng,
        ) -> Option<TileId> {
            Some(self.0)
        }
    }

    #[derive(Default)]
    struct RecordingSurface {
        tiles: HashMap<WorldPosition, TileId>,
        compress_calls: u32,
    }

    impl TileSurface for RecordingSurface {
        fn set_tile(&mut self, position: WorldPosition, tile: Option<TileId>) {
            match tile {
                Some(id) => {
                    let _ = self.tiles.insert(position, id);
                }
                None => {
                    let _ = self.tiles.remove(&position);
                }
            }
        }

        fn compress_bounds(&mut self) {
            self.compress_calls += 1;
        }
    }

    struct NeverRng;

    impl UniformRng for NeverRng {
        fn sample_below(&mut self, _bound: u64) -> u64 {
            panic!("constant stores never draw from the rng");
        }
    }

    fn refresher(radius: u32) -> ViewRefresher {
        let window = ViewWindow::new(
            ViewExtent::new(radius, radius),
            ViewExtent::new(radius + 3, radius + 3),
        )
        .expect("valid window");
        ViewRefresher::new(window)
    }

    #[test]
    fn first_refresh_paints_the_full_window() {
        let mut refresher = refresher(2);
        let mut store = ConstantStore(TileId::new(9));
        let mut surface = RecordingSurface::default();

        let kind = refresher.refresh(
            &mut store,
            &mut surface,
            &mut NeverRng,
            WorldPosition::new(0, 0),
        );

        assert_eq!(kind, RefreshKind::Full);
        assert_eq!(surface.tiles.len(), 16);
        assert_eq!(refresher.last_center(), Some(WorldPosition::new(0, 0)));
        for x in -2..2 {
            for z in -2..2 {
                assert_eq!(
                    surface.tiles.get(&WorldPosition::new(x, z)),
                    Some(&TileId::new(9)),
                );
            }
        }
    }

    #[test]
    fn small_steps_run_the_band_passes() {
        let mut refresher = refresher(3);
        let mut store = ConstantStore(TileId::new(1));
        let mut surface = RecordingSurface::default();

        let first = refresher.refresh(
            &mut store,
            &mut surface,
            &mut NeverRng,
            WorldPosition::new(0, 0),
        );
        let second = refresher.refresh(
            &mut store,
            &mut surface,
            &mut NeverRng,
            WorldPosition::new(2, -1),
        );

        assert_eq!(first, RefreshKind::Full);
        assert_eq!(second, RefreshKind::Incremental);
        assert_eq!(refresher.last_center(), Some(WorldPosition::new(2, -1)));
    }

    #[test]
    fn radius_sized_steps_fall_back_to_a_full_repaint() {
        let mut refresher = refresher(2);
        let mut store = ConstantStore(TileId::new(1));
        let mut surface = RecordingSurface::default();

        let _ = refresher.refresh(
            &mut store,
            &mut surface,
            &mut NeverRng,
            WorldPosition::new(0, 0),
        );
        let kind = refresher.refresh(
            &mut store,
            &mut surface,
            &mut NeverRng,
            WorldPosition::new(2, 0),
        );

        assert_eq!(kind, RefreshKind::FullFallback);
    }

    #[test]
    fn bounds_are_compressed_after_every_refresh() {
        let mut refresher = refresher(2);
        let mut store = ConstantStore(TileId::new(1));
        let mut surface = RecordingSurface::default();

        let centers = [
            WorldPosition::new(0, 0),
            WorldPosition::new(1, 0),
            WorldPosition::new(50, 50),
        ];
        for center in centers {
            let _ = refresher.refresh(&mut store, &mut surface, &mut NeverRng, center);
        }

        assert_eq!(surface.compress_calls, 3);
    }

    #[test]
    fn stationary_refresh_leaves_the_surface_unchanged() {
        let mut refresher = refresher(3);
        let mut store = ConstantStore(TileId::new(4));
        let mut surface = RecordingSurface::default();

        let _ = refresher.refresh(
            &mut store,
            &mut surface,
            &mut NeverRng,
            WorldPosition::new(5, 5),
        );
        let before: Vec<_> = {
            let mut cells: Vec<_> = surface.tiles.iter().map(|(p, t)| (*p, *t)).collect();
            cells.sort();
            cells
        };

        let kind = refresher.refresh(
            &mut store,
            &mut surface,
            &mut NeverRng,
            WorldPosition::new(5, 5),
        );

        let after: Vec<_> = {
            let mut cells: Vec<_> = surface.tiles.iter().map(|(p, t)| (*p, *t)).collect();
            cells.sort();
            cells
        };

        assert_eq!(kind, RefreshKind::Incremental);
        assert_eq!(before, after);
    }
}
