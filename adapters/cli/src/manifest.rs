//! Versioned TOML manifest describing the streaming configuration.

use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use endless_ground_core::{CountRange, TileId, TilePalette, ViewExtent, ViewWindow};
use serde::Deserialize;

const SUPPORTED_MANIFEST_VERSION: u32 = 1;

/// Manifest used when no file is provided on the command line.
const DEFAULT_MANIFEST: &str = r#"
version = 1

[window]
radius = [10, 10]
radius_max = [100, 100]

[ground]
tiles = [0, 1, 2, 3]
weights = [8, 4, 2, 1]

[deco]
tiles = [16, 17, 18]
weights = [3, 2, 1]
count = { min = 10, max = 20 }
"#;

/// Validated streaming configuration assembled from a manifest.
#[derive(Clone, Debug)]
pub(crate) struct StreamSetup {
    /// Window geometry shared by both layers.
    pub(crate) window: ViewWindow,
    /// Palette the lazily generated ground draws from.
    pub(crate) ground_palette: TilePalette,
    /// Palette the statically seeded decorations draw from.
    pub(crate) deco_palette: TilePalette,
    /// Half-open range for the decoration count.
    pub(crate) deco_count: CountRange,
}

#[derive(Debug, Deserialize)]
struct RawManifest {
    version: u32,
    window: RawWindow,
    ground: RawPalette,
    deco: RawDeco,
}

#[derive(Debug, Deserialize)]
struct RawWindow {
    radius: [u32; 2],
    radius_max: [u32; 2],
}

#[derive(Debug, Deserialize)]
struct RawPalette {
    tiles: Vec<u32>,
    weights: Vec<u32>,
}

#[derive(Debug, Deserialize)]
struct RawDeco {
    tiles: Vec<u32>,
    weights: Vec<u32>,
    count: RawCount,
}

#[derive(Debug, Deserialize)]
struct RawCount {
    min: u32,
    max: u32,
}

/// Loads and validates a manifest from disk.
pub(crate) fn load(path: &Path) -> Result<StreamSetup> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read manifest at {}", path.display()))?;
    parse(&text).with_context(|| format!("failed to validate manifest at {}", path.display()))
}

/// Builds the built-in configuration used when no manifest is supplied.
pub(crate) fn default_setup() -> Result<StreamSetup> {
    parse(DEFAULT_MANIFEST).context("built-in default manifest must validate")
}

fn parse(text: &str) -> Result<StreamSetup> {
    let raw: RawManifest = toml::from_str(text).context("failed to parse manifest TOML")?;

    if raw.version != SUPPORTED_MANIFEST_VERSION {
        bail!(
            "unsupported manifest version {} (supported: {SUPPORTED_MANIFEST_VERSION})",
            raw.version,
        );
    }

    let window = ViewWindow::new(
        ViewExtent::new(raw.window.radius[0], raw.window.radius[1]),
        ViewExtent::new(raw.window.radius_max[0], raw.window.radius_max[1]),
    )
    .context("invalid window geometry")?;

    let ground_palette = build_palette(raw.ground.tiles, raw.ground.weights)
        .context("invalid ground palette")?;
    let deco_palette =
        build_palette(raw.deco.tiles, raw.deco.weights).context("invalid decoration palette")?;
    let deco_count = CountRange::new(raw.deco.count.min, raw.deco.count.max)
        .context("invalid decoration count range")?;

    Ok(StreamSetup {
        window,
        ground_palette,
        deco_palette,
        deco_count,
    })
}

fn build_palette(tiles: Vec<u32>, weights: Vec<u32>) -> Result<TilePalette> {
    let tiles = tiles.into_iter().map(TileId::new).collect();
    Ok(TilePalette::new(tiles, weights)?)
}
