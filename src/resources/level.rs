//! Level file loading.
//!
//! Loading is a fail-fast pipeline with no partial results:
//!
//! 1. [`LevelSource::read`] fetches the raw bytes ([`LevelError::Io`]).
//! 2. [`parse_level_bytes`] turns them into a generic JSON value
//!    ([`LevelError::Parse`]).
//! 3. [`validate_level`] checks the shape and ranges and produces a typed
//!    [`LevelDocument`] ([`LevelError::Schema`], naming the first bad field).
//! 4. [`build_grid`] checks the dimensions and tile size, creates a fresh
//!    [`TileGrid`], places every tile and runs auto-tiling
//!    ([`LevelError::Placement`], [`LevelError::TileSize`]).
//!
//! The grid only exists after step 4 succeeds, so a failed load never leaves
//! a half-populated level behind.
//!
//! # JSON Format
//!
//! ```json
//! {
//!   "width": 20,
//!   "height": 11,
//!   "tiles": [ { "x": 0, "y": 10, "type": 1 } ]
//! }
//! ```
//!
//! Unknown fields are ignored.

use std::io;
use std::path::PathBuf;

use log::info;
use rustc_hash::FxHashMap;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::resources::autotile::AutoTileRules;
use crate::resources::tilegrid::{DEFAULT_TILE_SIZE, OutOfBounds, TileGrid};
use crate::resources::tilepalette::{TilePalette, TileTypeId};

/// Largest accepted `width` or `height`.
pub const MAX_LEVEL_DIMENSION: i64 = 4096;

/// The parsed level is valid JSON but not a valid level.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("missing field `{field}`")]
    MissingField { field: String },
    #[error("field `{field}` must be {expected}")]
    WrongType {
        field: String,
        expected: &'static str,
    },
    #[error("field `{field}` = {value} is outside {min}..{max}")]
    OutOfRange {
        field: String,
        value: i64,
        min: i64,
        max: i64,
    },
}

impl SchemaError {
    /// Path of the offending field, e.g. `width` or `tiles[3].x`.
    pub fn field(&self) -> &str {
        match self {
            SchemaError::MissingField { field }
            | SchemaError::WrongType { field, .. }
            | SchemaError::OutOfRange { field, .. } => field,
        }
    }
}

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("failed to read level `{id}`: {source}")]
    Io {
        id: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse level: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid level: {0}")]
    Schema(#[from] SchemaError),
    #[error("tile placement outside the level: {0}")]
    Placement(#[from] OutOfBounds),
    #[error("tile size must be positive and finite, got {0}")]
    TileSize(f32),
    #[error("failed to start the level loader thread: {0}")]
    Spawn(#[source] io::Error),
}

/// Where level bytes come from.
pub trait LevelSource {
    fn read(&self, id: &str) -> io::Result<Vec<u8>>;
}

/// Reads level files from disk, optionally relative to a root directory.
#[derive(Debug, Clone, Default)]
pub struct FsLevelSource {
    pub root: Option<PathBuf>,
}

impl FsLevelSource {
    pub fn new() -> Self {
        Self { root: None }
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }
}

impl LevelSource for FsLevelSource {
    fn read(&self, id: &str) -> io::Result<Vec<u8>> {
        match &self.root {
            Some(root) => std::fs::read(root.join(id)),
            None => std::fs::read(id),
        }
    }
}

/// In-memory levels keyed by id.
impl LevelSource for FxHashMap<String, Vec<u8>> {
    fn read(&self, id: &str) -> io::Result<Vec<u8>> {
        self.get(id).cloned().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("no level named `{id}`"))
        })
    }
}

/// Single tile placement from a level file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TilePlacement {
    pub x: u32,
    pub y: u32,
    pub type_id: TileTypeId,
}

/// Validated level contents. Only lives for the duration of a load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelDocument {
    pub width: u32,
    pub height: u32,
    pub placements: Vec<TilePlacement>,
}

/// Everything needed to turn a [`LevelDocument`] into a [`TileGrid`].
#[derive(Debug, Clone, PartialEq)]
pub struct LevelSettings {
    pub palette: TilePalette,
    pub rules: AutoTileRules,
    pub tile_size: f32,
}

impl Default for LevelSettings {
    fn default() -> Self {
        Self {
            palette: TilePalette::default(),
            rules: AutoTileRules::default(),
            tile_size: DEFAULT_TILE_SIZE,
        }
    }
}

/// Parse raw bytes as JSON without interpreting them.
pub fn parse_level_bytes(bytes: &[u8]) -> Result<Value, LevelError> {
    Ok(serde_json::from_slice(bytes)?)
}

fn missing(field: impl Into<String>) -> SchemaError {
    SchemaError::MissingField {
        field: field.into(),
    }
}

fn wrong_type(field: impl Into<String>, expected: &'static str) -> SchemaError {
    SchemaError::WrongType {
        field: field.into(),
        expected,
    }
}

/// Read an integer field and check it lies in `min..max`.
fn ranged_integer(
    obj: &Map<String, Value>,
    key: &str,
    path: String,
    min: i64,
    max: i64,
) -> Result<i64, SchemaError> {
    let value = obj.get(key).ok_or_else(|| missing(path.as_str()))?;
    let n = match (value.as_i64(), value.as_u64()) {
        (Some(n), _) => n,
        // Larger than i64::MAX: always out of range.
        (None, Some(_)) => i64::MAX,
        (None, None) => return Err(wrong_type(path, "an integer")),
    };
    if n < min || n >= max {
        return Err(SchemaError::OutOfRange {
            field: path,
            value: n,
            min,
            max,
        });
    }
    Ok(n)
}

/// Check a parsed document against the level schema.
///
/// Fields are checked in order `width`, `height`, `tiles`, then each tile's
/// `x`, `y` and `type`; the first failure is returned.
pub fn validate_level(value: &Value) -> Result<LevelDocument, SchemaError> {
    let root = value
        .as_object()
        .ok_or_else(|| wrong_type("<root>", "an object"))?;

    let width = ranged_integer(root, "width", "width".into(), 1, MAX_LEVEL_DIMENSION + 1)?;
    let height = ranged_integer(root, "height", "height".into(), 1, MAX_LEVEL_DIMENSION + 1)?;

    let tiles = root
        .get("tiles")
        .ok_or_else(|| missing("tiles"))?
        .as_array()
        .ok_or_else(|| wrong_type("tiles", "an array"))?;

    let mut placements = Vec::with_capacity(tiles.len());
    for (i, entry) in tiles.iter().enumerate() {
        let path = format!("tiles[{i}]");
        let tile = entry
            .as_object()
            .ok_or_else(|| wrong_type(path.as_str(), "an object"))?;
        let x = ranged_integer(tile, "x", format!("{path}.x"), 0, width)?;
        let y = ranged_integer(tile, "y", format!("{path}.y"), 0, height)?;
        let type_id = ranged_integer(
            tile,
            "type",
            format!("{path}.type"),
            0,
            TileTypeId::MAX as i64 + 1,
        )?;
        placements.push(TilePlacement {
            x: x as u32,
            y: y as u32,
            type_id: type_id as TileTypeId,
        });
    }

    Ok(LevelDocument {
        width: width as u32,
        height: height as u32,
        placements,
    })
}

/// Build a finished grid from a document: place tiles, then auto-tile.
///
/// A validated document always succeeds with a valid tile size; a
/// hand-built one may still have out-of-range dimensions or name cells
/// outside its own bounds, which is reported instead of clamped.
pub fn build_grid(doc: &LevelDocument, settings: &LevelSettings) -> Result<TileGrid, LevelError> {
    for (field, value) in [("width", doc.width), ("height", doc.height)] {
        let value = i64::from(value);
        if !(1..=MAX_LEVEL_DIMENSION).contains(&value) {
            return Err(SchemaError::OutOfRange {
                field: field.to_string(),
                value,
                min: 1,
                max: MAX_LEVEL_DIMENSION + 1,
            }
            .into());
        }
    }
    if !settings.tile_size.is_finite() || settings.tile_size <= 0.0 {
        return Err(LevelError::TileSize(settings.tile_size));
    }

    let mut grid = TileGrid::new(doc.width, doc.height, settings.tile_size);
    for placement in &doc.placements {
        let x = i32::try_from(placement.x).unwrap_or(i32::MAX);
        let y = i32::try_from(placement.y).unwrap_or(i32::MAX);
        grid.set_tile(x, y, settings.palette.tile_for(placement.type_id))?;
    }
    grid.build_tile_data(&settings.rules);
    Ok(grid)
}

/// Read, parse, validate and build the level `id`.
pub fn load_level(
    source: &impl LevelSource,
    id: &str,
    settings: &LevelSettings,
) -> Result<TileGrid, LevelError> {
    let bytes = source.read(id).map_err(|source| LevelError::Io {
        id: id.to_string(),
        source,
    })?;
    let value = parse_level_bytes(&bytes)?;
    let doc = validate_level(&value)?;
    let grid = build_grid(&doc, settings)?;
    info!(
        "Loaded level '{}': {}x{} tiles, {} placements, {} solid",
        id,
        grid.width(),
        grid.height(),
        doc.placements.len(),
        grid.solid_count()
    );
    Ok(grid)
}
