//! Reading, patching and writing the tile-map document.
//!
//! Only `tilesets[0]` and the `data` arrays of the floor and wall layers are touched.
//! Everything else in the document, including key order, is carried through as-is.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};

/// Tileset record as stored in the map document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TilesetDescriptor {
    pub columns: u32,
    pub firstgid: u32,
    pub image: String,
    pub imageheight: u32,
    pub imagewidth: u32,
    pub margin: u32,
    pub name: String,
    pub spacing: u32,
    pub tilecount: u32,
    pub tileheight: u32,
    pub tilewidth: u32,
}

/// Positions of the floor and wall layers in the document's `layers` array.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayerSlots {
    pub floor: usize,
    pub wall: usize,
}

impl Default for LayerSlots {
    fn default() -> Self {
        Self { floor: 0, wall: 1 }
    }
}

/// Replace the first tileset and the floor/wall layer data in `document`.
///
/// The document's shape is fully checked before anything is written, so on error
/// `document` is exactly as it was passed in.
pub fn patch(
    document: &mut Value,
    tileset: &TilesetDescriptor,
    floor: &[u32],
    wall: &[u32],
    slots: LayerSlots,
) -> Result<()> {
    if slots.floor == slots.wall {
        return Err(Error::InvalidConfig(format!(
            "floor and wall cannot share layer {}",
            slots.floor
        )));
    }

    let tileset = serde_json::to_value(tileset)?;
    validate(document, floor.len(), wall.len(), slots)?;

    document["tilesets"][0] = tileset;
    document["layers"][slots.floor]["data"] = Value::from(floor.to_vec());
    document["layers"][slots.wall]["data"] = Value::from(wall.to_vec());
    Ok(())
}

fn validate(document: &Value, floor_len: usize, wall_len: usize, slots: LayerSlots) -> Result<()> {
    let tilesets = document
        .get("tilesets")
        .and_then(Value::as_array)
        .ok_or_else(|| Error::DocumentShape("missing 'tilesets' array".to_string()))?;
    if tilesets.is_empty() {
        return Err(Error::DocumentShape("'tilesets' is empty".to_string()));
    }

    let layers = document
        .get("layers")
        .and_then(Value::as_array)
        .ok_or_else(|| Error::DocumentShape("missing 'layers' array".to_string()))?;

    for (role, slot, len) in [("floor", slots.floor, floor_len), ("wall", slots.wall, wall_len)] {
        let layer = layers.get(slot).and_then(Value::as_object).ok_or_else(|| {
            Error::DocumentShape(format!(
                "no {} layer at index {} ({} layers present)",
                role,
                slot,
                layers.len()
            ))
        })?;

        let width = layer.get("width").and_then(Value::as_u64);
        let height = layer.get("height").and_then(Value::as_u64);
        if let (Some(w), Some(h)) = (width, height) {
            if (w * h) as usize != len {
                return Err(Error::DocumentShape(format!(
                    "{} layer is {}x{} but {} cells were painted",
                    role, w, h, len
                )));
            }
        }
    }
    Ok(())
}

pub fn load(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    Ok(serde_json::from_str(&text)?)
}

/// Pretty-print `document` to `path`.
///
/// Callers that replace an existing map write to [`staging_path`] first and rename.
pub fn write_pretty(path: &Path, document: &Value) -> Result<()> {
    let text = serde_json::to_string_pretty(document)?;
    fs::write(path, text).map_err(|e| Error::io(path, e))?;
    debug!(path = %path.display(), "wrote map document");
    Ok(())
}

/// Sibling path an output is written to before it replaces `path`.
pub fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
