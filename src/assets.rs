//! Bundled asset store: the map thumbnail, the badge icon and the three
//! overlay fonts. Everything is read from disk once, decoded, and cached
//! for the life of the process.

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::{collections::HashMap, path::PathBuf, sync::Arc};

use image::RgbaImage;
use rusttype::Font;

use crate::overlay::canvas::FontSet;
use crate::overlay::OverlayError;

/// Map thumbnail shown left of the panel.
pub const MAP_ASSET: &str = "map.png";
/// Pin glyph inside the badge.
pub const ICON_ASSET: &str = "icon.png";

const TITLE_FONT: &str = "fonts/DejaVuSans-ExtraLight.ttf";
const BODY_FONT: &str = "fonts/DejaVuSans.ttf";
const BADGE_FONT: &str = "fonts/DejaVuSans-Bold.ttf";

static IMAGE_CACHE: Lazy<Mutex<HashMap<String, Arc<RgbaImage>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

static FONT_CACHE: Lazy<Mutex<HashMap<String, Arc<Font<'static>>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Asset root, overridable with `ASSETS_DIR` for deployments that relocate
/// the bundle.
fn assets_dir() -> PathBuf {
    match std::env::var("ASSETS_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets"),
    }
}

pub fn load_image_cached(name: &str) -> Result<Arc<RgbaImage>, OverlayError> {
    if let Some(img) = IMAGE_CACHE.lock().get(name) {
        return Ok(Arc::clone(img));
    }

    let path = assets_dir().join(name);
    let bytes = std::fs::read(&path)
        .map_err(|e| OverlayError::Asset(format!("failed to read asset {}: {e}", path.display())))?;
    let img = image::load_from_memory(&bytes)
        .map_err(|e| OverlayError::Asset(format!("failed to decode asset {name}: {e}")))?
        .to_rgba8();

    let img = Arc::new(img);
    IMAGE_CACHE.lock().insert(name.to_string(), Arc::clone(&img));
    Ok(img)
}

pub fn load_font_cached(name: &str) -> Result<Arc<Font<'static>>, OverlayError> {
    if let Some(f) = FONT_CACHE.lock().get(name) {
        return Ok(Arc::clone(f));
    }

    let path = assets_dir().join(name);
    let bytes = std::fs::read(&path)
        .map_err(|e| OverlayError::Font(format!("failed to read font {}: {e}", path.display())))?;
    let f = Font::try_from_vec(bytes)
        .ok_or_else(|| OverlayError::Font(format!("failed to parse font {name}")))?;

    let f = Arc::new(f);
    FONT_CACHE.lock().insert(name.to_string(), Arc::clone(&f));
    Ok(f)
}

/// The overlay's font triple: thin title face, regular body face, bold
/// badge face.
pub fn font_set() -> Result<FontSet, OverlayError> {
    Ok(FontSet {
        light: load_font_cached(TITLE_FONT)?,
        regular: load_font_cached(BODY_FONT)?,
        bold: load_font_cached(BADGE_FONT)?,
    })
}
