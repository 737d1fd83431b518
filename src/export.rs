//! JSON export of an emote catalog.
//!
//! # Output Format
//!
//! ```json
//! {
//!   "spritesheets": {
//!     "sheet.png": {
//!       "image_url": "sheet.png",
//!       "emotes": {
//!         "ajdance": { "name": "ajdance", "suffix": null, "size": [70.0, 70.0], "offset": [0.0, 0.0], "css": {} },
//!         "ajdance:hover": { "name": "ajdance", "suffix": ":hover", "size": [70.0, 70.0], "offset": [-70.0, 0.0], "css": {} }
//!       }
//!     }
//!   },
//!   "custom": {
//!     "!red": { "name": "!red", "suffix": null, "css": { "color": "red" } }
//!   }
//! }
//! ```
//!
//! Emotes are keyed by their identifier (name plus suffix). Declarations keep
//! their stylesheet order.

use crate::emote::{Catalog, CssProperties, CustomEmote, NormalEmote, Spritesheet};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// Error type for export operations
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for export operations
pub type Result<T> = std::result::Result<T, ExportError>;

#[derive(Serialize)]
struct CatalogJson<'a> {
    spritesheets: BTreeMap<&'a str, SpritesheetJson<'a>>,
    custom: BTreeMap<String, CustomJson<'a>>,
}

#[derive(Serialize)]
struct SpritesheetJson<'a> {
    image_url: &'a str,
    emotes: BTreeMap<String, NormalJson<'a>>,
}

#[derive(Serialize)]
struct NormalJson<'a> {
    name: &'a str,
    suffix: Option<&'a str>,
    size: [f32; 2],
    offset: Option<[f32; 2]>,
    css: &'a CssProperties,
}

#[derive(Serialize)]
struct CustomJson<'a> {
    name: &'a str,
    suffix: Option<&'a str>,
    css: &'a CssProperties,
}

impl<'a> From<&'a NormalEmote> for NormalJson<'a> {
    fn from(emote: &'a NormalEmote) -> Self {
        Self {
            name: &emote.name,
            suffix: emote.suffix.as_deref(),
            size: [emote.size.0, emote.size.1],
            offset: emote.offset.map(|(x, y)| [x, y]),
            css: &emote.css,
        }
    }
}

impl<'a> From<&'a Spritesheet> for SpritesheetJson<'a> {
    fn from(sheet: &'a Spritesheet) -> Self {
        Self {
            image_url: &sheet.image_url,
            emotes: sheet.emotes.iter().map(|(k, e)| (k.identifier(), e.into())).collect(),
        }
    }
}

impl<'a> From<&'a CustomEmote> for CustomJson<'a> {
    fn from(emote: &'a CustomEmote) -> Self {
        Self { name: &emote.name, suffix: emote.suffix.as_deref(), css: &emote.css }
    }
}

impl<'a> From<&'a Catalog> for CatalogJson<'a> {
    fn from(catalog: &'a Catalog) -> Self {
        Self {
            spritesheets: catalog
                .spritesheets
                .iter()
                .map(|(url, sheet)| (url.as_str(), sheet.into()))
                .collect(),
            custom: catalog.custom.iter().map(|(k, e)| (k.identifier(), e.into())).collect(),
        }
    }
}

/// Serialize a catalog to a JSON string.
pub fn catalog_to_json(catalog: &Catalog, pretty: bool) -> Result<String> {
    let json = CatalogJson::from(catalog);
    let text = if pretty { serde_json::to_string_pretty(&json)? } else { serde_json::to_string(&json)? };
    Ok(text)
}

/// Write a catalog as JSON to a file.
pub fn write_catalog(catalog: &Catalog, path: &Path, pretty: bool) -> Result<()> {
    let text = catalog_to_json(catalog, pretty)?;
    let mut file = File::create(path)?;
    file.write_all(text.as_bytes())?;
    file.write_all(b"\n")?;
    Ok(())
}
