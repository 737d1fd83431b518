//! End-to-end extraction
//!
//! Chains every stage from stylesheet rules to a finished [`Catalog`]:
//! ignore filtering, fragment extraction, merging, variant collapsing,
//! classification and spritesheet grouping.

use crate::diagnostics::Diagnostics;
use crate::emote::{Catalog, CssRule};
use crate::extract::{
    build_emote_map, classify_emotes, collapse_specials, extract_partial_emotes, filter_ignored,
};
use crate::spritesheet::{build_spritesheet_map, GeometryError};
use crate::stylesheet::{parse_stylesheet, StylesheetError};
use std::collections::HashSet;
use thiserror::Error;

/// Fatal extraction failure
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ExtractError {
    #[error(transparent)]
    Stylesheet(#[from] StylesheetError),
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// Build the emote catalog from rules in stylesheet order.
///
/// `requested` holds identifiers of ignored emotes to extract anyway.
/// Non-fatal problems are pushed to `diags`.
///
/// # Examples
///
/// ```
/// use emotecss::diagnostics::Diagnostics;
/// use emotecss::emote::{CssRule, EmoteKey};
/// use emotecss::pipeline::extract_catalog;
/// use std::collections::HashSet;
///
/// let rule = CssRule::new(
///     vec![r#"a[href|="/smile"]"#.to_string()],
///     [
///         ("background-image", "url(s.png)"),
///         ("width", "10px"),
///         ("height", "10px"),
///         ("background-position", "0px 0px"),
///     ]
///     .into_iter()
///     .collect(),
/// );
///
/// let mut diags = Diagnostics::new();
/// let catalog = extract_catalog(&[rule], &HashSet::new(), &mut diags).unwrap();
///
/// let smile = &catalog.spritesheets["s.png"].emotes[&EmoteKey::base("smile")];
/// assert_eq!(smile.size, (10.0, 10.0));
/// assert_eq!(smile.offset, Some((0.0, 0.0)));
/// assert!(catalog.custom.is_empty());
/// assert!(diags.is_empty());
/// ```
pub fn extract_catalog(
    rules: &[CssRule],
    requested: &HashSet<String>,
    diags: &mut Diagnostics,
) -> Result<Catalog, GeometryError> {
    let ignored = filter_ignored(rules, diags);
    let partials: Vec<_> = extract_partial_emotes(rules, &ignored, requested, diags).collect();

    let mut emotes = build_emote_map(partials, diags);
    collapse_specials(&mut emotes);

    let (normal, custom) = classify_emotes(emotes);
    let spritesheets = build_spritesheet_map(normal, diags)?;

    Ok(Catalog { spritesheets, custom })
}

/// Parse stylesheet text and build its emote catalog.
pub fn extract_stylesheet(
    text: &str,
    requested: &HashSet<String>,
    diags: &mut Diagnostics,
) -> Result<Catalog, ExtractError> {
    let rules = parse_stylesheet(text)?;
    Ok(extract_catalog(&rules, requested, diags)?)
}
