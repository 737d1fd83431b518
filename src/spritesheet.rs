//! Spritesheet grouping - turns spritesheet emotes into per-image sheets
//!
//! Each emote's box model is converted into a pixel size and an offset into
//! the shared image. Layout leftovers are dropped; anything else unexpected is
//! reported but kept on the emote.

use crate::css_value::{as_position, as_size, as_url, CssValueError};
use crate::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::emote::{CssProperties, EmoteKey, EmoteMap, NormalEmote, Spritesheet};
use std::collections::BTreeMap;
use thiserror::Error;

/// Layout properties that carry no meaning for an emote
const LAYOUT_PROPERTIES: [&str; 3] = ["display", "clear", "float"];

/// Commonly seen noise, dropped after geometry is taken out
const NOISE_PROPERTIES: [&str; 1] = ["background-repeat"];

/// Kept on the emote without being reported
const QUIET_PROPERTIES: [&str; 2] = ["margin-left", "margin-right"];

/// Spritesheets keyed by image url
pub type SpritesheetMap = BTreeMap<String, Spritesheet>;

/// Error type for emote geometry that can't be converted
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum GeometryError {
    /// A required property vanished between classification and conversion
    #[error("emote {emote:?} has no {property}")]
    Missing { emote: String, property: &'static str },
    /// A geometry value could not be parsed
    #[error("emote {emote:?} has invalid {property}: {source}")]
    Value {
        emote: String,
        property: &'static str,
        #[source]
        source: CssValueError,
    },
}

/// Group spritesheet emotes by background image.
///
/// Emotes sharing an image url share a sheet. After grouping, every sheet is
/// verified: emotes without a `background-position` are placed at `(0, 0)`,
/// and more than one such emote in a sheet is reported as an error.
///
/// # Errors
///
/// Returns `GeometryError` if an image url, size or position can't be parsed.
pub fn build_spritesheet_map(
    emotes: EmoteMap,
    diags: &mut Diagnostics,
) -> Result<SpritesheetMap, GeometryError> {
    let mut sheets = SpritesheetMap::new();

    for (key, emote) in emotes {
        let mut css = emote.css;
        let raw_url = take(&mut css, &key, "background-image")?;
        let image_url = as_url(&raw_url).map_err(|e| value_error(&key, "background-image", e))?;

        let normal = convert_emote(&key, &image_url, css, diags)?;
        sheets
            .entry(image_url.clone())
            .or_insert_with(|| Spritesheet::new(image_url))
            .emotes
            .insert(key, normal);
    }

    for sheet in sheets.values_mut() {
        verify_spritesheet(sheet, diags);
    }

    Ok(sheets)
}

fn convert_emote(
    key: &EmoteKey,
    image_url: &str,
    mut css: CssProperties,
    diags: &mut Diagnostics,
) -> Result<NormalEmote, GeometryError> {
    for property in LAYOUT_PROPERTIES {
        css.remove(property);
    }

    let width = as_size(&take(&mut css, key, "width")?).map_err(|e| value_error(key, "width", e))?;
    let height =
        as_size(&take(&mut css, key, "height")?).map_err(|e| value_error(key, "height", e))?;

    let offset = match css.remove("background-position") {
        Some(raw) => Some(
            as_position(&raw, width, height)
                .map_err(|e| value_error(key, "background-position", e))?,
        ),
        None => None,
    };

    for property in NOISE_PROPERTIES {
        css.remove(property);
    }

    for (property, value) in css.iter() {
        if !QUIET_PROPERTIES.contains(&property) {
            diags.push(
                Diagnostic::warning(
                    DiagnosticKind::ExtraProperty,
                    format!(
                        "emote {:?} has extra property {:?} ({:?})",
                        key.identifier(),
                        property,
                        value
                    ),
                )
                .with_context(key.identifier()),
            );
        }
    }

    Ok(NormalEmote {
        name: key.name.clone(),
        suffix: key.suffix.clone(),
        css,
        image_url: image_url.to_string(),
        size: (width, height),
        offset,
    })
}

/// Place unpositioned emotes at the origin. Only one per sheet may lack a
/// position; more than that is reported.
fn verify_spritesheet(sheet: &mut Spritesheet, diags: &mut Diagnostics) {
    let mut unpositioned = Vec::new();
    for (key, emote) in sheet.emotes.iter_mut() {
        if emote.offset.is_none() {
            emote.offset = Some((0.0, 0.0));
            unpositioned.push(key.identifier());
        }
    }

    if unpositioned.len() > 1 {
        diags.push(
            Diagnostic::error(
                DiagnosticKind::UnpositionedEmotes,
                format!(
                    "multiple unpositioned emotes within spritesheet {:?}: {}",
                    sheet.image_url,
                    unpositioned.join(" ")
                ),
            )
            .with_context(sheet.image_url.as_str()),
        );
    }
}

fn take(
    css: &mut CssProperties,
    key: &EmoteKey,
    property: &'static str,
) -> Result<String, GeometryError> {
    css.remove(property)
        .ok_or_else(|| GeometryError::Missing { emote: key.identifier(), property })
}

fn value_error(key: &EmoteKey, property: &'static str, source: CssValueError) -> GeometryError {
    GeometryError::Value { emote: key.identifier(), property, source }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emote::PartialEmote;

    fn normal(name: &str, props: &[(&str, &str)]) -> (EmoteKey, PartialEmote) {
        let emote = PartialEmote::new(name, None, props.iter().copied().collect());
        (emote.key(), emote)
    }

    fn sheet_emote(name: &str, url: &str, position: Option<&str>) -> (EmoteKey, PartialEmote) {
        let mut props = vec![("background-image", url), ("width", "10px"), ("height", "10px")];
        if let Some(position) = position {
            props.push(("background-position", position));
        }
        normal(name, &props)
    }

    #[test]
    fn test_single_emote() {
        let emotes: EmoteMap =
            [sheet_emote("smile", "url(s.png)", Some("-10px -20px"))].into_iter().collect();
        let mut diags = Diagnostics::new();
        let sheets = build_spritesheet_map(emotes, &mut diags).unwrap();

        let emote = &sheets["s.png"].emotes[&EmoteKey::base("smile")];
        assert_eq!(emote.image_url, "s.png");
        assert_eq!(emote.size, (10.0, 10.0));
        assert_eq!(emote.offset, Some((-10.0, -20.0)));
        assert!(emote.css.is_empty());
        assert!(diags.is_empty());
    }

    #[test]
    fn test_grouping_by_url() {
        let emotes: EmoteMap = [
            sheet_emote("a", "url(one.png)", Some("0 0")),
            sheet_emote("b", "url('one.png')", Some("0 -10px")),
            sheet_emote("c", "url(two.png)", Some("0 0")),
        ]
        .into_iter()
        .collect();
        let mut diags = Diagnostics::new();
        let sheets = build_spritesheet_map(emotes, &mut diags).unwrap();

        assert_eq!(sheets.len(), 2);
        assert_eq!(sheets["one.png"].emotes.len(), 2);
        assert_eq!(sheets["two.png"].emotes.len(), 1);
        assert_eq!(sheets["two.png"].image_url, "two.png");
    }

    #[test]
    fn test_strips_layout_and_noise() {
        let emotes: EmoteMap = [normal(
            "a",
            &[
                ("display", "block"),
                ("clear", "none"),
                ("float", "left"),
                ("background-image", "url(a.png)"),
                ("width", "10px"),
                ("height", "10px"),
                ("background-position", "0 0"),
                ("background-repeat", "no-repeat"),
                ("margin-left", "2px"),
                ("margin-right", "2px"),
            ],
        )]
        .into_iter()
        .collect();
        let mut diags = Diagnostics::new();
        let sheets = build_spritesheet_map(emotes, &mut diags).unwrap();

        let css = &sheets["a.png"].emotes[&EmoteKey::base("a")].css;
        assert_eq!(css.names().collect::<Vec<_>>(), vec!["margin-left", "margin-right"]);
        assert!(diags.is_empty());
    }

    #[test]
    fn test_extra_property_warned_and_kept() {
        let emotes: EmoteMap = [normal(
            "a",
            &[
                ("background-image", "url(a.png)"),
                ("width", "10px"),
                ("height", "10px"),
                ("background-position", "0 0"),
                ("transform", "scaleX(-1)"),
            ],
        )]
        .into_iter()
        .collect();
        let mut diags = Diagnostics::new();
        let sheets = build_spritesheet_map(emotes, &mut diags).unwrap();

        let css = &sheets["a.png"].emotes[&EmoteKey::base("a")].css;
        assert_eq!(css.get("transform"), Some("scaleX(-1)"));
        let warnings: Vec<_> = diags.of_kind(DiagnosticKind::ExtraProperty).collect();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("transform"));
    }

    #[test]
    fn test_one_unpositioned_emote_is_fine() {
        let emotes: EmoteMap = [
            sheet_emote("a", "url(s.png)", None),
            sheet_emote("b", "url(s.png)", Some("0 -10px")),
        ]
        .into_iter()
        .collect();
        let mut diags = Diagnostics::new();
        let sheets = build_spritesheet_map(emotes, &mut diags).unwrap();

        assert_eq!(sheets["s.png"].emotes[&EmoteKey::base("a")].offset, Some((0.0, 0.0)));
        assert!(diags.is_empty());
    }

    #[test]
    fn test_multiple_unpositioned_emotes_error() {
        let emotes: EmoteMap = [
            sheet_emote("a", "url(s.png)", None),
            sheet_emote("b", "url(s.png)", None),
            sheet_emote("c", "url(other.png)", None),
        ]
        .into_iter()
        .collect();
        let mut diags = Diagnostics::new();
        let sheets = build_spritesheet_map(emotes, &mut diags).unwrap();

        for name in ["a", "b"] {
            assert_eq!(sheets["s.png"].emotes[&EmoteKey::base(name)].offset, Some((0.0, 0.0)));
        }
        let errors: Vec<_> = diags.of_kind(DiagnosticKind::UnpositionedEmotes).collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].context.as_deref(), Some("s.png"));
        assert!(errors[0].message.contains("a b"));
        assert!(diags.has_errors());
    }

    #[test]
    fn test_bad_size_is_fatal() {
        let emotes: EmoteMap = [normal(
            "a",
            &[("background-image", "url(a.png)"), ("width", "auto"), ("height", "10px")],
        )]
        .into_iter()
        .collect();
        let mut diags = Diagnostics::new();
        let err = build_spritesheet_map(emotes, &mut diags).unwrap_err();
        assert!(matches!(err, GeometryError::Value { property: "width", .. }));
    }

    #[test]
    fn test_non_finite_geometry_is_fatal() {
        let emotes: EmoteMap = [normal(
            "a",
            &[("background-image", "url(a.png)"), ("width", "NaN"), ("height", "10px")],
        )]
        .into_iter()
        .collect();
        let mut diags = Diagnostics::new();
        let err = build_spritesheet_map(emotes, &mut diags).unwrap_err();
        assert!(matches!(err, GeometryError::Value { property: "width", .. }));

        let emotes: EmoteMap =
            [sheet_emote("b", "url(b.png)", Some("inf 0"))].into_iter().collect();
        let err = build_spritesheet_map(emotes, &mut diags).unwrap_err();
        assert!(matches!(err, GeometryError::Value { property: "background-position", .. }));
    }

    #[test]
    fn test_bad_url_is_fatal() {
        let emotes: EmoteMap =
            [sheet_emote("a", "none", Some("0 0"))].into_iter().collect();
        let mut diags = Diagnostics::new();
        let err = build_spritesheet_map(emotes, &mut diags).unwrap_err();
        assert!(matches!(err, GeometryError::Value { property: "background-image", .. }));
        assert_eq!(err.to_string(), r#"emote "a" has invalid background-image: invalid url: "none""#);
    }

    #[test]
    fn test_missing_geometry_reported() {
        let emotes: EmoteMap =
            [normal("a", &[("background-image", "url(a.png)"), ("width", "10px")])]
                .into_iter()
                .collect();
        let mut diags = Diagnostics::new();
        let err = build_spritesheet_map(emotes, &mut diags).unwrap_err();
        assert_eq!(err, GeometryError::Missing { emote: "a".to_string(), property: "height" });
    }
}
