//! CSS value conversions for emote geometry
//!
//! Turns raw declaration values into the numbers a spritesheet needs:
//! - `background-image` -> image url
//! - `width` / `height` -> pixel size
//! - `background-position` -> pixel offset
//!
//! All three go through lightningcss, so every absolute unit and every
//! `background-position` form is understood.

use lightningcss::traits::Parse;
use lightningcss::values::length::{LengthPercentage, LengthValue};
use lightningcss::values::percentage::DimensionPercentage;
use lightningcss::values::position::{
    HorizontalPositionKeyword, Position, PositionComponent, VerticalPositionKeyword,
};
use lightningcss::values::url::Url;

/// Error type for unparsable geometry values
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum CssValueError {
    /// Value is not a `url(...)`
    #[error("invalid url: {0:?}")]
    InvalidUrl(String),
    /// Value is not an absolute length
    #[error("invalid size {value:?}: {message}")]
    InvalidSize { value: String, message: String },
    /// Value is not a supported background-position
    #[error("invalid position {value:?}: {message}")]
    InvalidPosition { value: String, message: String },
}

/// Extract the address from a `url(...)` value. Quotes are optional.
///
/// # Examples
///
/// ```
/// use emotecss::css_value::as_url;
///
/// assert_eq!(as_url("url(s.png)").unwrap(), "s.png");
/// assert_eq!(as_url(r#"url("%%sheet%%")"#).unwrap(), "%%sheet%%");
/// assert!(as_url("none").is_err());
/// ```
pub fn as_url(raw: &str) -> Result<String, CssValueError> {
    let url = Url::parse_string(raw.trim()).map_err(|_| CssValueError::InvalidUrl(raw.to_string()))?;
    if url.url.trim().is_empty() {
        return Err(CssValueError::InvalidUrl(raw.to_string()));
    }
    Ok(url.url.to_string())
}

/// Convert a width/height value to pixels.
///
/// Unitless numbers are taken as pixels.
///
/// # Examples
///
/// ```
/// use emotecss::css_value::as_size;
///
/// assert_eq!(as_size("70px").unwrap(), 70.0);
/// assert_eq!(as_size("0").unwrap(), 0.0);
/// assert!(as_size("auto").is_err());
/// ```
pub fn as_size(raw: &str) -> Result<f32, CssValueError> {
    parse_size(raw.trim()).map_err(|message| CssValueError::InvalidSize {
        value: raw.to_string(),
        message,
    })
}

fn parse_size(s: &str) -> Result<f32, String> {
    let length = LengthValue::parse_string(s).map_err(|e| e.to_string())?;
    let px = length
        .to_px()
        .ok_or_else(|| format!("{:?} is not an absolute length", s))?;
    finite(px)
}

/// Convert a `background-position` value to a pixel offset.
///
/// Every CSS form is accepted, including edge offsets such as
/// `right 10px bottom 5px`. A missing component is centered. Keywords map to
/// 0%/50%/100% and percentages are resolved against the emote's own box
/// (`width` horizontally, `height` vertically); an offset from `right` or
/// `bottom` counts back from that edge.
///
/// # Examples
///
/// ```
/// use emotecss::css_value::as_position;
///
/// assert_eq!(as_position("-10px -20px", 10.0, 10.0).unwrap(), (-10.0, -20.0));
/// assert_eq!(as_position("0 0", 10.0, 10.0).unwrap(), (0.0, 0.0));
/// assert_eq!(as_position("top right", 40.0, 20.0).unwrap(), (40.0, 0.0));
/// assert_eq!(as_position("right 10px bottom 5px", 40.0, 20.0).unwrap(), (30.0, 15.0));
/// ```
pub fn as_position(raw: &str, width: f32, height: f32) -> Result<(f32, f32), CssValueError> {
    let invalid = |message: String| CssValueError::InvalidPosition {
        value: raw.to_string(),
        message,
    };

    let s = raw.trim();
    if s.is_empty() {
        return Err(invalid("empty value".to_string()));
    }
    let position = Position::parse_string(s).map_err(|e| invalid(e.to_string()))?;

    let x = component_px(&position.x, width, |side| side == HorizontalPositionKeyword::Right)
        .map_err(invalid)?;
    let y = component_px(&position.y, height, |side| side == VerticalPositionKeyword::Bottom)
        .map_err(invalid)?;
    Ok((x, y))
}

/// Resolve one axis of a position. `is_far` picks out the right/bottom edge.
fn component_px<S: Copy>(
    component: &PositionComponent<S>,
    extent: f32,
    is_far: impl Fn(S) -> bool,
) -> Result<f32, String> {
    match component {
        PositionComponent::Center => Ok(0.5 * extent),
        PositionComponent::Length(lp) => length_percentage_px(lp, extent),
        PositionComponent::Side { side, offset } => {
            let offset = match offset {
                Some(lp) => length_percentage_px(lp, extent)?,
                None => 0.0,
            };
            if is_far(*side) {
                finite(extent - offset)
            } else {
                Ok(offset)
            }
        }
    }
}

fn length_percentage_px(lp: &LengthPercentage, extent: f32) -> Result<f32, String> {
    match lp {
        DimensionPercentage::Dimension(length) => length
            .to_px()
            .ok_or_else(|| "not an absolute length".to_string())
            .and_then(finite),
        DimensionPercentage::Percentage(p) => finite(p.0 * extent),
        DimensionPercentage::Calc(_) => Err("calc() is not supported".to_string()),
    }
}

fn finite(px: f32) -> Result<f32, String> {
    if px.is_finite() {
        Ok(px)
    } else {
        Err("value is not finite".to_string())
    }
}
