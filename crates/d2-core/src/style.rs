//! Style properties of objects and edges.
//!
//! Every property is stored as an optional [`StyleValue`]. A slot becomes
//! `Some` as soon as its key appears in a `style` map, even when the value
//! fails validation, so later checks can still point at the key.

use std::str::FromStr;

use color::DynamicColor;
use serde::Serialize;
use thiserror::Error;

use crate::{keyword::StyleKeyword, span::Span};

const FONTS: [&str; 2] = ["default", "mono"];

/// A style property together with the map key that declared it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyleValue<T> {
    /// The validated value, `None` when validation failed.
    pub value: Option<T>,
    pub map_key: Span,
}

/// Error produced when a style value fails validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StyleError {
    #[error("expected \"{key}\" to be a number between {range}, got {value:?}")]
    OutOfRange {
        key: StyleKeyword,
        range: &'static str,
        value: String,
    },

    #[error("expected \"{key}\" to be true or false, got {value:?}")]
    NotBoolean { key: StyleKeyword, value: String },

    #[error(
        "expected \"{key}\" to be a valid named color (\"orange\") or a hex code (\"#f0ff3a\"), got {value:?}"
    )]
    InvalidColor { key: StyleKeyword, value: String },

    #[error("{value:?} is not a valid font in our system, valid values: default, mono")]
    UnknownFont { value: String },
}

/// Visual properties set through a `style` map.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Style {
    pub opacity: Option<StyleValue<f64>>,
    pub stroke: Option<StyleValue<String>>,
    pub fill: Option<StyleValue<String>>,
    pub stroke_width: Option<StyleValue<i64>>,
    pub stroke_dash: Option<StyleValue<i64>>,
    pub border_radius: Option<StyleValue<i64>>,
    pub shadow: Option<StyleValue<bool>>,
    pub three_dee: Option<StyleValue<bool>>,
    pub multiple: Option<StyleValue<bool>>,
    pub font: Option<StyleValue<String>>,
    pub font_size: Option<StyleValue<i64>>,
    pub font_color: Option<StyleValue<String>>,
    pub animated: Option<StyleValue<bool>>,
    pub bold: Option<StyleValue<bool>>,
    pub italic: Option<StyleValue<bool>>,
    pub underline: Option<StyleValue<bool>>,
    pub filled: Option<StyleValue<bool>>,
}

impl Style {
    /// Record `key` as declared at `map_key` and validate `raw` into it.
    ///
    /// The slot is recorded even when validation fails.
    ///
    /// # Errors
    ///
    /// Returns a [`StyleError`] describing the accepted range or format when
    /// `raw` is not a legal value for `key`.
    pub fn apply(&mut self, key: StyleKeyword, raw: &str, map_key: Span) -> Result<(), StyleError> {
        match key {
            StyleKeyword::Opacity => record(&mut self.opacity, map_key, parse_opacity(raw)),
            StyleKeyword::Stroke => record(&mut self.stroke, map_key, parse_color(key, raw)),
            StyleKeyword::Fill => record(&mut self.fill, map_key, parse_color(key, raw)),
            StyleKeyword::FontColor => {
                record(&mut self.font_color, map_key, parse_color(key, raw))
            }
            StyleKeyword::StrokeWidth => record(
                &mut self.stroke_width,
                map_key,
                parse_int(key, raw, 0, 15),
            ),
            StyleKeyword::StrokeDash => record(
                &mut self.stroke_dash,
                map_key,
                parse_int(key, raw, 0, 10),
            ),
            StyleKeyword::BorderRadius => record(
                &mut self.border_radius,
                map_key,
                parse_int(key, raw, 0, 20),
            ),
            StyleKeyword::FontSize => {
                record(&mut self.font_size, map_key, parse_int(key, raw, 8, 100))
            }
            StyleKeyword::Font => record(&mut self.font, map_key, parse_font(raw)),
            StyleKeyword::Shadow => record(&mut self.shadow, map_key, parse_bool(key, raw)),
            StyleKeyword::ThreeDee => record(&mut self.three_dee, map_key, parse_bool(key, raw)),
            StyleKeyword::Multiple => record(&mut self.multiple, map_key, parse_bool(key, raw)),
            StyleKeyword::Animated => record(&mut self.animated, map_key, parse_bool(key, raw)),
            StyleKeyword::Bold => record(&mut self.bold, map_key, parse_bool(key, raw)),
            StyleKeyword::Italic => record(&mut self.italic, map_key, parse_bool(key, raw)),
            StyleKeyword::Underline => record(&mut self.underline, map_key, parse_bool(key, raw)),
            StyleKeyword::Filled => record(&mut self.filled, map_key, parse_bool(key, raw)),
        }
    }

    /// The span of the key that declared `key`, if it was declared.
    pub fn map_key(&self, key: StyleKeyword) -> Option<Span> {
        match key {
            StyleKeyword::Opacity => declared_at(&self.opacity),
            StyleKeyword::Stroke => declared_at(&self.stroke),
            StyleKeyword::Fill => declared_at(&self.fill),
            StyleKeyword::FontColor => declared_at(&self.font_color),
            StyleKeyword::Font => declared_at(&self.font),
            StyleKeyword::StrokeWidth => declared_at(&self.stroke_width),
            StyleKeyword::StrokeDash => declared_at(&self.stroke_dash),
            StyleKeyword::BorderRadius => declared_at(&self.border_radius),
            StyleKeyword::FontSize => declared_at(&self.font_size),
            StyleKeyword::Shadow => declared_at(&self.shadow),
            StyleKeyword::ThreeDee => declared_at(&self.three_dee),
            StyleKeyword::Multiple => declared_at(&self.multiple),
            StyleKeyword::Animated => declared_at(&self.animated),
            StyleKeyword::Bold => declared_at(&self.bold),
            StyleKeyword::Italic => declared_at(&self.italic),
            StyleKeyword::Underline => declared_at(&self.underline),
            StyleKeyword::Filled => declared_at(&self.filled),
        }
    }
}

fn declared_at<T>(slot: &Option<StyleValue<T>>) -> Option<Span> {
    slot.as_ref().map(|value| value.map_key)
}

fn record<T>(
    slot: &mut Option<StyleValue<T>>,
    map_key: Span,
    parsed: Result<T, StyleError>,
) -> Result<(), StyleError> {
    let (value, result) = match parsed {
        Ok(value) => (Some(value), Ok(())),
        Err(err) => (None, Err(err)),
    };
    *slot = Some(StyleValue { value, map_key });
    result
}

fn parse_opacity(raw: &str) -> Result<f64, StyleError> {
    raw.parse::<f64>()
        .ok()
        .filter(|value| (0.0..=1.0).contains(value))
        .ok_or_else(|| StyleError::OutOfRange {
            key: StyleKeyword::Opacity,
            range: "0.0 and 1.0",
            value: raw.to_string(),
        })
}

fn parse_int(key: StyleKeyword, raw: &str, min: i64, max: i64) -> Result<i64, StyleError> {
    let range = match key {
        StyleKeyword::StrokeWidth => "0 and 15",
        StyleKeyword::StrokeDash => "0 and 10",
        StyleKeyword::BorderRadius => "0 and 20",
        _ => "8 and 100",
    };
    raw.parse::<i64>()
        .ok()
        .filter(|value| (min..=max).contains(value))
        .ok_or_else(|| StyleError::OutOfRange {
            key,
            range,
            value: raw.to_string(),
        })
}

fn parse_bool(key: StyleKeyword, raw: &str) -> Result<bool, StyleError> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(StyleError::NotBoolean {
            key,
            value: raw.to_string(),
        }),
    }
}

fn parse_color(key: StyleKeyword, raw: &str) -> Result<String, StyleError> {
    match DynamicColor::from_str(raw) {
        Ok(_) => Ok(raw.to_string()),
        Err(_) => Err(StyleError::InvalidColor {
            key,
            value: raw.to_string(),
        }),
    }
}

fn parse_font(raw: &str) -> Result<String, StyleError> {
    let font = raw.to_ascii_lowercase();
    if FONTS.contains(&font.as_str()) {
        Ok(font)
    } else {
        Err(StyleError::UnknownFont {
            value: raw.to_string(),
        })
    }
}
