//! Attribute records shared by objects, edges and arrowheads.

use std::{fmt, str::FromStr};

use serde::{Serialize, Serializer};
use url::Url;

use crate::{
    shape::ShapeValue,
    span::Span,
    style::Style,
};

/// A scalar attribute and the map key that last set it.
///
/// `map_key` is `None` for values that were never written explicitly, such
/// as an object's default label.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Scalar<T> {
    pub value: T,
    pub map_key: Option<Span>,
}

impl<T> Scalar<T> {
    pub fn new(value: T, map_key: Span) -> Self {
        Self {
            value,
            map_key: Some(map_key),
        }
    }

    /// A value that was not declared in the source.
    pub fn implicit(value: T) -> Self {
        Self {
            value,
            map_key: None,
        }
    }
}

/// Layout direction of a container's children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Right,
    Left,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Right => "right",
            Direction::Left => "left",
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "right" => Ok(Direction::Right),
            "left" => Ok(Direction::Left),
            _ => Err(format!(
                "direction must be one of up, down, right, left, got {s:?}"
            )),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Direction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// An icon reference: an absolute URL or a relative path.
#[derive(Debug, Clone, PartialEq)]
pub struct Icon {
    raw: String,
    url: Option<Url>,
}

impl Icon {
    /// Parse an icon reference.
    ///
    /// Absolute URLs are kept as parsed [`Url`]s. Relative references are
    /// accepted when they resolve against a file base and their first path
    /// segment has no `:`, which would make it read as a scheme.
    ///
    /// # Errors
    ///
    /// Returns the [`url::ParseError`] for references that are neither.
    pub fn parse(raw: &str) -> Result<Self, url::ParseError> {
        match Url::parse(raw) {
            Ok(url) => Ok(Self {
                raw: raw.to_string(),
                url: Some(url),
            }),
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                let first_segment = raw.split(['/', '?', '#']).next().unwrap_or_default();
                if first_segment.contains(':') {
                    return Err(url::ParseError::RelativeUrlWithoutBase);
                }
                Url::parse("file:///")?.join(raw)?;
                Ok(Self {
                    raw: raw.to_string(),
                    url: None,
                })
            }
            Err(err) => Err(err),
        }
    }

    /// The reference as written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The parsed URL, for absolute references.
    pub fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }
}

impl fmt::Display for Icon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for Icon {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

/// The target of a `near` field, kept as a key path until validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearKey {
    pub path: Vec<String>,
    pub span: Span,
}

impl fmt::Display for NearKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::format_path(&self.path))
    }
}

/// Visual and behavioral settings of an object, edge or arrowhead.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Attributes {
    pub label: Scalar<String>,
    pub shape: Scalar<ShapeValue>,
    pub style: Style,
    pub icon: Option<Icon>,
    pub tooltip: Option<String>,
    pub link: Option<String>,
    pub near_key: Option<NearKey>,
    pub width: Option<Scalar<i64>>,
    pub height: Option<Scalar<i64>>,
    pub direction: Option<Scalar<Direction>>,
    pub constraint: Option<Scalar<String>>,
    /// Language of the label, set by block strings and `shape: code`.
    pub language: Option<String>,
}

impl Attributes {
    /// Attributes of a freshly declared object, labelled with its identifier.
    pub fn labelled(label: impl Into<String>) -> Self {
        Self {
            label: Scalar::implicit(label.into()),
            ..Self::default()
        }
    }
}
