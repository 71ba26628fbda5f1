//! Shape and arrowhead vocabularies.
//!
//! A `shape` value is looked up in the shape table first and the arrowhead
//! table second, so names present in both (`diamond`, `circle`) resolve to
//! the shape. Which of the two is legal depends on where the value is used:
//! objects accept only shapes, arrowheads accept both.

use std::{fmt, str::FromStr};

use serde::{Serialize, Serializer};

/// The geometric kind of an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Shape {
    #[default]
    Rectangle,
    Square,
    Page,
    Parallelogram,
    Document,
    Cylinder,
    Queue,
    Package,
    Step,
    Callout,
    StoredData,
    Person,
    Diamond,
    Oval,
    Circle,
    Hexagon,
    Cloud,
    Text,
    Code,
    Class,
    SqlTable,
    Image,
}

impl Shape {
    pub const ALL: [Shape; 22] = [
        Shape::Rectangle,
        Shape::Square,
        Shape::Page,
        Shape::Parallelogram,
        Shape::Document,
        Shape::Cylinder,
        Shape::Queue,
        Shape::Package,
        Shape::Step,
        Shape::Callout,
        Shape::StoredData,
        Shape::Person,
        Shape::Diamond,
        Shape::Oval,
        Shape::Circle,
        Shape::Hexagon,
        Shape::Cloud,
        Shape::Text,
        Shape::Code,
        Shape::Class,
        Shape::SqlTable,
        Shape::Image,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Shape::Rectangle => "rectangle",
            Shape::Square => "square",
            Shape::Page => "page",
            Shape::Parallelogram => "parallelogram",
            Shape::Document => "document",
            Shape::Cylinder => "cylinder",
            Shape::Queue => "queue",
            Shape::Package => "package",
            Shape::Step => "step",
            Shape::Callout => "callout",
            Shape::StoredData => "stored_data",
            Shape::Person => "person",
            Shape::Diamond => "diamond",
            Shape::Oval => "oval",
            Shape::Circle => "circle",
            Shape::Hexagon => "hexagon",
            Shape::Cloud => "cloud",
            Shape::Text => "text",
            Shape::Code => "code",
            Shape::Class => "class",
            Shape::SqlTable => "sql_table",
            Shape::Image => "image",
        }
    }

    /// Shapes whose width and height must agree.
    pub fn is_equilateral(&self) -> bool {
        matches!(self, Shape::Circle | Shape::Square)
    }

    /// Shapes whose children are folded into a structured record.
    pub fn is_specialized(&self) -> bool {
        matches!(self, Shape::Class | Shape::SqlTable)
    }
}

impl FromStr for Shape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|shape| shape.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown shape `{s}`"))
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Shape {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// The marker drawn at the end of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Arrowhead {
    #[default]
    Triangle,
    Arrow,
    Diamond,
    FilledDiamond,
    Circle,
    FilledCircle,
    CfOne,
    CfOneRequired,
    CfMany,
    CfManyRequired,
}

impl Arrowhead {
    pub const ALL: [Arrowhead; 10] = [
        Arrowhead::Triangle,
        Arrowhead::Arrow,
        Arrowhead::Diamond,
        Arrowhead::FilledDiamond,
        Arrowhead::Circle,
        Arrowhead::FilledCircle,
        Arrowhead::CfOne,
        Arrowhead::CfOneRequired,
        Arrowhead::CfMany,
        Arrowhead::CfManyRequired,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Arrowhead::Triangle => "triangle",
            Arrowhead::Arrow => "arrow",
            Arrowhead::Diamond => "diamond",
            Arrowhead::FilledDiamond => "filled-diamond",
            Arrowhead::Circle => "circle",
            Arrowhead::FilledCircle => "filled-circle",
            Arrowhead::CfOne => "cf-one",
            Arrowhead::CfOneRequired => "cf-one-required",
            Arrowhead::CfMany => "cf-many",
            Arrowhead::CfManyRequired => "cf-many-required",
        }
    }
}

impl FromStr for Arrowhead {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|arrowhead| arrowhead.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown arrowhead `{s}`"))
    }
}

impl fmt::Display for Arrowhead {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Arrowhead {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// The value of a `shape` field: either an object shape or an arrowhead marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeValue {
    Shape(Shape),
    Arrowhead(Arrowhead),
}

impl ShapeValue {
    /// Resolve a `shape` value, preferring object shapes over arrowheads.
    pub fn parse(s: &str) -> Option<Self> {
        if let Ok(shape) = s.parse::<Shape>() {
            return Some(ShapeValue::Shape(shape));
        }
        s.parse::<Arrowhead>().ok().map(ShapeValue::Arrowhead)
    }

    /// The object shape, if this value names one.
    pub fn shape(&self) -> Option<Shape> {
        match self {
            ShapeValue::Shape(shape) => Some(*shape),
            ShapeValue::Arrowhead(_) => None,
        }
    }

    /// The arrowhead marker this value draws when used on an edge end.
    ///
    /// `diamond` and `circle` resolve to shapes, but name arrowheads too.
    pub fn arrowhead(&self) -> Option<Arrowhead> {
        match self {
            ShapeValue::Arrowhead(arrowhead) => Some(*arrowhead),
            ShapeValue::Shape(Shape::Diamond) => Some(Arrowhead::Diamond),
            ShapeValue::Shape(Shape::Circle) => Some(Arrowhead::Circle),
            ShapeValue::Shape(_) => None,
        }
    }

    pub fn is(&self, shape: Shape) -> bool {
        self.shape() == Some(shape)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeValue::Shape(shape) => shape.as_str(),
            ShapeValue::Arrowhead(arrowhead) => arrowhead.as_str(),
        }
    }
}

impl Default for ShapeValue {
    fn default() -> Self {
        ShapeValue::Shape(Shape::default())
    }
}

impl fmt::Display for ShapeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ShapeValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
