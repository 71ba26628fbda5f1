//! Reserved keywords of the diagram language.
//!
//! Keywords are matched ASCII case-insensitively. A key that matches one of
//! these tables configures its parent instead of declaring a child object.

use std::{fmt, str::FromStr};

/// A reserved field name that configures an object or edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Label,
    Shape,
    Style,
    Icon,
    Near,
    Width,
    Height,
    Link,
    Direction,
    Constraint,
    Tooltip,
    SourceArrowhead,
    TargetArrowhead,
}

impl Keyword {
    pub const ALL: [Keyword; 13] = [
        Keyword::Label,
        Keyword::Shape,
        Keyword::Style,
        Keyword::Icon,
        Keyword::Near,
        Keyword::Width,
        Keyword::Height,
        Keyword::Link,
        Keyword::Direction,
        Keyword::Constraint,
        Keyword::Tooltip,
        Keyword::SourceArrowhead,
        Keyword::TargetArrowhead,
    ];

    /// Look up a keyword by field name, ignoring ASCII case.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|keyword| keyword.as_str().eq_ignore_ascii_case(name))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Label => "label",
            Keyword::Shape => "shape",
            Keyword::Style => "style",
            Keyword::Icon => "icon",
            Keyword::Near => "near",
            Keyword::Width => "width",
            Keyword::Height => "height",
            Keyword::Link => "link",
            Keyword::Direction => "direction",
            Keyword::Constraint => "constraint",
            Keyword::Tooltip => "tooltip",
            Keyword::SourceArrowhead => "source-arrowhead",
            Keyword::TargetArrowhead => "target-arrowhead",
        }
    }

    /// Returns `true` for keywords whose value is a single scalar.
    ///
    /// `style` and the two arrowhead keywords take a map and have dedicated
    /// compilers.
    pub fn is_simple(&self) -> bool {
        !matches!(
            self,
            Keyword::Style | Keyword::SourceArrowhead | Keyword::TargetArrowhead
        )
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A property accepted inside a `style` map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleKeyword {
    Opacity,
    Stroke,
    Fill,
    StrokeWidth,
    StrokeDash,
    BorderRadius,
    Shadow,
    ThreeDee,
    Multiple,
    Font,
    FontSize,
    FontColor,
    Animated,
    Bold,
    Italic,
    Underline,
    Filled,
}

impl StyleKeyword {
    pub const ALL: [StyleKeyword; 17] = [
        StyleKeyword::Opacity,
        StyleKeyword::Stroke,
        StyleKeyword::Fill,
        StyleKeyword::StrokeWidth,
        StyleKeyword::StrokeDash,
        StyleKeyword::BorderRadius,
        StyleKeyword::Shadow,
        StyleKeyword::ThreeDee,
        StyleKeyword::Multiple,
        StyleKeyword::Font,
        StyleKeyword::FontSize,
        StyleKeyword::FontColor,
        StyleKeyword::Animated,
        StyleKeyword::Bold,
        StyleKeyword::Italic,
        StyleKeyword::Underline,
        StyleKeyword::Filled,
    ];

    /// Look up a style property by name, ignoring ASCII case.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|keyword| keyword.as_str().eq_ignore_ascii_case(name))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StyleKeyword::Opacity => "opacity",
            StyleKeyword::Stroke => "stroke",
            StyleKeyword::Fill => "fill",
            StyleKeyword::StrokeWidth => "stroke-width",
            StyleKeyword::StrokeDash => "stroke-dash",
            StyleKeyword::BorderRadius => "border-radius",
            StyleKeyword::Shadow => "shadow",
            StyleKeyword::ThreeDee => "3d",
            StyleKeyword::Multiple => "multiple",
            StyleKeyword::Font => "font",
            StyleKeyword::FontSize => "font-size",
            StyleKeyword::FontColor => "font-color",
            StyleKeyword::Animated => "animated",
            StyleKeyword::Bold => "bold",
            StyleKeyword::Italic => "italic",
            StyleKeyword::Underline => "underline",
            StyleKeyword::Filled => "filled",
        }
    }
}

impl fmt::Display for StyleKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A field that declares nested boards at the root of a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoardKind {
    Layers,
    Scenarios,
    Steps,
}

impl BoardKind {
    pub const ALL: [BoardKind; 3] = [BoardKind::Layers, BoardKind::Scenarios, BoardKind::Steps];

    pub fn as_str(&self) -> &'static str {
        match self {
            BoardKind::Layers => "layers",
            BoardKind::Scenarios => "scenarios",
            BoardKind::Steps => "steps",
        }
    }
}

impl FromStr for BoardKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("invalid board kind `{s}`, valid values: layers, scenarios, steps"))
    }
}

impl fmt::Display for BoardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_parse_ignores_case() {
        assert_eq!(Keyword::parse("shape"), Some(Keyword::Shape));
        assert_eq!(Keyword::parse("SHAPE"), Some(Keyword::Shape));
        assert_eq!(Keyword::parse("Source-Arrowhead"), Some(Keyword::SourceArrowhead));
        assert_eq!(Keyword::parse("shapes"), None);
    }

    #[test]
    fn test_keyword_round_trips_through_name() {
        for keyword in Keyword::ALL {
            assert_eq!(Keyword::parse(keyword.as_str()), Some(keyword));
        }
    }

    #[test]
    fn test_keyword_is_simple() {
        assert!(Keyword::Label.is_simple());
        assert!(Keyword::Constraint.is_simple());
        assert!(!Keyword::Style.is_simple());
        assert!(!Keyword::TargetArrowhead.is_simple());
        assert_eq!(Keyword::ALL.iter().filter(|k| k.is_simple()).count(), 10);
    }

    #[test]
    fn test_style_keyword_parse() {
        assert_eq!(StyleKeyword::parse("3d"), Some(StyleKeyword::ThreeDee));
        assert_eq!(StyleKeyword::parse("Font-Size"), Some(StyleKeyword::FontSize));
        assert_eq!(StyleKeyword::parse("colour"), None);
    }

    #[test]
    fn test_board_kind_from_str() {
        assert_eq!("layers".parse::<BoardKind>(), Ok(BoardKind::Layers));
        assert_eq!("STEPS".parse::<BoardKind>(), Ok(BoardKind::Steps));
        assert!("boards".parse::<BoardKind>().is_err());
    }

    mod proptest_tests {
        use proptest::prelude::*;

        use super::*;

        /// Any mix of upper and lower case spells the same keyword.
        fn check_case_is_ignored(keyword: Keyword, mask: &[bool]) -> Result<(), TestCaseError> {
            let name: String = keyword
                .as_str()
                .chars()
                .zip(mask.iter().cycle())
                .map(|(c, upper)| if *upper { c.to_ascii_uppercase() } else { c })
                .collect();
            prop_assert_eq!(Keyword::parse(&name), Some(keyword));
            Ok(())
        }

        /// Names that are not keywords never resolve to one.
        fn check_unknown_names_rejected(name: &str) -> Result<(), TestCaseError> {
            let known = Keyword::ALL
                .iter()
                .any(|keyword| keyword.as_str().eq_ignore_ascii_case(name));
            prop_assert_eq!(Keyword::parse(name).is_some(), known);
            Ok(())
        }

        proptest! {
            #[test]
            fn case_is_ignored(
                keyword in prop::sample::select(Keyword::ALL.to_vec()),
                mask in prop::collection::vec(any::<bool>(), 1..8),
            ) {
                check_case_is_ignored(keyword, &mask)?;
            }

            #[test]
            fn unknown_names_rejected(name in "[a-zA-Z-]{1,18}") {
                check_unknown_names_rejected(&name)?;
            }
        }
    }
}
