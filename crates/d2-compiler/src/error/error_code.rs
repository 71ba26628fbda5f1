//! Error codes for the D2 diagnostic system.
//!
//! Error codes are organized by compilation stage:
//! - `E0xx` - Syntax errors
//! - `E1xx` - IR construction errors
//! - `E2xx` - Keyword and value errors
//! - `E3xx` - Compatibility errors
//! - `E4xx` - Reference errors

use std::fmt;

/// Error codes for categorizing diagnostic errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Syntax Errors (E0xx)
    // =========================================================================
    /// Unterminated string.
    ///
    /// A quoted string was opened but never closed.
    E001,

    /// Unexpected character.
    ///
    /// A character was encountered that cannot start or continue a statement.
    E002,

    /// Invalid escape sequence.
    ///
    /// An unrecognized escape sequence was used in a quoted string.
    E003,

    /// Unterminated block string.
    ///
    /// A `|`-delimited block string was opened but never closed.
    E004,

    /// Unclosed map.
    ///
    /// A `{` was opened but the input ended before the matching `}`.
    E005,

    /// Incomplete statement.
    ///
    /// A key, edge endpoint or value was expected but not found.
    E006,

    // =========================================================================
    // IR Errors (E1xx)
    // =========================================================================
    /// Invalid parent reference.
    ///
    /// `_` was used in a field key where it does not name a parent scope.
    E100,

    /// Board keyword expects a map.
    ///
    /// `layers`, `scenarios` or `steps` was given a scalar value.
    E101,

    /// Unknown edge reference.
    ///
    /// An indexed edge key such as `(a -> b)[1]` names an edge that was never declared.
    E102,

    // =========================================================================
    // Keyword and Value Errors (E2xx)
    // =========================================================================
    /// Reserved field does not accept composite.
    ///
    /// A reserved keyword was given a map where a scalar is required.
    E200,

    /// Unknown shape.
    ///
    /// The value of `shape` is neither a shape nor an arrowhead.
    E201,

    /// Bad icon url.
    ///
    /// The value of `icon` is not a valid URL or relative path.
    E202,

    /// Bad near key.
    ///
    /// The value of `near` is not a valid key path.
    E203,

    /// Non-integer size.
    ///
    /// The value of `width` or `height` is not an integer.
    E204,

    /// Invalid direction.
    ///
    /// The value of `direction` is not one of up, down, right, left.
    E205,

    /// Constraint must be a string.
    ///
    /// The value of `constraint` is a number, boolean or null.
    E206,

    /// Invalid style value.
    ///
    /// A style property was given a value outside its accepted range or format.
    E207,

    /// Unknown style keyword.
    ///
    /// A key inside a `style` map is not a style property.
    E208,

    /// Edge map keys must be reserved.
    ///
    /// An edge map declared a key that is not a reserved keyword.
    E209,

    /// Arrowhead map keys must be reserved.
    ///
    /// An arrowhead map declared a key that is not a reserved keyword.
    E210,

    /// Board keyword outside board root.
    ///
    /// `layers`, `scenarios` or `steps` was declared inside an object.
    E211,

    /// Invalid connection.
    ///
    /// An edge endpoint could not be resolved.
    E212,

    /// Edge-only keyword.
    ///
    /// An arrowhead keyword was declared on an object.
    E213,

    /// Style expects a map.
    ///
    /// `style` was given a scalar instead of a map of style properties.
    E214,

    // =========================================================================
    // Compatibility Errors (E3xx)
    // =========================================================================
    /// Animated on non-edge.
    ///
    /// `style.animated` was set on an object.
    E300,

    /// Size on container.
    ///
    /// `width` or `height` was set on an object with children.
    E301,

    /// Unequal dimensions.
    ///
    /// `width` and `height` differ on a circle or square.
    E302,

    /// Image without icon.
    ///
    /// An object with `shape: image` has no `icon`.
    E303,

    /// Image with children.
    ///
    /// An object with `shape: image` declares children.
    E304,

    /// Arrowhead shape on object.
    ///
    /// An object was given a shape that only applies to arrowheads.
    E305,

    /// 3d on unsupported shape.
    ///
    /// `style.3d` was set on a shape other than square or rectangle.
    E306,

    // =========================================================================
    // Reference Errors (E4xx)
    // =========================================================================
    /// Unresolved near key.
    ///
    /// `near` names neither an existing object nor a near constant.
    E400,

    /// Constant near below root.
    ///
    /// A near constant was set on an object that is not at the board root.
    E401,

    /// Constant near on container.
    ///
    /// A near constant was set on an object with children.
    E402,

    /// Constant near on connected shape.
    ///
    /// A near constant was set on an object that an edge connects to.
    E403,
}

impl ErrorCode {
    /// Returns the numeric code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::E003 => "E003",
            ErrorCode::E004 => "E004",
            ErrorCode::E005 => "E005",
            ErrorCode::E006 => "E006",
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
            ErrorCode::E202 => "E202",
            ErrorCode::E203 => "E203",
            ErrorCode::E204 => "E204",
            ErrorCode::E205 => "E205",
            ErrorCode::E206 => "E206",
            ErrorCode::E207 => "E207",
            ErrorCode::E208 => "E208",
            ErrorCode::E209 => "E209",
            ErrorCode::E210 => "E210",
            ErrorCode::E211 => "E211",
            ErrorCode::E212 => "E212",
            ErrorCode::E213 => "E213",
            ErrorCode::E214 => "E214",
            ErrorCode::E300 => "E300",
            ErrorCode::E301 => "E301",
            ErrorCode::E302 => "E302",
            ErrorCode::E303 => "E303",
            ErrorCode::E304 => "E304",
            ErrorCode::E305 => "E305",
            ErrorCode::E306 => "E306",
            ErrorCode::E400 => "E400",
            ErrorCode::E401 => "E401",
            ErrorCode::E402 => "E402",
            ErrorCode::E403 => "E403",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            // Syntax Errors
            ErrorCode::E001 => "unterminated string",
            ErrorCode::E002 => "unexpected character",
            ErrorCode::E003 => "invalid escape sequence",
            ErrorCode::E004 => "unterminated block string",
            ErrorCode::E005 => "unclosed map",
            ErrorCode::E006 => "incomplete statement",
            // IR Errors
            ErrorCode::E100 => "invalid parent reference",
            ErrorCode::E101 => "board keyword expects a map",
            ErrorCode::E102 => "unknown edge reference",
            // Keyword and Value Errors
            ErrorCode::E200 => "reserved field does not accept composite",
            ErrorCode::E201 => "unknown shape",
            ErrorCode::E202 => "bad icon url",
            ErrorCode::E203 => "bad near key",
            ErrorCode::E204 => "non-integer size",
            ErrorCode::E205 => "invalid direction",
            ErrorCode::E206 => "constraint must be a string",
            ErrorCode::E207 => "invalid style value",
            ErrorCode::E208 => "unknown style keyword",
            ErrorCode::E209 => "edge map keys must be reserved",
            ErrorCode::E210 => "arrowhead map keys must be reserved",
            ErrorCode::E211 => "board keyword outside board root",
            ErrorCode::E212 => "invalid connection",
            ErrorCode::E213 => "edge-only keyword",
            ErrorCode::E214 => "style expects a map",
            // Compatibility Errors
            ErrorCode::E300 => "animated on non-edge",
            ErrorCode::E301 => "size on container",
            ErrorCode::E302 => "unequal dimensions",
            ErrorCode::E303 => "image without icon",
            ErrorCode::E304 => "image with children",
            ErrorCode::E305 => "arrowhead shape on object",
            ErrorCode::E306 => "3d on unsupported shape",
            // Reference Errors
            ErrorCode::E400 => "unresolved near key",
            ErrorCode::E401 => "constant near below root",
            ErrorCode::E402 => "constant near on container",
            ErrorCode::E403 => "constant near on connected shape",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
