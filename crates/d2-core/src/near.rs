//! Fixed positions an object can be pinned to with `near`.

use std::{fmt, str::FromStr};

/// A position on the board edge, as accepted by `near: top-center`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NearConstant {
    TopLeft,
    TopCenter,
    TopRight,
    CenterLeft,
    CenterRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl NearConstant {
    pub const ALL: [NearConstant; 8] = [
        NearConstant::TopLeft,
        NearConstant::TopCenter,
        NearConstant::TopRight,
        NearConstant::CenterLeft,
        NearConstant::CenterRight,
        NearConstant::BottomLeft,
        NearConstant::BottomCenter,
        NearConstant::BottomRight,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NearConstant::TopLeft => "top-left",
            NearConstant::TopCenter => "top-center",
            NearConstant::TopRight => "top-right",
            NearConstant::CenterLeft => "center-left",
            NearConstant::CenterRight => "center-right",
            NearConstant::BottomLeft => "bottom-left",
            NearConstant::BottomCenter => "bottom-center",
            NearConstant::BottomRight => "bottom-right",
        }
    }

    /// All constant names joined with `", "`, for diagnostics.
    pub fn names() -> String {
        Self::ALL.map(|constant| constant.as_str()).join(", ")
    }
}

impl FromStr for NearConstant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|constant| constant.as_str() == s)
            .ok_or_else(|| format!("invalid near constant `{s}`, valid values: {}", Self::names()))
    }
}

impl fmt::Display for NearConstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_near_constant_from_str() {
        assert_eq!("top-center".parse::<NearConstant>(), Ok(NearConstant::TopCenter));
        assert_eq!("bottom-right".parse::<NearConstant>(), Ok(NearConstant::BottomRight));
        assert!("center".parse::<NearConstant>().is_err());
    }

    #[test]
    fn test_near_constant_names() {
        let names = NearConstant::names();
        assert!(names.starts_with("top-left, top-center"));
        assert!(names.ends_with("bottom-right"));
    }
}
