//! Resolution specification parsing.
//!
//! A resolution spec is the user's target frame size. Two grammars are
//! accepted (case-insensitive, surrounding whitespace ignored):
//!
//! - `WIDTHxHEIGHT` such as `1920x1080`, producing [`ResolutionSpec::Exact`]
//! - `HEIGHT` or `HEIGHTp` such as `360` or `360p`, producing
//!   [`ResolutionSpec::HeightOnly`] with a ±10 pixel tolerance
//!
//! Parsing is pure. The canonical `Display` form parses back to the same spec.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tolerance applied to height-only specs under equality matching, in pixels.
///
/// Encoders commonly pad or crop a few rows (e.g. 1080 vs 1088), so a
/// height-only target of 360p also accepts 350..=370.
pub const HEIGHT_TOLERANCE_PX: u32 = 10;

/// Error returned when a resolution string matches neither grammar.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("'{input}': {reason}")]
    InvalidFormat { input: String, reason: String },
}

impl ResolutionError {
    fn invalid(input: &str, reason: impl Into<String>) -> Self {
        ResolutionError::InvalidFormat {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

/// Which grammar a spec was parsed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecKind {
    HeightOnly,
    Exact,
}

/// Parsed target resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ResolutionSpec {
    /// Only the height is constrained; equality matching uses `tolerance`.
    HeightOnly { height: u32, tolerance: u32 },
    /// Width and height are both constrained, with no tolerance.
    Exact { width: u32, height: u32 },
}

impl ResolutionSpec {
    /// Parses a resolution string. See the module docs for the grammar.
    pub fn parse(input: &str) -> Result<Self, ResolutionError> {
        let normalized = input.trim().to_ascii_lowercase();
        if normalized.is_empty() {
            return Err(ResolutionError::invalid(input, "empty resolution"));
        }

        if let Some((width_str, height_str)) = normalized.split_once('x') {
            let width = parse_dimension(input, width_str, "width")?;
            let height = parse_dimension(input, height_str, "height")?;
            return Ok(ResolutionSpec::Exact { width, height });
        }

        let digits = normalized.strip_suffix('p').unwrap_or(&normalized);
        let height = parse_dimension(input, digits, "height")?;
        Ok(ResolutionSpec::HeightOnly {
            height,
            tolerance: HEIGHT_TOLERANCE_PX,
        })
    }

    #[must_use]
    pub fn kind(&self) -> SpecKind {
        match self {
            ResolutionSpec::HeightOnly { .. } => SpecKind::HeightOnly,
            ResolutionSpec::Exact { .. } => SpecKind::Exact,
        }
    }

    /// Target height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        match *self {
            ResolutionSpec::HeightOnly { height, .. } | ResolutionSpec::Exact { height, .. } => {
                height
            }
        }
    }

    /// Target width in pixels, absent for height-only specs.
    #[must_use]
    pub fn width(&self) -> Option<u32> {
        match *self {
            ResolutionSpec::HeightOnly { .. } => None,
            ResolutionSpec::Exact { width, .. } => Some(width),
        }
    }

    /// Equality tolerance in pixels (zero for exact specs).
    #[must_use]
    pub fn tolerance(&self) -> u32 {
        match *self {
            ResolutionSpec::HeightOnly { tolerance, .. } => tolerance,
            ResolutionSpec::Exact { .. } => 0,
        }
    }
}

/// Parses one `\d+` token into a positive pixel count.
fn parse_dimension(input: &str, token: &str, label: &str) -> Result<u32, ResolutionError> {
    if token.is_empty() {
        return Err(ResolutionError::invalid(input, format!("missing {label}")));
    }
    if !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ResolutionError::invalid(
            input,
            format!("{label} '{token}' is not a positive integer"),
        ));
    }
    let value: u32 = token
        .parse()
        .map_err(|_| ResolutionError::invalid(input, format!("{label} '{token}' is out of range")))?;
    if value == 0 {
        return Err(ResolutionError::invalid(input, format!("{label} must be greater than zero")));
    }
    Ok(value)
}

impl FromStr for ResolutionSpec {
    type Err = ResolutionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResolutionSpec::parse(s)
    }
}

impl fmt::Display for ResolutionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionSpec::HeightOnly { height, .. } => write!(f, "{height}p"),
            ResolutionSpec::Exact { width, height } => write!(f, "{width}x{height}"),
        }
    }
}

impl From<ResolutionSpec> for String {
    fn from(spec: ResolutionSpec) -> Self {
        spec.to_string()
    }
}

impl TryFrom<String> for ResolutionSpec {
    type Error = ResolutionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ResolutionSpec::parse(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_exact() {
        assert_eq!(
            ResolutionSpec::parse("1920x1080").unwrap(),
            ResolutionSpec::Exact { width: 1920, height: 1080 }
        );
        assert_eq!(
            ResolutionSpec::parse(" 1280X720 ").unwrap(),
            ResolutionSpec::Exact { width: 1280, height: 720 }
        );
    }

    #[test]
    fn test_parse_height_only_forms_are_equal() {
        let with_suffix = ResolutionSpec::parse("360p").unwrap();
        let bare = ResolutionSpec::parse("360").unwrap();
        assert_eq!(with_suffix, bare);
        assert_eq!(with_suffix, ResolutionSpec::HeightOnly { height: 360, tolerance: 10 });
        assert_eq!(ResolutionSpec::parse("720P").unwrap().height(), 720);
    }

    #[test]
    fn test_parse_rejects_invalid_input() {
        for bad in ["abc", "0x0", "-5p", "", "   ", "p", "x", "1920x", "x1080", "0", "0p",
                    "1920x1080x2", "+360", "360pp", "1920 x 1080", "99999999999p", "12.5p"] {
            let result = ResolutionSpec::parse(bad);
            assert!(
                matches!(result, Err(ResolutionError::InvalidFormat { .. })),
                "expected InvalidFormat for {bad:?}, got {result:?}"
            );
        }
    }

    #[test]
    fn test_display_round_trips() {
        for input in ["360", "360p", "1080P", "1920x1080", "3840X2160", " 480p "] {
            let parsed = ResolutionSpec::parse(input).unwrap();
            let reparsed = ResolutionSpec::parse(&parsed.to_string()).unwrap();
            assert_eq!(parsed, reparsed, "round trip failed for {input:?}");
        }
        assert_eq!(ResolutionSpec::parse("360").unwrap().to_string(), "360p");
    }

    #[test]
    fn test_accessors() {
        let exact = ResolutionSpec::parse("1280x720").unwrap();
        assert_eq!(exact.kind(), SpecKind::Exact);
        assert_eq!(exact.width(), Some(1280));
        assert_eq!(exact.height(), 720);
        assert_eq!(exact.tolerance(), 0);

        let height_only = ResolutionSpec::parse("480p").unwrap();
        assert_eq!(height_only.kind(), SpecKind::HeightOnly);
        assert_eq!(height_only.width(), None);
        assert_eq!(height_only.tolerance(), HEIGHT_TOLERANCE_PX);
    }

    #[test]
    fn test_serde_uses_canonical_string() {
        let spec = ResolutionSpec::parse("1920x1080").unwrap();
        assert_eq!(serde_json::to_string(&spec).unwrap(), "\"1920x1080\"");
        let back: ResolutionSpec = serde_json::from_str("\"360p\"").unwrap();
        assert_eq!(back, ResolutionSpec::HeightOnly { height: 360, tolerance: 10 });
        assert!(serde_json::from_str::<ResolutionSpec>("\"abc\"").is_err());
    }
}
