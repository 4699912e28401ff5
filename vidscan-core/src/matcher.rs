//! Match predicates between probed dimensions and a target resolution.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::resolution::ResolutionSpec;

/// Pixel geometry of a video stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// How probed dimensions are compared against the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ComparisonMode {
    #[default]
    #[serde(rename = "eq")]
    Equal,
    #[serde(rename = "lte")]
    LessOrEqual,
    #[serde(rename = "gte")]
    GreaterOrEqual,
}

impl ComparisonMode {
    /// Short name used on the command line and in report file names.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonMode::Equal => "eq",
            ComparisonMode::LessOrEqual => "lte",
            ComparisonMode::GreaterOrEqual => "gte",
        }
    }

    /// Operator symbol for human-readable output.
    #[must_use]
    pub fn symbol(&self) -> &'static str {
        match self {
            ComparisonMode::Equal => "==",
            ComparisonMode::LessOrEqual => "<=",
            ComparisonMode::GreaterOrEqual => ">=",
        }
    }
}

impl FromStr for ComparisonMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "eq" => Ok(ComparisonMode::Equal),
            "lte" => Ok(ComparisonMode::LessOrEqual),
            "gte" => Ok(ComparisonMode::GreaterOrEqual),
            _ => Err(CoreError::InvalidComparison(s.to_string())),
        }
    }
}

impl fmt::Display for ComparisonMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decides whether `probe` satisfies `spec` under `mode`.
///
/// Exact specs compare both axes with no tolerance. Height-only specs ignore
/// width; only `Equal` applies the tolerance band, inclusive on both ends.
#[must_use]
pub fn matches(probe: Dimensions, spec: &ResolutionSpec, mode: ComparisonMode) -> bool {
    match *spec {
        ResolutionSpec::Exact { width, height } => match mode {
            ComparisonMode::Equal => probe.width == width && probe.height == height,
            ComparisonMode::LessOrEqual => probe.width <= width && probe.height <= height,
            ComparisonMode::GreaterOrEqual => probe.width >= width && probe.height >= height,
        },
        ResolutionSpec::HeightOnly { height, tolerance } => match mode {
            ComparisonMode::Equal => probe.height.abs_diff(height) <= tolerance,
            ComparisonMode::LessOrEqual => probe.height <= height,
            ComparisonMode::GreaterOrEqual => probe.height >= height,
        },
    }
}
