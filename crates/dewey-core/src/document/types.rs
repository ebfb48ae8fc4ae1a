use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DeweyError;

/// Sections every working-depth document carries, in canonical order
pub const WORKING_SECTIONS: [&str; 5] = [
    "Why This Matters",
    "In Practice",
    "Key Guidance",
    "Watch Out For",
    "Go Deeper",
];

/// Sections every overview document carries, in canonical order
pub const OVERVIEW_SECTIONS: [&str; 2] = ["What This Covers", "How It's Organized"];

/// Intended level of detail of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Depth {
    Overview,
    Working,
    Reference,
}

impl Depth {
    /// All depths, sorted by name
    pub const ALL: [Depth; 3] = [Depth::Overview, Depth::Reference, Depth::Working];

    pub fn as_str(&self) -> &'static str {
        match self {
            Depth::Overview => "overview",
            Depth::Working => "working",
            Depth::Reference => "reference",
        }
    }

    /// Required `##` sections in canonical order. Reference documents only
    /// need a non-empty body.
    pub fn required_sections(&self) -> &'static [&'static str] {
        match self {
            Depth::Overview => &OVERVIEW_SECTIONS,
            Depth::Working => &WORKING_SECTIONS,
            Depth::Reference => &[],
        }
    }

    /// Inclusive line-count range
    pub fn size_bounds(&self) -> (usize, usize) {
        match self {
            Depth::Overview => (5, 150),
            Depth::Working => (10, 400),
            Depth::Reference => (3, 150),
        }
    }

    /// Acceptable Flesch-Kincaid grade range; reference documents are not scored
    pub fn grade_bounds(&self) -> Option<(f64, f64)> {
        match self {
            Depth::Overview => Some((8.0, 14.0)),
            Depth::Working => Some((10.0, 16.0)),
            Depth::Reference => None,
        }
    }

    /// Minimum prose word count before a document is queued for depth review
    pub fn min_words(&self) -> usize {
        match self {
            Depth::Overview => 50,
            Depth::Working => 150,
            Depth::Reference => 20,
        }
    }
}

impl fmt::Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Depth {
    type Err = DeweyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "overview" => Ok(Depth::Overview),
            "working" => Ok(Depth::Working),
            "reference" => Ok(Depth::Reference),
            other => Err(DeweyError::invalid_value("depth", other)),
        }
    }
}
