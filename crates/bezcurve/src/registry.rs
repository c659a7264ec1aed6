//! Central registry of curve modes: keys, display names and descriptions.
//!
//! Front ends use this to list, parse and label modes without matching on
//! [`CurveMode`] themselves.

use std::{fmt, str::FromStr};

use crate::{
    compose::CurveMode,
    error::{Error, Result},
};

/// Metadata for one curve mode.
#[derive(Debug)]
pub struct ModeEntry {
    /// Stable lowercase key used on command lines and in scripts.
    pub key: &'static str,
    /// Human-facing name.
    pub display: &'static str,
    /// The mode itself.
    pub mode: CurveMode,
    /// One-line description of how segments are built.
    pub description: &'static str,
}

/// All registered modes, in presentation order.
pub const REGISTRY: &[ModeEntry] = &[
    ModeEntry {
        key: "composite",
        display: "N-Bezier",
        mode: CurveMode::Composite,
        description: "one chained curve; quadratic end pieces, cubic interior pieces",
    },
    ModeEntry {
        key: "segmented",
        display: "MultiplyBezier",
        mode: CurveMode::Segmented,
        description: "an independent cubic between every pair of consecutive anchors",
    },
    ModeEntry {
        key: "single",
        display: "Single Bezier",
        mode: CurveMode::Single,
        description: "one Bezier of full degree over every anchor and handle",
    },
];

/// Registry keys in presentation order.
pub const MODE_NAMES: &[&str] = &["composite", "segmented", "single"];

/// Registry entry for `mode`.
pub fn entry(mode: CurveMode) -> &'static ModeEntry {
    match mode {
        CurveMode::Composite => &REGISTRY[0],
        CurveMode::Segmented => &REGISTRY[1],
        CurveMode::Single => &REGISTRY[2],
    }
}

/// Find a mode by key or display name, ignoring ASCII case.
pub fn lookup(name: &str) -> Result<CurveMode> {
    let name = name.trim();
    REGISTRY
        .iter()
        .find(|e| e.key.eq_ignore_ascii_case(name) || e.display.eq_ignore_ascii_case(name))
        .map(|e| e.mode)
        .ok_or_else(|| Error::UnknownMode(name.to_string()))
}

impl FromStr for CurveMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        lookup(s)
    }
}

impl fmt::Display for CurveMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(entry(*self).key)
    }
}
