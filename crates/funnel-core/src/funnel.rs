use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One step of the three-message funnel, in send order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Interest,
    Solution,
    Deadline,
}

impl Stage {
    pub const ALL: [Stage; 3] = [Stage::Interest, Stage::Solution, Stage::Deadline];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Interest => "interest",
            Stage::Solution => "solution",
            Stage::Deadline => "deadline",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A/B-test bucket. Recipients carry one; templates exist for each.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    #[default]
    A,
    B,
    C,
}

impl Variant {
    pub const ALL: [Variant; 3] = [Variant::A, Variant::B, Variant::C];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Variant::A => "a",
            Variant::B => "b",
            Variant::C => "c",
        }
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not one of the known variant codes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown variant code '{0}'; expected one of a, b, c")]
pub struct UnknownVariant(pub String);

impl FromStr for Variant {
    type Err = UnknownVariant;

    /// Parses `a`/`b`/`c`, ignoring surrounding whitespace and ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a" => Ok(Variant::A),
            "b" => Ok(Variant::B),
            "c" => Ok(Variant::C),
            _ => Err(UnknownVariant(s.to_string())),
        }
    }
}

/// How the delivery loop picks a variant for each (recipient, stage) pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VariantMode {
    /// Use the variant stored on the recipient record for every stage.
    #[default]
    Fixed,
    /// Draw a fresh variant uniformly for every (recipient, stage) pair.
    Random,
}

impl std::fmt::Display for VariantMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VariantMode::Fixed => write!(f, "fixed"),
            VariantMode::Random => write!(f, "random"),
        }
    }
}
