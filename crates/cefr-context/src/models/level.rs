//! CEFR levels and request workflows

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Common European Framework of Reference proficiency level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum CefrLevel {
  A1,
  A2,
  B1,
  B2,
  C1,
}

impl CefrLevel {
  pub const ALL: [CefrLevel; 5] =
    [CefrLevel::A1, CefrLevel::A2, CefrLevel::B1, CefrLevel::B2, CefrLevel::C1];

  pub fn as_str(&self) -> &'static str {
    match self {
      CefrLevel::A1 => "A1",
      CefrLevel::A2 => "A2",
      CefrLevel::B1 => "B1",
      CefrLevel::B2 => "B2",
      CefrLevel::C1 => "C1",
    }
  }

  /// Lenient form used by the message parser: `b1` and ` B1 ` both match.
  pub fn parse_loose(value: &str) -> Option<Self> {
    value.trim().to_uppercase().parse().ok()
  }
}

impl FromStr for CefrLevel {
  type Err = UnknownVariant;

  /// Exact match only, as query parameters are validated verbatim.
  fn from_str(value: &str) -> Result<Self, Self::Err> {
    Self::ALL
      .into_iter()
      .find(|level| level.as_str() == value)
      .ok_or_else(|| UnknownVariant(value.to_string()))
  }
}

impl fmt::Display for CefrLevel {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// How the requesting teacher intends to use the retrieved texts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Workflow {
  Bespoke,
  Differentiated,
}

impl Workflow {
  pub fn as_str(&self) -> &'static str {
    match self {
      Workflow::Bespoke => "bespoke",
      Workflow::Differentiated => "differentiated",
    }
  }

  pub fn parse_loose(value: &str) -> Option<Self> {
    value.trim().to_lowercase().parse().ok()
  }
}

impl FromStr for Workflow {
  type Err = UnknownVariant;

  fn from_str(value: &str) -> Result<Self, Self::Err> {
    match value {
      "bespoke" => Ok(Workflow::Bespoke),
      "differentiated" => Ok(Workflow::Differentiated),
      other => Err(UnknownVariant(other.to_string())),
    }
  }
}

impl fmt::Display for Workflow {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised value '{0}'")]
pub struct UnknownVariant(pub String);
