//! Typed records for reading sessions.
//!
//! These are the shapes that cross layer boundaries. Validation happens
//! here (mode parsing) and in the service — never ad hoc per call site.

use crate::{
    error::{ReadingError, ReadingResult},
    types::{CardId, ReadingId},
};
use serde::{Deserialize, Serialize};

/// How a reading was performed.
///
/// `Physical` readings are recorded from real cards and are never drawn
/// by the engine; `Digital` readings draw deterministically from the seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Physical,
    Digital,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Physical => "physical",
            Self::Digital => "digital",
        }
    }

    /// Parse a caller-supplied mode string. Boundary validation — anything
    /// but the two known modes is an InvalidArgument.
    pub fn parse(s: &str) -> ReadingResult<Self> {
        match s {
            "physical" => Ok(Self::Physical),
            "digital" => Ok(Self::Digital),
            other => Err(ReadingError::InvalidArgument(format!(
                "mode must be 'physical' or 'digital', got '{other}'"
            ))),
        }
    }
}

/// One assigned slot in a reading's spread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub slot: String,
    pub card_id: CardId,
    pub reversed: bool,
}

/// A reading session. The seed is immutable once set — it is the root of
/// all determinism for this session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reading {
    pub reading_id: ReadingId,
    pub mode: Mode,
    pub spread_id: String,
    pub seed: String,
    pub created_at: String,
    /// Opaque key-value blob; the core stores and returns it uninterpreted.
    pub metadata: serde_json::Value,
    /// Ordered by insertion sequence, which equals draw order.
    pub positions: Vec<Position>,
}
