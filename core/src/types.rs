//! Shared primitive types used across the reading core.

/// A stable, unique identifier for a card in the deck.
pub type CardId = String;

/// The canonical reading-session identifier (uuid v4, never reused).
pub type ReadingId = String;
