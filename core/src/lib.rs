//! arcana-core: deterministic card-drawing and reading-session engine.
//!
//! RULES:
//!   - All draw randomness flows through DrawRng streams derived from
//!     (seed, salt). Nothing in the draw path calls a platform RNG.
//!   - Only store.rs talks to the database.
//!   - A reading's positions are assigned at most once unless the caller
//!     explicitly forces a redraw, which replaces the full set atomically.

pub mod deck;
pub mod draw;
pub mod error;
pub mod reading;
pub mod rng;
pub mod service;
pub mod store;
pub mod types;
