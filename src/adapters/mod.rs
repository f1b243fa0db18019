//! Adapter implementations for port traits.
//!
//! - `live/` — Real API implementations
//! - `recording` — Wraps a live adapter and records calls to a cassette
//! - `replaying` — Serves calls from a cassette

pub mod live;
pub mod recording;
pub mod replaying;
