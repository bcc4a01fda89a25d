//! Game types for a single-player maze pursuit game.
//!
//! [wire_representation] is the JSON a maze is described with, [compact_representation] is the
//! representation search code simulates on and [types] holds the traits tying them together.

pub mod compact_representation;
pub mod types;
pub mod wire_representation;
