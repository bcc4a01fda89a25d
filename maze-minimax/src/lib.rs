#![warn(
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs
)]
//! This crate implements multi-agent minimax for the maze pursuit game. You provide a 'scoring'
//! function that turns a given maze into anything that implements the `Ord` trait, or use the
//! provided [evaluation::EvaluationWeights].
//!
//! We lean on the `maze-game-types` crate for the game logic, and in particular for the advance
//! logic, which is used to generate the next maze states.

pub mod evaluation;
pub mod paranoid;
