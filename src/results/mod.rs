//! Tabular results as they arrive from, or are synthesized in the shape of,
//! the remote engine's JSON payload.

mod render;
mod wire;

pub use wire::{WireResponse, WireResult};
