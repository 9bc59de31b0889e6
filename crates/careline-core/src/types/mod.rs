//! Core types for Careline.

mod conversation;
mod turn;

pub use conversation::*;
pub use turn::*;
