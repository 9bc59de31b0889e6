//! Context window accounting.
//!
//! Estimates prompt size with a word-count heuristic and decides which
//! prior turns can be sent under a [`ContextPolicy`](crate::config::ContextPolicy).

pub mod monitor;

pub use monitor::{ContextMonitor, ContextOverflow, ContextPlan};
