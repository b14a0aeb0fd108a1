//! Core types: messages, generation settings, usage, results.

pub mod generation;
pub mod message;
pub mod results;
pub mod usage;

pub use generation::*;
pub use message::*;
pub use results::*;
pub use usage::*;
