//!
//! Module with all dtos that are passed between the engine and its
//! callers
//!

pub mod input;
pub mod output;
