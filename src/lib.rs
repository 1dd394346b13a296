//! Colorete - timed color-matching game
//!
//! Round engine, scoring, results and session storage. The `colorete` binary
//! drives these from the terminal; hosts with their own UI use the library.

pub mod assets;
pub mod error;
pub mod models;
pub mod services;
