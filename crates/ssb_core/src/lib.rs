//! Slideshow Builder core - pairs stills with narration and renders a video
//!
//! This crate contains all business logic with zero UI dependencies.
//! It can be driven by the CLI or any other front end that supplies a log
//! callback and a progress callback.

pub mod config;
pub mod discovery;
pub mod effects;
pub mod encoder;
pub mod logging;
pub mod models;
pub mod orchestrator;

#[cfg(test)]
pub(crate) mod test_support;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
