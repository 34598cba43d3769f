//! Shared infrastructure for the PluginPlay crates.
//!
//! At the moment this crate only carries the error-presentation layer:
//! every error enum in the core implements [`error::AsPluginPlayError`],
//! and front ends convert those into [`error::PluginPlayError`] values
//! for display.

pub mod error;
