//! Errors for the PluginPlay registry core.

mod context;
mod traits;

pub use context::Context;
pub use traits::AsPluginPlayError;

/// Unified error representation for PluginPlay.
///
/// This struct represents errors in a format suitable for display to
/// users. The core itself only ever fails with crate-local error enums;
/// a front end that wants a uniform presentation converts those enums
/// into this type via [`AsPluginPlayError`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginPlayError {
    /// Human-readable error message
    message: String,
    /// Optional context information
    context: Vec<Context>,
}

impl PluginPlayError {
    /// Creates a new `PluginPlayError` from an error that implements
    /// [`AsPluginPlayError`].
    pub fn from_error(error: &impl AsPluginPlayError) -> Self {
        Self {
            message: error.message(),
            context: error.context(),
        }
    }

    /// Returns the human-readable error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the context information attached to the error.
    pub fn context(&self) -> &[Context] {
        &self.context
    }
}

impl std::fmt::Display for PluginPlayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        for context in &self.context {
            match context {
                Context::Note(note) => write!(f, "\nnote: {note}")?,
                Context::Help(help) => write!(f, "\nhelp: {help}")?,
            }
        }
        Ok(())
    }
}

impl std::error::Error for PluginPlayError {}
