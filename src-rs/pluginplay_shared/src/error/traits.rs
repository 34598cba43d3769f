use crate::error::Context;

/// Trait for types that can be converted to PluginPlay error messages.
///
/// This trait provides a standardized interface for error types to
/// expose their error message and associated context. Every error enum
/// in the core crates implements it so front ends can present failures
/// uniformly without matching on each enum.
pub trait AsPluginPlayError {
    /// Returns the primary error message.
    ///
    /// This should be a concise, user-friendly description of what went
    /// wrong, understandable without additional context.
    fn message(&self) -> String;

    /// Returns additional context information about the error.
    ///
    /// Context supplements the message with notes about the state that
    /// produced the failure or help text suggesting a fix. Returns an
    /// empty vector if no context is available.
    fn context(&self) -> Vec<Context> {
        vec![]
    }
}
