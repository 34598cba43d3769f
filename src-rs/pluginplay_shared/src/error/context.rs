/// Contextual information that can be attached to an error message.
///
/// The `Context` enum provides a way to attach additional information to
/// error messages, helping users understand the state in which an error
/// occurred and how to resolve it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Context {
    /// Additional information about the error.
    ///
    /// Notes provide supplementary details, e.g. which callback point or
    /// input name the failing operation was referring to.
    Note(String),

    /// A suggestion for resolving the error.
    ///
    /// Help text provides actionable advice, e.g. "copy the module
    /// before rebinding its submodule".
    Help(String),
}
