use indexmap::IndexMap;

use pluginplay_value::Value;

use crate::submod::SubmodMap;

/// An error signaled by a user-supplied callback.
///
/// The core does not interpret callback failures; the message is
/// propagated verbatim to whoever invoked the module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackError {
    message: String,
}

impl CallbackError {
    /// Creates a callback error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the message the callback failed with.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for CallbackError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CallbackError {}

/// The computation wrapped by a [`Module`](crate::Module).
///
/// A callback reads its inputs from the keyed map it is handed, invokes
/// bound submodules through the [`SubmodMap`], and returns a keyed
/// result map whose keys must cover the declared results of whichever
/// property type the module was run as.
///
/// Closures with the matching signature implement this trait, so plugin
/// authors typically write
///
/// ```
/// # use indexmap::IndexMap;
/// # use pluginplay_module::{CallbackError, Module, SubmodMap};
/// # use pluginplay_value::Value;
/// let module = Module::builder()
///     .callback(|inputs: &IndexMap<String, Value>, _: &SubmodMap| {
///         let doubled = inputs["x"].checked_mul(&Value::from(2.0))
///             .map_err(|e| CallbackError::new(e.to_string()))?;
///         Ok(IndexMap::from([("y".to_string(), doubled)]))
///     })
///     .build();
/// ```
pub trait ModuleCallback {
    /// Invokes the computation with the effective inputs and the bound
    /// submodules.
    ///
    /// # Errors
    ///
    /// Returns whatever [`CallbackError`] the computation signals; the
    /// core passes it through unmodified.
    fn call(
        &self,
        inputs: &IndexMap<String, Value>,
        submods: &SubmodMap,
    ) -> Result<IndexMap<String, Value>, CallbackError>;
}

impl<F> ModuleCallback for F
where
    F: Fn(&IndexMap<String, Value>, &SubmodMap) -> Result<IndexMap<String, Value>, CallbackError>,
{
    fn call(
        &self,
        inputs: &IndexMap<String, Value>,
        submods: &SubmodMap,
    ) -> Result<IndexMap<String, Value>, CallbackError> {
        self(inputs, submods)
    }
}
