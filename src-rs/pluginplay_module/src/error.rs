use indexmap::IndexSet;

use pluginplay_property_type::PropertyTypeError;
use pluginplay_shared::error::{AsPluginPlayError, Context};

use crate::callback::CallbackError;

/// The inputs and submodule callback points of a module that are not
/// yet ready to run.
///
/// Produced by [`Module::list_not_ready`](crate::Module::list_not_ready)
/// and carried inside [`ModuleError::NotReady`] so callers can see
/// exactly what was missing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NotReady {
    /// Names of inputs that are still unset, across module-specific
    /// inputs and every declared property type.
    pub inputs: IndexSet<String>,
    /// Names of submodule callback points that are unbound or whose
    /// bound module is itself not ready.
    pub submods: IndexSet<String>,
}

impl NotReady {
    /// Returns true if nothing is missing.
    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty() && self.submods.is_empty()
    }
}

/// Failures produced by module operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleError {
    /// A metadata or run operation was invoked on a module with no
    /// bound callback.
    NoCallback,
    /// A mutation was attempted on a locked module.
    Locked,
    /// Required inputs or submodules are unset or not ready.
    NotReady(NotReady),
    /// `change_input` referenced a name the module does not declare.
    UnknownInput(String),
    /// A submodule callback point name the module does not declare.
    UnknownSubmod(String),
    /// A declared submodule callback point has no module bound to it.
    UnboundSubmod(String),
    /// `run_as` was invoked with a property type the module does not
    /// declare.
    UnsatisfiedPropertyType,
    /// `description()` was called but no description was set.
    DescriptionNotSet,
    /// A positional-argument marshaling failure.
    PropertyType(PropertyTypeError),
    /// The user-supplied callback failed; propagated verbatim.
    Callback(CallbackError),
}

impl From<PropertyTypeError> for ModuleError {
    fn from(error: PropertyTypeError) -> Self {
        Self::PropertyType(error)
    }
}

impl From<CallbackError> for ModuleError {
    fn from(error: CallbackError) -> Self {
        Self::Callback(error)
    }
}

impl std::fmt::Display for ModuleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoCallback => write!(f, "no callable in the module"),
            Self::Locked => write!(f, "module is locked and can not be modified"),
            Self::NotReady(not_ready) => {
                write!(f, "module is not ready")?;
                if !not_ready.inputs.is_empty() {
                    let names: Vec<_> =
                        not_ready.inputs.iter().map(String::as_str).collect();
                    write!(f, "; unset inputs: {}", names.join(", "))?;
                }
                if !not_ready.submods.is_empty() {
                    let names: Vec<_> =
                        not_ready.submods.iter().map(String::as_str).collect();
                    write!(f, "; unready submodules: {}", names.join(", "))?;
                }
                Ok(())
            }
            Self::UnknownInput(name) => {
                write!(f, "'{name}' is not a valid input for this module")
            }
            Self::UnknownSubmod(point) => {
                write!(f, "'{point}' is not a predefined callback point")
            }
            Self::UnboundSubmod(point) => {
                write!(f, "no module is bound at callback point '{point}'")
            }
            Self::UnsatisfiedPropertyType => {
                write!(f, "module does not satisfy the requested property type")
            }
            Self::DescriptionNotSet => write!(f, "description was not set"),
            Self::PropertyType(error) => write!(f, "{error}"),
            Self::Callback(error) => write!(f, "callback failed: {error}"),
        }
    }
}

impl std::error::Error for ModuleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::PropertyType(error) => Some(error),
            Self::Callback(error) => Some(error),
            Self::NoCallback
            | Self::Locked
            | Self::NotReady(_)
            | Self::UnknownInput(_)
            | Self::UnknownSubmod(_)
            | Self::UnboundSubmod(_)
            | Self::UnsatisfiedPropertyType
            | Self::DescriptionNotSet => None,
        }
    }
}

impl AsPluginPlayError for ModuleError {
    fn message(&self) -> String {
        self.to_string()
    }

    fn context(&self) -> Vec<Context> {
        match self {
            Self::Locked => vec![Context::Help(
                "make an unlocked copy of the module and modify that instead".to_string(),
            )],
            Self::NotReady(_) => vec![Context::Help(
                "set the remaining inputs and bind every submodule callback point".to_string(),
            )],
            Self::NoCallback
            | Self::UnknownInput(_)
            | Self::UnknownSubmod(_)
            | Self::UnboundSubmod(_)
            | Self::UnsatisfiedPropertyType
            | Self::DescriptionNotSet
            | Self::PropertyType(_)
            | Self::Callback(_) => vec![],
        }
    }
}
