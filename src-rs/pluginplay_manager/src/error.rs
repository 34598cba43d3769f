use pluginplay_module::ModuleError;
use pluginplay_shared::error::{AsPluginPlayError, Context};

/// Failures produced by registry operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManagerError {
    /// No module is registered under the given key.
    UnknownKey(String),
    /// The given key is already assigned to a module.
    KeyInUse(String),
    /// The registry delegated to a module and the module failed.
    Module(ModuleError),
}

impl From<ModuleError> for ManagerError {
    fn from(error: ModuleError) -> Self {
        Self::Module(error)
    }
}

impl std::fmt::Display for ManagerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownKey(key) => {
                write!(f, "module manager does not have a module: '{key}'")
            }
            Self::KeyInUse(key) => write!(f, "module key '{key}' is already in use"),
            Self::Module(error) => write!(f, "{error}"),
        }
    }
}

impl std::error::Error for ManagerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Module(error) => Some(error),
            Self::UnknownKey(_) | Self::KeyInUse(_) => None,
        }
    }
}

impl AsPluginPlayError for ManagerError {
    fn message(&self) -> String {
        self.to_string()
    }

    fn context(&self) -> Vec<Context> {
        match self {
            Self::KeyInUse(_) => vec![Context::Help(
                "erase or rename the existing module before reusing its key".to_string(),
            )],
            Self::UnknownKey(_) | Self::Module(_) => vec![],
        }
    }
}
