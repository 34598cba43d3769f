use pluginplay_shared::error::{AsPluginPlayError, Context};

/// Failures produced while marshaling positional arguments into and out
/// of keyed maps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyTypeError {
    /// More positional arguments were supplied than inputs are declared.
    TooManyArguments {
        /// The number of declared inputs.
        max: usize,
        /// The number of arguments actually supplied.
        actual: usize,
    },
    /// A declared input beyond the supplied arguments has no default.
    MissingDefault(String),
    /// The number of result values differs from the declared results.
    ResultArityMismatch {
        /// The number of declared results.
        expected: usize,
        /// The number of values actually supplied.
        actual: usize,
    },
    /// A declared input is absent from the map being unwrapped.
    MissingInput(String),
    /// A declared result is absent from the map being unwrapped.
    MissingResult(String),
}

impl std::fmt::Display for PropertyTypeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooManyArguments { max, actual } => {
                write!(f, "expected at most {max} argument(s), got {actual}")
            }
            Self::MissingDefault(name) => {
                write!(f, "no default argument for '{name}'")
            }
            Self::ResultArityMismatch { expected, actual } => {
                write!(f, "expected exactly {expected} result value(s), got {actual}")
            }
            Self::MissingInput(name) => {
                write!(f, "'{name}' is not in the inputs to parse")
            }
            Self::MissingResult(name) => {
                write!(f, "'{name}' is not in the results to parse")
            }
        }
    }
}

impl std::error::Error for PropertyTypeError {}

impl AsPluginPlayError for PropertyTypeError {
    fn message(&self) -> String {
        self.to_string()
    }

    fn context(&self) -> Vec<Context> {
        match self {
            Self::MissingDefault(name) => vec![Context::Help(format!(
                "supply '{name}' positionally or declare a default for it"
            ))],
            Self::TooManyArguments { .. }
            | Self::ResultArityMismatch { .. }
            | Self::MissingInput(_)
            | Self::MissingResult(_) => vec![],
        }
    }
}
