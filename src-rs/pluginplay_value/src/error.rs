use pluginplay_shared::error::AsPluginPlayError;

/// Failures produced by checked [`Value`](crate::Value) operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// The operands have incompatible types for the requested operation.
    InvalidType,
    /// The operation is not defined for the left-hand operand at all.
    InvalidOperation,
    /// Division with a zero divisor.
    DivisionByZero,
}

impl std::fmt::Display for ValueError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidType => write!(f, "operands have incompatible types"),
            Self::InvalidOperation => write!(f, "operation is not defined for this value"),
            Self::DivisionByZero => write!(f, "division by zero"),
        }
    }
}

impl std::error::Error for ValueError {}

impl AsPluginPlayError for ValueError {
    fn message(&self) -> String {
        self.to_string()
    }
}
