use pluginplay_value::Value;

/// The values pulled out of a keyed map by
/// [`PropertyType::unwrap_inputs`](crate::PropertyType::unwrap_inputs)
/// and
/// [`PropertyType::unwrap_results`](crate::PropertyType::unwrap_results).
///
/// A property type declaring exactly one name unwraps to the bare value;
/// one declaring several names unwraps to the ordered sequence. Call
/// sites that destructure variable arity depend on this asymmetry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnwrappedValues {
    /// Exactly one name was declared.
    Single(Value),
    /// Zero or several names were declared, in declared order.
    Multiple(Vec<Value>),
}

impl UnwrappedValues {
    pub(crate) fn from_values(mut values: Vec<Value>) -> Self {
        if values.len() == 1 {
            Self::Single(values.remove(0))
        } else {
            Self::Multiple(values)
        }
    }

    /// Returns the single value, if exactly one name was declared.
    pub fn into_single(self) -> Option<Value> {
        match self {
            Self::Single(value) => Some(value),
            Self::Multiple(_) => None,
        }
    }

    /// Returns the unwrapped values as a slice, regardless of shape.
    pub fn values(&self) -> &[Value] {
        match self {
            Self::Single(value) => std::slice::from_ref(value),
            Self::Multiple(values) => values,
        }
    }

    /// Consumes the shape into an ordered sequence of values.
    pub fn into_values(self) -> Vec<Value> {
        match self {
            Self::Single(value) => vec![value],
            Self::Multiple(values) => values,
        }
    }
}
