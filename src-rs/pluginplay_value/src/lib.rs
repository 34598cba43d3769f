//! # PluginPlay Value
//!
//! The dynamic value type passed through PluginPlay's keyed input and
//! result maps. Module callbacks receive a map from input names to
//! [`Value`]s and return a map from result names to [`Value`]s; property
//! types marshal positional arguments into and out of those maps.
//!
//! Values support checked arithmetic and comparison through the
//! `checked_*` family, each returning `Result<_, ValueError>` so a
//! callback can surface a type mismatch instead of panicking.
//!
//! ## Equality and hashing
//!
//! `Value` appears inside property-type default declarations, which in
//! turn serve as map keys, and inside memoization keys. Its `Eq` and
//! `Hash` impls therefore have to be consistent, which rules out plain
//! IEEE-754 comparison for numbers: `Value::Number` compares and hashes
//! by bit pattern. Numeric comparison (where `0.0 == -0.0` and
//! `NaN != NaN`) remains available as [`Value::checked_eq`].

mod error;

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

pub use error::ValueError;

/// A dynamically typed value.
#[derive(Debug, Clone)]
pub enum Value {
    /// A boolean value.
    Boolean(bool),
    /// A floating-point number.
    Number(f64),
    /// A string value.
    String(String),
}

impl Value {
    /// Returns the wrapped number.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidType` if the value is not a number.
    pub fn as_number(&self) -> Result<f64, ValueError> {
        match self {
            Self::Number(n) => Ok(*n),
            Self::Boolean(_) | Self::String(_) => Err(ValueError::InvalidType),
        }
    }

    /// Returns the wrapped boolean.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidType` if the value is not a boolean.
    pub fn as_boolean(&self) -> Result<bool, ValueError> {
        match self {
            Self::Boolean(b) => Ok(*b),
            Self::Number(_) | Self::String(_) => Err(ValueError::InvalidType),
        }
    }

    /// Returns the wrapped string.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidType` if the value is not a string.
    pub fn as_str(&self) -> Result<&str, ValueError> {
        match self {
            Self::String(s) => Ok(s),
            Self::Boolean(_) | Self::Number(_) => Err(ValueError::InvalidType),
        }
    }

    /// Checks if two values are numerically/structurally equal.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidType` if the values have incompatible
    /// types.
    pub fn checked_eq(&self, rhs: &Self) -> Result<bool, ValueError> {
        match (self, rhs) {
            (Self::Boolean(lhs), Self::Boolean(rhs)) => Ok(lhs == rhs),
            (Self::String(lhs), Self::String(rhs)) => Ok(lhs == rhs),
            (Self::Number(lhs), Self::Number(rhs)) => {
                Ok(lhs.partial_cmp(rhs) == Some(Ordering::Equal))
            }
            _ => Err(ValueError::InvalidType),
        }
    }

    /// Checks if two values are not equal.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidType` if the values have incompatible
    /// types.
    pub fn checked_ne(&self, rhs: &Self) -> Result<bool, ValueError> {
        self.checked_eq(rhs).map(|eq| !eq)
    }

    /// Checks if the left value is less than the right value.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidType` if the right operand is not a
    /// number.
    ///
    /// Returns `ValueError::InvalidOperation` if the left operand is not
    /// a number.
    pub fn checked_lt(&self, rhs: &Self) -> Result<bool, ValueError> {
        match (self, rhs) {
            (Self::Number(lhs), Self::Number(rhs)) => {
                Ok(lhs.partial_cmp(rhs) == Some(Ordering::Less))
            }
            (Self::Number(_), _) => Err(ValueError::InvalidType),
            _ => Err(ValueError::InvalidOperation),
        }
    }

    /// Checks if the left value is less than or equal to the right value.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidType` if the right operand is not a
    /// number.
    ///
    /// Returns `ValueError::InvalidOperation` if the left operand is not
    /// a number.
    pub fn checked_lte(&self, rhs: &Self) -> Result<bool, ValueError> {
        match (self, rhs) {
            (Self::Number(lhs), Self::Number(rhs)) => Ok(matches!(
                lhs.partial_cmp(rhs),
                Some(Ordering::Less | Ordering::Equal)
            )),
            (Self::Number(_), _) => Err(ValueError::InvalidType),
            _ => Err(ValueError::InvalidOperation),
        }
    }

    /// Checks if the left value is greater than the right value.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidType` if the right operand is not a
    /// number.
    ///
    /// Returns `ValueError::InvalidOperation` if the left operand is not
    /// a number.
    pub fn checked_gt(&self, rhs: &Self) -> Result<bool, ValueError> {
        match (self, rhs) {
            (Self::Number(lhs), Self::Number(rhs)) => {
                Ok(lhs.partial_cmp(rhs) == Some(Ordering::Greater))
            }
            (Self::Number(_), _) => Err(ValueError::InvalidType),
            _ => Err(ValueError::InvalidOperation),
        }
    }

    /// Checks if the left value is greater than or equal to the right
    /// value.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidType` if the right operand is not a
    /// number.
    ///
    /// Returns `ValueError::InvalidOperation` if the left operand is not
    /// a number.
    pub fn checked_gte(&self, rhs: &Self) -> Result<bool, ValueError> {
        match (self, rhs) {
            (Self::Number(lhs), Self::Number(rhs)) => Ok(matches!(
                lhs.partial_cmp(rhs),
                Some(Ordering::Greater | Ordering::Equal)
            )),
            (Self::Number(_), _) => Err(ValueError::InvalidType),
            _ => Err(ValueError::InvalidOperation),
        }
    }

    /// Adds two numbers.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidType` if the right operand is not a
    /// number.
    ///
    /// Returns `ValueError::InvalidOperation` if the left operand is not
    /// a number.
    pub fn checked_add(&self, rhs: &Self) -> Result<Self, ValueError> {
        match (self, rhs) {
            (Self::Number(lhs), Self::Number(rhs)) => Ok(Self::Number(lhs + rhs)),
            (Self::Number(_), _) => Err(ValueError::InvalidType),
            _ => Err(ValueError::InvalidOperation),
        }
    }

    /// Subtracts the right number from the left number.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidType` if the right operand is not a
    /// number.
    ///
    /// Returns `ValueError::InvalidOperation` if the left operand is not
    /// a number.
    pub fn checked_sub(&self, rhs: &Self) -> Result<Self, ValueError> {
        match (self, rhs) {
            (Self::Number(lhs), Self::Number(rhs)) => Ok(Self::Number(lhs - rhs)),
            (Self::Number(_), _) => Err(ValueError::InvalidType),
            _ => Err(ValueError::InvalidOperation),
        }
    }

    /// Multiplies two numbers.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidType` if the right operand is not a
    /// number.
    ///
    /// Returns `ValueError::InvalidOperation` if the left operand is not
    /// a number.
    pub fn checked_mul(&self, rhs: &Self) -> Result<Self, ValueError> {
        match (self, rhs) {
            (Self::Number(lhs), Self::Number(rhs)) => Ok(Self::Number(lhs * rhs)),
            (Self::Number(_), _) => Err(ValueError::InvalidType),
            _ => Err(ValueError::InvalidOperation),
        }
    }

    /// Divides the left number by the right number.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::DivisionByZero` if the right operand is zero.
    ///
    /// Returns `ValueError::InvalidType` if the right operand is not a
    /// number.
    ///
    /// Returns `ValueError::InvalidOperation` if the left operand is not
    /// a number.
    pub fn checked_div(&self, rhs: &Self) -> Result<Self, ValueError> {
        match (self, rhs) {
            (Self::Number(_), Self::Number(rhs)) if *rhs == 0.0 => {
                Err(ValueError::DivisionByZero)
            }
            (Self::Number(lhs), Self::Number(rhs)) => Ok(Self::Number(lhs / rhs)),
            (Self::Number(_), _) => Err(ValueError::InvalidType),
            _ => Err(ValueError::InvalidOperation),
        }
    }

    /// Raises the left number to the power of the right number.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidType` if the right operand is not a
    /// number.
    ///
    /// Returns `ValueError::InvalidOperation` if the left operand is not
    /// a number.
    pub fn checked_pow(&self, rhs: &Self) -> Result<Self, ValueError> {
        match (self, rhs) {
            (Self::Number(lhs), Self::Number(rhs)) => Ok(Self::Number(lhs.powf(*rhs))),
            (Self::Number(_), _) => Err(ValueError::InvalidType),
            _ => Err(ValueError::InvalidOperation),
        }
    }
}

// Bitwise comparison for numbers keeps Eq a true equivalence relation
// and keeps it consistent with Hash.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Boolean(lhs), Self::Boolean(rhs)) => lhs == rhs,
            (Self::Number(lhs), Self::Number(rhs)) => lhs.to_bits() == rhs.to_bits(),
            (Self::String(lhs), Self::String(rhs)) => lhs == rhs,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Self::Boolean(b) => {
                state.write_u8(0);
                b.hash(state);
            }
            Self::Number(n) => {
                state.write_u8(1);
                n.to_bits().hash(state);
            }
            Self::String(s) => {
                state.write_u8(2);
                s.hash(state);
            }
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "{s}"),
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    use super::*;

    fn hash_of(value: &Value) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn checked_eq_same_type() {
        let lhs = Value::Number(2.0);
        let rhs = Value::Number(2.0);
        assert_eq!(lhs.checked_eq(&rhs), Ok(true));
        assert_eq!(lhs.checked_ne(&rhs), Ok(false));

        let lhs = Value::String("hello".to_string());
        let rhs = Value::String("world".to_string());
        assert_eq!(lhs.checked_eq(&rhs), Ok(false));
    }

    #[test]
    fn checked_eq_mixed_types() {
        let lhs = Value::Number(1.0);
        let rhs = Value::Boolean(true);
        assert_eq!(lhs.checked_eq(&rhs), Err(ValueError::InvalidType));
    }

    #[test]
    fn checked_comparisons() {
        let one = Value::Number(1.0);
        let two = Value::Number(2.0);
        assert_eq!(one.checked_lt(&two), Ok(true));
        assert_eq!(one.checked_lte(&one), Ok(true));
        assert_eq!(two.checked_gt(&one), Ok(true));
        assert_eq!(one.checked_gte(&two), Ok(false));

        let word = Value::String("hi".to_string());
        assert_eq!(one.checked_lt(&word), Err(ValueError::InvalidType));
        assert_eq!(word.checked_lt(&one), Err(ValueError::InvalidOperation));
    }

    #[test]
    fn checked_arithmetic() {
        let six = Value::Number(6.0);
        let three = Value::Number(3.0);
        assert_eq!(six.checked_add(&three), Ok(Value::Number(9.0)));
        assert_eq!(six.checked_sub(&three), Ok(Value::Number(3.0)));
        assert_eq!(six.checked_mul(&three), Ok(Value::Number(18.0)));
        assert_eq!(six.checked_div(&three), Ok(Value::Number(2.0)));
        assert_eq!(six.checked_pow(&three), Ok(Value::Number(216.0)));
    }

    #[test]
    fn division_by_zero() {
        let one = Value::Number(1.0);
        let zero = Value::Number(0.0);
        assert_eq!(one.checked_div(&zero), Err(ValueError::DivisionByZero));
    }

    #[test]
    fn structural_equality_is_bitwise_for_numbers() {
        // NaN equals itself structurally, so defaults containing NaN
        // still behave as map keys.
        let nan = Value::Number(f64::NAN);
        assert_eq!(nan, Value::Number(f64::NAN));
        assert_eq!(nan.checked_eq(&Value::Number(f64::NAN)), Ok(false));

        // 0.0 and -0.0 are numerically equal but structurally distinct.
        let pos = Value::Number(0.0);
        let neg = Value::Number(-0.0);
        assert_ne!(pos, neg);
        assert_eq!(pos.checked_eq(&neg), Ok(true));
    }

    #[test]
    fn hash_consistent_with_equality() {
        let lhs = Value::Number(2.04);
        let rhs = Value::Number(2.04);
        assert_eq!(lhs, rhs);
        assert_eq!(hash_of(&lhs), hash_of(&rhs));
    }

    #[test]
    fn accessors() {
        assert_eq!(Value::from(2.5).as_number(), Ok(2.5));
        assert_eq!(Value::from(true).as_boolean(), Ok(true));
        assert_eq!(Value::from("hi").as_str(), Ok("hi"));
        assert_eq!(Value::from(true).as_number(), Err(ValueError::InvalidType));
    }
}
