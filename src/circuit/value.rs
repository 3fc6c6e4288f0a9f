use std::fmt;
use std::ops::Not;
use std::str::FromStr;

use crate::circuit::error::CircuitError;

/// Value carried by a pin
///
/// May be 1, 0 or x. There is no numeric interpretation: values only compare by identity.
/// Pins start as `Unknown` until something drives them.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Default)]
pub enum Value {
    /// Logic low
    Low,
    /// Logic high
    High,
    /// Undetermined or unconnected
    #[default]
    Unknown,
}

impl Value {
    /// All possible values, in the order used for pattern enumeration
    pub const ALL: [Value; 3] = [Value::Low, Value::High, Value::Unknown];

    /// Two-input And: high only if both operands are high
    ///
    /// Unknown is not high, so it folds to low rather than propagating.
    pub fn and(self, other: Value) -> Value {
        if self == Value::High && other == Value::High {
            Value::High
        } else {
            Value::Low
        }
    }

    /// Two-input Or: high if either operand is high
    pub fn or(self, other: Value) -> Value {
        if self == Value::High || other == Value::High {
            Value::High
        } else {
            Value::Low
        }
    }

    /// Returns true if the value is high or low
    pub fn is_known(&self) -> bool {
        *self != Value::Unknown
    }

    /// Obtain the boolean value, if known
    pub fn to_bool(&self) -> Option<bool> {
        match self {
            Value::Low => Some(false),
            Value::High => Some(true),
            Value::Unknown => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Value {
        if b {
            Value::High
        } else {
            Value::Low
        }
    }
}

impl Not for Value {
    type Output = Value;
    fn not(self) -> Value {
        match self {
            Value::High => Value::Low,
            Value::Low => Value::High,
            Value::Unknown => Value::Unknown,
        }
    }
}

impl Not for &'_ Value {
    type Output = Value;
    fn not(self) -> Value {
        !*self
    }
}

impl FromStr for Value {
    type Err = CircuitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "1" | "h" => Ok(Value::High),
            "0" | "l" => Ok(Value::Low),
            "x" | "u" => Ok(Value::Unknown),
            _ => Err(CircuitError::InvalidValue(s.to_string())),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Low => write!(f, "0"),
            Value::High => write!(f, "1"),
            Value::Unknown => write!(f, "x"),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
