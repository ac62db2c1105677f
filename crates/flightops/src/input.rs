//! Field validation for console input.
//!
//! Every value the operator types is checked against a [`Constraint`]
//! descriptor by the pure [`parse_and_validate`] function. The console layer
//! owns the retry loop; this module owns the rules, so validation is testable
//! without simulating console I/O.

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

/// Bounds applied to a real-valued field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RealBound {
    /// Any finite-looking number (temperature).
    Any,
    /// Zero or greater (wind speed, visibility, cost).
    NonNegative,
    /// Strictly greater than zero (fuel, burn rate, speed).
    Positive,
    /// Between 0 and 100 inclusive (humidity).
    Percent,
}

/// A declarative constraint on a single input field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// Non-empty text.
    NonEmpty,
    /// A real number within the given bound.
    Real(RealBound),
    /// An integer written as plain digits, within optional bounds.
    ///
    /// The lexical rule is digits-only: signs and decimal points are format
    /// errors, not range errors.
    Integer {
        /// Inclusive lower bound, if any.
        min: Option<i64>,
        /// Inclusive upper bound, if any.
        max: Option<i64>,
    },
    /// A 10-character date with dashes at positions 4 and 7.
    ///
    /// Nothing else is checked; "2025-99-99" is accepted by design.
    DateShape,
    /// Case-insensitive membership in a fixed set; the stored value is the
    /// lowercase form.
    OneOf(&'static [&'static str]),
}

/// A successfully validated field value, converted to its target type.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Text fields, date fields, and normalized enum choices.
    Text(String),
    /// Integer fields.
    Integer(i64),
    /// Real-valued fields.
    Real(f64),
}

/// Why a raw input was rejected.
///
/// The distinction selects which of a field's two messages the prompt loop
/// prints; neither variant ever escapes the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConstraintViolation {
    /// The input does not convert to the field's type.
    #[error("value does not parse as the expected type")]
    Format,
    /// The input converts but falls outside the accepted range or set.
    #[error("value is outside the accepted range")]
    OutOfRange,
}

/// A field's prompt, constraint, and rejection messages.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Prompt printed before reading the value.
    pub prompt: &'static str,
    /// Constraint the value must satisfy.
    pub constraint: Constraint,
    /// Message printed on a [`ConstraintViolation::Format`] rejection.
    pub format_message: &'static str,
    /// Message printed on a [`ConstraintViolation::OutOfRange`] rejection.
    pub range_message: &'static str,
}

impl FieldSpec {
    /// Select the message for a rejection.
    #[must_use]
    pub fn message_for(&self, violation: ConstraintViolation) -> &'static str {
        match violation {
            ConstraintViolation::Format => self.format_message,
            ConstraintViolation::OutOfRange => self.range_message,
        }
    }
}

fn date_shape() -> &'static Regex {
    static DATE_SHAPE: OnceLock<Regex> = OnceLock::new();
    DATE_SHAPE.get_or_init(|| Regex::new(r"^.{4}-.{2}-.{2}$").expect("valid literal pattern"))
}

/// Check a raw (already trimmed) input against a constraint.
///
/// Returns the value converted to its target type, or the violation kind so
/// the caller can pick the right message and re-prompt.
///
/// # Errors
///
/// Returns a [`ConstraintViolation`] describing why the input was rejected.
pub fn parse_and_validate(
    raw: &str,
    constraint: &Constraint,
) -> std::result::Result<Value, ConstraintViolation> {
    match constraint {
        Constraint::NonEmpty => {
            if raw.is_empty() {
                Err(ConstraintViolation::Format)
            } else {
                Ok(Value::Text(raw.to_string()))
            }
        }
        Constraint::Real(bound) => {
            let value: f64 = raw.parse().map_err(|_| ConstraintViolation::Format)?;
            let rejected = match bound {
                RealBound::Any => false,
                RealBound::NonNegative => value < 0.0,
                RealBound::Positive => value <= 0.0,
                RealBound::Percent => value < 0.0 || value > 100.0,
            };
            if rejected {
                Err(ConstraintViolation::OutOfRange)
            } else {
                Ok(Value::Real(value))
            }
        }
        Constraint::Integer { min, max } => {
            if raw.is_empty() || !raw.chars().all(|c| c.is_ascii_digit()) {
                return Err(ConstraintViolation::Format);
            }
            // Digits-only strings can still overflow i64
            let value: i64 = raw.parse().map_err(|_| ConstraintViolation::OutOfRange)?;
            if min.is_some_and(|m| value < m) || max.is_some_and(|m| value > m) {
                return Err(ConstraintViolation::OutOfRange);
            }
            Ok(Value::Integer(value))
        }
        Constraint::DateShape => {
            if date_shape().is_match(raw) {
                Ok(Value::Text(raw.to_string()))
            } else {
                Err(ConstraintViolation::Format)
            }
        }
        Constraint::OneOf(options) => {
            let normalized = raw.to_lowercase();
            if options.contains(&normalized.as_str()) {
                Ok(Value::Text(normalized))
            } else {
                Err(ConstraintViolation::OutOfRange)
            }
        }
    }
}

impl Value {
    /// Extract the text form, if this is a text value.
    #[must_use]
    pub fn into_text(self) -> Option<String> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Extract the integer form, if this is an integer value.
    #[must_use]
    pub fn into_integer(self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(i),
            _ => None,
        }
    }

    /// Extract the real form, if this is a real value.
    #[must_use]
    pub fn into_real(self) -> Option<f64> {
        match self {
            Self::Real(r) => Some(r),
            _ => None,
        }
    }
}
