//! Value validators.
//!
//! One validator per type family, each holding its optional constraints and
//! normalizing a [`RawValue`] into a typed value. [`Validator`] wraps the
//! families so an option can carry any of them.

use crate::error::{OptionError, OptionResult};
use crate::value::{RawValue, Value};
use regex_lite::Regex;

const TRUE_TOKENS: &[&str] = &["yes", "true", "t", "on", "enabled"];
const FALSE_TOKENS: &[&str] = &["no", "false", "f", "off", "disabled"];

/// Decode raw text or bytes into an owned string.
fn text(value: &RawValue) -> OptionResult<String> {
    match value {
        RawValue::Text(s) => Ok(s.clone()),
        RawValue::Bytes(b) => String::from_utf8(b.clone())
            .map_err(|e| OptionError::invalid(format!("could not decode bytes as UTF-8: {}", e))),
        other => Err(OptionError::invalid(format!(
            "expected a string, got {} {}",
            other.type_name(),
            other
        ))),
    }
}

/// Shared range checking for the numeric validators.
fn check_bounds<T>(
    value: T,
    minimum: Option<T>,
    maximum: Option<T>,
    exclusive_minimum: bool,
    exclusive_maximum: bool,
) -> OptionResult<()>
where
    T: PartialOrd + Copy + std::fmt::Display,
{
    if let Some(min) = minimum {
        if exclusive_minimum && value <= min {
            return Err(OptionError::invalid(format!(
                "{} is not greater than {}",
                value, min
            )));
        }
        if value < min {
            return Err(OptionError::invalid(format!(
                "{} is less than the minimum of {}",
                value, min
            )));
        }
    }
    if let Some(max) = maximum {
        if exclusive_maximum && value >= max {
            return Err(OptionError::invalid(format!(
                "{} is not less than {}",
                value, max
            )));
        }
        if value > max {
            return Err(OptionError::invalid(format!(
                "{} is greater than the maximum of {}",
                value, max
            )));
        }
    }
    Ok(())
}

/// Integer validator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntValidator {
    pub minimum: Option<i64>,
    pub maximum: Option<i64>,
    pub exclusive_minimum: bool,
    pub exclusive_maximum: bool,
    pub multiple_of: Option<i64>,
}

impl IntValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn minimum(mut self, minimum: i64) -> Self {
        self.minimum = Some(minimum);
        self
    }

    pub fn maximum(mut self, maximum: i64) -> Self {
        self.maximum = Some(maximum);
        self
    }

    pub fn exclusive_minimum(mut self, exclusive: bool) -> Self {
        self.exclusive_minimum = exclusive;
        self
    }

    pub fn exclusive_maximum(mut self, exclusive: bool) -> Self {
        self.exclusive_maximum = exclusive;
        self
    }

    pub fn multiple_of(mut self, multiple_of: i64) -> Self {
        self.multiple_of = Some(multiple_of);
        self
    }

    /// Coerce and constrain `value`.
    ///
    /// Integral floats are accepted (`10.0` becomes `10`); text is parsed
    /// after trimming whitespace.
    pub fn check(&self, value: impl Into<RawValue>) -> OptionResult<i64> {
        let raw = value.into();
        let n = match &raw {
            RawValue::Int(i) => *i,
            RawValue::Float(x)
                if x.fract() == 0.0 && *x >= i64::MIN as f64 && *x < i64::MAX as f64 =>
            {
                *x as i64
            }
            RawValue::Text(_) | RawValue::Bytes(_) => {
                let s = text(&raw)?;
                s.trim().parse::<i64>().map_err(|_| {
                    OptionError::invalid(format!("'{}' is not a valid integer", s))
                })?
            }
            other => {
                return Err(OptionError::invalid(format!(
                    "{} is not a valid integer",
                    other
                )));
            }
        };

        check_bounds(
            n,
            self.minimum,
            self.maximum,
            self.exclusive_minimum,
            self.exclusive_maximum,
        )?;

        if let Some(m) = self.multiple_of {
            if m == 0 {
                return Err(OptionError::invalid("multiple_of constraint is zero"));
            }
            // i64::MIN % -1 overflows; every integer is a multiple of -1
            if n.checked_rem(m).unwrap_or(0) != 0 {
                return Err(OptionError::invalid(format!(
                    "{} is not a multiple of {}",
                    n, m
                )));
            }
        }

        Ok(n)
    }
}

/// Floating-point validator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FloatValidator {
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub exclusive_minimum: bool,
    pub exclusive_maximum: bool,
    pub multiple_of: Option<f64>,
}

impl FloatValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn minimum(mut self, minimum: f64) -> Self {
        self.minimum = Some(minimum);
        self
    }

    pub fn maximum(mut self, maximum: f64) -> Self {
        self.maximum = Some(maximum);
        self
    }

    pub fn exclusive_minimum(mut self, exclusive: bool) -> Self {
        self.exclusive_minimum = exclusive;
        self
    }

    pub fn exclusive_maximum(mut self, exclusive: bool) -> Self {
        self.exclusive_maximum = exclusive;
        self
    }

    pub fn multiple_of(mut self, multiple_of: f64) -> Self {
        self.multiple_of = Some(multiple_of);
        self
    }

    pub fn check(&self, value: impl Into<RawValue>) -> OptionResult<f64> {
        let raw = value.into();
        let x = match &raw {
            RawValue::Float(x) => *x,
            RawValue::Int(i) => *i as f64,
            RawValue::Text(_) | RawValue::Bytes(_) => {
                let s = text(&raw)?;
                s.trim().parse::<f64>().map_err(|_| {
                    OptionError::invalid(format!("'{}' is not a valid number", s))
                })?
            }
            other => {
                return Err(OptionError::invalid(format!(
                    "{} is not a valid number",
                    other
                )));
            }
        };

        if !x.is_finite() {
            return Err(OptionError::invalid(format!("{} is not a finite number", x)));
        }

        check_bounds(
            x,
            self.minimum,
            self.maximum,
            self.exclusive_minimum,
            self.exclusive_maximum,
        )?;

        if let Some(m) = self.multiple_of {
            if m == 0.0 {
                return Err(OptionError::invalid("multiple_of constraint is zero"));
            }
            if x % m != 0.0 {
                return Err(OptionError::invalid(format!(
                    "{} is not a multiple of {}",
                    x, m
                )));
            }
        }

        Ok(x)
    }
}

/// String validator.
#[derive(Debug, Clone, Default)]
pub struct StrValidator {
    pub pattern: Option<Regex>,
    pub max_length: Option<usize>,
    pub min_length: Option<usize>,
    pub valid_values: Option<Vec<String>>,
}

impl StrValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require a match of `pattern` somewhere in the value.
    pub fn pattern(mut self, pattern: &str) -> OptionResult<Self> {
        let re = Regex::new(pattern).map_err(|e| {
            OptionError::definition(format!("invalid pattern '{}': {}", pattern, e))
        })?;
        self.pattern = Some(re);
        Ok(self)
    }

    pub fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    pub fn min_length(mut self, min_length: usize) -> Self {
        self.min_length = Some(min_length);
        self
    }

    pub fn valid_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.valid_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn check(&self, value: impl Into<RawValue>) -> OptionResult<String> {
        let s = text(&value.into())?;

        if let Some(ref re) = self.pattern {
            if !re.is_match(&s) {
                return Err(OptionError::invalid(format!(
                    "'{}' does not match pattern '{}'",
                    s,
                    re.as_str()
                )));
            }
        }

        let len = s.chars().count();
        if let Some(max) = self.max_length {
            if len > max {
                return Err(OptionError::invalid(format!(
                    "'{}' is longer than {} characters",
                    s, max
                )));
            }
        }
        if let Some(min) = self.min_length {
            if len < min {
                return Err(OptionError::invalid(format!(
                    "'{}' is shorter than {} characters",
                    s, min
                )));
            }
        }

        if let Some(ref allowed) = self.valid_values {
            if !allowed.iter().any(|v| *v == s) {
                return Err(OptionError::invalid(format!(
                    "'{}' is not one of: {}",
                    s,
                    allowed.join(", ")
                )));
            }
        }

        Ok(s)
    }
}

/// Any validator an option can carry.
#[derive(Debug, Clone)]
pub enum Validator {
    Int(IntValidator),
    Float(FloatValidator),
    Str(StrValidator),
    Url,
    Bool,
}

impl Validator {
    pub fn int() -> Self {
        Validator::Int(IntValidator::new())
    }

    pub fn float() -> Self {
        Validator::Float(FloatValidator::new())
    }

    pub fn str() -> Self {
        Validator::Str(StrValidator::new())
    }

    pub fn url() -> Self {
        Validator::Url
    }

    pub fn bool() -> Self {
        Validator::Bool
    }

    /// Normalize `value` or report the violated constraint.
    pub fn validate(&self, value: impl Into<RawValue>) -> OptionResult<Value> {
        match self {
            Validator::Int(v) => v.check(value).map(Value::Int),
            Validator::Float(v) => v.check(value).map(Value::Float),
            Validator::Str(v) => v.check(value).map(Value::Str),
            Validator::Url => check_url(value).map(Value::Str),
            Validator::Bool => check_bool(value).map(Value::Bool),
        }
    }

    /// Type family name, as shown in listings.
    pub fn type_name(&self) -> &'static str {
        match self {
            Validator::Int(_) => "int",
            Validator::Float(_) => "float",
            Validator::Str(_) => "str",
            Validator::Url => "url",
            Validator::Bool => "bool",
        }
    }
}

impl From<IntValidator> for Validator {
    fn from(v: IntValidator) -> Self {
        Validator::Int(v)
    }
}

impl From<FloatValidator> for Validator {
    fn from(v: FloatValidator) -> Self {
        Validator::Float(v)
    }
}

impl From<StrValidator> for Validator {
    fn from(v: StrValidator) -> Self {
        Validator::Str(v)
    }
}

/// Unconstrained integer check.
pub fn check_int(value: impl Into<RawValue>) -> OptionResult<i64> {
    IntValidator::new().check(value)
}

/// Unconstrained float check.
pub fn check_float(value: impl Into<RawValue>) -> OptionResult<f64> {
    FloatValidator::new().check(value)
}

/// Unconstrained string check.
pub fn check_str(value: impl Into<RawValue>) -> OptionResult<String> {
    StrValidator::new().check(value)
}

/// URL check. Only decodability is enforced.
pub fn check_url(value: impl Into<RawValue>) -> OptionResult<String> {
    text(&value.into())
}

/// Boolean check: bools, 0/1, and the usual on/off words (case-insensitive).
pub fn check_bool(value: impl Into<RawValue>) -> OptionResult<bool> {
    let raw = value.into();
    match &raw {
        RawValue::Bool(b) => Ok(*b),
        RawValue::Int(0) => Ok(false),
        RawValue::Int(1) => Ok(true),
        RawValue::Text(_) | RawValue::Bytes(_) => {
            let s = text(&raw)?;
            let token = s.trim().to_lowercase();
            if TRUE_TOKENS.contains(&token.as_str()) {
                Ok(true)
            } else if FALSE_TOKENS.contains(&token.as_str()) {
                Ok(false)
            } else {
                Err(OptionError::invalid(format!(
                    "'{}' is not a recognized boolean value",
                    s
                )))
            }
        }
        other => Err(OptionError::invalid(format!(
            "{} is not a recognized boolean value",
            other
        ))),
    }
}
