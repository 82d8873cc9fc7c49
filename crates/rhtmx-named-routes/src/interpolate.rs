//! Path parameter interpolation
//!
//! Turns a path pattern plus a parameter bag into the ordered path segments
//! handed to a URL-tree constructor.

use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;

use crate::config::PatternSyntax;
use crate::error::MissingParametersError;
use crate::path::segments;
use crate::route::pattern::{classify_segment, PatternSegmentType};

/// Scalar value supplied for a path parameter
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
    /// Explicitly absent; treated like a missing entry
    Null,
}

impl ParamValue {
    pub fn is_null(&self) -> bool {
        matches!(self, ParamValue::Null)
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Bool(value) => write!(f, "{}", value),
            ParamValue::Int(value) => write!(f, "{}", value),
            ParamValue::UInt(value) => write!(f, "{}", value),
            ParamValue::Float(value) => write!(f, "{}", value),
            ParamValue::Text(value) => f.write_str(value),
            ParamValue::Null => Ok(()),
        }
    }
}

macro_rules! impl_from_scalar {
    ($($ty:ty => $variant:ident as $target:ty),* $(,)?) => {
        $(
            impl From<$ty> for ParamValue {
                fn from(value: $ty) -> Self {
                    ParamValue::$variant(<$target>::from(value))
                }
            }
        )*
    };
}

impl_from_scalar! {
    bool => Bool as bool,
    i8 => Int as i64,
    i16 => Int as i64,
    i32 => Int as i64,
    i64 => Int as i64,
    u8 => UInt as u64,
    u16 => UInt as u64,
    u32 => UInt as u64,
    u64 => UInt as u64,
    f64 => Float as f64,
    String => Text as String,
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

/// Keeps the `f32`'s own shortest decimal form (`0.1f32` → `0.1`)
impl From<f32> for ParamValue {
    fn from(value: f32) -> Self {
        let canonical = value.to_string().parse::<f64>().unwrap_or(f64::from(value));
        ParamValue::Float(canonical)
    }
}

impl From<usize> for ParamValue {
    fn from(value: usize) -> Self {
        ParamValue::UInt(value as u64)
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(ParamValue::Null)
    }
}

/// Parameter name → value
pub type ParameterBag = HashMap<String, ParamValue>;

/// Builds a parameter bag from `(name, value)` pairs
///
/// # Examples
///
/// ```
/// use rhtmx_named_routes::{params, ParamValue};
///
/// let bag = params([("id", ParamValue::from(42)), ("tab", "posts".into())]);
/// assert_eq!(bag.get("id"), Some(&ParamValue::Int(42)));
/// ```
pub fn params<I, K, V>(pairs: I) -> ParameterBag
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<ParamValue>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Interpolates path patterns with a configured placeholder syntax
#[derive(Debug, Clone, Copy, Default)]
pub struct Interpolator {
    syntax: PatternSyntax,
}

impl Interpolator {
    pub fn new(syntax: PatternSyntax) -> Self {
        Self { syntax }
    }

    pub fn syntax(&self) -> &PatternSyntax {
        &self.syntax
    }

    /// Turns a pattern and parameters into path segments
    ///
    /// - Empty or absent pattern → `["/"]`
    /// - Literal segments are copied verbatim
    /// - Present parameter values are percent-encoded
    /// - Absent optional parameters are omitted
    /// - Absent required parameters are all collected before failing
    ///
    /// # Examples
    ///
    /// ```
    /// use rhtmx_named_routes::{params, Interpolator};
    ///
    /// let interpolator = Interpolator::default();
    ///
    /// let segments = interpolator.interpolate("users/:id", &params([("id", 123)])).unwrap();
    /// assert_eq!(segments, vec!["users", "123"]);
    ///
    /// let err = interpolator.interpolate("users/:id/:tab", &params::<_, &str, i32>([])).unwrap_err();
    /// assert_eq!(err.missing, vec!["id", "tab"]);
    /// ```
    pub fn interpolate<'a>(
        &self,
        pattern: impl Into<Option<&'a str>>,
        params: &ParameterBag,
    ) -> Result<Vec<String>, MissingParametersError> {
        let pattern = match pattern.into() {
            Some(pattern) if !pattern.is_empty() => pattern,
            _ => return Ok(vec!["/".to_string()]),
        };

        let mut resolved = Vec::new();
        let mut missing = Vec::new();

        for segment in segments(pattern) {
            let (name, optional) = match classify_segment(segment, &self.syntax) {
                PatternSegmentType::Static(literal) => {
                    resolved.push(literal.to_string());
                    continue;
                }
                PatternSegmentType::Required(name, _) => (name, false),
                PatternSegmentType::Optional(name, _) => (name, true),
            };

            match params.get(name).filter(|value| !value.is_null()) {
                Some(value) => resolved.push(urlencoding::encode(&value.to_string()).into_owned()),
                None if optional => {}
                None => missing.push(name.to_string()),
            }
        }

        if missing.is_empty() {
            Ok(resolved)
        } else {
            Err(MissingParametersError::new(pattern, missing))
        }
    }
}

/// Interpolates a pattern using the default `:name` / `:name?` syntax
///
/// # Examples
///
/// ```
/// use rhtmx_named_routes::{interpolate, params};
///
/// assert_eq!(interpolate("", &params::<_, &str, i32>([])).unwrap(), vec!["/"]);
/// assert_eq!(interpolate(None::<&str>, &params::<_, &str, i32>([])).unwrap(), vec!["/"]);
/// assert_eq!(interpolate("users/:id?", &params([("id", 5)])).unwrap(), vec!["users", "5"]);
/// ```
pub fn interpolate<'a>(
    pattern: impl Into<Option<&'a str>>,
    params: &ParameterBag,
) -> Result<Vec<String>, MissingParametersError> {
    Interpolator::default().interpolate(pattern, params)
}
