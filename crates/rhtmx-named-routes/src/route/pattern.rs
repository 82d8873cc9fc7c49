//! Pattern parsing for route path segments
//!
//! Pure functional parsing of router-style path patterns (`users/:id(\d+)?`) into typed segments.
//! All functions are **pure**: same input → same output, no side effects.

use crate::config::PatternSyntax;

/// Represents the types of path pattern segments
///
/// Functional sum type for classifying pattern segments.
/// Parameter variants carry the parameter name and the raw constraint text, if any.
/// The constraint belongs to the host router's matcher and is never checked here.
///
/// # Examples
///
/// ```
/// use rhtmx_named_routes::route::pattern::{classify_segment, PatternSegmentType};
/// use rhtmx_named_routes::PatternSyntax;
///
/// let syntax = PatternSyntax::default();
///
/// // Static segment
/// let seg = classify_segment("users", &syntax);
/// assert!(matches!(seg, PatternSegmentType::Static("users")));
///
/// // Required parameter
/// let seg = classify_segment(":id", &syntax);
/// assert!(matches!(seg, PatternSegmentType::Required("id", None)));
///
/// // Optional parameter with constraint
/// let seg = classify_segment(r":id(\d+)?", &syntax);
/// assert!(matches!(seg, PatternSegmentType::Optional("id", Some(r"\d+"))));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternSegmentType<'a> {
    /// Optional parameter: `:id?` or `:id(\d+)?`
    Optional(&'a str, Option<&'a str>),
    /// Required parameter: `:id` or `:id(\d+)`
    Required(&'a str, Option<&'a str>),
    /// Literal text segment
    Static(&'a str),
}

impl<'a> PatternSegmentType<'a> {
    /// Parameter name, `None` for static segments
    pub fn param_name(&self) -> Option<&'a str> {
        match *self {
            PatternSegmentType::Optional(name, _) | PatternSegmentType::Required(name, _) => {
                Some(name)
            }
            PatternSegmentType::Static(_) => None,
        }
    }

    pub fn is_optional(&self) -> bool {
        matches!(self, PatternSegmentType::Optional(_, _))
    }
}

/// Classifies a segment into a pattern type (pure function)
///
/// # Parsing Rules (evaluated in order)
///
/// 1. **Marker**: segments not starting with the parameter marker are static
/// 2. **Optionality**: a trailing optional marker is stripped and remembered
/// 3. **Constraint**: a trailing parenthesized suffix is stripped
/// 4. **Name**: what remains is the parameter name
///
/// # Performance
///
/// - O(n) where n is segment length
/// - Zero allocations (all variants borrow from the input)
pub fn classify_segment<'a>(segment: &'a str, syntax: &PatternSyntax) -> PatternSegmentType<'a> {
    let Some(param) = segment.strip_prefix(syntax.param_marker) else {
        return PatternSegmentType::Static(segment);
    };

    match param.strip_suffix(syntax.optional_marker) {
        Some(param_part) => {
            let (name, constraint) = parse_param_with_constraint(param_part);
            PatternSegmentType::Optional(name, constraint)
        }
        None => {
            let (name, constraint) = parse_param_with_constraint(param);
            PatternSegmentType::Required(name, constraint)
        }
    }
}

/// Parses parameter name and optional constraint suffix (pure function)
///
/// **Functional parser**: Maps `"name"` or `"name(constraint)"` → `(name, Option<constraint>)`.
/// A `(` without a closing `)` at the end is treated as part of the name.
///
/// # Examples
///
/// ```
/// use rhtmx_named_routes::route::pattern::parse_param_with_constraint;
///
/// assert_eq!(parse_param_with_constraint("id"), ("id", None));
/// assert_eq!(parse_param_with_constraint(r"id(\d+)"), ("id", Some(r"\d+")));
/// assert_eq!(parse_param_with_constraint("slug([a-z]+(-[a-z]+)*)"), ("slug", Some("[a-z]+(-[a-z]+)*")));
/// ```
pub fn parse_param_with_constraint(param: &str) -> (&str, Option<&str>) {
    param
        .strip_suffix(')')
        .and_then(|inner| inner.split_once('('))
        .map(|(name, constraint)| (name, Some(constraint)))
        .unwrap_or((param, None))
}

/// A placeholder found in a path pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternParam {
    pub name: String,
    pub optional: bool,
    pub constraint: Option<String>,
}

/// Lists the placeholders of a pattern in pattern order
///
/// # Examples
///
/// ```
/// use rhtmx_named_routes::route::pattern::pattern_params;
/// use rhtmx_named_routes::PatternSyntax;
///
/// let params = pattern_params("posts/:year(\\d{4})/:slug?", &PatternSyntax::default());
/// assert_eq!(params.len(), 2);
/// assert_eq!(params[0].name, "year");
/// assert!(params[1].optional);
/// ```
pub fn pattern_params(pattern: &str, syntax: &PatternSyntax) -> Vec<PatternParam> {
    crate::path::segments(pattern)
        .map(|segment| classify_segment(segment, syntax))
        .filter_map(|segment| match segment {
            PatternSegmentType::Required(name, constraint) => Some((name, false, constraint)),
            PatternSegmentType::Optional(name, constraint) => Some((name, true, constraint)),
            PatternSegmentType::Static(_) => None,
        })
        .map(|(name, optional, constraint)| PatternParam {
            name: name.to_string(),
            optional,
            constraint: constraint.map(str::to_string),
        })
        .collect()
}
