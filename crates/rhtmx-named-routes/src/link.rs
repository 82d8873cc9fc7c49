//! Link builder for named routes
//!
//! Composes a registry lookup with interpolation and serializes the result
//! as a URL path with optional query string and fragment.

use crate::error::LinkError;
use crate::interpolate::{ParamValue, ParameterBag};
use crate::registry::RouteRegistry;

/// Link to a named route
///
/// # Examples
///
/// ```
/// use rhtmx_named_routes::{Link, RouteNode, RouteRegistry, StaticRouteSource};
/// use std::sync::Arc;
///
/// # futures::executor::block_on(async {
/// let registry = RouteRegistry::new(Arc::new(StaticRouteSource::new(vec![
///     RouteNode::new("posts/:slug").with_name("post.show"),
/// ])));
/// registry.build().await.unwrap();
///
/// let url = Link::to("post.show")
///     .param("slug", "hello world")
///     .query("page", 2)
///     .fragment("comments")
///     .resolve(&registry)
///     .unwrap();
///
/// assert_eq!(url, "/posts/hello%20world?page=2#comments");
/// # });
/// ```
#[derive(Debug, Clone, Default)]
pub struct Link {
    name: String,
    params: ParameterBag,
    query: Vec<(String, String)>,
    fragment: Option<String>,
}

impl Link {
    /// Starts a link to the route registered under `name`
    pub fn to(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets a path parameter
    pub fn param(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Merges a parameter bag; later values win
    pub fn with_params(mut self, params: ParameterBag) -> Self {
        self.params.extend(params);
        self
    }

    /// Appends a query parameter; null values are skipped
    pub fn query(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        let value = value.into();
        if !value.is_null() {
            self.query.push((key.into(), value.to_string()));
        }
        self
    }

    pub fn fragment(mut self, fragment: impl Into<String>) -> Self {
        self.fragment = Some(fragment.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resolves the link against a built registry
    ///
    /// Fails with `UnknownRoute` when the name is not registered and with
    /// `MissingParameters` (route name attached) when interpolation fails.
    pub fn resolve(&self, registry: &RouteRegistry) -> Result<String, LinkError> {
        let name = self.name.trim();
        let pattern = registry
            .lookup(name)
            .ok_or_else(|| LinkError::UnknownRoute(name.to_string()))?;

        let segments = registry
            .interpolator()
            .interpolate(pattern.as_str(), &self.params)
            .map_err(|e| e.with_route_name(name))?;

        Ok(serialize_url(&segments, &self.query, self.fragment.as_deref()))
    }
}

/// Serializes path segments, query pairs and fragment into a URL string
///
/// `["/"]` and `[]` both render as the root path. Query keys, values and the
/// fragment are percent-encoded; segments are assumed to be encoded already.
///
/// # Examples
///
/// ```
/// use rhtmx_named_routes::link::serialize_url;
///
/// assert_eq!(serialize_url(&["/".to_string()], &[], None), "/");
/// assert_eq!(
///     serialize_url(
///         &["search".to_string()],
///         &[("q".to_string(), "a&b".to_string())],
///         Some("top"),
///     ),
///     "/search?q=a%26b#top"
/// );
/// ```
pub fn serialize_url(segments: &[String], query: &[(String, String)], fragment: Option<&str>) -> String {
    let path: Vec<&str> = segments
        .iter()
        .map(String::as_str)
        .filter(|segment| *segment != "/")
        .collect();

    let mut url = format!("/{}", path.join("/"));

    if !query.is_empty() {
        let pairs: Vec<String> = query
            .iter()
            .map(|(key, value)| format!("{}={}", urlencoding::encode(key), urlencoding::encode(value)))
            .collect();
        url.push('?');
        url.push_str(&pairs.join("&"));
    }

    if let Some(fragment) = fragment {
        url.push('#');
        url.push_str(&urlencoding::encode(fragment));
    }

    url
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(segments: &[&str]) -> Vec<String> {
        segments.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_serialize_root() {
        assert_eq!(serialize_url(&[], &[], None), "/");
        assert_eq!(serialize_url(&strings(&["/"]), &[], None), "/");
    }

    #[test]
    fn test_serialize_query_keeps_insertion_order() {
        let query = vec![
            ("z".to_string(), "1".to_string()),
            ("a".to_string(), "2".to_string()),
        ];
        assert_eq!(
            serialize_url(&strings(&["users", "7"]), &query, None),
            "/users/7?z=1&a=2"
        );
    }

    #[test]
    fn test_serialize_encodes_fragment() {
        assert_eq!(
            serialize_url(&strings(&["docs"]), &[], Some("section 2")),
            "/docs#section%202"
        );
    }

    #[test]
    fn test_null_query_value_skipped() {
        let link = Link::to("home").query("page", None::<i32>).query("sort", "asc");
        assert_eq!(link.query, vec![("sort".to_string(), "asc".to_string())]);
    }

    #[test]
    fn test_with_params_merges() {
        let link = Link::to("user")
            .param("id", 1)
            .with_params(crate::interpolate::params([("id", 2), ("tab", 3)]));
        assert_eq!(link.params.get("id"), Some(&ParamValue::Int(2)));
        assert_eq!(link.params.len(), 2);
        assert_eq!(link.name(), "user");
    }
}
