//! Path utilities for joining route configuration paths
//!
//! All functions are **pure**: given same input, always produce same output with no side effects.
//! Paths here are relative route-config paths (`users/:id`), not request paths,
//! so no leading `/` is added or required.

use std::borrow::Cow;

/// Joins a parent route path with a child route path
///
/// **Pure function** with zero-copy optimization using `Cow<'_, str>`.
///
/// # Rules
///
/// - Empty child: parent is carried forward unchanged (`"users/" + ""` → `"users/"`)
/// - Empty parent: child is used as-is (`"" + "users"` → `"users"`)
/// - Otherwise joined with a single `/`, repeated separators collapsed
///
/// # Examples
///
/// ```
/// use rhtmx_named_routes::path::join_paths;
///
/// assert_eq!(join_paths("users/", ""), "users/");
/// assert_eq!(join_paths("", "users"), "users");
/// assert_eq!(join_paths("users", ":id"), "users/:id");
/// assert_eq!(join_paths("users/", "/:id"), "users/:id");
/// ```
pub fn join_paths<'a>(parent: &'a str, child: &'a str) -> Cow<'a, str> {
    match (parent.is_empty(), child.is_empty()) {
        (_, true) => Cow::Borrowed(parent),
        (true, false) => collapse_separators(child),
        (false, false) => {
            let joined = format!("{}/{}", parent, child);
            Cow::Owned(collapse_separators(&joined).into_owned())
        }
    }
}

/// Collapses runs of `/` into a single separator
///
/// Returns `Cow::Borrowed` when the input has no repeated separators.
///
/// # Examples
///
/// ```
/// use rhtmx_named_routes::path::collapse_separators;
/// use std::borrow::Cow;
///
/// assert!(matches!(collapse_separators("a/b"), Cow::Borrowed("a/b")));
/// assert_eq!(collapse_separators("a//b///c"), "a/b/c");
/// ```
pub fn collapse_separators(path: &str) -> Cow<'_, str> {
    if !path.contains("//") {
        return Cow::Borrowed(path);
    }

    let mut collapsed = String::with_capacity(path.len());
    let mut previous_was_separator = false;
    for ch in path.chars() {
        if ch == '/' {
            if !previous_was_separator {
                collapsed.push(ch);
            }
            previous_was_separator = true;
        } else {
            collapsed.push(ch);
            previous_was_separator = false;
        }
    }
    Cow::Owned(collapsed)
}

/// Splits a path into its non-empty segments
///
/// Consecutive, leading and trailing separators produce no segments.
///
/// # Examples
///
/// ```
/// use rhtmx_named_routes::path::segments;
///
/// let parts: Vec<&str> = segments("/users//:id/").collect();
/// assert_eq!(parts, vec!["users", ":id"]);
/// ```
pub fn segments(path: &str) -> impl Iterator<Item = &str> + '_ {
    path.split('/').filter(|s| !s.is_empty())
}
