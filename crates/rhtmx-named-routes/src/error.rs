//! Error types for building the registry and generating URLs

use std::error::Error as StdError;
use std::sync::Arc;

/// Failure of a registry build
///
/// Every variant is a configuration error: the route tree handed over by the
/// host router cannot produce a consistent name → path mapping.
/// `Clone` so one build outcome can be handed to every caller awaiting it.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RegistryError {
    /// The host router has no root route configuration
    #[error("router configuration not available")]
    MissingConfiguration,

    /// Two routes claim the same name
    #[error("duplicate route name '{name}': already registered for '{existing}', found again at '{duplicate}'")]
    DuplicateName {
        name: String,
        existing: String,
        duplicate: String,
    },

    /// A lazy child loader failed
    #[error("failed to load child routes at '{path}': {source}")]
    LoaderFailed {
        path: String,
        #[source]
        source: Arc<dyn StdError + Send + Sync + 'static>,
    },
}

impl RegistryError {
    pub(crate) fn loader_failed(path: impl Into<String>, error: anyhow::Error) -> Self {
        let boxed: Box<dyn StdError + Send + Sync + 'static> = error.into();
        RegistryError::LoaderFailed {
            path: path.into(),
            source: Arc::from(boxed),
        }
    }

    /// Returns true for duplicate-name failures
    pub fn is_duplicate_name(&self) -> bool {
        matches!(self, RegistryError::DuplicateName { .. })
    }
}

/// Interpolation could not satisfy every required placeholder
///
/// Carries all missing parameter names in pattern order, not just the first.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", self.describe())]
pub struct MissingParametersError {
    /// Pattern that was interpolated
    pub pattern: String,
    /// Route name, when interpolation was driven by a named lookup
    pub route_name: Option<String>,
    /// Missing required parameters, in pattern order
    pub missing: Vec<String>,
}

impl MissingParametersError {
    pub fn new(pattern: impl Into<String>, missing: Vec<String>) -> Self {
        Self {
            pattern: pattern.into(),
            route_name: None,
            missing,
        }
    }

    /// Attach the route name for diagnostics
    pub fn with_route_name(mut self, name: impl Into<String>) -> Self {
        self.route_name = Some(name.into());
        self
    }

    fn describe(&self) -> String {
        let missing = self.missing.join(", ");
        match &self.route_name {
            Some(name) => format!(
                "missing required parameters for route '{}' ({}): {}",
                name, self.pattern, missing
            ),
            None => format!(
                "missing required parameters for route pattern '{}': {}",
                self.pattern, missing
            ),
        }
    }
}

/// Failure to build a link to a named route
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LinkError {
    /// No route is registered under the name
    #[error("no route named '{0}'")]
    UnknownRoute(String),

    #[error(transparent)]
    MissingParameters(#[from] MissingParametersError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_parameters_message() {
        let err = MissingParametersError::new("users/:id/posts/:post", vec!["id".into(), "post".into()]);
        assert_eq!(
            err.to_string(),
            "missing required parameters for route pattern 'users/:id/posts/:post': id, post"
        );

        let err = err.with_route_name("user.post");
        assert_eq!(
            err.to_string(),
            "missing required parameters for route 'user.post' (users/:id/posts/:post): id, post"
        );
    }

    #[test]
    fn test_duplicate_name_message() {
        let err = RegistryError::DuplicateName {
            name: "home".into(),
            existing: "".into(),
            duplicate: "dashboard".into(),
        };
        assert!(err.is_duplicate_name());
        assert_eq!(
            err.to_string(),
            "duplicate route name 'home': already registered for '', found again at 'dashboard'"
        );
    }

    #[test]
    fn test_loader_failed_keeps_source() {
        let err = RegistryError::loader_failed("admin", anyhow::anyhow!("chunk missing"));
        assert_eq!(err.to_string(), "failed to load child routes at 'admin': chunk missing");
        assert_eq!(err.source().map(|s| s.to_string()), Some("chunk missing".to_string()));
        assert!(!err.is_duplicate_name());
    }
}
