//! Named route registry configuration types

use serde::Deserialize;

/// Placeholder syntax used in path patterns
///
/// Defaults to the common router syntax: `:name` for a parameter and a trailing `?`
/// for an optional one (`users/:id?`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PatternSyntax {
    /// Character that starts a placeholder segment
    pub param_marker: char,

    /// Trailing character that marks a placeholder as optional
    pub optional_marker: char,
}

impl Default for PatternSyntax {
    fn default() -> Self {
        Self {
            param_marker: ':',
            optional_marker: '?',
        }
    }
}

/// Registry configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Placeholder syntax for interpolation
    pub syntax: PatternSyntax,

    /// Log a warning when a name is looked up after a build and not found
    pub warn_unknown_names: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            syntax: PatternSyntax::default(),
            warn_unknown_names: true,
        }
    }
}

/// TOML document wrapper for rhtmx.toml
#[derive(Debug, Default, Deserialize)]
struct TomlDocument {
    #[serde(default)]
    named_routes: RegistryConfig,
}

impl RegistryConfig {
    /// Read the `[named_routes]` table of an rhtmx.toml document
    ///
    /// A document without the table yields the default configuration;
    /// other tables are ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use rhtmx_named_routes::RegistryConfig;
    ///
    /// let config = RegistryConfig::from_toml_str(r#"
    ///     [named_routes]
    ///     warn_unknown_names = false
    ///
    ///     [named_routes.syntax]
    ///     param_marker = "$"
    /// "#).unwrap();
    ///
    /// assert!(!config.warn_unknown_names);
    /// assert_eq!(config.syntax.param_marker, '$');
    /// assert_eq!(config.syntax.optional_marker, '?');
    /// ```
    pub fn from_toml_str(source: &str) -> anyhow::Result<Self> {
        let document: TomlDocument = toml::from_str(source)
            .map_err(|e| anyhow::anyhow!("Invalid [named_routes] configuration: {}", e))?;

        let syntax = document.named_routes.syntax;
        if syntax.param_marker == '/' || syntax.optional_marker == '/' {
            anyhow::bail!("Pattern markers cannot be the path separator '/'");
        }
        if syntax.param_marker == syntax.optional_marker {
            anyhow::bail!(
                "Parameter marker and optional marker must differ (both are '{}')",
                syntax.param_marker
            );
        }

        Ok(document.named_routes)
    }
}
