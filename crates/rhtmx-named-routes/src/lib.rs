//! # RHTMX Named Routes
//!
//! Name-based navigation for a host router:
//! - **Registry**: walks the route configuration (nested and lazily loaded
//!   children) and records a name → path pattern table
//! - **Interpolation**: fills a path pattern's placeholders from a parameter bag
//! - **Links**: name + parameters + query + fragment → URL string
//!
//! ## Path Patterns
//!
//! Patterns use the router syntax, configurable via [`PatternSyntax`]:
//! - Static segments: `users`
//! - Required parameters: `:id`
//! - Optional parameters: `:id?`
//! - Constraints are tolerated and ignored: `:id(\d+)`
//!
//! ## Building
//!
//! The registry is built once, on demand. Concurrent callers share one build;
//! a failed build publishes nothing and leaves the registry empty.
//!
//! ## Example
//!
//! ```
//! use rhtmx_named_routes::{params, LazyRoutes, LoadedRoutes, RouteNode, RouteRegistry, StaticRouteSource};
//! use std::sync::Arc;
//!
//! # futures::executor::block_on(async {
//! let source = Arc::new(StaticRouteSource::new(vec![
//!     RouteNode::new("").with_name("home"),
//!     RouteNode::new("admin").with_lazy_children(LazyRoutes::new(|| async {
//!         Ok(LoadedRoutes::Routes(vec![
//!             RouteNode::new("users/:id").with_name("admin.user"),
//!         ]))
//!     })),
//! ]));
//!
//! let registry = RouteRegistry::new(source);
//! registry.build().await.unwrap();
//!
//! assert_eq!(registry.lookup("home"), Some(String::new()));
//! assert_eq!(registry.lookup("admin.user"), Some("admin/users/:id".to_string()));
//!
//! let segments = registry
//!     .interpolator()
//!     .interpolate("admin/users/:id", &params([("id", 42)]))
//!     .unwrap();
//! assert_eq!(segments, vec!["admin", "users", "42"]);
//! # });
//! ```

// ============================================================================
// Module Declarations
// ============================================================================

pub mod config;
pub mod error;
pub mod interpolate;
pub mod link;
pub mod path;
pub mod registry;
pub mod route;

// Re-export public types
pub use config::{PatternSyntax, RegistryConfig};
pub use error::{LinkError, MissingParametersError, RegistryError};
pub use interpolate::{interpolate, params, Interpolator, ParamValue, ParameterBag};
pub use link::Link;
pub use registry::RouteRegistry;
pub use route::{LazyRoutes, LoadedModule, LoadedRoutes, RouteNode, RouteSource, StaticRouteSource};
