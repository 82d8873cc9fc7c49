//! Route configuration tree consumed from the host router
//!
//! Contains the input side of the registry:
//! - `RouteNode`: one entry of the (possibly nested) route configuration
//! - `LazyRoutes`: deferred child routes resolved by an async loader
//! - `LoadedRoutes`: the closed set of shapes a lazy loader may produce
//! - `RouteSource`: the host router boundary (root routes + injected-routes lookup)

pub mod pattern;

// Re-export commonly used types
pub use pattern::{classify_segment, parse_param_with_constraint, PatternSegmentType};

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use parking_lot::RwLock;

type LoaderFn = dyn Fn() -> BoxFuture<'static, anyhow::Result<LoadedRoutes>> + Send + Sync;

/// Async loader for a deferred subtree of routes
///
/// Cheap to clone; every clone invokes the same loader.
#[derive(Clone)]
pub struct LazyRoutes {
    loader: Arc<LoaderFn>,
}

impl LazyRoutes {
    /// Wraps an async loader function
    ///
    /// # Examples
    ///
    /// ```
    /// use rhtmx_named_routes::{LazyRoutes, LoadedRoutes, RouteNode};
    ///
    /// let lazy = LazyRoutes::new(|| async {
    ///     Ok(LoadedRoutes::Routes(vec![RouteNode::new("settings").with_name("admin.settings")]))
    /// });
    /// ```
    pub fn new<F, Fut>(loader: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<LoadedRoutes>> + Send + 'static,
    {
        Self {
            loader: Arc::new(move || -> BoxFuture<'static, anyhow::Result<LoadedRoutes>> {
                loader().boxed()
            }),
        }
    }

    /// Invokes the loader
    pub async fn load(&self) -> anyhow::Result<LoadedRoutes> {
        (self.loader)().await
    }
}

impl fmt::Debug for LazyRoutes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LazyRoutes(..)")
    }
}

/// One entry in the route configuration tree
#[derive(Debug, Clone, Default)]
pub struct RouteNode {
    /// Path segment(s) relative to the parent; empty adds no segment
    pub path: String,
    /// Symbolic name, unique across the resolved tree
    pub name: Option<String>,
    /// Nested routes, resolved under this node's path
    pub children: Vec<RouteNode>,
    /// Deferred nested routes
    pub load_children: Option<LazyRoutes>,
}

impl RouteNode {
    /// Creates a route node for a path
    ///
    /// # Examples
    ///
    /// ```
    /// use rhtmx_named_routes::RouteNode;
    ///
    /// let node = RouteNode::new("users")
    ///     .with_children(vec![
    ///         RouteNode::new("").with_name("users.list"),
    ///         RouteNode::new(":id").with_name("users.detail"),
    ///     ]);
    ///
    /// assert_eq!(node.children.len(), 2);
    /// ```
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Sets the route name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets nested child routes
    pub fn with_children<I>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = RouteNode>,
    {
        self.children = children.into_iter().collect();
        self
    }

    /// Adds a single child route
    pub fn with_child(mut self, child: RouteNode) -> Self {
        self.children.push(child);
        self
    }

    /// Sets an async loader for deferred child routes
    pub fn with_lazy_children(mut self, loader: LazyRoutes) -> Self {
        self.load_children = Some(loader);
        self
    }
}

/// Module-like container produced by a lazy loader
#[derive(Debug, Clone, Default)]
pub struct LoadedModule {
    /// Module identifier, used for the host router's injected-routes lookup
    pub name: String,
    /// Routes exported as the module's default export
    pub default_export: Option<Vec<RouteNode>>,
    /// Routes exported under `routes`
    pub routes: Option<Vec<RouteNode>>,
}

impl LoadedModule {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_default_export(mut self, routes: Vec<RouteNode>) -> Self {
        self.default_export = Some(routes);
        self
    }

    pub fn with_routes(mut self, routes: Vec<RouteNode>) -> Self {
        self.routes = Some(routes);
        self
    }
}

/// Result of invoking a lazy loader
#[derive(Debug, Clone)]
pub enum LoadedRoutes {
    /// A direct sequence of routes
    Routes(Vec<RouteNode>),
    /// A module exposing routes through its exports or the host's injection context
    Module(LoadedModule),
    /// Any other value; the text describes it in diagnostics
    Opaque(String),
}

/// Host router boundary
///
/// The registry reads the root configuration through `routes()` on every build,
/// so a source that changes over time is reflected by `RouteRegistry::refresh`.
pub trait RouteSource: Send + Sync {
    /// Snapshot of the root route configuration, `None` when not available
    fn routes(&self) -> Option<Vec<RouteNode>>;

    /// Routes the host declared for a loaded module's injection context
    ///
    /// Last-resort lookup for lazy modules that export no routes themselves.
    fn injected_routes(&self, _module: &LoadedModule) -> Option<Vec<RouteNode>> {
        None
    }
}

/// Resolves a lazy loader's result into a route sequence
///
/// Shapes are tried in a fixed priority order:
/// 1. direct sequence
/// 2. module default export
/// 3. module `routes` export
/// 4. host injected-routes lookup
///
/// Returns `None` for an unrecognized shape; the caller treats it as an empty subtree.
pub fn normalize_loaded(loaded: LoadedRoutes, source: &dyn RouteSource) -> Option<Vec<RouteNode>> {
    match loaded {
        LoadedRoutes::Routes(routes) => Some(routes),
        LoadedRoutes::Module(LoadedModule {
            default_export: Some(routes),
            ..
        }) => Some(routes),
        LoadedRoutes::Module(LoadedModule {
            routes: Some(routes),
            ..
        }) => Some(routes),
        LoadedRoutes::Module(module) => source.injected_routes(&module),
        LoadedRoutes::Opaque(_) => None,
    }
}

/// In-memory route source
///
/// Holds a replaceable root configuration and a module name → routes table
/// for the injected-routes lookup.
///
/// # Examples
///
/// ```
/// use rhtmx_named_routes::{RouteNode, RouteSource, StaticRouteSource};
///
/// let source = StaticRouteSource::new(vec![RouteNode::new("about").with_name("about")]);
/// assert_eq!(source.routes().map(|r| r.len()), Some(1));
///
/// source.set_routes(vec![]);
/// assert_eq!(source.routes().map(|r| r.len()), Some(0));
/// ```
#[derive(Debug, Default)]
pub struct StaticRouteSource {
    routes: RwLock<Option<Vec<RouteNode>>>,
    injected: RwLock<HashMap<String, Vec<RouteNode>>>,
}

impl StaticRouteSource {
    pub fn new(routes: Vec<RouteNode>) -> Self {
        Self {
            routes: RwLock::new(Some(routes)),
            injected: RwLock::new(HashMap::new()),
        }
    }

    /// Source with no root configuration
    pub fn unavailable() -> Self {
        Self::default()
    }

    /// Registers routes declared for a module's injection context
    pub fn with_injected(self, module: impl Into<String>, routes: Vec<RouteNode>) -> Self {
        self.injected.write().insert(module.into(), routes);
        self
    }

    /// Replaces the root configuration
    pub fn set_routes(&self, routes: Vec<RouteNode>) {
        *self.routes.write() = Some(routes);
    }

    /// Removes the root configuration
    pub fn clear_routes(&self) {
        *self.routes.write() = None;
    }
}

impl RouteSource for StaticRouteSource {
    fn routes(&self) -> Option<Vec<RouteNode>> {
        self.routes.read().clone()
    }

    fn injected_routes(&self, module: &LoadedModule) -> Option<Vec<RouteNode>> {
        self.injected.read().get(&module.name).cloned()
    }
}
