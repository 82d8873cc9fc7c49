//! Named route registry
//!
//! Builds a route name → path pattern table from the host router's route
//! configuration, including lazily loaded subtrees, and serves lookups from it.
//!
//! ## Lifecycle
//!
//! `Empty → Building → Ready`, or `Empty → Building → Empty` when the build fails.
//! While `Building`, every `build()` caller awaits the same shared future, so the
//! route tree is traversed once no matter how many callers race.

use std::sync::{Arc, Weak};

use futures::future::{BoxFuture, FutureExt, Shared};
use indexmap::IndexMap;
use parking_lot::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::config::RegistryConfig;
use crate::error::{LinkError, RegistryError};
use crate::interpolate::{Interpolator, ParameterBag};
use crate::link::Link;
use crate::path::join_paths;
use crate::route::{normalize_loaded, LoadedRoutes, RouteNode, RouteSource};

type RouteTable = IndexMap<String, String>;
type BuildResult = Result<(), RegistryError>;
type SharedBuild = Shared<BoxFuture<'static, BuildResult>>;

enum BuildState {
    Empty,
    Building { generation: u64, pending: SharedBuild },
    Ready,
}

struct Lifecycle {
    state: BuildState,
    generation: u64,
}

struct Inner {
    source: Arc<dyn RouteSource>,
    config: RegistryConfig,
    routes: RwLock<RouteTable>,
    lifecycle: Mutex<Lifecycle>,
}

/// Registry of named routes
///
/// Cheap to clone; clones share the same table and build state.
///
/// # Examples
///
/// ```
/// use rhtmx_named_routes::{params, RouteNode, RouteRegistry, StaticRouteSource};
/// use std::sync::Arc;
///
/// # futures::executor::block_on(async {
/// let source = Arc::new(StaticRouteSource::new(vec![
///     RouteNode::new("users").with_children(vec![
///         RouteNode::new(":id").with_name("user.profile"),
///     ]),
/// ]));
///
/// let registry = RouteRegistry::new(source);
/// registry.build().await.unwrap();
///
/// assert_eq!(registry.lookup("user.profile"), Some("users/:id".to_string()));
/// assert_eq!(
///     registry.url_for("user.profile", &params([("id", 7)])).unwrap(),
///     "/users/7"
/// );
/// # });
/// ```
#[derive(Clone)]
pub struct RouteRegistry {
    inner: Arc<Inner>,
}

impl RouteRegistry {
    /// Creates an empty registry over a route source
    pub fn new(source: Arc<dyn RouteSource>) -> Self {
        Self::with_config(source, RegistryConfig::default())
    }

    /// Creates an empty registry with explicit configuration
    pub fn with_config(source: Arc<dyn RouteSource>, config: RegistryConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                source,
                config,
                routes: RwLock::new(RouteTable::new()),
                lifecycle: Mutex::new(Lifecycle {
                    state: BuildState::Empty,
                    generation: 0,
                }),
            }),
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.inner.config
    }

    /// Interpolator using this registry's placeholder syntax
    pub fn interpolator(&self) -> Interpolator {
        Interpolator::new(self.inner.config.syntax)
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Builds the registry from the source's current route configuration
    ///
    /// - Already built: returns immediately
    /// - Build in flight: waits for that build instead of starting another
    /// - Otherwise: traverses the route tree, awaiting lazy loaders in order
    ///
    /// The table is published only when the whole traversal succeeds.
    pub async fn build(&self) -> Result<(), RegistryError> {
        let pending = {
            let mut lifecycle = self.inner.lifecycle.lock();
            match &lifecycle.state {
                BuildState::Ready => return Ok(()),
                BuildState::Building { pending, .. } => pending.clone(),
                BuildState::Empty => {
                    lifecycle.generation += 1;
                    let generation = lifecycle.generation;
                    let pending = self.start_build(generation);
                    lifecycle.state = BuildState::Building {
                        generation,
                        pending: pending.clone(),
                    };
                    pending
                }
            }
        };

        pending.await
    }

    /// Clears the table and forgets any in-flight build
    ///
    /// An in-flight lazy loader keeps running; its result is discarded.
    pub fn reset(&self) {
        let mut lifecycle = self.inner.lifecycle.lock();
        lifecycle.state = BuildState::Empty;
        self.inner.routes.write().clear();
    }

    /// Resets and rebuilds from the source's current configuration
    pub async fn refresh(&self) -> Result<(), RegistryError> {
        self.reset();
        self.build().await
    }

    /// Returns true once a build has published its table
    pub fn is_ready(&self) -> bool {
        matches!(self.inner.lifecycle.lock().state, BuildState::Ready)
    }

    fn start_build(&self, generation: u64) -> SharedBuild {
        let source = Arc::clone(&self.inner.source);
        let registry: Weak<Inner> = Arc::downgrade(&self.inner);

        async move {
            let outcome = collect_routes(source).await;
            match registry.upgrade() {
                Some(inner) => inner.finish_build(generation, outcome),
                None => outcome.map(|_| ()),
            }
        }
        .boxed()
        .shared()
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Looks up the path pattern registered under a name
    ///
    /// Absence is a normal outcome, not an error. Blank names and, after a
    /// successful build, unknown names are reported as warnings.
    pub fn lookup(&self, name: &str) -> Option<String> {
        let name = name.trim();
        if name.is_empty() {
            warn!("Route lookup with a blank name");
            return None;
        }

        if let Some(path) = self.inner.routes.read().get(name) {
            return Some(path.clone());
        }

        if self.inner.config.warn_unknown_names && self.is_ready() {
            warn!(name = %name, "No route registered under this name");
        }
        None
    }

    pub fn has_route(&self, name: &str) -> bool {
        self.inner.routes.read().contains_key(name.trim())
    }

    /// Registered names in registration order
    pub fn all_names(&self) -> Vec<String> {
        self.inner.routes.read().keys().cloned().collect()
    }

    /// `(name, path pattern)` pairs in registration order
    pub fn entries(&self) -> Vec<(String, String)> {
        self.inner
            .routes
            .read()
            .iter()
            .map(|(name, path)| (name.clone(), path.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.inner.routes.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.routes.read().is_empty()
    }

    // ========================================================================
    // URL Generation
    // ========================================================================

    /// Generates a URL path for a named route
    ///
    /// Shorthand for `Link::to(name).params(..).resolve(self)`.
    pub fn url_for(&self, name: &str, params: &ParameterBag) -> Result<String, LinkError> {
        Link::to(name).with_params(params.clone()).resolve(self)
    }
}

impl Inner {
    fn finish_build(&self, generation: u64, outcome: Result<RouteTable, RegistryError>) -> BuildResult {
        let mut lifecycle = self.lifecycle.lock();
        let current = matches!(
            lifecycle.state,
            BuildState::Building { generation: g, .. } if g == generation
        );

        if !current {
            debug!(generation, "Discarding result of a superseded route build");
            return outcome.map(|_| ());
        }

        match outcome {
            Ok(table) => {
                info!(routes = table.len(), "Named route registry built");
                *self.routes.write() = table;
                lifecycle.state = BuildState::Ready;
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "Named route registry build failed");
                self.routes.write().clear();
                lifecycle.state = BuildState::Empty;
                Err(err)
            }
        }
    }
}

// ============================================================================
// Traversal
// ============================================================================

async fn collect_routes(source: Arc<dyn RouteSource>) -> Result<RouteTable, RegistryError> {
    let roots = source.routes().ok_or(RegistryError::MissingConfiguration)?;

    let mut collector = RouteCollector {
        source: source.as_ref(),
        table: RouteTable::new(),
    };
    collector.walk(&roots, "").await?;

    Ok(collector.table)
}

/// Depth-first walk accumulating a fresh route table
struct RouteCollector<'s> {
    source: &'s dyn RouteSource,
    table: RouteTable,
}

impl<'s> RouteCollector<'s> {
    /// Walks nodes in order; a node's children come before its lazy children
    fn walk<'a>(
        &'a mut self,
        nodes: &'a [RouteNode],
        parent: &'a str,
    ) -> BoxFuture<'a, Result<(), RegistryError>> {
        async move {
            for node in nodes {
                let full_path = join_paths(parent, &node.path).into_owned();
                self.register(node, &full_path)?;

                if !node.children.is_empty() {
                    self.walk(&node.children, &full_path).await?;
                }

                if let Some(lazy) = &node.load_children {
                    debug!(path = %full_path, "Loading lazy child routes");
                    let loaded = lazy
                        .load()
                        .await
                        .map_err(|e| RegistryError::loader_failed(full_path.clone(), e))?;
                    let children = self.resolve_lazy(loaded, &full_path);
                    self.walk(&children, &full_path).await?;
                }
            }
            Ok(())
        }
        .boxed()
    }

    fn register(&mut self, node: &RouteNode, full_path: &str) -> Result<(), RegistryError> {
        let Some(raw_name) = node.name.as_deref() else {
            return Ok(());
        };

        let name = raw_name.trim();
        if name.is_empty() {
            warn!(path = %full_path, "Skipping route with a blank name");
            return Ok(());
        }

        if let Some(existing) = self.table.get(name) {
            return Err(RegistryError::DuplicateName {
                name: name.to_string(),
                existing: existing.clone(),
                duplicate: full_path.to_string(),
            });
        }

        debug!(name = %name, path = %full_path, "Registered named route");
        self.table.insert(name.to_string(), full_path.to_string());
        Ok(())
    }

    fn resolve_lazy(&self, loaded: LoadedRoutes, path: &str) -> Vec<RouteNode> {
        let shape = match &loaded {
            LoadedRoutes::Routes(_) => "route list".to_string(),
            LoadedRoutes::Module(module) => format!("module '{}'", module.name),
            LoadedRoutes::Opaque(description) => description.clone(),
        };

        normalize_loaded(loaded, self.source).unwrap_or_else(|| {
            warn!(path = %path, shape = %shape, "Unrecognized lazy route shape; no routes loaded");
            Vec::new()
        })
    }
}
