//! Integration tests for the named route registry
//!
//! Covers:
//! - Path joining across nested and lazy children
//! - Duplicate name detection
//! - Build coalescing and idempotence
//! - Refresh and reset
//! - Lazy result normalization
//! - Build failures

use pretty_assertions::assert_eq;
use rhtmx_named_routes::*;
use rstest::rstest;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn source(routes: Vec<RouteNode>) -> Arc<StaticRouteSource> {
    Arc::new(StaticRouteSource::new(routes))
}

/// Lazy loader returning `routes` and counting its invocations
fn counted_loader(counter: Arc<AtomicUsize>, routes: Vec<RouteNode>) -> LazyRoutes {
    LazyRoutes::new(move || {
        counter.fetch_add(1, Ordering::SeqCst);
        let routes = routes.clone();
        async move { Ok(LoadedRoutes::Routes(routes)) }
    })
}

fn app_routes() -> Vec<RouteNode> {
    vec![
        RouteNode::new("").with_name("home"),
        RouteNode::new("about").with_name("about"),
        RouteNode::new("users").with_children(vec![
            RouteNode::new("").with_name("users.list"),
            RouteNode::new(":id").with_name("users.detail").with_children(vec![
                RouteNode::new("posts/:postId?").with_name("users.posts"),
            ]),
        ]),
        RouteNode::new("admin").with_lazy_children(LazyRoutes::new(|| async {
            Ok(LoadedRoutes::Routes(vec![
                RouteNode::new("settings").with_name("admin.settings"),
                RouteNode::new("reports").with_lazy_children(LazyRoutes::new(|| async {
                    Ok(LoadedRoutes::Routes(vec![
                        RouteNode::new(":year").with_name("admin.reports.year"),
                    ]))
                })),
            ]))
        })),
    ]
}

// ============================================================================
// Building
// ============================================================================

#[rstest]
#[case("home", "")]
#[case("about", "about")]
#[case("users.list", "users")]
#[case("users.detail", "users/:id")]
#[case("users.posts", "users/:id/posts/:postId?")]
#[case("admin.settings", "admin/settings")]
#[case("admin.reports.year", "admin/reports/:year")]
#[tokio::test]
async fn test_build_registers_joined_paths(#[case] name: &str, #[case] expected: &str) {
    let registry = RouteRegistry::new(source(app_routes()));
    registry.build().await.unwrap();

    assert_eq!(registry.lookup(name), Some(expected.to_string()));
    assert!(registry.has_route(name));
}

#[tokio::test]
async fn test_all_names_in_registration_order() {
    let registry = RouteRegistry::new(source(app_routes()));
    registry.build().await.unwrap();

    assert_eq!(
        registry.all_names(),
        vec![
            "home",
            "about",
            "users.list",
            "users.detail",
            "users.posts",
            "admin.settings",
            "admin.reports.year",
        ]
    );
    assert_eq!(registry.len(), 7);
    assert!(registry.is_ready());
}

#[tokio::test]
async fn test_children_walked_before_lazy_children() {
    let registry = RouteRegistry::new(source(vec![RouteNode::new("shop")
        .with_child(RouteNode::new("cart").with_name("shop.cart"))
        .with_lazy_children(LazyRoutes::new(|| async {
            Ok(LoadedRoutes::Routes(vec![
                RouteNode::new("checkout").with_name("shop.checkout"),
            ]))
        }))]));

    registry.build().await.unwrap();

    assert_eq!(registry.all_names(), vec!["shop.cart", "shop.checkout"]);
}

#[tokio::test]
async fn test_names_are_trimmed() {
    let registry = RouteRegistry::new(source(vec![RouteNode::new("faq").with_name("  faq ")]));
    registry.build().await.unwrap();

    assert_eq!(registry.all_names(), vec!["faq"]);
    assert_eq!(registry.lookup(" faq"), Some("faq".to_string()));
}

#[tokio::test]
async fn test_separators_collapsed_when_joining() {
    let registry = RouteRegistry::new(source(vec![RouteNode::new("docs/")
        .with_child(RouteNode::new("/guide").with_name("docs.guide"))]));
    registry.build().await.unwrap();

    assert_eq!(registry.lookup("docs.guide"), Some("docs/guide".to_string()));
}

#[tokio::test]
async fn test_lookup_before_build_is_none() {
    let registry = RouteRegistry::new(source(app_routes()));

    assert_eq!(registry.lookup("home"), None);
    assert!(registry.is_empty());
    assert!(!registry.is_ready());
}

// ============================================================================
// Duplicate Names
// ============================================================================

#[tokio::test]
async fn test_duplicate_name_names_both_paths() {
    let registry = RouteRegistry::new(source(vec![
        RouteNode::new("users/:id").with_name("profile"),
        RouteNode::new("account").with_children(vec![
            RouteNode::new("me").with_name("profile"),
        ]),
    ]));

    let err = registry.build().await.unwrap_err();

    match &err {
        RegistryError::DuplicateName {
            name,
            existing,
            duplicate,
        } => {
            assert_eq!(name, "profile");
            assert_eq!(existing, "users/:id");
            assert_eq!(duplicate, "account/me");
        }
        other => panic!("expected DuplicateName, got {:?}", other),
    }
    assert!(err.to_string().contains("users/:id"));
    assert!(err.to_string().contains("account/me"));
}

#[tokio::test]
async fn test_duplicate_name_with_identical_path_fails() {
    let registry = RouteRegistry::new(source(vec![
        RouteNode::new("home").with_name("home"),
        RouteNode::new("home").with_name("home"),
    ]));

    assert!(registry.build().await.unwrap_err().is_duplicate_name());
}

#[tokio::test]
async fn test_duplicate_inside_lazy_subtree() {
    let registry = RouteRegistry::new(source(vec![
        RouteNode::new("settings").with_name("settings"),
        RouteNode::new("admin").with_lazy_children(LazyRoutes::new(|| async {
            Ok(LoadedRoutes::Routes(vec![
                RouteNode::new("settings").with_name("settings"),
            ]))
        })),
    ]));

    let err = registry.build().await.unwrap_err();
    assert!(err.is_duplicate_name());
    assert!(err.to_string().contains("admin/settings"));
}

#[tokio::test]
async fn test_duplicate_reports_first_registered_path_when_earlier_loader_is_slower() {
    let registry = RouteRegistry::new(source(vec![
        RouteNode::new("slow").with_lazy_children(LazyRoutes::new(|| async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok(LoadedRoutes::Routes(vec![RouteNode::new("x").with_name("dup")]))
        })),
        RouteNode::new("fast").with_lazy_children(LazyRoutes::new(|| async {
            Ok(LoadedRoutes::Routes(vec![RouteNode::new("y").with_name("dup")]))
        })),
    ]));

    let err = registry.build().await.unwrap_err();

    match err {
        RegistryError::DuplicateName {
            name,
            existing,
            duplicate,
        } => {
            assert_eq!(name, "dup");
            assert_eq!(existing, "slow/x");
            assert_eq!(duplicate, "fast/y");
        }
        other => panic!("expected DuplicateName, got {:?}", other),
    }
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn test_missing_configuration() {
    let registry = RouteRegistry::new(Arc::new(StaticRouteSource::unavailable()));

    let err = registry.build().await.unwrap_err();

    assert!(matches!(err, RegistryError::MissingConfiguration));
    assert_eq!(err.to_string(), "router configuration not available");
    assert!(!registry.is_ready());
}

#[tokio::test]
async fn test_loader_failure_carries_path() {
    let registry = RouteRegistry::new(source(vec![RouteNode::new("reports")
        .with_child(RouteNode::new("archive").with_lazy_children(LazyRoutes::new(|| async {
            Err(anyhow::anyhow!("chunk failed to load"))
        })))]));

    let err = registry.build().await.unwrap_err();

    match err {
        RegistryError::LoaderFailed { path, source } => {
            assert_eq!(path, "reports/archive");
            assert_eq!(source.to_string(), "chunk failed to load");
        }
        other => panic!("expected LoaderFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_failed_build_publishes_nothing() {
    let registry = RouteRegistry::new(source(vec![
        RouteNode::new("a").with_name("a"),
        RouteNode::new("b").with_name("b"),
        RouteNode::new("c").with_name("a"),
    ]));

    assert!(registry.build().await.is_err());

    assert!(registry.is_empty());
    assert!(!registry.is_ready());
    assert_eq!(registry.lookup("a"), None);
}

#[tokio::test]
async fn test_build_retried_after_failure() {
    let routes = source(vec![
        RouteNode::new("a").with_name("a"),
        RouteNode::new("b").with_name("a"),
    ]);
    let registry = RouteRegistry::new(routes.clone());

    assert!(registry.build().await.is_err());

    routes.set_routes(vec![
        RouteNode::new("a").with_name("a"),
        RouteNode::new("b").with_name("b"),
    ]);
    registry.build().await.unwrap();

    assert_eq!(registry.all_names(), vec!["a", "b"]);
}

// ============================================================================
// Idempotence & Concurrency
// ============================================================================

#[tokio::test]
async fn test_second_build_does_not_traverse_again() {
    let calls = Arc::new(AtomicUsize::new(0));
    let registry = RouteRegistry::new(source(vec![RouteNode::new("lazy").with_lazy_children(
        counted_loader(calls.clone(), vec![RouteNode::new("x").with_name("lazy.x")]),
    )]));

    registry.build().await.unwrap();
    registry.build().await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(registry.lookup("lazy.x"), Some("lazy/x".to_string()));
}

#[tokio::test]
async fn test_concurrent_builds_share_one_traversal() {
    let calls = Arc::new(AtomicUsize::new(0));
    let registry = RouteRegistry::new(source(vec![RouteNode::new("lazy").with_lazy_children(
        counted_loader(calls.clone(), vec![RouteNode::new("x").with_name("lazy.x")]),
    )]));

    let (first, second, third) = tokio::join!(registry.build(), registry.build(), registry.build());

    assert!(first.is_ok() && second.is_ok() && third.is_ok());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(registry.all_names(), vec!["lazy.x"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_builds_across_tasks() {
    let calls = Arc::new(AtomicUsize::new(0));
    let registry = RouteRegistry::new(source(vec![
        RouteNode::new("").with_name("home"),
        RouteNode::new("lazy").with_lazy_children(counted_loader(
            calls.clone(),
            vec![RouteNode::new("x").with_name("lazy.x")],
        )),
    ]));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let registry = registry.clone();
            tokio::spawn(async move { registry.build().await })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(registry.all_names(), vec!["home", "lazy.x"]);
}

#[tokio::test]
async fn test_concurrent_builds_share_failure() {
    let registry = RouteRegistry::new(source(vec![
        RouteNode::new("a").with_name("dup"),
        RouteNode::new("b").with_name("dup"),
    ]));

    let (first, second) = tokio::join!(registry.build(), registry.build());

    assert!(first.unwrap_err().is_duplicate_name());
    assert!(second.unwrap_err().is_duplicate_name());
    assert!(registry.is_empty());
}

// ============================================================================
// Refresh & Reset
// ============================================================================

#[tokio::test]
async fn test_refresh_reflects_new_configuration() {
    let routes = source(vec![RouteNode::new("profile").with_name("profile")]);
    let registry = RouteRegistry::new(routes.clone());
    registry.build().await.unwrap();
    assert_eq!(registry.lookup("profile"), Some("profile".to_string()));

    routes.set_routes(vec![RouteNode::new("account/me").with_name("profile")]);

    // Already built: configuration changes are not picked up without refresh
    registry.build().await.unwrap();
    assert_eq!(registry.lookup("profile"), Some("profile".to_string()));

    registry.refresh().await.unwrap();
    assert_eq!(registry.lookup("profile"), Some("account/me".to_string()));
}

#[tokio::test]
async fn test_refresh_reinvokes_lazy_loaders() {
    let calls = Arc::new(AtomicUsize::new(0));
    let registry = RouteRegistry::new(source(vec![RouteNode::new("lazy").with_lazy_children(
        counted_loader(calls.clone(), vec![RouteNode::new("x").with_name("lazy.x")]),
    )]));

    registry.build().await.unwrap();
    registry.refresh().await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_failed_refresh_leaves_registry_empty() {
    let routes = source(vec![RouteNode::new("a").with_name("a")]);
    let registry = RouteRegistry::new(routes.clone());
    registry.build().await.unwrap();

    routes.clear_routes();
    let err = registry.refresh().await.unwrap_err();

    assert!(matches!(err, RegistryError::MissingConfiguration));
    assert!(registry.is_empty());
    assert_eq!(registry.lookup("a"), None);
}

#[tokio::test]
async fn test_reset_clears_table() {
    let registry = RouteRegistry::new(source(app_routes()));
    registry.build().await.unwrap();

    registry.reset();

    assert!(registry.is_empty());
    assert!(!registry.is_ready());
    assert_eq!(registry.all_names(), Vec::<String>::new());
}

#[tokio::test]
async fn test_clones_share_state() {
    let registry = RouteRegistry::new(source(app_routes()));
    let clone = registry.clone();

    registry.build().await.unwrap();

    assert!(clone.is_ready());
    assert_eq!(clone.lookup("about"), Some("about".to_string()));
}

// ============================================================================
// Lazy Result Normalization
// ============================================================================

#[tokio::test]
async fn test_module_default_export() {
    let registry = RouteRegistry::new(source(vec![RouteNode::new("blog").with_lazy_children(
        LazyRoutes::new(|| async {
            Ok(LoadedRoutes::Module(
                LoadedModule::new("BlogModule")
                    .with_default_export(vec![RouteNode::new(":slug").with_name("blog.post")])
                    .with_routes(vec![RouteNode::new("ignored").with_name("blog.ignored")]),
            ))
        }),
    )]));

    registry.build().await.unwrap();

    assert_eq!(registry.all_names(), vec!["blog.post"]);
    assert_eq!(registry.lookup("blog.post"), Some("blog/:slug".to_string()));
}

#[tokio::test]
async fn test_module_routes_export() {
    let registry = RouteRegistry::new(source(vec![RouteNode::new("shop").with_lazy_children(
        LazyRoutes::new(|| async {
            Ok(LoadedRoutes::Module(
                LoadedModule::new("ShopModule")
                    .with_routes(vec![RouteNode::new("items/:sku").with_name("shop.item")]),
            ))
        }),
    )]));

    registry.build().await.unwrap();

    assert_eq!(registry.lookup("shop.item"), Some("shop/items/:sku".to_string()));
}

#[tokio::test]
async fn test_module_resolved_through_host_lookup() {
    let routes = Arc::new(
        StaticRouteSource::new(vec![RouteNode::new("crm").with_lazy_children(LazyRoutes::new(
            || async { Ok(LoadedRoutes::Module(LoadedModule::new("CrmModule"))) },
        ))])
        .with_injected(
            "CrmModule",
            vec![RouteNode::new("contacts/:id").with_name("crm.contact")],
        ),
    );
    let registry = RouteRegistry::new(routes);

    registry.build().await.unwrap();

    assert_eq!(registry.lookup("crm.contact"), Some("crm/contacts/:id".to_string()));
}

#[tokio::test]
async fn test_unrecognized_shape_contributes_nothing() {
    let registry = RouteRegistry::new(source(vec![
        RouteNode::new("widget").with_lazy_children(LazyRoutes::new(|| async {
            Ok(LoadedRoutes::Opaque("standalone component".to_string()))
        })),
        RouteNode::new("about").with_name("about"),
    ]));

    registry.build().await.unwrap();

    assert_eq!(registry.all_names(), vec!["about"]);
    assert!(registry.is_ready());
}

// ============================================================================
// Configuration
// ============================================================================

#[tokio::test]
async fn test_registry_uses_configured_syntax() {
    let config = RegistryConfig::from_toml_str(
        r#"
        [named_routes.syntax]
        param_marker = "$"
        optional_marker = "*"
        "#,
    )
    .unwrap();
    let registry = RouteRegistry::with_config(
        source(vec![RouteNode::new("users/$id/$tab*").with_name("user")]),
        config,
    );
    registry.build().await.unwrap();

    assert_eq!(
        registry.url_for("user", &params([("id", 3)])).unwrap(),
        "/users/3"
    );
    assert_eq!(registry.config().syntax.param_marker, '$');
}
