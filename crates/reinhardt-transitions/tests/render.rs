//! Integration tests for outlet rendering
//!
//! Tests where and when route views are mounted:
//! - nested views mount into their nearest rendered ancestor's outlet
//! - shared ancestors keep their views across transitions
//! - `outlet: false` routes give their place to their children

mod common;

use common::{Behavior, Journal, page, pairs, recorded, router_with_root};
use reinhardt_transitions::prelude::*;
use rstest::{fixture, rstest};
use std::sync::Arc;

#[fixture]
fn journal() -> Journal {
	Journal::new()
}

fn view_of(router: &Router, name: &str) -> Arc<dyn View> {
	router
		.registry()
		.get(name)
		.and_then(|route| route.view())
		.unwrap_or_else(|| panic!("route {name} has no view"))
}

#[rstest]
#[tokio::test]
async fn test_nested_views_mount_into_outlets(journal: Journal) {
	let (router, root) = router_with_root();
	router.map(|map| {
		map.route_with("app", recorded("app", &journal, Behavior::view("main")), |app| {
			app.route_with("users", recorded("users", &journal, Behavior::view("section")), |users| {
				users.route("user", recorded("user", &journal, Behavior::view("article")).path(":id"));
			});
		});
	});

	router
		.transition_to("user", pairs(&[("id", "7")]), Query::new())
		.await
		.unwrap();

	assert_eq!(
		root.html(),
		concat!(
			r#"<main data-route="app">"#,
			r#"<section data-route="users">"#,
			r#"<article data-route="user"></article>"#,
			"</section></main>"
		)
	);
}

#[rstest]
#[tokio::test]
async fn test_shared_parent_view_survives_sibling_switch() {
	let (router, root) = router_with_root();
	router.map(|map| {
		map.route_with("app", page("main"), |app| {
			app.route("inbox", page("ul"));
			app.route("sent", page("ol"));
		});
	});
	router
		.transition_to("inbox", Params::new(), Query::new())
		.await
		.unwrap();
	let parent = view_of(&router, "app");
	let inbox = router.registry().get("inbox").unwrap();

	router
		.transition_to("sent", Params::new(), Query::new())
		.await
		.unwrap();

	assert_eq!(root.show_count(), 1);
	assert!(Arc::ptr_eq(&view_of(&router, "app"), &parent));
	assert_eq!(root.html(), "<main><ol></ol></main>");
	assert!(inbox.has_view());
}

#[rstest]
#[tokio::test]
async fn test_param_change_renders_only_the_leaf() {
	let (router, root) = router_with_root();
	router.map(|map| {
		map.route_with("app", page("main"), |app| {
			app.route("item", page("article").path("items/:id"));
		});
	});
	router
		.transition_to("item", pairs(&[("id", "1")]), Query::new())
		.await
		.unwrap();
	let parent = view_of(&router, "app");
	let first = view_of(&router, "item");

	router
		.transition_to("item", pairs(&[("id", "2")]), Query::new())
		.await
		.unwrap();

	assert_eq!(root.show_count(), 1);
	assert!(Arc::ptr_eq(&view_of(&router, "app"), &parent));
	assert!(!Arc::ptr_eq(&view_of(&router, "item"), &first));
	assert!(parent.outlet().unwrap().current().is_some());
}

#[rstest]
#[tokio::test]
async fn test_update_view_keeps_current_view(journal: Journal) {
	let (router, _root) = router_with_root();
	let keep = Behavior {
		keep_view: true,
		..Behavior::view("section")
	};
	router.map(|map| {
		map.route("report", recorded("report", &journal, keep));
	});
	router
		.transition_to("report", Params::new(), Query::new())
		.await
		.unwrap();
	let first = view_of(&router, "report");

	router
		.transition_to("report", Params::new(), pairs(&[("year", "2024")]))
		.await
		.unwrap();

	assert!(Arc::ptr_eq(&view_of(&router, "report"), &first));
}

#[rstest]
#[tokio::test]
async fn test_query_change_rerenders_target_view() {
	let (router, root) = router_with_root();
	router.map(|map| {
		map.route("report", page("section"));
	});
	router
		.transition_to("report", Params::new(), Query::new())
		.await
		.unwrap();
	let first = view_of(&router, "report");

	router
		.transition_to("report", Params::new(), pairs(&[("year", "2024")]))
		.await
		.unwrap();

	assert_eq!(root.show_count(), 2);
	assert!(!Arc::ptr_eq(&view_of(&router, "report"), &first));
}

#[rstest]
#[tokio::test]
async fn test_non_outlet_parent_yields_to_child() {
	let (router, root) = router_with_root();
	router.map(|map| {
		map.route_with("list", page("ul").outlet(false), |list| {
			list.route("detail", page("article"));
		});
	});

	router
		.transition_to("detail", Params::new(), Query::new())
		.await
		.unwrap();

	assert_eq!(root.html(), "<article></article>");
	assert!(!router.registry().get("list").unwrap().has_view());
}

#[rstest]
#[tokio::test]
async fn test_non_outlet_parent_view_is_replaced_by_child() {
	let (router, root) = router_with_root();
	router.map(|map| {
		map.route_with("list", page("ul").outlet(false), |list| {
			list.route("detail", page("article"));
		});
	});
	router
		.transition_to("list", Params::new(), Query::new())
		.await
		.unwrap();
	assert_eq!(root.html(), "<ul></ul>");

	router
		.transition_to("detail", Params::new(), Query::new())
		.await
		.unwrap();

	assert_eq!(root.html(), "<article></article>");
	assert!(!router.registry().get("list").unwrap().has_view());
	assert_eq!(root.show_count(), 2);
}

#[rstest]
#[tokio::test]
async fn test_non_outlet_view_is_cleared_on_deactivate() {
	let (router, root) = router_with_root();
	let list = Arc::new(Element::new("ul"));
	let shown = Arc::clone(&list);
	router.map(|map| {
		map.route(
			"list",
			RouteOptions::new()
				.component(ViewDefinition::shared(move |_| {
					Arc::clone(&shown) as Arc<dyn View>
				}))
				.outlet(false),
		);
		map.route("home", page("h1"));
	});
	router
		.transition_to("list", Params::new(), Query::new())
		.await
		.unwrap();

	router
		.transition_to("home", Params::new(), Query::new())
		.await
		.unwrap();

	assert!(list.is_destroyed());
	assert_eq!(root.html(), "<h1></h1>");
}

#[rstest]
#[tokio::test]
async fn test_ancestor_without_view_is_skipped() {
	let (router, root) = router_with_root();
	router.map(|map| {
		map.route_with("section", RouteOptions::new().class(RouteClass::of::<BasicRoute>()), |section| {
			section.route("page", page("p"));
		});
	});

	router
		.transition_to("page", Params::new(), Query::new())
		.await
		.unwrap();

	assert_eq!(root.html(), "<p></p>");
}

#[rstest]
#[tokio::test]
async fn test_parent_without_outlet_fails() {
	let (router, _root) = router_with_root();
	router.map(|map| {
		map.route_with(
			"parent",
			RouteOptions::new().component(ViewDefinition::factory(|_| Element::new("div"))),
			|parent| {
				parent.route("child", page("p"));
			},
		);
	});

	let error = router
		.transition_to("child", Params::new(), Query::new())
		.await
		.unwrap_err();

	assert!(matches!(&error, TransitionError::MissingOutlet { route } if route == "parent"));
	assert_eq!(error.to_string(), "No outlet region defined in parent route");
}

#[rstest]
#[case(false, false)]
#[case(true, true)]
#[tokio::test]
async fn test_root_view_without_region(#[case] prerendered: bool, #[case] succeeds: bool) {
	let router = Router::new(RouterSettings::default().with_log_errors(false));
	router.map(move |map| {
		map.route(
			"app",
			RouteOptions::new().component(ViewDefinition::factory(move |_| {
				let el = Element::new("body");
				if prerendered { el.prerendered() } else { el }
			})),
		);
	});

	let result = router
		.transition_to("app", Params::new(), Query::new())
		.await;

	assert_eq!(result.is_ok(), succeeds);
	if !succeeds {
		assert!(matches!(result, Err(TransitionError::MissingRootOutlet)));
	}
}

#[rstest]
#[tokio::test]
async fn test_view_options_reach_the_factory() {
	let (router, root) = router_with_root();
	let mut options = ViewOptions::new();
	options.insert("title".to_string(), "Inbox".into());
	router.map(|map| {
		map.route(
			"inbox",
			RouteOptions::new()
				.component(ViewDefinition::factory(|options| {
					let title = options
						.get("title")
						.and_then(|value| value.as_str())
						.unwrap_or_default()
						.to_string();
					Element::new("h1").text(title)
				}))
				.view_options(options),
		);
	});

	router
		.transition_to("inbox", Params::new(), Query::new())
		.await
		.unwrap();

	assert_eq!(root.html(), "<h1>Inbox</h1>");
}
