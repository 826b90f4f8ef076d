//! # Reinhardt Nested Routes
//!
//! Client-side nested route transitions for Reinhardt applications.
//!
//! A route tree of named, nested routes is kept consistent with the active
//! route chain: leaving routes are deactivated leaf first, entering routes are
//! resolved (possibly lazily) and activated root first, data loading hooks run
//! in order, and every route's view is mounted into its parent's outlet.
//!
//! ## Feature Flags
//!
//! - `transitions` (default) - Router, route lifecycle and outlet rendering
//!
//! ## Quick Example
//!
//! ```rust
//! # #[cfg(feature = "transitions")]
//! # tokio_test::block_on(async {
//! use reinhardt::prelude::*;
//! use std::sync::Arc;
//!
//! let root = Arc::new(ElementRegion::new());
//! let router = Router::new(RouterSettings::default()).with_root_region(root.clone());
//! router.map(|map| {
//! 	map.route_with(
//! 		"users",
//! 		RouteOptions::new().component(ViewDefinition::factory(|_| Element::new("main").with_outlet())),
//! 		|users| {
//! 			users.route(
//! 				"user",
//! 				RouteOptions::new()
//! 					.path(":id")
//! 					.component(ViewDefinition::factory(|_| Element::new("article"))),
//! 			);
//! 		},
//! 	);
//! });
//!
//! let params: Params = [("id".to_string(), "1".to_string())].into_iter().collect();
//! router.transition_to("user", params, Query::new()).await.unwrap();
//! assert_eq!(root.html(), "<main><article></article></main>");
//! # });
//! ```

pub mod transitions;

/// Commonly used types.
pub mod prelude {
	#[cfg(feature = "transitions")]
	pub use reinhardt_transitions::prelude::*;
}
