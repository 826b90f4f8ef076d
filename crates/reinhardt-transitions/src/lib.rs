//! # Reinhardt Transitions
//!
//! Nested route transitions for client-side applications.
//!
//! Given a tree of named routes, this crate coordinates what happens when the
//! active route chain changes: stale routes are deactivated leaf first, new
//! route instances are resolved (possibly lazily, from a parent's child-route
//! map) and activated root first, `load` hooks run, and views are mounted into
//! the outlet of their nearest rendered ancestor.
//!
//! ## Architecture
//!
//! ```text
//! Router::transition_to
//!        │
//!        ▼
//!   RouteTree::chain ──► Transition ──► TransitionMiddleware::next
//!                                            │
//!            ┌───────────────────────────────┼───────────────────────────┐
//!            ▼                               ▼                           ▼
//!     TransitionDiff                  RouteResolver                RenderScheduler
//!  (changing index)          (registry, child-route maps)        (outlet regions)
//! ```
//!
//! Lifecycle events (`before:transition`, `activate`, `transition:error`, ...)
//! are announced through [`RouterEvents`](events::RouterEvents).
//!
//! ## Example
//!
//! ```
//! use async_trait::async_trait;
//! use reinhardt_transitions::prelude::*;
//! use std::sync::Arc;
//!
//! #[derive(Default)]
//! struct Parent;
//!
//! #[async_trait]
//! impl RouteHandler for Parent {
//! 	fn component(&self) -> Option<ViewDefinition> {
//! 		Some(ViewDefinition::factory(|_| Element::new("main").with_outlet()))
//! 	}
//!
//! 	fn child_routes(&self) -> Option<ChildRoutes> {
//! 		let mut children = ChildRoutes::new();
//! 		children.insert(
//! 			"child".to_string(),
//! 			RouteSource::lazy(|| async {
//! 				Some(RouteDefinition::component(ViewDefinition::factory(|_| {
//! 					Element::new("h2").text("Child")
//! 				})))
//! 			}),
//! 		);
//! 		Some(children)
//! 	}
//! }
//!
//! # tokio_test::block_on(async {
//! let root = Arc::new(ElementRegion::new());
//! let router = Router::new(RouterSettings::default()).with_root_region(root.clone());
//! router.map(|map| {
//! 	map.route_with("parent", RouteOptions::new().class(RouteClass::of::<Parent>()), |parent| {
//! 		parent.route("child", RouteOptions::new());
//! 	});
//! });
//!
//! router.transition_to("child", Params::new(), Query::new()).await.unwrap();
//! assert_eq!(root.html(), "<main><h2>Child</h2></main>");
//! # });
//! ```

pub mod context;
pub mod definition;
pub mod descriptor;
pub mod diff;
pub mod error;
pub mod events;
pub mod link;
pub mod middleware;
pub mod region;
pub mod registry;
pub mod render;
pub mod resolver;
pub mod route;
pub mod router;
pub mod settings;
pub mod transition;
pub mod tree;

pub use context::{ContextEvents, ContextRequests, RouteContext};
pub use definition::{
	ChildRoutes, RouteClass, RouteDefinition, RouteLoad, RouteSource, ViewDefinition, ViewOptions,
};
pub use descriptor::{Params, Query, RouteConfig, RouteDescriptor, RouteOptions};
pub use diff::{TransitionDiff, changing_index};
pub use error::{HookPhase, SettingsError, TransitionError, TransitionResult};
pub use events::{ListenerId, RouterEvent, RouterEventKind, RouterEvents};
pub use link::{LinkDefaults, RouterLink};
pub use middleware::TransitionMiddleware;
pub use region::{Element, ElementRegion, Region, View};
pub use registry::RouteRegistry;
pub use render::RenderScheduler;
pub use resolver::{Resolution, RouteResolver};
pub use route::{BasicRoute, LoadHook, RouteHandler, RouteInstance, RouteRef};
pub use router::Router;
pub use settings::{LocationKind, RouterSettings};
pub use transition::{
	Interruption, RedirectTarget, Transition, TransitionPhase, TransitionRef,
};
pub use tree::{RouteMap, RouteTree};

/// Commonly used types.
pub mod prelude {
	pub use crate::context::{ContextEvents, ContextRequests, RouteContext};
	pub use crate::definition::{
		ChildRoutes, RouteClass, RouteDefinition, RouteSource, ViewDefinition, ViewOptions,
	};
	pub use crate::descriptor::{Params, Query, RouteConfig, RouteOptions};
	pub use crate::error::{TransitionError, TransitionResult};
	pub use crate::events::{RouterEvent, RouterEventKind};
	pub use crate::link::{LinkDefaults, RouterLink};
	pub use crate::region::{Element, ElementRegion, Region, View};
	pub use crate::route::{BasicRoute, LoadHook, RouteHandler, RouteInstance};
	pub use crate::router::Router;
	pub use crate::settings::{LocationKind, RouterSettings};
	pub use crate::transition::{Transition, TransitionPhase};
}
