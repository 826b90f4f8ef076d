//! Route definition resolution.
//!
//! Resolution order for a descriptor:
//!
//! 1. a route class or view definition declared in the descriptor's own
//!    options, constructed synchronously;
//! 2. otherwise the child-route maps of the ancestor instances, nearest first,
//!    whose entry may be a definition or a loader returning one now or later;
//! 3. otherwise nothing, and the transition fails naming the route.
//!
//! Module wrappers are unwrapped to their default export before construction.

use crate::definition::{RouteDefinition, RouteLoad};
use crate::descriptor::{RouteConfig, RouteDescriptor};
use crate::route::{BasicRoute, RouteHandler, RouteInstance, RouteParts, RouteRef};
use crate::router::RouterShared;
use futures::future::BoxFuture;
use serde_json::Map;
use std::sync::Weak;

/// Outcome of [`RouteResolver::resolve`].
pub enum Resolution {
	/// Resolved without waiting.
	Ready(Option<RouteRef>),
	/// Waiting on an asynchronous child-route loader.
	Pending(BoxFuture<'static, Option<RouteRef>>),
}

impl Resolution {
	/// Returns `true` when no waiting is needed.
	pub fn is_ready(&self) -> bool {
		matches!(self, Resolution::Ready(_))
	}

	/// Waits for the route instance.
	pub async fn into_route(self) -> Option<RouteRef> {
		match self {
			Resolution::Ready(route) => route,
			Resolution::Pending(future) => future.await,
		}
	}
}

/// Turns route descriptors into route instances.
#[derive(Clone)]
pub struct RouteResolver {
	router: Weak<RouterShared>,
}

impl RouteResolver {
	pub(crate) fn new(router: Weak<RouterShared>) -> Self {
		Self { router }
	}

	/// Resolves `descriptor`, whose ancestors in the next chain are `ancestors`.
	pub fn resolve(&self, descriptor: &RouteDescriptor, ancestors: &[RouteRef]) -> Resolution {
		let config = descriptor.config();
		if let Some(definition) = descriptor.options.definition() {
			return Resolution::Ready(instantiate(&self.router, definition, config));
		}
		match find_child_route(&descriptor.name, ancestors) {
			None => Resolution::Ready(None),
			Some(RouteLoad::Ready(definition)) => Resolution::Ready(
				definition.and_then(|definition| instantiate(&self.router, definition, config)),
			),
			Some(RouteLoad::Pending(future)) => {
				tracing::debug!(route = %descriptor.name, "waiting for route definition");
				let router = self.router.clone();
				Resolution::Pending(Box::pin(async move {
					let definition = future.await?;
					instantiate(&router, definition, config)
				}))
			}
		}
	}
}

/// Looks `name` up in the ancestors' child-route maps, nearest ancestor first.
fn find_child_route(name: &str, ancestors: &[RouteRef]) -> Option<RouteLoad> {
	for ancestor in ancestors.iter().rev() {
		let Some(children) = ancestor.handler().child_routes() else {
			continue;
		};
		let Some(source) = children.get(name) else {
			continue;
		};
		match source.start() {
			RouteLoad::Ready(None) => continue,
			load => {
				tracing::debug!(route = %name, parent = %ancestor.name(), "route definition found in parent");
				return Some(load);
			}
		}
	}
	None
}

fn instantiate(
	router: &Weak<RouterShared>,
	definition: RouteDefinition,
	config: RouteConfig,
) -> Option<RouteRef> {
	let parts = match definition.unwrap_module() {
		RouteDefinition::Class(class) => RouteParts {
			class_name: class.name().to_string(),
			handler: class.build(),
			options: Map::new(),
			component: None,
			view_options: None,
		},
		RouteDefinition::Options(options) => {
			let options = *options;
			let (class_name, handler) = match (&options.class, &options.component) {
				(Some(class), _) => (class.name().to_string(), class.build()),
				(None, Some(_)) => (
					"BasicRoute".to_string(),
					Box::new(BasicRoute) as Box<dyn RouteHandler>,
				),
				(None, None) => return None,
			};
			RouteParts {
				class_name,
				handler,
				options: options.route_options,
				component: options.component,
				view_options: options.view_options,
			}
		}
		RouteDefinition::Module(_) => return None,
	};
	Some(RouteInstance::construct(parts, config, router.clone()))
}
