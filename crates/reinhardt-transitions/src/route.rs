//! Route handlers and route instances.
//!
//! A [`RouteHandler`] is the user-facing override point: lifecycle hooks,
//! view configuration, child-route map and context handlers. The router wraps
//! each handler in a [`RouteInstance`], created once per route name and kept in
//! the registry for the router's lifetime.
//!
//! ```
//! use async_trait::async_trait;
//! use reinhardt_transitions::route::{RouteHandler, RouteInstance};
//! use reinhardt_transitions::transition::Transition;
//!
//! #[derive(Default)]
//! struct Dashboard;
//!
//! #[async_trait]
//! impl RouteHandler for Dashboard {
//! 	async fn activate(&self, _route: &RouteInstance, transition: &Transition) -> anyhow::Result<()> {
//! 		if transition.params().get("id").is_none() {
//! 			anyhow::bail!("dashboard requires an id");
//! 		}
//! 		Ok(())
//! 	}
//! }
//! ```

use crate::context::{ContextChannel, ContextEvents, ContextRequests, RouteContext};
use crate::definition::{ChildRoutes, ViewDefinition, ViewOptions};
use crate::descriptor::RouteConfig;
use crate::error::{TransitionError, TransitionResult};
use crate::events::RouterEvent;
use crate::region::{Region, View};
use crate::router::{Router, RouterShared};
use crate::transition::Transition;
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

static NEXT_ROUTE_ID: AtomicU64 = AtomicU64::new(1);

/// Shared route instance handle.
pub type RouteRef = Arc<RouteInstance>;

/// Optional data loading hook.
///
/// Load failures never fail the transition; they are logged and the next
/// route's load runs.
#[async_trait]
pub trait LoadHook: Send + Sync {
	/// Loads data for `route`.
	async fn load(&self, route: &RouteInstance, transition: &Transition) -> anyhow::Result<()>;
}

/// Behavior of a route node.
///
/// Every method has a default, so a handler only overrides what it needs.
#[async_trait]
pub trait RouteHandler: Send + Sync + 'static {
	/// One-time setup, called right after construction with the route options.
	fn initialize(&mut self, _config: &RouteConfig, _options: &Map<String, Value>) {}

	/// Called when a transition enters the route.
	async fn activate(&self, _route: &RouteInstance, _transition: &Transition) -> anyhow::Result<()> {
		Ok(())
	}

	/// Called when a transition leaves the route.
	async fn deactivate(
		&self,
		_route: &RouteInstance,
		_transition: &Transition,
	) -> anyhow::Result<()> {
		Ok(())
	}

	/// Returns the load hook, if the route loads data.
	fn loader(&self) -> Option<&dyn LoadHook> {
		None
	}

	/// Returns `true` to keep the current view instead of rendering a new one.
	fn update_view(&self, _route: &RouteInstance, _transition: &Transition) -> bool {
		false
	}

	/// View definition used when the route options declare none.
	fn component(&self) -> Option<ViewDefinition> {
		None
	}

	/// View options used when the route options declare none.
	fn view_options(&self, _route: &RouteInstance) -> Option<ViewOptions> {
		None
	}

	/// Called with every freshly rendered view.
	fn view_events(&self, _route: &RouteInstance, _view: &Arc<dyn View>) {}

	/// Definitions of child routes not declaring their own.
	fn child_routes(&self) -> Option<ChildRoutes> {
		None
	}

	/// Requests answered for descendants.
	fn context_requests(&self) -> ContextRequests {
		ContextRequests::default()
	}

	/// Events received from descendants.
	fn context_events(&self) -> ContextEvents {
		ContextEvents::default()
	}
}

/// Handler used by routes declaring only a view definition.
#[derive(Debug, Default, Clone, Copy)]
pub struct BasicRoute;

impl RouteHandler for BasicRoute {}

/// A constructed route node.
pub struct RouteInstance {
	id: u64,
	class_name: String,
	config: RouteConfig,
	handler: Box<dyn RouteHandler>,
	component: Option<ViewDefinition>,
	view_options: Option<ViewOptions>,
	router: Weak<RouterShared>,
	view: Mutex<Option<Arc<dyn View>>>,
	outlet: Mutex<Option<Arc<dyn Region>>>,
	channel: Option<ContextChannel>,
}

/// Parts a route instance is built from.
pub(crate) struct RouteParts {
	pub class_name: String,
	pub handler: Box<dyn RouteHandler>,
	pub options: Map<String, Value>,
	pub component: Option<ViewDefinition>,
	pub view_options: Option<ViewOptions>,
}

impl RouteInstance {
	/// Constructs an instance, running `initialize` once and binding the context channel.
	pub(crate) fn construct(
		parts: RouteParts,
		config: RouteConfig,
		router: Weak<RouterShared>,
	) -> RouteRef {
		let RouteParts {
			class_name,
			mut handler,
			options,
			component,
			view_options,
		} = parts;
		handler.initialize(&config, &options);
		let channel = ContextChannel::bind(handler.context_requests(), handler.context_events());
		tracing::debug!(
			route = %config.name,
			class = %class_name,
			context = channel.is_some(),
			"route instance created"
		);
		Arc::new(Self {
			id: NEXT_ROUTE_ID.fetch_add(1, Ordering::SeqCst),
			class_name,
			config,
			handler,
			component,
			view_options,
			router,
			view: Mutex::new(None),
			outlet: Mutex::new(None),
			channel,
		})
	}

	#[cfg(test)]
	pub(crate) fn detached(name: &str) -> RouteRef {
		Self::construct(
			RouteParts {
				class_name: "BasicRoute".to_string(),
				handler: Box::new(BasicRoute),
				options: Map::new(),
				component: None,
				view_options: None,
			},
			crate::descriptor::RouteDescriptor::new(name).config(),
			Weak::new(),
		)
	}

	/// Unique instance id.
	pub fn id(&self) -> u64 {
		self.id
	}

	/// Route name.
	pub fn name(&self) -> &str {
		&self.config.name
	}

	/// Name of the handler type.
	pub fn class_name(&self) -> &str {
		&self.class_name
	}

	/// Descriptor snapshot taken at construction.
	pub fn config(&self) -> &RouteConfig {
		&self.config
	}

	/// The route handler.
	pub fn handler(&self) -> &dyn RouteHandler {
		self.handler.as_ref()
	}

	/// Returns `false` for routes flagged `outlet: false`.
	pub fn is_outlet(&self) -> bool {
		self.config.options.is_outlet()
	}

	/// The owning router, while it is alive.
	pub fn router(&self) -> Option<Router> {
		self.router.upgrade().map(Router::from_shared)
	}

	pub(crate) fn channel(&self) -> Option<&ContextChannel> {
		self.channel.as_ref()
	}

	/// Returns `true` if the route declares context requests or events.
	pub fn has_context_channel(&self) -> bool {
		self.channel.is_some()
	}

	/// Returns `true` if the route can render a view.
	pub fn has_view_definition(&self) -> bool {
		self.component.is_some() || self.handler.component().is_some()
	}

	/// The current view.
	pub fn view(&self) -> Option<Arc<dyn View>> {
		self.view.lock().clone()
	}

	/// Returns `true` if a view is currently recorded.
	pub fn has_view(&self) -> bool {
		self.view.lock().is_some()
	}

	/// Destroys and forgets the current view.
	pub fn clear_view(&self) {
		let view = self.view.lock().take();
		self.outlet.lock().take();
		if let Some(view) = view {
			tracing::debug!(route = %self.name(), "route view cleared");
			view.destroy();
		}
	}

	/// Region where child routes mount their views.
	pub fn outlet(&self) -> Option<Arc<dyn Region>> {
		let mut cached = self.outlet.lock();
		if cached.is_none() {
			*cached = self.view.lock().as_ref().and_then(|view| view.outlet());
		}
		cached.clone()
	}

	/// View options in effect for this route.
	pub fn view_options(&self) -> ViewOptions {
		self.view_options
			.clone()
			.or_else(|| self.handler.view_options(self))
			.unwrap_or_default()
	}

	/// Context scoped to this route's position in the active chain.
	pub fn context(&self) -> RouteContext {
		let chain = self
			.router
			.upgrade()
			.map(|shared| shared.context_chain())
			.unwrap_or_default();
		RouteContext::new(&chain, self)
	}

	/// Renders the route's view into `region`.
	///
	/// The current view is kept when [`RouteHandler::update_view`] returns
	/// `true`. Without a region the new view must already be attached.
	pub fn render_view(
		&self,
		region: Option<Arc<dyn Region>>,
		transition: &Transition,
	) -> TransitionResult<()> {
		if self.has_view() && self.handler.update_view(self, transition) {
			tracing::debug!(route = %self.name(), "view reused");
			return Ok(());
		}
		let definition = self
			.component
			.clone()
			.or_else(|| self.handler.component())
			.ok_or_else(|| TransitionError::ViewNotDefined {
				route: self.name().to_string(),
			})?;
		let view = self.build_view(definition)?;
		match region {
			Some(region) => region.show(Arc::clone(&view)),
			None if view.is_rendered() => {}
			None => return Err(TransitionError::MissingRootOutlet),
		}
		self.replace_view(Arc::clone(&view));
		if let Some(shared) = self.router.upgrade() {
			shared.events.emit(RouterEvent::RouteRender { route: self });
		}
		self.handler.view_events(self, &view);
		Ok(())
	}

	fn build_view(&self, definition: ViewDefinition) -> TransitionResult<Arc<dyn View>> {
		let options = self.view_options();
		let mut definition = definition;
		loop {
			match definition {
				ViewDefinition::Factory(factory) => return Ok(factory(&options)),
				ViewDefinition::Deferred(select) => definition = select(self),
				ViewDefinition::Tag(tag) => {
					let factory = self
						.router
						.upgrade()
						.and_then(|shared| shared.element(&tag))
						.ok_or(TransitionError::UnknownElement { tag })?;
					return Ok(factory(&options));
				}
			}
		}
	}

	fn replace_view(&self, view: Arc<dyn View>) {
		let previous = self.view.lock().replace(view);
		self.outlet.lock().take();
		if let Some(previous) = previous {
			previous.destroy();
		}
	}
}

impl fmt::Debug for RouteInstance {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RouteInstance")
			.field("id", &self.id)
			.field("name", &self.config.name)
			.field("class", &self.class_name)
			.field("has_view", &self.has_view())
			.field("context", &self.channel)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::descriptor::RouteDescriptor;
	use crate::region::{Element, ElementRegion};
	use rstest::rstest;
	use std::sync::atomic::AtomicUsize;

	#[derive(Default)]
	struct Counting {
		initialized: Arc<AtomicUsize>,
		seen_option: Option<Value>,
	}

	impl RouteHandler for Counting {
		fn initialize(&mut self, _config: &RouteConfig, options: &Map<String, Value>) {
			self.initialized.fetch_add(1, Ordering::SeqCst);
			self.seen_option = options.get("flag").cloned();
		}

		fn context_requests(&self) -> ContextRequests {
			ContextRequests::new().on("flag", {
				let value = self.seen_option.clone().unwrap_or(Value::Null);
				move |_: &[Value]| value.clone()
			})
		}
	}

	fn instance(
		handler: Box<dyn RouteHandler>,
		component: Option<ViewDefinition>,
		options: Map<String, Value>,
	) -> RouteRef {
		RouteInstance::construct(
			RouteParts {
				class_name: "Test".to_string(),
				handler,
				options,
				component,
				view_options: None,
			},
			RouteDescriptor::new("test").config(),
			Weak::new(),
		)
	}

	fn transition() -> Transition {
		Transition::new(1, "test", Vec::new(), vec![RouteDescriptor::new("test")])
	}

	#[rstest]
	fn test_construct_initializes_once_and_binds_context() {
		let initialized = Arc::new(AtomicUsize::new(0));
		let mut options = Map::new();
		options.insert("flag".to_string(), Value::from(true));
		let route = instance(
			Box::new(Counting {
				initialized: Arc::clone(&initialized),
				seen_option: None,
			}),
			None,
			options,
		);
		assert_eq!(initialized.load(Ordering::SeqCst), 1);
		assert!(route.has_context_channel());
		assert_eq!(
			route.channel().and_then(|c| c.request("flag", &[])),
			Some(Value::from(true))
		);
	}

	#[rstest]
	fn test_basic_route_has_no_channel() {
		let route = RouteInstance::detached("plain");
		assert!(!route.has_context_channel());
		assert!(!route.has_view_definition());
	}

	#[rstest]
	fn test_render_view_shows_in_region() {
		let route = instance(
			Box::new(BasicRoute),
			Some(ViewDefinition::factory(|_| Element::new("h1").text("Parent"))),
			Map::new(),
		);
		let region = Arc::new(ElementRegion::new());
		route
			.render_view(Some(region.clone() as Arc<dyn Region>), &transition())
			.unwrap();
		assert!(route.has_view());
		assert_eq!(region.html(), "<h1>Parent</h1>");
	}

	#[rstest]
	fn test_render_view_without_region_requires_rendered_view() {
		let route = instance(
			Box::new(BasicRoute),
			Some(ViewDefinition::factory(|_| Element::new("div"))),
			Map::new(),
		);
		let result = route.render_view(None, &transition());
		assert!(matches!(result, Err(TransitionError::MissingRootOutlet)));
		assert!(!route.has_view());

		let prerendered = instance(
			Box::new(BasicRoute),
			Some(ViewDefinition::factory(|_| Element::new("div").prerendered())),
			Map::new(),
		);
		prerendered.render_view(None, &transition()).unwrap();
		assert!(prerendered.has_view());
	}

	#[rstest]
	fn test_deferred_definition_resolves_against_route() {
		let route = instance(
			Box::new(BasicRoute),
			Some(ViewDefinition::deferred(|route| {
				let name = route.name().to_string();
				ViewDefinition::factory(move |_| Element::new("p").text(name.clone()))
			})),
			Map::new(),
		);
		let region = Arc::new(ElementRegion::new());
		route
			.render_view(Some(region.clone() as Arc<dyn Region>), &transition())
			.unwrap();
		assert_eq!(region.html(), "<p>test</p>");
	}

	#[rstest]
	fn test_tag_without_router_is_unknown() {
		let route = instance(Box::new(BasicRoute), Some(ViewDefinition::tag("x-page")), Map::new());
		let region: Arc<dyn Region> = Arc::new(ElementRegion::new());
		let result = route.render_view(Some(region), &transition());
		assert!(matches!(result, Err(TransitionError::UnknownElement { tag }) if tag == "x-page"));
	}

	#[rstest]
	fn test_clear_view_destroys() {
		let element = Arc::new(Element::new("div").with_outlet());
		let shared = Arc::clone(&element);
		let route = instance(
			Box::new(BasicRoute),
			Some(ViewDefinition::shared(move |_| Arc::clone(&shared) as Arc<dyn View>)),
			Map::new(),
		);
		let region: Arc<dyn Region> = Arc::new(ElementRegion::new());
		route.render_view(Some(region), &transition()).unwrap();
		assert!(route.outlet().is_some());

		route.clear_view();
		assert!(element.is_destroyed());
		assert!(route.outlet().is_none());
	}
}
