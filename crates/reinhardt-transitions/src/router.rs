//! Router.
//!
//! The router owns everything a set of nested routes shares: the route tree,
//! the route instance registry, the persisted current chain, the event source,
//! the root region and the element registry. Several routers can coexist; each
//! has its own registry.
//!
//! ```
//! use reinhardt_transitions::prelude::*;
//! use std::sync::Arc;
//!
//! # tokio_test::block_on(async {
//! let root = Arc::new(ElementRegion::new());
//! let router = Router::new(RouterSettings::default()).with_root_region(root.clone());
//! router.map(|map| {
//! 	map.route(
//! 		"home",
//! 		RouteOptions::new().component(ViewDefinition::factory(|_| Element::new("h1").text("Home"))),
//! 	);
//! });
//!
//! router.transition_to("home", Params::new(), Query::new()).await.unwrap();
//! assert_eq!(root.html(), "<h1>Home</h1>");
//! assert!(router.is_active("home", &Params::new(), &Query::new()));
//! # });
//! ```

use crate::definition::{ViewFactory, ViewOptions};
use crate::descriptor::{Params, Query, RouteDescriptor};
use crate::error::{TransitionError, TransitionResult};
use crate::events::{ListenerId, RouterEvent, RouterEventKind, RouterEvents};
use crate::middleware::TransitionMiddleware;
use crate::region::{Region, View};
use crate::registry::RouteRegistry;
use crate::route::RouteRef;
use crate::settings::RouterSettings;
use crate::transition::{RedirectTarget, Transition, TransitionRef};
use crate::tree::{RouteMap, RouteTree};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Mutable router state.
#[derive(Default)]
pub(crate) struct RouterState {
	pub(crate) routes: Vec<RouteDescriptor>,
	pub(crate) instances: Vec<RouteRef>,
	pub(crate) active: Option<TransitionRef>,
	pub(crate) params: Params,
	pub(crate) query: Query,
	pub(crate) path: String,
}

impl RouterState {
	/// Forgets `transition` if it is the active one.
	pub(crate) fn release(&mut self, transition: &Transition) {
		if self
			.active
			.as_ref()
			.is_some_and(|active| active.id() == transition.id())
		{
			self.active = None;
		}
	}
}

/// State shared by router handles, route instances and the middleware.
pub(crate) struct RouterShared {
	pub(crate) settings: RouterSettings,
	pub(crate) tree: RwLock<RouteTree>,
	pub(crate) registry: RouteRegistry,
	pub(crate) state: Mutex<RouterState>,
	pub(crate) events: RouterEvents,
	root_region: RwLock<Option<Arc<dyn Region>>>,
	elements: RwLock<HashMap<String, ViewFactory>>,
	listening: AtomicBool,
	destroyed: AtomicBool,
	next_transition: AtomicU64,
}

impl RouterShared {
	pub(crate) fn root_region(&self) -> Option<Arc<dyn Region>> {
		self.root_region.read().clone()
	}

	pub(crate) fn element(&self, tag: &str) -> Option<ViewFactory> {
		self.elements.read().get(tag).cloned()
	}

	/// Chain used to scope route contexts: the in-flight transition's
	/// instances, else the persisted chain.
	pub(crate) fn context_chain(&self) -> Vec<RouteRef> {
		let state = self.state.lock();
		if let Some(active) = &state.active {
			return active.route_instances();
		}
		if !state.instances.is_empty() {
			return state.instances.clone();
		}
		state
			.routes
			.iter()
			.filter_map(|descriptor| self.registry.get(&descriptor.name))
			.collect()
	}

	pub(crate) fn is_active(&self, name: &str, params: &Params, query: &Query) -> bool {
		let state = self.state.lock();
		state.routes.iter().any(|descriptor| descriptor.name == name)
			&& params
				.iter()
				.all(|(key, value)| state.params.get(key) == Some(value))
			&& query
				.iter()
				.all(|(key, value)| state.query.get(key) == Some(value))
	}

	pub(crate) fn generate(
		&self,
		name: &str,
		params: &Params,
		query: &Query,
	) -> TransitionResult<String> {
		self.tree
			.read()
			.generate(&self.settings, name, params, query)
	}
}

/// Handle to a router. Clones share the same router.
#[derive(Clone)]
pub struct Router {
	shared: Arc<RouterShared>,
}

impl Router {
	/// Creates a router with an empty route tree.
	pub fn new(settings: RouterSettings) -> Self {
		Self {
			shared: Arc::new(RouterShared {
				settings,
				tree: RwLock::new(RouteTree::default()),
				registry: RouteRegistry::new(),
				state: Mutex::new(RouterState::default()),
				events: RouterEvents::new(),
				root_region: RwLock::new(None),
				elements: RwLock::new(HashMap::new()),
				listening: AtomicBool::new(false),
				destroyed: AtomicBool::new(false),
				next_transition: AtomicU64::new(1),
			}),
		}
	}

	pub(crate) fn from_shared(shared: Arc<RouterShared>) -> Self {
		Self { shared }
	}

	pub(crate) fn shared(&self) -> &Arc<RouterShared> {
		&self.shared
	}

	/// Sets the region top-level views mount into.
	pub fn with_root_region(self, region: Arc<dyn Region>) -> Self {
		self.set_root_region(Some(region));
		self
	}

	/// Replaces the root region.
	pub fn set_root_region(&self, region: Option<Arc<dyn Region>>) {
		*self.shared.root_region.write() = region;
	}

	/// The root region.
	pub fn root_region(&self) -> Option<Arc<dyn Region>> {
		self.shared.root_region()
	}

	/// Router settings.
	pub fn settings(&self) -> &RouterSettings {
		&self.shared.settings
	}

	/// Replaces the route tree with the one declared by `build`.
	pub fn map<F>(&self, build: F) -> &Self
	where
		F: FnOnce(&mut RouteMap),
	{
		let tree = RouteTree::build(build);
		tracing::debug!(roots = tree.roots().len(), "route tree mapped");
		*self.shared.tree.write() = tree;
		self
	}

	/// Registers the factory used by tag view definitions naming `tag`.
	pub fn define_element<F, V>(&self, tag: impl Into<String>, factory: F) -> &Self
	where
		F: Fn(&ViewOptions) -> V + Send + Sync + 'static,
		V: View,
	{
		let factory: ViewFactory = Arc::new(move |options| Arc::new(factory(options)) as Arc<dyn View>);
		self.shared.elements.write().insert(tag.into(), factory);
		self
	}

	/// The transition middleware bound to this router.
	pub fn middleware(&self) -> TransitionMiddleware {
		TransitionMiddleware::new(self)
	}

	/// Transitions to `name`, following redirects.
	///
	/// A transition already in flight is cancelled. The returned transition is
	/// the one that completed, which differs from the requested one after a
	/// redirect.
	pub async fn transition_to(
		&self,
		name: &str,
		params: Params,
		query: Query,
	) -> TransitionResult<TransitionRef> {
		let limit = self.shared.settings.max_redirects;
		let mut target = RedirectTarget::new(name)
			.with_params(params)
			.with_query(query);
		let mut hops = 0;
		loop {
			match self.run(target).await {
				Err(TransitionError::Redirected { target: next }) => {
					hops += 1;
					if hops > limit {
						tracing::warn!(limit, route = %next.name, "redirect limit reached");
						return Err(TransitionError::TooManyRedirects { limit });
					}
					tracing::debug!(route = %next.name, hops, "following redirect");
					target = next;
				}
				outcome => return outcome,
			}
		}
	}

	async fn run(&self, target: RedirectTarget) -> TransitionResult<TransitionRef> {
		if self.is_destroyed() {
			return Err(TransitionError::RouterDestroyed);
		}
		let (routes, path) = {
			let tree = self.shared.tree.read();
			let routes = tree.chain(&target.name, &target.params)?;
			let path = tree
				.generate(&self.shared.settings, &target.name, &target.params, &target.query)
				.unwrap_or_default();
			(routes, path)
		};
		let id = self.shared.next_transition.fetch_add(1, Ordering::SeqCst);
		let transition = {
			let mut state = self.shared.state.lock();
			let transition = Arc::new(
				Transition::new(id, target.name, state.routes.clone(), routes)
					.with_params(target.params)
					.with_query(target.query)
					.with_path(path),
			);
			if let Some(previous) = state.active.replace(Arc::clone(&transition)) {
				tracing::debug!(
					transition = previous.id(),
					superseded_by = id,
					"cancelling in-flight transition"
				);
				previous.cancel();
			}
			transition
		};
		tracing::info!(transition = id, route = %transition.name(), "transition started");

		let middleware = self.middleware();
		match middleware.next(&transition).await {
			Ok(()) => {
				middleware.done(&transition);
				Ok(transition)
			}
			Err(error) => {
				middleware.error(&transition, &error);
				Err(error)
			}
		}
	}

	/// Returns `true` if `name` is in the current chain and every given param
	/// and query entry matches the current ones.
	pub fn is_active(&self, name: &str, params: &Params, query: &Query) -> bool {
		self.shared.is_active(name, params, query)
	}

	/// Builds the URL of `name`.
	pub fn generate(&self, name: &str, params: &Params, query: &Query) -> TransitionResult<String> {
		self.shared.generate(name, params, query)
	}

	/// Starts the router, entering the initial route when one is configured.
	pub async fn listen(&self) -> TransitionResult<()> {
		if self.is_destroyed() {
			return Err(TransitionError::RouterDestroyed);
		}
		if self.shared.listening.swap(true, Ordering::SeqCst) {
			return Ok(());
		}
		tracing::info!(root = %self.shared.settings.root, "router listening");
		if let Some(initial) = self.shared.settings.initial_route.clone() {
			self.transition_to(&initial, Params::new(), Query::new())
				.await?;
		}
		Ok(())
	}

	/// Returns `true` once `listen` was called.
	pub fn is_listening(&self) -> bool {
		self.shared.listening.load(Ordering::SeqCst)
	}

	/// Tears the router down: cancels the in-flight transition, drops every
	/// route instance with its view, resets the state and removes listeners.
	pub fn destroy(&self) {
		if self.shared.destroyed.swap(true, Ordering::SeqCst) {
			return;
		}
		let active = {
			let mut state = self.shared.state.lock();
			let active = state.active.take();
			*state = RouterState::default();
			active
		};
		if let Some(active) = active {
			active.cancel();
		}
		for route in self.shared.registry.clear() {
			route.clear_view();
		}
		self.shared.events.clear();
		self.shared.elements.write().clear();
		self.shared.listening.store(false, Ordering::SeqCst);
		tracing::info!("router destroyed");
	}

	/// Returns `true` once destroyed.
	pub fn is_destroyed(&self) -> bool {
		self.shared.destroyed.load(Ordering::SeqCst)
	}

	/// The event source.
	pub fn events(&self) -> &RouterEvents {
		&self.shared.events
	}

	/// Registers a listener for `kind`.
	pub fn on<F>(&self, kind: RouterEventKind, listener: F) -> ListenerId
	where
		F: Fn(&RouterEvent<'_>) + Send + Sync + 'static,
	{
		self.shared.events.on(kind, listener)
	}

	/// Removes a listener.
	pub fn off(&self, id: ListenerId) -> bool {
		self.shared.events.off(id)
	}

	/// The route instance registry.
	pub fn registry(&self) -> &RouteRegistry {
		&self.shared.registry
	}

	/// The current route chain.
	pub fn current_routes(&self) -> Vec<RouteDescriptor> {
		self.shared.state.lock().routes.clone()
	}

	/// Route instances of the current chain.
	pub fn current_instances(&self) -> Vec<RouteRef> {
		self.shared.state.lock().instances.clone()
	}

	/// Params of the current chain.
	pub fn current_params(&self) -> Params {
		self.shared.state.lock().params.clone()
	}

	/// Query of the current chain.
	pub fn current_query(&self) -> Query {
		self.shared.state.lock().query.clone()
	}

	/// Path of the current chain.
	pub fn current_path(&self) -> String {
		self.shared.state.lock().path.clone()
	}

	/// The in-flight transition.
	pub fn active_transition(&self) -> Option<TransitionRef> {
		self.shared.state.lock().active.clone()
	}
}

impl fmt::Debug for Router {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let state = self.shared.state.lock();
		f.debug_struct("Router")
			.field("settings", &self.shared.settings)
			.field("routes", &state.routes.iter().map(|d| d.name.as_str()).collect::<Vec<_>>())
			.field("active", &state.active.as_ref().map(|t| t.id()))
			.field("registry", &self.shared.registry)
			.finish()
	}
}
